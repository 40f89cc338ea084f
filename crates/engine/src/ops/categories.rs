use crate::{Category, EngineError, Ledger, ResultEngine};

use super::Finances;

impl Finances {
    pub async fn list_categories(&self) -> ResultEngine<Vec<Category>> {
        Ledger::new(&self.database)
            .list_categories()
            .await
            .inspect_err(|err| tracing::error!("failed to list categories: {err}"))
    }

    pub async fn category_by_id(&self, id: i64) -> ResultEngine<Category> {
        Ledger::new(&self.database)
            .category_by_id(id)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound(format!("category {id}")))
    }

    pub async fn category_by_name(&self, name: &str) -> ResultEngine<Category> {
        Ledger::new(&self.database)
            .category_by_name(name)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound(format!("category '{name}'")))
    }
}
