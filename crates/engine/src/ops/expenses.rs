use sea_orm::TransactionTrait;

use crate::{
    CacheKey, CachedValue, EngineError, Expense, ExpenseQuery, ExpenseWrite, Ledger, Period,
    ResultEngine,
};

use super::{Finances, with_tx};

impl Finances {
    /// Inserts or replaces an expense and returns its id.
    ///
    /// The query cache is flushed before the store is touched and once more
    /// after the write commits, so no listing computed before the write can
    /// be served afterwards. The category is resolved by name; an unknown
    /// category fails the write with [`EngineError::KeyNotFound`].
    pub async fn record_expense(&self, write: ExpenseWrite) -> ResultEngine<i64> {
        self.cache.flush_all().await;

        let id = self.apply_write(&write).await.inspect_err(|err| {
            tracing::error!("failed to record expense: {err}");
        })?;

        self.cache.flush_all().await;
        Ok(id)
    }

    async fn apply_write(&self, write: &ExpenseWrite) -> ResultEngine<i64> {
        with_tx!(self, |db_tx| {
            let ledger = Ledger::new(&db_tx);
            let name = &write.fields().category;
            let category = ledger
                .category_by_name(name)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound(format!("category '{name}'")))?;

            match write {
                ExpenseWrite::Insert(fields) => ledger.insert_expense(fields, category.id).await,
                ExpenseWrite::Update { id, fields } => ledger
                    .update_expense(*id, fields, category.id)
                    .await
                    .map(|()| *id),
            }
        })
    }

    /// Lists the expenses of a calendar month, newest first, with their sum.
    ///
    /// `category` restricts the listing to one category; `None` or an empty
    /// name lists every category. Results are served from the query cache
    /// when both the list and its total are present.
    pub async fn list_expenses(
        &self,
        category: Option<&str>,
        month: u32,
        year: i32,
    ) -> ResultEngine<(Vec<Expense>, i64)> {
        let period = Period::month(year, month).inspect_err(|err| {
            tracing::error!("failed to list expenses: {err}");
        })?;

        let query = ExpenseQuery {
            category: category
                .filter(|name| !name.is_empty())
                .map(ToString::to_string),
            month,
            year,
        };
        let list_key = CacheKey::ExpenseList(query.clone());
        let total_key = CacheKey::ExpenseTotal(query.clone());

        if let (Some(CachedValue::Expenses(list)), Some(CachedValue::Total(total))) = (
            self.cache.get(&list_key).await,
            self.cache.get(&total_key).await,
        ) {
            tracing::info!(?query, "cache hit");
            return Ok((list, total));
        }
        tracing::info!(?query, "cache miss");

        let generation = self.cache.generation().await;
        let (list, total) = Ledger::new(&self.database)
            .list_expenses(query.category.as_deref(), &period)
            .await
            .inspect_err(|err| {
                tracing::error!("failed to list expenses: {err}");
            })?;

        let stored = self
            .cache
            .set_if_fresh(
                generation,
                vec![
                    (list_key, CachedValue::Expenses(list.clone())),
                    (total_key, CachedValue::Total(total)),
                ],
                self.list_ttl,
            )
            .await;
        if !stored {
            tracing::debug!(?query, "listing outdated by a concurrent write, not cached");
        }

        Ok((list, total))
    }
}
