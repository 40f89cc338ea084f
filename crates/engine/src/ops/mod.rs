use std::{sync::Arc, time::Duration};

use sea_orm::DatabaseConnection;

use crate::{QueryCache, ResultEngine};

mod categories;
mod expenses;
mod reports;

/// Lifetime of cached expense listings when none is configured.
pub const DEFAULT_LIST_TTL: Duration = Duration::from_secs(60 * 60);

/// Run a block inside a DB transaction, committing on success and rolling back on error.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

#[derive(Debug)]
pub struct Finances {
    database: DatabaseConnection,
    cache: Arc<QueryCache>,
    list_ttl: Duration,
}

impl Finances {
    /// Return a builder for `Finances`. Help to build the struct.
    pub fn builder() -> FinancesBuilder {
        FinancesBuilder::default()
    }

    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }
}

/// The builder for `Finances`
pub struct FinancesBuilder {
    database: DatabaseConnection,
    cache: Option<Arc<QueryCache>>,
    list_ttl: Duration,
}

impl Default for FinancesBuilder {
    fn default() -> Self {
        Self {
            database: DatabaseConnection::default(),
            cache: None,
            list_ttl: DEFAULT_LIST_TTL,
        }
    }
}

impl FinancesBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> FinancesBuilder {
        self.database = db;
        self
    }

    /// Share an existing cache. A private one is created otherwise.
    pub fn cache(mut self, cache: Arc<QueryCache>) -> FinancesBuilder {
        self.cache = Some(cache);
        self
    }

    /// Lifetime of cached expense listings.
    pub fn list_ttl(mut self, ttl: Duration) -> FinancesBuilder {
        self.list_ttl = ttl;
        self
    }

    /// Construct `Finances`
    pub async fn build(self) -> ResultEngine<Finances> {
        Ok(Finances {
            database: self.database,
            cache: self.cache.unwrap_or_default(),
            list_ttl: self.list_ttl,
        })
    }
}
