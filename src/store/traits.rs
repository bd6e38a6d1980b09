use serde_json::Value;
use thiserror::Error;

use crate::model::SelectQuery;

/// Failure reported by the catalog store. Display is the store's own text.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0}")]
    Database(#[from] sqlx::Error),

    /// The store refused the query without reaching the database
    #[error("{0}")]
    Rejected(String),
}

/// Read access to the catalog tables.
///
/// Rows come back as JSON objects keyed by column name, with embedded
/// relations nested under the related table's name.
#[async_trait::async_trait]
pub trait CatalogStore: Send + Sync {
    async fn select(&self, query: &SelectQuery) -> Result<Vec<Value>, StoreError>;
}
