pub mod api;
pub mod config;
pub mod error;
pub mod logic;
pub mod model;
pub mod store;

// Export API types
pub use api::routes;
pub use error::{ApiError, MessageKey};

// Export all model types
pub use model::*;

// Export store types
pub use store::{CatalogStore, MemoryStore, PostgresStore, StoreError};

