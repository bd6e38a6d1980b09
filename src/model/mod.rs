pub mod catalog;
pub mod query;

pub use catalog::*;
pub use query::*;
