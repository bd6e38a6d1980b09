pub mod aggregate;
pub mod translate;

pub use aggregate::*;
