pub mod count_handlers;
pub mod handlers;
pub mod response;
pub mod routes;

pub use count_handlers::*;
pub use handlers::*;
pub use routes::*;
