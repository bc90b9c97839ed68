//! HTTP surface for the task workflow

pub mod error;
pub mod routes;

pub use error::{ApiError, ApiResult};
pub use routes::{create_router, AppState};
