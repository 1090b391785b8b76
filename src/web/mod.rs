//! Web server module
//!
//! Provides the HTTP API in front of the aggregator.

mod handlers;
mod routes;
mod state;

pub use handlers::{bearer_token, SearchParams, SearchResponse};
pub use routes::create_router;
pub use state::AppState;
