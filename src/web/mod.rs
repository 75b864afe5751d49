//! Web server module
//!
//! Exposes the search operation and service endpoints over HTTP.

mod handlers;
mod routes;
mod state;

pub use routes::create_router;
pub use state::AppState;
