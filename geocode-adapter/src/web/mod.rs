//! Web layer for the geocode adapter.
//!
//! Exposes the Pelias-style `/v1/search` and `/v1/reverse` endpoints.

mod dto;
mod routes;
mod state;

pub use dto::ErrorResponse;
pub use routes::{AppError, create_router};
pub use state::AppState;
