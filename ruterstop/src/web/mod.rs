//! Web layer for the departure board server.
//!
//! Serves plain-text departure boards at `GET /{stop_id}`.

mod dto;
mod routes;
mod state;

pub use dto::{DepartureQuery, InvalidQuery};
pub use routes::{AppError, BAD_REQUEST_TEXT, NOT_FOUND_TEXT, SERVER_ERROR_TEXT, create_router};
pub use state::AppState;
