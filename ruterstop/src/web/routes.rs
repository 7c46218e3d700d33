//! HTTP route handlers.
//!
//! Every response, including errors, is plain text. Error bodies are fixed
//! strings; details go to the log only.

use axum::{
    Router,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use tracing::{error, warn};

use crate::entur::StopFetcher;
use crate::error::Error;

use super::dto::DepartureQuery;
use super::state::AppState;

/// Body for unknown stops and unknown routes ("invalid stop").
pub const NOT_FOUND_TEXT: &str = "Ugyldig stoppested";

/// Body for unexpected failures ("server error").
pub const SERVER_ERROR_TEXT: &str = "Feil på serveren";

/// Body for unparsable query parameters ("invalid request").
pub const BAD_REQUEST_TEXT: &str = "Ugyldig forespørsel";

const TEXT_PLAIN: &str = "text/plain; charset=utf-8";

/// Create the application router.
pub fn create_router<F: StopFetcher>(state: AppState<F>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/:stop_id", get(departures::<F>))
        .fallback(not_found)
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Departure board for one stop.
async fn departures<F: StopFetcher>(
    State(state): State<AppState<F>>,
    Path(stop_id): Path<String>,
    Query(query): Query<DepartureQuery>,
) -> Result<Response, AppError> {
    let stop_id: u32 = stop_id.parse().map_err(|_| AppError::NotFound)?;

    let options = query
        .apply(&state.defaults)
        .map_err(|e| AppError::BadRequest {
            message: e.to_string(),
        })?;

    match state.entur.render_departures(stop_id, &options).await? {
        Some(board) => Ok(([(header::CONTENT_TYPE, TEXT_PLAIN)], board).into_response()),
        None => Err(AppError::NotFound),
    }
}

async fn not_found() -> AppError {
    AppError::NotFound
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound,
    Internal { message: String },
}

impl From<Error> for AppError {
    fn from(e: Error) -> Self {
        AppError::Internal {
            message: e.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            AppError::BadRequest { message } => {
                warn!(%message, "Rejected request");
                (StatusCode::BAD_REQUEST, BAD_REQUEST_TEXT)
            }
            AppError::NotFound => (StatusCode::NOT_FOUND, NOT_FOUND_TEXT),
            AppError::Internal { message } => {
                error!(%message, "Request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, SERVER_ERROR_TEXT)
            }
        };

        (status, [(header::CONTENT_TYPE, TEXT_PLAIN)], body).into_response()
    }
}
