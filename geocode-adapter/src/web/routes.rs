//! HTTP route handlers.

use axum::{
    Json, Router,
    extract::{Query, State, rejection::QueryRejection},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
    routing::any,
};
use serde_json::Value;
use tower_http::{set_header::SetResponseHeaderLayer, trace::TraceLayer};

use crate::photon::PhotonError;
use crate::translate::{
    QueryParams, RequestError, TranslateError, reverse_url, search_request, translate_results,
};

use super::dto::ErrorResponse;
use super::state::AppState;

/// Create the application router.
///
/// Both endpoints answer any method. Every response, errors included,
/// allows any origin.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/v1/search", any(search))
        .route("/v1/reverse", any(reverse))
        .fallback(not_found)
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Forward search.
async fn search(
    State(state): State<AppState>,
    query: Result<Query<QueryParams>, QueryRejection>,
) -> Result<Json<Value>, AppError> {
    let Query(params) = query?;

    let request = search_request(state.photon.base_url(), &params)?;
    let upstream = state.photon.fetch(&request.url).await?;
    let result = translate_results(upstream, request.dataset.as_deref())?;

    Ok(Json(result))
}

/// Reverse geocoding.
async fn reverse(
    State(state): State<AppState>,
    query: Result<Query<QueryParams>, QueryRejection>,
) -> Result<Json<Value>, AppError> {
    let Query(params) = query?;

    let url = reverse_url(state.photon.base_url(), &params)?;
    let upstream = state.photon.fetch(&url).await?;
    let result = translate_results(upstream, None)?;

    Ok(Json(result))
}

async fn not_found() -> AppError {
    AppError::NotFound {
        message: "path not found".to_string(),
    }
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    Internal { message: String },
}

impl From<QueryRejection> for AppError {
    fn from(e: QueryRejection) -> Self {
        AppError::BadRequest {
            message: e.body_text(),
        }
    }
}

impl From<RequestError> for AppError {
    fn from(e: RequestError) -> Self {
        AppError::BadRequest {
            message: e.to_string(),
        }
    }
}

impl From<TranslateError> for AppError {
    fn from(e: TranslateError) -> Self {
        AppError::Internal {
            message: e.to_string(),
        }
    }
}

impl From<PhotonError> for AppError {
    fn from(e: PhotonError) -> Self {
        AppError::Internal {
            message: e.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        if status.is_server_error() {
            tracing::error!(%status, %message, "request failed");
        } else {
            tracing::debug!(%status, %message, "request rejected");
        }

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
