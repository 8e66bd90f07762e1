//! HTTP route handlers.

use axum::Router;
use axum::body::Body;
use axum::extract::State;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderValue, StatusCode};
use axum::response::Response;
use axum::routing::get;
use catsay::io::fortune;
use tracing::{error, info, warn};

use crate::state::AppState;

/// Body of `GET /`.
pub const GREETING: &str = "Hello from build-demo!";

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(root))
        .route("/cat", get(cat))
}

/// GET / - liveness greeting.
pub async fn root() -> &'static str {
    GREETING
}

/// GET /cat - fortune-captioned cat picture.
///
/// The upstream body and content type are returned with `200` whatever status
/// upstream answered with. Only failures to obtain a caption or to reach
/// upstream at all become `500`.
async fn cat(State(state): State<AppState>) -> Result<Response, StatusCode> {
    let text = state.text.clone();
    let caption = tokio::task::spawn_blocking(move || fortune::caption(&*text))
        .await
        .map_err(|e| {
            error!(err = %e, "fortune task panicked");
            StatusCode::INTERNAL_SERVER_ERROR
        })?
        .map_err(|e| {
            error!(err = %format!("{e:#}"), "fortune failed");
            StatusCode::INTERNAL_SERVER_ERROR
        })?;
    info!(%caption, "caption ready");

    let image = state.image.fetch(&caption).await.map_err(|e| {
        error!(err = %e, "image fetch failed");
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    let mut response = Response::new(Body::from(image.bytes));
    if let Some(content_type) = image.content_type {
        match HeaderValue::from_str(&content_type) {
            Ok(value) => {
                response.headers_mut().insert(CONTENT_TYPE, value);
            }
            Err(_) => warn!(%content_type, "dropping unrepresentable content type"),
        }
    }
    Ok(response)
}
