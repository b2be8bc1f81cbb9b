mod datasets;

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use chanpulse_core::{Catalog, Month};
use chanpulse_data::{MonthContext, MonthStore, ResolveError, SourceKind};

use crate::middleware::request_id;

#[derive(Clone)]
pub struct AppState {
    pub store: MonthStore,
    pub catalog: Arc<Catalog>,
}

/// Error envelope shared by every failing endpoint: `success` is always
/// `false`, `month` and `missing` appear only for availability failures.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    #[serde(skip)]
    status: StatusCode,
    success: bool,
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    month: Option<Month>,
    #[serde(skip_serializing_if = "Option::is_none")]
    missing: Option<Vec<SourceKind>>,
}

impl ApiError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            success: false,
            error: message.into(),
            month: None,
            missing: None,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    /// Generic 500 body; the caller logs the real failure server-side.
    pub fn internal() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "internal server error")
    }

    fn unavailable(month: Option<Month>, missing: Vec<SourceKind>) -> Self {
        Self {
            month,
            missing: Some(missing),
            ..Self::new(StatusCode::NOT_FOUND, "requested month is not available")
        }
    }

    /// Map a failed month resolution onto the HTTP error taxonomy: malformed
    /// token is the caller's fault (400), anything about availability is 404.
    pub fn from_context(ctx: &MonthContext) -> Self {
        match &ctx.error {
            Some(err @ ResolveError::InvalidMonthFormat(_)) => Self::bad_request(err.to_string()),
            Some(err @ ResolveError::NoMonthsAvailable) => Self::not_found(err.to_string()),
            None => Self::unavailable(ctx.month.clone(), ctx.missing.clone()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status, Json(self)).into_response()
    }
}

/// Run a filesystem-bound closure off the async runtime.
pub(super) async fn run_blocking<T, F>(f: F) -> Result<T, ApiError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f).await.map_err(|e| {
        tracing::error!(error = %e, "blocking task failed");
        ApiError::internal()
    })
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static("x-request-id"),
        ])
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/data/months", get(list_months))
        .route("/data/{resource}", get(datasets::get_dataset))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

#[derive(Debug, Serialize)]
struct HealthData {
    status: &'static str,
}

async fn health() -> impl IntoResponse {
    Json(HealthData { status: "ok" })
}

#[derive(Debug, Serialize)]
struct MonthsResponse {
    latest: Option<Month>,
    months: Vec<Month>,
}

/// Months with any source material present, ascending, with the latest one
/// called out for default selection.
async fn list_months(State(state): State<AppState>) -> Result<Json<MonthsResponse>, ApiError> {
    let store = state.store.clone();
    let months = run_blocking(move || store.available_months()).await?;
    Ok(Json(MonthsResponse {
        latest: months.last().cloned(),
        months,
    }))
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
