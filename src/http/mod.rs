/// HTTP surface of the habit tracker
///
/// This module maps REST routes onto `HabitService` operations and wraps
/// them in the request middleware stack:
/// 1. Generates an `x-request-id` for every request and echoes it back
/// 2. Opens a tracing span per request, tagged with that id
/// 3. Converts handler panics into 500 responses
/// 4. Cuts off requests that exceed the configured timeout with a 408

pub mod completions;
pub mod error;
pub mod habits;

pub use error::{ApiError, ErrorBody};

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::{Body, Bytes},
    http::Request,
    routing::{delete, get, post},
    Router,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tower::ServiceBuilder;
use tower_http::{
    catch_panic::CatchPanicLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::Span;

use crate::domain::HabitId;
use crate::service::{HabitService, ServiceError};
use crate::storage::Storage;

/// Plain-text body of `GET /`
pub const HEALTH_MESSAGE: &str = "habit tracker is up";

/// Shared handler state
pub struct AppState<S> {
    pub service: Arc<HabitService<S>>,
}

impl<S> AppState<S> {
    pub fn new(service: Arc<HabitService<S>>) -> Self {
        Self { service }
    }
}

// Derive would demand `S: Clone`
impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
        }
    }
}

/// `{"message": ...}` acknowledgement body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageBody {
    pub message: String,
}

impl MessageBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Parse a habit id path segment, rejecting anything that is not a UUID
pub(crate) fn parse_habit_id(raw: &str) -> Result<HabitId, ApiError> {
    HabitId::from_string(raw).map_err(|_| ApiError::bad_request("invalid habit ID"))
}

/// Run a service call on the blocking pool
///
/// Store calls block on SQLite and on the connection mutex. Keeping them off
/// the async workers lets the timeout layer answer while a call is stuck.
pub(crate) async fn run_blocking<S, T, F>(state: &AppState<S>, call: F) -> Result<T, ApiError>
where
    S: Storage,
    T: Send + 'static,
    F: FnOnce(&HabitService<S>) -> Result<T, ServiceError> + Send + 'static,
{
    let service = Arc::clone(&state.service);
    let outcome = tokio::task::spawn_blocking(move || call(&service))
        .await
        .map_err(|err| ApiError::Internal(format!("store task failed: {err}")))?;
    Ok(outcome?)
}

/// Decode a JSON body whatever its content type
pub(crate) fn decode_json<T: DeserializeOwned>(body: &Bytes) -> Result<T, ApiError> {
    serde_json::from_slice(body).map_err(|err| {
        tracing::debug!(error = %err, "rejected request body");
        ApiError::bad_request("invalid request body")
    })
}

async fn health() -> &'static str {
    HEALTH_MESSAGE
}

fn request_span(request: &Request<Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("-");

    tracing::info_span!(
        "request",
        method = %request.method(),
        uri = %request.uri(),
        request_id = %request_id,
    )
}

/// Build the full application router
pub fn router<S: Storage>(state: AppState<S>, request_timeout: Duration) -> Router {
    let api = Router::new()
        .route(
            "/habits",
            post(habits::create_habit::<S>).get(habits::list_habits::<S>),
        )
        .route(
            "/habits/:id",
            get(habits::get_habit::<S>)
                .put(habits::update_habit::<S>)
                .delete(habits::delete_habit::<S>),
        )
        .route("/habits/:id/complete", post(completions::mark_complete::<S>))
        .route(
            "/habits/:id/complete/:date",
            delete(completions::unmark_complete::<S>),
        )
        .route(
            "/habits/:id/statistics",
            get(completions::get_statistics::<S>),
        )
        .route(
            "/habits/:id/completions",
            get(completions::list_completions::<S>),
        );

    let middleware = ServiceBuilder::new()
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(TraceLayer::new_for_http().make_span_with(request_span))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(CatchPanicLayer::new())
        .layer(TimeoutLayer::new(request_timeout));

    Router::new()
        .route("/", get(health))
        .nest("/api", api)
        .with_state(state)
        .layer(middleware)
}
