/// Completion and statistics endpoints

use axum::{
    body::Bytes,
    extract::{Path, State},
    Json,
};
use serde::Deserialize;

use crate::analytics::Statistics;
use crate::domain::{parse_day, Completion};
use crate::http::{decode_json, parse_habit_id, run_blocking, ApiError, AppState, MessageBody};
use crate::storage::Storage;

const BAD_DATE: &str = "invalid date format, use YYYY-MM-DD";

/// Optional body of `POST /api/habits/:id/complete`
#[derive(Debug, Default, Deserialize)]
pub struct CompleteHabitRequest {
    /// Day to mark, `YYYY-MM-DD`; today when absent
    pub date: Option<String>,
    pub notes: Option<String>,
}

/// POST /api/habits/:id/complete
///
/// The body may be empty, in which case today is marked.
pub async fn mark_complete<S: Storage>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<MessageBody>, ApiError> {
    let habit_id = parse_habit_id(&id)?;

    let request: CompleteHabitRequest = if body.iter().all(u8::is_ascii_whitespace) {
        CompleteHabitRequest::default()
    } else {
        decode_json(&body)?
    };

    let day = match request.date.as_deref().map(str::trim).filter(|d| !d.is_empty()) {
        Some(raw) => Some(parse_day(raw).ok_or_else(|| ApiError::bad_request(BAD_DATE))?),
        None => None,
    };
    let notes = request.notes;

    run_blocking(&state, move |service| {
        let day = day.unwrap_or_else(|| service.today());
        service.mark_complete(&habit_id, &day, notes)
    })
    .await?;
    Ok(Json(MessageBody::new("habit marked as complete")))
}

/// DELETE /api/habits/:id/complete/:date
pub async fn unmark_complete<S: Storage>(
    State(state): State<AppState<S>>,
    Path((id, date)): Path<(String, String)>,
) -> Result<Json<MessageBody>, ApiError> {
    let habit_id = parse_habit_id(&id)?;
    let day = parse_day(&date).ok_or_else(|| ApiError::bad_request(BAD_DATE))?;

    run_blocking(&state, move |service| service.unmark_complete(&habit_id, &day)).await?;
    Ok(Json(MessageBody::new("completion removed")))
}

/// GET /api/habits/:id/completions
pub async fn list_completions<S: Storage>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Completion>>, ApiError> {
    let habit_id = parse_habit_id(&id)?;
    Ok(Json(run_blocking(&state, move |service| service.list_completions(&habit_id)).await?))
}

/// GET /api/habits/:id/statistics
pub async fn get_statistics<S: Storage>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
) -> Result<Json<Statistics>, ApiError> {
    let habit_id = parse_habit_id(&id)?;
    Ok(Json(run_blocking(&state, move |service| service.statistics(&habit_id)).await?))
}
