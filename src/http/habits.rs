/// Habit CRUD endpoints
///
/// Request bodies are decoded leniently (missing fields are `None`, any
/// content type is accepted) so that a missing name surfaces as a validation
/// error rather than a decode error.

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crate::domain::{Frequency, Habit, HabitChanges, NewHabit};
use crate::http::{decode_json, parse_habit_id, run_blocking, ApiError, AppState, MessageBody};
use crate::service::ServiceError;
use crate::storage::Storage;

/// Body of `POST /api/habits`
#[derive(Debug, Default, Deserialize)]
pub struct CreateHabitRequest {
    #[serde(default)]
    pub name: String,
    pub description: Option<String>,
    pub frequency: Option<String>,
    pub color: Option<String>,
    pub category: Option<String>,
}

/// Body of `PUT /api/habits/:id`; absent fields are left unchanged
#[derive(Debug, Default, Deserialize)]
pub struct UpdateHabitRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub frequency: Option<String>,
    pub color: Option<String>,
    pub category: Option<String>,
}

/// An empty frequency string counts as "not supplied"
fn parse_frequency(raw: Option<String>) -> Result<Option<Frequency>, ApiError> {
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value
            .parse()
            .map(Some)
            .map_err(|err| ApiError::from(ServiceError::Validation(err))),
    }
}

/// POST /api/habits
pub async fn create_habit<S: Storage>(
    State(state): State<AppState<S>>,
    body: Bytes,
) -> Result<(StatusCode, Json<Habit>), ApiError> {
    let request: CreateHabitRequest = decode_json(&body)?;

    let input = NewHabit {
        name: request.name,
        description: request.description,
        frequency: parse_frequency(request.frequency)?,
        color: request.color,
        category: request.category,
    };
    let habit = run_blocking(&state, move |service| service.create(input)).await?;

    Ok((StatusCode::CREATED, Json(habit)))
}

/// GET /api/habits
pub async fn list_habits<S: Storage>(
    State(state): State<AppState<S>>,
) -> Result<Json<Vec<Habit>>, ApiError> {
    Ok(Json(run_blocking(&state, |service| service.list()).await?))
}

/// GET /api/habits/:id
pub async fn get_habit<S: Storage>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
) -> Result<Json<Habit>, ApiError> {
    let habit_id = parse_habit_id(&id)?;
    Ok(Json(run_blocking(&state, move |service| service.get(&habit_id)).await?))
}

/// PUT /api/habits/:id
pub async fn update_habit<S: Storage>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<Habit>, ApiError> {
    let habit_id = parse_habit_id(&id)?;
    let request: UpdateHabitRequest = decode_json(&body)?;

    let changes = HabitChanges {
        name: request.name,
        description: request.description,
        frequency: parse_frequency(request.frequency)?,
        color: request.color,
        category: request.category,
    };

    let habit = run_blocking(&state, move |service| {
        service.update(&habit_id, changes)?;
        service.get(&habit_id)
    })
    .await?;
    Ok(Json(habit))
}

/// DELETE /api/habits/:id
pub async fn delete_habit<S: Storage>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
) -> Result<Json<MessageBody>, ApiError> {
    let habit_id = parse_habit_id(&id)?;
    run_blocking(&state, move |service| service.delete(&habit_id)).await?;
    Ok(Json(MessageBody::new("habit deleted successfully")))
}
