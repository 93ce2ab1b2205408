use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::extract::{CurrentUser, ValidJson};
use crate::models::event::{
    CreateEventRequest, Event, EventResponse, UpdateEventRequest, DEFAULT_CAPACITY,
};
use crate::state::AppState;
use crate::store;
use crate::utils::error::AppError;

pub async fn create(
    State(state): State<AppState>,
    current: CurrentUser,
    ValidJson(req): ValidJson<CreateEventRequest>,
) -> Result<(StatusCode, Json<EventResponse>), AppError> {
    req.validate()?;

    let now = Utc::now();
    let event = Event {
        id: Uuid::new_v4(),
        organizer_id: current.id(),
        title: req.title,
        description: req.description,
        location: req.location,
        start_time: req.start_time,
        end_time: req.end_time,
        category: req.category.unwrap_or_default(),
        capacity: req.capacity.unwrap_or(DEFAULT_CAPACITY),
        image_url: req.image_url.unwrap_or_default(),
        is_public: req.is_public.unwrap_or(true),
        created_at: now,
        updated_at: now,
    };

    let created = store::events::insert(&state.pool, &event).await?;
    tracing::info!(event_id = %created.id, organizer_id = %current.id(), "Created event");

    Ok((
        StatusCode::CREATED,
        Json(EventResponse::from_parts(created, &current.user)),
    ))
}

#[derive(Debug, Deserialize)]
pub struct EventListQuery {
    pub category: Option<String>,
    pub search: Option<String>,
}

pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<EventListQuery>,
) -> Result<Json<Vec<EventResponse>>, AppError> {
    let category = query.category.filter(|c| !c.is_empty() && c != "all");
    let search = query.search.filter(|s| !s.is_empty());

    let events = store::events::list_public(&state.pool, category.as_deref(), search.as_deref())
        .await?
        .into_iter()
        .map(EventResponse::from)
        .collect();
    Ok(Json(events))
}

pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<EventResponse>, AppError> {
    let event = store::events::find_with_organizer(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Event not found".into()))?;
    Ok(Json(EventResponse::from(event)))
}

pub async fn my_events(
    State(state): State<AppState>,
    current: CurrentUser,
) -> Result<Json<Vec<EventResponse>>, AppError> {
    let events = store::events::list_by_organizer(&state.pool, current.id())
        .await?
        .into_iter()
        .map(EventResponse::from)
        .collect();
    Ok(Json(events))
}

pub async fn update(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<Uuid>,
    ValidJson(patch): ValidJson<UpdateEventRequest>,
) -> Result<Json<EventResponse>, AppError> {
    let mut event = fetch_owned(&state, id, &current).await?;

    patch.apply(&mut event)?;

    let updated = store::events::update(&state.pool, &event).await?;
    Ok(Json(EventResponse::from_parts(updated, &current.user)))
}

pub async fn remove(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    fetch_owned(&state, id, &current).await?;

    store::events::delete_cascade(&state.pool, id).await?;
    tracing::info!(event_id = %id, "Deleted event and its RSVPs");

    Ok(Json(json!({ "message": "Event deleted" })))
}

/// 404 before 403: a caller probing ids learns whether an event exists
/// (same as fetching it directly) but mutation stays organizer-only.
async fn fetch_owned(state: &AppState, id: Uuid, current: &CurrentUser) -> Result<Event, AppError> {
    let event = store::events::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Event not found".into()))?;

    if event.organizer_id != current.id() {
        return Err(AppError::Forbidden("Not authorized".into()));
    }
    Ok(event)
}
