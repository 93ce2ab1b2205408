use axum::extract::{Path, State};
use axum::Json;
use uuid::Uuid;

use crate::extract::{CurrentUser, ValidJson};
use crate::models::rsvp::{Rsvp, RsvpWithEvent, RsvpWithUser, SubmitRsvpRequest};
use crate::state::AppState;
use crate::store;
use crate::utils::error::AppError;

/// Create-or-overwrite, keyed by (event, caller). A second submission
/// replaces the first; it never creates a duplicate.
pub async fn submit(
    State(state): State<AppState>,
    current: CurrentUser,
    ValidJson(req): ValidJson<SubmitRsvpRequest>,
) -> Result<Json<Rsvp>, AppError> {
    store::events::find_by_id(&state.pool, req.event_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Event not found".into()))?;

    let rsvp = store::rsvps::upsert(
        &state.pool,
        req.event_id,
        current.id(),
        req.status.unwrap_or_default(),
        req.note.as_deref().unwrap_or(""),
    )
    .await?;

    Ok(Json(rsvp))
}

pub async fn for_event(
    State(state): State<AppState>,
    _current: CurrentUser,
    Path(event_id): Path<Uuid>,
) -> Result<Json<Vec<RsvpWithUser>>, AppError> {
    let rsvps = store::rsvps::list_for_event(&state.pool, event_id)
        .await?
        .into_iter()
        .map(RsvpWithUser::from)
        .collect();
    Ok(Json(rsvps))
}

/// The caller's own RSVP for an event; absence is `null`, not an error.
pub async fn mine(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(event_id): Path<Uuid>,
) -> Result<Json<Option<Rsvp>>, AppError> {
    let rsvp = store::rsvps::find_mine(&state.pool, current.id(), event_id).await?;
    Ok(Json(rsvp))
}

pub async fn my_events(
    State(state): State<AppState>,
    current: CurrentUser,
) -> Result<Json<Vec<RsvpWithEvent>>, AppError> {
    let rsvps = store::rsvps::list_mine_with_events(&state.pool, current.id())
        .await?
        .into_iter()
        .map(RsvpWithEvent::from)
        .collect();
    Ok(Json(rsvps))
}
