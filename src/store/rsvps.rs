use sqlx::PgPool;
use uuid::Uuid;

use crate::models::rsvp::{Rsvp, RsvpStatus, RsvpWithEventRow, RsvpWithUserRow};
use crate::utils::error::AppError;

/// Atomic upsert on the (event_id, user_id) unique index. Concurrent
/// submissions from the same user serialize in the database; the last
/// committed write wins wholesale and a second row can never appear.
pub async fn upsert(
    pool: &PgPool,
    event_id: Uuid,
    user_id: Uuid,
    status: RsvpStatus,
    note: &str,
) -> Result<Rsvp, AppError> {
    let rsvp = sqlx::query_as::<_, Rsvp>(
        "INSERT INTO rsvps (id, event_id, user_id, status, note)
         VALUES ($1, $2, $3, $4, $5)
         ON CONFLICT (event_id, user_id)
         DO UPDATE SET status = EXCLUDED.status, note = EXCLUDED.note, updated_at = now()
         RETURNING *",
    )
    .bind(Uuid::new_v4())
    .bind(event_id)
    .bind(user_id)
    .bind(status)
    .bind(note)
    .fetch_one(pool)
    .await?;
    Ok(rsvp)
}

pub async fn list_for_event(
    pool: &PgPool,
    event_id: Uuid,
) -> Result<Vec<RsvpWithUserRow>, AppError> {
    let rsvps = sqlx::query_as::<_, RsvpWithUserRow>(
        "SELECT r.id, r.event_id, r.user_id, r.status, r.note,
                r.created_at, r.updated_at,
                u.name AS user_name, u.email AS user_email
           FROM rsvps r
           JOIN users u ON u.id = r.user_id
          WHERE r.event_id = $1
          ORDER BY r.created_at DESC",
    )
    .bind(event_id)
    .fetch_all(pool)
    .await?;
    Ok(rsvps)
}

pub async fn find_mine(
    pool: &PgPool,
    user_id: Uuid,
    event_id: Uuid,
) -> Result<Option<Rsvp>, AppError> {
    let rsvp =
        sqlx::query_as::<_, Rsvp>("SELECT * FROM rsvps WHERE user_id = $1 AND event_id = $2")
            .bind(user_id)
            .bind(event_id)
            .fetch_optional(pool)
            .await?;
    Ok(rsvp)
}

pub async fn list_mine_with_events(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Vec<RsvpWithEventRow>, AppError> {
    let rsvps = sqlx::query_as::<_, RsvpWithEventRow>(
        "SELECT r.id, r.event_id, r.user_id, r.status, r.note,
                r.created_at, r.updated_at,
                e.title AS event_title, e.description AS event_description,
                e.location AS event_location, e.start_time AS event_start_time,
                e.end_time AS event_end_time, e.category AS event_category,
                e.capacity AS event_capacity, e.image_url AS event_image_url,
                e.is_public AS event_is_public, e.created_at AS event_created_at,
                e.updated_at AS event_updated_at,
                e.organizer_id, u.name AS organizer_name, u.email AS organizer_email
           FROM rsvps r
           JOIN events e ON e.id = r.event_id
           JOIN users u ON u.id = e.organizer_id
          WHERE r.user_id = $1
          ORDER BY r.created_at DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    Ok(rsvps)
}
