use sqlx::PgPool;
use uuid::Uuid;

use crate::models::event::{Event, EventWithOrganizerRow};
use crate::utils::error::AppError;

const SELECT_WITH_ORGANIZER: &str = "SELECT e.id, e.organizer_id, e.title, e.description,
            e.location, e.start_time, e.end_time, e.category, e.capacity,
            e.image_url, e.is_public, e.created_at, e.updated_at,
            u.name AS organizer_name, u.email AS organizer_email
       FROM events e
       JOIN users u ON u.id = e.organizer_id";

pub async fn insert(pool: &PgPool, event: &Event) -> Result<Event, AppError> {
    let created = sqlx::query_as::<_, Event>(
        "INSERT INTO events (id, organizer_id, title, description, location,
                             start_time, end_time, category, capacity, image_url, is_public)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
         RETURNING *",
    )
    .bind(event.id)
    .bind(event.organizer_id)
    .bind(&event.title)
    .bind(&event.description)
    .bind(&event.location)
    .bind(event.start_time)
    .bind(event.end_time)
    .bind(event.category)
    .bind(event.capacity)
    .bind(&event.image_url)
    .bind(event.is_public)
    .fetch_one(pool)
    .await?;
    Ok(created)
}

/// Public listing. The category filter compares as text so an unrecognized
/// value simply matches nothing, like the original list filter.
pub async fn list_public(
    pool: &PgPool,
    category: Option<&str>,
    search: Option<&str>,
) -> Result<Vec<EventWithOrganizerRow>, AppError> {
    let sql = format!(
        "{SELECT_WITH_ORGANIZER}
          WHERE e.is_public
            AND ($1::text IS NULL OR e.category::text = $1)
            AND ($2::text IS NULL OR e.title ILIKE '%' || $2 || '%')
          ORDER BY e.start_time ASC"
    );
    let events = sqlx::query_as::<_, EventWithOrganizerRow>(&sql)
        .bind(category)
        .bind(search)
        .fetch_all(pool)
        .await?;
    Ok(events)
}

/// Direct fetch by id. Intentionally ignores is_public: a private event is
/// unlisted, not unguessable.
pub async fn find_with_organizer(
    pool: &PgPool,
    id: Uuid,
) -> Result<Option<EventWithOrganizerRow>, AppError> {
    let sql = format!("{SELECT_WITH_ORGANIZER} WHERE e.id = $1");
    let event = sqlx::query_as::<_, EventWithOrganizerRow>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(event)
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Event>, AppError> {
    let event = sqlx::query_as::<_, Event>("SELECT * FROM events WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(event)
}

pub async fn list_by_organizer(
    pool: &PgPool,
    organizer_id: Uuid,
) -> Result<Vec<EventWithOrganizerRow>, AppError> {
    let sql = format!("{SELECT_WITH_ORGANIZER} WHERE e.organizer_id = $1 ORDER BY e.start_time ASC");
    let events = sqlx::query_as::<_, EventWithOrganizerRow>(&sql)
        .bind(organizer_id)
        .fetch_all(pool)
        .await?;
    Ok(events)
}

pub async fn update(pool: &PgPool, event: &Event) -> Result<Event, AppError> {
    let updated = sqlx::query_as::<_, Event>(
        "UPDATE events
            SET title = $2, description = $3, location = $4, start_time = $5,
                end_time = $6, category = $7, capacity = $8, image_url = $9,
                is_public = $10, updated_at = now()
          WHERE id = $1
          RETURNING *",
    )
    .bind(event.id)
    .bind(&event.title)
    .bind(&event.description)
    .bind(&event.location)
    .bind(event.start_time)
    .bind(event.end_time)
    .bind(event.category)
    .bind(event.capacity)
    .bind(&event.image_url)
    .bind(event.is_public)
    .fetch_one(pool)
    .await?;
    Ok(updated)
}

/// Removes the event and every RSVP referencing it in one transaction, so
/// the cascade can never half-complete.
pub async fn delete_cascade(pool: &PgPool, id: Uuid) -> Result<(), AppError> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM rsvps WHERE event_id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM events WHERE id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(())
}
