use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::event::{EventCategory, EventResponse, OrganizerInfo};
use crate::models::user::PublicUser;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "rsvp_status", rename_all = "snake_case")]
pub enum RsvpStatus {
    #[default]
    Attending,
    Maybe,
    NotAttending,
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Rsvp {
    pub id: Uuid,
    pub event_id: Uuid,
    pub user_id: Uuid,
    pub status: RsvpStatus,
    pub note: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// RSVP joined with the submitting user, for the per-event attendance list.
#[derive(Debug, Clone, FromRow)]
pub struct RsvpWithUserRow {
    pub id: Uuid,
    pub event_id: Uuid,
    pub user_id: Uuid,
    pub status: RsvpStatus,
    pub note: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub user_name: String,
    pub user_email: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RsvpWithUser {
    pub id: Uuid,
    pub event_id: Uuid,
    pub status: RsvpStatus,
    pub note: String,
    pub user: PublicUser,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<RsvpWithUserRow> for RsvpWithUser {
    fn from(row: RsvpWithUserRow) -> Self {
        Self {
            id: row.id,
            event_id: row.event_id,
            status: row.status,
            note: row.note,
            user: PublicUser {
                id: row.user_id,
                name: row.user_name,
                email: row.user_email,
            },
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// RSVP joined with its parent event and that event's organizer, for the
/// caller's "events I'm attending" view.
#[derive(Debug, Clone, FromRow)]
pub struct RsvpWithEventRow {
    pub id: Uuid,
    pub event_id: Uuid,
    pub user_id: Uuid,
    pub status: RsvpStatus,
    pub note: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub event_title: String,
    pub event_description: String,
    pub event_location: String,
    pub event_start_time: DateTime<Utc>,
    pub event_end_time: Option<DateTime<Utc>>,
    pub event_category: EventCategory,
    pub event_capacity: i32,
    pub event_image_url: String,
    pub event_is_public: bool,
    pub event_created_at: DateTime<Utc>,
    pub event_updated_at: DateTime<Utc>,
    pub organizer_id: Uuid,
    pub organizer_name: String,
    pub organizer_email: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RsvpWithEvent {
    pub id: Uuid,
    pub status: RsvpStatus,
    pub note: String,
    pub event: EventResponse,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<RsvpWithEventRow> for RsvpWithEvent {
    fn from(row: RsvpWithEventRow) -> Self {
        Self {
            id: row.id,
            status: row.status,
            note: row.note,
            event: EventResponse {
                id: row.event_id,
                title: row.event_title,
                description: row.event_description,
                location: row.event_location,
                start_time: row.event_start_time,
                end_time: row.event_end_time,
                category: row.event_category,
                capacity: row.event_capacity,
                image_url: row.event_image_url,
                is_public: row.event_is_public,
                organizer: OrganizerInfo {
                    id: row.organizer_id,
                    name: row.organizer_name,
                    email: row.organizer_email,
                },
                created_at: row.event_created_at,
                updated_at: row.event_updated_at,
            },
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitRsvpRequest {
    pub event_id: Uuid,
    pub status: Option<RsvpStatus>,
    pub note: Option<String>,
}
