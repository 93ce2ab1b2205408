use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::user::User;
use crate::utils::error::AppError;

pub const DEFAULT_CAPACITY: i32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "event_category", rename_all = "snake_case")]
pub enum EventCategory {
    Conference,
    Workshop,
    Social,
    Sports,
    Music,
    #[default]
    Other,
}

#[derive(Debug, Clone, FromRow)]
pub struct Event {
    pub id: Uuid,
    pub organizer_id: Uuid,
    pub title: String,
    pub description: String,
    pub location: String,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub category: EventCategory,
    pub capacity: i32,
    pub image_url: String,
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Event joined with its organizer's public identity, as the list and
/// detail queries return it.
#[derive(Debug, Clone, FromRow)]
pub struct EventWithOrganizerRow {
    pub id: Uuid,
    pub organizer_id: Uuid,
    pub title: String,
    pub description: String,
    pub location: String,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub category: EventCategory,
    pub capacity: i32,
    pub image_url: String,
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub organizer_name: String,
    pub organizer_email: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct OrganizerInfo {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventResponse {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub location: String,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub category: EventCategory,
    pub capacity: i32,
    pub image_url: String,
    pub is_public: bool,
    pub organizer: OrganizerInfo,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl EventResponse {
    /// Used on create/update, where the caller is known to be the organizer
    /// and no join is needed.
    pub fn from_parts(event: Event, organizer: &User) -> Self {
        Self {
            id: event.id,
            title: event.title,
            description: event.description,
            location: event.location,
            start_time: event.start_time,
            end_time: event.end_time,
            category: event.category,
            capacity: event.capacity,
            image_url: event.image_url,
            is_public: event.is_public,
            organizer: OrganizerInfo {
                id: event.organizer_id,
                name: organizer.name.clone(),
                email: organizer.email.clone(),
            },
            created_at: event.created_at,
            updated_at: event.updated_at,
        }
    }
}

impl From<EventWithOrganizerRow> for EventResponse {
    fn from(row: EventWithOrganizerRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            description: row.description,
            location: row.location,
            start_time: row.start_time,
            end_time: row.end_time,
            category: row.category,
            capacity: row.capacity,
            image_url: row.image_url,
            is_public: row.is_public,
            organizer: OrganizerInfo {
                id: row.organizer_id,
                name: row.organizer_name,
                email: row.organizer_email,
            },
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventRequest {
    pub title: String,
    pub description: String,
    pub location: String,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub category: Option<EventCategory>,
    pub capacity: Option<i32>,
    pub image_url: Option<String>,
    pub is_public: Option<bool>,
}

impl CreateEventRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.title.trim().is_empty()
            || self.description.trim().is_empty()
            || self.location.trim().is_empty()
        {
            return Err(AppError::Validation(
                "Title, description, location and startTime are required".into(),
            ));
        }
        if let Some(capacity) = self.capacity {
            validate_capacity(capacity)?;
        }
        validate_time_window(self.start_time, self.end_time)
    }
}

/// Partial update. Absent fields are left untouched; present fields are
/// revalidated before the merged event is written back.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEventRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub category: Option<EventCategory>,
    pub capacity: Option<i32>,
    pub image_url: Option<String>,
    pub is_public: Option<bool>,
}

impl UpdateEventRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        if matches!(&self.title, Some(t) if t.trim().is_empty())
            || matches!(&self.description, Some(d) if d.trim().is_empty())
            || matches!(&self.location, Some(l) if l.trim().is_empty())
        {
            return Err(AppError::Validation(
                "Title, description and location cannot be blank".into(),
            ));
        }
        if let Some(capacity) = self.capacity {
            validate_capacity(capacity)?;
        }
        Ok(())
    }

    /// Merges the patch into `event`. The organizer is immutable, so there
    /// is deliberately no way to touch `organizer_id` here.
    pub fn apply(self, event: &mut Event) -> Result<(), AppError> {
        self.validate()?;

        if let Some(title) = self.title {
            event.title = title;
        }
        if let Some(description) = self.description {
            event.description = description;
        }
        if let Some(location) = self.location {
            event.location = location;
        }
        if let Some(start_time) = self.start_time {
            event.start_time = start_time;
        }
        if let Some(end_time) = self.end_time {
            event.end_time = Some(end_time);
        }
        if let Some(category) = self.category {
            event.category = category;
        }
        if let Some(capacity) = self.capacity {
            event.capacity = capacity;
        }
        if let Some(image_url) = self.image_url {
            event.image_url = image_url;
        }
        if let Some(is_public) = self.is_public {
            event.is_public = is_public;
        }

        // The merged result must still hold the time invariant, whichever
        // side of the window the patch moved.
        validate_time_window(event.start_time, event.end_time)
    }
}

fn validate_capacity(capacity: i32) -> Result<(), AppError> {
    if capacity < 1 {
        return Err(AppError::Validation(
            "Capacity must be a positive integer".into(),
        ));
    }
    Ok(())
}

fn validate_time_window(
    start: DateTime<Utc>,
    end: Option<DateTime<Utc>>,
) -> Result<(), AppError> {
    if let Some(end) = end {
        if end < start {
            return Err(AppError::Validation(
                "endTime must not be before startTime".into(),
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2030, 1, 1, h, 0, 0).unwrap()
    }

    fn create_request() -> CreateEventRequest {
        CreateEventRequest {
            title: "Meetup".into(),
            description: "d".into(),
            location: "Hall".into(),
            start_time: at(10),
            end_time: None,
            category: None,
            capacity: None,
            image_url: None,
            is_public: None,
        }
    }

    fn event() -> Event {
        Event {
            id: Uuid::new_v4(),
            organizer_id: Uuid::new_v4(),
            title: "Meetup".into(),
            description: "d".into(),
            location: "Hall".into(),
            start_time: at(10),
            end_time: Some(at(12)),
            category: EventCategory::Other,
            capacity: DEFAULT_CAPACITY,
            image_url: String::new(),
            is_public: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn create_accepts_minimal_fields() {
        assert!(create_request().validate().is_ok());
    }

    #[test]
    fn create_rejects_blank_required_fields() {
        let mut req = create_request();
        req.title = "   ".into();
        assert!(req.validate().is_err());
    }

    #[test]
    fn create_rejects_end_before_start() {
        let mut req = create_request();
        req.end_time = Some(at(9));
        assert!(req.validate().is_err());
    }

    #[test]
    fn create_rejects_nonpositive_capacity() {
        let mut req = create_request();
        req.capacity = Some(0);
        assert!(req.validate().is_err());
    }

    #[test]
    fn create_deserializes_camel_case_payload() {
        let req: CreateEventRequest = serde_json::from_value(serde_json::json!({
            "title": "Meetup",
            "description": "d",
            "location": "Hall",
            "startTime": "2030-01-01T10:00:00Z",
            "isPublic": false,
            "category": "music"
        }))
        .unwrap();
        assert_eq!(req.category, Some(EventCategory::Music));
        assert_eq!(req.is_public, Some(false));
    }

    #[test]
    fn unknown_category_is_rejected_at_deserialization() {
        let result: Result<CreateEventRequest, _> =
            serde_json::from_value(serde_json::json!({
                "title": "Meetup",
                "description": "d",
                "location": "Hall",
                "startTime": "2030-01-01T10:00:00Z",
                "category": "rave"
            }));
        assert!(result.is_err());
    }

    #[test]
    fn patch_touches_only_supplied_fields() {
        let mut event = event();
        let patch = UpdateEventRequest {
            title: Some("Renamed".into()),
            capacity: Some(25),
            ..Default::default()
        };
        patch.apply(&mut event).unwrap();
        assert_eq!(event.title, "Renamed");
        assert_eq!(event.capacity, 25);
        assert_eq!(event.location, "Hall");
        assert_eq!(event.category, EventCategory::Other);
    }

    #[test]
    fn patch_rejects_start_moved_past_existing_end() {
        let mut event = event();
        let patch = UpdateEventRequest {
            start_time: Some(at(13)),
            ..Default::default()
        };
        assert!(patch.apply(&mut event).is_err());
    }

    #[test]
    fn patch_rejects_blank_title() {
        let mut event = event();
        let patch = UpdateEventRequest {
            title: Some("  ".into()),
            ..Default::default()
        };
        assert!(patch.apply(&mut event).is_err());
        // and the event is untouched
        assert_eq!(event.title, "Meetup");
    }

    #[test]
    fn category_defaults_to_other() {
        assert_eq!(EventCategory::default(), EventCategory::Other);
    }

    #[test]
    fn response_serializes_camel_case_with_nested_organizer() {
        let user = User {
            id: Uuid::new_v4(),
            name: "Ann".into(),
            email: "ann@x.com".into(),
            password_hash: "h".into(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let mut event = event();
        event.organizer_id = user.id;
        let json = serde_json::to_value(EventResponse::from_parts(event, &user)).unwrap();
        assert_eq!(json["organizer"]["name"], "Ann");
        assert_eq!(json["isPublic"], true);
        assert!(json.get("startTime").is_some());
        assert!(json.get("start_time").is_none());
    }
}
