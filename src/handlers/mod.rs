use axum::Json;
use serde::Serialize;

pub mod auth;
pub mod events;
pub mod rsvps;

#[derive(Serialize)]
pub struct HealthPayload {
    pub status: &'static str,
}

pub async fn health_check() -> Json<HealthPayload> {
    Json(HealthPayload { status: "OK" })
}
