use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use crate::auth::{password, token};
use crate::extract::{CurrentUser, ValidJson};
use crate::models::user::{AuthResponse, LoginRequest, PublicUser, RegisterRequest};
use crate::state::AppState;
use crate::store;
use crate::utils::error::AppError;

pub async fn register(
    State(state): State<AppState>,
    ValidJson(req): ValidJson<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    req.validate()?;

    let password_hash = password::hash(&req.password)?;
    let user = store::users::insert(&state.pool, &req.name, &req.email, &password_hash).await?;
    let token = token::issue(user.id, &state.keys)?;

    tracing::info!(user_id = %user.id, "Registered new user");

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            id: user.id,
            name: user.name,
            email: user.email,
            token,
        }),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    ValidJson(req): ValidJson<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    req.validate()?;

    // One generic message whether the email is unknown or the password is
    // wrong, so the endpoint does not confirm which emails are registered.
    let user = store::users::find_by_email(&state.pool, &req.email)
        .await?
        .filter(|user| password::verify(&req.password, &user.password_hash))
        .ok_or_else(|| AppError::Auth("Invalid email or password".into()))?;

    let token = token::issue(user.id, &state.keys)?;

    Ok(Json(AuthResponse {
        id: user.id,
        name: user.name,
        email: user.email,
        token,
    }))
}

pub async fn me(current: CurrentUser) -> Json<PublicUser> {
    Json(PublicUser::from(current.user))
}
