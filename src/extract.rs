use axum::async_trait;
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, FromRequestParts, Request};
use axum::http::request::Parts;
use axum::{Json, RequestPartsExt};
use axum_extra::headers::authorization::Bearer;
use axum_extra::headers::Authorization;
use axum_extra::TypedHeader;
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::auth::token;
use crate::models::user::User;
use crate::state::AppState;
use crate::store;
use crate::utils::error::AppError;

/// The verified caller. Adding this argument to a handler makes the route
/// protected: extraction fails with 401 unless the request carries a valid
/// bearer token whose subject still exists.
pub struct CurrentUser {
    pub user: User,
}

impl CurrentUser {
    pub fn id(&self) -> Uuid {
        self.user.id
    }
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) = parts
            .extract::<TypedHeader<Authorization<Bearer>>>()
            .await
            .map_err(|_| AppError::Auth("Not authorized, no token".into()))?;

        let user_id = token::verify(bearer.token(), &state.keys)?;

        // Resolve the subject fresh so a user no longer in the store is
        // treated like any other bad credential.
        let user = store::users::find_by_id(&state.pool, user_id)
            .await?
            .ok_or_else(|| AppError::Auth("Not authorized, token failed".into()))?;

        Ok(Self { user })
    }
}

/// `Json<T>` whose rejection is reported in the application's own 400
/// validation shape instead of axum's default.
pub struct ValidJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::Validation(rejection.body_text()))?;
        Ok(ValidJson(value))
    }
}
