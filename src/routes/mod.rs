use axum::middleware;
use axum::routing::{get, post};
use axum::Router;

use crate::config::{create_cors_layer, security_headers};
use crate::handlers::{auth, events, health_check, rsvps};
use crate::state::AppState;

/// Protection is decided per handler: routes taking a [`CurrentUser`]
/// argument require a valid bearer token, everything else is public.
///
/// [`CurrentUser`]: crate::extract::CurrentUser
pub fn create_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/me", get(auth::me))
        .route("/events", get(events::list).post(events::create))
        .route("/events/my-events", get(events::my_events))
        .route(
            "/events/:id",
            get(events::get_by_id)
                .put(events::update)
                .delete(events::remove),
        )
        .route("/rsvps", post(rsvps::submit))
        .route("/rsvps/event/:event_id", get(rsvps::for_event))
        .route("/rsvps/my/:event_id", get(rsvps::mine))
        .route("/rsvps/my-events", get(rsvps::my_events))
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .layer(middleware::from_fn(security_headers))
        .layer(create_cors_layer())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use sqlx::PgPool;
    use tower::ServiceExt;

    // A lazy pool never connects unless a handler actually reaches the
    // store, so these tests exercise the HTTP surface without a database.
    fn app() -> Router {
        let config = Config {
            database_url: "postgres://localhost/unused".into(),
            port: 0,
            jwt_secret: "test-secret".into(),
            jwt_expires_in_hours: 1,
        };
        let pool = PgPool::connect_lazy(&config.database_url).unwrap();
        create_routes(AppState::new(pool, &config))
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn json_post(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn health_check_is_public() {
        let response = app()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get("x-content-type-options").unwrap(),
            "nosniff"
        );
        assert_eq!(body_json(response).await, serde_json::json!({"status": "OK"}));
    }

    #[tokio::test]
    async fn protected_routes_reject_missing_token() {
        for (method, uri) in [
            ("GET", "/auth/me"),
            ("GET", "/events/my-events"),
            ("GET", "/rsvps/my-events"),
            ("POST", "/rsvps"),
            ("POST", "/events"),
        ] {
            let response = app()
                .oneshot(
                    Request::builder()
                        .method(method)
                        .uri(uri)
                        .body(Body::empty())
                        .unwrap(),
                )
                .await
                .unwrap();
            assert_eq!(
                response.status(),
                StatusCode::UNAUTHORIZED,
                "{method} {uri} should require a token"
            );
        }
    }

    #[tokio::test]
    async fn invalid_bearer_token_is_rejected() {
        let response = app()
            .oneshot(
                Request::get("/auth/me")
                    .header(header::AUTHORIZATION, "Bearer not.a.token")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = body_json(response).await;
        assert_eq!(body["message"], "Not authorized, token failed");
    }

    #[tokio::test]
    async fn register_rejects_incomplete_payload() {
        // Missing password: fails JSON validation before any store access.
        let response = app()
            .oneshot(json_post(
                "/auth/register",
                serde_json::json!({"name": "Ann", "email": "ann@x.com"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn register_rejects_blank_fields() {
        let response = app()
            .oneshot(json_post(
                "/auth/register",
                serde_json::json!({"name": "  ", "email": "ann@x.com", "password": "secret1"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["message"], "All fields are required");
    }

    #[tokio::test]
    async fn login_rejects_missing_fields() {
        let response = app()
            .oneshot(json_post(
                "/auth/login",
                serde_json::json!({"email": "ann@x.com", "password": ""}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["message"], "Email and password are required");
    }

    #[tokio::test]
    async fn unknown_route_is_404() {
        let response = app()
            .oneshot(Request::get("/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
