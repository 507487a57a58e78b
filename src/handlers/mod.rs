//! HTTP Request Handlers
//!
//! This module contains all HTTP request handlers organized by domain.

pub mod auth;
pub mod health;
pub mod problems;
pub mod test_data;

use axum::{extract::FromRequest, middleware, Router};

use crate::{error::AppError, middleware::auth::auth_middleware, state::AppState};

/// JSON body extractor whose rejection is an [`AppError`]
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

/// Create all API routes
pub fn routes(state: AppState) -> Router<AppState> {
    let problems = problems::routes()
        .merge(test_data::routes())
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .merge(health::routes())
        .nest("/auth", auth::routes(state))
        .nest("/problems", problems)
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{to_bytes, Body},
        http::{header, Method, Request, StatusCode},
    };
    use chrono::Utc;
    use serde_json::Value;
    use tower::ServiceExt;
    use uuid::Uuid;

    use crate::{
        create_router,
        models::User,
        services::AuthService,
        test_utils::{lazy_state, test_config},
    };

    fn bearer() -> String {
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            username: "setter".to_string(),
            email: "setter@example.com".to_string(),
            password_hash: String::new(),
            full_name: None,
            created_at: now,
            updated_at: now,
        };
        let token = AuthService::issue_token(&user, &test_config().jwt).unwrap();
        format!("Bearer {}", token)
    }

    async fn send(request: Request<Body>) -> (StatusCode, Value) {
        let response = create_router(lazy_state()).oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    fn json_request(method: Method, uri: &str, auth: Option<&str>, body: &str) -> Request<Body> {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(auth) = auth {
            builder = builder.header(header::AUTHORIZATION, auth);
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    #[tokio::test]
    async fn test_health_reports_toolchain() {
        let request = Request::get("/api/health").body(Body::empty()).unwrap();
        let (status, body) = send(request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["toolchain"]["cxx"]["path"], "sh");
    }

    #[tokio::test]
    async fn test_problem_routes_require_token() {
        let request = Request::get("/api/problems").body(Body::empty()).unwrap();
        let (status, body) = send(request).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["code"], "UNAUTHORIZED");
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn test_garbage_token_is_rejected() {
        let uri = format!("/api/problems/{}/tests", Uuid::new_v4());
        let request = Request::get(uri.as_str())
            .header(header::AUTHORIZATION, "Bearer not-a-jwt")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(request).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["code"], "INVALID_TOKEN");
    }

    #[tokio::test]
    async fn test_malformed_json_is_validation_error() {
        let request = json_request(Method::POST, "/api/auth/login", None, "{\"username\": ");
        let (status, body) = send(request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_ERROR");
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn test_update_with_unknown_field_is_rejected() {
        let auth = bearer();
        let uri = format!("/api/problems/{}", Uuid::new_v4());
        let request = json_request(Method::PUT, &uri, Some(&auth), r#"{"authorId": "someone"}"#);
        let (status, body) = send(request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_generate_tests_validates_group_name() {
        let auth = bearer();
        let uri = format!("/api/problems/{}/generate-tests", Uuid::new_v4());
        let request = json_request(
            Method::POST,
            &uri,
            Some(&auth),
            r#"{"generatorFile": "gen.py", "groupName": ""}"#,
        );
        let (status, body) = send(request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_register_validates_before_touching_database() {
        let request = json_request(
            Method::POST,
            "/api/auth/register",
            None,
            r#"{"username": "ab", "email": "not-an-email", "password": "x"}"#,
        );
        let (status, body) = send(request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_ERROR");
    }
}
