//! API routes

mod auth;
mod health;
pub mod metrics;
mod questions;
pub mod types;

use axum::Router;
use std::sync::Arc;

use crate::state::{AppState, MetricsHandle};

/// Create the main router
pub fn create_router(state: AppState, metrics_handle: Option<Arc<MetricsHandle>>) -> Router {
    let mut router = Router::new()
        // Health check
        .merge(health::routes())
        // Login, refresh, logout
        .merge(auth::routes())
        // Public board and admin routes
        .merge(questions::routes(&state))
        .with_state(state);

    // Add metrics endpoint if handle is provided
    if let Some(handle) = metrics_handle {
        router = router.merge(metrics::routes(handle));
    }

    router
}

#[cfg(test)]
mod tests {
    use super::*;
    use ama_auth::{AuthConfig, TokenPair, hash_password};
    use ama_db::{Database, NewQuestion, NewUser};
    use axum::body::Body;
    use axum::http::{Method, Request, StatusCode, header};
    use axum::response::Response;
    use serde_json::Value;
    use tower::ServiceExt;

    struct TestApp {
        router: Router,
        state: AppState,
        user_id: i64,
    }

    impl TestApp {
        async fn new() -> Self {
            let db = Database::in_memory().await.unwrap();
            let user = db
                .insert_user(NewUser {
                    email: "a@b.com".to_string(),
                    first_name: "Alice".to_string(),
                    last_name: "Bee".to_string(),
                    password_hash: hash_password("correct").unwrap(),
                })
                .await
                .unwrap();

            let config = AuthConfig::new("router-test-secret", "example.com", "example.com");
            let state = AppState::from_auth_config(db, &config);

            Self {
                router: create_router(state.clone(), None),
                state,
                user_id: user.id,
            }
        }

        async fn send(&self, request: Request<Body>) -> Response {
            self.router.clone().oneshot(request).await.unwrap()
        }

        async fn login(&self, email: &str, password: &str) -> Response {
            let body = serde_json::json!({ "email": email, "password": password });
            self.send(
                Request::builder()
                    .method(Method::POST)
                    .uri("/authenticate")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
        }

        async fn refresh(&self, cookie: &str) -> Response {
            self.send(
                Request::builder()
                    .uri("/refresh")
                    .header(header::COOKIE, cookie)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
        }

        async fn add_question(&self, text: &str) -> i64 {
            self.state
                .db
                .insert_question(NewQuestion {
                    author_email: "asker@example.com".to_string(),
                    question: text.to_string(),
                })
                .await
                .unwrap()
                .id
        }
    }

    async fn body_bytes(response: Response) -> axum::body::Bytes {
        axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap()
    }

    async fn body_json(response: Response) -> Value {
        serde_json::from_slice(&body_bytes(response).await).unwrap()
    }

    fn set_cookie(response: &Response) -> Option<String> {
        response
            .headers()
            .get(header::SET_COOKIE)
            .map(|v| v.to_str().unwrap().to_string())
    }

    /// `name=value` part of a `Set-Cookie` header, usable as a `Cookie` header
    fn cookie_pair(set_cookie: &str) -> String {
        set_cookie.split(';').next().unwrap().to_string()
    }

    // ==================== Auth ====================

    #[tokio::test]
    async fn test_login_success() {
        let app = TestApp::new().await;
        let response = app.login("a@b.com", "correct").await;

        assert_eq!(response.status(), StatusCode::ACCEPTED);

        let cookie = set_cookie(&response).expect("refresh cookie");
        assert!(cookie.starts_with("refresh_token="));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("SameSite=Strict"));

        let tokens: TokenPair = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert!(!tokens.access_token.is_empty());
        assert!(!tokens.refresh_token.is_empty());
        assert_eq!(cookie_pair(&cookie), format!("refresh_token={}", tokens.refresh_token));

        let claims = app.state.jwt.validate(&tokens.access_token).unwrap();
        assert_eq!(claims.user_id().unwrap(), app.user_id);
    }

    #[tokio::test]
    async fn test_login_wrong_password() {
        let app = TestApp::new().await;
        let response = app.login("a@b.com", "wrong").await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(set_cookie(&response).is_none());

        let body = body_json(response).await;
        assert_eq!(body["error"], true);
        assert_eq!(body["message"], "invalid credentials");
    }

    #[tokio::test]
    async fn test_login_unknown_email() {
        let app = TestApp::new().await;
        let response = app.login("nobody@b.com", "correct").await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["message"], "invalid credentials");
    }

    #[tokio::test]
    async fn test_login_malformed_body() {
        let app = TestApp::new().await;
        let response = app
            .send(
                Request::builder()
                    .method(Method::POST)
                    .uri("/authenticate")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from("{\"email\":"))
                    .unwrap(),
            )
            .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(set_cookie(&response).is_none());
        assert_eq!(body_json(response).await["message"], "invalid request body");
    }

    #[tokio::test]
    async fn test_refresh_rotates_pair() {
        let app = TestApp::new().await;
        let login = app.login("a@b.com", "correct").await;
        let cookie = cookie_pair(&set_cookie(&login).unwrap());

        let response = app.refresh(&cookie).await;
        assert_eq!(response.status(), StatusCode::ACCEPTED);

        let new_cookie = set_cookie(&response).expect("rotated cookie");
        let tokens: TokenPair = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(
            cookie_pair(&new_cookie),
            format!("refresh_token={}", tokens.refresh_token)
        );

        let claims = app.state.jwt.validate(&tokens.access_token).unwrap();
        assert_eq!(claims.user_id().unwrap(), app.user_id);
    }

    #[tokio::test]
    async fn test_refresh_reflects_renamed_user() {
        let app = TestApp::new().await;
        let login = app.login("a@b.com", "correct").await;
        let cookie = cookie_pair(&set_cookie(&login).unwrap());

        app.state
            .db
            .update_user_name(app.user_id, "Alicia", "Bee")
            .await
            .unwrap();

        let response = app.refresh(&cookie).await;
        let tokens: TokenPair = serde_json::from_slice(&body_bytes(response).await).unwrap();
        let claims = app.state.jwt.validate(&tokens.access_token).unwrap();
        assert_eq!(claims.first_name.as_deref(), Some("Alicia"));
    }

    #[tokio::test]
    async fn test_refresh_deleted_user_rejected() {
        let app = TestApp::new().await;
        let login = app.login("a@b.com", "correct").await;
        let cookie = cookie_pair(&set_cookie(&login).unwrap());

        app.state.db.delete_user(app.user_id).await.unwrap();

        let response = app.refresh(&cookie).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(set_cookie(&response).is_none());

        let body = body_json(response).await;
        assert_eq!(body["message"], "unauthorized");
        assert!(body.get("access_token").is_none());
    }

    #[tokio::test]
    async fn test_refresh_without_cookie() {
        let app = TestApp::new().await;
        let response = app
            .send(Request::builder().uri("/refresh").body(Body::empty()).unwrap())
            .await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(set_cookie(&response).is_none());
    }

    #[tokio::test]
    async fn test_refresh_with_forged_cookie() {
        let app = TestApp::new().await;
        let response = app.refresh("refresh_token=not.a.token").await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(set_cookie(&response).is_none());
    }

    #[tokio::test]
    async fn test_logout_expires_cookie() {
        let app = TestApp::new().await;
        let response = app
            .send(Request::builder().uri("/logout").body(Body::empty()).unwrap())
            .await;

        assert_eq!(response.status(), StatusCode::ACCEPTED);

        let cookie = set_cookie(&response).expect("expired cookie");
        assert!(cookie.starts_with("refresh_token=;"));
        assert!(cookie.contains("Max-Age=0"));
        assert!(cookie.contains("Expires=Thu, 01 Jan 1970 00:00:00 GMT"));

        assert!(body_bytes(response).await.is_empty());
    }

    // ==================== Questions ====================

    #[tokio::test]
    async fn test_create_and_list_questions() {
        let app = TestApp::new().await;
        let body = serde_json::json!({
            "author_email": "curious@example.com",
            "question": "What is ownership?"
        });

        let response = app
            .send(
                Request::builder()
                    .method(Method::POST)
                    .uri("/questions")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await;

        assert_eq!(response.status(), StatusCode::ACCEPTED);
        let envelope = body_json(response).await;
        assert_eq!(envelope["error"], false);
        assert_eq!(envelope["message"], "Question created successfully");

        let response = app
            .send(Request::builder().uri("/questions").body(Body::empty()).unwrap())
            .await;
        assert_eq!(response.status(), StatusCode::OK);

        let list = body_json(response).await;
        let list = list.as_array().unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0]["question"], "What is ownership?");
        assert_eq!(list[0]["answer"], "");
    }

    #[tokio::test]
    async fn test_create_empty_question_rejected() {
        let app = TestApp::new().await;
        let body = serde_json::json!({ "author_email": "x@example.com", "question": "  " });

        let response = app
            .send(
                Request::builder()
                    .method(Method::POST)
                    .uri("/questions")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(app.state.db.list_questions().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_admin_without_header_rejected() {
        let app = TestApp::new().await;
        let id = app.add_question("Still here?").await;

        let response = app
            .send(
                Request::builder()
                    .method(Method::DELETE)
                    .uri(format!("/admin/questions/{}", id))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(response).await["message"], "unauthorized");
        assert!(app.state.db.get_question(id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_admin_with_refresh_cookie_only_rejected() {
        let app = TestApp::new().await;
        let id = app.add_question("Cookie only?").await;
        let login = app.login("a@b.com", "correct").await;
        let cookie = cookie_pair(&set_cookie(&login).unwrap());

        let response = app
            .send(
                Request::builder()
                    .method(Method::DELETE)
                    .uri(format!("/admin/questions/{}", id))
                    .header(header::COOKIE, cookie)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(app.state.db.get_question(id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_admin_answer_and_delete() {
        let app = TestApp::new().await;
        let id = app.add_question("Is this thing on?").await;

        let login = app.login("a@b.com", "correct").await;
        let tokens: TokenPair = serde_json::from_slice(&body_bytes(login).await).unwrap();
        let bearer = format!("Bearer {}", tokens.access_token);

        let response = app
            .send(
                Request::builder()
                    .method(Method::PATCH)
                    .uri(format!("/admin/questions/{}", id))
                    .header(header::AUTHORIZATION, &bearer)
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"answer":"Yes"}"#))
                    .unwrap(),
            )
            .await;
        assert_eq!(response.status(), StatusCode::ACCEPTED);
        assert_eq!(
            body_json(response).await["message"],
            "Question updated successfully"
        );

        let answered = app.state.db.get_question(id).await.unwrap().unwrap();
        assert_eq!(answered.answer, "Yes");

        let response = app
            .send(
                Request::builder()
                    .method(Method::DELETE)
                    .uri(format!("/admin/questions/{}", id))
                    .header(header::AUTHORIZATION, &bearer)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await;
        assert_eq!(response.status(), StatusCode::ACCEPTED);
        assert!(app.state.db.get_question(id).await.unwrap().is_none());

        let response = app
            .send(
                Request::builder()
                    .method(Method::DELETE)
                    .uri(format!("/admin/questions/{}", id))
                    .header(header::AUTHORIZATION, &bearer)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_admin_can_clear_answer() {
        let app = TestApp::new().await;
        let id = app.add_question("Still there?").await;
        app.state.db.update_question_answer(id, "Yes").await.unwrap();

        let login = app.login("a@b.com", "correct").await;
        let tokens: TokenPair = serde_json::from_slice(&body_bytes(login).await).unwrap();

        let response = app
            .send(
                Request::builder()
                    .method(Method::PATCH)
                    .uri(format!("/admin/questions/{}", id))
                    .header(header::AUTHORIZATION, format!("Bearer {}", tokens.access_token))
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"answer":""}"#))
                    .unwrap(),
            )
            .await;

        assert_eq!(response.status(), StatusCode::ACCEPTED);
        let cleared = app.state.db.get_question(id).await.unwrap().unwrap();
        assert_eq!(cleared.answer, "");
    }

    #[tokio::test]
    async fn test_admin_answer_missing_question() {
        let app = TestApp::new().await;
        let login = app.login("a@b.com", "correct").await;
        let tokens: TokenPair = serde_json::from_slice(&body_bytes(login).await).unwrap();

        let response = app
            .send(
                Request::builder()
                    .method(Method::PATCH)
                    .uri("/admin/questions/999")
                    .header(header::AUTHORIZATION, format!("Bearer {}", tokens.access_token))
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"answer":"Nobody asked"}"#))
                    .unwrap(),
            )
            .await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await["error"], true);
    }

    // ==================== Health ====================

    #[tokio::test]
    async fn test_health() {
        let app = TestApp::new().await;
        let response = app
            .send(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    }
}
