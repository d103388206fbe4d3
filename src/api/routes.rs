//! Application route configuration.

use axum::{
    extract::State,
    http::{header, HeaderValue, Method, StatusCode},
    middleware,
    response::Json,
    routing::get,
    Router,
};
use serde::Serialize;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::handlers::{
    admin_routes, auth_routes, catalog_routes, contact_routes, home_routes, legacy_worker_routes,
    loyalty_routes, news_routes, order_public_routes, order_routes, profile_routes, tasks_routes,
    worker_routes,
};
use super::middleware::{admin_middleware, auth_middleware};
use super::openapi::ApiDoc;
use super::AppState;

/// Create the application router with all routes configured
pub fn create_router(state: AppState) -> Router {
    let auth_layer = || middleware::from_fn_with_state(state.clone(), auth_middleware);

    Router::new()
        .route("/health", get(health))
        // OpenAPI Swagger UI documentation
        .merge(SwaggerUi::new("/swagger-ui").url("/v3/api-docs", ApiDoc::openapi()))
        // Public routes
        .nest("/api/auth", auth_routes())
        .nest("/api/workers", worker_routes())
        .nest("/workers", legacy_worker_routes())
        .nest("/services", catalog_routes())
        .nest("/news", news_routes())
        .nest("/home", home_routes())
        .nest("/contact", contact_routes())
        // Protected routes (require JWT)
        .nest(
            "/orders",
            order_routes()
                .route_layer(auth_layer())
                .merge(order_public_routes()),
        )
        .nest("/loyalty", loyalty_routes().route_layer(auth_layer()))
        .nest("/profile", profile_routes().route_layer(auth_layer()))
        .nest("/api/tasks", tasks_routes().route_layer(auth_layer()))
        // Admin routes (JWT + ADMIN role)
        .nest(
            "/api/admin",
            admin_routes()
                .route_layer(middleware::from_fn(admin_middleware))
                .route_layer(auth_layer()),
        )
        // Global middleware
        .layer(cors_layer(&state.cors_allowed_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// CORS for the configured origins, with credentials so the auth cookies
/// reach the API
fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .allow_credentials(true)
}

/// Health check response
#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    database: ServiceStatus,
}

/// Service status
#[derive(Serialize)]
struct ServiceStatus {
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Health check endpoint with database connectivity check
async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let ping = match &state.database {
        Some(database) => database.ping().await,
        None => Ok(()),
    };

    let database = match ping {
        Ok(_) => ServiceStatus {
            status: "healthy",
            error: None,
        },
        Err(e) => ServiceStatus {
            status: "unhealthy",
            error: Some(e.to_string()),
        },
    };

    let healthy = database.error.is_none();
    let response = HealthResponse {
        status: if healthy { "healthy" } else { "degraded" },
        database,
    };

    let status_code = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status_code, Json(response))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use serde_json::Value;
    use tower::ServiceExt;

    use super::*;
    use crate::config::Config;
    use crate::domain::catalog::sample_service;
    use crate::domain::user::sample_user;
    use crate::domain::{Password, UserRole};
    use crate::infra::repositories::{
        MockRefreshTokenRepository, MockServiceRepository, MockUserRepository,
    };
    use crate::infra::testing::TestUnitOfWork;
    use crate::infra::RefreshToken;
    use crate::services::{Services, TokenKind, TokenProvider};

    fn config() -> Config {
        Config::with_secret("router-test-secret-at-least-32-chars").unwrap()
    }

    fn app(uow: TestUnitOfWork) -> Router {
        let config = config();
        let services = Arc::new(Services::with_unit_of_work(uow.into_arc(), &config));
        create_router(AppState::new(services, None, &config))
    }

    fn bearer(role: UserRole) -> String {
        let token = TokenProvider::new(&config())
            .issue(&sample_user(7, role), TokenKind::Access)
            .unwrap();
        format!("Bearer {}", token.token)
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_health_without_database() {
        let response = app(TestUnitOfWork::default())
            .oneshot(get("/health"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["status"], "healthy");
    }

    #[tokio::test]
    async fn test_protected_route_requires_token() {
        let response = app(TestUnitOfWork::default())
            .oneshot(get("/orders"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = json_body(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "UNAUTHORIZED");
    }

    #[tokio::test]
    async fn test_admin_route_forbidden_for_user() {
        let request = Request::builder()
            .uri("/api/admin/dashboard/stats")
            .header(header::AUTHORIZATION, bearer(UserRole::User))
            .body(Body::empty())
            .unwrap();

        let response = app(TestUnitOfWork::default())
            .oneshot(request)
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(json_body(response).await["error"], "FORBIDDEN");
    }

    #[tokio::test]
    async fn test_access_token_read_from_cookie() {
        let token = TokenProvider::new(&config())
            .issue(&sample_user(7, UserRole::User), TokenKind::Access)
            .unwrap();
        let request = Request::builder()
            .uri("/orders/status/bogus")
            .header(header::COOKIE, format!("accessToken={}", token.token))
            .body(Body::empty())
            .unwrap();

        let response = app(TestUnitOfWork::default())
            .oneshot(request)
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["error"], "INVALID_STATUS");
    }

    #[tokio::test]
    async fn test_workers_answer_bare_json() {
        let mut users = MockUserRepository::new();
        users.expect_find_workers().returning(|| {
            let mut worker = sample_user(3, UserRole::Worker);
            worker.skills = Some(r#"["Plumbing"]"#.into());
            Ok(vec![worker])
        });

        let response = app(TestUnitOfWork::default().with_users(users))
            .oneshot(get("/api/workers?service=plumbing"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert!(body.is_array());
        assert_eq!(body[0]["id"], 3);
        assert_eq!(body[0]["available"], true);
    }

    #[tokio::test]
    async fn test_inactive_service_not_found() {
        let mut catalog = MockServiceRepository::new();
        catalog
            .expect_find_by_id()
            .returning(|id| Ok(Some(sample_service(id, false))));

        let response = app(TestUnitOfWork::default().with_catalog(catalog))
            .oneshot(get("/services/5"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = json_body(response).await;
        assert_eq!(body["error"], "RESOURCE_NOT_FOUND");
        assert_eq!(body["message"], "Service not found with id: 5");
    }

    #[tokio::test]
    async fn test_social_login_not_implemented() {
        let request = Request::builder()
            .method("POST")
            .uri("/api/auth/google")
            .body(Body::empty())
            .unwrap();

        let response = app(TestUnitOfWork::default())
            .oneshot(request)
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            json_body(response).await["message"],
            "Google login not implemented yet"
        );
    }

    #[tokio::test]
    async fn test_register_validation_errors() {
        let request = Request::builder()
            .method("POST")
            .uri("/api/auth/register")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(
                r#"{"email":"not-an-email","username":"ab","password":"short","confirmPassword":"short"}"#,
            ))
            .unwrap();

        let response = app(TestUnitOfWork::default())
            .oneshot(request)
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["error"], "VALIDATION_ERROR");
        assert!(body["data"]["email"].is_string());
        assert!(body["data"]["password"].is_string());
    }

    #[tokio::test]
    async fn test_login_sets_token_cookies() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_username().returning(|_| {
            let mut user = sample_user(4, UserRole::User);
            user.password_hash = Password::new("Secret123").unwrap().into_string();
            Ok(Some(user))
        });
        let mut tokens = MockRefreshTokenRepository::new();
        tokens
            .expect_create()
            .returning(|user_id, token, expires_at| {
                Ok(RefreshToken {
                    id: 1,
                    user_id,
                    token,
                    expires_at,
                })
            });

        let request = Request::builder()
            .method("POST")
            .uri("/api/auth/login")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(
                r#"{"username":"user4","password":"Secret123","loginType":"USERNAME"}"#,
            ))
            .unwrap();

        let response = app(TestUnitOfWork::default()
            .with_users(users)
            .with_refresh_tokens(tokens))
        .oneshot(request)
        .await
        .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let cookies: Vec<String> = response
            .headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .map(|v| v.to_str().unwrap().to_string())
            .collect();
        assert!(cookies.iter().any(|c| c.starts_with("accessToken=")));
        assert!(cookies.iter().any(|c| c.starts_with("refreshToken=")));
        assert!(cookies.iter().all(|c| c.contains("HttpOnly")));

        let body = json_body(response).await;
        assert_eq!(body["data"]["tokenType"], "Bearer");
        assert_eq!(body["data"]["user"]["id"], 4);
    }

    #[tokio::test]
    async fn test_logout_clears_cookies() {
        let request = Request::builder()
            .method("POST")
            .uri("/api/auth/logout-cookie")
            .body(Body::empty())
            .unwrap();

        let response = app(TestUnitOfWork::default())
            .oneshot(request)
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let cookies: Vec<&str> = response
            .headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .collect();
        assert_eq!(cookies.len(), 2);
        assert!(cookies.iter().all(|c| c.contains("Max-Age=0")));
    }
}
