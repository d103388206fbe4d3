//! Authentication handlers.
//!
//! Every successful sign-in also sets the token pair as httpOnly cookies,
//! and both logout endpoints expire them.

use axum::{extract::State, response::IntoResponse, routing::post, Router};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::api::extractors::{ValidatedJson, PHONE_RE};
use crate::api::state::CookieSettings;
use crate::api::AppState;
use crate::config::{ACCESS_TOKEN_COOKIE, REFRESH_TOKEN_COOKIE};
use crate::domain::LoginType;
use crate::errors::{AppError, AppResult};
use crate::services::{AuthResponse, Registration};
use crate::types::{ApiResponse, Created};

/// User registration request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(
        email(message = "Invalid email format"),
        length(max = 100, message = "Email must be at most 100 characters")
    )]
    #[schema(example = "user@example.com")]
    pub email: String,
    #[validate(length(min = 3, max = 50, message = "Username must be 3-50 characters"))]
    #[schema(example = "jdoe")]
    pub username: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    #[schema(example = "SecurePass123", min_length = 8)]
    pub password: String,
    #[schema(example = "SecurePass123")]
    pub confirm_password: String,
    #[validate(regex(path = *PHONE_RE, message = "Invalid phone number"))]
    #[schema(example = "0901234567")]
    pub phone: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// User login request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    /// Email, username or phone depending on `loginType`
    #[validate(length(min = 1, message = "Username is required"))]
    #[schema(example = "user@example.com")]
    pub username: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
    #[serde(default)]
    pub login_type: LoginType,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenRequest {
    #[validate(length(min = 1, message = "Refresh token is required"))]
    pub refresh_token: String,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LogoutRequest {
    #[serde(default)]
    pub refresh_token: Option<String>,
}

/// Create authentication routes
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/refresh", post(refresh))
        .route("/logout", post(logout))
        .route("/logout-cookie", post(logout_cookie))
        .route("/google", post(google_login))
        .route("/facebook", post(facebook_login))
}

fn auth_cookie(
    name: &'static str,
    value: String,
    max_age_seconds: i64,
    settings: CookieSettings,
) -> Cookie<'static> {
    Cookie::build((name, value))
        .path("/")
        .http_only(true)
        .secure(settings.secure)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::seconds(max_age_seconds))
        .build()
}

fn set_auth_cookies(jar: CookieJar, settings: CookieSettings, auth: &AuthResponse) -> CookieJar {
    jar.add(auth_cookie(
        ACCESS_TOKEN_COOKIE,
        auth.access_token.clone(),
        settings.access_max_age_seconds,
        settings,
    ))
    .add(auth_cookie(
        REFRESH_TOKEN_COOKIE,
        auth.refresh_token.clone(),
        settings.refresh_max_age_seconds,
        settings,
    ))
}

fn clear_auth_cookies(jar: CookieJar, settings: CookieSettings) -> CookieJar {
    jar.add(auth_cookie(ACCESS_TOKEN_COOKIE, String::new(), 0, settings))
        .add(auth_cookie(REFRESH_TOKEN_COOKIE, String::new(), 0, settings))
}

/// Register a new user
#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "Authentication",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered, token cookies set", body = AuthResponse),
        (status = 400, description = "Validation error or duplicate account")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    ValidatedJson(payload): ValidatedJson<RegisterRequest>,
) -> AppResult<impl IntoResponse> {
    let auth = state
        .services
        .auth()
        .register(Registration {
            email: payload.email,
            username: payload.username,
            password: payload.password,
            confirm_password: payload.confirm_password,
            phone: payload.phone,
            first_name: payload.first_name,
            last_name: payload.last_name,
        })
        .await?;

    let jar = set_auth_cookies(jar, state.cookies, &auth);
    Ok((
        jar,
        Created(ApiResponse::with_message(auth, "User registered successfully")),
    ))
}

/// Sign in by email, username or phone
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful, token cookies set", body = AuthResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Invalid credentials, disabled or locked account")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> AppResult<impl IntoResponse> {
    let auth = state
        .services
        .auth()
        .login(payload.username, payload.password, payload.login_type)
        .await?;

    let jar = set_auth_cookies(jar, state.cookies, &auth);
    Ok((jar, ApiResponse::with_message(auth, "Login successful")))
}

/// Rotate the refresh token
#[utoipa::path(
    post,
    path = "/api/auth/refresh",
    tag = "Authentication",
    request_body = RefreshTokenRequest,
    responses(
        (status = 200, description = "New token pair", body = AuthResponse),
        (status = 401, description = "Invalid, unknown or expired refresh token")
    )
)]
pub async fn refresh(
    State(state): State<AppState>,
    jar: CookieJar,
    ValidatedJson(payload): ValidatedJson<RefreshTokenRequest>,
) -> AppResult<impl IntoResponse> {
    let auth = state.services.auth().refresh(payload.refresh_token).await?;

    let jar = set_auth_cookies(jar, state.cookies, &auth);
    Ok((jar, ApiResponse::with_message(auth, "Token refreshed successfully")))
}

/// Revoke the refresh token from the body and clear the cookies
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    tag = "Authentication",
    request_body = LogoutRequest,
    responses(
        (status = 200, description = "Logged out")
    )
)]
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
    ValidatedJson(payload): ValidatedJson<LogoutRequest>,
) -> AppResult<impl IntoResponse> {
    if let Some(token) = payload.refresh_token {
        state.services.auth().logout(token).await?;
    }

    let jar = clear_auth_cookies(jar, state.cookies);
    Ok((jar, ApiResponse::message("Logout successful")))
}

/// Revoke the refresh token held in the cookie and clear the cookies
#[utoipa::path(
    post,
    path = "/api/auth/logout-cookie",
    tag = "Authentication",
    responses(
        (status = 200, description = "Logged out")
    )
)]
pub async fn logout_cookie(
    State(state): State<AppState>,
    jar: CookieJar,
) -> AppResult<impl IntoResponse> {
    if let Some(cookie) = jar.get(REFRESH_TOKEN_COOKIE) {
        state
            .services
            .auth()
            .logout(cookie.value().to_string())
            .await?;
    }

    let jar = clear_auth_cookies(jar, state.cookies);
    Ok((jar, ApiResponse::message("Logout successful")))
}

#[utoipa::path(
    post,
    path = "/api/auth/google",
    tag = "Authentication",
    responses((status = 400, description = "Not implemented"))
)]
pub async fn google_login() -> AppResult<ApiResponse<()>> {
    Err(AppError::bad_request("Google login not implemented yet"))
}

#[utoipa::path(
    post,
    path = "/api/auth/facebook",
    tag = "Authentication",
    responses((status = 400, description = "Not implemented"))
)]
pub async fn facebook_login() -> AppResult<ApiResponse<()>> {
    Err(AppError::bad_request("Facebook login not implemented yet"))
}
