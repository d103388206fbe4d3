//! JWT authentication middleware.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
    Extension,
};
use axum_extra::extract::CookieJar;

use crate::api::AppState;
use crate::config::{ACCESS_TOKEN_COOKIE, BEARER_TOKEN_PREFIX};
use crate::domain::UserRole;
use crate::errors::AppError;

/// Authenticated user extracted from the access token
#[derive(Clone, Debug)]
pub struct CurrentUser {
    pub id: i64,
    pub role: UserRole,
}

impl CurrentUser {
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

/// Access token from `Authorization: Bearer ...`, else the `accessToken` cookie
fn access_token(request: &Request) -> Option<String> {
    let from_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix(BEARER_TOKEN_PREFIX))
        .map(str::to_string);

    from_header.or_else(|| {
        CookieJar::from_headers(request.headers())
            .get(ACCESS_TOKEN_COOKIE)
            .map(|cookie| cookie.value().to_string())
    })
}

/// JWT authentication middleware.
///
/// Validates the access token and injects the CurrentUser into the
/// request extensions.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = access_token(&request)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::unauthorized("Authentication required"))?;

    let claims = state.services.auth().verify_access_token(&token)?;

    let current_user = CurrentUser {
        id: claims.sub,
        role: UserRole::from(claims.role.as_str()),
    };

    request.extensions_mut().insert(current_user);

    Ok(next.run(request).await)
}

/// Reject non-admin callers with 403. Runs after `auth_middleware`.
pub async fn admin_middleware(
    Extension(user): Extension<CurrentUser>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if !user.is_admin() {
        return Err(AppError::Forbidden);
    }
    Ok(next.run(request).await)
}
