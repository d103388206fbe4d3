//! Profile and contact form handlers.

use axum::{
    extract::{Extension, State},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::api::extractors::{ValidatedJson, PHONE_RE};
use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::domain::{ContactResponse, NewContactMessage, ProfileChanges, ProfileDto};
use crate::errors::AppResult;
use crate::types::{ApiResponse, Created};

/// Partial profile update, absent fields are left as they are
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[validate(length(max = 50, message = "First name must be at most 50 characters"))]
    pub first_name: Option<String>,
    #[validate(length(max = 50, message = "Last name must be at most 50 characters"))]
    pub last_name: Option<String>,
    #[validate(length(max = 1000, message = "Bio must be at most 1000 characters"))]
    pub bio: Option<String>,
    #[validate(url(message = "Invalid avatar URL"))]
    pub avatar_url: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ContactRequest {
    #[validate(length(min = 1, max = 100, message = "Name is required"))]
    #[schema(example = "Nguyen Van A")]
    pub name: String,
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "user@example.com")]
    pub email: String,
    #[validate(regex(path = *PHONE_RE, message = "Invalid phone number"))]
    pub phone: Option<String>,
    #[validate(length(max = 200, message = "Subject must be at most 200 characters"))]
    pub subject: Option<String>,
    #[validate(length(min = 1, max = 5000, message = "Message is required"))]
    pub message: String,
}

pub fn profile_routes() -> Router<AppState> {
    Router::new().route("/", get(get_profile).put(update_profile))
}

pub fn contact_routes() -> Router<AppState> {
    Router::new().route("/", post(submit_contact))
}

#[utoipa::path(
    get,
    path = "/profile",
    tag = "Profile",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Caller's profile", body = ProfileDto),
        (status = 404, description = "Profile not found")
    )
)]
pub async fn get_profile(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<ProfileDto>> {
    let profile = state.services.profiles().get_profile(current_user.id).await?;
    Ok(ApiResponse::success(profile))
}

/// Update the caller's profile, creating it when missing
#[utoipa::path(
    put,
    path = "/profile",
    tag = "Profile",
    security(("bearer_auth" = [])),
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = ProfileDto),
        (status = 400, description = "Validation error")
    )
)]
pub async fn update_profile(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<UpdateProfileRequest>,
) -> AppResult<ApiResponse<ProfileDto>> {
    let changes = ProfileChanges {
        first_name: payload.first_name,
        last_name: payload.last_name,
        bio: payload.bio,
        avatar_url: payload.avatar_url,
    };
    let profile = state
        .services
        .profiles()
        .update_profile(current_user.id, changes)
        .await?;
    Ok(ApiResponse::with_message(
        profile,
        "Profile updated successfully",
    ))
}

#[utoipa::path(
    post,
    path = "/contact",
    tag = "Contact",
    request_body = ContactRequest,
    responses(
        (status = 201, description = "Message received", body = ContactResponse),
        (status = 400, description = "Validation error")
    )
)]
pub async fn submit_contact(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<ContactRequest>,
) -> AppResult<Created<ContactResponse>> {
    let response = state
        .services
        .contacts()
        .submit(NewContactMessage {
            name: payload.name,
            email: payload.email,
            phone: payload.phone,
            subject: payload.subject,
            message: payload.message,
        })
        .await?;
    Ok(Created(ApiResponse::with_message(
        response,
        "Message sent successfully",
    )))
}
