//! User domain entity and related types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::config::{ROLE_ADMIN, ROLE_USER, ROLE_WORKER};

/// User roles enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum UserRole {
    User,
    Admin,
    Worker,
}

impl UserRole {
    /// Check if this role has admin privileges
    pub fn is_admin(&self) -> bool {
        matches!(self, UserRole::Admin)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::User => ROLE_USER,
            UserRole::Admin => ROLE_ADMIN,
            UserRole::Worker => ROLE_WORKER,
        }
    }
}

impl From<&str> for UserRole {
    fn from(s: &str) -> Self {
        match s {
            ROLE_ADMIN => UserRole::Admin,
            ROLE_WORKER => UserRole::Worker,
            _ => UserRole::User,
        }
    }
}

impl From<UserRole> for String {
    fn from(role: UserRole) -> Self {
        role.as_str().to_string()
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a login identifier is matched
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum LoginType {
    #[default]
    Email,
    Username,
    Phone,
}

/// User account
#[derive(Debug, Clone)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub username: String,
    pub phone: Option<String>,
    pub password_hash: String,
    pub enabled: bool,
    pub account_non_expired: bool,
    pub account_non_locked: bool,
    pub credentials_non_expired: bool,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub avatar_url: Option<String>,
    pub role: UserRole,
    /// JSON array of skill labels, workers only
    pub skills: Option<String>,
    pub google_id: Option<String>,
    pub facebook_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Check if user has admin role
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    pub fn is_worker(&self) -> bool {
        self.role == UserRole::Worker
    }

    /// "first last", or None when both parts are missing
    pub fn full_name(&self) -> Option<String> {
        let parts: Vec<&str> = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .filter(|p| !p.trim().is_empty())
            .collect();
        if parts.is_empty() {
            None
        } else {
            Some(parts.join(" "))
        }
    }

    /// Worker skills text contains the requested service (case-insensitive).
    /// A blank filter matches every worker.
    pub fn has_skill(&self, service: &str) -> bool {
        let needle = service.trim();
        if needle.is_empty() {
            return true;
        }
        self.skills
            .as_deref()
            .map(|skills| skills.to_lowercase().contains(&needle.to_lowercase()))
            .unwrap_or(false)
    }

    /// Reason the account may not sign in, if any
    pub fn sign_in_block(&self) -> Option<&'static str> {
        if !self.enabled {
            Some("Account is disabled")
        } else if !self.account_non_locked {
            Some("Account is locked")
        } else {
            None
        }
    }
}

/// Data for a new account
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub email: String,
    pub username: String,
    pub phone: Option<String>,
    pub password_hash: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: UserRole,
    pub skills: Option<String>,
}

/// User response (safe to return to client)
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = "user@example.com")]
    pub email: String,
    #[schema(example = "jdoe")]
    pub username: String,
    pub phone: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub avatar_url: Option<String>,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            username: user.username,
            phone: user.phone,
            first_name: user.first_name,
            last_name: user.last_name,
            avatar_url: user.avatar_url,
            role: user.role,
            created_at: user.created_at,
        }
    }
}

/// Account as seen from the admin back office
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserManagementDto {
    pub id: i64,
    pub email: String,
    pub username: String,
    pub phone: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: UserRole,
    pub enabled: bool,
    pub account_non_locked: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserManagementDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            username: user.username,
            phone: user.phone,
            first_name: user.first_name,
            last_name: user.last_name,
            role: user.role,
            enabled: user.enabled,
            account_non_locked: user.account_non_locked,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Bookable worker
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WorkerDto {
    pub id: i64,
    pub username: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub avatar_url: Option<String>,
    /// Raw skills JSON as stored
    pub skills: Option<String>,
    /// Set when availability was computed for a slot
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available: Option<bool>,
}

impl WorkerDto {
    pub fn from_user(user: User, available: Option<bool>) -> Self {
        Self {
            id: user.id,
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
            phone: user.phone,
            avatar_url: user.avatar_url,
            skills: user.skills,
            available,
        }
    }
}

#[cfg(test)]
pub(crate) fn sample_user(id: i64, role: UserRole) -> User {
    let now = Utc::now();
    User {
        id,
        email: format!("user{}@example.com", id),
        username: format!("user{}", id),
        phone: None,
        password_hash: "hashed".to_string(),
        enabled: true,
        account_non_expired: true,
        account_non_locked: true,
        credentials_non_expired: true,
        first_name: None,
        last_name: None,
        avatar_url: None,
        role,
        skills: None,
        google_id: None,
        facebook_id: None,
        created_at: now,
        updated_at: now,
    }
}
