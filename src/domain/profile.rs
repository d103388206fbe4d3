//! User profiles, contact messages and the dashboard views.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use super::order::OrderStatus;

#[derive(Debug, Clone)]
pub struct Profile {
    pub id: i64,
    pub user_id: i64,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub avatar_url: Option<String>,
    pub bio: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Partial profile update; `None` leaves the field untouched
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileChanges {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
}

impl Profile {
    pub fn apply(&mut self, changes: ProfileChanges) {
        if let Some(first_name) = changes.first_name {
            self.first_name = Some(first_name);
        }
        if let Some(last_name) = changes.last_name {
            self.last_name = Some(last_name);
        }
        if let Some(bio) = changes.bio {
            self.bio = Some(bio);
        }
        if let Some(avatar_url) = changes.avatar_url {
            self.avatar_url = Some(avatar_url);
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfileDto {
    pub id: i64,
    pub user_id: i64,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub avatar_url: Option<String>,
    pub bio: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl From<Profile> for ProfileDto {
    fn from(profile: Profile) -> Self {
        Self {
            id: profile.id,
            user_id: profile.user_id,
            first_name: profile.first_name,
            last_name: profile.last_name,
            avatar_url: profile.avatar_url,
            bio: profile.bio,
            updated_at: profile.updated_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewContactMessage {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub subject: Option<String>,
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct ContactMessage {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub subject: Option<String>,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContactResponse {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub subject: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<ContactMessage> for ContactResponse {
    fn from(message: ContactMessage) -> Self {
        Self {
            id: message.id,
            name: message.name,
            email: message.email,
            subject: message.subject,
            created_at: message.created_at,
        }
    }
}

/// Per-user dashboard
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TasksDashboardDto {
    pub profile: ProfileSummaryDto,
    pub orders: OrderSummaryDto,
    pub promotions: Vec<PromotionDto>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfileSummaryDto {
    pub user_id: i64,
    pub username: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummaryDto {
    pub total: u64,
    pub pending: u64,
    pub completed: u64,
    pub recent: Vec<RecentOrderDto>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecentOrderDto {
    pub id: i64,
    pub service_name: Option<String>,
    pub status: OrderStatus,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PromotionDto {
    pub title: String,
    pub description: String,
}

/// Back office counters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminStatsDto {
    pub total_users: u64,
    pub total_workers: u64,
    pub total_orders: u64,
    pub total_services: u64,
    pub pending_orders: u64,
    pub in_progress_orders: u64,
    pub completed_orders: u64,
    pub cancelled_orders: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_only_provided_fields() {
        let now = Utc::now();
        let mut profile = Profile {
            id: 1,
            user_id: 2,
            first_name: Some("Ada".into()),
            last_name: Some("Byron".into()),
            avatar_url: None,
            bio: Some("old".into()),
            created_at: now,
            updated_at: now,
        };
        profile.apply(ProfileChanges {
            last_name: Some("Lovelace".into()),
            ..Default::default()
        });
        assert_eq!(profile.first_name.as_deref(), Some("Ada"));
        assert_eq!(profile.last_name.as_deref(), Some("Lovelace"));
        assert_eq!(profile.bio.as_deref(), Some("old"));
    }
}
