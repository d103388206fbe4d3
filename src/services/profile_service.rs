//! User profiles and the public contact form.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::{ContactResponse, NewContactMessage, ProfileChanges, ProfileDto};
use crate::errors::{AppResult, OptionExt};
use crate::infra::UnitOfWork;

#[async_trait]
pub trait ProfileService: Send + Sync {
    async fn get_profile(&self, user_id: i64) -> AppResult<ProfileDto>;

    /// Create the profile when missing; only provided fields are written
    async fn update_profile(&self, user_id: i64, changes: ProfileChanges)
        -> AppResult<ProfileDto>;
}

#[async_trait]
pub trait ContactService: Send + Sync {
    async fn submit(&self, message: NewContactMessage) -> AppResult<ContactResponse>;
}

pub struct Profiles<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> Profiles<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> ProfileService for Profiles<U> {
    async fn get_profile(&self, user_id: i64) -> AppResult<ProfileDto> {
        self.uow
            .profiles()
            .find_by_user(user_id)
            .await?
            .map(ProfileDto::from)
            .ok_or_not_found(format!("Profile not found for user id: {}", user_id))
    }

    async fn update_profile(
        &self,
        user_id: i64,
        changes: ProfileChanges,
    ) -> AppResult<ProfileDto> {
        let profile = self.uow.profiles().upsert(user_id, changes).await?;
        Ok(ProfileDto::from(profile))
    }
}

pub struct ContactInbox<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> ContactInbox<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> ContactService for ContactInbox<U> {
    async fn submit(&self, message: NewContactMessage) -> AppResult<ContactResponse> {
        let stored = self.uow.contacts().create(message).await?;
        tracing::info!(message_id = stored.id, "Contact message received");
        Ok(ContactResponse::from(stored))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ContactMessage, Profile};
    use crate::errors::AppError;
    use crate::infra::repositories::{MockContactRepository, MockProfileRepository};
    use crate::infra::testing::TestUnitOfWork;
    use chrono::Utc;
    use mockall::predicate::*;

    #[tokio::test]
    async fn test_missing_profile() {
        let mut profiles = MockProfileRepository::new();
        profiles.expect_find_by_user().returning(|_| Ok(None));

        let service = Profiles::new(TestUnitOfWork::default().with_profiles(profiles).into_arc());
        let err = service.get_profile(12).await.unwrap_err();
        assert!(
            matches!(err, AppError::NotFound(msg) if msg == "Profile not found for user id: 12")
        );
    }

    #[tokio::test]
    async fn test_update_profile_upserts() {
        let mut profiles = MockProfileRepository::new();
        profiles
            .expect_upsert()
            .with(eq(4), always())
            .returning(|user_id, changes| {
                let now = Utc::now();
                Ok(Profile {
                    id: 1,
                    user_id,
                    first_name: changes.first_name,
                    last_name: None,
                    avatar_url: None,
                    bio: changes.bio,
                    created_at: now,
                    updated_at: now,
                })
            });

        let service = Profiles::new(TestUnitOfWork::default().with_profiles(profiles).into_arc());
        let dto = service
            .update_profile(
                4,
                ProfileChanges {
                    first_name: Some("Minh".into()),
                    bio: Some("Handy".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(dto.user_id, 4);
        assert_eq!(dto.first_name.as_deref(), Some("Minh"));
    }

    #[tokio::test]
    async fn test_contact_submit() {
        let mut contacts = MockContactRepository::new();
        contacts.expect_create().times(1).returning(|m| {
            Ok(ContactMessage {
                id: 9,
                name: m.name,
                email: m.email,
                phone: m.phone,
                subject: m.subject,
                message: m.message,
                created_at: Utc::now(),
            })
        });

        let service = ContactInbox::new(TestUnitOfWork::default().with_contacts(contacts).into_arc());
        let response = service
            .submit(NewContactMessage {
                name: "An".into(),
                email: "an@example.com".into(),
                phone: None,
                subject: Some("Quote".into()),
                message: "Need a plumber".into(),
            })
            .await
            .unwrap();
        assert_eq!(response.id, 9);
        assert_eq!(response.subject.as_deref(), Some("Quote"));
    }
}
