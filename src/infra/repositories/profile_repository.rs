//! Profiles and contact messages.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};

use super::entities::contact_message;
use super::entities::profile::{self, Entity as ProfileEntity};
use crate::domain::{ContactMessage, NewContactMessage, Profile, ProfileChanges};
use crate::errors::AppResult;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    async fn find_by_user(&self, user_id: i64) -> AppResult<Option<Profile>>;

    /// Apply `changes`, creating the profile when the user has none
    async fn upsert(&self, user_id: i64, changes: ProfileChanges) -> AppResult<Profile>;
}

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ContactRepository: Send + Sync {
    async fn create(&self, message: NewContactMessage) -> AppResult<ContactMessage>;
}

pub struct ProfileStore {
    db: DatabaseConnection,
}

impl ProfileStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn find_model(&self, user_id: i64) -> AppResult<Option<profile::Model>> {
        Ok(ProfileEntity::find()
            .filter(profile::Column::UserId.eq(user_id))
            .one(&self.db)
            .await?)
    }
}

#[async_trait]
impl ProfileRepository for ProfileStore {
    async fn find_by_user(&self, user_id: i64) -> AppResult<Option<Profile>> {
        Ok(self.find_model(user_id).await?.map(Profile::from))
    }

    async fn upsert(&self, user_id: i64, changes: ProfileChanges) -> AppResult<Profile> {
        let now = Utc::now();
        let model = match self.find_model(user_id).await? {
            Some(model) => {
                let mut merged = Profile::from(model.clone());
                merged.apply(changes);

                let mut active: profile::ActiveModel = model.into();
                active.first_name = Set(merged.first_name);
                active.last_name = Set(merged.last_name);
                active.bio = Set(merged.bio);
                active.avatar_url = Set(merged.avatar_url);
                active.updated_at = Set(now);
                active.update(&self.db).await?
            }
            None => {
                profile::ActiveModel {
                    user_id: Set(user_id),
                    first_name: Set(changes.first_name),
                    last_name: Set(changes.last_name),
                    avatar_url: Set(changes.avatar_url),
                    bio: Set(changes.bio),
                    created_at: Set(now),
                    updated_at: Set(now),
                    ..Default::default()
                }
                .insert(&self.db)
                .await?
            }
        };
        Ok(Profile::from(model))
    }
}

pub struct ContactStore {
    db: DatabaseConnection,
}

impl ContactStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ContactRepository for ContactStore {
    async fn create(&self, message: NewContactMessage) -> AppResult<ContactMessage> {
        let model = contact_message::ActiveModel {
            name: Set(message.name),
            email: Set(message.email),
            phone: Set(message.phone),
            subject: Set(message.subject),
            message: Set(message.message),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;
        Ok(ContactMessage::from(model))
    }
}
