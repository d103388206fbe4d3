//! User database entity for SeaORM.

use sea_orm::entity::prelude::*;

use crate::domain::{User, UserRole};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "auth_users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub email: String,
    #[sea_orm(unique)]
    pub username: String,
    #[sea_orm(unique)]
    pub phone: Option<String>,
    pub password_hash: String,
    pub enabled: bool,
    pub account_non_expired: bool,
    pub account_non_locked: bool,
    pub credentials_non_expired: bool,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub avatar_url: Option<String>,
    pub role: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub skills: Option<String>,
    pub google_id: Option<String>,
    pub facebook_id: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for User {
    fn from(model: Model) -> Self {
        User {
            id: model.id,
            email: model.email,
            username: model.username,
            phone: model.phone,
            password_hash: model.password_hash,
            enabled: model.enabled,
            account_non_expired: model.account_non_expired,
            account_non_locked: model.account_non_locked,
            credentials_non_expired: model.credentials_non_expired,
            first_name: model.first_name,
            last_name: model.last_name,
            avatar_url: model.avatar_url,
            role: UserRole::from(model.role.as_str()),
            skills: model.skills,
            google_id: model.google_id,
            facebook_id: model.facebook_id,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
