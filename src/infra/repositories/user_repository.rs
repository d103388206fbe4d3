//! User account repository.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};

use super::base::{count, fetch_page, invalid_sort, sort_order};
use super::entities::user::{self, ActiveModel, Entity as UserEntity};
use crate::domain::{NewUser, User, UserRole};
use crate::errors::{AppError, AppResult};
use crate::types::{Page, PageRequest};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// User repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<User>>;

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>>;

    async fn find_by_phone(&self, phone: &str) -> AppResult<Option<User>>;

    /// Batch lookup; missing ids are skipped
    async fn find_by_ids(&self, ids: Vec<i64>) -> AppResult<Vec<User>>;

    async fn exists_by_email(&self, email: &str) -> AppResult<bool>;

    async fn exists_by_username(&self, username: &str) -> AppResult<bool>;

    async fn exists_by_phone(&self, phone: &str) -> AppResult<bool>;

    async fn create(&self, new_user: NewUser) -> AppResult<User>;

    /// All accounts with role WORKER, ordered by id
    async fn find_workers(&self) -> AppResult<Vec<User>>;

    async fn list(&self, request: PageRequest) -> AppResult<Page<User>>;

    /// Flip `account_non_locked`; NotFound when the account is missing
    async fn set_locked(&self, id: i64, locked: bool) -> AppResult<User>;

    async fn count_by_role(&self, role: UserRole) -> AppResult<u64>;
}

/// SeaORM-backed user repository
pub struct UserStore {
    db: DatabaseConnection,
}

impl UserStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn sort_column(field: &str) -> AppResult<user::Column> {
    match field {
        "id" => Ok(user::Column::Id),
        "email" => Ok(user::Column::Email),
        "username" => Ok(user::Column::Username),
        "role" => Ok(user::Column::Role),
        "createdAt" => Ok(user::Column::CreatedAt),
        "updatedAt" => Ok(user::Column::UpdatedAt),
        other => Err(invalid_sort(other)),
    }
}

pub(crate) async fn find_by_id<C: ConnectionTrait>(db: &C, id: i64) -> AppResult<Option<User>> {
    let model = UserEntity::find_by_id(id).one(db).await?;
    Ok(model.map(User::from))
}

/// Load a user and hold a row lock until the transaction ends
pub(crate) async fn lock_by_id<C: ConnectionTrait>(db: &C, id: i64) -> AppResult<Option<User>> {
    let model = UserEntity::find_by_id(id).lock_exclusive().one(db).await?;
    Ok(model.map(User::from))
}

pub(crate) async fn insert<C: ConnectionTrait>(db: &C, new_user: NewUser) -> AppResult<User> {
    let now = chrono::Utc::now();
    let active_model = ActiveModel {
        email: Set(new_user.email),
        username: Set(new_user.username),
        phone: Set(new_user.phone),
        password_hash: Set(new_user.password_hash),
        enabled: Set(true),
        account_non_expired: Set(true),
        account_non_locked: Set(true),
        credentials_non_expired: Set(true),
        first_name: Set(new_user.first_name),
        last_name: Set(new_user.last_name),
        avatar_url: Set(None),
        role: Set(new_user.role.as_str().to_string()),
        skills: Set(new_user.skills),
        google_id: Set(None),
        facebook_id: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    let model = active_model.insert(db).await?;
    Ok(User::from(model))
}

async fn find_by_column<C: ConnectionTrait>(
    db: &C,
    column: user::Column,
    value: &str,
) -> AppResult<Option<User>> {
    let model = UserEntity::find().filter(column.eq(value)).one(db).await?;
    Ok(model.map(User::from))
}

#[async_trait]
impl UserRepository for UserStore {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<User>> {
        find_by_id(&self.db, id).await
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        find_by_column(&self.db, user::Column::Email, email).await
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        find_by_column(&self.db, user::Column::Username, username).await
    }

    async fn find_by_phone(&self, phone: &str) -> AppResult<Option<User>> {
        find_by_column(&self.db, user::Column::Phone, phone).await
    }

    async fn find_by_ids(&self, ids: Vec<i64>) -> AppResult<Vec<User>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let models = UserEntity::find()
            .filter(user::Column::Id.is_in(ids))
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(User::from).collect())
    }

    async fn exists_by_email(&self, email: &str) -> AppResult<bool> {
        let n = count(&self.db, UserEntity::find().filter(user::Column::Email.eq(email))).await?;
        Ok(n > 0)
    }

    async fn exists_by_username(&self, username: &str) -> AppResult<bool> {
        let n = count(
            &self.db,
            UserEntity::find().filter(user::Column::Username.eq(username)),
        )
        .await?;
        Ok(n > 0)
    }

    async fn exists_by_phone(&self, phone: &str) -> AppResult<bool> {
        let n = count(&self.db, UserEntity::find().filter(user::Column::Phone.eq(phone))).await?;
        Ok(n > 0)
    }

    async fn create(&self, new_user: NewUser) -> AppResult<User> {
        insert(&self.db, new_user).await
    }

    async fn find_workers(&self) -> AppResult<Vec<User>> {
        let models = UserEntity::find()
            .filter(user::Column::Role.eq(UserRole::Worker.as_str()))
            .order_by_asc(user::Column::Id)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(User::from).collect())
    }

    async fn list(&self, request: PageRequest) -> AppResult<Page<User>> {
        let column = sort_column(&request.sort_by)?;
        let select = UserEntity::find().order_by(column, sort_order(request.direction));
        Ok(fetch_page(&self.db, select, &request).await?.map(User::from))
    }

    async fn set_locked(&self, id: i64, locked: bool) -> AppResult<User> {
        let model = UserEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::not_found(format!("User not found with id: {}", id)))?;

        let mut active: ActiveModel = model.into();
        active.account_non_locked = Set(!locked);
        active.updated_at = Set(chrono::Utc::now());

        let model = active.update(&self.db).await?;
        Ok(User::from(model))
    }

    async fn count_by_role(&self, role: UserRole) -> AppResult<u64> {
        count(
            &self.db,
            UserEntity::find().filter(user::Column::Role.eq(role.as_str())),
        )
        .await
    }
}
