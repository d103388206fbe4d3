//! Authentication service - Registration, sign-in and token rotation.
//!
//! Password hashing lives in the domain `Password` value object; token
//! signing in `TokenProvider`. Refresh tokens are persisted so they can be
//! revoked and rotated.

use async_trait::async_trait;
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

use super::token::{Claims, TokenKind, TokenProvider};
use crate::config::{Config, TOKEN_TYPE_BEARER};
use crate::domain::{LoginType, NewUser, Password, User, UserDto, UserRole};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;
use crate::with_transaction;

/// Account data submitted at sign-up
#[derive(Debug, Clone)]
pub struct Registration {
    pub email: String,
    pub username: String,
    pub password: String,
    pub confirm_password: String,
    pub phone: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// Token pair returned after successful authentication
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub access_token: String,
    pub refresh_token: String,
    /// Always "Bearer"
    #[schema(example = "Bearer")]
    pub token_type: String,
    /// Access token lifetime in seconds
    #[schema(example = 3600)]
    pub expires_in: i64,
    pub user: UserDto,
}

/// Authentication service trait for dependency injection.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Create a `USER` account and sign it in
    async fn register(&self, registration: Registration) -> AppResult<AuthResponse>;

    async fn login(
        &self,
        identifier: String,
        password: String,
        login_type: LoginType,
    ) -> AppResult<AuthResponse>;

    /// Exchange a refresh token for a new pair, revoking the old one
    async fn refresh(&self, refresh_token: String) -> AppResult<AuthResponse>;

    /// Revoke a refresh token; unknown tokens are ignored
    async fn logout(&self, refresh_token: String) -> AppResult<()>;

    /// Verify an access JWT and extract its claims
    fn verify_access_token(&self, token: &str) -> AppResult<Claims>;

    /// Account lookup for other modules; 404 when absent
    async fn get_user_by_id(&self, id: i64) -> AppResult<User>;

    async fn user_exists(&self, id: i64) -> AppResult<bool>;

    /// Delete stored refresh tokens past their expiry, returning how many
    async fn purge_expired_tokens(&self) -> AppResult<u64>;

    /// Access token lifetime, used for cookie max-age
    fn access_ttl_seconds(&self) -> i64;

    /// Refresh token lifetime, used for cookie max-age
    fn refresh_ttl_seconds(&self) -> i64;
}

/// Concrete implementation of AuthService using Unit of Work.
pub struct Authenticator<U: UnitOfWork> {
    uow: Arc<U>,
    tokens: TokenProvider,
}

impl<U: UnitOfWork> Authenticator<U> {
    pub fn new(uow: Arc<U>, config: &Config) -> Self {
        Self {
            uow,
            tokens: TokenProvider::new(config),
        }
    }

    /// Sign a new pair for `user` and store the refresh half
    async fn issue_pair(&self, user: User) -> AppResult<AuthResponse> {
        let access = self.tokens.issue(&user, TokenKind::Access)?;
        let refresh = self.tokens.issue(&user, TokenKind::Refresh)?;
        self.uow
            .refresh_tokens()
            .create(user.id, refresh.token.clone(), refresh.expires_at)
            .await?;
        Ok(self.response(user, access.token, refresh.token))
    }

    fn response(&self, user: User, access_token: String, refresh_token: String) -> AuthResponse {
        AuthResponse {
            access_token,
            refresh_token,
            token_type: TOKEN_TYPE_BEARER.to_string(),
            expires_in: self.tokens.access_ttl_seconds(),
            user: UserDto::from(user),
        }
    }

    async fn find_by_identifier(
        &self,
        identifier: &str,
        login_type: LoginType,
    ) -> AppResult<Option<User>> {
        let users = self.uow.users();
        match login_type {
            LoginType::Email => users.find_by_email(identifier).await,
            LoginType::Username => users.find_by_username(identifier).await,
            LoginType::Phone => users.find_by_phone(identifier).await,
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[async_trait]
impl<U: UnitOfWork> AuthService for Authenticator<U> {
    async fn register(&self, registration: Registration) -> AppResult<AuthResponse> {
        if registration.password != registration.confirm_password {
            return Err(AppError::bad_request("Passwords do not match"));
        }

        let users = self.uow.users();
        if users.exists_by_email(&registration.email).await? {
            return Err(AppError::bad_request("Email already exists"));
        }
        if users.exists_by_username(&registration.username).await? {
            return Err(AppError::bad_request("Username already exists"));
        }
        let phone = non_blank(registration.phone);
        if let Some(phone) = phone.as_deref() {
            if users.exists_by_phone(phone).await? {
                return Err(AppError::bad_request("Phone number already exists"));
            }
        }

        let password_hash = Password::new(&registration.password)?.into_string();
        let new_user = NewUser {
            email: registration.email,
            username: registration.username,
            phone,
            password_hash,
            first_name: non_blank(registration.first_name),
            last_name: non_blank(registration.last_name),
            role: UserRole::User,
            skills: None,
        };

        // Account and first refresh token commit together.
        let tokens = self.tokens.clone();
        let (user, access, refresh) = with_transaction!(self.uow, |ctx| {
            let user = ctx.users().create(new_user).await?;
            let access = tokens.issue(&user, TokenKind::Access)?;
            let refresh = tokens.issue(&user, TokenKind::Refresh)?;
            ctx.refresh_tokens()
                .create(user.id, refresh.token.clone(), refresh.expires_at)
                .await?;
            Ok((user, access, refresh))
        })?;

        tracing::info!(user_id = user.id, "User registered");
        Ok(self.response(user, access.token, refresh.token))
    }

    async fn login(
        &self,
        identifier: String,
        password: String,
        login_type: LoginType,
    ) -> AppResult<AuthResponse> {
        let user = self.find_by_identifier(identifier.trim(), login_type).await?;

        // Verification runs for unknown identifiers too, so response timing
        // does not reveal which accounts exist.
        let stored_hash = user.as_ref().map(|u| u.password_hash.as_str());
        if !Password::verify_stored(stored_hash, &password) {
            return Err(AppError::unauthorized("Invalid credentials"));
        }
        let user = user.ok_or_else(|| AppError::unauthorized("Invalid credentials"))?;

        if let Some(reason) = user.sign_in_block() {
            return Err(AppError::unauthorized(reason));
        }

        self.issue_pair(user).await
    }

    async fn refresh(&self, refresh_token: String) -> AppResult<AuthResponse> {
        let claims = self
            .tokens
            .verify(&refresh_token, TokenKind::Refresh)
            .map_err(|_| AppError::unauthorized("Invalid refresh token"))?;

        let stored = self
            .uow
            .refresh_tokens()
            .find_by_token(&refresh_token)
            .await?
            .ok_or_else(|| AppError::unauthorized("Refresh token not found"))?;

        if stored.is_expired(Utc::now()) {
            self.uow.refresh_tokens().delete_by_token(&refresh_token).await?;
            return Err(AppError::unauthorized("Refresh token expired"));
        }

        let user = self
            .uow
            .users()
            .find_by_id(claims.sub)
            .await?
            .filter(|user| user.id == stored.user_id)
            .ok_or_else(|| AppError::unauthorized("User not found"))?;
        if let Some(reason) = user.sign_in_block() {
            return Err(AppError::unauthorized(reason));
        }

        let access = self.tokens.issue(&user, TokenKind::Access)?;
        let next = self.tokens.issue(&user, TokenKind::Refresh)?;

        let user_id = user.id;
        let new_token = next.token.clone();
        let expires_at = next.expires_at;
        with_transaction!(self.uow, |ctx| {
            // A concurrent rotation may already have consumed the old token.
            if !ctx.refresh_tokens().delete_by_token(&refresh_token).await? {
                return Err(AppError::unauthorized("Refresh token not found"));
            }
            ctx.refresh_tokens()
                .create(user_id, new_token, expires_at)
                .await?;
            Ok(())
        })?;

        tracing::debug!(user_id, "Refresh token rotated");
        Ok(self.response(user, access.token, next.token))
    }

    async fn logout(&self, refresh_token: String) -> AppResult<()> {
        if !refresh_token.is_empty() {
            self.uow.refresh_tokens().delete_by_token(&refresh_token).await?;
        }
        Ok(())
    }

    fn verify_access_token(&self, token: &str) -> AppResult<Claims> {
        self.tokens.verify(token, TokenKind::Access)
    }

    async fn get_user_by_id(&self, id: i64) -> AppResult<User> {
        self.uow
            .users()
            .find_by_id(id)
            .await?
            .ok_or_not_found(format!("User not found with id: {}", id))
    }

    async fn user_exists(&self, id: i64) -> AppResult<bool> {
        Ok(self.uow.users().find_by_id(id).await?.is_some())
    }

    async fn purge_expired_tokens(&self) -> AppResult<u64> {
        self.uow.refresh_tokens().delete_expired(Utc::now()).await
    }

    fn access_ttl_seconds(&self) -> i64 {
        self.tokens.access_ttl_seconds()
    }

    fn refresh_ttl_seconds(&self) -> i64 {
        self.tokens.refresh_ttl_seconds()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user::sample_user;
    use crate::infra::repositories::{MockRefreshTokenRepository, MockUserRepository};
    use crate::infra::testing::TestUnitOfWork;
    use crate::infra::{MockTxRefreshTokenRepository, MockTxUserRepository, RefreshToken};
    use chrono::Duration;
    use mockall::predicate::*;

    fn config() -> Config {
        Config::with_secret("test-secret-key-for-testing-only-32chars").unwrap()
    }

    fn registration() -> Registration {
        Registration {
            email: "new@example.com".into(),
            username: "newbie".into(),
            password: "Secret123".into(),
            confirm_password: "Secret123".into(),
            phone: Some("  ".into()),
            first_name: Some("New".into()),
            last_name: None,
        }
    }

    fn user_with_password(id: i64, password: &str) -> User {
        let mut user = sample_user(id, UserRole::User);
        user.password_hash = Password::new(password).unwrap().into_string();
        user
    }

    fn storing_tokens() -> MockRefreshTokenRepository {
        let mut tokens = MockRefreshTokenRepository::new();
        tokens
            .expect_create()
            .times(1)
            .returning(|user_id, token, expires_at| {
                Ok(RefreshToken {
                    id: 1,
                    user_id,
                    token,
                    expires_at,
                })
            });
        tokens
    }

    fn storing_tx_tokens() -> MockTxRefreshTokenRepository {
        let mut tokens = MockTxRefreshTokenRepository::new();
        tokens
            .expect_create()
            .times(1)
            .returning(|user_id, token, expires_at| {
                Ok(RefreshToken {
                    id: 2,
                    user_id,
                    token,
                    expires_at,
                })
            });
        tokens
    }

    fn valid_row(user_id: i64) -> impl Fn(&str) -> AppResult<Option<RefreshToken>> {
        move |token| {
            Ok(Some(RefreshToken {
                id: 3,
                user_id,
                token: token.to_string(),
                expires_at: Utc::now() + Duration::hours(1),
            }))
        }
    }

    #[tokio::test]
    async fn test_register_success() {
        let mut users = MockUserRepository::new();
        users.expect_exists_by_email().returning(|_| Ok(false));
        users.expect_exists_by_username().returning(|_| Ok(false));
        users.expect_exists_by_phone().never();
        users.expect_create().never();

        let mut tx_users = MockTxUserRepository::new();
        tx_users
            .expect_create()
            .withf(|u| u.phone.is_none() && u.role == UserRole::User && u.password_hash != "Secret123")
            .times(1)
            .returning(|u| {
                let mut user = sample_user(10, u.role);
                user.email = u.email;
                user.username = u.username;
                Ok(user)
            });

        let uow = TestUnitOfWork::default()
            .with_users(users)
            .with_tx_users(tx_users)
            .with_tx_refresh_tokens(storing_tx_tokens())
            .into_arc();
        let service = Authenticator::new(uow, &config());

        let response = service.register(registration()).await.unwrap();
        assert_eq!(response.token_type, "Bearer");
        assert_eq!(response.expires_in, 3600);
        assert_eq!(response.user.email, "new@example.com");
        assert_ne!(response.access_token, response.refresh_token);
    }

    #[tokio::test]
    async fn test_register_fails_when_token_cannot_be_stored() {
        let mut users = MockUserRepository::new();
        users.expect_exists_by_email().returning(|_| Ok(false));
        users.expect_exists_by_username().returning(|_| Ok(false));

        let mut tx_users = MockTxUserRepository::new();
        tx_users
            .expect_create()
            .returning(|u| Ok(sample_user(10, u.role)));
        let mut tx_tokens = MockTxRefreshTokenRepository::new();
        tx_tokens
            .expect_create()
            .returning(|_, _, _| Err(AppError::internal("insert failed")));

        let uow = TestUnitOfWork::default()
            .with_users(users)
            .with_tx_users(tx_users)
            .with_tx_refresh_tokens(tx_tokens)
            .into_arc();
        let service = Authenticator::new(uow, &config());

        assert!(matches!(
            service.register(registration()).await,
            Err(AppError::Internal(_))
        ));
    }

    #[tokio::test]
    async fn test_refresh_rotates_token() {
        let config = config();
        let old = TokenProvider::new(&config)
            .issue(&sample_user(1, UserRole::User), TokenKind::Refresh)
            .unwrap();

        let mut tokens = MockRefreshTokenRepository::new();
        tokens.expect_find_by_token().returning(valid_row(1));
        tokens.expect_delete_by_token().never();

        let mut users = MockUserRepository::new();
        users
            .expect_find_by_id()
            .with(eq(1))
            .returning(|id| Ok(Some(sample_user(id, UserRole::User))));

        let old_token = old.token.clone();
        let mut tx_tokens = MockTxRefreshTokenRepository::new();
        tx_tokens
            .expect_delete_by_token()
            .withf(move |token| token == old_token)
            .times(1)
            .returning(|_| Ok(true));
        let old_token = old.token.clone();
        tx_tokens
            .expect_create()
            .withf(move |user_id, token, _| *user_id == 1 && *token != old_token)
            .times(1)
            .returning(|user_id, token, expires_at| {
                Ok(RefreshToken {
                    id: 4,
                    user_id,
                    token,
                    expires_at,
                })
            });

        let uow = TestUnitOfWork::default()
            .with_refresh_tokens(tokens)
            .with_users(users)
            .with_tx_refresh_tokens(tx_tokens)
            .into_arc();
        let service = Authenticator::new(uow, &config);

        let response = service.refresh(old.token.clone()).await.unwrap();
        assert_ne!(response.refresh_token, old.token);
        assert_eq!(response.user.id, 1);
    }

    #[tokio::test]
    async fn test_refresh_already_rotated_token_is_rejected() {
        let config = config();
        let old = TokenProvider::new(&config)
            .issue(&sample_user(1, UserRole::User), TokenKind::Refresh)
            .unwrap();

        let mut tokens = MockRefreshTokenRepository::new();
        tokens.expect_find_by_token().returning(valid_row(1));
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_id()
            .returning(|id| Ok(Some(sample_user(id, UserRole::User))));
        let mut tx_tokens = MockTxRefreshTokenRepository::new();
        tx_tokens.expect_delete_by_token().returning(|_| Ok(false));
        tx_tokens.expect_create().never();

        let uow = TestUnitOfWork::default()
            .with_refresh_tokens(tokens)
            .with_users(users)
            .with_tx_refresh_tokens(tx_tokens)
            .into_arc();
        let service = Authenticator::new(uow, &config);

        let err = service.refresh(old.token).await.unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(msg) if msg == "Refresh token not found"));
    }

    #[tokio::test]
    async fn test_register_password_mismatch() {
        let service = Authenticator::new(TestUnitOfWork::default().into_arc(), &config());
        let mut reg = registration();
        reg.confirm_password = "Different1".into();

        let err = service.register(reg).await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(msg) if msg == "Passwords do not match"));
    }

    #[tokio::test]
    async fn test_register_duplicate_username() {
        let mut users = MockUserRepository::new();
        users.expect_exists_by_email().returning(|_| Ok(false));
        users
            .expect_exists_by_username()
            .with(eq("newbie"))
            .returning(|_| Ok(true));
        users.expect_create().never();

        let uow = TestUnitOfWork::default().with_users(users).into_arc();
        let service = Authenticator::new(uow, &config());

        let err = service.register(registration()).await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(msg) if msg == "Username already exists"));
    }

    #[tokio::test]
    async fn test_register_duplicate_phone() {
        let mut users = MockUserRepository::new();
        users.expect_exists_by_email().returning(|_| Ok(false));
        users.expect_exists_by_username().returning(|_| Ok(false));
        users
            .expect_exists_by_phone()
            .with(eq("0901234567"))
            .returning(|_| Ok(true));

        let uow = TestUnitOfWork::default().with_users(users).into_arc();
        let service = Authenticator::new(uow, &config());

        let mut reg = registration();
        reg.phone = Some("0901234567".into());
        let err = service.register(reg).await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(msg) if msg == "Phone number already exists"));
    }

    #[tokio::test]
    async fn test_login_by_username() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_username()
            .with(eq("user5"))
            .returning(|_| Ok(Some(user_with_password(5, "Secret123"))));

        let uow = TestUnitOfWork::default()
            .with_users(users)
            .with_refresh_tokens(storing_tokens())
            .into_arc();
        let service = Authenticator::new(uow, &config());

        let response = service
            .login("user5".into(), "Secret123".into(), LoginType::Username)
            .await
            .unwrap();
        assert_eq!(response.user.id, 5);

        let claims = service.verify_access_token(&response.access_token).unwrap();
        assert_eq!(claims.sub, 5);
    }

    #[tokio::test]
    async fn test_login_unknown_user() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_email().returning(|_| Ok(None));

        let uow = TestUnitOfWork::default().with_users(users).into_arc();
        let service = Authenticator::new(uow, &config());

        let err = service
            .login("ghost@example.com".into(), "Secret123".into(), LoginType::Email)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(msg) if msg == "Invalid credentials"));
    }

    #[tokio::test]
    async fn test_login_wrong_password() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_email()
            .returning(|_| Ok(Some(user_with_password(1, "Secret123"))));

        let uow = TestUnitOfWork::default().with_users(users).into_arc();
        let service = Authenticator::new(uow, &config());

        let err = service
            .login("user1@example.com".into(), "Wrong1234".into(), LoginType::Email)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(msg) if msg == "Invalid credentials"));
    }

    #[tokio::test]
    async fn test_login_locked_account() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_phone().returning(|_| {
            let mut user = user_with_password(2, "Secret123");
            user.account_non_locked = false;
            Ok(Some(user))
        });

        let uow = TestUnitOfWork::default().with_users(users).into_arc();
        let service = Authenticator::new(uow, &config());

        let err = service
            .login("0900000000".into(), "Secret123".into(), LoginType::Phone)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(msg) if msg == "Account is locked"));
    }

    #[tokio::test]
    async fn test_refresh_rejects_access_token() {
        let config = config();
        let access = TokenProvider::new(&config)
            .issue(&sample_user(1, UserRole::User), TokenKind::Access)
            .unwrap();
        let service = Authenticator::new(TestUnitOfWork::default().into_arc(), &config);

        let err = service.refresh(access.token).await.unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(msg) if msg == "Invalid refresh token"));
    }

    #[tokio::test]
    async fn test_refresh_unknown_token() {
        let config = config();
        let refresh = TokenProvider::new(&config)
            .issue(&sample_user(1, UserRole::User), TokenKind::Refresh)
            .unwrap();

        let mut tokens = MockRefreshTokenRepository::new();
        tokens.expect_find_by_token().returning(|_| Ok(None));
        let uow = TestUnitOfWork::default().with_refresh_tokens(tokens).into_arc();
        let service = Authenticator::new(uow, &config);

        let err = service.refresh(refresh.token).await.unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(msg) if msg == "Refresh token not found"));
    }

    #[tokio::test]
    async fn test_refresh_expired_row_is_deleted() {
        let config = config();
        let refresh = TokenProvider::new(&config)
            .issue(&sample_user(1, UserRole::User), TokenKind::Refresh)
            .unwrap();

        let mut tokens = MockRefreshTokenRepository::new();
        tokens.expect_find_by_token().returning(|token| {
            Ok(Some(RefreshToken {
                id: 3,
                user_id: 1,
                token: token.to_string(),
                expires_at: Utc::now() - Duration::minutes(1),
            }))
        });
        tokens
            .expect_delete_by_token()
            .times(1)
            .returning(|_| Ok(true));

        let uow = TestUnitOfWork::default().with_refresh_tokens(tokens).into_arc();
        let service = Authenticator::new(uow, &config);

        let err = service.refresh(refresh.token).await.unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(msg) if msg == "Refresh token expired"));
    }

    #[tokio::test]
    async fn test_logout_deletes_token() {
        let mut tokens = MockRefreshTokenRepository::new();
        tokens
            .expect_delete_by_token()
            .with(eq("some-token"))
            .times(1)
            .returning(|_| Ok(false));

        let uow = TestUnitOfWork::default().with_refresh_tokens(tokens).into_arc();
        let service = Authenticator::new(uow, &config());

        assert!(service.logout("some-token".into()).await.is_ok());
    }

    #[tokio::test]
    async fn test_get_user_by_id_not_found() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_id().returning(|_| Ok(None));

        let uow = TestUnitOfWork::default().with_users(users).into_arc();
        let service = Authenticator::new(uow, &config());

        assert!(matches!(
            service.get_user_by_id(9).await,
            Err(AppError::NotFound(_))
        ));
        assert!(!service.user_exists(9).await.unwrap());
    }

    #[tokio::test]
    async fn test_purge_expired_tokens() {
        let mut tokens = MockRefreshTokenRepository::new();
        tokens.expect_delete_expired().returning(|_| Ok(4));

        let uow = TestUnitOfWork::default().with_refresh_tokens(tokens).into_arc();
        let service = Authenticator::new(uow, &config());

        assert_eq!(service.purge_expired_tokens().await.unwrap(), 4);
    }
}
