//! Seed command - Demo workers and the configured admin account.

use crate::config::{Config, DEMO_WORKER_PASSWORD};
use crate::domain::{NewUser, Password, UserRole};
use crate::errors::{AppError, AppResult};
use crate::infra::{Database, Persistence, UnitOfWork};

/// Username whose presence means the demo workers were already created
const DEMO_MARKER_USERNAME: &str = "worker.electric";

struct DemoWorker {
    email: &'static str,
    username: &'static str,
    first_name: &'static str,
    last_name: &'static str,
    phone: &'static str,
    skills: &'static str,
}

const DEMO_WORKERS: [DemoWorker; 3] = [
    DemoWorker {
        email: "electro@example.com",
        username: DEMO_MARKER_USERNAME,
        first_name: "Anh",
        last_name: "Thợ Điện",
        phone: "0900000001",
        skills: r#"["Sửa điện tại nhà","SỬA CHỮA ĐIỆN"]"#,
    },
    DemoWorker {
        email: "plumber@example.com",
        username: "worker.plumber",
        first_name: "Bình",
        last_name: "Thợ Nước",
        phone: "0900000002",
        skills: r#"["Sửa nước tại nhà","SỬA CHỮA NƯỚC"]"#,
    },
    DemoWorker {
        email: "carpenter@example.com",
        username: "worker.carpenter",
        first_name: "Cường",
        last_name: "Thợ Mộc",
        phone: "0900000003",
        skills: r#"["Sửa chữa đồ mộc","SỬA CHỮA ĐỒ MỘC"]"#,
    },
];

/// What a seeding run created
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub workers_created: usize,
    pub admin_created: bool,
}

/// Execute the seed command
pub async fn execute(config: Config) -> AppResult<()> {
    let db = Database::connect(&config)
        .await
        .map_err(|e| AppError::internal(format!("Database connection failed: {}", e)))?;
    let uow = Persistence::new(db.get_connection());

    let report = run(&uow, &config).await?;
    tracing::info!(
        workers_created = report.workers_created,
        admin_created = report.admin_created,
        "Seeding finished"
    );
    Ok(())
}

/// Create the demo workers and the admin account when they are missing.
pub async fn run<U: UnitOfWork>(uow: &U, config: &Config) -> AppResult<SeedReport> {
    let users = uow.users();
    let mut report = SeedReport::default();

    if users.exists_by_username(DEMO_MARKER_USERNAME).await? {
        tracing::debug!("Demo workers already present");
    } else {
        let password_hash = Password::new(DEMO_WORKER_PASSWORD)?.into_string();
        for worker in &DEMO_WORKERS {
            users
                .create(NewUser {
                    email: worker.email.to_string(),
                    username: worker.username.to_string(),
                    phone: Some(worker.phone.to_string()),
                    password_hash: password_hash.clone(),
                    first_name: Some(worker.first_name.to_string()),
                    last_name: Some(worker.last_name.to_string()),
                    role: UserRole::Worker,
                    skills: Some(worker.skills.to_string()),
                })
                .await?;
            report.workers_created += 1;
        }
        tracing::info!(count = report.workers_created, "Demo workers created");
    }

    if let Some((email, password)) = config.seed_admin() {
        if !users.exists_by_email(email).await? {
            let username = email.split('@').next().unwrap_or(email).to_string();
            users
                .create(NewUser {
                    email: email.to_string(),
                    username,
                    phone: None,
                    password_hash: Password::new(password)?.into_string(),
                    first_name: None,
                    last_name: None,
                    role: UserRole::Admin,
                    skills: None,
                })
                .await?;
            report.admin_created = true;
            tracing::info!(email = %email, "Admin account created");
        }
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user::sample_user;
    use crate::infra::repositories::MockUserRepository;
    use crate::infra::testing::TestUnitOfWork;
    use mockall::predicate::*;

    fn config() -> Config {
        Config::with_secret("seed-test-secret-at-least-32-chars!!").unwrap()
    }

    #[tokio::test]
    async fn test_creates_demo_workers_once() {
        let mut users = MockUserRepository::new();
        users
            .expect_exists_by_username()
            .with(eq(DEMO_MARKER_USERNAME))
            .returning(|_| Ok(false));
        users
            .expect_create()
            .times(3)
            .withf(|user| user.role == UserRole::Worker && user.skills.is_some())
            .returning(|user| {
                let mut created = sample_user(1, UserRole::Worker);
                created.username = user.username;
                Ok(created)
            });

        let uow = TestUnitOfWork::default().with_users(users);
        let report = run(&uow, &config()).await.unwrap();

        assert_eq!(report.workers_created, 3);
        assert!(!report.admin_created);
    }

    #[tokio::test]
    async fn test_skips_existing_workers_and_creates_admin() {
        let mut users = MockUserRepository::new();
        users.expect_exists_by_username().returning(|_| Ok(true));
        users
            .expect_exists_by_email()
            .with(eq("admin@example.com"))
            .returning(|_| Ok(false));
        users
            .expect_create()
            .times(1)
            .withf(|user| user.role == UserRole::Admin && user.username == "admin")
            .returning(|_| Ok(sample_user(9, UserRole::Admin)));

        let mut config = config();
        config.seed_admin_email = Some("admin@example.com".into());
        config.seed_admin_password = Some("AdminPass123".into());

        let uow = TestUnitOfWork::default().with_users(users);
        let report = run(&uow, &config).await.unwrap();

        assert_eq!(
            report,
            SeedReport {
                workers_created: 0,
                admin_created: true,
            }
        );
    }
}
