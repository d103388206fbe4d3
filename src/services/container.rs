//! Service Container - Centralized service access.
//!
//! Every service is built over one shared Unit of Work and handed out as a
//! trait object, so handlers depend on traits rather than implementations.

use std::sync::Arc;

use sea_orm::DatabaseConnection;

use super::{
    AdminService, AuthService, Authenticator, BackOffice, Catalog, CatalogService, ContactInbox,
    ContactService, HomePage, HomeService, LoyaltyProgram, LoyaltyService, NewsDesk, NewsService,
    OrderDesk, OrderService, ProfileService, Profiles, TaskBoard, TasksService, WorkerDirectory,
    WorkerService,
};
use crate::config::Config;
use crate::infra::{Persistence, UnitOfWork};

/// Service container trait for dependency injection.
pub trait ServiceContainer: Send + Sync {
    fn auth(&self) -> Arc<dyn AuthService>;

    fn catalog(&self) -> Arc<dyn CatalogService>;

    fn orders(&self) -> Arc<dyn OrderService>;

    fn workers(&self) -> Arc<dyn WorkerService>;

    fn loyalty(&self) -> Arc<dyn LoyaltyService>;

    fn news(&self) -> Arc<dyn NewsService>;

    fn home(&self) -> Arc<dyn HomeService>;

    fn profiles(&self) -> Arc<dyn ProfileService>;

    fn contacts(&self) -> Arc<dyn ContactService>;

    fn tasks(&self) -> Arc<dyn TasksService>;

    fn admin(&self) -> Arc<dyn AdminService>;
}

/// Concrete implementation of ServiceContainer
#[derive(Clone)]
pub struct Services {
    auth: Arc<dyn AuthService>,
    catalog: Arc<dyn CatalogService>,
    orders: Arc<dyn OrderService>,
    workers: Arc<dyn WorkerService>,
    loyalty: Arc<dyn LoyaltyService>,
    news: Arc<dyn NewsService>,
    home: Arc<dyn HomeService>,
    profiles: Arc<dyn ProfileService>,
    contacts: Arc<dyn ContactService>,
    tasks: Arc<dyn TasksService>,
    admin: Arc<dyn AdminService>,
}

impl Services {
    /// Build every service over the given Unit of Work
    pub fn with_unit_of_work<U: UnitOfWork>(uow: Arc<U>, config: &Config) -> Self {
        let auth: Arc<dyn AuthService> = Arc::new(Authenticator::new(uow.clone(), config));
        Self {
            admin: Arc::new(BackOffice::new(uow.clone(), auth.clone())),
            auth,
            catalog: Arc::new(Catalog::new(uow.clone())),
            orders: Arc::new(OrderDesk::new(uow.clone())),
            workers: Arc::new(WorkerDirectory::new(uow.clone())),
            loyalty: Arc::new(LoyaltyProgram::new(uow.clone())),
            news: Arc::new(NewsDesk::new(uow.clone())),
            home: Arc::new(HomePage::new(uow.clone())),
            profiles: Arc::new(Profiles::new(uow.clone())),
            contacts: Arc::new(ContactInbox::new(uow.clone())),
            tasks: Arc::new(TaskBoard::new(uow)),
        }
    }

    /// Create service container from database connection and config
    pub fn from_connection(db: DatabaseConnection, config: &Config) -> Self {
        Self::with_unit_of_work(Arc::new(Persistence::new(db)), config)
    }
}

impl ServiceContainer for Services {
    fn auth(&self) -> Arc<dyn AuthService> {
        self.auth.clone()
    }

    fn catalog(&self) -> Arc<dyn CatalogService> {
        self.catalog.clone()
    }

    fn orders(&self) -> Arc<dyn OrderService> {
        self.orders.clone()
    }

    fn workers(&self) -> Arc<dyn WorkerService> {
        self.workers.clone()
    }

    fn loyalty(&self) -> Arc<dyn LoyaltyService> {
        self.loyalty.clone()
    }

    fn news(&self) -> Arc<dyn NewsService> {
        self.news.clone()
    }

    fn home(&self) -> Arc<dyn HomeService> {
        self.home.clone()
    }

    fn profiles(&self) -> Arc<dyn ProfileService> {
        self.profiles.clone()
    }

    fn contacts(&self) -> Arc<dyn ContactService> {
        self.contacts.clone()
    }

    fn tasks(&self) -> Arc<dyn TasksService> {
        self.tasks.clone()
    }

    fn admin(&self) -> Arc<dyn AdminService> {
        self.admin.clone()
    }
}
