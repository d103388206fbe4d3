//! Service catalog queries.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::ServiceDto;
use crate::errors::{AppResult, OptionExt};
use crate::infra::UnitOfWork;
use crate::types::{Page, PageRequest};

#[async_trait]
pub trait CatalogService: Send + Sync {
    /// Active services, one page at a time
    async fn list_services(&self, request: PageRequest) -> AppResult<Page<ServiceDto>>;

    /// An active service; inactive ones read as missing
    async fn get_service(&self, id: i64) -> AppResult<ServiceDto>;

    async fn services_by_category(&self, category: String) -> AppResult<Vec<ServiceDto>>;
}

pub struct Catalog<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> Catalog<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> CatalogService for Catalog<U> {
    async fn list_services(&self, request: PageRequest) -> AppResult<Page<ServiceDto>> {
        let page = self.uow.catalog().list_active(request).await?;
        Ok(page.map(ServiceDto::from))
    }

    async fn get_service(&self, id: i64) -> AppResult<ServiceDto> {
        self.uow
            .catalog()
            .find_by_id(id)
            .await?
            .filter(|service| service.active)
            .map(ServiceDto::from)
            .ok_or_not_found(format!("Service not found with id: {}", id))
    }

    async fn services_by_category(&self, category: String) -> AppResult<Vec<ServiceDto>> {
        let services = self.uow.catalog().list_active_by_category(&category).await?;
        Ok(services.into_iter().map(ServiceDto::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::sample_service;
    use crate::errors::AppError;
    use crate::infra::repositories::MockServiceRepository;
    use crate::infra::testing::TestUnitOfWork;
    use mockall::predicate::*;

    #[tokio::test]
    async fn test_get_active_service() {
        let mut catalog = MockServiceRepository::new();
        catalog
            .expect_find_by_id()
            .with(eq(3))
            .returning(|id| Ok(Some(sample_service(id, true))));

        let service = Catalog::new(TestUnitOfWork::default().with_catalog(catalog).into_arc());
        let dto = service.get_service(3).await.unwrap();
        assert_eq!(dto.id, 3);
        assert!(dto.active);
    }

    #[tokio::test]
    async fn test_inactive_service_is_not_found() {
        let mut catalog = MockServiceRepository::new();
        catalog
            .expect_find_by_id()
            .returning(|id| Ok(Some(sample_service(id, false))));

        let service = Catalog::new(TestUnitOfWork::default().with_catalog(catalog).into_arc());
        let err = service.get_service(4).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(msg) if msg == "Service not found with id: 4"));
    }

    #[tokio::test]
    async fn test_services_by_category() {
        let mut catalog = MockServiceRepository::new();
        catalog
            .expect_list_active_by_category()
            .with(eq("ELECTRIC"))
            .returning(|_| Ok(vec![sample_service(1, true), sample_service(2, true)]));

        let service = Catalog::new(TestUnitOfWork::default().with_catalog(catalog).into_arc());
        let services = service.services_by_category("ELECTRIC".into()).await.unwrap();
        assert_eq!(services.len(), 2);
    }
}
