//! Worker listing and availability.
//!
//! A worker is free for a slot when none of their active, timed orders
//! overlaps it. Orders without a scheduled time or duration never block.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::future::try_join_all;
use std::sync::Arc;

use crate::domain::{Order, TimeSlot, User, WorkerDto};
use crate::errors::{AppResult, OptionExt};
use crate::infra::UnitOfWork;

/// Whether `worker` can take a booking for `slot`, given their orders
/// starting before the slot ends.
pub(crate) fn is_free(worker: Option<&User>, slot: Option<TimeSlot>, bookings: &[Order]) -> bool {
    match (worker, slot) {
        (Some(worker), _) if !worker.is_worker() => false,
        (None, _) => false,
        (Some(_), None) => true,
        (Some(_), Some(slot)) => !bookings.iter().any(|order| order.blocks(&slot)),
    }
}

#[async_trait]
pub trait WorkerService: Send + Sync {
    /// Workers whose skills match `service`, with availability for the
    /// slot when `scheduled_at` is given (everyone is available otherwise).
    async fn list_workers(
        &self,
        service: Option<String>,
        scheduled_at: Option<DateTime<Utc>>,
        duration_minutes: Option<i32>,
    ) -> AppResult<Vec<WorkerDto>>;

    /// Legacy listing: matching workers, no availability
    async fn list_by_skill(&self, service: Option<String>) -> AppResult<Vec<WorkerDto>>;

    async fn get_worker(&self, id: i64) -> AppResult<WorkerDto>;
}

pub struct WorkerDirectory<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> WorkerDirectory<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    async fn matching_workers(&self, service: Option<&str>) -> AppResult<Vec<User>> {
        let workers = self.uow.users().find_workers().await?;
        Ok(workers
            .into_iter()
            .filter(|worker| worker.has_skill(service.unwrap_or_default()))
            .collect())
    }

    async fn free_for(&self, worker: &User, slot: Option<TimeSlot>) -> AppResult<bool> {
        let bookings = match slot {
            Some(slot) => {
                self.uow
                    .orders()
                    .list_active_for_worker(worker.id, slot.end)
                    .await?
            }
            None => Vec::new(),
        };
        Ok(is_free(Some(worker), slot, &bookings))
    }
}

#[async_trait]
impl<U: UnitOfWork> WorkerService for WorkerDirectory<U> {
    async fn list_workers(
        &self,
        service: Option<String>,
        scheduled_at: Option<DateTime<Utc>>,
        duration_minutes: Option<i32>,
    ) -> AppResult<Vec<WorkerDto>> {
        let workers = self.matching_workers(service.as_deref()).await?;

        let Some(start) = scheduled_at else {
            return Ok(workers
                .into_iter()
                .map(|worker| WorkerDto::from_user(worker, Some(true)))
                .collect());
        };

        let slot = TimeSlot::starting_at(start, duration_minutes);
        let availability =
            try_join_all(workers.iter().map(|worker| self.free_for(worker, Some(slot)))).await?;

        Ok(workers
            .into_iter()
            .zip(availability)
            .map(|(worker, available)| WorkerDto::from_user(worker, Some(available)))
            .collect())
    }

    async fn list_by_skill(&self, service: Option<String>) -> AppResult<Vec<WorkerDto>> {
        let workers = self.matching_workers(service.as_deref()).await?;
        Ok(workers
            .into_iter()
            .map(|worker| WorkerDto::from_user(worker, None))
            .collect())
    }

    async fn get_worker(&self, id: i64) -> AppResult<WorkerDto> {
        self.uow
            .users()
            .find_by_id(id)
            .await?
            .filter(User::is_worker)
            .map(|worker| WorkerDto::from_user(worker, None))
            .ok_or_not_found(format!("Worker not found with id: {}", id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::order::sample_order;
    use crate::domain::user::sample_user;
    use crate::domain::{OrderStatus, UserRole};
    use crate::errors::AppError;
    use crate::infra::repositories::{MockOrderRepository, MockUserRepository};
    use crate::infra::testing::TestUnitOfWork;
    use chrono::TimeZone;
    use mockall::predicate::*;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, hour, 0, 0).unwrap()
    }

    fn booking(worker_id: i64, start: u32, minutes: i32, status: OrderStatus) -> Order {
        let mut order = sample_order(100 + i64::from(start), 1, status);
        order.worker_id = Some(worker_id);
        order.scheduled_at = Some(at(start));
        order.duration_minutes = Some(minutes);
        order
    }

    fn worker(id: i64, skills: &str) -> User {
        let mut user = sample_user(id, UserRole::Worker);
        user.skills = Some(skills.to_string());
        user
    }

    #[test]
    fn test_is_free_rules() {
        let w = worker(1, "[]");
        let slot = Some(TimeSlot::starting_at(at(10), Some(60)));

        assert!(!is_free(None, slot, &[]));
        assert!(!is_free(Some(&sample_user(2, UserRole::User)), None, &[]));
        assert!(is_free(Some(&w), None, &[booking(1, 10, 60, OrderStatus::Pending)]));
        assert!(!is_free(Some(&w), slot, &[booking(1, 9, 90, OrderStatus::Confirmed)]));
        assert!(is_free(Some(&w), slot, &[booking(1, 9, 60, OrderStatus::Confirmed)]));
        assert!(is_free(Some(&w), slot, &[booking(1, 10, 60, OrderStatus::Completed)]));
    }

    #[tokio::test]
    async fn test_list_without_time_marks_everyone_available() {
        let mut users = MockUserRepository::new();
        users.expect_find_workers().returning(|| {
            Ok(vec![
                worker(1, r#"["Electrical repair"]"#),
                worker(2, r#"["Plumbing"]"#),
            ])
        });

        let service = WorkerDirectory::new(TestUnitOfWork::default().with_users(users).into_arc());
        let workers = service
            .list_workers(Some("electrical".into()), None, None)
            .await
            .unwrap();

        assert_eq!(workers.len(), 1);
        assert_eq!(workers[0].id, 1);
        assert_eq!(workers[0].available, Some(true));
    }

    #[tokio::test]
    async fn test_list_with_slot_computes_availability() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_workers()
            .returning(|| Ok(vec![worker(1, "[]"), worker(2, "[]")]));

        let mut orders = MockOrderRepository::new();
        orders
            .expect_list_active_for_worker()
            .with(eq(1), eq(at(12)))
            .returning(|id, _| Ok(vec![booking(id, 11, 120, OrderStatus::InProgress)]));
        orders
            .expect_list_active_for_worker()
            .with(eq(2), eq(at(12)))
            .returning(|_, _| Ok(vec![]));

        let uow = TestUnitOfWork::default()
            .with_users(users)
            .with_orders(orders)
            .into_arc();
        let service = WorkerDirectory::new(uow);

        let workers = service.list_workers(None, Some(at(10)), None).await.unwrap();
        assert_eq!(workers[0].available, Some(false));
        assert_eq!(workers[1].available, Some(true));
    }

    #[tokio::test]
    async fn test_legacy_listing_has_no_availability() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_workers()
            .returning(|| Ok(vec![worker(1, "[]")]));

        let service = WorkerDirectory::new(TestUnitOfWork::default().with_users(users).into_arc());
        let workers = service.list_by_skill(None).await.unwrap();
        assert_eq!(workers[0].available, None);
    }

    #[tokio::test]
    async fn test_get_worker_rejects_customers() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_id()
            .returning(|id| Ok(Some(sample_user(id, UserRole::User))));

        let service = WorkerDirectory::new(TestUnitOfWork::default().with_users(users).into_arc());
        assert!(matches!(
            service.get_worker(5).await,
            Err(AppError::NotFound(_))
        ));
    }
}
