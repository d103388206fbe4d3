//! Per-user dashboard.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

use crate::config::DASHBOARD_RECENT_ORDERS;
use crate::domain::{
    OrderStatus, OrderSummaryDto, ProfileSummaryDto, RecentOrderDto, TasksDashboardDto,
};
use crate::errors::{AppResult, OptionExt};
use crate::infra::UnitOfWork;

#[async_trait]
pub trait TasksService: Send + Sync {
    async fn dashboard(&self, user_id: i64) -> AppResult<TasksDashboardDto>;
}

pub struct TaskBoard<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> TaskBoard<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    /// Profile fields, falling back to the account for anything unset
    async fn profile_summary(&self, user_id: i64) -> AppResult<ProfileSummaryDto> {
        let user_repo = self.uow.users();
        let profile_repo = self.uow.profiles();
        let (user, profile) = tokio::try_join!(
            user_repo.find_by_id(user_id),
            profile_repo.find_by_user(user_id),
        )?;
        let user = user.ok_or_not_found(format!("User not found with id: {}", user_id))?;
        let (first_name, last_name, avatar_url) = match profile {
            Some(p) => (
                p.first_name.or(user.first_name),
                p.last_name.or(user.last_name),
                p.avatar_url.or(user.avatar_url),
            ),
            None => (user.first_name, user.last_name, user.avatar_url),
        };
        Ok(ProfileSummaryDto {
            user_id,
            username: user.username,
            email: user.email,
            first_name,
            last_name,
            avatar_url,
        })
    }

    async fn order_summary(&self, user_id: i64) -> AppResult<OrderSummaryDto> {
        let orders = self.uow.orders();
        let (total, pending, completed, recent) = tokio::try_join!(
            orders.count_by_user(user_id, None),
            orders.count_by_user(user_id, Some(OrderStatus::Pending)),
            orders.count_by_user(user_id, Some(OrderStatus::Completed)),
            orders.recent_by_user(user_id, DASHBOARD_RECENT_ORDERS),
        )?;

        let mut service_ids: Vec<i64> = recent.iter().map(|o| o.service_id).collect();
        service_ids.sort_unstable();
        service_ids.dedup();
        let names: HashMap<i64, String> = self
            .uow
            .catalog()
            .find_by_ids(service_ids)
            .await?
            .into_iter()
            .map(|s| (s.id, s.name))
            .collect();

        let recent = recent
            .into_iter()
            .map(|order| RecentOrderDto {
                id: order.id,
                service_name: names.get(&order.service_id).cloned(),
                status: order.status,
                scheduled_at: order.scheduled_at,
                created_at: order.created_at,
            })
            .collect();

        Ok(OrderSummaryDto {
            total,
            pending,
            completed,
            recent,
        })
    }
}

#[async_trait]
impl<U: UnitOfWork> TasksService for TaskBoard<U> {
    async fn dashboard(&self, user_id: i64) -> AppResult<TasksDashboardDto> {
        let (profile, orders) =
            tokio::try_join!(self.profile_summary(user_id), self.order_summary(user_id))?;
        Ok(TasksDashboardDto {
            profile,
            orders,
            promotions: Vec::new(),
        })
    }
}
