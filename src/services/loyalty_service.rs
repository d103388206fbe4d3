//! Loyalty points.

use async_trait::async_trait;
use std::sync::Arc;

use crate::config::POINTS_PER_COMPLETED_ORDER;
use crate::domain::{
    LoyaltyAccount, LoyaltyPointsDto, NewPointsTransaction, Order, PointsTransactionDto,
    TransactionType,
};
use crate::errors::{AppError, AppResult};
use crate::infra::{TransactionContext, UnitOfWork};
use crate::types::{Page, PageRequest};
use crate::with_transaction;

/// Validate and apply a credit inside an open transaction
pub(crate) async fn credit(
    ctx: &TransactionContext<'_>,
    entry: NewPointsTransaction,
) -> AppResult<LoyaltyAccount> {
    if entry.points <= 0 {
        return Err(AppError::validation("points", "Points must be positive"));
    }
    ctx.loyalty().earn(entry).await
}

/// Pay the completion bonus for `order` unless an earlier completion of the
/// same order already did. Returns whether points were credited.
pub(crate) async fn award_completed_order(
    ctx: &TransactionContext<'_>,
    order: &Order,
) -> AppResult<bool> {
    if ctx.loyalty().has_award(order.id).await? {
        return Ok(false);
    }
    credit(
        ctx,
        NewPointsTransaction {
            user_id: order.user_id,
            points: POINTS_PER_COMPLETED_ORDER,
            transaction_type: TransactionType::Earned,
            description: Some(format!("Completed order #{}", order.id)),
            reference_id: Some(order.id),
        },
    )
    .await?;
    Ok(true)
}

#[async_trait]
pub trait LoyaltyService: Send + Sync {
    /// Balance and tier; users without an account read as 0 points
    async fn get_points(&self, user_id: i64) -> AppResult<LoyaltyPointsDto>;

    async fn history(
        &self,
        user_id: i64,
        request: PageRequest,
    ) -> AppResult<Page<PointsTransactionDto>>;

    /// Credit points and record an `EARNED` ledger entry
    async fn earn_points(
        &self,
        user_id: i64,
        reference_id: Option<i64>,
        points: i32,
        description: Option<String>,
    ) -> AppResult<LoyaltyPointsDto>;
}

pub struct LoyaltyProgram<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> LoyaltyProgram<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> LoyaltyService for LoyaltyProgram<U> {
    async fn get_points(&self, user_id: i64) -> AppResult<LoyaltyPointsDto> {
        let balance = self
            .uow
            .loyalty()
            .find_account(user_id)
            .await?
            .map(|account| account.points_balance)
            .unwrap_or(0);
        Ok(LoyaltyPointsDto::new(user_id, balance))
    }

    async fn history(
        &self,
        user_id: i64,
        request: PageRequest,
    ) -> AppResult<Page<PointsTransactionDto>> {
        let page = self.uow.loyalty().list_transactions(user_id, request).await?;
        Ok(page.map(PointsTransactionDto::from))
    }

    async fn earn_points(
        &self,
        user_id: i64,
        reference_id: Option<i64>,
        points: i32,
        description: Option<String>,
    ) -> AppResult<LoyaltyPointsDto> {
        let entry = NewPointsTransaction {
            user_id,
            points,
            transaction_type: TransactionType::Earned,
            description,
            reference_id,
        };
        let account = with_transaction!(self.uow, |ctx| credit(&ctx, entry).await)?;

        tracing::info!(user_id, points, balance = account.points_balance, "Points earned");
        Ok(LoyaltyPointsDto::new(user_id, account.points_balance))
    }
}
