//! Loyalty balances and the points ledger.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};

use super::base::fetch_page;
use super::entities::loyalty_account::{self, Entity as AccountEntity};
use super::entities::points_transaction::{self, Entity as TransactionEntity};
use crate::domain::{
    LoyaltyAccount, NewPointsTransaction, PointsTransaction, Tier, TransactionType,
};
use crate::errors::{AppError, AppResult};
use crate::types::{Page, PageRequest};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait LoyaltyRepository: Send + Sync {
    async fn find_account(&self, user_id: i64) -> AppResult<Option<LoyaltyAccount>>;

    /// Ledger entries of a user, newest first
    async fn list_transactions(
        &self,
        user_id: i64,
        request: PageRequest,
    ) -> AppResult<Page<PointsTransaction>>;
}

pub struct LoyaltyStore {
    db: DatabaseConnection,
}

impl LoyaltyStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

/// Whether an `EARNED` ledger entry already references `order_id`
pub(crate) async fn has_award<C: ConnectionTrait>(db: &C, order_id: i64) -> AppResult<bool> {
    let n = TransactionEntity::find()
        .filter(points_transaction::Column::ReferenceId.eq(order_id))
        .filter(
            points_transaction::Column::TransactionType.eq(TransactionType::Earned.as_str()),
        )
        .count(db)
        .await?;
    Ok(n > 0)
}

/// Upsert the balance, recompute the tier and append the ledger entry.
///
/// The account row is created first when missing so the exclusive lock
/// always has a row to hold; concurrent credits then serialize on it.
pub(crate) async fn earn<C: ConnectionTrait>(
    db: &C,
    entry: NewPointsTransaction,
) -> AppResult<LoyaltyAccount> {
    let now = Utc::now();
    AccountEntity::insert(loyalty_account::ActiveModel {
        user_id: Set(entry.user_id),
        points_balance: Set(0),
        current_tier: Set(Tier::Bronze.as_str().to_string()),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    })
    .on_conflict(
        OnConflict::column(loyalty_account::Column::UserId)
            .update_column(loyalty_account::Column::UpdatedAt)
            .to_owned(),
    )
    .exec_without_returning(db)
    .await?;

    let model = AccountEntity::find()
        .filter(loyalty_account::Column::UserId.eq(entry.user_id))
        .lock_exclusive()
        .one(db)
        .await?
        .ok_or_else(|| AppError::internal("loyalty account missing after upsert"))?;

    let mut account = LoyaltyAccount::from(model.clone());
    account.credit(entry.points);

    let mut active: loyalty_account::ActiveModel = model.into();
    active.points_balance = Set(account.points_balance);
    active.current_tier = Set(account.current_tier.as_str().to_string());
    active.updated_at = Set(now);
    let account = LoyaltyAccount::from(active.update(db).await?);

    points_transaction::ActiveModel {
        user_id: Set(entry.user_id),
        points: Set(entry.points),
        transaction_type: Set(entry.transaction_type.as_str().to_string()),
        description: Set(entry.description),
        reference_id: Set(entry.reference_id),
        created_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await?;

    Ok(account)
}

#[async_trait]
impl LoyaltyRepository for LoyaltyStore {
    async fn find_account(&self, user_id: i64) -> AppResult<Option<LoyaltyAccount>> {
        let model = AccountEntity::find()
            .filter(loyalty_account::Column::UserId.eq(user_id))
            .one(&self.db)
            .await?;
        Ok(model.map(LoyaltyAccount::from))
    }

    async fn list_transactions(
        &self,
        user_id: i64,
        request: PageRequest,
    ) -> AppResult<Page<PointsTransaction>> {
        let select = TransactionEntity::find()
            .filter(points_transaction::Column::UserId.eq(user_id))
            .order_by_desc(points_transaction::Column::CreatedAt)
            .order_by_desc(points_transaction::Column::Id);
        Ok(fetch_page(&self.db, select, &request)
            .await?
            .map(PointsTransaction::from))
    }
}
