//! Loyalty accounts, tiers and point transactions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Loyalty tier, derived from the points balance
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum Tier {
    Bronze,
    Silver,
    Gold,
    Platinum,
}

impl Tier {
    const ALL: [Tier; 4] = [Tier::Bronze, Tier::Silver, Tier::Gold, Tier::Platinum];

    /// Minimum balance for the tier
    pub fn threshold(&self) -> i32 {
        match self {
            Tier::Bronze => 0,
            Tier::Silver => 100,
            Tier::Gold => 500,
            Tier::Platinum => 1000,
        }
    }

    pub fn for_points(points: i32) -> Self {
        Self::ALL
            .into_iter()
            .rev()
            .find(|tier| points >= tier.threshold())
            .unwrap_or(Tier::Bronze)
    }

    pub fn next(&self) -> Option<Tier> {
        match self {
            Tier::Bronze => Some(Tier::Silver),
            Tier::Silver => Some(Tier::Gold),
            Tier::Gold => Some(Tier::Platinum),
            Tier::Platinum => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Bronze => "BRONZE",
            Tier::Silver => "SILVER",
            Tier::Gold => "GOLD",
            Tier::Platinum => "PLATINUM",
        }
    }
}

impl From<&str> for Tier {
    fn from(s: &str) -> Self {
        match s {
            "SILVER" => Tier::Silver,
            "GOLD" => Tier::Gold,
            "PLATINUM" => Tier::Platinum,
            _ => Tier::Bronze,
        }
    }
}

/// Points still needed to reach the next tier; 0 at the top tier
pub fn points_to_next_tier(balance: i32) -> i32 {
    Tier::for_points(balance)
        .next()
        .map(|next| (next.threshold() - balance).max(0))
        .unwrap_or(0)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionType {
    Earned,
    Redeemed,
    Expired,
    Adjusted,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Earned => "EARNED",
            TransactionType::Redeemed => "REDEEMED",
            TransactionType::Expired => "EXPIRED",
            TransactionType::Adjusted => "ADJUSTED",
        }
    }
}

impl From<&str> for TransactionType {
    fn from(s: &str) -> Self {
        match s {
            "REDEEMED" => TransactionType::Redeemed,
            "EXPIRED" => TransactionType::Expired,
            "ADJUSTED" => TransactionType::Adjusted,
            _ => TransactionType::Earned,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoyaltyAccount {
    pub id: i64,
    pub user_id: i64,
    pub points_balance: i32,
    pub current_tier: Tier,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl LoyaltyAccount {
    /// Add points and recompute the tier
    pub fn credit(&mut self, points: i32) {
        self.points_balance += points;
        self.current_tier = Tier::for_points(self.points_balance);
    }
}

#[derive(Debug, Clone)]
pub struct PointsTransaction {
    pub id: i64,
    pub user_id: i64,
    pub points: i32,
    pub transaction_type: TransactionType,
    pub description: Option<String>,
    pub reference_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewPointsTransaction {
    pub user_id: i64,
    pub points: i32,
    pub transaction_type: TransactionType,
    pub description: Option<String>,
    pub reference_id: Option<i64>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoyaltyPointsDto {
    pub user_id: i64,
    pub points_balance: i32,
    pub current_tier: Tier,
    pub points_to_next_tier: i32,
}

impl LoyaltyPointsDto {
    pub fn new(user_id: i64, points_balance: i32) -> Self {
        Self {
            user_id,
            points_balance,
            current_tier: Tier::for_points(points_balance),
            points_to_next_tier: points_to_next_tier(points_balance),
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PointsTransactionDto {
    pub id: i64,
    pub points: i32,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub description: Option<String>,
    pub reference_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}

impl From<PointsTransaction> for PointsTransactionDto {
    fn from(tx: PointsTransaction) -> Self {
        Self {
            id: tx.id,
            points: tx.points,
            transaction_type: tx.transaction_type,
            description: tx.description,
            reference_id: tx.reference_id,
            created_at: tx.created_at,
        }
    }
}
