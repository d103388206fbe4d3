//! Orders, reviews and booking time slots.

use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::config::DEFAULT_BOOKING_DURATION_MINUTES;
use crate::errors::AppError;

/// Order lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    InProgress,
    Completed,
    Cancelled,
}

impl OrderStatus {
    /// Statuses that keep a worker busy
    pub const ACTIVE: [OrderStatus; 3] = [
        OrderStatus::Pending,
        OrderStatus::Confirmed,
        OrderStatus::InProgress,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "PENDING",
            OrderStatus::Confirmed => "CONFIRMED",
            OrderStatus::InProgress => "IN_PROGRESS",
            OrderStatus::Completed => "COMPLETED",
            OrderStatus::Cancelled => "CANCELLED",
        }
    }

    pub fn is_active(&self) -> bool {
        Self::ACTIVE.contains(self)
    }
}

impl FromStr for OrderStatus {
    type Err = AppError;

    /// Case-insensitive
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PENDING" => Ok(OrderStatus::Pending),
            "CONFIRMED" => Ok(OrderStatus::Confirmed),
            "IN_PROGRESS" => Ok(OrderStatus::InProgress),
            "COMPLETED" => Ok(OrderStatus::Completed),
            "CANCELLED" => Ok(OrderStatus::Cancelled),
            _ => Err(AppError::InvalidStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Half-open booking interval `[start, end)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeSlot {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeSlot {
    /// Slot starting at `start`; a missing or non-positive duration falls
    /// back to the default booking length.
    pub fn starting_at(start: DateTime<Utc>, duration_minutes: Option<i32>) -> Self {
        let minutes = effective_duration(duration_minutes);
        Self {
            start,
            end: start + Duration::minutes(i64::from(minutes)),
        }
    }

    pub fn overlaps(&self, other: &TimeSlot) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// Duration actually booked
pub fn effective_duration(duration_minutes: Option<i32>) -> i32 {
    duration_minutes
        .filter(|m| *m > 0)
        .unwrap_or(DEFAULT_BOOKING_DURATION_MINUTES)
}

/// Address the work is done at
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub address_line: Option<String>,
    pub district: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
}

/// Service order
#[derive(Debug, Clone)]
pub struct Order {
    pub id: i64,
    pub user_id: i64,
    pub service_id: i64,
    pub worker_id: Option<i64>,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub duration_minutes: Option<i32>,
    pub status: OrderStatus,
    pub total_amount: Decimal,
    pub address: Address,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Booked interval, when the order carries both a time and a duration
    pub fn time_slot(&self) -> Option<TimeSlot> {
        match (self.scheduled_at, self.duration_minutes) {
            (Some(start), Some(minutes)) => Some(TimeSlot::starting_at(start, Some(minutes))),
            _ => None,
        }
    }

    /// Whether this order keeps its worker busy during `slot`
    pub fn blocks(&self, slot: &TimeSlot) -> bool {
        self.status.is_active()
            && self
                .time_slot()
                .map(|booked| booked.overlaps(slot))
                .unwrap_or(false)
    }
}

/// Data for a new order
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
    pub user_id: i64,
    pub service_id: i64,
    pub worker_id: Option<i64>,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub duration_minutes: Option<i32>,
    pub total_amount: Decimal,
    pub address: Address,
    pub notes: Option<String>,
}

/// Order as returned to its owner
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderDto {
    pub id: i64,
    pub user_id: i64,
    pub service_id: i64,
    pub worker_id: Option<i64>,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub duration_minutes: Option<i32>,
    pub status: OrderStatus,
    #[schema(value_type = String, example = "150000.00")]
    pub total_amount: Decimal,
    #[serde(flatten)]
    pub address: Address,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Order> for OrderDto {
    fn from(order: Order) -> Self {
        Self {
            id: order.id,
            user_id: order.user_id,
            service_id: order.service_id,
            worker_id: order.worker_id,
            scheduled_at: order.scheduled_at,
            duration_minutes: order.duration_minutes,
            status: order.status,
            total_amount: order.total_amount,
            address: order.address,
            notes: order.notes,
            created_at: order.created_at,
            updated_at: order.updated_at,
        }
    }
}

/// Order enriched with customer and service names for the back office
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderManagementDto {
    pub id: i64,
    pub user_id: i64,
    pub customer_name: String,
    pub customer_email: Option<String>,
    pub service_id: i64,
    pub service_name: Option<String>,
    pub worker_id: Option<i64>,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub status: OrderStatus,
    #[schema(value_type = String)]
    pub total_amount: Decimal,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Customer review of an order
#[derive(Debug, Clone)]
pub struct Review {
    pub id: i64,
    pub order_id: i64,
    pub user_id: i64,
    pub rating: i32,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReviewDto {
    pub id: i64,
    pub order_id: i64,
    pub user_id: i64,
    pub rating: i32,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Review> for ReviewDto {
    fn from(review: Review) -> Self {
        Self {
            id: review.id,
            order_id: review.order_id,
            user_id: review.user_id,
            rating: review.rating,
            comment: review.comment,
            created_at: review.created_at,
        }
    }
}

#[cfg(test)]
pub(crate) fn sample_order(id: i64, user_id: i64, status: OrderStatus) -> Order {
    let now = Utc::now();
    Order {
        id,
        user_id,
        service_id: 1,
        worker_id: None,
        scheduled_at: None,
        duration_minutes: None,
        status,
        total_amount: Decimal::new(15000, 2),
        address: Address::default(),
        notes: None,
        created_at: now,
        updated_at: now,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, hour, 0, 0).unwrap()
    }

    #[test]
    fn test_status_parse_case_insensitive() {
        assert_eq!("in_progress".parse::<OrderStatus>().unwrap(), OrderStatus::InProgress);
        assert_eq!("Completed".parse::<OrderStatus>().unwrap(), OrderStatus::Completed);
        assert!(matches!(
            "DONE".parse::<OrderStatus>(),
            Err(AppError::InvalidStatus(_))
        ));
    }

    #[test]
    fn test_status_serializes_upper_snake() {
        assert_eq!(
            serde_json::to_string(&OrderStatus::InProgress).unwrap(),
            "\"IN_PROGRESS\""
        );
    }

    #[test]
    fn test_default_duration() {
        let slot = TimeSlot::starting_at(at(9), None);
        assert_eq!(slot.end, at(11));
        assert_eq!(effective_duration(Some(0)), DEFAULT_BOOKING_DURATION_MINUTES);
        assert_eq!(effective_duration(Some(45)), 45);
    }

    #[test]
    fn test_adjacent_slots_do_not_overlap() {
        let morning = TimeSlot::starting_at(at(9), Some(60));
        let next = TimeSlot::starting_at(at(10), Some(60));
        assert!(!morning.overlaps(&next));
        assert!(!next.overlaps(&morning));
    }

    #[test]
    fn test_overlapping_slots() {
        let long = TimeSlot::starting_at(at(9), Some(180));
        let inner = TimeSlot::starting_at(at(10), Some(30));
        assert!(long.overlaps(&inner));
        assert!(inner.overlaps(&long));
    }

    #[test]
    fn test_order_blocks_only_when_active_and_timed() {
        let slot = TimeSlot::starting_at(at(10), Some(60));

        let mut order = sample_order(1, 1, OrderStatus::Confirmed);
        assert!(!order.blocks(&slot), "untimed orders never block");

        order.scheduled_at = Some(at(9));
        order.duration_minutes = Some(120);
        assert!(order.blocks(&slot));

        order.status = OrderStatus::Cancelled;
        assert!(!order.blocks(&slot));
    }
}
