//! Repair services offered in the catalog.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

/// A bookable service
#[derive(Debug, Clone)]
pub struct ServiceOffering {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub base_price: Decimal,
    pub image_url: Option<String>,
    pub category: Option<String>,
    pub details: Option<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields an admin sets when creating or editing a service
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceInput {
    pub name: String,
    pub description: Option<String>,
    pub base_price: Decimal,
    pub category: Option<String>,
    pub active: bool,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServiceDto {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = "Electrical repair")]
    pub name: String,
    pub description: Option<String>,
    #[schema(value_type = String, example = "150000.00")]
    pub base_price: Decimal,
    pub image_url: Option<String>,
    #[schema(example = "ELECTRIC")]
    pub category: Option<String>,
    pub details: Option<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ServiceOffering> for ServiceDto {
    fn from(service: ServiceOffering) -> Self {
        Self {
            id: service.id,
            name: service.name,
            description: service.description,
            base_price: service.base_price,
            image_url: service.image_url,
            category: service.category,
            details: service.details,
            active: service.active,
            created_at: service.created_at,
            updated_at: service.updated_at,
        }
    }
}

#[cfg(test)]
pub(crate) fn sample_service(id: i64, active: bool) -> ServiceOffering {
    let now = Utc::now();
    ServiceOffering {
        id,
        name: format!("Service {}", id),
        description: None,
        base_price: Decimal::new(15000, 2),
        image_url: None,
        category: Some("ELECTRIC".into()),
        details: None,
        active,
        created_at: now,
        updated_at: now,
    }
}
