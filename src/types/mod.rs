//! Shared types for list endpoints and the response envelope.

mod pagination;
mod response;

pub use pagination::{
    NewsPage, OrderManagementPage, OrderPage, Page, PageQuery, PageRequest, PointsPage,
    ServicePage, SortDirection, UserPage,
};
pub use response::{ApiResponse, Created};
