//! HTTP request handlers.

pub mod admin_handler;
pub mod auth_handler;
pub mod catalog_handler;
pub mod content_handler;
pub mod loyalty_handler;
pub mod order_handler;
pub mod profile_handler;
pub mod tasks_handler;
pub mod worker_handler;

pub use admin_handler::admin_routes;
pub use auth_handler::auth_routes;
pub use catalog_handler::catalog_routes;
pub use content_handler::{home_routes, news_routes};
pub use loyalty_handler::loyalty_routes;
pub use order_handler::{order_public_routes, order_routes};
pub use profile_handler::{contact_routes, profile_routes};
pub use tasks_handler::tasks_routes;
pub use worker_handler::{legacy_worker_routes, worker_routes};
