//! SeaORM entity definitions
//!
//! These are database-specific entities separate from domain models.

pub mod contact_message;
pub mod home_data;
pub mod loyalty_account;
pub mod news;
pub mod order;
pub mod points_transaction;
pub mod profile;
pub mod refresh_token;
pub mod review;
pub mod service;
pub mod testimonial;
pub mod user;
