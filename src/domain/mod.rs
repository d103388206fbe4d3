//! Domain layer - Core business entities and logic
//!
//! Entities, value objects and the pure rules (tiers, booking slots)
//! the services build on. Nothing here touches the database.

pub mod catalog;
pub mod content;
pub mod loyalty;
pub mod order;
pub mod password;
pub mod profile;
pub mod user;

pub use catalog::{ServiceDto, ServiceInput, ServiceOffering};
pub use content::{
    HeroSectionDto, HomeData, HomePageDto, NewsArticle, NewsDto, Testimonial, TestimonialDto,
};
pub use loyalty::{
    points_to_next_tier, LoyaltyAccount, LoyaltyPointsDto, NewPointsTransaction,
    PointsTransaction, PointsTransactionDto, Tier, TransactionType,
};
pub use order::{
    effective_duration, Address, NewOrder, Order, OrderDto, OrderManagementDto, OrderStatus,
    Review, ReviewDto, TimeSlot,
};
pub use password::Password;
pub use profile::{
    AdminStatsDto, ContactMessage, ContactResponse, NewContactMessage, OrderSummaryDto, Profile,
    ProfileChanges, ProfileDto, ProfileSummaryDto, PromotionDto, RecentOrderDto,
    TasksDashboardDto,
};
pub use user::{LoginType, NewUser, User, UserDto, UserManagementDto, UserRole, WorkerDto};
