//! OpenAPI documentation configuration.
//!
//! Served at `/v3/api-docs` with Swagger UI on `/swagger-ui`.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers::{
    admin_handler, auth_handler, catalog_handler, content_handler, loyalty_handler,
    order_handler, profile_handler, tasks_handler, worker_handler,
};
use crate::domain::{
    Address, AdminStatsDto, ContactResponse, HeroSectionDto, HomePageDto, LoginType,
    LoyaltyPointsDto, NewsDto, OrderDto, OrderManagementDto, OrderStatus, OrderSummaryDto,
    PointsTransactionDto, ProfileDto, ProfileSummaryDto, PromotionDto, RecentOrderDto, ReviewDto,
    ServiceDto, TasksDashboardDto, TestimonialDto, Tier, TransactionType, UserDto,
    UserManagementDto, UserRole, WorkerDto,
};
use crate::services::AuthResponse;
use crate::types::{NewsPage, OrderManagementPage, OrderPage, PointsPage, ServicePage, UserPage};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Homefix API",
        version = "0.1.0",
        description = "Home repair booking: catalog, orders, workers, loyalty and back office",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server")
    ),
    paths(
        // Authentication
        auth_handler::register,
        auth_handler::login,
        auth_handler::refresh,
        auth_handler::logout,
        auth_handler::logout_cookie,
        auth_handler::google_login,
        auth_handler::facebook_login,
        // Catalog
        catalog_handler::list_services,
        catalog_handler::get_service,
        catalog_handler::services_by_category,
        // Orders
        order_handler::list_orders,
        order_handler::get_order,
        order_handler::create_order,
        order_handler::orders_by_status,
        order_handler::create_review,
        order_handler::service_reviews,
        // Workers
        worker_handler::list_workers,
        worker_handler::get_worker,
        worker_handler::list_by_skill,
        // Loyalty
        loyalty_handler::get_points,
        loyalty_handler::history,
        // Content
        content_handler::list_news,
        content_handler::get_news,
        content_handler::featured_news,
        content_handler::home_page,
        // Profile and contact
        profile_handler::get_profile,
        profile_handler::update_profile,
        profile_handler::submit_contact,
        // Tasks
        tasks_handler::dashboard,
        // Admin
        admin_handler::stats,
        admin_handler::list_users,
        admin_handler::get_user,
        admin_handler::block_user,
        admin_handler::unblock_user,
        admin_handler::list_orders,
        admin_handler::get_order,
        admin_handler::update_order_status,
        admin_handler::delete_order,
        admin_handler::create_order,
        admin_handler::create_service,
        admin_handler::update_service,
        admin_handler::delete_service,
        admin_handler::toggle_service,
    ),
    components(
        schemas(
            // Domain types
            UserRole,
            LoginType,
            UserDto,
            UserManagementDto,
            WorkerDto,
            ServiceDto,
            OrderStatus,
            Address,
            OrderDto,
            OrderManagementDto,
            ReviewDto,
            Tier,
            TransactionType,
            LoyaltyPointsDto,
            PointsTransactionDto,
            NewsDto,
            HeroSectionDto,
            TestimonialDto,
            HomePageDto,
            ProfileDto,
            ContactResponse,
            TasksDashboardDto,
            ProfileSummaryDto,
            OrderSummaryDto,
            RecentOrderDto,
            PromotionDto,
            AdminStatsDto,
            // Pages
            ServicePage,
            OrderPage,
            NewsPage,
            PointsPage,
            UserPage,
            OrderManagementPage,
            // Requests
            AuthResponse,
            auth_handler::RegisterRequest,
            auth_handler::LoginRequest,
            auth_handler::RefreshTokenRequest,
            auth_handler::LogoutRequest,
            order_handler::CreateOrderRequest,
            order_handler::CreateReviewRequest,
            profile_handler::UpdateProfileRequest,
            profile_handler::ContactRequest,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Registration, login and token rotation"),
        (name = "Services", description = "Service catalog"),
        (name = "Orders", description = "Customer orders and reviews"),
        (name = "Workers", description = "Worker listing and availability"),
        (name = "Loyalty", description = "Loyalty points"),
        (name = "Content", description = "News and home page"),
        (name = "Profile", description = "User profile"),
        (name = "Contact", description = "Contact form"),
        (name = "Tasks", description = "User dashboard"),
        (name = "Admin", description = "Back office")
    )
)]
pub struct ApiDoc;

/// Security scheme modifier for JWT Bearer authentication
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Access token obtained from /api/auth/login"))
                        .build(),
                ),
            );
        }
    }
}
