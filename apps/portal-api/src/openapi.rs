//! `OpenAPI` documentation and Swagger UI configuration.

use axum::Router;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use trueview_api::models::{
    AccessUrlResponse, AdminLoginRequest, AdminLoginResponse, ClientOverview, ClientSummary,
    DashboardResponse, DashboardStats, DeliverableView, HealthResponse, LoginRequest,
    LoginResponse, TimelineView, UpdateAccessRequest, UpdateAck, UrlTriplet, UserProfile,
    WebhookAck,
};

/// Security scheme modifier for Bearer authentication.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearerAuth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// `OpenAPI` documentation for the portal API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "TrueView Portal API",
        version = "0.1.0",
        description = "Client-portal backend: webhook provisioning, sessions, deliverable access"
    ),
    modifiers(&SecurityAddon),
    paths(
        trueview_api::handlers::health::health_handler,
        trueview_api::handlers::webhook::honeybook_webhook_handler,
        trueview_api::handlers::auth::login_handler,
        trueview_api::handlers::auth::admin_login_handler,
        trueview_api::handlers::dashboard::dashboard_handler,
        trueview_api::handlers::deliverables::download_url_handler,
        trueview_api::handlers::admin::list_clients_handler,
        trueview_api::handlers::admin::update_access_handler,
        trueview_api::handlers::admin::activate_client_handler,
    ),
    components(schemas(
        AccessUrlResponse,
        AdminLoginRequest,
        AdminLoginResponse,
        ClientOverview,
        ClientSummary,
        DashboardResponse,
        DashboardStats,
        DeliverableView,
        HealthResponse,
        LoginRequest,
        LoginResponse,
        TimelineView,
        UpdateAccessRequest,
        UpdateAck,
        UrlTriplet,
        UserProfile,
        WebhookAck,
    )),
    tags(
        (name = "Health", description = "Service health"),
        (name = "Webhooks", description = "CRM event intake"),
        (name = "Authentication", description = "Client and operator login"),
        (name = "Client", description = "Authenticated client portal"),
        (name = "Admin", description = "Operator roster management"),
    )
)]
pub struct ApiDoc;

/// Swagger UI routes serving the generated document.
pub fn swagger_routes() -> Router {
    SwaggerUi::new("/docs")
        .url("/api-docs/openapi.json", ApiDoc::openapi())
        .into()
}
