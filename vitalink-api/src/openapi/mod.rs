use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Configure Swagger UI endpoints
pub fn configure_swagger_routes() -> SwaggerUi {
    SwaggerUi::new("/api-docs").url("/api-docs/openapi.json", ApiDoc::openapi())
}

// API Documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        // Health endpoints
        crate::api::handlers::health::health_check,

        // Account endpoints
        crate::api::handlers::accounts::signup,
        crate::api::handlers::accounts::login,
        crate::api::handlers::accounts::get_user_profile,
        crate::api::handlers::accounts::get_user_profiles,
        crate::api::handlers::accounts::update_user_profile,
        crate::api::handlers::accounts::set_device_id,
        crate::api::handlers::accounts::has_device,
        crate::api::handlers::accounts::set_premium,
        crate::api::handlers::accounts::is_premium,

        // Connection endpoints
        crate::api::handlers::connections::create_connection,
        crate::api::handlers::connections::get_connections,
        crate::api::handlers::connections::get_pending_connections,
        crate::api::handlers::connections::accept_connection,
        crate::api::handlers::connections::cancel_connection,
        crate::api::handlers::connections::set_connection_permissions,

        // Vitals endpoints
        crate::api::handlers::vitals::device_push,
        crate::api::handlers::vitals::get_vitals,
    ),
    components(
        schemas(
            // Entities
            crate::entities::accounts::SignupParams,
            crate::entities::accounts::LoginParams,
            crate::entities::accounts::UsernameParams,
            crate::entities::accounts::UpdateProfileParams,
            crate::entities::accounts::SetDeviceParams,
            crate::entities::accounts::SetPremiumParams,
            crate::entities::accounts::ProfileResponse,
            crate::entities::accounts::LoginResponse,
            crate::entities::accounts::FlagResponse,
            crate::entities::connections::CreateConnectionParams,
            crate::entities::connections::ConnectionIdParams,
            crate::entities::connections::SetPermissionsParams,
            crate::entities::connections::ConnectionEdgeResponse,
            crate::entities::connections::ConnectionListResponse,
            crate::entities::vitals::DevicePushParams,
            crate::entities::vitals::VitalsResponse,
            crate::entities::vitals::NoVitalsResponse,
            crate::entities::common::AckResponse,

            // Health handlers
            crate::api::handlers::health::HealthResponse,
            crate::api::handlers::health::ComponentStatus,
            crate::api::handlers::health::ComponentHealthStatus,

            // Shared error shape
            crate::api::handlers::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoint"),
        (name = "accounts", description = "Account and profile management endpoints"),
        (name = "connections", description = "Monitoring connection endpoints"),
        (name = "vitals", description = "Device record ingestion and retrieval endpoints")
    ),
    info(
        title = "VitaLink API",
        version = "0.1.0",
        description = "API for remote health monitoring: accounts, monitoring connections, and device vitals",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        ),
    ),
    servers(
        (url = "/", description = "Local development server")
    )
)]
struct ApiDoc;
