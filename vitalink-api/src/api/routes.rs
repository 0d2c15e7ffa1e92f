use std::sync::Arc;

use axum::{routing::get, Extension, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::debug;

use vitalink_data::repository::{
    ConnectionRepository, DeviceRecordRepository, ProfileRepository, SettingsRepository,
};
use vitalink_domain::services::estimator::estimator_from_env;
use vitalink_domain::services::{
    AccountService, AccountServiceTrait, ConnectionService, ConnectionServiceTrait, VitalsService,
    VitalsServiceTrait,
};

use crate::api::handlers::{accounts, connections, health, vitals};
use crate::openapi::configure_swagger_routes;

/// Shared handler state carrying one handle per domain service
#[derive(Clone)]
pub struct AppState {
    pub accounts: Arc<dyn AccountServiceTrait + Send + Sync>,
    pub connections: Arc<dyn ConnectionServiceTrait + Send + Sync>,
    pub vitals: Arc<dyn VitalsServiceTrait + Send + Sync>,
}

/// Wire the production services over the SQLite repositories
pub fn create_default_state() -> AppState {
    let estimator = estimator_from_env();

    AppState {
        accounts: Arc::new(AccountService::new(ProfileRepository::new())),
        connections: Arc::new(ConnectionService::new(
            ProfileRepository::new(),
            ConnectionRepository::new(),
        )),
        vitals: Arc::new(VitalsService::from_env(
            DeviceRecordRepository::new(),
            ProfileRepository::new(),
            SettingsRepository::new(),
            estimator,
        )),
    }
}

/// Create the application router
pub async fn create_app() -> Router {
    create_app_with_state(create_default_state()).await
}

/// Create the application router over an explicit service wiring
pub async fn create_app_with_state(state: AppState) -> Router {
    debug!("Creating application router");

    let health_service = health::create_health_service();

    // Account endpoints
    let account_routes = Router::new()
        .route("/signup", get(accounts::signup))
        .route("/login", get(accounts::login))
        .route("/user_profile", get(accounts::get_user_profile))
        .route("/user_profiles", get(accounts::get_user_profiles))
        .route("/update_user_profile", get(accounts::update_user_profile))
        .route("/set_device_id", get(accounts::set_device_id))
        .route("/has_device", get(accounts::has_device))
        .route("/set_premium", get(accounts::set_premium))
        .route("/is_premium", get(accounts::is_premium));

    // Monitoring connection endpoints
    let connection_routes = Router::new()
        .route("/create_connection", get(connections::create_connection))
        .route("/get_connections", get(connections::get_connections))
        .route(
            "/get_pending_connections",
            get(connections::get_pending_connections),
        )
        .route("/accept_connection", get(connections::accept_connection))
        .route("/cancel_connection", get(connections::cancel_connection))
        .route(
            "/set_connection_permissions",
            get(connections::set_connection_permissions),
        );

    // Device record endpoints
    let vitals_routes = Router::new()
        .route("/device_push", get(vitals::device_push))
        .route("/get_vitals", get(vitals::get_vitals));

    debug!("API routes configured");

    // Public routes that carry no service state
    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .layer(Extension(health_service));

    let app = Router::new()
        .merge(account_routes)
        .merge(connection_routes)
        .merge(vitals_routes)
        .with_state(state)
        .merge(public_routes)
        .layer(TraceLayer::new_for_http())
        // Browser clients are served from another origin
        .layer(CorsLayer::permissive());

    debug!("Routes merged");

    // Configure the Swagger UI using the helper function
    let app = add_swagger_ui(app);

    debug!("Swagger UI merged");

    // Initialize health check service startup time
    health::initialize_server_start_time();

    app
}

/// Add Swagger UI to the router
pub fn add_swagger_ui(app: Router) -> Router {
    let swagger = configure_swagger_routes();

    app.merge(swagger)
}
