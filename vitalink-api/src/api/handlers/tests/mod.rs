mod accounts_test;
mod health_test;

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use vitalink_data::repository::connection_mocks::MockConnectionRepository;
use vitalink_data::repository::device_record_mocks::MockDeviceRecordRepository;
use vitalink_data::repository::profile_mocks::MockProfileRepository;
use vitalink_data::repository::settings_mocks::MockSettingsRepository;
use vitalink_data::models::settings::DemographicDefaults;
use vitalink_domain::services::{
    AccountService, ConnectionService, RandomEstimator, VitalsService,
};

use crate::api::routes::{create_app_with_state, AppState};

/// Repository handles shared between the wired services and the assertions
pub struct TestBackend {
    pub profiles: MockProfileRepository,
    pub connections: MockConnectionRepository,
    pub records: MockDeviceRecordRepository,
}

/// Wire an application over in-memory repositories with configured
/// demographic defaults
pub async fn test_app() -> (Router, TestBackend) {
    let profiles = MockProfileRepository::new();
    let connections = MockConnectionRepository::new();
    let records = MockDeviceRecordRepository::new();
    let settings = MockSettingsRepository::with_defaults(DemographicDefaults {
        age: 50,
        gender: "female".to_string(),
    });

    let state = AppState {
        accounts: Arc::new(AccountService::new(profiles.clone())),
        connections: Arc::new(ConnectionService::new(profiles.clone(), connections.clone())),
        vitals: Arc::new(VitalsService::new(
            records.clone(),
            profiles.clone(),
            settings,
            Arc::new(RandomEstimator),
            7,
        )),
    };

    let app = create_app_with_state(state).await;
    (
        app,
        TestBackend {
            profiles,
            connections,
            records,
        },
    )
}

/// Issue a GET request against the router
pub async fn get(app: &Router, uri: &str) -> Response<Body> {
    app.clone()
        .oneshot(
            Request::builder()
                .uri(uri)
                .body(Body::empty())
                .expect("request construction"),
        )
        .await
        .expect("request dispatch")
}

/// Read a JSON response body
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body collection")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("JSON body")
}

/// Create an account through the wire surface and register its identity with
/// the connection repository so listings can resolve counterparts
pub async fn signup_user(app: &Router, backend: &TestBackend, username: &str) {
    let uri = format!(
        "/signup?surname=Test&first_name={u}&username={u}&password=secret-pass&email={u}@example.com",
        u = username
    );
    let response = get(app, &uri).await;
    assert_eq!(response.status(), StatusCode::OK);

    use vitalink_data::repository::ProfileRepositoryTrait;
    let record = backend
        .profiles
        .find_by_username(username)
        .await
        .expect("profile lookup")
        .expect("created profile");
    backend
        .connections
        .register_profile(&record.id, &record.username, &record.email);
}
