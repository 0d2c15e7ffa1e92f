use axum::http::StatusCode;

use super::{body_json, get, signup_user, test_app};

#[tokio::test]
async fn signup_creates_an_account() {
    let (app, _backend) = test_app().await;

    let response = get(
        &app,
        "/signup?surname=Doe&first_name=Jane&username=jane&password=secret-pass&email=jane@example.com",
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["success"], true);
}

#[tokio::test]
async fn duplicate_signup_is_refused_in_band() {
    let (app, backend) = test_app().await;
    signup_user(&app, &backend, "jane").await;

    let response = get(
        &app,
        "/signup?surname=Doe&first_name=Jane&username=jane&password=secret-pass&email=other@example.com",
    )
    .await;

    // Refusal is reported in the payload, not as a transport error
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn invalid_signup_data_is_a_bad_request() {
    let (app, _backend) = test_app().await;

    // Password below the minimum length
    let response = get(
        &app,
        "/signup?surname=Doe&first_name=Jane&username=jane&password=short&email=jane@example.com",
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "validation_error");
}

#[tokio::test]
async fn login_verdicts() {
    let (app, backend) = test_app().await;
    signup_user(&app, &backend, "jane").await;

    let ok = body_json(get(&app, "/login?username=jane&password=secret-pass").await).await;
    assert_eq!(ok["success"], true);

    let wrong = body_json(get(&app, "/login?username=jane&password=wrong-pass").await).await;
    assert_eq!(wrong["success"], false);

    let unknown = body_json(get(&app, "/login?username=ghost&password=secret-pass").await).await;
    assert_eq!(unknown["success"], false);
}

#[tokio::test]
async fn profile_lookup_round_trip() {
    let (app, backend) = test_app().await;
    signup_user(&app, &backend, "jane").await;

    let response = get(&app, "/user_profile?username=jane").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["username"], "jane");
    assert_eq!(body["email"], "jane@example.com");
    // The credential hash never crosses the wire
    assert!(body.get("password").is_none());
    assert!(body.get("password_hash").is_none());
}

#[tokio::test]
async fn unknown_profile_is_a_404() {
    let (app, _backend) = test_app().await;

    let response = get(&app, "/user_profile?username=ghost").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn profile_listing_includes_created_accounts() {
    let (app, backend) = test_app().await;
    signup_user(&app, &backend, "jane").await;
    signup_user(&app, &backend, "john").await;

    let body = body_json(get(&app, "/user_profiles").await).await;
    let listing = body.as_array().expect("profile array");
    assert_eq!(listing.len(), 2);
}

#[tokio::test]
async fn profile_update_changes_only_named_fields() {
    let (app, backend) = test_app().await;
    signup_user(&app, &backend, "jane").await;

    let response = get(
        &app,
        "/update_user_profile?username=jane&phone_number=555-0101&diet_summary=vegetarian",
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(get(&app, "/user_profile?username=jane").await).await;
    assert_eq!(body["phone_number"], "555-0101");
    assert_eq!(body["diet_summary"], "vegetarian");
    assert_eq!(body["email"], "jane@example.com");
}

#[tokio::test]
async fn device_link_flow() {
    let (app, backend) = test_app().await;
    signup_user(&app, &backend, "jane").await;

    let before = body_json(get(&app, "/has_device?username=jane").await).await;
    assert_eq!(before["value"], false);

    let response = get(&app, "/set_device_id?username=jane&device_id=dev-42").await;
    assert_eq!(response.status(), StatusCode::OK);

    let after = body_json(get(&app, "/has_device?username=jane").await).await;
    assert_eq!(after["value"], true);
}

#[tokio::test]
async fn premium_flag_round_trip() {
    let (app, backend) = test_app().await;
    signup_user(&app, &backend, "jane").await;

    let before = body_json(get(&app, "/is_premium?username=jane").await).await;
    assert_eq!(before["value"], false);

    get(&app, "/set_premium?username=jane&value=true").await;
    let during = body_json(get(&app, "/is_premium?username=jane").await).await;
    assert_eq!(during["value"], true);

    get(&app, "/set_premium?username=jane&value=false").await;
    let after = body_json(get(&app, "/is_premium?username=jane").await).await;
    assert_eq!(after["value"], false);
}

#[tokio::test]
async fn set_premium_false_clears_the_flag() {
    let (app, backend) = test_app().await;
    signup_user(&app, &backend, "jane").await;

    get(&app, "/set_premium?username=jane&value=true").await;

    let response = get(&app, "/set_premium?username=jane&value=false").await;
    assert_eq!(response.status(), StatusCode::OK);

    let after = body_json(get(&app, "/is_premium?username=jane").await).await;
    assert_eq!(after["value"], false);
}

#[tokio::test]
async fn set_premium_requires_a_value() {
    let (app, backend) = test_app().await;
    signup_user(&app, &backend, "jane").await;

    let response = get(&app, "/set_premium?username=jane").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // The flag is untouched by the rejected request
    let after = body_json(get(&app, "/is_premium?username=jane").await).await;
    assert_eq!(after["value"], false);
}
