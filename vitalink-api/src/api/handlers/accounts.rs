use axum::{
    extract::{Json, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::{error, info, instrument, warn};

use vitalink_domain::entities::{Profile, ProfileUpdate, SignupRequest};
use vitalink_domain::services::AccountServiceError;

use crate::api::routes::AppState;
use crate::entities::accounts::{
    FlagResponse, LoginParams, LoginResponse, ProfileResponse, SetDeviceParams, SetPremiumParams,
    SignupParams, UpdateProfileParams, UsernameParams,
};
use crate::entities::common::AckResponse;

use super::ErrorResponse;

/// Map account service failures onto wire errors. Conflicts are handled at
/// the call sites that can produce them.
fn account_error_response(err: AccountServiceError) -> Response {
    match err {
        AccountServiceError::NotFound(_) => ErrorResponse::not_found("profile").into_response(),
        AccountServiceError::Validation(message) => {
            warn!("Rejected account request: {}", message);
            ErrorResponse::validation_error(&message, None).into_response()
        }
        e => {
            error!("Account service error: {}", e);
            ErrorResponse::internal_error().into_response()
        }
    }
}

fn profile_response(profile: Profile) -> ProfileResponse {
    ProfileResponse {
        username: profile.username,
        surname: profile.surname,
        first_name: profile.first_name,
        email: profile.email,
        phone_number: profile.phone_number,
        age: profile.age,
        gender: profile.gender,
        device_id: profile.device_id,
        diet_summary: profile.diet_summary,
        mental_health_summary: profile.mental_health_summary,
        model_context: profile.model_context,
        premium_plan: profile.premium_plan,
    }
}

/// Create a new account
#[utoipa::path(
    get,
    path = "/signup",
    params(SignupParams),
    responses(
        (status = 200, description = "Account created, or refused with success=false", body = AckResponse),
        (status = 400, description = "Invalid signup data", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "accounts"
)]
#[instrument(skip(state, params))]
pub async fn signup(
    State(state): State<AppState>,
    Query(params): Query<SignupParams>,
) -> Result<impl IntoResponse, Response> {
    info!("Signup requested for username: {}", params.username);

    let request = SignupRequest {
        surname: params.surname,
        first_name: params.first_name,
        username: params.username,
        password: params.password,
        email: params.email,
        phone_number: params.phone_number,
        age: params.age,
        gender: params.gender,
    };

    match state.accounts.signup(request).await {
        Ok(()) => Ok((StatusCode::OK, Json(AckResponse::ok()))),
        // A taken username or email is a refusal the client handles in-band,
        // not a transport error
        Err(AccountServiceError::Conflict(message)) => {
            info!("Signup refused: {}", message);
            Ok((StatusCode::OK, Json(AckResponse::refused(&message))))
        }
        Err(e) => Err(account_error_response(e)),
    }
}

/// Verify a credential pair
#[utoipa::path(
    get,
    path = "/login",
    params(LoginParams),
    responses(
        (status = 200, description = "Credential verdict", body = LoginResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "accounts"
)]
#[instrument(skip(state, params))]
pub async fn login(
    State(state): State<AppState>,
    Query(params): Query<LoginParams>,
) -> Result<impl IntoResponse, Response> {
    match state.accounts.login(&params.username, &params.password).await {
        Ok(success) => Ok((StatusCode::OK, Json(LoginResponse { success }))),
        Err(e) => Err(account_error_response(e)),
    }
}

/// Fetch a single profile
#[utoipa::path(
    get,
    path = "/user_profile",
    params(UsernameParams),
    responses(
        (status = 200, description = "Profile found", body = ProfileResponse),
        (status = 404, description = "Profile not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "accounts"
)]
#[instrument(skip(state))]
pub async fn get_user_profile(
    State(state): State<AppState>,
    Query(params): Query<UsernameParams>,
) -> Result<impl IntoResponse, Response> {
    match state.accounts.get_profile(&params.username).await {
        Ok(profile) => Ok((StatusCode::OK, Json(profile_response(profile)))),
        Err(e) => Err(account_error_response(e)),
    }
}

/// List all profiles
#[utoipa::path(
    get,
    path = "/user_profiles",
    responses(
        (status = 200, description = "All profiles", body = [ProfileResponse]),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "accounts"
)]
#[instrument(skip(state))]
pub async fn get_user_profiles(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, Response> {
    match state.accounts.list_profiles().await {
        Ok(profiles) => {
            let profiles: Vec<ProfileResponse> =
                profiles.into_iter().map(profile_response).collect();
            Ok((StatusCode::OK, Json(profiles)))
        }
        Err(e) => Err(account_error_response(e)),
    }
}

/// Apply a partial profile update
#[utoipa::path(
    get,
    path = "/update_user_profile",
    params(UpdateProfileParams),
    responses(
        (status = 200, description = "Updated profile", body = ProfileResponse),
        (status = 404, description = "Profile not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "accounts"
)]
#[instrument(skip(state, params))]
pub async fn update_user_profile(
    State(state): State<AppState>,
    Query(params): Query<UpdateProfileParams>,
) -> Result<impl IntoResponse, Response> {
    let username = params.username;
    let update = ProfileUpdate {
        surname: params.surname,
        first_name: params.first_name,
        email: params.email,
        phone_number: params.phone_number,
        age: params.age,
        gender: params.gender,
        diet_summary: params.diet_summary,
        mental_health_summary: params.mental_health_summary,
        model_context: params.model_context,
    };

    match state.accounts.update_profile(&username, update).await {
        Ok(profile) => Ok((StatusCode::OK, Json(profile_response(profile)))),
        Err(e) => Err(account_error_response(e)),
    }
}

/// Link a vitals device to a profile
#[utoipa::path(
    get,
    path = "/set_device_id",
    params(SetDeviceParams),
    responses(
        (status = 200, description = "Device linked", body = AckResponse),
        (status = 404, description = "Profile not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "accounts"
)]
#[instrument(skip(state))]
pub async fn set_device_id(
    State(state): State<AppState>,
    Query(params): Query<SetDeviceParams>,
) -> Result<impl IntoResponse, Response> {
    match state
        .accounts
        .set_device_id(&params.username, &params.device_id)
        .await
    {
        Ok(()) => Ok((StatusCode::OK, Json(AckResponse::ok()))),
        Err(e) => Err(account_error_response(e)),
    }
}

/// Whether a profile has a linked device
#[utoipa::path(
    get,
    path = "/has_device",
    params(UsernameParams),
    responses(
        (status = 200, description = "Device link flag", body = FlagResponse),
        (status = 404, description = "Profile not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "accounts"
)]
#[instrument(skip(state))]
pub async fn has_device(
    State(state): State<AppState>,
    Query(params): Query<UsernameParams>,
) -> Result<impl IntoResponse, Response> {
    match state.accounts.has_device(&params.username).await {
        Ok(value) => Ok((StatusCode::OK, Json(FlagResponse { value }))),
        Err(e) => Err(account_error_response(e)),
    }
}

/// Switch a profile's plan
#[utoipa::path(
    get,
    path = "/set_premium",
    params(SetPremiumParams),
    responses(
        (status = 200, description = "Plan updated", body = AckResponse),
        (status = 404, description = "Profile not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "accounts"
)]
#[instrument(skip(state))]
pub async fn set_premium(
    State(state): State<AppState>,
    Query(params): Query<SetPremiumParams>,
) -> Result<impl IntoResponse, Response> {
    match state
        .accounts
        .set_premium(&params.username, params.value)
        .await
    {
        Ok(()) => Ok((StatusCode::OK, Json(AckResponse::ok()))),
        Err(e) => Err(account_error_response(e)),
    }
}

/// Read a profile's plan flag
#[utoipa::path(
    get,
    path = "/is_premium",
    params(UsernameParams),
    responses(
        (status = 200, description = "Plan flag", body = FlagResponse),
        (status = 404, description = "Profile not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "accounts"
)]
#[instrument(skip(state))]
pub async fn is_premium(
    State(state): State<AppState>,
    Query(params): Query<UsernameParams>,
) -> Result<impl IntoResponse, Response> {
    match state.accounts.is_premium(&params.username).await {
        Ok(value) => Ok((StatusCode::OK, Json(FlagResponse { value }))),
        Err(e) => Err(account_error_response(e)),
    }
}
