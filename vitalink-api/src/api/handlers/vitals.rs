use axum::{
    extract::{Json, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::{error, info, instrument, warn};

use vitalink_domain::entities::{DevicePush, VitalsSnapshot};
use vitalink_domain::services::VitalsServiceError;

use crate::api::routes::AppState;
use crate::entities::accounts::UsernameParams;
use crate::entities::common::AckResponse;
use crate::entities::vitals::{DevicePushParams, NoVitalsResponse, VitalsResponse};

use super::ErrorResponse;

fn vitals_error_response(err: VitalsServiceError) -> Response {
    match err {
        VitalsServiceError::NotFound(_) => ErrorResponse::not_found("profile").into_response(),
        VitalsServiceError::Validation(message) => {
            warn!("Rejected vitals request: {}", message);
            ErrorResponse::validation_error(&message, None).into_response()
        }
        VitalsServiceError::Precondition(message) => {
            error!("Vitals precondition failure: {}", message);
            ErrorResponse::precondition_failed(&message).into_response()
        }
        e => {
            error!("Vitals service error: {}", e);
            ErrorResponse::internal_error().into_response()
        }
    }
}

fn snapshot_response(snapshot: VitalsSnapshot) -> VitalsResponse {
    VitalsResponse {
        temp: snapshot.temp,
        heart_rate: snapshot.heart_rate,
        blood_oxygen: snapshot.blood_oxygen,
        sbp: snapshot.sbp,
        dbp: snapshot.dbp,
        ecg_sensor_frame: snapshot.ecg_sensor_frame,
        time_diff_seconds: snapshot.time_diff_seconds,
        online: snapshot.online,
        alert: snapshot.alert,
    }
}

/// Ingest one device sample
#[utoipa::path(
    get,
    path = "/device_push",
    params(DevicePushParams),
    responses(
        (status = 200, description = "Sample recorded", body = AckResponse),
        (status = 500, description = "Internal server error or missing demographic defaults", body = ErrorResponse),
    ),
    tag = "vitals"
)]
#[instrument(skip(state, params))]
pub async fn device_push(
    State(state): State<AppState>,
    Query(params): Query<DevicePushParams>,
) -> Result<impl IntoResponse, Response> {
    info!(
        "Device push from {}",
        params.device_id.as_deref().unwrap_or("unidentified device")
    );

    let push = DevicePush {
        device_id: params.device_id,
        spo2: params.spo2,
        heart_rate: params.heart_rate,
        temp: params.temp,
        ecg_sensor_frame: params.ecg_sensor_frame,
        age: params.age,
        gender: params.gender,
    };

    match state.vitals.record_push(push).await {
        Ok(()) => Ok((StatusCode::OK, Json(AckResponse::ok()))),
        Err(e) => Err(vitals_error_response(e)),
    }
}

/// Fetch the most recent vitals relevant to a profile
#[utoipa::path(
    get,
    path = "/get_vitals",
    params(UsernameParams),
    responses(
        (status = 200, description = "Latest vitals snapshot, or has_vitals=false when nothing has been recorded", body = VitalsResponse),
        (status = 404, description = "Profile not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "vitals"
)]
#[instrument(skip(state))]
pub async fn get_vitals(
    State(state): State<AppState>,
    Query(params): Query<UsernameParams>,
) -> Result<Response, Response> {
    match state.vitals.latest_vitals(&params.username).await {
        Ok(Some(snapshot)) => {
            Ok((StatusCode::OK, Json(snapshot_response(snapshot))).into_response())
        }
        // "No data yet" is a normal answer for a fresh deployment, reported
        // in-band rather than as an error
        Ok(None) => Ok((
            StatusCode::OK,
            Json(NoVitalsResponse { has_vitals: false }),
        )
            .into_response()),
        Err(e) => Err(vitals_error_response(e)),
    }
}
