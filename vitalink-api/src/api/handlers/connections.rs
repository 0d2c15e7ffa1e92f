use axum::{
    extract::{Json, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::{error, info, instrument, warn};

use vitalink_domain::entities::{AccessGrants, ConnectionEdge, ConnectionListing};
use vitalink_domain::services::ConnectionServiceError;

use crate::api::routes::AppState;
use crate::entities::common::AckResponse;
use crate::entities::connections::{
    ConnectionEdgeResponse, ConnectionIdParams, ConnectionListResponse, CreateConnectionParams,
    SetPermissionsParams,
};
use crate::entities::accounts::UsernameParams;

use super::ErrorResponse;

fn connection_error_response(err: ConnectionServiceError) -> Response {
    match err {
        ConnectionServiceError::NotFound(_) => {
            ErrorResponse::not_found("connection").into_response()
        }
        ConnectionServiceError::Validation(message) => {
            warn!("Rejected connection request: {}", message);
            ErrorResponse::validation_error(&message, None).into_response()
        }
        e => {
            error!("Connection service error: {}", e);
            ErrorResponse::internal_error().into_response()
        }
    }
}

fn edge_response(edge: ConnectionEdge) -> ConnectionEdgeResponse {
    ConnectionEdgeResponse {
        id: edge.id,
        username: edge.username,
        email: edge.email,
        accepted: edge.accepted,
        is_professional: edge.is_professional,
        access_diet_data: edge.grants.access_diet_data,
        access_mental_health_data: edge.grants.access_mental_health_data,
        access_vital_signs_data: edge.grants.access_vital_signs_data,
    }
}

fn listing_response(listing: ConnectionListing) -> ConnectionListResponse {
    ConnectionListResponse {
        monitoring: listing.monitoring.into_iter().map(edge_response).collect(),
        monitored_by: listing
            .monitored_by
            .into_iter()
            .map(edge_response)
            .collect(),
    }
}

/// Request a monitoring connection between two profiles
#[utoipa::path(
    get,
    path = "/create_connection",
    params(CreateConnectionParams),
    responses(
        (status = 200, description = "Connection created, or refused with success=false when the pair already exists", body = AckResponse),
        (status = 400, description = "Invalid connection request", body = ErrorResponse),
        (status = 404, description = "A named profile does not exist", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "connections"
)]
#[instrument(skip(state))]
pub async fn create_connection(
    State(state): State<AppState>,
    Query(params): Query<CreateConnectionParams>,
) -> Result<impl IntoResponse, Response> {
    info!(
        "Connection requested: {} monitored by {}",
        params.monitored, params.monitored_by
    );

    match state
        .connections
        .create_connection(
            &params.monitored,
            &params.monitored_by,
            params.is_professional.unwrap_or(false),
        )
        .await
    {
        Ok(true) => Ok((StatusCode::OK, Json(AckResponse::ok()))),
        Ok(false) => Ok((
            StatusCode::OK,
            Json(AckResponse::refused("connection already exists")),
        )),
        Err(e) => Err(connection_error_response(e)),
    }
}

/// List both directions of a profile's connections
#[utoipa::path(
    get,
    path = "/get_connections",
    params(UsernameParams),
    responses(
        (status = 200, description = "Connection listing", body = ConnectionListResponse),
        (status = 404, description = "Profile not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "connections"
)]
#[instrument(skip(state))]
pub async fn get_connections(
    State(state): State<AppState>,
    Query(params): Query<UsernameParams>,
) -> Result<impl IntoResponse, Response> {
    match state.connections.get_connections(&params.username).await {
        Ok(listing) => Ok((StatusCode::OK, Json(listing_response(listing)))),
        Err(e) => Err(connection_error_response(e)),
    }
}

/// List a profile's not-yet-accepted connections
#[utoipa::path(
    get,
    path = "/get_pending_connections",
    params(UsernameParams),
    responses(
        (status = 200, description = "Pending connection listing", body = ConnectionListResponse),
        (status = 404, description = "Profile not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "connections"
)]
#[instrument(skip(state))]
pub async fn get_pending_connections(
    State(state): State<AppState>,
    Query(params): Query<UsernameParams>,
) -> Result<impl IntoResponse, Response> {
    match state
        .connections
        .get_pending_connections(&params.username)
        .await
    {
        Ok(listing) => Ok((StatusCode::OK, Json(listing_response(listing)))),
        Err(e) => Err(connection_error_response(e)),
    }
}

/// Accept a pending connection
#[utoipa::path(
    get,
    path = "/accept_connection",
    params(ConnectionIdParams),
    responses(
        (status = 200, description = "Connection accepted", body = AckResponse),
        (status = 404, description = "Connection not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "connections"
)]
#[instrument(skip(state))]
pub async fn accept_connection(
    State(state): State<AppState>,
    Query(params): Query<ConnectionIdParams>,
) -> Result<impl IntoResponse, Response> {
    match state.connections.accept_connection(params.id).await {
        Ok(()) => Ok((StatusCode::OK, Json(AckResponse::ok()))),
        Err(e) => Err(connection_error_response(e)),
    }
}

/// Delete a connection
#[utoipa::path(
    get,
    path = "/cancel_connection",
    params(ConnectionIdParams),
    responses(
        (status = 200, description = "Connection deleted", body = AckResponse),
        (status = 404, description = "Connection not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "connections"
)]
#[instrument(skip(state))]
pub async fn cancel_connection(
    State(state): State<AppState>,
    Query(params): Query<ConnectionIdParams>,
) -> Result<impl IntoResponse, Response> {
    match state.connections.cancel_connection(params.id).await {
        Ok(()) => Ok((StatusCode::OK, Json(AckResponse::ok()))),
        Err(e) => Err(connection_error_response(e)),
    }
}

/// Replace a connection's data access grants
#[utoipa::path(
    get,
    path = "/set_connection_permissions",
    params(SetPermissionsParams),
    responses(
        (status = 200, description = "Grants replaced", body = AckResponse),
        (status = 404, description = "Connection not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "connections"
)]
#[instrument(skip(state))]
pub async fn set_connection_permissions(
    State(state): State<AppState>,
    Query(params): Query<SetPermissionsParams>,
) -> Result<impl IntoResponse, Response> {
    let grants = AccessGrants {
        access_diet_data: params.access_diet_data.unwrap_or(false),
        access_mental_health_data: params.access_mental_health_data.unwrap_or(false),
        access_vital_signs_data: params.access_vital_signs_data.unwrap_or(false),
    };

    match state.connections.set_permissions(params.id, grants).await {
        Ok(()) => Ok((StatusCode::OK, Json(AckResponse::ok()))),
        Err(e) => Err(connection_error_response(e)),
    }
}
