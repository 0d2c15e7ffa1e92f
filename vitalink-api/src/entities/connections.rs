use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Query parameters for requesting a monitoring connection
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct CreateConnectionParams {
    /// Login name of the profile being monitored
    pub monitored: String,

    /// Login name of the watching profile
    pub monitored_by: String,

    /// Whether the watcher acts in a professional capacity; defaults to false
    pub is_professional: Option<bool>,
}

/// Query parameters addressing an existing connection by id
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct ConnectionIdParams {
    /// Identifier of the connection
    pub id: i64,
}

/// Query parameters for replacing a connection's data access grants.
/// Absent flags default to false: the full grant set is replaced, not merged.
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct SetPermissionsParams {
    /// Identifier of the connection
    pub id: i64,

    /// Grant access to diet data
    pub access_diet_data: Option<bool>,

    /// Grant access to mental health data
    pub access_mental_health_data: Option<bool>,

    /// Grant access to vital sign data
    pub access_vital_signs_data: Option<bool>,
}

/// One connection edge as seen from a profile's listing
#[derive(Debug, Serialize, ToSchema)]
pub struct ConnectionEdgeResponse {
    /// Identifier of the connection
    pub id: i64,

    /// Login name of the counterpart profile
    pub username: String,

    /// Email address of the counterpart profile
    pub email: String,

    /// Whether the connection has been accepted
    pub accepted: bool,

    /// Whether the watcher acts in a professional capacity
    pub is_professional: bool,

    /// Grant access to diet data
    pub access_diet_data: bool,

    /// Grant access to mental health data
    pub access_mental_health_data: bool,

    /// Grant access to vital sign data
    pub access_vital_signs_data: bool,
}

/// Both directions of a profile's connections
#[derive(Debug, Serialize, ToSchema)]
pub struct ConnectionListResponse {
    /// Profiles this profile watches
    pub monitoring: Vec<ConnectionEdgeResponse>,

    /// Profiles watching this profile
    pub monitored_by: Vec<ConnectionEdgeResponse>,
}
