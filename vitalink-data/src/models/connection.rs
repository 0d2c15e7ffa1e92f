use serde::{Deserialize, Serialize};

/// Per-connection data access grants. A connection carries no access to the
/// monitored profile's data until a grant is set explicitly, independent of
/// whether the connection has been accepted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessGrants {
    /// Observer may read diet summaries
    pub access_diet_data: bool,

    /// Observer may read mental health summaries
    pub access_mental_health_data: bool,

    /// Observer may read vital-sign records
    pub access_vital_signs_data: bool,
}

/// Storage model for a monitoring connection between two profiles
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionRecord {
    /// Auto-incrementing identifier
    pub id: i64,

    /// Profile id of the subject being observed
    pub monitored_id: String,

    /// Profile id of the observer/caregiver
    pub monitored_by_id: String,

    /// Whether the monitored profile has accepted the connection
    pub accepted: bool,

    /// Whether the observer is a healthcare professional
    pub is_professional: bool,

    /// Data access grants for the observer
    pub grants: AccessGrants,
}

/// Input data for creating a new connection edge
#[derive(Debug, Clone)]
pub struct NewConnection {
    /// Profile id of the subject being observed
    pub monitored_id: String,

    /// Profile id of the observer/caregiver
    pub monitored_by_id: String,

    /// Whether the observer is a healthcare professional
    pub is_professional: bool,
}

/// One edge as seen from a given profile, joined with the counterpart's
/// public identity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionEdge {
    /// Connection identifier
    pub id: i64,

    /// Username of the profile on the other end of the edge
    pub username: String,

    /// Email of the profile on the other end of the edge
    pub email: String,

    /// Whether the connection has been accepted
    pub accepted: bool,

    /// Whether the observer is a healthcare professional
    pub is_professional: bool,

    /// Data access grants carried by the edge
    pub grants: AccessGrants,
}

/// Both directions of a profile's connections
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConnectionListing {
    /// Edges where the profile is the observer (who they watch)
    pub monitoring: Vec<ConnectionEdge>,

    /// Edges where the profile is the subject (who is watching them)
    pub monitored_by: Vec<ConnectionEdge>,
}
