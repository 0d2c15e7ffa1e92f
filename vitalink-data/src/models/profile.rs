use serde::{Deserialize, Serialize};

/// Storage model for a user profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileRecord {
    /// Unique identifier for the profile
    pub id: String,

    /// Family name
    pub surname: String,

    /// Given name
    pub first_name: String,

    /// Unique login name
    pub username: String,

    /// Salted Argon2id hash of the credential secret (PHC string).
    /// Never leaves the data/domain layers.
    pub password_hash: String,

    /// Unique email address
    pub email: String,

    /// Optional phone number
    pub phone_number: Option<String>,

    /// Optional age in years
    pub age: Option<u32>,

    /// Optional free-form gender string
    pub gender: Option<String>,

    /// Identifier of the linked vitals device; absent or empty means "no device"
    pub device_id: Option<String>,

    /// Optional free-text diet summary
    pub diet_summary: Option<String>,

    /// Optional free-text mental health summary
    pub mental_health_summary: Option<String>,

    /// Optional free-text assistant context
    pub model_context: Option<String>,

    /// Whether the account is on the premium plan
    pub premium_plan: bool,
}

/// Input data for creating a new profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewProfile {
    /// Family name
    pub surname: String,

    /// Given name
    pub first_name: String,

    /// Unique login name
    pub username: String,

    /// Pre-hashed credential secret (the domain layer hashes before storing)
    pub password_hash: String,

    /// Unique email address
    pub email: String,

    /// Optional phone number
    pub phone_number: Option<String>,

    /// Optional age in years
    pub age: Option<u32>,

    /// Optional free-form gender string
    pub gender: Option<String>,
}
