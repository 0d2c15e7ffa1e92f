use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Query parameters for creating an account
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct SignupParams {
    /// Family name
    pub surname: String,

    /// Given name
    pub first_name: String,

    /// Unique login name
    pub username: String,

    /// Credential secret, hashed server-side before storage
    pub password: String,

    /// Unique email address
    pub email: String,

    /// Optional phone number
    pub phone_number: Option<String>,

    /// Optional age in years
    pub age: Option<u32>,

    /// Optional free-form gender string
    pub gender: Option<String>,
}

/// Query parameters for verifying credentials
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct LoginParams {
    /// Login name
    pub username: String,

    /// Credential secret
    pub password: String,
}

/// Query parameters naming a single profile
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct UsernameParams {
    /// Login name of the profile
    pub username: String,
}

/// Query parameters for a partial profile update. Absent fields are left
/// unchanged.
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct UpdateProfileParams {
    /// Login name of the profile to update
    pub username: String,

    /// Family name
    pub surname: Option<String>,

    /// Given name
    pub first_name: Option<String>,

    /// Email address
    pub email: Option<String>,

    /// Phone number
    pub phone_number: Option<String>,

    /// Age in years
    pub age: Option<u32>,

    /// Free-form gender string
    pub gender: Option<String>,

    /// Free-text diet summary
    pub diet_summary: Option<String>,

    /// Free-text mental health summary
    pub mental_health_summary: Option<String>,

    /// Free-text assistant context
    pub model_context: Option<String>,
}

/// Query parameters for linking a vitals device to a profile
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct SetDeviceParams {
    /// Login name of the profile
    pub username: String,

    /// Identifier of the device to link
    pub device_id: String,
}

/// Query parameters for switching a profile's plan
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct SetPremiumParams {
    /// Login name of the profile
    pub username: String,

    /// Target plan flag
    pub value: bool,
}

/// Public view of a user profile
#[derive(Debug, Serialize, ToSchema)]
pub struct ProfileResponse {
    /// Unique login name
    pub username: String,

    /// Family name
    pub surname: String,

    /// Given name
    pub first_name: String,

    /// Email address
    pub email: String,

    /// Optional phone number
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,

    /// Optional age in years
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,

    /// Optional free-form gender string
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,

    /// Identifier of the linked vitals device
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_id: Option<String>,

    /// Optional free-text diet summary
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diet_summary: Option<String>,

    /// Optional free-text mental health summary
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mental_health_summary: Option<String>,

    /// Optional free-text assistant context
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_context: Option<String>,

    /// Whether the account is on the premium plan
    pub premium_plan: bool,
}

/// Login verdict
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    /// Whether the supplied credentials were accepted
    pub success: bool,
}

/// Reply to a boolean profile query
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FlagResponse {
    /// Value of the queried flag
    pub value: bool,
}
