use serde::{Deserialize, Serialize};
use validator::Validate;

/// Public projection of a user profile. The credential hash never appears
/// here; excluding it is enforced by the type, not by serializer attributes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    /// Unique login name
    pub username: String,

    /// Family name
    pub surname: String,

    /// Given name
    pub first_name: String,

    /// Email address
    pub email: String,

    /// Optional phone number
    pub phone_number: Option<String>,

    /// Optional age in years
    pub age: Option<u32>,

    /// Optional free-form gender string
    pub gender: Option<String>,

    /// Identifier of the linked vitals device
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

/// Input data for creating a new account
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SignupRequest {
    /// Family name
    #[validate(length(min = 1, max = 150, message = "surname must be 1-150 characters"))]
    pub surname: String,

    /// Given name
    #[validate(length(min = 1, max = 150, message = "first name must be 1-150 characters"))]
    pub first_name: String,

    /// Unique login name
    #[validate(length(min = 3, max = 150, message = "username must be 3-150 characters"))]
    pub username: String,

    /// Credential secret; hashed before it reaches storage
    #[validate(length(min = 8, message = "password must be at least 8 characters"))]
    pub password: String,

    /// Unique email address
    #[validate(email(message = "email must be a valid address"))]
    pub email: String,

    /// Optional phone number
    pub phone_number: Option<String>,

    /// Optional age in years
    pub age: Option<u32>,

    /// Optional free-form gender string
    pub gender: Option<String>,
}

/// Partial update of a profile's mutable fields. Absent fields are left
/// unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileUpdate {
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
