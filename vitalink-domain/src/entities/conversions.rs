//! Conversions between storage models and domain entities

use vitalink_data::models::profile::ProfileRecord;

use super::profile::{Profile, ProfileUpdate};

/// Project a storage record into the public profile shape, dropping the
/// credential hash.
pub fn profile_from_record(record: ProfileRecord) -> Profile {
    Profile {
        username: record.username,
        surname: record.surname,
        first_name: record.first_name,
        email: record.email,
        phone_number: record.phone_number,
        age: record.age,
        gender: record.gender,
        device_id: record.device_id,
        diet_summary: record.diet_summary,
        mental_health_summary: record.mental_health_summary,
        model_context: record.model_context,
        premium_plan: record.premium_plan,
    }
}

/// Merge a partial update into a storage record. Fields absent from the
/// update keep their stored value.
pub fn apply_profile_update(record: &mut ProfileRecord, update: ProfileUpdate) {
    if let Some(surname) = update.surname {
        record.surname = surname;
    }
    if let Some(first_name) = update.first_name {
        record.first_name = first_name;
    }
    if let Some(email) = update.email {
        record.email = email;
    }
    if let Some(phone_number) = update.phone_number {
        record.phone_number = Some(phone_number);
    }
    if let Some(age) = update.age {
        record.age = Some(age);
    }
    if let Some(gender) = update.gender {
        record.gender = Some(gender);
    }
    if let Some(diet_summary) = update.diet_summary {
        record.diet_summary = Some(diet_summary);
    }
    if let Some(mental_health_summary) = update.mental_health_summary {
        record.mental_health_summary = Some(mental_health_summary);
    }
    if let Some(model_context) = update.model_context {
        record.model_context = Some(model_context);
    }
}
