use serde::{Deserialize, Serialize};

/// Demographic fallback used when a device push carries no per-user context.
/// Exactly one row of this is expected to exist; the deployment guarantees it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DemographicDefaults {
    /// Default age in years
    pub age: u32,

    /// Default gender category
    pub gender: String,
}
