// Domain entities and value objects
pub mod conversions;
pub mod profile;
pub mod vitals;

// Connection value types are plain data shared with the storage layer
pub use vitalink_data::models::connection::{
    AccessGrants, ConnectionEdge, ConnectionListing, ConnectionRecord, NewConnection,
};

// Re-export common types for easier imports
pub use profile::{Profile, ProfileUpdate, SignupRequest};
pub use vitals::{DevicePush, VitalsSnapshot};
