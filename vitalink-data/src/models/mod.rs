// Storage models for the VitaLink data layer
pub mod connection;
pub mod device_record;
pub mod profile;
pub mod settings;

// Re-export common types for easier imports
pub use connection::{AccessGrants, ConnectionEdge, ConnectionListing, ConnectionRecord, NewConnection};
pub use device_record::DeviceRecord;
pub use profile::{NewProfile, ProfileRecord};
pub use settings::DemographicDefaults;
