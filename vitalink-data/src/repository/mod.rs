// Repository module structure
pub mod errors;
mod connections;
mod device_records;
mod profiles;
mod settings;

// Re-export commonly used types
pub use connections::{ConnectionRepository, ConnectionRepositoryTrait};
pub use device_records::{DeviceRecordRepository, DeviceRecordRepositoryTrait};
pub use errors::RepositoryError;
pub use profiles::{ProfileRepository, ProfileRepositoryTrait};
pub use settings::{SettingsRepository, SettingsRepositoryTrait};

// Re-export mock implementations for testing and when the mock feature is enabled
#[cfg(any(test, feature = "mock"))]
pub use connections::tests as connection_mocks;
#[cfg(any(test, feature = "mock"))]
pub use device_records::tests as device_record_mocks;
#[cfg(any(test, feature = "mock"))]
pub use profiles::tests as profile_mocks;
#[cfg(any(test, feature = "mock"))]
pub use settings::tests as settings_mocks;
