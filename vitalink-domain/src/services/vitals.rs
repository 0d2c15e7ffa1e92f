//! Device record ingestion and latest-vitals retrieval.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{debug, warn};
use uuid::Uuid;

use vitalink_data::models::device_record::DeviceRecord;
use vitalink_data::repository::{
    DeviceRecordRepositoryTrait, ProfileRepositoryTrait, RepositoryError, SettingsRepositoryTrait,
};

use crate::entities::{DevicePush, VitalsSnapshot};
use crate::services::alerts::{classify_vitals, HEALTHY_MESSAGE};
use crate::services::estimator::{encode_gender, BpEstimator, EstimatorInput};

/// Environment variable overriding the freshness threshold
pub const FRESHNESS_ENV: &str = "VITALS_FRESHNESS_SECONDS";

/// Default freshness threshold in seconds
pub const DEFAULT_FRESHNESS_SECONDS: i64 = 7;

/// Vitals service errors
#[derive(Debug, Error)]
pub enum VitalsServiceError {
    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Not found error
    #[error("Not found: {0}")]
    NotFound(String),

    /// A deployment precondition does not hold
    #[error("Precondition failed: {0}")]
    Precondition(String),

    /// Repository error
    #[error("Repository error: {0}")]
    Repository(String),
}

/// Trait for vitals ingestion and retrieval operations
#[async_trait]
pub trait VitalsServiceTrait: Send + Sync {
    /// Ingest one device sample: derive a blood-pressure estimate, stamp the
    /// sample with a server-side id and timestamp, and append it to the log.
    async fn record_push(&self, push: DevicePush) -> Result<(), VitalsServiceError>;

    /// The most recent sample relevant to a profile, with freshness and
    /// alert classification attached. `Ok(None)` when no sample exists yet.
    async fn latest_vitals(
        &self,
        username: &str,
    ) -> Result<Option<VitalsSnapshot>, VitalsServiceError>;
}

/// Vitals service over the device record log
pub struct VitalsService<R, P, S>
where
    R: DeviceRecordRepositoryTrait,
    P: ProfileRepositoryTrait,
    S: SettingsRepositoryTrait,
{
    records: R,
    profiles: P,
    settings: S,
    estimator: Arc<dyn BpEstimator>,
    freshness_seconds: i64,
}

impl<R, P, S> VitalsService<R, P, S>
where
    R: DeviceRecordRepositoryTrait,
    P: ProfileRepositoryTrait,
    S: SettingsRepositoryTrait,
{
    /// Create a new vitals service with an explicit freshness threshold
    pub fn new(
        records: R,
        profiles: P,
        settings: S,
        estimator: Arc<dyn BpEstimator>,
        freshness_seconds: i64,
    ) -> Self {
        Self {
            records,
            profiles,
            settings,
            estimator,
            freshness_seconds,
        }
    }

    /// Create a new vitals service with the freshness threshold taken from
    /// the environment
    pub fn from_env(records: R, profiles: P, settings: S, estimator: Arc<dyn BpEstimator>) -> Self {
        let freshness_seconds = std::env::var(FRESHNESS_ENV)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_FRESHNESS_SECONDS);
        Self::new(records, profiles, settings, estimator, freshness_seconds)
    }

    /// Map repository errors to service errors
    fn map_repo_error(&self, err: RepositoryError) -> VitalsServiceError {
        match err {
            RepositoryError::NotFound(msg) => VitalsServiceError::NotFound(msg),
            RepositoryError::Validation(msg) => VitalsServiceError::Validation(msg),
            RepositoryError::Precondition(msg) => VitalsServiceError::Precondition(msg),
            _ => VitalsServiceError::Repository(err.to_string()),
        }
    }

    /// Resolve the demographic inputs for estimation. The settings singleton
    /// is only consulted when the push itself left age or gender out.
    async fn resolve_demographics(
        &self,
        push: &DevicePush,
    ) -> Result<(u32, f64), VitalsServiceError> {
        if let (Some(age), Some(gender)) = (push.age, push.gender.as_deref()) {
            return Ok((age, encode_gender(gender)));
        }

        let defaults = self
            .settings
            .demographic_defaults()
            .await
            .map_err(|e| self.map_repo_error(e))?;

        let age = push.age.unwrap_or(defaults.age);
        let gender_code = match push.gender.as_deref() {
            Some(gender) => encode_gender(gender),
            None => encode_gender(&defaults.gender),
        };
        Ok((age, gender_code))
    }
}

#[async_trait]
impl<R, P, S> VitalsServiceTrait for VitalsService<R, P, S>
where
    R: DeviceRecordRepositoryTrait + Send + Sync,
    P: ProfileRepositoryTrait + Send + Sync,
    S: SettingsRepositoryTrait + Send + Sync,
{
    async fn record_push(&self, push: DevicePush) -> Result<(), VitalsServiceError> {
        let (age, gender_code) = self.resolve_demographics(&push).await?;

        let estimate = self.estimator.estimate(&EstimatorInput {
            age,
            gender_code,
            spo2: push.spo2,
            heart_rate: push.heart_rate,
            temp: push.temp,
        });

        let record = DeviceRecord {
            id: Uuid::new_v4().to_string(),
            device_id: push.device_id,
            timestamp: Utc::now().to_rfc3339(),
            temp: Some(push.temp),
            heart_rate: Some(push.heart_rate),
            blood_oxygen: Some(push.spo2),
            sbp: Some(estimate.systolic),
            dbp: Some(estimate.diastolic),
            ecg_sensor_frame: push.ecg_sensor_frame,
        };

        debug!("Recording device push: {}", record.id);

        self.records
            .insert(record)
            .await
            .map_err(|e| self.map_repo_error(e))
    }

    async fn latest_vitals(
        &self,
        username: &str,
    ) -> Result<Option<VitalsSnapshot>, VitalsServiceError> {
        let profile = self
            .profiles
            .find_by_username(username)
            .await
            .map_err(|e| self.map_repo_error(e))?
            .ok_or_else(|| {
                VitalsServiceError::NotFound(format!("no profile for {}", username))
            })?;

        // Prefer the profile's own device; fall back to the newest sample
        // from any device when the profile has none or its device has not
        // reported yet.
        let record = match profile.device_id.as_deref() {
            Some(device_id) if !device_id.is_empty() => {
                match self
                    .records
                    .latest_for_device(device_id)
                    .await
                    .map_err(|e| self.map_repo_error(e))?
                {
                    Some(record) => Some(record),
                    None => self
                        .records
                        .latest()
                        .await
                        .map_err(|e| self.map_repo_error(e))?,
                }
            }
            _ => self
                .records
                .latest()
                .await
                .map_err(|e| self.map_repo_error(e))?,
        };

        let Some(record) = record else {
            return Ok(None);
        };

        let time_diff_seconds = match DateTime::parse_from_rfc3339(&record.timestamp) {
            Ok(recorded) => (Utc::now() - recorded.with_timezone(&Utc))
                .num_seconds()
                .max(0),
            Err(e) => {
                warn!(
                    "Unparsable timestamp on device record {}: {}",
                    record.id, e
                );
                return Err(VitalsServiceError::Repository(format!(
                    "device record {} carries an invalid timestamp",
                    record.id
                )));
            }
        };

        let alert = match (record.blood_oxygen, record.heart_rate, record.temp) {
            (Some(spo2), Some(heart_rate), Some(temp)) => {
                classify_vitals(spo2, heart_rate, temp)
            }
            _ => HEALTHY_MESSAGE.to_string(),
        };

        Ok(Some(VitalsSnapshot {
            temp: record.temp,
            heart_rate: record.heart_rate,
            blood_oxygen: record.blood_oxygen,
            sbp: record.sbp,
            dbp: record.dbp,
            ecg_sensor_frame: record.ecg_sensor_frame,
            time_diff_seconds,
            online: time_diff_seconds < self.freshness_seconds,
            alert,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vitalink_data::models::profile::NewProfile;
    use vitalink_data::models::settings::DemographicDefaults;
    use vitalink_data::repository::device_record_mocks::MockDeviceRecordRepository;
    use vitalink_data::repository::profile_mocks::MockProfileRepository;
    use vitalink_data::repository::settings_mocks::MockSettingsRepository;
    use vitalink_data::repository::ProfileRepositoryTrait;

    use crate::services::estimator::{BpEstimate, BpEstimator};

    /// Deterministic estimator for assertions
    struct FixedEstimator;

    impl BpEstimator for FixedEstimator {
        fn estimate(&self, _input: &EstimatorInput) -> BpEstimate {
            BpEstimate {
                systolic: 120,
                diastolic: 80,
            }
        }
    }

    /// Estimator that records the inputs it was handed
    struct CapturingEstimator {
        seen: std::sync::Mutex<Vec<EstimatorInput>>,
    }

    impl CapturingEstimator {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                seen: std::sync::Mutex::new(Vec::new()),
            })
        }
    }

    impl BpEstimator for CapturingEstimator {
        fn estimate(&self, input: &EstimatorInput) -> BpEstimate {
            self.seen.lock().unwrap().push(input.clone());
            BpEstimate {
                systolic: 120,
                diastolic: 80,
            }
        }
    }

    fn push(device_id: Option<&str>) -> DevicePush {
        DevicePush {
            device_id: device_id.map(str::to_string),
            spo2: 97.5,
            heart_rate: 72,
            temp: 36.6,
            ecg_sensor_frame: Some("frame-data".to_string()),
            age: Some(40),
            gender: Some("female".to_string()),
        }
    }

    async fn profiles_with(username: &str, device_id: Option<&str>) -> MockProfileRepository {
        let profiles = MockProfileRepository::new();
        let record = profiles
            .create(NewProfile {
                surname: "Test".to_string(),
                first_name: username.to_string(),
                username: username.to_string(),
                password_hash: "$argon2id$test".to_string(),
                email: format!("{}@example.com", username),
                phone_number: None,
                age: None,
                gender: None,
            })
            .await
            .unwrap();
        if let Some(device_id) = device_id {
            let mut updated = record;
            updated.device_id = Some(device_id.to_string());
            profiles.update(&updated).await.unwrap();
        }
        profiles
    }

    fn service(
        records: MockDeviceRecordRepository,
        profiles: MockProfileRepository,
        settings: MockSettingsRepository,
    ) -> VitalsService<MockDeviceRecordRepository, MockProfileRepository, MockSettingsRepository>
    {
        VitalsService::new(records, profiles, settings, Arc::new(FixedEstimator), 7)
    }

    #[tokio::test]
    async fn push_then_pull_round_trips_the_sample() {
        let records = MockDeviceRecordRepository::new();
        let profiles = profiles_with("alice", Some("dev-1")).await;
        let svc = service(records, profiles, MockSettingsRepository::new());

        svc.record_push(push(Some("dev-1"))).await.unwrap();

        let snapshot = svc.latest_vitals("alice").await.unwrap().unwrap();
        assert_eq!(snapshot.temp, Some(36.6));
        assert_eq!(snapshot.heart_rate, Some(72));
        assert_eq!(snapshot.blood_oxygen, Some(97.5));
        assert_eq!(snapshot.sbp, Some(120));
        assert_eq!(snapshot.dbp, Some(80));
        assert_eq!(snapshot.ecg_sensor_frame.as_deref(), Some("frame-data"));
        // Just written, so it is fresh
        assert!(snapshot.time_diff_seconds < 2);
        assert!(snapshot.online);
        assert_eq!(snapshot.alert, HEALTHY_MESSAGE);
    }

    #[tokio::test]
    async fn no_records_yields_none() {
        let profiles = profiles_with("alice", None).await;
        let svc = service(
            MockDeviceRecordRepository::new(),
            profiles,
            MockSettingsRepository::new(),
        );

        assert!(svc.latest_vitals("alice").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn unknown_profile_is_not_found() {
        let svc = service(
            MockDeviceRecordRepository::new(),
            MockProfileRepository::new(),
            MockSettingsRepository::new(),
        );

        assert!(matches!(
            svc.latest_vitals("ghost").await,
            Err(VitalsServiceError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn retrieval_is_scoped_to_the_profiles_device() {
        let records = MockDeviceRecordRepository::new();
        let profiles = profiles_with("alice", Some("dev-1")).await;
        let svc = service(records, profiles, MockSettingsRepository::new());

        svc.record_push(push(Some("dev-1"))).await.unwrap();
        let mut other = push(Some("dev-2"));
        other.temp = 39.5;
        svc.record_push(other).await.unwrap();

        // dev-2 reported later, but alice's snapshot comes from dev-1
        let snapshot = svc.latest_vitals("alice").await.unwrap().unwrap();
        assert_eq!(snapshot.temp, Some(36.6));
    }

    #[tokio::test]
    async fn profile_without_device_falls_back_to_newest_sample() {
        let records = MockDeviceRecordRepository::new();
        let profiles = profiles_with("alice", None).await;
        let svc = service(records, profiles, MockSettingsRepository::new());

        svc.record_push(push(Some("dev-2"))).await.unwrap();

        assert!(svc.latest_vitals("alice").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn missing_demographics_fall_back_to_settings() {
        let estimator = CapturingEstimator::new();
        let svc = VitalsService::new(
            MockDeviceRecordRepository::new(),
            MockProfileRepository::new(),
            MockSettingsRepository::with_defaults(DemographicDefaults {
                age: 52,
                gender: "male".to_string(),
            }),
            estimator.clone(),
            7,
        );

        let mut sample = push(None);
        sample.age = None;
        sample.gender = None;
        svc.record_push(sample).await.unwrap();

        let seen = estimator.seen.lock().unwrap();
        assert_eq!(seen[0].age, 52);
        assert_eq!(seen[0].gender_code, encode_gender("male"));
    }

    #[tokio::test]
    async fn missing_settings_singleton_is_a_precondition_failure() {
        let svc = service(
            MockDeviceRecordRepository::new(),
            MockProfileRepository::new(),
            MockSettingsRepository::new(),
        );

        let mut sample = push(None);
        sample.age = None;
        sample.gender = None;

        assert!(matches!(
            svc.record_push(sample).await,
            Err(VitalsServiceError::Precondition(_))
        ));
    }

    #[tokio::test]
    async fn complete_demographics_skip_the_settings_lookup() {
        // Settings left unconfigured on purpose; a fully-specified push must
        // not touch them
        let svc = service(
            MockDeviceRecordRepository::new(),
            MockProfileRepository::new(),
            MockSettingsRepository::new(),
        );

        svc.record_push(push(None)).await.unwrap();
    }

    #[tokio::test]
    async fn stale_sample_is_reported_offline() {
        let records = MockDeviceRecordRepository::new();
        records
            .insert(DeviceRecord {
                id: "old".to_string(),
                device_id: None,
                timestamp: (Utc::now() - chrono::Duration::seconds(600)).to_rfc3339(),
                temp: Some(36.6),
                heart_rate: Some(72),
                blood_oxygen: Some(97.0),
                sbp: Some(118),
                dbp: Some(76),
                ecg_sensor_frame: None,
            })
            .await
            .unwrap();

        let profiles = profiles_with("alice", None).await;
        let svc = service(records, profiles, MockSettingsRepository::new());

        let snapshot = svc.latest_vitals("alice").await.unwrap().unwrap();
        assert!(snapshot.time_diff_seconds >= 600);
        assert!(!snapshot.online);
    }

    #[tokio::test]
    async fn abnormal_sample_carries_an_alert() {
        let records = MockDeviceRecordRepository::new();
        let profiles = profiles_with("alice", None).await;
        let svc = service(records, profiles, MockSettingsRepository::new());

        let mut sample = push(None);
        sample.heart_rate = 120;
        svc.record_push(sample).await.unwrap();

        let snapshot = svc.latest_vitals("alice").await.unwrap().unwrap();
        assert!(snapshot.alert.contains("tachycardia"));
    }
}
