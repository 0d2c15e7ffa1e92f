use async_trait::async_trait;
use tracing::debug;

use crate::database::get_db_pool;
use crate::models::settings::DemographicDefaults;
use super::errors::RepositoryError;

/// Repository trait for deployment settings
#[async_trait]
pub trait SettingsRepositoryTrait {
    /// Read the demographic defaults singleton. Exactly one row must exist;
    /// zero rows and multiple rows are both precondition violations and fail
    /// loudly rather than picking an arbitrary row.
    async fn demographic_defaults(&self) -> Result<DemographicDefaults, RepositoryError>;

    /// Seed the demographic defaults row. Intended for deployment setup and
    /// tests; does not guard against inserting a second row.
    async fn put_demographic_defaults(
        &self,
        defaults: DemographicDefaults,
    ) -> Result<(), RepositoryError>;
}

/// SQLite-backed repository for deployment settings
#[derive(Debug, Clone, Default)]
pub struct SettingsRepository;

impl SettingsRepository {
    /// Create a new repository
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl SettingsRepositoryTrait for SettingsRepository {
    async fn demographic_defaults(&self) -> Result<DemographicDefaults, RepositoryError> {
        let pool = get_db_pool()?;
        let conn = pool.conn()?;

        let count: i64 =
            conn.query_row("SELECT COUNT(*) FROM demographic_defaults", [], |row| row.get(0))?;

        match count {
            0 => Err(RepositoryError::Precondition(
                "demographic defaults are not configured".to_string(),
            )),
            1 => {
                let defaults = conn.query_row(
                    "SELECT age, gender FROM demographic_defaults",
                    [],
                    |row| {
                        Ok(DemographicDefaults {
                            age: row.get::<_, i64>(0)? as u32,
                            gender: row.get(1)?,
                        })
                    },
                )?;
                Ok(defaults)
            }
            n => Err(RepositoryError::Precondition(format!(
                "expected exactly one demographic defaults row, found {}",
                n
            ))),
        }
    }

    async fn put_demographic_defaults(
        &self,
        defaults: DemographicDefaults,
    ) -> Result<(), RepositoryError> {
        let pool = get_db_pool()?;
        let conn = pool.conn()?;

        debug!("Seeding demographic defaults: age={}", defaults.age);

        conn.execute(
            "INSERT INTO demographic_defaults (age, gender) VALUES (?1, ?2)",
            rusqlite::params![defaults.age as i64, defaults.gender],
        )?;

        Ok(())
    }
}

/// Mock settings repository for testing
#[cfg(any(test, feature = "mock"))]
pub mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// In-memory implementation of `SettingsRepositoryTrait` for tests.
    /// Stores every inserted row so the multiple-row precondition path is
    /// exercisable.
    #[derive(Debug, Clone, Default)]
    pub struct MockSettingsRepository {
        rows: Arc<Mutex<Vec<DemographicDefaults>>>,
    }

    impl MockSettingsRepository {
        /// Create a new empty mock repository
        pub fn new() -> Self {
            Self::default()
        }

        /// Create a mock repository holding a single configured row
        pub fn with_defaults(defaults: DemographicDefaults) -> Self {
            Self {
                rows: Arc::new(Mutex::new(vec![defaults])),
            }
        }
    }

    #[async_trait]
    impl SettingsRepositoryTrait for MockSettingsRepository {
        async fn demographic_defaults(&self) -> Result<DemographicDefaults, RepositoryError> {
            let rows = self.rows.lock()?;
            match rows.len() {
                0 => Err(RepositoryError::Precondition(
                    "demographic defaults are not configured".to_string(),
                )),
                1 => Ok(rows[0].clone()),
                n => Err(RepositoryError::Precondition(format!(
                    "expected exactly one demographic defaults row, found {}",
                    n
                ))),
            }
        }

        async fn put_demographic_defaults(
            &self,
            defaults: DemographicDefaults,
        ) -> Result<(), RepositoryError> {
            let mut rows = self.rows.lock()?;
            rows.push(defaults);
            Ok(())
        }
    }

    #[cfg(test)]
    mod unit {
        use super::*;

        #[tokio::test]
        async fn seeded_defaults_round_trip() {
            let repo = MockSettingsRepository::new();
            repo.put_demographic_defaults(DemographicDefaults {
                age: 48,
                gender: "female".to_string(),
            })
            .await
            .unwrap();

            let defaults = repo.demographic_defaults().await.unwrap();
            assert_eq!(defaults.age, 48);
            assert_eq!(defaults.gender, "female");
        }

        #[tokio::test]
        async fn multiple_defaults_rows_fail_loudly() {
            let repo = MockSettingsRepository::new();
            for gender in ["female", "male"] {
                repo.put_demographic_defaults(DemographicDefaults {
                    age: 50,
                    gender: gender.to_string(),
                })
                .await
                .unwrap();
            }

            let err = repo.demographic_defaults().await.unwrap_err();
            assert!(matches!(err, RepositoryError::Precondition(_)));
        }
    }
}
