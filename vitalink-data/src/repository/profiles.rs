use async_trait::async_trait;
use tracing::debug;
use uuid::Uuid;

use crate::database::get_db_pool;
use crate::models::profile::{NewProfile, ProfileRecord};
use super::errors::{map_sqlite_error, RepositoryError};

/// Repository trait for user profiles
#[async_trait]
pub trait ProfileRepositoryTrait {
    /// Create a new profile. Fails with `Conflict` when the username or email
    /// is already taken; the store's unique constraints are the source of
    /// truth, not a preceding existence check.
    async fn create(&self, profile: NewProfile) -> Result<ProfileRecord, RepositoryError>;

    /// Look up a profile by username
    async fn find_by_username(&self, username: &str)
        -> Result<Option<ProfileRecord>, RepositoryError>;

    /// List all profiles
    async fn list(&self) -> Result<Vec<ProfileRecord>, RepositoryError>;

    /// Persist the mutable fields of an existing profile.
    /// Fails with `NotFound` when no row has the record's id.
    async fn update(&self, record: &ProfileRecord) -> Result<(), RepositoryError>;
}

/// SQLite-backed repository for user profiles
#[derive(Debug, Clone, Default)]
pub struct ProfileRepository;

impl ProfileRepository {
    /// Create a new repository
    pub fn new() -> Self {
        Self
    }
}

const PROFILE_COLUMNS: &str = "id, surname, first_name, username, password_hash, email, \
     phone_number, age, gender, device_id, diet_summary, mental_health_summary, \
     model_context, premium_plan";

fn map_profile_row(row: &rusqlite::Row<'_>) -> Result<ProfileRecord, rusqlite::Error> {
    Ok(ProfileRecord {
        id: row.get(0)?,
        surname: row.get(1)?,
        first_name: row.get(2)?,
        username: row.get(3)?,
        password_hash: row.get(4)?,
        email: row.get(5)?,
        phone_number: row.get(6)?,
        age: row.get::<_, Option<i64>>(7)?.map(|a| a as u32),
        gender: row.get(8)?,
        device_id: row.get(9)?,
        diet_summary: row.get(10)?,
        mental_health_summary: row.get(11)?,
        model_context: row.get(12)?,
        premium_plan: row.get::<_, i64>(13)? != 0,
    })
}

#[async_trait]
impl ProfileRepositoryTrait for ProfileRepository {
    async fn create(&self, profile: NewProfile) -> Result<ProfileRecord, RepositoryError> {
        let pool = get_db_pool()?;
        let conn = pool.conn()?;

        let record = ProfileRecord {
            id: Uuid::new_v4().to_string(),
            surname: profile.surname,
            first_name: profile.first_name,
            username: profile.username,
            password_hash: profile.password_hash,
            email: profile.email,
            phone_number: profile.phone_number,
            age: profile.age,
            gender: profile.gender,
            device_id: None,
            diet_summary: None,
            mental_health_summary: None,
            model_context: None,
            premium_plan: false,
        };

        debug!("Storing profile in database: {}", record.id);

        conn.execute(
            "INSERT INTO user_profiles
             (id, surname, first_name, username, password_hash, email, phone_number, age, gender,
              device_id, diet_summary, mental_health_summary, model_context, premium_plan)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
            rusqlite::params![
                record.id,
                record.surname,
                record.first_name,
                record.username,
                record.password_hash,
                record.email,
                record.phone_number,
                record.age.map(|a| a as i64),
                record.gender,
                record.device_id,
                record.diet_summary,
                record.mental_health_summary,
                record.model_context,
                record.premium_plan as i64,
            ],
        )
        .map_err(|e| map_sqlite_error(e, "username or email already registered"))?;

        Ok(record)
    }

    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<ProfileRecord>, RepositoryError> {
        let pool = get_db_pool()?;
        let conn = pool.conn()?;

        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM user_profiles WHERE username = ?1",
            PROFILE_COLUMNS
        ))?;

        match stmt.query_row([username], map_profile_row) {
            Ok(record) => Ok(Some(record)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(RepositoryError::Sqlite(e)),
        }
    }

    async fn list(&self) -> Result<Vec<ProfileRecord>, RepositoryError> {
        let pool = get_db_pool()?;
        let conn = pool.conn()?;

        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM user_profiles ORDER BY username",
            PROFILE_COLUMNS
        ))?;

        let rows = stmt.query_map([], map_profile_row)?;

        let mut result = Vec::new();
        for record in rows {
            result.push(record?);
        }

        Ok(result)
    }

    async fn update(&self, record: &ProfileRecord) -> Result<(), RepositoryError> {
        let pool = get_db_pool()?;
        let conn = pool.conn()?;

        debug!("Updating profile in database: {}", record.id);

        let changed = conn
            .execute(
                "UPDATE user_profiles SET
                 surname = ?2, first_name = ?3, email = ?4, phone_number = ?5, age = ?6,
                 gender = ?7, device_id = ?8, diet_summary = ?9, mental_health_summary = ?10,
                 model_context = ?11, premium_plan = ?12
                 WHERE id = ?1",
                rusqlite::params![
                    record.id,
                    record.surname,
                    record.first_name,
                    record.email,
                    record.phone_number,
                    record.age.map(|a| a as i64),
                    record.gender,
                    record.device_id,
                    record.diet_summary,
                    record.mental_health_summary,
                    record.model_context,
                    record.premium_plan as i64,
                ],
            )
            .map_err(|e| map_sqlite_error(e, "email already registered"))?;

        if changed == 0 {
            return Err(RepositoryError::NotFound(format!(
                "profile {} does not exist",
                record.id
            )));
        }

        Ok(())
    }
}

/// Mock profile repository for testing
#[cfg(any(test, feature = "mock"))]
pub mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    /// In-memory implementation of `ProfileRepositoryTrait` for tests
    #[derive(Debug, Clone, Default)]
    pub struct MockProfileRepository {
        profiles: Arc<Mutex<HashMap<String, ProfileRecord>>>,
    }

    impl MockProfileRepository {
        /// Create a new empty mock repository
        pub fn new() -> Self {
            Self::default()
        }

        /// Create a mock repository seeded with existing records
        pub fn with_profiles(records: Vec<ProfileRecord>) -> Self {
            let map = records
                .into_iter()
                .map(|r| (r.id.clone(), r))
                .collect::<HashMap<_, _>>();
            Self {
                profiles: Arc::new(Mutex::new(map)),
            }
        }
    }

    #[async_trait]
    impl ProfileRepositoryTrait for MockProfileRepository {
        async fn create(&self, profile: NewProfile) -> Result<ProfileRecord, RepositoryError> {
            let mut store = self.profiles.lock()?;

            if store
                .values()
                .any(|p| p.username == profile.username || p.email == profile.email)
            {
                return Err(RepositoryError::Conflict(
                    "username or email already registered".to_string(),
                ));
            }

            let record = ProfileRecord {
                id: Uuid::new_v4().to_string(),
                surname: profile.surname,
                first_name: profile.first_name,
                username: profile.username,
                password_hash: profile.password_hash,
                email: profile.email,
                phone_number: profile.phone_number,
                age: profile.age,
                gender: profile.gender,
                device_id: None,
                diet_summary: None,
                mental_health_summary: None,
                model_context: None,
                premium_plan: false,
            };

            store.insert(record.id.clone(), record.clone());
            Ok(record)
        }

        async fn find_by_username(
            &self,
            username: &str,
        ) -> Result<Option<ProfileRecord>, RepositoryError> {
            let store = self.profiles.lock()?;
            Ok(store.values().find(|p| p.username == username).cloned())
        }

        async fn list(&self) -> Result<Vec<ProfileRecord>, RepositoryError> {
            let store = self.profiles.lock()?;
            let mut records: Vec<ProfileRecord> = store.values().cloned().collect();
            records.sort_by(|a, b| a.username.cmp(&b.username));
            Ok(records)
        }

        async fn update(&self, record: &ProfileRecord) -> Result<(), RepositoryError> {
            let mut store = self.profiles.lock()?;
            if !store.contains_key(&record.id) {
                return Err(RepositoryError::NotFound(format!(
                    "profile {} does not exist",
                    record.id
                )));
            }
            store.insert(record.id.clone(), record.clone());
            Ok(())
        }
    }
}
