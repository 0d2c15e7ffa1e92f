use async_trait::async_trait;
use tracing::debug;

use crate::database::get_db_pool;
use crate::models::device_record::DeviceRecord;
use super::errors::RepositoryError;

/// Repository trait for the append-only device record log
#[async_trait]
pub trait DeviceRecordRepositoryTrait {
    /// Append a sample to the log. Records are immutable after insert.
    async fn insert(&self, record: DeviceRecord) -> Result<(), RepositoryError>;

    /// Most recent sample across all devices
    async fn latest(&self) -> Result<Option<DeviceRecord>, RepositoryError>;

    /// Most recent sample reported by a specific device
    async fn latest_for_device(
        &self,
        device_id: &str,
    ) -> Result<Option<DeviceRecord>, RepositoryError>;
}

/// SQLite-backed repository for device records
#[derive(Debug, Clone, Default)]
pub struct DeviceRecordRepository;

impl DeviceRecordRepository {
    /// Create a new repository
    pub fn new() -> Self {
        Self
    }
}

const RECORD_COLUMNS: &str =
    "id, device_id, timestamp, temp, heart_rate, blood_oxygen, sbp, dbp, ecg_sensor_frame";

fn map_record_row(row: &rusqlite::Row<'_>) -> Result<DeviceRecord, rusqlite::Error> {
    Ok(DeviceRecord {
        id: row.get(0)?,
        device_id: row.get(1)?,
        timestamp: row.get(2)?,
        temp: row.get(3)?,
        heart_rate: row.get(4)?,
        blood_oxygen: row.get(5)?,
        sbp: row.get(6)?,
        dbp: row.get(7)?,
        ecg_sensor_frame: row.get(8)?,
    })
}

#[async_trait]
impl DeviceRecordRepositoryTrait for DeviceRecordRepository {
    async fn insert(&self, record: DeviceRecord) -> Result<(), RepositoryError> {
        let pool = get_db_pool()?;
        let conn = pool.conn()?;

        debug!("Storing device record in database: {}", record.id);

        conn.execute(
            "INSERT INTO device_records
             (id, device_id, timestamp, temp, heart_rate, blood_oxygen, sbp, dbp, ecg_sensor_frame)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            rusqlite::params![
                record.id,
                record.device_id,
                record.timestamp,
                record.temp,
                record.heart_rate,
                record.blood_oxygen,
                record.sbp,
                record.dbp,
                record.ecg_sensor_frame,
            ],
        )?;

        Ok(())
    }

    async fn latest(&self) -> Result<Option<DeviceRecord>, RepositoryError> {
        let pool = get_db_pool()?;
        let conn = pool.conn()?;

        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM device_records ORDER BY timestamp DESC LIMIT 1",
            RECORD_COLUMNS
        ))?;

        match stmt.query_row([], map_record_row) {
            Ok(record) => Ok(Some(record)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(RepositoryError::Sqlite(e)),
        }
    }

    async fn latest_for_device(
        &self,
        device_id: &str,
    ) -> Result<Option<DeviceRecord>, RepositoryError> {
        let pool = get_db_pool()?;
        let conn = pool.conn()?;

        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM device_records WHERE device_id = ?1 ORDER BY timestamp DESC LIMIT 1",
            RECORD_COLUMNS
        ))?;

        match stmt.query_row([device_id], map_record_row) {
            Ok(record) => Ok(Some(record)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(RepositoryError::Sqlite(e)),
        }
    }
}

/// Mock device record repository for testing
#[cfg(any(test, feature = "mock"))]
pub mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// In-memory implementation of `DeviceRecordRepositoryTrait` for tests
    #[derive(Debug, Clone, Default)]
    pub struct MockDeviceRecordRepository {
        records: Arc<Mutex<Vec<DeviceRecord>>>,
    }

    impl MockDeviceRecordRepository {
        /// Create a new empty mock repository
        pub fn new() -> Self {
            Self::default()
        }

        /// All stored records, in insertion order
        pub fn records(&self) -> Vec<DeviceRecord> {
            self.records.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl DeviceRecordRepositoryTrait for MockDeviceRecordRepository {
        async fn insert(&self, record: DeviceRecord) -> Result<(), RepositoryError> {
            let mut store = self.records.lock()?;
            store.push(record);
            Ok(())
        }

        async fn latest(&self) -> Result<Option<DeviceRecord>, RepositoryError> {
            let store = self.records.lock()?;
            Ok(store
                .iter()
                .max_by(|a, b| a.timestamp.cmp(&b.timestamp))
                .cloned())
        }

        async fn latest_for_device(
            &self,
            device_id: &str,
        ) -> Result<Option<DeviceRecord>, RepositoryError> {
            let store = self.records.lock()?;
            Ok(store
                .iter()
                .filter(|r| r.device_id.as_deref() == Some(device_id))
                .max_by(|a, b| a.timestamp.cmp(&b.timestamp))
                .cloned())
        }
    }
}
