use async_trait::async_trait;
use tracing::debug;

use crate::database::get_db_pool;
use crate::models::connection::{AccessGrants, ConnectionEdge, ConnectionListing, NewConnection};
use super::errors::RepositoryError;

/// Repository trait for monitoring connections
#[async_trait]
pub trait ConnectionRepositoryTrait {
    /// Insert a new edge unless the ordered (monitored, monitored_by) pair
    /// already exists. Returns whether a row was actually inserted. The
    /// uniqueness check happens atomically inside the store so concurrent
    /// creators cannot both win.
    async fn insert_if_absent(&self, edge: NewConnection) -> Result<bool, RepositoryError>;

    /// List both directions of a profile's edges, joined with the
    /// counterpart's username and email. With `pending_only` set, only edges
    /// that have not been accepted yet are returned.
    async fn list_for_profile(
        &self,
        profile_id: &str,
        pending_only: bool,
    ) -> Result<ConnectionListing, RepositoryError>;

    /// Mark an edge accepted. Accepting an already-accepted edge is a no-op.
    /// Fails with `NotFound` when the id does not exist.
    async fn set_accepted(&self, id: i64) -> Result<(), RepositoryError>;

    /// Replace the data access grants on an edge.
    /// Fails with `NotFound` when the id does not exist.
    async fn set_grants(&self, id: i64, grants: AccessGrants) -> Result<(), RepositoryError>;

    /// Delete an edge regardless of its state.
    /// Fails with `NotFound` when the id does not exist.
    async fn delete(&self, id: i64) -> Result<(), RepositoryError>;
}

/// SQLite-backed repository for monitoring connections
#[derive(Debug, Clone, Default)]
pub struct ConnectionRepository;

impl ConnectionRepository {
    /// Create a new repository
    pub fn new() -> Self {
        Self
    }
}

fn map_edge_row(row: &rusqlite::Row<'_>) -> Result<ConnectionEdge, rusqlite::Error> {
    Ok(ConnectionEdge {
        id: row.get(0)?,
        username: row.get(1)?,
        email: row.get(2)?,
        accepted: row.get::<_, i64>(3)? != 0,
        is_professional: row.get::<_, i64>(4)? != 0,
        grants: AccessGrants {
            access_diet_data: row.get::<_, i64>(5)? != 0,
            access_mental_health_data: row.get::<_, i64>(6)? != 0,
            access_vital_signs_data: row.get::<_, i64>(7)? != 0,
        },
    })
}

#[async_trait]
impl ConnectionRepositoryTrait for ConnectionRepository {
    async fn insert_if_absent(&self, edge: NewConnection) -> Result<bool, RepositoryError> {
        let pool = get_db_pool()?;
        let conn = pool.conn()?;

        debug!(
            "Inserting connection edge: monitored={}, monitored_by={}",
            edge.monitored_id, edge.monitored_by_id
        );

        let inserted = conn.execute(
            "INSERT INTO connections (monitored_id, monitored_by_id, is_professional)
             VALUES (?1, ?2, ?3)
             ON CONFLICT (monitored_id, monitored_by_id) DO NOTHING",
            rusqlite::params![edge.monitored_id, edge.monitored_by_id, edge.is_professional as i64],
        )?;

        Ok(inserted > 0)
    }

    async fn list_for_profile(
        &self,
        profile_id: &str,
        pending_only: bool,
    ) -> Result<ConnectionListing, RepositoryError> {
        let pool = get_db_pool()?;
        let conn = pool.conn()?;

        let pending_filter = if pending_only { " AND c.accepted = 0" } else { "" };

        // Edges where the profile is the subject: counterpart is the observer
        let mut stmt = conn.prepare(&format!(
            "SELECT c.id, p.username, p.email, c.accepted, c.is_professional,
                    c.access_diet_data, c.access_mental_health_data, c.access_vital_signs_data
             FROM connections c
             JOIN user_profiles p ON p.id = c.monitored_by_id
             WHERE c.monitored_id = ?1{}
             ORDER BY c.id",
            pending_filter
        ))?;
        let mut monitored_by = Vec::new();
        for edge in stmt.query_map([profile_id], map_edge_row)? {
            monitored_by.push(edge?);
        }

        // Edges where the profile is the observer: counterpart is the subject
        let mut stmt = conn.prepare(&format!(
            "SELECT c.id, p.username, p.email, c.accepted, c.is_professional,
                    c.access_diet_data, c.access_mental_health_data, c.access_vital_signs_data
             FROM connections c
             JOIN user_profiles p ON p.id = c.monitored_id
             WHERE c.monitored_by_id = ?1{}
             ORDER BY c.id",
            pending_filter
        ))?;
        let mut monitoring = Vec::new();
        for edge in stmt.query_map([profile_id], map_edge_row)? {
            monitoring.push(edge?);
        }

        Ok(ConnectionListing {
            monitoring,
            monitored_by,
        })
    }

    async fn set_accepted(&self, id: i64) -> Result<(), RepositoryError> {
        let pool = get_db_pool()?;
        let conn = pool.conn()?;

        let changed = conn.execute("UPDATE connections SET accepted = 1 WHERE id = ?1", [id])?;

        if changed == 0 {
            return Err(RepositoryError::NotFound(format!(
                "connection {} does not exist",
                id
            )));
        }

        Ok(())
    }

    async fn set_grants(&self, id: i64, grants: AccessGrants) -> Result<(), RepositoryError> {
        let pool = get_db_pool()?;
        let conn = pool.conn()?;

        let changed = conn.execute(
            "UPDATE connections SET access_diet_data = ?2, access_mental_health_data = ?3,
             access_vital_signs_data = ?4 WHERE id = ?1",
            rusqlite::params![
                id,
                grants.access_diet_data as i64,
                grants.access_mental_health_data as i64,
                grants.access_vital_signs_data as i64,
            ],
        )?;

        if changed == 0 {
            return Err(RepositoryError::NotFound(format!(
                "connection {} does not exist",
                id
            )));
        }

        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<(), RepositoryError> {
        let pool = get_db_pool()?;
        let conn = pool.conn()?;

        debug!("Deleting connection edge: {}", id);

        let changed = conn.execute("DELETE FROM connections WHERE id = ?1", [id])?;

        if changed == 0 {
            return Err(RepositoryError::NotFound(format!(
                "connection {} does not exist",
                id
            )));
        }

        Ok(())
    }
}

/// Mock connection repository for testing
#[cfg(any(test, feature = "mock"))]
pub mod tests {
    use super::*;
    use crate::models::connection::ConnectionRecord;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    #[derive(Debug, Default)]
    struct MockState {
        edges: Vec<ConnectionRecord>,
        // profile id -> (username, email), so listings can join identities
        identities: HashMap<String, (String, String)>,
        next_id: i64,
    }

    /// In-memory implementation of `ConnectionRepositoryTrait` for tests
    #[derive(Debug, Clone, Default)]
    pub struct MockConnectionRepository {
        state: Arc<Mutex<MockState>>,
    }

    impl MockConnectionRepository {
        /// Create a new empty mock repository
        pub fn new() -> Self {
            Self::default()
        }

        /// Register a profile identity used when joining edge listings
        pub fn register_profile(&self, id: &str, username: &str, email: &str) {
            let mut state = self.state.lock().unwrap();
            state
                .identities
                .insert(id.to_string(), (username.to_string(), email.to_string()));
        }

        /// Number of stored edges
        pub fn edge_count(&self) -> usize {
            self.state.lock().unwrap().edges.len()
        }

        fn edge_for(&self, record: &ConnectionRecord, counterpart_id: &str) -> ConnectionEdge {
            let state = self.state.lock().unwrap();
            let (username, email) = state
                .identities
                .get(counterpart_id)
                .cloned()
                .unwrap_or_else(|| ("unknown".to_string(), "unknown".to_string()));
            ConnectionEdge {
                id: record.id,
                username,
                email,
                accepted: record.accepted,
                is_professional: record.is_professional,
                grants: record.grants,
            }
        }
    }

    #[async_trait]
    impl ConnectionRepositoryTrait for MockConnectionRepository {
        async fn insert_if_absent(&self, edge: NewConnection) -> Result<bool, RepositoryError> {
            let mut state = self.state.lock()?;

            if state.edges.iter().any(|e| {
                e.monitored_id == edge.monitored_id && e.monitored_by_id == edge.monitored_by_id
            }) {
                return Ok(false);
            }

            state.next_id += 1;
            let id = state.next_id;
            state.edges.push(ConnectionRecord {
                id,
                monitored_id: edge.monitored_id,
                monitored_by_id: edge.monitored_by_id,
                accepted: false,
                is_professional: edge.is_professional,
                grants: AccessGrants::default(),
            });

            Ok(true)
        }

        async fn list_for_profile(
            &self,
            profile_id: &str,
            pending_only: bool,
        ) -> Result<ConnectionListing, RepositoryError> {
            let edges: Vec<ConnectionRecord> = {
                let state = self.state.lock()?;
                state.edges.clone()
            };

            let mut listing = ConnectionListing::default();
            for record in edges
                .iter()
                .filter(|e| !pending_only || !e.accepted)
            {
                if record.monitored_id == profile_id {
                    listing
                        .monitored_by
                        .push(self.edge_for(record, &record.monitored_by_id));
                }
                if record.monitored_by_id == profile_id {
                    listing
                        .monitoring
                        .push(self.edge_for(record, &record.monitored_id));
                }
            }

            Ok(listing)
        }

        async fn set_accepted(&self, id: i64) -> Result<(), RepositoryError> {
            let mut state = self.state.lock()?;
            match state.edges.iter_mut().find(|e| e.id == id) {
                Some(edge) => {
                    edge.accepted = true;
                    Ok(())
                }
                None => Err(RepositoryError::NotFound(format!(
                    "connection {} does not exist",
                    id
                ))),
            }
        }

        async fn set_grants(&self, id: i64, grants: AccessGrants) -> Result<(), RepositoryError> {
            let mut state = self.state.lock()?;
            match state.edges.iter_mut().find(|e| e.id == id) {
                Some(edge) => {
                    edge.grants = grants;
                    Ok(())
                }
                None => Err(RepositoryError::NotFound(format!(
                    "connection {} does not exist",
                    id
                ))),
            }
        }

        async fn delete(&self, id: i64) -> Result<(), RepositoryError> {
            let mut state = self.state.lock()?;
            let before = state.edges.len();
            state.edges.retain(|e| e.id != id);
            if state.edges.len() == before {
                return Err(RepositoryError::NotFound(format!(
                    "connection {} does not exist",
                    id
                )));
            }
            Ok(())
        }
    }
}
