use async_trait::async_trait;
use thiserror::Error;
use tracing::debug;

use vitalink_data::models::connection::{AccessGrants, ConnectionListing, NewConnection};
use vitalink_data::repository::{ConnectionRepositoryTrait, ProfileRepositoryTrait, RepositoryError};

/// Connection service errors
#[derive(Debug, Error)]
pub enum ConnectionServiceError {
    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Not found error
    #[error("Not found: {0}")]
    NotFound(String),

    /// Repository error
    #[error("Repository error: {0}")]
    Repository(String),
}

/// Trait for connection registry operations.
///
/// Every edge moves through a three-state machine: Pending on creation,
/// Accepted after the one-way accept transition, Deleted (terminal) on
/// cancel. Cancel is allowed from either live state; nothing returns from
/// Deleted.
#[async_trait]
pub trait ConnectionServiceTrait: Send + Sync {
    /// Create a Pending edge from `monitored` to `monitored_by`. Returns
    /// false (a reported no-op, not an error) when the ordered pair already
    /// exists. Both usernames must resolve; self-connections are rejected.
    async fn create_connection(
        &self,
        monitored: &str,
        monitored_by: &str,
        is_professional: bool,
    ) -> Result<bool, ConnectionServiceError>;

    /// Snapshot of both directions of a profile's edges
    async fn get_connections(&self, username: &str)
        -> Result<ConnectionListing, ConnectionServiceError>;

    /// Same shape as `get_connections`, filtered to not-yet-accepted edges
    async fn get_pending_connections(
        &self,
        username: &str,
    ) -> Result<ConnectionListing, ConnectionServiceError>;

    /// Accept an edge. Idempotent: accepting an Accepted edge changes
    /// nothing and reports success.
    async fn accept_connection(&self, id: i64) -> Result<(), ConnectionServiceError>;

    /// Delete an edge regardless of state. Deletion is the only revocation
    /// mechanism at this layer.
    async fn cancel_connection(&self, id: i64) -> Result<(), ConnectionServiceError>;

    /// Replace the data access grants carried by an edge
    async fn set_permissions(
        &self,
        id: i64,
        grants: AccessGrants,
    ) -> Result<(), ConnectionServiceError>;
}

/// Connection registry service
pub struct ConnectionService<P, C>
where
    P: ProfileRepositoryTrait,
    C: ConnectionRepositoryTrait,
{
    profiles: P,
    connections: C,
}

impl<P, C> ConnectionService<P, C>
where
    P: ProfileRepositoryTrait,
    C: ConnectionRepositoryTrait,
{
    /// Create a new connection service
    pub fn new(profiles: P, connections: C) -> Self {
        Self {
            profiles,
            connections,
        }
    }

    /// Map repository errors to service errors
    fn map_repo_error(&self, err: RepositoryError) -> ConnectionServiceError {
        match err {
            RepositoryError::NotFound(msg) => ConnectionServiceError::NotFound(msg),
            RepositoryError::Validation(msg) => ConnectionServiceError::Validation(msg),
            _ => ConnectionServiceError::Repository(err.to_string()),
        }
    }

    /// Resolve a username to its profile id or fail with `NotFound`
    async fn resolve_profile_id(&self, username: &str) -> Result<String, ConnectionServiceError> {
        let record = self
            .profiles
            .find_by_username(username)
            .await
            .map_err(|e| self.map_repo_error(e))?
            .ok_or_else(|| {
                ConnectionServiceError::NotFound(format!("no profile for {}", username))
            })?;
        Ok(record.id)
    }
}

#[async_trait]
impl<P, C> ConnectionServiceTrait for ConnectionService<P, C>
where
    P: ProfileRepositoryTrait + Send + Sync,
    C: ConnectionRepositoryTrait + Send + Sync,
{
    async fn create_connection(
        &self,
        monitored: &str,
        monitored_by: &str,
        is_professional: bool,
    ) -> Result<bool, ConnectionServiceError> {
        if monitored == monitored_by {
            return Err(ConnectionServiceError::Validation(
                "a profile cannot monitor itself".to_string(),
            ));
        }

        let monitored_id = self.resolve_profile_id(monitored).await?;
        let monitored_by_id = self.resolve_profile_id(monitored_by).await?;

        debug!(
            "Creating connection: monitored={}, monitored_by={}",
            monitored, monitored_by
        );

        // The store enforces pair uniqueness atomically; a concurrent
        // duplicate insert surfaces here as `false`, same as a sequential one.
        match self
            .connections
            .insert_if_absent(NewConnection {
                monitored_id,
                monitored_by_id,
                is_professional,
            })
            .await
        {
            Ok(inserted) => Ok(inserted),
            Err(RepositoryError::Conflict(_)) => Ok(false),
            Err(e) => Err(self.map_repo_error(e)),
        }
    }

    async fn get_connections(
        &self,
        username: &str,
    ) -> Result<ConnectionListing, ConnectionServiceError> {
        let profile_id = self.resolve_profile_id(username).await?;
        self.connections
            .list_for_profile(&profile_id, false)
            .await
            .map_err(|e| self.map_repo_error(e))
    }

    async fn get_pending_connections(
        &self,
        username: &str,
    ) -> Result<ConnectionListing, ConnectionServiceError> {
        let profile_id = self.resolve_profile_id(username).await?;
        self.connections
            .list_for_profile(&profile_id, true)
            .await
            .map_err(|e| self.map_repo_error(e))
    }

    async fn accept_connection(&self, id: i64) -> Result<(), ConnectionServiceError> {
        self.connections
            .set_accepted(id)
            .await
            .map_err(|e| self.map_repo_error(e))
    }

    async fn cancel_connection(&self, id: i64) -> Result<(), ConnectionServiceError> {
        self.connections
            .delete(id)
            .await
            .map_err(|e| self.map_repo_error(e))
    }

    async fn set_permissions(
        &self,
        id: i64,
        grants: AccessGrants,
    ) -> Result<(), ConnectionServiceError> {
        self.connections
            .set_grants(id, grants)
            .await
            .map_err(|e| self.map_repo_error(e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vitalink_data::models::profile::NewProfile;
    use vitalink_data::repository::connection_mocks::MockConnectionRepository;
    use vitalink_data::repository::profile_mocks::MockProfileRepository;

    struct Fixture {
        service: ConnectionService<MockProfileRepository, MockConnectionRepository>,
        connections: MockConnectionRepository,
    }

    async fn fixture_with_users(usernames: &[&str]) -> Fixture {
        let profiles = MockProfileRepository::new();
        let connections = MockConnectionRepository::new();

        for username in usernames {
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
            connections.register_profile(&record.id, &record.username, &record.email);
        }

        Fixture {
            service: ConnectionService::new(profiles, connections.clone()),
            connections,
        }
    }

    #[tokio::test]
    async fn duplicate_pair_is_a_reported_no_op() {
        let f = fixture_with_users(&["alice", "bob"]).await;

        assert!(f.service.create_connection("alice", "bob", false).await.unwrap());
        assert!(!f.service.create_connection("alice", "bob", false).await.unwrap());
        assert_eq!(f.connections.edge_count(), 1);
    }

    #[tokio::test]
    async fn reverse_direction_is_an_independent_edge() {
        let f = fixture_with_users(&["alice", "bob"]).await;

        assert!(f.service.create_connection("alice", "bob", false).await.unwrap());
        assert!(f.service.create_connection("bob", "alice", false).await.unwrap());
        assert_eq!(f.connections.edge_count(), 2);
    }

    #[tokio::test]
    async fn self_connection_is_rejected() {
        let f = fixture_with_users(&["alice"]).await;

        let result = f.service.create_connection("alice", "alice", false).await;
        assert!(matches!(result, Err(ConnectionServiceError::Validation(_))));
    }

    #[tokio::test]
    async fn unknown_username_is_not_found() {
        let f = fixture_with_users(&["alice"]).await;

        let result = f.service.create_connection("alice", "ghost", false).await;
        assert!(matches!(result, Err(ConnectionServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn listing_shows_both_directions() {
        let f = fixture_with_users(&["alice", "bob"]).await;
        f.service.create_connection("alice", "bob", true).await.unwrap();

        // bob watches alice: alice sees bob under monitored_by
        let alice_view = f.service.get_connections("alice").await.unwrap();
        assert_eq!(alice_view.monitored_by.len(), 1);
        assert_eq!(alice_view.monitored_by[0].username, "bob");
        assert!(alice_view.monitored_by[0].is_professional);
        assert!(alice_view.monitoring.is_empty());

        // and bob sees alice under monitoring
        let bob_view = f.service.get_connections("bob").await.unwrap();
        assert_eq!(bob_view.monitoring.len(), 1);
        assert_eq!(bob_view.monitoring[0].username, "alice");
        assert!(bob_view.monitored_by.is_empty());
    }

    #[tokio::test]
    async fn accept_is_idempotent() {
        let f = fixture_with_users(&["alice", "bob"]).await;
        f.service.create_connection("alice", "bob", false).await.unwrap();
        let id = f.service.get_connections("alice").await.unwrap().monitored_by[0].id;

        f.service.accept_connection(id).await.unwrap();
        f.service.accept_connection(id).await.unwrap();

        let view = f.service.get_connections("alice").await.unwrap();
        assert!(view.monitored_by[0].accepted);
    }

    #[tokio::test]
    async fn pending_filter_hides_accepted_edges() {
        let f = fixture_with_users(&["alice", "bob", "carol"]).await;
        f.service.create_connection("alice", "bob", false).await.unwrap();
        f.service.create_connection("alice", "carol", false).await.unwrap();

        let bob_edge_id = f
            .service
            .get_connections("alice")
            .await
            .unwrap()
            .monitored_by
            .iter()
            .find(|e| e.username == "bob")
            .unwrap()
            .id;
        f.service.accept_connection(bob_edge_id).await.unwrap();

        let pending = f.service.get_pending_connections("alice").await.unwrap();
        assert_eq!(pending.monitored_by.len(), 1);
        assert_eq!(pending.monitored_by[0].username, "carol");
    }

    #[tokio::test]
    async fn cancel_removes_the_edge_for_both_sides() {
        let f = fixture_with_users(&["alice", "bob"]).await;
        f.service.create_connection("alice", "bob", false).await.unwrap();
        let id = f.service.get_connections("alice").await.unwrap().monitored_by[0].id;

        f.service.cancel_connection(id).await.unwrap();

        assert!(f.service.get_connections("alice").await.unwrap().monitored_by.is_empty());
        assert!(f.service.get_connections("bob").await.unwrap().monitoring.is_empty());

        // The edge is gone; a second cancel is NotFound, and the pair can be
        // recreated from scratch
        assert!(matches!(
            f.service.cancel_connection(id).await,
            Err(ConnectionServiceError::NotFound(_))
        ));
        assert!(f.service.create_connection("alice", "bob", false).await.unwrap());
    }

    #[tokio::test]
    async fn accept_missing_edge_is_not_found() {
        let f = fixture_with_users(&["alice"]).await;
        assert!(matches!(
            f.service.accept_connection(999).await,
            Err(ConnectionServiceError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn grants_default_false_and_update_independently() {
        let f = fixture_with_users(&["alice", "bob"]).await;
        f.service.create_connection("alice", "bob", false).await.unwrap();
        let id = f.service.get_connections("alice").await.unwrap().monitored_by[0].id;

        let before = f.service.get_connections("alice").await.unwrap();
        assert_eq!(before.monitored_by[0].grants, AccessGrants::default());

        f.service
            .set_permissions(
                id,
                AccessGrants {
                    access_vital_signs_data: true,
                    ..AccessGrants::default()
                },
            )
            .await
            .unwrap();

        let after = f.service.get_connections("alice").await.unwrap();
        assert!(after.monitored_by[0].grants.access_vital_signs_data);
        assert!(!after.monitored_by[0].grants.access_diet_data);
    }
}
