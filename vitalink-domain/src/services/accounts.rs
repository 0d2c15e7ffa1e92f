use argon2::password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, warn};
use validator::Validate;

use crate::entities::conversions::{apply_profile_update, profile_from_record};
use crate::entities::profile::{Profile, ProfileUpdate, SignupRequest};
use vitalink_data::models::profile::NewProfile;
use vitalink_data::repository::{ProfileRepositoryTrait, RepositoryError};

/// Account service errors
#[derive(Debug, Error)]
pub enum AccountServiceError {
    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Not found error
    #[error("Profile not found: {0}")]
    NotFound(String),

    /// Conflict with an existing account
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Password hashing error
    #[error("Password hashing error: {0}")]
    Hash(String),

    /// Repository error
    #[error("Repository error: {0}")]
    Repository(String),
}

/// Trait for account operations
#[async_trait]
pub trait AccountServiceTrait: Send + Sync {
    /// Create a new account. Fails with `Conflict` when the username or
    /// email is already registered.
    async fn signup(&self, request: SignupRequest) -> Result<(), AccountServiceError>;

    /// Check a credential pair. Returns `Ok(false)` for an unknown username
    /// or a wrong password; errors are reserved for infrastructure failures.
    async fn login(&self, username: &str, password: &str) -> Result<bool, AccountServiceError>;

    /// Public projection of one profile
    async fn get_profile(&self, username: &str) -> Result<Profile, AccountServiceError>;

    /// Public projections of all profiles
    async fn list_profiles(&self) -> Result<Vec<Profile>, AccountServiceError>;

    /// Apply a partial update to a profile's mutable fields
    async fn update_profile(
        &self,
        username: &str,
        update: ProfileUpdate,
    ) -> Result<Profile, AccountServiceError>;

    /// Link a vitals device to the profile
    async fn set_device_id(&self, username: &str, device_id: &str)
        -> Result<(), AccountServiceError>;

    /// Whether the profile has a non-empty linked device id
    async fn has_device(&self, username: &str) -> Result<bool, AccountServiceError>;

    /// Set the premium plan flag
    async fn set_premium(&self, username: &str, value: bool) -> Result<(), AccountServiceError>;

    /// Read the premium plan flag
    async fn is_premium(&self, username: &str) -> Result<bool, AccountServiceError>;
}

/// Account service for profile and credential logic
pub struct AccountService<R: ProfileRepositoryTrait> {
    repository: R,
}

impl<R: ProfileRepositoryTrait> AccountService<R> {
    /// Create a new account service
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    /// Map repository errors to service errors
    fn map_repo_error(&self, err: RepositoryError) -> AccountServiceError {
        match err {
            RepositoryError::NotFound(msg) => AccountServiceError::NotFound(msg),
            RepositoryError::Conflict(msg) => AccountServiceError::Conflict(msg),
            RepositoryError::Validation(msg) => AccountServiceError::Validation(msg),
            _ => AccountServiceError::Repository(err.to_string()),
        }
    }

    /// Fetch a record or fail with `NotFound`
    async fn require_record(
        &self,
        username: &str,
    ) -> Result<vitalink_data::models::profile::ProfileRecord, AccountServiceError> {
        self.repository
            .find_by_username(username)
            .await
            .map_err(|e| self.map_repo_error(e))?
            .ok_or_else(|| AccountServiceError::NotFound(format!("no profile for {}", username)))
    }
}

/// Hash a credential secret with a fresh random salt (Argon2id, PHC string)
fn hash_password(password: &str) -> Result<String, AccountServiceError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AccountServiceError::Hash(e.to_string()))
}

/// Verify a credential secret against a stored PHC hash. The comparison
/// inside the verifier is constant-time.
fn verify_password(password: &str, stored_hash: &str) -> Result<bool, AccountServiceError> {
    let parsed = PasswordHash::new(stored_hash).map_err(|e| AccountServiceError::Hash(e.to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

#[async_trait]
impl<R: ProfileRepositoryTrait + Send + Sync> AccountServiceTrait for AccountService<R> {
    async fn signup(&self, request: SignupRequest) -> Result<(), AccountServiceError> {
        if let Err(validation_errors) = request.validate() {
            let message = validation_errors
                .field_errors()
                .iter()
                .map(|(field, errors)| {
                    let error_msgs: Vec<String> = errors
                        .iter()
                        .map(|err| {
                            err.message
                                .as_ref()
                                .map(|m| m.to_string())
                                .unwrap_or_else(|| format!("Invalid {}", field))
                        })
                        .collect();
                    format!("{}: {}", field, error_msgs.join(", "))
                })
                .collect::<Vec<String>>()
                .join("; ");
            return Err(AccountServiceError::Validation(message));
        }

        let password_hash = hash_password(&request.password)?;

        debug!("Creating profile for username: {}", request.username);

        // The store's unique constraints decide duplicates atomically;
        // a Conflict here is an expected outcome, not an exception.
        self.repository
            .create(NewProfile {
                surname: request.surname,
                first_name: request.first_name,
                username: request.username,
                password_hash,
                email: request.email,
                phone_number: request.phone_number,
                age: request.age,
                gender: request.gender,
            })
            .await
            .map_err(|e| self.map_repo_error(e))?;

        Ok(())
    }

    async fn login(&self, username: &str, password: &str) -> Result<bool, AccountServiceError> {
        let record = match self
            .repository
            .find_by_username(username)
            .await
            .map_err(|e| self.map_repo_error(e))?
        {
            Some(record) => record,
            None => {
                debug!("Login attempt for unknown username");
                return Ok(false);
            }
        };

        match verify_password(password, &record.password_hash) {
            Ok(matched) => Ok(matched),
            Err(e) => {
                // A malformed stored hash is an operational problem, not a
                // caller mistake; fail the login and surface the cause.
                warn!("Stored credential hash could not be parsed: {}", e);
                Ok(false)
            }
        }
    }

    async fn get_profile(&self, username: &str) -> Result<Profile, AccountServiceError> {
        let record = self.require_record(username).await?;
        Ok(profile_from_record(record))
    }

    async fn list_profiles(&self) -> Result<Vec<Profile>, AccountServiceError> {
        let records = self
            .repository
            .list()
            .await
            .map_err(|e| self.map_repo_error(e))?;
        Ok(records.into_iter().map(profile_from_record).collect())
    }

    async fn update_profile(
        &self,
        username: &str,
        update: ProfileUpdate,
    ) -> Result<Profile, AccountServiceError> {
        let mut record = self.require_record(username).await?;
        apply_profile_update(&mut record, update);
        self.repository
            .update(&record)
            .await
            .map_err(|e| self.map_repo_error(e))?;
        Ok(profile_from_record(record))
    }

    async fn set_device_id(
        &self,
        username: &str,
        device_id: &str,
    ) -> Result<(), AccountServiceError> {
        let mut record = self.require_record(username).await?;
        record.device_id = Some(device_id.to_string());
        self.repository
            .update(&record)
            .await
            .map_err(|e| self.map_repo_error(e))
    }

    async fn has_device(&self, username: &str) -> Result<bool, AccountServiceError> {
        let record = self.require_record(username).await?;
        Ok(record.device_id.as_deref().is_some_and(|d| !d.is_empty()))
    }

    async fn set_premium(&self, username: &str, value: bool) -> Result<(), AccountServiceError> {
        let mut record = self.require_record(username).await?;
        record.premium_plan = value;
        self.repository
            .update(&record)
            .await
            .map_err(|e| self.map_repo_error(e))
    }

    async fn is_premium(&self, username: &str) -> Result<bool, AccountServiceError> {
        let record = self.require_record(username).await?;
        Ok(record.premium_plan)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vitalink_data::repository::profile_mocks::MockProfileRepository;

    fn signup_request(username: &str, email: &str) -> SignupRequest {
        SignupRequest {
            surname: "Okafor".to_string(),
            first_name: "Ada".to_string(),
            username: username.to_string(),
            password: "correct horse battery".to_string(),
            email: email.to_string(),
            phone_number: None,
            age: Some(34),
            gender: Some("female".to_string()),
        }
    }

    fn service() -> AccountService<MockProfileRepository> {
        AccountService::new(MockProfileRepository::new())
    }

    #[tokio::test]
    async fn signup_then_login_succeeds() {
        let service = service();
        service
            .signup(signup_request("ada", "ada@example.com"))
            .await
            .unwrap();

        assert!(service.login("ada", "correct horse battery").await.unwrap());
    }

    #[tokio::test]
    async fn login_rejects_wrong_password_and_unknown_user() {
        let service = service();
        service
            .signup(signup_request("ada", "ada@example.com"))
            .await
            .unwrap();

        assert!(!service.login("ada", "wrong password!").await.unwrap());
        assert!(!service.login("nobody", "whatever password").await.unwrap());
    }

    #[tokio::test]
    async fn duplicate_username_is_a_conflict() {
        let service = service();
        service
            .signup(signup_request("ada", "ada@example.com"))
            .await
            .unwrap();

        let second = service
            .signup(signup_request("ada", "other@example.com"))
            .await;
        assert!(matches!(second, Err(AccountServiceError::Conflict(_))));
    }

    #[tokio::test]
    async fn signup_validates_email_and_password() {
        let service = service();

        let mut bad_email = signup_request("ada", "not-an-email");
        bad_email.email = "not-an-email".to_string();
        assert!(matches!(
            service.signup(bad_email).await,
            Err(AccountServiceError::Validation(_))
        ));

        let mut short_password = signup_request("ada", "ada@example.com");
        short_password.password = "short".to_string();
        assert!(matches!(
            service.signup(short_password).await,
            Err(AccountServiceError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn stored_hash_is_not_the_plaintext() {
        let repository = MockProfileRepository::new();
        let service = AccountService::new(repository.clone());
        service
            .signup(signup_request("ada", "ada@example.com"))
            .await
            .unwrap();

        let record = repository.find_by_username("ada").await.unwrap().unwrap();
        assert_ne!(record.password_hash, "correct horse battery");
        assert!(record.password_hash.starts_with("$argon2"));
    }

    #[tokio::test]
    async fn has_device_flips_after_linking() {
        let service = service();
        service
            .signup(signup_request("ada", "ada@example.com"))
            .await
            .unwrap();

        assert!(!service.has_device("ada").await.unwrap());
        service.set_device_id("ada", "dev-42").await.unwrap();
        assert!(service.has_device("ada").await.unwrap());
    }

    #[tokio::test]
    async fn premium_flag_round_trips() {
        let service = service();
        service
            .signup(signup_request("ada", "ada@example.com"))
            .await
            .unwrap();

        assert!(!service.is_premium("ada").await.unwrap());
        service.set_premium("ada", true).await.unwrap();
        assert!(service.is_premium("ada").await.unwrap());
    }

    #[tokio::test]
    async fn unknown_username_is_not_found() {
        let service = service();
        assert!(matches!(
            service.has_device("ghost").await,
            Err(AccountServiceError::NotFound(_))
        ));
        assert!(matches!(
            service.get_profile("ghost").await,
            Err(AccountServiceError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn update_profile_merges_partial_fields() {
        let service = service();
        service
            .signup(signup_request("ada", "ada@example.com"))
            .await
            .unwrap();

        let profile = service
            .update_profile(
                "ada",
                ProfileUpdate {
                    diet_summary: Some("vegetarian".to_string()),
                    ..ProfileUpdate::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(profile.diet_summary.as_deref(), Some("vegetarian"));
        assert_eq!(profile.surname, "Okafor");
    }
}
