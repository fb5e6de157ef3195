//! Session issuance and verification.

use std::sync::Arc;

use chrono::Utc;
use trueview_auth::{
    decode_token, encode_token, AuthError, PasswordHasher, Principal, SessionClaims,
};
use trueview_db::models::{Client, Project};
use trueview_db::PortalStore;

use crate::error::ApiError;

/// Client sessions last 24 hours.
const CLIENT_SESSION_TTL_SECS: i64 = 24 * 60 * 60;
/// Administrative sessions last 8 hours.
const ADMIN_SESSION_TTL_SECS: i64 = 8 * 60 * 60;

/// Session service configuration, built once at startup.
#[derive(Clone)]
pub struct SessionConfig {
    /// HS256 signing secret for session tokens.
    pub signing_secret: Vec<u8>,
    /// Operator login name.
    pub admin_username: String,
    /// Argon2id hash of the operator password.
    pub admin_password_hash: String,
}

/// Authenticates logins and verifies bearer tokens.
pub struct SessionService {
    store: Arc<dyn PortalStore>,
    hasher: PasswordHasher,
    config: SessionConfig,
}

impl SessionService {
    #[must_use]
    pub fn new(store: Arc<dyn PortalStore>, config: SessionConfig) -> Self {
        Self {
            store,
            hasher: PasswordHasher::new(),
            config,
        }
    }

    /// Override the password hasher (tests use cheaper parameters).
    #[must_use]
    pub fn with_hasher(mut self, hasher: PasswordHasher) -> Self {
        self.hasher = hasher;
        self
    }

    /// Authenticate a client and mint a 24-hour session token.
    ///
    /// Unknown email, non-active status, and wrong password all yield the
    /// identical [`ApiError::InvalidCredentials`] so responses cannot be
    /// used to enumerate accounts.
    ///
    /// # Errors
    ///
    /// [`ApiError::InvalidCredentials`] or a collaborator failure.
    pub async fn login(
        &self,
        username: &str,
        password: &str,
    ) -> Result<(String, Client, Project), ApiError> {
        let client = self
            .store
            .find_client_by_email(username)
            .await?
            .ok_or_else(|| {
                tracing::debug!("Login attempt for unknown email");
                ApiError::InvalidCredentials
            })?;

        let status = client.status().map_err(ApiError::from)?;
        if status != trueview_core::ClientStatus::Active {
            tracing::debug!(client_id = %client.client_id(), status = %status, "Login attempt on non-active account");
            return Err(ApiError::InvalidCredentials);
        }

        let valid = self
            .hasher
            .verify(password, &client.password_hash)
            .map_err(|e| ApiError::Internal(format!("Password verification failed: {e}")))?;
        if !valid {
            tracing::debug!(client_id = %client.client_id(), "Invalid password attempt");
            return Err(ApiError::InvalidCredentials);
        }

        let project = self
            .store
            .get_project_for_client(client.client_id())
            .await?
            .ok_or_else(|| ApiError::Internal("Client has no project record".to_string()))?;

        let claims = SessionClaims::for_client(
            client.client_id(),
            project.project_id(),
            client.email.clone(),
            Utc::now().timestamp(),
            CLIENT_SESSION_TTL_SECS,
        );
        let token = encode_token(&claims, &self.config.signing_secret)
            .map_err(|e| ApiError::Internal(e.to_string()))?;

        // Best-effort: a failed last-login write must not fail the login.
        if let Err(e) = self.store.record_login(client.client_id(), Utc::now()).await {
            tracing::warn!(client_id = %client.client_id(), error = %e, "Failed to record login time");
        }

        tracing::info!(client_id = %client.client_id(), "Client logged in");
        Ok((token, client, project))
    }

    /// Authenticate the operator and mint an 8-hour admin token.
    ///
    /// # Errors
    ///
    /// [`ApiError::InvalidCredentials`] on any mismatch.
    pub async fn admin_login(&self, username: &str, password: &str) -> Result<String, ApiError> {
        // The password check runs regardless of the username match so both
        // failure paths cost the same.
        let valid = self
            .hasher
            .verify(password, &self.config.admin_password_hash)
            .unwrap_or(false);

        if username != self.config.admin_username || !valid {
            tracing::debug!("Failed admin login attempt");
            return Err(ApiError::InvalidCredentials);
        }

        let claims =
            SessionClaims::for_admin(username, Utc::now().timestamp(), ADMIN_SESSION_TTL_SECS);
        let token = encode_token(&claims, &self.config.signing_secret)
            .map_err(|e| ApiError::Internal(e.to_string()))?;

        tracing::info!("Operator logged in");
        Ok(token)
    }

    /// Verify a bearer token and derive the request principal.
    ///
    /// # Errors
    ///
    /// [`ApiError::Expired`] past expiry, [`ApiError::Unauthenticated`] for
    /// every other verification failure.
    pub fn authenticate(&self, token: &str) -> Result<Principal, ApiError> {
        let claims = decode_token(token, &self.config.signing_secret).map_err(|e| match e {
            AuthError::TokenExpired => ApiError::Expired,
            _ => ApiError::Unauthenticated,
        })?;
        Ok(Principal::from_claims(&claims))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trueview_core::{ClientId, ClientStatus, ProjectId, Role};
    use trueview_db::models::default_access_policy;
    use trueview_db::{MemoryStore, NewClient, NewProject};

    const SECRET: &[u8] = b"session-secret-for-tests";

    fn test_hasher() -> PasswordHasher {
        PasswordHasher::with_params(4096, 1, 1).unwrap()
    }

    async fn seeded_store(status: ClientStatus, password: &str) -> Arc<MemoryStore> {
        let store = Arc::new(MemoryStore::new());
        let client_id = ClientId::new();
        store
            .create_client_with_project(
                NewClient {
                    id: client_id,
                    email: "client@example.com".to_string(),
                    display_name: "Jordan".to_string(),
                    company_name: None,
                    phone: None,
                    password_hash: test_hasher().hash(password).unwrap(),
                    role: Role::Client,
                    status,
                    deliverables_access: default_access_policy(),
                },
                NewProject {
                    id: ProjectId::new(),
                    client_id,
                    name: "Survey".to_string(),
                    service_type: None,
                    package: None,
                    scheduled_date: None,
                    total_amount: None,
                    details: serde_json::json!({}),
                },
            )
            .await
            .unwrap();
        store
    }

    fn session_service(store: Arc<MemoryStore>) -> SessionService {
        SessionService::new(
            store,
            SessionConfig {
                signing_secret: SECRET.to_vec(),
                admin_username: "ops".to_string(),
                admin_password_hash: test_hasher().hash("operator-pass").unwrap(),
            },
        )
        .with_hasher(test_hasher())
    }

    #[tokio::test]
    async fn login_issues_24h_token_and_records_login() {
        let store = seeded_store(ClientStatus::Active, "correct-password").await;
        let svc = session_service(store.clone());

        let before = Utc::now().timestamp();
        let (token, client, _project) = svc.login("client@example.com", "correct-password").await.unwrap();

        let claims = decode_token(&token, SECRET).unwrap();
        assert_eq!(claims.exp - claims.iat, 24 * 60 * 60);
        assert!(claims.iat >= before);
        assert_eq!(claims.role, Role::Client);

        let stored = store.get_client(client.client_id()).await.unwrap().unwrap();
        assert!(stored.last_login_at.is_some());
    }

    #[tokio::test]
    async fn unknown_email_wrong_password_and_suspended_fail_identically() {
        let store = seeded_store(ClientStatus::Active, "correct-password").await;
        let svc = session_service(store);

        let unknown = svc.login("nobody@example.com", "whatever").await.unwrap_err();
        let wrong = svc.login("client@example.com", "wrong-password").await.unwrap_err();
        assert!(matches!(unknown, ApiError::InvalidCredentials));
        assert!(matches!(wrong, ApiError::InvalidCredentials));

        let store = seeded_store(ClientStatus::Suspended, "correct-password").await;
        let svc = session_service(store);
        let suspended = svc.login("client@example.com", "correct-password").await.unwrap_err();
        assert!(matches!(suspended, ApiError::InvalidCredentials));
    }

    #[tokio::test]
    async fn pending_account_cannot_log_in() {
        let store = seeded_store(ClientStatus::Pending, "correct-password").await;
        let svc = session_service(store);
        let err = svc.login("client@example.com", "correct-password").await.unwrap_err();
        assert!(matches!(err, ApiError::InvalidCredentials));
    }

    #[tokio::test]
    async fn login_is_case_insensitive_on_email() {
        let store = seeded_store(ClientStatus::Active, "correct-password").await;
        let svc = session_service(store);
        assert!(svc.login("CLIENT@EXAMPLE.COM", "correct-password").await.is_ok());
    }

    #[tokio::test]
    async fn admin_login_issues_8h_token() {
        let store = seeded_store(ClientStatus::Active, "x-password").await;
        let svc = session_service(store);

        let token = svc.admin_login("ops", "operator-pass").await.unwrap();
        let claims = decode_token(&token, SECRET).unwrap();
        assert_eq!(claims.exp - claims.iat, 8 * 60 * 60);
        assert_eq!(claims.role, Role::Admin);
        assert_eq!(claims.project_id, None);
    }

    #[tokio::test]
    async fn wrong_admin_credentials_fail_generically() {
        let store = seeded_store(ClientStatus::Active, "x-password").await;
        let svc = session_service(store);

        let bad_user = svc.admin_login("root", "operator-pass").await.unwrap_err();
        let bad_pass = svc.admin_login("ops", "not-the-password").await.unwrap_err();
        assert!(matches!(bad_user, ApiError::InvalidCredentials));
        assert!(matches!(bad_pass, ApiError::InvalidCredentials));
    }

    #[tokio::test]
    async fn authenticate_distinguishes_expired_from_invalid() {
        let store = seeded_store(ClientStatus::Active, "x-password").await;
        let svc = session_service(store);

        // Expired token, well past the leeway.
        let claims = SessionClaims::for_client(
            ClientId::new(),
            ProjectId::new(),
            "a@x.com",
            Utc::now().timestamp() - 7200,
            3600,
        );
        let expired = encode_token(&claims, SECRET).unwrap();
        assert!(matches!(svc.authenticate(&expired).unwrap_err(), ApiError::Expired));

        // Garbage token.
        assert!(matches!(
            svc.authenticate("garbage").unwrap_err(),
            ApiError::Unauthenticated
        ));

        // Wrong signing secret.
        let foreign = encode_token(
            &SessionClaims::for_admin("ops", Utc::now().timestamp(), 3600),
            b"some-other-secret",
        )
        .unwrap();
        assert!(matches!(
            svc.authenticate(&foreign).unwrap_err(),
            ApiError::Unauthenticated
        ));
    }
}
