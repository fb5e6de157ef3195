//! Session token claims and the authenticated principal.

use serde::{Deserialize, Serialize};
use trueview_core::{ClientId, ProjectId, Role};
use uuid::Uuid;

/// Claims carried by a portal session token.
///
/// The token is self-contained: nothing is persisted server-side and expiry
/// is the only invalidation mechanism. `jti` is minted anyway so a
/// revocation list can be introduced later without changing the format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject: the client identifier (admin sessions use the operator
    /// username instead of a UUID).
    pub sub: String,
    /// Project scoped to this session, absent for operator sessions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<Uuid>,
    /// Email (or operator username) the session was opened with.
    pub email: String,
    /// Session role.
    pub role: Role,
    /// Issued-at, seconds since the epoch.
    pub iat: i64,
    /// Expiry, seconds since the epoch.
    pub exp: i64,
    /// Token identifier.
    pub jti: String,
}

impl SessionClaims {
    /// Build claims for a client session.
    #[must_use]
    pub fn for_client(
        client_id: ClientId,
        project_id: ProjectId,
        email: impl Into<String>,
        issued_at: i64,
        ttl_secs: i64,
    ) -> Self {
        Self {
            sub: client_id.to_string(),
            project_id: Some(project_id.into_uuid()),
            email: email.into(),
            role: Role::Client,
            iat: issued_at,
            exp: issued_at + ttl_secs,
            jti: Uuid::new_v4().to_string(),
        }
    }

    /// Build claims for an operator session.
    #[must_use]
    pub fn for_admin(username: impl Into<String>, issued_at: i64, ttl_secs: i64) -> Self {
        let username = username.into();
        Self {
            sub: username.clone(),
            project_id: None,
            email: username,
            role: Role::Admin,
            iat: issued_at,
            exp: issued_at + ttl_secs,
            jti: Uuid::new_v4().to_string(),
        }
    }
}

/// The authenticated identity derived from a verified session token.
///
/// Every protected operation checks `role` explicitly; client principals
/// additionally carry the client/project pair used for ownership checks.
#[derive(Debug, Clone)]
pub struct Principal {
    /// Client identifier, absent for operator sessions.
    pub client_id: Option<ClientId>,
    /// Project identifier, absent for operator sessions.
    pub project_id: Option<ProjectId>,
    /// Email (or operator username).
    pub email: String,
    /// Session role.
    pub role: Role,
}

impl Principal {
    /// Derive a principal from verified claims.
    ///
    /// Client claims with a non-UUID subject are rejected upstream by the
    /// session service; here a non-UUID subject simply yields no client id
    /// (operator sessions).
    #[must_use]
    pub fn from_claims(claims: &SessionClaims) -> Self {
        let client_id = claims.sub.parse::<Uuid>().ok().map(ClientId::from_uuid);
        Self {
            client_id,
            project_id: claims.project_id.map(ProjectId::from_uuid),
            email: claims.email.clone(),
            role: claims.role,
        }
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_claims_carry_scope() {
        let client = ClientId::new();
        let project = ProjectId::new();
        let claims = SessionClaims::for_client(client, project, "a@x.com", 1_000, 86_400);

        assert_eq!(claims.sub, client.to_string());
        assert_eq!(claims.project_id, Some(*project.as_uuid()));
        assert_eq!(claims.role, Role::Client);
        assert_eq!(claims.exp, 1_000 + 86_400);
    }

    #[test]
    fn admin_claims_have_no_project() {
        let claims = SessionClaims::for_admin("ops", 500, 28_800);
        assert_eq!(claims.project_id, None);
        assert_eq!(claims.role, Role::Admin);
        assert_eq!(claims.exp, 500 + 28_800);
    }

    #[test]
    fn jti_is_unique_per_token() {
        let a = SessionClaims::for_admin("ops", 0, 1);
        let b = SessionClaims::for_admin("ops", 0, 1);
        assert_ne!(a.jti, b.jti);
    }

    #[test]
    fn principal_from_client_claims() {
        let client = ClientId::new();
        let project = ProjectId::new();
        let claims = SessionClaims::for_client(client, project, "a@x.com", 0, 60);
        let principal = Principal::from_claims(&claims);

        assert_eq!(principal.client_id, Some(client));
        assert_eq!(principal.project_id, Some(project));
        assert!(!principal.is_admin());
    }

    #[test]
    fn principal_from_admin_claims() {
        let claims = SessionClaims::for_admin("ops", 0, 60);
        let principal = Principal::from_claims(&claims);

        assert_eq!(principal.client_id, None);
        assert!(principal.is_admin());
    }
}
