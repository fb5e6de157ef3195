//! Closed domain enums shared across the portal crates.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Role carried by a session and checked on every protected operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// A portal client: scoped to their own project and deliverables.
    Client,
    /// An operator: full roster and access-policy management.
    Admin,
}

impl Role {
    /// Canonical lowercase name used in tokens and storage.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Client => "client",
            Role::Admin => "admin",
        }
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "client" => Ok(Role::Client),
            "admin" => Ok(Role::Admin),
            other => Err(UnknownVariant {
                kind: "Role",
                value: other.to_string(),
            }),
        }
    }
}

/// Lifecycle status of a client account.
///
/// `unknown → provisioned → active → suspended`; `provisioned` is not a
/// stored state; depending on the activation policy a freshly provisioned
/// account lands directly in `pending` or `active`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClientStatus {
    /// Provisioned but not yet granted portal access (deposit-gated policy).
    Pending,
    /// Full portal access.
    Active,
    /// Access withdrawn by an operator.
    Suspended,
}

impl ClientStatus {
    /// Canonical lowercase name used in storage.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            ClientStatus::Pending => "pending",
            ClientStatus::Active => "active",
            ClientStatus::Suspended => "suspended",
        }
    }
}

impl Display for ClientStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClientStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ClientStatus::Pending),
            "active" => Ok(ClientStatus::Active),
            "suspended" => Ok(ClientStatus::Suspended),
            other => Err(UnknownVariant {
                kind: "ClientStatus",
                value: other.to_string(),
            }),
        }
    }
}

/// Kind of a delivered file; drives the media size-class policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliverableKind {
    Image,
    Map,
    Model,
    Video,
    Report,
}

impl DeliverableKind {
    /// All kinds, in display order for dashboard counters.
    pub const ALL: [DeliverableKind; 5] = [
        DeliverableKind::Image,
        DeliverableKind::Map,
        DeliverableKind::Model,
        DeliverableKind::Video,
        DeliverableKind::Report,
    ];

    /// Canonical lowercase name used in storage and on the wire.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            DeliverableKind::Image => "image",
            DeliverableKind::Map => "map",
            DeliverableKind::Model => "model",
            DeliverableKind::Video => "video",
            DeliverableKind::Report => "report",
        }
    }
}

impl Display for DeliverableKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeliverableKind {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "image" => Ok(DeliverableKind::Image),
            "map" => Ok(DeliverableKind::Map),
            "model" => Ok(DeliverableKind::Model),
            "video" => Ok(DeliverableKind::Video),
            "report" => Ok(DeliverableKind::Report),
            other => Err(UnknownVariant {
                kind: "DeliverableKind",
                value: other.to_string(),
            }),
        }
    }
}

/// Error returned when parsing an unknown enum variant from storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownVariant {
    /// The enum that rejected the value.
    pub kind: &'static str,
    /// The offending value.
    pub value: String,
}

impl Display for UnknownVariant {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Unknown {} value: {}", self.kind, self.value)
    }
}

impl std::error::Error for UnknownVariant {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_round_trip() {
        assert_eq!("admin".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!(Role::Client.as_str(), "client");
        assert!(Role::Admin.is_admin());
        assert!(!Role::Client.is_admin());
    }

    #[test]
    fn status_round_trip() {
        for status in [
            ClientStatus::Pending,
            ClientStatus::Active,
            ClientStatus::Suspended,
        ] {
            assert_eq!(status.as_str().parse::<ClientStatus>().unwrap(), status);
        }
    }

    #[test]
    fn kind_round_trip() {
        for kind in DeliverableKind::ALL {
            assert_eq!(kind.as_str().parse::<DeliverableKind>().unwrap(), kind);
        }
    }

    #[test]
    fn unknown_variant_is_rejected() {
        let err = "superadmin".parse::<Role>().unwrap_err();
        assert_eq!(err.kind, "Role");
        assert_eq!(err.value, "superadmin");
    }

    #[test]
    fn serde_uses_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"admin\"");
        assert_eq!(
            serde_json::to_string(&DeliverableKind::Map).unwrap(),
            "\"map\""
        );
    }
}
