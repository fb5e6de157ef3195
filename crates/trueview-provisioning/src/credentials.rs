//! Credential issuance for newly booked clients.
//!
//! Pure and stateless: identifiers come from UUID v4 and the temporary
//! password from the OS CSPRNG. The issuer performs no I/O and nothing
//! here is ever logged.

use chrono::{DateTime, Utc};
use rand::rngs::OsRng;
use rand::Rng;
use trueview_core::{ClientId, ProjectId};

/// Length of issued temporary passwords.
const PASSWORD_LEN: usize = 16;

const UPPER: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ";
const LOWER: &[u8] = b"abcdefghijkmnopqrstuvwxyz";
const DIGITS: &[u8] = b"23456789";

/// Credentials issued for one provisioning.
#[derive(Debug, Clone)]
pub struct IssuedCredentials {
    pub client_id: ClientId,
    pub project_id: ProjectId,
    /// Mixed-alphanumeric one-time password; appears only in the welcome
    /// notification, stored only as a hash.
    pub temporary_password: String,
}

/// Stateless credential issuer.
#[derive(Debug, Clone, Copy, Default)]
pub struct CredentialIssuer;

impl CredentialIssuer {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Issue a fresh identifier pair and temporary password.
    ///
    /// The email and booking timestamp are accepted for interface parity
    /// with the CRM contract but do not influence the generated values;
    /// predictability is exactly what this must avoid.
    #[must_use]
    pub fn issue(&self, _email: &str, _booked_at: DateTime<Utc>) -> IssuedCredentials {
        IssuedCredentials {
            client_id: ClientId::new(),
            project_id: ProjectId::new(),
            temporary_password: generate_password(),
        }
    }
}

/// Generate a password with at least one character from each class.
///
/// Ambiguous glyphs (O/0, l/1, I) are excluded from the alphabets so the
/// credential survives being read off an email.
fn generate_password() -> String {
    let alphabet: Vec<u8> = [UPPER, LOWER, DIGITS].concat();
    let mut rng = OsRng;

    loop {
        let password: String = (0..PASSWORD_LEN)
            .map(|_| alphabet[rng.gen_range(0..alphabet.len())] as char)
            .collect();

        let has_upper = password.bytes().any(|b| UPPER.contains(&b));
        let has_lower = password.bytes().any(|b| LOWER.contains(&b));
        let has_digit = password.bytes().any(|b| DIGITS.contains(&b));
        if has_upper && has_lower && has_digit {
            return password;
        }
    }
}
