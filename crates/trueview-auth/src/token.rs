//! Session token encoding and decoding with HS256.
//!
//! The portal is a single service, so tokens are signed with a shared
//! secret rather than an RSA key pair. Only HS256 is accepted on decode.

use crate::claims::SessionClaims;
use crate::error::AuthError;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

/// Clock skew tolerance in seconds for expiry validation.
const LEEWAY_SECS: u64 = 60;

/// Encode session claims into a signed token string.
///
/// # Errors
///
/// Returns [`AuthError::InvalidToken`] if encoding fails.
pub fn encode_token(claims: &SessionClaims, secret: &[u8]) -> Result<String, AuthError> {
    let header = Header::new(Algorithm::HS256);
    let key = EncodingKey::from_secret(secret);

    encode(&header, claims, &key).map_err(|e| AuthError::InvalidToken(format!("Encoding failed: {e}")))
}

/// Decode and validate a session token.
///
/// # Errors
///
/// - [`AuthError::TokenExpired`] - past expiry (beyond leeway)
/// - [`AuthError::InvalidSignature`] - signature verification failed
/// - [`AuthError::InvalidToken`] - malformed token or claims
pub fn decode_token(token: &str, secret: &[u8]) -> Result<SessionClaims, AuthError> {
    let key = DecodingKey::from_secret(secret);

    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = LEEWAY_SECS;
    validation.validate_exp = true;
    validation.algorithms = vec![Algorithm::HS256];

    let data = decode::<SessionClaims>(token, &key, &validation).map_err(map_jwt_error)?;
    Ok(data.claims)
}

/// Map jsonwebtoken errors to [`AuthError`].
fn map_jwt_error(err: jsonwebtoken::errors::Error) -> AuthError {
    use jsonwebtoken::errors::ErrorKind;

    match err.kind() {
        ErrorKind::ExpiredSignature => AuthError::TokenExpired,
        ErrorKind::InvalidSignature => AuthError::InvalidSignature,
        ErrorKind::InvalidToken => AuthError::InvalidToken("Malformed token".to_string()),
        ErrorKind::Base64(_) => AuthError::InvalidToken("Invalid base64 encoding".to_string()),
        ErrorKind::Json(_) => AuthError::InvalidToken("Invalid JSON in claims".to_string()),
        _ => AuthError::InvalidToken(format!("Token validation failed: {err}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use trueview_core::{ClientId, ProjectId, Role};

    const SECRET: &[u8] = b"test-session-signing-secret";
    const OTHER_SECRET: &[u8] = b"a-different-signing-secret";

    fn client_claims(ttl_secs: i64) -> SessionClaims {
        SessionClaims::for_client(
            ClientId::new(),
            ProjectId::new(),
            "client@example.com",
            Utc::now().timestamp(),
            ttl_secs,
        )
    }

    #[test]
    fn round_trip_preserves_claims() {
        let claims = client_claims(3600);
        let token = encode_token(&claims, SECRET).unwrap();
        let decoded = decode_token(&token, SECRET).unwrap();

        assert_eq!(decoded.sub, claims.sub);
        assert_eq!(decoded.project_id, claims.project_id);
        assert_eq!(decoded.email, claims.email);
        assert_eq!(decoded.role, Role::Client);
        assert_eq!(decoded.exp, claims.exp);
        assert_eq!(decoded.jti, claims.jti);
    }

    #[test]
    fn token_has_three_parts() {
        let token = encode_token(&client_claims(3600), SECRET).unwrap();
        assert_eq!(token.split('.').count(), 3);
    }

    #[test]
    fn expired_token_is_rejected() {
        // Expired well past the leeway window.
        let claims = client_claims(-3600);
        let token = encode_token(&claims, SECRET).unwrap();

        let err = decode_token(&token, SECRET).unwrap_err();
        assert!(matches!(err, AuthError::TokenExpired));
    }

    #[test]
    fn leeway_tolerates_slight_expiry() {
        let claims = client_claims(-30);
        let token = encode_token(&claims, SECRET).unwrap();
        assert!(decode_token(&token, SECRET).is_ok());
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = encode_token(&client_claims(3600), SECRET).unwrap();
        let err = decode_token(&token, OTHER_SECRET).unwrap_err();
        assert!(matches!(err, AuthError::InvalidSignature));
    }

    #[test]
    fn malformed_token_is_rejected() {
        let err = decode_token("not.a.token", SECRET).unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken(_)));
    }

    #[test]
    fn tampered_payload_is_rejected() {
        let token = encode_token(&client_claims(3600), SECRET).unwrap();
        let mut parts: Vec<&str> = token.split('.').collect();
        let tampered = format!("{}A", parts[1]);
        parts[1] = &tampered;
        let forged = parts.join(".");

        assert!(decode_token(&forged, SECRET).is_err());
    }
}
