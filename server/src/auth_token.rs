use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

pub const MIN_SECRET_LEN: usize = 32;

/// Default session lifetime.
pub const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(60 * 60);

/// Longest accepted session lifetime (one year).
pub const MAX_TOKEN_TTL: Duration = Duration::from_secs(365 * 24 * 60 * 60);

/// Arbitrary JSON object supplied by the client at login.
pub type ClaimsPayload = Map<String, Value>;

#[derive(Debug, thiserror::Error)]
pub enum AuthTokenError {
    #[error("auth token secret is too short (min {MIN_SECRET_LEN} bytes)")]
    SecretTooShort,

    #[error("auth token ttl must be between 1 second and {} seconds", MAX_TOKEN_TTL.as_secs())]
    InvalidTtl,

    #[error("invalid auth token format")]
    InvalidFormat,

    #[error("auth token signature is invalid")]
    InvalidSignature,

    #[error("auth token is expired")]
    Expired,

    #[error("failed to decode auth token payload")]
    PayloadDecode,

    #[error("failed to parse auth token payload")]
    PayloadParse,
}

impl AuthTokenError {
    /// `Expired` is the only failure of a token that was once valid; every other
    /// verification failure means the token was forged or mangled.
    pub fn is_expired(&self) -> bool {
        matches!(self, AuthTokenError::Expired)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionClaims {
    pub claims: ClaimsPayload,
    pub issued_at_ms: u64,
    pub expires_at_ms: u64,
}

impl SessionClaims {
    pub fn new(claims: ClaimsPayload, issued_at_ms: u64, expires_at_ms: u64) -> Self {
        Self {
            claims,
            issued_at_ms,
            expires_at_ms,
        }
    }

    pub fn is_expired(&self, reference_ms: u64) -> bool {
        reference_ms >= self.expires_at_ms
    }
}

/// Stateless session tokens: `base64url(payload).base64url(hmac_sha256(payload))`.
#[derive(Clone)]
pub struct AuthTokenService {
    secret: Arc<[u8]>,
    ttl: Duration,
}

impl AuthTokenService {
    pub fn new(secret: Vec<u8>, ttl: Duration) -> Result<Self, AuthTokenError> {
        if secret.len() < MIN_SECRET_LEN {
            return Err(AuthTokenError::SecretTooShort);
        }
        if ttl.is_zero() || ttl > MAX_TOKEN_TTL {
            return Err(AuthTokenError::InvalidTtl);
        }

        Ok(Self {
            secret: Arc::<[u8]>::from(secret),
            ttl,
        })
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn issue(&self, claims: ClaimsPayload) -> Result<String, AuthTokenError> {
        self.issue_at(claims, now_ms())
    }

    pub fn issue_at(
        &self,
        claims: ClaimsPayload,
        issued_at_ms: u64,
    ) -> Result<String, AuthTokenError> {
        let ttl_ms = u64::try_from(self.ttl.as_millis()).map_err(|_| AuthTokenError::InvalidTtl)?;
        let expires_at_ms = issued_at_ms.saturating_add(ttl_ms);
        let session = SessionClaims::new(claims, issued_at_ms, expires_at_ms);

        let payload = serde_json::to_vec(&session).map_err(|_| AuthTokenError::PayloadParse)?;
        let payload_b64 = URL_SAFE_NO_PAD.encode(payload);
        let signature = self.sign(payload_b64.as_bytes())?;
        let signature_b64 = URL_SAFE_NO_PAD.encode(signature);
        Ok(format!("{payload_b64}.{signature_b64}"))
    }

    pub fn verify(&self, token: &str) -> Result<SessionClaims, AuthTokenError> {
        self.verify_at(token, now_ms())
    }

    pub fn verify_at(
        &self,
        token: &str,
        reference_ms: u64,
    ) -> Result<SessionClaims, AuthTokenError> {
        let (payload_b64, signature_b64) = token
            .split_once('.')
            .ok_or(AuthTokenError::InvalidFormat)?;

        let signature = URL_SAFE_NO_PAD
            .decode(signature_b64)
            .map_err(|_| AuthTokenError::InvalidFormat)?;

        let mut mac = HmacSha256::new_from_slice(&self.secret)
            .map_err(|_| AuthTokenError::InvalidSignature)?;
        mac.update(payload_b64.as_bytes());
        mac.verify_slice(&signature)
            .map_err(|_| AuthTokenError::InvalidSignature)?;

        let payload = URL_SAFE_NO_PAD
            .decode(payload_b64)
            .map_err(|_| AuthTokenError::PayloadDecode)?;

        let session: SessionClaims =
            serde_json::from_slice(&payload).map_err(|_| AuthTokenError::PayloadParse)?;

        if session.is_expired(reference_ms) {
            return Err(AuthTokenError::Expired);
        }

        Ok(session)
    }

    fn sign(&self, bytes: &[u8]) -> Result<Vec<u8>, AuthTokenError> {
        let mut mac = HmacSha256::new_from_slice(&self.secret)
            .map_err(|_| AuthTokenError::InvalidSignature)?;
        mac.update(bytes);
        Ok(mac.finalize().into_bytes().to_vec())
    }
}

pub fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn test_service() -> AuthTokenService {
        AuthTokenService::new(
            b"01234567890123456789012345678901".to_vec(),
            Duration::from_secs(30),
        )
        .expect("valid service")
    }

    fn claims(value: Value) -> ClaimsPayload {
        value.as_object().cloned().expect("object claims")
    }

    #[test]
    fn issue_and_verify_roundtrip() {
        let service = test_service();
        let original = claims(json!({
            "email": "a@x.com",
            "roles": ["customer"],
            "profile": { "name": "Ada", "age": 36 }
        }));

        let token = service
            .issue_at(original.clone(), 1_000)
            .expect("issue token");

        let session = service.verify_at(&token, 1_500).expect("verify token");
        assert_eq!(session.claims, original);
        assert_eq!(session.issued_at_ms, 1_000);
        assert_eq!(session.expires_at_ms, 31_000);
    }

    #[test]
    fn empty_claims_roundtrip() {
        let service = test_service();
        let token = service.issue(ClaimsPayload::new()).expect("issue token");
        let session = service.verify(&token).expect("verify token");
        assert!(session.claims.is_empty());
    }

    #[test]
    fn rejects_tampered_token() {
        let service = test_service();
        let token = service
            .issue_at(claims(json!({ "email": "a@x.com" })), 10)
            .expect("issue token");
        let (payload, signature) = token.split_once('.').expect("token split");
        let mut chars: Vec<char> = payload.chars().collect();
        chars[0] = if chars[0] == 'A' { 'B' } else { 'A' };
        let tampered_payload: String = chars.into_iter().collect();
        let tampered = format!("{tampered_payload}.{signature}");

        let err = service.verify_at(&tampered, 20).unwrap_err();
        assert!(matches!(err, AuthTokenError::InvalidSignature));
        assert!(!err.is_expired());
    }

    #[test]
    fn rejects_token_signed_with_other_secret() {
        let service = test_service();
        let other = AuthTokenService::new(
            b"abcdefghijabcdefghijabcdefghijab".to_vec(),
            Duration::from_secs(30),
        )
        .expect("valid service");

        let token = other
            .issue_at(claims(json!({ "email": "a@x.com" })), 10)
            .expect("issue token");

        assert!(matches!(
            service.verify_at(&token, 20),
            Err(AuthTokenError::InvalidSignature)
        ));
    }

    #[test]
    fn rejects_malformed_token() {
        let service = test_service();
        assert!(matches!(
            service.verify_at("not-a-token", 0),
            Err(AuthTokenError::InvalidFormat)
        ));
        assert!(matches!(
            service.verify_at("abc.!!!", 0),
            Err(AuthTokenError::InvalidFormat)
        ));
    }

    #[test]
    fn rejects_expired_token() {
        let service = test_service();
        let token = service
            .issue_at(claims(json!({ "email": "a@x.com" })), 1_000)
            .expect("issue token");

        let err = service.verify_at(&token, 35_000).unwrap_err();
        assert!(matches!(err, AuthTokenError::Expired));
        assert!(err.is_expired());
    }

    #[test]
    fn expiry_boundary_is_exclusive() {
        let service = test_service();
        let token = service
            .issue_at(ClaimsPayload::new(), 1_000)
            .expect("issue token");

        assert!(service.verify_at(&token, 30_999).is_ok());
        assert!(matches!(
            service.verify_at(&token, 31_000),
            Err(AuthTokenError::Expired)
        ));
    }

    #[test]
    fn rejects_short_secret() {
        assert!(matches!(
            AuthTokenService::new(b"short".to_vec(), DEFAULT_TOKEN_TTL),
            Err(AuthTokenError::SecretTooShort)
        ));
    }

    #[test]
    fn rejects_out_of_range_ttl() {
        let secret = b"01234567890123456789012345678901";

        assert!(matches!(
            AuthTokenService::new(secret.to_vec(), Duration::ZERO),
            Err(AuthTokenError::InvalidTtl)
        ));
        assert!(matches!(
            AuthTokenService::new(secret.to_vec(), Duration::from_secs(u64::MAX)),
            Err(AuthTokenError::InvalidTtl)
        ));
        assert!(AuthTokenService::new(secret.to_vec(), MAX_TOKEN_TTL).is_ok());
    }

    #[test]
    fn longest_ttl_still_expires() {
        let service = AuthTokenService::new(
            b"01234567890123456789012345678901".to_vec(),
            MAX_TOKEN_TTL,
        )
        .expect("valid service");

        let token = service
            .issue_at(ClaimsPayload::new(), 1_000)
            .expect("issue token");
        let session = service.verify_at(&token, 1_000).expect("verify token");

        assert_eq!(
            session.expires_at_ms,
            1_000 + MAX_TOKEN_TTL.as_secs() * 1_000
        );
    }
}
