use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use linkmint_types::UserId;
use serde::{Deserialize, Serialize};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Payload of a signed session token.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionClaims {
    pub user_id: UserId,
    /// Expiry as Unix seconds.
    pub exp: i64,
}

/// Sign session claims into an opaque bearer token.
///
/// Format: `base64url(JSON(claims)) . base64url(HMAC-SHA256(secret, base64url(JSON(claims))))`.
pub fn sign_session_token(claims: &SessionClaims, secret: &str) -> String {
    let payload = serde_json::to_vec(claims).expect("session claims serialize to JSON");
    let encoded_payload = URL_SAFE_NO_PAD.encode(payload);
    let signature = hmac_sha256(secret, encoded_payload.as_bytes());
    format!("{encoded_payload}.{}", URL_SAFE_NO_PAD.encode(signature))
}

/// Verify a session token against `secret` using the current clock.
///
/// Every failure mode (malformed token, bad signature, undecodable or
/// mistyped payload, expiry in the past) is `None`. Callers cannot
/// distinguish them, and must not try to.
pub fn verify_session_token(token: &str, secret: &str) -> Option<SessionClaims> {
    verify_session_token_at(token, secret, Utc::now())
}

/// [`verify_session_token`] with an explicit clock, for deterministic tests.
pub fn verify_session_token_at(
    token: &str,
    secret: &str,
    now: DateTime<Utc>,
) -> Option<SessionClaims> {
    let (encoded_payload, encoded_signature) = token.split_once('.')?;
    if encoded_payload.is_empty() || encoded_signature.is_empty() {
        return None;
    }

    let expected = hmac_sha256(secret, encoded_payload.as_bytes());
    let expected_encoded = URL_SAFE_NO_PAD.encode(expected);
    if !constant_time_eq(expected_encoded.as_bytes(), encoded_signature.as_bytes()) {
        return None;
    }

    let payload = URL_SAFE_NO_PAD.decode(encoded_payload).ok()?;
    let claims: SessionClaims = serde_json::from_slice(&payload).ok()?;
    if now.timestamp() > claims.exp {
        return None;
    }

    Some(claims)
}

fn hmac_sha256(secret: &str, data: &[u8]) -> [u8; 32] {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(data);
    mac.finalize().into_bytes().into()
}

/// Branchless comparison: equal-length check, then XOR-accumulate over every
/// byte. Early exit on a mismatching byte would leak how much of the
/// signature an attacker guessed.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b) {
        diff |= x ^ y;
    }
    diff == 0
}
