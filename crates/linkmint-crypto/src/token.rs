use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use rand::rngs::OsRng;
use rand::RngCore;

/// Raw byte length of a magic-link token.
///
/// Encodes to 43 base64url characters. The key-space encoder stores the
/// SHA-256 of the encoded token, so changing this length never changes the
/// shape of storage keys.
pub const TOKEN_BYTE_LENGTH: usize = 32;

/// A prefixed random identifier, e.g. `usr_2f9c…` or `lnk_a01b…`.
///
/// The body is a UUID v4 as 32 lowercase hex characters; the prefix makes
/// records self-describing in logs and bucket listings.
pub fn random_id(prefix: &str) -> String {
    format!("{prefix}_{}", uuid::Uuid::new_v4().simple())
}

/// A fresh magic-link token: [`TOKEN_BYTE_LENGTH`] bytes from the OS CSPRNG,
/// base64url-encoded without padding.
pub fn random_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTE_LENGTH];
    OsRng.fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}
