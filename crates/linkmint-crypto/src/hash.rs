use sha2::{Digest, Sha256};

/// SHA-256 of `input`, lowercase hex.
///
/// Used as a one-way, fixed-length key-derivation function for storage keys
/// (email-lookup index, magic-token identity, rate-limit identifiers), not
/// for confidentiality.
pub fn sha256_hex(input: &str) -> String {
    let digest = Sha256::digest(input.as_bytes());
    hex::encode(digest)
}

/// Canonical form of an email address: trimmed and lowercased.
///
/// Both repository backends key users by this form, so "  User@Example.COM "
/// and "user@example.com" resolve to the same account.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Storage-key hash of a normalized email address.
pub fn email_hash(email: &str) -> String {
    sha256_hex(&normalize_email(email))
}
