//! Session and token cryptography for linkmint.
//!
//! Pure functions with no storage dependency: the repository layer never
//! sees inside a session token, and this crate never touches the store.
//!
//! - [`sign_session_token`] / [`verify_session_token`] — opaque HMAC-SHA256
//!   session tokens carrying `{userId, exp}`
//! - [`sha256_hex`] / [`email_hash`] — one-way key derivation for
//!   email-index, magic-token, and rate-limit storage keys
//! - [`random_id`] / [`random_token`] — CSPRNG identifiers with fixed
//!   encoded lengths, consumed by the key-space encoder
//!
//! Verification failures (bad signature, expired, malformed payload) are
//! deliberately indistinguishable: every failure is `None`.

pub mod hash;
pub mod session;
pub mod token;

pub use hash::{email_hash, normalize_email, sha256_hex};
pub use session::{sign_session_token, verify_session_token, verify_session_token_at, SessionClaims};
pub use token::{random_id, random_token, TOKEN_BYTE_LENGTH};
