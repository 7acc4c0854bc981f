//! API key generation and hashing.
//!
//! Keys are opaque random strings of the form `tvk_<64 hex chars>`.
//! Only the SHA-256 hash is stored server-side, so a database leak does
//! not compromise issued keys; the `tvk_` prefix plus the first few hex
//! characters are kept as a human-readable identifier.

use rand::RngCore;
use sha2::{Digest, Sha256};

/// Prefix identifying Tavern API keys.
pub const KEY_SCHEME_PREFIX: &str = "tvk_";

/// Length of the stored display prefix (scheme + leading hex chars).
const DISPLAY_PREFIX_LEN: usize = 12;

/// Generate a new API key.
///
/// Returns `(plaintext, sha256_hex_hash, display_prefix)`. The plaintext
/// is shown to the creator exactly once; only the hash is persisted.
pub fn generate_api_key() -> (String, String, String) {
    let mut bytes = [0u8; 32];
    rand::rng().fill_bytes(&mut bytes);

    let mut hex = String::with_capacity(64);
    for b in bytes {
        hex.push_str(&format!("{b:02x}"));
    }

    let plaintext = format!("{KEY_SCHEME_PREFIX}{hex}");
    let hash = hash_api_key(&plaintext);
    let prefix = plaintext[..DISPLAY_PREFIX_LEN].to_string();
    (plaintext, hash, prefix)
}

/// Compute the SHA-256 hex digest of an API key.
///
/// Use this to compare an incoming key against the stored hash.
pub fn hash_api_key(key: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(key.as_bytes());
    format!("{:x}", hasher.finalize())
}
