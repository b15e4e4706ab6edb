//! # Hashing Utilities
//!
//! SHA-256 is the only digest the ledger uses. Block hashes are stored and
//! compared as text, so the helpers here come in two flavours:
//!
//! - **raw** (`sha256`, `sha256_array`) for callers that want the bytes;
//! - **base64** (`sha256_base64`, `sha256_base64_multi`) for the textual form
//!   that ends up in `Block::hash`.
//!
//! The base64 alphabet is the standard one with padding, so a 32-byte digest
//! always encodes to 44 characters.

use base64::engine::general_purpose::STANDARD as B64;
use base64::Engine as _;
use sha2::{Digest, Sha256};

use crate::config::HASH_OUTPUT_LENGTH;

/// Compute the SHA-256 hash of the input data.
///
/// # Example
///
/// ```
/// use ledger_core::crypto::sha256;
///
/// let hash = sha256(b"ledger");
/// assert_eq!(hash.len(), 32);
/// ```
pub fn sha256(data: &[u8]) -> Vec<u8> {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().to_vec()
}

/// Compute the SHA-256 hash and return a fixed-size array.
pub fn sha256_array(data: &[u8]) -> [u8; HASH_OUTPUT_LENGTH] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Hash several byte slices as if they were concatenated.
///
/// The parts are fed into the hasher in order, so
/// `sha256_multi(&[a, b]) == sha256(a ++ b)` without the temporary buffer.
pub fn sha256_multi(parts: &[&[u8]]) -> [u8; HASH_OUTPUT_LENGTH] {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update(part);
    }
    hasher.finalize().into()
}

/// SHA-256 of `data`, encoded as standard padded base64.
///
/// ```
/// use ledger_core::crypto::sha256_base64;
///
/// assert_eq!(
///     sha256_base64(b""),
///     "47DEQpj8HBSa+/TImW+5JCeuQeRkm5NMpJWZG3hSuFU="
/// );
/// ```
pub fn sha256_base64(data: &[u8]) -> String {
    B64.encode(sha256_array(data))
}

/// [`sha256_multi`] encoded as standard padded base64.
pub fn sha256_base64_multi(parts: &[&[u8]]) -> String {
    B64.encode(sha256_multi(parts))
}
