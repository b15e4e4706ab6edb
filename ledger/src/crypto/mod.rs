//! # Cryptographic Primitives
//!
//! Everything the chain needs to hash and sign blocks:
//!
//! - **SHA-256** for block hashes, stored as base64 text.
//! - **Ed25519** for block signatures, one key pair per chain.
//!
//! Both are thin wrappers around audited crates (`sha2`, `ed25519-dalek`).

pub mod hash;
pub mod keys;
pub mod signatures;

pub use hash::{sha256, sha256_array, sha256_base64, sha256_base64_multi};
pub use keys::{
    BlockSignature, ChainKeypair, ChainPublicKey, KeyError, KeyProvider, OsRngKeyProvider,
    SeedKeyProvider,
};
pub use signatures::{sign_hash, verify, verify_hash, BlockSigner, SigningError};
