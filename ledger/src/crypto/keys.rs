//! # Key Management
//!
//! Ed25519 key pairs for signing blocks, and the [`KeyProvider`] seam through
//! which a chain obtains its key pair.
//!
//! Every chain owns exactly one key pair. Blocks are signed with its secret
//! half when they are appended and verified against its public half whenever
//! the chain is validated.
//!
//! ## Providers
//!
//! - [`OsRngKeyProvider`] draws a fresh 32-byte seed from the OS RNG. An RNG
//!   failure surfaces as [`KeyError::Generation`] instead of a panic.
//! - [`SeedKeyProvider`] rebuilds the same key pair from a hex seed, which is
//!   what you want for reproducible test chains.
//!
//! Key bytes are never logged.

use ed25519_dalek::{
    Signature as DalekSignature, Signer, SigningKey, Verifier, VerifyingKey, SECRET_KEY_LENGTH,
};
use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::config::{SIGNATURE_COMPONENT_LENGTH, SIGNATURE_LENGTH, VERIFYING_KEY_LENGTH};

/// Errors that can occur during key operations.
///
/// Messages stay vague about the key material itself.
#[derive(Debug, Error)]
pub enum KeyError {
    #[error("key generation failed: {0}")]
    Generation(String),

    #[error("invalid secret key bytes: wrong length or not a valid scalar")]
    InvalidSecretKey,

    #[error("invalid public key bytes: not a valid Ed25519 point")]
    InvalidPublicKey,
}

/// Source of the key pair a chain signs with.
pub trait KeyProvider {
    /// Produce the signing key pair.
    fn keypair(&self) -> Result<ChainKeypair, KeyError>;
}

/// Generates a fresh key pair from the operating system's RNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsRngKeyProvider;

impl KeyProvider for OsRngKeyProvider {
    fn keypair(&self) -> Result<ChainKeypair, KeyError> {
        let mut seed = [0u8; SECRET_KEY_LENGTH];
        OsRng
            .try_fill_bytes(&mut seed)
            .map_err(|e| KeyError::Generation(e.to_string()))?;
        Ok(ChainKeypair::from_seed(&seed))
    }
}

/// Rebuilds a key pair from a hex-encoded 32-byte seed.
#[derive(Clone)]
pub struct SeedKeyProvider {
    seed_hex: String,
}

impl SeedKeyProvider {
    pub fn new(seed_hex: impl Into<String>) -> Self {
        Self {
            seed_hex: seed_hex.into(),
        }
    }
}

impl KeyProvider for SeedKeyProvider {
    fn keypair(&self) -> Result<ChainKeypair, KeyError> {
        ChainKeypair::from_hex(&self.seed_hex)
    }
}

impl fmt::Debug for SeedKeyProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SeedKeyProvider(<redacted>)")
    }
}

/// An Ed25519 key pair used to sign every block of one chain.
///
/// Intentionally not `Serialize`: exporting the secret goes through
/// [`secret_key_bytes`](Self::secret_key_bytes) only.
///
/// # Examples
///
/// ```
/// use ledger_core::crypto::keys::ChainKeypair;
///
/// let kp = ChainKeypair::generate();
/// let sig = kp.sign(b"block hash text");
/// assert!(kp.public_key().verify(b"block hash text", &sig));
/// ```
pub struct ChainKeypair {
    signing_key: SigningKey,
}

/// The public half of a chain key pair.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainPublicKey {
    bytes: [u8; VERIFYING_KEY_LENGTH],
}

/// An Ed25519 signature, kept as its `(r, s)` halves.
///
/// `r` is the encoded commitment point and `s` the response scalar, each
/// 32 bytes. Together they are the standard 64-byte `R || S` encoding.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockSignature {
    r: [u8; SIGNATURE_COMPONENT_LENGTH],
    s: [u8; SIGNATURE_COMPONENT_LENGTH],
}

impl ChainKeypair {
    /// Generate a fresh key pair with the OS RNG.
    ///
    /// Panics only if the OS RNG is unavailable; use [`OsRngKeyProvider`]
    /// where that must be reported as an error.
    pub fn generate() -> Self {
        Self {
            signing_key: SigningKey::generate(&mut OsRng),
        }
    }

    /// Build a key pair deterministically from a 32-byte seed.
    pub fn from_seed(seed: &[u8; SECRET_KEY_LENGTH]) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(seed),
        }
    }

    /// Build a key pair from a hex-encoded 32-byte seed.
    pub fn from_hex(hex_str: &str) -> Result<Self, KeyError> {
        let bytes = hex::decode(hex_str.trim()).map_err(|_| KeyError::InvalidSecretKey)?;
        let seed: [u8; SECRET_KEY_LENGTH] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| KeyError::InvalidSecretKey)?;
        Ok(Self::from_seed(&seed))
    }

    pub fn public_key(&self) -> ChainPublicKey {
        ChainPublicKey {
            bytes: self.signing_key.verifying_key().to_bytes(),
        }
    }

    /// Sign `message`. Ed25519 signing is deterministic.
    pub fn sign(&self, message: &[u8]) -> BlockSignature {
        BlockSignature::from_dalek(&self.signing_key.sign(message))
    }

    /// Fallible signing, for callers that must not panic on a backend error.
    pub(crate) fn try_sign(
        &self,
        message: &[u8],
    ) -> Result<BlockSignature, ed25519_dalek::SignatureError> {
        self.signing_key
            .try_sign(message)
            .map(|sig| BlockSignature::from_dalek(&sig))
    }

    /// Exports the raw 32-byte secret key material. Handle with care.
    pub fn secret_key_bytes(&self) -> [u8; SECRET_KEY_LENGTH] {
        self.signing_key.to_bytes()
    }
}

impl Clone for ChainKeypair {
    fn clone(&self) -> Self {
        Self::from_seed(&self.signing_key.to_bytes())
    }
}

impl fmt::Debug for ChainKeypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ChainKeypair(pub={})", self.public_key().to_hex())
    }
}

impl PartialEq for ChainKeypair {
    /// Compared by public key; secret material is never compared directly.
    fn eq(&self, other: &Self) -> bool {
        self.public_key() == other.public_key()
    }
}

impl Eq for ChainKeypair {}

// ---------------------------------------------------------------------------
// ChainPublicKey
// ---------------------------------------------------------------------------

impl ChainPublicKey {
    pub fn from_bytes(bytes: [u8; VERIFYING_KEY_LENGTH]) -> Self {
        Self { bytes }
    }

    /// Parse and validate a public key from a byte slice.
    pub fn try_from_slice(slice: &[u8]) -> Result<Self, KeyError> {
        let bytes: [u8; VERIFYING_KEY_LENGTH] =
            slice.try_into().map_err(|_| KeyError::InvalidPublicKey)?;
        VerifyingKey::from_bytes(&bytes).map_err(|_| KeyError::InvalidPublicKey)?;
        Ok(Self { bytes })
    }

    pub fn as_bytes(&self) -> &[u8; VERIFYING_KEY_LENGTH] {
        &self.bytes
    }

    /// Verify `signature` over `message`. Any failure, including a malformed
    /// key, is just `false`.
    pub fn verify(&self, message: &[u8], signature: &BlockSignature) -> bool {
        let Ok(verifying_key) = VerifyingKey::from_bytes(&self.bytes) else {
            return false;
        };
        verifying_key
            .verify(message, &signature.to_dalek())
            .is_ok()
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.bytes)
    }
}

impl fmt::Debug for ChainPublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ChainPublicKey({})", self.to_hex())
    }
}

impl fmt::Display for ChainPublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

// ---------------------------------------------------------------------------
// BlockSignature
// ---------------------------------------------------------------------------

impl BlockSignature {
    /// Assemble a signature from its halves.
    pub fn from_components(
        r: [u8; SIGNATURE_COMPONENT_LENGTH],
        s: [u8; SIGNATURE_COMPONENT_LENGTH],
    ) -> Self {
        Self { r, s }
    }

    pub fn r(&self) -> &[u8; SIGNATURE_COMPONENT_LENGTH] {
        &self.r
    }

    pub fn s(&self) -> &[u8; SIGNATURE_COMPONENT_LENGTH] {
        &self.s
    }

    /// The 64-byte `R || S` encoding.
    pub fn to_bytes(&self) -> [u8; SIGNATURE_LENGTH] {
        let mut out = [0u8; SIGNATURE_LENGTH];
        out[..SIGNATURE_COMPONENT_LENGTH].copy_from_slice(&self.r);
        out[SIGNATURE_COMPONENT_LENGTH..].copy_from_slice(&self.s);
        out
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }

    fn from_dalek(sig: &DalekSignature) -> Self {
        Self {
            r: *sig.r_bytes(),
            s: *sig.s_bytes(),
        }
    }

    fn to_dalek(&self) -> DalekSignature {
        DalekSignature::from_components(self.r, self.s)
    }
}

impl fmt::Debug for BlockSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "BlockSignature(r={}, s={})",
            hex::encode(self.r),
            hex::encode(self.s)
        )
    }
}
