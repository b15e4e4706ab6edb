//! # Digital Signatures
//!
//! The signer/verifier seam between blocks and key material.
//!
//! Blocks never touch `ed25519-dalek` directly. They sign through
//! [`BlockSigner`], which gives the chain a single place where signing can
//! fail and a single error type ([`SigningError`]) to propagate when it does.
//!
//! ## What gets signed
//!
//! A block signature covers the UTF-8 bytes of the block's *base64 hash
//! text*, not the 32 raw digest bytes. Every producer and verifier of block
//! signatures has to agree on this, so keep it that way.

use thiserror::Error;

use super::keys::{BlockSignature, ChainKeypair, ChainPublicKey};

/// Errors during signing.
#[derive(Debug, Error)]
pub enum SigningError {
    #[error("signing backend failed: {0}")]
    Backend(String),

    #[error("refusing to sign an empty block hash")]
    EmptyHash,
}

/// Anything that can sign block hashes on behalf of a chain.
pub trait BlockSigner {
    /// Sign `message`.
    fn sign_message(&self, message: &[u8]) -> Result<BlockSignature, SigningError>;

    /// The public key that verifies this signer's signatures.
    fn public_key(&self) -> ChainPublicKey;
}

impl BlockSigner for ChainKeypair {
    fn sign_message(&self, message: &[u8]) -> Result<BlockSignature, SigningError> {
        self.try_sign(message)
            .map_err(|e| SigningError::Backend(e.to_string()))
    }

    fn public_key(&self) -> ChainPublicKey {
        ChainKeypair::public_key(self)
    }
}

/// Sign a block hash with `signer`.
///
/// The signed message is `hash.as_bytes()`. An empty hash is rejected since
/// it means the block was never hashed.
///
/// # Example
///
/// ```
/// use ledger_core::crypto::{sign_hash, verify_hash, ChainKeypair};
///
/// let keypair = ChainKeypair::generate();
/// let signature = sign_hash(&keypair, "uU0nuZNNPgilLlLX2n2r+sSE7+N6U4DukIj3rOLvzek=").unwrap();
/// assert!(verify_hash(
///     &keypair.public_key(),
///     "uU0nuZNNPgilLlLX2n2r+sSE7+N6U4DukIj3rOLvzek=",
///     &signature,
/// ));
/// ```
pub fn sign_hash<S: BlockSigner + ?Sized>(
    signer: &S,
    hash: &str,
) -> Result<BlockSignature, SigningError> {
    if hash.is_empty() {
        return Err(SigningError::EmptyHash);
    }
    signer.sign_message(hash.as_bytes())
}

/// Verify a signature over a block hash. `false` on any mismatch.
pub fn verify_hash(public_key: &ChainPublicKey, hash: &str, signature: &BlockSignature) -> bool {
    verify(public_key, hash.as_bytes(), signature)
}

/// Verify an Ed25519 signature against a public key and raw message.
pub fn verify(public_key: &ChainPublicKey, message: &[u8], signature: &BlockSignature) -> bool {
    public_key.verify(message, signature)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A signer whose backend always fails.
    struct BrokenSigner(ChainPublicKey);

    impl BlockSigner for BrokenSigner {
        fn sign_message(&self, _message: &[u8]) -> Result<BlockSignature, SigningError> {
            Err(SigningError::Backend("rng unavailable".into()))
        }

        fn public_key(&self) -> ChainPublicKey {
            self.0.clone()
        }
    }

    #[test]
    fn test_sign_and_verify_hash() {
        let kp = ChainKeypair::generate();
        let sig = sign_hash(&kp, "abcd").unwrap();
        assert!(verify_hash(&kp.public_key(), "abcd", &sig));
    }

    #[test]
    fn test_signature_covers_text_bytes() {
        let kp = ChainKeypair::generate();
        let hash = crate::crypto::hash::sha256_base64(b"hello world");
        let sig = sign_hash(&kp, &hash).unwrap();

        assert!(verify(&kp.public_key(), hash.as_bytes(), &sig));
        // The raw digest is a different message.
        let raw = crate::crypto::hash::sha256(b"hello world");
        assert!(!verify(&kp.public_key(), &raw, &sig));
    }

    #[test]
    fn test_wrong_hash_fails() {
        let kp = ChainKeypair::generate();
        let sig = sign_hash(&kp, "abcd").unwrap();
        assert!(!verify_hash(&kp.public_key(), "abce", &sig));
    }

    #[test]
    fn test_wrong_key_fails() {
        let kp1 = ChainKeypair::generate();
        let kp2 = ChainKeypair::generate();
        let sig = sign_hash(&kp1, "abcd").unwrap();
        assert!(!verify_hash(&kp2.public_key(), "abcd", &sig));
    }

    #[test]
    fn test_mutated_r_or_s_fails() {
        let kp = ChainKeypair::generate();
        let sig = sign_hash(&kp, "deadbeef").unwrap();

        for i in [0usize, 7, 31] {
            let mut r = *sig.r();
            r[i] ^= 0x01;
            let tampered = BlockSignature::from_components(r, *sig.s());
            assert!(!verify_hash(&kp.public_key(), "deadbeef", &tampered));

            let mut s = *sig.s();
            s[i] ^= 0x01;
            let tampered = BlockSignature::from_components(*sig.r(), s);
            assert!(!verify_hash(&kp.public_key(), "deadbeef", &tampered));
        }
    }

    #[test]
    fn test_empty_hash_rejected() {
        let kp = ChainKeypair::generate();
        assert!(matches!(sign_hash(&kp, ""), Err(SigningError::EmptyHash)));
    }

    #[test]
    fn test_backend_failure_surfaces() {
        let signer = BrokenSigner(ChainKeypair::generate().public_key());
        let err = sign_hash(&signer, "abcd").unwrap_err();
        assert!(matches!(err, SigningError::Backend(_)));
        assert!(err.to_string().contains("rng unavailable"));
    }

    #[test]
    fn test_deterministic_signatures() {
        let kp = ChainKeypair::generate();
        let a = sign_hash(&kp, "same").unwrap();
        let b = sign_hash(&kp, "same").unwrap();
        assert_eq!(a, b);
    }
}
