//! # Block Structure
//!
//! A block is one entry of the chain: an opaque text payload, the hash that
//! anchors it to its predecessor, the links that place it in the chain, and
//! the signature that proves who appended it.
//!
//! ## Block Layout
//!
//! ```text
//! ┌──────────────────────────────────────────────────┐
//! │  Block                                           │
//! │  ├── content: String                             │
//! │  ├── hash: String        base64(SHA-256(..))     │
//! │  ├── previous: Option<BlockId>                   │
//! │  ├── next: Option<BlockId>                       │
//! │  └── signature: Option<BlockSignature> (r, s)    │
//! └──────────────────────────────────────────────────┘
//! ```
//!
//! ## Hash Computation
//!
//! `hash = base64(SHA-256(previous.hash || content))`, plain concatenation
//! with no delimiter. A block without a predecessor hashes `content` alone.
//! The signature is not part of the hash; it signs the hash text.
//!
//! ## Links
//!
//! `previous` and `next` are [`BlockId`]s into the owning chain's arena, not
//! references. A block never reaches into the chain itself; resolving an id
//! to a block is the chain's job.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::crypto::hash::sha256_base64_multi;
use crate::crypto::keys::{BlockSignature, ChainPublicKey};
use crate::crypto::signatures::{sign_hash, verify_hash, BlockSigner, SigningError};

// ---------------------------------------------------------------------------
// BlockId
// ---------------------------------------------------------------------------

/// Position of a block in its chain's arena.
///
/// The arena is append-only, so an id stays valid for the life of the chain
/// and id order is chain order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BlockId(usize);

impl BlockId {
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Block
// ---------------------------------------------------------------------------

/// One chain entry.
///
/// `content` is fixed at construction. `hash`, `next` and `signature` are
/// filled in as the block moves through [`Chain::append`](super::Chain::append).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    content: String,
    /// Empty until computed.
    hash: String,
    previous: Option<BlockId>,
    next: Option<BlockId>,
    signature: Option<BlockSignature>,
}

impl Block {
    /// Build an unhashed, unsigned block on top of `previous`.
    ///
    /// Pass `None` for a first block, or to build a disconnected node for
    /// exercising hash and signature logic on its own.
    pub fn new(content: impl Into<String>, previous: Option<BlockId>) -> Self {
        Self {
            content: content.into(),
            hash: String::new(),
            previous,
            next: None,
            signature: None,
        }
    }

    /// Build a block with a pre-seeded hash (bootstrap and test fixtures).
    pub fn with_hash(
        content: impl Into<String>,
        hash: impl Into<String>,
        previous: Option<BlockId>,
    ) -> Self {
        Self {
            hash: hash.into(),
            ..Self::new(content, previous)
        }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// The stored hash; empty if it was never computed.
    pub fn hash(&self) -> &str {
        &self.hash
    }

    pub fn previous(&self) -> Option<BlockId> {
        self.previous
    }

    pub fn next(&self) -> Option<BlockId> {
        self.next
    }

    pub fn signature(&self) -> Option<&BlockSignature> {
        self.signature.as_ref()
    }

    pub fn has_hash(&self) -> bool {
        !self.hash.is_empty()
    }

    /// `false` means "not yet signed", never "verified absent".
    pub fn is_signed(&self) -> bool {
        self.signature.is_some()
    }

    pub fn is_genesis(&self) -> bool {
        self.previous.is_none()
    }

    /// Derive this block's hash.
    ///
    /// `previous` is the predecessor block, if any; its *stored* hash is
    /// folded in ahead of `content`. Pure: the block is not modified and the
    /// signature is not consulted.
    pub fn compute_hash(&self, previous: Option<&Block>) -> String {
        let previous_hash = previous.map(Block::hash).unwrap_or_default();
        sha256_base64_multi(&[previous_hash.as_bytes(), self.content.as_bytes()])
    }

    /// Overwrite the stored hash.
    pub fn set_hash(&mut self, value: impl Into<String>) {
        self.hash = value.into();
    }

    /// Sign the current hash text without storing the result.
    pub fn compute_signature<S: BlockSigner + ?Sized>(
        &self,
        signer: &S,
    ) -> Result<BlockSignature, SigningError> {
        sign_hash(signer, &self.hash)
    }

    /// Sign the current hash and store the signature.
    ///
    /// On error the stored signature is left untouched.
    pub fn sign<S: BlockSigner + ?Sized>(&mut self, signer: &S) -> Result<(), SigningError> {
        let signature = self.compute_signature(signer)?;
        self.signature = Some(signature);
        Ok(())
    }

    /// Replace the stored signature (bootstrap and test fixtures).
    pub fn set_signature(&mut self, signature: Option<BlockSignature>) {
        self.signature = signature;
    }

    /// Check the stored signature against the stored hash.
    pub fn verify_signature(&self, public_key: &ChainPublicKey) -> bool {
        match &self.signature {
            Some(signature) => verify_hash(public_key, &self.hash, signature),
            None => false,
        }
    }

    /// Record `id` as this block's successor.
    pub(crate) fn link_next(&mut self, id: BlockId) {
        self.next = Some(id);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
