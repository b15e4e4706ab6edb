//! In-memory chain management with validation.
//!
//! The chain owns every block in an append-only arena (`Vec<Block>`) and the
//! signer that signs them. Blocks refer to each other by [`BlockId`], so
//! there is no shared ownership and no way for a link to dangle once a block
//! has been appended.

use thiserror::Error;
use tracing::{debug, warn};

use super::block::{Block, BlockId};
use crate::crypto::keys::{ChainKeypair, ChainPublicKey, KeyError, KeyProvider};
use crate::crypto::signatures::{verify_hash, BlockSigner, SigningError};

/// Errors raised while building or extending a chain.
#[derive(Debug, Error)]
pub enum ChainError {
    #[error("failed to sign block: {0}")]
    Signing(#[from] SigningError),

    #[error("failed to obtain chain key pair: {0}")]
    Key(#[from] KeyError),

    #[error("unknown predecessor block {0}")]
    UnknownBlock(BlockId),

    #[error("block {0} already has a successor")]
    AlreadyLinked(BlockId),

    #[error("block to append already claims successor {0}")]
    PresetSuccessor(BlockId),
}

/// Why a block failed verification.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Violation {
    /// The stored hash differs from the recomputed one.
    HashMismatch { expected: String, stored: String },
    /// The block was never signed.
    MissingSignature,
    /// The stored signature does not verify under the chain's public key.
    InvalidSignature,
    /// A `previous`/`next` id that does not resolve to a valid position.
    DanglingLink(BlockId),
    /// The successor named by `next` does not point back at this block.
    BrokenBackLink {
        next: BlockId,
        previous: Option<BlockId>,
    },
}

/// Result of walking a chain from a start block.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChainVerification {
    /// Whether every block reached was valid.
    pub valid: bool,
    /// Number of blocks that passed before the walk stopped.
    pub blocks_verified: u64,
    /// First block that failed, if any.
    pub first_invalid: Option<BlockId>,
    /// Why it failed.
    pub violation: Option<Violation>,
}

impl ChainVerification {
    fn passed(blocks_verified: u64) -> Self {
        Self {
            valid: true,
            blocks_verified,
            first_invalid: None,
            violation: None,
        }
    }

    fn failed(blocks_verified: u64, at: BlockId, violation: Violation) -> Self {
        Self {
            valid: false,
            blocks_verified,
            first_invalid: Some(at),
            violation: Some(violation),
        }
    }
}

/// Ordered, append-only chain of signed blocks.
///
/// `S` is the signer appended blocks are signed with; by default the chain's
/// own Ed25519 key pair.
#[derive(Debug, Clone)]
pub struct Chain<S = ChainKeypair> {
    blocks: Vec<Block>,
    signer: S,
}

impl Chain<ChainKeypair> {
    /// An empty chain whose key pair comes from `provider`.
    pub fn from_provider<P: KeyProvider + ?Sized>(provider: &P) -> Result<Self, ChainError> {
        Ok(Self::new(provider.keypair()?))
    }
}

impl<S: BlockSigner> Chain<S> {
    /// An empty chain signing with `signer`.
    pub fn new(signer: S) -> Self {
        Self {
            blocks: Vec::new(),
            signer,
        }
    }

    /// A chain seeded with existing blocks, stored verbatim.
    ///
    /// Nothing is hashed, signed or linked. Meant for bootstrap and test
    /// fixtures; run [`verify_from`](Self::verify_from) before trusting it.
    pub fn with_blocks(signer: S, blocks: Vec<Block>) -> Self {
        Self { blocks, signer }
    }

    pub fn public_key(&self) -> ChainPublicKey {
        self.signer.public_key()
    }

    pub fn signer(&self) -> &S {
        &self.signer
    }

    /// Build the first block of a chain: no predecessor, hashed and signed.
    ///
    /// The block is returned, not appended; pass it to [`append`](Self::append)
    /// to make it element 0.
    pub fn create_genesis(&self, content: impl Into<String>) -> Result<Block, ChainError> {
        let mut block = Block::new(content, None);
        let hash = block.compute_hash(None);
        block.set_hash(hash);
        block.sign(&self.signer)?;

        debug!(hash = %block.hash(), "created genesis block");
        Ok(block)
    }

    /// Finalize `block` and record it at the end of the chain.
    ///
    /// An empty hash is computed from the predecessor's stored hash, an
    /// unsigned block is signed with the chain key pair, and the predecessor
    /// is linked forward to the new block. Nothing is mutated if any step
    /// fails.
    ///
    /// `next` is only ever set by linking, so a block that already carries
    /// one (a clone of a linked block, or one deserialized with a successor)
    /// is rejected.
    pub fn append(&mut self, mut block: Block) -> Result<BlockId, ChainError> {
        if let Some(next) = block.next() {
            return Err(ChainError::PresetSuccessor(next));
        }
        if let Some(previous) = block.previous() {
            let predecessor = self
                .get(previous)
                .ok_or(ChainError::UnknownBlock(previous))?;
            if predecessor.next().is_some() {
                return Err(ChainError::AlreadyLinked(previous));
            }
        }

        if !block.has_hash() {
            let hash = self.compute_hash(&block);
            block.set_hash(hash);
        }
        if !block.is_signed() {
            block.sign(&self.signer)?;
        }

        let id = BlockId::new(self.blocks.len());
        debug!(block = %id, previous = ?block.previous(), hash = %block.hash(), "appending block");
        self.blocks.push(block);
        self.link_to_previous(id);
        Ok(id)
    }

    /// Expected hash of `block`, using its predecessor's stored hash.
    ///
    /// A `previous` id that is not in this chain contributes nothing, the
    /// same as a genesis block.
    pub fn compute_hash(&self, block: &Block) -> String {
        let previous = block.previous().and_then(|id| self.get(id));
        block.compute_hash(previous)
    }

    /// Point the predecessor of `id` forward at `id`. No-op for genesis.
    fn link_to_previous(&mut self, id: BlockId) {
        let Some(previous) = self.get(id).and_then(Block::previous) else {
            return;
        };
        if let Some(predecessor) = self.blocks.get_mut(previous.index()) {
            predecessor.link_next(id);
        }
    }

    /// Whether the sub-chain starting at `start` is intact.
    ///
    /// Walks forward through `next`, recomputing each hash, verifying each
    /// signature and checking that every successor links back, and stops at
    /// the first mismatch. An id outside the chain is not valid.
    pub fn is_valid(&self, start: BlockId) -> bool {
        self.verify_from(start).valid
    }

    /// Like [`is_valid`](Self::is_valid), with a report of where and why the
    /// walk stopped.
    pub fn verify_from(&self, start: BlockId) -> ChainVerification {
        let mut verified = 0u64;
        let mut current = start;

        loop {
            let Some(block) = self.get(current) else {
                return self.reject(verified, current, Violation::DanglingLink(current));
            };

            let next = match self
                .check_block(block)
                .and_then(|()| self.check_next(current, block))
            {
                Ok(next) => next,
                Err(violation) => return self.reject(verified, current, violation),
            };
            verified += 1;

            match next {
                None => return ChainVerification::passed(verified),
                Some(next) => current = next,
            }
        }
    }

    fn check_block(&self, block: &Block) -> Result<(), Violation> {
        let previous = match block.previous() {
            Some(id) => Some(self.get(id).ok_or(Violation::DanglingLink(id))?),
            None => None,
        };

        let expected = block.compute_hash(previous);
        if expected != block.hash() {
            return Err(Violation::HashMismatch {
                expected,
                stored: block.hash().to_string(),
            });
        }

        let signature = block.signature().ok_or(Violation::MissingSignature)?;
        if !verify_hash(&self.public_key(), &expected, signature) {
            return Err(Violation::InvalidSignature);
        }
        Ok(())
    }

    /// Resolve the forward link of `block`, stored at `id`.
    fn check_next(&self, id: BlockId, block: &Block) -> Result<Option<BlockId>, Violation> {
        let Some(next) = block.next() else {
            return Ok(None);
        };
        // Links only ever point forward; anything else is corrupt.
        if next <= id {
            return Err(Violation::DanglingLink(next));
        }
        let successor = self.get(next).ok_or(Violation::DanglingLink(next))?;
        if successor.previous() != Some(id) {
            return Err(Violation::BrokenBackLink {
                next,
                previous: successor.previous(),
            });
        }
        Ok(Some(next))
    }

    fn reject(&self, verified: u64, at: BlockId, violation: Violation) -> ChainVerification {
        warn!(block = %at, ?violation, "chain integrity violation");
        ChainVerification::failed(verified, at, violation)
    }

    pub fn get(&self, id: BlockId) -> Option<&Block> {
        self.blocks.get(id.index())
    }

    /// Mutable access to a stored block, for repair tooling and tests.
    ///
    /// The chain never mutates appended blocks on its own.
    pub fn get_mut(&mut self, id: BlockId) -> Option<&mut Block> {
        self.blocks.get_mut(id.index())
    }

    /// Id of the first block, if any.
    pub fn head(&self) -> Option<BlockId> {
        (!self.blocks.is_empty()).then(|| BlockId::new(0))
    }

    /// Id of the most recently appended block, if any.
    pub fn tip(&self) -> Option<BlockId> {
        self.blocks.len().checked_sub(1).map(BlockId::new)
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Blocks in insertion order, with their ids.
    pub fn iter(&self) -> impl Iterator<Item = (BlockId, &Block)> {
        self.blocks
            .iter()
            .enumerate()
            .map(|(index, block)| (BlockId::new(index), block))
    }
}
