//! # Storage Module
//!
//! The in-memory block structures that make up a ledger.
//!
//! ## Architecture
//!
//! ```text
//! block.rs  : Block structure, BlockId, hash/sign operations
//! chain.rs  : Append-only arena of blocks with integrity verification
//! ```
//!
//! ## Data Flow
//!
//! ```text
//! content ──► Block ──► Chain::append ──► hashed, signed, linked
//!                              │
//!                              ▼
//!                     Chain::is_valid / verify_from
//! ```
//!
//! Each block's hash folds in its predecessor's stored hash, so changing any
//! ancestor invalidates every descendant on the next verification walk.

pub mod block;
pub mod chain;

pub use block::{Block, BlockId};
pub use chain::{Chain, ChainError, ChainVerification, Violation};
