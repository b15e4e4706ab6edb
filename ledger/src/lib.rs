// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # ledger-core
//!
//! An append-only chain of blocks where every block is anchored to its
//! predecessor by a SHA-256 hash and to its author by an Ed25519 signature.
//!
//! ## Architecture
//!
//! - **crypto**: SHA-256/base64 digests, Ed25519 key pairs, the signer seam.
//! - **storage**: `Block` and the `Chain` arena that owns them.
//! - **config**: constants and environment-driven `ChainConfig`.
//! - **logging**: `tracing` subscriber setup.
//!
//! ## Example
//!
//! ```
//! use ledger_core::crypto::ChainKeypair;
//! use ledger_core::storage::{Block, Chain};
//!
//! let mut chain = Chain::new(ChainKeypair::generate());
//! let genesis = chain.create_genesis("hello world").unwrap();
//! let head = chain.append(genesis).unwrap();
//!
//! chain.append(Block::new("second", Some(head))).unwrap();
//! assert!(chain.is_valid(head));
//! ```
//!
//! Everything is single-threaded and in memory. There is no networking,
//! consensus, or persistence format.

pub mod config;
pub mod crypto;
pub mod logging;
pub mod storage;

pub use config::{ChainConfig, ConfigError};
pub use storage::{Block, BlockId, Chain, ChainError, ChainVerification, Violation};
