//! # Configuration & Constants
//!
//! Every fixed parameter of the ledger lives here, along with
//! [`ChainConfig`], the small amount of runtime configuration a process
//! needs to set up a chain: where the signing key comes from and how to log.
//!
//! Runtime values are read from the environment:
//!
//! | Variable              | Meaning                                   |
//! |-----------------------|-------------------------------------------|
//! | `LEDGER_SIGNING_SEED` | hex 32-byte Ed25519 seed (optional)       |
//! | `LEDGER_LOG`          | default log filter, e.g. `ledger_core=debug` |
//! | `LEDGER_LOG_FORMAT`   | `pretty` or `json`                        |

use std::env;

use thiserror::Error;

use crate::crypto::keys::{KeyProvider, OsRngKeyProvider, SeedKeyProvider};
use crate::logging::LogFormat;

// ---------------------------------------------------------------------------
// Cryptographic Parameters
// ---------------------------------------------------------------------------

/// SHA-256 digest length in bytes.
pub const HASH_OUTPUT_LENGTH: usize = 32;

/// Length of a digest once base64-encoded (standard alphabet, padded).
pub const HASH_TEXT_LENGTH: usize = 44;

/// Ed25519 secret key (seed) length in bytes.
pub const SIGNING_KEY_LENGTH: usize = 32;

/// Public (verifying) key length in bytes.
pub const VERIFYING_KEY_LENGTH: usize = 32;

/// Length of each signature half, `r` and `s`.
pub const SIGNATURE_COMPONENT_LENGTH: usize = 32;

/// Full signature length, `r || s`.
pub const SIGNATURE_LENGTH: usize = 2 * SIGNATURE_COMPONENT_LENGTH;

// ---------------------------------------------------------------------------
// Environment
// ---------------------------------------------------------------------------

pub const ENV_SIGNING_SEED: &str = "LEDGER_SIGNING_SEED";
pub const ENV_LOG_LEVEL: &str = "LEDGER_LOG";
pub const ENV_LOG_FORMAT: &str = "LEDGER_LOG_FORMAT";

/// Log filter used when neither `RUST_LOG` nor `LEDGER_LOG` is set.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Errors from reading configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} must be a {expected}, got {len} characters")]
    InvalidSeed {
        var: &'static str,
        expected: &'static str,
        len: usize,
    },

    #[error("{var} is not valid unicode")]
    NotUnicode { var: &'static str },
}

/// Runtime configuration for setting up a chain.
#[derive(Clone, PartialEq, Eq)]
pub struct ChainConfig {
    /// Hex-encoded signing seed. `None` means a fresh key per process.
    pub signing_seed: Option<String>,
    /// Default tracing filter.
    pub log_level: String,
    pub log_format: LogFormat,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            signing_seed: None,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            log_format: LogFormat::Pretty,
        }
    }
}

impl std::fmt::Debug for ChainConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChainConfig")
            .field("signing_seed", &self.signing_seed.as_ref().map(|_| "<redacted>"))
            .field("log_level", &self.log_level)
            .field("log_format", &self.log_format)
            .finish()
    }
}

impl ChainConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key))
    }

    /// Read configuration through `lookup`, which behaves like `std::env::var`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&'static str) -> Result<String, env::VarError>,
    {
        let read = |var: &'static str| -> Result<Option<String>, ConfigError> {
            match lookup(var) {
                Ok(value) if value.trim().is_empty() => Ok(None),
                Ok(value) => Ok(Some(value.trim().to_string())),
                Err(env::VarError::NotPresent) => Ok(None),
                Err(env::VarError::NotUnicode(_)) => Err(ConfigError::NotUnicode { var }),
            }
        };

        let signing_seed = read(ENV_SIGNING_SEED)?;
        if let Some(seed) = &signing_seed {
            let well_formed = seed.len() == 2 * SIGNING_KEY_LENGTH
                && seed.chars().all(|c| c.is_ascii_hexdigit());
            if !well_formed {
                return Err(ConfigError::InvalidSeed {
                    var: ENV_SIGNING_SEED,
                    expected: "64-character hex string",
                    len: seed.len(),
                });
            }
        }

        let defaults = Self::default();
        Ok(Self {
            signing_seed,
            log_level: read(ENV_LOG_LEVEL)?.unwrap_or(defaults.log_level),
            log_format: read(ENV_LOG_FORMAT)?
                .map(|s| LogFormat::from_str_lossy(&s))
                .unwrap_or(defaults.log_format),
        })
    }

    /// The key provider this configuration calls for.
    pub fn key_provider(&self) -> Box<dyn KeyProvider> {
        match &self.signing_seed {
            Some(seed) => Box::new(SeedKeyProvider::new(seed.clone())),
            None => Box::new(OsRngKeyProvider),
        }
    }
}
