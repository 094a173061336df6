//! Kryptos: a local password manager.
//!
//! Each account owns one vault file holding its records, encrypted with
//! AES-256-GCM under a key derived from the account's master password
//! with Argon2id. Account names live in a plaintext registry next to the
//! vault files.

#[cfg(feature = "audit-log")]
pub mod audit;
pub mod cli;
pub mod config;
pub mod crypto;
pub mod errors;
pub mod generator;
pub mod vault;

pub use errors::{KryptosError, Result};
pub use vault::{AccountRegistry, Record, RecordUpdate, Vault, VaultRepository};
