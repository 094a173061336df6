//! Vault module — credential records and their encrypted storage.
//!
//! This module provides:
//! - `Record` and `RecordUpdate` (`record`)
//! - The ordered, id-unique `Vault` collection (`collection`)
//! - The JSON envelope format and atomic writes (`format`)
//! - App directory and file naming (`paths`)
//! - `VaultRepository` for load/save/export/import per account (`store`)
//! - `AccountRegistry`, the plaintext list of account names (`registry`)

pub mod collection;
pub mod format;
pub mod paths;
pub mod record;
pub mod registry;
pub mod store;

// Re-export the most commonly used items.
pub use collection::Vault;
pub use format::{Envelope, StoredKdfParams, CURRENT_VERSION};
pub use record::{Record, RecordUpdate};
pub use registry::AccountRegistry;
pub use store::VaultRepository;
