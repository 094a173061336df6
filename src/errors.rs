use thiserror::Error;

/// All errors that can occur in Kryptos.
#[derive(Debug, Error)]
pub enum KryptosError {
    // --- Crypto errors ---
    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    /// Wrong master password and tampered ciphertext look identical here.
    #[error("Unlock failed — wrong password or corrupted vault")]
    AuthenticationFailed,

    #[error("Stored ciphertext is too short to contain a nonce ({0} bytes)")]
    MalformedCiphertext(usize),

    #[error("Key derivation failed: {0}")]
    KeyDerivationFailed(String),

    // --- Vault errors ---
    #[error("No vault file for account '{0}'")]
    VaultNotFound(String),

    #[error("Invalid vault format: {0}")]
    InvalidFormat(String),

    #[error("Invalid account name '{0}': {1}")]
    InvalidAccountName(String, String),

    #[error("Account '{0}' not found")]
    AccountNotFound(String),

    #[error("Account '{0}' already exists")]
    AccountAlreadyExists(String),

    #[error("Entry '{0}' not found")]
    RecordNotFound(String),

    #[error("Entry id '{0}' is already present in this vault")]
    DuplicateRecord(String),

    #[error("Entry prefix '{0}' matches more than one entry — use more characters")]
    AmbiguousRecord(String),

    // --- Config errors ---
    #[error("Config file error: {0}")]
    ConfigError(String),

    // --- IO errors ---
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // --- Serialization errors ---
    #[error("Serialization error: {0}")]
    SerializationError(String),

    // --- CLI errors ---
    #[error("Command failed: {0}")]
    CommandFailed(String),

    #[error("User cancelled operation")]
    UserCancelled,

    #[error("Audit error: {0}")]
    AuditError(String),

    #[error("Cannot locate the user config directory — set KRYPTOS_DIR or pass --data-dir")]
    DataDirUnavailable,
}

/// Convenience type alias for Kryptos results.
pub type Result<T> = std::result::Result<T, KryptosError>;
