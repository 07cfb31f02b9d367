use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("shift must be between 0 and 25, got {0}")]
    InvalidShift(i64),

    #[error("invalid key: {0}")]
    InvalidKey(String),

    #[error("invalid AES key length: {0} bytes (expected 16, 24 or 32)")]
    InvalidKeyLength(usize),

    #[error("invalid IV length for {mode}: {len} bytes")]
    InvalidIvLength { mode: &'static str, len: usize },

    #[error("missing IV for {0}")]
    MissingIv(&'static str),

    #[error("invalid padding in decrypted data")]
    Padding,

    #[error("unsupported AES mode '{0}'")]
    UnknownMode(String),

    #[error("unsupported RSA padding '{0}'")]
    UnknownPadding(String),

    #[error("message of {len} bytes is too long for this key (max {max})")]
    MessageTooLong { len: usize, max: usize },

    #[error("RSA operation failed: {0}")]
    Rsa(#[from] rsa::Error),

    #[error("key encoding error: {0}")]
    KeyEncoding(String),

    #[error("could not read config '{path}': {reason}")]
    Config { path: String, reason: String },
}

pub type Result<T> = std::result::Result<T, Error>;
