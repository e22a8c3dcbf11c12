use std::os::raw::c_int;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OpfsError {
    #[error("SQLite initialization failed: {0}")]
    Initialize(c_int),

    #[error("VFS registration failed: {0}")]
    VFSRegistrationFailed(c_int),

    #[error("Invalid VFS name: {0}")]
    InvalidName(String),

    #[error("No default VFS registered to delegate platform operations to")]
    NoDefaultVfs,

    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

pub type Result<T> = std::result::Result<T, OpfsError>;
