//! # opfs-vfs - SQLite on asynchronous, narrow-width storage
//!
//! `opfs-vfs` registers a SQLite VFS whose file operations are served by an
//! external [`StorageProvider`], typically a host runtime such as the browser's
//! Origin Private File System reached from WebAssembly:
//!
//! - **Marshaling bridge** re-passes 64-bit offsets and sizes by reference,
//!   for hosts that cannot receive them by value
//! - **Shared io-methods table** attached to every opened file
//! - **Delegation** of dynamic loading, randomness, sleep and last-error to
//!   the VFS SQLite already had as default
//! - **Julian-day clock** for `xCurrentTime`
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use opfs_vfs::{register_vfs, StorageProvider, VfsConfig};
//! use std::sync::Arc;
//!
//! # fn demo(provider: Arc<dyn StorageProvider>) -> opfs_vfs::Result<()> {
//! let registration = register_vfs(provider, &VfsConfig::default())?;
//!
//! let conn = registration.open_connection("/app/data.db")?;
//! conn.execute("CREATE TABLE notes (body TEXT)", [])?;
//! # Ok(())
//! # }
//! ```
//!
//! A process supports one registration per VFS name. The descriptor stays
//! registered until the process exits.

pub mod config;
pub mod error;
#[cfg(feature = "host")]
pub mod host;
pub mod provider;
pub mod trace;
pub mod vfs;

pub use crate::config::{DelegationPolicy, VfsConfig};
pub use crate::error::{OpfsError, Result};
pub use crate::provider::{FileHandle, StorageProvider};
pub use crate::trace::Traced;
pub use crate::vfs::{
    bootstrap, register_vfs, DelegatedOps, IoMethodTable, Registration, VolumeDescriptor,
    MAX_PATHNAME, VFS_NAME,
};
