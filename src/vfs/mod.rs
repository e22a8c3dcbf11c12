//! SQLite VFS (Virtual File System) for asynchronous storage providers
//!
//! This module adapts SQLite's synchronous VFS contract to a
//! [`StorageProvider`](crate::provider::StorageProvider) whose host cannot
//! pass 64-bit integers by value:
//!
//! - `sqlite3_io_methods` slots trampoline onto the provider, with offsets
//!   and sizes re-passed by reference
//! - the `sqlite3_vfs` descriptor is version 1 with a 1024-byte path limit
//! - dynamic loading, randomness, sleep and last-error come from the
//!   default VFS found at registration time

pub mod bridge;
mod delegate;
mod file;
pub mod time;
#[allow(clippy::module_inception)]
mod vfs;


pub use delegate::DelegatedOps;
pub use file::IoMethodTable;
pub use vfs::{
    bootstrap, register_vfs, Registration, VolumeDescriptor, MAX_PATHNAME, VFS_NAME,
};
