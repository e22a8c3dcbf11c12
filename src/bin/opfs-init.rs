//! OPFS VFS bootstrap
//!
//! Process entry point for the WebAssembly build: registers the OPFS VFS as
//! SQLite's default and returns. The host keeps the module alive and calls
//! into SQLite afterwards.

use anyhow::Context;
use opfs_vfs::host::HostProvider;

fn main() -> anyhow::Result<()> {
    opfs_vfs::bootstrap(HostProvider).context("Failed to register the OPFS VFS")?;
    Ok(())
}
