//! Registration settings
//!
//! The defaults reproduce the stock OPFS setup: a VFS named `opfs` that
//! becomes SQLite's default and tolerates a missing reference VFS.
//!
//! ```toml
//! name = "opfs"
//! make_default = true
//! delegation = "lenient"
//! ```

use crate::error::Result;
use crate::vfs::VFS_NAME;
use serde::{Deserialize, Serialize};

/// What to do when no default VFS exists to borrow platform operations from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DelegationPolicy {
    /// Leave the delegated slots unbound and log a warning.
    #[default]
    Lenient,
    /// Refuse to register.
    Strict,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VfsConfig {
    /// Name the VFS is registered under.
    pub name: String,
    /// Whether SQLite should use this VFS when none is named explicitly.
    pub make_default: bool,
    pub delegation: DelegationPolicy,
}

impl Default for VfsConfig {
    fn default() -> Self {
        Self {
            name: VFS_NAME.to_string(),
            make_default: true,
            delegation: DelegationPolicy::Lenient,
        }
    }
}

impl VfsConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn make_default(mut self, make_default: bool) -> Self {
        self.make_default = make_default;
        self
    }

    pub fn delegation(mut self, policy: DelegationPolicy) -> Self {
        self.delegation = policy;
        self
    }
}
