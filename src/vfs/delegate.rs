//! Platform operations borrowed from the default VFS
//!
//! The OPFS VFS only implements file I/O and time. Dynamic loading,
//! randomness, sleeping and last-error reporting are copied slot by slot from
//! whatever VFS SQLite had as its default before we registered. The copy is a
//! snapshot: later changes to the reference VFS are not seen.

use crate::config::DelegationPolicy;
use crate::error::{OpfsError, Result};
use libsqlite3_sys as ffi;
use std::os::raw::{c_char, c_int, c_void};
use std::ptr;
use tracing::{debug, warn};

pub type DlOpenFn = unsafe extern "C" fn(*mut ffi::sqlite3_vfs, *const c_char) -> *mut c_void;
pub type DlErrorFn = unsafe extern "C" fn(*mut ffi::sqlite3_vfs, c_int, *mut c_char);
pub type DlSymFn = unsafe extern "C" fn(
    *mut ffi::sqlite3_vfs,
    *mut c_void,
    *const c_char,
) -> Option<unsafe extern "C" fn(*mut ffi::sqlite3_vfs, *mut c_void, *const c_char)>;
pub type DlCloseFn = unsafe extern "C" fn(*mut ffi::sqlite3_vfs, *mut c_void);
pub type RandomnessFn = unsafe extern "C" fn(*mut ffi::sqlite3_vfs, c_int, *mut c_char) -> c_int;
pub type SleepFn = unsafe extern "C" fn(*mut ffi::sqlite3_vfs, c_int) -> c_int;
pub type GetLastErrorFn = unsafe extern "C" fn(*mut ffi::sqlite3_vfs, c_int, *mut c_char) -> c_int;

/// The seven `sqlite3_vfs` slots taken from the reference VFS.
///
/// `Default` leaves every slot unbound. SQLite calls these slots without a
/// null check, so using an unbound slot (the first write needs randomness)
/// crashes the process. Use [`DelegationPolicy::Strict`] to refuse
/// registration instead.
#[derive(Debug, Clone, Copy, Default)]
pub struct DelegatedOps {
    pub dl_open: Option<DlOpenFn>,
    pub dl_error: Option<DlErrorFn>,
    pub dl_sym: Option<DlSymFn>,
    pub dl_close: Option<DlCloseFn>,
    pub randomness: Option<RandomnessFn>,
    pub sleep: Option<SleepFn>,
    pub get_last_error: Option<GetLastErrorFn>,
}

impl DelegatedOps {
    pub fn from_vfs(reference: &ffi::sqlite3_vfs) -> Self {
        Self {
            dl_open: reference.xDlOpen,
            dl_error: reference.xDlError,
            dl_sym: reference.xDlSym,
            dl_close: reference.xDlClose,
            randomness: reference.xRandomness,
            sleep: reference.xSleep,
            get_last_error: reference.xGetLastError,
        }
    }

    /// Snapshot SQLite's current default VFS.
    ///
    /// With no default registered, `Lenient` returns unbound slots and
    /// `Strict` fails with [`OpfsError::NoDefaultVfs`].
    pub fn resolve_default(policy: DelegationPolicy) -> Result<Self> {
        let reference = unsafe { ffi::sqlite3_vfs_find(ptr::null()) };

        if reference.is_null() {
            return match policy {
                DelegationPolicy::Strict => Err(OpfsError::NoDefaultVfs),
                DelegationPolicy::Lenient => {
                    warn!("No default VFS registered; dynamic loading, randomness, sleep and last-error slots left unbound");
                    Ok(Self::default())
                }
            };
        }

        let reference = unsafe { &*reference };
        debug!("Delegating platform operations to VFS {:?}", vfs_name(reference));

        Ok(Self::from_vfs(reference))
    }

    pub fn apply(&self, vfs: &mut ffi::sqlite3_vfs) {
        vfs.xDlOpen = self.dl_open;
        vfs.xDlError = self.dl_error;
        vfs.xDlSym = self.dl_sym;
        vfs.xDlClose = self.dl_close;
        vfs.xRandomness = self.randomness;
        vfs.xSleep = self.sleep;
        vfs.xGetLastError = self.get_last_error;
    }
}

fn vfs_name(vfs: &ffi::sqlite3_vfs) -> Option<String> {
    if vfs.zName.is_null() {
        return None;
    }
    let name = unsafe { std::ffi::CStr::from_ptr(vfs.zName) };
    Some(name.to_string_lossy().into_owned())
}
