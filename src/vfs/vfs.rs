//! SQLite VFS implementation
//!
//! Builds the `sqlite3_vfs` descriptor for the OPFS backend and registers it
//! with SQLite. File I/O, delete and access go to the [`StorageProvider`];
//! path resolution and time are handled here; everything else is borrowed
//! from the default VFS (see [`super::delegate`]).

use super::delegate::DelegatedOps;
use super::file::{file_open, IoMethodTable};
use super::time::vfs_current_time;
use crate::config::VfsConfig;
use crate::error::{OpfsError, Result};
use crate::provider::StorageProvider;
use libsqlite3_sys as ffi;
use rusqlite::{Connection, OpenFlags};
use std::cell::UnsafeCell;
use std::ffi::{CStr, CString};
use std::os::raw::{c_char, c_int};
use std::path::Path;
use std::ptr;
use std::sync::Arc;
use tracing::{debug, info};

/// Name of the OPFS VFS as registered with SQLite
pub const VFS_NAME: &str = "opfs";

/// Longest path SQLite may hand to this VFS, in bytes.
pub const MAX_PATHNAME: c_int = 1024;

/// The `sqlite3_vfs` descriptor plus the data its slots need.
///
/// `base` must stay the first field so the `*mut sqlite3_vfs` SQLite passes
/// back can be widened to the whole descriptor. It sits in an `UnsafeCell`
/// because SQLite rewrites `pNext` while the descriptor is registered.
#[repr(C)]
pub struct VolumeDescriptor {
    base: UnsafeCell<ffi::sqlite3_vfs>,
    name: CString,
    io_methods: IoMethodTable,
}

// After registration only SQLite writes to `base` (pNext, under its own
// mutex); the io-methods table and name are immutable.
unsafe impl Send for VolumeDescriptor {}
unsafe impl Sync for VolumeDescriptor {}

impl VolumeDescriptor {
    pub const VERSION: c_int = 1;

    /// Build an unregistered descriptor. Delegated slots start unbound.
    pub fn new(name: &str, provider: Arc<dyn StorageProvider>) -> Result<Box<Self>> {
        if name.is_empty() {
            return Err(OpfsError::InvalidName(name.to_string()));
        }
        let name = CString::new(name)
            .map_err(|e| OpfsError::InvalidName(format!("{}: {}", name, e)))?;

        let base = ffi::sqlite3_vfs {
            iVersion: Self::VERSION,
            szOsFile: std::mem::size_of::<ffi::sqlite3_file>() as c_int,
            mxPathname: MAX_PATHNAME,
            pNext: ptr::null_mut(),
            zName: ptr::null(),
            pAppData: ptr::null_mut(),
            xOpen: Some(file_open),
            xDelete: Some(vfs_delete),
            xAccess: Some(vfs_access),
            xFullPathname: Some(vfs_full_pathname),
            xDlOpen: None,
            xDlError: None,
            xDlSym: None,
            xDlClose: None,
            xRandomness: None,
            xSleep: None,
            xCurrentTime: Some(vfs_current_time),
            xGetLastError: None,
            xCurrentTimeInt64: None,
            xSetSystemCall: None,
            xGetSystemCall: None,
            xNextSystemCall: None,
        };

        let descriptor = Box::new(Self {
            base: UnsafeCell::new(base),
            name,
            io_methods: IoMethodTable::new(provider),
        });
        // The CString's buffer does not move with the box.
        unsafe { (*descriptor.base.get()).zName = descriptor.name.as_ptr() };

        debug!("Built VFS descriptor {:?}", descriptor.name);
        Ok(descriptor)
    }

    /// Widen a VFS pointer handed back by SQLite.
    ///
    /// # Safety
    /// `vfs` must point at the `base` of a live `VolumeDescriptor`.
    pub(crate) unsafe fn from_raw<'a>(vfs: *mut ffi::sqlite3_vfs) -> &'a Self {
        &*(vfs as *const Self)
    }

    pub fn as_ptr(&self) -> *mut ffi::sqlite3_vfs {
        self.base.get()
    }

    /// Copy of the slots this adapter owns.
    ///
    /// `pNext` belongs to SQLite's VFS list and may be rewritten by a
    /// concurrent registration, so it is never read here and comes back null.
    pub fn raw(&self) -> ffi::sqlite3_vfs {
        let base = self.base.get();
        // Functional update copies field by field, leaving pNext untouched.
        unsafe {
            ffi::sqlite3_vfs {
                pNext: ptr::null_mut(),
                ..*base
            }
        }
    }

    pub fn name(&self) -> &str {
        // Built from a &str, so always valid UTF-8.
        self.name.to_str().unwrap_or_default()
    }

    pub fn io_methods(&self) -> &IoMethodTable {
        &self.io_methods
    }

    /// Copy the delegated slots into this descriptor. Only valid before
    /// registration.
    pub fn delegate(&mut self, ops: &DelegatedOps) {
        ops.apply(self.base.get_mut());
    }
}

/// Handle to a registered OPFS VFS.
///
/// The descriptor lives for the rest of the process; SQLite keeps a pointer to
/// it. Registering two VFSes under the same name is not supported.
#[derive(Clone, Copy)]
pub struct Registration {
    descriptor: &'static VolumeDescriptor,
}

impl Registration {
    pub fn name(&self) -> &'static str {
        self.descriptor.name()
    }

    pub fn descriptor(&self) -> &'static VolumeDescriptor {
        self.descriptor
    }

    /// Open a database through this VFS.
    pub fn open_connection<P: AsRef<Path>>(&self, path: P) -> Result<Connection> {
        self.open_connection_with_flags(path, OpenFlags::default())
    }

    pub fn open_connection_with_flags<P: AsRef<Path>>(
        &self,
        path: P,
        flags: OpenFlags,
    ) -> Result<Connection> {
        Ok(Connection::open_with_flags_and_vfs(path, flags, self.name())?)
    }
}

impl std::fmt::Debug for Registration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registration")
            .field("name", &self.name())
            .finish()
    }
}

/// Register the OPFS VFS with SQLite
///
/// Initializes SQLite, builds the descriptor, borrows the platform slots of
/// the current default VFS and registers the result.
pub fn register_vfs(provider: Arc<dyn StorageProvider>, config: &VfsConfig) -> Result<Registration> {
    let rc = unsafe { ffi::sqlite3_initialize() };
    if rc != ffi::SQLITE_OK {
        return Err(OpfsError::Initialize(rc));
    }

    let mut descriptor = VolumeDescriptor::new(&config.name, provider)?;
    let delegated = DelegatedOps::resolve_default(config.delegation)?;
    descriptor.delegate(&delegated);

    let descriptor_ptr = Box::into_raw(descriptor);

    unsafe {
        let rc = ffi::sqlite3_vfs_register((*descriptor_ptr).as_ptr(), config.make_default as c_int);
        if rc != ffi::SQLITE_OK {
            // Clean up on failure
            drop(Box::from_raw(descriptor_ptr));
            return Err(OpfsError::VFSRegistrationFailed(rc));
        }
    }

    let descriptor: &'static VolumeDescriptor = unsafe { &*descriptor_ptr };
    info!(
        "Registered VFS '{}'{}",
        descriptor.name(),
        if config.make_default { " as default" } else { "" }
    );

    Ok(Registration { descriptor })
}

/// Register `provider` under the default configuration.
pub fn bootstrap<P: StorageProvider>(provider: P) -> Result<Registration> {
    register_vfs(Arc::new(provider), &VfsConfig::default())
}

// VFS callback functions

unsafe extern "C" fn vfs_delete(
    vfs: *mut ffi::sqlite3_vfs,
    z_name: *const c_char,
    sync_dir: c_int,
) -> c_int {
    let descriptor = VolumeDescriptor::from_raw(vfs);
    descriptor
        .io_methods()
        .provider()
        .delete(CStr::from_ptr(z_name), sync_dir)
}

unsafe extern "C" fn vfs_access(
    vfs: *mut ffi::sqlite3_vfs,
    z_name: *const c_char,
    flags: c_int,
    p_res_out: *mut c_int,
) -> c_int {
    let descriptor = VolumeDescriptor::from_raw(vfs);
    descriptor
        .io_methods()
        .provider()
        .access(CStr::from_ptr(z_name), flags, &mut *p_res_out)
}

unsafe extern "C" fn vfs_full_pathname(
    _vfs: *mut ffi::sqlite3_vfs,
    z_name: *const c_char,
    n_out: c_int,
    z_out: *mut c_char,
) -> c_int {
    // Provider names are already canonical: copy verbatim, clipped to the
    // buffer and always terminated.
    if n_out <= 0 {
        return ffi::SQLITE_OK;
    }
    let n_out = n_out as usize;
    libc::strncpy(z_out, z_name, n_out);
    *z_out.add(n_out - 1) = 0;
    ffi::SQLITE_OK
}
