//! Storage provider interface
//!
//! A [`StorageProvider`] is the external component that actually stores bytes.
//! The adapter never touches storage itself: every `sqlite3_vfs` and
//! `sqlite3_io_methods` slot that is not delegated ends up in exactly one
//! provider method, and the provider's status code goes back to SQLite as-is.
//!
//! Offsets and sizes arrive by reference (`&i64`) rather than by value. Hosts
//! that cannot receive a 64-bit integer argument read it through the pointer
//! instead; see [`crate::vfs::bridge`].

use libsqlite3_sys as ffi;
use std::ffi::CStr;
use std::os::raw::{c_int, c_void};

/// Identity of one open `sqlite3_file`.
///
/// The adapter does not extend `sqlite3_file`, so providers key their
/// per-file state on the address SQLite allocated for it. The address is
/// stable from `open` until `close`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FileHandle(usize);

impl FileHandle {
    pub fn from_ptr(file: *mut ffi::sqlite3_file) -> Self {
        Self(file as usize)
    }

    pub fn as_ptr(self) -> *mut ffi::sqlite3_file {
        self.0 as *mut ffi::sqlite3_file
    }
}

/// Handlers backing the OPFS VFS, one per table slot.
///
/// Every method returns a SQLite result code (`SQLITE_OK`, `SQLITE_IOERR_*`,
/// ...). Implementations must be callable from whichever thread SQLite runs
/// on; the adapter itself adds no locking around them.
pub trait StorageProvider: Send + Sync + 'static {
    /// Open `name` (or an anonymous temp file when `None`) and associate it
    /// with `file`.
    fn open(
        &self,
        name: Option<&CStr>,
        file: FileHandle,
        flags: c_int,
        out_flags: Option<&mut c_int>,
    ) -> c_int;

    fn delete(&self, name: &CStr, sync_dir: c_int) -> c_int;

    /// Set `res_out` to 1 if `name` exists, 0 otherwise.
    fn access(&self, name: &CStr, flags: c_int, res_out: &mut c_int) -> c_int;

    fn close(&self, file: FileHandle) -> c_int;

    /// Fill `buf` from `*offset`. Short reads must zero the tail of `buf` and
    /// return `SQLITE_IOERR_SHORT_READ`.
    fn read(&self, file: FileHandle, buf: &mut [u8], offset: &ffi::sqlite3_int64) -> c_int;

    fn write(&self, file: FileHandle, buf: &[u8], offset: &ffi::sqlite3_int64) -> c_int;

    fn truncate(&self, file: FileHandle, size: &ffi::sqlite3_int64) -> c_int;

    fn sync(&self, file: FileHandle, flags: c_int) -> c_int;

    fn file_size(&self, file: FileHandle, size_out: &mut ffi::sqlite3_int64) -> c_int;

    fn lock(&self, file: FileHandle, level: c_int) -> c_int;

    fn unlock(&self, file: FileHandle, level: c_int) -> c_int;

    fn check_reserved_lock(&self, file: FileHandle, res_out: &mut c_int) -> c_int;

    /// `arg` is passed through untouched; its meaning depends on `op`.
    fn file_control(&self, file: FileHandle, op: c_int, arg: *mut c_void) -> c_int;

    fn sector_size(&self, file: FileHandle) -> c_int;

    fn device_characteristics(&self, file: FileHandle) -> c_int;
}
