//! SQLite file I/O methods implementation
//!
//! Builds the `sqlite3_io_methods` table attached to every file opened through
//! the OPFS VFS and implements its slots as thin trampolines onto the
//! [`StorageProvider`].

use super::bridge;
use super::vfs::VolumeDescriptor;
use crate::provider::{FileHandle, StorageProvider};
use libsqlite3_sys as ffi;
use std::ffi::CStr;
use std::os::raw::{c_char, c_int, c_void};
use std::ptr;
use std::slice;
use std::sync::Arc;

/// The io-methods table shared by all files of one registration.
///
/// `methods` must stay the first field: SQLite only ever sees a pointer to it,
/// and the trampolines cast `sqlite3_file::pMethods` back to the whole table
/// to reach the provider.
#[repr(C)]
pub struct IoMethodTable {
    methods: ffi::sqlite3_io_methods,
    provider: Arc<dyn StorageProvider>,
}

impl IoMethodTable {
    /// Version 1: no shared-memory or mmap slots.
    pub const VERSION: c_int = 1;

    /// Number of version-1 operation slots.
    pub const SLOT_COUNT: usize = 12;

    pub fn new(provider: Arc<dyn StorageProvider>) -> Self {
        let methods = ffi::sqlite3_io_methods {
            iVersion: Self::VERSION,
            xClose: Some(file_close),
            xRead: Some(file_read),
            xWrite: Some(file_write),
            xTruncate: Some(file_truncate),
            xSync: Some(file_sync),
            xFileSize: Some(file_file_size),
            xLock: Some(file_lock),
            xUnlock: Some(file_unlock),
            xCheckReservedLock: Some(file_check_reserved_lock),
            xFileControl: Some(file_file_control),
            xSectorSize: Some(file_sector_size),
            xDeviceCharacteristics: Some(file_device_characteristics),
            xShmMap: None,
            xShmLock: None,
            xShmBarrier: None,
            xShmUnmap: None,
            xFetch: None,
            xUnfetch: None,
        };

        Self { methods, provider }
    }

    /// Pointer SQLite stores in `sqlite3_file::pMethods`.
    pub fn as_ptr(&self) -> *const ffi::sqlite3_io_methods {
        &self.methods
    }

    pub fn methods(&self) -> &ffi::sqlite3_io_methods {
        &self.methods
    }

    pub fn provider(&self) -> &dyn StorageProvider {
        &*self.provider
    }

    /// Recover the table from an open file.
    ///
    /// # Safety
    /// `file` must have been opened through a VFS built by this crate and not
    /// yet closed.
    unsafe fn of<'a>(file: *mut ffi::sqlite3_file) -> &'a IoMethodTable {
        &*((*file).pMethods as *const IoMethodTable)
    }
}

unsafe extern "C" fn file_close(file: *mut ffi::sqlite3_file) -> c_int {
    let table = IoMethodTable::of(file);
    table.provider().close(FileHandle::from_ptr(file))
}

unsafe extern "C" fn file_read(
    file: *mut ffi::sqlite3_file,
    buf: *mut c_void,
    amt: c_int,
    offset: ffi::sqlite3_int64,
) -> c_int {
    let table = IoMethodTable::of(file);
    let data = slice::from_raw_parts_mut(buf as *mut u8, amt.max(0) as usize);
    bridge::read(table.provider(), FileHandle::from_ptr(file), data, offset)
}

unsafe extern "C" fn file_write(
    file: *mut ffi::sqlite3_file,
    buf: *const c_void,
    amt: c_int,
    offset: ffi::sqlite3_int64,
) -> c_int {
    let table = IoMethodTable::of(file);
    let data = slice::from_raw_parts(buf as *const u8, amt.max(0) as usize);
    bridge::write(table.provider(), FileHandle::from_ptr(file), data, offset)
}

unsafe extern "C" fn file_truncate(
    file: *mut ffi::sqlite3_file,
    size: ffi::sqlite3_int64,
) -> c_int {
    let table = IoMethodTable::of(file);
    bridge::truncate(table.provider(), FileHandle::from_ptr(file), size)
}

unsafe extern "C" fn file_sync(file: *mut ffi::sqlite3_file, flags: c_int) -> c_int {
    let table = IoMethodTable::of(file);
    table.provider().sync(FileHandle::from_ptr(file), flags)
}

unsafe extern "C" fn file_file_size(
    file: *mut ffi::sqlite3_file,
    p_size: *mut ffi::sqlite3_int64,
) -> c_int {
    let table = IoMethodTable::of(file);
    table.provider().file_size(FileHandle::from_ptr(file), &mut *p_size)
}

unsafe extern "C" fn file_lock(file: *mut ffi::sqlite3_file, lock_type: c_int) -> c_int {
    let table = IoMethodTable::of(file);
    table.provider().lock(FileHandle::from_ptr(file), lock_type)
}

unsafe extern "C" fn file_unlock(file: *mut ffi::sqlite3_file, lock_type: c_int) -> c_int {
    let table = IoMethodTable::of(file);
    table.provider().unlock(FileHandle::from_ptr(file), lock_type)
}

unsafe extern "C" fn file_check_reserved_lock(
    file: *mut ffi::sqlite3_file,
    p_res_out: *mut c_int,
) -> c_int {
    let table = IoMethodTable::of(file);
    table
        .provider()
        .check_reserved_lock(FileHandle::from_ptr(file), &mut *p_res_out)
}

unsafe extern "C" fn file_file_control(
    file: *mut ffi::sqlite3_file,
    op: c_int,
    p_arg: *mut c_void,
) -> c_int {
    let table = IoMethodTable::of(file);
    table
        .provider()
        .file_control(FileHandle::from_ptr(file), op, p_arg)
}

unsafe extern "C" fn file_sector_size(file: *mut ffi::sqlite3_file) -> c_int {
    let table = IoMethodTable::of(file);
    table.provider().sector_size(FileHandle::from_ptr(file))
}

unsafe extern "C" fn file_device_characteristics(file: *mut ffi::sqlite3_file) -> c_int {
    let table = IoMethodTable::of(file);
    table
        .provider()
        .device_characteristics(FileHandle::from_ptr(file))
}

// VFS open callback

pub unsafe extern "C" fn file_open(
    vfs: *mut ffi::sqlite3_vfs,
    z_name: *const c_char,
    file: *mut ffi::sqlite3_file,
    flags: c_int,
    p_out_flags: *mut c_int,
) -> c_int {
    let table = VolumeDescriptor::from_raw(vfs).io_methods();

    let name = if z_name.is_null() {
        None
    } else {
        Some(CStr::from_ptr(z_name))
    };

    let rc = table
        .provider()
        .open(name, FileHandle::from_ptr(file), flags, p_out_flags.as_mut());

    // SQLite only calls xClose on files whose pMethods is set.
    (*file).pMethods = if rc == ffi::SQLITE_OK {
        table.as_ptr()
    } else {
        ptr::null()
    };

    rc
}
