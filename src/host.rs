//! Host-runtime storage handlers
//!
//! When built with the `host` feature the crate links against handlers that
//! the embedding runtime provides (the OPFS library in a browser worker).
//! They can only receive 64-bit offsets and sizes through a pointer, which is
//! exactly what [`StorageProvider`] hands out.

use crate::provider::{FileHandle, StorageProvider};
use libsqlite3_sys as ffi;
use std::ffi::CStr;
use std::os::raw::{c_char, c_int, c_void};
use std::ptr;

extern "C" {
    fn opfsClose(file: *mut ffi::sqlite3_file) -> c_int;
    fn opfsRead(
        file: *mut ffi::sqlite3_file,
        p_data: *mut c_void,
        i_amt: c_int,
        p_offset: *const ffi::sqlite3_int64,
    ) -> c_int;
    fn opfsWrite(
        file: *mut ffi::sqlite3_file,
        p_data: *const c_void,
        i_amt: c_int,
        p_offset: *const ffi::sqlite3_int64,
    ) -> c_int;
    fn opfsTruncate(file: *mut ffi::sqlite3_file, p_size: *const ffi::sqlite3_int64) -> c_int;
    fn opfsSync(file: *mut ffi::sqlite3_file, flags: c_int) -> c_int;
    fn opfsFileSize(file: *mut ffi::sqlite3_file, p_size: *mut ffi::sqlite3_int64) -> c_int;
    fn opfsLock(file: *mut ffi::sqlite3_file, flags: c_int) -> c_int;
    fn opfsUnlock(file: *mut ffi::sqlite3_file, flags: c_int) -> c_int;
    fn opfsCheckReservedLock(file: *mut ffi::sqlite3_file, p_res_out: *mut c_int) -> c_int;
    fn opfsFileControl(file: *mut ffi::sqlite3_file, flags: c_int, p_out: *mut c_void) -> c_int;
    fn opfsSectorSize(file: *mut ffi::sqlite3_file) -> c_int;
    fn opfsDeviceCharacteristics(file: *mut ffi::sqlite3_file) -> c_int;

    fn opfsOpen(
        vfs: *mut ffi::sqlite3_vfs,
        z_name: *const c_char,
        file: *mut ffi::sqlite3_file,
        flags: c_int,
        p_out_flags: *mut c_int,
    ) -> c_int;
    fn opfsDelete(vfs: *mut ffi::sqlite3_vfs, z_name: *const c_char, sync_dir: c_int) -> c_int;
    fn opfsAccess(
        vfs: *mut ffi::sqlite3_vfs,
        z_name: *const c_char,
        flags: c_int,
        p_res_out: *mut c_int,
    ) -> c_int;
}

/// Exported so the host can release memory SQLite allocated on its behalf.
#[no_mangle]
#[allow(non_snake_case)]
pub extern "C" fn getSqliteFree() -> *mut c_void {
    ffi::sqlite3_free as unsafe extern "C" fn(*mut c_void) as *mut c_void
}

/// Provider backed by the host's `opfs*` handlers.
///
/// The handlers ignore their VFS argument, so none is passed.
#[derive(Debug, Default, Clone, Copy)]
pub struct HostProvider;

impl StorageProvider for HostProvider {
    fn open(
        &self,
        name: Option<&CStr>,
        file: FileHandle,
        flags: c_int,
        out_flags: Option<&mut c_int>,
    ) -> c_int {
        let z_name = name.map_or(ptr::null(), CStr::as_ptr);
        let p_out_flags = out_flags.map_or(ptr::null_mut(), |f| f as *mut c_int);
        unsafe { opfsOpen(ptr::null_mut(), z_name, file.as_ptr(), flags, p_out_flags) }
    }

    fn delete(&self, name: &CStr, sync_dir: c_int) -> c_int {
        unsafe { opfsDelete(ptr::null_mut(), name.as_ptr(), sync_dir) }
    }

    fn access(&self, name: &CStr, flags: c_int, res_out: &mut c_int) -> c_int {
        unsafe { opfsAccess(ptr::null_mut(), name.as_ptr(), flags, res_out) }
    }

    fn close(&self, file: FileHandle) -> c_int {
        unsafe { opfsClose(file.as_ptr()) }
    }

    fn read(&self, file: FileHandle, buf: &mut [u8], offset: &ffi::sqlite3_int64) -> c_int {
        unsafe {
            opfsRead(
                file.as_ptr(),
                buf.as_mut_ptr() as *mut c_void,
                buf.len() as c_int,
                offset,
            )
        }
    }

    fn write(&self, file: FileHandle, buf: &[u8], offset: &ffi::sqlite3_int64) -> c_int {
        unsafe {
            opfsWrite(
                file.as_ptr(),
                buf.as_ptr() as *const c_void,
                buf.len() as c_int,
                offset,
            )
        }
    }

    fn truncate(&self, file: FileHandle, size: &ffi::sqlite3_int64) -> c_int {
        unsafe { opfsTruncate(file.as_ptr(), size) }
    }

    fn sync(&self, file: FileHandle, flags: c_int) -> c_int {
        unsafe { opfsSync(file.as_ptr(), flags) }
    }

    fn file_size(&self, file: FileHandle, size_out: &mut ffi::sqlite3_int64) -> c_int {
        unsafe { opfsFileSize(file.as_ptr(), size_out) }
    }

    fn lock(&self, file: FileHandle, level: c_int) -> c_int {
        unsafe { opfsLock(file.as_ptr(), level) }
    }

    fn unlock(&self, file: FileHandle, level: c_int) -> c_int {
        unsafe { opfsUnlock(file.as_ptr(), level) }
    }

    fn check_reserved_lock(&self, file: FileHandle, res_out: &mut c_int) -> c_int {
        unsafe { opfsCheckReservedLock(file.as_ptr(), res_out) }
    }

    fn file_control(&self, file: FileHandle, op: c_int, arg: *mut c_void) -> c_int {
        unsafe { opfsFileControl(file.as_ptr(), op, arg) }
    }

    fn sector_size(&self, file: FileHandle) -> c_int {
        unsafe { opfsSectorSize(file.as_ptr()) }
    }

    fn device_characteristics(&self, file: FileHandle) -> c_int {
        unsafe { opfsDeviceCharacteristics(file.as_ptr()) }
    }
}
