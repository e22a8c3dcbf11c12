//! Per-call tracing for storage providers
//!
//! [`Traced`] wraps any provider and emits a `debug!` event for every
//! handler invocation, with its arguments and the result code the wrapped
//! provider returned. Results are never altered.

use crate::provider::{FileHandle, StorageProvider};
use libsqlite3_sys as ffi;
use std::ffi::CStr;
use std::os::raw::{c_int, c_void};
use tracing::debug;

pub struct Traced<P> {
    inner: P,
}

impl<P: StorageProvider> Traced<P> {
    pub fn new(inner: P) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &P {
        &self.inner
    }

    pub fn into_inner(self) -> P {
        self.inner
    }
}

impl<P: StorageProvider> StorageProvider for Traced<P> {
    fn open(
        &self,
        name: Option<&CStr>,
        file: FileHandle,
        flags: c_int,
        out_flags: Option<&mut c_int>,
    ) -> c_int {
        let rc = self.inner.open(name, file, flags, out_flags);
        debug!("xOpen {:?} {:?} flags=0x{:x} rc={}", name, file, flags, rc);
        rc
    }

    fn delete(&self, name: &CStr, sync_dir: c_int) -> c_int {
        let rc = self.inner.delete(name, sync_dir);
        debug!("xDelete {:?} sync_dir={} rc={}", name, sync_dir, rc);
        rc
    }

    fn access(&self, name: &CStr, flags: c_int, res_out: &mut c_int) -> c_int {
        let rc = self.inner.access(name, flags, res_out);
        debug!("xAccess {:?} flags=0x{:x} exists={} rc={}", name, flags, res_out, rc);
        rc
    }

    fn close(&self, file: FileHandle) -> c_int {
        let rc = self.inner.close(file);
        debug!("xClose {:?} rc={}", file, rc);
        rc
    }

    fn read(&self, file: FileHandle, buf: &mut [u8], offset: &ffi::sqlite3_int64) -> c_int {
        let rc = self.inner.read(file, buf, offset);
        debug!("xRead {:?} {} bytes at {} rc={}", file, buf.len(), offset, rc);
        rc
    }

    fn write(&self, file: FileHandle, buf: &[u8], offset: &ffi::sqlite3_int64) -> c_int {
        let rc = self.inner.write(file, buf, offset);
        debug!("xWrite {:?} {} bytes at {} rc={}", file, buf.len(), offset, rc);
        rc
    }

    fn truncate(&self, file: FileHandle, size: &ffi::sqlite3_int64) -> c_int {
        let rc = self.inner.truncate(file, size);
        debug!("xTruncate {:?} size={} rc={}", file, size, rc);
        rc
    }

    fn sync(&self, file: FileHandle, flags: c_int) -> c_int {
        let rc = self.inner.sync(file, flags);
        debug!("xSync {:?} flags=0x{:x} rc={}", file, flags, rc);
        rc
    }

    fn file_size(&self, file: FileHandle, size_out: &mut ffi::sqlite3_int64) -> c_int {
        let rc = self.inner.file_size(file, size_out);
        debug!("xFileSize {:?} size={} rc={}", file, size_out, rc);
        rc
    }

    fn lock(&self, file: FileHandle, level: c_int) -> c_int {
        let rc = self.inner.lock(file, level);
        debug!("xLock {:?} level={} rc={}", file, level, rc);
        rc
    }

    fn unlock(&self, file: FileHandle, level: c_int) -> c_int {
        let rc = self.inner.unlock(file, level);
        debug!("xUnlock {:?} level={} rc={}", file, level, rc);
        rc
    }

    fn check_reserved_lock(&self, file: FileHandle, res_out: &mut c_int) -> c_int {
        let rc = self.inner.check_reserved_lock(file, res_out);
        debug!("xCheckReservedLock {:?} reserved={} rc={}", file, res_out, rc);
        rc
    }

    fn file_control(&self, file: FileHandle, op: c_int, arg: *mut c_void) -> c_int {
        let rc = self.inner.file_control(file, op, arg);
        debug!("xFileControl {:?} op={} rc={}", file, op, rc);
        rc
    }

    fn sector_size(&self, file: FileHandle) -> c_int {
        let size = self.inner.sector_size(file);
        debug!("xSectorSize {:?} -> {}", file, size);
        size
    }

    fn device_characteristics(&self, file: FileHandle) -> c_int {
        let caps = self.inner.device_characteristics(file);
        debug!("xDeviceCharacteristics {:?} -> 0x{:x}", file, caps);
        caps
    }
}
