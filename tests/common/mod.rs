//! In-memory storage provider shared by the integration tests
//!
//! Behaves like the browser OPFS provider: files live in a flat map keyed by
//! path, handles are keyed by `sqlite3_file` address, anonymous files get a
//! generated name and delete-on-close files vanish when closed.

#![allow(dead_code)]

use libsqlite3_sys as ffi;
use opfs_vfs::{FileHandle, StorageProvider};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::ffi::CStr;
use std::os::raw::{c_int, c_void};
use std::sync::atomic::{AtomicU64, Ordering};

struct OpenFile {
    path: String,
    flags: c_int,
    lock_level: c_int,
}

#[derive(Default)]
pub struct MemoryProvider {
    files: Mutex<HashMap<String, Vec<u8>>>,
    handles: Mutex<HashMap<FileHandle, OpenFile>>,
    next_temp: AtomicU64,
}

impl MemoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self, path: &str) -> Option<Vec<u8>> {
        self.files.lock().get(path).cloned()
    }

    pub fn exists(&self, path: &str) -> bool {
        self.files.lock().contains_key(path)
    }

    pub fn open_handles(&self) -> usize {
        self.handles.lock().len()
    }

    fn path_of(&self, file: FileHandle) -> Option<String> {
        self.handles.lock().get(&file).map(|f| f.path.clone())
    }
}

impl StorageProvider for MemoryProvider {
    fn open(
        &self,
        name: Option<&CStr>,
        file: FileHandle,
        flags: c_int,
        out_flags: Option<&mut c_int>,
    ) -> c_int {
        let path = match name {
            Some(name) => name.to_string_lossy().into_owned(),
            None => format!(
                "/null_{}",
                self.next_temp.fetch_add(1, Ordering::Relaxed)
            ),
        };

        {
            let mut files = self.files.lock();
            if !files.contains_key(&path) {
                if flags & ffi::SQLITE_OPEN_CREATE == 0 {
                    return ffi::SQLITE_CANTOPEN;
                }
                files.insert(path.clone(), Vec::new());
            }
        }

        self.handles.lock().insert(
            file,
            OpenFile {
                path,
                flags,
                lock_level: ffi::SQLITE_LOCK_NONE,
            },
        );

        if let Some(out) = out_flags {
            *out = flags;
        }
        ffi::SQLITE_OK
    }

    fn delete(&self, name: &CStr, _sync_dir: c_int) -> c_int {
        self.files.lock().remove(name.to_string_lossy().as_ref());
        ffi::SQLITE_OK
    }

    fn access(&self, name: &CStr, _flags: c_int, res_out: &mut c_int) -> c_int {
        *res_out = self.exists(&name.to_string_lossy()) as c_int;
        ffi::SQLITE_OK
    }

    fn close(&self, file: FileHandle) -> c_int {
        let Some(open) = self.handles.lock().remove(&file) else {
            return ffi::SQLITE_IOERR_CLOSE;
        };
        if open.flags & ffi::SQLITE_OPEN_DELETEONCLOSE != 0 {
            self.files.lock().remove(&open.path);
        }
        ffi::SQLITE_OK
    }

    fn read(&self, file: FileHandle, buf: &mut [u8], offset: &ffi::sqlite3_int64) -> c_int {
        let Some(path) = self.path_of(file) else {
            return ffi::SQLITE_IOERR_READ;
        };
        let files = self.files.lock();
        let data = files.get(&path).map(Vec::as_slice).unwrap_or_default();

        let start = (*offset as usize).min(data.len());
        let available = &data[start..];
        let n = available.len().min(buf.len());
        buf[..n].copy_from_slice(&available[..n]);

        if n < buf.len() {
            buf[n..].fill(0);
            return ffi::SQLITE_IOERR_SHORT_READ;
        }
        ffi::SQLITE_OK
    }

    fn write(&self, file: FileHandle, buf: &[u8], offset: &ffi::sqlite3_int64) -> c_int {
        let Some(path) = self.path_of(file) else {
            return ffi::SQLITE_IOERR_WRITE;
        };
        let mut files = self.files.lock();
        let data = files.entry(path).or_default();

        let start = *offset as usize;
        let end = start + buf.len();
        if data.len() < end {
            data.resize(end, 0);
        }
        data[start..end].copy_from_slice(buf);
        ffi::SQLITE_OK
    }

    fn truncate(&self, file: FileHandle, size: &ffi::sqlite3_int64) -> c_int {
        let Some(path) = self.path_of(file) else {
            return ffi::SQLITE_IOERR_TRUNCATE;
        };
        if let Some(data) = self.files.lock().get_mut(&path) {
            data.resize(*size as usize, 0);
        }
        ffi::SQLITE_OK
    }

    fn sync(&self, _file: FileHandle, _flags: c_int) -> c_int {
        ffi::SQLITE_OK
    }

    fn file_size(&self, file: FileHandle, size_out: &mut ffi::sqlite3_int64) -> c_int {
        let Some(path) = self.path_of(file) else {
            return ffi::SQLITE_IOERR_FSTAT;
        };
        *size_out = self
            .files
            .lock()
            .get(&path)
            .map_or(0, |data| data.len() as ffi::sqlite3_int64);
        ffi::SQLITE_OK
    }

    fn lock(&self, file: FileHandle, level: c_int) -> c_int {
        if let Some(open) = self.handles.lock().get_mut(&file) {
            open.lock_level = level;
        }
        ffi::SQLITE_OK
    }

    fn unlock(&self, file: FileHandle, level: c_int) -> c_int {
        if let Some(open) = self.handles.lock().get_mut(&file) {
            open.lock_level = level;
        }
        ffi::SQLITE_OK
    }

    fn check_reserved_lock(&self, _file: FileHandle, res_out: &mut c_int) -> c_int {
        *res_out = 0;
        ffi::SQLITE_OK
    }

    fn file_control(&self, _file: FileHandle, _op: c_int, _arg: *mut c_void) -> c_int {
        ffi::SQLITE_NOTFOUND
    }

    fn sector_size(&self, _file: FileHandle) -> c_int {
        4096
    }

    fn device_characteristics(&self, _file: FileHandle) -> c_int {
        ffi::SQLITE_IOCAP_UNDELETABLE_WHEN_OPEN
    }
}

/// Provider that remembers the last offset or size it was handed.
///
/// A non-null handle carries the value the call is expected to bind; calls
/// where the referenced value differs are counted as mismatches.
#[derive(Default)]
pub struct OffsetProbe {
    last: std::sync::atomic::AtomicI64,
    mismatches: std::sync::atomic::AtomicUsize,
}

impl OffsetProbe {
    pub fn last(&self) -> i64 {
        self.last.load(Ordering::SeqCst)
    }

    pub fn mismatches(&self) -> usize {
        self.mismatches.load(Ordering::SeqCst)
    }

    /// Handle whose address encodes `value`.
    pub fn expecting(value: i64) -> FileHandle {
        FileHandle::from_ptr(value as usize as *mut ffi::sqlite3_file)
    }

    fn record(&self, file: FileHandle, value: &ffi::sqlite3_int64) -> c_int {
        let expected = file.as_ptr() as usize as i64;
        if expected != 0 && expected != *value {
            self.mismatches.fetch_add(1, Ordering::SeqCst);
        }
        self.last.store(*value, Ordering::SeqCst);
        ffi::SQLITE_OK
    }
}

impl StorageProvider for OffsetProbe {
    fn open(
        &self,
        _name: Option<&CStr>,
        _file: FileHandle,
        _flags: c_int,
        _out_flags: Option<&mut c_int>,
    ) -> c_int {
        ffi::SQLITE_OK
    }

    fn delete(&self, _name: &CStr, _sync_dir: c_int) -> c_int {
        ffi::SQLITE_OK
    }

    fn access(&self, _name: &CStr, _flags: c_int, res_out: &mut c_int) -> c_int {
        *res_out = 0;
        ffi::SQLITE_OK
    }

    fn close(&self, _file: FileHandle) -> c_int {
        ffi::SQLITE_OK
    }

    fn read(&self, file: FileHandle, _buf: &mut [u8], offset: &ffi::sqlite3_int64) -> c_int {
        self.record(file, offset)
    }

    fn write(&self, file: FileHandle, _buf: &[u8], offset: &ffi::sqlite3_int64) -> c_int {
        self.record(file, offset)
    }

    fn truncate(&self, file: FileHandle, size: &ffi::sqlite3_int64) -> c_int {
        self.record(file, size)
    }

    fn sync(&self, _file: FileHandle, _flags: c_int) -> c_int {
        ffi::SQLITE_OK
    }

    fn file_size(&self, _file: FileHandle, size_out: &mut ffi::sqlite3_int64) -> c_int {
        *size_out = 0;
        ffi::SQLITE_OK
    }

    fn lock(&self, _file: FileHandle, _level: c_int) -> c_int {
        ffi::SQLITE_OK
    }

    fn unlock(&self, _file: FileHandle, _level: c_int) -> c_int {
        ffi::SQLITE_OK
    }

    fn check_reserved_lock(&self, _file: FileHandle, res_out: &mut c_int) -> c_int {
        *res_out = 0;
        ffi::SQLITE_OK
    }

    fn file_control(&self, _file: FileHandle, _op: c_int, _arg: *mut c_void) -> c_int {
        ffi::SQLITE_NOTFOUND
    }

    fn sector_size(&self, _file: FileHandle) -> c_int {
        4096
    }

    fn device_characteristics(&self, _file: FileHandle) -> c_int {
        0
    }
}
