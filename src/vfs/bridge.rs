//! 64-bit argument marshaling
//!
//! SQLite passes read/write offsets and truncate sizes by value. The storage
//! provider receives them by reference, because the host runtime behind it
//! cannot carry a 64-bit integer argument. Each wrapper binds the value to its
//! own stack slot for the duration of the call and hands out a reference to
//! that slot; nothing is shared between calls.

use crate::provider::{FileHandle, StorageProvider};
use libsqlite3_sys as ffi;
use std::os::raw::c_int;

pub fn read<P>(provider: &P, file: FileHandle, buf: &mut [u8], offset: ffi::sqlite3_int64) -> c_int
where
    P: StorageProvider + ?Sized,
{
    provider.read(file, buf, &offset)
}

pub fn write<P>(provider: &P, file: FileHandle, buf: &[u8], offset: ffi::sqlite3_int64) -> c_int
where
    P: StorageProvider + ?Sized,
{
    provider.write(file, buf, &offset)
}

pub fn truncate<P>(provider: &P, file: FileHandle, size: ffi::sqlite3_int64) -> c_int
where
    P: StorageProvider + ?Sized,
{
    provider.truncate(file, &size)
}
