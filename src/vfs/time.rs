//! xCurrentTime: wall-clock time as a Julian day number

use chrono::Utc;
use libsqlite3_sys as ffi;
use std::os::raw::c_int;

/// Julian day of the UNIX epoch, 1970-01-01T00:00:00Z.
pub const UNIX_EPOCH_JULIAN_DAY: f64 = 2440587.5;

const MILLIS_PER_DAY: i64 = 86_400_000;

/// [`UNIX_EPOCH_JULIAN_DAY`] in milliseconds, kept integral.
const UNIX_EPOCH_JULIAN_MILLIS: i64 = 24_405_875 * 8_640_000;

/// Julian day for `secs` seconds and `micros` microseconds past the UNIX
/// epoch, truncated to the millisecond.
pub fn julian_day(secs: i64, micros: i64) -> f64 {
    let julian_millis = UNIX_EPOCH_JULIAN_MILLIS + 1000 * secs + micros / 1000;
    julian_millis as f64 / MILLIS_PER_DAY as f64
}

pub fn now() -> f64 {
    let now = Utc::now();
    julian_day(now.timestamp(), i64::from(now.timestamp_subsec_micros()))
}

pub(crate) unsafe extern "C" fn vfs_current_time(
    _vfs: *mut ffi::sqlite3_vfs,
    p_time_out: *mut f64,
) -> c_int {
    *p_time_out = now();
    ffi::SQLITE_OK
}
