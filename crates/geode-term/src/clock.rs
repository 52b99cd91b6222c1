// SPDX-License-Identifier: MIT
#![allow(unsafe_code)]
//
// Local wall-clock time for the status bar.
//
// `localtime_r` honours the user's TZ.

/// Local time of day as `(hour, minute)`.
///
/// Returns `None` if the platform cannot convert the current time.
#[cfg(unix)]
#[must_use]
pub fn wall_clock() -> Option<(u8, u8)> {
    let now = unsafe { libc::time(std::ptr::null_mut()) };
    let mut tm: libc::tm = unsafe { std::mem::zeroed() };
    let result = unsafe { libc::localtime_r(&raw const now, &raw mut tm) };
    if result.is_null() {
        return None;
    }
    let hour = u8::try_from(tm.tm_hour).ok()?;
    let minute = u8::try_from(tm.tm_min).ok()?;
    Some((hour, minute))
}

#[cfg(not(unix))]
#[must_use]
pub fn wall_clock() -> Option<(u8, u8)> {
    None
}

/// Format a `(hour, minute)` pair as `HH:MM`.
#[must_use]
pub fn format_clock((hour, minute): (u8, u8)) -> String {
    format!("{hour:02}:{minute:02}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wall_clock_is_in_range() {
        if let Some((h, m)) = wall_clock() {
            assert!(h < 24);
            assert!(m < 60);
        }
    }

    #[test]
    fn format_pads_both_fields() {
        assert_eq!(format_clock((7, 5)), "07:05");
        assert_eq!(format_clock((23, 59)), "23:59");
    }
}
