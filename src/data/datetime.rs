// src/data/datetime.rs

//! Functions to transform the Unix timestamps stored in a log record
//! prologue into chrono [`DateTime`] instances, and to display them.
//!
//! The game client stores a signed 32-bit count of seconds since the Unix
//! epoch. Displayed times are in the local system timezone unless the user
//! passed a timezone offset.
//!
//! [`DateTime`]: https://docs.rs/chrono/0.4.40/chrono/struct.DateTime.html

#![allow(non_camel_case_types)]

pub use ::chrono::{
    DateTime,
    FixedOffset,
    Local,
    TimeZone,
    Utc,
};
#[allow(unused_imports)]
use ::si_trace_print::{defn, defo, defx, defñ};

use crate::debug_panic;

/// A chrono [`DateTime`] type used in _ff14lib_.
///
/// [`DateTime`]: https://docs.rs/chrono/0.4.40/chrono/struct.DateTime.html
pub type DateTimeL = DateTime<FixedOffset>;
pub type DateTimeLOpt = Option<DateTimeL>;

/// Seconds since Unix epoch as stored in the first four bytes of a record.
pub type timestamp_type = i32;

/// The timezone used to display a [`DateTimeL`].
///
/// `None` is the local system timezone, evaluated per timestamp so
/// daylight saving transitions are honoured.
pub type TzOffsetOpt = Option<FixedOffset>;

/// [`strftime`] format of the datetime printed for each log message,
/// e.g. `"05/13 21:04:59"`.
///
/// [`strftime`]: https://docs.rs/chrono/0.4.40/chrono/format/strftime/index.html
pub const DATETIME_DISPLAY_FORMAT: &str = "%m/%d %H:%M:%S";

/// `FixedOffset` of zero, UTC.
pub const FIXEDOFFSET0: FixedOffset = match FixedOffset::east_opt(0) {
    Some(fo) => fo,
    None => unreachable!(),
};

/// Convert a record timestamp to a [`DateTimeL`] in the timezone
/// `tz_offset`.
pub fn timestamp_to_datetime(
    timestamp: timestamp_type,
    tz_offset: &TzOffsetOpt,
) -> DateTimeL {
    // every `i32` is within chrono's supported range
    let dtu: DateTime<Utc> = match Utc.timestamp_opt(timestamp as i64, 0).single() {
        Some(dt) => dt,
        None => {
            debug_panic!("Utc.timestamp_opt({}, 0) failed", timestamp);
            DateTime::<Utc>::default()
        }
    };
    match tz_offset {
        Some(fixedoffset) => dtu.with_timezone(fixedoffset),
        None => {
            let dtl: DateTime<Local> = dtu.with_timezone(&Local);
            let fixedoffset: FixedOffset = *dtl.offset();

            dtl.with_timezone(&fixedoffset)
        }
    }
}

/// Format the `dt` with [`DATETIME_DISPLAY_FORMAT`].
pub fn datetime_display(dt: &DateTimeL) -> String {
    dt.format(DATETIME_DISPLAY_FORMAT).to_string()
}

/// Parse a user-passed timezone offset string into a [`FixedOffset`].
///
/// Accepts `"Z"`, `"UTC"`, and numeric offsets like `"+09:00"`, `"+0900"`,
/// `"-08"`.
pub fn fixedoffset_from_str(tzo: &str) -> Option<FixedOffset> {
    defn!("({:?})", tzo);
    match tzo {
        "Z" | "z" | "UTC" | "utc" => {
            defx!("return {:?}", FIXEDOFFSET0);
            return Some(FIXEDOFFSET0);
        }
        _ => {}
    }
    // transform the timezone string to a `FixedOffset` instance
    // using a dummy datetime
    let mut data: String = String::from("2000-01-02 03:04:05 ");
    data.push_str(tzo);
    for pattern in [
        "%Y-%m-%d %H:%M:%S %:z",
        "%Y-%m-%d %H:%M:%S %z",
        "%Y-%m-%d %H:%M:%S %#z",
    ] {
        match DateTime::parse_from_str(data.as_str(), pattern) {
            Ok(dt) => {
                defx!("return {:?}", dt.offset());
                return Some(*dt.offset());
            }
            Err(_err) => {
                defo!("parse_from_str({:?}, {:?}) error {}", data, pattern, _err);
            }
        }
    }
    defx!("return None");

    None
}

/// Create a [`DateTimeL`] from the passed values. Testing helper.
#[cfg(test)]
pub fn ymdhms(
    fixedoffset: &FixedOffset,
    year: i32,
    month: u32,
    day: u32,
    hour: u32,
    min: u32,
    sec: u32,
) -> DateTimeL {
    fixedoffset
        .with_ymd_and_hms(year, month, day, hour, min, sec)
        .unwrap()
}
