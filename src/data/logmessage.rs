// src/data/logmessage.rs

//! Implement [`LogMessage`], one decoded record of a log file.
//!
//! A record is a prologue followed by a payload:
//!
//! ```text
//! offset 0: i32 timestamp (little-endian, Unix seconds)
//! offset 4: u8  log type
//! offset 5: u8  param
//! offset 6: fixed bytes "00 00 1f" or "00 00 1f 1f"
//! offset 9 or 10: payload, UTF-8 text mixed with binary
//! ```

use crate::data::datetime::{
    datetime_display,
    timestamp_to_datetime,
    timestamp_type,
    DateTimeL,
    TzOffsetOpt,
};
use crate::data::message::{decode_message_summary, DecodeSummary};

use std::fmt;
use std::io::{Error, ErrorKind, Result};

#[allow(unused_imports)]
use ::si_trace_print::{defn, defo, defx, defñ};

/// Index of a record within a log file, counting from zero.
pub type RecordIndex = usize;

/// Offset of the timestamp within a record.
pub const TIMESTAMP_OFFSET: usize = 0;
/// Offset of the log type within a record.
pub const LOGTYPE_OFFSET: usize = 4;
/// Offset of the param within a record.
pub const PARAM_OFFSET: usize = 5;
/// Offset of the byte that decides the prologue length.
pub const PROLOGUE_MARKER_OFFSET: usize = 9;
/// If the byte at [`PROLOGUE_MARKER_OFFSET`] is this value then the prologue
/// is [`PROLOGUE_LEN_LONG`] bytes.
pub const PROLOGUE_MARKER: u8 = 0x1f;
pub const PROLOGUE_LEN_SHORT: usize = 9;
pub const PROLOGUE_LEN_LONG: usize = 10;

/// Length of the prologue of `record`, 9 or 10 bytes.
///
/// A record too short to hold the marker byte has the short prologue.
pub fn prologue_len(record: &[u8]) -> usize {
    match record.get(PROLOGUE_MARKER_OFFSET) {
        Some(&PROLOGUE_MARKER) => PROLOGUE_LEN_LONG,
        _ => PROLOGUE_LEN_SHORT,
    }
}

/// One log message derived from one record of a log file.
#[derive(Clone, Eq, PartialEq)]
pub struct LogMessage {
    /// Index of the record within its file.
    index: RecordIndex,
    /// Raw timestamp, seconds since Unix epoch.
    timestamp: timestamp_type,
    /// `timestamp` in the display timezone.
    dt: DateTimeL,
    log_type: u8,
    param: u8,
    prologue_len: usize,
    /// The decoded payload.
    text: String,
}

impl fmt::Debug for LogMessage {
    fn fmt(
        &self,
        f: &mut fmt::Formatter,
    ) -> fmt::Result {
        f.debug_struct("LogMessage")
            .field("index", &self.index)
            .field("dt", &self.dt)
            .field("log_type", &format_args!("0x{:02x}", self.log_type))
            .field("param", &format_args!("0x{:02x}", self.param))
            .field("prologue_len", &self.prologue_len)
            .field("text", &self.text)
            .finish()
    }
}

impl LogMessage {
    /// Create a `LogMessage` from the bytes of one `record`.
    ///
    /// The payload after the prologue is decoded with
    /// [`decode_message_summary`], skipped parts are counted into `summary`.
    ///
    /// Returns `Err` of kind `UnexpectedEof` if `record` is too short for a
    /// prologue.
    pub fn from_record(
        index: RecordIndex,
        record: &[u8],
        tz_offset: &TzOffsetOpt,
        debug: bool,
        summary: &mut DecodeSummary,
    ) -> Result<LogMessage> {
        defn!("({}, record len {})", index, record.len());
        if record.len() < PROLOGUE_LEN_SHORT {
            defx!("return Err; record len {} < {}", record.len(), PROLOGUE_LEN_SHORT);
            return Err(Error::new(
                ErrorKind::UnexpectedEof,
                format!(
                    "record {} is {} bytes, less than the prologue length {}",
                    index,
                    record.len(),
                    PROLOGUE_LEN_SHORT,
                ),
            ));
        }
        let timestamp: timestamp_type = timestamp_type::from_le_bytes([
            record[TIMESTAMP_OFFSET],
            record[TIMESTAMP_OFFSET + 1],
            record[TIMESTAMP_OFFSET + 2],
            record[TIMESTAMP_OFFSET + 3],
        ]);
        let dt: DateTimeL = timestamp_to_datetime(timestamp, tz_offset);
        let log_type: u8 = record[LOGTYPE_OFFSET];
        let param: u8 = record[PARAM_OFFSET];
        let prologue_len: usize = prologue_len(record);
        let text: String = decode_message_summary(&record[prologue_len..], debug, summary);
        defx!("text {:?}", text);

        Ok(LogMessage {
            index,
            timestamp,
            dt,
            log_type,
            param,
            prologue_len,
            text,
        })
    }

    pub const fn index(&self) -> RecordIndex {
        self.index
    }

    pub const fn timestamp(&self) -> timestamp_type {
        self.timestamp
    }

    pub const fn dt(&self) -> &DateTimeL {
        &self.dt
    }

    pub const fn log_type(&self) -> u8 {
        self.log_type
    }

    pub const fn param(&self) -> u8 {
        self.param
    }

    pub const fn prologue_len(&self) -> usize {
        self.prologue_len
    }

    pub fn text(&self) -> &str {
        self.text.as_str()
    }

    /// The datetime formatted for display, e.g. `"05/13 21:04:59"`.
    pub fn dt_display(&self) -> String {
        datetime_display(&self.dt)
    }
}
