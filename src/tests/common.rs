// src/tests/common.rs

//! Common data and functions for tests; builders of log file bytes.

#![allow(non_upper_case_globals)]

use crate::common::Bytes;
use crate::data::datetime::{FixedOffset, TzOffsetOpt};
use crate::data::logmessage::PROLOGUE_MARKER;

use ::lazy_static::lazy_static;

lazy_static! {
    pub static ref FO_0: FixedOffset = FixedOffset::east_opt(0).unwrap();
    pub static ref FO_P9: FixedOffset = FixedOffset::east_opt(9 * 3600).unwrap();
    pub static ref FO_M8: FixedOffset = FixedOffset::west_opt(8 * 3600).unwrap();
    pub static ref TZ_0: TzOffsetOpt = Some(*FO_0);
}

/// Build the bytes of one record.
///
/// `long_prologue` chooses the 10 byte prologue `.. 00 00 1f 1f` over the
/// 9 byte prologue `.. 00 00 1f`.
pub fn record_bytes(
    timestamp: i32,
    log_type: u8,
    param: u8,
    long_prologue: bool,
    payload: &[u8],
) -> Bytes {
    let mut record: Bytes = Bytes::with_capacity(10 + payload.len());
    record.extend_from_slice(&timestamp.to_le_bytes());
    record.push(log_type);
    record.push(param);
    record.extend_from_slice(&[0x00, 0x00, PROLOGUE_MARKER]);
    if long_prologue {
        record.push(PROLOGUE_MARKER);
    }
    record.extend_from_slice(payload);

    record
}

/// Build the bytes of a log file: header, offset table, then `records`.
pub fn logfile_bytes(
    start_index: i32,
    records: &[Bytes],
) -> Bytes {
    let mut bytes: Bytes = Bytes::new();
    bytes.extend_from_slice(&start_index.to_le_bytes());
    bytes.extend_from_slice(&(start_index + records.len() as i32).to_le_bytes());
    let mut offset: i32 = 0;
    for record in records.iter() {
        offset += record.len() as i32;
        bytes.extend_from_slice(&offset.to_le_bytes());
    }
    for record in records.iter() {
        bytes.extend_from_slice(record);
    }

    bytes
}

/// Build the bytes of a log file header with exactly the given index range
/// and offset table, followed by `tail`.
pub fn logfile_bytes_raw(
    start_index: i32,
    end_index: i32,
    offsets: &[i32],
    tail: &[u8],
) -> Bytes {
    let mut bytes: Bytes = Bytes::new();
    bytes.extend_from_slice(&start_index.to_le_bytes());
    bytes.extend_from_slice(&end_index.to_le_bytes());
    for offset in offsets.iter() {
        bytes.extend_from_slice(&offset.to_le_bytes());
    }
    bytes.extend_from_slice(tail);

    bytes
}

lazy_static! {
    /// Three records; plain text, a control block between text, and a
    /// private-use symbol with a long prologue.
    pub static ref RECORDS3: Vec<Bytes> = vec![
        record_bytes(1_600_000_000, 0x0a, 0x00, false, b"Hello"),
        record_bytes(
            1_600_000_060,
            0x0b,
            0x01,
            false,
            &[b'A', 0x02, 0x12, 0x03, 0x41, 0x42, 0x43, 0x03, b'B'],
        ),
        record_bytes(1_600_000_030, 0x39, 0x7f, true, &[b'x', 0xEE, 0x80, 0xA0, b'y']),
    ];
    pub static ref LOGFILE3: Bytes = logfile_bytes(100, &RECORDS3);
}
