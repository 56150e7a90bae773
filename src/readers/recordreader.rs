// src/readers/recordreader.rs

//! Implements a [`RecordReader`],
//! the driver of deriving [`LogMessage`s] from a game client log file.
//!
//! A log file is small (a few hundred kilobytes at most) so the entire file
//! is read into memory once. Record byte ranges are then pure index
//! arithmetic on the file buffer using the [`LogFileHeader`] offset table.
//!
//! ```text
//! offset 0: i32 start index
//! offset 4: i32 end index
//! offset 8: i32[end index - start index] cumulative offset table
//! offset N: records, N = 8 + 4 * (end index - start index)
//! ```
//!
//! This is an _ff14lib_ structure used by the binary program _ff14logview_.
//!
//! [`LogMessage`s]: crate::data::logmessage::LogMessage

#![allow(non_camel_case_types)]

use crate::common::{
    Bytes,
    Count,
    FPath,
    FileOffset,
    FileOpenOptions,
    FileSz,
    ResultS3,
};
use crate::data::datetime::{DateTimeLOpt, TzOffsetOpt};
use crate::data::logmessage::{LogMessage, RecordIndex};
use crate::data::message::DecodeSummary;
use crate::readers::helpers::fpath_to_path;

use std::fmt;
use std::io::{Error, ErrorKind, Read, Result};

use ::more_asserts::debug_assert_le;
#[allow(unused_imports)]
use ::si_trace_print::{
    defn,
    defo,
    defx,
    defñ,
    def1n,
    def1o,
    def1x,
    def1ñ,
};

// -------------
// LogFileHeader

/// Size of the start index and end index fields.
pub const HEADER_INDEXES_SZ: usize = 8;
/// Size of one offset table entry.
pub const OFFSET_ENTRY_SZ: usize = 4;

/// Offset table entry, cumulative length of records relative to the
/// beginning of the record region.
pub type offset_type = i32;

/// Why a [`LogFileHeader`] could not be parsed.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum HeaderError {
    /// The file is shorter than the header it declares.
    TooSmall(String),
    /// The header fields are nonsensical, e.g. a negative record count.
    Malformed(String),
}

impl fmt::Display for HeaderError {
    fn fmt(
        &self,
        f: &mut fmt::Formatter,
    ) -> fmt::Result {
        match self {
            HeaderError::TooSmall(s) => write!(f, "file too small: {}", s),
            HeaderError::Malformed(s) => write!(f, "malformed header: {}", s),
        }
    }
}

impl std::error::Error for HeaderError {}

/// The header of a log file; index range and offset table.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct LogFileHeader {
    start_index: i32,
    end_index: i32,
    /// Cumulative record lengths, in file order.
    offsets: Vec<offset_type>,
}

/// Size in bytes of a header holding `count` offset table entries.
///
/// `None` if the size overflows `usize`.
pub const fn header_size_for(count: usize) -> Option<usize> {
    match count.checked_mul(OFFSET_ENTRY_SZ) {
        Some(n) => n.checked_add(HEADER_INDEXES_SZ),
        None => None,
    }
}

#[inline(always)]
fn i32_at(
    bytes: &[u8],
    at: usize,
) -> i32 {
    i32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
}

impl LogFileHeader {
    /// Parse the header at the beginning of `bytes`.
    pub fn from_bytes(bytes: &[u8]) -> std::result::Result<LogFileHeader, HeaderError> {
        defn!("(bytes len {})", bytes.len());
        if bytes.len() < HEADER_INDEXES_SZ {
            defx!("return TooSmall");
            return Err(HeaderError::TooSmall(format!(
                "{} bytes, less than the {} bytes of the start and end index",
                bytes.len(),
                HEADER_INDEXES_SZ,
            )));
        }
        let start_index: i32 = i32_at(bytes, 0);
        let end_index: i32 = i32_at(bytes, 4);
        defo!("start_index {}, end_index {}", start_index, end_index);
        let count: usize = match end_index.checked_sub(start_index) {
            Some(count) if count >= 0 => count as usize,
            _ => {
                defx!("return Malformed");
                return Err(HeaderError::Malformed(format!(
                    "end index {} less than start index {}",
                    end_index, start_index,
                )));
            }
        };
        let header_size: usize = match header_size_for(count) {
            Some(header_size) => header_size,
            None => {
                defx!("return TooSmall; header size overflows for {} records", count);
                return Err(HeaderError::TooSmall(format!(
                    "{} bytes, less than the header size for {} records",
                    bytes.len(),
                    count,
                )));
            }
        };
        if bytes.len() < header_size {
            defx!("return TooSmall; {} < {}", bytes.len(), header_size);
            return Err(HeaderError::TooSmall(format!(
                "{} bytes, less than the header size {} for {} records",
                bytes.len(),
                header_size,
                count,
            )));
        }
        let offsets: Vec<offset_type> = (0..count)
            .map(|i| i32_at(bytes, HEADER_INDEXES_SZ + i * OFFSET_ENTRY_SZ))
            .collect();
        defx!("return {} offsets", offsets.len());

        Ok(LogFileHeader {
            start_index,
            end_index,
            offsets,
        })
    }

    pub const fn start_index(&self) -> i32 {
        self.start_index
    }

    pub const fn end_index(&self) -> i32 {
        self.end_index
    }

    pub fn offsets(&self) -> &[offset_type] {
        self.offsets.as_slice()
    }

    /// Count of records, `end_index - start_index`.
    pub fn record_count(&self) -> usize {
        self.offsets.len()
    }

    /// Size of the header in bytes, also the file offset of the first record.
    pub fn header_size(&self) -> usize {
        // checked when parsed in `from_bytes`
        header_size_for(self.offsets.len()).unwrap_or(usize::MAX)
    }

    /// Absolute file offsets `(begin, end)` of record `index`, `end` is
    /// exclusive.
    ///
    /// Returns `Err` of kind `InvalidData` if the offset table entries are
    /// negative or decrease. Does not check against the file size.
    pub fn record_range(
        &self,
        index: RecordIndex,
    ) -> Result<(FileOffset, FileOffset)> {
        let end: offset_type = match self.offsets.get(index) {
            Some(end) => *end,
            None => {
                return Err(Error::new(
                    ErrorKind::InvalidInput,
                    format!("record index {} is not less than record count {}", index, self.offsets.len()),
                ));
            }
        };
        let begin: offset_type = match index {
            0 => 0,
            _ => self.offsets[index - 1],
        };
        if begin < 0 || end < begin {
            return Err(Error::new(
                ErrorKind::InvalidData,
                format!(
                    "record {} has offset table range [{}, {}) which is not a valid length",
                    index, begin, end,
                ),
            ));
        }
        let header_size = self.header_size() as FileOffset;

        Ok((
            header_size.saturating_add(begin as FileOffset),
            header_size.saturating_add(end as FileOffset),
        ))
    }

    /// Total length of all records, the last offset table entry.
    pub fn records_len(&self) -> FileSz {
        match self.offsets.last() {
            Some(last) if *last > 0 => *last as FileSz,
            _ => 0,
        }
    }
}

// ------------
// RecordReader

/// [`RecordReader::process_record_at`] results.
pub type ResultS3RecordFind = ResultS3<LogMessage, Error>;

/// Enum return value for [`RecordReader::new`].
#[derive(Debug)]
pub enum ResultRecordReaderNew<E> {
    /// `RecordReader::new` was successful and returns the `RecordReader`
    FileOk(RecordReader),
    FileErrEmpty,
    FileErrTooSmall(String),
    /// The header record count is negative
    FileErrMalformedHeader(String),
    /// Carries the `E` error data
    FileErrIo(E),
}

pub type ResultRecordReaderNewError = ResultRecordReaderNew<Error>;

/// A specialized reader of the records of one log file.
///
/// Records are processed by index in [`process_record_at`] or all at once
/// in [`process_records`].
///
/// _XXX: not a rust "Reader"; does not implement trait [`Read`]._
///
/// [`process_record_at`]: RecordReader::process_record_at
/// [`process_records`]: RecordReader::process_records
/// [`Read`]: std::io::Read
pub struct RecordReader {
    path: FPath,
    /// The entire file.
    bytes: Bytes,
    header: LogFileHeader,
    /// Timezone for the datetime of each [`LogMessage`].
    tz_offset: TzOffsetOpt,
    /// `Count` of `LogMessage`s successfully processed.
    pub(crate) records_processed: Count,
    /// What the decoder skipped, summed over all processed records.
    pub(crate) decode_summary: DecodeSummary,
    /// First (soonest) processed datetime. Intended for `--summary`.
    pub(crate) dt_first: DateTimeLOpt,
    /// Last (latest) processed datetime. Intended for `--summary`.
    pub(crate) dt_last: DateTimeLOpt,
    /// The last [`Error`], if any, as a `String`. Set by [`set_error`].
    ///
    /// [`set_error`]: self::RecordReader#method.set_error
    error: Option<String>,
}

impl fmt::Debug for RecordReader {
    fn fmt(
        &self,
        f: &mut fmt::Formatter,
    ) -> fmt::Result {
        f.debug_struct("RecordReader")
            .field("Path", &self.path)
            .field("filesz", &self.filesz())
            .field("records", &self.count())
            .field("tz_offset", &self.tz_offset)
            .field("dt_first", &self.dt_first)
            .field("dt_last", &self.dt_last)
            .field("Error?", &self.error)
            .finish()
    }
}

#[derive(Clone, Default, Eq, PartialEq, Debug)]
pub struct SummaryRecordReader {
    pub recordreader_filesz: FileSz,
    pub recordreader_start_index: i32,
    pub recordreader_end_index: i32,
    pub recordreader_records: Count,
    pub recordreader_records_processed: Count,
    pub recordreader_decode_summary: DecodeSummary,
    /// datetime soonest seen
    pub recordreader_datetime_first: DateTimeLOpt,
    /// datetime latest seen
    pub recordreader_datetime_last: DateTimeLOpt,
}

impl RecordReader {
    /// Create a new `RecordReader` by reading the entire file at `path`.
    ///
    /// The file is closed before returning.
    pub fn new(
        path: FPath,
        tz_offset: TzOffsetOpt,
    ) -> ResultRecordReaderNewError {
        def1n!("({:?}, {:?})", path, tz_offset);
        let mut open_options = FileOpenOptions::new();
        let mut file = match open_options
            .read(true)
            .open(fpath_to_path(&path))
        {
            Ok(val) => val,
            Err(err) => {
                def1x!("return FileErrIo {}", err);
                return ResultRecordReaderNew::FileErrIo(err);
            }
        };
        let mut bytes: Bytes = Bytes::new();
        if let Err(err) = file.read_to_end(&mut bytes) {
            def1x!("return FileErrIo {}", err);
            return ResultRecordReaderNew::FileErrIo(err);
        }
        drop(file);
        def1x!("read {} bytes", bytes.len());

        RecordReader::from_bytes(path, bytes, tz_offset)
    }

    /// Create a new `RecordReader` from the file contents `bytes`.
    pub fn from_bytes(
        path: FPath,
        bytes: Bytes,
        tz_offset: TzOffsetOpt,
    ) -> ResultRecordReaderNewError {
        defn!("({:?}, bytes len {})", path, bytes.len());
        if bytes.is_empty() {
            defx!("return FileErrEmpty");
            return ResultRecordReaderNew::FileErrEmpty;
        }
        let header: LogFileHeader = match LogFileHeader::from_bytes(&bytes) {
            Ok(header) => header,
            Err(HeaderError::TooSmall(s)) => {
                defx!("return FileErrTooSmall");
                return ResultRecordReaderNew::FileErrTooSmall(format!("{}, file {:?}", s, path));
            }
            Err(HeaderError::Malformed(s)) => {
                defx!("return FileErrMalformedHeader");
                return ResultRecordReaderNew::FileErrMalformedHeader(format!("{}, file {:?}", s, path));
            }
        };
        defx!("return FileOk; {} records", header.record_count());

        ResultRecordReaderNew::FileOk(RecordReader {
            path,
            bytes,
            header,
            tz_offset,
            records_processed: 0,
            decode_summary: DecodeSummary::default(),
            dt_first: None,
            dt_last: None,
            error: None,
        })
    }

    pub const fn path(&self) -> &FPath {
        &self.path
    }

    pub fn filesz(&self) -> FileSz {
        self.bytes.len() as FileSz
    }

    pub const fn header(&self) -> &LogFileHeader {
        &self.header
    }

    /// Count of records in the file.
    pub fn count(&self) -> usize {
        self.header.record_count()
    }

    /// Store information about a single [`Error`].
    ///
    /// Should only store `Error` that are not recoverable.
    fn set_error(
        &mut self,
        error: &Error,
    ) {
        def1ñ!("{:?}", error);
        let mut error_string: String = error.kind().to_string();
        error_string.push_str(": ");
        error_string.push_str(error.to_string().as_str());
        self.error = Some(error_string);
    }

    /// Indexes into `self.bytes` of record `index`, checked against the
    /// file size.
    fn record_range_checked(
        &self,
        index: RecordIndex,
    ) -> Result<(usize, usize)> {
        let (begin, end) = self.header.record_range(index)?;
        if end > self.filesz() {
            return Err(Error::new(
                ErrorKind::UnexpectedEof,
                format!(
                    "record {} range [{}, {}) extends past file size {}, file {:?}",
                    index,
                    begin,
                    end,
                    self.filesz(),
                    self.path,
                ),
            ));
        }
        debug_assert_le!(begin, end);

        Ok((begin as usize, end as usize))
    }

    /// The bytes of record `index`.
    ///
    /// Returns `Done` if `index` is past the last record.
    pub fn record_bytes(
        &self,
        index: RecordIndex,
    ) -> ResultS3<&[u8], Error> {
        if index >= self.count() {
            return ResultS3::Done;
        }
        match self.record_range_checked(index) {
            Ok((begin, end)) => ResultS3::Found(&self.bytes[begin..end]),
            Err(err) => ResultS3::Err(err),
        }
    }

    /// Process the record at `index` into a [`LogMessage`].
    ///
    /// Returns `Done` if `index` is past the last record.
    pub fn process_record_at(
        &mut self,
        index: RecordIndex,
        debug: bool,
    ) -> ResultS3RecordFind {
        defn!("({})", index);
        if index >= self.count() {
            defx!("return Done");
            return ResultS3::Done;
        }
        let (begin, end) = match self.record_range_checked(index) {
            Ok(val) => val,
            Err(err) => {
                self.set_error(&err);
                defx!("return Err {}", err);
                return ResultS3::Err(err);
            }
        };
        let logmessage: LogMessage = match LogMessage::from_record(
            index,
            &self.bytes[begin..end],
            &self.tz_offset,
            debug,
            &mut self.decode_summary,
        ) {
            Ok(val) => val,
            Err(err) => {
                self.set_error(&err);
                defx!("return Err {}", err);
                return ResultS3::Err(err);
            }
        };
        self.records_processed += 1;
        let dt = *logmessage.dt();
        match self.dt_first {
            Some(dt_first) if dt_first <= dt => {}
            _ => self.dt_first = Some(dt),
        }
        match self.dt_last {
            Some(dt_last) if dt_last >= dt => {}
            _ => self.dt_last = Some(dt),
        }
        defx!("return Found {:?}", logmessage);

        ResultS3::Found(logmessage)
    }

    /// Process all records, in file order.
    ///
    /// Returns the first error; the `LogMessage`s processed before the error
    /// are discarded.
    pub fn process_records(
        &mut self,
        debug: bool,
    ) -> Result<Vec<LogMessage>> {
        def1n!("({:?})", self.path);
        let mut logmessages: Vec<LogMessage> = Vec::with_capacity(self.count());
        let mut index: RecordIndex = 0;
        loop {
            match self.process_record_at(index, debug) {
                ResultS3::Found(logmessage) => logmessages.push(logmessage),
                ResultS3::Done => break,
                ResultS3::Err(err) => {
                    def1x!("return Err {}", err);
                    return Err(err);
                }
            }
            index += 1;
        }
        def1x!("return {} LogMessages", logmessages.len());

        Ok(logmessages)
    }

    /// Return an up-to-date [`SummaryRecordReader`] instance for this
    /// `RecordReader`.
    pub fn summary(&self) -> SummaryRecordReader {
        SummaryRecordReader {
            recordreader_filesz: self.filesz(),
            recordreader_start_index: self.header.start_index(),
            recordreader_end_index: self.header.end_index(),
            recordreader_records: self.count() as Count,
            recordreader_records_processed: self.records_processed,
            recordreader_decode_summary: self.decode_summary,
            recordreader_datetime_first: self.dt_first,
            recordreader_datetime_last: self.dt_last,
        }
    }

    /// The last error as a `String`, if any.
    pub fn error(&self) -> Option<&String> {
        self.error.as_ref()
    }
}
