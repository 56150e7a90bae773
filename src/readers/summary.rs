// src/readers/summary.rs

//! Implements `Summary` statistics tracking struct.

use crate::common::{FPath, FileSz};
use crate::data::datetime::{datetime_display, DateTimeLOpt};
use crate::readers::recordreader::SummaryRecordReader;

use std::fmt;

/// Statistics about one processed file. Printed for CLI option `--summary`.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Summary {
    pub path: FPath,
    /// `None` if no `RecordReader` was created, e.g. the header was
    /// malformed.
    pub readerdata: Option<SummaryRecordReader>,
    /// The error that stopped processing, if any.
    pub error: Option<String>,
}

impl Summary {
    pub fn new(
        path: FPath,
        readerdata: Option<SummaryRecordReader>,
        error: Option<String>,
    ) -> Summary {
        Summary {
            path,
            readerdata,
            error,
        }
    }

    /// `true` if processing of the file failed.
    pub fn has_error(&self) -> bool {
        self.error.is_some()
    }
}

fn dtopt_display(dt: &DateTimeLOpt) -> String {
    match dt {
        Some(dt) => format!("{} {}", datetime_display(dt), dt.format("%Y %:z")),
        None => String::from("None"),
    }
}

impl fmt::Display for Summary {
    fn fmt(
        &self,
        f: &mut fmt::Formatter,
    ) -> fmt::Result {
        writeln!(f, "File: {}", self.path)?;
        if let Some(data) = &self.readerdata {
            let filesz: FileSz = data.recordreader_filesz;
            writeln!(f, "  file size        : {} bytes", filesz)?;
            writeln!(
                f,
                "  index range      : {}..{}",
                data.recordreader_start_index, data.recordreader_end_index
            )?;
            writeln!(f, "  records          : {}", data.recordreader_records)?;
            writeln!(f, "  records processed: {}", data.recordreader_records_processed)?;
            writeln!(
                f,
                "  control blocks   : {}",
                data.recordreader_decode_summary.control_blocks
            )?;
            writeln!(f, "  symbols          : {}", data.recordreader_decode_summary.symbols)?;
            writeln!(
                f,
                "  bytes dropped    : {}",
                data.recordreader_decode_summary.bytes_dropped
            )?;
            writeln!(f, "  datetime first   : {}", dtopt_display(&data.recordreader_datetime_first))?;
            writeln!(f, "  datetime last    : {}", dtopt_display(&data.recordreader_datetime_last))?;
        }
        if let Some(error) = &self.error {
            writeln!(f, "  error            : {}", error)?;
        }

        Ok(())
    }
}
