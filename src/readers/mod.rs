// src/readers/mod.rs

//! "Readers" for _ff14lib_.
//!
//! ## Overview of readers
//!
//! * [`process_path`] finds the files to read for a user-passed path.
//! * A [`RecordReader`] reads one log file, splits it into records using the
//!   file header offset table, and derives a [`LogMessage`] from each record.
//! * A [`Summary`] collects statistics about one `RecordReader`.
//!
//! The _ff14logview_ binary program uses a `RecordReader` instance, one per
//! file, processing files one after the other.
//!
//! _These are not rust "Readers"; these structs do not implement the trait
//! [`Read`]. These are "readers" in an informal sense._
//!
//! [`Read`]: std::io::Read
//! [`LogMessage`]: crate::data::logmessage::LogMessage
//! [`process_path`]: crate::readers::filepreprocessor::process_path
//! [`RecordReader`]: crate::readers::recordreader::RecordReader
//! [`Summary`]: crate::readers::summary::Summary

pub mod filepreprocessor;
pub mod helpers;
pub mod recordreader;
pub mod summary;
