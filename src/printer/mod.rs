// src/printer/mod.rs

//! The `printer` module is for printing user-facing [`LogMessage`s]
//! and the file name line that precedes the log messages of each file.
//!
//! [`LogMessage`s]: crate::data::logmessage::LogMessage

pub mod printers;
