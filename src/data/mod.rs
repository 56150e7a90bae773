// src/data/mod.rs

//! The `data` module is specialized data containers for
//! [`LogMessage`]s and the functions that derive them.
//!
//! ## Definitions of data
//!
//! ### Log file
//!
//! A "log file" is a file written by the game client composed of:
//!
//! * a header of a start index and an end index (both `i32`).
//! * a table of `end index - start index` cumulative byte offsets (`i32`).
//! * the "records", concatenated.
//!
//! A log file is read by a [`RecordReader`].
//!
//! ### Record
//!
//! A "record" is a sequence of bytes of a log file that:
//!
//! * begins after the prior record or after the offset table.
//! * ends at the offset given by the offset table.
//!
//! A record is a "prologue" followed by a "payload".
//!
//! ### LogMessage
//!
//! A [`LogMessage`] is a record with the prologue parsed and the payload
//! decoded to text by [`decode_message`].
//!
//! A `LogMessage` represents a "log message", typically one line of game chat.
//!
//! [`RecordReader`]: crate::readers::recordreader::RecordReader
//! [`LogMessage`]: crate::data::logmessage::LogMessage
//! [`decode_message`]: crate::data::message::decode_message

pub mod datetime;
pub mod logmessage;
pub mod message;
