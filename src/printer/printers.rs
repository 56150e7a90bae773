// src/printer/printers.rs

//! Specialized printer struct [`PrinterLogMessage`] and helper functions
//! for printing [`LogMessage`s].
//!
//! [`LogMessage`s]: crate::data::logmessage::LogMessage

use crate::common::FPath;
use crate::data::logmessage::LogMessage;
use crate::debug::printers::de_err;

use std::io::{Result, Write};

#[doc(hidden)]
pub use ::termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// globals and constants
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// [`Color`] for printing the file name line before each file.
///
/// [`Color`]: https://docs.rs/termcolor/1.4.1/termcolor/enum.Color.html
pub const COLOR_FILENAME: Color = Color::Cyan;

/// [`Color`] for printing some user-facing error messages.
///
/// [`Color`]: https://docs.rs/termcolor/1.4.1/termcolor/enum.Color.html
pub const COLOR_ERROR: Color = Color::Red;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// formatting
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Format one printed line (without newline) of a [`LogMessage`],
/// e.g. `"0012 05/13 21:04:59 [0a,00] Hello"`.
///
/// The index is zero-padded to four digits, the log type and param are
/// two-digit lowercase hexadecimal.
pub fn format_logmessage(logmessage: &LogMessage) -> String {
    format!(
        "{:04} {} [{:02x},{:02x}] {}",
        logmessage.index(),
        logmessage.dt_display(),
        logmessage.log_type(),
        logmessage.param(),
        logmessage.text(),
    )
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// PrinterLogMessage
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// A printer of [`LogMessage`s] and the file name line that precedes each
/// file.
///
/// Only the file name line is colored.
///
/// [`LogMessage`s]: crate::data::logmessage::LogMessage
pub struct PrinterLogMessage<W: WriteColor> {
    out: W,
    color_filename: ColorSpec,
}

impl PrinterLogMessage<StandardStream> {
    /// Create a `PrinterLogMessage` writing to stdout.
    pub fn new_stdout(color_choice: ColorChoice) -> Self {
        PrinterLogMessage::new(StandardStream::stdout(color_choice), COLOR_FILENAME)
    }
}

impl<W: WriteColor> PrinterLogMessage<W> {
    pub fn new(
        out: W,
        color_filename: Color,
    ) -> Self {
        let mut colorspec = ColorSpec::new();
        colorspec.set_fg(Some(color_filename));

        PrinterLogMessage {
            out,
            color_filename: colorspec,
        }
    }

    /// Print the file name line.
    pub fn print_filename(
        &mut self,
        path: &FPath,
    ) -> Result<()> {
        if let Err(err) = self.out.set_color(&self.color_filename) {
            de_err!("set_color({:?}) returned error {}", self.color_filename, err);
            return Err(err);
        }
        self.out.write_all(path.as_bytes())?;
        if let Err(err) = self.out.reset() {
            de_err!("reset() returned error {}", err);
            return Err(err);
        }
        self.out.write_all(b"\n")?;

        self.out.flush()
    }

    /// Print one line for the `logmessage`.
    pub fn print_logmessage(
        &mut self,
        logmessage: &LogMessage,
    ) -> Result<()> {
        let line: String = format_logmessage(logmessage);
        self.out.write_all(line.as_bytes())?;

        self.out.write_all(b"\n")
    }

    /// Print one line for each of the `logmessages` then flush.
    pub fn print_logmessages(
        &mut self,
        logmessages: &[LogMessage],
    ) -> Result<()> {
        for logmessage in logmessages.iter() {
            self.print_logmessage(logmessage)?;
        }

        self.out.flush()
    }

    /// Print `text` uncolored and as-is, then flush.
    pub fn print_text(
        &mut self,
        text: &str,
    ) -> Result<()> {
        self.out.write_all(text.as_bytes())?;

        self.out.flush()
    }

    /// Consume the printer, returning the underlying writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// helper functions
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Print colored output to terminal on stderr.
pub fn print_colored_stderr(
    color: Color,
    color_choice: ColorChoice,
    value: &[u8],
) -> Result<()> {
    let mut stderr = StandardStream::stderr(color_choice);
    stderr.set_color(ColorSpec::new().set_fg(Some(color)))?;
    stderr.write_all(value)?;

    stderr.reset()
}
