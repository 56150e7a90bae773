// src/bin/ff14logview.rs

//! Driver program _ff14logview_ drives the [_ff14lib_].
//!
//! Processes user-passed command-line arguments.
//! Then processes the path passed; a directory is enumerated for files
//! ordered by modified time, oldest first.
//!
//! Each file is processed start to finish by a [`RecordReader`] before the
//! next file. The file name is printed, then one line per [`LogMessage`].
//! A file that fails to process prints an error and no log message lines;
//! processing continues with the next file.
//!
//! [_ff14lib_]: ff14lib
//! [`RecordReader`]: ff14lib::readers::recordreader::RecordReader
//! [`LogMessage`]: ff14lib::data::logmessage::LogMessage

#![allow(non_camel_case_types)]

use std::process::ExitCode;

use ::clap::{Parser, ValueEnum};
use ::const_format::concatcp;

use ::ff14lib::common::FPath;
use ::ff14lib::data::datetime::{fixedoffset_from_str, FixedOffset, TzOffsetOpt};
use ::ff14lib::data::logmessage::LogMessage;
use ::ff14lib::debug::printers::{e_err, e_wrn};
use ::ff14lib::printer::printers::{
    print_colored_stderr,
    ColorChoice,
    PrinterLogMessage,
    WriteColor,
    COLOR_ERROR,
};
use ::ff14lib::readers::filepreprocessor::{process_path, ProcessPathResult, ProcessPathResults};
use ::ff14lib::readers::recordreader::{RecordReader, ResultRecordReaderNew};
use ::ff14lib::readers::summary::Summary;
use ::si_trace_print::stack::stack_offset_set;
#[allow(unused_imports)]
use ::si_trace_print::{defn, defo, defx, defñ};

// --------------------
// command-line parsing

const CLI_NAME: &str = "ff14logview";

/// Usage text printed when no path is passed or the path is not found.
const CLI_USAGE: &str = concatcp!(
    "FFXIV log parse and viewer\n",
    "Usage:\n",
    "  ", CLI_NAME, " [-v] <filename>        Parse one logfile of ffxiv\n",
    "  ", CLI_NAME, " [-v] <directory name>  Parse all logfiles of ffxiv log dir.\n",
    "\n",
    "  -v option shows the trimmed binary message in hexadecimal.\n",
);

const CLI_HELP_AFTER: &str = concatcp!(
    "A directory is not recursed. Files within a directory are processed in\n",
    "order of last modified time, oldest first.\n",
    "\n",
    "Without --tz-offset, times are printed in the local system timezone.\n",
    "\n",
    "Version: ", env!("CARGO_PKG_VERSION"), "\n",
    "MSRV: ", env!("CARGO_PKG_RUST_VERSION"), "\n",
    "License: ", env!("CARGO_PKG_LICENSE"), "\n",
    "Repository: ", env!("CARGO_PKG_REPOSITORY"), "\n",
);

/// CLI enum that maps to [`termcolor::ColorChoice`].
///
/// [`termcolor::ColorChoice`]: https://docs.rs/termcolor/1.4.1/termcolor/enum.ColorChoice.html
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, ValueEnum)]
enum CLI_Color_Choice {
    Always,
    #[default]
    Auto,
    Never,
}

impl CLI_Color_Choice {
    fn to_colorchoice(self) -> ColorChoice {
        match self {
            CLI_Color_Choice::Always => ColorChoice::Always,
            CLI_Color_Choice::Auto => ColorChoice::Auto,
            CLI_Color_Choice::Never => ColorChoice::Never,
        }
    }
}

/// clap command-line arguments build-time definitions.
//
// Note:
// * the `about` is taken from `Cargo.toml:[package]:description`.
#[derive(Parser, Debug)]
#[clap(
    about = env!("CARGO_PKG_DESCRIPTION"),
    name = CLI_NAME,
    version = env!("CARGO_PKG_VERSION"),
    after_help = CLI_HELP_AFTER,
    verbatim_doc_comment,
)]
struct CLI_Args {
    /// Path of a log file or a directory of log files.
    #[clap(verbatim_doc_comment)]
    path: Option<String>,

    /// Show the trimmed binary message parts in hexadecimal and the
    /// game-specific symbols as "*".
    #[clap(short = 'v', long = "debug", verbatim_doc_comment)]
    debug: bool,

    /// Timezone offset of printed times, e.g. "+09:00", "-0800", or "Z".
    /// To pass a value with leading "-" use "=" notation, e.g. "-t=-0800".
    /// If not passed then the local system timezone is used.
    #[clap(
        short = 't',
        long,
        verbatim_doc_comment,
        value_parser = cli_process_tz_offset,
    )]
    tz_offset: Option<FixedOffset>,

    /// Choose to print the file name line in color.
    #[clap(
        short = 'c',
        long = "color",
        verbatim_doc_comment,
        value_enum,
        default_value_t = CLI_Color_Choice::Auto,
    )]
    color_choice: CLI_Color_Choice,

    /// Print a summary of each file to stderr after its log messages.
    #[clap(short = 's', long, verbatim_doc_comment)]
    summary: bool,
}

/// `clap` argument processor for `--tz-offset`.
fn cli_process_tz_offset(tzo: &str) -> std::result::Result<FixedOffset, String> {
    match fixedoffset_from_str(tzo) {
        Some(fixedoffset) => Ok(fixedoffset),
        None => Err(format!("Unable to parse a timezone offset for --tz-offset {:?}", tzo)),
    }
}

fn print_usage<W: WriteColor>(printer: &mut PrinterLogMessage<W>) {
    if let Err(err) = printer.print_text(CLI_USAGE) {
        e_err!("printing usage: {}", err);
    }
}

// ------------
// processing

/// Process one log file; print its file name line then its log messages.
///
/// Returns a [`Summary`] of the processing. Processing errors are printed
/// and carried in the `Summary`.
fn process_file<W: WriteColor>(
    path: &FPath,
    debug: bool,
    tz_offset: &TzOffsetOpt,
    printer: &mut PrinterLogMessage<W>,
) -> Summary {
    defn!("({:?}, debug {})", path, debug);
    if let Err(err) = printer.print_filename(path) {
        e_err!("printing file name {:?}: {}", path, err);
    }
    let mut recordreader: RecordReader = match RecordReader::new(path.clone(), *tz_offset) {
        ResultRecordReaderNew::FileOk(recordreader) => recordreader,
        ResultRecordReaderNew::FileErrEmpty => {
            defx!("FileErrEmpty");
            return Summary::new(path.clone(), None, Some(String::from("file is empty")));
        }
        ResultRecordReaderNew::FileErrTooSmall(s)
        | ResultRecordReaderNew::FileErrMalformedHeader(s) => {
            defx!("{}", s);
            return Summary::new(path.clone(), None, Some(s));
        }
        ResultRecordReaderNew::FileErrIo(err) => {
            defx!("FileErrIo {}", err);
            return Summary::new(path.clone(), None, Some(err.to_string()));
        }
    };
    // all records are processed before any are printed
    let result: std::io::Result<Vec<LogMessage>> = recordreader.process_records(debug);
    let error: Option<String> = match result {
        Ok(logmessages) => match printer.print_logmessages(&logmessages) {
            Ok(_) => None,
            Err(err) => Some(format!("printing log messages: {}", err)),
        },
        Err(err) => Some(err.to_string()),
    };
    defx!("error {:?}", error);

    Summary::new(path.clone(), Some(recordreader.summary()), error)
}

/// Print the error of a file that failed to process.
fn print_file_error(
    path: &FPath,
    error: &str,
    color_choice: ColorChoice,
) {
    let msg: String = format!("ERROR: {:?}: {}\n", path, error);
    if print_colored_stderr(COLOR_ERROR, color_choice, msg.as_bytes()).is_err() {
        e_err!("{:?}: {}", path, error);
    }
}

/// Process the user-passed path of `args`; print usage if there is no path.
///
/// Returns `true` if every file was processed.
fn process_args<W: WriteColor>(
    args: &CLI_Args,
    printer: &mut PrinterLogMessage<W>,
) -> bool {
    defn!();
    let path: &FPath = match &args.path {
        Some(path) => path,
        None => {
            print_usage(printer);
            defx!("no path; return true");
            return true;
        }
    };
    let color_choice: ColorChoice = args.color_choice.to_colorchoice();

    let mut ret: bool = true;
    let processed_paths: ProcessPathResults = process_path(path);
    for ppresult in processed_paths.iter() {
        match ppresult {
            ProcessPathResult::FileValid(fpath) => {
                let summary: Summary = process_file(fpath, args.debug, &args.tz_offset, printer);
                if let Some(error) = &summary.error {
                    print_file_error(fpath, error, color_choice);
                    ret = false;
                }
                if args.summary {
                    eprint!("{}", summary);
                }
            }
            ProcessPathResult::FileErrNotExist(fpath) => {
                let msg: String = format!("File/Directory not found : {}\n", fpath);
                if let Err(err) = printer.print_text(msg.as_str()) {
                    e_err!("printing {:?}: {}", msg, err);
                }
                print_usage(printer);
                ret = false;
            }
            ProcessPathResult::FileErrNotAFile(fpath) => {
                e_wrn!("not a file {:?}", fpath);
            }
            ProcessPathResult::FileErrIo(fpath, error) => {
                print_file_error(fpath, error, color_choice);
                ret = false;
            }
        }
    }
    defx!("return {}", ret);

    ret
}

pub fn main() -> ExitCode {
    if cfg!(debug_assertions) {
        stack_offset_set(Some(0));
    }
    defn!();

    let args = CLI_Args::parse();
    defo!("{:?}", args);
    let mut printer = PrinterLogMessage::new_stdout(args.color_choice.to_colorchoice());
    let exitcode = match process_args(&args, &mut printer) {
        true => ExitCode::SUCCESS,
        false => ExitCode::FAILURE,
    };
    defx!("exitcode {:?}", exitcode);

    exitcode
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::Write;
    use std::path::Path;
    use std::time::{Duration, SystemTime};

    use ::ff14lib::common::Bytes;
    use ::ff14lib::printer::printers::Color;
    use ::ff14lib::readers::helpers::path_to_fpath;
    use ::filetime::{set_file_mtime, FileTime};
    use ::tempfile::{NamedTempFile, TempDir};
    use ::termcolor::NoColor;
    use ::test_case::test_case;

    type PrinterTest = PrinterLogMessage<NoColor<Bytes>>;

    /// Record with the 9 byte prologue, log type `0x01`, param `0x02`.
    fn record(
        timestamp: i32,
        text: &[u8],
    ) -> Bytes {
        let mut record: Bytes = timestamp.to_le_bytes().to_vec();
        record.extend_from_slice(&[0x01, 0x02, 0x00, 0x00, 0x1f]);
        record.extend_from_slice(text);

        record
    }

    fn logfile(records: &[Bytes]) -> Bytes {
        let mut bytes: Bytes = Bytes::new();
        bytes.extend_from_slice(&0i32.to_le_bytes());
        bytes.extend_from_slice(&(records.len() as i32).to_le_bytes());
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

    fn logfile_good() -> Bytes {
        logfile(&[record(0, b"Hi"), record(60, b"there")])
    }

    /// The last record extends one byte past the end of the file.
    fn logfile_truncated() -> Bytes {
        let mut bytes = logfile(&[record(0, b"Hi"), record(60, b"there")]);
        bytes.pop();

        bytes
    }

    /// End index less than start index.
    fn logfile_malformed() -> Bytes {
        let mut bytes: Bytes = 5i32.to_le_bytes().to_vec();
        bytes.extend_from_slice(&3i32.to_le_bytes());

        bytes
    }

    fn create_temp_file(data: &[u8]) -> NamedTempFile {
        let mut ntf = NamedTempFile::new().unwrap();
        ntf.write_all(data).unwrap();

        ntf
    }

    fn create_file_mtime(
        tempdir: &TempDir,
        name: &str,
        data: &[u8],
        mtime_secs: u64,
    ) -> FPath {
        let pathb = tempdir.path().join(name);
        std::fs::write(&pathb, data).unwrap();
        let mtime = SystemTime::UNIX_EPOCH + Duration::from_secs(mtime_secs);
        set_file_mtime(&pathb, FileTime::from_system_time(mtime)).unwrap();

        path_to_fpath(pathb.as_path())
    }

    fn new_printer() -> PrinterTest {
        PrinterLogMessage::new(NoColor::new(Bytes::new()), Color::Cyan)
    }

    fn printed(printer: PrinterTest) -> String {
        String::from_utf8(printer.into_inner().into_inner()).unwrap()
    }

    fn args_utc(path: &str) -> CLI_Args {
        CLI_Args::try_parse_from(["ff14logview", "-t=Z", path]).unwrap()
    }

    // --------------------
    // command-line parsing

    #[test]
    fn test_cli_args_no_path() {
        let args = CLI_Args::try_parse_from(["ff14logview"]).unwrap();
        assert_eq!(args.path, None);
        assert!(!args.debug);
        assert_eq!(args.tz_offset, None);
        assert_eq!(args.color_choice, CLI_Color_Choice::Auto);
        assert!(!args.summary);
    }

    #[test_case(&["ff14logview", "-v", "x"]; "short before")]
    #[test_case(&["ff14logview", "x", "-v"]; "short after")]
    #[test_case(&["ff14logview", "--debug", "x"]; "long")]
    fn test_cli_args_debug_path(argv: &[&str]) {
        let args = CLI_Args::try_parse_from(argv.iter().copied()).unwrap();
        assert!(args.debug);
        assert_eq!(args.path, Some(String::from("x")));
    }

    #[test_case("-t=-0800", FixedOffset::west_opt(8 * 3600).unwrap(); "minus eight equals")]
    #[test_case("--tz-offset=+09:00", FixedOffset::east_opt(9 * 3600).unwrap(); "plus nine long")]
    #[test_case("-t=Z", FixedOffset::east_opt(0).unwrap(); "zulu")]
    fn test_cli_args_tz_offset(
        arg: &str,
        expect: FixedOffset,
    ) {
        let args = CLI_Args::try_parse_from(["ff14logview", arg, "x"]).unwrap();
        assert_eq!(args.tz_offset, Some(expect));
    }

    #[test_case("bogus")]
    #[test_case("+99:99")]
    fn test_cli_process_tz_offset_err(tzo: &str) {
        assert!(cli_process_tz_offset(tzo).is_err());
        assert!(CLI_Args::try_parse_from(["ff14logview", "-t", tzo, "x"]).is_err());
    }

    #[test]
    fn test_cli_args_color_summary() {
        let args = CLI_Args::try_parse_from(["ff14logview", "-c", "never", "-s", "x"]).unwrap();
        assert_eq!(args.color_choice, CLI_Color_Choice::Never);
        assert_eq!(args.color_choice.to_colorchoice(), ColorChoice::Never);
        assert!(args.summary);
    }

    // ------------
    // process_file

    #[test]
    fn test_process_file_good() {
        let ntf = create_temp_file(&logfile_good());
        let path: FPath = path_to_fpath(ntf.path());
        let mut printer = new_printer();
        let summary = process_file(&path, false, &Some(FixedOffset::east_opt(0).unwrap()), &mut printer);
        assert!(!summary.has_error(), "{:?}", summary.error);
        assert_eq!(summary.readerdata.unwrap().recordreader_records_processed, 2);
        assert_eq!(
            printed(printer),
            format!(
                "{}\n0000 01/01 00:00:00 [01,02] Hi\n0001 01/01 00:01:00 [01,02] there\n",
                path
            )
        );
    }

    #[test]
    fn test_process_file_truncated_prints_filename_only() {
        let ntf = create_temp_file(&logfile_truncated());
        let path: FPath = path_to_fpath(ntf.path());
        let mut printer = new_printer();
        let summary = process_file(&path, false, &None, &mut printer);
        assert!(summary.has_error());
        // the first record decoded but is not printed
        assert_eq!(summary.readerdata.unwrap().recordreader_records_processed, 1);
        assert_eq!(printed(printer), format!("{}\n", path));
    }

    #[test]
    fn test_process_file_malformed_header() {
        let ntf = create_temp_file(&logfile_malformed());
        let path: FPath = path_to_fpath(ntf.path());
        let mut printer = new_printer();
        let summary = process_file(&path, false, &None, &mut printer);
        assert!(summary.has_error());
        assert!(summary.readerdata.is_none());
        assert_eq!(printed(printer), format!("{}\n", path));
    }

    #[test]
    fn test_process_file_empty() {
        let ntf = create_temp_file(&[]);
        let path: FPath = path_to_fpath(ntf.path());
        let mut printer = new_printer();
        let summary = process_file(&path, false, &None, &mut printer);
        assert_eq!(summary.error, Some(String::from("file is empty")));
        assert_eq!(printed(printer), format!("{}\n", path));
    }

    // ------------
    // process_args

    #[test]
    fn test_process_args_no_path_prints_usage() {
        let args = CLI_Args::try_parse_from(["ff14logview"]).unwrap();
        let mut printer = new_printer();
        assert!(process_args(&args, &mut printer));
        assert_eq!(printed(printer), CLI_USAGE);
    }

    #[test]
    fn test_process_args_not_found_prints_usage() {
        let path = "/this/path/does/not/exist/ff14";
        assert!(!Path::new(path).exists());
        let args = args_utc(path);
        let mut printer = new_printer();
        assert!(!process_args(&args, &mut printer));
        assert_eq!(
            printed(printer),
            format!("File/Directory not found : {}\n{}", path, CLI_USAGE)
        );
    }

    #[test]
    fn test_process_args_file() {
        let ntf = create_temp_file(&logfile_good());
        let path: FPath = path_to_fpath(ntf.path());
        let args = args_utc(path.as_str());
        let mut printer = new_printer();
        assert!(process_args(&args, &mut printer));
        assert!(printed(printer).ends_with("0001 01/01 00:01:00 [01,02] there\n"));
    }

    #[test]
    fn test_process_args_dir_continues_after_failed_file() {
        let tempdir = TempDir::new().unwrap();
        // processed in modified time order: b, a, c
        let fpath_a = create_file_mtime(&tempdir, "a.log", &logfile_truncated(), 1_600_000_200);
        let fpath_b = create_file_mtime(&tempdir, "b.log", &logfile_good(), 1_600_000_100);
        let fpath_c = create_file_mtime(&tempdir, "c.log", &logfile_malformed(), 1_600_000_300);
        let fpath_d = create_file_mtime(&tempdir, "d.log", &logfile_good(), 1_600_000_400);
        let args = args_utc(path_to_fpath(tempdir.path()).as_str());
        let mut printer = new_printer();
        assert!(!process_args(&args, &mut printer));
        let lines: &str = "0000 01/01 00:00:00 [01,02] Hi\n0001 01/01 00:01:00 [01,02] there\n";
        assert_eq!(
            printed(printer),
            format!(
                "{}\n{}{}\n{}\n{}\n{}",
                fpath_b, lines, fpath_a, fpath_c, fpath_d, lines,
            )
        );
    }

    #[test]
    fn test_process_args_debug() {
        let ntf = create_temp_file(&logfile(&[record(
            0,
            &[b'A', 0x02, 0x12, 0x03, 0x41, 0x42, 0x43, 0x03, 0xEE, 0x80, 0xA0],
        )]));
        let path: FPath = path_to_fpath(ntf.path());
        let args = CLI_Args::try_parse_from(["ff14logview", "-v", "-t=Z", path.as_str()]).unwrap();
        let mut printer = new_printer();
        assert!(process_args(&args, &mut printer));
        assert_eq!(
            printed(printer),
            format!("{}\n0000 01/01 00:00:00 [01,02] A[02-12-03]*\n", path)
        );
    }
}
