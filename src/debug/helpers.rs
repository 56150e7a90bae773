// src/debug/helpers.rs

//! Miscellaneous helper functions for testing; temporary log files and
//! directories.

use crate::common::FPath;
use crate::readers::helpers::path_to_fpath;

use std::io::Write; // for `NamedTempFile.write_all`
use std::path::PathBuf;
use std::time::{Duration, SystemTime};

use ::filetime::{set_file_mtime, FileTime};
use ::lazy_static::lazy_static;
use ::si_trace_print::dpfñ;

#[doc(hidden)]
pub use ::tempfile::NamedTempFile;
#[doc(hidden)]
pub use ::tempfile::TempDir;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// temporary file helper functions
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// NamedTempFile instances default to this file name prefix.
///
/// See <https://github.com/Stebalien/tempfile/issues/183>.
pub const STR_TEMPFILE_PREFIX: &str = "tmp-ff14logview-test-";

lazy_static! {
    pub static ref STRING_TEMPFILE_PREFIX: String = String::from(STR_TEMPFILE_PREFIX);
}

/// Small helper function for copying `NamedTempFile` path to a `FPath`.
pub fn ntf_fpath(ntf: &NamedTempFile) -> FPath {
    path_to_fpath(ntf.path())
}

/// Testing helper function to write a `[u8]` to a temporary file.
pub fn create_temp_file_bytes(data: &[u8]) -> NamedTempFile {
    let mut ntf = match ::tempfile::Builder::new()
        // use known prefix for easier cleanup
        .prefix::<str>(&STRING_TEMPFILE_PREFIX)
        .tempfile()
    {
        Ok(val) => val,
        Err(err) => {
            panic!("NamedTempFile::new() return Err {}", err);
        }
    };
    match ntf.write_all(data) {
        Ok(_) => {}
        Err(err) => {
            panic!("NamedTempFile::write_all() return Err {}", err);
        }
    }

    ntf
}

/// Create a temporary directory
pub fn create_temp_dir() -> TempDir {
    dpfñ!();
    ::tempfile::tempdir().unwrap()
}

/// Testing helper function to write `data` to file `name` within `tempdir`
/// and set the file modified time to `mtime_secs` seconds after the Unix
/// epoch.
pub fn create_file_in_tmpdir_mtime(
    data: &[u8],
    name: &str,
    tempdir: &TempDir,
    mtime_secs: u64,
) -> FPath {
    let pathb: PathBuf = tempdir.path().join(name);
    dpfñ!("create {:?}", pathb);
    if let Err(err) = std::fs::write(&pathb, data) {
        panic!("std::fs::write({:?}) return Err {}", pathb, err);
    }
    let mtime: SystemTime = SystemTime::UNIX_EPOCH + Duration::from_secs(mtime_secs);
    if let Err(err) = set_file_mtime(&pathb, FileTime::from_system_time(mtime)) {
        panic!("set_file_mtime({:?}) return Err {}", pathb, err);
    }

    path_to_fpath(pathb.as_path())
}
