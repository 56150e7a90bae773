// src/readers/filepreprocessor.rs

//! Functions to find the log files to process for a user-passed path.
//!
//! A file path is processed as-is. A directory is enumerated, not
//! recursively, and its files are ordered by last modified time, oldest
//! first, so log messages print in chronological order.

use crate::common::FPath;
use crate::debug::printers::de_wrn;
use crate::readers::helpers::{fpath_to_path, path_to_fpath};

use std::path::Path;
use std::time::SystemTime;

#[allow(unused_imports)]
use ::si_trace_print::{defn, defo, defx, defñ};

/// Initial path processing return type.
#[derive(Debug, Eq, PartialEq)]
pub enum ProcessPathResult {
    /// File can be processed by `ff14logview`
    FileValid(FPath),
    /// Path exists and is not a file
    FileErrNotAFile(FPath),
    /// Path does not exist
    FileErrNotExist(FPath),
    /// Path could not be examined, e.g. permissions. Carries the error
    /// message.
    FileErrIo(FPath, String),
}

pub type ProcessPathResults = Vec<ProcessPathResult>;

/// Return a `ProcessPathResult` for each file to process at `path`.
///
/// A directory returns a `ProcessPathResult` for each entry directly within
/// it, sorted by modified time, ties sorted by file name. Sub-directories
/// are ignored.
pub fn process_path(path: &FPath) -> ProcessPathResults {
    defn!("({:?})", path);
    let std_path: &Path = fpath_to_path(path);
    if std_path.is_file() {
        defx!("return FileValid({:?})", path);
        return vec![ProcessPathResult::FileValid(path.clone())];
    }
    if !std_path.exists() {
        defx!("return FileErrNotExist({:?})", path);
        return vec![ProcessPathResult::FileErrNotExist(path.clone())];
    }
    if !std_path.is_dir() {
        defx!("return FileErrNotAFile({:?})", path);
        return vec![ProcessPathResult::FileErrNotAFile(path.clone())];
    }

    // getting here means `path` is a directory

    let mut results: ProcessPathResults = ProcessPathResults::new();
    let mut files: Vec<(SystemTime, FPath)> = Vec::new();
    defo!("WalkDir({:?})…", path);
    for entry in walkdir::WalkDir::new(std_path)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        let path_entry = match entry {
            Ok(val) => val,
            Err(err) => {
                de_wrn!("WalkDir error {}", err);
                let fpath_err: FPath = match err.path() {
                    Some(p) => path_to_fpath(p),
                    None => path.clone(),
                };
                results.push(ProcessPathResult::FileErrIo(fpath_err, err.to_string()));
                continue;
            }
        };
        let fpath_entry: FPath = path_to_fpath(path_entry.path());
        if path_entry.file_type().is_dir() {
            defo!("skip directory {:?}", fpath_entry);
            continue;
        }
        if !path_entry.file_type().is_file() {
            defo!("Path not a file {:?}", fpath_entry);
            results.push(ProcessPathResult::FileErrNotAFile(fpath_entry));
            continue;
        }
        let modified: SystemTime = match path_entry
            .metadata()
            .map_err(std::io::Error::from)
            .and_then(|metadata| metadata.modified())
        {
            Ok(val) => val,
            Err(err) => {
                defo!("modified() error {} for {:?}", err, fpath_entry);
                results.push(ProcessPathResult::FileErrIo(fpath_entry, err.to_string()));
                continue;
            }
        };
        files.push((modified, fpath_entry));
    }
    // stable sort; entries are already sorted by file name
    files.sort_by_key(|(modified, _)| *modified);
    results.extend(
        files
            .into_iter()
            .map(|(_, fpath)| ProcessPathResult::FileValid(fpath)),
    );
    defx!("return {:?}", results);

    results
}
