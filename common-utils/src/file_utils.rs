//! # File utils
//!
//! This module contains settings for the names and paths of the files written by extraction runs.
//!

use std::path::{Path, PathBuf};

/// Struct providing settings for filenames of extracted pages.
pub struct PageFilesConfig;

impl PageFilesConfig {
    /// The prefix of every page file. Its suffix is the page number followed by the extension.
    pub const FILE_PREFIX: &'static str = "page_";
    /// The file extension for page files.
    pub const FILE_EXTENSION: &'static str = ".csv";
    /// Where page files go when no output directory is given.
    pub const DEFAULT_DIRECTORY: &'static str = ".";
}

/// The file name of the given page, e.g. `page_3.csv`.
pub fn page_file_name(page: u32) -> String {
    format!(
        "{}{}{}",
        PageFilesConfig::FILE_PREFIX,
        page,
        PageFilesConfig::FILE_EXTENSION
    )
}

/// The path of the given page inside `out_directory`.
pub fn page_file_path<P: AsRef<Path>>(out_directory: P, page: u32) -> PathBuf {
    out_directory.as_ref().join(page_file_name(page))
}
