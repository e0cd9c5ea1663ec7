//! # Common utils
//!
//! This library provides functionality needed by more than one of our scheduled extraction jobs.

pub mod date_utils;
pub mod file_utils;
