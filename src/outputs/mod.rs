//! Output writers.
//!
//! # Submodules
//!
//! - [`json`]: pretty-printed JSON reports to stdout or to a file

pub mod json;
