//! Output formatting module
//!
//! Renders report lines and session summaries.

mod formatter;

pub use formatter::{OutputFormat, ReportLine, ResultFormatter};
