//! Parsers for the external tool's output.
//!
//! # Error Handling Strategy
//!
//! Unlike a best-effort scanner, the index build treats every parse failure as fatal:
//!
//! - **Listing lines**: blank lines are skipped, short names become exact prefixes.
//!   Nothing in the listing can fail except reading it.
//!
//! - **Machine XML**: malformed markup, undecodable attributes and unparsable years end
//!   the stream with an [`IndexError`](crate::error::IndexError). The caller aborts the
//!   run rather than skipping the element, so a partially understood catalog never
//!   looks complete.

pub mod listing;
pub mod machine_xml;
pub mod year;

pub use listing::{collect_prefixes, line_prefix};
pub use machine_xml::MachineStream;
pub use year::{normalize_year, year_timestamp};
