//! Data models for the catalog index.
//!
//! - [`Machine`] - raw `machine` element decoded from the tool's XML
//! - [`Record`] - the unit stored in the index, produced from qualifying machines
//! - [`Prefix`] - a name prefix fetched by one detail invocation

pub mod machine;
pub mod prefix;
pub mod record;

pub use machine::{Driver, Machine};
pub use prefix::{Prefix, WILDCARD};
pub use record::Record;
