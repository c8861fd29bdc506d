//! Persistent record index
//!
//! Records are stored in a tantivy index directory, keyed by machine name. Next to the
//! index segments the directory holds `indexer-metadata.json`, describing the run that
//! built it (when, from which tool, how many records).

pub mod metadata;
pub mod persistence;
pub mod store;
pub mod tantivy_store;

pub use metadata::{IndexMetadata, METADATA_VERSION};
pub use persistence::{load_metadata, metadata_path, save_metadata};
pub use store::{Batch, IndexStore};
pub use tantivy_store::{SearchHit, TantivyStore};
