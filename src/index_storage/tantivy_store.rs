//! Tantivy-backed record index

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tantivy::collector::TopDocs;
use tantivy::directory::MmapDirectory;
use tantivy::query::{QueryParser, TermQuery};
use tantivy::schema::{Field, INDEXED, IndexRecordOption, STORED, STRING, Schema, TEXT, Value};
use tantivy::{DocAddress, Index, IndexReader, IndexWriter, ReloadPolicy, TantivyDocument, Term};

use super::store::{Batch, IndexStore};
use crate::error::{IndexError, Result};
use crate::models::Record;

/// Memory budget shared by the writer's indexing threads
const WRITER_HEAP_BYTES: usize = 50_000_000;

const FIELD_NAME: &str = "name";
const FIELD_DESCRIPTION: &str = "description";
const FIELD_YEAR: &str = "year";
const FIELD_TIMESTAMP: &str = "timestamp";
const FIELD_MANUFACTURER: &str = "manufacturer";
const FIELD_DRIVER_STATUS: &str = "driver_status";

#[derive(Debug, Clone, Copy)]
struct RecordFields {
    name: Field,
    description: Field,
    year: Field,
    timestamp: Field,
    manufacturer: Field,
    driver_status: Field,
}

impl RecordFields {
    fn schema() -> (Schema, Self) {
        let mut builder = Schema::builder();
        let fields = Self {
            name: builder.add_text_field(FIELD_NAME, STRING | STORED),
            description: builder.add_text_field(FIELD_DESCRIPTION, TEXT | STORED),
            year: builder.add_text_field(FIELD_YEAR, STRING | STORED),
            timestamp: builder.add_date_field(FIELD_TIMESTAMP, INDEXED | STORED),
            manufacturer: builder.add_text_field(FIELD_MANUFACTURER, TEXT | STORED),
            driver_status: builder.add_text_field(FIELD_DRIVER_STATUS, STRING | STORED),
        };
        (builder.build(), fields)
    }

    fn from_schema(schema: &Schema) -> tantivy::Result<Self> {
        Ok(Self {
            name: schema.get_field(FIELD_NAME)?,
            description: schema.get_field(FIELD_DESCRIPTION)?,
            year: schema.get_field(FIELD_YEAR)?,
            timestamp: schema.get_field(FIELD_TIMESTAMP)?,
            manufacturer: schema.get_field(FIELD_MANUFACTURER)?,
            driver_status: schema.get_field(FIELD_DRIVER_STATUS)?,
        })
    }

    fn document(&self, record: &Record) -> TantivyDocument {
        let mut doc = TantivyDocument::default();
        doc.add_text(self.name, &record.name);
        doc.add_text(self.description, &record.description);
        doc.add_text(self.year, &record.year);
        doc.add_date(
            self.timestamp,
            tantivy::DateTime::from_timestamp_secs(record.timestamp.timestamp()),
        );
        doc.add_text(self.manufacturer, &record.manufacturer);
        doc.add_text(self.driver_status, &record.driver_status);
        doc
    }
}

/// A stored record returned by a query
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    pub score: f32,
    pub name: String,
    pub description: String,
    pub year: String,
    pub timestamp: Option<DateTime<Utc>>,
    pub manufacturer: String,
    pub driver_status: String,
}

pub struct TantivyStore {
    index: Index,
    fields: RecordFields,
    writer: Option<IndexWriter>,
    path: PathBuf,
}

impl TantivyStore {
    /// Open the index at `path`, creating the directory and an empty index if needed
    pub fn open_or_create(path: &Path) -> Result<Self> {
        let open_error =
            |reason: String| IndexError::StoreOpen { path: path.to_path_buf(), reason };

        fs::create_dir_all(path).map_err(|e| open_error(e.to_string()))?;
        let directory = MmapDirectory::open(path).map_err(|e| open_error(e.to_string()))?;
        let (schema, fields) = RecordFields::schema();
        let index =
            Index::open_or_create(directory, schema).map_err(|e| open_error(e.to_string()))?;

        Ok(Self { index, fields, writer: None, path: path.to_path_buf() })
    }

    /// Open an existing index for querying
    pub fn open(path: &Path) -> Result<Self> {
        let open_error =
            |reason: String| IndexError::StoreOpen { path: path.to_path_buf(), reason };

        if !path.exists() {
            return Err(open_error("index does not exist, run `index` first".to_string()));
        }
        let index = Index::open_in_dir(path).map_err(|e| open_error(e.to_string()))?;
        let fields =
            RecordFields::from_schema(&index.schema()).map_err(|e| open_error(e.to_string()))?;

        Ok(Self { index, fields, writer: None, path: path.to_path_buf() })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of records visible as of the last commit
    pub fn num_records(&self) -> Result<u64> {
        Ok(self.reader()?.searcher().num_docs())
    }

    /// Query-string search over name, description, manufacturer and year
    pub fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchHit>> {
        if limit == 0 {
            return Ok(Vec::new());
        }
        let fields = self.fields;
        let parser = QueryParser::for_index(
            &self.index,
            vec![fields.name, fields.description, fields.manufacturer, fields.year],
        );
        let query = parser.parse_query(query).map_err(|e| IndexError::Query(e.to_string()))?;

        let searcher = self.reader()?.searcher();
        let top_docs = searcher
            .search(&query, &TopDocs::with_limit(limit))
            .map_err(|e| IndexError::Query(e.to_string()))?;

        top_docs
            .into_iter()
            .map(|(score, address)| self.hit(&searcher, score, address))
            .collect()
    }

    /// Look up one record by its exact name
    pub fn find_by_name(&self, name: &str) -> Result<Option<SearchHit>> {
        let term = Term::from_field_text(self.fields.name, name);
        let query = TermQuery::new(term, IndexRecordOption::Basic);

        let searcher = self.reader()?.searcher();
        let top_docs = searcher
            .search(&query, &TopDocs::with_limit(1))
            .map_err(|e| IndexError::Query(e.to_string()))?;

        match top_docs.into_iter().next() {
            Some((score, address)) => self.hit(&searcher, score, address).map(Some),
            None => Ok(None),
        }
    }

    fn reader(&self) -> Result<IndexReader> {
        self.index
            .reader_builder()
            .reload_policy(ReloadPolicy::Manual)
            .try_into()
            .map_err(|e| IndexError::Query(e.to_string()))
    }

    fn hit(
        &self,
        searcher: &tantivy::Searcher,
        score: f32,
        address: DocAddress,
    ) -> Result<SearchHit> {
        let doc: TantivyDocument =
            searcher.doc(address).map_err(|e| IndexError::Query(e.to_string()))?;
        let text = |field: Field| {
            doc.get_first(field).and_then(|v| v.as_str().map(str::to_string)).unwrap_or_default()
        };
        let timestamp = doc
            .get_first(self.fields.timestamp)
            .and_then(|v| v.as_datetime())
            .and_then(|dt| DateTime::from_timestamp(dt.into_timestamp_secs(), 0));

        Ok(SearchHit {
            score,
            name: text(self.fields.name),
            description: text(self.fields.description),
            year: text(self.fields.year),
            timestamp,
            manufacturer: text(self.fields.manufacturer),
            driver_status: text(self.fields.driver_status),
        })
    }

    fn writer(&mut self) -> Result<&mut IndexWriter> {
        if self.writer.is_none() {
            let writer = self.index.writer(WRITER_HEAP_BYTES).map_err(|e| {
                IndexError::StoreOpen { path: self.path.clone(), reason: e.to_string() }
            })?;
            self.writer = Some(writer);
        }
        self.writer.as_mut().ok_or_else(|| IndexError::StoreOpen {
            path: self.path.clone(),
            reason: "index writer unavailable".to_string(),
        })
    }
}

impl IndexStore for TantivyStore {
    fn commit(&mut self, batch: Batch) -> Result<()> {
        let size = batch.len();
        let fields = self.fields;
        let commit_error = |e: tantivy::TantivyError| IndexError::BatchCommit {
            size,
            reason: e.to_string(),
        };

        let writer = self.writer()?;
        for record in batch.records() {
            writer.delete_term(Term::from_field_text(fields.name, &record.name));
            writer.add_document(fields.document(record)).map_err(commit_error)?;
        }
        writer.commit().map_err(commit_error)?;
        log::debug!("Committed batch of {} records", size);
        Ok(())
    }
}
