use std::io::BufReader;
use std::process::ChildStdout;

use crate::error::Result;
use crate::models::{Prefix, Record};
use crate::parsers::MachineStream;
use crate::process::{CatalogTool, ProcessKiller, ToolProcess};

/// Qualifying records for one prefix, decoded straight from the tool's stdout.
///
/// Owns the detail process: [`DetailStream::finish`] checks its exit status, and
/// dropping the stream early kills and reaps it.
pub struct DetailStream {
    records: MachineStream<BufReader<ChildStdout>>,
    process: ToolProcess,
}

impl DetailStream {
    pub fn open(tool: &CatalogTool, prefix: &Prefix) -> Result<Self> {
        let mut process = tool.list_xml(prefix)?;
        let stdout = process.take_stdout()?;
        let records = MachineStream::new(stdout, prefix.pattern());
        Ok(Self { records, process })
    }

    pub fn killer(&self) -> ProcessKiller {
        self.process.killer()
    }

    /// Wait for the detail process after the records are exhausted
    pub fn finish(self) -> Result<()> {
        let DetailStream { records, process } = self;
        drop(records);
        process.finish()
    }
}

impl Iterator for DetailStream {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        self.records.next()
    }
}
