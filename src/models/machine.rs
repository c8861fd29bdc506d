use crate::error::Result;
use crate::models::Record;
use crate::parsers::year::year_timestamp;

/// Raw `machine` element as described by the tool's detail output
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Machine {
    pub name: String,
    pub is_bios: String,
    pub is_device: String,
    pub is_mechanical: String,
    pub runnable: String,
    pub clone_of: String,
    pub sample_of: String,
    pub description: String,
    pub year: String,
    pub manufacturer: String,
    pub driver: Driver,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Driver {
    pub status: String,
}

impl Machine {
    /// Runnable, and not a BIOS, device or mechanical machine.
    ///
    /// Flags are compared literally; a missing attribute never disqualifies.
    pub fn qualifies(&self) -> bool {
        self.runnable != "no"
            && self.is_bios != "yes"
            && self.is_device != "yes"
            && self.is_mechanical != "yes"
    }

    pub fn into_record(self) -> Result<Record> {
        let timestamp = year_timestamp(&self.name, &self.year)?;
        Ok(Record {
            name: self.name,
            description: self.description,
            year: self.year,
            timestamp,
            manufacturer: self.manufacturer,
            driver_status: self.driver.status,
        })
    }
}
