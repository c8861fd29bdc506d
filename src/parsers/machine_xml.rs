//! Streaming decoder for the tool's `machine` XML.
//!
//! The decoder pulls one event at a time from the underlying reader and only holds
//! the `machine` element currently being decoded, so memory stays flat no matter
//! how large the listing is. Elements that do not qualify are dropped silently.
//! Field text is kept verbatim, surrounding whitespace included.

use std::io::BufRead;

use quick_xml::Reader as XmlReader;
use quick_xml::events::{BytesStart, Event};

use crate::error::{IndexError, Result};
use crate::models::{Machine, Record};

const MACHINE_TAG: &[u8] = b"machine";

/// Child element whose text is being collected
#[derive(Debug, Clone, Copy)]
enum TextField {
    Description,
    Year,
    Manufacturer,
}

/// Pull-based iterator of qualifying records from a detail document.
///
/// Stops at end of document or after the first error.
pub struct MachineStream<R: BufRead> {
    reader: XmlReader<R>,
    buf: Vec<u8>,
    source: String,
    done: bool,
}

impl<R: BufRead> MachineStream<R> {
    /// `source` names the document in error messages (the prefix pattern)
    pub fn new(input: R, source: impl Into<String>) -> Self {
        let reader = XmlReader::from_reader(input);
        Self { reader, buf: Vec::new(), source: source.into(), done: false }
    }

    /// Advance to the next qualifying machine
    fn next_record(&mut self) -> Result<Option<Record>> {
        loop {
            self.buf.clear();
            let (element, has_children) = match self.reader.read_event_into(&mut self.buf) {
                Ok(Event::Start(e)) if e.local_name().as_ref() == MACHINE_TAG => {
                    (e.into_owned(), true)
                }
                Ok(Event::Empty(e)) if e.local_name().as_ref() == MACHINE_TAG => {
                    (e.into_owned(), false)
                }
                Ok(Event::Eof) => return Ok(None),
                Ok(_) => continue,
                Err(e) => return Err(xml_error(&self.source, &self.reader, e)),
            };

            let mut machine = decode_attributes(&element, &self.source)?;
            if has_children {
                self.decode_children(&mut machine)?;
            }

            if machine.qualifies() {
                return machine.into_record().map(Some);
            }
            log::trace!("Skipping non-game machine {}", machine.name);
        }
    }

    /// Read up to the closing `</machine>`, filling text fields and the driver status
    /// from direct children. Deeper elements are skipped.
    fn decode_children(&mut self, machine: &mut Machine) -> Result<()> {
        let mut depth = 1usize;
        let mut field: Option<TextField> = None;
        let mut buf = Vec::new();

        loop {
            buf.clear();
            match self.reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) => {
                    depth += 1;
                    field = None;
                    if depth == 2 {
                        match e.local_name().as_ref() {
                            b"description" => {
                                machine.description.clear();
                                field = Some(TextField::Description);
                            }
                            b"year" => {
                                machine.year.clear();
                                field = Some(TextField::Year);
                            }
                            b"manufacturer" => {
                                machine.manufacturer.clear();
                                field = Some(TextField::Manufacturer);
                            }
                            b"driver" => machine.driver.status = driver_status(e, &self.source)?,
                            _ => {}
                        }
                    }
                }
                Ok(Event::Empty(ref e)) => {
                    if depth == 1 && e.local_name().as_ref() == b"driver" {
                        machine.driver.status = driver_status(e, &self.source)?;
                    }
                }
                Ok(Event::Text(ref t)) => {
                    if let Some(f) = field {
                        let text =
                            t.unescape().map_err(|e| xml_error(&self.source, &self.reader, e))?;
                        field_mut(machine, f).push_str(&text);
                    }
                }
                Ok(Event::CData(ref c)) => {
                    if let Some(f) = field {
                        field_mut(machine, f).push_str(&String::from_utf8_lossy(c));
                    }
                }
                Ok(Event::End(_)) => {
                    depth -= 1;
                    field = None;
                    if depth == 0 {
                        return Ok(());
                    }
                }
                Ok(Event::Eof) => {
                    return Err(IndexError::decode(
                        &self.source,
                        format!("unexpected end of document inside machine {}", machine.name),
                    ));
                }
                Ok(_) => {}
                Err(e) => return Err(xml_error(&self.source, &self.reader, e)),
            }
        }
    }
}

impl<R: BufRead> Iterator for MachineStream<R> {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.next_record() {
            Ok(Some(record)) => Some(Ok(record)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

/// Read failures on the underlying stream are reported as such, not as bad XML
fn xml_error<R>(source: &str, reader: &XmlReader<R>, err: quick_xml::Error) -> IndexError {
    match err {
        quick_xml::Error::Io(io) => IndexError::ProcessRead {
            command: source.to_string(),
            source: std::io::Error::new(io.kind(), io.to_string()),
        },
        other => {
            IndexError::decode(source, format!("{} at byte {}", other, reader.buffer_position()))
        }
    }
}

fn field_mut(machine: &mut Machine, field: TextField) -> &mut String {
    match field {
        TextField::Description => &mut machine.description,
        TextField::Year => &mut machine.year,
        TextField::Manufacturer => &mut machine.manufacturer,
    }
}

fn decode_attributes(element: &BytesStart<'_>, source: &str) -> Result<Machine> {
    let mut machine = Machine::default();
    for attr in element.attributes() {
        let attr = attr.map_err(|e| IndexError::decode(source, e))?;
        let value = attr.unescape_value().map_err(|e| IndexError::decode(source, e))?;
        let slot = match attr.key.local_name().as_ref() {
            b"name" => &mut machine.name,
            b"isbios" => &mut machine.is_bios,
            b"isdevice" => &mut machine.is_device,
            b"ismechanical" => &mut machine.is_mechanical,
            b"runnable" => &mut machine.runnable,
            b"cloneof" => &mut machine.clone_of,
            b"sampleof" => &mut machine.sample_of,
            _ => continue,
        };
        *slot = value.into_owned();
    }
    Ok(machine)
}

fn driver_status(element: &BytesStart<'_>, source: &str) -> Result<String> {
    for attr in element.attributes() {
        let attr = attr.map_err(|e| IndexError::decode(source, e))?;
        if attr.key.local_name().as_ref() == b"status" {
            let value = attr.unescape_value().map_err(|e| IndexError::decode(source, e))?;
            return Ok(value.into_owned());
        }
    }
    Ok(String::new())
}
