//! Record ingestion: applies validated transfer records to a memory map.

use crate::mem::{MemError, MemoryMap, Tolerance};
use crate::srec::{self, RecordError, RecordKind, RecordParser, SrecParser};
use std::fmt;

//===========================================================================//

/// An error encountered while ingesting a transfer record line.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum IngestError {
    /// The record's checksum does not match its contents.
    Checksum,
    /// The record could not be parsed into its structured fields.
    Record(RecordError),
    /// The record is well formed, but of a type the programmer does not
    /// know how to apply.
    UnsupportedRecord {
        /// The unrecognized type tag, e.g. `"S5"`.
        tag: String,
    },
    /// The record's payload did not fit inside the addressed range.
    Mem(MemError),
}

impl fmt::Display for IngestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IngestError::Checksum => write!(f, "record checksum mismatch"),
            IngestError::Record(err) => write!(f, "malformed record: {err}"),
            IngestError::UnsupportedRecord { tag } => {
                write!(f, "unsupported record type {tag}")
            }
            IngestError::Mem(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for IngestError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            IngestError::Record(err) => Some(err),
            IngestError::Mem(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RecordError> for IngestError {
    fn from(err: RecordError) -> IngestError {
        IngestError::Record(err)
    }
}

impl From<MemError> for IngestError {
    fn from(err: MemError) -> IngestError {
        IngestError::Mem(err)
    }
}

//===========================================================================//

/// Applies transfer records to a memory map, one line at a time.
///
/// The ingestor owns its target map and holds no other state between
/// calls.  Record lines are interpreted by a [`RecordParser`]
/// collaborator; the production parser is [`SrecParser`].
pub struct Ingestor<P = SrecParser> {
    parser: P,
    map: MemoryMap,
}

impl Ingestor<SrecParser> {
    /// Returns an ingestor targeting `map`, speaking Motorola S-records.
    pub fn new(map: MemoryMap) -> Ingestor<SrecParser> {
        Ingestor::with_parser(SrecParser::new(), map)
    }
}

impl<P: RecordParser> Ingestor<P> {
    /// Returns an ingestor targeting `map`, with `parser` interpreting the
    /// record lines.
    pub fn with_parser(parser: P, map: MemoryMap) -> Ingestor<P> {
        Ingestor { parser, map }
    }

    /// Returns the target memory map.
    pub fn map(&self) -> &MemoryMap {
        &self.map
    }

    /// Returns the target memory map, mutably.
    pub fn map_mut(&mut self) -> &mut MemoryMap {
        &mut self.map
    }

    /// Consumes the ingestor, returning its map.
    pub fn into_map(self) -> MemoryMap {
        self.map
    }

    /// Zeroes every range in the map.
    pub fn erase_all(&mut self) {
        tracing::info!("erasing memory");
        self.map.clear();
    }

    /// Applies one raw record line to the map.
    ///
    /// The map is mutated only by a data record that passes structural and
    /// checksum validation, and the write itself is all-or-nothing; on any
    /// failure the map is exactly as it was before the call.
    pub fn ingest_line(&mut self, line: &str) -> Result<(), IngestError> {
        let record = self.parser.parse(line)?;
        if !self.parser.checksum_ok(line) {
            tracing::error!("checksum mismatch in record: {}", line.trim());
            return Err(IngestError::Checksum);
        }
        let addr = srec::decode_hex_u32(&record.addr)?;
        match record.kind {
            RecordKind::Header => {
                tracing::debug!("start of transfer");
                Ok(())
            }
            RecordKind::Data => {
                let bytes = srec::decode_hex_bytes(&record.data)?;
                tracing::debug!(
                    "writing {} bytes at 0x{addr:08x}",
                    bytes.len()
                );
                self.map.write_block(addr, &bytes, Tolerance::Strict)?;
                Ok(())
            }
            RecordKind::Terminator => {
                tracing::debug!("end of transfer");
                Ok(())
            }
            RecordKind::Other => {
                Err(IngestError::UnsupportedRecord { tag: record.tag })
            }
        }
    }
}

//===========================================================================//


//===========================================================================//
