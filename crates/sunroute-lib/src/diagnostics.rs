//! Opt-in dump of the per-bearing tables for debugging.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use csv::Writer;
use serde::Serialize;

use crate::bearing::Bearing;
use crate::error::Result;
use crate::exposure::ExposureTable;
use crate::insolation::InsolationTable;

/// Receives the tables computed for a request.
///
/// The pipeline only calls a sink when one is supplied; nothing is written
/// by default.
pub trait TableSink {
    fn record(&mut self, insolation: &InsolationTable, exposure: &ExposureTable) -> Result<()>;
}

#[derive(Debug, Serialize)]
struct TableRow {
    bearing: Bearing,
    insolation: f64,
    exposure: f64,
}

/// Writes `bearing,insolation,exposure` rows as CSV.
pub struct CsvTableSink<W: Write> {
    writer: Writer<W>,
}

impl CsvTableSink<File> {
    pub fn create(path: &Path) -> Result<Self> {
        Ok(Self {
            writer: Writer::from_path(path)?,
        })
    }
}

impl<W: Write> CsvTableSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Writer::from_writer(writer),
        }
    }

    pub fn into_inner(self) -> Result<W> {
        self.writer
            .into_inner()
            .map_err(|err| err.into_error().into())
    }
}

impl<W: Write> TableSink for CsvTableSink<W> {
    fn record(&mut self, insolation: &InsolationTable, exposure: &ExposureTable) -> Result<()> {
        for ((bearing, jv), (_, fraction)) in insolation.iter().zip(exposure.iter()) {
            self.writer.serialize(TableRow {
                bearing,
                insolation: jv,
                exposure: fraction,
            })?;
        }
        self.writer.flush()?;
        Ok(())
    }
}

/// Sink that keeps a copy of the last tables it saw.
#[derive(Debug, Default)]
pub struct MemoryTableSink {
    pub tables: Option<(InsolationTable, ExposureTable)>,
}

impl TableSink for MemoryTableSink {
    fn record(&mut self, insolation: &InsolationTable, exposure: &ExposureTable) -> Result<()> {
        self.tables = Some((insolation.clone(), exposure.clone()));
        Ok(())
    }
}
