//! The file-reading collaborator: opens a FASTQ file (plain or gzipped),
//! parses it whole, and aggregates plot series on demand.

pub mod fastq;
pub mod io;
pub mod plot;

use crate::model::{PlotKind, PlotSeries, SampleSize};
use crate::shell::source::{FastqError, SequenceSource};
use fastq::Record;
use io::InputKind;
use log::{debug, info};
use std::path::{Path, PathBuf};

/// A FASTQ file held fully in memory after `parse`: its records, derived
/// totals, and the detected quality encoding.
#[derive(Debug)]
pub struct FastqFile {
    path: PathBuf,
    kind: InputKind,
    records: Vec<Record>,
    total_bases: u64,
    phred_offset: u8,
}

impl FastqFile {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn input_kind(&self) -> InputKind {
        self.kind
    }

    /// Detected Phred offset; meaningful after a successful `parse`.
    pub fn phred_offset(&self) -> u8 {
        self.phred_offset
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Block-compressed inputs decompress on a small worker pool; past a
    /// handful of threads the reader is output-bound.
    fn decompress_threads() -> usize {
        num_cpus::get().clamp(1, 4)
    }
}

impl SequenceSource for FastqFile {
    fn open(path: &Path) -> Result<Self, FastqError> {
        let kind = io::detect_input_kind(path)?;
        debug!("opened {} as {:?}", path.display(), kind);
        Ok(Self {
            path: path.to_path_buf(),
            kind,
            records: Vec::new(),
            total_bases: 0,
            phred_offset: 33,
        })
    }

    fn parse(&mut self) -> Result<(), FastqError> {
        let payload = io::read_all(&self.path, self.kind, Self::decompress_threads())?;
        let records = fastq::parse_all(payload.bytes())?;
        let total_bases = records.iter().map(|r| r.seq.len() as u64).sum();
        let phred_offset = fastq::detect_phred_offset(&records);
        info!(
            "parsed {}: {} records, {} bases, phred+{}",
            self.path.display(),
            records.len(),
            total_bases,
            phred_offset
        );
        // Committed only after the whole scan succeeded.
        self.records = records;
        self.total_bases = total_bases;
        self.phred_offset = phred_offset;
        Ok(())
    }

    fn sequence_count(&self) -> u64 {
        self.records.len() as u64
    }

    fn average_sequence_length(&self) -> Option<f64> {
        if self.records.is_empty() {
            None
        } else {
            Some(self.total_bases as f64 / self.records.len() as f64)
        }
    }

    fn total_base_pairs(&self) -> u64 {
        self.total_bases
    }

    fn plot(&self, kind: PlotKind, sample: SampleSize) -> Result<PlotSeries, FastqError> {
        if self.records.is_empty() {
            return Err(FastqError::NoSequences);
        }
        let series = plot::build_series(&self.records, self.phred_offset, kind, sample);
        debug!(
            "built {:?} series over {} of {} records",
            kind,
            sample.bound(self.records.len()),
            self.records.len()
        );
        Ok(series)
    }
}
