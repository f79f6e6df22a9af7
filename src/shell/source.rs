//! The contract the shell expects from its file-reading collaborator.

use crate::model::{PlotKind, PlotSeries, SampleSize};
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Failures raised by a sequence source while opening, parsing, or
/// aggregating a file.
#[derive(Debug, Error)]
pub enum FastqError {
    #[error("file not found: {}", path.display())]
    NotFound { path: PathBuf },
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to decompress {}: {source}", path.display())]
    Decompress {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid FASTQ at record {record}: {reason}")]
    Malformed { record: u64, reason: String },
    #[error("file contains no sequences")]
    NoSequences,
}

impl FastqError {
    /// Wraps an I/O error, surfacing missing files as their own condition.
    pub(crate) fn io(path: &Path, source: io::Error) -> Self {
        if source.kind() == io::ErrorKind::NotFound {
            FastqError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            FastqError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    }

    pub(crate) fn decompress(path: &Path, source: io::Error) -> Self {
        FastqError::Decompress {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn malformed(record: u64, reason: impl Into<String>) -> Self {
        FastqError::Malformed {
            record,
            reason: reason.into(),
        }
    }
}

/// A parseable sequence file, consumed by the shell one session at a time.
///
/// `open` must not read record content; existence is the only thing checked
/// up front. `parse` is all-or-nothing: after an error the source exposes no
/// partial results. The statistics accessors are only meaningful once
/// `parse` has succeeded.
pub trait SequenceSource: Sized {
    /// Opens `path`, failing if it does not exist.
    fn open(path: &Path) -> Result<Self, FastqError>;

    /// Fully consumes the file, failing on the first malformed record.
    fn parse(&mut self) -> Result<(), FastqError>;

    /// Number of parsed records.
    fn sequence_count(&self) -> u64;

    /// Mean sequence length, `None` when no records were parsed.
    fn average_sequence_length(&self) -> Option<f64>;

    /// Sum of all sequence lengths.
    fn total_base_pairs(&self) -> u64;

    /// Aggregates up to `sample` records into the series for `kind`.
    fn plot(&self, kind: PlotKind, sample: SampleSize) -> Result<PlotSeries, FastqError>;
}
