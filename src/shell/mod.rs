//! Session shell: one file at a time, driven through a validated
//! intent dispatcher over a small state machine.

pub mod error;
pub mod intent;
pub mod source;

use crate::model::{PlotKind, PlotSeries, SampleSize};
use log::{info, warn};
use std::mem;
use std::path::{Path, PathBuf};

pub use error::{LoadError, RenderError, ShellError, ValidationError};
pub use intent::{Intent, IntentKind};
pub use source::{FastqError, SequenceSource};

/// File name endings the selector accepts, matched case-insensitively.
pub const RECOGNIZED_EXTENSIONS: [&str; 4] = [".fastq", ".fq", ".fastq.gz", ".fq.gz"];

/// True when `path` carries one of the recognized FASTQ extensions.
///
/// Pure suffix test: no filesystem access, no content sniffing. Compound
/// suffixes (`.fastq.gz`, `.fq.gz`) match as wholes, and a bare extension
/// with no stem (a file named just `.fq`) does not count.
pub fn is_recognized(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    let name = name.to_ascii_lowercase();
    RECOGNIZED_EXTENSIONS
        .iter()
        .any(|ext| name.len() > ext.len() && name.ends_with(ext))
}

/// The externally observable phase of the session state machine.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Phase {
    Empty,
    Selected,
    Loading,
    Loaded,
}

/// A validated file choice. Only constructed for recognized paths, so a
/// stored selection is always valid.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Selection {
    path: PathBuf,
}

impl Selection {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File name for display, lossy on non-UTF-8 paths.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Statistics captured from the collaborator on a successful load.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FileSummary {
    pub sequence_count: u64,
    pub average_length: f64,
    pub total_base_pairs: u64,
}

/// A successfully loaded file: the parsed source plus its captured
/// statistics.
pub struct Session<S> {
    source: S,
    summary: FileSummary,
}

impl<S> Session<S> {
    pub fn summary(&self) -> FileSummary {
        self.summary
    }
}

enum State<S> {
    Empty,
    Selected(Selection),
    Loading(Selection),
    Loaded {
        selection: Selection,
        session: Session<S>,
    },
}

/// Outcome of a successfully dispatched intent.
#[derive(Debug)]
pub enum Outcome {
    Selected { path: PathBuf },
    Loaded(FileSummary),
    Stats(FileSummary),
    Plot(PlotSeries),
}

/// The analyzer shell. Owns the single session and all transitions into
/// and out of it; callers go through [`Shell::dispatch`].
pub struct Shell<S> {
    state: State<S>,
}

impl<S: SequenceSource> Default for Shell<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: SequenceSource> Shell<S> {
    pub fn new() -> Self {
        Self {
            state: State::Empty,
        }
    }

    pub fn phase(&self) -> Phase {
        match &self.state {
            State::Empty => Phase::Empty,
            State::Selected(_) => Phase::Selected,
            State::Loading(_) => Phase::Loading,
            State::Loaded { .. } => Phase::Loaded,
        }
    }

    /// True when the dispatch table accepts `kind` in the current phase.
    pub fn is_enabled(&self, kind: IntentKind) -> bool {
        kind.allowed_in(self.phase())
    }

    /// Path of the current selection, in any phase that has one.
    pub fn selected_path(&self) -> Option<&Path> {
        match &self.state {
            State::Empty => None,
            State::Selected(sel) | State::Loading(sel) => Some(sel.path()),
            State::Loaded { selection, .. } => Some(selection.path()),
        }
    }

    /// Display name of the current selection.
    pub fn selected_name(&self) -> Option<String> {
        match &self.state {
            State::Empty => None,
            State::Selected(sel) | State::Loading(sel) => Some(sel.file_name()),
            State::Loaded { selection, .. } => Some(selection.file_name()),
        }
    }

    /// Statistics of the loaded session, if any.
    pub fn summary(&self) -> Option<FileSummary> {
        match &self.state {
            State::Loaded { session, .. } => Some(session.summary()),
            _ => None,
        }
    }

    /// Validates `intent` against the current phase, then runs the
    /// matching transition. Reporting is entirely the caller's job.
    pub fn dispatch(&mut self, intent: Intent) -> Result<Outcome, ShellError> {
        if !self.is_enabled(intent.kind()) {
            return Err(self.rejection(intent.kind()));
        }
        match intent {
            Intent::Select(path) => self.select(path),
            Intent::Load => self.load(),
            Intent::Stats => self.stats(),
            Intent::Plot { kind, sample } => self.plot(kind, sample),
        }
    }

    /// Error for an intent the dispatch table refused.
    fn rejection(&self, kind: IntentKind) -> ShellError {
        if self.phase() == Phase::Loading {
            return ValidationError::LoadInFlight.into();
        }
        match kind {
            // Select is refused only while loading, handled above.
            IntentKind::Select => ValidationError::LoadInFlight.into(),
            IntentKind::Load => ValidationError::NoSelection.into(),
            IntentKind::Stats | IntentKind::Plot => RenderError::NoSession.into(),
        }
    }

    fn select(&mut self, path: PathBuf) -> Result<Outcome, ShellError> {
        if !is_recognized(&path) {
            warn!("rejected selection, unsupported file type: {}", path.display());
            return Err(ValidationError::UnrecognizedExtension { path }.into());
        }
        // Replaces the selection wholesale; any loaded session drops here.
        self.state = State::Selected(Selection { path: path.clone() });
        info!("selected {}", path.display());
        Ok(Outcome::Selected { path })
    }

    fn load(&mut self) -> Result<Outcome, ShellError> {
        let selection = match mem::replace(&mut self.state, State::Empty) {
            State::Selected(sel) => sel,
            other => {
                self.state = other;
                return Err(ValidationError::NoSelection.into());
            }
        };
        self.state = State::Loading(selection.clone());
        match Self::open_and_parse(selection.path()) {
            Ok(session) => {
                let summary = session.summary();
                info!(
                    "loaded {} ({} sequences, {} bases)",
                    selection.path().display(),
                    summary.sequence_count,
                    summary.total_base_pairs
                );
                self.state = State::Loaded { selection, session };
                Ok(Outcome::Loaded(summary))
            }
            Err(err) => {
                // Full reset: a failed load leaves no selection and no
                // statistics behind.
                warn!("load failed for {}: {}", selection.path().display(), err);
                self.state = State::Empty;
                Err(ShellError::Load(err))
            }
        }
    }

    fn open_and_parse(path: &Path) -> Result<Session<S>, LoadError> {
        let mut source = S::open(path)?;
        source.parse()?;
        let sequence_count = source.sequence_count();
        let average_length = source
            .average_sequence_length()
            .ok_or(LoadError::NoSequences)?;
        let total_base_pairs = source.total_base_pairs();
        Ok(Session {
            source,
            summary: FileSummary {
                sequence_count,
                average_length,
                total_base_pairs,
            },
        })
    }

    fn stats(&mut self) -> Result<Outcome, ShellError> {
        match &self.state {
            State::Loaded { session, .. } => Ok(Outcome::Stats(session.summary())),
            _ => Err(RenderError::NoSession.into()),
        }
    }

    fn plot(&mut self, kind: PlotKind, sample: SampleSize) -> Result<Outcome, ShellError> {
        let session = match &self.state {
            State::Loaded { session, .. } => session,
            _ => return Err(RenderError::NoSession.into()),
        };
        // Loaded state survives plot failures; the user may retry with
        // different parameters without reloading.
        let series = session
            .source
            .plot(kind, sample)
            .map_err(RenderError::from)?;
        info!("rendered {:?} over {}", kind, self.selected_name().unwrap_or_default());
        Ok(Outcome::Plot(series))
    }
}
