use super::Phase;
use crate::model::{PlotKind, SampleSize};
use std::path::PathBuf;

/// A user-triggered operation, dispatched against the session state
/// machine.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Intent {
    /// Validate and adopt a chosen file path.
    Select(PathBuf),
    /// Parse the selected file and capture its statistics.
    Load,
    /// Report the statistics of the loaded session.
    Stats,
    /// Build the series for one chart.
    Plot { kind: PlotKind, sample: SampleSize },
}

impl Intent {
    pub fn kind(&self) -> IntentKind {
        match self {
            Intent::Select(_) => IntentKind::Select,
            Intent::Load => IntentKind::Load,
            Intent::Stats => IntentKind::Stats,
            Intent::Plot { .. } => IntentKind::Plot,
        }
    }
}

/// Payload-free intent discriminant, keying the dispatch table.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum IntentKind {
    Select,
    Load,
    Stats,
    Plot,
}

impl IntentKind {
    /// Dispatch table: which intents the state machine accepts in each
    /// phase. The GUI derives button enablement from the same table.
    pub fn allowed_in(self, phase: Phase) -> bool {
        match (phase, self) {
            (Phase::Loading, _) => false,
            (_, IntentKind::Select) => true,
            (Phase::Selected, IntentKind::Load) => true,
            (_, IntentKind::Load) => false,
            (Phase::Loaded, IntentKind::Stats | IntentKind::Plot) => true,
            (_, IntentKind::Stats | IntentKind::Plot) => false,
        }
    }
}
