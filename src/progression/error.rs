//! Rejections raised by the progression engine.

use ball_knowledge_rules::HintKind;
use derive_more::{Display, Error};

/// A request the engine refused; the state is never changed.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum ProgressError {
    /// The day is already solved, in this state or in the store.
    #[display("Today's puzzle is already completed")]
    AlreadyCompleted,

    /// The guess was blank after normalization.
    #[display("Guess is empty")]
    EmptyGuess,

    /// The hint label names no known hint kind.
    #[display("Unknown hint '{}'", label)]
    UnknownHint {
        /// Label as received.
        label: String,
    },

    /// The subject has no value for this hint.
    #[display("Hint '{}' is not available for this player", kind)]
    HintUnavailable {
        /// The requested hint.
        kind: HintKind,
    },

    /// Asked for a stat line that is not revealed yet.
    #[display("Line {} is not revealed (revealed: {})", index, revealed)]
    RevealOutOfRange {
        /// Requested line index.
        index: usize,
        /// Lines currently revealed.
        revealed: usize,
    },
}
