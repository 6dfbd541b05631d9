//! Per-participant, per-day game state.

use ball_knowledge_rules::{HintKind, HintSet, MAX_REVEALS, StatLine, Subject};
use chrono::NaiveDate;
use derive_getters::Getters;
use derive_new::new;
use serde::{Deserialize, Serialize};

use crate::store::DailyResult;

/// Where a participant stands on the current day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Phase {
    /// No day has been started yet.
    NotStarted,
    /// Guessing is open.
    InProgress,
    /// The day is solved; terminal until the reference day rolls over.
    Solved {
        /// Final score.
        score: u32,
    },
}

/// Whether a guess was typed or picked from the offered suggestions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GuessOrigin {
    /// Free text entered by the participant.
    Typed,
    /// A name clicked from the pending suggestions.
    Suggestion,
}

/// The fixed inputs of one participant's day.
#[derive(Debug, Clone, Getters, new)]
pub struct Round {
    /// Reference day.
    day: NaiveDate,
    /// Participant identity.
    participant: String,
    /// The day's subject, stat lines in reveal order.
    subject: Subject,
}

impl Round {
    /// Highest reveal count for this subject: `max(1, min(5, lines))`.
    pub fn reveal_cap(&self) -> u8 {
        let lines = u8::try_from(self.subject.stat_lines().len()).unwrap_or(u8::MAX);
        lines.clamp(1, MAX_REVEALS)
    }
}

/// Mutable state of one participant for one reference day.
///
/// Serializable so any session layer (cookie, file, row) can carry it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct GameState {
    /// Day this state belongs to; `None` before the first day starts.
    pub(super) day: Option<NaiveDate>,
    /// Current phase.
    pub(super) phase: Phase,
    /// Stat lines shown so far.
    pub(super) revealed: u8,
    /// Hints bought today.
    pub(super) hints: HintSet,
    /// Suggestions waiting to be shown once.
    pub(super) pending_suggestions: Vec<String>,
    /// A free suggestion round was granted since the last counted attempt.
    pub(super) suggestion_grace_used: bool,
    /// Non-authoritative "left the tab" annotation.
    pub(super) left_tab: bool,
}

impl GameState {
    /// A state that has not started any day.
    pub fn new() -> Self {
        Self {
            day: None,
            phase: Phase::NotStarted,
            revealed: 1,
            hints: HintSet::new(),
            pending_suggestions: Vec::new(),
            suggestion_grace_used: false,
            left_tab: false,
        }
    }

    /// Fresh in-progress state for `day`.
    pub(super) fn begin(day: NaiveDate) -> Self {
        Self {
            day: Some(day),
            phase: Phase::InProgress,
            ..Self::new()
        }
    }

    /// Solved state rebuilt from a recorded result.
    pub(super) fn restored(result: &DailyResult, cap: u8) -> Self {
        Self {
            day: Some(*result.day()),
            phase: Phase::Solved {
                score: *result.score(),
            },
            revealed: (*result.revealed()).clamp(1, cap),
            hints: result.hints().clone(),
            left_tab: *result.left_tab(),
            ..Self::new()
        }
    }

    /// True once the day is solved.
    pub fn is_solved(&self) -> bool {
        matches!(self.phase, Phase::Solved { .. })
    }

    /// True if the state was started for `day`.
    pub fn belongs_to(&self, day: NaiveDate) -> bool {
        self.day == Some(day)
    }

    /// Score as it stands: the final score once solved, else recomputed.
    pub fn live_score(&self) -> u32 {
        match self.phase {
            Phase::Solved { score } => score,
            _ => ball_knowledge_rules::score(self.revealed, &self.hints),
        }
    }

    /// Number of visible lines of a subject with `line_count` lines.
    pub(super) fn visible_count(&self, line_count: usize) -> usize {
        usize::from(self.revealed.max(1)).min(line_count)
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

/// New state plus what the operation produced.
#[derive(Debug, Clone, Getters)]
pub struct Transition<T> {
    /// State after the operation.
    state: GameState,
    /// View data for the caller.
    outcome: T,
}

impl<T> Transition<T> {
    pub(super) fn new(state: GameState, outcome: T) -> Self {
        Self { state, outcome }
    }

    /// Splits into state and outcome.
    pub fn into_parts(self) -> (GameState, T) {
        (self.state, self.outcome)
    }
}

/// How a solved result reached durable storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Persistence {
    /// Written by this guess.
    Recorded,
    /// A result for the day already existed; it was left untouched.
    AlreadyRecorded,
    /// No store is configured.
    Skipped,
    /// The write failed; the solved view stands anyway.
    Failed,
}

/// What a guess did.
#[derive(Debug, Clone, PartialEq)]
pub enum GuessOutcome {
    /// Correct: the day is solved.
    Solved {
        /// Final score.
        score: u32,
        /// Result write status.
        persistence: Persistence,
        /// Streak after a fresh record, when one was written.
        streak: Option<crate::store::Streak>,
    },
    /// Wrong, but near-miss names were found; this attempt was free.
    Suggested {
        /// Names offered to the participant.
        suggestions: Vec<String>,
    },
    /// Wrong and counted.
    Revealed {
        /// Reveal count after the attempt.
        revealed: u8,
        /// Names offered for display, possibly none.
        suggestions: Vec<String>,
    },
}

/// What a hint purchase did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HintPurchase {
    /// Bought and charged.
    Purchased {
        /// The hint.
        kind: HintKind,
        /// Points charged.
        cost: u32,
    },
    /// Already owned; nothing charged.
    AlreadyOwned(HintKind),
    /// Implied by an owned hint; nothing charged.
    Covered {
        /// The requested hint.
        kind: HintKind,
        /// The owned hint that implies it.
        by: HintKind,
    },
}

/// A hint shown for one line of the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Getters)]
pub struct HintEntry {
    /// Hint kind.
    kind: HintKind,
    /// Resolved value, if the data had one.
    value: Option<String>,
    /// Shown because an owned hint implies it, not bought directly.
    covered: bool,
}

impl HintEntry {
    pub(super) fn new(kind: HintKind, value: Option<String>, covered: bool) -> Self {
        Self {
            kind,
            value,
            covered,
        }
    }
}

/// Owned and implied hints for one visible stat line.
#[derive(Debug, Clone, PartialEq, Serialize, Getters)]
pub struct BoardLine {
    /// Index into the visible lines.
    index: usize,
    /// The line itself.
    line: StatLine,
    /// Hints for that line, in hint-kind order.
    entries: Vec<HintEntry>,
}

impl BoardLine {
    pub(super) fn new(index: usize, line: StatLine, entries: Vec<HintEntry>) -> Self {
        Self {
            index,
            line,
            entries,
        }
    }
}
