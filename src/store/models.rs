//! Durable records exchanged with the persistence collaborator.

use ball_knowledge_rules::HintSet;
use chrono::NaiveDate;
use derive_getters::Getters;
use derive_new::new;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Final outcome of one participant's day, written at most once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, new)]
pub struct DailyResult {
    day: NaiveDate,
    participant: String,
    revealed: u8,
    score: u32,
    hints: HintSet,
    /// Non-authoritative "left the tab" annotation.
    left_tab: bool,
}

/// What happened when a result write was attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordOutcome {
    /// This call created the row.
    Recorded,
    /// A row for (day, participant) already existed and was left untouched.
    AlreadyRecorded,
}

/// A participant's run of consecutive solved days.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct Streak {
    participant: String,
    current: u32,
    best: u32,
    last_day: NaiveDate,
}

impl Streak {
    /// A streak of one starting on `day`.
    #[instrument]
    pub fn first(participant: String, day: NaiveDate) -> Self {
        Self {
            participant,
            current: 1,
            best: 1,
            last_day: day,
        }
    }

    /// Rebuilds a streak from stored fields.
    pub fn from_parts(participant: String, current: u32, best: u32, last_day: NaiveDate) -> Self {
        Self {
            participant,
            current,
            best: best.max(current),
            last_day,
        }
    }

    /// Streak after solving `day`.
    ///
    /// Solving the day after `last_day` extends the run; a gap restarts it at
    /// one. Re-solving the same day or an earlier one changes nothing.
    #[instrument(skip(self), fields(participant = %self.participant))]
    pub fn advance(self, day: NaiveDate) -> Self {
        if day <= self.last_day {
            debug!(last_day = %self.last_day, "Streak already covers day");
            return self;
        }
        let current = if self.last_day.succ_opt() == Some(day) {
            self.current + 1
        } else {
            1
        };
        Self {
            best: self.best.max(current),
            current,
            last_day: day,
            participant: self.participant,
        }
    }
}
