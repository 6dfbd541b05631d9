//! Derivation of hint values from a revealed stat line.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::matcher::is_generational_suffix;
use crate::scoring::HintKind;
use crate::subject::Subject;
use crate::teams::{Conference, Division, alignment, canonical_team};

/// Won-lost-tied record of a team for one season.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct TeamRecord {
    wins: u32,
    losses: u32,
    ties: u32,
}

impl TeamRecord {
    /// Creates a new record.
    pub fn new(wins: u32, losses: u32, ties: u32) -> Self {
        Self { wins, losses, ties }
    }

    /// Formats as "W-L", or "W-L-T" when there were ties.
    pub fn display(&self) -> String {
        if self.ties > 0 {
            format!("{}-{}-{}", self.wins, self.losses, self.ties)
        } else {
            format!("{}-{}", self.wins, self.losses)
        }
    }
}

/// Source of season win-loss records keyed by (season, canonical team).
///
/// Implementations swallow their own failures: a lookup that cannot be
/// answered is simply `None`.
pub trait RecordBook {
    /// Returns the record for the team in that season, if known.
    fn team_record(&self, season: i32, team: &str) -> Option<TeamRecord>;
}

/// A record book that knows nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRecords;

impl RecordBook for NoRecords {
    fn team_record(&self, _season: i32, _team: &str) -> Option<TeamRecord> {
        None
    }
}

/// Hint values for one stat line; every field is independently optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct HintValues {
    season: Option<i32>,
    team: Option<String>,
    conference: Option<Conference>,
    division: Option<Division>,
    record: Option<String>,
    college: Option<String>,
    first_name: Option<String>,
    last_name: Option<String>,
}

impl HintValues {
    /// Display value for a hint kind, if one could be resolved.
    pub fn value_for(&self, kind: HintKind) -> Option<String> {
        match kind {
            HintKind::Team => self.team.clone(),
            HintKind::Conference => self.conference.map(|c| c.to_string()),
            HintKind::Division => match (self.conference, self.division) {
                (Some(c), Some(d)) => Some(format!("{c} {d}")),
                (None, Some(d)) => Some(d.to_string()),
                _ => None,
            },
            HintKind::Record => self.record.clone(),
            HintKind::College => self.college.clone(),
            HintKind::FirstName => self.first_name.clone(),
            HintKind::LastName => self.last_name.clone(),
        }
    }
}

/// Splits a display name into first and last tokens, ignoring suffixes.
///
/// A single-token name has no last name.
pub fn split_name(full_name: &str) -> (Option<String>, Option<String>) {
    let tokens: Vec<&str> = full_name.split_whitespace().collect();
    let tokens = match tokens.split_last() {
        Some((last, rest)) if is_generational_suffix(last) => rest,
        _ => tokens.as_slice(),
    };
    match tokens {
        [] => (None, None),
        [only] => (Some((*only).to_string()), None),
        [first, .., last] => (Some((*first).to_string()), Some((*last).to_string())),
    }
}

/// Resolves hint values for a subject's stat lines.
#[derive(Debug, Clone, Copy, Default)]
pub struct HintResolver;

impl HintResolver {
    /// Creates a resolver.
    pub fn new() -> Self {
        Self
    }

    /// Resolves hint values for the stat line at `line_index`.
    ///
    /// The index is clamped into range; a subject without stat lines still
    /// yields its player-level values (college and names).
    #[instrument(skip(self, subject, records), fields(subject_id = %subject.id()))]
    pub fn resolve(
        &self,
        subject: &Subject,
        line_index: usize,
        records: &dyn RecordBook,
    ) -> HintValues {
        let (first_name, last_name) = split_name(subject.full_name());
        let mut values = HintValues {
            college: subject.college().clone(),
            first_name,
            last_name,
            ..HintValues::default()
        };

        let lines = subject.stat_lines();
        let Some(last_index) = lines.len().checked_sub(1) else {
            debug!("Subject has no stat lines");
            return values;
        };
        let line = &lines[line_index.min(last_index)];

        values.season = Some(*line.season());
        values.team = canonical_team(line.team());
        if let Some(team) = values.team.as_deref() {
            if let Some((conference, division)) = alignment(team) {
                values.conference = Some(conference);
                values.division = Some(division);
            }
            values.record = records
                .team_record(*line.season(), team)
                .map(|r| r.display());
        }

        debug!(team = ?values.team, record = ?values.record, "Hint values resolved");
        values
    }
}
