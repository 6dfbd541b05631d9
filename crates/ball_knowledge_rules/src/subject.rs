//! Core value types for the hidden subject of a daily puzzle.

use derive_getters::Getters;
use derive_more::{Display, From};
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Stable identifier of a subject (a player record).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display, From,
)]
#[serde(transparent)]
pub struct SubjectId(pub i64);

/// A single named statistic within a stat line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters)]
pub struct Metric {
    /// Display name of the statistic (e.g. "Pass Yds").
    name: String,
    /// Numeric value.
    value: f64,
}

impl Metric {
    /// Creates a new metric.
    pub fn new(name: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }

    /// Formats the value without a trailing `.0` for whole numbers.
    pub fn display_value(&self) -> String {
        if self.value.fract() == 0.0 && self.value.abs() < 1e15 {
            format!("{}", self.value as i64)
        } else {
            format!("{:.1}", self.value)
        }
    }
}

/// One period (season) of statistics for a subject.
///
/// Every line carries exactly three metrics; the array type makes any other
/// count unrepresentable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters)]
pub struct StatLine {
    /// Season the line belongs to.
    season: i32,
    /// Raw team code as recorded in the source data (not canonicalized).
    team: String,
    /// The three statistics shown for this season.
    metrics: [Metric; 3],
}

impl StatLine {
    /// Creates a new stat line.
    pub fn new(season: i32, team: impl Into<String>, metrics: [Metric; 3]) -> Self {
        Self {
            season,
            team: team.into(),
            metrics,
        }
    }
}

/// The hidden player record revealed over the course of a day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters)]
pub struct Subject {
    /// Identifier in the backing store (or snapshot position).
    id: SubjectId,
    /// Display name, e.g. "Tom Brady".
    full_name: String,
    /// URL-safe slug, e.g. "tom-brady".
    slug: String,
    /// Category used for suggestion pre-filtering (position).
    position: String,
    /// Optional secondary attribute; never blank when present.
    college: Option<String>,
    /// Stat lines in reveal order.
    stat_lines: Vec<StatLine>,
}

impl Subject {
    /// Creates a subject, normalizing a blank college to `None`.
    #[instrument(skip(full_name, slug, position, college, stat_lines), fields(id = %id))]
    pub fn new(
        id: SubjectId,
        full_name: impl Into<String>,
        slug: impl Into<String>,
        position: impl Into<String>,
        college: Option<String>,
        stat_lines: Vec<StatLine>,
    ) -> Self {
        let college = college
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());
        Self {
            id,
            full_name: full_name.into(),
            slug: slug.into(),
            position: position.into(),
            college,
            stat_lines,
        }
    }

    /// Returns a copy of this subject with its stat lines in a new order.
    pub fn with_stat_lines(&self, stat_lines: Vec<StatLine>) -> Self {
        Self {
            stat_lines,
            ..self.clone()
        }
    }

    /// Returns the subject as a suggestion candidate.
    pub fn candidate(&self) -> Candidate {
        Candidate::new(self.full_name.clone(), self.position.clone())
    }
}

/// A `(name, category)` pair from the suggestion population.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Getters)]
pub struct Candidate {
    /// Display name.
    name: String,
    /// Category (position).
    position: String,
}

impl Candidate {
    /// Creates a new candidate.
    pub fn new(name: impl Into<String>, position: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            position: position.into(),
        }
    }
}
