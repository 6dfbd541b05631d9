//! Score computation and the purchasable hint catalogue.

use std::collections::BTreeSet;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoEnumIterator};
use tracing::instrument;

/// Score before any penalties.
pub const START_SCORE: u32 = 100;

/// Points lost per stat line revealed beyond the first.
pub const PENALTY_PER_REVEAL: u32 = 10;

/// Upper bound on revealed stat lines.
pub const MAX_REVEALS: u8 = 5;

/// A purchasable derived fact about the subject.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum HintKind {
    /// Canonical team of the revealed season.
    Team,
    /// Division of that team.
    Division,
    /// Conference of that team.
    Conference,
    /// Team's win-loss record that season.
    Record,
    /// Subject's college.
    College,
    /// Subject's first name.
    FirstName,
    /// Subject's last name.
    LastName,
}

impl HintKind {
    /// Fixed point cost of purchasing this hint.
    pub fn cost(self) -> u32 {
        match self {
            Self::Team => 15,
            Self::Division => 10,
            Self::Conference => 8,
            Self::Record => 8,
            Self::College => 20,
            Self::FirstName => 50,
            Self::LastName => 60,
        }
    }

    /// Hints whose ownership makes this one redundant.
    ///
    /// A team hint already tells the conference and division; a division hint
    /// already tells the conference.
    pub fn superseded_by(self) -> &'static [HintKind] {
        match self {
            Self::Conference => &[Self::Team, Self::Division],
            Self::Division => &[Self::Team],
            _ => &[],
        }
    }

    /// Returns true if a hint in `owned` already reveals this one.
    pub fn is_covered_by(self, owned: &HintSet) -> bool {
        self.superseded_by().iter().any(|k| owned.contains(*k))
    }

    /// Parses a hint label, trimming whitespace and ignoring case.
    pub fn parse(label: &str) -> Option<Self> {
        Self::from_str(label.trim()).ok()
    }

    /// All hint kinds in catalogue order.
    pub fn all() -> impl Iterator<Item = HintKind> {
        Self::iter()
    }
}

/// Set of purchased hints. Each kind appears at most once.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HintSet(BTreeSet<HintKind>);

impl HintSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a hint, returning false if it was already present.
    pub fn insert(&mut self, kind: HintKind) -> bool {
        self.0.insert(kind)
    }

    /// Returns true if the hint has been purchased.
    pub fn contains(&self, kind: HintKind) -> bool {
        self.0.contains(&kind)
    }

    /// Number of purchased hints.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if no hint has been purchased.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates purchased hints in catalogue order.
    pub fn iter(&self) -> impl Iterator<Item = HintKind> + '_ {
        self.0.iter().copied()
    }

    /// Sum of the costs of all purchased hints.
    pub fn penalty(&self) -> u32 {
        self.iter().map(HintKind::cost).sum()
    }

    /// Parses stored labels, dropping unknown or blank entries.
    pub fn from_labels<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        labels
            .into_iter()
            .filter_map(|l| HintKind::parse(l.as_ref()))
            .collect()
    }

    /// Comma-separated labels, the storage representation.
    pub fn to_labels(&self) -> String {
        self.iter()
            .map(|k| k.as_ref().to_string())
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl FromIterator<HintKind> for HintSet {
    fn from_iter<T: IntoIterator<Item = HintKind>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Score for a number of revealed lines and a set of purchased hints.
///
/// `revealed` is floored at 1 and the result at 0.
#[instrument(skip(hints), fields(hint_labels = %hints.to_labels()))]
pub fn score(revealed: u8, hints: &HintSet) -> u32 {
    let extra = u32::from(revealed.max(1) - 1);
    START_SCORE
        .saturating_sub(PENALTY_PER_REVEAL * extra)
        .saturating_sub(hints.penalty())
}

/// Score from raw hint labels; unknown labels cost nothing.
pub fn score_from_labels<I, S>(revealed: u8, labels: I) -> u32
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    score(revealed, &HintSet::from_labels(labels))
}
