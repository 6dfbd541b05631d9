//! Local population snapshot loaded from JSON.
//!
//! The snapshot is the fallback population when no database is configured
//! or reachable. Player order in the file is preserved so that seeded daily
//! selection stays stable across runs.

use std::collections::HashMap;
use std::path::Path;

use ball_knowledge_rules::{
    Candidate, Metric, RecordBook, StatLine, Subject, SubjectId, TeamRecord, canonical_team,
};
use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::Deserialize;
use tracing::{debug, info, instrument, warn};

#[derive(Debug, Deserialize)]
struct SnapshotFile {
    players: Vec<PlayerEntry>,
    #[serde(default)]
    team_records: Vec<TeamRecordEntry>,
}

#[derive(Debug, Deserialize)]
struct PlayerEntry {
    #[serde(default)]
    id: Option<i64>,
    full_name: String,
    player_slug: String,
    position: String,
    #[serde(default)]
    college: Option<String>,
    #[serde(default)]
    seasons: Vec<SeasonEntry>,
}

#[derive(Debug, Deserialize)]
struct SeasonEntry {
    season: i32,
    team: String,
    stats: Vec<MetricEntry>,
}

#[derive(Debug, Deserialize)]
struct MetricEntry {
    name: String,
    value: f64,
}

/// One team's season record as stored in the snapshot.
#[derive(Debug, Clone, Deserialize, Getters)]
pub struct TeamRecordEntry {
    season: i32,
    team: String,
    wins: u32,
    losses: u32,
    #[serde(default)]
    ties: u32,
}

impl TeamRecordEntry {
    /// The record part of the entry.
    pub fn record(&self) -> TeamRecord {
        TeamRecord::new(self.wins, self.losses, self.ties)
    }
}

/// Stably ordered local population plus optional team records.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    subjects: Vec<Subject>,
    team_records: Vec<TeamRecordEntry>,
    record_index: HashMap<(i32, String), TeamRecord>,
}

impl Snapshot {
    /// Loads a snapshot file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SnapshotError> {
        debug!("Reading snapshot");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| SnapshotError::new(format!("Failed to read snapshot: {}", e)))?;
        Self::from_json(&content)
    }

    /// Parses a snapshot from JSON text.
    ///
    /// Players without an `id` get their 1-based position in the file.
    /// Every season must carry exactly three stats.
    #[instrument(skip(content), fields(bytes = content.len()))]
    pub fn from_json(content: &str) -> Result<Self, SnapshotError> {
        let file: SnapshotFile = serde_json::from_str(content)
            .map_err(|e| SnapshotError::new(format!("Failed to parse snapshot: {}", e)))?;

        let mut subjects = Vec::with_capacity(file.players.len());
        for (index, player) in file.players.into_iter().enumerate() {
            let fallback_id = i64::try_from(index + 1).unwrap_or(i64::MAX);
            subjects.push(player.into_subject(fallback_id)?);
        }

        let snapshot = Self::from_parts(subjects, file.team_records);
        info!(
            subjects = snapshot.subjects.len(),
            team_records = snapshot.team_records.len(),
            "Snapshot loaded"
        );
        Ok(snapshot)
    }

    /// Builds a snapshot from already constructed subjects.
    pub fn from_subjects(subjects: Vec<Subject>) -> Self {
        Self::from_parts(subjects, Vec::new())
    }

    fn from_parts(subjects: Vec<Subject>, team_records: Vec<TeamRecordEntry>) -> Self {
        let record_index = team_records
            .iter()
            .map(|r| {
                let team = canonical_team(&r.team).unwrap_or_else(|| r.team.clone());
                ((r.season, team), r.record())
            })
            .collect();
        Self {
            subjects,
            team_records,
            record_index,
        }
    }

    /// Subjects in file order.
    pub fn subjects(&self) -> &[Subject] {
        &self.subjects
    }

    /// Subjects that have at least one stat line, in file order.
    pub fn eligible(&self) -> Vec<&Subject> {
        self.subjects
            .iter()
            .filter(|s| !s.stat_lines().is_empty())
            .collect()
    }

    /// Team records in file order.
    pub fn team_records(&self) -> &[TeamRecordEntry] {
        &self.team_records
    }

    /// The population as suggestion candidates.
    pub fn candidates(&self) -> Vec<Candidate> {
        self.subjects.iter().map(Subject::candidate).collect()
    }

    /// Looks a subject up by id.
    pub fn subject(&self, id: SubjectId) -> Option<&Subject> {
        self.subjects.iter().find(|s| *s.id() == id)
    }

    /// Number of subjects.
    pub fn len(&self) -> usize {
        self.subjects.len()
    }

    /// True when the snapshot holds no subjects.
    pub fn is_empty(&self) -> bool {
        self.subjects.is_empty()
    }
}

impl RecordBook for Snapshot {
    fn team_record(&self, season: i32, team: &str) -> Option<TeamRecord> {
        self.record_index.get(&(season, team.to_string())).copied()
    }
}

impl PlayerEntry {
    fn into_subject(self, fallback_id: i64) -> Result<Subject, SnapshotError> {
        let id = self.id.unwrap_or(fallback_id);
        let mut lines = Vec::with_capacity(self.seasons.len());
        for season in self.seasons {
            let count = season.stats.len();
            let metrics: [Metric; 3] = season
                .stats
                .into_iter()
                .map(|m| Metric::new(m.name, m.value))
                .collect::<Vec<_>>()
                .try_into()
                .map_err(|_| {
                    warn!(player = %self.full_name, season = season.season, count, "Bad stat count");
                    SnapshotError::new(format!(
                        "Player '{}' season {} has {} stats, expected 3",
                        self.full_name, season.season, count
                    ))
                })?;
            lines.push(StatLine::new(season.season, season.team, metrics));
        }
        Ok(Subject::new(
            SubjectId(id),
            self.full_name,
            self.player_slug,
            self.position,
            self.college,
            lines,
        ))
    }
}

/// Snapshot loading error.
#[derive(Debug, Clone, Display, Error)]
#[display("Snapshot error: {} at {}:{}", message, file, line)]
pub struct SnapshotError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl SnapshotError {
    /// Creates a new snapshot error with caller location tracking.
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}
