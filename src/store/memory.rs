//! In-memory store for offline use and tests.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use ball_knowledge_rules::{Candidate, RecordBook, Subject, SubjectId, TeamRecord};
use chrono::NaiveDate;
use tracing::{debug, info, instrument, warn};

use super::{DailyResult, GameStore, RecordOutcome, StoreError, Streak};

#[derive(Debug, Default)]
struct Tables {
    subjects: BTreeMap<SubjectId, Subject>,
    assignments: HashMap<NaiveDate, SubjectId>,
    results: HashMap<(NaiveDate, String), DailyResult>,
    records: HashMap<(i32, String), TeamRecord>,
    streaks: HashMap<String, Streak>,
}

/// Thread-safe store keeping every table in one mutex.
///
/// Check-and-insert happens under the lock, which gives the same
/// first-writer-wins behavior as a uniqueness constraint. Can be switched
/// unavailable to simulate a backend outage.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
    available: Arc<AtomicBool>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[instrument]
    pub fn new() -> Self {
        info!("Creating memory store");
        Self {
            tables: Arc::new(Mutex::new(Tables::default())),
            available: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Creates a store holding the given subjects.
    #[instrument(skip(subjects), fields(count = subjects.len()))]
    pub fn with_subjects(subjects: Vec<Subject>) -> Result<Self, StoreError> {
        let store = Self::new();
        for subject in subjects {
            store.insert_subject(subject)?;
        }
        Ok(store)
    }

    /// Adds or replaces a subject.
    #[instrument(skip(self, subject), fields(subject_id = %subject.id()))]
    pub fn insert_subject(&self, subject: Subject) -> Result<(), StoreError> {
        let mut tables = self.lock()?;
        tables.subjects.insert(*subject.id(), subject);
        Ok(())
    }

    /// Adds or replaces a team's season record.
    #[instrument(skip(self))]
    pub fn insert_team_record(
        &self,
        season: i32,
        team: &str,
        record: TeamRecord,
    ) -> Result<(), StoreError> {
        let mut tables = self.lock()?;
        tables.records.insert((season, team.to_string()), record);
        Ok(())
    }

    /// Makes every subsequent call fail (or succeed again).
    #[instrument(skip(self))]
    pub fn set_available(&self, available: bool) {
        info!(available, "Memory store availability changed");
        self.available.store(available, Ordering::SeqCst);
    }

    /// Number of assignment rows for `day` (zero or one).
    #[instrument(skip(self))]
    pub fn assignment_count(&self, day: NaiveDate) -> Result<usize, StoreError> {
        let tables = self.lock()?;
        Ok(usize::from(tables.assignments.contains_key(&day)))
    }

    fn lock(&self) -> Result<MutexGuard<'_, Tables>, StoreError> {
        if !self.available.load(Ordering::SeqCst) {
            return Err(StoreError::unavailable("Memory"));
        }
        Ok(self.tables.lock()?)
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordBook for MemoryStore {
    fn team_record(&self, season: i32, team: &str) -> Option<TeamRecord> {
        match self.lock() {
            Ok(tables) => tables.records.get(&(season, team.to_string())).copied(),
            Err(e) => {
                warn!(error = %e, season, team, "Team record lookup failed");
                None
            }
        }
    }
}

impl GameStore for MemoryStore {
    #[instrument(skip(self))]
    fn eligible_subject_ids(&self) -> Result<Vec<SubjectId>, StoreError> {
        let tables = self.lock()?;
        let ids: Vec<SubjectId> = tables
            .subjects
            .values()
            .filter(|s| !s.stat_lines().is_empty())
            .map(|s| *s.id())
            .collect();
        debug!(count = ids.len(), "Eligible subjects listed");
        Ok(ids)
    }

    #[instrument(skip(self))]
    fn load_subject(&self, id: SubjectId) -> Result<Option<Subject>, StoreError> {
        let tables = self.lock()?;
        Ok(tables.subjects.get(&id).map(|s| {
            let mut lines = s.stat_lines().clone();
            lines.sort_by_key(|l| *l.season());
            s.with_stat_lines(lines)
        }))
    }

    #[instrument(skip(self))]
    fn population(&self) -> Result<Vec<Candidate>, StoreError> {
        let tables = self.lock()?;
        Ok(tables.subjects.values().map(Subject::candidate).collect())
    }

    #[instrument(skip(self))]
    fn assignment_for(&self, day: NaiveDate) -> Result<Option<SubjectId>, StoreError> {
        let tables = self.lock()?;
        Ok(tables.assignments.get(&day).copied())
    }

    #[instrument(skip(self))]
    fn assign_if_absent(
        &self,
        day: NaiveDate,
        subject: SubjectId,
    ) -> Result<SubjectId, StoreError> {
        let mut tables = self.lock()?;
        let winner = *tables.assignments.entry(day).or_insert(subject);
        if winner != subject {
            debug!(%winner, "Day already assigned");
        }
        Ok(winner)
    }

    #[instrument(skip(self))]
    fn result_for(
        &self,
        day: NaiveDate,
        participant: &str,
    ) -> Result<Option<DailyResult>, StoreError> {
        let tables = self.lock()?;
        Ok(tables.results.get(&(day, participant.to_string())).cloned())
    }

    #[instrument(skip(self, result), fields(day = %result.day(), participant = %result.participant()))]
    fn record_result(&self, result: &DailyResult) -> Result<RecordOutcome, StoreError> {
        let mut tables = self.lock()?;
        let key = (*result.day(), result.participant().clone());
        if tables.results.contains_key(&key) {
            debug!("Result already recorded");
            return Ok(RecordOutcome::AlreadyRecorded);
        }
        tables.results.insert(key, result.clone());
        Ok(RecordOutcome::Recorded)
    }

    #[instrument(skip(self))]
    fn streak_for(&self, participant: &str) -> Result<Option<Streak>, StoreError> {
        let tables = self.lock()?;
        Ok(tables.streaks.get(participant).cloned())
    }

    #[instrument(skip(self))]
    fn advance_streak(&self, participant: &str, day: NaiveDate) -> Result<Streak, StoreError> {
        let mut tables = self.lock()?;
        let next = match tables.streaks.remove(participant) {
            Some(existing) => existing.advance(day),
            None => Streak::first(participant.to_string(), day),
        };
        tables.streaks.insert(participant.to_string(), next.clone());
        Ok(next)
    }
}
