//! Selection of the day's subject.

use std::sync::Arc;

use ball_knowledge_rules::{Subject, SubjectId};
use chrono::NaiveDate;
use derive_more::{Display, Error};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{SeedableRng, thread_rng};
use tracing::{debug, info, instrument, warn};

use crate::clock::day_ordinal;
use crate::snapshot::Snapshot;
use crate::store::{GameStore, StoreError};

/// Why a request fell back to the local snapshot.
#[derive(Debug, Clone, Display)]
pub enum DegradedReason {
    /// The store failed while reading or writing.
    #[display("backend failure: {}", _0)]
    Backend(StoreError),
    /// The day is assigned to an id the store cannot load.
    #[display("assigned subject {} is missing", _0)]
    MissingSubject(SubjectId),
}

/// Today's subject and how it was obtained.
#[derive(Debug, Clone)]
pub enum Selection {
    /// Read from (or written to) the store's daily assignment.
    Persisted(Subject),
    /// Seeded pick from the snapshot; no store is configured.
    Local(Subject),
    /// Seeded pick from the snapshot because the store failed.
    Degraded {
        /// The locally selected subject.
        subject: Subject,
        /// What went wrong with the store.
        reason: DegradedReason,
    },
}

impl Selection {
    /// The selected subject.
    pub fn subject(&self) -> &Subject {
        match self {
            Self::Persisted(s) | Self::Local(s) => s,
            Self::Degraded { subject, .. } => subject,
        }
    }

    /// Consumes the selection, returning the subject.
    pub fn into_subject(self) -> Subject {
        match self {
            Self::Persisted(s) | Self::Local(s) => s,
            Self::Degraded { subject, .. } => subject,
        }
    }

    /// True when the subject came from the store.
    pub fn is_persisted(&self) -> bool {
        matches!(self, Self::Persisted(_))
    }

    /// True when a store failure forced the local fallback.
    pub fn is_degraded(&self) -> bool {
        matches!(self, Self::Degraded { .. })
    }
}

/// Selection failures that make the game unplayable.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum SelectError {
    /// Neither the store nor the snapshot has a subject with stat lines.
    #[display("No eligible subjects to select from")]
    NoEligibleSubjects,
}

/// Picks the subject for a reference day.
#[derive(Debug, Clone)]
pub struct PuzzleSelector {
    store: Option<Arc<dyn GameStore>>,
    snapshot: Arc<Snapshot>,
}

impl PuzzleSelector {
    /// Creates a selector backed by `store` when present, else local only.
    pub fn new(snapshot: Arc<Snapshot>, store: Option<Arc<dyn GameStore>>) -> Self {
        Self { store, snapshot }
    }

    /// Creates a selector that only uses the snapshot.
    pub fn local(snapshot: Arc<Snapshot>) -> Self {
        Self::new(snapshot, None)
    }

    /// The local snapshot.
    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    /// Returns the subject for `day`.
    ///
    /// With a store, the day's assignment is read or created; store failures
    /// fall back to the seeded local pick. An empty store is fatal.
    #[instrument(skip(self))]
    pub fn select(&self, day: NaiveDate) -> Result<Selection, SelectError> {
        let Some(store) = &self.store else {
            debug!("No store configured, selecting locally");
            return self.select_local(day).map(Selection::Local);
        };

        match self.select_persisted(store.as_ref(), day) {
            Ok(Some(subject)) => Ok(Selection::Persisted(subject)),
            Ok(None) => Err(SelectError::NoEligibleSubjects),
            Err(reason) => {
                warn!(%reason, %day, "Store unavailable, degrading to local selection");
                let subject = self.select_local(day)?;
                Ok(Selection::Degraded { subject, reason })
            }
        }
    }

    /// Seeded pick over the snapshot; stat lines get a fresh unseeded shuffle.
    #[instrument(skip(self))]
    fn select_local(&self, day: NaiveDate) -> Result<Subject, SelectError> {
        let eligible = self.snapshot.eligible();
        let mut rng = StdRng::seed_from_u64(day_ordinal(day).unsigned_abs());
        let chosen = eligible
            .choose(&mut rng)
            .ok_or(SelectError::NoEligibleSubjects)?;

        let mut lines = chosen.stat_lines().clone();
        lines.shuffle(&mut thread_rng());

        info!(subject_id = %chosen.id(), "Local subject selected");
        Ok(chosen.with_stat_lines(lines))
    }

    /// Reads or claims the day's assignment. `Ok(None)` means the store has
    /// nothing eligible.
    #[instrument(skip(self, store))]
    fn select_persisted(
        &self,
        store: &dyn GameStore,
        day: NaiveDate,
    ) -> Result<Option<Subject>, DegradedReason> {
        let assigned = match store.assignment_for(day).map_err(DegradedReason::Backend)? {
            Some(id) => {
                debug!(subject_id = %id, "Existing assignment found");
                id
            }
            None => {
                let eligible = store
                    .eligible_subject_ids()
                    .map_err(DegradedReason::Backend)?;
                let Some(pick) = eligible.choose(&mut thread_rng()).copied() else {
                    warn!("Store has no eligible subjects");
                    return Ok(None);
                };
                let winner = store
                    .assign_if_absent(day, pick)
                    .map_err(DegradedReason::Backend)?;
                if winner != pick {
                    info!(%pick, %winner, "Lost the assignment race, adopting winner");
                }
                winner
            }
        };

        let subject = store
            .load_subject(assigned)
            .map_err(DegradedReason::Backend)?
            .ok_or(DegradedReason::MissingSubject(assigned))?;

        let mut lines = subject.stat_lines().clone();
        lines.shuffle(&mut StdRng::seed_from_u64(assignment_seed(day, assigned)));

        info!(subject_id = %assigned, "Persisted subject selected");
        Ok(Some(subject.with_stat_lines(lines)))
    }
}

/// Seed for the per-assignment stat-line order.
fn assignment_seed(day: NaiveDate, id: SubjectId) -> u64 {
    day_ordinal(day)
        .unsigned_abs()
        .wrapping_mul(0x9E37_79B9_7F4A_7C15)
        ^ id.0.unsigned_abs()
}
