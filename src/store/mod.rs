//! Persistence collaborator contract and the in-memory implementation.

mod error;
mod memory;
mod models;

pub use error::StoreError;
pub use memory::MemoryStore;
pub use models::{DailyResult, RecordOutcome, Streak};

use ball_knowledge_rules::{Candidate, RecordBook, Subject, SubjectId};
use chrono::NaiveDate;

/// Everything the engine reads from or writes to durable storage.
///
/// Uniqueness of the daily assignment and of results per (day, participant)
/// is the store's job; callers never lock.
pub trait GameStore: RecordBook + Send + Sync + std::fmt::Debug {
    /// Ids of subjects with at least one stat line, in ascending order.
    fn eligible_subject_ids(&self) -> Result<Vec<SubjectId>, StoreError>;

    /// Loads a subject with its stat lines ordered by season.
    fn load_subject(&self, id: SubjectId) -> Result<Option<Subject>, StoreError>;

    /// Every subject as a suggestion candidate.
    fn population(&self) -> Result<Vec<Candidate>, StoreError>;

    /// Subject assigned to `day`, if any.
    fn assignment_for(&self, day: NaiveDate) -> Result<Option<SubjectId>, StoreError>;

    /// Assigns `subject` to `day` unless the day is already taken.
    ///
    /// Returns the id that holds the day afterwards: `subject` if this call
    /// won, the earlier winner otherwise.
    fn assign_if_absent(&self, day: NaiveDate, subject: SubjectId)
    -> Result<SubjectId, StoreError>;

    /// Recorded result for (day, participant), if any.
    fn result_for(&self, day: NaiveDate, participant: &str)
    -> Result<Option<DailyResult>, StoreError>;

    /// Writes a result unless one already exists for (day, participant).
    fn record_result(&self, result: &DailyResult) -> Result<RecordOutcome, StoreError>;

    /// Current streak of a participant, if they ever solved a day.
    fn streak_for(&self, participant: &str) -> Result<Option<Streak>, StoreError>;

    /// Extends (or starts) the participant's streak with a solve on `day`.
    fn advance_streak(&self, participant: &str, day: NaiveDate) -> Result<Streak, StoreError>;
}
