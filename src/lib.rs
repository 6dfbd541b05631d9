//! Ball Knowledge library - daily player guessing engine
//!
//! A hidden player is revealed one season line at a time. Participants
//! guess, buy hints, and score points for solving with fewer reveals.
//!
//! # Architecture
//!
//! - **Selector**: picks the day's player, persisted or seeded from a snapshot
//! - **Progression**: per-participant reveal/hint/guess state machine
//! - **Store**: persistence contract with SQLite and in-memory backends
//! - **Rules**: scoring, matching and hint resolution (`ball_knowledge_rules`)
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use ball_knowledge::{
//!     GameConfig, GameMode, GameProgression, GameState, GuessMatcher, GuessOrigin,
//!     PuzzleSelector, ReferenceClock, Round, Snapshot,
//! };
//!
//! # fn example() -> anyhow::Result<()> {
//! let config = GameConfig::default();
//! let snapshot = Arc::new(Snapshot::from_file(config.snapshot_path())?);
//! let day = ReferenceClock::new(config.reference_zone()?).today();
//!
//! let subject = PuzzleSelector::local(Arc::clone(&snapshot))
//!     .select(day)?
//!     .into_subject();
//! let round = Round::new(day, "alice".to_string(), subject);
//!
//! let engine = GameProgression::local(GuessMatcher::new(config.match_settings(GameMode::Daily)));
//! let state = engine.start_day(&round, GameState::new());
//! let step = engine.submit_guess(&round, &state, "Tom Brady", GuessOrigin::Typed, &snapshot.candidates())?;
//! println!("score: {}", engine.live_score(step.state()));
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod clock;
mod config;
mod db;
mod progression;
mod selector;
mod session;
mod snapshot;
mod store;
mod suggestions;

// Crate-level exports - Configuration
pub use config::{ConfigError, DB_ENV, GameConfig, GameMode, SNAPSHOT_ENV, TIMEZONE_ENV};

// Crate-level exports - Reference day
pub use clock::{ReferenceClock, day_ordinal};

// Crate-level exports - Persistence
pub use db::{MIGRATIONS, SqliteStore};
pub use store::{DailyResult, GameStore, MemoryStore, RecordOutcome, StoreError, Streak};

// Crate-level exports - Local population
pub use snapshot::{Snapshot, SnapshotError, TeamRecordEntry};
pub use suggestions::{PoolSource, SuggestionPool};

// Crate-level exports - Selection
pub use selector::{DegradedReason, PuzzleSelector, SelectError, Selection};

// Crate-level exports - Progression
pub use progression::{
    BoardLine, GameProgression, GameState, GuessOrigin, GuessOutcome, HintEntry, HintPurchase,
    Persistence, Phase, ProgressError, Round, Transition,
};

// Crate-level exports - Sessions
pub use session::{SessionError, SessionFiles};

// Crate-level exports - Rules
pub use ball_knowledge_rules::{
    Candidate, GuessMatcher, HintKind, HintSet, HintValues, MatchSettings, Metric, NoRecords,
    RecordBook, StatLine, Subject, SubjectId, TeamRecord,
};
