//! Ball Knowledge rules - pure puzzle logic
//!
//! Everything in this crate is deterministic and free of I/O so it can be
//! called concurrently from any request handler.
//!
//! # Architecture
//!
//! - **Subject**: the hidden player record and its stat lines
//! - **Scoring**: hint catalogue and the score function
//! - **Matcher**: guess normalization, acceptance and suggestion ranking
//! - **Hints**: derived hint values from team tables and a record book

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod hints;
mod matcher;
mod scoring;
mod subject;
mod teams;

pub use hints::{HintResolver, HintValues, NoRecords, RecordBook, TeamRecord, split_name};
pub use matcher::{
    GuessMatcher, MatchSettings, ScoredCandidate, TYPO_THRESHOLD, is_generational_suffix,
    is_match, normalize_name, ratio, short_key, token_set_ratio,
};
pub use scoring::{
    HintKind, HintSet, MAX_REVEALS, PENALTY_PER_REVEAL, START_SCORE, score, score_from_labels,
};
pub use subject::{Candidate, Metric, StatLine, Subject, SubjectId};
pub use teams::{Conference, Division, alignment, canonical_team};
