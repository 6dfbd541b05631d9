//! Per-participant daily game progression.

mod engine;
mod error;
mod state;

pub use engine::GameProgression;
pub use error::ProgressError;
pub use state::{
    BoardLine, GameState, GuessOrigin, GuessOutcome, HintEntry, HintPurchase, Persistence, Phase,
    Round, Transition,
};
