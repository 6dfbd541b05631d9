//! SQLite persistence for subjects, assignments, results and streaks.

// Private module declarations
mod models;
mod repository;
mod schema; // Diesel schema - internal use only

use models::{
    AssignmentRow, NewResultRow, ResultRow, StatLineRow, StreakRow, SubjectRow, TeamRecordRow,
};

// Crate-level exports
pub use repository::{MIGRATIONS, SqliteStore};
