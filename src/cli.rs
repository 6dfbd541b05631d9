//! Command-line interface for ball_knowledge.

use std::path::PathBuf;

use ball_knowledge::GameMode;
use clap::{Parser, Subcommand};

/// Ball Knowledge - guess the player from their season lines
#[derive(Parser, Debug)]
#[command(name = "ball_knowledge")]
#[command(about = "Daily player guessing game", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to a TOML config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// SQLite database path (overrides config and environment)
    #[arg(long, global = true)]
    pub db: Option<String>,

    /// Player snapshot JSON (overrides config and environment)
    #[arg(long, global = true)]
    pub snapshot: Option<PathBuf>,

    /// Participant name
    #[arg(short, long, global = true, default_value = "guest")]
    pub participant: String,

    /// Directory for per-participant session files
    #[arg(long, global = true, default_value = ".ball_knowledge")]
    pub state_dir: PathBuf,

    /// Game mode (daily or timed), selects the suggestion threshold
    #[arg(long, global = true, default_value = "daily")]
    pub mode: GameMode,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create the database and apply migrations
    Migrate,

    /// Load the snapshot's players and team records into the database
    Seed,

    /// Show today's puzzle
    Today,

    /// Show the participant's progress, hints and streak
    Status,

    /// Submit a guess
    Guess {
        /// Guessed player name
        text: String,

        /// The guess was picked from the offered suggestions
        #[arg(long)]
        suggestion: bool,
    },

    /// Buy a hint (team, division, conference, record, college, first_name, last_name)
    Hint {
        /// Hint kind
        kind: String,
    },

    /// Show and clear pending suggestions
    Suggestions,

    /// Annotate today's session as having left the tab
    LeftTab,
}
