//! File-backed participant sessions for the command-line front end.

use std::path::{Path, PathBuf};

use derive_more::{Display, Error};
use tracing::{debug, info, instrument};

use crate::progression::GameState;

/// Keeps one JSON file of [`GameState`] per participant.
#[derive(Debug, Clone)]
pub struct SessionFiles {
    dir: PathBuf,
}

impl SessionFiles {
    /// Sessions stored under `dir` (created on first save).
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory holding the session files.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Loads a participant's state; a missing file yields a fresh state.
    #[instrument(skip(self))]
    pub fn load(&self, participant: &str) -> Result<GameState, SessionError> {
        let path = self.path_for(participant)?;
        if !path.exists() {
            debug!(path = %path.display(), "No session yet");
            return Ok(GameState::new());
        }
        let content = std::fs::read_to_string(&path)
            .map_err(|e| SessionError::new(format!("Failed to read session: {}", e)))?;
        serde_json::from_str(&content)
            .map_err(|e| SessionError::new(format!("Corrupt session file: {}", e)))
    }

    /// Writes a participant's state.
    #[instrument(skip(self, state))]
    pub fn save(&self, participant: &str, state: &GameState) -> Result<(), SessionError> {
        let path = self.path_for(participant)?;
        std::fs::create_dir_all(&self.dir)
            .map_err(|e| SessionError::new(format!("Failed to create session dir: {}", e)))?;
        let content = serde_json::to_string_pretty(state)
            .map_err(|e| SessionError::new(format!("Failed to encode session: {}", e)))?;
        std::fs::write(&path, content)
            .map_err(|e| SessionError::new(format!("Failed to write session: {}", e)))?;
        info!(path = %path.display(), "Session saved");
        Ok(())
    }

    fn path_for(&self, participant: &str) -> Result<PathBuf, SessionError> {
        let name = participant.trim();
        let valid = !name.is_empty()
            && name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(SessionError::new(format!(
                "Participant name '{}' must be letters, digits, '-' or '_'",
                participant
            )));
        }
        Ok(self.dir.join(format!("{name}.json")))
    }
}

/// Session file error.
#[derive(Debug, Clone, Display, Error)]
#[display("Session error: {} at {}:{}", message, file, line)]
pub struct SessionError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl SessionError {
    /// Creates a new session error with caller location tracking.
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
