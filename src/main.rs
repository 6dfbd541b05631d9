//! Ball Knowledge - command-line session layer
//!
//! Each invocation is one request: it computes the reference day, selects
//! the subject, loads the participant's state, applies one operation and
//! saves the state back.

#![warn(missing_docs)]

mod cli;

use std::sync::Arc;

use anyhow::{Context, Result, bail};
use ball_knowledge::{
    GameConfig, GameProgression, GameState, GameStore, GuessMatcher, GuessOrigin, GuessOutcome,
    HintPurchase, Persistence, Phase, ProgressError, PuzzleSelector, RecordBook, ReferenceClock,
    Round, Selection, SessionFiles, Snapshot, SqliteStore, StatLine, SuggestionPool,
};
use ball_knowledge_rules::canonical_team;
use chrono::NaiveDate;
use clap::Parser;
use cli::{Cli, Command};
use tracing::{info, instrument, warn};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,ball_knowledge=debug")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = load_config(&cli)?;

    match &cli.command {
        Command::Migrate => run_migrate(&config),
        Command::Seed => run_seed(&config),
        Command::Today => DailyGame::open(&cli, config)?.today(),
        Command::Status => DailyGame::open(&cli, config)?.status(),
        Command::Guess { text, suggestion } => {
            DailyGame::open(&cli, config)?.guess(text, *suggestion)
        }
        Command::Hint { kind } => DailyGame::open(&cli, config)?.hint(kind),
        Command::Suggestions => DailyGame::open(&cli, config)?.suggestions(),
        Command::LeftTab => DailyGame::open(&cli, config)?.left_tab(),
    }
}

/// Config file (or defaults), then environment, then command-line flags.
#[instrument(skip(cli))]
fn load_config(cli: &Cli) -> Result<GameConfig> {
    let config = match &cli.config {
        Some(path) => GameConfig::from_file(path)?,
        None => GameConfig::default(),
    };
    let mut config = config.with_env_overrides(|key| std::env::var(key).ok())?;
    if let Some(db) = &cli.db {
        config = config.with_database_path(Some(db.clone()));
    }
    if let Some(snapshot) = &cli.snapshot {
        config = config.with_snapshot_path(snapshot.clone());
    }
    Ok(config)
}

fn require_database(config: &GameConfig) -> Result<SqliteStore> {
    let Some(path) = config.database_path() else {
        bail!("No database configured; pass --db or set BALL_KNOWLEDGE_DB");
    };
    Ok(SqliteStore::open(path.as_str())?)
}

/// Create the database and apply migrations
#[instrument(skip(config))]
fn run_migrate(config: &GameConfig) -> Result<()> {
    let store = require_database(config)?;
    println!("Database ready at {}", store.db_path());
    Ok(())
}

/// Copy the snapshot into the database
#[instrument(skip(config))]
fn run_seed(config: &GameConfig) -> Result<()> {
    let store = require_database(config)?;
    let snapshot = Snapshot::from_file(config.snapshot_path())
        .with_context(|| format!("loading {}", config.snapshot_path().display()))?;

    for subject in snapshot.subjects() {
        store.upsert_subject(subject)?;
    }
    for entry in snapshot.team_records() {
        let team = canonical_team(entry.team()).unwrap_or_else(|| entry.team().clone());
        store.upsert_team_record(*entry.season(), &team, entry.record())?;
    }

    info!(
        subjects = snapshot.len(),
        team_records = snapshot.team_records().len(),
        "Seed complete"
    );
    println!(
        "Seeded {} players and {} team records",
        snapshot.len(),
        snapshot.team_records().len()
    );
    Ok(())
}

/// Everything one request needs.
struct DailyGame {
    participant: String,
    day: NaiveDate,
    snapshot: Arc<Snapshot>,
    sqlite: Option<SqliteStore>,
    selector: PuzzleSelector,
    engine: GameProgression,
    sessions: SessionFiles,
}

impl DailyGame {
    #[instrument(skip(cli, config), fields(participant = %cli.participant))]
    fn open(cli: &Cli, config: GameConfig) -> Result<Self> {
        let snapshot = Arc::new(
            Snapshot::from_file(config.snapshot_path())
                .with_context(|| format!("loading {}", config.snapshot_path().display()))?,
        );

        let sqlite = match config.database_path() {
            Some(path) => match SqliteStore::open(path.as_str()) {
                Ok(store) => Some(store),
                Err(e) => {
                    warn!(error = %e, "Database unavailable, running locally");
                    None
                }
            },
            None => {
                info!("No database configured, running locally");
                None
            }
        };
        let store: Option<Arc<dyn GameStore>> = sqlite
            .clone()
            .map(|s| Arc::new(s) as Arc<dyn GameStore>);

        let day = ReferenceClock::new(config.reference_zone()?).today();
        let matcher = GuessMatcher::new(config.match_settings(cli.mode));

        Ok(Self {
            participant: cli.participant.clone(),
            day,
            selector: PuzzleSelector::new(Arc::clone(&snapshot), store.clone()),
            engine: GameProgression::new(matcher, store),
            snapshot,
            sqlite,
            sessions: SessionFiles::new(cli.state_dir.clone()),
        })
    }

    fn records(&self) -> &dyn RecordBook {
        match &self.sqlite {
            Some(store) => store as &dyn RecordBook,
            None => self.snapshot.as_ref() as &dyn RecordBook,
        }
    }

    fn store(&self) -> Option<&dyn GameStore> {
        self.sqlite.as_ref().map(|s| s as &dyn GameStore)
    }

    /// Selects the subject and brings the saved state onto today.
    fn begin(&self) -> Result<(Round, GameState, Selection)> {
        let selection = self.selector.select(self.day)?;
        let round = Round::new(
            self.day,
            self.participant.clone(),
            selection.subject().clone(),
        );
        let saved = self.sessions.load(&self.participant)?;
        let state = self.engine.start_day(&round, saved);
        Ok((round, state, selection))
    }

    fn save(&self, state: &GameState) -> Result<()> {
        self.sessions.save(&self.participant, state)?;
        Ok(())
    }

    fn today(&self) -> Result<()> {
        let (round, state, selection) = self.begin()?;
        let mode = match &selection {
            Selection::Persisted(_) => "persisted".to_string(),
            Selection::Local(_) => "local".to_string(),
            Selection::Degraded { reason, .. } => format!("degraded ({reason})"),
        };
        println!("Puzzle for {} [{}]", self.day, mode);
        println!("Position: {}", round.subject().position());
        print_lines(self.engine.visible_lines(&round, &state));
        print_phase(&state);
        self.save(&state)
    }

    fn status(&self) -> Result<()> {
        let (round, state, _) = self.begin()?;
        println!("{} on {}", self.participant, self.day);
        print_lines(self.engine.visible_lines(&round, &state));

        for line in self.engine.hint_board(&round, &state, self.records()) {
            for entry in line.entries() {
                let value = entry.value().as_deref().unwrap_or("unknown");
                let marker = if *entry.covered() { " (included)" } else { "" };
                println!(
                    "  line {} {}: {}{}",
                    line.index() + 1,
                    entry.kind(),
                    value,
                    marker
                );
            }
        }

        let available: Vec<String> = self
            .engine
            .available_hints(&round, &state)
            .into_iter()
            .map(|k| format!("{} (-{})", k, k.cost()))
            .collect();
        if !available.is_empty() {
            println!("Hints available: {}", available.join(", "));
        }
        print_phase(&state);

        if let Some(store) = self.store() {
            match store.streak_for(&self.participant) {
                Ok(Some(streak)) => println!(
                    "Streak: {} (best {})",
                    streak.current(),
                    streak.best()
                ),
                Ok(None) => {}
                Err(e) => warn!(error = %e, "Streak lookup failed"),
            }
        }
        self.save(&state)
    }

    fn guess(&self, text: &str, from_suggestion: bool) -> Result<()> {
        let (round, state, _) = self.begin()?;
        let origin = if from_suggestion {
            GuessOrigin::Suggestion
        } else {
            GuessOrigin::Typed
        };

        let mut pool = SuggestionPool::new();
        let population = pool.get_or_build(self.store(), &self.snapshot);

        let step = match self
            .engine
            .submit_guess(&round, &state, text, origin, &population)
        {
            Ok(step) => step,
            Err(ProgressError::AlreadyCompleted) => {
                println!("You already finished today's puzzle.");
                return self.save(&state);
            }
            Err(e) => return Err(e.into()),
        };

        let (state, outcome) = step.into_parts();
        match outcome {
            GuessOutcome::Solved {
                score,
                persistence,
                streak,
            } => {
                println!("Correct! It was {}. Score: {}", round.subject().full_name(), score);
                if persistence == Persistence::Failed {
                    println!("(result could not be saved)");
                }
                if let Some(streak) = streak {
                    println!("Streak: {} (best {})", streak.current(), streak.best());
                }
            }
            GuessOutcome::Suggested { suggestions } => {
                println!("Not quite. Did you mean:");
                for name in &suggestions {
                    println!("  {name}");
                }
                println!("(this attempt was free; rerun with --suggestion to pick one)");
            }
            GuessOutcome::Revealed {
                revealed,
                suggestions,
            } => {
                println!("Nope! Lines revealed: {revealed}");
                print_lines(self.engine.visible_lines(&round, &state));
                if !suggestions.is_empty() {
                    println!("Similar names: {}", suggestions.join(", "));
                }
            }
        }
        // Suggestions printed above count as shown.
        let (state, _) = self.engine.take_suggestions(&state).into_parts();
        self.save(&state)
    }

    fn hint(&self, kind: &str) -> Result<()> {
        let (round, state, _) = self.begin()?;
        let (state, purchase) = self.engine.purchase_hint(&round, &state, kind)?.into_parts();
        match purchase {
            HintPurchase::Purchased { kind, cost } => {
                println!("Bought {kind} for {cost} points.");
            }
            HintPurchase::AlreadyOwned(kind) => println!("You already have {kind}."),
            HintPurchase::Covered { kind, by } => println!("{kind} is included with {by}."),
        }
        let last = self
            .engine
            .visible_lines(&round, &state)
            .len()
            .saturating_sub(1);
        let values = self.engine.line_hints(&round, &state, last, self.records())?;
        for owned in state.hints().iter() {
            let value = values.value_for(owned).unwrap_or_else(|| "unknown".to_string());
            println!("  {owned}: {value}");
        }
        println!("Score now: {}", self.engine.live_score(&state));
        self.save(&state)
    }

    fn suggestions(&self) -> Result<()> {
        let (_, state, _) = self.begin()?;
        let (state, names) = self.engine.take_suggestions(&state).into_parts();
        if names.is_empty() {
            println!("No pending suggestions.");
        }
        for name in names {
            println!("  {name}");
        }
        self.save(&state)
    }

    fn left_tab(&self) -> Result<()> {
        let (_, state, _) = self.begin()?;
        let state = self.engine.mark_left_tab(&state);
        self.save(&state)
    }
}

fn print_lines(lines: &[StatLine]) {
    for line in lines {
        let metrics: Vec<String> = line
            .metrics()
            .iter()
            .map(|m| format!("{} {}", m.name(), m.display_value()))
            .collect();
        println!("  {}  {:<4} {}", line.season(), line.team(), metrics.join(" | "));
    }
}

fn print_phase(state: &GameState) {
    match state.phase() {
        Phase::Solved { score } => println!("Solved! Final score: {score}"),
        _ => println!("Score if solved now: {}", state.live_score()),
    }
}
