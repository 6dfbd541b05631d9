//! SQLite implementation of the persistence collaborator.

use ball_knowledge_rules::{Candidate, RecordBook, Subject, SubjectId, TeamRecord};
use chrono::{NaiveDate, Utc};
use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::{debug, info, instrument, warn};

use crate::db::{
    AssignmentRow, NewResultRow, ResultRow, StatLineRow, StreakRow, SubjectRow, TeamRecordRow,
    schema,
};
use crate::store::{DailyResult, GameStore, RecordOutcome, StoreError, Streak};

/// Migrations compiled into the binary and applied on [`SqliteStore::open`].
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Milliseconds a connection waits on a locked database before failing.
const BUSY_TIMEOUT_MS: u32 = 5_000;

/// Store backed by an SQLite file, one connection per operation.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    db_path: String,
}

impl SqliteStore {
    /// Opens the database at `db_path`, creating it and applying pending
    /// migrations as needed.
    ///
    /// Every operation opens its own connection, so `":memory:"` would lose
    /// its tables between calls; use a file (a temp file in tests).
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the database cannot be opened or migrated.
    #[instrument(skip(db_path))]
    pub fn open(db_path: impl Into<String>) -> Result<Self, StoreError> {
        let db_path = db_path.into();
        info!(path = %db_path, "Opening SqliteStore");
        let store = Self { db_path };

        let mut conn = store.connection()?;
        let applied = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|e| StoreError::new(format!("Migrations failed: {}", e)))?;
        info!(applied = applied.len(), "Migrations applied");

        Ok(store)
    }

    /// Path of the database file.
    pub fn db_path(&self) -> &str {
        &self.db_path
    }

    /// Establishes a database connection.
    #[instrument(skip(self))]
    fn connection(&self) -> Result<SqliteConnection, StoreError> {
        debug!(path = %self.db_path, "Establishing connection");
        let mut conn = SqliteConnection::establish(&self.db_path).map_err(|e| {
            StoreError::new(format!("Failed to connect to '{}': {}", self.db_path, e))
        })?;
        conn.batch_execute(&format!("PRAGMA busy_timeout = {BUSY_TIMEOUT_MS};"))?;
        Ok(conn)
    }

    /// Inserts or replaces a subject together with all of its stat lines.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if a database error occurs.
    #[instrument(skip(self, subject), fields(subject_id = %subject.id()))]
    pub fn upsert_subject(&self, subject: &Subject) -> Result<(), StoreError> {
        let mut conn = self.connection()?;
        let row = SubjectRow::from_subject(subject);
        let lines: Vec<StatLineRow> = subject
            .stat_lines()
            .iter()
            .map(|l| StatLineRow::from_stat_line(*subject.id(), l))
            .collect();

        conn.immediate_transaction::<_, StoreError, _>(|conn| {
            diesel::replace_into(schema::subjects::table)
                .values(&row)
                .execute(conn)?;
            diesel::delete(
                schema::stat_lines::table.filter(schema::stat_lines::subject_id.eq(row.id())),
            )
            .execute(conn)?;
            if !lines.is_empty() {
                diesel::insert_into(schema::stat_lines::table)
                    .values(&lines)
                    .execute(conn)?;
            }
            Ok(())
        })?;

        info!(lines = lines.len(), "Subject stored");
        Ok(())
    }

    /// Inserts or replaces a team's season record.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn upsert_team_record(
        &self,
        season: i32,
        team: &str,
        record: TeamRecord,
    ) -> Result<(), StoreError> {
        let mut conn = self.connection()?;
        let count = |n: u32| i32::try_from(n).unwrap_or(i32::MAX);
        let row = TeamRecordRow::new(
            season,
            team.to_string(),
            count(*record.wins()),
            count(*record.losses()),
            count(*record.ties()),
        );
        diesel::replace_into(schema::team_period_record::table)
            .values(&row)
            .execute(&mut conn)?;
        debug!("Team record stored");
        Ok(())
    }

    /// Number of assignment rows stored for `day`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn assignment_count(&self, day: NaiveDate) -> Result<i64, StoreError> {
        let mut conn = self.connection()?;
        let count = schema::daily_assignment::table
            .filter(schema::daily_assignment::day.eq(day))
            .count()
            .get_result(&mut conn)?;
        Ok(count)
    }
}

impl RecordBook for SqliteStore {
    fn team_record(&self, season: i32, team: &str) -> Option<TeamRecord> {
        let lookup = || -> Result<Option<TeamRecord>, StoreError> {
            let mut conn = self.connection()?;
            let row = schema::team_period_record::table
                .filter(schema::team_period_record::season.eq(season))
                .filter(schema::team_period_record::team.eq(team))
                .select(TeamRecordRow::as_select())
                .first(&mut conn)
                .optional()?;
            Ok(row.map(TeamRecordRow::into_record))
        };
        lookup().unwrap_or_else(|e| {
            warn!(error = %e, season, team, "Team record lookup failed");
            None
        })
    }
}

impl GameStore for SqliteStore {
    #[instrument(skip(self))]
    fn eligible_subject_ids(&self) -> Result<Vec<SubjectId>, StoreError> {
        let mut conn = self.connection()?;
        let ids = schema::stat_lines::table
            .select(schema::stat_lines::subject_id)
            .distinct()
            .order(schema::stat_lines::subject_id.asc())
            .load::<i64>(&mut conn)?;
        debug!(count = ids.len(), "Eligible subjects listed");
        Ok(ids.into_iter().map(SubjectId).collect())
    }

    #[instrument(skip(self))]
    fn load_subject(&self, id: SubjectId) -> Result<Option<Subject>, StoreError> {
        let mut conn = self.connection()?;
        let Some(row) = schema::subjects::table
            .find(id.0)
            .select(SubjectRow::as_select())
            .first(&mut conn)
            .optional()?
        else {
            debug!("Subject not found");
            return Ok(None);
        };

        let lines = StatLineRow::belonging_to(&row)
            .select(StatLineRow::as_select())
            .order(schema::stat_lines::season.asc())
            .load(&mut conn)?;

        debug!(lines = lines.len(), "Subject loaded");
        Ok(Some(row.into_subject(lines)))
    }

    #[instrument(skip(self))]
    fn population(&self) -> Result<Vec<Candidate>, StoreError> {
        let mut conn = self.connection()?;
        let rows = schema::subjects::table
            .select((schema::subjects::full_name, schema::subjects::position))
            .order(schema::subjects::id.asc())
            .load::<(String, String)>(&mut conn)?;
        info!(count = rows.len(), "Population loaded");
        Ok(rows
            .into_iter()
            .map(|(name, position)| Candidate::new(name, position))
            .collect())
    }

    #[instrument(skip(self))]
    fn assignment_for(&self, day: NaiveDate) -> Result<Option<SubjectId>, StoreError> {
        let mut conn = self.connection()?;
        let id = schema::daily_assignment::table
            .find(day)
            .select(schema::daily_assignment::subject_id)
            .first::<i64>(&mut conn)
            .optional()?;
        Ok(id.map(SubjectId))
    }

    #[instrument(skip(self))]
    fn assign_if_absent(
        &self,
        day: NaiveDate,
        subject: SubjectId,
    ) -> Result<SubjectId, StoreError> {
        let mut conn = self.connection()?;

        let inserted = diesel::insert_into(schema::daily_assignment::table)
            .values(&AssignmentRow::new(day, subject.0))
            .on_conflict_do_nothing()
            .execute(&mut conn)?;

        let winner = schema::daily_assignment::table
            .find(day)
            .select(schema::daily_assignment::subject_id)
            .first::<i64>(&mut conn)?;

        if inserted == 0 {
            debug!(winner, "Day already assigned by another request");
        } else {
            info!(%day, subject_id = %subject, "Daily assignment written");
        }
        Ok(SubjectId(winner))
    }

    #[instrument(skip(self))]
    fn result_for(
        &self,
        day: NaiveDate,
        participant: &str,
    ) -> Result<Option<DailyResult>, StoreError> {
        let mut conn = self.connection()?;
        let row = schema::results::table
            .filter(schema::results::day.eq(day))
            .filter(schema::results::participant.eq(participant))
            .select(ResultRow::as_select())
            .first(&mut conn)
            .optional()?;
        row.map(ResultRow::into_result).transpose()
    }

    #[instrument(skip(self, result), fields(day = %result.day(), participant = %result.participant()))]
    fn record_result(&self, result: &DailyResult) -> Result<RecordOutcome, StoreError> {
        let mut conn = self.connection()?;
        let inserted = diesel::insert_into(schema::results::table)
            .values(&NewResultRow::from_result(result))
            .on_conflict_do_nothing()
            .execute(&mut conn)?;

        if inserted == 0 {
            debug!("Result already recorded");
            Ok(RecordOutcome::AlreadyRecorded)
        } else {
            info!(score = result.score(), "Result recorded");
            Ok(RecordOutcome::Recorded)
        }
    }

    #[instrument(skip(self))]
    fn streak_for(&self, participant: &str) -> Result<Option<Streak>, StoreError> {
        let mut conn = self.connection()?;
        let row = schema::streaks::table
            .find(participant)
            .select(StreakRow::as_select())
            .first(&mut conn)
            .optional()?;
        Ok(row.map(StreakRow::into_streak))
    }

    #[instrument(skip(self))]
    fn advance_streak(&self, participant: &str, day: NaiveDate) -> Result<Streak, StoreError> {
        let mut conn = self.connection()?;
        let streak = conn.immediate_transaction::<_, StoreError, _>(|conn| {
            let existing = schema::streaks::table
                .find(participant)
                .select(StreakRow::as_select())
                .first(conn)
                .optional()?;

            let next = match existing {
                Some(row) => row.into_streak().advance(day),
                None => Streak::first(participant.to_string(), day),
            };

            let row = StreakRow::from_streak(&next, Utc::now().naive_utc());
            diesel::insert_into(schema::streaks::table)
                .values(&row)
                .on_conflict(schema::streaks::participant)
                .do_update()
                .set(&row)
                .execute(conn)?;
            Ok(next)
        })?;

        info!(current = streak.current(), best = streak.best(), "Streak advanced");
        Ok(streak)
    }
}
