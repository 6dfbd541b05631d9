//! Database row models and their conversion to domain types.

use ball_knowledge_rules::{HintSet, Metric, StatLine, Subject, SubjectId, TeamRecord};
use chrono::{NaiveDate, NaiveDateTime};
use derive_getters::Getters;
use derive_new::new;
use diesel::prelude::*;
use tracing::instrument;

use crate::db::schema;
use crate::store::{DailyResult, StoreError, Streak};

/// Subject row.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable, Insertable, Getters)]
#[diesel(table_name = schema::subjects)]
pub struct SubjectRow {
    id: i64,
    full_name: String,
    slug: String,
    position: String,
    college: Option<String>,
}

impl SubjectRow {
    /// Builds a row from a domain subject (stat lines are stored separately).
    #[instrument(skip(subject), fields(subject_id = %subject.id()))]
    pub fn from_subject(subject: &Subject) -> Self {
        Self {
            id: subject.id().0,
            full_name: subject.full_name().clone(),
            slug: subject.slug().clone(),
            position: subject.position().clone(),
            college: subject.college().clone(),
        }
    }

    /// Joins the row with its stat lines into a domain subject.
    #[instrument(skip(self, lines), fields(subject_id = self.id, line_count = lines.len()))]
    pub fn into_subject(self, lines: Vec<StatLineRow>) -> Subject {
        Subject::new(
            SubjectId(self.id),
            self.full_name,
            self.slug,
            self.position,
            self.college,
            lines.into_iter().map(StatLineRow::into_stat_line).collect(),
        )
    }
}

/// Stat line row; one per (subject, season).
#[derive(Debug, Clone, Queryable, Identifiable, Selectable, Insertable, Associations, Getters)]
#[diesel(table_name = schema::stat_lines)]
#[diesel(primary_key(subject_id, season))]
#[diesel(belongs_to(SubjectRow, foreign_key = subject_id))]
pub struct StatLineRow {
    subject_id: i64,
    season: i32,
    team: String,
    stat1_name: String,
    stat1_value: f64,
    stat2_name: String,
    stat2_value: f64,
    stat3_name: String,
    stat3_value: f64,
}

impl StatLineRow {
    /// Flattens a domain stat line for storage.
    pub fn from_stat_line(subject_id: SubjectId, line: &StatLine) -> Self {
        let [m1, m2, m3] = line.metrics();
        Self {
            subject_id: subject_id.0,
            season: *line.season(),
            team: line.team().clone(),
            stat1_name: m1.name().clone(),
            stat1_value: *m1.value(),
            stat2_name: m2.name().clone(),
            stat2_value: *m2.value(),
            stat3_name: m3.name().clone(),
            stat3_value: *m3.value(),
        }
    }

    /// Rebuilds the domain stat line.
    pub fn into_stat_line(self) -> StatLine {
        StatLine::new(
            self.season,
            self.team,
            [
                Metric::new(self.stat1_name, self.stat1_value),
                Metric::new(self.stat2_name, self.stat2_value),
                Metric::new(self.stat3_name, self.stat3_value),
            ],
        )
    }
}

/// Daily assignment row.
#[derive(Debug, Clone, Queryable, Selectable, Insertable, Getters, new)]
#[diesel(table_name = schema::daily_assignment)]
pub struct AssignmentRow {
    day: NaiveDate,
    subject_id: i64,
}

/// Stored result row.
#[derive(Debug, Clone, Queryable, Selectable, Getters)]
#[diesel(table_name = schema::results)]
pub struct ResultRow {
    day: NaiveDate,
    participant: String,
    revealed: i32,
    score: i32,
    hints: String,
    left_tab: bool,
    recorded_at: NaiveDateTime,
}

impl ResultRow {
    /// Converts into the domain result; unknown hint labels are dropped.
    #[instrument(skip(self), fields(day = %self.day, participant = %self.participant))]
    pub fn into_result(self) -> Result<DailyResult, StoreError> {
        let revealed = u8::try_from(self.revealed)
            .map_err(|_| StoreError::new(format!("Invalid revealed count: {}", self.revealed)))?;
        let score = u32::try_from(self.score)
            .map_err(|_| StoreError::new(format!("Invalid score: {}", self.score)))?;
        Ok(DailyResult::new(
            self.day,
            self.participant,
            revealed,
            score,
            HintSet::from_labels(self.hints.split(',')),
            self.left_tab,
        ))
    }
}

/// Insertable result row; `recorded_at` comes from the column default.
#[derive(Debug, Clone, Insertable, Getters)]
#[diesel(table_name = schema::results)]
pub struct NewResultRow {
    day: NaiveDate,
    participant: String,
    revealed: i32,
    score: i32,
    hints: String,
    left_tab: bool,
}

impl NewResultRow {
    /// Builds the row for a domain result.
    pub fn from_result(result: &DailyResult) -> Self {
        Self {
            day: *result.day(),
            participant: result.participant().clone(),
            revealed: i32::from(*result.revealed()),
            score: i32::try_from(*result.score()).unwrap_or(i32::MAX),
            hints: result.hints().to_labels(),
            left_tab: *result.left_tab(),
        }
    }
}

/// Team season record row.
#[derive(Debug, Clone, Queryable, Selectable, Insertable, Getters, new)]
#[diesel(table_name = schema::team_period_record)]
pub struct TeamRecordRow {
    season: i32,
    team: String,
    wins: i32,
    losses: i32,
    ties: i32,
}

impl TeamRecordRow {
    /// Converts into the domain record, clamping negative counts to zero.
    pub fn into_record(self) -> TeamRecord {
        let count = |n: i32| u32::try_from(n).unwrap_or(0);
        TeamRecord::new(count(self.wins), count(self.losses), count(self.ties))
    }
}

/// Streak row.
#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset, Getters)]
#[diesel(table_name = schema::streaks)]
#[diesel(primary_key(participant))]
pub struct StreakRow {
    participant: String,
    current_streak: i32,
    best_streak: i32,
    last_day: NaiveDate,
    updated_at: NaiveDateTime,
}

impl StreakRow {
    /// Builds a row for a domain streak stamped with `updated_at`.
    pub fn from_streak(streak: &Streak, updated_at: NaiveDateTime) -> Self {
        let count = |n: u32| i32::try_from(n).unwrap_or(i32::MAX);
        Self {
            participant: streak.participant().clone(),
            current_streak: count(*streak.current()),
            best_streak: count(*streak.best()),
            last_day: *streak.last_day(),
            updated_at,
        }
    }

    /// Converts into the domain streak.
    pub fn into_streak(self) -> Streak {
        let count = |n: i32| u32::try_from(n).unwrap_or(0);
        Streak::from_parts(
            self.participant,
            count(self.current_streak),
            count(self.best_streak),
            self.last_day,
        )
    }
}
