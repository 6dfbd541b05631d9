//! Tests for configuration loading and reference-day computation.

use std::collections::HashMap;
use std::io::Write;
use std::path::Path;

use ball_knowledge::{
    DB_ENV, GameConfig, GameMode, ReferenceClock, SNAPSHOT_ENV, TIMEZONE_ENV, day_ordinal,
};
use chrono::{NaiveDate, TimeZone, Utc};
use tempfile::NamedTempFile;

fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn test_defaults() {
    let config = GameConfig::default();
    assert_eq!(config.timezone(), "America/New_York");
    assert!(config.database_path().is_none());
    assert_eq!(config.snapshot_path(), Path::new("data/players_seed.json"));
    assert_eq!(*config.suggestion_limit(), 5);
    assert!(config.reference_zone().is_ok());
}

#[test]
fn test_partial_toml_keeps_defaults() {
    let config = GameConfig::from_toml(
        r#"
            database_path = "games.db"
            timed_min_score = 65.0
        "#,
    )
    .expect("Parse failed");

    assert_eq!(config.database_path().as_deref(), Some("games.db"));
    assert_eq!(*config.timed_min_score(), 65.0);
    assert_eq!(*config.daily_min_score(), 80.0);
    assert_eq!(config.timezone(), "America/New_York");
}

#[test]
fn test_from_file() {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    writeln!(file, "timezone = \"Europe/London\"").expect("Write failed");
    writeln!(file, "suggestion_limit = 3").expect("Write failed");

    let config = GameConfig::from_file(file.path()).expect("Load failed");
    assert_eq!(config.timezone(), "Europe/London");
    assert_eq!(*config.suggestion_limit(), 3);
}

#[test]
fn test_missing_file_errors() {
    let result = GameConfig::from_file("/nonexistent/ball_knowledge.toml");
    assert!(result.is_err());
}

#[test]
fn test_unknown_timezone_rejected() {
    let err = GameConfig::from_toml("timezone = \"Mars/Olympus_Mons\"")
        .expect_err("Bad zone accepted");
    assert!(err.message.contains("Mars/Olympus_Mons"));
}

#[test]
fn test_out_of_range_threshold_rejected() {
    assert!(GameConfig::from_toml("daily_min_score = 120.0").is_err());
    assert!(GameConfig::from_toml("timed_min_score = -1.0").is_err());
}

#[test]
fn test_env_overrides() {
    let vars = env(&[
        (DB_ENV, "/tmp/bk.db"),
        (SNAPSHOT_ENV, "other.json"),
        (TIMEZONE_ENV, "America/Chicago"),
    ]);
    let config = GameConfig::default()
        .with_env_overrides(|k| vars.get(k).cloned())
        .expect("Overrides failed");

    assert_eq!(config.database_path().as_deref(), Some("/tmp/bk.db"));
    assert_eq!(config.snapshot_path(), Path::new("other.json"));
    assert_eq!(config.timezone(), "America/Chicago");
}

#[test]
fn test_empty_db_override_means_local() {
    let vars = env(&[(DB_ENV, "")]);
    let config = GameConfig::default()
        .with_database_path(Some("games.db".to_string()))
        .with_env_overrides(|k| vars.get(k).cloned())
        .expect("Overrides failed");
    assert!(config.database_path().is_none());
}

#[test]
fn test_bad_env_timezone_rejected() {
    let vars = env(&[(TIMEZONE_ENV, "Not/AZone")]);
    let result = GameConfig::default().with_env_overrides(|k| vars.get(k).cloned());
    assert!(result.is_err());
}

#[test]
fn test_match_settings_per_mode() {
    let config = GameConfig::default();

    let daily = config.match_settings(GameMode::Daily);
    assert_eq!(*daily.limit(), 5);
    assert_eq!(*daily.min_score(), 80.0);

    let timed = config.match_settings(GameMode::Timed);
    assert_eq!(*timed.min_score(), 72.0);
}

#[test]
fn test_game_mode_parses_case_insensitively() {
    assert_eq!("daily".parse::<GameMode>().expect("Parse failed"), GameMode::Daily);
    assert_eq!("TIMED".parse::<GameMode>().expect("Parse failed"), GameMode::Timed);
    assert!("weekly".parse::<GameMode>().is_err());
}

#[test]
fn test_reference_day_follows_new_york() {
    let clock = ReferenceClock::default();

    // 03:30 UTC on Sept 2 is still Sept 1 in New York (UTC-4).
    let late = Utc
        .with_ymd_and_hms(2025, 9, 2, 3, 30, 0)
        .single()
        .expect("valid instant");
    assert_eq!(
        clock.day_at(late),
        NaiveDate::from_ymd_opt(2025, 9, 1).expect("valid date")
    );

    let after = Utc
        .with_ymd_and_hms(2025, 9, 2, 4, 30, 0)
        .single()
        .expect("valid instant");
    assert_eq!(
        clock.day_at(after),
        NaiveDate::from_ymd_opt(2025, 9, 2).expect("valid date")
    );
}

#[test]
fn test_reference_day_uses_configured_zone() {
    let config = GameConfig::from_toml("timezone = \"Asia/Tokyo\"").expect("Parse failed");
    let clock = ReferenceClock::new(config.reference_zone().expect("Zone failed"));

    let instant = Utc
        .with_ymd_and_hms(2025, 9, 1, 16, 0, 0)
        .single()
        .expect("valid instant");
    assert_eq!(
        clock.day_at(instant),
        NaiveDate::from_ymd_opt(2025, 9, 2).expect("valid date")
    );
}

#[test]
fn test_day_ordinal() {
    let first = NaiveDate::from_ymd_opt(1, 1, 1).expect("valid date");
    assert_eq!(day_ordinal(first), 1);

    let a = NaiveDate::from_ymd_opt(2025, 2, 28).expect("valid date");
    let b = NaiveDate::from_ymd_opt(2025, 3, 1).expect("valid date");
    assert_eq!(day_ordinal(b) - day_ordinal(a), 1);
}
