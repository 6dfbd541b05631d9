//! Tests for file-backed participant sessions.

use ball_knowledge::{
    Candidate, GameProgression, GameState, GuessMatcher, GuessOrigin, GuessOutcome, MatchSettings,
    Metric, Round, SessionFiles, StatLine, Subject, SubjectId,
};
use chrono::NaiveDate;
use tempfile::TempDir;

fn round() -> Round {
    let line = |season: i32| {
        StatLine::new(
            season,
            "KAN",
            [
                Metric::new("Rec", 105.0),
                Metric::new("Rec Yds", 1416.0),
                Metric::new("Rec TD", 10.0),
            ],
        )
    };
    Round::new(
        NaiveDate::from_ymd_opt(2025, 9, 1).expect("valid date"),
        "alice".to_string(),
        Subject::new(
            SubjectId(11),
            "Travis Kelce",
            "travis-kelce",
            "TE",
            Some("Cincinnati".to_string()),
            vec![line(2018), line(2020), line(2022)],
        ),
    )
}

#[test]
fn test_missing_session_is_fresh() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let sessions = SessionFiles::new(dir.path().join("sessions"));

    let state = sessions.load("alice").expect("Load failed");
    assert_eq!(state, GameState::new());
    assert!(state.day().is_none());
}

#[test]
fn test_session_round_trip() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let sessions = SessionFiles::new(dir.path().join("sessions"));
    let engine = GameProgression::local(GuessMatcher::new(MatchSettings::new(5, 80.0)));
    let round = round();

    let state = engine.start_day(&round, GameState::new());
    let state = engine
        .purchase_hint(&round, &state, "college")
        .expect("Purchase failed")
        .into_parts()
        .0;
    let state = engine
        .submit_guess(&round, &state, "Qqqq", GuessOrigin::Typed, &[])
        .expect("Guess rejected")
        .into_parts()
        .0;

    sessions.save("alice", &state).expect("Save failed");
    let loaded = sessions.load("alice").expect("Load failed");

    assert_eq!(loaded, state);
    assert_eq!(*loaded.revealed(), 2);
    assert!(sessions.dir().join("alice.json").exists());

    // Other participants are untouched.
    assert_eq!(sessions.load("bob").expect("Load failed"), GameState::new());
}

#[test]
fn test_invalid_participant_rejected() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let sessions = SessionFiles::new(dir.path());

    for name in ["", "../escape", "a/b", "two words"] {
        assert!(sessions.load(name).is_err(), "'{}' should be rejected", name);
        assert!(
            sessions.save(name, &GameState::new()).is_err(),
            "'{}' should be rejected",
            name
        );
    }
}

#[test]
fn test_corrupt_session_errors() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    std::fs::write(dir.path().join("alice.json"), "not json").expect("Write failed");
    let sessions = SessionFiles::new(dir.path());

    let err = sessions.load("alice").expect_err("Corrupt file accepted");
    assert!(err.message.contains("Corrupt"));
}

#[test]
fn test_shown_suggestions_are_not_saved() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let sessions = SessionFiles::new(dir.path());
    let engine = GameProgression::local(GuessMatcher::new(MatchSettings::new(5, 80.0)));
    let round = round();
    let population = vec![
        Candidate::new("Travis Kelce", "TE"),
        Candidate::new("Jason Kelce", "C"),
    ];

    let state = engine.start_day(&round, GameState::new());
    let (state, outcome) = engine
        .submit_guess(&round, &state, "Kelce", GuessOrigin::Typed, &population)
        .expect("Guess rejected")
        .into_parts();
    assert!(matches!(outcome, GuessOutcome::Suggested { .. }));
    assert!(!state.pending_suggestions().is_empty());

    let (state, shown) = engine.take_suggestions(&state).into_parts();
    assert_eq!(shown, vec!["Travis Kelce"]);
    sessions.save("alice", &state).expect("Save failed");

    let loaded = sessions.load("alice").expect("Load failed");
    assert!(loaded.pending_suggestions().is_empty());
    assert!(*loaded.suggestion_grace_used());
}
