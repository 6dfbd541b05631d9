//! Tests for snapshot loading and the suggestion pool.

use std::path::Path;
use std::sync::Arc;

use ball_knowledge::{
    GameStore, MemoryStore, PoolSource, RecordBook, Snapshot, SubjectId, SuggestionPool,
};

const SAMPLE: &str = r#"{
  "players": [
    {
      "full_name": "Calvin Johnson",
      "player_slug": "calvin-johnson",
      "position": "WR",
      "college": "Georgia Tech",
      "seasons": [
        {
          "season": 2012,
          "team": "DET",
          "stats": [
            {"name": "Rec", "value": 122},
            {"name": "Rec Yds", "value": 1964},
            {"name": "Rec TD", "value": 5}
          ]
        }
      ]
    },
    {
      "id": 40,
      "full_name": "Mike Vrabel",
      "player_slug": "mike-vrabel",
      "position": "LB"
    },
    {
      "full_name": "Larry Fitzgerald",
      "player_slug": "larry-fitzgerald",
      "position": "WR",
      "seasons": [
        {
          "season": 2008,
          "team": "CRD",
          "stats": [
            {"name": "Rec", "value": 96},
            {"name": "Rec Yds", "value": 1431},
            {"name": "Rec TD", "value": 12}
          ]
        }
      ]
    }
  ],
  "team_records": [
    {"season": 2008, "team": "CRD", "wins": 9, "losses": 7},
    {"season": 2008, "team": "PHI", "wins": 9, "losses": 6, "ties": 1}
  ]
}"#;

fn sample() -> Snapshot {
    Snapshot::from_json(SAMPLE).expect("Failed to parse sample")
}

#[test]
fn test_parse_keeps_file_order() {
    let snapshot = sample();
    let names: Vec<&str> = snapshot
        .subjects()
        .iter()
        .map(|s| s.full_name().as_str())
        .collect();
    assert_eq!(names, vec!["Calvin Johnson", "Mike Vrabel", "Larry Fitzgerald"]);
    assert_eq!(snapshot.len(), 3);

    let johnson = &snapshot.subjects()[0];
    assert_eq!(johnson.college().as_deref(), Some("Georgia Tech"));
    assert_eq!(johnson.stat_lines()[0].metrics()[1].name(), "Rec Yds");
}

#[test]
fn test_missing_ids_use_file_position() {
    let snapshot = sample();
    let ids: Vec<SubjectId> = snapshot.subjects().iter().map(|s| *s.id()).collect();
    assert_eq!(ids, vec![SubjectId(1), SubjectId(40), SubjectId(3)]);
    assert!(snapshot.subject(SubjectId(40)).is_some());
    assert!(snapshot.subject(SubjectId(2)).is_none());
}

#[test]
fn test_subjects_without_lines_are_not_eligible() {
    let snapshot = sample();
    let eligible: Vec<SubjectId> = snapshot.eligible().iter().map(|s| *s.id()).collect();
    assert_eq!(eligible, vec![SubjectId(1), SubjectId(3)]);

    // Still part of the suggestion population.
    assert_eq!(snapshot.candidates().len(), 3);
}

#[test]
fn test_wrong_stat_count_rejected() {
    let bad = r#"{"players": [{
        "full_name": "Calvin Johnson",
        "player_slug": "calvin-johnson",
        "position": "WR",
        "seasons": [{"season": 2012, "team": "DET", "stats": [{"name": "Rec", "value": 122}]}]
    }]}"#;
    let err = Snapshot::from_json(bad).expect_err("Short stat list accepted");
    assert!(err.message.contains("Calvin Johnson"));
}

#[test]
fn test_malformed_json_rejected() {
    assert!(Snapshot::from_json("{\"players\": [").is_err());
}

#[test]
fn test_team_records_keyed_by_canonical_team() {
    let snapshot = sample();
    assert_eq!(snapshot.team_records().len(), 2);

    let arizona = snapshot.team_record(2008, "ARI").expect("Record missing");
    assert_eq!(arizona.display(), "9-7");
    let philly = snapshot.team_record(2008, "PHI").expect("Record missing");
    assert_eq!(philly.display(), "9-6-1");
    assert!(snapshot.team_record(2009, "ARI").is_none());
}

#[test]
fn test_bundled_seed_loads() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("data/players_seed.json");
    let snapshot = Snapshot::from_file(&path).expect("Seed file failed to load");

    assert!(snapshot.len() >= 10);
    assert!(snapshot.eligible().len() < snapshot.len());
    assert!(
        snapshot
            .eligible()
            .iter()
            .all(|s| s.stat_lines().iter().all(|l| l.metrics().len() == 3))
    );
    assert_eq!(
        snapshot.team_record(2007, "NE").map(|r| r.display()),
        Some("16-0".to_string())
    );
}

#[test]
fn test_pool_prefers_store_population() {
    let snapshot = sample();
    let store = MemoryStore::with_subjects(vec![snapshot.subjects()[0].clone()])
        .expect("Store setup failed");

    let mut pool = SuggestionPool::new();
    assert!(!pool.is_built());

    let population = pool.get_or_build(Some(&store as &dyn GameStore), &snapshot);
    assert_eq!(population.len(), 1);
    assert_eq!(pool.source(), Some(PoolSource::Store));

    // Cached: later store changes are not seen until invalidated.
    store
        .insert_subject(snapshot.subjects()[2].clone())
        .expect("Insert failed");
    let again = pool.get_or_build(Some(&store as &dyn GameStore), &snapshot);
    assert!(Arc::ptr_eq(&population, &again));

    pool.invalidate();
    assert!(!pool.is_built());
    let rebuilt = pool.get_or_build(Some(&store as &dyn GameStore), &snapshot);
    assert_eq!(rebuilt.len(), 2);
}

#[test]
fn test_pool_falls_back_to_snapshot() {
    let snapshot = sample();
    let store = MemoryStore::new();
    store.set_available(false);

    let mut pool = SuggestionPool::new();
    let population = pool.get_or_build(Some(&store as &dyn GameStore), &snapshot);
    assert_eq!(population.len(), 3);
    assert_eq!(pool.source(), Some(PoolSource::Snapshot));

    // Store recovers: a snapshot-built pool is replaced.
    store.set_available(true);
    store
        .insert_subject(snapshot.subjects()[0].clone())
        .expect("Insert failed");
    let population = pool.get_or_build(Some(&store as &dyn GameStore), &snapshot);
    assert_eq!(population.len(), 1);
    assert_eq!(pool.source(), Some(PoolSource::Store));
}

#[test]
fn test_pool_without_store_uses_snapshot_once() {
    let snapshot = sample();
    let mut pool = SuggestionPool::new();

    let first = pool.get_or_build(None, &snapshot);
    let second = pool.get_or_build(None, &snapshot);
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(pool.source(), Some(PoolSource::Snapshot));
}
