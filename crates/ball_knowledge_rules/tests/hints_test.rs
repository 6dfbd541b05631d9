//! Tests for hint value resolution.

use std::collections::HashMap;

use ball_knowledge_rules::{
    Conference, Division, HintKind, HintResolver, Metric, NoRecords, RecordBook, StatLine,
    Subject, SubjectId, TeamRecord, canonical_team, split_name,
};

/// Record book backed by a map, for tests.
struct MapRecords(HashMap<(i32, String), TeamRecord>);

impl RecordBook for MapRecords {
    fn team_record(&self, season: i32, team: &str) -> Option<TeamRecord> {
        self.0.get(&(season, team.to_string())).copied()
    }
}

fn line(season: i32, team: &str) -> StatLine {
    StatLine::new(
        season,
        team,
        [
            Metric::new("Rush Yds", 1200.0),
            Metric::new("Rush TD", 11.0),
            Metric::new("Y/A", 4.6),
        ],
    )
}

fn subject(name: &str, college: Option<&str>, lines: Vec<StatLine>) -> Subject {
    Subject::new(
        SubjectId(7),
        name,
        name.to_lowercase().replace(' ', "-"),
        "RB",
        college.map(str::to_string),
        lines,
    )
}

#[test]
fn test_legacy_code_is_canonicalized_and_aligned() {
    let s = subject("Marshall Faulk", None, vec![line(2001, "STL")]);
    let values = HintResolver::new().resolve(&s, 0, &NoRecords);
    assert_eq!(values.team().as_deref(), Some("LAR"));
    assert_eq!(*values.conference(), Some(Conference::Nfc));
    assert_eq!(*values.division(), Some(Division::West));
    assert_eq!(*values.season(), Some(2001));
}

#[test]
fn test_unknown_team_has_no_alignment() {
    let s = subject("Someone Old", None, vec![line(1950, "xyz")]);
    let values = HintResolver::new().resolve(&s, 0, &NoRecords);
    assert_eq!(values.team().as_deref(), Some("XYZ"));
    assert!(values.conference().is_none());
    assert!(values.division().is_none());
}

#[test]
fn test_record_formats_ties_only_when_present() {
    let mut map = HashMap::new();
    map.insert((2008, "PHI".to_string()), TeamRecord::new(9, 6, 1));
    map.insert((2009, "PHI".to_string()), TeamRecord::new(11, 5, 0));
    let records = MapRecords(map);
    let s = subject("Brian Westbrook", None, vec![line(2008, "PHI"), line(2009, "PHI")]);

    let resolver = HintResolver::new();
    assert_eq!(resolver.resolve(&s, 0, &records).record().as_deref(), Some("9-6-1"));
    assert_eq!(resolver.resolve(&s, 1, &records).record().as_deref(), Some("11-5"));
}

#[test]
fn test_missing_record_is_none() {
    let s = subject("Brian Westbrook", None, vec![line(2008, "PHI")]);
    assert!(HintResolver::new().resolve(&s, 0, &NoRecords).record().is_none());
}

#[test]
fn test_index_is_clamped() {
    let s = subject("Frank Gore", None, vec![line(2006, "SFO"), line(2015, "IND")]);
    let values = HintResolver::new().resolve(&s, 99, &NoRecords);
    assert_eq!(values.team().as_deref(), Some("IND"));
}

#[test]
fn test_subject_without_lines_keeps_player_values() {
    let s = subject("Barry Sanders", Some("Oklahoma State"), Vec::new());
    let values = HintResolver::new().resolve(&s, 0, &NoRecords);
    assert!(values.team().is_none());
    assert!(values.season().is_none());
    assert_eq!(values.college().as_deref(), Some("Oklahoma State"));
    assert_eq!(values.first_name().as_deref(), Some("Barry"));
}

#[test]
fn test_blank_college_is_absent() {
    let s = subject("Frank Gore", Some("   "), vec![line(2006, "SF")]);
    assert!(s.college().is_none());
    assert!(HintResolver::new().resolve(&s, 0, &NoRecords).college().is_none());
}

#[test]
fn test_names_skip_generational_suffix() {
    assert_eq!(
        split_name("Odell Beckham Jr."),
        (Some("Odell".to_string()), Some("Beckham".to_string()))
    );
    assert_eq!(split_name("Cher"), (Some("Cher".to_string()), None));
    assert_eq!(split_name("  "), (None, None));
}

#[test]
fn test_division_value_includes_conference() {
    let s = subject("Frank Gore", None, vec![line(2006, "SF")]);
    let values = HintResolver::new().resolve(&s, 0, &NoRecords);
    assert_eq!(values.value_for(HintKind::Division).as_deref(), Some("NFC West"));
    assert_eq!(values.value_for(HintKind::Conference).as_deref(), Some("NFC"));
}

#[test]
fn test_canonical_team_blank_is_none() {
    assert_eq!(canonical_team("  "), None);
    assert_eq!(canonical_team("nwe").as_deref(), Some("NE"));
}
