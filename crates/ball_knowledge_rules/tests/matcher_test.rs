//! Tests for guess acceptance and suggestion ranking.

use ball_knowledge_rules::{
    Candidate, GuessMatcher, MatchSettings, Metric, StatLine, Subject, SubjectId, is_match,
    normalize_name, short_key,
};

fn matcher(min_score: f64) -> GuessMatcher {
    GuessMatcher::new(MatchSettings::new(5, min_score))
}

fn brady() -> Subject {
    Subject::new(
        SubjectId(12),
        "Tom Brady",
        "tom-brady",
        "QB",
        Some("Michigan".to_string()),
        vec![StatLine::new(
            2007,
            "NWE",
            [
                Metric::new("Pass Yds", 4806.0),
                Metric::new("Pass TD", 50.0),
                Metric::new("Int", 8.0),
            ],
        )],
    )
}

fn population() -> Vec<Candidate> {
    vec![
        Candidate::new("Tom Brady", "QB"),
        Candidate::new("Kyle Brady", "TE"),
        Candidate::new("Derek Carr", "QB"),
        Candidate::new("David Carr", "QB"),
        Candidate::new("Peyton Manning", "QB"),
        Candidate::new("Eli Manning", "QB"),
        Candidate::new("Odell Beckham Jr.", "WR"),
    ]
}

#[test]
fn test_normalize_strips_suffix_and_punctuation() {
    assert_eq!(normalize_name("  Odell  Beckham Jr. "), "odell beckham");
    assert_eq!(normalize_name("T.J. Watt"), "t j watt");
    assert_eq!(normalize_name("Robert Griffin III"), "robert griffin");
}

#[test]
fn test_short_key() {
    assert_eq!(short_key("Tom Brady"), "t brady");
    assert_eq!(short_key("Pele"), "pele");
    assert_eq!(short_key(""), "");
}

#[test]
fn test_exact_name_accepted() {
    assert!(is_match("tom brady", "Tom Brady"));
    assert!(is_match("TOM BRADY", "Tom Brady"));
}

#[test]
fn test_initial_and_last_name_accepted() {
    assert!(is_match("T. Brady", "Tom Brady"));
}

#[test]
fn test_small_typo_accepted() {
    assert!(is_match("patrik mahomes", "Patrick Mahomes"));
}

#[test]
fn test_dropped_letter_accepted() {
    assert!(is_match("tom brdy", "Tom Brady"));
    assert!(is_match("Tom Brad", "Tom Brady"));
}

#[test]
fn test_extra_letter_accepted() {
    assert!(is_match("tom bradyy", "Tom Brady"));
    assert!(is_match("Tomm Brady", "Tom Brady"));
}

#[test]
fn test_transposed_letters_suggested_not_accepted() {
    assert!(!is_match("Tom Bardy", "Tom Brady"));

    let qbs = vec![
        Candidate::new("Tom Brady", "QB"),
        Candidate::new("Drew Brees", "QB"),
    ];
    let names = matcher(80.0).suggest_names("Tom Bardy", &qbs, Some("QB"));
    assert_eq!(names, ["Tom Brady"]);
}

#[test]
fn test_blank_guess_rejected() {
    assert!(!is_match("   ", "Tom Brady"));
    assert!(!is_match("...", "Tom Brady"));
}

#[test]
fn test_slug_with_spaces_accepted() {
    let subject = Subject::new(
        SubjectId(1),
        "Odell Beckham Jr.",
        "odell-beckham-jr",
        "WR",
        None,
        Vec::new(),
    );
    assert!(matcher(80.0).matches_subject("odell beckham jr", &subject));
    assert!(matcher(80.0).matches_subject("Odell Beckham", &subject));
}

#[test]
fn test_different_population_member_rejected() {
    let subject = Subject::new(SubjectId(2), "Derek Carr", "derek-carr", "QB", None, Vec::new());
    assert!(!matcher(80.0).matches_subject("David Carr", &subject));

    let subject = Subject::new(
        SubjectId(3),
        "Peyton Manning",
        "peyton-manning",
        "QB",
        None,
        Vec::new(),
    );
    assert!(!matcher(80.0).matches_subject("Eli Manning", &subject));
}

#[test]
fn test_suggest_last_name_ranks_exact_token_matches() {
    let names = matcher(80.0).suggest_names("brady", &population(), None);
    assert_eq!(names, ["Tom Brady", "Kyle Brady"]);
}

#[test]
fn test_suggest_filters_by_position() {
    let names = matcher(80.0).suggest_names("brady", &population(), Some("QB"));
    assert_eq!(names, ["Tom Brady"]);
}

#[test]
fn test_suggest_position_filter_falls_back_when_empty() {
    let names = matcher(80.0).suggest_names("brady", &population(), Some("K"));
    assert_eq!(names, ["Tom Brady", "Kyle Brady"]);
}

#[test]
fn test_suggest_respects_limit_and_ties_keep_order() {
    let narrow = GuessMatcher::new(MatchSettings::new(1, 80.0));
    let names = narrow.suggest_names("manning", &population(), None);
    assert_eq!(names, ["Peyton Manning"]);
}

#[test]
fn test_suggest_below_threshold_is_empty() {
    assert!(matcher(80.0).suggest_names("zzz", &population(), None).is_empty());
}

#[test]
fn test_lower_threshold_admits_more() {
    let strict = matcher(95.0).suggest("carr dave", &population(), None);
    let loose = matcher(60.0).suggest("carr dave", &population(), None);
    assert!(loose.len() >= strict.len());
    assert!(!loose.is_empty());
}

#[test]
fn test_suggest_is_sorted_descending() {
    let ranked = matcher(0.0).suggest("derek car", &population(), None);
    for pair in ranked.windows(2) {
        assert!(pair[0].score() >= pair[1].score());
    }
    assert_eq!(ranked[0].name(), "Derek Carr");
}

#[test]
fn test_true_subject_candidate() {
    assert_eq!(brady().candidate(), Candidate::new("Tom Brady", "QB"));
}
