//! Fuzzy guess acceptance and suggestion ranking.

use std::collections::{BTreeSet, HashSet};

use derive_getters::Getters;
use rapidfuzz::fuzz;
use tracing::{debug, instrument};

use crate::subject::{Candidate, Subject};

/// Minimum character similarity (0-100) for a typo to count as correct.
pub const TYPO_THRESHOLD: f64 = 90.0;

/// Generational suffixes dropped during normalization.
const SUFFIXES: [&str; 6] = ["jr", "sr", "ii", "iii", "iv", "v"];

/// Returns true if `token` is a generational suffix such as "Jr." or "III".
pub fn is_generational_suffix(token: &str) -> bool {
    let bare = token.trim_end_matches('.').to_ascii_lowercase();
    SUFFIXES.contains(&bare.as_str())
}

/// Normalizes a human name for comparison.
///
/// Lowercases, drops generational suffix tokens, turns punctuation into
/// spaces and collapses whitespace. "Odell Beckham Jr." becomes
/// "odell beckham".
pub fn normalize_name(s: &str) -> String {
    let lowered = s.to_lowercase();
    let kept = lowered
        .split_whitespace()
        .filter(|t| !is_generational_suffix(t))
        .collect::<Vec<_>>()
        .join(" ");
    kept.chars()
        .map(|c| if c.is_alphanumeric() || c.is_whitespace() { c } else { ' ' })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Compact "first initial + last token" key, e.g. "t brady".
///
/// Single-token names return the token itself.
pub fn short_key(s: &str) -> String {
    let norm = normalize_name(s);
    let parts: Vec<&str> = norm.split_whitespace().collect();
    match parts.as_slice() {
        [] => String::new(),
        [only] => (*only).to_string(),
        [first, .., last] => {
            let initial: String = first.chars().take(1).collect();
            format!("{initial} {last}")
        }
    }
}

/// Character-level similarity of two strings on a 0-100 scale.
///
/// Indel ratio: `2 * lcs / (len_a + len_b)`, so a single inserted or
/// dropped letter costs about half as much as under plain edit distance.
pub fn ratio(a: &str, b: &str) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 100.0;
    }
    fuzz::ratio(a.chars(), b.chars()) * 100.0
}

/// Token-order-insensitive similarity on a 0-100 scale.
///
/// Compares the shared tokens against each side's full token set, so
/// "brady" scores 100 against "tom brady" and word order never matters.
pub fn token_set_ratio(a: &str, b: &str) -> f64 {
    let ta: BTreeSet<&str> = a.split_whitespace().collect();
    let tb: BTreeSet<&str> = b.split_whitespace().collect();
    if ta.is_empty() || tb.is_empty() {
        return 0.0;
    }

    let sect: Vec<&str> = ta.intersection(&tb).copied().collect();
    let diff_ab: Vec<&str> = ta.difference(&tb).copied().collect();
    let diff_ba: Vec<&str> = tb.difference(&ta).copied().collect();

    if !sect.is_empty() && (diff_ab.is_empty() || diff_ba.is_empty()) {
        return 100.0;
    }

    let sect = sect.join(" ");
    let join = |diff: &[&str]| {
        let rest = diff.join(" ");
        if sect.is_empty() {
            rest
        } else {
            format!("{sect} {rest}")
        }
    };
    let combined_ab = join(&diff_ab);
    let combined_ba = join(&diff_ba);

    let mut best = ratio(&combined_ab, &combined_ba);
    if !sect.is_empty() {
        best = best
            .max(ratio(&sect, &combined_ab))
            .max(ratio(&sect, &combined_ba));
    }
    best
}

/// Returns true if `guess` names the true answer closely enough.
///
/// Accepts an exact normalized match, the first-initial + last-name key, or a
/// small edit distance. Only ever call this against the true answer; population
/// members are ranked with [`GuessMatcher::suggest`] instead.
#[instrument(skip(answer))]
pub fn is_match(guess: &str, answer: &str) -> bool {
    let g = normalize_name(guess);
    let a = normalize_name(answer);
    if g.is_empty() || a.is_empty() {
        return false;
    }
    if g == a || g == short_key(answer) {
        return true;
    }
    let similarity = ratio(&g, &a);
    debug!(similarity, "Typo similarity against answer");
    similarity >= TYPO_THRESHOLD
}

/// Suggestion ranking parameters for one game mode.
#[derive(Debug, Clone, Copy, PartialEq, Getters)]
pub struct MatchSettings {
    /// Maximum number of suggestions returned.
    limit: usize,
    /// Minimum token-set similarity (0-100) for a candidate to be offered.
    min_score: f64,
}

impl MatchSettings {
    /// Creates new settings.
    pub fn new(limit: usize, min_score: f64) -> Self {
        Self { limit, min_score }
    }
}

/// A population member with its similarity to the guess.
#[derive(Debug, Clone, PartialEq, Getters)]
pub struct ScoredCandidate {
    /// Candidate name as displayed.
    name: String,
    /// Similarity on a 0-100 scale.
    score: f64,
}

/// Compares guesses against the answer and ranks near-miss suggestions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GuessMatcher {
    settings: MatchSettings,
}

impl GuessMatcher {
    /// Creates a matcher with the given ranking settings.
    pub fn new(settings: MatchSettings) -> Self {
        Self { settings }
    }

    /// Ranking settings in use.
    pub fn settings(&self) -> MatchSettings {
        self.settings
    }

    /// Returns true if `guess` names `subject` by full name or by slug.
    #[instrument(skip(self, subject), fields(subject_id = %subject.id()))]
    pub fn matches_subject(&self, guess: &str, subject: &Subject) -> bool {
        let slug_name = subject.slug().replace('-', " ");
        is_match(guess, subject.full_name()) || is_match(guess, &slug_name)
    }

    /// Ranks population names similar to `guess`.
    ///
    /// When `position` is given the population is first narrowed to that
    /// category, falling back to everyone if nobody matches. Ties keep
    /// population order.
    #[instrument(skip(self, population), fields(population = population.len()))]
    pub fn suggest(
        &self,
        guess: &str,
        population: &[Candidate],
        position: Option<&str>,
    ) -> Vec<ScoredCandidate> {
        let query = normalize_name(guess);
        if query.is_empty() || self.settings.limit == 0 {
            return Vec::new();
        }

        let filtered: Vec<&Candidate> = match position {
            Some(pos) => population
                .iter()
                .filter(|c| c.position().eq_ignore_ascii_case(pos))
                .collect(),
            None => Vec::new(),
        };
        let pool: Vec<&Candidate> = if filtered.is_empty() {
            population.iter().collect()
        } else {
            filtered
        };

        let mut seen = HashSet::new();
        let mut scored: Vec<ScoredCandidate> = pool
            .into_iter()
            .filter(|c| seen.insert(c.name().to_lowercase()))
            .map(|c| ScoredCandidate {
                name: c.name().clone(),
                score: token_set_ratio(&query, &normalize_name(c.name())),
            })
            .filter(|c| c.score >= self.settings.min_score)
            .collect();

        // Stable sort keeps first occurrence ahead on ties.
        scored.sort_by(|a, b| b.score.total_cmp(&a.score));
        scored.truncate(self.settings.limit);

        debug!(count = scored.len(), "Suggestions ranked");
        scored
    }

    /// Like [`suggest`](Self::suggest) but returns names only.
    pub fn suggest_names(
        &self,
        guess: &str,
        population: &[Candidate],
        position: Option<&str>,
    ) -> Vec<String> {
        self.suggest(guess, population, position)
            .into_iter()
            .map(|c| c.name)
            .collect()
    }
}
