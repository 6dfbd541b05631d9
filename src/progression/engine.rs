//! The reveal/hint/guess state machine.

use std::sync::Arc;

use ball_knowledge_rules::{
    Candidate, GuessMatcher, HintKind, HintResolver, HintValues, RecordBook, StatLine,
    normalize_name, score,
};
use tracing::{debug, info, instrument, warn};

use super::error::ProgressError;
use super::state::{
    BoardLine, GameState, GuessOrigin, GuessOutcome, HintEntry, HintPurchase, Persistence, Phase,
    Round, Transition,
};
use crate::store::{DailyResult, GameStore, RecordOutcome, Streak};

/// Drives one participant's day.
///
/// Stateless apart from its collaborators: every operation takes the
/// current [`GameState`] and returns a new one. Callers serialize calls for
/// the same participant and day.
#[derive(Debug, Clone)]
pub struct GameProgression {
    store: Option<Arc<dyn GameStore>>,
    matcher: GuessMatcher,
    resolver: HintResolver,
}

impl GameProgression {
    /// Creates an engine that records results in `store` when present.
    pub fn new(matcher: GuessMatcher, store: Option<Arc<dyn GameStore>>) -> Self {
        Self {
            store,
            matcher,
            resolver: HintResolver::new(),
        }
    }

    /// Creates an engine without durable storage.
    pub fn local(matcher: GuessMatcher) -> Self {
        Self::new(matcher, None)
    }

    /// The matcher in use.
    pub fn matcher(&self) -> &GuessMatcher {
        &self.matcher
    }

    /// Brings `state` onto the round's day.
    ///
    /// A state for another day (or none) is replaced by a fresh one with one
    /// line revealed, unless the store already holds a result for the day, in
    /// which case the solved state is restored from it. A state already on
    /// this day is kept, with its reveal count clamped to the subject.
    #[instrument(skip(self, round, state), fields(day = %round.day(), participant = %round.participant()))]
    pub fn start_day(&self, round: &Round, state: GameState) -> GameState {
        let cap = round.reveal_cap();
        if state.belongs_to(*round.day()) {
            return GameState {
                revealed: state.revealed.clamp(1, cap),
                ..state
            };
        }

        match self.stored_result(round) {
            Some(result) => {
                info!(score = result.score(), "Restoring solved day from store");
                GameState::restored(&result, cap)
            }
            None => {
                debug!(previous = ?state.day, "Starting fresh day");
                GameState::begin(*round.day())
            }
        }
    }

    /// Judges a guess against the day's subject.
    ///
    /// A wrong typed guess that yields suggestions is free once per counted
    /// attempt; every other wrong guess reveals one more line, up to the cap.
    /// A correct guess records the result once and never fails on a storage
    /// error.
    #[instrument(skip(self, round, state, population), fields(day = %round.day(), participant = %round.participant()))]
    pub fn submit_guess(
        &self,
        round: &Round,
        state: &GameState,
        guess: &str,
        origin: GuessOrigin,
        population: &[Candidate],
    ) -> Result<Transition<GuessOutcome>, ProgressError> {
        let rolled = !state.belongs_to(*round.day());
        let mut next = self.start_day(round, state.clone());

        if next.is_solved() || (!rolled && self.stored_result(round).is_some()) {
            debug!("Guess after completion rejected");
            return Err(ProgressError::AlreadyCompleted);
        }
        if normalize_name(guess).is_empty() {
            return Err(ProgressError::EmptyGuess);
        }

        if self.matcher.matches_subject(guess, round.subject()) {
            let final_score = score(next.revealed, &next.hints);
            let (persistence, streak) = self.record(round, &next, final_score);
            next.phase = Phase::Solved { score: final_score };
            next.pending_suggestions.clear();
            info!(score = final_score, revealed = next.revealed, ?persistence, "Puzzle solved");
            return Ok(Transition::new(
                next,
                GuessOutcome::Solved {
                    score: final_score,
                    persistence,
                    streak,
                },
            ));
        }

        let position = round.subject().position().as_str();
        let suggestions = self
            .matcher
            .suggest_names(guess, population, Some(position));

        let free = !suggestions.is_empty()
            && origin == GuessOrigin::Typed
            && !next.suggestion_grace_used;

        if free {
            debug!(count = suggestions.len(), "Wrong guess with suggestions, not counted");
            next.pending_suggestions = suggestions.clone();
            next.suggestion_grace_used = true;
            return Ok(Transition::new(next, GuessOutcome::Suggested { suggestions }));
        }

        next.revealed = next.revealed.saturating_add(1).min(round.reveal_cap());
        next.suggestion_grace_used = false;
        next.pending_suggestions = suggestions.clone();
        debug!(revealed = next.revealed, ?origin, "Wrong guess counted");
        let revealed = next.revealed;
        Ok(Transition::new(
            next,
            GuessOutcome::Revealed {
                revealed,
                suggestions,
            },
        ))
    }

    /// Buys a hint by label.
    ///
    /// Owned hints and hints implied by an owned one are free no-ops.
    #[instrument(skip(self, round, state), fields(day = %round.day(), participant = %round.participant()))]
    pub fn purchase_hint(
        &self,
        round: &Round,
        state: &GameState,
        label: &str,
    ) -> Result<Transition<HintPurchase>, ProgressError> {
        let kind = HintKind::parse(label).ok_or_else(|| ProgressError::UnknownHint {
            label: label.to_string(),
        })?;

        let mut next = self.start_day(round, state.clone());
        if next.is_solved() {
            return Err(ProgressError::AlreadyCompleted);
        }
        if next.hints.contains(kind) {
            debug!(%kind, "Hint already owned");
            return Ok(Transition::new(next, HintPurchase::AlreadyOwned(kind)));
        }
        if let Some(by) = kind
            .superseded_by()
            .iter()
            .copied()
            .find(|k| next.hints.contains(*k))
        {
            debug!(%kind, %by, "Hint implied by owned hint");
            return Ok(Transition::new(next, HintPurchase::Covered { kind, by }));
        }
        if kind == HintKind::College && round.subject().college().is_none() {
            return Err(ProgressError::HintUnavailable { kind });
        }

        next.hints.insert(kind);
        info!(%kind, cost = kind.cost(), score = next.live_score(), "Hint purchased");
        Ok(Transition::new(
            next,
            HintPurchase::Purchased {
                kind,
                cost: kind.cost(),
            },
        ))
    }

    /// Current score; never stored until the day is solved.
    pub fn live_score(&self, state: &GameState) -> u32 {
        state.live_score()
    }

    /// Returns pending suggestions and clears them.
    pub fn take_suggestions(&self, state: &GameState) -> Transition<Vec<String>> {
        let mut next = state.clone();
        let taken = std::mem::take(&mut next.pending_suggestions);
        Transition::new(next, taken)
    }

    /// Hint kinds that can still be bought.
    pub fn available_hints(&self, round: &Round, state: &GameState) -> Vec<HintKind> {
        if state.is_solved() {
            return Vec::new();
        }
        HintKind::all()
            .filter(|k| !state.hints.contains(*k) && !k.is_covered_by(&state.hints))
            .filter(|k| *k != HintKind::College || round.subject().college().is_some())
            .collect()
    }

    /// Stat lines currently shown, in reveal order.
    pub fn visible_lines<'a>(&self, round: &'a Round, state: &GameState) -> &'a [StatLine] {
        let lines = round.subject().stat_lines();
        &lines[..state.visible_count(lines.len())]
    }

    /// Hint values for one revealed line.
    #[instrument(skip(self, round, state, records))]
    pub fn line_hints(
        &self,
        round: &Round,
        state: &GameState,
        index: usize,
        records: &dyn RecordBook,
    ) -> Result<HintValues, ProgressError> {
        let visible = state.visible_count(round.subject().stat_lines().len());
        if index >= visible {
            return Err(ProgressError::RevealOutOfRange {
                index,
                revealed: visible,
            });
        }
        Ok(self.resolver.resolve(round.subject(), index, records))
    }

    /// Hint values for every revealed line.
    #[instrument(skip(self, round, state, records))]
    pub fn resolve_hints_for_revealed_lines(
        &self,
        round: &Round,
        state: &GameState,
        records: &dyn RecordBook,
    ) -> Vec<HintValues> {
        let visible = state.visible_count(round.subject().stat_lines().len());
        (0..visible)
            .map(|i| self.resolver.resolve(round.subject(), i, records))
            .collect()
    }

    /// Owned and implied hints laid out per revealed line.
    #[instrument(skip(self, round, state, records))]
    pub fn hint_board(
        &self,
        round: &Round,
        state: &GameState,
        records: &dyn RecordBook,
    ) -> Vec<BoardLine> {
        let shown: Vec<(HintKind, bool)> = HintKind::all()
            .filter_map(|k| {
                if state.hints.contains(k) {
                    Some((k, false))
                } else if k.is_covered_by(&state.hints) {
                    Some((k, true))
                } else {
                    None
                }
            })
            .collect();

        self.visible_lines(round, state)
            .iter()
            .enumerate()
            .map(|(index, line)| {
                let values = self.resolver.resolve(round.subject(), index, records);
                let entries = shown
                    .iter()
                    .map(|(kind, covered)| HintEntry::new(*kind, values.value_for(*kind), *covered))
                    .collect();
                BoardLine::new(index, line.clone(), entries)
            })
            .collect()
    }

    /// Sets the non-authoritative "left the tab" annotation.
    pub fn mark_left_tab(&self, state: &GameState) -> GameState {
        GameState {
            left_tab: true,
            ..state.clone()
        }
    }

    /// Result already stored for the round, if the store can say.
    fn stored_result(&self, round: &Round) -> Option<DailyResult> {
        let store = self.store.as_ref()?;
        store
            .result_for(*round.day(), round.participant())
            .unwrap_or_else(|e| {
                warn!(error = %e, "Result lookup failed, assuming none");
                None
            })
    }

    /// Writes the final result once; failures are logged, never returned.
    fn record(
        &self,
        round: &Round,
        state: &GameState,
        final_score: u32,
    ) -> (Persistence, Option<Streak>) {
        let Some(store) = &self.store else {
            return (Persistence::Skipped, None);
        };

        let result = DailyResult::new(
            *round.day(),
            round.participant().clone(),
            state.revealed,
            final_score,
            state.hints.clone(),
            state.left_tab,
        );

        match store.record_result(&result) {
            Ok(RecordOutcome::Recorded) => {
                let streak = store
                    .advance_streak(round.participant(), *round.day())
                    .map_err(|e| warn!(error = %e, "Streak update failed"))
                    .ok();
                (Persistence::Recorded, streak)
            }
            Ok(RecordOutcome::AlreadyRecorded) => (Persistence::AlreadyRecorded, None),
            Err(e) => {
                warn!(error = %e, "Result write failed, keeping solved view");
                (Persistence::Failed, None)
            }
        }
    }
}
