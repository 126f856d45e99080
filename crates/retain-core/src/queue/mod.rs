//! Due-card selection - building the study queue
//!
//! A pure pass over a snapshot of non-deleted cards (soft-delete filtering is
//! the persistence layer's job upstream). Eligibility:
//!
//! - New cards are always eligible, subject to the daily new-card cap
//! - Learning/Relearning/Review cards are eligible once `due <= now`
//! - Suspended-queue cards are never eligible, whatever their state
//!
//! Ordering is by priority (Learning/Relearning first, then New, then
//! Review), ascending `due` within a priority, and stable: equal keys keep
//! their input order. The `limit` truncation happens after the sort, so a
//! large backlog surfaces the most overdue cards rather than the first ones
//! scanned.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::card::{CardState, Queue, State};

// ============================================================================
// FILTER
// ============================================================================

/// Which decks a queue build looks at
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DeckScope {
    /// Every deck
    #[default]
    All,
    /// A single deck
    Deck(String),
    /// An explicit set of decks
    Decks(Vec<String>),
}

impl DeckScope {
    /// Does the scope include this deck?
    pub fn contains(&self, deck_id: &str) -> bool {
        match self {
            DeckScope::All => true,
            DeckScope::Deck(id) => id == deck_id,
            DeckScope::Decks(ids) => ids.iter().any(|id| id == deck_id),
        }
    }
}

/// Per-day study caps, from user settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyLimits {
    /// Daily cap on new cards entering the queue
    pub new_cards_per_day: usize,
    /// Daily cap on due review cards
    pub max_reviews_per_day: usize,
}

impl Default for StudyLimits {
    fn default() -> Self {
        Self {
            new_cards_per_day: 20,
            max_reviews_per_day: 200,
        }
    }
}

/// Parameters for one queue build
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DueFilter {
    /// Deck scoping
    pub scope: DeckScope,
    /// Queue size ceiling, applied after sorting
    pub limit: usize,
    /// Whether the daily new-card cap applies
    pub apply_new_card_limit: bool,
    /// The daily caps themselves
    pub limits: StudyLimits,
}

impl Default for DueFilter {
    fn default() -> Self {
        Self {
            scope: DeckScope::All,
            limit: 100,
            apply_new_card_limit: true,
            limits: StudyLimits::default(),
        }
    }
}

// ============================================================================
// SELECTION
// ============================================================================

/// Study-queue priority: learning steps first, then new, then review.
#[inline]
fn priority(state: State) -> u8 {
    match state {
        State::Learning | State::Relearning => 0,
        State::New => 1,
        State::Review => 2,
    }
}

/// Build the ordered study queue for `now` from a card snapshot.
///
/// Returns owned copies; the input slice is untouched. An empty input is an
/// empty queue, not an error.
pub fn select_due_cards(
    cards: &[CardState],
    filter: &DueFilter,
    now: DateTime<Utc>,
) -> Vec<CardState> {
    let mut new_cards: Vec<&CardState> = Vec::new();
    let mut learning_cards: Vec<&CardState> = Vec::new();
    let mut review_cards: Vec<&CardState> = Vec::new();

    for card in cards {
        if card.queue == Queue::Suspended || !filter.scope.contains(&card.deck_id) {
            continue;
        }
        match card.state {
            State::New => new_cards.push(card),
            State::Learning | State::Relearning => {
                if card.due <= now {
                    learning_cards.push(card);
                }
            }
            State::Review => {
                if card.due <= now {
                    review_cards.push(card);
                }
            }
        }
    }

    // Daily caps apply per bucket before the merge. New cards are capped in
    // input order (their due is a nominal marker); reviews are capped by
    // due-ness so a backlog over the cap sheds its least overdue cards.
    if filter.apply_new_card_limit {
        new_cards.truncate(filter.limits.new_cards_per_day);
    }
    review_cards.sort_by(|a, b| a.due.cmp(&b.due));
    review_cards.truncate(filter.limits.max_reviews_per_day);

    let mut due: Vec<&CardState> = learning_cards;
    due.extend(new_cards);
    due.extend(review_cards);

    // Stable sort: equal priority and equal due keep their input order.
    due.sort_by(|a, b| {
        priority(a.state)
            .cmp(&priority(b.state))
            .then(a.due.cmp(&b.due))
    });
    due.truncate(filter.limit);

    tracing::debug!(queued = due.len(), total = cards.len(), "built study queue");
    due.into_iter().cloned().collect()
}

// ============================================================================
// STATISTICS
// ============================================================================

/// Card counts per scheduling bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct QueueStats {
    pub total: usize,
    pub new: usize,
    /// Learning plus relearning
    pub learning: usize,
    /// Review cards already due
    pub review_due: usize,
    pub suspended: usize,
}

/// Count cards per bucket, the way the deck overview displays them.
pub fn queue_stats(cards: &[CardState], now: DateTime<Utc>) -> QueueStats {
    QueueStats {
        total: cards.len(),
        new: cards.iter().filter(|c| c.state == State::New).count(),
        learning: cards.iter().filter(|c| c.state.is_learning()).count(),
        review_due: cards
            .iter()
            .filter(|c| c.state == State::Review && c.due <= now)
            .count(),
        suspended: cards.iter().filter(|c| c.queue == Queue::Suspended).count(),
    }
}
