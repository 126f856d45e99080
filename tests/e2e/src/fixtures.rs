//! Card fixtures
//!
//! Deterministic card factories used across the journey tests. All fixtures
//! anchor to a fixed epoch so asserted timestamps are exact.

use chrono::{DateTime, Duration, TimeZone, Utc};
use retain_core::{CardState, Queue, State};

/// Fixed "now" for deterministic journeys.
pub fn epoch() -> DateTime<Utc> {
    Utc.timestamp_millis_opt(1_700_000_000_000).unwrap()
}

/// A brand-new card in the given deck.
pub fn new_card(id: &str, deck_id: &str) -> CardState {
    CardState::new(id, deck_id, epoch())
}

/// A graduated review card, due `overdue_hours` before the epoch.
pub fn due_review_card(id: &str, deck_id: &str, interval: f64, overdue_hours: i64) -> CardState {
    let now = epoch();
    let mut card = CardState::new(id, deck_id, now);
    card.state = State::Review;
    card.queue = Queue::Review;
    card.interval = interval;
    card.stability = interval;
    card.difficulty = 5.0;
    card.reps = 3;
    card.last_review = Some(now - Duration::days(interval as i64));
    card.due = now - Duration::hours(overdue_hours);
    card
}

/// A relearning card that is already due.
pub fn lapsed_card(id: &str, deck_id: &str) -> CardState {
    let now = epoch();
    let mut card = CardState::new(id, deck_id, now);
    card.state = State::Relearning;
    card.queue = Queue::Learning;
    card.ease_factor = 2100;
    card.reps = 5;
    card.lapses = 1;
    card.last_review = Some(now - Duration::minutes(10));
    card.due = now - Duration::minutes(1);
    card
}
