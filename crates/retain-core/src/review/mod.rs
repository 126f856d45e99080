//! Review log and undo
//!
//! Every grading appends one immutable [`ReviewLogEntry`] carrying the grade
//! plus before/after snapshots of the scheduling fields. The entry is the
//! undo mechanism: single-step undo rebuilds the pre-grading card from the
//! snapshot and deletes the entry, nothing else.
//!
//! Persisting the updated card and appending the log entry is the caller's
//! job and should happen as one atomic unit, so a crash between the two can
//! never leave a card ahead of its own audit trail. Undo is only defined for
//! the most recent grading in a session and must not race a new grading of
//! the same card; callers serialize grade -> undo -> grade per card.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::card::{CardState, Grade, Queue, State};
use crate::scheduler::ScheduleResult;

// ============================================================================
// LOG ENTRY
// ============================================================================

/// Immutable audit record for one grading.
///
/// Created once at grading time; deleted only by undo (most recent entry
/// only) or by the card's own deletion cascade. Never otherwise mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewLogEntry {
    /// Unique identifier (UUID v4)
    pub id: String,
    /// The graded card
    pub card_id: String,
    /// The card's deck at grading time
    pub deck_id: String,
    /// The grade the user gave
    pub grade: Grade,
    /// When the grading happened
    pub review_time: DateTime<Utc>,

    // ========== Before / after scheduling fields ==========
    pub prev_state: State,
    pub new_state: State,
    pub prev_interval: f64,
    pub new_interval: f64,
    pub prev_ease_factor: i32,
    pub new_ease_factor: i32,
    pub prev_due: DateTime<Utc>,
    pub new_due: DateTime<Utc>,
    pub prev_stability: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_stability: Option<f64>,
    pub prev_difficulty: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_difficulty: Option<f64>,

    // ========== Remainder of the pre-grading snapshot, for exact undo ==========
    pub prev_queue: Queue,
    pub prev_reps: i32,
    pub prev_lapses: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev_last_review: Option<DateTime<Utc>>,

    /// Record creation time (equals `review_time` for live gradings)
    pub created_at: DateTime<Utc>,
}

/// Build the log entry for a grading.
///
/// `card` is the pre-grading card and `result` the scheduler output about to
/// be applied. Pure aside from drawing a fresh entry id; persistence is the
/// caller's job.
pub fn record_grading(
    card: &CardState,
    grade: Grade,
    result: &ScheduleResult,
    now: DateTime<Utc>,
) -> ReviewLogEntry {
    ReviewLogEntry {
        id: Uuid::new_v4().to_string(),
        card_id: card.id.clone(),
        deck_id: card.deck_id.clone(),
        grade,
        review_time: now,
        prev_state: card.state,
        new_state: result.state,
        prev_interval: card.interval,
        new_interval: result.interval,
        prev_ease_factor: card.ease_factor,
        new_ease_factor: result.ease_factor,
        prev_due: card.due,
        new_due: result.due,
        prev_stability: card.stability,
        new_stability: result.stability,
        prev_difficulty: card.difficulty,
        new_difficulty: result.difficulty,
        prev_queue: card.queue,
        prev_reps: card.reps,
        prev_lapses: card.lapses,
        prev_last_review: card.last_review,
        created_at: now,
    }
}

/// Reconstruct the pre-grading card from a log entry.
///
/// The inverse of applying the grading: field-for-field identical to the
/// card `record_grading` saw. The caller persists this card and deletes the
/// entry in the same atomic unit.
pub fn undo_grading(entry: &ReviewLogEntry) -> CardState {
    CardState {
        id: entry.card_id.clone(),
        deck_id: entry.deck_id.clone(),
        state: entry.prev_state,
        queue: entry.prev_queue,
        due: entry.prev_due,
        interval: entry.prev_interval,
        ease_factor: entry.prev_ease_factor,
        stability: entry.prev_stability,
        difficulty: entry.prev_difficulty,
        reps: entry.prev_reps,
        lapses: entry.prev_lapses,
        last_review: entry.prev_last_review,
    }
}

// ============================================================================
// STATISTICS
// ============================================================================

/// Aggregate review history, the way the profile page displays it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ReviewStats {
    pub total_reviews: usize,
    pub reviews_today: usize,
    pub reviews_this_week: usize,
    /// Mean grade value, rounded to 2 decimals
    pub average_rating: f64,
    /// Share of Good/Easy gradings as a percentage, rounded to 2 decimals
    pub retention_rate: f64,
}

/// Summarize a review history at `now`.
///
/// "Today" starts at UTC midnight; the week covers the 7 calendar days
/// ending today.
pub fn review_stats(logs: &[ReviewLogEntry], now: DateTime<Utc>) -> ReviewStats {
    let today_start = now
        .date_naive()
        .and_time(chrono::NaiveTime::MIN)
        .and_utc();
    let week_start = today_start - Duration::days(6);

    let total = logs.len();
    let today = logs.iter().filter(|l| l.review_time >= today_start).count();
    let week = logs.iter().filter(|l| l.review_time >= week_start).count();

    let average = if total > 0 {
        logs.iter().map(|l| f64::from(l.grade.value())).sum::<f64>() / total as f64
    } else {
        0.0
    };
    let retained = logs.iter().filter(|l| l.grade.value() >= 3).count();
    let retention = if total > 0 {
        retained as f64 / total as f64 * 100.0
    } else {
        0.0
    };

    ReviewStats {
        total_reviews: total,
        reviews_today: today,
        reviews_this_week: week,
        average_rating: (average * 100.0).round() / 100.0,
        retention_rate: (retention * 100.0).round() / 100.0,
    }
}
