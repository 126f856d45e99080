//! # Retain Core
//!
//! The review scheduling engine behind the Retain flashcard app:
//!
//! - **SM-2**: classical fixed-formula interval/ease scheduling
//! - **Memory model**: FSRS-style stability/difficulty scheduling with two
//!   selectable weight presets (v4 / v5)
//! - **Dispatcher**: per-user algorithm selection normalized into one result
//!   shape, plus grade-button interval previews
//! - **Due queue**: eligibility, priority ordering, and daily caps for the
//!   study session
//! - **Review log**: append-only grading audit with single-step undo
//!
//! Everything here is pure computation: `now` is always an explicit
//! parameter, inputs are never mutated, and persistence belongs to the
//! caller. The only write contract is that the updated card and its log
//! entry must be persisted as one atomic unit.
//!
//! ## Quick Start
//!
//! ```rust
//! use chrono::Utc;
//! use retain_core::{
//!     record_grading, schedule, select_due_cards, undo_grading, CardState, DueFilter, Grade,
//!     SchedulerKind,
//! };
//!
//! let now = Utc::now();
//! let cards = vec![CardState::new("card-1", "deck-1", now)];
//!
//! // Build the study queue
//! let queue = select_due_cards(&cards, &DueFilter::default(), now);
//!
//! // Grade the active card
//! let card = &queue[0];
//! let result = schedule(card, Grade::Good, SchedulerKind::Classical, now).unwrap();
//! let entry = record_grading(card, Grade::Good, &result, now);
//! let updated = result.apply_to(card, Grade::Good, now);
//!
//! // ...persist `updated` + `entry` atomically, or take it all back:
//! assert_eq!(undo_grading(&entry), *card);
//! assert!(updated.reps > card.reps);
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
// Only warn about missing docs for public items exported from the crate root
// Internal struct fields and enum variants don't need documentation
#![warn(rustdoc::missing_crate_level_docs)]

// ============================================================================
// MODULES
// ============================================================================

pub mod card;
pub mod error;
pub mod queue;
pub mod review;
pub mod scheduler;

// ============================================================================
// PUBLIC API RE-EXPORTS
// ============================================================================

// Card model
pub use card::{CardState, Grade, Queue, State, INITIAL_EASE_FACTOR, MIN_EASE_FACTOR};

// Scheduling
pub use scheduler::{
    fsrs::{
        legacy_ease_factor, next_interval,
        // Core functions for advanced usage
        retrievability,
        DEFAULT_RETENTION, MAX_DIFFICULTY, MIN_DIFFICULTY, MIN_STABILITY, V4_WEIGHTS, V5_WEIGHTS,
    },
    format_interval, preview_intervals, schedule, FsrsParameters, PresetVersion, PreviewIntervals,
    ScheduleResult, SchedulerKind,
};

// Due-card selection
pub use queue::{queue_stats, select_due_cards, DeckScope, DueFilter, QueueStats, StudyLimits};

// Review log / undo
pub use review::{record_grading, review_stats, undo_grading, ReviewLogEntry, ReviewStats};

// Errors
pub use error::{Result, ScheduleError};

// ============================================================================
// VERSION INFO
// ============================================================================

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// PRELUDE
// ============================================================================

/// Convenient imports for common usage
pub mod prelude {
    pub use crate::{
        preview_intervals, record_grading, schedule, select_due_cards, undo_grading, CardState,
        DeckScope, DueFilter, Grade, PreviewIntervals, Queue, Result, ReviewLogEntry,
        ScheduleError, ScheduleResult, SchedulerKind, State, StudyLimits,
    };
}
