//! Scheduling dispatcher
//!
//! Selects between the classical SM-2 algorithm and the stability/difficulty
//! memory model per the caller's configured [`SchedulerKind`], and normalizes
//! both result shapes into one [`ScheduleResult`].
//!
//! The dispatcher is a pure selection with no side effects. Which kind to use
//! is an explicit parameter sourced by the caller from its own settings; this
//! core has zero ambient state and never reads the clock.
//!
//! The two algorithms share no behavior, only the result shape. SM-2 never
//! computes `stability`/`difficulty`; it echoes the input card's values so a
//! user switching scheduler preference mid-deck neither zeroes nor fabricates
//! memory-model parameters. Symmetrically, the memory model carries a
//! display-only `ease_factor` it never consumes.

pub mod fsrs;
pub mod sm2;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::card::{CardState, Grade, Queue, State};
use crate::error::Result;

pub use fsrs::{FsrsParameters, PresetVersion};

// ============================================================================
// SCHEDULER KIND
// ============================================================================

/// Which scheduling algorithm to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum SchedulerKind {
    /// SM-2 fixed-formula algorithm
    #[default]
    #[serde(rename = "sm2")]
    Classical,
    /// Memory model, v4 weight preset
    #[serde(rename = "fsrs_v4")]
    MemoryModelV4,
    /// Memory model, v5 weight preset
    #[serde(rename = "fsrs_v5")]
    MemoryModelV5,
}

impl SchedulerKind {
    /// Convert to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            SchedulerKind::Classical => "sm2",
            SchedulerKind::MemoryModelV4 => "fsrs_v4",
            SchedulerKind::MemoryModelV5 => "fsrs_v5",
        }
    }

    fn fsrs_parameters(&self) -> Option<FsrsParameters> {
        match self {
            SchedulerKind::Classical => None,
            SchedulerKind::MemoryModelV4 => Some(FsrsParameters::v4()),
            SchedulerKind::MemoryModelV5 => Some(FsrsParameters::v5()),
        }
    }
}

impl std::fmt::Display for SchedulerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// SCHEDULE RESULT
// ============================================================================

/// Normalized outcome of one grading, whichever algorithm produced it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleResult {
    /// New interval in days (integer-valued under SM-2, fractional under the
    /// memory model)
    pub interval: f64,
    /// New ease factor (x1000); display-only under the memory model
    pub ease_factor: i32,
    /// New due time
    pub due: DateTime<Utc>,
    /// New lifecycle state
    pub state: State,
    /// New scheduling queue
    pub queue: Queue,
    /// New stability; `None` under SM-2, which never computes it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stability: Option<f64>,
    /// New difficulty; `None` under SM-2
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<f64>,
}

impl ScheduleResult {
    /// Derive the post-grading card from this result.
    ///
    /// Returns a fresh card; the input is untouched. `None` memory-model
    /// fields fold back to the card's prior values, so an SM-2 grading
    /// carries an FSRS history through unchanged.
    pub fn apply_to(&self, card: &CardState, grade: Grade, now: DateTime<Utc>) -> CardState {
        CardState {
            state: self.state,
            queue: self.queue,
            due: self.due,
            interval: self.interval,
            ease_factor: self.ease_factor,
            stability: self.stability.unwrap_or(card.stability),
            difficulty: self.difficulty.unwrap_or(card.difficulty),
            reps: card.reps + 1,
            lapses: card.lapses + i32::from(grade.is_lapse()),
            last_review: Some(now),
            ..card.clone()
        }
    }
}

/// Display strings for the four grade buttons
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreviewIntervals {
    pub again: String,
    pub hard: String,
    pub good: String,
    pub easy: String,
}

// ============================================================================
// DISPATCH
// ============================================================================

/// Compute the next card state for a grade under the configured scheduler.
pub fn schedule(
    card: &CardState,
    grade: Grade,
    kind: SchedulerKind,
    now: DateTime<Utc>,
) -> Result<ScheduleResult> {
    match kind.fsrs_parameters() {
        None => {
            let r = sm2::compute_next(card, grade, now)?;
            Ok(ScheduleResult {
                interval: r.interval,
                ease_factor: r.ease_factor,
                due: r.due,
                state: r.state,
                queue: r.queue,
                // Echoed, never computed: SM-2 has no memory model.
                stability: Some(card.stability),
                difficulty: Some(card.difficulty),
            })
        }
        Some(params) => {
            let r = fsrs::compute_next(card, grade, &params, now)?;
            Ok(ScheduleResult {
                interval: r.interval,
                ease_factor: r.ease_factor,
                due: r.due,
                state: r.state,
                queue: r.queue,
                stability: Some(r.stability),
                difficulty: Some(r.difficulty),
            })
        }
    }
}

/// Compute the display intervals for all four grades without grading.
///
/// Read-only: the card is not mutated and no state is recorded. SM-2 runs
/// its branch once per grade against the current card (not chained); the
/// memory model reuses its four-way projection.
pub fn preview_intervals(
    card: &CardState,
    kind: SchedulerKind,
    now: DateTime<Utc>,
) -> Result<PreviewIntervals> {
    match kind.fsrs_parameters() {
        None => {
            let branch = |grade: Grade| {
                sm2::compute_next(card, grade, now).map(|r| format_interval(r.interval, r.due, now))
            };
            Ok(PreviewIntervals {
                again: branch(Grade::Again)?,
                hard: branch(Grade::Hard)?,
                good: branch(Grade::Good)?,
                easy: branch(Grade::Easy)?,
            })
        }
        Some(params) => {
            let p = fsrs::project(card, &params, now)?;
            Ok(PreviewIntervals {
                again: format_interval(p.again.interval, p.again.due, now),
                hard: format_interval(p.hard.interval, p.hard.due, now),
                good: format_interval(p.good.interval, p.good.due, now),
                easy: format_interval(p.easy.interval, p.easy.due, now),
            })
        }
    }
}

// ============================================================================
// DISPLAY FORMATTING
// ============================================================================

/// Render an interval for a grade button.
///
/// Under one day: minutes, then hours. One day renders literally; under 30
/// days whole days; under 365 rounded months; otherwise rounded years.
pub fn format_interval(days: f64, due: DateTime<Utc>, now: DateTime<Utc>) -> String {
    if days < 1.0 {
        let minutes = ((due - now).num_seconds() as f64 / 60.0).round() as i64;
        if minutes <= 0 {
            return "now".to_string();
        }
        if minutes < 60 {
            return format!("{minutes}m");
        }
        return format!("{}h", (minutes as f64 / 60.0).round() as i64);
    }

    let whole = days.round() as i64;
    if whole == 1 {
        "1d".to_string()
    } else if days < 30.0 {
        format!("{whole}d")
    } else if days < 365.0 {
        format!("{}mo", (days / 30.0).round() as i64)
    } else {
        format!("{}y", (days / 365.0).round() as i64)
    }
}
