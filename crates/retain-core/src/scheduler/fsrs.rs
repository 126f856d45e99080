//! Memory-model scheduler (FSRS lineage)
//!
//! Stability/difficulty forgetting-curve model with two selectable weight
//! presets:
//!
//! - **v4**: 17 weights, linear initial difficulty, no short-term term
//! - **v5**: 19 weights, exponential initial difficulty, short-term
//!   stability term `S * e^(w17 * (g - 3 + w18))` for same-day learning steps
//!
//! ## Core formulas
//!
//! - Retrievability: `R = (1 + FACTOR * t / S)^DECAY`
//! - Interval: `t = S / FACTOR * (R^(1/DECAY) - 1)` — at the default 90%
//!   desired retention this collapses to `t = S`
//!
//! Every projection computes candidates for all four grades at once: the
//! grade-button previews need the branches the user did not take.
//!
//! The model also emits a legacy `ease_factor` derived from difficulty,
//! `round(2500 * (1 - d/10))`. That value exists for display continuity with
//! the SM-2 field and is never fed back into the recurrence.

use chrono::{DateTime, Duration, Utc};

use crate::card::{CardState, Grade, Queue, State};
use crate::error::{Result, ScheduleError};

// ============================================================================
// CONSTANTS
// ============================================================================

/// Forgetting-curve decay exponent
pub const DECAY: f64 = -0.5;

/// Forgetting-curve factor, chosen so R(S, S) = 0.9
pub const FACTOR: f64 = 19.0 / 81.0;

/// Default target retrievability at review time
pub const DEFAULT_RETENTION: f64 = 0.9;

/// Stability floor in days
pub const MIN_STABILITY: f64 = 0.1;

/// Difficulty bounds (1.0 = easy, 10.0 = hard)
pub const MIN_DIFFICULTY: f64 = 1.0;
/// Upper difficulty bound
pub const MAX_DIFFICULTY: f64 = 10.0;

/// Interval ceiling in days (100 years)
pub const MAX_INTERVAL_DAYS: f64 = 36_500.0;

/// v4 preset weights (17 used, padded to 19)
pub const V4_WEIGHTS: [f64; 19] = [
    0.4872, 1.4003, 3.7145, 13.8206, // w0-w3: initial stability per grade
    5.1618, 1.2298, 0.8975, 0.031, 1.6474, // w4-w8: difficulty / recall stability
    0.1367, 1.0461, 2.1072, 0.0793, 0.3246, // w9-w13
    1.587, 0.2272, 2.8755, // w14-w16: forget decay, hard penalty, easy bonus
    0.0, 0.0, // unused in v4
];

/// v5 preset weights (19)
pub const V5_WEIGHTS: [f64; 19] = [
    0.40255, 1.18385, 3.173, 15.69105, // w0-w3: initial stability per grade
    7.1949, 0.5345, 1.4604, 0.0046, 1.54575, // w4-w8
    0.1192, 1.01925, 1.9395, 0.11, 0.29605, // w9-w13
    2.2698, 0.2315, 2.9898, // w14-w16
    0.51655, 0.6621, // w17-w18: short-term stability
];

// Learning-step delays, mirroring the app's short-term scheduling
const NEW_AGAIN_STEP_MINUTES: i64 = 1;
const AGAIN_STEP_MINUTES: i64 = 5;
const NEW_HARD_STEP_MINUTES: i64 = 5;
const NEW_GOOD_STEP_MINUTES: i64 = 10;
const LEARNING_HARD_STEP_MINUTES: i64 = 10;

const MINUTES_PER_DAY: f64 = 1440.0;

// ============================================================================
// PARAMETERS
// ============================================================================

/// Which weight preset drives the recurrence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresetVersion {
    /// 17-weight preset
    V4,
    /// 19-weight preset with short-term stability
    V5,
}

/// Full parameter set for the memory model
#[derive(Debug, Clone)]
pub struct FsrsParameters {
    /// Preset selecting the recurrence variant
    pub version: PresetVersion,
    /// Model weights
    pub weights: [f64; 19],
    /// Target retrievability at review time
    pub desired_retention: f64,
}

impl FsrsParameters {
    /// The v4 preset with default weights.
    pub fn v4() -> Self {
        Self {
            version: PresetVersion::V4,
            weights: V4_WEIGHTS,
            desired_retention: DEFAULT_RETENTION,
        }
    }

    /// The v5 preset with default weights.
    pub fn v5() -> Self {
        Self {
            version: PresetVersion::V5,
            weights: V5_WEIGHTS,
            desired_retention: DEFAULT_RETENTION,
        }
    }
}

// ============================================================================
// RESULT TYPES
// ============================================================================

/// Outcome of one memory-model scheduling step
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct FsrsResult {
    /// New interval in fractional days, never rounded
    pub interval: f64,
    pub stability: f64,
    pub difficulty: f64,
    pub due: DateTime<Utc>,
    pub state: State,
    pub queue: Queue,
    /// SM-2-compatible display value derived from difficulty; cosmetic only
    pub ease_factor: i32,
}

/// Candidates for all four grades, computed in one projection
#[derive(Debug, Clone)]
pub(crate) struct FsrsProjection {
    pub again: FsrsResult,
    pub hard: FsrsResult,
    pub good: FsrsResult,
    pub easy: FsrsResult,
}

impl FsrsProjection {
    pub fn select(&self, grade: Grade) -> &FsrsResult {
        match grade {
            Grade::Again => &self.again,
            Grade::Hard => &self.hard,
            Grade::Good => &self.good,
            Grade::Easy => &self.easy,
        }
    }
}

// ============================================================================
// INTERNAL CARD
// ============================================================================

/// Internal representation the recurrence runs over
#[derive(Debug, Clone)]
struct MemoryCard {
    stability: f64,
    difficulty: f64,
    state: State,
    last_review: Option<DateTime<Utc>>,
}

impl MemoryCard {
    /// Map a persisted card into the model's view of it.
    ///
    /// New cards map to the canonical empty card. A graded card whose
    /// stability was never computed (it only ever met the SM-2 scheduler)
    /// is treated as new to the model: its memory parameters are seeded
    /// from this grading rather than re-derived from the ease factor.
    fn from_card(card: &CardState) -> Self {
        if card.state == State::New || card.stability <= 0.0 {
            return Self {
                stability: 0.0,
                difficulty: 0.0,
                state: card.state,
                last_review: card.last_review,
            };
        }
        Self {
            stability: card.stability,
            difficulty: card.difficulty.clamp(MIN_DIFFICULTY, MAX_DIFFICULTY),
            state: card.state,
            last_review: card.last_review,
        }
    }

    fn is_seeding(&self) -> bool {
        self.stability <= 0.0
    }
}

// ============================================================================
// PROJECTION
// ============================================================================

/// Project all four grade outcomes for a card at `now`.
pub(crate) fn project(
    card: &CardState,
    params: &FsrsParameters,
    now: DateTime<Utc>,
) -> Result<FsrsProjection> {
    validate(card)?;
    let memory = MemoryCard::from_card(card);

    // Scheduling is always computed relative to now; the elapsed time is
    // what the last recorded grading says it is.
    let elapsed_days = memory
        .last_review
        .map(|last| ((now - last).num_milliseconds() as f64 / 86_400_000.0).max(0.0))
        .unwrap_or(0.0);

    Ok(FsrsProjection {
        again: project_one(&memory, Grade::Again, params, now, elapsed_days),
        hard: project_one(&memory, Grade::Hard, params, now, elapsed_days),
        good: project_one(&memory, Grade::Good, params, now, elapsed_days),
        easy: project_one(&memory, Grade::Easy, params, now, elapsed_days),
    })
}

/// Compute the next memory-model state for a card given a grade.
pub(crate) fn compute_next(
    card: &CardState,
    grade: Grade,
    params: &FsrsParameters,
    now: DateTime<Utc>,
) -> Result<FsrsResult> {
    Ok(project(card, params, now)?.select(grade).clone())
}

fn project_one(
    memory: &MemoryCard,
    grade: Grade,
    params: &FsrsParameters,
    now: DateTime<Utc>,
    elapsed_days: f64,
) -> FsrsResult {
    let w = &params.weights;

    let (stability, difficulty) = if memory.is_seeding() {
        (
            initial_stability(w, grade),
            initial_difficulty(params, grade),
        )
    } else if memory.state.is_learning() && elapsed_days < 1.0 {
        // Same-day learning step
        let d = next_difficulty(params, memory.difficulty, grade);
        let s = match params.version {
            PresetVersion::V5 => short_term_stability(w, memory.stability, grade),
            PresetVersion::V4 => {
                let r = retrievability(elapsed_days, memory.stability);
                if grade == Grade::Again {
                    next_forget_stability(w, memory.difficulty, memory.stability, r)
                } else {
                    next_recall_stability(w, memory.difficulty, memory.stability, r, grade)
                }
            }
        };
        (s, d)
    } else {
        let r = retrievability(elapsed_days, memory.stability);
        let d = next_difficulty(params, memory.difficulty, grade);
        let s = if grade == Grade::Again {
            next_forget_stability(w, memory.difficulty, memory.stability, r)
        } else {
            next_recall_stability(w, memory.difficulty, memory.stability, r, grade)
        };
        (s, d)
    };

    // Discrete state machine. Again always lands in Relearning, never
    // straight back to Review, and a brand-new Again is no exception.
    let (state, step_minutes) = match (memory.state, grade) {
        (State::New, Grade::Again) => (State::Relearning, Some(NEW_AGAIN_STEP_MINUTES)),
        (_, Grade::Again) => (State::Relearning, Some(AGAIN_STEP_MINUTES)),
        (State::New, Grade::Hard) => (State::Learning, Some(NEW_HARD_STEP_MINUTES)),
        (State::New, Grade::Good) => (State::Learning, Some(NEW_GOOD_STEP_MINUTES)),
        (State::Learning | State::Relearning, Grade::Hard) => {
            (memory.state, Some(LEARNING_HARD_STEP_MINUTES))
        }
        // Easy from anywhere, Good/Easy out of the learning steps, and
        // every non-Again review grade graduate to Review.
        _ => (State::Review, None),
    };

    let (interval, due) = match step_minutes {
        Some(minutes) => (
            minutes as f64 / MINUTES_PER_DAY,
            now + Duration::minutes(minutes),
        ),
        None => {
            let days = next_interval(stability, params.desired_retention);
            (
                days,
                now + Duration::milliseconds((days * 86_400_000.0).round() as i64),
            )
        }
    };

    FsrsResult {
        interval,
        stability,
        difficulty,
        due,
        state,
        queue: Queue::for_state(state),
        ease_factor: legacy_ease_factor(difficulty),
    }
}

fn validate(card: &CardState) -> Result<()> {
    if !card.interval.is_finite() || card.interval < 0.0 {
        return Err(ScheduleError::CorruptState(format!(
            "card {} has invalid interval {}",
            card.id, card.interval
        )));
    }
    if !card.stability.is_finite() || card.stability < 0.0 {
        return Err(ScheduleError::CorruptState(format!(
            "card {} has invalid stability {}",
            card.id, card.stability
        )));
    }
    if !card.difficulty.is_finite() || card.difficulty < 0.0 {
        return Err(ScheduleError::CorruptState(format!(
            "card {} has invalid difficulty {}",
            card.id, card.difficulty
        )));
    }
    Ok(())
}

// ============================================================================
// RECURRENCE
// ============================================================================

/// Probability of recall after `elapsed_days` at the given stability.
pub fn retrievability(elapsed_days: f64, stability: f64) -> f64 {
    if stability <= 0.0 {
        return 0.0;
    }
    (1.0 + FACTOR * elapsed_days.max(0.0) / stability).powf(DECAY)
}

/// Interval (fractional days) at which retrievability falls to `retention`.
pub fn next_interval(stability: f64, retention: f64) -> f64 {
    let retention = retention.clamp(0.0001, 0.9999);
    let interval = stability / FACTOR * (retention.powf(1.0 / DECAY) - 1.0);
    interval.clamp(1.0, MAX_INTERVAL_DAYS)
}

fn initial_stability(w: &[f64; 19], grade: Grade) -> f64 {
    w[(grade.value() - 1) as usize].max(MIN_STABILITY)
}

fn initial_difficulty(params: &FsrsParameters, grade: Grade) -> f64 {
    let w = &params.weights;
    let g = f64::from(grade.value());
    let d = match params.version {
        PresetVersion::V4 => w[4] - (g - 3.0) * w[5],
        PresetVersion::V5 => w[4] - (w[5] * (g - 1.0)).exp() + 1.0,
    };
    d.clamp(MIN_DIFFICULTY, MAX_DIFFICULTY)
}

fn next_difficulty(params: &FsrsParameters, d: f64, grade: Grade) -> f64 {
    let w = &params.weights;
    let g = f64::from(grade.value());
    let shifted = match params.version {
        PresetVersion::V4 => d - w[6] * (g - 3.0),
        // Linear damping: the same grade moves an easy card further than a
        // hard one.
        PresetVersion::V5 => d - w[6] * (g - 3.0) * (MAX_DIFFICULTY - d) / 9.0,
    };
    // Mean reversion toward the difficulty a first Easy would get.
    let target = initial_difficulty(params, Grade::Easy);
    (w[7] * target + (1.0 - w[7]) * shifted).clamp(MIN_DIFFICULTY, MAX_DIFFICULTY)
}

fn next_recall_stability(w: &[f64; 19], d: f64, s: f64, r: f64, grade: Grade) -> f64 {
    let hard_penalty = if grade == Grade::Hard { w[15] } else { 1.0 };
    let easy_bonus = if grade == Grade::Easy { w[16] } else { 1.0 };
    let grown = s
        * (1.0
            + w[8].exp()
                * (11.0 - d)
                * s.powf(-w[9])
                * (((1.0 - r) * w[10]).exp_m1())
                * hard_penalty
                * easy_bonus);
    grown.max(MIN_STABILITY)
}

fn next_forget_stability(w: &[f64; 19], d: f64, s: f64, r: f64) -> f64 {
    let fallen = w[11] * d.powf(-w[12]) * ((s + 1.0).powf(w[13]) - 1.0) * ((1.0 - r) * w[14]).exp();
    fallen.clamp(MIN_STABILITY, s)
}

fn short_term_stability(w: &[f64; 19], s: f64, grade: Grade) -> f64 {
    let g = f64::from(grade.value());
    (s * (w[17] * (g - 3.0 + w[18])).exp()).max(MIN_STABILITY)
}

/// SM-2-compatible ease factor derived from difficulty, for display only.
pub fn legacy_ease_factor(difficulty: f64) -> i32 {
    (2500.0 * (1.0 - difficulty / 10.0)).round() as i32
}
