//! SM-2 scheduler - the classical fixed-formula algorithm
//!
//! SuperMemo-2 as the original Anki lineage ships it: an ease factor kept in
//! x1000 fixed point, short fixed learning steps, and multiplicative interval
//! growth for graduated cards. Grading Again is a hard reset regardless of
//! how mature the card was: the same ease penalty, the same ten-minute
//! re-study, every time.

use chrono::{DateTime, Duration, Utc};

use crate::card::{CardState, Grade, Queue, State, INITIAL_EASE_FACTOR, MIN_EASE_FACTOR};
use crate::error::{Result, ScheduleError};

// ============================================================================
// CONSTANTS
// ============================================================================

/// Ease penalty for a lapse (x1000)
pub const AGAIN_EASE_PENALTY: i32 = 200;

/// Ease adjustment for Hard (review branch) and bonus for Easy (x1000)
pub const EASE_STEP: i32 = 150;

/// Interval multiplier for Hard in the review branch
pub const HARD_INTERVAL_FACTOR: f64 = 1.2;

/// Extra interval multiplier for Easy in the review branch
pub const EASY_BONUS: f64 = 1.3;

/// Interval ceiling in days; applies to the review branch only, never to the
/// fixed graduation intervals
pub const MAX_INTERVAL_DAYS: f64 = 365.0;

/// Re-study delay after a lapse
const AGAIN_STEP_MINUTES: i64 = 10;

/// Learning step for Hard on an ungraduated card
const HARD_STEP_MINUTES: i64 = 5;

/// Graduation interval for Good, in days
const GRADUATING_INTERVAL_DAYS: f64 = 1.0;

/// Graduation interval for Easy, in days
const EASY_INTERVAL_DAYS: f64 = 4.0;

// ============================================================================
// RESULT
// ============================================================================

/// Outcome of one SM-2 scheduling step
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Sm2Result {
    pub interval: f64,
    pub ease_factor: i32,
    pub due: DateTime<Utc>,
    pub state: State,
    pub queue: Queue,
}

// ============================================================================
// SCHEDULING
// ============================================================================

/// Compute the next SM-2 state for a card given a grade.
///
/// Pure: never touches the input card, never reads the clock. All the
/// "minute" and "day" offsets are wall-clock offsets from `now`, not
/// calendar-day boundaries.
pub(crate) fn compute_next(card: &CardState, grade: Grade, now: DateTime<Utc>) -> Result<Sm2Result> {
    validate(card)?;

    // An ease of zero means the card predates grading; treat as unset.
    let ease = if card.ease_factor == 0 {
        INITIAL_EASE_FACTOR
    } else {
        card.ease_factor
    };

    if grade == Grade::Again {
        // Hard reset, independent of prior state or maturity.
        return Ok(Sm2Result {
            interval: 0.0,
            ease_factor: (ease - AGAIN_EASE_PENALTY).max(MIN_EASE_FACTOR),
            due: now + Duration::minutes(AGAIN_STEP_MINUTES),
            state: State::Relearning,
            queue: Queue::Learning,
        });
    }

    if card.state == State::New || card.state == State::Relearning {
        return Ok(match grade {
            Grade::Hard => Sm2Result {
                interval: 0.0,
                ease_factor: ease,
                due: now + Duration::minutes(HARD_STEP_MINUTES),
                state: State::Learning,
                queue: Queue::Learning,
            },
            Grade::Good => Sm2Result {
                interval: GRADUATING_INTERVAL_DAYS,
                ease_factor: ease,
                due: now + Duration::days(1),
                state: State::Review,
                queue: Queue::Review,
            },
            _ => Sm2Result {
                interval: EASY_INTERVAL_DAYS,
                ease_factor: ease + EASE_STEP,
                due: now + Duration::days(4),
                state: State::Review,
                queue: Queue::Review,
            },
        });
    }

    // Review (and Learning) branch: adjust ease first, then grow the
    // previous interval.
    let ease = match grade {
        Grade::Hard => ease - EASE_STEP,
        Grade::Easy => ease + EASE_STEP,
        _ => ease,
    }
    .max(MIN_EASE_FACTOR);

    let interval = match grade {
        Grade::Hard => (card.interval * HARD_INTERVAL_FACTOR).round().max(1.0),
        Grade::Good => (card.interval * f64::from(ease) / 1000.0).round().max(1.0),
        _ => (card.interval * f64::from(ease) / 1000.0 * EASY_BONUS)
            .round()
            .max(1.0),
    }
    .min(MAX_INTERVAL_DAYS);

    Ok(Sm2Result {
        interval,
        ease_factor: ease,
        due: now + Duration::milliseconds((interval * 86_400_000.0) as i64),
        state: State::Review,
        queue: Queue::Review,
    })
}

fn validate(card: &CardState) -> Result<()> {
    if card.interval < 0.0 {
        return Err(ScheduleError::CorruptState(format!(
            "card {} has negative interval {}",
            card.id, card.interval
        )));
    }
    if card.ease_factor < 0 {
        return Err(ScheduleError::CorruptState(format!(
            "card {} has negative ease factor {}",
            card.id, card.ease_factor
        )));
    }
    Ok(())
}
