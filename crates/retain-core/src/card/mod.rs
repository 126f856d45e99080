//! Card State - the persisted memory record per drillable card face
//!
//! Each card carries:
//! - Lifecycle `state` and scheduling `queue` (the queue may lag the state
//!   during a lapse, e.g. a Review card sits in the learning queue while
//!   relearning)
//! - SM-2 fields: `interval` (days) and `ease_factor` (x1000 fixed point)
//! - Memory-model fields: `stability` and `difficulty`
//! - Review counters: `reps` and `lapses`
//!
//! The scheduling fields (`due`, `interval`, `ease_factor`, `stability`,
//! `difficulty`) are only ever written by the schedulers or by undo restoring
//! a prior snapshot. `reps` and `lapses` only increase except under undo.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ScheduleError;

// ============================================================================
// CONSTANTS
// ============================================================================

/// Ease factor assigned to cards that have never been graded (x1000)
pub const INITIAL_EASE_FACTOR: i32 = 2500;

/// Hard floor for the ease factor under every branch of every scheduler (x1000)
pub const MIN_EASE_FACTOR: i32 = 1300;

// ============================================================================
// LIFECYCLE STATE
// ============================================================================

/// Lifecycle stage of a card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum State {
    /// Never graded
    #[default]
    New,
    /// In the initial learning steps
    Learning,
    /// Graduated, scheduled by interval
    Review,
    /// Lapsed from review, back in short steps
    Relearning,
}

impl State {
    /// Convert to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            State::New => "new",
            State::Learning => "learning",
            State::Review => "review",
            State::Relearning => "relearning",
        }
    }

    /// Parse from string name.
    ///
    /// Unknown names default to `New` rather than failing: scheduling must
    /// never fail closed on a card that reaches us with a foreign state tag.
    pub fn parse_name(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "new" => State::New,
            "learning" => State::Learning,
            "review" => State::Review,
            "relearning" => State::Relearning,
            other => {
                tracing::warn!(state = other, "unknown card state, defaulting to new");
                State::New
            }
        }
    }

    /// True for the short-step states (Learning and Relearning).
    #[inline]
    pub fn is_learning(&self) -> bool {
        matches!(self, State::Learning | State::Relearning)
    }
}

impl std::fmt::Display for State {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// SCHEDULING QUEUE
// ============================================================================

/// Scheduling bucket of a card, distinct from its lifecycle [`State`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Queue {
    /// Waiting for first study
    #[default]
    New,
    /// Short-step queue (covers both Learning and Relearning states)
    Learning,
    /// Interval-scheduled queue
    Review,
    /// Excluded from study entirely
    Suspended,
}

impl Queue {
    /// Convert to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Queue::New => "new",
            Queue::Learning => "learning",
            Queue::Review => "review",
            Queue::Suspended => "suspended",
        }
    }

    /// The queue a card lands in for a given resulting state.
    pub fn for_state(state: State) -> Self {
        match state {
            State::New => Queue::New,
            State::Review => Queue::Review,
            State::Learning | State::Relearning => Queue::Learning,
        }
    }
}

impl std::fmt::Display for Queue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// GRADE
// ============================================================================

/// User's self-reported recall quality for a card.
///
/// Ordered by increasing recall confidence; the schedulers branch on the
/// ordinal position, not the label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Grade {
    /// Forgot entirely
    Again = 1,
    /// Recalled with significant effort
    Hard = 2,
    /// Recalled correctly
    Good = 3,
    /// Recalled instantly
    Easy = 4,
}

impl Grade {
    /// All grades in ascending confidence order.
    pub const ALL: [Grade; 4] = [Grade::Again, Grade::Hard, Grade::Good, Grade::Easy];

    /// Numeric value (1-4) as persisted by the review log.
    #[inline]
    pub fn value(&self) -> u8 {
        *self as u8
    }

    /// A lapse is a grading where the user signalled forgetting.
    #[inline]
    pub fn is_lapse(&self) -> bool {
        matches!(self, Grade::Again)
    }

    /// Convert to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Grade::Again => "again",
            Grade::Hard => "hard",
            Grade::Good => "good",
            Grade::Easy => "easy",
        }
    }
}

impl TryFrom<u8> for Grade {
    type Error = ScheduleError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Grade::Again),
            2 => Ok(Grade::Hard),
            3 => Ok(Grade::Good),
            4 => Ok(Grade::Easy),
            other => Err(ScheduleError::InvalidArgument(format!(
                "grade must be 1-4, got {other}"
            ))),
        }
    }
}

impl std::fmt::Display for Grade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// CARD STATE
// ============================================================================

/// The persisted memory record for one drillable card face.
///
/// Consumed and produced by both scheduling algorithms; the schedulers never
/// mutate a card in place, they always return a fresh value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardState {
    /// Unique identifier
    pub id: String,
    /// Owning deck
    pub deck_id: String,
    /// Lifecycle stage
    pub state: State,
    /// Scheduling bucket
    pub queue: Queue,
    /// When the card becomes eligible for study. For New cards this is a
    /// nominal marker, not used for ordering.
    pub due: DateTime<Utc>,
    /// Last scheduled interval in days. Integer-valued under SM-2,
    /// fractional under the memory model.
    pub interval: f64,
    /// SM-2 difficulty multiplier, x1000 fixed point
    pub ease_factor: i32,
    /// Memory-model stability (days until retrievability drops to 90%)
    pub stability: f64,
    /// Memory-model difficulty (1.0 easy - 10.0 hard; 0 = never computed)
    pub difficulty: f64,
    /// Completed gradings
    pub reps: i32,
    /// Gradings where the grade signalled forgetting
    pub lapses: i32,
    /// Most recent grading time, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_review: Option<DateTime<Utc>>,
}

impl CardState {
    /// Create a brand-new card in the given deck.
    pub fn new(id: impl Into<String>, deck_id: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            deck_id: deck_id.into(),
            state: State::New,
            queue: Queue::New,
            due: now,
            interval: 0.0,
            ease_factor: INITIAL_EASE_FACTOR,
            stability: 0.0,
            difficulty: 0.0,
            reps: 0,
            lapses: 0,
            last_review: None,
        }
    }
}
