//! # State tags
//!
//! A [`StateTag`] names a behaviour the robot can be put into. The [`Family`] decides which entry
//! action is performed, the optional discriminator lets a strategy tell apart several states of
//! the same family (for example two different `Forward` legs of a route) without any parsing.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt::Display, time::Instant};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// A state which can be entered by the [`super::StateMgr`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StateTag {
    pub family: Family,

    /// Free-form label distinguishing states of the same family.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discriminator: Option<String>,
}

/// The currently active state together with when it was entered.
///
/// The tag and timestamps are only ever replaced together, by constructing a new value.
#[derive(Debug, Clone)]
pub(crate) struct ActiveState {
    pub tag: StateTag,

    /// Incremented on every entry, including re-entry of an identical tag.
    pub generation: u64,

    pub entered_at: Instant,

    pub entered_at_utc: DateTime<Utc>,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// Base behaviour of a state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Family {
    /// Motors stopped
    Idle,
    /// Drive forwards until the next state
    Forward,
    /// Drive backwards until the next state
    Backward,
    /// Rotate counterclockwise on the spot
    RotateLeft,
    /// Rotate clockwise on the spot
    RotateRight,
    /// Application defined state with no entry action
    Ext,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl StateTag {
    pub fn new(family: Family) -> Self {
        Self {
            family,
            discriminator: None,
        }
    }

    pub fn idle() -> Self {
        Self::new(Family::Idle)
    }

    pub fn forward() -> Self {
        Self::new(Family::Forward)
    }

    pub fn backward() -> Self {
        Self::new(Family::Backward)
    }

    pub fn rotate_left() -> Self {
        Self::new(Family::RotateLeft)
    }

    pub fn rotate_right() -> Self {
        Self::new(Family::RotateRight)
    }

    /// An application defined state, identified by `name`.
    pub fn ext<S: Into<String>>(name: S) -> Self {
        Self::new(Family::Ext).with_discriminator(name)
    }

    pub fn with_discriminator<S: Into<String>>(mut self, discriminator: S) -> Self {
        self.discriminator = Some(discriminator.into());
        self
    }
}

impl Display for StateTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.discriminator {
            Some(ref d) => write!(f, "{}({})", self.family, d),
            None => write!(f, "{}", self.family),
        }
    }
}

impl Display for Family {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Family::Idle => write!(f, "Idle"),
            Family::Forward => write!(f, "Forward"),
            Family::Backward => write!(f, "Backward"),
            Family::RotateLeft => write!(f, "RotateLeft"),
            Family::RotateRight => write!(f, "RotateRight"),
            Family::Ext => write!(f, "Ext"),
        }
    }
}

impl ActiveState {
    pub fn new(tag: StateTag, generation: u64) -> Self {
        Self {
            tag,
            generation,
            entered_at: Instant::now(),
            entered_at_utc: Utc::now(),
        }
    }
}
