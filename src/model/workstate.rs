//! Workstate types: the persisted record of an in-progress cooking session.

use std::fmt;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{CookingConstraints, Intent, Timer};

/// Session-scoped state for one cook.
///
/// Everything that only makes sense while cooking (step index, timers,
/// scale, constraints) lives inside `session`, so an idle workstate
/// cannot carry a stale step index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CookingWorkstate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session: Option<CookingSession>,

    /// The last classified intent, for resolving follow-up utterances.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_intent: Option<Intent>,

    pub updated_at: Timestamp,
}

/// An active cooking session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CookingSession {
    pub recipe_id: Uuid,

    /// Number of steps in the recipe, captured at start.
    pub step_count: usize,

    /// 0-based, always `< step_count`.
    pub current_step: usize,

    /// Creation order.
    #[serde(default)]
    pub timers: Vec<Timer>,

    /// Applied scale factor, relative to the original recipe.
    pub scale: f64,

    #[serde(default)]
    pub constraints: CookingConstraints,

    #[serde(default)]
    pub paused: bool,

    pub started_at: Timestamp,
}

/// Where the workstate stands in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Mode {
    Idle,
    Cooking,
    Paused,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Idle => "idle",
            Self::Cooking => "cooking",
            Self::Paused => "paused",
        })
    }
}

impl CookingWorkstate {
    /// A workstate with no session in progress.
    pub fn idle(now: Timestamp) -> Self {
        Self {
            session: None,
            last_intent: None,
            updated_at: now,
        }
    }

    pub fn mode(&self) -> Mode {
        match &self.session {
            None => Mode::Idle,
            Some(s) if s.paused => Mode::Paused,
            Some(_) => Mode::Cooking,
        }
    }

    pub fn recipe_id(&self) -> Option<Uuid> {
        self.session.as_ref().map(|s| s.recipe_id)
    }
}
