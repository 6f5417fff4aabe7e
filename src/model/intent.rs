//! Intents: structured interpretations of a single utterance.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::Constraint;

/// What the cook asked for, with the slots extracted from the utterance.
///
/// Intents are ephemeral. Only the most recent one is kept, in the
/// workstate, so a follow-up like "ten minutes" can be resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Intent {
    NavigateNext,
    NavigatePrevious,

    /// Jump to a step. `index` is 0-based.
    NavigateToStep {
        index: usize,
    },
    RepeatStep,

    /// Start a timer. A missing duration is filled from the current step
    /// or asked for.
    StartTimer {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        duration: Option<Duration>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        label: Option<String>,
    },
    CheckTimer {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        label: Option<String>,
    },
    CancelTimer {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        label: Option<String>,
    },
    PauseTimer {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        label: Option<String>,
    },
    ResumeTimer {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        label: Option<String>,
    },
    PauseSession,
    ResumeSession,
    Substitute {
        ingredient: String,
    },
    ExplainTechnique {
        term: String,
    },
    ScaleRecipe {
        scale: Scale,
    },
    ListIngredients,
    SetConstraint {
        constraint: Constraint,
    },

    /// Nothing matched. The original text is kept for the fallback reply.
    Unknown {
        text: String,
    },
}

impl Intent {
    /// Short, stable name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::NavigateNext => "navigate-next",
            Self::NavigatePrevious => "navigate-previous",
            Self::NavigateToStep { .. } => "navigate-to-step",
            Self::RepeatStep => "repeat-step",
            Self::StartTimer { .. } => "start-timer",
            Self::CheckTimer { .. } => "check-timer",
            Self::CancelTimer { .. } => "cancel-timer",
            Self::PauseTimer { .. } => "pause-timer",
            Self::ResumeTimer { .. } => "resume-timer",
            Self::PauseSession => "pause-session",
            Self::ResumeSession => "resume-session",
            Self::Substitute { .. } => "substitute",
            Self::ExplainTechnique { .. } => "explain-technique",
            Self::ScaleRecipe { .. } => "scale-recipe",
            Self::ListIngredients => "list-ingredients",
            Self::SetConstraint { .. } => "set-constraint",
            Self::Unknown { .. } => "unknown",
        }
    }
}

/// How to scale a recipe.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum Scale {
    /// Multiply every quantity by this factor.
    Factor(f64),

    /// Scale to make this many servings.
    Servings(u32),
}

impl Scale {
    /// The multiplication factor relative to a recipe making `base_servings`.
    pub fn factor(self, base_servings: u32) -> f64 {
        match self {
            Self::Factor(f) => f,
            Self::Servings(_) if base_servings == 0 => f64::NAN,
            Self::Servings(n) => f64::from(n) / f64::from(base_servings),
        }
    }
}
