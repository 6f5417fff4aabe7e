//! Core data model for Sous.
//!
//! Recipes are read-only input. The workstate is the one mutable record,
//! owned by the assistant for the length of a cooking session.

mod constraints;
mod intent;
mod recipe;
mod timer;
mod workstate;

pub use constraints::{Constraint, CookingConstraints, SkillLevel};
pub use intent::{Intent, Scale};
pub use recipe::{Difficulty, Ingredient, Recipe, Step, format_quantity};
pub use timer::{Timer, TimerState};
pub use workstate::{CookingSession, CookingWorkstate, Mode};
