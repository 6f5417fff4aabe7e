//! Sous: a context-aware cooking assistant.
//!
//! Utterances are classified into [`model::Intent`]s, applied to the cook's
//! [`model::CookingWorkstate`] by the [`engine::Assistant`], and answered in
//! plain text. The [`kitchen::Kitchen`] keeps each member's workstate saved
//! between turns.

pub mod classify;
pub mod config;
pub mod engine;
pub mod kitchen;
pub mod knowledge;
pub mod member;
pub mod model;
pub mod recipe_file;
pub mod storage;
pub mod workstate;
