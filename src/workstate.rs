//! Workstate operations: the only way a cooking session changes.
//!
//! Every successful mutation stamps `updated_at` with the caller's `now`.
//! Failed operations leave the workstate exactly as it was.
//!
//! ```text
//! idle --start_session--> cooking --pause--> paused
//!                         cooking <--resume-- paused
//! cooking | paused --end_session--> idle
//! ```

use std::{fmt, time::Duration};

use jiff::Timestamp;
use uuid::Uuid;

use crate::model::{
    Constraint, CookingConstraints, CookingSession, CookingWorkstate, Intent, Mode, Recipe, Timer,
    TimerState,
};

/// Errors from workstate operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum WorkstateError {
    #[error("no cooking session in progress")]
    NoActiveSession,

    #[error("a cooking session is already in progress")]
    SessionInProgress,

    #[error("the session is paused")]
    SessionPaused,

    #[error("cannot {action} while {mode}")]
    InvalidTransition { action: &'static str, mode: Mode },

    #[error("already at the {0} of the recipe")]
    Boundary(Boundary),

    #[error("step {requested} is out of range: the recipe has {step_count} steps")]
    OutOfRange { requested: usize, step_count: usize },

    #[error("recipe has no steps")]
    EmptyRecipe,

    #[error("scale factor must be a positive number, got {0}")]
    InvalidScale(f64),

    #[error("timer duration must be greater than zero")]
    InvalidDuration,

    #[error("no timer with id {0}")]
    TimerNotFound(Uuid),

    #[error("cannot {action} a timer that is {state}")]
    TimerState {
        action: &'static str,
        state: TimerState,
    },
}

pub type Result<T> = core::result::Result<T, WorkstateError>;

/// Which end of the recipe a navigation ran into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Boundary {
    Start,
    End,
}

impl fmt::Display for Boundary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Start => "start",
            Self::End => "end",
        })
    }
}

impl CookingWorkstate {
    // ── Lifecycle ──

    /// Start cooking `recipe` at its first step.
    pub fn start_session(
        &mut self,
        recipe: &Recipe,
        constraints: CookingConstraints,
        now: Timestamp,
    ) -> Result<()> {
        if self.session.is_some() {
            return Err(WorkstateError::SessionInProgress);
        }
        if recipe.steps.is_empty() {
            return Err(WorkstateError::EmptyRecipe);
        }
        self.session = Some(CookingSession {
            recipe_id: recipe.id,
            step_count: recipe.steps.len(),
            current_step: 0,
            timers: Vec::new(),
            scale: 1.0,
            constraints,
            paused: false,
            started_at: now,
        });
        self.last_intent = None;
        self.updated_at = now;
        Ok(())
    }

    /// End the session, returning it. Idempotent: ending while idle returns `None`.
    pub fn end_session(&mut self, now: Timestamp) -> Option<CookingSession> {
        let ended = self.session.take()?;
        self.last_intent = None;
        self.updated_at = now;
        Some(ended)
    }

    pub fn pause(&mut self, now: Timestamp) -> Result<()> {
        let session = self.session_mut()?;
        if session.paused {
            return Err(WorkstateError::InvalidTransition {
                action: "pause",
                mode: Mode::Paused,
            });
        }
        session.paused = true;
        self.updated_at = now;
        Ok(())
    }

    pub fn resume(&mut self, now: Timestamp) -> Result<()> {
        let session = self.session_mut()?;
        if !session.paused {
            return Err(WorkstateError::InvalidTransition {
                action: "resume",
                mode: Mode::Cooking,
            });
        }
        session.paused = false;
        self.updated_at = now;
        Ok(())
    }

    // ── Steps ──

    /// Move to the next step.
    ///
    /// At the last step this reports [`Boundary::End`] and does not move;
    /// the caller decides whether that means the recipe is complete.
    pub fn advance_step(&mut self, now: Timestamp) -> Result<usize> {
        let session = self.cooking_mut()?;
        if session.current_step + 1 >= session.step_count {
            return Err(WorkstateError::Boundary(Boundary::End));
        }
        session.current_step += 1;
        let index = session.current_step;
        self.updated_at = now;
        Ok(index)
    }

    pub fn previous_step(&mut self, now: Timestamp) -> Result<usize> {
        let session = self.cooking_mut()?;
        if session.current_step == 0 {
            return Err(WorkstateError::Boundary(Boundary::Start));
        }
        session.current_step -= 1;
        let index = session.current_step;
        self.updated_at = now;
        Ok(index)
    }

    /// Jump to a 0-based step index.
    pub fn go_to_step(&mut self, index: usize, now: Timestamp) -> Result<usize> {
        let session = self.cooking_mut()?;
        if index >= session.step_count {
            return Err(WorkstateError::OutOfRange {
                requested: index,
                step_count: session.step_count,
            });
        }
        session.current_step = index;
        self.updated_at = now;
        Ok(index)
    }

    pub fn current_step(&self) -> Option<usize> {
        self.session.as_ref().map(|s| s.current_step)
    }

    // ── Timers ──

    /// Start a timer, replacing any existing timer with the same label.
    pub fn start_timer(
        &mut self,
        duration: Duration,
        label: Option<String>,
        now: Timestamp,
    ) -> Result<Uuid> {
        if duration.is_zero() {
            return Err(WorkstateError::InvalidDuration);
        }
        let session = self.session_mut()?;
        session
            .timers
            .retain(|t| !t.answers_to(label.as_deref()));
        let timer = Timer::started(label, duration, now);
        let id = timer.id;
        session.timers.push(timer);
        self.updated_at = now;
        Ok(id)
    }

    /// Mark every running timer whose deadline has passed as expired.
    ///
    /// Returns the timers that expired on this call. Safe to call at any
    /// cadence: deadlines come from start timestamps, not call counts.
    pub fn tick(&mut self, now: Timestamp) -> Vec<Timer> {
        let Some(session) = self.session.as_mut() else {
            return Vec::new();
        };
        let mut expired = Vec::new();
        for timer in &mut session.timers {
            if timer.is_due(now) {
                timer.state = TimerState::Expired;
                expired.push(timer.clone());
            }
        }
        if !expired.is_empty() {
            self.updated_at = now;
        }
        expired
    }

    pub fn cancel_timer(&mut self, id: Uuid, now: Timestamp) -> Result<Timer> {
        let session = self.session_mut()?;
        let pos = session
            .timers
            .iter()
            .position(|t| t.id == id)
            .ok_or(WorkstateError::TimerNotFound(id))?;
        let timer = session.timers.remove(pos);
        self.updated_at = now;
        Ok(timer)
    }

    /// Pause a running timer, capturing its remaining time.
    pub fn pause_timer(&mut self, id: Uuid, now: Timestamp) -> Result<Duration> {
        let timer = self.timer_mut(id)?;
        if timer.state != TimerState::Running {
            return Err(WorkstateError::TimerState {
                action: "pause",
                state: timer.state,
            });
        }
        let remaining = timer.remaining(now);
        timer.state = TimerState::Paused;
        timer.paused_remaining = Some(remaining);
        self.updated_at = now;
        Ok(remaining)
    }

    /// Resume a paused timer: it runs again for its captured remaining time.
    pub fn resume_timer(&mut self, id: Uuid, now: Timestamp) -> Result<Duration> {
        let timer = self.timer_mut(id)?;
        if timer.state != TimerState::Paused {
            return Err(WorkstateError::TimerState {
                action: "resume",
                state: timer.state,
            });
        }
        let remaining = timer.paused_remaining.take().unwrap_or(timer.duration);
        timer.duration = remaining;
        timer.started_at = Some(now);
        timer.state = TimerState::Running;
        self.updated_at = now;
        Ok(remaining)
    }

    /// Time left on a timer at `now`.
    pub fn timer_remaining(&self, id: Uuid, now: Timestamp) -> Result<Duration> {
        self.timers()
            .iter()
            .find(|t| t.id == id)
            .map(|t| t.remaining(now))
            .ok_or(WorkstateError::TimerNotFound(id))
    }

    pub fn timers(&self) -> &[Timer] {
        match &self.session {
            Some(session) => &session.timers,
            None => &[],
        }
    }

    /// Find a timer by label (case-insensitive). `None` finds the unlabeled timer.
    pub fn find_timer(&self, label: Option<&str>) -> Option<&Timer> {
        self.timers().iter().find(|t| t.answers_to(label))
    }

    // ── Scale and constraints ──

    /// Set the scale factor. Quantities are always derived from the original
    /// recipe, so successive scales never compound.
    pub fn apply_scale(&mut self, factor: f64, now: Timestamp) -> Result<()> {
        if !factor.is_finite() || factor <= 0.0 {
            return Err(WorkstateError::InvalidScale(factor));
        }
        let session = self.session_mut()?;
        session.scale = factor;
        self.updated_at = now;
        Ok(())
    }

    pub fn set_constraint(&mut self, constraint: &Constraint, now: Timestamp) -> Result<()> {
        let session = self.session_mut()?;
        session.constraints.apply(constraint);
        self.updated_at = now;
        Ok(())
    }

    pub fn constraints(&self) -> Option<&CookingConstraints> {
        self.session.as_ref().map(|s| &s.constraints)
    }

    /// Remember the last classified intent for follow-up resolution.
    pub fn record_intent(&mut self, intent: Intent, now: Timestamp) {
        self.last_intent = Some(intent);
        self.updated_at = now;
    }

    // ── Helpers ──

    fn session_mut(&mut self) -> Result<&mut CookingSession> {
        self.session.as_mut().ok_or(WorkstateError::NoActiveSession)
    }

    /// The session, rejecting paused sessions.
    fn cooking_mut(&mut self) -> Result<&mut CookingSession> {
        let session = self.session_mut()?;
        if session.paused {
            return Err(WorkstateError::SessionPaused);
        }
        Ok(session)
    }

    fn timer_mut(&mut self, id: Uuid) -> Result<&mut Timer> {
        self.session_mut()?
            .timers
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(WorkstateError::TimerNotFound(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::model::{Difficulty, Ingredient, Step};

    fn at(seconds: i64) -> Timestamp {
        Timestamp::new(1_700_000_000 + seconds, 0).unwrap()
    }

    fn sample_recipe() -> Recipe {
        Recipe {
            id: Uuid::new_v4(),
            title: "Tomato pasta".into(),
            steps: vec![
                Step {
                    text: "Boil the water.".into(),
                    duration: None,
                },
                Step {
                    text: "Cook the pasta for 10 minutes.".into(),
                    duration: Some(Duration::from_secs(600)),
                },
                Step {
                    text: "Toss with the sauce.".into(),
                    duration: None,
                },
            ],
            ingredients: vec![Ingredient {
                name: "pasta".into(),
                quantity: Some(200.0),
                unit: Some("g".into()),
            }],
            servings: 2,
            category: "Dinner".into(),
            difficulty: Difficulty::Easy,
        }
    }

    fn cooking() -> CookingWorkstate {
        let mut ws = CookingWorkstate::idle(at(0));
        ws.start_session(&sample_recipe(), CookingConstraints::default(), at(0))
            .unwrap();
        ws
    }

    #[test]
    fn start_session_moves_idle_to_cooking() {
        let ws = cooking();

        assert_eq!(ws.mode(), Mode::Cooking);
        assert_eq!(ws.current_step(), Some(0));
    }

    #[test]
    fn start_session_twice_fails() {
        let mut ws = cooking();
        let err = ws
            .start_session(&sample_recipe(), CookingConstraints::default(), at(1))
            .unwrap_err();

        assert_eq!(err, WorkstateError::SessionInProgress);
    }

    #[test]
    fn start_session_rejects_empty_recipe() {
        let mut recipe = sample_recipe();
        recipe.steps.clear();
        let mut ws = CookingWorkstate::idle(at(0));

        let err = ws
            .start_session(&recipe, CookingConstraints::default(), at(0))
            .unwrap_err();
        assert_eq!(err, WorkstateError::EmptyRecipe);
        assert_eq!(ws.mode(), Mode::Idle);
    }

    #[test]
    fn operations_rejected_when_idle() {
        let mut ws = CookingWorkstate::idle(at(0));

        assert_eq!(ws.advance_step(at(1)), Err(WorkstateError::NoActiveSession));
        assert_eq!(ws.go_to_step(0, at(1)), Err(WorkstateError::NoActiveSession));
        assert_eq!(
            ws.start_timer(Duration::from_secs(60), None, at(1)),
            Err(WorkstateError::NoActiveSession)
        );
        assert_eq!(ws.apply_scale(2.0, at(1)), Err(WorkstateError::NoActiveSession));
        assert_eq!(ws.pause(at(1)), Err(WorkstateError::NoActiveSession));
        assert_eq!(ws.updated_at, at(0));
    }

    #[test]
    fn advance_stops_at_last_step() {
        let mut ws = cooking();

        assert_eq!(ws.advance_step(at(1)), Ok(1));
        assert_eq!(ws.advance_step(at(2)), Ok(2));
        assert_eq!(
            ws.advance_step(at(3)),
            Err(WorkstateError::Boundary(Boundary::End))
        );
        assert_eq!(ws.current_step(), Some(2));
        assert_eq!(ws.updated_at, at(2));
    }

    #[test]
    fn previous_stops_at_first_step() {
        let mut ws = cooking();

        assert_eq!(
            ws.previous_step(at(1)),
            Err(WorkstateError::Boundary(Boundary::Start))
        );
        assert_eq!(ws.current_step(), Some(0));
    }

    #[test]
    fn go_to_step_sets_exact_index() {
        let mut ws = cooking();

        for index in [2, 0, 1] {
            assert_eq!(ws.go_to_step(index, at(1)), Ok(index));
            assert_eq!(ws.current_step(), Some(index));
        }
    }

    #[test]
    fn go_to_step_out_of_range_leaves_index() {
        let mut ws = cooking();
        ws.go_to_step(1, at(1)).unwrap();

        let err = ws.go_to_step(3, at(2)).unwrap_err();
        assert_eq!(
            err,
            WorkstateError::OutOfRange {
                requested: 3,
                step_count: 3
            }
        );
        assert_eq!(ws.current_step(), Some(1));
    }

    #[test]
    fn pause_and_resume_follow_mode_machine() {
        let mut ws = cooking();

        ws.pause(at(1)).unwrap();
        assert_eq!(ws.mode(), Mode::Paused);
        assert!(matches!(
            ws.pause(at(2)),
            Err(WorkstateError::InvalidTransition { .. })
        ));
        assert_eq!(ws.advance_step(at(2)), Err(WorkstateError::SessionPaused));

        ws.resume(at(3)).unwrap();
        assert_eq!(ws.mode(), Mode::Cooking);
        assert!(matches!(
            ws.resume(at(4)),
            Err(WorkstateError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn end_session_returns_to_idle() {
        let mut ws = cooking();
        ws.pause(at(1)).unwrap();

        assert!(ws.end_session(at(2)).is_some());
        assert_eq!(ws.mode(), Mode::Idle);
        assert_eq!(ws.current_step(), None);
        assert!(ws.end_session(at(3)).is_none());
        assert_eq!(ws.updated_at, at(2));
    }

    #[test]
    fn same_label_timer_replaces_previous() {
        let mut ws = cooking();

        let first = ws
            .start_timer(Duration::from_secs(60), Some("pasta".into()), at(0))
            .unwrap();
        ws.start_timer(Duration::from_secs(30), Some("sauce".into()), at(0))
            .unwrap();
        let second = ws
            .start_timer(Duration::from_secs(120), Some("Pasta".into()), at(5))
            .unwrap();

        assert_ne!(first, second);
        assert_eq!(ws.timers().len(), 2);
        assert_eq!(ws.timers()[0].name(), "sauce");
        assert_eq!(ws.timers()[1].id, second);
    }

    #[test]
    fn zero_duration_timer_rejected() {
        let mut ws = cooking();
        assert_eq!(
            ws.start_timer(Duration::ZERO, None, at(0)),
            Err(WorkstateError::InvalidDuration)
        );
    }

    #[test]
    fn remaining_does_not_drift_with_operation_count() {
        let mut ws = cooking();
        let id = ws
            .start_timer(Duration::from_secs(300), None, at(10))
            .unwrap();

        for i in 0..50 {
            ws.tick(at(10));
            ws.record_intent(Intent::RepeatStep, at(10));
            let _ = ws.go_to_step(i % 3, at(10));
        }

        assert_eq!(ws.timer_remaining(id, at(10)), Ok(Duration::from_secs(300)));
    }

    #[test]
    fn tick_expires_due_timers_once() {
        let mut ws = cooking();
        ws.start_timer(Duration::from_secs(60), Some("eggs".into()), at(0))
            .unwrap();
        ws.start_timer(Duration::from_secs(600), Some("rice".into()), at(0))
            .unwrap();

        assert!(ws.tick(at(59)).is_empty());

        // A single late poll still catches the expiry.
        let expired = ws.tick(at(3_600));
        let names: Vec<&str> = expired.iter().map(Timer::name).collect();
        assert_eq!(names, ["eggs", "rice"]);
        assert!(ws.tick(at(3_601)).is_empty());
    }

    #[test]
    fn pause_and_resume_timer_preserves_remaining() {
        let mut ws = cooking();
        let id = ws
            .start_timer(Duration::from_secs(300), None, at(0))
            .unwrap();

        assert_eq!(ws.pause_timer(id, at(100)), Ok(Duration::from_secs(200)));
        assert_eq!(ws.timer_remaining(id, at(5_000)), Ok(Duration::from_secs(200)));
        assert!(ws.tick(at(5_000)).is_empty());

        ws.resume_timer(id, at(5_000)).unwrap();
        assert_eq!(ws.timer_remaining(id, at(5_050)), Ok(Duration::from_secs(150)));
        assert!(matches!(
            ws.resume_timer(id, at(5_050)),
            Err(WorkstateError::TimerState { .. })
        ));
    }

    #[test]
    fn cancel_timer_removes_it() {
        let mut ws = cooking();
        let id = ws
            .start_timer(Duration::from_secs(60), None, at(0))
            .unwrap();

        ws.cancel_timer(id, at(1)).unwrap();
        assert!(ws.timers().is_empty());
        assert_eq!(
            ws.cancel_timer(id, at(2)),
            Err(WorkstateError::TimerNotFound(id))
        );
    }

    #[test]
    fn invalid_scale_leaves_state_unchanged() {
        let mut ws = cooking();
        ws.apply_scale(2.0, at(1)).unwrap();

        for bad in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                ws.apply_scale(bad, at(2)),
                Err(WorkstateError::InvalidScale(_))
            ));
        }
        assert_eq!(ws.session.as_ref().unwrap().scale, 2.0);
        assert_eq!(ws.updated_at, at(1));
    }

    #[test]
    fn set_constraint_updates_session() {
        let mut ws = cooking();
        ws.set_constraint(&Constraint::Allergy("walnuts".into()), at(1))
            .unwrap();

        assert!(ws.constraints().unwrap().allergies.contains("walnuts"));
    }
}
