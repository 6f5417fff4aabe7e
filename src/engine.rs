//! The assistant engine: utterance in, reply and next workstate out.
//!
//! The engine is a pure function of its inputs. It never modifies the
//! workstate it is handed; a turn that changes anything carries the new
//! workstate in [`Turn::next`], and the host decides when to persist it.
//! Every failure becomes reply text plus a [`Condition`], never a panic
//! or an `Err`.

mod reply;

use std::{collections::HashMap, time::Duration};

use jiff::Timestamp;
use uuid::Uuid;

use crate::classify::{ClassifyContext, classify, spoken_step};
use crate::knowledge::KnowledgeBase;
use crate::model::{CookingConstraints, CookingWorkstate, Intent, Recipe, Scale, Timer};
use crate::workstate::{Boundary, WorkstateError};

/// Where the engine reads recipes from.
pub trait RecipeSource {
    fn recipe(&self, id: Uuid) -> Option<Recipe>;
}

impl RecipeSource for HashMap<Uuid, Recipe> {
    fn recipe(&self, id: Uuid) -> Option<Recipe> {
        self.get(&id).cloned()
    }
}

/// A side effect for the host to carry out (show a step card, ring a timer).
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    SessionStarted { recipe_id: Uuid },
    SessionEnded,
    SessionPaused,
    SessionResumed,
    ShowStep { index: usize },
    RecipeComplete,
    TimerStarted { id: Uuid, duration: Duration },
    TimerCancelled { id: Uuid },
    TimerPaused { id: Uuid, remaining: Duration },
    TimerResumed { id: Uuid, remaining: Duration },
    TimersExpired { ids: Vec<Uuid> },
    RecipeScaled { factor: f64 },
}

/// What a failed lookup was looking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup {
    Substitution,
    Technique,
    Timer,
}

/// Information the cook has to supply before the request can run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Detail {
    Duration,

    /// Several timers could be meant; these are their names.
    WhichTimer(Vec<String>),
}

/// Why a turn did not do what was asked.
///
/// Conditions are reported, not thrown: the turn still has a reply.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Condition {
    #[error("no {what:?} entry for {name:?}")]
    NotFound { what: Lookup, name: String },

    #[error("no timers")]
    NoTimers,

    /// `step` counts from one, as the cook said it.
    #[error("step {step} is out of range ({step_count} steps)")]
    OutOfRange { step: usize, step_count: usize },

    #[error("already at the {0} of the recipe")]
    AtBoundary(Boundary),

    #[error("no cooking session in progress")]
    NoActiveSession,

    #[error("invalid scale factor {0}")]
    InvalidScale(f64),

    #[error("invalid timer duration")]
    InvalidDuration,

    #[error("utterance not understood")]
    Unclassified,

    #[error("session is paused")]
    SessionPaused,

    #[error("a session is already in progress")]
    SessionInProgress,

    #[error("cannot {action} while {state}")]
    InvalidTransition { action: &'static str, state: String },

    #[error("recipe {0} not found")]
    RecipeMissing(Uuid),

    #[error("recipe has no steps")]
    EmptyRecipe,

    #[error("more detail needed: {0:?}")]
    NeedsDetail(Detail),
}

impl From<WorkstateError> for Condition {
    fn from(err: WorkstateError) -> Self {
        match err {
            WorkstateError::NoActiveSession => Self::NoActiveSession,
            WorkstateError::SessionInProgress => Self::SessionInProgress,
            WorkstateError::SessionPaused => Self::SessionPaused,
            WorkstateError::InvalidTransition { action, mode } => Self::InvalidTransition {
                action,
                state: mode.to_string(),
            },
            WorkstateError::Boundary(boundary) => Self::AtBoundary(boundary),
            WorkstateError::OutOfRange {
                requested,
                step_count,
            } => Self::OutOfRange {
                step: requested + 1,
                step_count,
            },
            WorkstateError::EmptyRecipe => Self::EmptyRecipe,
            WorkstateError::InvalidScale(factor) => Self::InvalidScale(factor),
            WorkstateError::InvalidDuration => Self::InvalidDuration,
            WorkstateError::TimerNotFound(_) => Self::NoTimers,
            WorkstateError::TimerState { action, state } => Self::InvalidTransition {
                action,
                state: state.to_string(),
            },
        }
    }
}

/// The result of one engine call.
#[derive(Debug, Clone, PartialEq)]
pub struct Turn {
    /// The intent that was handled. `None` for session and tick turns.
    pub intent: Option<Intent>,
    pub reply: String,
    pub action: Option<Action>,
    pub condition: Option<Condition>,

    /// The workstate after this turn, or `None` if nothing changed.
    pub next: Option<CookingWorkstate>,
}

/// Reply, action and condition of a handled request, before the workstate
/// is attached.
struct Outcome {
    reply: String,
    action: Option<Action>,
    condition: Option<Condition>,
}

impl Outcome {
    fn say(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
            action: None,
            condition: None,
        }
    }

    fn with(mut self, action: Action) -> Self {
        self.action = Some(action);
        self
    }

    fn failed(condition: Condition) -> Self {
        Self {
            reply: reply::condition(&condition),
            action: None,
            condition: Some(condition),
        }
    }
}

type Handled = Result<Outcome, Condition>;

pub struct Assistant<'a> {
    recipes: &'a dyn RecipeSource,
    knowledge: &'a KnowledgeBase,
}

impl<'a> Assistant<'a> {
    pub fn new(recipes: &'a dyn RecipeSource, knowledge: &'a KnowledgeBase) -> Self {
        Self { recipes, knowledge }
    }

    /// Classify `text` against the workstate and handle the resulting intent.
    pub fn handle_utterance(&self, text: &str, workstate: &CookingWorkstate, now: Timestamp) -> Turn {
        let intent = classify(text, &ClassifyContext::from(workstate));
        self.apply(intent, workstate, now)
    }

    /// Handle an already-structured intent (a button press, a test).
    pub fn apply(&self, intent: Intent, workstate: &CookingWorkstate, now: Timestamp) -> Turn {
        let mut next = workstate.clone();
        let (outcome, mut next) = match self.dispatch(&intent, &mut next, now) {
            Ok(outcome) => (outcome, next),
            Err(condition) => (Outcome::failed(condition), workstate.clone()),
        };

        // Non-finite factors have no JSON form and would make the saved
        // workstate unreadable.
        let remember = match (&intent, &outcome.condition) {
            (Intent::Unknown { .. }, _) | (_, Some(Condition::NoActiveSession)) => false,
            (_, Some(Condition::InvalidScale(factor))) => factor.is_finite(),
            _ => true,
        };
        if remember {
            next.record_intent(intent.clone(), now);
        }

        tracing::debug!(
            intent = intent.name(),
            condition = ?outcome.condition,
            "handled intent"
        );
        finish(Some(intent), outcome, workstate, next)
    }

    /// Start cooking a recipe.
    pub fn start_session(
        &self,
        recipe_id: Uuid,
        constraints: CookingConstraints,
        workstate: &CookingWorkstate,
        now: Timestamp,
    ) -> Turn {
        let mut next = workstate.clone();
        let outcome = match self.begin(recipe_id, constraints, &mut next, now) {
            Ok(outcome) => outcome,
            Err(condition) => {
                next = workstate.clone();
                Outcome::failed(condition)
            }
        };
        finish(None, outcome, workstate, next)
    }

    /// Stop cooking. Ending while idle is a no-op.
    pub fn end_session(&self, workstate: &CookingWorkstate, now: Timestamp) -> Turn {
        let mut next = workstate.clone();
        let outcome = match next.end_session(now) {
            Some(ended) => {
                let title = self.recipes.recipe(ended.recipe_id).map(|r| r.title);
                Outcome::say(reply::ended(title.as_deref())).with(Action::SessionEnded)
            }
            None => Outcome::say("You're not cooking anything right now."),
        };
        finish(None, outcome, workstate, next)
    }

    /// Expire due timers. The reply is empty when nothing expired.
    pub fn tick(&self, workstate: &CookingWorkstate, now: Timestamp) -> Turn {
        let mut next = workstate.clone();
        let expired = next.tick(now);
        let outcome = if expired.is_empty() {
            Outcome::say("")
        } else {
            for timer in &expired {
                tracing::info!(timer = %timer.id, label = timer.name(), "timer expired");
            }
            Outcome::say(reply::timers_expired(&expired)).with(Action::TimersExpired {
                ids: expired.iter().map(|t| t.id).collect(),
            })
        };
        finish(None, outcome, workstate, next)
    }

    fn begin(
        &self,
        recipe_id: Uuid,
        constraints: CookingConstraints,
        ws: &mut CookingWorkstate,
        now: Timestamp,
    ) -> Handled {
        let recipe = self
            .recipes
            .recipe(recipe_id)
            .ok_or(Condition::RecipeMissing(recipe_id))?;
        let reply = reply::welcome(&recipe, &constraints);
        ws.start_session(&recipe, constraints, now)?;
        tracing::info!(recipe = %recipe.id, title = %recipe.title, "session started");
        Ok(Outcome::say(reply).with(Action::SessionStarted { recipe_id }))
    }

    fn dispatch(&self, intent: &Intent, ws: &mut CookingWorkstate, now: Timestamp) -> Handled {
        match intent {
            Intent::NavigateNext => {
                let recipe = self.recipe(ws)?;
                match ws.advance_step(now) {
                    Ok(index) => show_step(&recipe, index),
                    Err(WorkstateError::Boundary(Boundary::End)) => {
                        Ok(Outcome::say(reply::complete(&recipe)).with(Action::RecipeComplete))
                    }
                    Err(err) => Err(err.into()),
                }
            }
            Intent::NavigatePrevious => {
                let recipe = self.recipe(ws)?;
                let index = ws.previous_step(now)?;
                show_step(&recipe, index)
            }
            Intent::NavigateToStep { index } => {
                let recipe = self.recipe(ws)?;
                let index = ws.go_to_step(*index, now)?;
                show_step(&recipe, index)
            }
            Intent::RepeatStep => {
                let recipe = self.recipe(ws)?;
                let index = ws.current_step().ok_or(Condition::NoActiveSession)?;
                show_step(&recipe, index)
            }

            Intent::StartTimer { duration, label } => {
                self.start_timer(*duration, label.clone(), ws, now)
            }
            Intent::CheckTimer { label } => check_timer(label.as_deref(), ws, now),
            Intent::CancelTimer { label } => {
                let id = pick_timer(ws, label.as_deref())?.id;
                let timer = ws.cancel_timer(id, now)?;
                Ok(Outcome::say(reply::timer_cancelled(&timer)).with(Action::TimerCancelled { id }))
            }
            Intent::PauseTimer { label } => {
                let timer = pick_timer(ws, label.as_deref())?.clone();
                let remaining = ws.pause_timer(timer.id, now)?;
                Ok(Outcome::say(reply::timer_paused(&timer, remaining)).with(
                    Action::TimerPaused {
                        id: timer.id,
                        remaining,
                    },
                ))
            }
            Intent::ResumeTimer { label } => {
                let timer = pick_timer(ws, label.as_deref())?.clone();
                let remaining = ws.resume_timer(timer.id, now)?;
                Ok(Outcome::say(reply::timer_resumed(&timer, remaining)).with(
                    Action::TimerResumed {
                        id: timer.id,
                        remaining,
                    },
                ))
            }

            Intent::PauseSession => {
                ws.pause(now)?;
                Ok(Outcome::say(reply::paused()).with(Action::SessionPaused))
            }
            Intent::ResumeSession => {
                let recipe = self.recipe(ws)?;
                ws.resume(now)?;
                let index = ws.current_step().ok_or(Condition::NoActiveSession)?;
                let step = recipe.step(index).ok_or(Condition::EmptyRecipe)?;
                Ok(
                    Outcome::say(reply::resumed(index, recipe.steps.len(), step))
                        .with(Action::SessionResumed),
                )
            }

            Intent::Substitute { ingredient } => self.substitute(ingredient, ws),
            Intent::ExplainTechnique { term } => {
                let technique = self
                    .knowledge
                    .lookup_technique(term)
                    .ok_or_else(|| Condition::NotFound {
                        what: Lookup::Technique,
                        name: term.clone(),
                    })?;
                Ok(Outcome::say(reply::technique(technique)))
            }
            Intent::ScaleRecipe { scale } => self.scale(*scale, ws, now),
            Intent::ListIngredients => {
                let recipe = self.recipe(ws)?;
                let factor = ws.session.as_ref().map_or(1.0, |s| s.scale);
                Ok(Outcome::say(reply::ingredients(
                    &recipe.scaled_ingredients(factor),
                )))
            }
            Intent::SetConstraint { constraint } => {
                ws.set_constraint(constraint, now)?;
                tracing::info!(?constraint, "constraint set");
                Ok(Outcome::say(reply::constraint_set(constraint)))
            }

            // "step 0" never classifies as navigation but still deserves a
            // straight answer.
            Intent::Unknown { text } => {
                if let (Some(0), Some(session)) = (spoken_step(text), &ws.session) {
                    return Err(Condition::OutOfRange {
                        step: 0,
                        step_count: session.step_count,
                    });
                }
                Ok(Outcome {
                    reply: reply::unclassified(ws.mode()),
                    action: None,
                    condition: Some(Condition::Unclassified),
                })
            }
        }
    }

    /// The session's recipe.
    fn recipe(&self, ws: &CookingWorkstate) -> Result<Recipe, Condition> {
        let id = ws.recipe_id().ok_or(Condition::NoActiveSession)?;
        self.recipes.recipe(id).ok_or(Condition::RecipeMissing(id))
    }

    /// Start a timer. Without a spoken duration the current step's own
    /// duration is used, and failing that the cook is asked.
    fn start_timer(
        &self,
        duration: Option<Duration>,
        label: Option<String>,
        ws: &mut CookingWorkstate,
        now: Timestamp,
    ) -> Handled {
        let (duration, from_step) = match duration {
            Some(duration) => (duration, false),
            None => {
                let recipe = self.recipe(ws)?;
                let step_duration = ws
                    .current_step()
                    .and_then(|i| recipe.step(i))
                    .and_then(|s| s.duration);
                match step_duration {
                    Some(duration) => (duration, true),
                    None => return Err(Condition::NeedsDetail(Detail::Duration)),
                }
            }
        };

        let id = ws.start_timer(duration, label.clone(), now)?;
        tracing::info!(timer = %id, ?label, ?duration, "timer started");
        Ok(
            Outcome::say(reply::timer_started(label.as_deref(), duration, from_step))
                .with(Action::TimerStarted { id, duration }),
        )
    }

    /// Substitutes in stored order, minus any that hit the cook's allergies.
    fn substitute(&self, ingredient: &str, ws: &CookingWorkstate) -> Handled {
        let substitution = self
            .knowledge
            .lookup_substitution(ingredient)
            .ok_or_else(|| Condition::NotFound {
                what: Lookup::Substitution,
                name: ingredient.to_string(),
            })?;

        let none = CookingConstraints::default();
        let constraints = ws.constraints().unwrap_or(&none);
        let mut kept = Vec::new();
        let mut skipped = Vec::new();
        for substitute in &substitution.substitutes {
            match constraints.allergen_in(&substitute.name) {
                Some(allergy) => skipped.push((substitute, allergy)),
                None => kept.push(substitute),
            }
        }
        Ok(Outcome::say(reply::substitution(substitution, &kept, &skipped)))
    }

    fn scale(&self, scale: Scale, ws: &mut CookingWorkstate, now: Timestamp) -> Handled {
        let recipe = self.recipe(ws)?;
        let factor = scale.factor(recipe.servings);
        ws.apply_scale(factor, now)?;
        tracing::info!(factor, "recipe scaled");
        Ok(Outcome::say(reply::scaled(
            &recipe,
            factor,
            &recipe.scaled_ingredients(factor),
        ))
        .with(Action::RecipeScaled { factor }))
    }
}

fn finish(
    intent: Option<Intent>,
    outcome: Outcome,
    before: &CookingWorkstate,
    after: CookingWorkstate,
) -> Turn {
    Turn {
        intent,
        reply: outcome.reply,
        action: outcome.action,
        condition: outcome.condition,
        next: (after != *before).then_some(after),
    }
}

fn show_step(recipe: &Recipe, index: usize) -> Handled {
    let step = recipe.step(index).ok_or(Condition::OutOfRange {
        step: index + 1,
        step_count: recipe.steps.len(),
    })?;
    Ok(Outcome::say(reply::step(index, recipe.steps.len(), step)).with(Action::ShowStep { index }))
}

/// The timer a request refers to: by label, else the only timer, else
/// the unlabeled one. Anything else needs the cook to say which.
fn pick_timer<'w>(ws: &'w CookingWorkstate, label: Option<&str>) -> Result<&'w Timer, Condition> {
    if ws.session.is_none() {
        return Err(Condition::NoActiveSession);
    }
    let timers = ws.timers();
    if let Some(label) = label {
        return ws.find_timer(Some(label)).ok_or_else(|| Condition::NotFound {
            what: Lookup::Timer,
            name: label.to_string(),
        });
    }
    match timers {
        [] => Err(Condition::NoTimers),
        [only] => Ok(only),
        _ => ws.find_timer(None).ok_or_else(|| {
            Condition::NeedsDetail(Detail::WhichTimer(
                timers.iter().map(|t| t.name().to_string()).collect(),
            ))
        }),
    }
}

fn check_timer(label: Option<&str>, ws: &CookingWorkstate, now: Timestamp) -> Handled {
    if ws.session.is_none() {
        return Err(Condition::NoActiveSession);
    }
    let timers: Vec<&Timer> = match label {
        Some(_) => vec![pick_timer(ws, label)?],
        None => ws.timers().iter().collect(),
    };
    if timers.is_empty() {
        return Err(Condition::NoTimers);
    }
    Ok(Outcome::say(reply::timer_status(&timers, now)))
}
