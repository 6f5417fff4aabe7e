//! Reply text. Everything here is spoken aloud, so sentences stay short.

use std::time::Duration;

use jiff::Timestamp;

use crate::classify::describe_duration;
use crate::knowledge::{Substitute, Substitution, Technique};
use crate::model::{
    Constraint, CookingConstraints, Ingredient, Mode, Recipe, Step, Timer, TimerState,
    format_quantity,
};
use crate::workstate::Boundary;

use super::{Condition, Detail, Lookup};

/// "a", "a and b", "a, b and c".
pub(super) fn join_list<S: AsRef<str>>(items: &[S]) -> String {
    match items {
        [] => String::new(),
        [only] => only.as_ref().to_string(),
        [init @ .., last] => {
            let head: Vec<&str> = init.iter().map(AsRef::as_ref).collect();
            format!("{} and {}", head.join(", "), last.as_ref())
        }
    }
}

pub(super) fn step(index: usize, count: usize, step: &Step) -> String {
    let mut reply = format!("Step {} of {count}: {}", index + 1, step.text);
    if let Some(duration) = step.duration {
        reply.push_str(&format!(" That takes about {}.", describe_duration(duration)));
    }
    reply
}

pub(super) fn complete(recipe: &Recipe) -> String {
    format!("That was the last step. {} is done. Enjoy!", recipe.title)
}

pub(super) fn welcome(recipe: &Recipe, constraints: &CookingConstraints) -> String {
    let mut reply = format!(
        "Let's make {}. There are {} steps.",
        recipe.title,
        recipe.steps.len()
    );

    for ingredient in &recipe.ingredients {
        if let Some(allergy) = constraints.allergen_in(&ingredient.name) {
            reply.push_str(&format!(
                " Heads up: this recipe uses {}, and you're avoiding {allergy}.",
                ingredient.name
            ));
        }
    }

    let total = recipe.total_duration();
    if let Some(budget) = constraints.time_budget
        && total > budget
    {
        reply.push_str(&format!(
            " This takes about {}, longer than the {} you have.",
            describe_duration(total),
            describe_duration(budget)
        ));
    }

    if let Some(first) = recipe.step(0) {
        reply.push(' ');
        reply.push_str(&step(0, recipe.steps.len(), first));
    }
    reply
}

pub(super) fn ended(recipe_title: Option<&str>) -> String {
    match recipe_title {
        Some(title) => format!("Stopped cooking {title}."),
        None => "Stopped cooking.".to_string(),
    }
}

fn timer_name(label: Option<&str>) -> String {
    match label {
        Some(label) => format!("the {label} timer"),
        None => "the timer".to_string(),
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub(super) fn timer_started(label: Option<&str>, duration: Duration, from_step: bool) -> String {
    let what = capitalize(&timer_name(label));
    let reply = format!("{what} is set for {}.", describe_duration(duration));
    if from_step {
        format!("{reply} That's how long this step takes.")
    } else {
        reply
    }
}

fn timer_line(timer: &Timer, now: Timestamp) -> String {
    let name = capitalize(&timer_name(timer.label.as_deref()));
    match timer.state {
        TimerState::Expired => format!("{name} is done."),
        TimerState::Paused => format!(
            "{name} is paused with {} left.",
            describe_duration(timer.remaining(now))
        ),
        TimerState::Idle | TimerState::Running => format!(
            "{name} has {} left.",
            describe_duration(timer.remaining(now))
        ),
    }
}

pub(super) fn timer_status(timers: &[&Timer], now: Timestamp) -> String {
    timers
        .iter()
        .map(|t| timer_line(t, now))
        .collect::<Vec<_>>()
        .join(" ")
}

pub(super) fn timer_cancelled(timer: &Timer) -> String {
    format!("Cancelled {}.", timer_name(timer.label.as_deref()))
}

pub(super) fn timer_paused(timer: &Timer, remaining: Duration) -> String {
    format!(
        "Paused {} with {} left.",
        timer_name(timer.label.as_deref()),
        describe_duration(remaining)
    )
}

pub(super) fn timer_resumed(timer: &Timer, remaining: Duration) -> String {
    format!(
        "Resumed {}. {} to go.",
        timer_name(timer.label.as_deref()),
        capitalize(&describe_duration(remaining))
    )
}

pub(super) fn timers_expired(timers: &[Timer]) -> String {
    timers
        .iter()
        .map(|t| format!("{} is done!", capitalize(&timer_name(t.label.as_deref()))))
        .collect::<Vec<_>>()
        .join(" ")
}

pub(super) fn paused() -> String {
    "Paused. Your timers are still running. Say \"resume\" when you're ready.".to_string()
}

pub(super) fn resumed(index: usize, count: usize, current: &Step) -> String {
    format!("Welcome back. {}", step(index, count, current))
}

fn describe_substitute(substitute: &Substitute) -> String {
    match &substitute.note {
        Some(note) => format!("{} ({note})", substitute.name),
        None => substitute.name.clone(),
    }
}

/// Substitutes in stored order, with the ones skipped for allergies named.
pub(super) fn substitution(
    substitution: &Substitution,
    kept: &[&Substitute],
    skipped: &[(&Substitute, &str)],
) -> String {
    let mut reply = if kept.is_empty() {
        format!(
            "Every substitute I know for {} conflicts with your allergies.",
            substitution.ingredient
        )
    } else {
        let options: Vec<String> = kept.iter().map(|s| describe_substitute(s)).collect();
        format!(
            "Instead of {}, you can use {}.",
            substitution.ingredient,
            join_list(&options)
        )
    };
    for (substitute, allergy) in skipped {
        reply.push_str(&format!(
            " I left out {} because you're avoiding {allergy}.",
            substitute.name
        ));
    }
    reply
}

pub(super) fn technique(technique: &Technique) -> String {
    let mut reply = format!("To {}: {}", technique.term, technique.definition);
    if let Some(example) = &technique.example {
        reply.push_str(&format!(" For example: {example}"));
    }
    reply
}

pub(super) fn ingredients(ingredients: &[Ingredient]) -> String {
    if ingredients.is_empty() {
        return "This recipe doesn't list any ingredients.".to_string();
    }
    let items: Vec<String> = ingredients.iter().map(ToString::to_string).collect();
    format!("You'll need {}.", join_list(&items))
}

pub(super) fn scaled(recipe: &Recipe, factor: f64, ingredients: &[Ingredient]) -> String {
    let servings = f64::from(recipe.servings) * factor;
    let headline = if recipe.servings > 0 {
        format!(
            "Scaled to {} servings ({}x).",
            format_quantity(servings),
            format_quantity(factor)
        )
    } else {
        format!("Scaled by {}x.", format_quantity(factor))
    };
    format!("{headline} {}", self::ingredients(ingredients))
}

pub(super) fn constraint_set(constraint: &Constraint) -> String {
    match constraint {
        Constraint::Diet(tag) => format!("Noted, keeping it {tag}."),
        Constraint::Allergy(name) => format!("Got it, I'll watch out for {name}."),
        Constraint::TimeBudget(budget) => {
            format!("Got it, you have {}.", describe_duration(*budget))
        }
        Constraint::Skill(level) => format!("Noted, you're cooking at a {level} level."),
    }
}

pub(super) fn unclassified(mode: Mode) -> String {
    match mode {
        Mode::Idle => "Sorry, I didn't catch that. You can start a recipe, or ask me \
                       for a substitute or what a technique means."
            .to_string(),
        Mode::Cooking | Mode::Paused => "Sorry, I didn't catch that. Try \"next step\" \
                                         or \"set a timer for 5 minutes\"."
            .to_string(),
    }
}

/// The spoken form of a condition.
pub(super) fn condition(condition: &Condition) -> String {
    match condition {
        Condition::NotFound { what, name } => match what {
            Lookup::Substitution => format!("Sorry, I don't know a substitute for {name}."),
            Lookup::Technique => format!("Sorry, I don't know how to explain \"{name}\"."),
            Lookup::Timer => format!("There's no {name} timer."),
        },
        Condition::NoTimers => "You don't have any timers.".to_string(),
        Condition::OutOfRange { step, step_count } => {
            format!("There's no step {step}. This recipe has {step_count} steps.")
        }
        Condition::AtBoundary(Boundary::Start) => "You're already on the first step.".to_string(),
        Condition::AtBoundary(Boundary::End) => "You're already on the last step.".to_string(),
        Condition::NoActiveSession => {
            "You're not cooking anything right now. Start a recipe first.".to_string()
        }
        Condition::InvalidScale(_) => "I can't scale the recipe by that amount.".to_string(),
        Condition::InvalidDuration => "A timer needs to run for at least a second.".to_string(),
        Condition::Unclassified => unclassified(Mode::Cooking),
        Condition::SessionPaused => {
            "We're paused. Say \"resume\" when you're ready to keep going.".to_string()
        }
        Condition::SessionInProgress => {
            "You're already cooking something. End that session first.".to_string()
        }
        Condition::InvalidTransition { action, state } => {
            format!("I can't {action} right now, it's {state}.")
        }
        Condition::RecipeMissing(_) => "I can't find that recipe.".to_string(),
        Condition::EmptyRecipe => "That recipe has no steps.".to_string(),
        Condition::NeedsDetail(Detail::Duration) => "For how long?".to_string(),
        Condition::NeedsDetail(Detail::WhichTimer(names)) => {
            format!("Which timer? You have {}.", join_list(names))
        }
    }
}
