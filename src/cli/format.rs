//! Output formatting for CLI display.

use std::fmt::Write;

use jiff::Timestamp;
use uuid::Uuid;

use sous::classify::describe_duration;
use sous::model::{CookingWorkstate, Difficulty, Recipe, TimerState, format_quantity};

pub(super) fn short_id(id: Uuid) -> String {
    id.to_string()[..8].to_string()
}

fn difficulty(d: Difficulty) -> &'static str {
    match d {
        Difficulty::Easy => "easy",
        Difficulty::Medium => "medium",
        Difficulty::Hard => "hard",
    }
}

/// One line per recipe for `sous recipe list`.
pub(super) fn format_recipe_line(recipe: &Recipe) -> String {
    format!(
        "{}  {}  [{}, {}, serves {}, {} steps]",
        short_id(recipe.id),
        recipe.title,
        recipe.category,
        difficulty(recipe.difficulty),
        recipe.servings,
        recipe.steps.len()
    )
}

pub(super) fn format_recipe(recipe: &Recipe) -> String {
    let mut out = format!("{}  ({})\n", recipe.title, short_id(recipe.id));
    let _ = write!(
        out,
        "Serves {} · {} · {}",
        recipe.servings,
        recipe.category,
        difficulty(recipe.difficulty)
    );
    let total = recipe.total_duration();
    if !total.is_zero() {
        let _ = write!(out, " · about {}", describe_duration(total));
    }
    out.push('\n');

    if !recipe.ingredients.is_empty() {
        out.push_str("\nIngredients:\n");
        for ingredient in &recipe.ingredients {
            let _ = writeln!(out, "  - {ingredient}");
        }
    }

    out.push_str("\nSteps:\n");
    for (i, step) in recipe.steps.iter().enumerate() {
        let _ = write!(out, "  {}. {}", i + 1, step.text);
        if let Some(d) = step.duration {
            let _ = write!(out, " ({})", describe_duration(d));
        }
        out.push('\n');
    }
    out
}

/// The session as `sous status` shows it.
///
/// `recipe` is `None` when the session's recipe has since been removed.
pub(super) fn format_status(
    member: &str,
    workstate: &CookingWorkstate,
    recipe: Option<&Recipe>,
    now: Timestamp,
) -> String {
    let mut out = format!("Member: {member}\n");
    let Some(session) = &workstate.session else {
        out.push_str("Not cooking.\n");
        return out;
    };

    let title = recipe.map_or("(removed recipe)", |r| r.title.as_str());
    let _ = write!(out, "Cooking: {title}");
    if session.paused {
        out.push_str(" (paused)");
    }
    out.push('\n');

    let _ = write!(
        out,
        "Step {} of {}",
        session.current_step + 1,
        session.step_count
    );
    if let Some(step) = recipe.and_then(|r| r.step(session.current_step)) {
        let _ = write!(out, ": {}", step.text);
    }
    out.push('\n');

    if (session.scale - 1.0).abs() > f64::EPSILON {
        let _ = writeln!(out, "Scale: {}x", format_quantity(session.scale));
    }

    let constraints = &session.constraints;
    if !constraints.allergies.is_empty() {
        let list: Vec<&str> = constraints.allergies.iter().map(String::as_str).collect();
        let _ = writeln!(out, "Avoiding: {}", list.join(", "));
    }
    if !constraints.diet.is_empty() {
        let list: Vec<&str> = constraints.diet.iter().map(String::as_str).collect();
        let _ = writeln!(out, "Diet: {}", list.join(", "));
    }
    if let Some(budget) = constraints.time_budget {
        let _ = writeln!(out, "Time budget: {}", describe_duration(budget));
    }
    if let Some(skill) = constraints.skill {
        let _ = writeln!(out, "Skill: {skill}");
    }

    if !session.timers.is_empty() {
        out.push_str("Timers:\n");
        for timer in &session.timers {
            let _ = write!(out, "  {}  [{}]", timer.name(), timer.state);
            if matches!(timer.state, TimerState::Running | TimerState::Paused) {
                let _ = write!(out, "  {} left", describe_duration(timer.remaining(now)));
            }
            out.push('\n');
        }
    }
    out
}
