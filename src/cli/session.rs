//! Session commands: cook, say, listen, status, tick, end, forget.

use std::io::{self, BufRead};

use jiff::Timestamp;

use sous::classify::duration_in;
use sous::engine::RecipeSource;
use sous::kitchen::{Kitchen, Persisted};
use sous::knowledge::KnowledgeBase;
use sous::model::{Constraint, CookingConstraints, Recipe, SkillLevel};
use sous::storage::Storage;

use super::format::format_status;
use super::print_reply;

const QUIT_WORDS: &[&str] = &["quit", "exit", "stop listening", "goodbye"];

pub(super) fn open<'a>(
    member: &str,
    storage: &'a Storage,
    knowledge: &'a KnowledgeBase,
) -> Result<Kitchen<'a>, String> {
    Kitchen::open(member, storage, storage, knowledge, Timestamp::now())
        .map_err(|e| format!("failed to load session for '{member}': {e}"))
}

/// Build session constraints from `sous cook` flags.
pub(super) fn constraints(
    diet: Vec<String>,
    allergies: Vec<String>,
    time_budget: Option<&str>,
    skill: Option<SkillLevel>,
) -> Result<CookingConstraints, String> {
    let mut constraints = CookingConstraints::default();
    for tag in diet {
        constraints.apply(&Constraint::Diet(tag));
    }
    for allergen in allergies {
        constraints.apply(&Constraint::Allergy(allergen));
    }
    if let Some(text) = time_budget {
        let budget = duration_in(text)
            .ok_or_else(|| format!("can't read time budget '{text}' (try \"45 minutes\")"))?;
        constraints.apply(&Constraint::TimeBudget(budget));
    }
    if let Some(skill) = skill {
        constraints.apply(&Constraint::Skill(skill));
    }
    Ok(constraints)
}

pub(super) fn cmd_cook(
    kitchen: &mut Kitchen<'_>,
    recipe: &Recipe,
    constraints: CookingConstraints,
) -> Result<(), String> {
    let reply = kitchen.start(recipe.id, constraints, Timestamp::now());
    if reply.turn.condition.is_some() {
        return Err(reply.turn.reply);
    }
    print_reply(&reply);
    Ok(())
}

/// Timers are checked first so a one-shot `say` still hears about them.
pub(super) fn cmd_say(kitchen: &mut Kitchen<'_>, text: &str) -> Result<(), String> {
    let now = Timestamp::now();
    print_reply(&kitchen.tick(now));
    print_reply(&kitchen.say(text, now));
    Ok(())
}

pub(super) fn cmd_listen(kitchen: &mut Kitchen<'_>) -> Result<(), String> {
    eprintln!(
        "Listening as {}. One line per utterance; \"quit\" to stop.",
        kitchen.member()
    );
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line.map_err(|e| format!("failed to read stdin: {e}"))?;
        let text = line.trim();
        if QUIT_WORDS.iter().any(|q| text.eq_ignore_ascii_case(q)) {
            break;
        }

        let now = Timestamp::now();
        print_reply(&kitchen.tick(now));
        if !text.is_empty() {
            print_reply(&kitchen.say(text, now));
        }
    }
    Ok(())
}

pub(super) fn cmd_status(kitchen: &Kitchen<'_>, storage: &Storage) -> Result<(), String> {
    let workstate = kitchen.workstate();
    let recipe = workstate.recipe_id().and_then(|id| storage.recipe(id));
    print!(
        "{}",
        format_status(kitchen.member(), workstate, recipe.as_ref(), Timestamp::now())
    );
    Ok(())
}

pub(super) fn cmd_tick(kitchen: &mut Kitchen<'_>) -> Result<(), String> {
    let reply = kitchen.tick(Timestamp::now());
    if reply.turn.reply.is_empty() {
        println!("No timers done.");
    }
    print_reply(&reply);
    Ok(())
}

pub(super) fn cmd_end(kitchen: &mut Kitchen<'_>) -> Result<(), String> {
    print_reply(&kitchen.end(Timestamp::now()));
    Ok(())
}

pub(super) fn cmd_forget(kitchen: &mut Kitchen<'_>) -> Result<(), String> {
    if let Persisted::Failed(e) = kitchen.forget(Timestamp::now()) {
        return Err(format!("failed to clear session: {e}"));
    }
    eprintln!("Forgot everything saved for {}", kitchen.member());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::time::Duration;

    #[test]
    fn constraints_from_flags() {
        let constraints = constraints(
            vec!["Vegan".into()],
            vec!["peanuts".into(), "sesame".into()],
            Some("1h30m"),
            Some(SkillLevel::Beginner),
        )
        .unwrap();

        assert!(constraints.diet.contains("vegan"));
        assert_eq!(constraints.allergies.len(), 2);
        assert_eq!(constraints.time_budget, Some(Duration::from_secs(5400)));
        assert_eq!(constraints.skill, Some(SkillLevel::Beginner));
    }

    #[test]
    fn unreadable_time_budget_is_an_error() {
        let err = constraints(vec![], vec![], Some("a while"), None).unwrap_err();
        assert!(err.contains("a while"));
    }
}
