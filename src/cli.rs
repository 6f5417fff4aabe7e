//! CLI interface for Sous.
//!
//! Commands split into two groups:
//!
//! - `sous recipe add|list|show|remove`: the recipe library, no session needed.
//! - `sous cook|say|listen|status|tick|end|forget`: the acting member's
//!   cooking session, saved between invocations.
//!
//! Recipe references take a full UUID, an unambiguous id prefix, or an exact
//! title.

mod format;
mod recipe;
mod session;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use uuid::Uuid;

use sous::config::Config;
use sous::kitchen::{Persisted, Reply};
use sous::knowledge::KnowledgeBase;
use sous::member::resolve_member;
use sous::model::{Recipe, SkillLevel};
use sous::storage::Storage;

use recipe::RecipeCommand;

/// Sous: a hands-free cooking assistant.
#[derive(Debug, Parser)]
#[command(name = "sous", version, after_long_help = WORKFLOW_HELP)]
pub struct Cli {
    /// Who is cooking. Falls back to `$SOUS_MEMBER`, then the config file.
    #[arg(long, global = true)]
    member: Option<String>,

    /// Log more: -v for info, -vv for debug, -vvv for trace.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

const WORKFLOW_HELP: &str = r#"Workflow: cooking a recipe
  1. sous recipe add pancakes.toml
     → prints a recipe ID (e.g. a3b0fc12)
  2. sous cook a3b --allergy peanuts --time-budget "30 minutes"
  3. sous say "what's next"
     sous say "set a pasta timer for 8 minutes"
     sous say "what can I use instead of eggs"
  4. sous end

Hands-free:
  sous listen    one utterance per line, timers checked between lines"#;

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage the recipe library.
    Recipe {
        #[command(subcommand)]
        command: RecipeCommand,
    },

    /// Start cooking a recipe. Reads out the first step.
    Cook {
        /// Recipe ID (full UUID or unambiguous prefix) or exact title.
        recipe: String,

        /// Dietary tag to respect (e.g. `vegan`). Repeatable.
        #[arg(long)]
        diet: Vec<String>,

        /// Ingredient to avoid. Repeatable.
        #[arg(long)]
        allergy: Vec<String>,

        /// How long you have, spoken or short form: "45 minutes", "1h30m".
        #[arg(long)]
        time_budget: Option<String>,

        #[arg(long, value_enum)]
        skill: Option<SkillArg>,
    },

    /// Say one thing to the assistant and print the reply.
    Say {
        /// What you'd say out loud.
        #[arg(required = true, trailing_var_arg = true)]
        words: Vec<String>,
    },

    /// Read utterances from stdin, one per line, until EOF or "quit".
    ///
    /// Timers are checked before every line.
    Listen,

    /// Show the current session: recipe, step, timers, and constraints.
    Status,

    /// Check timers and announce any that have finished.
    Tick,

    /// End the cooking session.
    End,

    /// Drop everything saved for the member, session included.
    Forget,
}

/// CLI-facing skill level, mapped to the domain `SkillLevel`.
#[derive(Debug, Clone, ValueEnum)]
pub enum SkillArg {
    Beginner,
    Intermediate,
    Advanced,
}

impl SkillArg {
    fn to_domain(&self) -> SkillLevel {
        match self {
            Self::Beginner => SkillLevel::Beginner,
            Self::Intermediate => SkillLevel::Intermediate,
            Self::Advanced => SkillLevel::Advanced,
        }
    }
}

/// Run a parsed command, returning an error message on failure.
pub fn run(
    cli: Cli,
    config: &Config,
    storage: &Storage,
    knowledge: &KnowledgeBase,
) -> Result<(), String> {
    let member = resolve_member(cli.member.as_deref(), config);
    let kitchen = || session::open(&member, storage, knowledge);

    match cli.command {
        Command::Recipe { command } => recipe::run(&command, storage),
        Command::Cook {
            recipe,
            diet,
            allergy,
            time_budget,
            skill,
        } => {
            let recipe = resolve_recipe(storage, &recipe)?;
            let constraints = session::constraints(
                diet,
                allergy,
                time_budget.as_deref(),
                skill.as_ref().map(SkillArg::to_domain),
            )?;
            session::cmd_cook(&mut kitchen()?, &recipe, constraints)
        }
        Command::Say { words } => session::cmd_say(&mut kitchen()?, &words.join(" ")),
        Command::Listen => session::cmd_listen(&mut kitchen()?),
        Command::Status => session::cmd_status(&kitchen()?, storage),
        Command::Tick => session::cmd_tick(&mut kitchen()?),
        Command::End => session::cmd_end(&mut kitchen()?),
        Command::Forget => session::cmd_forget(&mut kitchen()?),
    }
}

/// Print the reply, and a warning on stderr if the session couldn't be saved.
fn print_reply(reply: &Reply) {
    if !reply.turn.reply.is_empty() {
        println!("{}", reply.turn.reply);
    }
    if let Persisted::Failed(e) = &reply.persisted {
        eprintln!("warning: session not saved: {e}");
    }
}

/// Resolve a recipe reference (full UUID, unambiguous prefix, or exact title).
fn resolve_recipe(storage: &Storage, reference: &str) -> Result<Recipe, String> {
    if let Ok(id) = reference.parse::<Uuid>() {
        return storage
            .load_recipe(id)
            .map_err(|e| format!("recipe not found: {e}"));
    }

    let recipes = storage
        .list_recipes()
        .map_err(|e| format!("failed to list recipes: {e}"))?;

    if let Some(recipe) = recipes
        .iter()
        .find(|r| r.title.eq_ignore_ascii_case(reference.trim()))
    {
        return Ok(recipe.clone());
    }

    let matches: Vec<&Recipe> = recipes
        .iter()
        .filter(|r| r.id.to_string().starts_with(reference))
        .collect();

    match matches.as_slice() {
        [] => Err(format!("no recipe matching '{reference}'")),
        [recipe] => Ok((*recipe).clone()),
        _ => {
            let ids: Vec<String> = matches.iter().map(|r| format::short_id(r.id)).collect();
            Err(format!(
                "'{reference}' is ambiguous: matches {} recipes: {}",
                matches.len(),
                ids.join(", ")
            ))
        }
    }
}
