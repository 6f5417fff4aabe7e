//! Recipe library commands: add, list, show, remove.

use std::path::PathBuf;

use clap::Subcommand;
use jiff::Timestamp;

use sous::recipe_file;
use sous::storage::Storage;

use super::format::{format_recipe, format_recipe_line, short_id};
use super::resolve_recipe;

#[derive(Debug, Subcommand)]
pub enum RecipeCommand {
    /// Import recipes from `.toml` or `.json` files. Prints each new recipe ID.
    Add {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// List recipes, oldest first.
    List,

    /// Show a recipe's ingredients and steps.
    Show {
        /// Recipe ID (full UUID or unambiguous prefix) or exact title.
        recipe: String,
    },

    /// Remove a recipe from the library.
    Remove {
        /// Recipe ID (full UUID or unambiguous prefix) or exact title.
        recipe: String,
    },
}

pub(super) fn run(command: &RecipeCommand, storage: &Storage) -> Result<(), String> {
    match command {
        RecipeCommand::Add { files } => cmd_add(storage, files),
        RecipeCommand::List => cmd_list(storage),
        RecipeCommand::Show { recipe } => {
            let recipe = resolve_recipe(storage, recipe)?;
            print!("{}", format_recipe(&recipe));
            Ok(())
        }
        RecipeCommand::Remove { recipe } => {
            let recipe = resolve_recipe(storage, recipe)?;
            storage
                .remove_recipe(recipe.id)
                .map_err(|e| format!("failed to remove recipe: {e}"))?;
            eprintln!("Removed {} ({})", recipe.title, short_id(recipe.id));
            Ok(())
        }
    }
}

/// Every file is parsed before anything is stored, so one bad file adds nothing.
fn cmd_add(storage: &Storage, files: &[PathBuf]) -> Result<(), String> {
    let recipes = files
        .iter()
        .map(|path| {
            recipe_file::load(path).map_err(|e| format!("{}: {e}", path.display()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let now = Timestamp::now();
    for recipe in &recipes {
        storage
            .add_recipe(recipe, now)
            .map_err(|e| format!("failed to add {}: {e}", recipe.title))?;
        tracing::info!(recipe = %recipe.id, title = %recipe.title, "recipe added");
        println!("{}", recipe.id);
    }
    Ok(())
}

fn cmd_list(storage: &Storage) -> Result<(), String> {
    let recipes = storage
        .list_recipes()
        .map_err(|e| format!("failed to list recipes: {e}"))?;

    if recipes.is_empty() {
        println!("No recipes");
        return Ok(());
    }

    for recipe in &recipes {
        println!("{}", format_recipe_line(recipe));
    }
    Ok(())
}
