//! Recipe files: the hand-written form recipes are imported from.
//!
//! TOML and JSON share one shape. Steps may be plain strings or tables; a
//! step without an explicit time gets one parsed from its text, so
//! "Simmer for 10 minutes." is a 10-minute step.
//!
//! ```toml
//! title = "Tomato soup"
//! servings = 4
//! category = "soup"
//! difficulty = "easy"
//!
//! ingredients = [
//!     { name = "tomatoes", quantity = 6 },
//!     { name = "stock", quantity = 2, unit = "cups" },
//!     { name = "salt" },
//! ]
//!
//! steps = [
//!     "Chop the tomatoes.",
//!     { text = "Simmer with the stock.", minutes = 20 },
//! ]
//! ```

use std::{fs, io, path::Path, time::Duration};

use serde::Deserialize;
use uuid::Uuid;

use crate::classify::duration_in;
use crate::model::{Difficulty, Ingredient, Recipe, Step};

#[derive(Debug, thiserror::Error)]
pub enum RecipeFileError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported recipe file type: {0} (expected .toml or .json)")]
    Unsupported(String),

    #[error("invalid recipe: {0}")]
    Invalid(String),
}

pub type Result<T> = core::result::Result<T, RecipeFileError>;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RecipeFile {
    title: String,
    servings: u32,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    difficulty: Difficulty,
    #[serde(default)]
    ingredients: Vec<Ingredient>,
    steps: Vec<StepEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StepEntry {
    Text(String),
    Timed {
        text: String,
        #[serde(default)]
        minutes: Option<f64>,
    },
}

/// Read a recipe from a `.toml` or `.json` file. The recipe gets a fresh id.
pub fn load(path: &Path) -> Result<Recipe> {
    let text = fs::read_to_string(path)?;
    match path.extension().and_then(|e| e.to_str()) {
        Some("toml") => parse_toml(&text),
        Some("json") => parse_json(&text),
        other => Err(RecipeFileError::Unsupported(
            other.unwrap_or("no extension").to_string(),
        )),
    }
}

pub fn parse_toml(text: &str) -> Result<Recipe> {
    let file: RecipeFile = toml::from_str(text)?;
    file.into_recipe()
}

pub fn parse_json(text: &str) -> Result<Recipe> {
    let file: RecipeFile = serde_json::from_str(text)?;
    file.into_recipe()
}

impl RecipeFile {
    fn into_recipe(self) -> Result<Recipe> {
        let title = self.title.trim().to_string();
        if title.is_empty() {
            return Err(RecipeFileError::Invalid("title is empty".into()));
        }
        if self.servings == 0 {
            return Err(RecipeFileError::Invalid("servings must be at least 1".into()));
        }
        if self.steps.is_empty() {
            return Err(RecipeFileError::Invalid(format!("\"{title}\" has no steps")));
        }
        if let Some(bad) = self
            .ingredients
            .iter()
            .find(|i| i.quantity.is_some_and(|q| !q.is_finite() || q < 0.0))
        {
            return Err(RecipeFileError::Invalid(format!(
                "bad quantity for {}",
                bad.name
            )));
        }

        let steps = self
            .steps
            .into_iter()
            .map(StepEntry::into_step)
            .collect::<Result<Vec<_>>>()?;

        Ok(Recipe {
            id: Uuid::new_v4(),
            title,
            steps,
            ingredients: self.ingredients,
            servings: self.servings,
            category: self.category.unwrap_or_else(|| "general".to_string()),
            difficulty: self.difficulty,
        })
    }
}

impl StepEntry {
    fn into_step(self) -> Result<Step> {
        let (text, minutes) = match self {
            Self::Text(text) => (text, None),
            Self::Timed { text, minutes } => (text, minutes),
        };
        let duration = match minutes {
            Some(m) if m > 0.0 => match Duration::try_from_secs_f64(m * 60.0) {
                Ok(d) => Some(d),
                Err(_) => return Err(bad_time(&text)),
            },
            Some(_) => return Err(bad_time(&text)),
            None => duration_in(&text),
        };
        Ok(Step { text, duration })
    }
}

fn bad_time(text: &str) -> RecipeFileError {
    RecipeFileError::Invalid(format!("step \"{text}\" has a bad time"))
}

#[cfg(test)]
mod tests {
    use super::*;

    use tempfile::TempDir;

    const SOUP: &str = r#"
        title = "Tomato soup"
        servings = 4
        category = "soup"
        difficulty = "medium"

        ingredients = [
            { name = "tomatoes", quantity = 6 },
            { name = "stock", quantity = 2, unit = "cups" },
            { name = "salt" },
        ]

        steps = [
            "Chop the tomatoes.",
            "Simmer for 20 minutes.",
            { text = "Blend until smooth.", minutes = 1.5 },
        ]
    "#;

    #[test]
    fn parses_toml_recipe() {
        let recipe = parse_toml(SOUP).unwrap();

        assert_eq!(recipe.title, "Tomato soup");
        assert_eq!(recipe.servings, 4);
        assert_eq!(recipe.difficulty, Difficulty::Medium);
        assert_eq!(recipe.ingredients.len(), 3);
        assert_eq!(recipe.ingredients[2].quantity, None);
        assert_eq!(recipe.steps[0].duration, None);
        assert_eq!(recipe.steps[1].duration, Some(Duration::from_secs(1200)));
        assert_eq!(recipe.steps[2].duration, Some(Duration::from_secs(90)));
    }

    #[test]
    fn parses_json_recipe() {
        let recipe = parse_json(
            r#"{
                "title": "Toast",
                "servings": 1,
                "steps": ["Toast the bread for 2 minutes.", {"text": "Butter it."}]
            }"#,
        )
        .unwrap();

        assert_eq!(recipe.category, "general");
        assert_eq!(recipe.difficulty, Difficulty::Easy);
        assert_eq!(recipe.steps[0].duration, Some(Duration::from_secs(120)));
        assert_eq!(recipe.steps[1].duration, None);
    }

    #[test]
    fn rejects_recipe_without_steps() {
        let err = parse_json(r#"{"title": "Air", "servings": 1, "steps": []}"#).unwrap_err();
        assert!(matches!(err, RecipeFileError::Invalid(_)));
    }

    #[test]
    fn rejects_zero_servings() {
        let err = parse_json(r#"{"title": "Air", "servings": 0, "steps": ["Breathe."]}"#)
            .unwrap_err();
        assert!(matches!(err, RecipeFileError::Invalid(_)));
    }

    #[test]
    fn rejects_impossible_step_times() {
        for minutes in ["1e300", "-5", "0"] {
            let text = format!(
                r#"{{"title": "X", "servings": 1, "steps": [{{"text": "Wait.", "minutes": {minutes}}}]}}"#
            );
            let err = parse_json(&text).unwrap_err();
            assert!(matches!(err, RecipeFileError::Invalid(_)), "{minutes}: {err}");
        }
    }

    #[test]
    fn huge_spoken_step_time_is_ignored() {
        let recipe = parse_json(
            r#"{"title": "X", "servings": 1, "steps": ["Rest for 99999999999999999999 hours."]}"#,
        )
        .unwrap();

        assert_eq!(recipe.steps[0].duration, None);
    }

    #[test]
    fn rejects_unknown_fields() {
        let err = parse_json(r#"{"title": "X", "servings": 1, "steps": ["a"], "color": 1}"#)
            .unwrap_err();
        assert!(matches!(err, RecipeFileError::Json(_)));
    }

    #[test]
    fn loads_by_extension() {
        let dir = TempDir::new().unwrap();
        let toml_path = dir.path().join("soup.toml");
        fs::write(&toml_path, SOUP).unwrap();
        let txt_path = dir.path().join("soup.txt");
        fs::write(&txt_path, SOUP).unwrap();

        assert_eq!(load(&toml_path).unwrap().title, "Tomato soup");
        assert!(matches!(
            load(&txt_path).unwrap_err(),
            RecipeFileError::Unsupported(ext) if ext == "txt"
        ));
    }
}
