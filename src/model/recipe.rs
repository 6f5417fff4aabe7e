//! Recipe types: read-only input to the assistant.

use std::{fmt, time::Duration};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A recipe as stored in the recipe book.
///
/// The assistant never mutates a recipe. Scaling is applied on read,
/// always from the original quantities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub id: Uuid,
    pub title: String,
    pub steps: Vec<Step>,
    pub ingredients: Vec<Ingredient>,

    /// How many servings the unscaled quantities make.
    pub servings: u32,
    pub category: String,
    pub difficulty: Difficulty,
}

impl Recipe {
    pub fn step(&self, index: usize) -> Option<&Step> {
        self.steps.get(index)
    }

    /// Ingredients multiplied by `factor`, computed from the original quantities.
    pub fn scaled_ingredients(&self, factor: f64) -> Vec<Ingredient> {
        self.ingredients
            .iter()
            .map(|i| Ingredient {
                name: i.name.clone(),
                quantity: i.quantity.map(|q| q * factor),
                unit: i.unit.clone(),
            })
            .collect()
    }

    /// Sum of every step's embedded duration.
    pub fn total_duration(&self) -> Duration {
        self.steps.iter().filter_map(|s| s.duration).sum()
    }
}

/// A single instruction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    pub text: String,

    /// How long the step takes, when the step is timed ("bake for 20 minutes").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<Duration>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: String,

    /// `None` for unmeasured ingredients ("salt to taste").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

impl fmt::Display for Ingredient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(q) = self.quantity {
            write!(f, "{} ", format_quantity(q))?;
        }
        if let Some(unit) = &self.unit {
            write!(f, "{unit} ")?;
        }
        f.write_str(&self.name)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

/// Render a quantity with at most two decimals and no trailing zeros.
///
/// `4.0` renders as `4`, `1.5` as `1.5`, `1.0 / 3.0` as `0.33`.
pub fn format_quantity(quantity: f64) -> String {
    let rendered = format!("{quantity:.2}");
    let trimmed = rendered.trim_end_matches('0').trim_end_matches('.');
    if trimmed.is_empty() || trimmed == "-" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}
