//! Cooking constraints: what the cook can eat, has time for, and can handle.

use std::{collections::BTreeSet, fmt, time::Duration};

use serde::{Deserialize, Serialize};

/// Constraints supplied when a session starts.
///
/// Only a `SetConstraint` intent changes them mid-session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CookingConstraints {
    /// Dietary tags, lowercased (e.g. "vegan", "gluten free").
    #[serde(default)]
    pub diet: BTreeSet<String>,

    /// Ingredient names the cook must avoid, lowercased.
    #[serde(default)]
    pub allergies: BTreeSet<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_budget: Option<Duration>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skill: Option<SkillLevel>,
}

impl CookingConstraints {
    pub fn apply(&mut self, constraint: &Constraint) {
        match constraint {
            Constraint::Diet(tag) => {
                self.diet.insert(tag.to_lowercase());
            }
            Constraint::Allergy(name) => {
                self.allergies.insert(name.to_lowercase());
            }
            Constraint::TimeBudget(budget) => self.time_budget = Some(*budget),
            Constraint::Skill(level) => self.skill = Some(*level),
        }
    }

    /// The first allergy that `text` mentions, if any.
    ///
    /// Matches on whole allergy names within the lowercased text, with a
    /// trailing plural `s` ignored on the allergy ("peanuts" also catches "peanut").
    pub fn allergen_in(&self, text: &str) -> Option<&str> {
        let text = text.to_lowercase();
        self.allergies
            .iter()
            .find(|allergy| {
                let stem = allergy.strip_suffix('s').unwrap_or(allergy);
                !stem.is_empty() && text.contains(stem)
            })
            .map(String::as_str)
    }
}

/// A single constraint, as spoken ("I'm allergic to peanuts").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum Constraint {
    Diet(String),
    Allergy(String),
    TimeBudget(Duration),
    Skill(SkillLevel),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SkillLevel {
    Beginner,
    Intermediate,
    Advanced,
}

impl fmt::Display for SkillLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
        })
    }
}
