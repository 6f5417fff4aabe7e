//! Recipe storage: add, load, list, and remove recipes.

use jiff::Timestamp;
use rusqlite::OptionalExtension;
use uuid::Uuid;

use crate::engine::RecipeSource;
use crate::model::Recipe;

use super::{Result, Storage, StorageError};

impl Storage {
    /// Adds a recipe, replacing any stored recipe with the same id.
    pub fn add_recipe(&self, recipe: &Recipe, added_at: Timestamp) -> Result<()> {
        let body = serde_json::to_string(recipe)?;
        self.conn.execute(
            "INSERT INTO recipe (id, title, body, created_at)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT (id) DO UPDATE SET title = ?2, body = ?3",
            rusqlite::params![recipe.id.to_string(), &recipe.title, body, added_at.to_string()],
        )?;
        Ok(())
    }

    pub fn load_recipe(&self, id: Uuid) -> Result<Recipe> {
        let body: Option<String> = self
            .conn
            .query_row(
                "SELECT body FROM recipe WHERE id = ?1",
                [id.to_string()],
                |row| row.get(0),
            )
            .optional()?;
        let body = body.ok_or(StorageError::RecipeNotFound(id))?;
        decode_recipe(id, &body)
    }

    /// All recipes, oldest first.
    pub fn list_recipes(&self) -> Result<Vec<Recipe>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, body FROM recipe ORDER BY created_at, title")?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut recipes = Vec::new();
        for row in rows {
            let (id, body) = row?;
            let id = id
                .parse::<Uuid>()
                .map_err(|e| StorageError::Corrupt(format!("invalid recipe id: {e}")))?;
            recipes.push(decode_recipe(id, &body)?);
        }
        Ok(recipes)
    }

    pub fn remove_recipe(&self, id: Uuid) -> Result<()> {
        let rows = self
            .conn
            .execute("DELETE FROM recipe WHERE id = ?1", [id.to_string()])?;
        if rows == 0 {
            return Err(StorageError::RecipeNotFound(id));
        }
        Ok(())
    }
}

fn decode_recipe(id: Uuid, body: &str) -> Result<Recipe> {
    let recipe: Recipe = serde_json::from_str(body)?;
    if recipe.id != id {
        return Err(StorageError::Corrupt(format!(
            "recipe row {id} holds recipe {}",
            recipe.id
        )));
    }
    Ok(recipe)
}

impl RecipeSource for Storage {
    fn recipe(&self, id: Uuid) -> Option<Recipe> {
        match self.load_recipe(id) {
            Ok(recipe) => Some(recipe),
            Err(StorageError::RecipeNotFound(_)) => None,
            Err(e) => {
                tracing::warn!(recipe = %id, error = %e, "failed to load recipe");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::time::Duration;

    use crate::model::{Difficulty, Ingredient, Step};

    fn test_storage() -> Storage {
        Storage::in_memory().unwrap()
    }

    fn sample_recipe(title: &str) -> Recipe {
        Recipe {
            id: Uuid::new_v4(),
            title: title.into(),
            steps: vec![Step {
                text: "Simmer for 10 minutes.".into(),
                duration: Some(Duration::from_secs(600)),
            }],
            ingredients: vec![Ingredient {
                name: "tomatoes".into(),
                quantity: Some(4.0),
                unit: None,
            }],
            servings: 2,
            category: "soup".into(),
            difficulty: Difficulty::Medium,
        }
    }

    #[test]
    fn add_and_load_recipe() {
        let storage = test_storage();
        let recipe = sample_recipe("Tomato soup");

        storage.add_recipe(&recipe, Timestamp::now()).unwrap();
        let loaded = storage.load_recipe(recipe.id).unwrap();

        assert_eq!(loaded, recipe);
    }

    #[test]
    fn add_replaces_same_id() {
        let storage = test_storage();
        let mut recipe = sample_recipe("Tomato soup");
        storage.add_recipe(&recipe, Timestamp::now()).unwrap();

        recipe.title = "Roasted tomato soup".into();
        storage.add_recipe(&recipe, Timestamp::now()).unwrap();

        let recipes = storage.list_recipes().unwrap();
        assert_eq!(recipes.len(), 1);
        assert_eq!(recipes[0].title, "Roasted tomato soup");
    }

    #[test]
    fn load_nonexistent_recipe_fails() {
        let storage = test_storage();
        let err = storage.load_recipe(Uuid::new_v4()).unwrap_err();

        assert!(matches!(err, StorageError::RecipeNotFound(_)));
    }

    #[test]
    fn list_recipes_sorted_by_added_at() {
        let storage = test_storage();
        let first = sample_recipe("First");
        let second = sample_recipe("Second");

        // Add in reverse order to verify sorting.
        storage
            .add_recipe(&second, Timestamp::new(2_000_000_000, 0).unwrap())
            .unwrap();
        storage
            .add_recipe(&first, Timestamp::new(1_000_000_000, 0).unwrap())
            .unwrap();

        let titles: Vec<String> = storage
            .list_recipes()
            .unwrap()
            .into_iter()
            .map(|r| r.title)
            .collect();
        assert_eq!(titles, ["First", "Second"]);
    }

    #[test]
    fn remove_recipe() {
        let storage = test_storage();
        let recipe = sample_recipe("Tomato soup");
        storage.add_recipe(&recipe, Timestamp::now()).unwrap();

        storage.remove_recipe(recipe.id).unwrap();

        assert!(storage.recipe(recipe.id).is_none());
        assert!(matches!(
            storage.remove_recipe(recipe.id).unwrap_err(),
            StorageError::RecipeNotFound(_)
        ));
    }

    #[test]
    fn corrupt_body_is_an_error() {
        let storage = test_storage();
        let id = Uuid::new_v4();
        storage
            .conn
            .execute(
                "INSERT INTO recipe (id, title, body, created_at) VALUES (?1, 'x', 'not json', 'x')",
                [id.to_string()],
            )
            .unwrap();

        assert!(matches!(
            storage.load_recipe(id).unwrap_err(),
            StorageError::Json(_)
        ));
        assert!(storage.recipe(id).is_none());
    }
}
