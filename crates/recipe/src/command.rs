use std::sync::Arc;

use mealplanner_shared::recipe::{RawRecipe, Recipe, new_id};
use mealplanner_shared::{Identity, Storage, load_json, save_json};
use validator::Validate;

use crate::query::{SourceFilter, TypeFilter};

/// Returns the persisted personal set of a user, empty when none exists yet.
pub async fn load_personal(
    storage: &(impl Storage + ?Sized),
    identity: &Identity,
) -> mealplanner_shared::Result<Vec<Recipe>> {
    Ok(load_json(storage, &identity.recipes_key())
        .await?
        .unwrap_or_default())
}

/// Default and personal recipes of one user.
///
/// Every mutation rewrites the whole personal set. When the write fails the
/// in-memory set keeps the change and the error is returned.
pub struct Catalog<S: Storage> {
    storage: S,
    identity: Identity,
    defaults: Arc<[Recipe]>,
    personal: Vec<Recipe>,
}

impl<S: Storage> Catalog<S> {
    pub async fn load(
        storage: S,
        identity: Identity,
        defaults: Arc<[Recipe]>,
    ) -> mealplanner_shared::Result<Self> {
        let personal = load_personal(&storage, &identity).await?;

        tracing::debug!(
            user = identity.user_id(),
            personal = personal.len(),
            "recipe catalog loaded"
        );

        Ok(Self {
            storage,
            identity,
            defaults,
            personal,
        })
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn defaults(&self) -> &[Recipe] {
        &self.defaults
    }

    pub fn personal(&self) -> &[Recipe] {
        &self.personal
    }

    pub fn find(&self, id: &str) -> Option<&Recipe> {
        self.defaults
            .iter()
            .chain(self.personal.iter())
            .find(|recipe| recipe.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.find(id).is_some()
    }

    pub fn merged_view(&self, filter: SourceFilter) -> Vec<Recipe> {
        crate::merged_view(&self.defaults, &self.personal, filter)
    }

    pub fn query(&self, source: SourceFilter, type_filter: TypeFilter, search: &str) -> Vec<Recipe> {
        crate::query(&self.defaults, &self.personal, source, type_filter, search)
    }

    /// Stores a new personal recipe under a fresh id.
    pub async fn add(&mut self, input: RawRecipe) -> mealplanner_shared::Result<Recipe> {
        let mut recipe = input.normalize(false);
        recipe.id = new_id();
        recipe.validate()?;

        if self.contains(&recipe.id) {
            return Err(mealplanner_shared::Error::DuplicateId(recipe.id));
        }

        self.personal.push(recipe.clone());
        self.save().await?;

        tracing::info!(
            user = self.identity.user_id(),
            id = %recipe.id,
            name = %recipe.name,
            "personal recipe added"
        );

        Ok(recipe)
    }

    /// Replaces the personal recipe with the same id in place. The stored copy
    /// is always personal. Returns `None` and leaves the set untouched when no
    /// personal recipe has that id.
    pub async fn update(&mut self, recipe: Recipe) -> mealplanner_shared::Result<Option<Recipe>> {
        let Some(position) = self.personal.iter().position(|r| r.id == recipe.id) else {
            tracing::warn!(
                user = self.identity.user_id(),
                id = %recipe.id,
                "update ignored, recipe is not personal"
            );

            return Ok(None);
        };

        let mut recipe = Recipe {
            name: recipe.name.trim().to_owned(),
            is_default: false,
            ..recipe
        };
        recipe.validate()?;

        recipe.ingredients.retain(|i| !i.trim().is_empty());
        recipe.steps.retain(|s| !s.trim().is_empty());
        self.personal[position] = recipe.clone();
        self.save().await?;

        tracing::info!(
            user = self.identity.user_id(),
            id = %recipe.id,
            "personal recipe updated"
        );

        Ok(Some(recipe))
    }

    /// Copies a default recipe, with the caller's edits, into the personal set
    /// under a fresh id. The default catalog itself is never modified.
    pub async fn fork_default(&mut self, edited: Recipe) -> mealplanner_shared::Result<Option<Recipe>> {
        if !self.defaults.iter().any(|r| r.id == edited.id) {
            return Ok(None);
        }

        let mut recipe = Recipe {
            id: new_id(),
            name: edited.name.trim().to_owned(),
            is_default: false,
            ..edited
        };
        recipe.validate()?;
        recipe.ingredients.retain(|i| !i.trim().is_empty());
        recipe.steps.retain(|s| !s.trim().is_empty());

        self.personal.push(recipe.clone());
        self.save().await?;

        tracing::info!(
            user = self.identity.user_id(),
            id = %recipe.id,
            "default recipe forked into personal set"
        );

        Ok(Some(recipe))
    }

    /// Removes a personal recipe. Returns whether anything was removed.
    pub async fn delete(&mut self, id: &str) -> mealplanner_shared::Result<bool> {
        let before = self.personal.len();
        self.personal.retain(|recipe| recipe.id != id);

        if self.personal.len() == before {
            tracing::debug!(user = self.identity.user_id(), id, "delete ignored, not found");

            return Ok(false);
        }

        self.save().await?;

        tracing::info!(user = self.identity.user_id(), id, "personal recipe deleted");

        Ok(true)
    }

    async fn save(&self) -> mealplanner_shared::Result<()> {
        save_json(&self.storage, &self.identity.recipes_key(), &self.personal).await
    }
}
