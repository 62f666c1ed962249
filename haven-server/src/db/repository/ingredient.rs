//! Ingredient Repository

use super::{BaseRepository, RepoError, RepoResult, strip_table_prefix};
use crate::db::models::{Ingredient, IngredientCreate, IngredientUpdate};
use chrono::Utc;
use surrealdb::RecordId;
use surrealdb::Surreal;
use surrealdb::engine::any::Any;

const TABLE: &str = "ingredient";

#[derive(Clone)]
pub struct IngredientRepository {
    base: BaseRepository,
}

impl IngredientRepository {
    pub fn new(db: Surreal<Any>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all ingredients ordered by name
    pub async fn find_all(&self) -> RepoResult<Vec<Ingredient>> {
        let ingredients: Vec<Ingredient> = self
            .base
            .db()
            .query("SELECT * FROM ingredient ORDER BY name")
            .await?
            .take(0)?;
        Ok(ingredients)
    }

    /// Find ingredient by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Ingredient>> {
        let pure_id = strip_table_prefix(TABLE, id);
        let ingredient: Option<Ingredient> = self.base.db().select((TABLE, pure_id)).await?;
        Ok(ingredient)
    }

    /// Find ingredient by name
    pub async fn find_by_name(&self, name: &str) -> RepoResult<Option<Ingredient>> {
        let name_owned = name.to_string();
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM ingredient WHERE name = $name LIMIT 1")
            .bind(("name", name_owned))
            .await?;
        let ingredients: Vec<Ingredient> = result.take(0)?;
        Ok(ingredients.into_iter().next())
    }

    /// Create a new ingredient
    pub async fn create(&self, data: IngredientCreate) -> RepoResult<Ingredient> {
        let name = data
            .name
            .ok_or_else(|| RepoError::Validation("Ingredient name is required".to_string()))?;

        // Check duplicate name
        if self.find_by_name(&name).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Ingredient with this name already exists: {}",
                name
            )));
        }

        let now = Utc::now();
        let ingredient = Ingredient {
            id: None,
            name,
            quantity: data.quantity.unwrap_or(0.0),
            unit: data.unit.unwrap_or_else(|| "pcs".to_string()),
            category: data.category.unwrap_or_else(|| "General".to_string()),
            threshold: data.threshold.unwrap_or(10.0),
            last_updated: now,
            created_at: now,
        };

        let created: Option<Ingredient> = self.base.db().create(TABLE).content(ingredient).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create ingredient".to_string()))
    }

    /// Update an ingredient, bumping `last_updated`
    pub async fn update(&self, id: &str, data: IngredientUpdate) -> RepoResult<Ingredient> {
        let pure_id = strip_table_prefix(TABLE, id);

        let existing = self
            .find_by_id(pure_id)
            .await?
            .ok_or_else(|| RepoError::NotFound("Ingredient not found".to_string()))?;

        // Check duplicate name if changing
        if let Some(ref new_name) = data.name
            && new_name != &existing.name
            && self.find_by_name(new_name).await?.is_some()
        {
            return Err(RepoError::Duplicate(format!(
                "Ingredient with this name already exists: {}",
                new_name
            )));
        }

        #[derive(serde::Serialize)]
        #[serde(rename_all = "camelCase")]
        struct IngredientPatch {
            #[serde(skip_serializing_if = "Option::is_none")]
            name: Option<String>,
            #[serde(skip_serializing_if = "Option::is_none")]
            quantity: Option<f64>,
            #[serde(skip_serializing_if = "Option::is_none")]
            unit: Option<String>,
            #[serde(skip_serializing_if = "Option::is_none")]
            category: Option<String>,
            #[serde(skip_serializing_if = "Option::is_none")]
            threshold: Option<f64>,
            last_updated: chrono::DateTime<Utc>,
        }

        let patch = IngredientPatch {
            name: data.name,
            quantity: data.quantity,
            unit: data.unit,
            category: data.category,
            threshold: data.threshold,
            last_updated: Utc::now(),
        };

        let updated: Option<Ingredient> =
            self.base.db().update((TABLE, pure_id)).merge(patch).await?;
        updated.ok_or_else(|| RepoError::NotFound("Ingredient not found".to_string()))
    }

    /// 出餐扣减：数量 -1，无下限
    ///
    /// 订单流程中的尽力而为副作用；调用方负责吞掉错误。
    pub async fn decrement(&self, id: &RecordId) -> RepoResult<()> {
        self.base
            .db()
            .query("UPDATE $ingredient SET quantity -= 1.0, lastUpdated = $now")
            .bind(("ingredient", id.clone()))
            .bind(("now", Utc::now()))
            .await?
            .check()?;
        Ok(())
    }

    /// Hard delete an ingredient
    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let pure_id = strip_table_prefix(TABLE, id);
        let deleted: Option<Ingredient> = self.base.db().delete((TABLE, pure_id)).await?;
        Ok(deleted.is_some())
    }
}
