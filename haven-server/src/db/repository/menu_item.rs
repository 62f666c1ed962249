//! Menu Item Repository

use super::{BaseRepository, RepoError, RepoResult, record_id, strip_table_prefix};
use crate::db::models::{MenuItem, MenuItemCreate, MenuItemUpdate};
use chrono::Utc;
use surrealdb::RecordId;
use surrealdb::Surreal;
use surrealdb::engine::any::Any;

const TABLE: &str = "menu_item";

#[derive(Clone)]
pub struct MenuItemRepository {
    base: BaseRepository,
}

impl MenuItemRepository {
    pub fn new(db: Surreal<Any>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all menu items
    pub async fn find_all(&self) -> RepoResult<Vec<MenuItem>> {
        let items: Vec<MenuItem> = self
            .base
            .db()
            .query("SELECT * FROM menu_item ORDER BY name")
            .await?
            .take(0)?;
        Ok(items)
    }

    /// Find menu item by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<MenuItem>> {
        let pure_id = strip_table_prefix(TABLE, id);
        let item: Option<MenuItem> = self.base.db().select((TABLE, pure_id)).await?;
        Ok(item)
    }

    /// Create a new menu item
    pub async fn create(&self, data: MenuItemCreate) -> RepoResult<MenuItem> {
        let name = data
            .name
            .ok_or_else(|| RepoError::Validation("Name, price, and category are required".into()))?;
        let price = data
            .price
            .ok_or_else(|| RepoError::Validation("Name, price, and category are required".into()))?;
        let category = data
            .category
            .ok_or_else(|| RepoError::Validation("Name, price, and category are required".into()))?;

        let ingredients: Vec<RecordId> = data
            .ingredients
            .iter()
            .map(|id| record_id("ingredient", id))
            .collect();

        let now = Utc::now();
        let item = MenuItem {
            id: None,
            name,
            description: data.description.unwrap_or_default(),
            price,
            category,
            available: data.available.unwrap_or(true),
            ingredients,
            image: data.image,
            last_updated: now,
            created_at: now,
        };

        let created: Option<MenuItem> = self.base.db().create(TABLE).content(item).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create menu item".to_string()))
    }

    /// Update a menu item, bumping `last_updated`
    pub async fn update(&self, id: &str, data: MenuItemUpdate) -> RepoResult<MenuItem> {
        let pure_id = strip_table_prefix(TABLE, id);

        if self.find_by_id(pure_id).await?.is_none() {
            return Err(RepoError::NotFound("Menu item not found".to_string()));
        }

        #[derive(serde::Serialize)]
        #[serde(rename_all = "camelCase")]
        struct MenuItemPatch {
            #[serde(skip_serializing_if = "Option::is_none")]
            name: Option<String>,
            #[serde(skip_serializing_if = "Option::is_none")]
            description: Option<String>,
            #[serde(skip_serializing_if = "Option::is_none")]
            price: Option<f64>,
            #[serde(skip_serializing_if = "Option::is_none")]
            category: Option<String>,
            #[serde(skip_serializing_if = "Option::is_none")]
            available: Option<bool>,
            /// "ingredient:id" 字符串格式，与 create 路径保持一致
            #[serde(skip_serializing_if = "Option::is_none")]
            ingredients: Option<Vec<String>>,
            #[serde(skip_serializing_if = "Option::is_none")]
            image: Option<String>,
            last_updated: chrono::DateTime<Utc>,
        }

        let patch = MenuItemPatch {
            name: data.name,
            description: data.description,
            price: data.price,
            category: data.category,
            available: data.available,
            ingredients: data.ingredients.map(|ids| {
                ids.iter()
                    .map(|id| record_id("ingredient", id).to_string())
                    .collect()
            }),
            image: data.image,
            last_updated: Utc::now(),
        };

        let updated: Option<MenuItem> =
            self.base.db().update((TABLE, pure_id)).merge(patch).await?;
        updated.ok_or_else(|| RepoError::NotFound("Menu item not found".to_string()))
    }

    /// Hard delete a menu item
    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let pure_id = strip_table_prefix(TABLE, id);
        let deleted: Option<MenuItem> = self.base.db().delete((TABLE, pure_id)).await?;
        Ok(deleted.is_some())
    }
}
