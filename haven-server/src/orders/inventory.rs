//! 库存扣减
//!
//! 订单落库后，对每个订单行引用的菜单项，其关联的每种原料数量 -1。
//! 扣减量与订单行数量无关 (固定 1)，无零值下限，失败不回滚先前的
//! 扣减，错误只记日志不上抛。

use surrealdb::Surreal;
use surrealdb::engine::any::Any;

use crate::db::models::OrderItem;
use crate::db::repository::{IngredientRepository, MenuItemRepository};

/// 按订单行扣减关联原料库存 (尽力而为)
pub async fn adjust_inventory(db: &Surreal<Any>, items: &[OrderItem]) {
    let menu_repo = MenuItemRepository::new(db.clone());
    let ingredient_repo = IngredientRepository::new(db.clone());

    for item in items {
        let Some(menu_id) = &item.menu_item else {
            continue;
        };

        match menu_repo.find_by_id(&menu_id.to_string()).await {
            Ok(Some(menu_item)) => {
                for ingredient in &menu_item.ingredients {
                    if let Err(e) = ingredient_repo.decrement(ingredient).await {
                        tracing::warn!(
                            ingredient = %ingredient,
                            error = %e,
                            "Inventory decrement failed"
                        );
                    }
                }
            }
            Ok(None) => {
                tracing::warn!(
                    menu_item = %menu_id,
                    "Ordered menu item no longer exists, skipping inventory adjustment"
                );
            }
            Err(e) => {
                tracing::warn!(menu_item = %menu_id, error = %e, "Menu item lookup failed");
            }
        }
    }
}
