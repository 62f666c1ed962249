//! Order Repository

use super::{BaseRepository, RepoError, RepoResult, strip_table_prefix};
use crate::db::models::{
    Order, OrderNotesUpdate, OrderPaymentUpdate, OrderStatus,
};
use chrono::Utc;
use surrealdb::Surreal;
use surrealdb::engine::any::Any;

const TABLE: &str = "order";

#[derive(Clone)]
pub struct OrderRepository {
    base: BaseRepository,
}

impl OrderRepository {
    pub fn new(db: Surreal<Any>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all orders, newest first
    pub async fn find_all(&self) -> RepoResult<Vec<Order>> {
        // `order` 是 SurrealQL 关键字，查询中需要转义
        let orders: Vec<Order> = self
            .base
            .db()
            .query("SELECT * FROM `order` ORDER BY createdAt DESC")
            .await?
            .take(0)?;
        Ok(orders)
    }

    /// Find order by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Order>> {
        let pure_id = strip_table_prefix(TABLE, id);
        let order: Option<Order> = self.base.db().select((TABLE, pure_id)).await?;
        Ok(order)
    }

    /// Persist a new order
    pub async fn create(&self, order: Order) -> RepoResult<Order> {
        let created: Option<Order> = self.base.db().create(TABLE).content(order).await?;
        created.ok_or_else(|| RepoError::Database("Failed to save order".to_string()))
    }

    /// Update fulfillment status
    pub async fn update_status(&self, id: &str, status: OrderStatus) -> RepoResult<Order> {
        #[derive(serde::Serialize)]
        #[serde(rename_all = "camelCase")]
        struct StatusPatch {
            status: OrderStatus,
            updated_at: chrono::DateTime<Utc>,
        }

        let pure_id = strip_table_prefix(TABLE, id);
        let updated: Option<Order> = self
            .base
            .db()
            .update((TABLE, pure_id))
            .merge(StatusPatch {
                status,
                updated_at: Utc::now(),
            })
            .await?;
        updated.ok_or_else(|| RepoError::NotFound("Order not found".to_string()))
    }

    /// Update payment status/method (partial)
    pub async fn update_payment(&self, id: &str, data: OrderPaymentUpdate) -> RepoResult<Order> {
        #[derive(serde::Serialize)]
        #[serde(rename_all = "camelCase")]
        struct PaymentPatch {
            #[serde(skip_serializing_if = "Option::is_none")]
            payment_status: Option<crate::db::models::PaymentStatus>,
            #[serde(skip_serializing_if = "Option::is_none")]
            payment_method: Option<crate::db::models::PaymentMethod>,
            updated_at: chrono::DateTime<Utc>,
        }

        let pure_id = strip_table_prefix(TABLE, id);
        let updated: Option<Order> = self
            .base
            .db()
            .update((TABLE, pure_id))
            .merge(PaymentPatch {
                payment_status: data.payment_status,
                payment_method: data.payment_method,
                updated_at: Utc::now(),
            })
            .await?;
        updated.ok_or_else(|| RepoError::NotFound("Order not found".to_string()))
    }

    /// Update admin notes
    pub async fn update_notes(&self, id: &str, data: OrderNotesUpdate) -> RepoResult<Order> {
        #[derive(serde::Serialize)]
        #[serde(rename_all = "camelCase")]
        struct NotesPatch {
            notes: String,
            updated_at: chrono::DateTime<Utc>,
        }

        let pure_id = strip_table_prefix(TABLE, id);
        let updated: Option<Order> = self
            .base
            .db()
            .update((TABLE, pure_id))
            .merge(NotesPatch {
                notes: data.notes.unwrap_or_default(),
                updated_at: Utc::now(),
            })
            .await?;
        updated.ok_or_else(|| RepoError::NotFound("Order not found".to_string()))
    }

    /// Hard delete an order
    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let pure_id = strip_table_prefix(TABLE, id);
        let deleted: Option<Order> = self.base.db().delete((TABLE, pure_id)).await?;
        Ok(deleted.is_some())
    }
}
