//! Reservation Repository

use super::{BaseRepository, RepoError, RepoResult, strip_table_prefix};
use crate::db::models::{Reservation, ReservationStatus};
use chrono::Utc;
use surrealdb::Surreal;
use surrealdb::engine::any::Any;

const TABLE: &str = "reservation";

#[derive(Clone)]
pub struct ReservationRepository {
    base: BaseRepository,
}

impl ReservationRepository {
    pub fn new(db: Surreal<Any>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all reservations, newest first
    pub async fn find_all(&self) -> RepoResult<Vec<Reservation>> {
        let reservations: Vec<Reservation> = self
            .base
            .db()
            .query("SELECT * FROM reservation ORDER BY createdAt DESC")
            .await?
            .take(0)?;
        Ok(reservations)
    }

    /// Find reservation by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Reservation>> {
        let pure_id = strip_table_prefix(TABLE, id);
        let reservation: Option<Reservation> = self.base.db().select((TABLE, pure_id)).await?;
        Ok(reservation)
    }

    /// Find reservation by (token, table) pair
    pub async fn find_by_token_and_table(
        &self,
        token: &str,
        table: &str,
    ) -> RepoResult<Option<Reservation>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM reservation WHERE token = $token AND `table` = $table LIMIT 1")
            .bind(("token", token.to_string()))
            .bind(("table", table.to_string()))
            .await?;
        let reservations: Vec<Reservation> = result.take(0)?;
        Ok(reservations.into_iter().next())
    }

    /// 消费预订令牌 (最多一次)
    ///
    /// 条件更新充当 compare-and-swap：只有 `has_ordered = false` 的记录
    /// 会被翻转并返回。两个并发请求持同一令牌时恰好一个成功。
    /// 返回 `None` 表示令牌已被用过 (调用方需先确认令牌存在)。
    pub async fn consume_token(
        &self,
        token: &str,
        table: &str,
    ) -> RepoResult<Option<Reservation>> {
        let mut result = self
            .base
            .db()
            .query(
                "UPDATE reservation SET hasOrdered = true, updatedAt = $now \
                 WHERE token = $token AND `table` = $table AND hasOrdered = false \
                 RETURN AFTER",
            )
            .bind(("token", token.to_string()))
            .bind(("table", table.to_string()))
            .bind(("now", Utc::now()))
            .await?;
        let updated: Vec<Reservation> = result.take(0)?;
        Ok(updated.into_iter().next())
    }

    /// Persist a new reservation
    pub async fn create(&self, reservation: Reservation) -> RepoResult<Reservation> {
        let created: Option<Reservation> =
            self.base.db().create(TABLE).content(reservation).await?;
        created.ok_or_else(|| RepoError::Database("Failed to save reservation".to_string()))
    }

    /// Update reservation status
    pub async fn update_status(
        &self,
        id: &str,
        status: ReservationStatus,
    ) -> RepoResult<Reservation> {
        #[derive(serde::Serialize)]
        #[serde(rename_all = "camelCase")]
        struct StatusPatch {
            status: ReservationStatus,
            updated_at: chrono::DateTime<Utc>,
        }

        let pure_id = strip_table_prefix(TABLE, id);
        let updated: Option<Reservation> = self
            .base
            .db()
            .update((TABLE, pure_id))
            .merge(StatusPatch {
                status,
                updated_at: Utc::now(),
            })
            .await?;
        updated.ok_or_else(|| RepoError::NotFound("Not found".to_string()))
    }

    /// Hard delete a reservation
    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let pure_id = strip_table_prefix(TABLE, id);
        let deleted: Option<Reservation> = self.base.db().delete((TABLE, pure_id)).await?;
        Ok(deleted.is_some())
    }
}
