//! Reservation Model

use super::serde_helpers;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Reservation status
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum ReservationStatus {
    #[default]
    Pending,
    Confirmed,
    Cancelled,
}

/// Reservation entity
///
/// `date`/`time` 是自由文本，不做日历校验 (与前端约定格式)。
/// `token` 在创建时生成，只能换取一次提前点餐订单；
/// `has_ordered` 在令牌被消费时翻转且只翻转一次。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reservation {
    #[serde(
        default,
        with = "serde_helpers::option_record_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<RecordId>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub date: String,
    pub time: String,
    #[serde(default = "default_guests")]
    pub guests: i64,
    #[serde(default = "default_table")]
    pub table: String,
    pub token: String,
    #[serde(default, deserialize_with = "serde_helpers::bool_false")]
    pub has_ordered: bool,
    #[serde(default)]
    pub status: ReservationStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_guests() -> i64 {
    1
}

fn default_table() -> String {
    "TBD".to_string()
}

/// Create reservation payload (POST /api/reservations)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationCreate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub guests: Option<i64>,
    pub table: Option<String>,
}

/// Status patch (PUT /api/reservations/:id/status)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservationStatusUpdate {
    pub status: Option<ReservationStatus>,
}
