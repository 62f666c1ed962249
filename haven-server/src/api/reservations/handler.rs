//! Reservation API Handlers

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Utc;
use serde_json::{Value, json};

use crate::auth::AdminUser;
use crate::core::ServerState;
use crate::db::models::{Reservation, ReservationCreate, ReservationStatusUpdate};
use crate::db::repository::ReservationRepository;
use crate::utils::{AppError, AppResult, generate_token};

/// POST /api/reservations - 公开创建预订
///
/// 创建时生成一次性令牌并随响应返回；有邮箱则尝试发确认邮件
/// (失败不影响预订结果)。
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<ReservationCreate>,
) -> AppResult<(StatusCode, Json<Reservation>)> {
    if payload.name.as_deref().map_or(true, str::is_empty)
        || payload.date.as_deref().map_or(true, str::is_empty)
        || payload.time.as_deref().map_or(true, str::is_empty)
    {
        return Err(AppError::validation("Missing required fields"));
    }

    let now = Utc::now();
    let reservation = Reservation {
        id: None,
        name: payload.name.unwrap_or_default(),
        email: payload.email,
        phone: payload.phone,
        date: payload.date.unwrap_or_default(),
        time: payload.time.unwrap_or_default(),
        guests: payload.guests.unwrap_or(1),
        table: payload.table.unwrap_or_else(|| "TBD".to_string()),
        token: generate_token(),
        has_ordered: false,
        status: Default::default(),
        created_at: now,
        updated_at: now,
    };

    let repo = ReservationRepository::new(state.get_db());
    let reservation = repo.create(reservation).await?;

    if let Some(email) = reservation.email.as_deref().filter(|e| !e.is_empty()) {
        if let Err(e) = state
            .mailer
            .send_reservation_confirmation(&reservation, email)
            .await
        {
            tracing::warn!(error = %e, "Non-critical: failed to send reservation confirmation");
        }
    }

    Ok((StatusCode::CREATED, Json(reservation)))
}

/// GET /api/reservations - 全部预订，最新在前 (管理员)
pub async fn list(
    _admin: AdminUser,
    State(state): State<ServerState>,
) -> AppResult<Json<Vec<Reservation>>> {
    let repo = ReservationRepository::new(state.get_db());
    let reservations = repo
        .find_all()
        .await
        .map_err(|e| AppError::database(e.to_string()))?;
    Ok(Json(reservations))
}

/// PUT /api/reservations/:id/status - 更新预订状态 (管理员)
pub async fn update_status(
    _admin: AdminUser,
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<ReservationStatusUpdate>,
) -> AppResult<Json<Reservation>> {
    let status = payload
        .status
        .ok_or_else(|| AppError::validation("Status required"))?;
    let repo = ReservationRepository::new(state.get_db());
    let reservation = repo.update_status(&id, status).await?;
    Ok(Json(reservation))
}

/// DELETE /api/reservations/:id - 删除预订 (管理员)
pub async fn delete(
    _admin: AdminUser,
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Value>> {
    let repo = ReservationRepository::new(state.get_db());
    repo.delete(&id)
        .await
        .map_err(|e| AppError::database(e.to_string()))?;
    Ok(Json(json!({ "message": "Deleted" })))
}
