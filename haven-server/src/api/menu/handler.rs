//! Menu API Handlers

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde_json::{Value, json};

use crate::auth::AdminUser;
use crate::core::ServerState;
use crate::db::models::{MenuItem, MenuItemCreate, MenuItemUpdate};
use crate::db::repository::MenuItemRepository;
use crate::utils::{AppError, AppResult};

/// GET /api/menu - 公开菜单列表
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<MenuItem>>> {
    let repo = MenuItemRepository::new(state.get_db());
    let items = repo
        .find_all()
        .await
        .map_err(|e| AppError::database(e.to_string()))?;
    Ok(Json(items))
}

/// POST /api/menu - 新增菜单项 (管理员)
pub async fn create(
    _admin: AdminUser,
    State(state): State<ServerState>,
    Json(payload): Json<MenuItemCreate>,
) -> AppResult<(StatusCode, Json<MenuItem>)> {
    if payload.name.as_deref().map_or(true, str::is_empty)
        || payload.price.is_none()
        || payload.category.as_deref().map_or(true, str::is_empty)
    {
        return Err(AppError::validation("Name, price, and category are required"));
    }

    let repo = MenuItemRepository::new(state.get_db());
    let item = repo.create(payload).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

/// PUT /api/menu/:id - 更新菜单项 (管理员)
pub async fn update(
    _admin: AdminUser,
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<MenuItemUpdate>,
) -> AppResult<Json<MenuItem>> {
    let repo = MenuItemRepository::new(state.get_db());
    let item = repo.update(&id, payload).await?;
    Ok(Json(item))
}

/// DELETE /api/menu/:id - 删除菜单项 (管理员)
pub async fn delete(
    _admin: AdminUser,
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Value>> {
    let repo = MenuItemRepository::new(state.get_db());
    let removed = repo
        .delete(&id)
        .await
        .map_err(|e| AppError::database(e.to_string()))?;
    if !removed {
        return Err(AppError::not_found("Menu item not found"));
    }
    Ok(Json(json!({ "message": "Menu item removed" })))
}
