//! Ingredient API Handlers

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde_json::{Value, json};

use crate::auth::{AdminUser, CurrentUser};
use crate::core::ServerState;
use crate::db::models::{Ingredient, IngredientCreate, IngredientUpdate};
use crate::db::repository::IngredientRepository;
use crate::utils::{AppError, AppResult};

/// GET /api/ingredients - 按名称排序列出全部原料 (需登录)
pub async fn list(
    _user: CurrentUser,
    State(state): State<ServerState>,
) -> AppResult<Json<Vec<Ingredient>>> {
    let repo = IngredientRepository::new(state.get_db());
    let ingredients = repo
        .find_all()
        .await
        .map_err(|e| AppError::database(e.to_string()))?;
    Ok(Json(ingredients))
}

/// POST /api/ingredients - 新增原料 (管理员)
pub async fn create(
    _admin: AdminUser,
    State(state): State<ServerState>,
    Json(payload): Json<IngredientCreate>,
) -> AppResult<(StatusCode, Json<Ingredient>)> {
    if payload.name.as_deref().map_or(true, str::is_empty)
        || payload.quantity.is_none()
        || payload.unit.as_deref().map_or(true, str::is_empty)
    {
        return Err(AppError::validation(
            "Name, quantity, and unit are required",
        ));
    }

    let repo = IngredientRepository::new(state.get_db());
    let ingredient = repo.create(payload).await?;
    Ok((StatusCode::CREATED, Json(ingredient)))
}

/// PUT /api/ingredients/:id - 更新原料 (管理员)
pub async fn update(
    _admin: AdminUser,
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<IngredientUpdate>,
) -> AppResult<Json<Ingredient>> {
    let repo = IngredientRepository::new(state.get_db());
    let ingredient = repo.update(&id, payload).await?;
    Ok(Json(ingredient))
}

/// DELETE /api/ingredients/:id - 删除原料 (管理员)
pub async fn delete(
    _admin: AdminUser,
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Value>> {
    let repo = IngredientRepository::new(state.get_db());
    let removed = repo
        .delete(&id)
        .await
        .map_err(|e| AppError::database(e.to_string()))?;
    if !removed {
        return Err(AppError::not_found("Ingredient not found"));
    }
    Ok(Json(json!({ "message": "Ingredient removed" })))
}
