//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`auth`] - 登录接口
//! - [`ingredients`] - 原料库存管理接口
//! - [`menu`] - 菜单管理接口
//! - [`orders`] - 订单接口 (下单、账单、支付网关)
//! - [`reservations`] - 预订接口

pub mod auth;
pub mod health;
pub mod ingredients;
pub mod menu;
pub mod orders;
pub mod reservations;

use axum::{Router, routing::get};

use crate::core::ServerState;

// Re-export common types for handlers
pub use crate::utils::{AppError, AppResult};

/// 组装全部路由
pub fn router(state: ServerState) -> Router {
    Router::new()
        .route("/", get(root))
        .merge(health::router())
        .merge(auth::router())
        .merge(ingredients::router())
        .merge(menu::router())
        .merge(orders::router())
        .merge(reservations::router())
        .with_state(state)
}

async fn root() -> &'static str {
    "Restaurant backend is running"
}
