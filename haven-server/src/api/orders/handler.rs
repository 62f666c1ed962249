//! Order API Handlers

use axum::{
    Json,
    body::Body,
    extract::{Path, State},
    http::{StatusCode, header},
    response::Response,
};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::auth::{AdminUser, CurrentUser};
use crate::billing::BillRenderer;
use crate::core::ServerState;
use crate::db::models::{
    Order, OrderCreate, OrderNotesUpdate, OrderPaymentUpdate, OrderStatusUpdate,
};
use crate::db::repository::OrderRepository;
use crate::orders::place_order;
use crate::utils::{AppError, AppResult};

/// GET /api/orders - 全部订单，最新在前 (管理员)
pub async fn list(
    _admin: AdminUser,
    State(state): State<ServerState>,
) -> AppResult<Json<Vec<Order>>> {
    let repo = OrderRepository::new(state.get_db());
    let orders = repo
        .find_all()
        .await
        .map_err(|e| AppError::database(e.to_string()))?;
    Ok(Json(orders))
}

/// GET /api/orders/:id - 单个订单 (需登录)
pub async fn get_by_id(
    _user: CurrentUser,
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Order>> {
    let repo = OrderRepository::new(state.get_db());
    let order = repo
        .find_by_id(&id)
        .await
        .map_err(|e| AppError::database(e.to_string()))?
        .ok_or_else(|| AppError::not_found("Order not found"))?;
    Ok(Json(order))
}

/// POST /api/orders - 下单 (公开)
///
/// 完整编排见 [`crate::orders::place_order`]
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<OrderCreate>,
) -> AppResult<(StatusCode, Json<Order>)> {
    let order = place_order(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

/// GET /api/orders/:id/bill - 下载账单 PDF (公开)
pub async fn bill(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let repo = OrderRepository::new(state.get_db());
    let order = repo
        .find_by_id(&id)
        .await
        .map_err(|e| AppError::database(e.to_string()))?
        .ok_or_else(|| AppError::not_found("Order not found"))?;

    let pdf = BillRenderer::new().render(&order)?;

    let order_key = order
        .id
        .as_ref()
        .map(|id| id.key().to_string())
        .unwrap_or_default();

    Response::builder()
        .header(header::CONTENT_TYPE, "application/pdf")
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=bill-{order_key}.pdf"),
        )
        .body(Body::from(pdf))
        .map_err(|e| AppError::internal(format!("Failed to build bill response: {e}")))
}

#[derive(Debug, Deserialize)]
pub struct CreateGatewayOrderRequest {
    pub amount: Option<f64>,
}

/// POST /api/orders/create-razorpay-order - 创建网关订单或 mock 描述 (公开)
pub async fn create_razorpay_order(
    State(state): State<ServerState>,
    Json(req): Json<CreateGatewayOrderRequest>,
) -> AppResult<Json<Value>> {
    let descriptor = state.payments.create_order(req.amount).await?;
    Ok(Json(descriptor))
}

#[derive(Debug, Deserialize)]
pub struct VerifyPaymentRequest {
    pub razorpay_order_id: String,
    pub razorpay_payment_id: String,
    pub razorpay_signature: String,
}

/// POST /api/orders/verify-razorpay-payment - 验证支付签名 (公开)
pub async fn verify_razorpay_payment(
    State(state): State<ServerState>,
    Json(req): Json<VerifyPaymentRequest>,
) -> (StatusCode, Json<Value>) {
    let valid = state.payments.verify_signature(
        &req.razorpay_order_id,
        &req.razorpay_payment_id,
        &req.razorpay_signature,
    );

    if valid {
        (StatusCode::OK, Json(json!({ "status": "success" })))
    } else {
        (
            StatusCode::BAD_REQUEST,
            Json(json!({ "status": "failure", "message": "Invalid signature" })),
        )
    }
}

/// PUT /api/orders/:id/status - 更新订单状态 (管理员)
pub async fn update_status(
    _admin: AdminUser,
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<OrderStatusUpdate>,
) -> AppResult<Json<Order>> {
    let status = payload
        .status
        .ok_or_else(|| AppError::validation("Status required"))?;
    let repo = OrderRepository::new(state.get_db());
    let order = repo.update_status(&id, status).await?;
    Ok(Json(order))
}

/// PUT /api/orders/:id/payment - 更新支付状态/方式 (管理员)
pub async fn update_payment(
    _admin: AdminUser,
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<OrderPaymentUpdate>,
) -> AppResult<Json<Order>> {
    let repo = OrderRepository::new(state.get_db());
    let order = repo.update_payment(&id, payload).await?;
    Ok(Json(order))
}

/// PUT /api/orders/:id/notes - 更新备注 (管理员)
pub async fn update_notes(
    _admin: AdminUser,
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<OrderNotesUpdate>,
) -> AppResult<Json<Order>> {
    let repo = OrderRepository::new(state.get_db());
    let order = repo.update_notes(&id, payload).await?;
    Ok(Json(order))
}

/// DELETE /api/orders/:id - 删除订单 (管理员)
pub async fn delete(
    _admin: AdminUser,
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Value>> {
    let repo = OrderRepository::new(state.get_db());
    let removed = repo
        .delete(&id)
        .await
        .map_err(|e| AppError::database(e.to_string()))?;
    if !removed {
        return Err(AppError::not_found("Order not found"));
    }
    Ok(Json(json!({ "message": "Order deleted" })))
}
