//! 订单接收
//!
//! POST /api/orders 背后的主编排。

use chrono::Utc;

use crate::core::ServerState;
use crate::db::models::{Order, OrderCreate, OrderItem, OrderType};
use crate::db::repository::{OrderRepository, ReservationRepository};
use crate::utils::{AppError, AppResult};

use super::{adjust_inventory, resolve_payment};

/// 创建订单
///
/// 步骤按原语义顺序执行，各步独立提交：
/// 1. 令牌分支：按 (token, table) 查预订并消费令牌 (条件更新，至多一次)
/// 2. 否则按订单类型做必填字段校验
/// 3. 推导支付状态/方式，订单落库
/// 4. 确认邮件 (失败吞掉)
/// 5. 库存扣减 (失败吞掉)
pub async fn place_order(state: &ServerState, req: OrderCreate) -> AppResult<Order> {
    let db = state.get_db();

    if let Some(token) = req.token.as_deref().filter(|t| !t.is_empty()) {
        // Advance 订单的一次性令牌逻辑
        let table = req.table.clone().unwrap_or_default();
        let reservations = ReservationRepository::new(db.clone());

        let reservation = reservations
            .find_by_token_and_table(token, &table)
            .await
            .map_err(AppError::from)?;
        let Some(reservation) = reservation else {
            return Err(AppError::validation("Invalid token or table number"));
        };
        if reservation.has_ordered {
            return Err(AppError::validation(
                "This token has already been used for an order",
            ));
        }

        // 条件更新：并发请求持同一令牌时只有一个能走到这之后
        let consumed = reservations
            .consume_token(token, &table)
            .await
            .map_err(AppError::from)?;
        if consumed.is_none() {
            return Err(AppError::validation(
                "This token has already been used for an order",
            ));
        }
    } else if req.order_type == Some(OrderType::Online) {
        if req.customer.as_deref().map_or(true, str::is_empty)
            || req.customer_phone.as_deref().map_or(true, str::is_empty)
            || req.delivery_address.as_deref().map_or(true, str::is_empty)
            || req.items.as_deref().map_or(true, <[OrderItem]>::is_empty)
            || req.total.is_none()
        {
            return Err(AppError::validation("Missing required delivery fields"));
        }
    } else if req.customer.as_deref().map_or(true, str::is_empty)
        || req.items.as_deref().map_or(true, <[OrderItem]>::is_empty)
        || req.total.is_none()
    {
        return Err(AppError::validation("Missing required fields"));
    }

    // 令牌分支跳过了分支校验，落库仍需要这些字段。
    // 注意：走到这里令牌已被消费，与原行为一致 (已知的不一致窗口)。
    let customer = req
        .customer
        .clone()
        .filter(|c| !c.is_empty())
        .ok_or_else(|| AppError::validation("Missing required fields"))?;
    let items = req
        .items
        .clone()
        .filter(|items| !items.is_empty())
        .ok_or_else(|| AppError::validation("Missing required fields"))?;
    let total = req
        .total
        .ok_or_else(|| AppError::validation("Missing required fields"))?;

    if items.iter().any(|item| item.quantity == 0) {
        return Err(AppError::validation(
            "Item quantity must be a positive integer",
        ));
    }

    let order_type = req.order_type.unwrap_or_default();
    let (payment_status, payment_method) = resolve_payment(order_type, req.payment_method);

    let now = Utc::now();
    let order = Order {
        id: None,
        customer,
        email: req.email,
        phone: req.phone,
        customer_phone: req.customer_phone,
        delivery_address: req.delivery_address,
        instructions: req.instructions,
        order_type,
        items,
        table: req.table,
        token: req.token,
        total,
        status: Default::default(),
        payment_status,
        payment_method,
        razorpay_order_id: req.razorpay_order_id,
        razorpay_payment_id: req.razorpay_payment_id,
        notes: req.notes.unwrap_or_default(),
        created_at: now,
        updated_at: now,
    };

    warn_on_total_mismatch(&order);

    let order = OrderRepository::new(db.clone())
        .create(order)
        .await
        .map_err(AppError::from)?;

    // 确认邮件：至多一次尝试，失败不影响订单创建结果
    if let Some(email) = order.email.as_deref().filter(|e| !e.is_empty()) {
        if let Err(e) = state.mailer.send_order_confirmation(&order, email).await {
            tracing::warn!(error = %e, "Non-critical: failed to send order confirmation email");
        }
    }

    // 库存扣减：尽力而为
    adjust_inventory(&db, &order.items).await;

    Ok(order)
}

/// 客户端提交的总额与行项目合计不符时打告警标记
///
/// 行价格同样来自客户端快照，只能做一致性标记，不拒单 —— 账单渲染
/// 仍以存储的 total 为准。
fn warn_on_total_mismatch(order: &Order) {
    if order.items.iter().any(|i| i.price.is_none()) {
        return;
    }
    let computed: f64 = order
        .items
        .iter()
        .map(|i| i.price.unwrap_or(0.0) * i.quantity as f64)
        .sum();
    if (computed - order.total).abs() > 0.01 {
        tracing::warn!(
            customer = %order.customer,
            submitted_total = order.total,
            computed_total = computed,
            "Order total does not match line items"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::{OrderItem, PaymentMethod};

    fn item(qty: u32) -> OrderItem {
        OrderItem {
            menu_item: None,
            name: Some("Dal Makhani".to_string()),
            price: Some(50.0),
            quantity: qty,
        }
    }

    fn online_request() -> OrderCreate {
        OrderCreate {
            customer: Some("Bob".to_string()),
            customer_phone: Some("9876543210".to_string()),
            delivery_address: Some("42 Lake Road".to_string()),
            order_type: Some(OrderType::Online),
            items: Some(vec![item(2)]),
            total: Some(105.0),
            payment_method: Some(PaymentMethod::Card),
            ..Default::default()
        }
    }

    // 纯校验逻辑走不到数据库的用例放这里；完整流程见 tests/order_flow.rs

    #[test]
    fn test_online_request_shape() {
        let req = online_request();
        assert_eq!(req.order_type, Some(OrderType::Online));
        assert!(req.token.is_none());
    }

    #[test]
    fn test_total_mismatch_only_checks_known_prices() {
        // price 缺失的行跳过一致性标记，不会 panic
        let order = Order {
            id: None,
            customer: "X".into(),
            email: None,
            phone: None,
            customer_phone: None,
            delivery_address: None,
            instructions: None,
            order_type: OrderType::Advance,
            items: vec![OrderItem {
                menu_item: None,
                name: None,
                price: None,
                quantity: 1,
            }],
            table: None,
            token: None,
            total: 100.0,
            status: Default::default(),
            payment_status: Default::default(),
            payment_method: Default::default(),
            razorpay_order_id: None,
            razorpay_payment_id: None,
            notes: String::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        warn_on_total_mismatch(&order);
    }
}
