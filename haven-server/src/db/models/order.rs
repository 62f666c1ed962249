//! Order Model
//!
//! 订单分两类：
//! - Advance: 店内提前点餐，可携带预订令牌绑定桌台
//! - Online: 外送订单，需要收货地址和电话

use super::serde_helpers;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Order type
///
/// 无法识别的值按 Advance 处理 (入库前仍需通过默认分支的字段校验)
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub enum OrderType {
    Online,
    #[default]
    Advance,
}

impl<'de> Deserialize<'de> for OrderType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(match s.as_str() {
            "Online" => OrderType::Online,
            _ => OrderType::Advance,
        })
    }
}

/// Order fulfillment status
///
/// 服务端不约束状态转移图，管理员可设置任意值
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum OrderStatus {
    #[default]
    Pending,
    Preparing,
    Ready,
    Completed,
    Cancelled,
}

/// Payment status
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum PaymentStatus {
    #[default]
    Pending,
    Paid,
    Failed,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "Pending",
            PaymentStatus::Paid => "Paid",
            PaymentStatus::Failed => "Failed",
        }
    }
}

/// Payment method
///
/// Mock 变体是网关占位模式下由前端回填的标记值
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum PaymentMethod {
    #[default]
    Cash,
    Card,
    #[serde(rename = "UPI")]
    Upi,
    Stripe,
    Razorpay,
    #[serde(rename = "POD")]
    Pod,
    #[serde(rename = "Razorpay (Mock)")]
    RazorpayMock,
    #[serde(rename = "Stripe (Mock)")]
    StripeMock,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "Cash",
            PaymentMethod::Card => "Card",
            PaymentMethod::Upi => "UPI",
            PaymentMethod::Stripe => "Stripe",
            PaymentMethod::Razorpay => "Razorpay",
            PaymentMethod::Pod => "POD",
            PaymentMethod::RazorpayMock => "Razorpay (Mock)",
            PaymentMethod::StripeMock => "Stripe (Mock)",
        }
    }
}

/// Order line item
///
/// `name`/`price` 是下单时的快照，菜单项之后被修改或删除不影响已有订单
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    /// Menu item reference (weak)
    #[serde(
        default,
        with = "serde_helpers::option_record_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub menu_item: Option<RecordId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    pub quantity: u32,
}

/// Order entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(
        default,
        with = "serde_helpers::option_record_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<RecordId>,
    pub customer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Online 订单的收货电话
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
    #[serde(default)]
    pub order_type: OrderType,
    pub items: Vec<OrderItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    /// 客户端提交的含税总额 (账单按此金额反推税额)
    pub total: f64,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default)]
    pub payment_status: PaymentStatus,
    #[serde(default)]
    pub payment_method: PaymentMethod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub razorpay_order_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub razorpay_payment_id: Option<String>,
    #[serde(default)]
    pub notes: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// 订单号短格式 (id 末 8 位大写)，用于账单和邮件展示
    pub fn short_id(&self) -> String {
        let key = self
            .id
            .as_ref()
            .map(|id| id.key().to_string())
            .unwrap_or_default();
        let start = key.len().saturating_sub(8);
        key[start..].to_uppercase()
    }
}

/// Create order payload (POST /api/orders)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCreate {
    pub customer: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub customer_phone: Option<String>,
    pub delivery_address: Option<String>,
    pub instructions: Option<String>,
    pub order_type: Option<OrderType>,
    pub items: Option<Vec<OrderItem>>,
    pub table: Option<String>,
    pub total: Option<f64>,
    pub token: Option<String>,
    pub notes: Option<String>,
    pub payment_method: Option<PaymentMethod>,
    pub razorpay_order_id: Option<String>,
    pub razorpay_payment_id: Option<String>,
}

/// Status patch (PUT /api/orders/:id/status)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderStatusUpdate {
    pub status: Option<OrderStatus>,
}

/// Payment patch (PUT /api/orders/:id/payment)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderPaymentUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_status: Option<PaymentStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<PaymentMethod>,
}

/// Notes patch (PUT /api/orders/:id/notes)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderNotesUpdate {
    pub notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_type_tolerates_unknown_values() {
        let t: OrderType = serde_json::from_str("\"Online\"").unwrap();
        assert_eq!(t, OrderType::Online);
        let t: OrderType = serde_json::from_str("\"Takeaway\"").unwrap();
        assert_eq!(t, OrderType::Advance);
    }

    #[test]
    fn test_payment_method_wire_values() {
        assert_eq!(
            serde_json::to_string(&PaymentMethod::RazorpayMock).unwrap(),
            "\"Razorpay (Mock)\""
        );
        let m: PaymentMethod = serde_json::from_str("\"POD\"").unwrap();
        assert_eq!(m, PaymentMethod::Pod);
    }
}
