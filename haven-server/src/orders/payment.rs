//! 支付状态判定

use crate::db::models::{OrderType, PaymentMethod, PaymentStatus};

/// 由订单类型和提交的支付方式推导初始支付状态与落库支付方式
///
/// - 只有 Online 订单显式声明 Razorpay/Card 时才记为已支付
///   (mock 变体不算，货到付款 POD 不算)
/// - 未声明支付方式时：Online 默认 Razorpay，其余默认 Cash
pub fn resolve_payment(
    order_type: OrderType,
    method: Option<PaymentMethod>,
) -> (PaymentStatus, PaymentMethod) {
    let status = if order_type == OrderType::Online
        && matches!(method, Some(PaymentMethod::Razorpay) | Some(PaymentMethod::Card))
    {
        PaymentStatus::Paid
    } else {
        PaymentStatus::Pending
    };

    let resolved_method = method.unwrap_or(match order_type {
        OrderType::Online => PaymentMethod::Razorpay,
        OrderType::Advance => PaymentMethod::Cash,
    });

    (status, resolved_method)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_online_card_is_paid() {
        let (status, method) = resolve_payment(OrderType::Online, Some(PaymentMethod::Card));
        assert_eq!(status, PaymentStatus::Paid);
        assert_eq!(method, PaymentMethod::Card);
    }

    #[test]
    fn test_online_razorpay_is_paid() {
        let (status, _) = resolve_payment(OrderType::Online, Some(PaymentMethod::Razorpay));
        assert_eq!(status, PaymentStatus::Paid);
    }

    #[test]
    fn test_online_pod_is_pending() {
        let (status, method) = resolve_payment(OrderType::Online, Some(PaymentMethod::Pod));
        assert_eq!(status, PaymentStatus::Pending);
        assert_eq!(method, PaymentMethod::Pod);
    }

    #[test]
    fn test_online_mock_method_is_pending() {
        let (status, _) = resolve_payment(OrderType::Online, Some(PaymentMethod::RazorpayMock));
        assert_eq!(status, PaymentStatus::Pending);
    }

    #[test]
    fn test_advance_any_method_is_pending() {
        for method in [
            PaymentMethod::Cash,
            PaymentMethod::Card,
            PaymentMethod::Razorpay,
            PaymentMethod::Upi,
        ] {
            let (status, _) = resolve_payment(OrderType::Advance, Some(method));
            assert_eq!(status, PaymentStatus::Pending);
        }
    }

    #[test]
    fn test_method_defaults() {
        let (status, method) = resolve_payment(OrderType::Online, None);
        assert_eq!(status, PaymentStatus::Pending);
        assert_eq!(method, PaymentMethod::Razorpay);

        let (status, method) = resolve_payment(OrderType::Advance, None);
        assert_eq!(status, PaymentStatus::Pending);
        assert_eq!(method, PaymentMethod::Cash);
    }
}
