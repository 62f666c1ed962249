//! Razorpay integration via REST API (no SDK dependency)
//!
//! 网关凭据缺失或仍是占位值时进入 mock 模式：返回本地合成的订单描述，
//! 让前端支付流程在没有真实凭据的环境下照常工作。

use chrono::Utc;
use hmac::{Hmac, Mac};
use serde_json::{Value, json};
use sha2::Sha256;

use crate::utils::AppError;

/// 占位 key id，部署模板里的默认值
pub const PLACEHOLDER_KEY_ID: &str = "rzp_test_placeholder";

const RAZORPAY_ORDERS_URL: &str = "https://api.razorpay.com/v1/orders";

/// Razorpay 客户端
#[derive(Debug, Clone)]
pub struct RazorpayClient {
    key_id: String,
    key_secret: String,
    http: reqwest::Client,
}

impl RazorpayClient {
    pub fn new(key_id: impl Into<String>, key_secret: impl Into<String>) -> Self {
        Self {
            key_id: key_id.into(),
            key_secret: key_secret.into(),
            http: reqwest::Client::new(),
        }
    }

    /// 是否处于 mock 模式 (凭据缺失或占位值)
    pub fn is_mock(&self) -> bool {
        self.key_id.is_empty() || self.key_id == PLACEHOLDER_KEY_ID
    }

    /// 创建网关订单
    ///
    /// `amount` 是主货币单位 (卢比)；网关侧金额一律为最小单位 (paise)。
    /// mock 模式或金额无效时返回合成描述而不触网。
    pub async fn create_order(&self, amount: Option<f64>) -> Result<Value, AppError> {
        let valid_amount = amount.filter(|a| a.is_finite() && *a > 0.0);

        if self.is_mock() || valid_amount.is_none() {
            tracing::info!("Razorpay mock mode active (or invalid amount)");
            let millis = Utc::now().timestamp_millis();
            return Ok(json!({
                "id": format!("order_{millis}"),
                "amount": (amount.unwrap_or(0.0) * 100.0).round() as i64,
                "currency": "INR",
                "mock": true,
            }));
        }

        let amount = valid_amount.unwrap_or_default();
        let millis = Utc::now().timestamp_millis();
        let body = json!({
            "amount": (amount * 100.0).round() as i64,
            "currency": "INR",
            "receipt": format!("receipt_{millis}"),
        });

        let resp: Value = self
            .http
            .post(RAZORPAY_ORDERS_URL)
            .basic_auth(&self.key_id, Some(&self.key_secret))
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Razorpay order request failed");
                AppError::upstream("Failed to create payment order")
            })?
            .json()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Razorpay order response unreadable");
                AppError::upstream("Failed to create payment order")
            })?;

        if resp.get("id").and_then(Value::as_str).is_none() {
            tracing::error!(response = %resp, "Razorpay rejected order creation");
            return Err(AppError::upstream("Failed to create payment order"));
        }

        Ok(resp)
    }

    /// 验证支付签名 (HMAC-SHA256)
    ///
    /// 网关对 `"<order_id>|<payment_id>"` 用共享密钥签名；只有精确匹配
    /// 才算成功。hex 解码后用常数时间比较。无重放保护。
    pub fn verify_signature(&self, order_id: &str, payment_id: &str, signature: &str) -> bool {
        verify_signature(order_id, payment_id, signature, &self.key_secret)
    }
}

/// HMAC-SHA256 签名验证
pub fn verify_signature(order_id: &str, payment_id: &str, signature: &str, secret: &str) -> bool {
    let payload = format!("{order_id}|{payment_id}");

    let Ok(mut mac) = Hmac::<Sha256>::new_from_slice(secret.as_bytes()) else {
        return false;
    };
    mac.update(payload.as_bytes());

    let Ok(sig_bytes) = hex::decode(signature) else {
        return false;
    };
    mac.verify_slice(&sig_bytes).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test_key_secret";

    fn sign(order_id: &str, payment_id: &str) -> String {
        let mut mac = Hmac::<Sha256>::new_from_slice(SECRET.as_bytes()).unwrap();
        mac.update(format!("{order_id}|{payment_id}").as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    #[test]
    fn test_signature_exact_match() {
        let sig = sign("order_abc", "pay_xyz");
        assert!(verify_signature("order_abc", "pay_xyz", &sig, SECRET));
    }

    #[test]
    fn test_signature_single_char_mutation_fails() {
        let sig = sign("order_abc", "pay_xyz");
        for i in 0..sig.len() {
            let mut mutated: Vec<char> = sig.chars().collect();
            mutated[i] = if mutated[i] == '0' { '1' } else { '0' };
            let mutated: String = mutated.into_iter().collect();
            if mutated == sig {
                continue;
            }
            assert!(
                !verify_signature("order_abc", "pay_xyz", &mutated, SECRET),
                "mutated signature at index {} unexpectedly verified",
                i
            );
        }
    }

    #[test]
    fn test_signature_wrong_payload_fails() {
        let sig = sign("order_abc", "pay_xyz");
        assert!(!verify_signature("order_abc", "pay_other", &sig, SECRET));
        assert!(!verify_signature("order_other", "pay_xyz", &sig, SECRET));
    }

    #[test]
    fn test_signature_invalid_hex_fails() {
        assert!(!verify_signature("order_abc", "pay_xyz", "not-hex!", SECRET));
    }

    #[test]
    fn test_placeholder_key_is_mock() {
        let client = RazorpayClient::new(PLACEHOLDER_KEY_ID, "secret");
        assert!(client.is_mock());
        let client = RazorpayClient::new("", "secret");
        assert!(client.is_mock());
        let client = RazorpayClient::new("rzp_live_abc", "secret");
        assert!(!client.is_mock());
    }

    #[tokio::test]
    async fn test_mock_order_descriptor() {
        let client = RazorpayClient::new(PLACEHOLDER_KEY_ID, "secret");
        let order = client.create_order(Some(450.0)).await.unwrap();
        assert_eq!(order["amount"], 45000);
        assert_eq!(order["currency"], "INR");
        assert_eq!(order["mock"], true);
        assert!(
            order["id"].as_str().unwrap().starts_with("order_"),
            "mock id should look like a gateway order id"
        );
    }

    #[tokio::test]
    async fn test_invalid_amount_falls_back_to_mock() {
        // 真实 key 但金额缺失/为零: 仍然返回 mock 描述，不触网
        let client = RazorpayClient::new("rzp_live_abc", "secret");
        let order = client.create_order(None).await.unwrap();
        assert_eq!(order["mock"], true);
        assert_eq!(order["amount"], 0);

        let order = client.create_order(Some(0.0)).await.unwrap();
        assert_eq!(order["mock"], true);
    }
}
