//! 邮件通知 (AWS SES)
//!
//! 订单/预订创建后的确认邮件。只尝试一次，失败记日志但绝不影响
//! 主操作的结果。未配置 `EMAIL_FROM` 时 mailer 处于禁用态，直接跳过。

use aws_sdk_sesv2::Client as SesClient;
use aws_sdk_sesv2::types::{Body, Content, Destination, EmailContent, Message};

use crate::core::Config;
use crate::db::models::{Order, OrderType, Reservation};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// SES mailer
#[derive(Clone)]
pub struct Mailer {
    client: Option<SesClient>,
    from: String,
}

impl Mailer {
    /// 按配置构造
    ///
    /// `EMAIL_FROM` 未设置时返回禁用态 mailer。
    pub async fn from_config(config: &Config) -> Self {
        let Some(from) = config.email_from.clone() else {
            tracing::info!("EMAIL_FROM not set, confirmation emails disabled");
            return Self::disabled();
        };

        let shared_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        let shared_config = if let Some(region) = &config.ses_region {
            shared_config
                .to_builder()
                .region(aws_config::Region::new(region.clone()))
                .build()
        } else {
            shared_config
        };

        Self {
            client: Some(SesClient::new(&shared_config)),
            from,
        }
    }

    /// 禁用态 mailer (无凭据环境和测试)
    pub fn disabled() -> Self {
        Self {
            client: None,
            from: String::new(),
        }
    }

    /// 发送订单确认邮件
    pub async fn send_order_confirmation(&self, order: &Order, to: &str) -> Result<(), BoxError> {
        let Some(client) = &self.client else {
            tracing::debug!(to = to, "Mailer disabled, skipping order confirmation");
            return Ok(());
        };

        let subject = Content::builder()
            .data(format!(
                "Order Confirmed! Your Gourmet Haven order #{}",
                order.short_id()
            ))
            .build()?;

        let mut body_text = format!(
            "Hello {},\n\n\
             Your order has been successfully placed.\n\n\
             Order Details\n\
             Order ID: {}\n\
             Type: {:?}\n\
             Total: ₹{:.0}\n\
             Payment: {}\n\
             Status: {}\n",
            order.customer,
            order.id.as_ref().map(|id| id.to_string()).unwrap_or_default(),
            order.order_type,
            order.total,
            order.payment_method.as_str(),
            order.payment_status.as_str(),
        );

        if order.order_type == OrderType::Online {
            body_text.push_str(&format!(
                "\nDelivery Details\n\
                 Address: {}\n\
                 Phone: {}\n",
                order.delivery_address.as_deref().unwrap_or("N/A"),
                order.customer_phone.as_deref().unwrap_or("N/A"),
            ));
        }

        body_text.push_str("\nThank you for choosing Gourmet Haven.\n");

        let body = Body::builder()
            .text(Content::builder().data(body_text).build()?)
            .build();

        let message = Message::builder().subject(subject).body(body).build();

        client
            .send_email()
            .from_email_address(&self.from)
            .destination(Destination::builder().to_addresses(to).build())
            .content(EmailContent::builder().simple(message).build())
            .send()
            .await?;

        tracing::info!(to = to, "Order confirmation email sent");
        Ok(())
    }

    /// 发送预订确认邮件 (包含令牌)
    pub async fn send_reservation_confirmation(
        &self,
        reservation: &Reservation,
        to: &str,
    ) -> Result<(), BoxError> {
        let Some(client) = &self.client else {
            tracing::debug!(to = to, "Mailer disabled, skipping reservation confirmation");
            return Ok(());
        };

        let subject = Content::builder()
            .data("Reservation Confirmed – Gourmet Haven")
            .build()?;

        let body_text = format!(
            "Hello {},\n\n\
             Your table has been reserved successfully.\n\n\
             Reservation Details\n\
             Date: {}\n\
             Time: {}\n\
             Guests: {}\n\
             Table: {}\n\
             Token: {}\n\n\
             We look forward to serving you at Gourmet Haven.\n",
            reservation.name,
            reservation.date,
            reservation.time,
            reservation.guests,
            reservation.table,
            reservation.token,
        );

        let body = Body::builder()
            .text(Content::builder().data(body_text).build()?)
            .build();

        let message = Message::builder().subject(subject).body(body).build();

        client
            .send_email()
            .from_email_address(&self.from)
            .destination(Destination::builder().to_addresses(to).build())
            .content(EmailContent::builder().simple(message).build())
            .send()
            .await?;

        tracing::info!(to = to, "Reservation confirmation email sent");
        Ok(())
    }
}
