//! 集成测试共用脚手架：内存数据库 + 替身依赖

use std::sync::Arc;

use haven_server::auth::{JwtConfig, JwtService};
use haven_server::db;
use haven_server::{Config, Mailer, RazorpayClient, ServerState};

/// 测试用的网关共享密钥
pub const TEST_KEY_SECRET: &str = "test_key_secret";

fn test_config() -> Config {
    Config {
        work_dir: "./test-data".into(),
        http_port: 0,
        database_url: None,
        jwt: JwtConfig {
            secret: "integration-test-secret-0123456789abcdef".into(),
            expiration_minutes: 60,
            issuer: "haven-server".into(),
            audience: "haven-admin".into(),
        },
        environment: "development".into(),
        razorpay_key_id: "rzp_test_placeholder".into(),
        razorpay_key_secret: TEST_KEY_SECRET.into(),
        email_from: None,
        ses_region: None,
    }
}

/// 内存数据库 + 禁用邮件 + mock 网关
pub async fn test_state() -> ServerState {
    let db = surrealdb::engine::any::connect("mem://").await.unwrap();
    db.use_ns("haven").use_db("restaurant").await.unwrap();
    db::init_schema(&db).await.unwrap();

    let config = test_config();
    let jwt = Arc::new(JwtService::with_config(config.jwt.clone()));
    ServerState::new(
        config,
        db,
        jwt,
        Mailer::disabled(),
        RazorpayClient::new("rzp_test_placeholder", TEST_KEY_SECRET),
    )
}
