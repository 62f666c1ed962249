use std::path::PathBuf;

use crate::auth::JwtConfig;
use crate::payments::PLACEHOLDER_KEY_ID;

/// 服务器配置
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | WORK_DIR | ./data | 工作目录 (数据库文件) |
/// | PORT | 5000 | HTTP 服务端口 |
/// | DATABASE_URL | rocksdb://<work_dir>/database | 数据库端点，失败回退本地 |
/// | ENVIRONMENT | development | 运行环境 |
/// | RAZORPAY_KEY_ID | rzp_test_placeholder | 网关 key，占位值触发 mock 模式 |
/// | RAZORPAY_KEY_SECRET | (空) | 网关密钥，也用于签名验证 |
/// | EMAIL_FROM | (未设置) | SES 发件地址，缺省禁用邮件 |
/// | SES_REGION | (AWS 默认) | SES 区域 |
///
/// # 示例
///
/// ```ignore
/// WORK_DIR=/data/haven PORT=8080 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 工作目录，存储数据库文件
    pub work_dir: String,
    /// HTTP API 服务端口
    pub http_port: u16,
    /// 数据库端点覆盖 (缺省用本地 RocksDB)
    pub database_url: Option<String>,
    /// JWT 认证配置
    pub jwt: JwtConfig,
    /// 运行环境: development | staging | production
    pub environment: String,

    // === 支付网关 ===
    /// Razorpay key id (占位值触发 mock 模式)
    pub razorpay_key_id: String,
    /// Razorpay key secret (HMAC 签名验证的共享密钥)
    pub razorpay_key_secret: String,

    // === 邮件 ===
    /// SES 发件地址；未设置时禁用确认邮件
    pub email_from: Option<String>,
    /// SES 区域覆盖
    pub ses_region: Option<String>,
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "./data".into()),
            http_port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(5000),
            database_url: std::env::var("DATABASE_URL").ok().filter(|s| !s.is_empty()),
            jwt: JwtConfig::default(),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            razorpay_key_id: std::env::var("RAZORPAY_KEY_ID")
                .unwrap_or_else(|_| PLACEHOLDER_KEY_ID.into()),
            razorpay_key_secret: std::env::var("RAZORPAY_KEY_SECRET").unwrap_or_default(),
            email_from: std::env::var("EMAIL_FROM").ok().filter(|s| !s.is_empty()),
            ses_region: std::env::var("SES_REGION").ok().filter(|s| !s.is_empty()),
        }
    }

    /// 使用自定义值覆盖部分配置
    ///
    /// 常用于测试场景
    pub fn with_overrides(work_dir: impl Into<String>, http_port: u16) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config.http_port = http_port;
        config
    }

    /// 首选数据库端点
    pub fn database_url(&self) -> String {
        self.database_url
            .clone()
            .unwrap_or_else(|| self.local_database_url())
    }

    /// 本地回退端点 (嵌入式 RocksDB)
    pub fn local_database_url(&self) -> String {
        format!("rocksdb://{}", self.database_dir().display())
    }

    /// 数据库目录
    pub fn database_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("database")
    }

    /// 确保工作目录结构存在
    pub fn ensure_work_dir_structure(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(self.database_dir())
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// 是否开发环境
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
