use std::sync::Arc;

use surrealdb::Surreal;
use surrealdb::engine::any::Any;

use crate::auth::JwtService;
use crate::core::Config;
use crate::db::DbService;
use crate::notify::Mailer;
use crate::payments::RazorpayClient;
use crate::utils::AppError;

/// 服务器状态 - 持有所有服务的共享引用
///
/// 所有外部协作方 (数据库、邮件、支付网关、JWT) 都在这里显式构造并
/// 注入，handler 通过 `State` 提取；测试可以用 [`ServerState::new`]
/// 塞入替身 (内存数据库、禁用态 mailer 等)。
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | db | Surreal<Any> | 嵌入式数据库 |
/// | jwt_service | Arc<JwtService> | JWT 认证服务 |
/// | mailer | Mailer | 确认邮件发送 (可禁用) |
/// | payments | RazorpayClient | 支付网关客户端 (可 mock) |
#[derive(Clone)]
pub struct ServerState {
    /// 服务器配置
    pub config: Config,
    /// 嵌入式数据库 (SurrealDB)
    pub db: Surreal<Any>,
    /// JWT 认证服务
    pub jwt_service: Arc<JwtService>,
    /// 确认邮件
    pub mailer: Mailer,
    /// 支付网关
    pub payments: RazorpayClient,
}

impl ServerState {
    /// 创建服务器状态 (手动构造，测试注入替身用)
    ///
    /// 通常使用 [`ServerState::initialize`] 代替
    pub fn new(
        config: Config,
        db: Surreal<Any>,
        jwt_service: Arc<JwtService>,
        mailer: Mailer,
        payments: RazorpayClient,
    ) -> Self {
        Self {
            config,
            db,
            jwt_service,
            mailer,
            payments,
        }
    }

    /// 初始化服务器状态
    ///
    /// 按顺序初始化：
    /// 1. 工作目录结构
    /// 2. 数据库 (含本地回退)
    /// 3. JWT / Mailer / 支付网关
    pub async fn initialize(config: &Config) -> Result<Self, AppError> {
        config
            .ensure_work_dir_structure()
            .map_err(|e| AppError::internal(format!("Failed to create work directory: {e}")))?;

        let db_service = DbService::connect(config).await?;

        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));
        let mailer = Mailer::from_config(config).await;
        let payments = RazorpayClient::new(
            config.razorpay_key_id.clone(),
            config.razorpay_key_secret.clone(),
        );

        if payments.is_mock() {
            tracing::warn!("Razorpay credentials are placeholder/missing - gateway mock mode");
        }

        Ok(Self::new(
            config.clone(),
            db_service.db,
            jwt_service,
            mailer,
            payments,
        ))
    }

    /// 获取数据库实例
    pub fn get_db(&self) -> Surreal<Any> {
        self.db.clone()
    }
}
