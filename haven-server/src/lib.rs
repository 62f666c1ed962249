//! Gourmet Haven Server - 餐厅管理后端
//!
//! # 架构概述
//!
//! 单进程 REST API，嵌入式文档数据库，面向顾客与店内管理员：
//!
//! - **菜单/库存** (`api::menu`, `api::ingredients`): 管理员 CRUD
//! - **订单** (`orders`): 下单编排 (校验 → 令牌消费 → 支付状态 →
//!   落库 → 确认邮件 → 库存扣减)、账单 PDF
//! - **预订** (`api::reservations`): 带一次性令牌的桌台预订
//! - **支付** (`payments`): Razorpay 网关 (mock 模式 + 签名验证)
//! - **认证** (`auth`): JWT + Argon2
//!
//! # 模块结构
//!
//! ```text
//! haven-server/src/
//! ├── core/          # 配置、状态、服务器
//! ├── api/           # HTTP 路由和处理器
//! ├── auth/          # JWT 认证
//! ├── db/            # 数据库层 (models + repository)
//! ├── orders/        # 订单生命周期编排
//! ├── payments/      # 支付网关
//! ├── notify/        # 确认邮件
//! ├── billing/       # 账单 PDF
//! └── utils/         # 错误、日志、令牌
//! ```

pub mod api;
pub mod auth;
pub mod billing;
pub mod core;
pub mod db;
pub mod notify;
pub mod orders;
pub mod payments;
pub mod utils;

// Re-export 公共类型
pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState};
pub use notify::Mailer;
pub use payments::RazorpayClient;
pub use utils::{AppError, AppResult};

// Re-export logger functions
pub use utils::logger::init_logger;

/// 环境准备: 加载 .env
pub fn setup_environment() {
    let _ = dotenv::dotenv();
}

pub fn print_banner() {
    println!(
        r#"
   ______                                __
  / ____/___  __  ___________ ___  ___  / /_
 / / __/ __ \/ / / / ___/ __ `__ \/ _ \/ __/
/ /_/ / /_/ / /_/ / /  / / / / / /  __/ /_
\____/\____/\__,_/_/  /_/ /_/ /_/\___/\__/
    __  __
   / / / /___ __   _____  ____
  / /_/ / __ `/ | / / _ \/ __ \
 / __  / /_/ /| |/ /  __/ / / /
/_/ /_/\__,_/ |___/\___/_/ /_/
    "#
    );
}
