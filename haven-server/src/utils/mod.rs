//! 工具模块 - 通用工具函数和类型
//!
//! # 内容
//!
//! - [`AppError`] - 应用错误类型
//! - [`AppResult`] - 应用 Result 别名
//! - 日志、令牌生成等工具

pub mod error;
pub mod logger;
pub mod token;

pub use error::{AppError, AppResult, ErrorBody};
pub use logger::init_logger;
pub use token::generate_token;
