//! 认证模块
//!
//! JWT 签发/验证与请求级提取器。密码哈希在 [`crate::db::models::User`] 上。

pub mod extractor;
pub mod jwt;

pub use extractor::AdminUser;
pub use jwt::{Claims, CurrentUser, JwtConfig, JwtError, JwtService};
