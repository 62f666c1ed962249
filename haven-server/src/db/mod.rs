//! Database Module
//!
//! 嵌入式 SurrealDB 存储。通过 `engine::any` 统一处理连接字符串，
//! 支持 `rocksdb://` (默认)、`mem://` (测试) 和远程端点。

pub mod models;
pub mod repository;

use surrealdb::Surreal;
use surrealdb::engine::any::{self, Any};

use crate::core::Config;
use crate::utils::AppError;

const NAMESPACE: &str = "haven";
const DATABASE: &str = "restaurant";

/// Database service — owns the embedded SurrealDB handle
#[derive(Clone)]
pub struct DbService {
    pub db: Surreal<Any>,
}

impl DbService {
    /// 按配置连接数据库
    ///
    /// 先尝试 `DATABASE_URL` 指定的端点；失败时回退到本地 RocksDB
    /// 默认路径 (与原部署的"远程失败回退本地"行为一致)。
    pub async fn connect(config: &Config) -> Result<Self, AppError> {
        let primary = config.database_url();
        match Self::open(&primary).await {
            Ok(service) => {
                tracing::info!(url = %primary, "Database connected");
                Ok(service)
            }
            Err(err) => {
                let fallback = config.local_database_url();
                if primary == fallback {
                    return Err(err);
                }
                tracing::warn!(
                    url = %primary,
                    error = %err,
                    "Primary database connection failed, falling back to local storage"
                );
                let service = Self::open(&fallback).await?;
                tracing::info!(url = %fallback, "Database connected (local fallback)");
                Ok(service)
            }
        }
    }

    /// 打开单个端点并初始化 schema
    pub async fn open(url: &str) -> Result<Self, AppError> {
        let db = any::connect(url)
            .await
            .map_err(|e| AppError::database(format!("Failed to open database {url}: {e}")))?;
        db.use_ns(NAMESPACE)
            .use_db(DATABASE)
            .await
            .map_err(|e| AppError::database(format!("Failed to select namespace: {e}")))?;

        init_schema(&db).await?;

        Ok(Self { db })
    }
}

/// 定义唯一索引
///
/// 原料名和用户邮箱的唯一性由索引兜底，仓储层的显式查重负责
/// 把冲突转换成 409 响应。
pub async fn init_schema(db: &Surreal<Any>) -> Result<(), AppError> {
    db.query("DEFINE INDEX IF NOT EXISTS ingredient_name_unique ON TABLE ingredient FIELDS name UNIQUE")
        .query("DEFINE INDEX IF NOT EXISTS user_email_unique ON TABLE user FIELDS email UNIQUE")
        .await
        .and_then(|response| response.check())
        .map_err(|e| AppError::database(format!("Failed to define indexes: {e}")))?;
    Ok(())
}
