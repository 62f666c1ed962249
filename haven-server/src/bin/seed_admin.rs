//! 管理员账号预置脚本
//!
//! 用户没有公开注册接口，管理员只能通过本脚本创建：
//!
//! ```text
//! ADMIN_EMAIL=admin@example.com ADMIN_PASSWORD=change-me cargo run --bin seed_admin
//! ```

use haven_server::db::DbService;
use haven_server::db::models::{User, UserRole};
use haven_server::db::repository::UserRepository;
use haven_server::{Config, init_logger, setup_environment};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    setup_environment();
    init_logger();

    let email = std::env::var("ADMIN_EMAIL")
        .map_err(|_| anyhow::anyhow!("ADMIN_EMAIL must be set"))?;
    let password = std::env::var("ADMIN_PASSWORD")
        .map_err(|_| anyhow::anyhow!("ADMIN_PASSWORD must be set"))?;
    if password.len() < 8 {
        anyhow::bail!("ADMIN_PASSWORD must be at least 8 characters");
    }

    let config = Config::from_env();
    config.ensure_work_dir_structure()?;
    let db_service = DbService::connect(&config)
        .await
        .map_err(|e| anyhow::anyhow!("Database connection failed: {e}"))?;

    let password_hash =
        User::hash_password(&password).map_err(|e| anyhow::anyhow!("Hashing failed: {e}"))?;

    let repo = UserRepository::new(db_service.db);
    let user = repo
        .create(&email, password_hash, UserRole::Admin)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create admin user: {e}"))?;

    tracing::info!(email = %user.email, "Admin user created");
    Ok(())
}
