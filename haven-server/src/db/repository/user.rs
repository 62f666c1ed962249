//! User Repository

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{User, UserRole};
use chrono::Utc;
use surrealdb::Surreal;
use surrealdb::engine::any::Any;

const TABLE: &str = "user";

#[derive(Clone)]
pub struct UserRepository {
    base: BaseRepository,
}

impl UserRepository {
    pub fn new(db: Surreal<Any>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find user by email (case-insensitive: stored lowercase)
    pub async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        let email_owned = email.trim().to_lowercase();
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM user WHERE email = $email LIMIT 1")
            .bind(("email", email_owned))
            .await?;
        let users: Vec<User> = result.take(0)?;
        Ok(users.into_iter().next())
    }

    /// Create a user with an already-hashed password
    ///
    /// 只由 `seed_admin` 脚本调用，没有公开注册接口。
    pub async fn create(
        &self,
        email: &str,
        password_hash: String,
        role: UserRole,
    ) -> RepoResult<User> {
        let email = email.trim().to_lowercase();

        if self.find_by_email(&email).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "User already exists: {}",
                email
            )));
        }

        let user = User {
            id: None,
            email,
            password_hash,
            role,
            created_at: Utc::now(),
        };

        let created: Option<User> = self.base.db().create(TABLE).content(user).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create user".to_string()))
    }
}
