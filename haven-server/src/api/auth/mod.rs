//! Auth API 模块

mod handler;

pub use handler::{LoginRequest, LoginResponse, UserInfo};

use axum::{Router, routing::post};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/auth/login", post(handler::login))
}
