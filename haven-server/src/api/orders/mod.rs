//! Order API 模块

mod handler;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orders", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        // Payment gateway endpoints (must be before /{id} to avoid path conflicts)
        .route("/create-razorpay-order", post(handler::create_razorpay_order))
        .route("/verify-razorpay-payment", post(handler::verify_razorpay_payment))
        .route("/{id}", get(handler::get_by_id).delete(handler::delete))
        .route("/{id}/bill", get(handler::bill))
        .route("/{id}/status", put(handler::update_status))
        .route("/{id}/payment", put(handler::update_payment))
        .route("/{id}/notes", put(handler::update_notes))
}
