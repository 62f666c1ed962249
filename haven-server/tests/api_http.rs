//! HTTP 层集成测试
//!
//! 通过 tower oneshot 直接驱动 axum Router。
//! Run: cargo test -p haven-server --test api_http

mod common;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use hmac::{Hmac, Mac};
use serde_json::{Value, json};
use sha2::Sha256;
use tower::ServiceExt;

use haven_server::db::models::{User, UserRole};
use haven_server::db::repository::UserRepository;

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, body)
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn root_route_reports_liveness() {
    let state = common::test_state().await;
    let app = haven_server::api::router(state);

    let response = app.oneshot(get("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&bytes[..], b"Restaurant backend is running");
}

#[tokio::test]
async fn reservation_then_token_order_scenario() {
    // Alice 预订 → 返回 9 位大写令牌 → 同一 (token, table) 下单
    // 成功一次，复用失败
    let state = common::test_state().await;
    let app = haven_server::api::router(state);

    let (status, reservation) = send(
        &app,
        post_json(
            "/api/reservations",
            json!({
                "name": "Alice",
                "date": "2025-12-20",
                "time": "19:00",
                "guests": 4,
                "table": "A1"
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(reservation["table"], "A1");
    assert_eq!(reservation["hasOrdered"], false);

    let token = reservation["token"].as_str().unwrap().to_string();
    assert_eq!(token.len(), 9);
    assert!(
        token
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()),
        "token should be uppercase alphanumeric: {token}"
    );

    let order_body = json!({
        "customer": "Alice",
        "items": [{ "name": "Paneer Makhani", "price": 50.0, "quantity": 2 }],
        "table": "A1",
        "total": 105.0,
        "token": token
    });

    let (status, order) = send(&app, post_json("/api/orders", order_body.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(order["orderType"], "Advance");
    assert_eq!(order["paymentStatus"], "Pending");
    assert_eq!(order["paymentMethod"], "Cash");
    assert_eq!(order["token"], Value::String(token.clone()));

    // 复用同一令牌被拒
    let (status, body) = send(&app, post_json("/api/orders", order_body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(
        body["message"].as_str().unwrap().contains("already been used"),
        "unexpected body: {body}"
    );
}

#[tokio::test]
async fn online_order_missing_fields_is_400() {
    let state = common::test_state().await;
    let app = haven_server::api::router(state);

    let (status, body) = send(
        &app,
        post_json(
            "/api/orders",
            json!({
                "customer": "Bob",
                "orderType": "Online",
                "items": [{ "name": "Chai", "price": 10.0, "quantity": 1 }],
                "total": 10.5
                // customerPhone / deliveryAddress 缺失
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(
        body["message"]
            .as_str()
            .unwrap()
            .contains("Missing required delivery fields")
    );
}

#[tokio::test]
async fn bill_endpoint_streams_pdf_with_headers() {
    let state = common::test_state().await;
    let app = haven_server::api::router(state);

    let (status, order) = send(
        &app,
        post_json(
            "/api/orders",
            json!({
                "customer": "Alice",
                "items": [{ "name": "Thali", "price": 52.5, "quantity": 2 }],
                "total": 105.0
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let order_id = order["id"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(get(&format!("/api/orders/{order_id}/bill")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "application/pdf"
    );
    let disposition = response
        .headers()
        .get(header::CONTENT_DISPOSITION)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(disposition.starts_with("attachment; filename=bill-"));
    assert!(disposition.ends_with(".pdf"));

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert!(bytes.starts_with(b"%PDF"));

    // 不存在的订单 → 404
    let response = app
        .oneshot(get("/api/orders/order:doesnotexist/bill"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn razorpay_mock_order_descriptor() {
    let state = common::test_state().await;
    let app = haven_server::api::router(state);

    let (status, body) = send(
        &app,
        post_json("/api/orders/create-razorpay-order", json!({ "amount": 450.0 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["amount"], 45000);
    assert_eq!(body["currency"], "INR");
    assert_eq!(body["mock"], true);
}

#[tokio::test]
async fn razorpay_signature_verification_roundtrip() {
    let state = common::test_state().await;
    let app = haven_server::api::router(state);

    let mut mac = Hmac::<Sha256>::new_from_slice(common::TEST_KEY_SECRET.as_bytes()).unwrap();
    mac.update(b"order_abc|pay_xyz");
    let signature = hex::encode(mac.finalize().into_bytes());

    let (status, body) = send(
        &app,
        post_json(
            "/api/orders/verify-razorpay-payment",
            json!({
                "razorpay_order_id": "order_abc",
                "razorpay_payment_id": "pay_xyz",
                "razorpay_signature": signature
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");

    // 签名单字符变异 → failure
    let mut tampered = signature.clone().into_bytes();
    tampered[0] = if tampered[0] == b'0' { b'1' } else { b'0' };
    let tampered = String::from_utf8(tampered).unwrap();

    let (status, body) = send(
        &app,
        post_json(
            "/api/orders/verify-razorpay-payment",
            json!({
                "razorpay_order_id": "order_abc",
                "razorpay_payment_id": "pay_xyz",
                "razorpay_signature": tampered
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "failure");
}

#[tokio::test]
async fn admin_routes_require_auth_and_role() {
    let state = common::test_state().await;

    // 预置管理员
    let hash = User::hash_password("hunter2-hunter2").unwrap();
    UserRepository::new(state.get_db())
        .create("admin@gourmethaven.com", hash, UserRole::Admin)
        .await
        .unwrap();

    let app = haven_server::api::router(state);

    // 未认证 → 401
    let (status, _) = send(&app, get("/api/orders")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // 登录拿令牌
    let (status, body) = send(
        &app,
        post_json(
            "/api/auth/login",
            json!({ "email": "admin@gourmethaven.com", "password": "hunter2-hunter2" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let token = body["token"].as_str().unwrap().to_string();
    assert_eq!(body["user"]["role"], "admin");

    // 带令牌访问管理接口
    let req = Request::builder()
        .uri("/api/orders")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.is_array());

    // 错误密码 → 400 统一报错
    let (status, _) = send(
        &app,
        post_json(
            "/api/auth/login",
            json!({ "email": "admin@gourmethaven.com", "password": "wrong-password" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn duplicate_ingredient_name_is_409() {
    let state = common::test_state().await;

    let hash = User::hash_password("hunter2-hunter2").unwrap();
    UserRepository::new(state.get_db())
        .create("admin@gourmethaven.com", hash, UserRole::Admin)
        .await
        .unwrap();

    let app = haven_server::api::router(state);

    let (_, body) = send(
        &app,
        post_json(
            "/api/auth/login",
            json!({ "email": "admin@gourmethaven.com", "password": "hunter2-hunter2" }),
        ),
    )
    .await;
    let token = body["token"].as_str().unwrap().to_string();

    let create = |name: &str| {
        Request::builder()
            .method("POST")
            .uri("/api/ingredients")
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::from(
                json!({ "name": name, "quantity": 5.0, "unit": "kg" }).to_string(),
            ))
            .unwrap()
    };

    let (status, _) = send(&app, create("Tomato")).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(&app, create("Tomato")).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["message"].as_str().unwrap().contains("already exists"));
}
