//! 订单生命周期集成测试
//!
//! 覆盖令牌消费、分支校验、库存扣减和支付状态的端到端语义。
//! Run: cargo test -p haven-server --test order_flow

mod common;

use chrono::Utc;
use haven_server::ServerState;
use haven_server::db::models::{
    IngredientCreate, MenuItemCreate, OrderCreate, OrderItem, OrderType, PaymentMethod,
    PaymentStatus, Reservation,
};
use haven_server::db::repository::{
    IngredientRepository, MenuItemRepository, OrderRepository, ReservationRepository,
};
use haven_server::orders::place_order;
use surrealdb::RecordId;

/// 造一个带两种原料的菜单项，返回 (menu_item_id, ingredient_ids)
async fn seed_menu_item(state: &ServerState) -> (RecordId, Vec<RecordId>) {
    let ingredients = IngredientRepository::new(state.get_db());
    let mut ingredient_ids = Vec::new();
    for name in ["Paneer", "Butter"] {
        let ing = ingredients
            .create(IngredientCreate {
                name: Some(name.to_string()),
                quantity: Some(20.0),
                unit: Some("kg".to_string()),
                category: None,
                threshold: None,
            })
            .await
            .unwrap();
        ingredient_ids.push(ing.id.unwrap());
    }

    let menu = MenuItemRepository::new(state.get_db());
    let item = menu
        .create(MenuItemCreate {
            name: Some("Paneer Makhani".to_string()),
            description: None,
            price: Some(50.0),
            category: Some("Mains".to_string()),
            available: None,
            ingredients: ingredient_ids.iter().map(|id| id.to_string()).collect(),
            image: None,
        })
        .await
        .unwrap();

    (item.id.unwrap(), ingredient_ids)
}

/// 固定令牌的预订
async fn seed_reservation(state: &ServerState, token: &str, table: &str) -> Reservation {
    let now = Utc::now();
    ReservationRepository::new(state.get_db())
        .create(Reservation {
            id: None,
            name: "Alice".to_string(),
            email: None,
            phone: None,
            date: "2025-12-20".to_string(),
            time: "19:00".to_string(),
            guests: 4,
            table: table.to_string(),
            token: token.to_string(),
            has_ordered: false,
            status: Default::default(),
            created_at: now,
            updated_at: now,
        })
        .await
        .unwrap()
}

fn order_with_token(menu_item: &RecordId, token: &str, table: &str) -> OrderCreate {
    OrderCreate {
        customer: Some("Alice".to_string()),
        order_type: None,
        items: Some(vec![OrderItem {
            menu_item: Some(menu_item.clone()),
            name: Some("Paneer Makhani".to_string()),
            price: Some(50.0),
            // 行数量 3，但每种原料仍然只扣 1
            quantity: 3,
        }]),
        table: Some(table.to_string()),
        total: Some(157.5),
        token: Some(token.to_string()),
        ..Default::default()
    }
}

async fn ingredient_quantity(state: &ServerState, id: &RecordId) -> f64 {
    IngredientRepository::new(state.get_db())
        .find_by_id(&id.to_string())
        .await
        .unwrap()
        .unwrap()
        .quantity
}

#[tokio::test]
async fn token_order_succeeds_once_and_decrements_inventory_once() {
    let state = common::test_state().await;
    let (menu_item, ingredient_ids) = seed_menu_item(&state).await;
    seed_reservation(&state, "TESTTOKEN", "A1").await;

    // 第一单成功
    let order = place_order(&state, order_with_token(&menu_item, "TESTTOKEN", "A1"))
        .await
        .unwrap();
    assert_eq!(order.order_type, OrderType::Advance);
    assert_eq!(order.payment_status, PaymentStatus::Pending);
    assert_eq!(order.payment_method, PaymentMethod::Cash);

    // 预订被标记为已下单
    let reservation = ReservationRepository::new(state.get_db())
        .find_by_token_and_table("TESTTOKEN", "A1")
        .await
        .unwrap()
        .unwrap();
    assert!(reservation.has_ordered);

    // 每种关联原料恰好 -1 (与行数量 3 无关)
    for id in &ingredient_ids {
        assert_eq!(ingredient_quantity(&state, id).await, 19.0);
    }

    // 同一令牌第二单被拒
    let err = place_order(&state, order_with_token(&menu_item, "TESTTOKEN", "A1"))
        .await
        .unwrap_err();
    assert!(
        err.to_string().contains("already been used"),
        "unexpected error: {err}"
    );

    // 被拒的尝试不产生额外扣减，订单数仍为 1
    for id in &ingredient_ids {
        assert_eq!(ingredient_quantity(&state, id).await, 19.0);
    }
    let orders = OrderRepository::new(state.get_db()).find_all().await.unwrap();
    assert_eq!(orders.len(), 1);
}

#[tokio::test]
async fn invalid_token_or_wrong_table_is_rejected() {
    let state = common::test_state().await;
    let (menu_item, _) = seed_menu_item(&state).await;
    seed_reservation(&state, "TESTTOKEN", "A1").await;

    let err = place_order(&state, order_with_token(&menu_item, "WRONGTOKE", "A1"))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("Invalid token or table number"));

    // 令牌对但桌台不对也无效
    let err = place_order(&state, order_with_token(&menu_item, "TESTTOKEN", "B2"))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("Invalid token or table number"));

    let orders = OrderRepository::new(state.get_db()).find_all().await.unwrap();
    assert!(orders.is_empty());
}

#[tokio::test]
async fn online_order_missing_delivery_fields_persists_nothing() {
    let state = common::test_state().await;
    let (menu_item, ingredient_ids) = seed_menu_item(&state).await;

    let base = OrderCreate {
        customer: Some("Bob".to_string()),
        customer_phone: Some("9876543210".to_string()),
        delivery_address: Some("42 Lake Road".to_string()),
        order_type: Some(OrderType::Online),
        items: Some(vec![OrderItem {
            menu_item: Some(menu_item.clone()),
            name: Some("Paneer Makhani".to_string()),
            price: Some(50.0),
            quantity: 1,
        }]),
        total: Some(52.5),
        ..Default::default()
    };

    // 逐个抹掉必填字段
    let missing_phone = OrderCreate {
        customer_phone: None,
        ..base.clone()
    };
    let missing_address = OrderCreate {
        delivery_address: None,
        ..base.clone()
    };
    let missing_items = OrderCreate {
        items: None,
        ..base.clone()
    };
    let empty_items = OrderCreate {
        items: Some(vec![]),
        ..base.clone()
    };

    for req in [missing_phone, missing_address, missing_items, empty_items] {
        let err = place_order(&state, req).await.unwrap_err();
        assert!(
            err.to_string().contains("Missing required delivery fields"),
            "unexpected error: {err}"
        );
    }

    let orders = OrderRepository::new(state.get_db()).find_all().await.unwrap();
    assert!(orders.is_empty(), "no order may be persisted");
    for id in &ingredient_ids {
        assert_eq!(ingredient_quantity(&state, id).await, 20.0);
    }
}

#[tokio::test]
async fn default_branch_requires_customer_items_total() {
    let state = common::test_state().await;

    let err = place_order(
        &state,
        OrderCreate {
            items: Some(vec![OrderItem {
                menu_item: None,
                name: Some("Chai".to_string()),
                price: Some(10.0),
                quantity: 1,
            }]),
            total: Some(10.0),
            ..Default::default()
        },
    )
    .await
    .unwrap_err();
    assert!(err.to_string().contains("Missing required fields"));
}

#[tokio::test]
async fn payment_status_follows_order_type_and_method() {
    let state = common::test_state().await;
    let (menu_item, _) = seed_menu_item(&state).await;

    let online = |method: PaymentMethod| OrderCreate {
        customer: Some("Bob".to_string()),
        customer_phone: Some("9876543210".to_string()),
        delivery_address: Some("42 Lake Road".to_string()),
        order_type: Some(OrderType::Online),
        items: Some(vec![OrderItem {
            menu_item: Some(menu_item.clone()),
            name: Some("Paneer Makhani".to_string()),
            price: Some(50.0),
            quantity: 1,
        }]),
        total: Some(52.5),
        payment_method: Some(method),
        ..Default::default()
    };

    let order = place_order(&state, online(PaymentMethod::Card)).await.unwrap();
    assert_eq!(order.payment_status, PaymentStatus::Paid);

    let order = place_order(&state, online(PaymentMethod::Pod)).await.unwrap();
    assert_eq!(order.payment_status, PaymentStatus::Pending);

    // Advance + Razorpay 也不算已支付
    let advance = OrderCreate {
        customer: Some("Carol".to_string()),
        items: Some(vec![OrderItem {
            menu_item: None,
            name: Some("Chai".to_string()),
            price: Some(10.0),
            quantity: 1,
        }]),
        total: Some(10.5),
        payment_method: Some(PaymentMethod::Razorpay),
        ..Default::default()
    };
    let order = place_order(&state, advance).await.unwrap();
    assert_eq!(order.payment_status, PaymentStatus::Pending);
}

#[tokio::test]
async fn token_consumed_even_when_order_fields_missing() {
    // 已知的不一致窗口：令牌先于字段校验被消费
    let state = common::test_state().await;
    seed_reservation(&state, "TESTTOKEN", "A1").await;

    let err = place_order(
        &state,
        OrderCreate {
            token: Some("TESTTOKEN".to_string()),
            table: Some("A1".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap_err();
    assert!(err.to_string().contains("Missing required fields"));

    let reservation = ReservationRepository::new(state.get_db())
        .find_by_token_and_table("TESTTOKEN", "A1")
        .await
        .unwrap()
        .unwrap();
    assert!(reservation.has_ordered, "token is consumed before field validation");
}
