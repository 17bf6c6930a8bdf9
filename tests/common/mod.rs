//! Shared seeding helpers for the integration tests.

#![allow(dead_code)]

use orderflow::clients::ActorClient;
use orderflow::config::MarketConfig;
use orderflow::lifecycle::OrderSystem;
use orderflow::model::{
    NotificationKind, OrderCreate, PaymentMethod, ProductCreate, ProductId, Role, UserCreate,
    UserId,
};
use orderflow::projection::OrderView;
use rust_decimal::Decimal;

pub fn system() -> OrderSystem {
    OrderSystem::new(MarketConfig::default())
}

pub async fn seed_buyer(system: &OrderSystem, name: &str) -> UserId {
    system
        .user_client
        .create_user(UserCreate {
            name: name.to_string(),
            email: format!("{name}@example.com"),
            role: Role::Buyer,
        })
        .await
        .expect("failed to create buyer")
}

pub async fn seed_seller(system: &OrderSystem, name: &str) -> UserId {
    system
        .user_client
        .create_user(UserCreate {
            name: name.to_string(),
            email: format!("{name}@example.com"),
            role: Role::Seller,
        })
        .await
        .expect("failed to create seller")
}

pub async fn seed_product(
    system: &OrderSystem,
    seller_id: &UserId,
    name: &str,
    price: Decimal,
    stock: u32,
    low_stock_threshold: Option<u32>,
) -> ProductId {
    system
        .product_client
        .create_product(ProductCreate {
            name: name.to_string(),
            price,
            stock,
            seller_id: seller_id.clone(),
            low_stock_threshold,
        })
        .await
        .expect("failed to create product")
}

pub async fn fill_cart(system: &OrderSystem, buyer_id: &UserId, lines: &[(&ProductId, u32)]) {
    for (product_id, quantity) in lines {
        system
            .cart_client
            .add_line(buyer_id.clone(), (*product_id).clone(), *quantity)
            .await
            .expect("failed to add cart line");
    }
}

pub async fn place(
    system: &OrderSystem,
    buyer_id: &UserId,
    method: PaymentMethod,
    lines: &[(&ProductId, u32)],
) -> OrderView {
    fill_cart(system, buyer_id, lines).await;
    system
        .order_client
        .place_order(OrderCreate {
            buyer_id: buyer_id.clone(),
            payment_method: method,
            shipping_address: "1 Market Street".to_string(),
            billing_address: "1 Market Street".to_string(),
        })
        .await
        .expect("failed to place order")
}

/// Drives a freshly placed order to `Delivered` via pay -> ship -> buyer
/// confirmation.
pub async fn deliver_order(
    system: &OrderSystem,
    order_id: &str,
    buyer_id: &UserId,
    seller_id: &UserId,
) {
    system
        .order_client
        .pay(order_id.to_string(), buyer_id.clone(), false)
        .await
        .expect("failed to pay");
    system
        .order_client
        .ship(order_id.to_string(), seller_id.clone())
        .await
        .expect("failed to ship");
    system
        .order_client
        .confirm_delivery(order_id.to_string(), buyer_id.clone())
        .await
        .expect("failed to confirm delivery");
}

pub async fn stock_of(system: &OrderSystem, product_id: &ProductId) -> u32 {
    system
        .product_client
        .get(product_id.clone())
        .await
        .expect("failed to fetch product")
        .expect("product not found")
        .stock
}

pub async fn notifications_of_kind(
    system: &OrderSystem,
    recipient: &UserId,
    kind: NotificationKind,
) -> usize {
    system
        .notification_client
        .list_for(recipient.clone(), false)
        .await
        .expect("failed to list notifications")
        .into_iter()
        .filter(|n| n.kind == kind)
        .count()
}
