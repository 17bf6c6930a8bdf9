mod common;

use common::*;
use orderflow::error::MarketError;
use orderflow::model::{OrderStatus, PaymentMethod, PaymentStatus, ProductUpdate};
use rust_decimal_macros::dec;

#[tokio::test]
async fn cod_settles_on_buyer_confirmation_exactly_once() {
    let system = system();
    let seller = seed_seller(&system, "sara").await;
    let buyer = seed_buyer(&system, "alice").await;
    let product = seed_product(&system, &seller, "Widget", dec!(40.00), 10, None).await;
    let order = place(&system, &buyer, PaymentMethod::CashOnDelivery, &[(&product, 2)]).await;

    let payment = system
        .order_client
        .pay(order.order_id.clone(), buyer.clone(), false)
        .await
        .unwrap();
    assert_eq!(payment.status, PaymentStatus::Pending);

    system
        .order_client
        .ship(order.order_id.clone(), seller.clone())
        .await
        .unwrap();
    let delivered = system
        .order_client
        .confirm_delivery(order.order_id.clone(), buyer.clone())
        .await
        .unwrap();
    assert_eq!(delivered.status, OrderStatus::Delivered);
    assert_eq!(delivered.payment_status, Some(PaymentStatus::Success));

    // Confirming again is illegal, and re-settlement never produces a
    // second payment record.
    let err = system
        .order_client
        .confirm_delivery(order.order_id.clone(), buyer.clone())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        MarketError::InvalidState {
            status: OrderStatus::Delivered,
            ..
        }
    ));
    let payments = system.payment_client.by_buyer(buyer.clone()).await.unwrap();
    assert_eq!(payments.len(), 1);
    assert_eq!(payments[0].status, PaymentStatus::Success);

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn seller_delivery_settles_cod_too() {
    let system = system();
    let seller = seed_seller(&system, "sara").await;
    let buyer = seed_buyer(&system, "alice").await;
    let product = seed_product(&system, &seller, "Widget", dec!(40.00), 10, None).await;
    let order = place(&system, &buyer, PaymentMethod::CashOnDelivery, &[(&product, 1)]).await;

    system
        .order_client
        .pay(order.order_id.clone(), buyer.clone(), false)
        .await
        .unwrap();
    system
        .order_client
        .ship(order.order_id.clone(), seller.clone())
        .await
        .unwrap();
    let delivered = system
        .order_client
        .deliver(order.order_id.clone(), seller.clone())
        .await
        .unwrap();
    assert_eq!(delivered.status, OrderStatus::Delivered);
    assert_eq!(delivered.payment_status, Some(PaymentStatus::Success));

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn completed_return_restores_stock_and_refunds_the_payment() {
    let system = system();
    let seller = seed_seller(&system, "sara").await;
    let buyer = seed_buyer(&system, "alice").await;
    let product = seed_product(&system, &seller, "Widget", dec!(25.00), 10, None).await;
    let order = place(&system, &buyer, PaymentMethod::Card, &[(&product, 4)]).await;
    deliver_order(&system, &order.order_id, &buyer, &seller).await;
    assert_eq!(stock_of(&system, &product).await, 6);

    let requested = system
        .order_client
        .request_return(
            order.order_id.clone(),
            buyer.clone(),
            Some("damaged".to_string()),
        )
        .await
        .unwrap();
    assert_eq!(requested.status, OrderStatus::ReturnRequested);
    assert_eq!(requested.return_reason.as_deref(), Some("damaged"));
    // The request itself has no stock side effect.
    assert_eq!(stock_of(&system, &product).await, 6);

    let returned = system
        .order_client
        .complete_return(order.order_id.clone(), seller.clone())
        .await
        .unwrap();
    assert_eq!(returned.status, OrderStatus::Returned);
    assert_eq!(stock_of(&system, &product).await, 10);
    assert_eq!(returned.payment_status, Some(PaymentStatus::Refunded));

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn return_can_only_be_requested_for_delivered_orders() {
    let system = system();
    let seller = seed_seller(&system, "sara").await;
    let buyer = seed_buyer(&system, "alice").await;
    let product = seed_product(&system, &seller, "Widget", dec!(25.00), 10, None).await;
    let order = place(&system, &buyer, PaymentMethod::Card, &[(&product, 1)]).await;

    let err = system
        .order_client
        .request_return(order.order_id, buyer, None)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        MarketError::InvalidState {
            status: OrderStatus::Placed,
            ..
        }
    ));

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn exchange_target_is_validated_at_request_and_again_at_completion() {
    let system = system();
    let seller = seed_seller(&system, "sara").await;
    let buyer = seed_buyer(&system, "alice").await;
    let other_buyer = seed_buyer(&system, "bob").await;
    let product = seed_product(&system, &seller, "Widget", dec!(25.00), 10, None).await;
    let target = seed_product(&system, &seller, "Widget XL", dec!(30.00), 2, None).await;

    let order = place(&system, &buyer, PaymentMethod::Card, &[(&product, 1)]).await;
    deliver_order(&system, &order.order_id, &buyer, &seller).await;

    let requested = system
        .order_client
        .request_exchange(
            order.order_id.clone(),
            buyer.clone(),
            Some("wrong size".to_string()),
            Some(target.clone()),
        )
        .await
        .unwrap();
    assert_eq!(requested.status, OrderStatus::ExchangeRequested);
    assert_eq!(requested.exchange_product_id.as_deref(), Some(target.as_str()));

    // The target drifts out of stock before the seller completes.
    place(&system, &other_buyer, PaymentMethod::Card, &[(&target, 2)]).await;
    let err = system
        .order_client
        .complete_exchange(order.order_id.clone(), seller.clone())
        .await
        .unwrap_err();
    assert_eq!(
        err,
        MarketError::BadRequest("exchange target product is out of stock".to_string())
    );

    // Restocked: completion goes through, and moves no stock by itself.
    system
        .product_client
        .update_product(
            target.clone(),
            ProductUpdate {
                price: None,
                stock: Some(5),
                low_stock_threshold: None,
                active: None,
            },
        )
        .await
        .unwrap();
    let original_stock = stock_of(&system, &product).await;
    let exchanged = system
        .order_client
        .complete_exchange(order.order_id, seller)
        .await
        .unwrap();
    assert_eq!(exchanged.status, OrderStatus::Exchanged);
    assert_eq!(stock_of(&system, &target).await, 5);
    assert_eq!(stock_of(&system, &product).await, original_stock);

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn exchange_request_rejects_an_inactive_target() {
    let system = system();
    let seller = seed_seller(&system, "sara").await;
    let buyer = seed_buyer(&system, "alice").await;
    let product = seed_product(&system, &seller, "Widget", dec!(25.00), 10, None).await;
    let target = seed_product(&system, &seller, "Widget XL", dec!(30.00), 5, None).await;
    system
        .product_client
        .update_product(
            target.clone(),
            ProductUpdate {
                price: None,
                stock: None,
                low_stock_threshold: None,
                active: Some(false),
            },
        )
        .await
        .unwrap();

    let order = place(&system, &buyer, PaymentMethod::Card, &[(&product, 1)]).await;
    deliver_order(&system, &order.order_id, &buyer, &seller).await;

    let err = system
        .order_client
        .request_exchange(order.order_id, buyer, None, Some(target))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        MarketError::BadRequest("exchange target product is not active".to_string())
    );

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn requesting_an_exchange_clears_any_previous_return_reason() {
    let system = system();
    let seller = seed_seller(&system, "sara").await;
    let buyer = seed_buyer(&system, "alice").await;
    let product = seed_product(&system, &seller, "Widget", dec!(25.00), 10, None).await;
    let order = place(&system, &buyer, PaymentMethod::Card, &[(&product, 1)]).await;
    deliver_order(&system, &order.order_id, &buyer, &seller).await;

    // Exchange without an explicit reason gets the fallback text, and the
    // reason fields stay mutually exclusive.
    let view = system
        .order_client
        .request_exchange(order.order_id, buyer, None, None)
        .await
        .unwrap();
    assert_eq!(
        view.exchange_reason.as_deref(),
        Some("Exchange requested by buyer")
    );
    assert!(view.cancel_reason.is_none() && view.return_reason.is_none());

    system.shutdown().await.unwrap();
}
