//! Demo walkthrough: seeds a seller, a buyer, and a product, then drives one
//! order from cart to confirmed delivery.

use rust_decimal::Decimal;
use tracing::{error, info, Instrument};

use orderflow::config::MarketConfig;
use orderflow::error::MarketError;
use orderflow::lifecycle::{setup_tracing, OrderSystem};
use orderflow::model::{OrderCreate, PaymentMethod, ProductCreate, Role, UserCreate};

#[tokio::main]
async fn main() -> Result<(), MarketError> {
    setup_tracing();

    info!("Starting marketplace order system");
    let system = OrderSystem::new(MarketConfig::default());

    let seller_id = system
        .user_client
        .create_user(UserCreate {
            name: "Sara".to_string(),
            email: "sara@example.com".to_string(),
            role: Role::Seller,
        })
        .await?;
    let buyer_id = system
        .user_client
        .create_user(UserCreate {
            name: "Alice".to_string(),
            email: "alice@example.com".to_string(),
            role: Role::Buyer,
        })
        .await?;
    info!(%seller_id, %buyer_id, "Accounts created");

    let product_id = system
        .product_client
        .create_product(ProductCreate {
            name: "Super Widget".to_string(),
            price: Decimal::new(2550, 2), // 25.50
            stock: 100,
            seller_id: seller_id.clone(),
            low_stock_threshold: None,
        })
        .await?;
    info!(%product_id, "Product listed");

    system
        .cart_client
        .add_line(buyer_id.clone(), product_id.clone(), 5)
        .await?;

    let span = tracing::info_span!("order_processing");
    let order = async {
        info!("Placing order from active cart");
        system
            .order_client
            .place_order(OrderCreate {
                buyer_id: buyer_id.clone(),
                payment_method: PaymentMethod::Card,
                shipping_address: "221B Baker Street".to_string(),
                billing_address: "221B Baker Street".to_string(),
            })
            .await
    }
    .instrument(span)
    .await?;
    info!(order_id = %order.order_id, total = %order.total_amount, "Order placed");

    let payment = system
        .order_client
        .pay(order.order_id.clone(), buyer_id.clone(), false)
        .await?;
    info!(transaction_ref = %payment.transaction_ref, status = ?payment.status, "Payment settled");

    system
        .order_client
        .ship(order.order_id.clone(), seller_id.clone())
        .await?;
    let delivered = system
        .order_client
        .confirm_delivery(order.order_id.clone(), buyer_id.clone())
        .await?;
    info!(status = ?delivered.status, "Order delivered");

    for note in system
        .notification_client
        .list_for(seller_id.clone(), true)
        .await?
    {
        info!(title = %note.title, body = %note.body, "Seller notification");
    }

    if let Err(e) = system.shutdown().await {
        error!(error = %e, "Shutdown failed");
    }
    Ok(())
}
