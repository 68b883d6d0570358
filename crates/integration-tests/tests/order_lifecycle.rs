//! Integration tests for checkout, status changes and their notifications.

#![allow(clippy::unwrap_used)]

use vitrine_backend::ErrorKind;
use vitrine_backend::notifications::Delivery;
use vitrine_core::{Channel, Email, Money, OrderId, OrderStatus, UserId};
use vitrine_integration_tests::{ADMIN_EMAIL, ADMIN_PHONE, TestContext, checkout, line};

const CUSTOMER_EMAIL: &str = "maria@exemplo.com";
const CUSTOMER_PHONE: &str = "11988888888";

fn customer_email() -> Option<Email> {
    Some(Email::parse(CUSTOMER_EMAIL).unwrap())
}

fn delivered_notices(deliveries: &[Delivery]) -> usize {
    deliveries
        .iter()
        .filter(|d| d.body.contains("delivered"))
        .count()
}

#[tokio::test]
async fn test_total_is_computed_and_items_are_snapshots() {
    let ctx = TestContext::new();
    let blazer = ctx.add_product("Blazer Midnight Velvet", 1000).await;
    let scarf = ctx.add_product("Echarpe Fios de Ouro", 500).await;

    let order = ctx
        .state
        .create_order(checkout(
            UserId::new(2),
            customer_email(),
            Some(CUSTOMER_PHONE),
            vec![
                line(blazer, "Blazer Midnight Velvet", 1000, 2),
                line(scarf, "Echarpe Fios de Ouro", 500, 1),
            ],
        ))
        .await
        .unwrap();

    assert_eq!(order.total, Money::from_minor(2500));
    assert_eq!(order.status, OrderStatus::Pending);

    // Repricing the catalog does not touch the placed order.
    let mut product = ctx.state.get_product(blazer).await.unwrap().unwrap();
    product.price = Money::from_minor(9999);
    product.name = "Blazer (new season)".to_owned();
    ctx.state.update_product(product).await.unwrap();

    let stored = ctx.state.get_order(&order.id).await.unwrap().unwrap();
    assert_eq!(stored.total, Money::from_minor(2500));
    assert_eq!(stored.items[0].unit_price, Money::from_minor(1000));
    assert_eq!(stored.items[0].name, "Blazer Midnight Velvet");
}

#[tokio::test]
async fn test_new_order_notifies_customer_and_admin() {
    let ctx = TestContext::with_admin_alerts();
    let product = ctx.add_product("Vestido Silk Horizon", 89_900).await;

    let order = ctx
        .state
        .create_order(checkout(
            UserId::new(2),
            customer_email(),
            Some(CUSTOMER_PHONE),
            vec![line(product, "Vestido Silk Horizon", 89_900, 1)],
        ))
        .await
        .unwrap();

    let to_customer = ctx.gateway.sent_to(CUSTOMER_EMAIL);
    assert_eq!(to_customer.len(), 1);
    assert_eq!(to_customer[0].channel, Channel::Email);
    assert!(to_customer[0].body.contains(order.id.as_str()));
    assert!(to_customer[0].body.contains("R$ 899,00"));
    assert_eq!(ctx.gateway.sent_to(CUSTOMER_PHONE).len(), 1);

    assert_eq!(ctx.gateway.sent_to(ADMIN_PHONE).len(), 1);
    assert_eq!(ctx.gateway.sent_to(ADMIN_EMAIL).len(), 1);
}

#[tokio::test]
async fn test_customer_without_contacts_gets_nothing() {
    let ctx = TestContext::new();
    let product = ctx.add_product("Bolsa de Couro Obsidian", 245_000).await;

    ctx.state
        .create_order(checkout(
            UserId::new(2),
            None,
            None,
            vec![line(product, "Bolsa", 245_000, 1)],
        ))
        .await
        .unwrap();

    assert!(ctx.gateway.deliveries().is_empty());
}

#[tokio::test]
async fn test_delivered_twice_notifies_twice() {
    let ctx = TestContext::new();
    let product = ctx.add_product("Echarpe", 45_000).await;
    let order = ctx
        .state
        .create_order(checkout(
            UserId::new(2),
            customer_email(),
            None,
            vec![line(product, "Echarpe", 45_000, 1)],
        ))
        .await
        .unwrap();
    ctx.gateway.clear();

    ctx.state
        .update_order_status(&order.id, OrderStatus::Delivered, None)
        .await
        .unwrap();
    ctx.state
        .update_order_status(&order.id, OrderStatus::Delivered, None)
        .await
        .unwrap();

    let sent = ctx.gateway.sent_to(CUSTOMER_EMAIL);
    assert_eq!(sent.len(), 2);
    assert_eq!(delivered_notices(&sent), 2);
    assert!(sent.iter().all(|d| d.subject.as_deref() == Some("Order delivered")));
}

#[tokio::test]
async fn test_status_change_message_and_tracking_code() {
    let ctx = TestContext::new();
    let product = ctx.add_product("Blazer", 129_900).await;
    let order = ctx
        .state
        .create_order(checkout(
            UserId::new(2),
            None,
            Some(CUSTOMER_PHONE),
            vec![line(product, "Blazer", 129_900, 1)],
        ))
        .await
        .unwrap();
    ctx.gateway.clear();

    let shipped = ctx
        .state
        .update_order_status(&order.id, OrderStatus::Shipped, Some("GBR-123456".to_owned()))
        .await
        .unwrap();
    assert_eq!(shipped.tracking_code.as_deref(), Some("GBR-123456"));

    let sent = ctx.gateway.sent_to(CUSTOMER_PHONE);
    assert_eq!(sent.len(), 1);
    assert!(sent[0].body.contains("status changed to SHIPPED"));
    assert!(sent[0].body.contains("GBR-123456"));

    // Omitting the code keeps the stored one; any status may follow any other.
    let back = ctx
        .state
        .update_order_status(&order.id, OrderStatus::Paid, None)
        .await
        .unwrap();
    assert_eq!(back.status, OrderStatus::Paid);
    assert_eq!(back.tracking_code.as_deref(), Some("GBR-123456"));
    assert_eq!(back.total, order.total);
}

#[tokio::test]
async fn test_notification_failures_are_ignored() {
    let ctx = TestContext::with_admin_alerts();
    ctx.gateway.set_accepting(false);
    let product = ctx.add_product("Echarpe", 45_000).await;

    let order = ctx
        .state
        .create_order(checkout(
            UserId::new(2),
            customer_email(),
            Some(CUSTOMER_PHONE),
            vec![line(product, "Echarpe", 45_000, 1)],
        ))
        .await
        .unwrap();
    let updated = ctx
        .state
        .update_order_status(&order.id, OrderStatus::Paid, None)
        .await
        .unwrap();

    assert_eq!(updated.status, OrderStatus::Paid);
    assert_eq!(ctx.gateway.deliveries().len(), 6);
}

#[tokio::test]
async fn test_invalid_carts_are_rejected() {
    let ctx = TestContext::new();
    let product = ctx.add_product("Echarpe", 45_000).await;

    let empty = ctx
        .state
        .create_order(checkout(UserId::new(2), None, None, Vec::new()))
        .await
        .unwrap_err();
    assert_eq!(empty.kind(), ErrorKind::InvalidInput);

    let zero = ctx
        .state
        .create_order(checkout(
            UserId::new(2),
            None,
            None,
            vec![line(product, "Echarpe", 45_000, 0)],
        ))
        .await
        .unwrap_err();
    assert_eq!(zero.kind(), ErrorKind::InvalidInput);

    let negative = ctx
        .state
        .create_order(checkout(
            UserId::new(2),
            None,
            None,
            vec![line(product, "Echarpe", -5_000, 1)],
        ))
        .await
        .unwrap_err();
    assert_eq!(negative.kind(), ErrorKind::InvalidInput);

    assert!(ctx.state.list_orders().await.unwrap().is_empty());
    assert_eq!(ctx.state.stats().await.unwrap().total_revenue, Money::ZERO);
}

#[tokio::test]
async fn test_unknown_order() {
    let ctx = TestContext::new();
    let err = ctx
        .state
        .update_order_status(&OrderId::new("ord_404"), OrderStatus::Paid, None)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert!(ctx.gateway.deliveries().is_empty());
    assert!(
        ctx.state
            .get_order(&OrderId::new("ord_404"))
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn test_listing_newest_first_and_per_user() {
    let ctx = TestContext::new();
    let product = ctx.add_product("Echarpe", 45_000).await;

    let first = ctx
        .state
        .create_order(checkout(
            UserId::new(1),
            None,
            None,
            vec![line(product, "Echarpe", 45_000, 1)],
        ))
        .await
        .unwrap();
    let second = ctx
        .state
        .create_order(checkout(
            UserId::new(2),
            None,
            None,
            vec![line(product, "Echarpe", 45_000, 3)],
        ))
        .await
        .unwrap();

    let all = ctx.state.list_orders().await.unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].id, second.id);
    assert_eq!(all[1].id, first.id);

    let mine = ctx.state.list_orders_for_user(UserId::new(1)).await.unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].id, first.id);
}
