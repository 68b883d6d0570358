//! Integration tests for password recovery codes.

#![allow(clippy::unwrap_used)]

use std::time::Duration;

use vitrine_backend::ErrorKind;
use vitrine_core::Channel;
use vitrine_integration_tests::TestContext;

/// The code carried by the last message sent to `recipient`.
fn last_code(ctx: &TestContext, recipient: &str) -> String {
    let body = ctx.gateway.sent_to(recipient).pop().unwrap().body;
    body.rsplit(' ').next().unwrap().to_owned()
}

#[tokio::test]
async fn test_code_by_email_resets_password() {
    let ctx = TestContext::new();
    ctx.register("ana", "ana@x.com", None, "p1").await;

    ctx.state
        .request_recovery("ANA@X.COM", Channel::Email)
        .await
        .unwrap();
    let code = last_code(&ctx, "ana@x.com");
    assert_eq!(code.len(), 6);
    assert!(code.chars().all(|c| c.is_ascii_digit()));

    ctx.state.redeem_recovery(&code, "p2").await.unwrap();

    assert_eq!(
        ctx.state.login("ana", "p1").await.unwrap_err().kind(),
        ErrorKind::InvalidCredential
    );
    assert!(ctx.state.login("ana", "p2").await.is_ok());
}

#[tokio::test]
async fn test_code_by_phone() {
    let ctx = TestContext::new();
    ctx.register("bia", "bia@x.com", Some("11977777777"), "p1")
        .await;

    ctx.state
        .request_recovery("bia", Channel::Phone)
        .await
        .unwrap();

    assert!(ctx.gateway.sent_to("bia@x.com").is_empty());
    let code = last_code(&ctx, "11977777777");
    ctx.state.redeem_recovery(&code, "p2").await.unwrap();
}

#[tokio::test]
async fn test_second_request_invalidates_first_code() {
    let ctx = TestContext::new();
    ctx.register("ana", "ana@x.com", None, "p1").await;

    ctx.state.request_recovery("ana", Channel::Email).await.unwrap();
    let first = last_code(&ctx, "ana@x.com");
    ctx.state.request_recovery("ana", Channel::Email).await.unwrap();
    let second = last_code(&ctx, "ana@x.com");

    if first != second {
        assert_eq!(
            ctx.state
                .redeem_recovery(&first, "p2")
                .await
                .unwrap_err()
                .kind(),
            ErrorKind::InvalidOrExpiredToken
        );
    }
    ctx.state.redeem_recovery(&second, "p2").await.unwrap();
}

#[tokio::test]
async fn test_code_is_single_use() {
    let ctx = TestContext::new();
    ctx.register("ana", "ana@x.com", None, "p1").await;
    ctx.state.request_recovery("ana", Channel::Email).await.unwrap();
    let code = last_code(&ctx, "ana@x.com");

    ctx.state.redeem_recovery(&code, "p2").await.unwrap();
    let err = ctx.state.redeem_recovery(&code, "p3").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidOrExpiredToken);
    assert!(ctx.state.login("ana", "p2").await.is_ok());
}

#[tokio::test]
async fn test_code_expires_after_ten_minutes() {
    let ctx = TestContext::new();
    ctx.register("ana", "ana@x.com", None, "p1").await;
    ctx.state.request_recovery("ana", Channel::Email).await.unwrap();
    let code = last_code(&ctx, "ana@x.com");

    ctx.clock.advance(Duration::from_secs(10 * 60));

    let err = ctx.state.redeem_recovery(&code, "p2").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidOrExpiredToken);
    assert_eq!(ctx.state.purge_expired_tokens().await.unwrap(), 1);
}

#[tokio::test]
async fn test_phone_channel_requires_phone() {
    let ctx = TestContext::new();
    ctx.register("ana", "ana@x.com", None, "p1").await;

    let err = ctx
        .state
        .request_recovery("ana", Channel::Phone)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MissingChannel);
    assert!(ctx.gateway.deliveries().is_empty());
    assert_eq!(ctx.state.purge_expired_tokens().await.unwrap(), 0);
}

#[tokio::test]
async fn test_unknown_account() {
    let ctx = TestContext::new();
    let err = ctx
        .state
        .request_recovery("ghost", Channel::Email)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn test_failed_delivery_still_issues_code() {
    let ctx = TestContext::new();
    ctx.register("ana", "ana@x.com", None, "p1").await;
    ctx.gateway.set_accepting(false);

    ctx.state.request_recovery("ana", Channel::Email).await.unwrap();
    let code = last_code(&ctx, "ana@x.com");
    ctx.state.redeem_recovery(&code, "p2").await.unwrap();
}
