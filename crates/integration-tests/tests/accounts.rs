//! Integration tests for registration, login and password change.

#![allow(clippy::unwrap_used)]

use vitrine_backend::ErrorKind;
use vitrine_backend::models::RegisterRequest;
use vitrine_core::{UserId, UserRole};
use vitrine_integration_tests::TestContext;

fn request(username: &str, email: &str) -> RegisterRequest {
    RegisterRequest {
        username: username.to_owned(),
        email: email.to_owned(),
        name: "Ana".to_owned(),
        phone: None,
    }
}

#[tokio::test]
async fn test_register_then_login_by_username_and_email() {
    let ctx = TestContext::new();
    let registered = ctx.register("ana", "ana@x.com", None, "p1").await;
    assert_eq!(registered.user.role, UserRole::User);

    let by_name = ctx.state.login("ana", "p1").await.unwrap();
    let by_email = ctx.state.login("ana@x.com", "p1").await.unwrap();
    assert_eq!(by_name.user, by_email.user);
    assert_ne!(by_name.token, by_email.token);

    let err = ctx.state.login("ana", "wrong").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidCredential);
}

#[tokio::test]
async fn test_login_identifier_is_case_sensitive() {
    let ctx = TestContext::new();
    ctx.register("ana", "ana@x.com", None, "p1").await;

    let err = ctx.state.login("Ana", "p1").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidCredential);
}

#[tokio::test]
async fn test_login_by_email_shared_with_another_username() {
    let ctx = TestContext::new();
    let eve = ctx.register("bob@x.com", "eve@x.com", None, "pe").await.user;
    let bob = ctx.register("bob", "bob@x.com", None, "pb").await.user;

    let as_bob = ctx.state.login("bob@x.com", "pb").await.unwrap();
    assert_eq!(as_bob.user.id, bob.id);

    let as_eve = ctx.state.login("bob@x.com", "pe").await.unwrap();
    assert_eq!(as_eve.user.id, eve.id);

    let err = ctx.state.login("bob@x.com", "nope").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidCredential);
}

#[tokio::test]
async fn test_register_conflicts_ignore_case() {
    let ctx = TestContext::new();
    ctx.register("ana", "ana@x.com", None, "p1").await;

    let err = ctx
        .state
        .register(request("ANA", "other@x.com"), "p1")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);

    let err = ctx
        .state
        .register(request("other", "Ana@X.com"), "p1")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);
}

#[tokio::test]
async fn test_register_rejects_invalid_input() {
    let ctx = TestContext::new();

    let err = ctx
        .state
        .register(request("ana", "not-an-email"), "p1")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);

    let err = ctx
        .state
        .register(request("ana", "ana@x.com"), "")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);

    let err = ctx
        .state
        .register(request("  ", "ana@x.com"), "p1")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
}

#[tokio::test]
async fn test_change_password() {
    let ctx = TestContext::new();
    let user = ctx.register("ana", "ana@x.com", None, "p1").await.user;

    let err = ctx
        .state
        .change_password(user.id, "wrong", "p2")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidCredential);

    let err = ctx
        .state
        .change_password(UserId::new(42), "p1", "p2")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidCredential);

    ctx.state.change_password(user.id, "p1", "p2").await.unwrap();
    assert!(ctx.state.login("ana", "p1").await.is_err());
    assert!(ctx.state.login("ana", "p2").await.is_ok());
}

#[tokio::test]
async fn test_sanitized_user_has_no_secret() {
    let ctx = TestContext::new();
    let session = ctx.register("ana", "ana@x.com", Some("11977777777"), "p1").await;

    let debug = format!("{:?}", session.user);
    assert!(!debug.contains("argon2"));
    assert_eq!(session.user.phone.as_deref(), Some("11977777777"));
}
