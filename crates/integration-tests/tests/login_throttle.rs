//! Integration tests for login brute-force protection.

#![allow(clippy::unwrap_used)]

use std::time::Duration;

use vitrine_backend::ErrorKind;
use vitrine_integration_tests::TestContext;

const LOCKOUT: Duration = Duration::from_secs(5 * 60);

async fn fail_times(ctx: &TestContext, identifier: &str, times: usize) {
    for _ in 0..times {
        let err = ctx.state.login(identifier, "wrong").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidCredential);
    }
}

#[tokio::test]
async fn test_sixth_attempt_is_throttled_even_with_correct_password() {
    let ctx = TestContext::new();
    ctx.register("ana", "ana@x.com", None, "p1").await;

    fail_times(&ctx, "ana", 5).await;

    let err = ctx.state.login("ana", "p1").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Throttled);
    assert_eq!(err.retry_after(), Some(LOCKOUT));
}

#[tokio::test]
async fn test_lockout_lifts_after_five_minutes() {
    let ctx = TestContext::new();
    ctx.register("ana", "ana@x.com", None, "p1").await;
    fail_times(&ctx, "ana", 5).await;

    ctx.clock.advance(Duration::from_secs(4 * 60 + 59));
    assert_eq!(
        ctx.state.login("ana", "p1").await.unwrap_err().kind(),
        ErrorKind::Throttled
    );

    ctx.clock.advance(Duration::from_secs(1));
    let session = ctx.state.login("ana", "p1").await.unwrap();
    assert_eq!(session.user.username, "ana");
}

#[tokio::test]
async fn test_throttled_attempts_do_not_extend_lockout() {
    let ctx = TestContext::new();
    ctx.register("ana", "ana@x.com", None, "p1").await;
    fail_times(&ctx, "ana", 5).await;

    ctx.clock.advance(Duration::from_secs(60));
    assert!(ctx.state.login("ana", "wrong").await.is_err());
    assert_eq!(ctx.state.failed_logins("ana"), 5);

    let err = ctx.state.login("ana", "p1").await.unwrap_err();
    assert_eq!(err.retry_after(), Some(Duration::from_secs(4 * 60)));
}

#[tokio::test]
async fn test_success_resets_counter() {
    let ctx = TestContext::new();
    ctx.register("ana", "ana@x.com", None, "p1").await;

    fail_times(&ctx, "ana", 4).await;
    ctx.state.login("ana", "p1").await.unwrap();
    fail_times(&ctx, "ana", 4).await;

    // Still not throttled: the fifth failure of the new streak is evaluated normally.
    let err = ctx.state.login("ana", "wrong").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidCredential);
}

#[tokio::test]
async fn test_username_and_email_are_throttled_independently() {
    let ctx = TestContext::new();
    ctx.register("ana", "ana@x.com", None, "p1").await;

    fail_times(&ctx, "ana", 5).await;
    assert_eq!(
        ctx.state.login("ana", "p1").await.unwrap_err().kind(),
        ErrorKind::Throttled
    );

    // The same account through its email alias is not locked.
    let session = ctx.state.login("ana@x.com", "p1").await.unwrap();
    assert_eq!(session.user.username, "ana");
}

#[tokio::test]
async fn test_unknown_identifiers_are_throttled_too() {
    let ctx = TestContext::new();
    fail_times(&ctx, "nobody", 5).await;
    assert_eq!(
        ctx.state.login("nobody", "x").await.unwrap_err().kind(),
        ErrorKind::Throttled
    );
}
