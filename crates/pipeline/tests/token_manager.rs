mod common;

use std::time::Duration;

use assert_matches::assert_matches;
use chrono::Utc;
use common::{FakeDesignApi, Harness, USER_ID};
use donut_canva::CanvaApiError;
use donut_core::error::CoreError;
use donut_pipeline::PipelineError;
use futures::future::join_all;

#[tokio::test]
async fn fresh_token_is_returned_without_refresh() {
    let h = Harness::new();
    h.store.connect_user(USER_ID, Some(60));

    let token = h.tokens.get_token(USER_ID).await.unwrap();

    assert_eq!(token, "cached-token");
    assert_eq!(h.api.refresh_count(), 0);
}

#[tokio::test]
async fn expiring_token_is_refreshed_and_persisted() {
    let h = Harness::new();
    h.store.connect_user(USER_ID, Some(10));
    let before = Utc::now();

    let token = h.tokens.get_token(USER_ID).await.unwrap();

    assert_eq!(token, "fresh-token-1");
    assert_eq!(h.api.refresh_count(), 1);

    let creds = h.store.with(|s| s.credentials[&USER_ID].clone());
    assert_eq!(creds.access_token.as_deref(), Some("fresh-token-1"));
    assert_eq!(creds.refresh_token.as_deref(), Some("refresh-token-next"));
    let expires_at = creds.expires_at.unwrap();
    assert!(expires_at >= before + chrono::Duration::seconds(14_400));
    assert!(expires_at <= Utc::now() + chrono::Duration::seconds(14_400));
    assert!(creds.refreshed_at.is_some());
}

#[tokio::test]
async fn refreshed_token_is_reused_by_the_next_call() {
    let h = Harness::new();
    h.store.connect_user(USER_ID, None);

    h.tokens.get_token(USER_ID).await.unwrap();
    let second = h.tokens.get_token(USER_ID).await.unwrap();

    assert_eq!(second, "fresh-token-1");
    assert_eq!(h.api.refresh_count(), 1);
}

#[tokio::test]
async fn concurrent_callers_share_one_refresh() {
    let h = Harness::with_api(FakeDesignApi {
        refresh_delay: Duration::from_millis(50),
        ..Default::default()
    });
    h.store.connect_user(USER_ID, Some(1));

    let tokens = join_all((0..5).map(|_| h.tokens.get_token(USER_ID))).await;

    assert_eq!(h.api.refresh_count(), 1);
    assert_eq!(h.store.with(|s| s.credential_saves), 1);
    for token in tokens {
        assert_eq!(token.unwrap(), "fresh-token-1");
    }
}

#[tokio::test]
async fn refresh_locks_are_released_after_use() {
    let h = Harness::with_api(FakeDesignApi {
        refresh_delay: Duration::from_millis(20),
        ..Default::default()
    });
    h.store.connect_user(USER_ID, Some(1));
    h.store.connect_user(USER_ID + 1, Some(1));

    let tokens = join_all(
        [USER_ID, USER_ID, USER_ID + 1].map(|user_id| h.tokens.get_token(user_id)),
    )
    .await;

    assert!(tokens.iter().all(Result::is_ok));
    assert_eq!(h.tokens.active_refreshes(), 0);
}

#[tokio::test]
async fn unrepresentable_token_lifetime_is_rejected() {
    let h = Harness::with_api(FakeDesignApi {
        expires_in: i64::MAX,
        ..Default::default()
    });
    h.store.connect_user(USER_ID, None);

    let err = h.tokens.get_token(USER_ID).await.unwrap_err();

    assert_matches!(
        err,
        PipelineError::Canva(CanvaApiError::InvalidTokenLifetime(i64::MAX))
    );
    assert_eq!(h.store.with(|s| s.credential_saves), 0);
}

#[tokio::test]
async fn user_without_tokens_is_not_connected() {
    let h = Harness::new();
    h.store.add_user_without_tokens(USER_ID);

    let err = h.tokens.get_token(USER_ID).await.unwrap_err();

    assert_matches!(err, PipelineError::NotConnected);
    assert!(err.to_string().contains("connect to Canva"));
    assert_matches!(
        h.tokens.ensure_connected(USER_ID).await,
        Err(PipelineError::NotConnected)
    );
}

#[tokio::test]
async fn refresh_failure_leaves_credentials_untouched() {
    let h = Harness::with_api(FakeDesignApi {
        refresh_fails: true,
        ..Default::default()
    });
    h.store.connect_user(USER_ID, Some(5));

    let err = h.tokens.get_token(USER_ID).await.unwrap_err();

    assert!(err.is_upstream());
    let creds = h.store.with(|s| s.credentials[&USER_ID].clone());
    assert_eq!(creds.access_token.as_deref(), Some("cached-token"));
    assert_eq!(h.store.with(|s| s.credential_saves), 0);
}

#[tokio::test]
async fn unknown_user_is_not_found() {
    let h = Harness::new();

    let err = h.tokens.get_token(99).await.unwrap_err();

    assert_matches!(
        err,
        PipelineError::Core(CoreError::NotFound { entity: "user", id: 99 })
    );
}
