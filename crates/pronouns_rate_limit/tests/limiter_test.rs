use chrono::{Duration, Utc};
use pronouns_rate_limit::{
    InteractionRateLimiter, RateLimitConfig, RateLimitDecision, RateLimitRecord,
};
use pronouns_store::{KeyValueStore, MemoryStore, get_json};
use std::sync::Arc;

fn setup() -> (Arc<MemoryStore>, InteractionRateLimiter) {
    let store = Arc::new(MemoryStore::new());
    let limiter = InteractionRateLimiter::new(store.clone(), RateLimitConfig::default());
    (store, limiter)
}

#[tokio::test]
async fn test_ninth_call_in_window_is_rejected() {
    let (_store, limiter) = setup();
    let start = Utc::now();

    for i in 0..8 {
        let decision = limiter
            .check_at("user-1", start + Duration::seconds(i))
            .await
            .unwrap();
        assert_eq!(decision, RateLimitDecision::Allowed { calls: i as u32 + 1 });
    }

    let ninth = limiter
        .check_at("user-1", start + Duration::seconds(8))
        .await
        .unwrap();
    assert!(ninth.is_limited());
}

#[tokio::test]
async fn test_call_after_quiet_gap_is_accepted() {
    let (_store, limiter) = setup();
    let start = Utc::now();

    for _ in 0..9 {
        limiter.check_at("user-1", start).await.unwrap();
    }
    assert!(limiter.check_at("user-1", start).await.unwrap().is_limited());

    let later = limiter
        .check_at("user-1", start + Duration::seconds(16))
        .await
        .unwrap();
    assert_eq!(later, RateLimitDecision::Allowed { calls: 1 });
}

#[tokio::test]
async fn test_rejected_calls_do_not_touch_record() {
    let (store, limiter) = setup();
    let start = Utc::now();

    for _ in 0..8 {
        limiter.check_at("user-1", start).await.unwrap();
    }
    limiter
        .check_at("user-1", start + Duration::seconds(10))
        .await
        .unwrap();

    let record: RateLimitRecord = get_json(store.as_ref() as &dyn KeyValueStore, "ratelimits:user-1")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(record.calls, 8);
    assert_eq!(record.timestamp, start.timestamp_millis());
}

#[tokio::test]
async fn test_users_are_counted_separately() {
    let (_store, limiter) = setup();
    let now = Utc::now();

    for _ in 0..8 {
        limiter.check_at("user-1", now).await.unwrap();
    }
    assert!(limiter.check_at("user-1", now).await.unwrap().is_limited());
    assert_eq!(
        limiter.check_at("user-2", now).await.unwrap(),
        RateLimitDecision::Allowed { calls: 1 }
    );
}

#[tokio::test]
async fn test_retry_hint_follows_process_start() {
    let started = Utc::now();
    let limiter = InteractionRateLimiter::new(
        Arc::new(MemoryStore::new()),
        RateLimitConfig::default().with_capacity(1),
    )
    .with_started_at(started);

    let now = started + Duration::seconds(20);
    limiter.check_at("user-1", now).await.unwrap();
    assert_eq!(
        limiter.check_at("user-1", now).await.unwrap(),
        RateLimitDecision::Limited {
            retry_after_secs: 10
        }
    );
}

#[tokio::test(start_paused = true)]
async fn test_counter_expires_after_window() {
    let (store, limiter) = setup();

    limiter.check("user-1").await.unwrap();
    assert!(store.get("ratelimits:user-1").await.unwrap().is_some());

    tokio::time::advance(std::time::Duration::from_secs(16)).await;
    assert!(store.get("ratelimits:user-1").await.unwrap().is_none());
    assert_eq!(store.purge_expired().await, 1);
}
