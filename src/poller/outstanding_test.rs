//! Tests for outstanding work tracking

use super::*;
use std::time::Duration;

#[test]
fn test_starts_idle() {
    let work = OutstandingWork::new();
    assert_eq!(work.count(), 0);
}

#[test]
fn test_guard_increments_and_releases_on_drop() {
    let work = OutstandingWork::new();

    let first = work.acquire();
    let second = work.acquire();
    assert_eq!(work.count(), 2);

    drop(first);
    assert_eq!(work.count(), 1);

    drop(second);
    assert_eq!(work.count(), 0);
}

#[test]
fn test_clones_share_the_counter() {
    let work = OutstandingWork::new();
    let cloned = work.clone();

    let _guard = cloned.acquire();
    assert_eq!(work.count(), 1);
}

#[tokio::test]
async fn test_wait_idle_returns_immediately_when_idle() {
    let work = OutstandingWork::new();

    let result = tokio::time::timeout(Duration::from_millis(100), work.wait_idle()).await;
    assert!(result.is_ok(), "wait_idle() should not block with no work");
}

#[tokio::test]
async fn test_wait_idle_blocks_until_last_guard_drops() {
    let work = OutstandingWork::new();
    let guard = work.acquire();

    let waiter = {
        let work = work.clone();
        tokio::spawn(async move { work.wait_idle().await })
    };

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(!waiter.is_finished(), "wait_idle() returned with work outstanding");

    drop(guard);

    let result = tokio::time::timeout(Duration::from_secs(1), waiter).await;
    assert!(result.is_ok(), "wait_idle() should complete once idle");
    assert_eq!(work.count(), 0);
}

#[tokio::test]
async fn test_guard_released_when_task_panics() {
    let work = OutstandingWork::new();
    let guard = work.acquire();

    let handle = tokio::spawn(async move {
        let _guard = guard;
        panic!("batch blew up");
    });

    assert!(handle.await.is_err(), "task should have panicked");
    assert_eq!(work.count(), 0);
}
