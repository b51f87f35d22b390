// tests/integration/real_notify.rs
//
// End-to-end checks against the platform's native `notify` backend.

use std::fs;
use std::time::Duration;

use pathwatch::{ChangeMask, RegistryOptions, WatchRegistry};
use pathwatch_test_utils::{RecordingObserver, eventually, init_tracing, with_timeout};

/// Time for the backend to arm a freshly registered watch.
const ARM_DELAY: Duration = Duration::from_millis(200);

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn writing_a_watched_file_reports_a_modification() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().canonicalize().unwrap().join("watched.txt");
    fs::write(&file, "one").unwrap();

    let registry = WatchRegistry::new(RegistryOptions::default());
    let observer = RecordingObserver::new();

    with_timeout(async {
        registry.subscribe(&file, observer.clone()).await.unwrap();
        tokio::time::sleep(ARM_DELAY).await;

        fs::write(&file, "two").unwrap();
        eventually("modification to be reported", || {
            observer.count_with(&file, ChangeMask::MODIFIED) >= 1
        })
        .await;
    })
    .await;

    assert!(registry.is_running().await);
    registry.unsubscribe(&file).await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn deleting_a_watched_file_reports_it_and_stops_the_loop() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().canonicalize().unwrap().join("doomed.txt");
    fs::write(&file, "bye").unwrap();

    let registry = WatchRegistry::new(RegistryOptions::default());
    let observer = RecordingObserver::new();

    with_timeout(async {
        registry.subscribe(&file, observer.clone()).await.unwrap();
        tokio::time::sleep(ARM_DELAY).await;

        fs::remove_file(&file).unwrap();
        eventually("deletion to be reported", || {
            observer.count_with(&file, ChangeMask::DELETED) >= 1
        })
        .await;

        while registry.is_running().await {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await;

    assert_eq!(registry.generations().await, 1);
}
