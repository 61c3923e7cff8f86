// Full service startup and graceful shutdown.

use std::time::Duration;

use tokio_util::sync::CancellationToken;

use offer_api::{run_service_until, Config};

fn test_config(dir: &tempfile::TempDir) -> Config {
    Config {
        api_port: 0,
        status_port: 0,
        db_path: dir.path().join("offers.db"),
        flush_interval_ms: 50,
        ..Default::default()
    }
}

#[tokio::test]
async fn test_service_starts_and_stops_on_cancel() {
    let dir = tempfile::tempdir().expect("temp dir");
    let shutdown = CancellationToken::new();

    let service = tokio::spawn(run_service_until(test_config(&dir), shutdown.clone()));
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert!(!service.is_finished(), "service exited before shutdown");

    shutdown.cancel();
    let report = tokio::time::timeout(Duration::from_secs(10), service)
        .await
        .expect("service did not stop in time")
        .expect("service task panicked")
        .expect("service failed");

    assert_eq!(report.created, 0);
    assert_eq!(report.unflushed, 0);
    assert!(dir.path().join("offers.db").exists());
}

#[tokio::test]
async fn test_startup_fails_for_unusable_database_path() {
    let dir = tempfile::tempdir().expect("temp dir");
    let config = Config {
        db_path: dir.path().join("missing").join("offers.db"),
        ..test_config(&dir)
    };

    let result = run_service_until(config, CancellationToken::new()).await;
    let err = result.expect_err("startup should fail");
    assert!(format!("{err:#}").contains("database"));
}

#[tokio::test]
async fn test_startup_fails_for_zero_capacity() {
    let dir = tempfile::tempdir().expect("temp dir");
    let config = Config {
        saver_capacity: 0,
        ..test_config(&dir)
    };

    let err = run_service_until(config, CancellationToken::new())
        .await
        .expect_err("startup should fail");
    assert!(format!("{err:#}").contains("capacity"));
}

#[tokio::test]
async fn test_startup_fails_for_zero_flush_group_count() {
    let dir = tempfile::tempdir().expect("temp dir");
    let config = Config {
        flush_group_count: 0,
        ..test_config(&dir)
    };

    let err = run_service_until(config, CancellationToken::new())
        .await
        .expect_err("startup should fail");
    assert!(format!("{err:#}").contains("group count"));
}
