#![cfg(feature = "sqlite")]

use cistern_drivers::sqlite::SqliteDriver;
use cistern_drivers::{ConnectionConfig, DatabaseDriver, DriverRegistry};

#[tokio::test]
async fn registry_driver_opens_and_closes_a_file_database() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("registry.db");

    let driver = DriverRegistry::global().get("sqlite").expect("registered");
    let config = ConnectionConfig::file("sqlite", &path);

    let conn = driver.connect(&config).await.expect("connect");
    assert_eq!(conn.driver_name(), "sqlite");
    assert!(!conn.is_closed());
    assert!(path.exists());

    conn.close().await.expect("close");
    assert!(conn.is_closed());
}

#[tokio::test]
async fn open_error_reports_connection_category() {
    let dir = tempfile::tempdir().expect("tempdir");
    // A directory is not a database file; opening it must fail cleanly.
    let config = ConnectionConfig::file("sqlite", dir.path());

    let driver = SqliteDriver::new();
    let err = driver.connect(&config).await.expect_err("cannot open a directory");
    assert_eq!(err.category(), "connection");
}

#[test]
fn driver_metadata_matches_dialect() {
    let driver = SqliteDriver::new();
    assert_eq!(driver.name(), "sqlite");
    assert_eq!(driver.display_name(), "SQLite");
    assert_eq!(driver.default_port(), None);
    assert_eq!(driver.dialect().driver(), "sqlite");
}
