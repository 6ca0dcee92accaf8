//! Tests for file provisioning and the lazy manager

use std::path::Path;
use std::sync::Arc;

use tempfile::tempdir;

use super::manager::FileDatabase;
use super::provision::{MissingTemplate, provision};
use crate::source::ConnectionSource;

fn write_template(dir: &Path, bytes: &[u8]) -> std::path::PathBuf {
    let template = dir.join("seed.db");
    std::fs::write(&template, bytes).expect("write template");
    template
}

// =============================================================================
// Provisioning tests
// =============================================================================

#[tokio::test]
async fn provision_copies_template_bytes_exactly() {
    let dir = tempdir().expect("tempdir");
    let template = write_template(dir.path(), b"TEMPLATE");
    let destination = dir.path().join("data").join("app.db");

    let created = provision(&template, &destination, MissingTemplate::Fail)
        .await
        .expect("provision");

    assert!(created);
    assert_eq!(std::fs::read(&destination).expect("read"), b"TEMPLATE");
}

#[tokio::test]
async fn provision_creates_missing_parent_directories() {
    let dir = tempdir().expect("tempdir");
    let template = write_template(dir.path(), b"X");
    let destination = dir.path().join("a").join("b").join("c").join("deep.db");

    provision(&template, &destination, MissingTemplate::Fail)
        .await
        .expect("provision");

    assert!(destination.is_file());
}

#[tokio::test]
async fn provision_never_touches_an_existing_destination() {
    let dir = tempdir().expect("tempdir");
    let template = write_template(dir.path(), b"NEW CONTENT");
    let destination = dir.path().join("existing.db");
    std::fs::write(&destination, b"KEEP").expect("seed destination");

    let created = provision(&template, &destination, MissingTemplate::Fail)
        .await
        .expect("provision");

    assert!(!created);
    assert_eq!(std::fs::read(&destination).expect("read"), b"KEEP");
}

#[tokio::test]
async fn provision_skips_template_resolution_when_destination_exists() {
    let dir = tempdir().expect("tempdir");
    let missing_template = dir.path().join("nowhere.db");
    let destination = dir.path().join("present.db");
    std::fs::write(&destination, b"KEEP").expect("seed destination");

    // The existence check short-circuits before the template lookup.
    let created = provision(&missing_template, &destination, MissingTemplate::Fail)
        .await
        .expect("provision");

    assert!(!created);
}

#[tokio::test]
async fn provision_missing_template_fails_by_default() {
    let dir = tempdir().expect("tempdir");
    let missing_template = dir.path().join("nowhere.db");
    let destination = dir.path().join("never.db");

    let err = provision(&missing_template, &destination, MissingTemplate::Fail)
        .await
        .expect_err("template is required");

    assert_eq!(err.category(), "provisioning");
    assert!(!destination.exists());
}

#[tokio::test]
async fn provision_missing_template_can_create_empty_file() {
    let dir = tempdir().expect("tempdir");
    let missing_template = dir.path().join("nowhere.db");
    let destination = dir.path().join("fresh.db");

    let created = provision(
        &missing_template,
        &destination,
        MissingTemplate::CreateEmpty,
    )
    .await
    .expect("empty file policy");

    assert!(created);
    assert_eq!(std::fs::metadata(&destination).expect("metadata").len(), 0);
}

#[tokio::test]
async fn provision_resolves_bundled_templates_by_relative_name() {
    let dir = tempdir().expect("tempdir");
    let destination = dir.path().join("from_bundle.db");

    let created = provision(
        Path::new("blank.db"),
        &destination,
        MissingTemplate::Fail,
    )
    .await
    .expect("bundled template");

    assert!(created);
    assert!(destination.is_file());
}

// =============================================================================
// FileDatabase tests
// =============================================================================

#[tokio::test]
async fn open_provisions_and_connects() {
    let dir = tempdir().expect("tempdir");
    let template = write_template(dir.path(), b"TEMPLATE");
    let destination = dir.path().join("app.db");

    let db = FileDatabase::open(&template, &destination).await;

    assert_eq!(std::fs::read(&destination).expect("read"), b"TEMPLATE");
    let conn = db.connection().await.expect("live handle");
    assert_eq!(conn.driver_name(), "sqlite");
    assert!(!conn.is_closed());
}

#[tokio::test]
async fn connect_is_idempotent_and_provisions_once() {
    let dir = tempdir().expect("tempdir");
    let template = write_template(dir.path(), b"TEMPLATE");
    let destination = dir.path().join("app.db");

    let db = FileDatabase::open(&template, &destination).await;
    let first = db.connection().await.expect("first handle");

    db.connect().await;
    let second = db.connection().await.expect("second handle");

    assert!(Arc::ptr_eq(&first, &second), "handle is reused, not rebuilt");
    assert_eq!(std::fs::read(&destination).expect("read"), b"TEMPLATE");
}

#[tokio::test]
async fn database_name_gains_db_suffix() {
    let dir = tempdir().expect("tempdir");
    let template = write_template(dir.path(), b"X");

    let plain = FileDatabase::open(&template, dir.path().join("mydb")).await;
    assert_eq!(plain.database_name(), "mydb.db");

    let suffixed = FileDatabase::open(&template, dir.path().join("mydb.db")).await;
    assert_eq!(suffixed.database_name(), "mydb.db");
}

#[tokio::test]
async fn disconnect_allows_a_later_reconnect() {
    let dir = tempdir().expect("tempdir");
    let template = write_template(dir.path(), b"X");
    let destination = dir.path().join("app.db");

    let db = FileDatabase::open(&template, &destination).await;
    let first = db.connection().await.expect("first handle");

    db.disconnect().await;
    assert!(first.is_closed());

    let second = db.connection().await.expect("reconnected handle");
    assert!(!second.is_closed());
    assert!(!Arc::ptr_eq(&first, &second));
}

#[tokio::test]
async fn disconnect_swallows_a_second_close() {
    let dir = tempdir().expect("tempdir");
    let template = write_template(dir.path(), b"X");

    let db = FileDatabase::open(&template, dir.path().join("app.db")).await;
    db.disconnect().await;
    // No handle left; a second disconnect has nothing to do and no error
    // escapes either way.
    db.disconnect().await;
    assert!(db.connection().await.is_some());
}

#[tokio::test]
async fn failed_connect_leaves_no_handle_and_retries() {
    let dir = tempdir().expect("tempdir");
    let missing_template = dir.path().join("nowhere.db");
    let destination = dir.path().join("app.db");

    let db = FileDatabase::open(&missing_template, &destination).await;
    assert!(db.connection().await.is_none());
    assert!(!destination.exists());

    // Provide the template and the same manager recovers on retry.
    std::fs::write(&missing_template, b"LATE").expect("write template");
    let conn = db.connection().await.expect("recovered handle");
    assert!(!conn.is_closed());
    assert_eq!(std::fs::read(&destination).expect("read"), b"LATE");
}

#[tokio::test]
async fn empty_file_policy_still_yields_a_live_handle() {
    let dir = tempdir().expect("tempdir");
    let missing_template = dir.path().join("nowhere.db");
    let destination = dir.path().join("app.db");

    let db = FileDatabase::open_with_policy(
        &missing_template,
        &destination,
        MissingTemplate::CreateEmpty,
    )
    .await;

    assert_eq!(std::fs::metadata(&destination).expect("metadata").len(), 0);
    assert!(db.connection().await.is_some());
}

#[tokio::test]
async fn lease_from_file_source_does_not_steal_the_handle() {
    let dir = tempdir().expect("tempdir");
    let template = write_template(dir.path(), b"X");

    let db = FileDatabase::open(&template, dir.path().join("app.db")).await;
    {
        let lease = db.acquire().await.expect("lease");
        assert_eq!(lease.driver_name(), "sqlite");
    }
    // Dropping the lease must not close or remove the manager's handle.
    let conn = db.connection().await.expect("still live");
    assert!(!conn.is_closed());
}

#[tokio::test]
async fn acquire_reports_a_dead_manager() {
    let dir = tempdir().expect("tempdir");
    let missing_template = dir.path().join("nowhere.db");

    let db = FileDatabase::open(&missing_template, dir.path().join("app.db")).await;
    let err = db.acquire().await.expect_err("no live connection");
    assert_eq!(err.category(), "connection");
}
