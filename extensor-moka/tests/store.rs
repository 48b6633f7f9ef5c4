use std::time::Duration;

use extensor_backend::{Backend, DeleteStatus};
use extensor_moka::MokaBackend;

#[tokio::test]
async fn test_write_then_read() {
    let backend = MokaBackend::<String>::builder().max_entries(100).build();

    backend
        .write("user/42", "alice".to_owned(), None)
        .await
        .unwrap();

    assert_eq!(
        backend.read("user/42").await.unwrap(),
        Some("alice".to_owned())
    );
    assert_eq!(backend.read("user/43").await.unwrap(), None);
}

#[tokio::test]
async fn test_zero_ttl_never_expires() {
    let backend = MokaBackend::<u32>::builder().unbounded().build();

    backend.write("k", 1, Some(Duration::ZERO)).await.unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;

    assert_eq!(backend.read("k").await.unwrap(), Some(1));
    let entry = backend.entry("k").await.unwrap();
    assert_eq!(entry.expires_at(), None);
}

#[tokio::test]
async fn test_entry_expires_after_ttl() {
    let backend = MokaBackend::<u32>::builder().max_entries(100).build();

    backend
        .write("short", 1, Some(Duration::from_millis(30)))
        .await
        .unwrap();
    backend.write("long", 2, Some(Duration::from_secs(60))).await.unwrap();
    assert_eq!(backend.read("short").await.unwrap(), Some(1));

    tokio::time::sleep(Duration::from_millis(80)).await;

    assert_eq!(backend.read("short").await.unwrap(), None);
    assert_eq!(backend.read("long").await.unwrap(), Some(2));
    assert_eq!(backend.size().await.unwrap(), 1);
}

#[tokio::test]
async fn test_overwrite_replaces_ttl() {
    let backend = MokaBackend::<u32>::builder().max_entries(100).build();

    backend
        .write("k", 1, Some(Duration::from_millis(30)))
        .await
        .unwrap();
    backend.write("k", 2, None).await.unwrap();

    tokio::time::sleep(Duration::from_millis(80)).await;

    assert_eq!(backend.read("k").await.unwrap(), Some(2));
}

#[tokio::test]
async fn test_remove_reports_status() {
    let backend = MokaBackend::<u32>::builder().max_entries(100).build();
    backend.write("k", 1, None).await.unwrap();

    assert_eq!(backend.remove("k").await.unwrap(), DeleteStatus::Deleted(1));
    assert_eq!(backend.remove("k").await.unwrap(), DeleteStatus::Missing);
    assert_eq!(backend.read("k").await.unwrap(), None);
}

#[tokio::test]
async fn test_clear_and_size() {
    let backend = MokaBackend::<u32>::builder().unbounded().build();
    for i in 0..5 {
        backend.write(&format!("k{i}"), i, None).await.unwrap();
    }
    assert_eq!(backend.size().await.unwrap(), 5);

    backend.clear().await.unwrap();

    assert_eq!(backend.size().await.unwrap(), 0);
    assert_eq!(backend.read("k0").await.unwrap(), None);
}

#[tokio::test]
async fn test_label_is_backend_name() {
    let default = MokaBackend::<u32>::builder().max_entries(1).build();
    let labeled = MokaBackend::<u32>::builder()
        .label("sessions")
        .unbounded()
        .build();

    assert_eq!(default.name(), "moka");
    assert_eq!(labeled.name(), "sessions");
}
