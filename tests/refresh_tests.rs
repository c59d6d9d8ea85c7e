//! Background refresh behaviour against a changing allow-list file.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

mod common;

use common::{eventually, EmailsFile};

const POLL: Duration = Duration::from_millis(10);

#[tokio::test]
async fn test_refresh_picks_up_added_addresses() {
    let file = EmailsFile::new(&["xyzzy@example.com"]);
    let validator = file.validator(&[], POLL);
    assert!(!validator.is_valid("plugh@example.com"));

    file.write_emails(&["xyzzy@example.com", "plugh@example.com"]);

    eventually("added address visible", || validator.is_valid("plugh@example.com")).await;
    assert!(validator.is_valid("xyzzy@example.com"));
}

#[tokio::test]
async fn test_refresh_drops_removed_addresses() {
    let file = EmailsFile::new(&["xyzzy@example.com", "plugh@example.com"]);
    let validator = file.validator(&[], POLL);
    assert!(validator.is_valid("plugh@example.com"));

    file.write_emails(&["xyzzy@example.com"]);

    eventually("removed address gone", || !validator.is_valid("plugh@example.com")).await;
    assert!(validator.is_valid("xyzzy@example.com"));
}

#[tokio::test]
async fn test_emptied_file_publishes_empty_set() {
    let file = EmailsFile::new(&["xyzzy@example.com"]);
    let validator = file.validator(&["example0.com"], POLL);

    file.write_emails(&[]);

    eventually("allow-list emptied", || validator.allowlist_len() == 0).await;
    assert!(!validator.is_valid("xyzzy@example.com"));
    assert!(validator.is_valid("foo@example0.com"), "domain rule is unaffected");
}

#[tokio::test]
async fn test_malformed_update_keeps_previous_snapshot() {
    let file = EmailsFile::new(&["xyzzy@example.com"]);
    let validator = file.validator(&[], POLL);

    file.write_raw("plugh@example.com\n\"unterminated@example.com\n");

    eventually("failed refresh recorded", || {
        validator.refresh_status().is_some_and(|s| s.failures > 0)
    })
    .await;
    assert!(validator.is_valid("xyzzy@example.com"));
    assert!(!validator.is_valid("plugh@example.com"));

    file.write_emails(&["plugh@example.com"]);
    eventually("recovered after fix", || validator.is_valid("plugh@example.com")).await;
    assert!(!validator.is_valid("xyzzy@example.com"));
}

#[tokio::test]
async fn test_deleted_file_keeps_previous_snapshot() {
    let file = EmailsFile::new(&["xyzzy@example.com"]);
    let validator = file.validator(&[], POLL);

    file.remove();

    eventually("failed refresh recorded", || {
        validator.refresh_status().is_some_and(|s| s.failures > 0)
    })
    .await;
    assert!(validator.is_valid("xyzzy@example.com"));
    assert_eq!(validator.allowlist_len(), 1);
}

#[tokio::test]
async fn test_malformed_file_at_startup_starts_empty() {
    let file = EmailsFile::new(&[]);
    file.write_raw("\"unterminated@example.com\n");

    let validator = file.validator(&["example0.com"], POLL);
    assert_eq!(validator.allowlist_len(), 0);
    assert!(validator.is_valid("foo@example0.com"));

    let status = validator.refresh_status().unwrap();
    assert_eq!(status.successes, 0);
    assert!(status.failures >= 1);

    file.write_emails(&["unterminated@example.com"]);
    eventually("recovered after fix", || validator.is_valid("unterminated@example.com")).await;
}

#[tokio::test]
async fn test_zero_interval_loads_once() {
    let file = EmailsFile::new(&["xyzzy@example.com"]);
    let validator = file.validator(&[], Duration::ZERO);

    file.write_emails(&["plugh@example.com"]);
    tokio::time::sleep(Duration::from_millis(50)).await;

    assert!(validator.is_valid("xyzzy@example.com"));
    assert!(!validator.is_valid("plugh@example.com"));

    let status = validator.refresh_status().unwrap();
    assert_eq!(status.interval_ms, 0);
    assert_eq!(status.successes, 1);
}

#[tokio::test]
async fn test_status_tracks_successful_refreshes() {
    let file = EmailsFile::new(&["xyzzy@example.com", "plugh@example.com"]);
    let validator = file.validator(&[], POLL);

    eventually("several refreshes", || {
        validator.refresh_status().is_some_and(|s| s.successes >= 3)
    })
    .await;

    let status = validator.refresh_status().unwrap();
    assert_eq!(status.source, file.path().display().to_string());
    assert_eq!(status.interval_ms, 10);
    assert_eq!(status.entries, 2);
    assert!(status.last_success_unix_ms.is_some());
    assert!(status.last_failure_unix_ms.is_none());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_readers_only_observe_complete_snapshots() {
    const GENERATIONS: usize = 20;
    const PER_GENERATION: usize = 50;

    fn generation(k: usize) -> Vec<String> {
        (0..PER_GENERATION)
            .map(|i| format!("gen{k}-user{i}@example.com"))
            .chain(std::iter::once("always@example.com".to_string()))
            .collect()
    }

    fn write_generation(file: &EmailsFile, k: usize) {
        let emails = generation(k);
        let refs: Vec<&str> = emails.iter().map(String::as_str).collect();
        file.write_emails(&refs);
    }

    let file = EmailsFile::new(&[]);
    write_generation(&file, 0);
    let validator = Arc::new(file.validator(&[], Duration::from_millis(1)));
    let done = Arc::new(AtomicBool::new(false));

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let validator = validator.clone();
            let done = done.clone();
            std::thread::spawn(move || {
                let mut reads = 0u64;
                while !done.load(Ordering::Acquire) {
                    assert!(validator.is_valid("always@example.com"), "observed a partial snapshot");
                    assert_eq!(validator.allowlist_len(), PER_GENERATION + 1);
                    reads += 1;
                }
                reads
            })
        })
        .collect();

    for k in 1..=GENERATIONS {
        write_generation(&file, k);
        let newest = format!("gen{k}-user{}@example.com", PER_GENERATION - 1);
        eventually("generation published", || validator.is_valid(&newest)).await;
    }

    done.store(true, Ordering::Release);
    for reader in readers {
        assert!(reader.join().unwrap() > 0);
    }
}
