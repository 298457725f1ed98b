//! End-to-end issuance tests.
//!
//! These drive the issuer through the testkit's recording store so the
//! exact sequence of saves is visible, and through SQLite for the
//! persisted shape.

use std::sync::Arc;

use keymint::store::{SqliteStore, Store, StoreError};
use keymint::{
    core::{now_millis, DAY_MILLIS},
    perms::StaticCatalog,
    IssueError, IssueRequest, Issuer, IssuerConfig, SaveMode, SaveStep,
};
use keymint_testkit::{RecordingStore, RequestParams, TestFixture};
use proptest::prelude::*;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("keymint=debug")
        .with_test_writer()
        .try_init();
}

#[test]
fn test_default_request_saves_once() {
    init_tracing();
    let fixture = TestFixture::new();
    let before = now_millis();
    let record = fixture.issue(&IssueRequest::new(90)).unwrap();
    let after = now_millis();

    assert!(!record.id().is_nil());
    assert_eq!(record.permissions().bits(), 0);
    let expires_at = record.expires_at().unwrap();
    assert!(expires_at >= before + 90 * DAY_MILLIS);
    assert!(expires_at <= after + 90 * DAY_MILLIS);

    assert_eq!(fixture.store.generation_count(), 1);
    assert_eq!(fixture.store.save_count(), 1);
    assert_eq!(fixture.store.get(record.id()).unwrap(), Some(record));
}

#[test]
fn test_seed_then_list_saves_twice() {
    init_tracing();
    let fixture = TestFixture::new();
    let request = IssueRequest::new(-1).raw_permissions(4).permission("read");
    let record = fixture.issue(&request).unwrap();

    assert_eq!(record.expires_at(), None);
    assert_eq!(record.permissions().bits(), 6);

    let saves = fixture.store.saves();
    assert_eq!(saves.len(), 2);
    assert_eq!(saves[0].permissions().bits(), 4);
    assert_eq!(saves[1].permissions().bits(), 6);
    assert_eq!(saves[0].id(), saves[1].id());
    assert_eq!(saves[0].secret(), saves[1].secret());
    assert_eq!(saves[0].expires_at(), saves[1].expires_at());
}

#[test]
fn test_list_within_seed_saves_once() {
    let fixture = TestFixture::new();
    let record = fixture
        .issue(&IssueRequest::new(1).raw_permissions(6).permission_list("read, 2"))
        .unwrap();
    assert_eq!(record.permissions().bits(), 6);
    assert_eq!(fixture.store.save_count(), 1);
}

#[test]
fn test_list_without_seed_saves_empty_first() {
    let fixture = TestFixture::new();
    let record = fixture
        .issue(&IssueRequest::new(30).permission_list("admin,3"))
        .unwrap();
    assert_eq!(record.permissions().bits(), 0b1001);

    let saves = fixture.store.saves();
    assert_eq!(saves.len(), 2);
    assert!(saves[0].permissions().is_empty());
}

#[test]
fn test_rejected_requests_touch_nothing() {
    let requests = [
        IssueRequest::new(0),
        IssueRequest::new(-2),
        IssueRequest::new(i64::MAX),
        IssueRequest::new(1).raw_permissions(-1),
        IssueRequest::new(1).permission("superuser"),
        IssueRequest::new(1).permission("64"),
        IssueRequest::new(1).permission_list("read,,write"),
    ];

    for request in &requests {
        let fixture = TestFixture::new();
        let err = fixture.issue(request).unwrap_err();
        assert!(
            matches!(
                err,
                IssueError::InvalidArgument { .. } | IssueError::UnknownPermissionName(_)
            ),
            "unexpected error for {:?}: {}",
            request,
            err
        );
        assert!(!err.record_exists());
        assert_eq!(fixture.store.generation_count(), 0);
        assert_eq!(fixture.store.save_count(), 0);
    }
}

#[test]
fn test_generation_failure_persists_nothing() {
    let fixture = TestFixture::with_store(RecordingStore::new().failing_generation(), SaveMode::TwoPhase);
    let err = fixture
        .issue(&IssueRequest::new(7).permission("read"))
        .unwrap_err();

    assert!(matches!(err, IssueError::GenerationFailure(_)));
    assert!(!err.record_exists());
    assert_eq!(fixture.store.save_count(), 0);
    assert_eq!(fixture.store.count().unwrap(), 0);
}

#[test]
fn test_first_save_failure_leaves_no_record() {
    let fixture = TestFixture::with_store(RecordingStore::new().failing_save(1), SaveMode::TwoPhase);
    let err = fixture
        .issue(&IssueRequest::new(7).raw_permissions(4).permission("read"))
        .unwrap_err();

    match &err {
        IssueError::PersistenceFailure { step, token, source } => {
            assert_eq!(*step, SaveStep::First);
            assert!(!fixture.store.has(token).unwrap());
            assert!(matches!(source, StoreError::InvalidData(_)));
        }
        other => panic!("expected persistence failure, got {}", other),
    }
    assert!(!err.record_exists());
    assert_eq!(fixture.store.save_count(), 1);
    assert_eq!(fixture.store.count().unwrap(), 0);
}

#[test]
fn test_second_save_failure_keeps_seed_record() {
    init_tracing();
    let fixture = TestFixture::with_store(RecordingStore::new().failing_save(2), SaveMode::TwoPhase);
    let err = fixture
        .issue(&IssueRequest::new(-1).raw_permissions(4).permission("read"))
        .unwrap_err();

    assert!(err.record_exists());
    let token = match &err {
        IssueError::PersistenceFailure {
            step: SaveStep::Second,
            token,
            ..
        } => *token,
        other => panic!("expected second save failure, got {}", other),
    };
    assert!(err.to_string().contains(&token.to_string()));

    let stored = fixture.store.get(&token).unwrap().unwrap();
    assert_eq!(stored.permissions().bits(), 4);
    assert_eq!(stored.expires_at(), None);
}

#[test]
fn test_single_save_mode() {
    let fixture = TestFixture::with_mode(SaveMode::Single);
    let record = fixture
        .issue(&IssueRequest::new(-1).raw_permissions(4).permission("read"))
        .unwrap();

    assert_eq!(record.permissions().bits(), 6);
    let saves = fixture.store.saves();
    assert_eq!(saves.len(), 1);
    assert_eq!(saves[0].permissions().bits(), 6);
}

#[test]
fn test_sqlite_end_to_end() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("keymint.db");

    let record = {
        let store = SqliteStore::open(&path).unwrap();
        let issuer = Issuer::new(store, StaticCatalog::builtin(), IssuerConfig::default());
        issuer
            .issue(&IssueRequest::new(14).raw_permissions(1 << 40).permission_list("write, 63"))
            .unwrap()
    };

    let reopened = SqliteStore::open(&path).unwrap();
    let stored = reopened.get(record.id()).unwrap().unwrap();
    assert_eq!(stored, record);
    assert_eq!(stored.permissions().bits(), (1 << 40) | (1 << 2) | (1 << 63));
    assert_eq!(reopened.count().unwrap(), 1);
}

#[test]
fn test_concurrent_issuers_share_database() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("keymint.db");
    let store = Arc::new(SqliteStore::open(&path).unwrap());
    let issuer = Issuer::new(Arc::clone(&store), StaticCatalog::builtin(), IssuerConfig::default());

    let ids: Vec<_> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| {
                scope.spawn(|| {
                    (0..10)
                        .map(|_| *issuer.issue(&IssueRequest::new(1).permission("read")).unwrap().id())
                        .collect::<Vec<_>>()
                })
            })
            .collect();
        handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect()
    });

    let mut unique = ids.clone();
    unique.sort();
    unique.dedup();
    assert_eq!(unique.len(), 40);
    assert_eq!(store.count().unwrap(), 40);
}

proptest! {
    #[test]
    fn test_issued_mask_is_expected(params: RequestParams) {
        let fixture = TestFixture::new();
        let record = fixture.issue(&params.to_request()).unwrap();

        prop_assert_eq!(record.permissions(), params.expected_mask());
        let stored = fixture.store.get(record.id()).unwrap().unwrap();
        prop_assert_eq!(stored, record.clone());

        let seed = params.raw_permissions.unwrap_or(0) as u64;
        let saves = fixture.store.saves();
        prop_assert_eq!(saves[0].permissions().bits(), seed);
        let expected_saves = if params.expected_mask().bits() == seed { 1 } else { 2 };
        prop_assert_eq!(saves.len(), expected_saves);
    }

    #[test]
    fn test_invalid_days_always_rejected(days in keymint_testkit::generators::invalid_days()) {
        let fixture = TestFixture::new();
        let err = fixture.issue(&IssueRequest::new(days)).unwrap_err();
        let is_days_error = matches!(err, IssueError::InvalidArgument { field: "days", .. });
        prop_assert!(is_days_error);
        prop_assert_eq!(fixture.store.generation_count(), 0);
    }
}
