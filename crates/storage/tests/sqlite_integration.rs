use chrono::Duration;
use quiz_core::model::{ResultRecord, SessionId};
use quiz_core::time::fixed_now;
use storage::repository::{ResultRepository, StorageError};
use storage::sqlite::SqliteRepository;

fn record(score: u32, minutes_ago: i64) -> ResultRecord {
    ResultRecord {
        session_id: SessionId::random(),
        score,
        correct_count: score,
        incorrect_count: 12 - score,
        completed_at: fixed_now() - Duration::minutes(minutes_ago),
    }
}

#[tokio::test]
async fn sqlite_roundtrip_persists_result_records() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_results?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    assert!(repo.last_result().await.unwrap().is_none());

    let older = record(4, 60);
    let newer = record(9, 5);
    repo.append_result(&older).await.unwrap();
    let newer_id = repo.append_result(&newer).await.unwrap();

    let last = repo.last_result().await.unwrap().expect("last result");
    assert_eq!(last.id, newer_id);
    assert_eq!(last.record, newer);

    let listed = repo.list_results(10).await.unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[1].record, older);
}

#[tokio::test]
async fn sqlite_migrations_are_idempotent() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_migrate?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("first migrate");
    repo.migrate().await.expect("second migrate");

    repo.append_result(&record(1, 0)).await.unwrap();
    assert_eq!(repo.list_results(5).await.unwrap().len(), 1);
}

#[tokio::test]
async fn sqlite_rejects_duplicate_session_records() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_dupes?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    let rec = record(6, 0);
    repo.append_result(&rec).await.unwrap();
    let err = repo.append_result(&rec).await.unwrap_err();
    assert!(matches!(err, StorageError::Serialization(_)));
}
