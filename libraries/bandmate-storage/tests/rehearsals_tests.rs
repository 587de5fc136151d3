//! Integration tests for the rehearsals vertical slice


use bandmate_core::types::{Rehearsal, RehearsalId, RehearsalStatus};
use bandmate_storage::StorageError;
use test_helpers::*;

#[tokio::test]
async fn test_create_and_list_ascending() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let user = create_test_account(pool, "drums@example.com", "Drums").await;
    let band = create_test_band(pool, &user, "Tuesday Club").await;

    let later = Rehearsal::new(band.id.clone(), "2030-05-20", None, None, None);
    let earlier = Rehearsal::new(
        band.id.clone(),
        "2030-05-06",
        Some("19:00".to_string()),
        Some("Rehearsal Room 2".to_string()),
        None,
    );

    // Insert out of order; listing must sort by date
    bandmate_storage::rehearsals::create(pool, &later).await.unwrap();
    bandmate_storage::rehearsals::create(pool, &earlier).await.unwrap();

    let listed = bandmate_storage::rehearsals::list_for_band(pool, &band.id)
        .await
        .unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].id, earlier.id);
    assert_eq!(listed[1].id, later.id);
    assert_eq!(listed[0].location.as_deref(), Some("Rehearsal Room 2"));
}

#[tokio::test]
async fn test_list_upcoming_filters_by_date() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let user = create_test_account(pool, "drums@example.com", "Drums").await;
    let band = create_test_band(pool, &user, "Tuesday Club").await;

    let past = Rehearsal::new(band.id.clone(), "2020-01-10", None, None, None);
    let today = Rehearsal::new(band.id.clone(), "2030-06-15", None, None, None);
    let future = Rehearsal::new(band.id.clone(), "2030-07-01", None, None, None);

    bandmate_storage::rehearsals::create(pool, &past).await.unwrap();
    bandmate_storage::rehearsals::create(pool, &today).await.unwrap();
    bandmate_storage::rehearsals::create(pool, &future).await.unwrap();

    // Cutoff equal to a rehearsal date keeps that rehearsal
    let upcoming = bandmate_storage::rehearsals::list_upcoming(pool, &band.id, "2030-06-15")
        .await
        .unwrap();
    assert_eq!(upcoming.len(), 2);
    assert_eq!(upcoming[0].id, today.id);
    assert_eq!(upcoming[1].id, future.id);
}

#[tokio::test]
async fn test_update_status() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let user = create_test_account(pool, "drums@example.com", "Drums").await;
    let band = create_test_band(pool, &user, "Tuesday Club").await;

    let rehearsal = Rehearsal::new(band.id.clone(), "2030-05-06", None, None, None);
    bandmate_storage::rehearsals::create(pool, &rehearsal).await.unwrap();

    bandmate_storage::rehearsals::update_status(pool, &rehearsal.id, RehearsalStatus::Completed)
        .await
        .unwrap();

    let fetched = bandmate_storage::rehearsals::get_by_id(pool, &rehearsal.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(fetched.status, RehearsalStatus::Completed);
}

#[tokio::test]
async fn test_update_status_unknown_rehearsal() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let result = bandmate_storage::rehearsals::update_status(
        pool,
        &RehearsalId::generate(),
        RehearsalStatus::Cancelled,
    )
    .await;

    match result.unwrap_err() {
        StorageError::NotFound { entity, .. } => assert_eq!(entity, "Rehearsal"),
        e => panic!("Expected NotFound, got: {:?}", e),
    }
}
