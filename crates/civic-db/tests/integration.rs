//! Integration tests for civic-db
//!
//! Tests database operations with real SQLite in-memory database

use chrono::{Duration, Utc};
use civic_db::{
    connect,
    entities::{
        alert,
        complaint::{self, ComplaintCategory, ComplaintStatus},
        user::{self, UserRole},
        voter,
    },
    lifecycle::{NewComplaint, StatusUpdate},
    migrate,
    voter_roll::{self, SeedError, VOTER_ROLL},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, Condition, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

/// Helper to create a test database
async fn setup_test_db() -> sea_orm::DatabaseConnection {
    let db = connect("sqlite::memory:")
        .await
        .expect("Failed to connect to in-memory database");

    migrate(&db).await.expect("Failed to run migrations");

    db
}

fn new_user(google_id: &str, email: &str) -> user::ActiveModel {
    user::ActiveModel {
        id: Set(Uuid::new_v4()),
        google_id: Set(google_id.to_string()),
        email: Set(email.to_string()),
        name: Set(Some("Test Citizen".to_string())),
        mobile: Set(None),
        address: Set(None),
        ward_number: Set(None),
        photo: Set(None),
        aadhar_photo: Set(None),
        epic_number: Set(None),
        language: Set(None),
        district: Set(None),
        municipality: Set(None),
        role: Set(UserRole::Citizen),
        is_verified: Set(false),
        is_profile_complete: Set(false),
        created_at: Set(Utc::now()),
    }
}

fn submission(ward: i32) -> NewComplaint {
    NewComplaint {
        category: ComplaintCategory::Drainage,
        description: "Blocked drain".to_string(),
        image_urls: vec!["https://img/drain.jpg".to_string()],
        voice_note_url: Some("https://audio/note.webm".to_string()),
        address: "22, Hospital Road, Halisahar".to_string(),
        latitude: 22.95,
        longitude: 88.41,
        ward_number: ward,
    }
}

#[tokio::test]
async fn test_database_connection() {
    let db = connect("sqlite::memory:").await.expect("Failed to connect");

    let backend = db.get_database_backend();
    assert!(matches!(backend, sea_orm::DatabaseBackend::Sqlite));
}

#[tokio::test]
async fn test_migrations_run_successfully() {
    let db = connect("sqlite::memory:").await.expect("Failed to connect");

    let result = migrate(&db).await;
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_google_id_is_unique() {
    let db = setup_test_db().await;

    new_user("google-1", "first@example.com")
        .insert(&db)
        .await
        .expect("Failed to insert");

    let duplicate = new_user("google-1", "second@example.com").insert(&db).await;
    assert!(duplicate.is_err());

    let count = user::Entity::find().count(&db).await.unwrap();
    assert_eq!(count, 1);
}

#[tokio::test]
async fn test_email_is_unique() {
    let db = setup_test_db().await;

    new_user("google-1", "same@example.com")
        .insert(&db)
        .await
        .expect("Failed to insert");

    let duplicate = new_user("google-2", "same@example.com").insert(&db).await;
    assert!(duplicate.is_err());
}

#[tokio::test]
async fn test_seed_then_lookup_voter() {
    let db = setup_test_db().await;

    let inserted = voter_roll::seed(&db).await.expect("Failed to seed");
    assert_eq!(inserted, VOTER_ROLL.len());

    let found = voter_roll::find_by_epic(&db, "WBJ1234567890")
        .await
        .unwrap()
        .expect("Voter not found");
    assert_eq!(found.name.as_deref(), Some("Rajesh Kumar Singh"));
    assert_eq!(found.ward_number, Some(5));
    assert_eq!(found.district.as_deref(), Some("North 24 Parganas"));

    let missing = voter_roll::find_by_epic(&db, "UNKNOWN123").await.unwrap();
    assert!(missing.is_none());
}

#[tokio::test]
async fn test_seed_twice_conflicts_until_cleared() {
    let db = setup_test_db().await;

    voter_roll::seed(&db).await.expect("First seed failed");

    let second = voter_roll::seed(&db).await;
    match second {
        Err(SeedError::AlreadySeeded(count)) => assert_eq!(count, VOTER_ROLL.len() as u64),
        other => panic!("Expected AlreadySeeded, got {:?}", other),
    }

    let cleared = voter_roll::clear(&db).await.unwrap();
    assert_eq!(cleared, VOTER_ROLL.len() as u64);

    let reseeded = voter_roll::seed(&db).await.expect("Reseed failed");
    assert_eq!(reseeded, VOTER_ROLL.len());
    assert_eq!(
        voter::Entity::find().count(&db).await.unwrap(),
        VOTER_ROLL.len() as u64
    );
}

#[tokio::test]
async fn test_duplicate_epic_insert_is_recognised() {
    let db = setup_test_db().await;

    VOTER_ROLL[0].to_active_model().insert(&db).await.unwrap();
    let err = VOTER_ROLL[0]
        .to_active_model()
        .insert(&db)
        .await
        .expect_err("duplicate EPIC accepted");

    assert!(voter_roll::is_duplicate_epic(&err));
}

#[tokio::test]
async fn test_concurrent_seeds_insert_roll_once() {
    let db = setup_test_db().await;

    let (first, second) = tokio::join!(voter_roll::seed(&db), voter_roll::seed(&db));
    let outcomes = [first, second];

    let seeded = outcomes.iter().filter(|r| r.is_ok()).count();
    let conflicts = outcomes
        .iter()
        .filter(|r| matches!(r, Err(SeedError::AlreadySeeded(_))))
        .count();
    assert_eq!((seeded, conflicts), (1, 1));
    assert_eq!(
        voter::Entity::find().count(&db).await.unwrap(),
        VOTER_ROLL.len() as u64
    );
}

#[tokio::test]
async fn test_complaint_create_and_solve() {
    let db = setup_test_db().await;
    let owner = new_user("google-1", "c@example.com").insert(&db).await.unwrap();

    let created_at = Utc::now();
    let created = submission(4)
        .into_active_model(owner.id, created_at)
        .unwrap()
        .insert(&db)
        .await
        .expect("Failed to insert complaint");

    assert_eq!(created.status, ComplaintStatus::Pending);
    assert_eq!(created.images(), vec!["https://img/drain.jpg".to_string()]);
    assert!(created.resolved_at.is_none());

    let solved = StatusUpdate {
        status: ComplaintStatus::Solved,
        solution_image_url: Some("https://x/y.jpg".to_string()),
        resolution_note: Some("fixed".to_string()),
    }
    .apply(created, Utc::now())
    .unwrap()
    .update(&db)
    .await
    .expect("Failed to update");

    assert_eq!(solved.status, ComplaintStatus::Solved);
    let resolved_at = solved.resolved_at.expect("resolved_at not set");
    assert!(resolved_at >= created_at);

    let reopened = StatusUpdate {
        status: ComplaintStatus::Pending,
        solution_image_url: None,
        resolution_note: None,
    }
    .apply(solved, Utc::now())
    .unwrap()
    .update(&db)
    .await
    .unwrap();

    assert_eq!(reopened.status, ComplaintStatus::Pending);
    assert!(reopened.resolved_at.is_none());
}

#[tokio::test]
async fn test_complaints_listed_newest_first() {
    let db = setup_test_db().await;
    let owner = new_user("google-1", "c@example.com").insert(&db).await.unwrap();

    let base = Utc::now();
    for (i, ward) in [3, 5, 7].into_iter().enumerate() {
        submission(ward)
            .into_active_model(owner.id, base + Duration::seconds(i as i64))
            .unwrap()
            .insert(&db)
            .await
            .unwrap();
    }

    let listed = complaint::Entity::find()
        .filter(complaint::Column::UserId.eq(owner.id))
        .order_by_desc(complaint::Column::CreatedAt)
        .all(&db)
        .await
        .unwrap();

    let wards: Vec<i32> = listed.iter().map(|c| c.ward_number).collect();
    assert_eq!(wards, vec![7, 5, 3]);
}

#[tokio::test]
async fn test_deleting_user_cascades_to_complaints() {
    let db = setup_test_db().await;
    let owner = new_user("google-1", "c@example.com").insert(&db).await.unwrap();

    submission(2)
        .into_active_model(owner.id, Utc::now())
        .unwrap()
        .insert(&db)
        .await
        .unwrap();

    user::Entity::delete_by_id(owner.id).exec(&db).await.unwrap();

    assert_eq!(complaint::Entity::find().count(&db).await.unwrap(), 0);
}

#[tokio::test]
async fn test_alerts_for_ward_include_broadcasts() {
    let db = setup_test_db().await;
    let base = Utc::now();

    for (i, ward) in ["5", "all", "7", "5"].into_iter().enumerate() {
        alert::ActiveModel {
            id: Set(Uuid::new_v4()),
            title: Set(format!("Alert {}", i)),
            message: Set("Water supply interruption".to_string()),
            ward: Set(ward.to_string()),
            date: Set("2025-02-01".to_string()),
            time: Set("10:00".to_string()),
            created_at: Set(base + Duration::seconds(i as i64)),
        }
        .insert(&db)
        .await
        .unwrap();
    }

    let for_ward_5 = alert::Entity::find()
        .filter(
            Condition::any()
                .add(alert::Column::Ward.eq("5"))
                .add(alert::Column::Ward.eq(alert::ALL_WARDS)),
        )
        .order_by_desc(alert::Column::CreatedAt)
        .all(&db)
        .await
        .unwrap();

    let titles: Vec<&str> = for_ward_5.iter().map(|a| a.title.as_str()).collect();
    assert_eq!(titles, vec!["Alert 3", "Alert 1", "Alert 0"]);
}
