//! PostgreSQL repositories. Skipped unless `QUILL_TEST_DATABASE_URL` is set.

use quill_rs::config::{DatabaseBackend, DatabaseConfig};
use quill_rs::db::{Database, MigrationAction};
use quill_rs::error::RepositoryError;
use quill_rs::models::{NewStory, NewUser, Story, User};
use quill_rs::utils::time;
use uuid::Uuid;

const URL_VAR: &str = "QUILL_TEST_DATABASE_URL";

async fn database() -> Option<Database> {
    let url = std::env::var(URL_VAR).ok()?;
    let config = DatabaseConfig {
        backend: DatabaseBackend::Postgres,
        url,
        max_connections: 2,
        min_connections: 1,
        ..DatabaseConfig::default()
    };
    let db = Database::open(&config).await.expect("open postgres");
    db.migrate(MigrationAction::Run).await.expect("migrate");
    Some(db)
}

fn unique_email() -> String {
    format!("{}@example.com", Uuid::new_v4())
}

#[tokio::test]
async fn user_round_trip_and_conflict() {
    let Some(db) = database().await else {
        eprintln!("{} not set, skipping", URL_VAR);
        return;
    };
    let repos = db.repositories();

    let email = unique_email();
    let user = User::new(
        Uuid::new_v4().to_string(),
        NewUser {
            email: email.clone(),
            name: "Ada".to_string(),
        },
        time::now(),
    )
    .unwrap();
    repos.users.create(&user).await.unwrap();
    assert_eq!(repos.users.find_by_id(&user.id).await.unwrap().unwrap(), user);

    let twin = User {
        id: Uuid::new_v4().to_string(),
        ..user.clone()
    };
    assert!(matches!(
        repos.users.create(&twin).await,
        Err(RepositoryError::Conflict { .. })
    ));

    repos.users.delete(&user.id).await.unwrap();
    assert!(matches!(
        repos.users.delete(&user.id).await,
        Err(RepositoryError::NotFound { .. })
    ));
}

#[tokio::test]
async fn story_round_trip() {
    let Some(db) = database().await else {
        eprintln!("{} not set, skipping", URL_VAR);
        return;
    };
    let repos = db.repositories();

    let story = Story::new(
        Uuid::new_v4().to_string(),
        NewStory {
            title: "Omelas".to_string(),
            author: "Le Guin".to_string(),
            content: "The ones who walk away.".to_string(),
        },
        time::now(),
    )
    .unwrap();
    repos.stories.create(&story).await.unwrap();
    assert_eq!(repos.stories.find_by_id(&story.id).await.unwrap().unwrap(), story);
    repos.stories.delete(&story.id).await.unwrap();
}
