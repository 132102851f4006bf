//! Tests for database initialization on first run and reopen

use studio_common::db::{init_database, products, settings, videos, ProductInput, Settings};
use tempfile::TempDir;

#[tokio::test]
async fn test_database_creation_when_missing() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("studio.db");
    assert!(!db_path.exists());

    let result = init_database(&db_path).await;
    assert!(result.is_ok(), "Database initialization failed: {:?}", result.err());
    assert!(db_path.exists(), "Database file was not created");
}

#[tokio::test]
async fn test_default_settings_initialized() {
    let dir = TempDir::new().unwrap();
    let pool = init_database(&dir.path().join("studio.db")).await.unwrap();

    let loaded = settings::load_settings(&pool).await.unwrap();
    assert_eq!(loaded, Settings::default());
    assert_eq!(loaded.max_hashtags, 18);
    assert_eq!(loaded.language, "pt-br");
}

#[tokio::test]
async fn test_reopen_keeps_data_and_edited_settings() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("studio.db");

    {
        let pool = init_database(&db_path).await.unwrap();
        let mut edited = Settings::default();
        edited.cta = "Corre que acaba".to_string();
        edited.max_hashtags = 5;
        settings::save_settings(&pool, &edited).await.unwrap();

        let input = ProductInput {
            title: "Garrafa térmica".to_string(),
            ..Default::default()
        };
        products::create_product(&pool, &input).await.unwrap();
        videos::create_video(&pool, "Review", "https://shopee.com.br/v/1", 3)
            .await
            .unwrap();
        pool.close().await;
    }

    // Second open must not reseed over edited values
    let pool = init_database(&db_path).await.unwrap();
    let loaded = settings::load_settings(&pool).await.unwrap();
    assert_eq!(loaded.cta, "Corre que acaba");
    assert_eq!(loaded.max_hashtags, 5);
    assert_eq!(products::count_products(&pool, None).await.unwrap(), 1);
    assert_eq!(videos::count_videos(&pool).await.unwrap(), 1);
}

#[tokio::test]
async fn test_video_constraints_enforced_by_schema() {
    let dir = TempDir::new().unwrap();
    let pool = init_database(&dir.path().join("studio.db")).await.unwrap();

    let result = sqlx::query(
        "INSERT INTO videos (title, shopee_url, target_views, current_views, created_at, updated_at) \
         VALUES ('x', 'https://v', 0, 0, '', '')",
    )
    .execute(&pool)
    .await;
    assert!(result.is_err(), "target_views below 1 should be rejected");
}
