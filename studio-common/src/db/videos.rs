//! Video view-tracking database operations

use crate::db::models::Video;
use crate::time::{now_db_timestamp, parse_db_timestamp};
use crate::{Error, Result};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

fn video_from_row(row: &SqliteRow) -> Result<Video> {
    let created_at: String = row.get("created_at");
    let updated_at: String = row.get("updated_at");

    Ok(Video {
        id: row.get("id"),
        title: row.get("title"),
        shopee_url: row.get("shopee_url"),
        target_views: row.get("target_views"),
        current_views: row.get("current_views"),
        created_at: parse_db_timestamp(&created_at)?,
        updated_at: parse_db_timestamp(&updated_at)?,
    })
}

fn not_found(id: i64) -> Error {
    Error::NotFound(format!("video {}", id))
}

/// Add a video. The URL is required; targets below 1 are raised to 1.
pub async fn create_video(
    db: &SqlitePool,
    title: &str,
    shopee_url: &str,
    target_views: i64,
) -> Result<i64> {
    let shopee_url = shopee_url.trim();
    if shopee_url.is_empty() {
        return Err(Error::InvalidInput("video URL is required".to_string()));
    }
    let target_views = target_views.max(1);
    let now = now_db_timestamp();

    let result = sqlx::query(
        r#"
        INSERT INTO videos (title, shopee_url, target_views, current_views, created_at, updated_at)
        VALUES (?, ?, ?, 0, ?, ?)
        "#,
    )
    .bind(title.trim())
    .bind(shopee_url)
    .bind(target_views)
    .bind(&now)
    .bind(&now)
    .execute(db)
    .await?;

    Ok(result.last_insert_rowid())
}

pub async fn get_video(db: &SqlitePool, id: i64) -> Result<Video> {
    let row = sqlx::query(
        "SELECT id, title, shopee_url, target_views, current_views, created_at, updated_at
         FROM videos WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(db)
    .await?
    .ok_or_else(|| not_found(id))?;
    video_from_row(&row)
}

/// All videos, most recently touched first
pub async fn list_videos(db: &SqlitePool) -> Result<Vec<Video>> {
    let rows = sqlx::query(
        "SELECT id, title, shopee_url, target_views, current_views, created_at, updated_at
         FROM videos ORDER BY updated_at DESC, id DESC",
    )
    .fetch_all(db)
    .await?;
    rows.iter().map(video_from_row).collect()
}

pub async fn count_videos(db: &SqlitePool) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM videos")
        .fetch_one(db)
        .await?;
    Ok(count)
}

/// Record one manual view; returns the new count
pub async fn increment_views(db: &SqlitePool, id: i64) -> Result<i64> {
    let views: Option<i64> = sqlx::query_scalar(
        "UPDATE videos SET current_views = current_views + 1, updated_at = ?
         WHERE id = ? RETURNING current_views",
    )
    .bind(now_db_timestamp())
    .bind(id)
    .fetch_optional(db)
    .await?;
    views.ok_or_else(|| not_found(id))
}

pub async fn reset_views(db: &SqlitePool, id: i64) -> Result<()> {
    let result = sqlx::query("UPDATE videos SET current_views = 0, updated_at = ? WHERE id = ?")
        .bind(now_db_timestamp())
        .bind(id)
        .execute(db)
        .await?;
    if result.rows_affected() == 0 {
        return Err(not_found(id));
    }
    Ok(())
}

pub async fn delete_video(db: &SqlitePool, id: i64) -> Result<()> {
    let result = sqlx::query("DELETE FROM videos WHERE id = ?")
        .bind(id)
        .execute(db)
        .await?;
    if result.rows_affected() == 0 {
        return Err(not_found(id));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init::init_memory_database;

    #[tokio::test]
    async fn test_create_clamps_target() {
        let db = init_memory_database().await.unwrap();
        let id = create_video(&db, " Review ", " https://shopee.com.br/v/1 ", 0)
            .await
            .unwrap();
        let video = get_video(&db, id).await.unwrap();
        assert_eq!(video.title, "Review");
        assert_eq!(video.shopee_url, "https://shopee.com.br/v/1");
        assert_eq!(video.target_views, 1);
        assert_eq!(video.current_views, 0);
    }

    #[tokio::test]
    async fn test_url_required() {
        let db = init_memory_database().await.unwrap();
        assert!(matches!(
            create_video(&db, "t", "   ", 3).await,
            Err(Error::InvalidInput(_))
        ));
        assert_eq!(count_videos(&db).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_increment_reset_and_progress() {
        let db = init_memory_database().await.unwrap();
        let id = create_video(&db, "", "https://v", 2).await.unwrap();

        assert_eq!(increment_views(&db, id).await.unwrap(), 1);
        assert!(!get_video(&db, id).await.unwrap().target_reached());
        assert_eq!(increment_views(&db, id).await.unwrap(), 2);
        assert!(get_video(&db, id).await.unwrap().target_reached());

        reset_views(&db, id).await.unwrap();
        assert_eq!(get_video(&db, id).await.unwrap().current_views, 0);
    }

    #[tokio::test]
    async fn test_unknown_video() {
        let db = init_memory_database().await.unwrap();
        assert!(matches!(increment_views(&db, 7).await, Err(Error::NotFound(_))));
        assert!(matches!(reset_views(&db, 7).await, Err(Error::NotFound(_))));
        assert!(matches!(delete_video(&db, 7).await, Err(Error::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_and_list() {
        let db = init_memory_database().await.unwrap();
        let a = create_video(&db, "a", "https://a", 1).await.unwrap();
        let b = create_video(&db, "b", "https://b", 1).await.unwrap();
        delete_video(&db, a).await.unwrap();
        let ids: Vec<i64> = list_videos(&db).await.unwrap().iter().map(|v| v.id).collect();
        assert_eq!(ids, vec![b]);
    }
}
