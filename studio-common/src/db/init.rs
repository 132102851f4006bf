//! Database initialization
//!
//! Creates the database on first run, applies the schema idempotently and
//! seeds default settings. Safe to call on every startup.

use crate::db::models::Settings;
use crate::db::settings::{
    KEY_AFFILIATE_DISCLAIMER, KEY_CTA, KEY_DEFAULT_PREFIX, KEY_DEFAULT_SUFFIX,
    KEY_FIXED_HASHTAGS, KEY_LANGUAGE, KEY_MAX_HASHTAGS,
};
use crate::Result;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use std::path::Path;
use tracing::info;

/// Open (or create) the database file and bring the schema up to date
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&db_url)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    sqlx::query("PRAGMA foreign_keys = ON").execute(&pool).await?;
    sqlx::query("PRAGMA journal_mode = WAL").execute(&pool).await?;
    sqlx::query("PRAGMA busy_timeout = 5000").execute(&pool).await?;

    init_schema(&pool).await?;

    Ok(pool)
}

/// In-memory database with the full schema, for tests and dry runs.
///
/// Limited to one connection that is never recycled: every `:memory:`
/// connection is its own database.
pub async fn init_memory_database() -> Result<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await?;
    init_schema(&pool).await?;
    Ok(pool)
}

/// Create tables and default settings (idempotent)
pub async fn init_schema(pool: &SqlitePool) -> Result<()> {
    create_settings_table(pool).await?;
    create_products_table(pool).await?;
    create_videos_table(pool).await?;
    init_default_settings(pool).await?;
    Ok(())
}

async fn create_settings_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS settings (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;
    Ok(())
}

async fn create_products_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS products (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            category TEXT NOT NULL DEFAULT '',
            price TEXT NOT NULL DEFAULT '',
            affiliate_link TEXT NOT NULL DEFAULT '',
            image_urls TEXT NOT NULL DEFAULT '',
            notes TEXT NOT NULL DEFAULT '',
            caption TEXT NOT NULL DEFAULT '',
            hashtags TEXT NOT NULL DEFAULT '',
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_products_updated ON products(updated_at)")
        .execute(pool)
        .await?;
    Ok(())
}

async fn create_videos_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS videos (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL DEFAULT '',
            shopee_url TEXT NOT NULL,
            target_views INTEGER NOT NULL DEFAULT 1 CHECK (target_views >= 1),
            current_views INTEGER NOT NULL DEFAULT 0 CHECK (current_views >= 0),
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;
    Ok(())
}

/// Seed default settings without touching values the user already saved
async fn init_default_settings(pool: &SqlitePool) -> Result<()> {
    let defaults = Settings::default();

    ensure_setting(pool, KEY_FIXED_HASHTAGS, &defaults.fixed_hashtags).await?;
    ensure_setting(pool, KEY_MAX_HASHTAGS, &defaults.max_hashtags.to_string()).await?;
    ensure_setting(pool, KEY_CTA, &defaults.cta).await?;
    ensure_setting(pool, KEY_AFFILIATE_DISCLAIMER, &defaults.affiliate_disclaimer).await?;
    ensure_setting(pool, KEY_LANGUAGE, &defaults.language).await?;
    ensure_setting(pool, KEY_DEFAULT_PREFIX, &defaults.default_prefix).await?;
    ensure_setting(pool, KEY_DEFAULT_SUFFIX, &defaults.default_suffix).await?;

    Ok(())
}

/// Insert a setting only if the key is absent
async fn ensure_setting(pool: &SqlitePool, key: &str, default_value: &str) -> Result<()> {
    sqlx::query("INSERT OR IGNORE INTO settings (key, value) VALUES (?, ?)")
        .bind(key)
        .bind(default_value)
        .execute(pool)
        .await?;
    Ok(())
}
