//! Settings database operations
//!
//! Key-value storage behind the single [`Settings`] record.

use crate::db::models::Settings;
use crate::{Error, Result};
use sqlx::SqlitePool;
use std::collections::HashMap;

pub const KEY_FIXED_HASHTAGS: &str = "fixed_hashtags";
pub const KEY_MAX_HASHTAGS: &str = "max_hashtags";
pub const KEY_CTA: &str = "cta";
pub const KEY_AFFILIATE_DISCLAIMER: &str = "affiliate_disclaimer";
pub const KEY_LANGUAGE: &str = "language";
pub const KEY_DEFAULT_PREFIX: &str = "default_prefix";
pub const KEY_DEFAULT_SUFFIX: &str = "default_suffix";

/// Load settings, falling back to defaults for absent keys
pub async fn load_settings(db: &SqlitePool) -> Result<Settings> {
    let rows: Vec<(String, String)> = sqlx::query_as("SELECT key, value FROM settings")
        .fetch_all(db)
        .await?;
    let mut values: HashMap<String, String> = rows.into_iter().collect();

    let defaults = Settings::default();
    let mut take = |key: &str, fallback: String| values.remove(key).unwrap_or(fallback);

    let max_hashtags = take(KEY_MAX_HASHTAGS, defaults.max_hashtags.to_string())
        .parse::<i64>()
        .map_err(|e| Error::Config(format!("Parse setting {} failed: {}", KEY_MAX_HASHTAGS, e)))?;

    Ok(Settings {
        fixed_hashtags: take(KEY_FIXED_HASHTAGS, defaults.fixed_hashtags),
        max_hashtags,
        cta: take(KEY_CTA, defaults.cta),
        affiliate_disclaimer: take(KEY_AFFILIATE_DISCLAIMER, defaults.affiliate_disclaimer),
        language: take(KEY_LANGUAGE, defaults.language),
        default_prefix: take(KEY_DEFAULT_PREFIX, defaults.default_prefix),
        default_suffix: take(KEY_DEFAULT_SUFFIX, defaults.default_suffix),
    })
}

/// Persist every field in one transaction
pub async fn save_settings(db: &SqlitePool, settings: &Settings) -> Result<()> {
    if settings.max_hashtags < 0 {
        return Err(Error::InvalidInput(
            "max_hashtags must be zero or positive".to_string(),
        ));
    }

    let max_hashtags = settings.max_hashtags.to_string();
    let pairs = [
        (KEY_FIXED_HASHTAGS, settings.fixed_hashtags.as_str()),
        (KEY_MAX_HASHTAGS, max_hashtags.as_str()),
        (KEY_CTA, settings.cta.as_str()),
        (KEY_AFFILIATE_DISCLAIMER, settings.affiliate_disclaimer.as_str()),
        (KEY_LANGUAGE, settings.language.as_str()),
        (KEY_DEFAULT_PREFIX, settings.default_prefix.as_str()),
        (KEY_DEFAULT_SUFFIX, settings.default_suffix.as_str()),
    ];

    let mut tx = db.begin().await?;
    for (key, value) in pairs {
        sqlx::query(
            "INSERT INTO settings (key, value) VALUES (?, ?)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        )
        .bind(key)
        .bind(value)
        .execute(&mut *tx)
        .await?;
    }
    tx.commit().await?;

    tracing::debug!("Settings saved");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init::init_memory_database;

    #[tokio::test]
    async fn test_defaults_seeded() {
        let db = init_memory_database().await.unwrap();
        let settings = load_settings(&db).await.unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[tokio::test]
    async fn test_save_and_reload() {
        let db = init_memory_database().await.unwrap();
        let mut settings = load_settings(&db).await.unwrap();
        settings.cta = "Link na bio".to_string();
        settings.max_hashtags = 5;
        settings.default_suffix = "Fim".to_string();
        save_settings(&db, &settings).await.unwrap();

        let reloaded = load_settings(&db).await.unwrap();
        assert_eq!(reloaded, settings);
    }

    #[tokio::test]
    async fn test_missing_key_falls_back_to_default() {
        let db = init_memory_database().await.unwrap();
        sqlx::query("DELETE FROM settings WHERE key = ?")
            .bind(KEY_CTA)
            .execute(&db)
            .await
            .unwrap();

        let settings = load_settings(&db).await.unwrap();
        assert_eq!(settings.cta, Settings::default().cta);
    }

    #[tokio::test]
    async fn test_negative_max_rejected() {
        let db = init_memory_database().await.unwrap();
        let settings = Settings {
            max_hashtags: -1,
            ..Default::default()
        };
        assert!(matches!(
            save_settings(&db, &settings).await,
            Err(Error::InvalidInput(_))
        ));
    }
}
