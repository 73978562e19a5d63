use crate::models::DbSetting;
use chrono::Utc;
use eyre::Result;
use sqlx::{Pool, Postgres};

pub async fn get_setting(pool: &Pool<Postgres>, key: &str) -> Result<Option<DbSetting>> {
    let setting = sqlx::query_as::<_, DbSetting>(
        r#"
        SELECT key, value, updated_at
        FROM settings
        WHERE key = $1
        "#,
    )
    .bind(key)
    .fetch_optional(pool)
    .await?;

    Ok(setting)
}

const UPSERT_SETTING: &str = r#"
    INSERT INTO settings (key, value, updated_at)
    VALUES ($1, $2, $3)
    ON CONFLICT (key) DO UPDATE SET value = EXCLUDED.value, updated_at = EXCLUDED.updated_at
    RETURNING key, value, updated_at
"#;

/// Stores several settings atomically: either every row is written or none is.
pub async fn upsert_settings(pool: &Pool<Postgres>, entries: &[(&str, &str)]) -> Result<Vec<DbSetting>> {
    let mut tx = pool.begin().await?;
    let now = Utc::now();
    let mut stored = Vec::with_capacity(entries.len());

    for (key, value) in entries {
        tracing::debug!("Storing setting {}={}", key, value);

        let setting = sqlx::query_as::<_, DbSetting>(UPSERT_SETTING)
            .bind(*key)
            .bind(*value)
            .bind(now)
            .fetch_one(&mut *tx)
            .await?;
        stored.push(setting);
    }

    tx.commit().await?;
    Ok(stored)
}
