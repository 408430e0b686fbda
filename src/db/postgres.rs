use sqlx::{postgres::PgPoolOptions, PgPool};

use super::{ClosetStore, PreferenceStore};
use crate::{
    error::{AppError, AppResult},
    models::{Closet, PreferenceRecord, PreferenceUpdate},
};

/// Creates a PostgreSQL connection pool and applies pending migrations
pub async fn create_pool(database_url: &str) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;
    tracing::info!("Database migrations applied");

    Ok(pool)
}

/// Closets stored one row per item in `closet_items`
#[derive(Debug, Clone)]
pub struct PgClosetStore {
    pool: PgPool,
}

impl PgClosetStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl ClosetStore for PgClosetStore {
    async fn get(&self, user_id: &str) -> AppResult<Closet> {
        let items = sqlx::query_scalar::<_, String>(
            "SELECT item FROM closet_items WHERE user_id = $1 ORDER BY id",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    async fn set(&self, user_id: &str, items: Closet) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM closet_items WHERE user_id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            "INSERT INTO closet_items (user_id, item) \
             SELECT $1, item FROM unnest($2::text[]) WITH ORDINALITY AS t(item, ord) \
             ORDER BY ord",
        )
        .bind(user_id)
        .bind(items)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }

    async fn add_item(&self, user_id: &str, item: &str) -> AppResult<()> {
        sqlx::query("INSERT INTO closet_items (user_id, item) VALUES ($1, $2)")
            .bind(user_id)
            .bind(item)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn remove_item(&self, user_id: &str, item: &str) -> AppResult<bool> {
        let result = sqlx::query(
            "DELETE FROM closet_items WHERE id = ( \
                 SELECT id FROM closet_items WHERE user_id = $1 AND item = $2 \
                 ORDER BY id LIMIT 1 \
             )",
        )
        .bind(user_id)
        .bind(item)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[derive(Debug, sqlx::FromRow)]
struct PreferenceRow {
    favorite_colors: Vec<String>,
    skin_tone: Option<String>,
    height: Option<i32>,
    weight: Option<i32>,
    additional_notes: Option<String>,
}

impl From<PreferenceRow> for PreferenceRecord {
    fn from(row: PreferenceRow) -> Self {
        Self {
            favorite_colors: row.favorite_colors,
            skin_tone: row.skin_tone,
            height: row.height.and_then(|h| u32::try_from(h).ok()),
            weight: row.weight.and_then(|w| u32::try_from(w).ok()),
            additional_notes: row.additional_notes,
        }
    }
}

fn to_column(field: &str, value: Option<u32>) -> AppResult<Option<i32>> {
    value
        .map(i32::try_from)
        .transpose()
        .map_err(|_| AppError::InvalidInput(format!("{} is out of range", field)))
}

/// Preferences stored one row per user in `user_preferences`
#[derive(Debug, Clone)]
pub struct PgPreferenceStore {
    pool: PgPool,
}

impl PgPreferenceStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl PreferenceStore for PgPreferenceStore {
    async fn get(&self, user_id: &str) -> AppResult<PreferenceRecord> {
        let row = sqlx::query_as::<_, PreferenceRow>(
            "SELECT favorite_colors, skin_tone, height, weight, additional_notes \
             FROM user_preferences WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(PreferenceRecord::from).unwrap_or_default())
    }

    async fn set(&self, user_id: &str, update: PreferenceUpdate) -> AppResult<PreferenceRecord> {
        let height = to_column("height", update.height)?;
        let weight = to_column("weight", update.weight)?;

        // NULL parameters keep the stored column
        let row = sqlx::query_as::<_, PreferenceRow>(
            "INSERT INTO user_preferences \
                 (user_id, favorite_colors, skin_tone, height, weight, additional_notes) \
             VALUES ($1, COALESCE($2::text[], '{}'), $3::text, $4::int4, $5::int4, $6::text) \
             ON CONFLICT (user_id) DO UPDATE SET \
                 favorite_colors = COALESCE($2::text[], user_preferences.favorite_colors), \
                 skin_tone = COALESCE($3::text, user_preferences.skin_tone), \
                 height = COALESCE($4::int4, user_preferences.height), \
                 weight = COALESCE($5::int4, user_preferences.weight), \
                 additional_notes = COALESCE($6::text, user_preferences.additional_notes), \
                 updated_at = now() \
             RETURNING favorite_colors, skin_tone, height, weight, additional_notes",
        )
        .bind(user_id)
        .bind(update.favorite_colors)
        .bind(update.skin_tone)
        .bind(height)
        .bind(weight)
        .bind(update.additional_notes)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }
}
