use crate::http_error::AppError;
use crate::plugins::stories::models::{StoryGuessDto, StoryRecord, StoryStatsDto};
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

const STORY_COLUMNS: &str = "s.id, s.user_id, s.album_id, u.username, s.image_url, \
     s.country_code, s.privacy_snapshot, s.expires_at, s.created_at";

/// Persists a new story with its frozen album snapshot. The caller resolves
/// the snapshot fields; nothing here re-reads the album. `expires_at` is
/// derived from the same statement clock as `created_at`, so the window is
/// exactly `ttl_hours` long.
pub async fn insert_story(
    pool: &PgPool,
    user_id: Uuid,
    album_id: Uuid,
    image_url: &str,
    country_code: &str,
    privacy_snapshot: &str,
    ttl_hours: i32,
) -> Result<StoryRecord, AppError> {
    let sql = "WITH inserted AS ( \
            INSERT INTO stories (user_id, album_id, image_url, country_code, privacy_snapshot, expires_at) \
            VALUES ($1, $2, $3, $4, $5, now() + make_interval(hours => $6)) \
            RETURNING id, user_id, album_id, image_url, country_code, privacy_snapshot, expires_at, created_at \
        ) \
        SELECT i.id, i.user_id, i.album_id, u.username, i.image_url, \
               i.country_code, i.privacy_snapshot, i.expires_at, i.created_at \
        FROM inserted i JOIN users u ON u.id = i.user_id";
    let record = sqlx::query_as::<_, StoryRecord>(sql)
        .bind(user_id)
        .bind(album_id)
        .bind(image_url)
        .bind(country_code)
        .bind(privacy_snapshot)
        .bind(ttl_hours)
        .fetch_one(pool)
        .await
        .map_err(AppError::from)?;
    Ok(record)
}

pub async fn get_story(pool: &PgPool, id: Uuid) -> Result<Option<StoryRecord>, AppError> {
    let sql = format!(
        "SELECT {} FROM stories s JOIN users u ON u.id = s.user_id WHERE s.id = $1",
        STORY_COLUMNS
    );
    let record = sqlx::query_as::<_, StoryRecord>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(AppError::from)?;
    Ok(record)
}

/// Guesses are removed by the `ON DELETE CASCADE` on `story_guesses`.
pub async fn delete_story(pool: &PgPool, id: Uuid) -> Result<(), AppError> {
    sqlx::query("DELETE FROM stories WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await
        .map_err(AppError::from)?;
    Ok(())
}

pub async fn album_has_active_story(pool: &PgPool, album_id: Uuid) -> Result<bool, AppError> {
    let exists: bool = sqlx::query_scalar(
        "SELECT EXISTS (SELECT 1 FROM stories WHERE album_id = $1 AND expires_at > now())",
    )
    .bind(album_id)
    .fetch_one(pool)
    .await
    .map_err(AppError::from)?;
    Ok(exists)
}

/// Idempotent guess write, keyed on (story_id, user_id). A repeat submission
/// from the same user overwrites the stored code instead of duplicating the
/// row, so concurrent double-submits converge on the last applied value.
pub async fn upsert_guess(
    pool: &PgPool,
    story_id: Uuid,
    user_id: Uuid,
    guess_code: &str,
) -> Result<StoryGuessDto, AppError> {
    let sql = "INSERT INTO story_guesses (story_id, user_id, guess_code) \
        VALUES ($1, $2, $3) \
        ON CONFLICT (story_id, user_id) \
        DO UPDATE SET guess_code = EXCLUDED.guess_code, updated_at = now() \
        RETURNING story_id, user_id, guess_code, created_at, updated_at";
    let dto = sqlx::query_as::<_, StoryGuessDto>(sql)
        .bind(story_id)
        .bind(user_id)
        .bind(guess_code)
        .fetch_one(pool)
        .await
        .map_err(AppError::from)?;
    Ok(dto)
}

pub async fn get_guess(
    pool: &PgPool,
    story_id: Uuid,
    user_id: Uuid,
) -> Result<Option<StoryGuessDto>, AppError> {
    let dto = sqlx::query_as::<_, StoryGuessDto>(
        "SELECT story_id, user_id, guess_code, created_at, updated_at \
         FROM story_guesses WHERE story_id = $1 AND user_id = $2",
    )
    .bind(story_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await
    .map_err(AppError::from)?;
    Ok(dto)
}

/// Newest-first page of active stories, peeking one row past `limit` so the
/// caller can detect another page without a count query.
pub async fn list_feed(
    pool: &PgPool,
    viewer_id: Uuid,
    include_own: bool,
    cursor: Option<DateTime<Utc>>,
    fetch_limit: i64,
) -> Result<Vec<StoryRecord>, AppError> {
    let sql = format!(
        "SELECT {} FROM stories s JOIN users u ON u.id = s.user_id \
         WHERE s.expires_at > now() \
           AND ($2 OR s.user_id <> $1) \
           AND ($3::timestamptz IS NULL OR s.created_at < $3) \
         ORDER BY s.created_at DESC LIMIT $4",
        STORY_COLUMNS
    );
    let items = sqlx::query_as::<_, StoryRecord>(&sql)
        .bind(viewer_id)
        .bind(include_own)
        .bind(cursor)
        .bind(fetch_limit)
        .fetch_all(pool)
        .await
        .map_err(AppError::from)?;
    Ok(items)
}

pub async fn list_user_stories(
    pool: &PgPool,
    target_user_id: Uuid,
    cursor: Option<DateTime<Utc>>,
    fetch_limit: i64,
) -> Result<Vec<StoryRecord>, AppError> {
    let sql = format!(
        "SELECT {} FROM stories s JOIN users u ON u.id = s.user_id \
         WHERE s.user_id = $1 \
           AND s.expires_at > now() \
           AND ($2::timestamptz IS NULL OR s.created_at < $2) \
         ORDER BY s.created_at DESC LIMIT $3",
        STORY_COLUMNS
    );
    let items = sqlx::query_as::<_, StoryRecord>(&sql)
        .bind(target_user_id)
        .bind(cursor)
        .bind(fetch_limit)
        .fetch_all(pool)
        .await
        .map_err(AppError::from)?;
    Ok(items)
}

/// Read-only fetch of the derived aggregate. A story with no guesses has no
/// row in the view; that reads as zero stats.
pub async fn fetch_stats(pool: &PgPool, story_id: Uuid) -> Result<StoryStatsDto, AppError> {
    let stats = sqlx::query_as::<_, StoryStatsDto>(
        "SELECT story_id, guess_count, correct_count, accuracy \
         FROM story_stats WHERE story_id = $1",
    )
    .bind(story_id)
    .fetch_optional(pool)
    .await
    .map_err(AppError::from)?;
    Ok(stats.unwrap_or_else(|| StoryStatsDto::empty(story_id)))
}
