use crate::http_error::AppError;
use crate::plugins::albums::repo as albums_repo;
use crate::plugins::auth::AuthUser;
use crate::plugins::stories::countries;
use crate::plugins::stories::models::{
    FeedQuery, FeedResponse, GuessCreate, StoryCreate, StoryFeedItem, StoryGuessDto, StoryPayload,
    StoryRecord, StoryStatsDto, StoryWithStats, UserStoriesQuery,
};
use crate::plugins::stories::policy;
use crate::plugins::stories::repo;
use axum::extract::{Path, Query};
use axum::http::StatusCode;
use axum::{Extension, Json};
use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::PgPool;
use uuid::Uuid;

/// Fixed story lifetime. Set once at creation, never extended.
const STORY_TTL_HOURS: i32 = 24;
const DEFAULT_PAGE_LIMIT: u32 = 20;
const MAX_PAGE_LIMIT: u32 = 100;

fn parse_cursor(raw: Option<&str>) -> Result<Option<DateTime<Utc>>, AppError> {
    match raw {
        None => Ok(None),
        Some(s) => DateTime::parse_from_rfc3339(s)
            .map(|dt| Some(dt.with_timezone(&Utc)))
            .map_err(|_| {
                AppError::new(StatusCode::BAD_REQUEST, "invalid cursor")
                    .with_code("invalid_cursor")
            }),
    }
}

fn page_limit(requested: Option<u32>) -> i64 {
    requested.unwrap_or(DEFAULT_PAGE_LIMIT).clamp(1, MAX_PAGE_LIMIT) as i64
}

/// Peek-ahead pagination: the repo fetched `limit + 1` rows. If the extra row
/// came back there is another page, and the cursor is the `created_at` of the
/// last row actually returned.
fn paginate(mut items: Vec<StoryRecord>, limit: usize) -> (Vec<StoryRecord>, Option<String>, bool) {
    let has_more = items.len() > limit;
    if has_more {
        items.truncate(limit);
    }
    let cursor = if has_more {
        items
            .last()
            .map(|r| r.created_at.to_rfc3339_opts(SecondsFormat::Micros, true))
    } else {
        None
    };
    (items, cursor, has_more)
}

pub async fn create_story(
    Extension(pool): Extension<PgPool>,
    auth: AuthUser,
    Json(payload): Json<StoryCreate>,
) -> Result<Json<StoryPayload>, AppError> {
    let album = albums_repo::get_album(&pool, payload.album_id)
        .await?
        .ok_or_else(|| AppError::not_found("albumNotFound"))?;

    if album.user_id != auth.user_id {
        return Err(AppError::forbidden("not authorized to create story from this album"));
    }

    let country_code = album.country_code.clone().ok_or_else(|| {
        AppError::new(
            StatusCode::UNPROCESSABLE_ENTITY,
            "album must have a country selected to create a story",
        )
        .with_code("missing_country")
    })?;

    let image_url = payload
        .image_url
        .or_else(|| album.cover_image_url.clone())
        .ok_or_else(|| {
            AppError::new(
                StatusCode::UNPROCESSABLE_ENTITY,
                "album must have a cover image to create a story",
            )
            .with_code("missing_image")
        })?;

    if repo::album_has_active_story(&pool, album.id).await? {
        return Err(AppError::new(
            StatusCode::UNPROCESSABLE_ENTITY,
            "album already has an active story",
        )
        .with_code("active_story_exists"));
    }

    // privacy and country are frozen here; later album edits must not bleed
    // into the story
    let record = repo::insert_story(
        &pool,
        auth.user_id,
        album.id,
        &image_url,
        &country_code,
        &album.privacy,
        STORY_TTL_HOURS,
    )
    .await?;

    Ok(Json(StoryPayload::from_record(record, true)))
}

pub async fn delete_story(
    Extension(pool): Extension<PgPool>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let story = repo::get_story(&pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("storyNotFound"))?;
    if story.user_id != auth.user_id {
        return Err(AppError::forbidden("not authorized to delete this story"));
    }
    repo::delete_story(&pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn submit_guess(
    Extension(pool): Extension<PgPool>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<GuessCreate>,
) -> Result<Json<StoryGuessDto>, AppError> {
    let guess_code = countries::normalize(&payload.guess_code).ok_or_else(|| {
        AppError::new(StatusCode::BAD_REQUEST, "invalid country code")
            .with_code("invalid_country_code")
    })?;

    let story = repo::get_story(&pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("storyNotFound"))?;

    if story.user_id == auth.user_id {
        return Err(AppError::forbidden("cannot guess on your own story"));
    }

    if policy::is_expired(story.expires_at, Utc::now()) {
        return Err(AppError::new(StatusCode::GONE, "story has expired")
            .with_code("story_expired"));
    }

    let dto = repo::upsert_guess(&pool, story.id, auth.user_id, &guess_code).await?;
    Ok(Json(dto))
}

pub async fn get_feed(
    Extension(pool): Extension<PgPool>,
    auth: AuthUser,
    Query(q): Query<FeedQuery>,
) -> Result<Json<FeedResponse>, AppError> {
    let limit = page_limit(q.limit);
    let cursor = parse_cursor(q.cursor.as_deref())?;
    let include_own = q.include_own.unwrap_or(false);

    let rows = repo::list_feed(&pool, auth.user_id, include_own, cursor, limit + 1).await?;
    let (rows, next_cursor, has_more) = paginate(rows, limit as usize);
    let stories = rows
        .into_iter()
        .map(|r| StoryFeedItem::from_record(r, auth.user_id))
        .collect();

    Ok(Json(FeedResponse { stories, cursor: next_cursor, has_more }))
}

pub async fn get_user_stories(
    Extension(pool): Extension<PgPool>,
    auth: AuthUser,
    Path(target_user_id): Path<Uuid>,
    Query(q): Query<UserStoriesQuery>,
) -> Result<Json<FeedResponse>, AppError> {
    let limit = page_limit(q.limit);
    let cursor = parse_cursor(q.cursor.as_deref())?;

    let rows = repo::list_user_stories(&pool, target_user_id, cursor, limit + 1).await?;
    let (rows, next_cursor, has_more) = paginate(rows, limit as usize);
    let stories = rows
        .into_iter()
        .map(|r| StoryFeedItem::from_record(r, auth.user_id))
        .collect();

    Ok(Json(FeedResponse { stories, cursor: next_cursor, has_more }))
}

pub async fn get_story_with_stats(
    Extension(pool): Extension<PgPool>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<StoryWithStats>, AppError> {
    let story = repo::get_story(&pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("storyNotFound"))?;

    // the viewer's own guess is surfaced so the UI can show "you guessed X"
    let user_guess = if story.user_id == auth.user_id {
        None
    } else {
        repo::get_guess(&pool, story.id, auth.user_id).await?
    };

    let flags = policy::derive_flags(
        Utc::now(),
        auth.user_id,
        story.user_id,
        story.expires_at,
        user_guess.is_some(),
    );

    // aggregate numbers (and the answer) stay hidden from active guessers
    let stats: Option<StoryStatsDto> = if policy::stats_visible(&flags) {
        Some(repo::fetch_stats(&pool, story.id).await?)
    } else {
        None
    };

    let reveal_country = policy::stats_visible(&flags);
    Ok(Json(StoryWithStats {
        story: StoryPayload::from_record(story, reveal_country),
        stats,
        user_guess,
        is_owner: flags.is_owner,
        is_expired: flags.is_expired,
        can_guess: flags.can_guess,
        can_view: flags.can_view,
    }))
}

pub async fn get_story_stats(
    Extension(pool): Extension<PgPool>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<StoryStatsDto>, AppError> {
    let story = repo::get_story(&pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("storyNotFound"))?;

    let is_owner = story.user_id == auth.user_id;
    let is_expired = policy::is_expired(story.expires_at, Utc::now());
    if !is_owner && !is_expired {
        return Err(AppError::forbidden("stats are not visible until the story expires"));
    }

    let stats = repo::fetch_stats(&pool, story.id).await?;
    Ok(Json(stats))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn record(created_at: DateTime<Utc>) -> StoryRecord {
        StoryRecord {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            album_id: Uuid::new_v4(),
            username: "traveler".to_string(),
            image_url: "http://example.com/cover.jpg".to_string(),
            country_code: "FR".to_string(),
            privacy_snapshot: "public".to_string(),
            expires_at: created_at + Duration::hours(24),
            created_at,
        }
    }

    #[test]
    fn paginate_full_page_peeks_one_ahead() {
        let base = Utc::now();
        // 21 rows fetched for limit 20, newest first
        let rows: Vec<StoryRecord> =
            (0..21).map(|i| record(base - Duration::minutes(i))).collect();
        let twentieth = rows[19].created_at;
        let (page, cursor, has_more) = paginate(rows, 20);
        assert_eq!(page.len(), 20);
        assert!(has_more);
        assert_eq!(
            cursor,
            Some(twentieth.to_rfc3339_opts(SecondsFormat::Micros, true))
        );
    }

    #[test]
    fn paginate_short_page_has_no_cursor() {
        let base = Utc::now();
        let rows: Vec<StoryRecord> =
            (0..5).map(|i| record(base - Duration::minutes(i))).collect();
        let (page, cursor, has_more) = paginate(rows, 20);
        assert_eq!(page.len(), 5);
        assert!(!has_more);
        assert_eq!(cursor, None);
    }

    #[test]
    fn paginate_exact_limit_has_no_cursor() {
        let base = Utc::now();
        let rows: Vec<StoryRecord> =
            (0..20).map(|i| record(base - Duration::minutes(i))).collect();
        let (page, cursor, has_more) = paginate(rows, 20);
        assert_eq!(page.len(), 20);
        assert!(!has_more);
        assert_eq!(cursor, None);
    }

    #[test]
    fn cursor_round_trips_through_parse() {
        let base = Utc::now();
        let rows: Vec<StoryRecord> =
            (0..3).map(|i| record(base - Duration::minutes(i))).collect();
        let last = rows[1].created_at;
        let (_, cursor, _) = paginate(rows, 2);
        let parsed = parse_cursor(cursor.as_deref()).unwrap().unwrap();
        assert_eq!(parsed, last);
    }

    #[test]
    fn bad_cursor_is_rejected() {
        assert!(parse_cursor(Some("yesterday")).is_err());
        assert!(parse_cursor(None).unwrap().is_none());
    }
}
