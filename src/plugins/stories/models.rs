use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Deserialize, Debug)]
pub struct StoryCreate {
    pub album_id: Uuid,
    pub image_url: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct GuessCreate {
    pub guess_code: String,
}

#[derive(Deserialize, Debug)]
pub struct FeedQuery {
    pub cursor: Option<String>,
    pub limit: Option<u32>,
    pub include_own: Option<bool>,
}

#[derive(Deserialize, Debug)]
pub struct UserStoriesQuery {
    pub cursor: Option<String>,
    pub limit: Option<u32>,
}

/// Full story row plus the owner's display name, as read from storage.
/// Never serialized directly; the country column is the game's answer and
/// must pass through [`StoryPayload::from_record`] to be reveal-gated.
#[derive(FromRow, Debug, Clone)]
pub struct StoryRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub album_id: Uuid,
    pub username: String,
    pub image_url: String,
    pub country_code: String,
    pub privacy_snapshot: String,
    pub expires_at: chrono::DateTime<chrono::Utc>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Client-facing story body. `country_code` is present only when the viewer
/// is the owner or the story has expired.
#[derive(Serialize, Debug)]
pub struct StoryPayload {
    pub id: Uuid,
    pub user_id: Uuid,
    pub album_id: Uuid,
    pub username: String,
    pub image_url: String,
    pub country_code: Option<String>,
    pub privacy_snapshot: String,
    pub expires_at: chrono::DateTime<chrono::Utc>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl StoryPayload {
    pub fn from_record(record: StoryRecord, reveal_country: bool) -> Self {
        StoryPayload {
            id: record.id,
            user_id: record.user_id,
            album_id: record.album_id,
            username: record.username,
            image_url: record.image_url,
            country_code: if reveal_country { Some(record.country_code) } else { None },
            privacy_snapshot: record.privacy_snapshot,
            expires_at: record.expires_at,
            created_at: record.created_at,
        }
    }
}

/// Lightweight projection for the thumbnail tray.
#[derive(Serialize, Debug)]
pub struct StoryFeedItem {
    pub id: Uuid,
    pub user_id: Uuid,
    pub username: String,
    pub image_url: String,
    pub expires_at: chrono::DateTime<chrono::Utc>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub is_owner: bool,
}

impl StoryFeedItem {
    pub fn from_record(record: StoryRecord, viewer_id: Uuid) -> Self {
        StoryFeedItem {
            id: record.id,
            is_owner: record.user_id == viewer_id,
            user_id: record.user_id,
            username: record.username,
            image_url: record.image_url,
            expires_at: record.expires_at,
            created_at: record.created_at,
        }
    }
}

#[derive(Serialize, Debug)]
pub struct FeedResponse {
    pub stories: Vec<StoryFeedItem>,
    pub cursor: Option<String>,
    pub has_more: bool,
}

#[derive(Serialize, Deserialize, Debug, FromRow)]
pub struct StoryGuessDto {
    pub story_id: Uuid,
    pub user_id: Uuid,
    pub guess_code: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Serialize, Deserialize, Debug, FromRow)]
pub struct StoryStatsDto {
    pub story_id: Uuid,
    pub guess_count: i64,
    pub correct_count: i64,
    pub accuracy: f64,
}

impl StoryStatsDto {
    pub fn empty(story_id: Uuid) -> Self {
        StoryStatsDto { story_id, guess_count: 0, correct_count: 0, accuracy: 0.0 }
    }
}

/// The richest read payload: story body plus whatever the viewer is allowed
/// to see of the game state.
#[derive(Serialize, Debug)]
pub struct StoryWithStats {
    pub story: StoryPayload,
    pub stats: Option<StoryStatsDto>,
    pub user_guess: Option<StoryGuessDto>,
    pub is_owner: bool,
    pub is_expired: bool,
    pub can_guess: bool,
    pub can_view: bool,
}
