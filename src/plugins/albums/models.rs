use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

pub const PRIVACY_LEVELS: [&str; 3] = ["private", "friends", "public"];

#[derive(Serialize, Deserialize, Debug, FromRow)]
pub struct AlbumDto {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub privacy: String,
    pub country_code: Option<String>,
    pub cover_image_url: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Deserialize, Debug)]
pub struct AlbumCreate {
    pub title: String,
    pub privacy: Option<String>,
    pub country_code: Option<String>,
    pub cover_image_url: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct AlbumUpdate {
    pub title: Option<String>,
    pub privacy: Option<String>,
    pub country_code: Option<String>,
    pub cover_image_url: Option<String>,
}
