use crate::http_error::AppError;
use crate::plugins::albums::models::AlbumDto;
use sqlx::PgPool;
use uuid::Uuid;

const ALBUM_COLUMNS: &str =
    "id, user_id, title, privacy, country_code, cover_image_url, created_at, updated_at";

pub async fn insert_album(
    pool: &PgPool,
    user_id: Uuid,
    title: &str,
    privacy: &str,
    country_code: Option<&str>,
    cover_image_url: Option<&str>,
) -> Result<AlbumDto, AppError> {
    let sql = format!(
        "INSERT INTO albums (user_id, title, privacy, country_code, cover_image_url) \
         VALUES ($1, $2, $3, $4, $5) RETURNING {}",
        ALBUM_COLUMNS
    );
    let dto = sqlx::query_as::<_, AlbumDto>(&sql)
        .bind(user_id)
        .bind(title)
        .bind(privacy)
        .bind(country_code)
        .bind(cover_image_url)
        .fetch_one(pool)
        .await
        .map_err(AppError::from)?;
    Ok(dto)
}

pub async fn get_album(pool: &PgPool, id: Uuid) -> Result<Option<AlbumDto>, AppError> {
    let sql = format!("SELECT {} FROM albums WHERE id = $1", ALBUM_COLUMNS);
    let dto = sqlx::query_as::<_, AlbumDto>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(AppError::from)?;
    Ok(dto)
}

pub async fn list_albums_for_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<AlbumDto>, AppError> {
    let sql = format!(
        "SELECT {} FROM albums WHERE user_id = $1 ORDER BY created_at DESC",
        ALBUM_COLUMNS
    );
    let items = sqlx::query_as::<_, AlbumDto>(&sql)
        .bind(user_id)
        .fetch_all(pool)
        .await
        .map_err(AppError::from)?;
    Ok(items)
}

pub async fn update_album(
    pool: &PgPool,
    id: Uuid,
    title: Option<String>,
    privacy: Option<String>,
    country_code: Option<String>,
    cover_image_url: Option<String>,
) -> Result<AlbumDto, AppError> {
    let sql = format!(
        "UPDATE albums SET \
            title = COALESCE($1, title), \
            privacy = COALESCE($2, privacy), \
            country_code = COALESCE($3, country_code), \
            cover_image_url = COALESCE($4, cover_image_url), \
            updated_at = now() \
         WHERE id = $5 RETURNING {}",
        ALBUM_COLUMNS
    );
    let dto = sqlx::query_as::<_, AlbumDto>(&sql)
        .bind(title)
        .bind(privacy)
        .bind(country_code)
        .bind(cover_image_url)
        .bind(id)
        .fetch_one(pool)
        .await
        .map_err(AppError::from)?;
    Ok(dto)
}

pub async fn delete_album(pool: &PgPool, id: Uuid) -> Result<(), AppError> {
    sqlx::query("DELETE FROM albums WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await
        .map_err(AppError::from)?;
    Ok(())
}
