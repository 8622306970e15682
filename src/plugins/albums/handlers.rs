use crate::http_error::AppError;
use crate::plugins::albums::models::{AlbumCreate, AlbumDto, AlbumUpdate, PRIVACY_LEVELS};
use crate::plugins::albums::repo;
use crate::plugins::auth::AuthUser;
use crate::plugins::stories::countries;
use axum::http::StatusCode;
use axum::{extract::Path, Extension, Json};
use sqlx::PgPool;
use uuid::Uuid;

fn check_privacy(privacy: &str) -> Result<(), AppError> {
    if PRIVACY_LEVELS.contains(&privacy) {
        Ok(())
    } else {
        Err(AppError::new(StatusCode::BAD_REQUEST, "invalid privacy level")
            .with_code("invalid_privacy"))
    }
}

fn check_country(code: &str) -> Result<String, AppError> {
    countries::normalize(code).ok_or_else(|| {
        AppError::new(StatusCode::BAD_REQUEST, "invalid country code")
            .with_code("invalid_country_code")
    })
}

pub async fn create_album(
    Extension(pool): Extension<PgPool>,
    auth: AuthUser,
    Json(payload): Json<AlbumCreate>,
) -> Result<Json<AlbumDto>, AppError> {
    let privacy = payload.privacy.unwrap_or_else(|| "private".to_string());
    check_privacy(&privacy)?;
    let country = match payload.country_code.as_deref() {
        Some(c) => Some(check_country(c)?),
        None => None,
    };

    let dto = repo::insert_album(
        &pool,
        auth.user_id,
        &payload.title,
        &privacy,
        country.as_deref(),
        payload.cover_image_url.as_deref(),
    )
    .await?;
    Ok(Json(dto))
}

pub async fn get_album(
    Extension(pool): Extension<PgPool>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<AlbumDto>, AppError> {
    let dto = repo::get_album(&pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("albumNotFound"))?;
    Ok(Json(dto))
}

pub async fn list_my_albums(
    Extension(pool): Extension<PgPool>,
    auth: AuthUser,
) -> Result<Json<Vec<AlbumDto>>, AppError> {
    let items = repo::list_albums_for_user(&pool, auth.user_id).await?;
    Ok(Json(items))
}

pub async fn update_album(
    Extension(pool): Extension<PgPool>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<AlbumUpdate>,
) -> Result<Json<AlbumDto>, AppError> {
    let current = repo::get_album(&pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("albumNotFound"))?;
    if current.user_id != auth.user_id {
        return Err(AppError::forbidden("not authorized to edit this album"));
    }
    if let Some(privacy) = payload.privacy.as_deref() {
        check_privacy(privacy)?;
    }
    let country = match payload.country_code.as_deref() {
        Some(c) => Some(check_country(c)?),
        None => None,
    };

    let dto = repo::update_album(
        &pool,
        id,
        payload.title,
        payload.privacy,
        country,
        payload.cover_image_url,
    )
    .await?;
    Ok(Json(dto))
}

pub async fn delete_album(
    Extension(pool): Extension<PgPool>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let current = repo::get_album(&pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("albumNotFound"))?;
    if current.user_id != auth.user_id {
        return Err(AppError::forbidden("not authorized to delete this album"));
    }
    repo::delete_album(&pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
