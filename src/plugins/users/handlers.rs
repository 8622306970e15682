use crate::http_error::AppError;
use crate::plugins::users::models::{CreateUser, UpdateUser, UserDto};
use crate::plugins::users::repo;
use axum::http::StatusCode;
use axum::{extract::Path, Extension, Json};
use sqlx::{PgPool, Row};
use uuid::Uuid;

pub async fn create_user(
    Extension(pool): Extension<PgPool>,
    Json(payload): Json<CreateUser>,
) -> Result<Json<UserDto>, AppError> {
    if !payload.email.contains('@') {
        return Err(AppError::new(StatusCode::BAD_REQUEST, "invalid email"));
    }
    if payload.password.len() < 8 {
        return Err(AppError::new(StatusCode::BAD_REQUEST, "password too short"));
    }

    let user = repo::insert_user(&pool, &payload.username, &payload.email, &payload.password).await?;
    Ok(Json(user))
}

pub async fn list_users(Extension(pool): Extension<PgPool>) -> Result<Json<Vec<UserDto>>, AppError> {
    let users = repo::list_users(&pool).await?;
    Ok(Json(users))
}

pub async fn get_user(
    Extension(pool): Extension<PgPool>,
    Path(id): Path<Uuid>,
) -> Result<Json<UserDto>, AppError> {
    let user = repo::get_user(&pool, id).await?;
    Ok(Json(user))
}

pub async fn update_user(
    Extension(pool): Extension<PgPool>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateUser>,
) -> Result<Json<UserDto>, AppError> {
    let current = sqlx::query("SELECT username, email FROM users WHERE id = $1")
        .bind(id)
        .fetch_one(&pool)
        .await
        .map_err(AppError::from)?;

    let new_username = payload.username.unwrap_or(current.get("username"));
    let new_email = payload.email.unwrap_or(current.get("email"));

    let user = repo::update_user(&pool, id, &new_username, &new_email).await?;
    Ok(Json(user))
}

pub async fn delete_user(
    Extension(pool): Extension<PgPool>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    repo::delete_user(&pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
