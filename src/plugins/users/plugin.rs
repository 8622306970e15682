use crate::kernel::Plugin;
use crate::plugins::users::handlers::*;
use axum::{
    routing::{delete, get, post, put},
    Extension, Router,
};
use sqlx::PgPool;

pub struct UsersPlugin {
    pub pool: PgPool,
}

impl UsersPlugin {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl Plugin for UsersPlugin {
    async fn router(&self) -> Router {
        Router::new()
            .route("/", post(create_user))
            .route("/", get(list_users))
            .route("/:id", get(get_user))
            .route("/:id", put(update_user))
            .route("/:id", delete(delete_user))
            .layer(Extension(self.pool.clone()))
    }

    fn name(&self) -> &'static str {
        "users"
    }
}
