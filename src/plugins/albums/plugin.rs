use crate::kernel::Plugin;
use crate::plugins::albums::handlers::*;
use axum::{
    routing::{delete, get, post, put},
    Extension, Router,
};
use sqlx::PgPool;

pub struct AlbumsPlugin {
    pub pool: PgPool,
}

impl AlbumsPlugin {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl Plugin for AlbumsPlugin {
    async fn router(&self) -> Router {
        Router::new()
            .route("/", post(create_album))
            .route("/", get(list_my_albums))
            .route("/:id", get(get_album))
            .route("/:id", put(update_album))
            .route("/:id", delete(delete_album))
            .layer(Extension(self.pool.clone()))
    }

    fn name(&self) -> &'static str {
        "albums"
    }
}
