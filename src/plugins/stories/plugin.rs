use crate::kernel::Plugin;
use crate::plugins::stories::handlers::*;
use axum::{
    routing::{delete, get, post},
    Extension, Router,
};
use sqlx::PgPool;

pub struct StoriesPlugin {
    pub pool: PgPool,
}

impl StoriesPlugin {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl Plugin for StoriesPlugin {
    async fn router(&self) -> Router {
        Router::new()
            .route("/", post(create_story))
            .route("/feed", get(get_feed))
            .route("/user/:user_id", get(get_user_stories))
            .route("/:id", get(get_story_with_stats))
            .route("/:id", delete(delete_story))
            .route("/:id/stats", get(get_story_stats))
            .route("/:id/guess", post(submit_guess))
            .layer(Extension(self.pool.clone()))
    }

    fn name(&self) -> &'static str {
        "stories"
    }
}
