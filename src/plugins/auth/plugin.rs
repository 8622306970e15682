use crate::kernel::Plugin;
use crate::plugins::auth::handlers;
use async_trait::async_trait;
use axum::{
    routing::{get, post},
    Router,
};
use sqlx::PgPool;

pub struct AuthPlugin {
    pool: PgPool,
}

impl AuthPlugin {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Plugin for AuthPlugin {
    async fn router(&self) -> Router {
        Router::new()
            .route("/login", post(handlers::login))
            .route("/whoami", get(handlers::whoami))
            .with_state(self.pool.clone())
    }

    fn name(&self) -> &'static str {
        "auth"
    }
}
