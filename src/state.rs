use std::sync::Arc;

use sqlx::PgPool;

use crate::auth::JwtKeys;
use crate::config::AppConfig;
use crate::services::{CommentService, GoalService, LikeService, TodoService, UploadStore, UserService};

/// Process-scoped dependencies, built once in `main` and handed to the router
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<AppConfig>,
    pub jwt: Arc<JwtKeys>,
    pub uploads: Arc<UploadStore>,
}

impl AppState {
    pub fn new(config: AppConfig, pool: PgPool) -> Self {
        let jwt = JwtKeys::new(&config.security.jwt_secret, config.security.jwt_expiry_hours);
        let uploads = UploadStore::new(config.api.upload_dir.clone(), config.api.max_upload_bytes);

        Self {
            pool,
            config: Arc::new(config),
            jwt: Arc::new(jwt),
            uploads: Arc::new(uploads),
        }
    }

    pub fn users(&self) -> UserService {
        UserService::new(self.pool.clone())
    }

    pub fn todos(&self) -> TodoService {
        TodoService::new(self.pool.clone())
    }

    pub fn goals(&self) -> GoalService {
        GoalService::new(self.pool.clone())
    }

    pub fn likes(&self) -> LikeService {
        LikeService::new(self.pool.clone())
    }

    pub fn comments(&self) -> CommentService {
        CommentService::new(self.pool.clone())
    }
}
