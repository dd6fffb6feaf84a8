pub mod api;
pub mod app;
pub mod auth;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod services;
pub mod testing;

use std::sync::Arc;

use crate::auth::Jwt;
use crate::config::AppConfig;
use crate::database::repository::HealthCheck;
use crate::database::Repositories;
use crate::services::{CorrectionService, PhotoBookService, UserService};

pub use app::app;

/// Shared handler state; cloning copies the `Arc`s
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<UserService>,
    pub corrections: Arc<CorrectionService>,
    pub photo_books: Arc<PhotoBookService>,
    pub jwt: Arc<Jwt>,
    pub health: Arc<dyn HealthCheck>,
}

impl AppState {
    pub fn new(repositories: Repositories, jwt: Jwt, config: &AppConfig) -> Self {
        let jwt = Arc::new(jwt);
        Self {
            users: Arc::new(UserService::new(
                repositories.users,
                jwt.clone(),
                config.security.bcrypt_cost,
            )),
            corrections: Arc::new(CorrectionService::new(repositories.corrections)),
            photo_books: Arc::new(PhotoBookService::new(repositories.photo_books)),
            jwt,
            health: repositories.health,
        }
    }
}
