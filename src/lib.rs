pub mod analytics;
pub mod db;
pub mod extractors;
pub mod handlers;
pub mod names;
pub mod rejections;
pub mod selection;
pub mod services;
pub mod statics;
pub mod utils;
pub mod views;

use axum::Router;

use crate::services::auth::AuthService;

#[derive(Clone)]
pub struct AppState {
    pub db: db::Db,
    pub auth: AuthService,
    pub secure_cookies: bool,
    /// Upstream URL the legacy `/api/questions` route proxies to.
    pub questions_upstream: String,
    pub http: reqwest::Client,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(handlers::homepage::routes())
        .merge(handlers::account::routes())
        .merge(handlers::practice::routes())
        .merge(handlers::quiz::routes())
        .merge(handlers::analytics::routes())
        .merge(handlers::history::routes())
        .merge(handlers::api::routes())
        .nest("/static", statics::routes())
        .with_state(state)
}
