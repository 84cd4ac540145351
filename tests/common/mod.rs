use cramdeck::db::Db;
use cramdeck::services::auth::{AuthService, GithubOAuth};
use cramdeck::AppState;

/// App state wired against a lazily-connected database. No server is needed:
/// the routing tests only exercise paths that never reach a query.
pub fn create_test_state() -> AppState {
    let db = Db::connect_lazy("postgres://localhost:5432/cramdeck_test")
        .expect("failed to build lazy test pool");

    let auth = AuthService::new(
        db.clone(),
        GithubOAuth::new("test-client-id".to_string(), "test-secret".to_string()),
    );

    AppState {
        db,
        auth,
        secure_cookies: false,
        questions_upstream: "http://localhost:4000/questions".to_string(),
        http: reqwest::Client::new(),
    }
}
