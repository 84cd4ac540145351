pub const LOGIN_URL: &str = "/login";
pub const LOGOUT_URL: &str = "/logout";
pub const GITHUB_AUTH_URL: &str = "/auth/github";
pub const OAUTH_CALLBACK_URL: &str = "/auth/callback";
pub const UNAUTHORIZED_URL: &str = "/unauthorized";

pub const PRACTICE_URL: &str = "/practice";
pub const GENERATE_URL: &str = "/practice/generate";
pub const QUIZ_SUBMIT_URL: &str = "/quiz/submit";
pub const SATISFACTION_URL: &str = "/quiz/satisfaction";
pub const ANALYTICS_URL: &str = "/analytics";
pub const HISTORY_URL: &str = "/history";
pub const QUESTIONS_API_URL: &str = "/api/questions";

pub const USER_SESSION_COOKIE_NAME: &str = "user_session";
pub const OAUTH_STATE_COOKIE_NAME: &str = "oauth_state";

/// GitHub logins allowed past the sign-in gate.
pub const ALLOWED_USERS: &[&str] = &["rjobe", "awalker-dev", "cramdeck-demo"];

// Rating bounds for both confidence and satisfaction.
pub const MIN_RATING: i32 = 1;
pub const MAX_RATING: i32 = 4;
/// Maps a 1-4 average rating onto the 0-100 accuracy axis for the
/// delusion/urgency scores.
pub const RATING_SCALE: f64 = 25.0;

// Question selection defaults.
pub const MIN_QUESTION_COUNT: usize = 1;
pub const MAX_QUESTION_COUNT: usize = 50;
pub const DEFAULT_QUESTION_COUNT: usize = 5;

pub const HISTORY_PAGE_SIZE: i64 = 50;
pub const TREND_DAYS: usize = 7;

/// Identity recorded on activity rows when the user has no public email.
pub const ANONYMOUS_USER: &str = "anonymous";

pub fn history_satisfaction_url(activity_id: i32) -> String {
    format!("/history/{activity_id}/satisfaction")
}

pub fn history_delete_url(activity_id: i32) -> String {
    format!("/history/{activity_id}/delete")
}
