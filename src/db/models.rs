// Database model structs

use chrono::{DateTime, Utc};

#[derive(Clone, Debug, sqlx::FromRow)]
pub struct AuthUser {
    pub id: i32,
    pub login: String,
    pub email: Option<String>,
    pub display_name: String,
}

impl AuthUser {
    /// Identity recorded on activity rows: the user's email, or the shared
    /// anonymous label when GitHub exposes none.
    pub fn activity_identity(&self) -> &str {
        self.email.as_deref().unwrap_or(crate::names::ANONYMOUS_USER)
    }
}

#[derive(Clone, Debug, sqlx::FromRow)]
pub struct QuestionModel {
    pub id: i32,
    pub question_text: String,
    pub category: Option<String>,
    pub options: Vec<String>,
    pub correct_answers: Vec<String>,
    pub explanation: String,
}

#[derive(sqlx::FromRow)]
pub struct CategoryCount {
    pub cat_name: Option<String>,
    pub q_count: i64,
}

/// The slice of an activity row the question selector aggregates over.
#[derive(Clone, Copy, sqlx::FromRow)]
pub struct ActivityRow {
    pub question_id: i32,
    pub is_correct: bool,
    pub user_rating: i32,
}

#[derive(Clone, Debug, sqlx::FromRow)]
pub struct ActivityRecord {
    pub id: i32,
    pub question_id: i32,
    pub user_email: String,
    pub is_correct: bool,
    pub user_rating: i32,
    pub satisfaction_rating: Option<i32>,
    pub submitted_answer: Vec<String>,
    pub attempted_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Activity joined with its question's category, as consumed by analytics.
#[derive(Clone, sqlx::FromRow)]
pub struct AnalyticsRow {
    pub question_id: i32,
    pub is_correct: bool,
    pub user_rating: i32,
    pub satisfaction_rating: Option<i32>,
    pub attempted_at: DateTime<Utc>,
    pub category: Option<String>,
}

/// One page entry in the history view: the activity row joined with the full
/// question detail.
#[derive(Clone, sqlx::FromRow)]
pub struct HistoryItem {
    pub id: i32,
    pub attempted_at: DateTime<Utc>,
    pub is_correct: bool,
    pub user_rating: i32,
    pub satisfaction_rating: Option<i32>,
    pub submitted_answer: Vec<String>,
    pub question_text: String,
    pub options: Vec<String>,
    pub correct_answers: Vec<String>,
    pub explanation: String,
    pub category: Option<String>,
}
