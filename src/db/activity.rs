use color_eyre::Result;
use sqlx::{Postgres, QueryBuilder};

use super::models::{ActivityRecord, ActivityRow, AnalyticsRow, HistoryItem};
use super::Db;

/// A new activity record, one per answered-and-rated question.
pub struct NewActivity<'a> {
    pub question_id: i32,
    pub user_email: &'a str,
    pub is_correct: bool,
    pub user_rating: i32,
    pub satisfaction_rating: Option<i32>,
    pub submitted_answer: &'a [String],
}

#[derive(Clone, Copy, Default, PartialEq, Eq)]
pub enum HistorySort {
    #[default]
    Newest,
    Oldest,
    Confidence,
    Satisfaction,
}

impl HistorySort {
    pub fn from_query(value: &str) -> Self {
        match value {
            "oldest" => Self::Oldest,
            "confidence" => Self::Confidence,
            "satisfaction" => Self::Satisfaction,
            _ => Self::Newest,
        }
    }

    pub fn as_query(&self) -> &'static str {
        match self {
            Self::Newest => "newest",
            Self::Oldest => "oldest",
            Self::Confidence => "confidence",
            Self::Satisfaction => "satisfaction",
        }
    }

    fn order_clause(&self) -> &'static str {
        match self {
            Self::Newest => "ua.attempted_at DESC",
            Self::Oldest => "ua.attempted_at ASC",
            Self::Confidence => "ua.user_rating DESC, ua.attempted_at DESC",
            Self::Satisfaction => "ua.satisfaction_rating DESC NULLS LAST, ua.attempted_at DESC",
        }
    }
}

/// Typed filter for the history page, rendered into SQL in one place instead
/// of scattered query-builder chains.
pub struct HistoryFilter {
    pub user_email: String,
    pub correct: Option<bool>,
    pub satisfaction: Option<i32>,
    pub categories: Vec<String>,
    pub sort: HistorySort,
    pub page: i64,
    pub page_size: i64,
}

impl HistoryFilter {
    fn push_conditions(&self, builder: &mut QueryBuilder<'_, Postgres>) {
        builder.push(" WHERE ua.user_email = ");
        builder.push_bind(self.user_email.clone());

        if let Some(correct) = self.correct {
            builder.push(" AND ua.is_correct = ");
            builder.push_bind(correct);
        }
        if let Some(satisfaction) = self.satisfaction {
            builder.push(" AND ua.satisfaction_rating = ");
            builder.push_bind(satisfaction);
        }
        if !self.categories.is_empty() {
            builder.push(" AND q.category = ANY(");
            builder.push_bind(self.categories.clone());
            builder.push(")");
        }
    }
}

impl Db {
    /// The user's complete activity history; deliberately unpaginated, the
    /// selector aggregates over all of it.
    pub async fn activity_for_user(&self, user_email: &str) -> Result<Vec<ActivityRow>> {
        let rows = sqlx::query_as::<_, ActivityRow>(
            "SELECT question_id, is_correct, user_rating FROM user_activity WHERE user_email = $1",
        )
        .bind(user_email)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Every activity row joined with its question's category, newest first.
    pub async fn analytics_activity(&self, user_email: &str) -> Result<Vec<AnalyticsRow>> {
        let rows = sqlx::query_as::<_, AnalyticsRow>(
            r#"
            SELECT ua.question_id, ua.is_correct, ua.user_rating,
                   ua.satisfaction_rating, ua.attempted_at, q.category
            FROM user_activity ua
            JOIN questions q ON q.id = ua.question_id
            WHERE ua.user_email = $1
            ORDER BY ua.attempted_at DESC
            "#,
        )
        .bind(user_email)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn insert_activity(&self, activity: &NewActivity<'_>) -> Result<i32> {
        let id: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO user_activity
                (question_id, user_email, is_correct, user_rating,
                 satisfaction_rating, submitted_answer)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(activity.question_id)
        .bind(activity.user_email)
        .bind(activity.is_correct)
        .bind(activity.user_rating)
        .bind(activity.satisfaction_rating)
        .bind(activity.submitted_answer)
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    /// Insert one record per rated question atomically. Returns
    /// `(question_id, activity_id)` pairs for the satisfaction pickers.
    pub async fn insert_activities(
        &self,
        activities: &[NewActivity<'_>],
    ) -> Result<Vec<(i32, i32)>> {
        if activities.is_empty() {
            return Ok(Vec::new());
        }

        let mut tx = self.pool.begin().await?;
        let mut inserted = Vec::with_capacity(activities.len());

        for activity in activities {
            let id: i32 = sqlx::query_scalar(
                r#"
                INSERT INTO user_activity
                    (question_id, user_email, is_correct, user_rating,
                     satisfaction_rating, submitted_answer)
                VALUES ($1, $2, $3, $4, $5, $6)
                RETURNING id
                "#,
            )
            .bind(activity.question_id)
            .bind(activity.user_email)
            .bind(activity.is_correct)
            .bind(activity.user_rating)
            .bind(activity.satisfaction_rating)
            .bind(activity.submitted_answer)
            .fetch_one(&mut *tx)
            .await?;

            inserted.push((activity.question_id, id));
        }

        tx.commit().await?;

        tracing::info!("recorded {} activity rows", inserted.len());
        Ok(inserted)
    }

    pub async fn get_activity(&self, activity_id: i32) -> Result<Option<ActivityRecord>> {
        let record = sqlx::query_as::<_, ActivityRecord>(
            r#"
            SELECT id, question_id, user_email, is_correct, user_rating,
                   satisfaction_rating, submitted_answer, attempted_at, updated_at
            FROM user_activity
            WHERE id = $1
            "#,
        )
        .bind(activity_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    pub async fn update_satisfaction(&self, activity_id: i32, value: i32) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE user_activity
            SET satisfaction_rating = $1, updated_at = CURRENT_TIMESTAMP
            WHERE id = $2
            "#,
        )
        .bind(value)
        .bind(activity_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn delete_activity(&self, activity_id: i32) -> Result<()> {
        sqlx::query("DELETE FROM user_activity WHERE id = $1")
            .bind(activity_id)
            .execute(&self.pool)
            .await?;

        tracing::info!("deleted activity record {activity_id}");
        Ok(())
    }

    pub async fn history_page(&self, filter: &HistoryFilter) -> Result<Vec<HistoryItem>> {
        let mut builder = QueryBuilder::<Postgres>::new(
            r#"
            SELECT ua.id, ua.attempted_at, ua.is_correct, ua.user_rating,
                   ua.satisfaction_rating, ua.submitted_answer,
                   q.question_text, q.options, q.correct_answers,
                   q.explanation, q.category
            FROM user_activity ua
            JOIN questions q ON q.id = ua.question_id
            "#,
        );

        filter.push_conditions(&mut builder);

        builder.push(" ORDER BY ");
        builder.push(filter.sort.order_clause());
        builder.push(" LIMIT ");
        builder.push_bind(filter.page_size);
        builder.push(" OFFSET ");
        builder.push_bind(filter.page * filter.page_size);

        let items = builder
            .build_query_as::<HistoryItem>()
            .fetch_all(&self.pool)
            .await?;

        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter() -> HistoryFilter {
        HistoryFilter {
            user_email: "a@example.com".to_string(),
            correct: None,
            satisfaction: None,
            categories: Vec::new(),
            sort: HistorySort::Newest,
            page: 0,
            page_size: 50,
        }
    }

    #[test]
    fn base_filter_only_constrains_user() {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT 1 FROM user_activity ua");
        filter().push_conditions(&mut builder);
        let sql = builder.sql();

        assert!(sql.contains("ua.user_email = $1"));
        assert!(!sql.contains("is_correct"));
        assert!(!sql.contains("satisfaction_rating"));
        assert!(!sql.contains("category"));
    }

    #[test]
    fn full_filter_renders_every_condition() {
        let mut f = filter();
        f.correct = Some(false);
        f.satisfaction = Some(2);
        f.categories = vec!["Allergy".to_string()];

        let mut builder = QueryBuilder::<Postgres>::new("SELECT 1 FROM user_activity ua");
        f.push_conditions(&mut builder);
        let sql = builder.sql();

        assert!(sql.contains("ua.is_correct = $2"));
        assert!(sql.contains("ua.satisfaction_rating = $3"));
        assert!(sql.contains("q.category = ANY($4)"));
    }

    #[test]
    fn sort_round_trips_through_query_strings() {
        for sort in [
            HistorySort::Newest,
            HistorySort::Oldest,
            HistorySort::Confidence,
            HistorySort::Satisfaction,
        ] {
            assert!(HistorySort::from_query(sort.as_query()) == sort);
        }
        // Unknown values fall back to newest-first.
        assert!(HistorySort::from_query("bogus") == HistorySort::Newest);
    }
}
