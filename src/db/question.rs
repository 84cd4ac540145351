use std::collections::HashMap;

use color_eyre::Result;

use super::models::{CategoryCount, QuestionModel};
use super::Db;

impl Db {
    /// Fetch full question bodies for the given ids, preserving the order of
    /// `ids`. Ids that do not exist are silently skipped.
    pub async fn get_questions_in_order(&self, ids: &[i32]) -> Result<Vec<QuestionModel>> {
        let rows: Vec<QuestionModel> = sqlx::query_as::<_, QuestionModel>(
            r#"
            SELECT id, question_text, category, options, correct_answers, explanation
            FROM questions
            WHERE id = ANY($1)
            "#,
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        let mut by_id: HashMap<i32, QuestionModel> =
            rows.into_iter().map(|q| (q.id, q)).collect();

        Ok(ids.iter().filter_map(|id| by_id.remove(id)).collect())
    }

    pub async fn get_question(&self, question_id: i32) -> Result<Option<QuestionModel>> {
        let question = sqlx::query_as::<_, QuestionModel>(
            r#"
            SELECT id, question_text, category, options, correct_answers, explanation
            FROM questions
            WHERE id = $1
            "#,
        )
        .bind(question_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(question)
    }

    /// All question ids with their raw category labels. Category filtering and
    /// normalization happen in the selector, not in SQL.
    pub async fn question_categories(&self) -> Result<Vec<(i32, Option<String>)>> {
        let rows: Vec<(i32, Option<String>)> =
            sqlx::query_as("SELECT id, category FROM questions ORDER BY id")
                .fetch_all(&self.pool)
                .await?;

        Ok(rows)
    }

    pub async fn questions_count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM questions")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Per-category question totals via the `get_category_counts` function.
    pub async fn category_counts(&self) -> Result<Vec<CategoryCount>> {
        let counts = sqlx::query_as::<_, CategoryCount>(
            "SELECT cat_name, q_count FROM get_category_counts()",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(counts)
    }

    /// One backend call per phrase via the `search_questions_by_phrase`
    /// function; combining the per-phrase pools is the selector's job.
    pub async fn search_ids_by_phrase(&self, phrase: &str) -> Result<Vec<i32>> {
        let ids: Vec<i32> =
            sqlx::query_scalar("SELECT question_id FROM search_questions_by_phrase($1)")
                .bind(phrase)
                .fetch_all(&self.pool)
                .await?;

        Ok(ids)
    }
}
