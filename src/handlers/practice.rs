use std::collections::HashSet;

use axum::{extract::State, routing::get, routing::post, Router};
use axum_extra::extract::Form;
use maud::Markup;
use serde::Deserialize;

use crate::{
    extractors::AuthGuard,
    names,
    rejections::{AppError, ResultExt},
    selection::{
        self, aggregate_history, build_pool, category_candidates, combine_phrase_pools,
        resolve_categories, sample, PhraseMode, SelectionFilter,
    },
    views,
    views::practice as practice_views,
    views::quiz as quiz_views,
    AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(names::PRACTICE_URL, get(practice_page))
        .route(names::GENERATE_URL, post(generate))
}

#[derive(Deserialize)]
struct GenerateForm {
    #[serde(default)]
    include_cats: Vec<String>,
    #[serde(default)]
    exclude_cats: Vec<String>,
    #[serde(default)]
    phrases: String,
    #[serde(default)]
    phrase_mode: String,
    #[serde(default)]
    unseen_only: Option<String>,
    #[serde(default = "default_min_rating")]
    min_rating: i32,
    #[serde(default = "default_max_rating")]
    max_rating: i32,
    #[serde(default)]
    not_mastered: Option<String>,
    #[serde(default = "default_limit")]
    limit: usize,
}

fn default_min_rating() -> i32 {
    names::MIN_RATING
}

fn default_max_rating() -> i32 {
    names::MAX_RATING
}

fn default_limit() -> usize {
    names::DEFAULT_QUESTION_COUNT
}

impl GenerateForm {
    fn into_filter(self) -> SelectionFilter {
        SelectionFilter {
            included_categories: self.include_cats,
            excluded_categories: self.exclude_cats,
            phrases: self
                .phrases
                .split(',')
                .map(|p| p.trim().to_string())
                .filter(|p| !p.is_empty())
                .collect(),
            phrase_mode: PhraseMode::from_query(&self.phrase_mode),
            unseen_only: self.unseen_only.is_some(),
            min_rating: self.min_rating,
            max_rating: self.max_rating,
            not_mastered_only: self.not_mastered.is_some(),
            limit: self.limit,
        }
        .normalized()
    }
}

async fn practice_page(
    AuthGuard(user): AuthGuard,
    State(state): State<AppState>,
) -> Result<Markup, AppError> {
    let page = selector_page(&state, SelectionFilter::default(), false).await?;
    Ok(views::page_with_user("Practice", &user.display_name, page))
}

async fn generate(
    AuthGuard(user): AuthGuard,
    State(state): State<AppState>,
    Form(form): Form<GenerateForm>,
) -> Result<Markup, AppError> {
    let filter = form.into_filter();

    // Phrase pools take priority over category resolution.
    let candidates: Vec<i32> = if !filter.phrases.is_empty() {
        let mut pools = Vec::new();
        for phrase in &filter.phrases {
            let ids = state
                .db
                .search_ids_by_phrase(phrase)
                .await
                .reject("phrase search failed")?;
            pools.push(ids.into_iter().collect::<HashSet<i32>>());
        }
        let mut ids: Vec<i32> = combine_phrase_pools(pools, filter.phrase_mode)
            .into_iter()
            .collect();
        ids.sort_unstable();
        ids
    } else {
        let counts = state
            .db
            .category_counts()
            .await
            .reject("could not load categories")?;
        let available: Vec<String> = selection::merge_category_counts(&counts)
            .into_keys()
            .collect();
        let target = resolve_categories(&filter, &available);

        let questions = state
            .db
            .question_categories()
            .await
            .reject("could not load question categories")?;
        category_candidates(&questions, target.as_deref())
    };

    let activity = state
        .db
        .activity_for_user(user.activity_identity())
        .await
        .reject("could not load activity history")?;
    let history = aggregate_history(&activity);

    let pool = build_pool(candidates, &history, &filter);

    if pool.is_empty() {
        tracing::info!("question selection produced no results");
        let page = selector_page(&state, filter, true).await?;
        return Ok(views::page_with_user("Practice", &user.display_name, page));
    }

    let ids = sample(pool, filter.limit, &mut rand::thread_rng());
    tracing::info!("generated quiz with {} questions", ids.len());

    let questions = state
        .db
        .get_questions_in_order(&ids)
        .await
        .reject("could not load questions")?;

    Ok(views::page_with_user(
        "Quiz",
        &user.display_name,
        quiz_views::quiz(quiz_views::QuizData { questions }),
    ))
}

async fn selector_page(
    state: &AppState,
    filter: SelectionFilter,
    no_results: bool,
) -> Result<Markup, AppError> {
    let counts = state
        .db
        .category_counts()
        .await
        .reject("could not load categories")?;
    let categories: Vec<(String, i64)> = selection::merge_category_counts(&counts)
        .into_iter()
        .collect();

    Ok(practice_views::practice(practice_views::PracticeData {
        categories,
        filter,
        no_results,
    }))
}
