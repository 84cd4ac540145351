use axum::{
    extract::{Path, State},
    response::Redirect,
    routing::{get, post},
    Router,
};
use axum_extra::extract::{Form, Query};
use maud::Markup;
use serde::Deserialize;

use crate::{
    db::{HistoryFilter, HistorySort},
    extractors::AuthGuard,
    names,
    rejections::{AppError, ResultExt},
    services::activity::{plan_satisfaction_change, SatisfactionAction},
    views,
    views::history as history_views,
    AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(names::HISTORY_URL, get(history_page))
        .route("/history/{id}/satisfaction", post(update_satisfaction))
        .route("/history/{id}/delete", post(delete_record))
}

#[derive(Deserialize)]
struct HistoryQuery {
    #[serde(default)]
    page: i64,
    #[serde(default)]
    status: String,
    #[serde(default)]
    satisfaction: String,
    #[serde(default)]
    cats: Vec<String>,
    #[serde(default)]
    sort: String,
}

async fn history_page(
    AuthGuard(user): AuthGuard,
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> Result<Markup, AppError> {
    let status = match query.status.as_str() {
        "correct" => Some(true),
        "incorrect" => Some(false),
        _ => None,
    };
    let satisfaction = query.satisfaction.parse::<i32>().ok();
    let sort = HistorySort::from_query(&query.sort);
    let page = query.page.max(0);

    let filter = HistoryFilter {
        user_email: user.activity_identity().to_string(),
        correct: status,
        satisfaction,
        categories: query.cats.clone(),
        sort,
        page,
        page_size: names::HISTORY_PAGE_SIZE,
    };

    let items = state
        .db
        .history_page(&filter)
        .await
        .reject("could not load history")?;

    // Toolbar lists the stored labels verbatim; the filter matches them
    // verbatim too.
    let categories: Vec<String> = state
        .db
        .category_counts()
        .await
        .reject("could not load categories")?
        .into_iter()
        .filter_map(|c| c.cat_name)
        .collect();

    let has_more = items.len() as i64 == names::HISTORY_PAGE_SIZE;
    let mut data = history_views::HistoryData {
        items,
        categories,
        status,
        satisfaction,
        selected_categories: query.cats,
        sort,
        page,
        has_more,
        query_string: String::new(),
    };
    data.query_string = history_views::page_url(&data, data.page);

    Ok(views::page_with_user(
        "History",
        &user.display_name,
        history_views::history(data),
    ))
}

#[derive(Deserialize)]
struct SatisfactionForm {
    value: i32,
    #[serde(default)]
    return_to: String,
}

async fn update_satisfaction(
    AuthGuard(user): AuthGuard,
    State(state): State<AppState>,
    Path(activity_id): Path<i32>,
    Form(form): Form<SatisfactionForm>,
) -> Result<Redirect, AppError> {
    let record = state
        .db
        .get_activity(activity_id)
        .await
        .reject("could not load activity record")?
        .ok_or(AppError::NotFound)?;

    if record.user_email != user.activity_identity() {
        return Err(AppError::Unauthorized);
    }

    match plan_satisfaction_change(Some(record.satisfaction_rating), Some(form.value)) {
        SatisfactionAction::Update { value } => {
            state
                .db
                .update_satisfaction(record.id, value)
                .await
                .reject("could not update satisfaction")?;
        }
        // Re-clicking the current score clears it, which deletes the record.
        SatisfactionAction::Delete => {
            state
                .db
                .delete_activity(record.id)
                .await
                .reject("could not delete activity record")?;
        }
        // The record was loaded above, so the plan never asks for an insert.
        SatisfactionAction::Insert { .. } | SatisfactionAction::Noop => {}
    }

    Ok(Redirect::to(safe_return(&form.return_to)))
}

#[derive(Deserialize)]
struct DeleteForm {
    #[serde(default)]
    return_to: String,
}

async fn delete_record(
    AuthGuard(user): AuthGuard,
    State(state): State<AppState>,
    Path(activity_id): Path<i32>,
    Form(form): Form<DeleteForm>,
) -> Result<Redirect, AppError> {
    let record = state
        .db
        .get_activity(activity_id)
        .await
        .reject("could not load activity record")?
        .ok_or(AppError::NotFound)?;

    if record.user_email != user.activity_identity() {
        return Err(AppError::Unauthorized);
    }

    state
        .db
        .delete_activity(record.id)
        .await
        .reject("could not delete activity record")?;

    Ok(Redirect::to(safe_return(&form.return_to)))
}

/// Only navigate back within the history view; anything else falls back to
/// the first page.
fn safe_return(return_to: &str) -> &str {
    if return_to.starts_with(names::HISTORY_URL) {
        return_to
    } else {
        names::HISTORY_URL
    }
}
