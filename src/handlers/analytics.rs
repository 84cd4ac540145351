use std::collections::HashMap;

use axum::{
    extract::{Query, State},
    routing::get,
    Router,
};
use chrono::Utc;
use maud::Markup;
use serde::Deserialize;

use crate::{
    analytics::{self, SortMode},
    extractors::AuthGuard,
    names,
    rejections::{AppError, ResultExt},
    selection, views,
    views::analytics as analytics_views,
    AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new().route(names::ANALYTICS_URL, get(analytics_page))
}

#[derive(Deserialize)]
struct AnalyticsQuery {
    #[serde(default)]
    sort: String,
    #[serde(default)]
    q: String,
}

async fn analytics_page(
    AuthGuard(user): AuthGuard,
    State(state): State<AppState>,
    Query(query): Query<AnalyticsQuery>,
) -> Result<Markup, AppError> {
    let rows = state
        .db
        .analytics_activity(user.activity_identity())
        .await
        .reject("could not load activity")?;

    let counts = state
        .db
        .category_counts()
        .await
        .reject("could not load category counts")?;
    let totals: HashMap<String, i64> = selection::merge_category_counts(&counts)
        .into_iter()
        .collect();

    let mut summary = analytics::summarize(&rows, &totals, Utc::now().date_naive());

    let sort = SortMode::from_query(&query.sort);
    analytics::sort_categories(&mut summary.categories, sort);

    // Display-only name filter; the underlying aggregates are untouched.
    let name_filter = query.q.trim().to_string();
    if !name_filter.is_empty() {
        let needle = name_filter.to_lowercase();
        summary
            .categories
            .retain(|c| c.name.to_lowercase().contains(&needle));
    }

    Ok(views::page_with_user(
        "Analytics",
        &user.display_name,
        analytics_views::analytics(analytics_views::AnalyticsData {
            summary,
            sort,
            name_filter,
        }),
    ))
}
