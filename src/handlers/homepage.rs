use axum::{
    extract::State,
    response::{IntoResponse, Redirect, Response},
    routing::get,
    Router,
};
use axum_extra::extract::CookieJar;
use chrono::Utc;

use crate::{
    analytics, names,
    rejections::{AppError, ResultExt},
    views,
    views::homepage as homepage_views,
    AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new().route("/", get(homepage))
}

async fn homepage(State(state): State<AppState>, jar: CookieJar) -> Result<Response, AppError> {
    // The root path is gated: unauthenticated visitors go to sign-in.
    let Some(session_id) = jar
        .get(names::USER_SESSION_COOKIE_NAME)
        .map(|c| c.value().to_string())
    else {
        return Ok(Redirect::to(names::LOGIN_URL).into_response());
    };

    let Some(user) = state
        .db
        .get_user_by_session(&session_id)
        .await
        .reject("could not look up session")?
    else {
        return Ok(Redirect::to(names::LOGIN_URL).into_response());
    };

    let questions_count = state
        .db
        .questions_count()
        .await
        .reject("could not count questions")?;

    let rows = state
        .db
        .analytics_activity(user.activity_identity())
        .await
        .reject("could not load activity")?;

    let summary = analytics::summarize(
        &rows,
        &std::collections::HashMap::new(),
        Utc::now().date_naive(),
    );

    Ok(views::page_with_user(
        "Home",
        &user.display_name,
        homepage_views::home(homepage_views::HomeData {
            display_name: user.display_name.clone(),
            questions_count,
            attempts_count: summary.total_attempts,
            streak_days: summary.streak_days,
        }),
    )
    .into_response())
}
