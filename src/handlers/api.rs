use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};

use crate::{extractors::AuthGuard, names, rejections::AppError, AppState};

pub fn routes() -> Router<AppState> {
    Router::new().route(names::QUESTIONS_API_URL, get(questions))
}

/// Proxies the legacy question feed. Gated like the root path; any upstream
/// failure collapses into one generic error response.
async fn questions(
    AuthGuard(_user): AuthGuard,
    State(state): State<AppState>,
) -> Result<Response, AppError> {
    let upstream = async {
        let body: serde_json::Value = state
            .http
            .get(&state.questions_upstream)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok::<_, reqwest::Error>(body)
    }
    .await;

    match upstream {
        Ok(body) => Ok(Json(body).into_response()),
        Err(e) => {
            tracing::error!("questions upstream failed: {e}");
            Ok((
                StatusCode::BAD_GATEWAY,
                Json(serde_json::json!({ "error": "questions upstream unavailable" })),
            )
                .into_response())
        }
    }
}
