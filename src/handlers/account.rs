use axum::{
    extract::{Query, State},
    http::{
        header::{LOCATION, SET_COOKIE},
        HeaderMap, HeaderValue, StatusCode,
    },
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
    Router,
};
use axum_extra::extract::CookieJar;
use serde::Deserialize;
use ulid::Ulid;

use crate::{
    names,
    rejections::{AppError, ResultExt},
    services::auth::LoginOutcome,
    utils, views,
    views::account as account_views,
    AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(names::LOGIN_URL, get(login_page))
        .route(names::GITHUB_AUTH_URL, get(github_redirect))
        // GitHub sends the callback as a GET; some proxies replay it as POST.
        .route(names::OAUTH_CALLBACK_URL, get(oauth_callback).post(oauth_callback))
        .route(names::LOGOUT_URL, post(logout))
        .route(names::UNAUTHORIZED_URL, get(unauthorized_page))
}

async fn login_page(State(state): State<AppState>, jar: CookieJar) -> Response {
    // Already signed in: skip the login screen.
    if let Some(session_id) = jar
        .get(names::USER_SESSION_COOKIE_NAME)
        .map(|c| c.value().to_string())
    {
        if let Ok(Some(_user)) = state.db.get_user_by_session(&session_id).await {
            return Redirect::to("/").into_response();
        }
    }

    views::page("Sign in", account_views::login()).into_response()
}

async fn github_redirect(State(state): State<AppState>) -> Result<Response, AppError> {
    let nonce = Ulid::new().to_string();
    let authorize_url = state.auth.authorize_url(&nonce);

    let cookie = utils::state_cookie(
        names::OAUTH_STATE_COOKIE_NAME,
        &nonce,
        state.secure_cookies,
    );

    let mut headers = HeaderMap::new();
    headers.insert(SET_COOKIE, cookie.parse().unwrap());
    headers.insert(
        LOCATION,
        HeaderValue::from_str(&authorize_url).reject("invalid authorize url")?,
    );

    Ok((StatusCode::SEE_OTHER, headers).into_response())
}

#[derive(Deserialize)]
struct CallbackQuery {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    state: Option<String>,
}

async fn oauth_callback(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(query): Query<CallbackQuery>,
) -> Result<Response, AppError> {
    let code = query
        .code
        .ok_or(AppError::Input("missing authorization code"))?;

    let expected_nonce = jar
        .get(names::OAUTH_STATE_COOKIE_NAME)
        .map(|c| c.value().to_string());
    if expected_nonce.is_none() || query.state != expected_nonce {
        tracing::warn!("OAuth state mismatch on callback");
        return Err(AppError::Input("OAuth state mismatch"));
    }

    let outcome = match state.auth.login_with_code(&code).await {
        Ok(outcome) => outcome,
        Err(e) => {
            tracing::error!("OAuth sign-in failed: {e}");
            return Err(AppError::Internal("sign-in failed"));
        }
    };

    match outcome {
        LoginOutcome::Success(session_token) => {
            let mut headers = HeaderMap::new();
            headers.append(
                SET_COOKIE,
                utils::cookie(
                    names::USER_SESSION_COOKIE_NAME,
                    &session_token,
                    state.secure_cookies,
                )
                .parse()
                .unwrap(),
            );
            headers.append(
                SET_COOKIE,
                utils::clear_cookie(names::OAUTH_STATE_COOKIE_NAME)
                    .parse()
                    .unwrap(),
            );
            headers.insert(LOCATION, HeaderValue::from_static("/"));

            Ok((StatusCode::SEE_OTHER, headers).into_response())
        }
        LoginOutcome::NotAllowed(login) => {
            let url = format!(
                "{}?login={}",
                names::UNAUTHORIZED_URL,
                urlencoding::encode(&login)
            );
            Ok(Redirect::to(&url).into_response())
        }
    }
}

async fn logout(State(state): State<AppState>, jar: CookieJar) -> Result<Response, AppError> {
    if let Some(session_id) = jar
        .get(names::USER_SESSION_COOKIE_NAME)
        .map(|c| c.value().to_string())
    {
        if let Err(e) = state.auth.logout(&session_id).await {
            tracing::warn!("could not delete session: {e}");
        }
    }

    let mut headers = HeaderMap::new();
    headers.insert(
        SET_COOKIE,
        utils::clear_cookie(names::USER_SESSION_COOKIE_NAME)
            .parse()
            .unwrap(),
    );
    headers.insert(LOCATION, HeaderValue::from_static(names::LOGIN_URL));

    Ok((StatusCode::SEE_OTHER, headers).into_response())
}

#[derive(Deserialize)]
struct UnauthorizedQuery {
    #[serde(default)]
    login: Option<String>,
}

async fn unauthorized_page(Query(query): Query<UnauthorizedQuery>) -> maud::Markup {
    views::page(
        "Not authorized",
        account_views::unauthorized(query.login.as_deref()),
    )
}
