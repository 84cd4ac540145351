mod common;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
};
use cramdeck::{names, router};
use tower::ServiceExt;

fn app() -> axum::Router {
    router(common::create_test_state())
}

#[tokio::test]
async fn protected_routes_redirect_to_login_without_a_session() {
    let app = app();

    let cases = [
        (Method::GET, "/", Body::empty()),
        (Method::GET, "/practice", Body::empty()),
        (Method::GET, "/analytics", Body::empty()),
        (Method::GET, "/history", Body::empty()),
        (Method::GET, "/api/questions", Body::empty()),
        (Method::POST, "/quiz/submit", Body::from("qid=1")),
        (
            Method::POST,
            "/practice/generate",
            Body::from("limit=5"),
        ),
    ];

    for (method, uri, body) in cases {
        let req = Request::builder()
            .method(method.clone())
            .uri(uri)
            .header(
                header::CONTENT_TYPE,
                "application/x-www-form-urlencoded",
            )
            .body(body)
            .expect("request build should succeed");

        let resp = app
            .clone()
            .oneshot(req)
            .await
            .expect("router should respond");

        assert_eq!(
            resp.status(),
            StatusCode::SEE_OTHER,
            "{method} {uri} should redirect when unauthenticated"
        );
        let location = resp
            .headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok());
        assert_eq!(
            location,
            Some(names::LOGIN_URL),
            "{method} {uri} should redirect to the sign-in page"
        );
    }
}

#[tokio::test]
async fn public_pages_render_without_a_session() {
    for uri in [names::LOGIN_URL, names::UNAUTHORIZED_URL] {
        let resp = app()
            .oneshot(
                Request::builder()
                    .uri(uri)
                    .body(Body::empty())
                    .expect("request build should succeed"),
            )
            .await
            .expect("router should respond");

        assert_eq!(resp.status(), StatusCode::OK, "{uri} should be public");
    }
}

#[tokio::test]
async fn github_redirect_points_at_the_authorize_endpoint() {
    let resp = app()
        .oneshot(
            Request::builder()
                .uri(names::GITHUB_AUTH_URL)
                .body(Body::empty())
                .expect("request build should succeed"),
        )
        .await
        .expect("router should respond");

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);

    let location = resp
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .expect("redirect should carry a location");
    assert!(location.starts_with("https://github.com/login/oauth/authorize"));
    assert!(location.contains("client_id=test-client-id"));

    // The state nonce must be mirrored into a cookie for the callback check.
    let cookie = resp
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .expect("redirect should set the state cookie");
    assert!(cookie.starts_with(names::OAUTH_STATE_COOKIE_NAME));
}

#[tokio::test]
async fn callback_without_a_code_is_a_bad_request() {
    let resp = app()
        .oneshot(
            Request::builder()
                .uri(names::OAUTH_CALLBACK_URL)
                .body(Body::empty())
                .expect("request build should succeed"),
        )
        .await
        .expect("router should respond");

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn static_stylesheet_is_served() {
    let resp = app()
        .oneshot(
            Request::builder()
                .uri("/static/index.css")
                .body(Body::empty())
                .expect("request build should succeed"),
        )
        .await
        .expect("router should respond");

    assert_eq!(resp.status(), StatusCode::OK);
    let content_type = resp
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok());
    assert_eq!(content_type, Some("text/css"));
}
