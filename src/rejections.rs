use axum::{
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use maud::{html, Markup};

use crate::{names, views};

#[derive(Debug)]
pub enum AppError {
    Internal(&'static str),
    Unauthorized,
    Input(&'static str),
    NotFound,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            // Unauthenticated requests go back through the sign-in flow.
            AppError::Unauthorized => Redirect::to(names::LOGIN_URL).into_response(),
            AppError::Internal(message) => {
                (StatusCode::INTERNAL_SERVER_ERROR, error_page(message)).into_response()
            }
            AppError::Input(message) => {
                (StatusCode::BAD_REQUEST, error_page(message)).into_response()
            }
            AppError::NotFound => {
                (StatusCode::NOT_FOUND, error_page("not found")).into_response()
            }
        }
    }
}

fn error_page(message: &str) -> Markup {
    views::page(
        "Error",
        html! {
            h1 { "Something went wrong" }
            p { (message) }
            a href="/" { "Back to start" }
        },
    )
}

/// Log the underlying error and degrade to an `AppError` for the handler.
pub trait ResultExt<T> {
    fn reject(self, message: &'static str) -> Result<T, AppError>;
    fn reject_input(self, message: &'static str) -> Result<T, AppError>;
}

impl<T, E: std::fmt::Display> ResultExt<T> for Result<T, E> {
    fn reject(self, message: &'static str) -> Result<T, AppError> {
        self.map_err(|e| {
            tracing::error!("{message}: {e}");
            AppError::Internal(message)
        })
    }

    fn reject_input(self, message: &'static str) -> Result<T, AppError> {
        self.map_err(|e| {
            tracing::error!("{message}: {e}");
            AppError::Input(message)
        })
    }
}
