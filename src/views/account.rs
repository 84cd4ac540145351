use maud::{html, Markup};

use crate::names;

pub fn login() -> Markup {
    html! {
        section."login-hero" {
            h1 { "Cramdeck" }
            p { "Pick questions, rate your confidence, find your blind spots." }
            a role="button" href=(names::GITHUB_AUTH_URL) {
                "Sign in with GitHub"
            }
        }
    }
}

pub fn unauthorized(login: Option<&str>) -> Markup {
    html! {
        h1 { "Not authorized" }
        @if let Some(login) = login {
            p { "The GitHub account " strong { (login) } " is not on the access list." }
        } @else {
            p { "This account is not on the access list." }
        }
        p { "Cramdeck is a private study tool; access is limited to a fixed set of accounts." }
        a href=(names::LOGIN_URL) { "Try a different account" }
    }
}
