use maud::{html, Markup, DOCTYPE};

use crate::{names, utils};

fn css() -> Markup {
    html! {
        link rel="stylesheet" href="/static/index.css";
    }
}

fn icon() -> Markup {
    html! {
        link rel="icon" href="/static/img/icon.svg" type="image/svg+xml" {}
    }
}

fn header(user: Option<&str>) -> Markup {
    html! {
        header {
            nav {
                ul {
                    li."brand" {
                        a href="/" {
                            strong { "Cramdeck" }
                        }
                    }
                }
                ul {
                    @if user.is_some() {
                        li { a href=(names::PRACTICE_URL) { "Practice" } }
                        li { a href=(names::ANALYTICS_URL) { "Analytics" } }
                        li { a href=(names::HISTORY_URL) { "History" } }
                    }
                    @if let Some(name) = user {
                        li."secondary" { (name) }
                        li {
                            form action=(names::LOGOUT_URL) method="post" {
                                button."link-button" type="submit" { "Log out" }
                            }
                        }
                    }
                    li."secondary" { (utils::VERSION) }
                }
            }
        }
    }
}

fn main_section(body: Markup) -> Markup {
    html! {
        main { (body) }
    }
}

pub fn page(title: &str, body: Markup) -> Markup {
    shell(title, None, body)
}

pub fn page_with_user(title: &str, user: &str, body: Markup) -> Markup {
    shell(title, Some(user), body)
}

fn shell(title: &str, user: Option<&str>, body: Markup) -> Markup {
    html! {
        (DOCTYPE)
        head {
            meta charset="utf-8";
            meta name="viewport" content="width=device-width, initial-scale=1";
            meta name="color-scheme" content="light dark";

            (css())
            (icon())

            title { (format!("{title} - Cramdeck")) }
        }

        body."container" {
            (header(user))
            (main_section(body))
        }
    }
}
