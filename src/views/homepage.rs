use maud::{html, Markup};

use crate::names;

pub struct HomeData {
    pub display_name: String,
    pub questions_count: i64,
    pub attempts_count: usize,
    pub streak_days: u32,
}

pub fn home(data: HomeData) -> Markup {
    html! {
        h1 { "Welcome back, " (data.display_name) }

        @if data.streak_days > 0 {
            p."streak-badge" { "\u{1F525} " (data.streak_days) " day streak" }
        }

        div."home-grid" {
            article {
                h4 { "Practice" }
                p {
                    "Build a quiz from " strong { (data.questions_count) }
                    " questions by category, phrase or past performance."
                }
                a role="button" href=(names::PRACTICE_URL) { "Start practicing" }
            }
            article {
                h4 { "Analytics" }
                p {
                    "You have " strong { (data.attempts_count) }
                    " recorded attempts. See accuracy, confidence and blind spots per category."
                }
                a role="button" href=(names::ANALYTICS_URL) { "View insights" }
            }
            article {
                h4 { "History" }
                p { "Review, re-rate or delete past attempts one by one." }
                a role="button" href=(names::HISTORY_URL) { "Browse history" }
            }
        }
    }
}
