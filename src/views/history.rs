use maud::{html, Markup};

use crate::db::{HistoryItem, HistorySort};
use crate::names;

pub struct HistoryData {
    pub items: Vec<HistoryItem>,
    pub categories: Vec<String>,
    pub status: Option<bool>,
    pub satisfaction: Option<i32>,
    pub selected_categories: Vec<String>,
    pub sort: HistorySort,
    pub page: i64,
    pub has_more: bool,
    /// Query string of the current page, used to return here after edits.
    pub query_string: String,
}

pub fn history(data: HistoryData) -> Markup {
    html! {
        h1 { "History & Review" }

        (filter_toolbar(&data))

        @if data.items.is_empty() {
            p."muted" { "No attempts match these filters." }
        }

        div."history-list" {
            @for item in &data.items {
                (history_card(item, &data.query_string))
            }
        }

        (pagination(&data))
    }
}

fn filter_toolbar(data: &HistoryData) -> Markup {
    html! {
        form."history-toolbar" method="get" action=(names::HISTORY_URL) {
            label {
                "Status"
                select name="status" {
                    option value="" selected[data.status.is_none()] { "All Results" }
                    option value="correct" selected[data.status == Some(true)] { "Correct" }
                    option value="incorrect" selected[data.status == Some(false)] { "Incorrect" }
                }
            }
            label {
                "Satisfaction"
                select name="satisfaction" {
                    option value="" selected[data.satisfaction.is_none()] { "All Scores" }
                    option value="1" selected[data.satisfaction == Some(1)] { "1 - Poor" }
                    option value="2" selected[data.satisfaction == Some(2)] { "2 - Fair" }
                    option value="3" selected[data.satisfaction == Some(3)] { "3 - Good" }
                    option value="4" selected[data.satisfaction == Some(4)] { "4 - Excellent" }
                }
            }
            label {
                "Sort"
                select name="sort" {
                    option value="newest" selected[data.sort == HistorySort::Newest] { "Newest" }
                    option value="oldest" selected[data.sort == HistorySort::Oldest] { "Oldest" }
                    option value="confidence" selected[data.sort == HistorySort::Confidence] { "Confidence" }
                    option value="satisfaction" selected[data.sort == HistorySort::Satisfaction] { "Satisfaction" }
                }
            }
            details."category-filter" {
                summary {
                    @if data.selected_categories.is_empty() {
                        "All Categories"
                    } @else {
                        (data.selected_categories.len()) " selected"
                    }
                }
                div."category-options" {
                    @for category in &data.categories {
                        label {
                            @if data.selected_categories.contains(category) {
                                input type="checkbox" name="cats" value=(category) checked;
                            } @else {
                                input type="checkbox" name="cats" value=(category);
                            }
                            (category)
                        }
                    }
                }
            }
            button type="submit" { "Apply" }
        }
    }
}

fn history_card(item: &HistoryItem, query_string: &str) -> Markup {
    let border_class = if item.is_correct {
        "history-card correct"
    } else {
        "history-card incorrect"
    };

    html! {
        article class=(border_class) {
            div."card-head" {
                div {
                    @if let Some(category) = &item.category {
                        span."category-chip" { (category) }
                    }
                    div."timestamp" { (item.attempted_at.format("%b %d, %Y %H:%M")) }
                }
                div."card-controls" {
                    span."confidence" {
                        "CONFIDENCE " strong { (item.user_rating) "/" (names::MAX_RATING) }
                    }
                    div."satisfaction-buttons" {
                        @for value in (names::MIN_RATING..=names::MAX_RATING) {
                            form method="post" action=(names::history_satisfaction_url(item.id)) {
                                input type="hidden" name="value" value=(value);
                                input type="hidden" name="return_to" value=(query_string);
                                @if item.satisfaction_rating == Some(value) {
                                    button."sat-button active" type="submit" { (value) }
                                } @else {
                                    button."sat-button" type="submit" { (value) }
                                }
                            }
                        }
                    }
                    form method="post" action=(names::history_delete_url(item.id))
                         onsubmit="return confirm('Delete this attempt?')" {
                        input type="hidden" name="return_to" value=(query_string);
                        button."delete-button" type="submit" { "\u{1F5D1}" }
                    }
                }
            }

            h3 { (item.question_text) }

            div."option-list" {
                @for option in &item.options {
                    @let was_selected = item.submitted_answer.contains(option);
                    @let is_answer = item.correct_answers.contains(option);
                    @let class = match (was_selected, is_answer) {
                        (true, true) => "option selected-correct",
                        (true, false) => "option selected-wrong",
                        (false, true) => "option missed-answer",
                        (false, false) => "option untouched",
                    };
                    div class=(class) {
                        (option)
                        @if was_selected {
                            span."your-answer" { " \u{25CF} YOUR ANSWER" }
                        }
                    }
                }
            }

            @if !item.explanation.is_empty() {
                div."explanation" {
                    strong { "EXPLANATION: " }
                    (item.explanation)
                }
            }
        }
    }
}

fn pagination(data: &HistoryData) -> Markup {
    html! {
        div."pagination" {
            @if data.page > 0 {
                a role="button" href=(page_url(data, data.page - 1)) { "Previous" }
            }
            span."muted" { "Page " (data.page + 1) }
            @if data.has_more {
                a role="button" href=(page_url(data, data.page + 1)) { "Next" }
            } @else if !data.items.is_empty() {
                span."muted" { "End of review history" }
            }
        }
    }
}

pub fn page_url(data: &HistoryData, page: i64) -> String {
    let mut url = format!("{}?page={page}", names::HISTORY_URL);
    match data.status {
        Some(true) => url.push_str("&status=correct"),
        Some(false) => url.push_str("&status=incorrect"),
        None => {}
    }
    if let Some(satisfaction) = data.satisfaction {
        url.push_str(&format!("&satisfaction={satisfaction}"));
    }
    for category in &data.selected_categories {
        url.push_str(&format!("&cats={}", urlencoding::encode(category)));
    }
    url.push_str(&format!("&sort={}", data.sort.as_query()));
    url
}
