use maud::{html, Markup};

use crate::analytics::{delusion_label, AnalyticsSummary, CategoryStat, SortMode, TrendPoint};
use crate::names;

pub struct AnalyticsData {
    pub summary: AnalyticsSummary,
    pub sort: SortMode,
    pub name_filter: String,
}

pub fn analytics(data: AnalyticsData) -> Markup {
    let summary = &data.summary;

    if summary.total_attempts == 0 {
        return html! {
            h1 { "Performance & Insights" }
            p { "Go tackle some questions to see your data!" }
            a role="button" href=(names::PRACTICE_URL) { "Start practicing" }
        };
    }

    html! {
        div."analytics-head" {
            h1 { "Performance & Insights" }
            span."streak-badge" { "\u{1F525} " (summary.streak_days) " Day Streak" }
        }

        section {
            h3 { "7-Day Accuracy Trend" }
            (trend_chart(&summary.trend))
        }

        div."sort-controls" {
            h2 { "Category Breakdown" }
            div."sort-buttons" {
                @for mode in SortMode::ALL {
                    @let href = format!("{}?sort={}", names::ANALYTICS_URL, mode.as_query());
                    @if *mode == data.sort {
                        a."sort-button active" href=(href) { (mode.label()) }
                    } @else {
                        a."sort-button" href=(href) { (mode.label()) }
                    }
                }
            }
            p."sort-description" { (data.sort.description()) }
        }

        form."filter-row" method="get" action=(names::ANALYTICS_URL) {
            input type="hidden" name="sort" value=(data.sort.as_query());
            input type="text" name="q" placeholder="Filter categories by name"
                  value=(data.name_filter);
            button type="submit" { "Filter" }
        }

        div."category-grid" {
            @for category in &summary.categories {
                (category_card(category, data.sort))
            }
        }
    }
}

fn trend_chart(trend: &[TrendPoint]) -> Markup {
    html! {
        div."trend-chart" {
            @for point in trend {
                div."trend-column" {
                    span."trend-value" { (format!("{:.0}%", point.accuracy)) }
                    div."trend-bar" style=(format!("height: {}%;", point.accuracy.max(4.0))) {}
                    span."trend-date" { (point.date.format("%b %d")) }
                }
            }
        }
    }
}

fn category_card(category: &CategoryStat, sort: SortMode) -> Markup {
    let (delusion_text, delusion_color) = delusion_label(category.delusion);
    let seen_pct = if category.total_in_db > 0 {
        category.seen_count as f64 * 100.0 / category.total_in_db as f64
    } else {
        0.0
    };
    let mastered_pct = category.mastery_ratio() * 100.0;

    html! {
        article."category-card" {
            @if sort == SortMode::Urgency && category.urgency > 2.0 {
                span."priority-badge" { "PRIORITY" }
            }

            div."card-head" {
                strong { (category.name) }
                span."accuracy" { (format!("{:.0}%", category.accuracy)) }
            }

            div."bar" {
                div."bar-fill accuracy-fill" style=(format!("width: {}%;", category.accuracy)) {}
            }

            div."card-stats" {
                span { "Avg Confidence: " strong { (format!("{:.1}", category.avg_rating)) "/" (names::MAX_RATING) } }
                span { "Seen: " strong { (category.seen_count) "/" (category.total_in_db) } }
            }
            div."card-stats" {
                span { "Mastered: " strong { (category.mastered_count) "/" (category.total_in_db) } }
                @if let Some(satisfaction) = category.avg_satisfaction {
                    span { "Avg Satisfaction: " strong { (format!("{satisfaction:.1}")) } }
                }
            }

            div."bar thin" {
                div."bar-fill seen-fill" style=(format!("width: {seen_pct}%;")) {}
                div."bar-fill mastered-fill" style=(format!("width: {mastered_pct}%;")) {}
            }

            div."card-foot" {
                span."muted" { (category.volume) " Total Attempts" }
                span style=(format!("color: {delusion_color}; font-weight: bold;")) {
                    "Index: " (format!("{:.0}", category.delusion)) " (" (delusion_text) ")"
                }
            }
        }
    }
}
