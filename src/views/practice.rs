use maud::{html, Markup, PreEscaped};

use crate::names;
use crate::selection::SelectionFilter;

pub struct PracticeData {
    /// Normalized category labels with their question counts.
    pub categories: Vec<(String, i64)>,
    pub filter: SelectionFilter,
    pub no_results: bool,
}

// Keeps the unseen-only checkbox and the rating/mastery controls mutually
// exclusive, mirroring what the server enforces on submit.
const FILTER_EXCLUSION_SCRIPT: &str = r#"
function unseenToggled(cb) {
    if (cb.checked) {
        document.getElementById('min-rating').value = '1';
        document.getElementById('max-rating').value = '4';
        document.getElementById('not-mastered').checked = false;
    }
}
function ratingTouched() {
    document.getElementById('unseen-only').checked = false;
}
"#;

pub fn practice(data: PracticeData) -> Markup {
    let filter = &data.filter;

    html! {
        h1 { "Build a quiz" }

        @if data.no_results {
            div."banner banner-error" {
                "No questions found matching these filters. "
                "Try broadening your rating range or categories."
            }
        }

        form action=(names::GENERATE_URL) method="post" {
            article {
                h4 { "Categories" }
                p."hint" {
                    "Include wins over exclude; excluding alone means "
                    "\"everything except these\". Ignored while a phrase is set."
                }
                table."category-table" {
                    thead { tr {
                        th { "Category" }
                        th { "Questions" }
                        th { "Include" }
                        th { "Exclude" }
                    } }
                    tbody {
                        @for (category, count) in &data.categories {
                            tr {
                                td { (category) }
                                td { (count) }
                                td {
                                    @if filter.included_categories.contains(category) {
                                        input type="checkbox" name="include_cats" value=(category) checked;
                                    } @else {
                                        input type="checkbox" name="include_cats" value=(category);
                                    }
                                }
                                td {
                                    @if filter.excluded_categories.contains(category) {
                                        input type="checkbox" name="exclude_cats" value=(category) checked;
                                    } @else {
                                        input type="checkbox" name="exclude_cats" value=(category);
                                    }
                                }
                            }
                        }
                    }
                }
            }

            article {
                h4 { "Phrase search" }
                p."hint" { "When set, phrases take priority and categories are ignored." }
                div."filter-row" {
                    input type="text" name="phrases"
                          placeholder="Search phrases, comma separated"
                          value=(filter.phrases.join(", "));
                    select name="phrase_mode" {
                        option value="any" selected[matches!(filter.phrase_mode, crate::selection::PhraseMode::Any)] {
                            "Match any phrase"
                        }
                        option value="all" selected[matches!(filter.phrase_mode, crate::selection::PhraseMode::All)] {
                            "Match all phrases"
                        }
                    }
                }
            }

            article {
                h4 { "History filters" }
                div."filter-row" {
                    label {
                        @if filter.unseen_only {
                            input type="checkbox" id="unseen-only" name="unseen_only"
                                  onchange="unseenToggled(this)" checked;
                        } @else {
                            input type="checkbox" id="unseen-only" name="unseen_only"
                                  onchange="unseenToggled(this)";
                        }
                        " Unseen only"
                    }
                }
                div."filter-row" {
                    label {
                        "Average confidence from "
                        input type="number" id="min-rating" name="min_rating"
                              min=(names::MIN_RATING) max=(names::MAX_RATING)
                              value=(filter.min_rating) onchange="ratingTouched()";
                        " to "
                        input type="number" id="max-rating" name="max_rating"
                              min=(names::MIN_RATING) max=(names::MAX_RATING)
                              value=(filter.max_rating) onchange="ratingTouched()";
                    }
                    label {
                        @if filter.not_mastered_only {
                            input type="checkbox" id="not-mastered" name="not_mastered"
                                  onchange="ratingTouched()" checked;
                        } @else {
                            input type="checkbox" id="not-mastered" name="not_mastered"
                                  onchange="ratingTouched()";
                        }
                        " Never answered correctly"
                    }
                }
                p."hint" { "Touching a rating or mastery control turns off \"unseen only\", and vice versa." }
            }

            article {
                div."filter-row" {
                    label {
                        "Number of questions "
                        input type="number" name="limit"
                              min=(names::MIN_QUESTION_COUNT) max=(names::MAX_QUESTION_COUNT)
                              value=(filter.limit);
                    }
                    button type="submit" { "Generate quiz" }
                }
            }
        }

        script { (PreEscaped(FILTER_EXCLUSION_SCRIPT)) }
    }
}
