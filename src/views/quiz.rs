use maud::{html, Markup, PreEscaped};

use crate::db::QuestionModel;
use crate::names;
use crate::utils;

pub struct QuizData {
    pub questions: Vec<QuestionModel>,
}

/// Per-question outcome shown on the results page.
pub struct QuestionResult {
    pub question: QuestionModel,
    pub selected: Vec<String>,
    pub is_correct: bool,
    pub rating: Option<i32>,
    pub activity_id: Option<i32>,
}

pub struct ResultsData {
    pub results: Vec<QuestionResult>,
    pub score: usize,
    pub elapsed_seconds: i64,
}

// Starts counting when the questions are on screen and freezes the value
// into the form on submit.
const TIMER_SCRIPT: &str = r#"
let seconds = 0;
const pad = n => String(n).padStart(2, '0');
setInterval(() => {
    seconds += 1;
    document.getElementById('elapsed-display').textContent =
        pad(Math.floor(seconds / 60)) + ':' + pad(seconds % 60);
    document.getElementById('elapsed-field').value = seconds;
}, 1000);
"#;

pub fn quiz(data: QuizData) -> Markup {
    html! {
        div."quiz-timer" { "\u{23F1} " span id="elapsed-display" { "00:00" } }

        form action=(names::QUIZ_SUBMIT_URL) method="post" {
            input type="hidden" id="elapsed-field" name="elapsed" value="0";

            @for (idx, question) in data.questions.iter().enumerate() {
                input type="hidden" name="qid" value=(question.id);

                article."question-card" {
                    h3 { (idx + 1) ". " (question.question_text) }

                    div."option-list" {
                        @for option in &question.options {
                            label."option" {
                                input type="checkbox"
                                      name=(format!("sel-{}", question.id))
                                      value=(option);
                                (option)
                            }
                        }
                    }

                    div."rating-row" {
                        span."hint" { "Confidence (1-4, leave blank to skip tracking)" }
                        div."rating-picker" {
                            @for value in (names::MIN_RATING..=names::MAX_RATING) {
                                label."rating-option" {
                                    input type="radio"
                                          name=(format!("rating-{}", question.id))
                                          value=(value);
                                    (value)
                                }
                            }
                        }
                    }
                }
            }

            @if data.questions.is_empty() {
                p { "Nothing to do here." }
            } @else {
                button."submit-all" type="submit" { "Submit All Answers" }
            }
        }

        script { (PreEscaped(TIMER_SCRIPT)) }
    }
}

// Drives the post-submission satisfaction pickers: every click posts the
// chosen value and the server answers with the record's new state.
const SATISFACTION_SCRIPT: &str = r#"
async function rateSatisfaction(button, questionId) {
    const picker = button.closest('.satisfaction-picker');
    const params = new URLSearchParams();
    params.append('question_id', questionId);
    if (picker.dataset.activityId) params.append('activity_id', picker.dataset.activityId);
    params.append('value', button.dataset.value);
    for (const opt of JSON.parse(picker.dataset.selected)) params.append('selected', opt);

    const resp = await fetch('/quiz/satisfaction', { method: 'POST', body: params });
    if (!resp.ok) {
        alert('Could not save your rating.');
        return;
    }
    const state = await resp.json();
    picker.dataset.activityId = state.activity_id ?? '';
    for (const b of picker.querySelectorAll('button')) {
        b.classList.toggle('active', Number(b.dataset.value) === state.satisfaction);
    }
    const chip = picker.closest('.question-card').querySelector('.tracked-chip');
    chip.textContent = state.activity_id ? '✓ SAVED' : 'NOT TRACKED';
    chip.classList.toggle('saved', !!state.activity_id);
}
"#;

pub fn results(data: ResultsData) -> Markup {
    let total = data.results.len();
    let percentage = if total > 0 {
        data.score as f64 * 100.0 / total as f64
    } else {
        0.0
    };

    html! {
        div."score-banner" {
            h2 { "Quiz Complete!" }
            p {
                "You scored " strong { (data.score) } "/" strong { (total) }
                " (" (format!("{percentage:.1}%")) ") in "
                (utils::format_elapsed(data.elapsed_seconds)) "."
            }
            div."score-bar" {
                div."score-bar-fill" style=(format!("width: {percentage}%;")) {}
            }
        }

        @for (idx, result) in data.results.iter().enumerate() {
            @let question = &result.question;
            article."question-card" {
                div."result-head" {
                    @if result.is_correct {
                        span."verdict correct" { "CORRECT" }
                    } @else {
                        span."verdict incorrect" { "INCORRECT" }
                    }
                    @if result.activity_id.is_some() {
                        span."tracked-chip saved" { "\u{2713} SAVED" }
                    } @else {
                        span."tracked-chip" { "NOT TRACKED" }
                    }
                }

                h3 { (idx + 1) ". " (question.question_text) }

                div."option-list" {
                    @for option in &question.options {
                        @let was_selected = result.selected.contains(option);
                        @let is_answer = question.correct_answers.contains(option);
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

                @if !question.explanation.is_empty() {
                    div."explanation" {
                        strong { "Explanation: " }
                        (question.explanation)
                    }
                }
                @if let Some(category) = &question.category {
                    p."category-chip" { (category) }
                }
                @if let Some(rating) = result.rating {
                    p."hint" { "You rated your confidence " (rating) "/" (names::MAX_RATING) "." }
                }

                div."rating-row" {
                    span."hint" { "Satisfaction (1-4, click again to clear)" }
                    div."satisfaction-picker"
                        data-activity-id=(result.activity_id.map(|id| id.to_string()).unwrap_or_default())
                        data-selected=(serde_json::to_string(&result.selected).unwrap_or_else(|_| "[]".to_string())) {
                        @for value in (names::MIN_RATING..=names::MAX_RATING) {
                            button type="button"
                                   data-value=(value)
                                   onclick=(format!("rateSatisfaction(this, {})", question.id)) {
                                (value)
                            }
                        }
                    }
                }
            }
        }

        a role="button" href=(names::PRACTICE_URL) { "Take Another Quiz" }

        script { (PreEscaped(SATISFACTION_SCRIPT)) }
    }
}
