use std::collections::HashMap;

use axum::{
    extract::{RawForm, State},
    routing::post,
    Json, Router,
};
use axum_extra::extract::Form;
use maud::Markup;
use serde::{Deserialize, Serialize};

use crate::{
    db::{NewActivity, QuestionModel},
    extractors::AuthGuard,
    names,
    rejections::{AppError, ResultExt},
    selection::is_correct_selection,
    services::activity::{plan_satisfaction_change, SatisfactionAction},
    views,
    views::quiz as quiz_views,
    AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(names::QUIZ_SUBMIT_URL, post(submit_all))
        .route(names::SATISFACTION_URL, post(update_satisfaction))
}

/// One quiz submission: question order, per-question selections and
/// confidence ratings, plus the elapsed timer value.
struct SubmittedQuiz {
    order: Vec<i32>,
    selections: HashMap<i32, Vec<String>>,
    ratings: HashMap<i32, i32>,
    elapsed_seconds: i64,
}

/// The quiz form carries dynamic field names (`sel-{id}`, `rating-{id}`),
/// so the body is parsed by hand rather than through serde.
fn parse_submission(body: &[u8]) -> Result<SubmittedQuiz, AppError> {
    let body_str =
        std::str::from_utf8(body).map_err(|_| AppError::Input("body is not valid UTF-8"))?;

    let mut submission = SubmittedQuiz {
        order: Vec::new(),
        selections: HashMap::new(),
        ratings: HashMap::new(),
        elapsed_seconds: 0,
    };

    for pair in body_str.split('&') {
        let Some((key, value)) = pair.split_once('=') else {
            continue;
        };
        let key = decode_component(key)?;
        let value = decode_component(value)?;

        if key == "qid" {
            let id: i32 = value
                .parse()
                .map_err(|_| AppError::Input("bad question id"))?;
            submission.order.push(id);
        } else if key == "elapsed" {
            submission.elapsed_seconds = value.parse().unwrap_or(0);
        } else if let Some(id) = key.strip_prefix("sel-") {
            let id: i32 = id.parse().map_err(|_| AppError::Input("bad question id"))?;
            submission.selections.entry(id).or_default().push(value);
        } else if let Some(id) = key.strip_prefix("rating-") {
            let id: i32 = id.parse().map_err(|_| AppError::Input("bad question id"))?;
            if let Ok(rating) = value.parse::<i32>() {
                if (names::MIN_RATING..=names::MAX_RATING).contains(&rating) {
                    submission.ratings.insert(id, rating);
                }
            }
        }
    }

    Ok(submission)
}

fn decode_component(raw: &str) -> Result<String, AppError> {
    // Form encoding turns spaces into '+' before percent-encoding the rest.
    let plus_decoded = raw.replace('+', " ");
    Ok(urlencoding::decode(&plus_decoded)
        .map_err(|_| AppError::Input("malformed form encoding"))?
        .into_owned())
}

async fn submit_all(
    AuthGuard(user): AuthGuard,
    State(state): State<AppState>,
    RawForm(body): RawForm,
) -> Result<Markup, AppError> {
    let submission = parse_submission(&body)?;

    if submission.order.is_empty() {
        return Err(AppError::Input("no questions submitted"));
    }

    let questions = state
        .db
        .get_questions_in_order(&submission.order)
        .await
        .reject("could not load questions")?;

    let empty = Vec::new();
    let user_email = user.activity_identity();

    // Correctness for every question; persistence only for the rated ones.
    let graded: Vec<(&QuestionModel, &Vec<String>, bool)> = questions
        .iter()
        .map(|question| {
            let selected = submission.selections.get(&question.id).unwrap_or(&empty);
            let is_correct = is_correct_selection(selected, &question.correct_answers);
            (question, selected, is_correct)
        })
        .collect();

    let to_insert: Vec<NewActivity<'_>> = graded
        .iter()
        .filter_map(|(question, selected, is_correct)| {
            submission
                .ratings
                .get(&question.id)
                .map(|rating| NewActivity {
                    question_id: question.id,
                    user_email,
                    is_correct: *is_correct,
                    user_rating: *rating,
                    satisfaction_rating: None,
                    submitted_answer: selected.as_slice(),
                })
        })
        .collect();

    let inserted = state
        .db
        .insert_activities(&to_insert)
        .await
        .reject("could not record activity")?;
    let activity_ids: HashMap<i32, i32> = inserted.into_iter().collect();

    // Unrated questions still count toward the denominator and the score.
    let score = graded.iter().filter(|(_, _, is_correct)| *is_correct).count();

    let results: Vec<quiz_views::QuestionResult> = graded
        .into_iter()
        .map(|(question, selected, is_correct)| quiz_views::QuestionResult {
            activity_id: activity_ids.get(&question.id).copied(),
            rating: submission.ratings.get(&question.id).copied(),
            question: question.clone(),
            selected: selected.clone(),
            is_correct,
        })
        .collect();

    Ok(views::page_with_user(
        "Results",
        &user.display_name,
        quiz_views::results(quiz_views::ResultsData {
            results,
            score,
            elapsed_seconds: submission.elapsed_seconds,
        }),
    ))
}

#[derive(Deserialize)]
struct SatisfactionForm {
    question_id: i32,
    #[serde(default)]
    activity_id: Option<i32>,
    #[serde(default)]
    value: Option<i32>,
    #[serde(default)]
    selected: Vec<String>,
}

#[derive(Serialize)]
struct SatisfactionResponse {
    activity_id: Option<i32>,
    satisfaction: Option<i32>,
}

async fn update_satisfaction(
    AuthGuard(user): AuthGuard,
    State(state): State<AppState>,
    Form(form): Form<SatisfactionForm>,
) -> Result<Json<SatisfactionResponse>, AppError> {
    let user_email = user.activity_identity();

    let current_record = match form.activity_id {
        Some(activity_id) => {
            let record = state
                .db
                .get_activity(activity_id)
                .await
                .reject("could not load activity record")?
                .ok_or(AppError::NotFound)?;
            if record.user_email != user_email {
                return Err(AppError::Unauthorized);
            }
            Some(record)
        }
        None => None,
    };

    let current = current_record.as_ref().map(|r| r.satisfaction_rating);

    match plan_satisfaction_change(current, form.value) {
        SatisfactionAction::Insert { value } => {
            let question = state
                .db
                .get_question(form.question_id)
                .await
                .reject("could not load question")?
                .ok_or(AppError::NotFound)?;
            let is_correct = is_correct_selection(&form.selected, &question.correct_answers);

            let activity_id = state
                .db
                .insert_activity(&NewActivity {
                    question_id: question.id,
                    user_email,
                    is_correct,
                    // A record created from a satisfaction click carries that
                    // value as its confidence rating too.
                    user_rating: value,
                    satisfaction_rating: Some(value),
                    submitted_answer: &form.selected,
                })
                .await
                .reject("could not insert activity record")?;

            Ok(Json(SatisfactionResponse {
                activity_id: Some(activity_id),
                satisfaction: Some(value),
            }))
        }
        SatisfactionAction::Update { value } => {
            let record = current_record.expect("update implies an existing record");
            state
                .db
                .update_satisfaction(record.id, value)
                .await
                .reject("could not update satisfaction")?;

            Ok(Json(SatisfactionResponse {
                activity_id: Some(record.id),
                satisfaction: Some(value),
            }))
        }
        SatisfactionAction::Delete => {
            let record = current_record.expect("delete implies an existing record");
            state
                .db
                .delete_activity(record.id)
                .await
                .reject("could not delete activity record")?;

            Ok(Json(SatisfactionResponse {
                activity_id: None,
                satisfaction: None,
            }))
        }
        SatisfactionAction::Noop => Ok(Json(SatisfactionResponse {
            activity_id: None,
            satisfaction: None,
        })),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn submission_parses_order_selections_and_ratings() {
        let body = b"qid=3&qid=7&sel-3=Answer+A&sel-3=Answer%20B&rating-3=4&elapsed=95";
        let parsed = parse_submission(body).unwrap();

        assert_eq!(parsed.order, vec![3, 7]);
        assert_eq!(
            parsed.selections.get(&3).unwrap(),
            &vec!["Answer A".to_string(), "Answer B".to_string()]
        );
        assert!(!parsed.selections.contains_key(&7));
        assert_eq!(parsed.ratings.get(&3), Some(&4));
        assert!(!parsed.ratings.contains_key(&7));
        assert_eq!(parsed.elapsed_seconds, 95);
    }

    #[test]
    fn out_of_range_ratings_are_ignored() {
        let body = b"qid=1&rating-1=9";
        let parsed = parse_submission(body).unwrap();
        assert!(parsed.ratings.is_empty());
    }

    #[test]
    fn malformed_question_ids_are_rejected() {
        assert!(parse_submission(b"qid=abc").is_err());
        assert!(parse_submission(b"sel-xyz=1").is_err());
    }
}
