//! Satisfaction-edit semantics shared by the quiz results page and the
//! history view.

use crate::names;

/// What the store should do in response to a satisfaction edit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SatisfactionAction {
    /// No record yet: create one carrying this satisfaction value.
    Insert { value: i32 },
    /// Update the existing record's satisfaction field only.
    Update { value: i32 },
    /// Clearing the last meaningful rating deletes the record outright.
    Delete,
    Noop,
}

/// Decide the store action for a satisfaction edit.
///
/// `current` is `None` when no activity record exists, `Some(sat)` for an
/// existing record with satisfaction `sat`. `requested` is `None` for an
/// explicit clear. Re-selecting the current value counts as a clear
/// (click-same-score-to-clear), and a clear against an existing record
/// deletes it.
pub fn plan_satisfaction_change(
    current: Option<Option<i32>>,
    requested: Option<i32>,
) -> SatisfactionAction {
    let requested = requested.filter(|v| (names::MIN_RATING..=names::MAX_RATING).contains(v));

    match (current, requested) {
        // Toggle-off: same score again clears, which means delete.
        (Some(Some(current_value)), Some(value)) if current_value == value => {
            SatisfactionAction::Delete
        }
        (Some(_), Some(value)) => SatisfactionAction::Update { value },
        (Some(_), None) => SatisfactionAction::Delete,
        (None, Some(value)) => SatisfactionAction::Insert { value },
        (None, None) => SatisfactionAction::Noop,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn setting_a_value_with_no_record_inserts() {
        assert_eq!(
            plan_satisfaction_change(None, Some(3)),
            SatisfactionAction::Insert { value: 3 }
        );
    }

    #[test]
    fn changing_an_existing_value_updates_in_place() {
        assert_eq!(
            plan_satisfaction_change(Some(Some(2)), Some(4)),
            SatisfactionAction::Update { value: 4 }
        );
        assert_eq!(
            plan_satisfaction_change(Some(None), Some(1)),
            SatisfactionAction::Update { value: 1 }
        );
    }

    #[test]
    fn clearing_an_existing_record_deletes_it() {
        assert_eq!(
            plan_satisfaction_change(Some(Some(2)), None),
            SatisfactionAction::Delete
        );
    }

    #[test]
    fn reselecting_the_same_score_is_a_toggle_off_delete() {
        assert_eq!(
            plan_satisfaction_change(Some(Some(2)), Some(2)),
            SatisfactionAction::Delete
        );
    }

    #[test]
    fn clearing_with_no_record_does_nothing() {
        assert_eq!(plan_satisfaction_change(None, None), SatisfactionAction::Noop);
    }

    #[test]
    fn out_of_range_values_are_treated_as_clears() {
        assert_eq!(
            plan_satisfaction_change(Some(Some(2)), Some(9)),
            SatisfactionAction::Delete
        );
        assert_eq!(plan_satisfaction_change(None, Some(0)), SatisfactionAction::Noop);
    }
}
