//! Question selection: pure filtering and sampling over the user's activity
//! history. The database supplies candidate ids and activity rows; everything
//! here is deterministic given those inputs (plus the caller's RNG).

use std::collections::{BTreeMap, HashMap, HashSet};

use rand::seq::SliceRandom;
use rand::Rng;

use crate::db::{ActivityRow, CategoryCount};
use crate::names;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PhraseMode {
    /// Union of the per-phrase pools.
    #[default]
    Any,
    /// Intersection of the per-phrase pools.
    All,
}

impl PhraseMode {
    pub fn from_query(value: &str) -> Self {
        match value {
            "all" => Self::All,
            _ => Self::Any,
        }
    }
}

#[derive(Clone, Debug)]
pub struct SelectionFilter {
    pub included_categories: Vec<String>,
    pub excluded_categories: Vec<String>,
    pub phrases: Vec<String>,
    pub phrase_mode: PhraseMode,
    pub unseen_only: bool,
    pub min_rating: i32,
    pub max_rating: i32,
    pub not_mastered_only: bool,
    pub limit: usize,
}

impl Default for SelectionFilter {
    fn default() -> Self {
        Self {
            included_categories: Vec::new(),
            excluded_categories: Vec::new(),
            phrases: Vec::new(),
            phrase_mode: PhraseMode::Any,
            unseen_only: false,
            min_rating: names::MIN_RATING,
            max_rating: names::MAX_RATING,
            not_mastered_only: false,
            limit: names::DEFAULT_QUESTION_COUNT,
        }
    }
}

impl SelectionFilter {
    /// Clamp out-of-range values and enforce the unseen-vs-rating mutual
    /// exclusion the form promises: unseen-only wins, resetting the rating
    /// and mastery controls to their defaults.
    pub fn normalized(mut self) -> Self {
        self.limit = self
            .limit
            .clamp(names::MIN_QUESTION_COUNT, names::MAX_QUESTION_COUNT);
        self.min_rating = self.min_rating.clamp(names::MIN_RATING, names::MAX_RATING);
        self.max_rating = self.max_rating.clamp(self.min_rating, names::MAX_RATING);

        if self.unseen_only {
            self.min_rating = names::MIN_RATING;
            self.max_rating = names::MAX_RATING;
            self.not_mastered_only = false;
        }

        self.phrases.retain(|p| !p.trim().is_empty());
        self
    }

    fn rating_filters_active(&self) -> bool {
        self.not_mastered_only
            || self.min_rating > names::MIN_RATING
            || self.max_rating < names::MAX_RATING
    }
}

/// Per-question aggregate of the user's history.
#[derive(Clone, Copy, Debug, Default)]
pub struct QuestionHistory {
    pub rating_sum: i64,
    pub attempts: u32,
    pub mastered: bool,
}

impl QuestionHistory {
    pub fn average_rating(&self) -> f64 {
        if self.attempts == 0 {
            0.0
        } else {
            self.rating_sum as f64 / self.attempts as f64
        }
    }
}

pub fn aggregate_history(rows: &[ActivityRow]) -> HashMap<i32, QuestionHistory> {
    let mut stats: HashMap<i32, QuestionHistory> = HashMap::new();

    for row in rows {
        let entry = stats.entry(row.question_id).or_default();
        entry.rating_sum += i64::from(row.user_rating);
        entry.attempts += 1;
        if row.is_correct {
            entry.mastered = true;
        }
    }

    stats
}

/// Collapse a raw category label: trim, squeeze inner whitespace, and fall
/// back to "General" for empty or missing labels.
pub fn normalize_category(raw: Option<&str>) -> String {
    let collapsed = raw
        .unwrap_or("")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");

    if collapsed.is_empty() {
        "General".to_string()
    } else {
        collapsed
    }
}

/// Merge raw per-category counts under their normalized labels. Distinct raw
/// spellings of the same label (and all empty ones) collapse into one entry.
pub fn merge_category_counts(counts: &[CategoryCount]) -> BTreeMap<String, i64> {
    let mut merged = BTreeMap::new();
    for count in counts {
        let name = normalize_category(count.cat_name.as_deref());
        *merged.entry(name).or_insert(0) += count.q_count;
    }
    merged
}

/// Resolve the target category set. `None` means "no category restriction".
/// Explicit includes win; otherwise excludes subtract from the available set.
pub fn resolve_categories(
    filter: &SelectionFilter,
    available: &[String],
) -> Option<Vec<String>> {
    if !filter.included_categories.is_empty() {
        return Some(filter.included_categories.clone());
    }

    if !filter.excluded_categories.is_empty() {
        let excluded: HashSet<&str> = filter
            .excluded_categories
            .iter()
            .map(String::as_str)
            .collect();
        return Some(
            available
                .iter()
                .filter(|c| !excluded.contains(c.as_str()))
                .cloned()
                .collect(),
        );
    }

    None
}

/// Candidate ids after the category step: all questions whose normalized
/// category is in the target set (or simply all of them).
pub fn category_candidates(
    questions: &[(i32, Option<String>)],
    target: Option<&[String]>,
) -> Vec<i32> {
    match target {
        None => questions.iter().map(|(id, _)| *id).collect(),
        Some(cats) => {
            let wanted: HashSet<&str> = cats.iter().map(String::as_str).collect();
            questions
                .iter()
                .filter(|(_, cat)| wanted.contains(normalize_category(cat.as_deref()).as_str()))
                .map(|(id, _)| *id)
                .collect()
        }
    }
}

/// Combine the per-phrase id pools. The phrase pool, when present, overrides
/// the category pool entirely.
pub fn combine_phrase_pools(pools: Vec<HashSet<i32>>, mode: PhraseMode) -> HashSet<i32> {
    let mut iter = pools.into_iter();
    let Some(first) = iter.next() else {
        return HashSet::new();
    };

    match mode {
        PhraseMode::Any => iter.fold(first, |mut acc, pool| {
            acc.extend(pool);
            acc
        }),
        PhraseMode::All => iter.fold(first, |acc, pool| &acc & &pool),
    }
}

/// Apply the history-based step to the candidate pool: unseen-only subtracts
/// every seen question; otherwise the pool narrows to seen questions whose
/// average rating sits in range (and, optionally, were never correct).
pub fn build_pool(
    candidates: Vec<i32>,
    history: &HashMap<i32, QuestionHistory>,
    filter: &SelectionFilter,
) -> Vec<i32> {
    if filter.unseen_only {
        return candidates
            .into_iter()
            .filter(|id| !history.contains_key(id))
            .collect();
    }

    if !filter.rating_filters_active() {
        return candidates;
    }

    candidates
        .into_iter()
        .filter(|id| match history.get(id) {
            None => false,
            Some(stats) => {
                let avg = stats.average_rating();
                let in_range =
                    avg >= f64::from(filter.min_rating) && avg <= f64::from(filter.max_rating);
                let mastery_ok = !filter.not_mastered_only || !stats.mastered;
                in_range && mastery_ok
            }
        })
        .collect()
}

/// Uniform sample of up to `limit` ids: Fisher-Yates shuffle, then truncate.
pub fn sample(mut pool: Vec<i32>, limit: usize, rng: &mut impl Rng) -> Vec<i32> {
    pool.shuffle(rng);
    pool.truncate(limit);
    pool
}

/// Set-equality correctness: the submitted subset must match the correct
/// subset exactly, independent of order and duplicates.
pub fn is_correct_selection(selected: &[String], correct: &[String]) -> bool {
    let selected: HashSet<&str> = selected.iter().map(String::as_str).collect();
    let correct: HashSet<&str> = correct.iter().map(String::as_str).collect();
    selected == correct
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    fn row(question_id: i32, is_correct: bool, user_rating: i32) -> ActivityRow {
        ActivityRow {
            question_id,
            is_correct,
            user_rating,
        }
    }

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn correctness_is_order_and_duplicate_independent() {
        let correct = strings(&["a", "b"]);

        assert!(is_correct_selection(&strings(&["b", "a"]), &correct));
        assert!(is_correct_selection(&strings(&["a", "b", "a"]), &correct));
        assert!(!is_correct_selection(&strings(&["a"]), &correct));
        assert!(!is_correct_selection(&strings(&["a", "b", "c"]), &correct));
        assert!(!is_correct_selection(&[], &correct));
    }

    #[test]
    fn empty_selection_matches_no_correct_answers() {
        assert!(is_correct_selection(&[], &[]));
    }

    #[test]
    fn includes_win_over_excludes() {
        let available = strings(&["A", "B", "C"]);
        let filter = SelectionFilter {
            included_categories: strings(&["B"]),
            excluded_categories: strings(&["C"]),
            ..Default::default()
        };

        assert_eq!(
            resolve_categories(&filter, &available),
            Some(strings(&["B"]))
        );
    }

    #[test]
    fn excluding_a_strict_subset_never_yields_empty() {
        let available = strings(&["A", "B", "C"]);
        let filter = SelectionFilter {
            excluded_categories: strings(&["B"]),
            ..Default::default()
        };

        assert_eq!(
            resolve_categories(&filter, &available),
            Some(strings(&["A", "C"]))
        );
    }

    #[test]
    fn no_selection_means_no_restriction() {
        let filter = SelectionFilter::default();
        assert_eq!(resolve_categories(&filter, &strings(&["A"])), None);
    }

    #[test]
    fn category_candidates_normalize_labels() {
        let questions = vec![
            (1, Some("  Allergy   and  Immunology ".to_string())),
            (2, Some("Cardiology".to_string())),
            (3, None),
            (4, Some("   ".to_string())),
        ];

        let target = strings(&["Allergy and Immunology", "General"]);
        assert_eq!(
            category_candidates(&questions, Some(target.as_slice())),
            vec![1, 3, 4]
        );
        assert_eq!(category_candidates(&questions, None), vec![1, 2, 3, 4]);
    }

    #[test]
    fn category_counts_merge_under_normalized_labels() {
        let counts = vec![
            CategoryCount {
                cat_name: Some("Cardio".to_string()),
                q_count: 3,
            },
            CategoryCount {
                cat_name: Some("  Cardio ".to_string()),
                q_count: 2,
            },
            CategoryCount {
                cat_name: None,
                q_count: 1,
            },
            CategoryCount {
                cat_name: Some("  ".to_string()),
                q_count: 4,
            },
        ];

        let merged = merge_category_counts(&counts);
        assert_eq!(merged.get("Cardio"), Some(&5));
        assert_eq!(merged.get("General"), Some(&5));
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn phrase_pools_combine_by_union_or_intersection() {
        let pools = || {
            vec![
                HashSet::from([1, 2, 3]),
                HashSet::from([2, 3, 4]),
            ]
        };

        assert_eq!(
            combine_phrase_pools(pools(), PhraseMode::Any),
            HashSet::from([1, 2, 3, 4])
        );
        assert_eq!(
            combine_phrase_pools(pools(), PhraseMode::All),
            HashSet::from([2, 3])
        );
        assert!(combine_phrase_pools(Vec::new(), PhraseMode::Any).is_empty());
    }

    #[test]
    fn unseen_only_subtracts_all_seen_questions() {
        let history = aggregate_history(&[row(1, false, 2), row(3, true, 4)]);
        let filter = SelectionFilter {
            unseen_only: true,
            ..Default::default()
        }
        .normalized();

        assert_eq!(build_pool(vec![1, 2, 3, 4], &history, &filter), vec![2, 4]);
    }

    #[test]
    fn default_rating_range_keeps_whole_candidate_pool() {
        let history = aggregate_history(&[row(1, false, 2)]);
        let filter = SelectionFilter::default().normalized();

        // No rating/mastery controls touched: the pool passes through.
        assert_eq!(build_pool(vec![1, 2, 3], &history, &filter), vec![1, 2, 3]);
    }

    #[test]
    fn rating_range_filters_on_average_of_all_attempts() {
        // Question 1 averages 2.0, question 2 averages 3.5, question 3 unseen.
        let history = aggregate_history(&[
            row(1, false, 1),
            row(1, false, 3),
            row(2, false, 3),
            row(2, false, 4),
        ]);
        let filter = SelectionFilter {
            min_rating: 3,
            max_rating: 4,
            ..Default::default()
        }
        .normalized();

        assert_eq!(build_pool(vec![1, 2, 3], &history, &filter), vec![2]);
    }

    #[test]
    fn not_mastered_excludes_ever_correct_questions() {
        let history = aggregate_history(&[row(1, true, 2), row(1, false, 2), row(2, false, 2)]);
        let filter = SelectionFilter {
            not_mastered_only: true,
            ..Default::default()
        }
        .normalized();

        assert_eq!(build_pool(vec![1, 2], &history, &filter), vec![2]);
    }

    #[test]
    fn unseen_only_resets_rating_and_mastery_controls() {
        let filter = SelectionFilter {
            unseen_only: true,
            min_rating: 2,
            max_rating: 3,
            not_mastered_only: true,
            ..Default::default()
        }
        .normalized();

        assert_eq!(filter.min_rating, names::MIN_RATING);
        assert_eq!(filter.max_rating, names::MAX_RATING);
        assert!(!filter.not_mastered_only);
    }

    #[test]
    fn limit_and_ratings_are_clamped() {
        let filter = SelectionFilter {
            limit: 10_000,
            min_rating: -3,
            max_rating: 99,
            ..Default::default()
        }
        .normalized();

        assert_eq!(filter.limit, names::MAX_QUESTION_COUNT);
        assert_eq!(filter.min_rating, names::MIN_RATING);
        assert_eq!(filter.max_rating, names::MAX_RATING);
    }

    #[test]
    fn sample_returns_min_of_limit_and_pool_size_unique_ids() {
        let mut rng = StdRng::seed_from_u64(7);

        let picked = sample((1..=20).collect(), 5, &mut rng);
        assert_eq!(picked.len(), 5);
        let unique: HashSet<i32> = picked.iter().copied().collect();
        assert_eq!(unique.len(), picked.len());

        let small = sample(vec![1, 2, 3], 5, &mut rng);
        assert_eq!(small.len(), 3);
    }

    #[test]
    fn sample_is_deterministic_for_a_seeded_rng() {
        let a = sample((1..=10).collect(), 4, &mut StdRng::seed_from_u64(42));
        let b = sample((1..=10).collect(), 4, &mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }
}
