//! Analytics: per-category aggregates, the 7-day accuracy trend and the
//! daily streak, all recomputed from activity rows on every view load.

use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::NaiveDate;

use crate::db::AnalyticsRow;
use crate::names;
use crate::selection::normalize_category;

#[derive(Clone, Debug)]
pub struct CategoryStat {
    pub name: String,
    /// Total attempt count, not distinct questions.
    pub volume: u32,
    pub accuracy: f64,
    pub avg_rating: f64,
    pub avg_satisfaction: Option<f64>,
    pub seen_count: usize,
    pub mastered_count: usize,
    pub total_in_db: i64,
    pub delusion: f64,
    pub urgency: f64,
}

impl CategoryStat {
    pub fn mastery_ratio(&self) -> f64 {
        if self.total_in_db == 0 {
            0.0
        } else {
            self.mastered_count as f64 / self.total_in_db as f64
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub accuracy: f64,
}

pub struct AnalyticsSummary {
    pub total_attempts: usize,
    pub streak_days: u32,
    pub categories: Vec<CategoryStat>,
    pub trend: Vec<TrendPoint>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortMode {
    Alphabetical,
    Worst,
    Best,
    #[default]
    Urgency,
    Mastery,
    Frustration,
}

impl SortMode {
    pub const ALL: &'static [SortMode] = &[
        SortMode::Urgency,
        SortMode::Mastery,
        SortMode::Worst,
        SortMode::Best,
        SortMode::Frustration,
        SortMode::Alphabetical,
    ];

    pub fn from_query(value: &str) -> Self {
        match value {
            "alpha" => Self::Alphabetical,
            "worst" => Self::Worst,
            "best" => Self::Best,
            "mastery" => Self::Mastery,
            "frustration" => Self::Frustration,
            _ => Self::Urgency,
        }
    }

    pub fn as_query(&self) -> &'static str {
        match self {
            Self::Alphabetical => "alpha",
            Self::Worst => "worst",
            Self::Best => "best",
            Self::Urgency => "urgency",
            Self::Mastery => "mastery",
            Self::Frustration => "frustration",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Alphabetical => "A-Z",
            Self::Worst => "Worst",
            Self::Best => "Best",
            Self::Urgency => "Urgency",
            Self::Mastery => "Mastery",
            Self::Frustration => "Frustration",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Urgency => {
                "Focus here: high confidence but low accuracy. These are your blind spots."
            }
            Self::Worst => "Your lowest scoring subjects, for heavy-lifting review sessions.",
            Self::Best => "Your strongest subjects, for a quick confidence boost.",
            Self::Alphabetical => "Simple A-Z list to find a specific category quickly.",
            Self::Mastery => {
                "High mastery means you've answered most questions correctly at least once."
            }
            Self::Frustration => "Lowest satisfaction first: the material that annoys you most.",
        }
    }
}

struct CategoryAccumulator {
    total: u32,
    correct: u32,
    rating_sum: i64,
    satisfaction_sum: i64,
    satisfaction_count: u32,
    seen: HashSet<i32>,
    mastered: HashSet<i32>,
}

impl CategoryAccumulator {
    fn new() -> Self {
        Self {
            total: 0,
            correct: 0,
            rating_sum: 0,
            satisfaction_sum: 0,
            satisfaction_count: 0,
            seen: HashSet::new(),
            mastered: HashSet::new(),
        }
    }
}

pub fn summarize(
    rows: &[AnalyticsRow],
    totals: &HashMap<String, i64>,
    today: NaiveDate,
) -> AnalyticsSummary {
    let mut per_category: HashMap<String, CategoryAccumulator> = HashMap::new();
    let mut active_days: HashSet<NaiveDate> = HashSet::new();
    let mut per_day: BTreeMap<NaiveDate, (u32, u32)> = BTreeMap::new();

    for row in rows {
        let category = normalize_category(row.category.as_deref());
        let day = row.attempted_at.date_naive();
        active_days.insert(day);

        let acc = per_category
            .entry(category)
            .or_insert_with(CategoryAccumulator::new);
        acc.total += 1;
        acc.rating_sum += i64::from(row.user_rating);
        acc.seen.insert(row.question_id);
        if row.is_correct {
            acc.correct += 1;
            acc.mastered.insert(row.question_id);
        }
        if let Some(satisfaction) = row.satisfaction_rating {
            acc.satisfaction_sum += i64::from(satisfaction);
            acc.satisfaction_count += 1;
        }

        let day_entry = per_day.entry(day).or_insert((0, 0));
        day_entry.0 += 1;
        if row.is_correct {
            day_entry.1 += 1;
        }
    }

    let streak_days = streak(&active_days, today);

    // Seven most recent calendar days with any activity, oldest first.
    let mut trend: Vec<TrendPoint> = per_day
        .iter()
        .rev()
        .take(names::TREND_DAYS)
        .map(|(date, (total, correct))| TrendPoint {
            date: *date,
            accuracy: f64::from(*correct) * 100.0 / f64::from(*total),
        })
        .collect();
    trend.reverse();

    let categories = per_category
        .into_iter()
        .map(|(name, acc)| {
            let accuracy = f64::from(acc.correct) * 100.0 / f64::from(acc.total);
            let avg_rating = acc.rating_sum as f64 / f64::from(acc.total);
            let avg_satisfaction = if acc.satisfaction_count > 0 {
                Some(acc.satisfaction_sum as f64 / f64::from(acc.satisfaction_count))
            } else {
                None
            };
            let total_in_db = totals
                .get(&name)
                .copied()
                .unwrap_or(acc.seen.len() as i64);

            CategoryStat {
                delusion: avg_rating * names::RATING_SCALE - accuracy,
                urgency: avg_rating - accuracy / names::RATING_SCALE,
                name,
                volume: acc.total,
                accuracy,
                avg_rating,
                avg_satisfaction,
                seen_count: acc.seen.len(),
                mastered_count: acc.mastered.len(),
                total_in_db,
            }
        })
        .collect();

    AnalyticsSummary {
        total_attempts: rows.len(),
        streak_days,
        categories,
        trend,
    }
}

/// Consecutive calendar days with at least one record, walking backward from
/// today. A day without activity ends the streak, so a streak can be zero.
fn streak(active_days: &HashSet<NaiveDate>, today: NaiveDate) -> u32 {
    let mut streak = 0;
    let mut day = today;
    while active_days.contains(&day) {
        streak += 1;
        let Some(previous) = day.pred_opt() else {
            break;
        };
        day = previous;
    }
    streak
}

pub fn sort_categories(categories: &mut [CategoryStat], mode: SortMode) {
    match mode {
        SortMode::Alphabetical => categories.sort_by(|a, b| a.name.cmp(&b.name)),
        SortMode::Worst => categories.sort_by(|a, b| a.accuracy.total_cmp(&b.accuracy)),
        SortMode::Best => categories.sort_by(|a, b| b.accuracy.total_cmp(&a.accuracy)),
        SortMode::Urgency => categories.sort_by(|a, b| b.urgency.total_cmp(&a.urgency)),
        SortMode::Mastery => {
            categories.sort_by(|a, b| b.mastery_ratio().total_cmp(&a.mastery_ratio()))
        }
        SortMode::Frustration => categories.sort_by(|a, b| {
            // Categories without any satisfaction data sink to the bottom.
            let a_val = a.avg_satisfaction.unwrap_or(f64::INFINITY);
            let b_val = b.avg_satisfaction.unwrap_or(f64::INFINITY);
            a_val.total_cmp(&b_val)
        }),
    }
}

/// Human label and accent color for a delusion score.
pub fn delusion_label(score: f64) -> (&'static str, &'static str) {
    if score > 30.0 {
        ("Highly Delusional", "#ef4444")
    } else if score > 10.0 {
        ("Overconfident", "#f59e0b")
    } else if score < -15.0 {
        ("Imposter Syndrome", "#60a5fa")
    } else {
        ("Self-Aware", "#10b981")
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn row_on(
        day: NaiveDate,
        question_id: i32,
        category: &str,
        is_correct: bool,
        user_rating: i32,
        satisfaction_rating: Option<i32>,
    ) -> AnalyticsRow {
        AnalyticsRow {
            question_id,
            is_correct,
            user_rating,
            satisfaction_rating,
            attempted_at: Utc
                .from_utc_datetime(&day.and_hms_opt(12, 0, 0).unwrap()),
            category: Some(category.to_string()),
        }
    }

    #[test]
    fn category_stats_aggregate_accuracy_and_ratings() {
        let today = date(2026, 8, 6);
        let rows = vec![
            row_on(today, 1, "Cardio", true, 4, Some(3)),
            row_on(today, 1, "Cardio", false, 2, None),
            row_on(today, 2, "Cardio", false, 2, Some(1)),
        ];
        let totals = HashMap::from([("Cardio".to_string(), 10)]);

        let summary = summarize(&rows, &totals, today);
        assert_eq!(summary.total_attempts, 3);
        assert_eq!(summary.categories.len(), 1);

        let cardio = &summary.categories[0];
        assert_eq!(cardio.volume, 3);
        assert!((cardio.accuracy - 100.0 / 3.0).abs() < 1e-9);
        assert!((cardio.avg_rating - 8.0 / 3.0).abs() < 1e-9);
        assert_eq!(cardio.avg_satisfaction, Some(2.0));
        assert_eq!(cardio.seen_count, 2);
        assert_eq!(cardio.mastered_count, 1);
        assert_eq!(cardio.total_in_db, 10);
    }

    #[test]
    fn delusion_and_urgency_follow_the_rating_scale() {
        let today = date(2026, 8, 6);
        // Every answer wrong at full confidence: accuracy 0, avg rating 4.
        let rows = vec![
            row_on(today, 1, "Trap", false, 4, None),
            row_on(today, 2, "Trap", false, 4, None),
        ];

        let summary = summarize(&rows, &HashMap::new(), today);
        let trap = &summary.categories[0];
        assert!((trap.delusion - 100.0).abs() < 1e-9);
        assert!((trap.urgency - 4.0).abs() < 1e-9);
    }

    #[test]
    fn unknown_category_total_falls_back_to_seen_count() {
        let today = date(2026, 8, 6);
        let rows = vec![
            row_on(today, 1, "Misc", true, 3, None),
            row_on(today, 2, "Misc", true, 3, None),
        ];

        let summary = summarize(&rows, &HashMap::new(), today);
        assert_eq!(summary.categories[0].total_in_db, 2);
    }

    #[test]
    fn streak_counts_consecutive_days_back_from_today() {
        let today = date(2026, 8, 6);
        let rows = vec![
            row_on(today, 1, "A", true, 3, None),
            row_on(date(2026, 8, 5), 2, "A", false, 3, None),
            row_on(date(2026, 8, 4), 3, "A", true, 3, None),
            // Gap on the 3rd breaks the chain.
            row_on(date(2026, 8, 2), 4, "A", true, 3, None),
        ];

        let summary = summarize(&rows, &HashMap::new(), today);
        assert_eq!(summary.streak_days, 3);
    }

    #[test]
    fn streak_is_zero_without_activity_today() {
        let today = date(2026, 8, 6);
        let rows = vec![row_on(date(2026, 8, 5), 1, "A", true, 3, None)];

        let summary = summarize(&rows, &HashMap::new(), today);
        assert_eq!(summary.streak_days, 0);
    }

    #[test]
    fn trend_keeps_the_seven_most_recent_days_oldest_first() {
        let today = date(2026, 8, 10);
        let mut rows = Vec::new();
        for d in 1..=9 {
            rows.push(row_on(date(2026, 8, d), d as i32, "A", d % 2 == 0, 3, None));
        }

        let summary = summarize(&rows, &HashMap::new(), today);
        assert_eq!(summary.trend.len(), names::TREND_DAYS);
        assert_eq!(summary.trend.first().unwrap().date, date(2026, 8, 3));
        assert_eq!(summary.trend.last().unwrap().date, date(2026, 8, 9));

        // Even days were answered correctly.
        assert!((summary.trend.last().unwrap().accuracy - 0.0).abs() < 1e-9);
        assert!((summary.trend[1].accuracy - 100.0).abs() < 1e-9);
    }

    fn stat(name: &str, accuracy: f64, avg_rating: f64, avg_satisfaction: Option<f64>) -> CategoryStat {
        CategoryStat {
            name: name.to_string(),
            volume: 1,
            accuracy,
            avg_rating,
            avg_satisfaction,
            seen_count: 1,
            mastered_count: 1,
            total_in_db: 2,
            delusion: avg_rating * names::RATING_SCALE - accuracy,
            urgency: avg_rating - accuracy / names::RATING_SCALE,
        }
    }

    #[test]
    fn sort_modes_order_as_documented() {
        let mut cats = vec![
            stat("B", 80.0, 2.0, Some(3.0)),
            stat("A", 20.0, 4.0, None),
            stat("C", 50.0, 3.0, Some(1.0)),
        ];

        sort_categories(&mut cats, SortMode::Worst);
        assert_eq!(cats[0].name, "A");

        sort_categories(&mut cats, SortMode::Best);
        assert_eq!(cats[0].name, "B");

        sort_categories(&mut cats, SortMode::Urgency);
        assert_eq!(cats[0].name, "A");

        sort_categories(&mut cats, SortMode::Alphabetical);
        assert_eq!(cats[0].name, "A");
        assert_eq!(cats[2].name, "C");

        // Frustration: lowest satisfaction first, missing data last.
        sort_categories(&mut cats, SortMode::Frustration);
        assert_eq!(cats[0].name, "C");
        assert_eq!(cats[2].name, "A");
    }

    #[test]
    fn delusion_labels_cover_the_bands() {
        assert_eq!(delusion_label(45.0).0, "Highly Delusional");
        assert_eq!(delusion_label(15.0).0, "Overconfident");
        assert_eq!(delusion_label(0.0).0, "Self-Aware");
        assert_eq!(delusion_label(-30.0).0, "Imposter Syndrome");
    }
}
