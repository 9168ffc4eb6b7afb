//! Muscle weekly summary
//!
//! Body weight, training volume, recovery and nutrition for the latest week.
//!
//! Two denominators are in play. Workout duration is averaged over the whole
//! week (missing days count as zero); every other average is over the
//! entries actually logged.

use crate::storage::coerce::finite;
use crate::storage::MuscleLog;
use crate::summary::window::{select_week, weekday_label, Denominator, Window};
use chrono::NaiveDate;
use serde::Serialize;

/// Denominator for the average workout duration
pub const DURATION_DENOMINATOR: Denominator = Denominator::Week;

/// Denominator for sleep, water and nutrition averages
pub const FIELD_DENOMINATOR: Denominator = Denominator::Entries;

/// Derived statistics for one week of muscle logs
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MuscleSummary {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub avg_weight: f64,
    /// Last entry's weight minus the first entry's weight
    pub weight_change: f64,
    /// Entries with a non-zero workout duration
    pub total_workouts: usize,
    pub total_duration: f64,
    pub avg_duration: f64,
    pub avg_sleep: f64,
    pub avg_water_intake: f64,
    pub avg_calories: f64,
    pub avg_protein: f64,
    pub avg_carbs: f64,
    pub avg_fat: f64,
    pub avg_fiber: f64,
    pub chart: Vec<MuscleChartPoint>,
}

/// One plotted day, in window order
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MuscleChartPoint {
    pub date: NaiveDate,
    pub day: String,
    pub weight: f64,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub sleep_hours: f64,
    pub water_intake: f64,
}

/// Summarize the latest week of `logs`; `None` when there are no logs
pub fn summarize(logs: &[MuscleLog]) -> Option<MuscleSummary> {
    select_week(logs).map(|window| summarize_window(&window))
}

/// Summarize an already selected window
pub fn summarize_window(window: &Window<'_, MuscleLog>) -> MuscleSummary {
    let logs = &window.entries;
    let count = logs.len();

    let total = |field: fn(&MuscleLog) -> f64| -> f64 {
        logs.iter().map(|log| finite(field(log))).sum()
    };
    let avg = |field: fn(&MuscleLog) -> f64| FIELD_DENOMINATOR.average(total(field), count);

    let first_weight = logs.first().map(|log| finite(log.weight)).unwrap_or(0.0);
    let last_weight = logs.last().map(|log| finite(log.weight)).unwrap_or(0.0);
    let total_duration = total(|log| f64::from(log.workout_duration));

    MuscleSummary {
        start_date: window.start_date(),
        end_date: window.latest,
        avg_weight: avg(|log| log.weight),
        weight_change: last_weight - first_weight,
        total_workouts: logs.iter().filter(|log| log.workout_duration > 0).count(),
        total_duration,
        avg_duration: DURATION_DENOMINATOR.average(total_duration, count),
        avg_sleep: avg(|log| log.sleep_hours),
        avg_water_intake: avg(|log| f64::from(log.water_intake)),
        avg_calories: avg(|log| log.calories),
        avg_protein: avg(|log| log.protein),
        avg_carbs: avg(|log| log.carbs),
        avg_fat: avg(|log| log.fat),
        avg_fiber: avg(|log| log.fiber),
        chart: logs.iter().map(|log| chart_point(log)).collect(),
    }
}

fn chart_point(log: &MuscleLog) -> MuscleChartPoint {
    MuscleChartPoint {
        date: log.date,
        day: weekday_label(log.date),
        weight: finite(log.weight),
        calories: finite(log.calories),
        protein: finite(log.protein),
        carbs: finite(log.carbs),
        fat: finite(log.fat),
        sleep_hours: finite(log.sleep_hours),
        water_intake: f64::from(log.water_intake),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{Entity, MuscleLogDraft};

    fn log(date: &str, weight: f64, duration: u32, sleep: f64) -> MuscleLog {
        MuscleLog::from_draft(
            format!("{date}-{weight}"),
            MuscleLogDraft {
                date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
                weight,
                workout_duration: duration,
                sleep_hours: sleep,
                ..Default::default()
            },
        )
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_empty_logs_have_no_summary() {
        assert!(summarize(&[]).is_none());
    }

    #[test]
    fn test_duration_over_week_other_fields_over_entries() {
        let logs = vec![
            log("2025-11-17", 77.0, 10, 6.0),
            log("2025-11-18", 77.0, 20, 7.0),
            log("2025-11-19", 77.0, 30, 8.0),
        ];

        let summary = summarize(&logs).unwrap();

        assert_eq!(summary.total_duration, 60.0);
        assert!(approx(summary.avg_duration, 60.0 / 7.0));
        assert!(approx(summary.avg_sleep, 7.0));
        assert_eq!(summary.total_workouts, 3);
        assert!(approx(summary.avg_water_intake, 3.0));
    }

    #[test]
    fn test_weight_change_is_last_minus_first() {
        let logs = vec![
            log("2025-11-19", 76.5, 0, 7.0),
            log("2025-11-15", 78.0, 45, 7.0),
            log("2025-11-17", 77.0, 0, 7.0),
        ];

        let summary = summarize(&logs).unwrap();

        assert!(approx(summary.weight_change, -1.5));
        assert!(approx(summary.avg_weight, (76.5 + 78.0 + 77.0) / 3.0));
        assert_eq!(summary.total_workouts, 1);
        assert_eq!(summary.start_date, NaiveDate::from_ymd_opt(2025, 11, 15).unwrap());
        assert_eq!(summary.end_date, NaiveDate::from_ymd_opt(2025, 11, 19).unwrap());
    }

    #[test]
    fn test_only_latest_week_counts() {
        let logs = vec![
            log("2025-10-01", 90.0, 120, 4.0),
            log("2025-11-18", 80.0, 30, 8.0),
            log("2025-11-19", 79.0, 30, 6.0),
        ];

        let summary = summarize(&logs).unwrap();

        assert_eq!(summary.chart.len(), 2);
        assert!(approx(summary.weight_change, -1.0));
        assert!(approx(summary.avg_sleep, 7.0));
        assert_eq!(summary.total_duration, 60.0);
    }

    #[test]
    fn test_non_finite_values_read_as_zero() {
        let mut bad = log("2025-11-19", f64::NAN, 0, f64::INFINITY);
        bad.calories = f64::NAN;
        let logs = vec![log("2025-11-18", 80.0, 0, 8.0), bad];

        let summary = summarize(&logs).unwrap();

        assert!(approx(summary.avg_weight, 40.0));
        assert!(approx(summary.avg_sleep, 4.0));
        assert!(summary.avg_calories.is_finite());
        assert!(approx(summary.weight_change, -80.0));
    }

    #[test]
    fn test_chart_points_follow_window_order() {
        let logs = vec![log("2025-11-18", 80.0, 0, 8.0), log("2025-11-17", 81.0, 0, 7.0)];

        let summary = summarize(&logs).unwrap();
        let days: Vec<&str> = summary.chart.iter().map(|p| p.day.as_str()).collect();

        assert_eq!(days, vec!["Mon", "Tue"]);
        assert_eq!(summary.chart[0].weight, 81.0);
    }
}
