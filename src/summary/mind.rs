//! Mind weekly summary

use crate::storage::coerce::finite;
use crate::storage::MindLog;
use crate::summary::window::{select_week, weekday_label, Denominator, Window};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashMap;

/// Shown when no app was mentioned in the window
pub const NO_TOP_APP: &str = "None";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MindSummary {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub avg_score: f64,
    pub total_meditation: u64,
    pub total_pages: u64,
    pub avg_screen_time_minutes: f64,
    /// `"{h}h {m}m"` rendering of `avg_screen_time_minutes`
    pub screen_time_display: String,
    pub detox_days: usize,
    /// Average score on meditated days minus average on the others
    pub meditation_impact: f64,
    pub top_app: String,
    pub chart: Vec<MindChartPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MindChartPoint {
    pub date: NaiveDate,
    pub day: String,
    pub mind_score: u8,
    pub meditation_minutes: u32,
    pub pages_read: u32,
    /// Hours, rounded to one decimal
    pub screen_time_hours: f64,
}

pub fn summarize(logs: &[MindLog]) -> Option<MindSummary> {
    select_week(logs).map(|window| summarize_window(&window))
}

pub fn summarize_window(window: &Window<'_, MindLog>) -> MindSummary {
    let logs = &window.entries;
    let count = logs.len();

    let score_total: f64 = logs.iter().map(|log| f64::from(log.mind_score)).sum();
    let screen_total: f64 = logs
        .iter()
        .map(|log| f64::from(log.screen_time_minutes))
        .sum();
    let avg_screen = Denominator::Entries.average(screen_total, count);

    MindSummary {
        start_date: window.start_date(),
        end_date: window.latest,
        avg_score: Denominator::Entries.average(score_total, count),
        total_meditation: logs.iter().map(|log| u64::from(log.meditation_minutes)).sum(),
        total_pages: logs.iter().map(|log| u64::from(log.pages_read)).sum(),
        avg_screen_time_minutes: avg_screen,
        screen_time_display: format_screen_time(avg_screen),
        detox_days: logs.iter().filter(|log| log.digital_detox).count(),
        meditation_impact: meditation_impact(logs),
        top_app: top_app(logs),
        chart: logs.iter().map(|log| chart_point(log)).collect(),
    }
}

/// Render minutes as `"{h}h {m}m"`.
///
/// Hours are floored and the remainder rounded independently, so 119.6
/// minutes renders as "1h 60m".
pub fn format_screen_time(minutes: f64) -> String {
    let minutes = finite(minutes);
    let hours = (minutes / 60.0).floor();
    let rest = (minutes % 60.0).round();
    format!("{hours}h {rest}m")
}

fn meditation_impact(logs: &[&MindLog]) -> f64 {
    let (meditated, skipped): (Vec<&&MindLog>, Vec<&&MindLog>) =
        logs.iter().partition(|log| log.meditation_minutes > 0);

    if meditated.is_empty() || skipped.is_empty() {
        return 0.0;
    }

    average_score(&meditated) - average_score(&skipped)
}

fn average_score(group: &[&&MindLog]) -> f64 {
    let total: f64 = group.iter().map(|log| f64::from(log.mind_score)).sum();
    Denominator::Entries.average(total, group.len())
}

/// Most frequently mentioned app; ties go to whichever appeared first
fn top_app(logs: &[&MindLog]) -> String {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut first_seen: Vec<&str> = Vec::new();

    for app in logs.iter().flat_map(|log| log.apps()) {
        let count = counts.entry(app).or_insert(0);
        if *count == 0 {
            first_seen.push(app);
        }
        *count += 1;
    }

    let mut best: Option<(&str, usize)> = None;
    for app in first_seen {
        let count = counts.get(app).copied().unwrap_or(0);
        if best.map_or(true, |(_, top)| count > top) {
            best = Some((app, count));
        }
    }

    best.map(|(app, _)| app.to_string())
        .unwrap_or_else(|| NO_TOP_APP.to_string())
}

fn chart_point(log: &MindLog) -> MindChartPoint {
    MindChartPoint {
        date: log.date,
        day: weekday_label(log.date),
        mind_score: log.mind_score,
        meditation_minutes: log.meditation_minutes,
        pages_read: log.pages_read,
        screen_time_hours: (f64::from(log.screen_time_minutes) / 60.0 * 10.0).round() / 10.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{Entity, MindLogDraft};

    fn log(date: &str, score: u8, meditation: u32, apps: &str) -> MindLog {
        MindLog::from_draft(
            format!("{date}-{score}"),
            MindLogDraft {
                date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
                mind_score: score,
                meditation_minutes: meditation,
                top_apps: apps.to_string(),
                ..Default::default()
            },
        )
    }

    #[test]
    fn test_meditation_impact() {
        let logs = vec![
            log("2025-11-17", 8, 10, ""),
            log("2025-11-18", 7, 15, ""),
            log("2025-11-19", 5, 0, ""),
        ];

        let summary = summarize(&logs).unwrap();

        assert!((summary.meditation_impact - 2.5).abs() < 1e-9);
        assert_eq!(summary.total_meditation, 25);
        assert!((summary.avg_score - 20.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_impact_is_zero_when_a_group_is_empty() {
        let logs = vec![log("2025-11-17", 8, 10, ""), log("2025-11-18", 4, 20, "")];
        assert_eq!(summarize(&logs).unwrap().meditation_impact, 0.0);

        let idle = vec![log("2025-11-17", 8, 0, ""), log("2025-11-18", 4, 0, "")];
        assert_eq!(summarize(&idle).unwrap().meditation_impact, 0.0);
    }

    #[test]
    fn test_top_app_counts_and_ties() {
        let logs = vec![
            log("2025-11-17", 5, 0, "Instagram, YouTube"),
            log("2025-11-18", 5, 0, " YouTube ,WhatsApp"),
            log("2025-11-19", 5, 0, "Instagram"),
        ];
        // Instagram and YouTube both appear twice; Instagram was seen first
        assert_eq!(summarize(&logs).unwrap().top_app, "Instagram");

        let logs = vec![
            log("2025-11-17", 5, 0, "Reddit"),
            log("2025-11-18", 5, 0, "Chess, Chess"),
        ];
        assert_eq!(summarize(&logs).unwrap().top_app, "Chess");
    }

    #[test]
    fn test_top_app_falls_back_to_none() {
        let logs = vec![log("2025-11-17", 5, 0, " , ")];
        assert_eq!(summarize(&logs).unwrap().top_app, NO_TOP_APP);
    }

    #[test]
    fn test_screen_time_display() {
        assert_eq!(format_screen_time(150.0), "2h 30m");
        assert_eq!(format_screen_time(45.0), "0h 45m");
        assert_eq!(format_screen_time(119.6), "1h 60m");
        assert_eq!(format_screen_time(0.0), "0h 0m");
    }

    #[test]
    fn test_detox_pages_and_chart() {
        let mut a = log("2025-11-18", 6, 0, "");
        a.digital_detox = true;
        a.pages_read = 12;
        a.screen_time_minutes = 95;
        let mut b = log("2025-11-17", 7, 5, "");
        b.pages_read = 3;
        b.screen_time_minutes = 205;

        let summary = summarize(&[a, b]).unwrap();

        assert_eq!(summary.detox_days, 1);
        assert_eq!(summary.total_pages, 15);
        assert_eq!(summary.avg_screen_time_minutes, 150.0);
        assert_eq!(summary.screen_time_display, "2h 30m");
        assert_eq!(summary.chart[0].day, "Mon");
        assert_eq!(summary.chart[0].screen_time_hours, 3.4);
        assert_eq!(summary.chart[1].screen_time_hours, 1.6);
    }
}
