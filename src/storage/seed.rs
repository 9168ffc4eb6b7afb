//! Starter collections
//!
//! A fresh install opens with a few example entries per domain so the
//! dashboards have something to show before the first real log.

use crate::storage::types::{MindLog, MuscleLog, Transaction, TransactionType};
use chrono::NaiveDate;

fn day(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

#[allow(clippy::too_many_arguments)]
fn muscle(
    id: &str,
    date: NaiveDate,
    workout: &str,
    duration: u32,
    sleep: f64,
    water: u32,
    calories: f64,
    fiber: f64,
    protein: f64,
    carbs: f64,
    fat: f64,
) -> MuscleLog {
    MuscleLog {
        id: id.to_string(),
        date,
        weight: 77.2,
        workout_type: workout.to_string(),
        workout_duration: duration,
        sleep_hours: sleep,
        water_intake: water,
        calories,
        fiber,
        protein,
        carbs,
        fat,
    }
}

pub fn muscle_logs() -> Vec<MuscleLog> {
    vec![
        muscle("1", day(2025, 11, 17), "Chest & Triceps", 90, 7.0, 3, 1935.0, 37.5, 103.0, 253.0, 71.0),
        muscle("2", day(2025, 11, 18), "Back & Biceps", 60, 6.0, 2, 1153.0, 25.0, 60.7, 118.5, 46.3),
        muscle("3", day(2025, 11, 19), "Off", 60, 6.0, 3, 1769.0, 27.1, 54.9, 248.0, 57.2),
    ]
}

fn transaction(
    id: &str,
    kind: TransactionType,
    amount: f64,
    category: &str,
    details: &str,
    subcategory: &str,
) -> Transaction {
    Transaction {
        id: id.to_string(),
        date: day(2025, 11, 1),
        kind,
        amount,
        category: category.to_string(),
        details: details.to_string(),
        subcategory: Some(subcategory.to_string()),
    }
}

pub fn transactions() -> Vec<Transaction> {
    vec![
        transaction("m1", TransactionType::Income, 1000.0, "Donation", "UPI payment recived", "Income"),
        transaction("m2", TransactionType::Expense, -10.0, "Others", "Sweet", ""),
        transaction("m3", TransactionType::Expense, -50.0, "Grocery", "Curd", ""),
    ]
}

#[allow(clippy::too_many_arguments)]
fn mind(
    id: &str,
    date: NaiveDate,
    score: u8,
    meditation: u32,
    pages: u32,
    screen: u32,
    apps: &str,
    detox: bool,
    podcast: &str,
) -> MindLog {
    MindLog {
        id: id.to_string(),
        date,
        mind_score: score,
        meditation_minutes: meditation,
        book_name: "Atomic Habits".to_string(),
        pages_read: pages,
        screen_time_minutes: screen,
        top_apps: apps.to_string(),
        digital_detox: detox,
        podcast: podcast.to_string(),
    }
}

pub fn mind_logs() -> Vec<MindLog> {
    vec![
        mind("md1", day(2025, 11, 17), 8, 20, 15, 145, "Instagram, WhatsApp", false, "Huberman Lab"),
        mind("md2", day(2025, 11, 18), 6, 0, 10, 210, "YouTube, X", false, ""),
        mind("md3", day(2025, 11, 19), 9, 30, 25, 60, "WhatsApp", true, "Naval Ravikant"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_sizes() {
        assert_eq!(muscle_logs().len(), 3);
        assert_eq!(transactions().len(), 3);
        assert_eq!(mind_logs().len(), 3);
    }

    #[test]
    fn test_seed_transactions_follow_sign_convention() {
        for tx in transactions() {
            match tx.kind {
                TransactionType::Expense => assert!(tx.amount < 0.0),
                _ => assert!(tx.amount > 0.0),
            }
        }
    }
}
