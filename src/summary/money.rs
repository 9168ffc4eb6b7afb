//! Money weekly summary

use crate::storage::coerce::finite;
use crate::storage::{Transaction, TransactionType};
use crate::summary::window::{select_week, weekday_label, Denominator, Window};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashMap;

/// Category label for expenses logged without one
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Daily spend is always spread over the full week
pub const DAILY_SPEND_DENOMINATOR: Denominator = Denominator::Week;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoneySummary {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub income: f64,
    pub expense: f64,
    pub balance: f64,
    /// Percentage of income kept; 0 when there was no income
    pub savings_rate: f64,
    pub daily_avg_spend: f64,
    /// Exactly seven points, oldest first
    pub daily: Vec<DailyFlow>,
    /// Expense totals per category, largest first
    pub categories: Vec<CategoryTotal>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyFlow {
    pub date: NaiveDate,
    pub day: String,
    pub income: f64,
    pub expense: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub category: String,
    pub amount: f64,
}

pub fn summarize(transactions: &[Transaction]) -> Option<MoneySummary> {
    select_week(transactions).map(|window| summarize_window(&window))
}

pub fn summarize_window(window: &Window<'_, Transaction>) -> MoneySummary {
    let txs = &window.entries;

    let income: f64 = txs
        .iter()
        .filter(|tx| tx.kind == TransactionType::Income)
        .map(|tx| finite(tx.amount))
        .filter(|amount| *amount > 0.0)
        .sum();
    let expense: f64 = txs
        .iter()
        .filter(|tx| tx.kind == TransactionType::Expense)
        .map(|tx| finite(tx.amount).abs())
        .sum();
    let balance = income - expense;
    let savings_rate = if income > 0.0 {
        balance / income * 100.0
    } else {
        0.0
    };

    MoneySummary {
        start_date: window.start_date(),
        end_date: window.latest,
        income,
        expense,
        balance,
        savings_rate,
        daily_avg_spend: DAILY_SPEND_DENOMINATOR.average(expense, txs.len()),
        daily: daily_flow(window),
        categories: category_breakdown(txs),
    }
}

/// Income and spend per calendar day of the window, zero-filled
fn daily_flow(window: &Window<'_, Transaction>) -> Vec<DailyFlow> {
    let mut days: Vec<DailyFlow> = window
        .days()
        .into_iter()
        .map(|date| DailyFlow {
            date,
            day: weekday_label(date),
            income: 0.0,
            expense: 0.0,
        })
        .collect();

    for tx in &window.entries {
        let Some(slot) = days.iter_mut().find(|d| d.date == tx.date) else {
            continue;
        };
        match tx.kind {
            TransactionType::Income => slot.income += finite(tx.amount),
            TransactionType::Expense => slot.expense += finite(tx.amount).abs(),
            TransactionType::NoExpense => {}
        }
    }

    days
}

fn category_breakdown(txs: &[&Transaction]) -> Vec<CategoryTotal> {
    let mut order: Vec<CategoryTotal> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for tx in txs.iter().filter(|tx| tx.kind == TransactionType::Expense) {
        let name = match tx.category.as_str() {
            "" => UNCATEGORIZED,
            other => other,
        };
        let slot = *index.entry(name.to_string()).or_insert_with(|| {
            order.push(CategoryTotal {
                category: name.to_string(),
                amount: 0.0,
            });
            order.len() - 1
        });
        order[slot].amount += finite(tx.amount).abs();
    }

    // stable: ties keep first-seen order
    order.sort_by(|a, b| b.amount.total_cmp(&a.amount));
    order
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{Entity, TransactionDraft};

    fn tx(date: &str, kind: TransactionType, amount: f64, category: &str) -> Transaction {
        Transaction::from_draft(
            format!("{date}-{amount}"),
            TransactionDraft {
                date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
                kind,
                amount,
                category: category.to_string(),
                details: String::new(),
                subcategory: None,
            },
        )
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_income_expense_balance_and_rate() {
        let txs = vec![
            tx("2025-11-01", TransactionType::Income, 1000.0, "Income"),
            tx("2025-11-01", TransactionType::Expense, -10.0, "Food & Dining"),
            tx("2025-11-01", TransactionType::Expense, -50.0, "Transportation"),
        ];

        let summary = summarize(&txs).unwrap();

        assert_eq!(summary.income, 1000.0);
        assert_eq!(summary.expense, 60.0);
        assert_eq!(summary.balance, 940.0);
        assert!(approx(summary.savings_rate, 94.0));
        assert!(approx(summary.daily_avg_spend, 60.0 / 7.0));
    }

    #[test]
    fn test_no_income_means_zero_savings_rate() {
        let txs = vec![tx("2025-11-01", TransactionType::Expense, -25.0, "Shopping")];
        let summary = summarize(&txs).unwrap();

        assert_eq!(summary.savings_rate, 0.0);
        assert_eq!(summary.balance, -25.0);
    }

    #[test]
    fn test_negative_income_and_no_expense_are_ignored() {
        let txs = vec![
            tx("2025-11-02", TransactionType::Income, -300.0, "Income"),
            tx("2025-11-02", TransactionType::NoExpense, 0.0, "Others"),
            tx("2025-11-02", TransactionType::Income, 200.0, "Income"),
        ];
        let summary = summarize(&txs).unwrap();

        assert_eq!(summary.income, 200.0);
        assert_eq!(summary.expense, 0.0);
        assert!(summary.categories.is_empty());
    }

    #[test]
    fn test_daily_series_always_has_seven_points() {
        let txs = vec![
            tx("2025-11-19", TransactionType::Expense, -12.5, "Food & Dining"),
            tx("2025-11-19", TransactionType::Expense, -7.5, "Food & Dining"),
            tx("2025-11-14", TransactionType::Income, 500.0, "Income"),
        ];

        let summary = summarize(&txs).unwrap();

        assert_eq!(summary.daily.len(), 7);
        assert_eq!(summary.daily[0].date, NaiveDate::from_ymd_opt(2025, 11, 13).unwrap());
        assert_eq!(summary.daily[6].date, NaiveDate::from_ymd_opt(2025, 11, 19).unwrap());
        assert_eq!(summary.daily[6].day, "Wed");
        assert_eq!(summary.daily[6].expense, 20.0);
        assert_eq!(summary.daily[1].income, 500.0);
        assert_eq!(summary.daily[3].income + summary.daily[3].expense, 0.0);
    }

    #[test]
    fn test_single_entry_still_yields_full_series() {
        let txs = vec![tx("2025-11-01", TransactionType::Income, 10.0, "Income")];
        let summary = summarize(&txs).unwrap();
        assert_eq!(summary.daily.len(), 7);
    }

    #[test]
    fn test_category_breakdown_sorted_with_stable_ties() {
        let txs = vec![
            tx("2025-11-10", TransactionType::Expense, -20.0, "Shopping"),
            tx("2025-11-10", TransactionType::Expense, -5.0, ""),
            tx("2025-11-11", TransactionType::Expense, -20.0, "Social & Leisure"),
            tx("2025-11-11", TransactionType::Expense, -40.0, "Housing & Utilities"),
            tx("2025-11-12", TransactionType::Expense, -10.0, "Shopping"),
            tx("2025-11-12", TransactionType::Income, 900.0, "Income"),
        ];

        let summary = summarize(&txs).unwrap();
        let names: Vec<&str> = summary
            .categories
            .iter()
            .map(|c| c.category.as_str())
            .collect();

        assert_eq!(
            names,
            vec!["Housing & Utilities", "Shopping", "Social & Leisure", UNCATEGORIZED]
        );
        assert_eq!(summary.categories[1].amount, 30.0);
    }

    #[test]
    fn test_category_names_grouped_as_written() {
        let txs = vec![
            tx("2025-11-10", TransactionType::Expense, -6.0, "Food"),
            tx("2025-11-10", TransactionType::Expense, -4.0, "Food "),
            tx("2025-11-11", TransactionType::Expense, -5.0, " "),
            tx("2025-11-11", TransactionType::Expense, -3.0, ""),
        ];

        let summary = summarize(&txs).unwrap();
        let totals: Vec<(&str, f64)> = summary
            .categories
            .iter()
            .map(|c| (c.category.as_str(), c.amount))
            .collect();

        assert_eq!(
            totals,
            vec![("Food", 6.0), (" ", 5.0), ("Food ", 4.0), (UNCATEGORIZED, 3.0)]
        );
    }

    #[test]
    fn test_tied_categories_keep_first_seen_order() {
        let txs = vec![
            tx("2025-11-10", TransactionType::Expense, -15.0, "Transportation"),
            tx("2025-11-10", TransactionType::Expense, -15.0, "Food & Dining"),
        ];

        let summary = summarize(&txs).unwrap();

        assert_eq!(summary.categories[0].category, "Transportation");
        assert_eq!(summary.categories[1].category, "Food & Dining");
    }
}
