//! Derives the ledger figures from a shift report.
//!
//! Everything here is pure: no I/O, no clock, no logging besides the
//! discrepancy warnings emitted by [`compute_revenue`].

use common::model::ledger_row::{CellValue, LedgerRow};
use common::model::shift_report::{ItemizedTotal, LineItem, ShiftReport};
use log::warn;

/// The derived part of a ledger row.
#[derive(Debug, Clone, PartialEq)]
pub struct RevenueBreakdown {
    pub cash_revenue: f64,
    pub expenses_formatted: String,
    pub cash_returns_formatted: String,
    pub cash_deposits_formatted: String,
    /// Terminal total net of returns plus card transfers. Logged, not written.
    pub terminal_revenue: f64,
}

/// A provided `.total` that does not match the sum of its items.
#[derive(Debug, Clone, PartialEq)]
pub struct TotalDiscrepancy {
    pub list: &'static str,
    pub provided: f64,
    pub items_sum: f64,
}

/// Computes cash revenue and the flattened item strings.
///
/// `cash revenue = cash in register - initial balance + sum(expenses)
///                 + cash returns total - cash deposits total`
///
/// Expenses are summed from their items because the form sends no total for
/// them. Cash returns and deposits use the totals as provided, even when
/// their items add up to something else; see [`total_discrepancies`].
pub fn compute_revenue(report: &ShiftReport) -> RevenueBreakdown {
    for d in total_discrepancies(report) {
        warn!(
            "{} total {} differs from the sum of its items {}; using the provided total",
            d.list, d.provided, d.items_sum
        );
    }

    let expenses_sum: f64 = report.expenses.iter().map(|e| e.amount).sum();
    let cash_revenue = report.cash_in_register.total - report.initial_balance.total
        + expenses_sum
        + report.cash_returns.total
        - report.cash_deposits.total;

    RevenueBreakdown {
        cash_revenue,
        expenses_formatted: format_items(&report.expenses),
        cash_returns_formatted: format_items(&report.cash_returns.items),
        cash_deposits_formatted: format_items(&report.cash_deposits.items),
        terminal_revenue: report.terminal - report.terminal_returns + report.terminal_transfer,
    }
}

/// Lists whose provided total disagrees with their items.
///
/// An empty item list is not compared: the form sends a bare total when the
/// cashier did not itemize.
pub fn total_discrepancies(report: &ShiftReport) -> Vec<TotalDiscrepancy> {
    [
        ("cashReturns", &report.cash_returns),
        ("cashDeposits", &report.cash_deposits),
    ]
    .into_iter()
    .filter_map(|(list, itemized): (&'static str, &ItemizedTotal)| {
        if itemized.items.is_empty() {
            return None;
        }
        let items_sum = itemized.items_sum();
        ((items_sum - itemized.total).abs() > 1e-9).then_some(TotalDiscrepancy {
            list,
            provided: itemized.total,
            items_sum,
        })
    })
    .collect()
}

/// Joins items as `"name: amount"` separated by `"; "`. Empty input gives `""`.
pub fn format_items(items: &[LineItem]) -> String {
    items
        .iter()
        .map(|item| format!("{}: {}", item.name, format_amount(item.amount)))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Prints whole amounts without a fractional part (`500`, not `500.0`).
pub fn format_amount(amount: f64) -> String {
    if amount.fract() == 0.0 && amount.abs() < 1e15 {
        format!("{}", amount as i64)
    } else {
        format!("{}", amount)
    }
}

/// Lays out the 12 ledger columns A..L.
pub fn build_row(report: &ShiftReport, breakdown: &RevenueBreakdown) -> LedgerRow {
    LedgerRow::new([
        report.date.as_str().into(),
        report.initial_balance.total.into(),
        report.terminal.into(),
        report.terminal_returns.into(),
        report.terminal_transfer.into(),
        report.cash_in_register.total.into(),
        breakdown.expenses_formatted.clone().into(),
        breakdown.cash_returns_formatted.clone().into(),
        breakdown.cash_deposits_formatted.clone().into(),
        report.cash_withdrawal.total.into(),
        report.final_balance.into(),
        breakdown.cash_revenue.into(),
    ])
}

/// Labels of numeric columns that overflowed to infinity (or are NaN).
///
/// JSON has no representation for these; serialized they become `null` and
/// the sheet would get an empty cell.
pub fn non_finite_columns(row: &LedgerRow) -> Vec<&'static str> {
    row.labelled()
        .filter(|(_, value)| matches!(value, CellValue::Number(n) if !n.is_finite()))
        .map(|(label, _)| label)
        .collect()
}
