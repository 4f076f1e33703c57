use serde::{Deserialize, Serialize};

/// A single shift report as submitted by the till form.
///
/// Field names follow the camelCase JSON produced by the form. Every field is
/// required; a report that is missing one, or carries a value of the wrong
/// type, is rejected while decoding instead of producing partial figures.
/// Unknown extra fields are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShiftReport {
    /// Free-form date label, written to the ledger exactly as received.
    pub date: String,
    pub initial_balance: Total,
    /// Gross amount reported by the card terminal.
    pub terminal: f64,
    pub terminal_returns: f64,
    /// Transfers received directly to the card.
    pub terminal_transfer: f64,
    pub cash_in_register: Total,
    pub expenses: Vec<LineItem>,
    pub cash_returns: ItemizedTotal,
    pub cash_deposits: ItemizedTotal,
    pub cash_withdrawal: Total,
    pub final_balance: f64,
}

/// A figure that the form sends wrapped as `{ "total": n }`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Total {
    pub total: f64,
}

/// A named amount, e.g. `{ "name": "Taxi", "amount": 500 }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub name: String,
    pub amount: f64,
}

/// A list of line items together with the total the form already summed.
///
/// The `total` is taken as provided; it is not recomputed from `items`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemizedTotal {
    pub total: f64,
    pub items: Vec<LineItem>,
}

impl ItemizedTotal {
    /// Sum of the item amounts, used only to detect a disagreeing `total`.
    pub fn items_sum(&self) -> f64 {
        self.items.iter().map(|item| item.amount).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "date": "2024-01-01",
        "initialBalance": {"total": 1000},
        "terminal": 500,
        "terminalReturns": 50,
        "terminalTransfer": 20,
        "cashInRegister": {"total": 1200},
        "expenses": [{"name": "Fuel", "amount": 100}],
        "cashReturns": {"total": 30, "items": []},
        "cashDeposits": {"total": 0, "items": []},
        "cashWithdrawal": {"total": 0},
        "finalBalance": 2100,
        "terminalRevenue": 470
    }"#;

    #[test]
    fn decodes_camel_case_report_and_ignores_extra_fields() {
        let report: ShiftReport = serde_json::from_str(SAMPLE).unwrap();

        assert_eq!(report.date, "2024-01-01");
        assert_eq!(report.initial_balance.total, 1000.0);
        assert_eq!(report.cash_in_register.total, 1200.0);
        assert_eq!(report.expenses.len(), 1);
        assert_eq!(report.expenses[0].name, "Fuel");
        assert_eq!(report.cash_returns.total, 30.0);
        assert!(report.cash_deposits.items.is_empty());
        assert_eq!(report.final_balance, 2100.0);
    }

    #[test]
    fn rejects_missing_field() {
        let without_date = SAMPLE.replace(r#""date": "2024-01-01","#, "");
        assert!(serde_json::from_str::<ShiftReport>(&without_date).is_err());
    }

    #[test]
    fn rejects_mistyped_amount() {
        let mistyped = SAMPLE.replace(r#""terminal": 500"#, r#""terminal": "five hundred""#);
        assert!(serde_json::from_str::<ShiftReport>(&mistyped).is_err());
    }

    #[test]
    fn items_sum_adds_all_amounts() {
        let list = ItemizedTotal {
            total: 0.0,
            items: vec![
                LineItem { name: "A".into(), amount: 10.0 },
                LineItem { name: "B".into(), amount: 2.5 },
            ],
        };
        assert_eq!(list.items_sum(), 12.5);
    }
}
