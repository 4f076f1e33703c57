use serde::{Deserialize, Serialize};

/// Number of columns written per report (A through L).
pub const COLUMN_COUNT: usize = 12;

/// Human-readable labels of the ledger columns, in sheet order.
pub const COLUMN_LABELS: [&str; COLUMN_COUNT] = [
    "A. Date",
    "B. Initial balance",
    "C. Terminal",
    "D. Terminal returns",
    "E. Terminal transfers",
    "F. Cash in register",
    "G. Expenses",
    "H. Cash returns",
    "I. Cash deposits",
    "J. Cash withdrawal",
    "K. Final balance",
    "L. Cash revenue",
];

/// One cell of a ledger row.
///
/// Serialized untagged so a row becomes a plain JSON array such as
/// `["2024-01-01", 1000, 500, ...]`, which is what the spreadsheet expects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Number(f64),
    Text(String),
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl std::fmt::Display for CellValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CellValue::Number(n) => write!(f, "{}", n),
            CellValue::Text(s) => write!(f, "{}", s),
        }
    }
}

/// The fixed 12-column row that a shift report turns into.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LedgerRow {
    cells: [CellValue; COLUMN_COUNT],
}

impl LedgerRow {
    pub fn new(cells: [CellValue; COLUMN_COUNT]) -> Self {
        Self { cells }
    }

    pub fn cells(&self) -> &[CellValue] {
        &self.cells
    }

    /// Pairs every cell with its column label, for logging.
    pub fn labelled(&self) -> impl Iterator<Item = (&'static str, &CellValue)> {
        COLUMN_LABELS.iter().copied().zip(self.cells.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_row() -> LedgerRow {
        LedgerRow::new([
            "2024-01-01".into(),
            1000.0.into(),
            500.0.into(),
            50.0.into(),
            20.0.into(),
            1200.0.into(),
            "Fuel: 100".into(),
            "".into(),
            "".into(),
            0.0.into(),
            2100.0.into(),
            330.0.into(),
        ])
    }

    #[test]
    fn serializes_as_flat_json_array() {
        let json = serde_json::to_value(sample_row()).unwrap();
        let array = json.as_array().unwrap();

        assert_eq!(array.len(), COLUMN_COUNT);
        assert_eq!(array[0], serde_json::json!("2024-01-01"));
        assert_eq!(array[1].as_f64(), Some(1000.0));
        assert_eq!(array[6], serde_json::json!("Fuel: 100"));
        assert_eq!(array[11].as_f64(), Some(330.0));
    }

    #[test]
    fn labelled_follows_sheet_order() {
        let row = sample_row();
        let labels: Vec<_> = row.labelled().map(|(label, _)| label).collect();

        assert_eq!(labels.first(), Some(&"A. Date"));
        assert_eq!(labels.last(), Some(&"L. Cash revenue"));
    }
}
