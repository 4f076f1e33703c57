pub mod ledger_row;
pub mod shift_report;
