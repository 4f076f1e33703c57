//! The remote spreadsheet that acts as the system of record.
//!
//! A report is recorded in two calls that must run in order: first a blank
//! row is inserted right under the header, then the report is written into
//! it. Nothing here reads existing rows, and nothing undoes the insert when
//! the write fails.

pub mod auth;
pub mod sheets;

use crate::error::LedgerError;
use async_trait::async_trait;
use common::model::ledger_row::LedgerRow;

#[async_trait]
pub trait Ledger: Send + Sync {
    /// Inserts one empty row at 0-based index 1 of the first sheet.
    async fn insert_blank_row(&self) -> Result<(), LedgerError>;

    /// Writes `row` into columns A..L of the freshly inserted row.
    async fn write_row(&self, row: &LedgerRow) -> Result<(), LedgerError>;
}
