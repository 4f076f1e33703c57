//! Google Sheets v4 implementation of [`Ledger`].

use super::auth::TokenSource;
use super::Ledger;
use crate::error::LedgerError;
use crate::http::preview;
use async_trait::async_trait;
use common::model::ledger_row::LedgerRow;
use log::{debug, info};
use reqwest::{Client, RequestBuilder};
use serde_json::{json, Value};
use std::sync::Arc;

/// Numeric id of the first sheet in a spreadsheet.
const FIRST_SHEET_ID: u32 = 0;
/// Row 2 in 0-based dimension indexes, i.e. right below the header.
const INSERT_AT: u32 = 1;
/// A1 range of the inserted row.
pub const TARGET_RANGE: &str = "Sheet1!A2:L2";

pub struct SheetsClient {
    http: Client,
    api_base: String,
    spreadsheet_id: String,
    tokens: Arc<dyn TokenSource>,
}

impl SheetsClient {
    pub fn new(
        http: Client,
        api_base: impl Into<String>,
        spreadsheet_id: impl Into<String>,
        tokens: Arc<dyn TokenSource>,
    ) -> Self {
        Self {
            http,
            api_base: api_base.into().trim_end_matches('/').to_string(),
            spreadsheet_id: spreadsheet_id.into(),
            tokens,
        }
    }

    fn spreadsheet_url(&self) -> String {
        format!("{}/v4/spreadsheets/{}", self.api_base, self.spreadsheet_id)
    }

    /// Attaches the bearer token, sends, and turns non-2xx answers into errors.
    async fn execute(&self, request: RequestBuilder) -> Result<Value, LedgerError> {
        let token = self.tokens.access_token().await?;
        let response = request
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| LedgerError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| LedgerError::Transport(e.to_string()))?;

        if !status.is_success() {
            return Err(LedgerError::Api {
                status: status.as_u16(),
                message: api_error_message(&body),
            });
        }
        debug!("Sheets API response: {}", preview(&body));
        Ok(serde_json::from_str(&body).unwrap_or(Value::Null))
    }
}

/// Pulls `error.message` out of a Google API error body, falling back to the
/// raw body.
fn api_error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| {
            v.pointer("/error/message")
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .unwrap_or_else(|| preview(body))
}

pub(crate) fn insert_row_request() -> Value {
    json!({
        "requests": [{
            "insertDimension": {
                "range": {
                    "sheetId": FIRST_SHEET_ID,
                    "dimension": "ROWS",
                    "startIndex": INSERT_AT,
                    "endIndex": INSERT_AT + 1
                },
                "inheritFromBefore": false
            }
        }]
    })
}

pub(crate) fn write_row_request(row: &LedgerRow) -> Value {
    json!({
        "range": TARGET_RANGE,
        "majorDimension": "ROWS",
        "values": [row]
    })
}

#[async_trait]
impl Ledger for SheetsClient {
    async fn insert_blank_row(&self) -> Result<(), LedgerError> {
        let url = format!("{}:batchUpdate", self.spreadsheet_url());
        self.execute(self.http.post(url).json(&insert_row_request()))
            .await?;
        info!("Inserted blank row at row {} of sheet {}", INSERT_AT + 1, FIRST_SHEET_ID);
        Ok(())
    }

    async fn write_row(&self, row: &LedgerRow) -> Result<(), LedgerError> {
        let url = format!("{}/values/{}", self.spreadsheet_url(), TARGET_RANGE);
        let response = self
            .execute(
                self.http
                    .put(url)
                    .query(&[("valueInputOption", "USER_ENTERED")])
                    .json(&write_row_request(row)),
            )
            .await?;
        info!(
            "Wrote {} cells to {}",
            response
                .get("updatedCells")
                .and_then(Value::as_u64)
                .unwrap_or(0),
            TARGET_RANGE
        );
        Ok(())
    }
}
