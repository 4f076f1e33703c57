//! Turns one shift report into one ledger row and, if a screenshot came with
//! it, one chat message.
//!
//! The steps run strictly one after another:
//!
//! 1. derive the revenue figures and lay out the row;
//! 2. store the attachment (if any) in the uploads directory;
//! 3. insert a blank row in the ledger;
//! 4. write the row into it;
//! 5. forward the newest screenshot to the chat.
//!
//! A failure in 1–4 fails the whole submission and stops there: in
//! particular the row is never written if the insert failed, and nothing is
//! forwarded unless the write succeeded. A blank row left behind by a failed
//! write stays in the sheet. Step 5 cannot fail the submission; its outcome
//! is reported alongside.

use crate::error::{LedgerStep, SubmissionError};
use crate::ledger::Ledger;
use crate::report_sender::{ReportSender, SendOutcome};
use crate::revenue::{build_row, compute_revenue, non_finite_columns};
use common::model::shift_report::ShiftReport;
use common::submission::{ForwardStatus, ForwardingReport, SubmissionResponse, SubmissionStage};
use log::{debug, info, warn};
use std::sync::Arc;

/// An uploaded screenshot that has not been written to disk yet.
#[derive(Debug, Clone)]
pub struct Attachment {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// What a successful submission produced.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionOutcome {
    pub cash_revenue: f64,
    pub forwarding: ForwardingReport,
    /// Every stage the submission passed through, in order.
    pub stages: Vec<SubmissionStage>,
}

impl SubmissionOutcome {
    pub fn stage(&self) -> SubmissionStage {
        self.stages
            .last()
            .copied()
            .unwrap_or(SubmissionStage::Completed)
    }

    pub fn to_response(&self) -> SubmissionResponse {
        SubmissionResponse {
            success: true,
            message: "Data saved successfully".to_string(),
            stage: self.stage(),
            forwarding: Some(self.forwarding.clone()),
            error: None,
        }
    }
}

impl SubmissionError {
    pub fn to_response(&self) -> SubmissionResponse {
        let message = match self {
            SubmissionError::Validation(_) => "Invalid shift data",
            SubmissionError::Storage(_) => "Failed to store attachment",
            SubmissionError::Ledger { .. } => "Failed to save data",
        };
        SubmissionResponse {
            success: false,
            message: message.to_string(),
            stage: SubmissionStage::Failed,
            forwarding: None,
            error: Some(self.to_string()),
        }
    }
}

/// Parses the serialized report sent as a text field of a multipart form,
/// or as a plain JSON body.
pub fn decode_report(raw: &[u8]) -> Result<ShiftReport, SubmissionError> {
    serde_json::from_slice(raw).map_err(|e| SubmissionError::validation(e.to_string()))
}

pub struct SubmissionOrchestrator {
    ledger: Arc<dyn Ledger>,
    sender: ReportSender,
}

impl SubmissionOrchestrator {
    pub fn new(ledger: Arc<dyn Ledger>, sender: ReportSender) -> Self {
        Self { ledger, sender }
    }

    pub fn sender(&self) -> &ReportSender {
        &self.sender
    }

    pub async fn handle_submission(
        &self,
        report: ShiftReport,
        attachment: Option<Attachment>,
    ) -> Result<SubmissionOutcome, SubmissionError> {
        let mut stages = vec![SubmissionStage::Received, SubmissionStage::Normalized];

        let breakdown = compute_revenue(&report);
        let row = build_row(&report, &breakdown);
        let overflowed = non_finite_columns(&row);
        if !overflowed.is_empty() {
            return Err(SubmissionError::validation(format!(
                "amounts out of range in {}",
                overflowed.join(", ")
            )));
        }
        advance(&mut stages, SubmissionStage::Calculated);
        debug!(
            "Terminal revenue for {}: {}",
            report.date, breakdown.terminal_revenue
        );
        for (label, value) in row.labelled() {
            debug!("{}: {}", label, value);
        }

        let has_attachment = match attachment {
            Some(attachment) => {
                self.sender
                    .uploads()
                    .save(&attachment.file_name, &attachment.bytes)
                    .await?;
                true
            }
            None => false,
        };

        self.ledger
            .insert_blank_row()
            .await
            .map_err(|source| SubmissionError::Ledger {
                step: LedgerStep::InsertRow,
                source,
            })?;
        advance(&mut stages, SubmissionStage::RowInserted);

        self.ledger
            .write_row(&row)
            .await
            .map_err(|source| SubmissionError::Ledger {
                step: LedgerStep::WriteRow,
                source,
            })?;
        advance(&mut stages, SubmissionStage::RowWritten);
        info!(
            "Recorded shift {} with cash revenue {}",
            report.date, breakdown.cash_revenue
        );

        let forwarding = if has_attachment {
            self.forward().await
        } else {
            ForwardingReport {
                status: ForwardStatus::NoAttachment,
                message: "No screenshot attached".to_string(),
            }
        };
        advance(&mut stages, forwarding_stage(forwarding.status));
        advance(&mut stages, SubmissionStage::Completed);

        Ok(SubmissionOutcome {
            cash_revenue: breakdown.cash_revenue,
            forwarding,
            stages,
        })
    }

    async fn forward(&self) -> ForwardingReport {
        match self.sender.send_latest_image().await {
            Ok(SendOutcome::Sent { .. }) => ForwardingReport {
                status: ForwardStatus::Forwarded,
                message: "Report sent to Telegram".to_string(),
            },
            Ok(SendOutcome::NothingToSend) => ForwardingReport {
                status: ForwardStatus::NothingToSend,
                message: "No images left to send".to_string(),
            },
            Err(e) => {
                warn!("Shift recorded, but the screenshot was not forwarded: {}", e);
                ForwardingReport {
                    status: ForwardStatus::Failed,
                    message: format!("Failed to send to Telegram: {}", e),
                }
            }
        }
    }
}

fn forwarding_stage(status: ForwardStatus) -> SubmissionStage {
    match status {
        ForwardStatus::Forwarded | ForwardStatus::NothingToSend => SubmissionStage::Forwarded,
        ForwardStatus::Failed => SubmissionStage::ForwardFailed,
        ForwardStatus::NoAttachment => SubmissionStage::NoAttachment,
    }
}

fn advance(stages: &mut Vec<SubmissionStage>, to: SubmissionStage) {
    if let Some(from) = stages.last() {
        debug!("Submission {:?} -> {:?}", from, to);
    }
    stages.push(to);
}
