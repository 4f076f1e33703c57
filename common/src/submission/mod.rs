use serde::{Deserialize, Serialize};

/// Where a single submission is in its lifecycle.
///
/// A request moves forward through these stages one at a time. Any failure
/// before `RowWritten` ends in `Failed`; once the row is written the request
/// always ends in `Completed`, whatever happened to the attachment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStage {
    Received,
    Normalized,
    Calculated,
    RowInserted,
    RowWritten,
    Forwarded,
    ForwardFailed,
    NoAttachment,
    Completed,
    Failed,
}

/// Outcome of forwarding the attached screenshot to the chat.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ForwardStatus {
    /// The image was sent and removed from the uploads directory.
    Forwarded,
    /// The chat API rejected or never received the image; the file was kept.
    Failed,
    /// The request carried no attachment.
    NoAttachment,
    /// An attachment was stored but no image was left to send.
    NothingToSend,
}

/// Forwarding sub-result, reported even when forwarding failed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ForwardingReport {
    pub status: ForwardStatus,
    pub message: String,
}

impl ForwardingReport {
    pub fn succeeded(&self) -> bool {
        matches!(
            self.status,
            ForwardStatus::Forwarded | ForwardStatus::NoAttachment | ForwardStatus::NothingToSend
        )
    }
}

/// Body returned by `POST /api/shift-data`.
///
/// `success` reflects the ledger write only. Forwarding problems are reported
/// in `forwarding` and never flip `success` back to `false`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SubmissionResponse {
    pub success: bool,
    pub message: String,
    pub stage: SubmissionStage,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forwarding: Option<ForwardingReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
