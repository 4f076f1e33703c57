use crate::error::SubmissionError;
use crate::state::AppState;
use crate::submission::{decode_report, Attachment};
use crate::uploads::is_image_file_name;
use actix_multipart::{Field, Multipart};
use actix_web::http::header;
use actix_web::{web, HttpRequest, HttpResponse, Responder};
use common::model::shift_report::ShiftReport;
use futures_util::StreamExt;
use log::{error, info};

/// Largest accepted JSON body, serialized report field or screenshot.
const MAX_PART_BYTES: usize = 10 * 1024 * 1024; // 10 MB

const DATA_FIELD: &str = "data";
const SCREENSHOT_FIELD: &str = "screenshot";

/// HTTP handler for `POST /api/shift-data`.
///
/// - On success: `200 OK` with the aggregated `SubmissionResponse`.
/// - On failure: the status of the `SubmissionError` with the same body shape.
pub(crate) async fn process(
    req: HttpRequest,
    payload: web::Payload,
    state: web::Data<AppState>,
) -> impl Responder {
    let result = match read_submission(&req, payload).await {
        Ok((report, attachment)) => {
            info!(
                "Received shift report for {}{}",
                report.date,
                if attachment.is_some() { " with screenshot" } else { "" }
            );
            state
                .orchestrator
                .handle_submission(report, attachment)
                .await
        }
        Err(e) => Err(e),
    };

    match result {
        Ok(outcome) => HttpResponse::Ok().json(outcome.to_response()),
        Err(e) => {
            error!(
                "Error saving shift data (last stage {:?}): {}",
                e.reached_stage(),
                e
            );
            HttpResponse::build(e.status_code()).json(e.to_response())
        }
    }
}

fn is_multipart(req: &HttpRequest) -> bool {
    req.headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|ct| ct.trim_start().to_ascii_lowercase().starts_with("multipart/form-data"))
        .unwrap_or(false)
}

/// Normalizes both accepted body shapes into a report and an optional
/// attachment. Nothing is written anywhere while reading.
async fn read_submission(
    req: &HttpRequest,
    payload: web::Payload,
) -> Result<(ShiftReport, Option<Attachment>), SubmissionError> {
    if is_multipart(req) {
        read_multipart(Multipart::new(req.headers(), payload)).await
    } else {
        let body = read_json_body(payload).await?;
        Ok((decode_report(&body)?, None))
    }
}

async fn read_json_body(mut payload: web::Payload) -> Result<Vec<u8>, SubmissionError> {
    let mut body = Vec::new();
    while let Some(chunk) = payload.next().await {
        let chunk = chunk.map_err(|e| SubmissionError::validation(format!("cannot read body: {}", e)))?;
        if body.len() + chunk.len() > MAX_PART_BYTES {
            return Err(SubmissionError::validation("request body is too large"));
        }
        body.extend_from_slice(&chunk);
    }
    Ok(body)
}

/// Reads a `data` field (serialized report) and an optional `screenshot`
/// file. Other fields are skipped.
async fn read_multipart(
    mut payload: Multipart,
) -> Result<(ShiftReport, Option<Attachment>), SubmissionError> {
    let mut report: Option<ShiftReport> = None;
    let mut attachment: Option<Attachment> = None;

    while let Some(item) = payload.next().await {
        let mut field = item
            .map_err(|e| SubmissionError::validation(format!("malformed multipart body: {}", e)))?;
        let field_name = field
            .content_disposition()
            .and_then(|cd| cd.get_name().map(|n| n.to_string()));

        match field_name.as_deref() {
            Some(DATA_FIELD) => {
                let bytes = read_field(&mut field).await?;
                report = Some(decode_report(&bytes)?);
            }
            Some(SCREENSHOT_FIELD) => {
                let file_name = field
                    .content_disposition()
                    .and_then(|cd| cd.get_filename().map(|f| f.to_string()))
                    .unwrap_or_default();
                let bytes = read_field(&mut field).await?;

                // Browsers send an empty, unnamed part when no file was picked.
                if file_name.is_empty() && bytes.is_empty() {
                    continue;
                }
                if !is_image_file_name(&file_name) {
                    return Err(SubmissionError::validation(format!(
                        "screenshot {:?} is not an image (jpg, jpeg, png, gif, bmp, webp)",
                        file_name
                    )));
                }
                attachment = Some(Attachment { file_name, bytes });
            }
            _ => {
                read_field(&mut field).await?;
            }
        }
    }

    let report = report.ok_or_else(|| {
        SubmissionError::validation(format!("missing `{}` field with the shift report", DATA_FIELD))
    })?;
    Ok((report, attachment))
}

async fn read_field(field: &mut Field) -> Result<Vec<u8>, SubmissionError> {
    let mut bytes = Vec::new();
    while let Some(chunk) = field.next().await {
        let chunk = chunk
            .map_err(|e| SubmissionError::validation(format!("cannot read multipart field: {}", e)))?;
        if bytes.len() + chunk.len() > MAX_PART_BYTES {
            return Err(SubmissionError::validation("multipart field is too large"));
        }
        bytes.extend_from_slice(&chunk);
    }
    Ok(bytes)
}
