//! Shift report submission endpoints.
//!
//! - `POST /api/shift-data`: records a shift report. Accepts either a JSON
//!   body, or a `multipart/form-data` body with the report serialized in a
//!   `data` field and an optional `screenshot` file. Responds with a
//!   `SubmissionResponse`: `200` once the ledger row is written (whatever
//!   happened to the screenshot), `400` for a payload that cannot be decoded,
//!   `500` when the attachment cannot be stored or the ledger call fails.
//!
//! - `GET /api/shift-data/pending-images`: how many screenshots are still
//!   waiting in the uploads directory.

use actix_web::web::{get, post, scope};
use actix_web::Scope;

mod pending;
mod submit;

const API_PATH: &str = "/api/shift-data";

pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("", post().to(submit::process))
        .route("/pending-images", get().to(pending::process))
}
