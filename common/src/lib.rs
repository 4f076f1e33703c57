//! Types shared between the shift report backend and its clients.
//!
//! - `model`: the inbound `ShiftReport` and the outbound `LedgerRow`.
//! - `submission`: per-request stages and the aggregated response body.
//! - `responses`: small response bodies for the auxiliary endpoints.

pub mod model;
pub mod responses;
pub mod submission;
