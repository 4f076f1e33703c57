//! Shift report service: records till shift reports as rows of a remote
//! spreadsheet and forwards the attached screenshot to a chat.

pub mod app;
pub mod config;
pub mod crash;
pub mod error;
pub mod http;
pub mod ledger;
pub mod messenger;
pub mod report_sender;
pub mod revenue;
pub mod services;
pub mod state;
pub mod submission;
pub mod uploads;
