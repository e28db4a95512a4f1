//! Terminal helpers for the dronemap command line
//!
//! Provides shared CLI functionality:
//! - Output format selection and JSON printing
//! - Status messages and unit formatting
//! - Spinners for network calls

#![warn(missing_docs)]

pub mod output;
pub mod progress;

pub use output::{OutputFormat, Status};
