//! Shared domain types for the FIR dashboard.
//!
//! Case record models, the error type, CLI settings, guarded arithmetic and
//! display formatting used by the data, runtime and binary crates.

pub mod calculations;
pub mod data_processors;
pub mod error;
pub mod formatting;
pub mod models;
pub mod settings;

pub use error::{DashboardError, Result};
