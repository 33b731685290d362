//! Runtime layer for the FIR dashboard.
//!
//! Owns the single asynchronous boundary of the system: the one-shot dataset
//! load, exposed as a watchable [`orchestrator::LoadState`].

pub mod data_manager;
pub mod orchestrator;

pub use dashboard_core as core;
pub use dashboard_data as data;
