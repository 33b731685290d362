//! Data layer for the FIR dashboard.
//!
//! Loads the case-record JSON dataset into an immutable [`reader::RecordStore`]
//! and derives every dashboard figure from it: headline summary, station
//! rankings, temporal histograms, case complexity, record queries and single-case
//! detail.

pub mod aggregator;
pub mod analysis;
pub mod case_detail;
pub mod demographics;
pub mod query;
pub mod reader;
pub mod summary;
pub mod temporal;

#[cfg(test)]
mod test_support;

pub use dashboard_core as core;
