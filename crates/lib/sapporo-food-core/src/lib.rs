//! Core catalog access and aggregation for sapporo-food-mcp.
//!
//! This crate owns the CKAN datastore client for Sapporo City's
//! food-business license dataset, the per-call aggregation engine that turns
//! flat record batches into ward and business-type statistics, and the fixed
//! analysis prompt templates.

pub mod catalog;
pub mod report;
pub mod stats;
