//! MCP tool modules.
//!
//! Tools are grouped by domain: raw catalog access, in-memory statistics,
//! and report-prompt generation.

pub mod catalog;
pub mod stats;
mod report;
