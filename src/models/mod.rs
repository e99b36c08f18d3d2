//! Data models for a cleanup run.
//!
//! `ObjectEntry` is the listing record the sweeps operate on; the report
//! types describe what a run did and serialize naturally as JSON via `serde`.

pub mod object;
pub mod report;
