//! Core business logic - framework-agnostic scheduling, filtering, reporting,
//! export, and record operations.

/// Human-readable rendering of records and statuses
pub mod display;
/// CSV export
pub mod export;
/// Filter predicates
pub mod filter;
/// Record create/update/delete
pub mod record;
/// Dashboard summaries and report views
pub mod report;
/// Next-maintenance computation and status classification
pub mod schedule;
