//! # reqtrace-analysis
//!
//! Read-only analysis over the ledger: every function here is pure over
//! `(links, snapshots)` and mutates nothing, so all of them are safe to run
//! on every poll as long as the caller passes a consistent snapshot.
//!
//! - [`health::run_health_checks`] — broken references, version drift,
//!   self-links
//! - [`orphan::find_orphans`] — entities touched by neither links nor
//!   topology edges
//! - [`cycle::find_cycles`] — loops in the hierarchical link subset
//! - [`coverage::find_uncovered`] — requirements without a satisfying
//!   downstream link
//! - [`impact::impact_of`] — direction-annotated neighbors with pin state
//! - [`report`] — all of the above over one snapshot, formatted

pub mod coverage;
pub mod cycle;
pub mod health;
pub mod impact;
pub mod orphan;
pub mod report;

pub use coverage::find_uncovered;
pub use cycle::find_cycles;
pub use health::{run_health_checks, HealthIssue, IssueKind, Severity};
pub use impact::{impact_of, Direction, ImpactEntry};
pub use orphan::find_orphans;
pub use report::{build_report, format_report, LedgerReport, OutputFormat};
