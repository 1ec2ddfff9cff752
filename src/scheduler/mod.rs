//! Coverage procedures.
//!
//! Two single-pass procedures over one school's inputs for one date.
//! Both read the same [`DemandModel`](crate::demand::DemandModel).
//!
//! # Algorithms
//!
//! - `BreakScheduler`: places two short breaks per working staff member,
//!   preferring nap time and avoiding slots already claimed in the run.
//! - `CoverageSelector`: greedy, qualification-aware selection of the
//!   smallest staff subset covering the whole day's demand.
//!
//! Neither is optimal. Both are deterministic.
//!
//! # References
//!
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 4
//! - Ernst et al. (2004), "Staff scheduling and rostering: A review of
//!   applications, methods and models"

mod alerts;
mod breaks;
mod coverage;

pub use alerts::{coverage_eligible, staffing_alerts, summarize};
pub use breaks::{schedule_breaks, BreakScheduler, BreakSource};
pub use coverage::{select_minimal_coverage, CoverageSelector};
