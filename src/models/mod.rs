//! Coverage domain models.
//!
//! Read-only inputs for one (school, date) run and the outputs the
//! procedures produce. Nothing here is persisted by this crate.
//!
//! # Domain Mappings
//!
//! | u-coverage | Scheduling term | Record store |
//! |------------|-----------------|--------------|
//! | StaffMember | Resource (human) | teachers |
//! | Classroom | Demand point | classrooms |
//! | Student | Demand unit | students + attendance |
//! | RatioPolicy | Capacity rule | ratio settings |
//! | CoveragePlan | Schedule | (report only) |

pub(crate) mod clock;
mod classroom;
mod plan;
mod policy;
mod staff;

pub use classroom::{AgeGroup, Classroom, Student};
pub use clock::{ClockTime, TimeGrid, TimeWindow, MINUTES_PER_DAY};
pub use plan::{
    AlertKind, BlockKind, BreakAssignment, BreakOptimizationResult, CoverageAssignment,
    CoveragePlan, CoverageSummary, EssentialStaff, MinimalCoverageResult, StaffingAlert,
    SurplusStaff, WorkBlock,
};
pub use policy::{RatioMode, RatioPolicy, RatioRecord, RatioSettings, RatioTable, DEFAULT_RATIO};
pub use staff::{Qualification, QualificationSet, StaffMember, StaffRole};

/// A school record.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct School {
    /// Unique school identifier.
    pub id: String,
    /// Display name.
    pub name: String,
}

impl School {
    /// Creates a school record.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}
