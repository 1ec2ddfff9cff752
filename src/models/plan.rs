//! Procedure outputs: break assignments, coverage plans and the result
//! payloads handed to the reporting layer.
//!
//! Every collection here is a `Vec` in deterministic order, so identical
//! inputs serialize to identical bytes.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{ClockTime, StaffRole, TimeWindow};

/// Two short breaks placed around one staff member's lunch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakAssignment {
    /// Staff identifier.
    pub staff_id: String,
    /// Staff display name.
    pub staff_name: String,
    /// First break start.
    pub break1_start: ClockTime,
    /// First break end.
    pub break1_end: ClockTime,
    /// Second break start.
    pub break2_start: ClockTime,
    /// Second break end.
    pub break2_end: ClockTime,
    /// Confirmed lunch start, if the staff member has a lunch window.
    pub lunch_start: Option<ClockTime>,
    /// Confirmed lunch end.
    pub lunch_end: Option<ClockTime>,
}

impl BreakAssignment {
    /// First break as a window.
    pub fn break1(&self) -> TimeWindow {
        TimeWindow::new(self.break1_start, self.break1_end)
    }

    /// Second break as a window.
    pub fn break2(&self) -> TimeWindow {
        TimeWindow::new(self.break2_start, self.break2_end)
    }
}

/// Staffing alert category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    /// More staff than peak demand needs.
    Surplus,
    /// Fewer staff than peak demand needs.
    Shortage,
}

/// A day-level staffing alert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffingAlert {
    /// Category.
    #[serde(rename = "type")]
    pub kind: AlertKind,
    /// Human-readable message.
    pub message: String,
    /// Staff over or under the peak need.
    pub count: u32,
}

/// Headcount versus demand at the representative instants.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageSummary {
    /// Working staff.
    pub total_teachers: u32,
    /// Demand at the peak instant.
    pub teachers_needed_peak: u32,
    /// Demand at the nap-representative instant.
    pub teachers_needed_nap: u32,
}

/// Block category inside an essential staff member's day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    /// On the floor.
    Work,
    /// Short break.
    Break,
    /// Lunch.
    Lunch,
}

/// A timed block of an essential staff member's day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkBlock {
    /// Block start.
    pub start: ClockTime,
    /// Block end.
    pub end: ClockTime,
    /// Category.
    #[serde(rename = "type")]
    pub kind: BlockKind,
    /// Classroom covered (work blocks only).
    pub classroom_name: Option<String>,
}

impl WorkBlock {
    /// Block as a window.
    pub fn window(&self) -> TimeWindow {
        TimeWindow::new(self.start, self.end)
    }

    /// Duration in minutes.
    pub fn duration_minutes(&self) -> u16 {
        self.window().duration_minutes()
    }
}

/// Which demand pool an essential staff member was selected for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoverageAssignment {
    /// Infant/toddler rooms (qualified staff only).
    InfantRooms,
    /// All other rooms.
    General,
}

/// A staff member the minimal plan keeps on the floor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EssentialStaff {
    /// Staff identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Role.
    pub role: StaffRole,
    /// Recorded home classroom.
    pub classroom_title: Option<String>,
    /// Whether the staff member may cover infant/toddler rooms.
    pub infant_qualified: bool,
    /// Pool the staff member was selected from.
    pub assigned_for: CoverageAssignment,
    /// Shift start.
    pub shift_start: ClockTime,
    /// Shift end.
    pub shift_end: ClockTime,
    /// The day as work, break and lunch blocks.
    pub schedule: Vec<WorkBlock>,
    /// Why this staff member is needed.
    pub reason: String,
}

/// A working staff member the minimal plan does not need.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurplusStaff {
    /// Staff identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Role.
    pub role: StaffRole,
    /// Recorded home classroom.
    pub classroom_title: Option<String>,
    /// Whether the staff member may cover infant/toddler rooms.
    pub infant_qualified: bool,
    /// Shift start.
    pub shift_start: Option<ClockTime>,
    /// Shift end.
    pub shift_end: Option<ClockTime>,
    /// Why this staff member is not needed.
    pub reason: String,
}

/// Output of the minimal-coverage selector.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoveragePlan {
    /// Selected staff, infant-room picks first.
    pub essential: Vec<EssentialStaff>,
    /// Unselected working staff.
    pub surplus: Vec<SurplusStaff>,
    /// Day maximum of summed infant/toddler demand.
    pub min_infant_qualified_needed: u32,
    /// Day maximum of summed demand in all other rooms.
    pub min_other_needed: u32,
    /// Degraded conditions.
    pub warnings: Vec<String>,
}

impl CoveragePlan {
    /// Actual post-selection essential headcount.
    pub fn minimal_staff_needed(&self) -> u32 {
        u32::try_from(self.essential.len()).unwrap_or(u32::MAX)
    }

    /// Whether a staff member was selected.
    pub fn is_essential(&self, staff_id: &str) -> bool {
        self.essential.iter().any(|e| e.id == staff_id)
    }

    /// Essential staff selected for a pool.
    pub fn essential_for(&self, pool: CoverageAssignment) -> impl Iterator<Item = &EssentialStaff> {
        self.essential.iter().filter(move |e| e.assigned_for == pool)
    }
}

/// Break-optimization payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakOptimizationResult {
    /// Always `true`; hard failures never produce a result.
    pub success: bool,
    /// Planned date.
    pub date: NaiveDate,
    /// School identifier.
    pub school_id: String,
    /// School display name.
    pub school_name: String,
    /// One entry per working staff member.
    pub breaks: Vec<BreakAssignment>,
    /// Surplus/shortage alerts.
    pub alerts: Vec<StaffingAlert>,
    /// Headcount versus demand.
    pub coverage_summary: CoverageSummary,
    /// Degraded input conditions.
    pub warnings: Vec<String>,
}

/// Minimal-coverage payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinimalCoverageResult {
    /// Always `true`; hard failures never produce a result.
    pub success: bool,
    /// Planned date.
    pub date: NaiveDate,
    /// School identifier.
    pub school_id: String,
    /// School display name.
    pub school_name: String,
    /// Working, coverage-eligible staff.
    pub current_teachers: u32,
    /// Post-selection essential headcount.
    pub minimal_teachers_needed: u32,
    /// `current_teachers - minimal_teachers_needed`.
    pub potential_savings: u32,
    /// Selected staff with their blocks.
    pub essential_teachers: Vec<EssentialStaff>,
    /// Unselected staff with reasons.
    pub surplus_teachers: Vec<SurplusStaff>,
    /// Degraded conditions.
    pub warnings: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::clock::t;

    #[test]
    fn test_alert_serializes_type_field() {
        let alert = StaffingAlert {
            kind: AlertKind::Shortage,
            message: "short by 1".into(),
            count: 1,
        };
        let json = serde_json::to_value(&alert).unwrap();
        assert_eq!(json["type"], "shortage");
        assert_eq!(json["count"], 1);
    }

    #[test]
    fn test_block_duration() {
        let b = WorkBlock {
            start: t("10:00"),
            end: t("10:10"),
            kind: BlockKind::Break,
            classroom_name: None,
        };
        assert_eq!(b.duration_minutes(), 10);
        assert_eq!(serde_json::to_value(&b).unwrap()["start"], "10:00");
    }

    #[test]
    fn test_plan_queries() {
        let plan = CoveragePlan::default();
        assert_eq!(plan.minimal_staff_needed(), 0);
        assert!(!plan.is_essential("T1"));
        assert_eq!(plan.essential_for(CoverageAssignment::General).count(), 0);
    }
}
