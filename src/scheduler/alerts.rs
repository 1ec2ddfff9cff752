//! Headcount summary and staffing alerts.
//!
//! Compares the working, coverage-eligible headcount against demand at
//! the configured peak and nap instants.
//!
//! | Alert | Condition |
//! |-------|-----------|
//! | Surplus | staff > peak need + margin |
//! | Shortage | staff < peak need |

use tracing::warn;

use crate::config::EngineConfig;
use crate::demand::DemandModel;
use crate::models::{AlertKind, CoverageSummary, StaffMember, StaffingAlert};

/// Working staff who count toward ratios.
pub fn coverage_eligible(staff: &[StaffMember]) -> impl Iterator<Item = &StaffMember> {
    staff
        .iter()
        .filter(|s| s.is_working() && !s.is_coverage_exempt())
}

/// Headcount versus demand at the peak and nap instants.
pub fn summarize(staff: &[StaffMember], demand: &DemandModel) -> CoverageSummary {
    CoverageSummary {
        total_teachers: u32::try_from(coverage_eligible(staff).count()).unwrap_or(u32::MAX),
        teachers_needed_peak: demand.peak_demand(),
        teachers_needed_nap: demand.nap_demand(),
    }
}

/// Surplus and shortage alerts for a summary.
pub fn staffing_alerts(summary: &CoverageSummary, config: &EngineConfig) -> Vec<StaffingAlert> {
    let total = summary.total_teachers;
    let peak = summary.teachers_needed_peak;
    let mut alerts = Vec::new();

    if total > peak.saturating_add(config.surplus_alert_margin) {
        let count = total - peak;
        alerts.push(StaffingAlert {
            kind: AlertKind::Surplus,
            message: format!(
                "{count} more staff than needed at peak ({total} working, {peak} needed at {})",
                config.peak_instant
            ),
            count,
        });
    }

    if total < peak {
        let count = peak - total;
        warn!(total, peak, "staff below peak demand");
        alerts.push(StaffingAlert {
            kind: AlertKind::Shortage,
            message: format!(
                "Short {count} staff at peak ({total} working, {peak} needed at {})",
                config.peak_instant
            ),
            count,
        });
    }

    alerts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::demand::PresentRoster;
    use crate::models::clock::t;
    use crate::models::{AgeGroup, Classroom, RatioPolicy, StaffRole, Student};

    fn summary(total: u32, peak: u32) -> CoverageSummary {
        CoverageSummary {
            total_teachers: total,
            teachers_needed_peak: peak,
            teachers_needed_nap: 0,
        }
    }

    #[test]
    fn test_surplus_needs_more_than_margin() {
        let config = EngineConfig::default();
        assert!(staffing_alerts(&summary(6, 4), &config).is_empty());
        let alerts = staffing_alerts(&summary(7, 4), &config);
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].kind, AlertKind::Surplus);
        assert_eq!(alerts[0].count, 3);
        assert!(alerts[0].message.contains("10:00"));
    }

    #[test]
    fn test_shortage() {
        let alerts = staffing_alerts(&summary(2, 5), &EngineConfig::default());
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].kind, AlertKind::Shortage);
        assert_eq!(alerts[0].count, 3);
    }

    #[test]
    fn test_exact_match_is_quiet() {
        assert!(staffing_alerts(&summary(4, 4), &EngineConfig::default()).is_empty());
        assert!(staffing_alerts(&summary(0, 0), &EngineConfig::default()).is_empty());
    }

    #[test]
    fn test_summarize_counts_eligible_staff() {
        let rooms = vec![Classroom::new("C1", "Infant A", AgeGroup::Infant)];
        let kids: Vec<Student> = (0..8)
            .map(|i| Student::new(format!("S{i}"), "C1").with_nap(t("12:30"), t("14:30")))
            .collect();
        let config = EngineConfig::default();
        let demand = DemandModel::build(
            &rooms,
            &PresentRoster::resolve(&kids, &[]),
            RatioPolicy::default(),
            &config,
        );
        let staff = vec![
            StaffMember::teacher("T1").with_shift(t("08:00"), t("17:00")),
            StaffMember::teacher("T2"),
            StaffMember::new("D1", StaffRole::Director).with_shift(t("08:00"), t("17:00")),
        ];

        let s = summarize(&staff, &demand);
        assert_eq!(s.total_teachers, 1);
        assert_eq!(s.teachers_needed_peak, 2);
        assert_eq!(s.teachers_needed_nap, 1);
    }
}
