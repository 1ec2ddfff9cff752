//! Minimal qualified coverage.
//!
//! # Algorithm
//!
//! Infant and toddler rooms may only be covered by infant-qualified staff,
//! so the minimum is two numbers, each a day maximum over the demand curve:
//!
//! 1. `min_infant` = max over slots of summed infant/toddler demand.
//! 2. `min_other` = max over slots of summed demand in all other rooms.
//! 3. Working staff (directors excluded) split into a qualified pool and
//!    the rest. The first `min_infant` qualified staff cover infant rooms.
//! 4. Unpicked qualified staff join the rest, and the first `min_other`
//!    of that pool cover the other rooms.
//! 5. Everyone else is surplus.
//!
//! Pool order comes from a [`SelectionStrategy`]; with [`ListOrder`] it is
//! the input order. A pool too small for its demand produces a warning,
//! never an error: the plan is always returned.
//!
//! Each essential staff member gets the day as timed blocks: work, break,
//! work, lunch, work, break, work. Break 1 sits at shift start + 120 and
//! break 2 at lunch end + 120, both pulled inside the shift and clear of
//! lunch.
//!
//! # Complexity
//! O(s · log s + c) for s staff and c slots.
//!
//! [`ListOrder`]: crate::selection::ListOrder

use std::collections::BTreeSet;

use tracing::{info, warn};

use crate::config::EngineConfig;
use crate::demand::DemandCurve;
use crate::models::{
    BlockKind, Classroom, CoverageAssignment, CoveragePlan, EssentialStaff, StaffMember,
    SurplusStaff, TimeWindow, WorkBlock,
};
use crate::selection::SelectionStrategy;

use super::alerts::coverage_eligible;

/// Greedy minimal-coverage selector.
pub struct CoverageSelector<'a> {
    config: &'a EngineConfig,
    strategy: &'a dyn SelectionStrategy,
}

impl<'a> CoverageSelector<'a> {
    /// Creates a selector ordering pools with `strategy`.
    pub fn new(config: &'a EngineConfig, strategy: &'a dyn SelectionStrategy) -> Self {
        Self { config, strategy }
    }

    /// Selects the smallest qualification-respecting staff subset.
    pub fn select(
        &self,
        staff: &[StaffMember],
        classrooms: &[Classroom],
        curve: &DemandCurve,
    ) -> CoveragePlan {
        let min_infant = curve.peak_infant();
        let min_other = curve.peak_other();
        let mut warnings = Vec::new();

        let eligible: Vec<&StaffMember> = coverage_eligible(staff).collect();
        let qualified = self.strategy.order(
            eligible
                .iter()
                .copied()
                .filter(|s| s.is_infant_qualified())
                .collect(),
        );

        if qualified.len() < min_infant as usize {
            warn!(
                available = qualified.len(),
                needed = min_infant,
                "not enough infant-qualified staff"
            );
            warnings.push(format!(
                "Only {} infant-qualified staff available but {min_infant} needed for infant/toddler rooms; cannot reduce staff for infant rooms",
                qualified.len()
            ));
        }

        let infant_picks: Vec<(&StaffMember, TimeWindow)> = qualified
            .into_iter()
            .filter_map(with_shift)
            .take(min_infant as usize)
            .collect();
        let picked: BTreeSet<&str> = infant_picks.iter().map(|(s, _)| s.id.as_str()).collect();

        let general_pool = self.strategy.order(
            eligible
                .iter()
                .copied()
                .filter(|s| !picked.contains(s.id.as_str()))
                .collect(),
        );
        if general_pool.len() < min_other as usize {
            warn!(
                available = general_pool.len(),
                needed = min_other,
                "not enough staff for other rooms"
            );
            warnings.push(format!(
                "Only {} staff available for other classrooms but {min_other} needed",
                general_pool.len()
            ));
        }
        let general_picks: Vec<(&StaffMember, TimeWindow)> = general_pool
            .into_iter()
            .filter_map(with_shift)
            .take(min_other as usize)
            .collect();

        let mut rooms = InfantRooms::new(classrooms, curve);
        let mut essential = Vec::with_capacity(infant_picks.len() + general_picks.len());
        for (member, shift) in &infant_picks {
            essential.push(self.essential(
                member,
                shift,
                CoverageAssignment::InfantRooms,
                rooms.claim(member),
                format!(
                    "Infant-qualified; needed for infant/toddler coverage ({min_infant} required at peak)"
                ),
            ));
        }
        for (member, shift) in &general_picks {
            essential.push(self.essential(
                member,
                shift,
                CoverageAssignment::General,
                rooms.claim(member),
                format!("Needed for classroom coverage ({min_other} required at peak)"),
            ));
        }

        let surplus: Vec<SurplusStaff> = eligible
            .iter()
            .filter(|s| !essential.iter().any(|e| e.id == s.id))
            .map(|s| {
                let reason = if s.is_infant_qualified() {
                    format!(
                        "Infant-qualified but not needed: infant/toddler rooms covered by {} staff",
                        infant_picks.len()
                    )
                } else {
                    format!(
                        "Not needed: other classrooms covered by {} staff",
                        general_picks.len()
                    )
                };
                surplus_entry(s, reason)
            })
            .collect();

        info!(
            eligible = eligible.len(),
            essential = essential.len(),
            surplus = surplus.len(),
            min_infant,
            min_other,
            strategy = self.strategy.name(),
            "coverage selected"
        );

        CoveragePlan {
            essential,
            surplus,
            min_infant_qualified_needed: min_infant,
            min_other_needed: min_other,
            warnings,
        }
    }

    fn essential(
        &self,
        member: &StaffMember,
        shift: &TimeWindow,
        assigned_for: CoverageAssignment,
        classroom_name: Option<String>,
        reason: String,
    ) -> EssentialStaff {
        EssentialStaff {
            id: member.id.clone(),
            name: member.name.clone(),
            role: member.role,
            classroom_title: member.classroom_title.clone(),
            infant_qualified: member.is_infant_qualified(),
            assigned_for,
            shift_start: shift.start,
            shift_end: shift.end,
            schedule: self.day_blocks(shift, member.lunch(), classroom_name.as_deref()),
            reason,
        }
    }

    /// Lays out a shift as work blocks around two breaks and lunch.
    pub fn day_blocks(
        &self,
        shift: &TimeWindow,
        lunch: Option<TimeWindow>,
        classroom_name: Option<&str>,
    ) -> Vec<WorkBlock> {
        let c = self.config;
        let len = c.break_minutes;
        let lunch = lunch.filter(|l| l.is_valid() && shift.encloses(l));

        let latest_in_shift = shift.end.minus_minutes(len);
        let break1_latest = lunch.map_or(latest_in_shift, |l| l.start.minus_minutes(len));
        let break1 = TimeWindow::starting_at(
            shift
                .start
                .plus_minutes(c.fallback_offset)
                .min(break1_latest)
                .max(shift.start),
            len,
        );

        let break2_anchor = lunch.map_or(
            shift.end.minus_minutes(c.no_lunch_break2_offset),
            |l| l.end.plus_minutes(c.fallback_offset),
        );
        let break2_earliest = lunch.map_or(break1.end, |l| l.end);
        let break2 = TimeWindow::starting_at(
            break2_anchor.min(latest_in_shift).max(break2_earliest),
            len,
        );

        let mut pauses: Vec<(TimeWindow, BlockKind)> = Vec::with_capacity(3);
        if shift.encloses(&break1) && !lunch.is_some_and(|l| l.overlaps(&break1)) {
            pauses.push((break1, BlockKind::Break));
        }
        if let Some(l) = lunch {
            pauses.push((l, BlockKind::Lunch));
        }
        if shift.encloses(&break2) && pauses.iter().all(|(w, _)| !w.overlaps(&break2)) {
            pauses.push((break2, BlockKind::Break));
        }
        pauses.sort_by_key(|(w, _)| w.start);

        let work = |start, end| WorkBlock {
            start,
            end,
            kind: BlockKind::Work,
            classroom_name: classroom_name.map(str::to_string),
        };
        let mut blocks = Vec::with_capacity(pauses.len() * 2 + 1);
        let mut cursor = shift.start;
        for (window, kind) in pauses {
            if window.start > cursor {
                blocks.push(work(cursor, window.start));
            }
            blocks.push(WorkBlock {
                start: window.start,
                end: window.end,
                kind,
                classroom_name: None,
            });
            cursor = window.end;
        }
        if cursor < shift.end {
            blocks.push(work(cursor, shift.end));
        }
        blocks
    }
}

/// Pairs a staff member with their shift; staff without one never get a day plan.
fn with_shift(member: &StaffMember) -> Option<(&StaffMember, TimeWindow)> {
    member.shift().map(|shift| (member, shift))
}

fn surplus_entry(member: &StaffMember, reason: String) -> SurplusStaff {
    SurplusStaff {
        id: member.id.clone(),
        name: member.name.clone(),
        role: member.role,
        classroom_title: member.classroom_title.clone(),
        infant_qualified: member.is_infant_qualified(),
        shift_start: member.shift_start,
        shift_end: member.shift_end,
        reason,
    }
}

/// Occupied infant/toddler rooms not yet claimed in this plan.
struct InfantRooms {
    open: Vec<String>,
}

impl InfantRooms {
    fn new(classrooms: &[Classroom], curve: &DemandCurve) -> Self {
        let occupied: BTreeSet<&str> = curve
            .slots
            .iter()
            .flat_map(|s| s.rooms.iter())
            .map(|r| r.classroom_id.as_str())
            .collect();
        Self {
            open: classrooms
                .iter()
                .filter(|c| c.age_group.is_infant_room() && occupied.contains(c.id.as_str()))
                .map(|c| c.name.clone())
                .collect(),
        }
    }

    /// Room name for an essential staff member's work blocks.
    ///
    /// Infant-qualified staff take the next unclaimed infant room; everyone
    /// else (and qualified staff once rooms run out) keeps the home title.
    fn claim(&mut self, member: &StaffMember) -> Option<String> {
        if member.is_infant_qualified() && !self.open.is_empty() {
            return Some(self.open.remove(0));
        }
        member.classroom_title.clone()
    }
}

/// Selects minimal coverage with the given strategy.
pub fn select_minimal_coverage(
    staff: &[StaffMember],
    classrooms: &[Classroom],
    curve: &DemandCurve,
    config: &EngineConfig,
    strategy: &dyn SelectionStrategy,
) -> CoveragePlan {
    CoverageSelector::new(config, strategy).select(staff, classrooms, curve)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::demand::{DemandModel, PresentRoster};
    use crate::models::clock::t;
    use crate::models::{AgeGroup, Qualification, RatioPolicy, StaffRole, Student};
    use crate::selection::{ById, ListOrder};

    fn classrooms() -> Vec<Classroom> {
        vec![
            Classroom::new("I1", "Infant A", AgeGroup::Infant),
            Classroom::new("I2", "Toddler B", AgeGroup::Toddler),
            Classroom::new("P1", "Preschool", AgeGroup::Preschool),
        ]
    }

    fn students(infants: usize, toddlers: usize, preschool: usize) -> Vec<Student> {
        let mut all = Vec::new();
        for (room, n) in [("I1", infants), ("I2", toddlers), ("P1", preschool)] {
            all.extend((0..n).map(|i| Student::new(format!("{room}-{i}"), room)));
        }
        all
    }

    fn curve(rooms: &[Classroom], kids: &[Student]) -> DemandCurve {
        let config = EngineConfig::default();
        DemandModel::build(rooms, &PresentRoster::resolve(kids, &[]), RatioPolicy::default(), &config)
            .curve()
    }

    fn working(id: &str) -> StaffMember {
        StaffMember::teacher(id)
            .with_name(id)
            .with_shift(t("08:00"), t("17:00"))
            .with_lunch(t("12:00"), t("13:00"))
    }

    fn qualified(id: &str) -> StaffMember {
        working(id).with_qualification(Qualification::InfantToddler)
    }

    fn ids<'a>(it: impl Iterator<Item = &'a String>) -> Vec<&'a str> {
        it.map(String::as_str).collect()
    }

    #[test]
    fn test_basic_selection() {
        let rooms = classrooms();
        // Infant 8 → 2, toddler 3 → 1, preschool 13 → 2
        let c = curve(&rooms, &students(8, 3, 13));
        let staff = vec![
            working("T1"),
            qualified("Q1"),
            working("T2"),
            qualified("Q2"),
            working("T3"),
            qualified("Q3"),
            qualified("Q4"),
            StaffMember::new("D1", StaffRole::Director).with_shift(t("07:00"), t("18:00")),
        ];
        let config = EngineConfig::default();
        let plan = select_minimal_coverage(&staff, &rooms, &c, &config, &ListOrder);

        assert_eq!(plan.min_infant_qualified_needed, 3);
        assert_eq!(plan.min_other_needed, 2);
        assert_eq!(
            ids(plan.essential_for(CoverageAssignment::InfantRooms).map(|e| &e.id)),
            ["Q1", "Q2", "Q3"]
        );
        assert_eq!(
            ids(plan.essential_for(CoverageAssignment::General).map(|e| &e.id)),
            ["T1", "T2"]
        );
        assert_eq!(ids(plan.surplus.iter().map(|s| &s.id)), ["T3", "Q4"]);
        assert_eq!(plan.minimal_staff_needed(), 5);
        assert!(plan.warnings.is_empty());
        assert!(!plan.is_essential("D1"));
        assert!(plan.surplus[1].reason.starts_with("Infant-qualified but not needed"));
    }

    #[test]
    fn test_leftover_qualified_staff_cover_other_rooms() {
        let rooms = classrooms();
        let c = curve(&rooms, &students(4, 0, 24));
        let staff = vec![qualified("Q1"), qualified("Q2"), qualified("Q3"), working("T1")];
        let plan = select_minimal_coverage(&staff, &rooms, &c, &EngineConfig::default(), &ListOrder);

        assert_eq!(plan.min_infant_qualified_needed, 1);
        assert_eq!(plan.min_other_needed, 2);
        assert_eq!(
            ids(plan.essential_for(CoverageAssignment::General).map(|e| &e.id)),
            ["Q2", "Q3"]
        );
        assert_eq!(ids(plan.surplus.iter().map(|s| &s.id)), ["T1"]);
    }

    #[test]
    fn test_lead_teacher_counts_as_qualified() {
        let rooms = classrooms();
        let c = curve(&rooms, &students(4, 0, 0));
        let lead = StaffMember::new("L1", StaffRole::LeadTeacher)
            .with_shift(t("07:00"), t("16:00"));
        let staff = vec![working("T1"), lead];
        let plan = select_minimal_coverage(&staff, &rooms, &c, &EngineConfig::default(), &ListOrder);
        assert_eq!(ids(plan.essential.iter().map(|e| &e.id)), ["L1"]);
    }

    #[test]
    fn test_day_plan_follows_recorded_shift() {
        let rooms = classrooms();
        let c = curve(&rooms, &students(4, 0, 0));
        let mut partial = qualified("Q0");
        partial.shift_end = None;
        let staff = vec![
            partial,
            qualified("Q1").with_shift(t("07:00"), t("15:00")),
        ];
        let plan = select_minimal_coverage(&staff, &rooms, &c, &EngineConfig::default(), &ListOrder);

        // Q0 has no full shift: neither essential nor surplus
        assert_eq!(ids(plan.essential.iter().map(|e| &e.id)), ["Q1"]);
        assert!(plan.surplus.is_empty());
        let q1 = &plan.essential[0];
        assert_eq!((q1.shift_start, q1.shift_end), (t("07:00"), t("15:00")));
        assert_eq!(q1.schedule.first().unwrap().start, t("07:00"));
        assert_eq!(q1.schedule.last().unwrap().end, t("15:00"));
    }

    #[test]
    fn test_qualified_shortfall_warns() {
        let rooms = classrooms();
        let c = curve(&rooms, &students(12, 0, 0));
        let staff = vec![qualified("Q1"), working("T1"), working("T2")];
        let plan = select_minimal_coverage(&staff, &rooms, &c, &EngineConfig::default(), &ListOrder);

        assert_eq!(plan.min_infant_qualified_needed, 3);
        assert_eq!(plan.essential.len(), 1);
        assert_eq!(plan.minimal_staff_needed(), 1);
        assert_eq!(plan.surplus.len(), 2);
        assert!(plan.warnings[0].contains("cannot reduce staff for infant rooms"));
    }

    #[test]
    fn test_no_students_everyone_surplus() {
        let rooms = classrooms();
        let c = curve(&rooms, &[]);
        let staff = vec![working("T1"), qualified("Q1")];
        let plan = select_minimal_coverage(&staff, &rooms, &c, &EngineConfig::default(), &ListOrder);
        assert_eq!(plan.minimal_staff_needed(), 0);
        assert_eq!(plan.surplus.len(), 2);
    }

    #[test]
    fn test_strategy_changes_order() {
        let rooms = classrooms();
        let c = curve(&rooms, &students(0, 0, 10));
        let staff = vec![working("T9"), working("T1")];
        let config = EngineConfig::default();

        let list = select_minimal_coverage(&staff, &rooms, &c, &config, &ListOrder);
        let by_id = select_minimal_coverage(&staff, &rooms, &c, &config, &ById);
        assert_eq!(list.essential[0].id, "T9");
        assert_eq!(by_id.essential[0].id, "T1");
    }

    #[test]
    fn test_day_blocks_layout() {
        let config = EngineConfig::default();
        let selector = CoverageSelector::new(&config, &ListOrder);
        let shift = TimeWindow::new(t("08:00"), t("17:00"));
        let lunch = TimeWindow::new(t("12:00"), t("13:00"));
        let blocks = selector.day_blocks(&shift, Some(lunch), Some("Twos"));

        let layout: Vec<(String, String, BlockKind)> = blocks
            .iter()
            .map(|b| (b.start.to_string(), b.end.to_string(), b.kind))
            .collect();
        let expect = [
            ("08:00", "10:00", BlockKind::Work),
            ("10:00", "10:10", BlockKind::Break),
            ("10:10", "12:00", BlockKind::Work),
            ("12:00", "13:00", BlockKind::Lunch),
            ("13:00", "15:00", BlockKind::Work),
            ("15:00", "15:10", BlockKind::Break),
            ("15:10", "17:00", BlockKind::Work),
        ];
        assert_eq!(layout.len(), expect.len());
        for (got, (s, e, k)) in layout.iter().zip(expect) {
            assert_eq!((got.0.as_str(), got.1.as_str(), got.2), (s, e, k));
        }
        assert!(blocks
            .iter()
            .filter(|b| b.kind == BlockKind::Work)
            .all(|b| b.classroom_name.as_deref() == Some("Twos")));
        assert!(blocks.iter().all(|b| b.classroom_name.is_none() || b.kind == BlockKind::Work));
    }

    #[test]
    fn test_day_blocks_clip_to_short_shift() {
        let config = EngineConfig::default();
        let selector = CoverageSelector::new(&config, &ListOrder);
        let shift = TimeWindow::new(t("12:00"), t("15:00"));
        let lunch = TimeWindow::new(t("13:00"), t("13:30"));
        let blocks = selector.day_blocks(&shift, Some(lunch), None);

        // Break 1 pulled before lunch, break 2 pulled inside the shift
        let breaks: Vec<_> = blocks.iter().filter(|b| b.kind == BlockKind::Break).collect();
        assert_eq!(breaks[0].start, t("12:50"));
        assert_eq!(breaks[1].start, t("14:50"));
        assert_eq!(blocks.first().unwrap().start, t("12:00"));
        assert_eq!(blocks.last().unwrap().end, t("15:00"));
        let total: u16 = blocks.iter().map(WorkBlock::duration_minutes).sum();
        assert_eq!(total, 180);
    }

    #[test]
    fn test_infant_rooms_claimed_once() {
        let rooms = classrooms();
        let c = curve(&rooms, &students(8, 4, 0));
        let staff = vec![
            qualified("Q1").with_classroom("Home Q1"),
            qualified("Q2").with_classroom("Home Q2"),
            qualified("Q3").with_classroom("Home Q3"),
            working("T1").with_classroom("Twos"),
        ];
        let plan = select_minimal_coverage(&staff, &rooms, &c, &EngineConfig::default(), &ListOrder);
        let room_of = |id: &str| {
            plan.essential
                .iter()
                .find(|e| e.id == id)
                .and_then(|e| e.schedule[0].classroom_name.clone())
        };
        assert_eq!(room_of("Q1").as_deref(), Some("Infant A"));
        assert_eq!(room_of("Q2").as_deref(), Some("Toddler B"));
        assert_eq!(room_of("Q3").as_deref(), Some("Home Q3"));
    }
}
