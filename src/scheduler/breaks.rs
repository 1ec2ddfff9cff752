//! Break placement.
//!
//! # Algorithm
//!
//! For each staff member with a full shift, in input order:
//!
//! 1. Break 1 candidates come from the break-candidate grid. A candidate
//!    is valid when it starts more than `min_lead_after_shift_start`
//!    after shift start and ends more than `min_gap_before_lunch` before
//!    lunch (before the shift midpoint when no lunch is recorded).
//! 2. Among valid candidates whose start is not yet claimed, the first
//!    nap-time candidate wins. Otherwise the default offset
//!    (shift start + 120) wins if it is itself valid and unclaimed.
//!    Otherwise the last valid unclaimed candidate wins.
//! 3. Break 2 mirrors this after lunch: more than `min_gap_after_lunch`
//!    after lunch end, ending more than `min_gap_before_shift_end` before
//!    shift end, default lunch end + 120 (or shift end − 90 with no lunch).
//!
//! # Fallback
//!
//! With no valid candidate, the default offset is pulled toward the shift
//! but never across the lunch-side bound:
//!
//! | Break | Hard bound | Soft bound |
//! |-------|------------|------------|
//! | 1 | ends at or before lunch start − 30 (shift midpoint with no lunch) | starts at or after shift start |
//! | 2 | starts at or after lunch end + 60 (shift midpoint with no lunch) | ends at or before shift end |
//!
//! When a shift is too short for both, the hard bound wins and the break
//! lands outside the shift rather than next to or inside lunch.
//!
//! Claimed starts live in a set owned by one call, so concurrent runs
//! never see each other's picks. De-duplication is best effort: when every
//! slot is taken, staff still get a break.
//!
//! Staff without a full shift are not working and are skipped.

use std::collections::BTreeSet;

use tracing::debug;

use crate::config::EngineConfig;
use crate::demand::NapSignal;
use crate::models::{BreakAssignment, ClockTime, StaffMember, TimeWindow};

/// How a break start was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakSource {
    /// First open nap-time candidate.
    NapSlot,
    /// The default offset, valid and open.
    DefaultOffset,
    /// Last open valid candidate.
    LastOpenSlot,
    /// No valid candidate; default offset pulled toward the shift.
    Clipped,
}

/// Which of the two breaks a rule places.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BreakSlot {
    BeforeLunch,
    AfterLunch,
}

/// Bounds a break window must respect.
#[derive(Debug, Clone, Copy)]
struct BreakRule {
    slot: BreakSlot,
    /// Start must be strictly after this.
    start_after: ClockTime,
    /// End must be strictly before this.
    end_before: ClockTime,
    /// Preferred start when no nap slot is open.
    default_start: ClockTime,
}

impl BreakRule {
    fn admits(&self, window: &TimeWindow, shift: &TimeWindow) -> bool {
        window.start > self.start_after && window.end < self.end_before && shift.encloses(window)
    }
}

/// Places two short breaks per working staff member.
pub struct BreakScheduler<'a, N: NapSignal + ?Sized> {
    config: &'a EngineConfig,
    nap: &'a N,
}

impl<'a, N: NapSignal + ?Sized> BreakScheduler<'a, N> {
    /// Creates a scheduler reading nap time from `nap`.
    pub fn new(config: &'a EngineConfig, nap: &'a N) -> Self {
        Self { config, nap }
    }

    /// Schedules breaks for every working staff member.
    ///
    /// The result holds one assignment per staff member with a full
    /// shift, in input order.
    pub fn schedule(&self, staff: &[StaffMember]) -> Vec<BreakAssignment> {
        let mut claimed = BTreeSet::new();
        staff
            .iter()
            .filter_map(|member| self.schedule_one(member, &mut claimed))
            .collect()
    }

    /// Schedules one staff member, claiming the chosen starts.
    ///
    /// Returns `None` for staff without a full shift.
    pub fn schedule_one(
        &self,
        member: &StaffMember,
        claimed: &mut BTreeSet<ClockTime>,
    ) -> Option<BreakAssignment> {
        let shift = member.shift().filter(TimeWindow::is_valid)?;
        let lunch = member
            .lunch()
            .filter(|l| l.is_valid() && shift.encloses(l));

        let rule1 = self.first_rule(&shift, lunch.as_ref());
        let (break1, source1) = self.place(&rule1, &shift, claimed);
        claimed.insert(break1.start);

        let rule2 = self.second_rule(&shift, lunch.as_ref());
        let (break2, source2) = self.place(&rule2, &shift, claimed);
        claimed.insert(break2.start);

        debug!(
            staff_id = %member.id,
            break1 = %break1,
            break2 = %break2,
            ?source1,
            ?source2,
            "breaks placed"
        );

        Some(BreakAssignment {
            staff_id: member.id.clone(),
            staff_name: member.name.clone(),
            break1_start: break1.start,
            break1_end: break1.end,
            break2_start: break2.start,
            break2_end: break2.end,
            lunch_start: lunch.map(|l| l.start),
            lunch_end: lunch.map(|l| l.end),
        })
    }

    fn window_at(&self, start: ClockTime) -> TimeWindow {
        TimeWindow::starting_at(start, self.config.break_minutes)
    }

    fn midpoint(shift: &TimeWindow) -> ClockTime {
        shift.start.plus_minutes(shift.duration_minutes() / 2)
    }

    fn first_rule(&self, shift: &TimeWindow, lunch: Option<&TimeWindow>) -> BreakRule {
        let c = self.config;
        let end_before = match lunch {
            Some(l) => l.start.minus_minutes(c.min_gap_before_lunch),
            None => Self::midpoint(shift),
        };
        BreakRule {
            slot: BreakSlot::BeforeLunch,
            start_after: shift.start.plus_minutes(c.min_lead_after_shift_start),
            end_before,
            default_start: shift.start.plus_minutes(c.fallback_offset),
        }
    }

    fn second_rule(&self, shift: &TimeWindow, lunch: Option<&TimeWindow>) -> BreakRule {
        let c = self.config;
        let (start_after, default_start) = match lunch {
            Some(l) => (
                l.end.plus_minutes(c.min_gap_after_lunch),
                l.end.plus_minutes(c.fallback_offset),
            ),
            None => (
                Self::midpoint(shift),
                shift.end.minus_minutes(c.no_lunch_break2_offset),
            ),
        };
        BreakRule {
            slot: BreakSlot::AfterLunch,
            start_after,
            end_before: shift.end.minus_minutes(c.min_gap_before_shift_end),
            default_start,
        }
    }

    fn place(
        &self,
        rule: &BreakRule,
        shift: &TimeWindow,
        claimed: &BTreeSet<ClockTime>,
    ) -> (TimeWindow, BreakSource) {
        let open: Vec<TimeWindow> = self
            .config
            .break_grid
            .points()
            .map(|start| self.window_at(start))
            .filter(|w| rule.admits(w, shift) && !claimed.contains(&w.start))
            .collect();

        if let Some(w) = open.iter().find(|w| self.nap.is_napping_at(w.start)) {
            return (*w, BreakSource::NapSlot);
        }

        let default = self.window_at(rule.default_start);
        if rule.admits(&default, shift) && !claimed.contains(&default.start) {
            return (default, BreakSource::DefaultOffset);
        }

        if let Some(w) = open.last() {
            return (*w, BreakSource::LastOpenSlot);
        }

        (self.clip(rule, shift), BreakSource::Clipped)
    }

    /// Pulls the default start toward the shift without crossing lunch.
    fn clip(&self, rule: &BreakRule, shift: &TimeWindow) -> TimeWindow {
        let len = self.config.break_minutes;
        let start = match rule.slot {
            BreakSlot::BeforeLunch => {
                let latest = rule.end_before.minus_minutes(len);
                rule.default_start.min(latest).max(shift.start).min(latest)
            }
            BreakSlot::AfterLunch => rule
                .default_start
                .min(shift.end.minus_minutes(len))
                .max(rule.start_after),
        };
        self.window_at(start)
    }
}

/// Schedules breaks for `staff` against a nap signal.
///
/// # Example
/// ```
/// use u_coverage::config::EngineConfig;
/// use u_coverage::demand::NapSignal;
/// use u_coverage::models::{ClockTime, StaffMember};
/// use u_coverage::scheduler::schedule_breaks;
///
/// struct NeverNapping;
/// impl NapSignal for NeverNapping {
///     fn is_napping_at(&self, _: ClockTime) -> bool { false }
/// }
///
/// let t = |s: &str| s.parse::<ClockTime>().unwrap();
/// let staff = vec![StaffMember::teacher("T1")
///     .with_shift(t("08:00"), t("17:00"))
///     .with_lunch(t("12:00"), t("13:00"))];
///
/// let breaks = schedule_breaks(&staff, &NeverNapping, &EngineConfig::default());
/// assert_eq!(breaks[0].break1_start, t("10:00"));
/// assert_eq!(breaks[0].break2_start, t("15:00"));
/// ```
pub fn schedule_breaks<N: NapSignal + ?Sized>(
    staff: &[StaffMember],
    nap: &N,
    config: &EngineConfig,
) -> Vec<BreakAssignment> {
    BreakScheduler::new(config, nap).schedule(staff)
}
