//! Staffing demand model.
//!
//! Turns classroom rosters, nap windows and a ratio policy into the
//! number of staff each classroom needs at any instant of the day.
//!
//! # Algorithm
//!
//! 1. Nap mode is decided per classroom and per instant: a classroom is
//!    napping at `t` when the share of its present children whose nap
//!    window contains `t` is strictly greater than the nap threshold.
//! 2. The ratio comes from the nap or awake table for the classroom's
//!    age group, falling back to the default ratio on a miss.
//! 3. Required staff is `ceil(present / ratio)`. Empty classrooms need
//!    nobody and drop out of every sum.
//! 4. Evaluating every classroom on the demand grid yields the
//!    [`DemandCurve`].
//!
//! # Presence
//! Only children marked present count. When no attendance exists for the
//! date, every enrolled child counts and [`PresentRoster::is_fallback`]
//! reports it so the caller can surface a warning.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{EngineConfig, NapSignalScope};
use crate::models::{AgeGroup, Classroom, ClockTime, RatioMode, RatioPolicy, Student, TimeWindow};

/// Children considered present for one date.
#[derive(Debug, Clone)]
pub struct PresentRoster {
    students: Vec<Student>,
    fallback: bool,
}

impl PresentRoster {
    /// Filters enrolled students by attendance.
    ///
    /// With an empty attendance list, every enrolled student is present.
    pub fn resolve(enrolled: &[Student], present_ids: &[String]) -> Self {
        if present_ids.is_empty() {
            return Self {
                students: enrolled.to_vec(),
                fallback: true,
            };
        }
        let present: BTreeSet<&str> = present_ids.iter().map(String::as_str).collect();
        Self {
            students: enrolled
                .iter()
                .filter(|s| present.contains(s.id.as_str()))
                .cloned()
                .collect(),
            fallback: false,
        }
    }

    /// Present students.
    pub fn students(&self) -> &[Student] {
        &self.students
    }

    /// Whether attendance was missing and all enrolled students were used.
    pub fn is_fallback(&self) -> bool {
        self.fallback
    }
}

/// Nap windows of the present children in one classroom.
#[derive(Debug, Clone)]
struct RoomRoster {
    classroom: Classroom,
    naps: Vec<Option<TimeWindow>>,
}

impl RoomRoster {
    fn present(&self) -> u32 {
        u32::try_from(self.naps.len()).unwrap_or(u32::MAX)
    }

    fn napping_at(&self, time: ClockTime) -> usize {
        self.naps
            .iter()
            .filter(|n| n.is_some_and(|w| w.contains(time)))
            .count()
    }
}

/// Anything that can tell whether the center is in nap time.
pub trait NapSignal {
    /// Whether `time` counts as nap time for break placement.
    fn is_napping_at(&self, time: ClockTime) -> bool;
}

/// One classroom's requirement at one slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomDemand {
    /// Classroom identifier.
    pub classroom_id: String,
    /// Classroom name.
    pub classroom_name: String,
    /// Age group.
    pub age_group: AgeGroup,
    /// Present children.
    pub present: u32,
    /// Ratio table in effect.
    pub mode: RatioMode,
    /// Staff required.
    pub required: u32,
}

/// A point on the demand grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    /// Slot time.
    pub time: ClockTime,
    /// Whether any occupied classroom is napping.
    pub nap_time: bool,
    /// Occupied classrooms, in input order.
    pub rooms: Vec<RoomDemand>,
}

impl TimeSlot {
    /// Staff needed across all classrooms.
    pub fn total_required(&self) -> u32 {
        self.rooms.iter().map(|r| r.required).sum()
    }

    /// Staff needed across infant/toddler classrooms.
    pub fn infant_required(&self) -> u32 {
        self.required_where(|g| g.is_infant_room())
    }

    /// Staff needed across all other classrooms.
    pub fn other_required(&self) -> u32 {
        self.required_where(|g| !g.is_infant_room())
    }

    fn required_where(&self, pred: impl Fn(AgeGroup) -> bool) -> u32 {
        self.rooms
            .iter()
            .filter(|r| pred(r.age_group))
            .map(|r| r.required)
            .sum()
    }
}

/// Per-slot demand across the operating day.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DemandCurve {
    /// Slots in time order.
    pub slots: Vec<TimeSlot>,
}

impl DemandCurve {
    /// Slot at exactly `time`, if on the grid.
    pub fn slot_at(&self, time: ClockTime) -> Option<&TimeSlot> {
        self.slots.iter().find(|s| s.time == time)
    }

    /// Day maximum of summed infant/toddler demand.
    pub fn peak_infant(&self) -> u32 {
        self.slots.iter().map(TimeSlot::infant_required).max().unwrap_or(0)
    }

    /// Day maximum of summed demand in all other classrooms.
    pub fn peak_other(&self) -> u32 {
        self.slots.iter().map(TimeSlot::other_required).max().unwrap_or(0)
    }

    /// Day maximum of total demand.
    pub fn peak_total(&self) -> u32 {
        self.slots.iter().map(TimeSlot::total_required).max().unwrap_or(0)
    }
}

/// Ratio-driven demand for one school and date.
///
/// # Example
/// ```
/// use u_coverage::config::EngineConfig;
/// use u_coverage::demand::{DemandModel, PresentRoster};
/// use u_coverage::models::{AgeGroup, Classroom, RatioPolicy, Student};
///
/// let rooms = vec![Classroom::new("C1", "Infant A", AgeGroup::Infant)];
/// let kids: Vec<Student> = (0..8).map(|i| Student::new(format!("S{i}"), "C1")).collect();
/// let present = PresentRoster::resolve(&kids, &[]);
/// let config = EngineConfig::default();
/// let model = DemandModel::build(&rooms, &present, RatioPolicy::default(), &config);
///
/// let ten = "10:00".parse().unwrap();
/// assert_eq!(model.required_staff(&rooms[0], 8, ten), 2);
/// ```
#[derive(Debug, Clone)]
pub struct DemandModel {
    rooms: Vec<RoomRoster>,
    policy: RatioPolicy,
    config: EngineConfig,
}

impl DemandModel {
    /// Groups present children by classroom.
    ///
    /// Children whose classroom is unknown are ignored.
    pub fn build(
        classrooms: &[Classroom],
        present: &PresentRoster,
        policy: RatioPolicy,
        config: &EngineConfig,
    ) -> Self {
        let mut naps: HashMap<&str, Vec<Option<TimeWindow>>> = HashMap::new();
        for student in present.students() {
            naps.entry(student.classroom_id.as_str())
                .or_default()
                .push(student.nap());
        }

        let rooms = classrooms
            .iter()
            .map(|c| RoomRoster {
                classroom: c.clone(),
                naps: naps.get(c.id.as_str()).cloned().unwrap_or_default(),
            })
            .collect();

        Self {
            rooms,
            policy,
            config: config.clone(),
        }
    }

    /// Effective ratio policy.
    pub fn policy(&self) -> &RatioPolicy {
        &self.policy
    }

    /// Classrooms with at least one present child, in input order.
    pub fn occupied_classrooms(&self) -> impl Iterator<Item = &Classroom> {
        self.rooms
            .iter()
            .filter(|r| r.present() > 0)
            .map(|r| &r.classroom)
    }

    /// Present children in a classroom (0 if unknown).
    pub fn present_count(&self, classroom_id: &str) -> u32 {
        self.room(classroom_id).map_or(0, RoomRoster::present)
    }

    /// Present children across all classrooms.
    pub fn total_present(&self) -> u32 {
        self.rooms.iter().map(RoomRoster::present).sum()
    }

    fn room(&self, classroom_id: &str) -> Option<&RoomRoster> {
        self.rooms.iter().find(|r| r.classroom.id == classroom_id)
    }

    /// Whether a classroom is in nap mode at `time`.
    ///
    /// Strict majority rule: the napping share must exceed the threshold.
    pub fn is_nap_time(&self, classroom_id: &str, time: ClockTime) -> bool {
        self.room(classroom_id)
            .is_some_and(|room| self.room_is_napping(room, time))
    }

    fn room_is_napping(&self, room: &RoomRoster, time: ClockTime) -> bool {
        let present = room.present();
        if present == 0 {
            return false;
        }
        let share = room.napping_at(time) as f64 / f64::from(present);
        share > self.config.nap_threshold
    }

    /// Ratio table in effect for a classroom at `time`.
    pub fn mode_at(&self, classroom_id: &str, time: ClockTime) -> RatioMode {
        if self.is_nap_time(classroom_id, time) {
            RatioMode::Nap
        } else {
            RatioMode::Awake
        }
    }

    /// Staff required for `present_count` children in `classroom` at `at`.
    pub fn required_staff(&self, classroom: &Classroom, present_count: u32, at: ClockTime) -> u32 {
        if present_count == 0 {
            return 0;
        }
        self.policy.required_staff(
            classroom.age_group,
            self.mode_at(&classroom.id, at),
            present_count,
            self.config.default_ratio,
        )
    }

    /// Demand of every occupied classroom at `time`.
    pub fn slot(&self, time: ClockTime) -> TimeSlot {
        let rooms: Vec<RoomDemand> = self
            .rooms
            .iter()
            .filter(|r| r.present() > 0)
            .map(|r| {
                let present = r.present();
                RoomDemand {
                    classroom_id: r.classroom.id.clone(),
                    classroom_name: r.classroom.name.clone(),
                    age_group: r.classroom.age_group,
                    present,
                    mode: self.mode_at(&r.classroom.id, time),
                    required: self.required_staff(&r.classroom, present, time),
                }
            })
            .collect();
        let nap_time = rooms.iter().any(|r| r.mode == RatioMode::Nap);
        TimeSlot {
            time,
            nap_time,
            rooms,
        }
    }

    /// Total staff needed at `time`.
    pub fn demand_at(&self, time: ClockTime) -> u32 {
        self.slot(time).total_required()
    }

    /// Demand at the configured peak instant.
    pub fn peak_demand(&self) -> u32 {
        self.demand_at(self.config.peak_instant)
    }

    /// Demand at the configured nap-representative instant.
    pub fn nap_demand(&self) -> u32 {
        self.demand_at(self.config.nap_instant)
    }

    /// Evaluates every occupied classroom on the demand grid.
    pub fn curve(&self) -> DemandCurve {
        let slots: Vec<TimeSlot> = self
            .config
            .demand_grid
            .points()
            .map(|time| self.slot(time))
            .collect();
        for slot in &slots {
            debug!(
                time = %slot.time,
                total = slot.total_required(),
                infant = slot.infant_required(),
                nap = slot.nap_time,
                "demand slot"
            );
        }
        DemandCurve { slots }
    }
}

impl NapSignal for DemandModel {
    fn is_napping_at(&self, time: ClockTime) -> bool {
        match self.config.nap_signal {
            NapSignalScope::AnyClassroom => self
                .rooms
                .iter()
                .any(|room| self.room_is_napping(room, time)),
            NapSignalScope::FirstClassroom => self
                .rooms
                .first()
                .is_some_and(|room| self.room_is_napping(room, time)),
        }
    }
}
