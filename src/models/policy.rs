//! Staff-to-child ratio policy.
//!
//! A policy holds two tables, one for awake hours and one for nap hours,
//! each mapping an [`AgeGroup`] to the maximum number of children one
//! staff member may supervise.
//!
//! # Precedence
//! 1. School-level entries override global entries.
//! 2. Global entries override the built-in tables.
//! 3. A lookup miss (or a zero ratio) resolves to [`DEFAULT_RATIO`].
//!
//! The built-in tables list every [`AgeGroup`], so a resolved policy only
//! misses when a stored entry is zero or the tables were built by hand.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::AgeGroup;

/// Ratio used when an age group is missing from the active table.
pub const DEFAULT_RATIO: u32 = 12;

/// Which ratio table applies to a classroom at an instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RatioMode {
    /// Normal (awake) hours.
    Awake,
    /// Majority of present children napping.
    Nap,
}

/// Age group → maximum children per staff member.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RatioTable(BTreeMap<AgeGroup, u32>);

impl RatioTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets one entry.
    pub fn with(mut self, age_group: AgeGroup, ratio: u32) -> Self {
        self.0.insert(age_group, ratio);
        self
    }

    /// Built-in awake-hours table.
    pub fn default_awake() -> Self {
        Self::uniform(4, 12)
    }

    /// Built-in nap-hours table.
    pub fn default_nap() -> Self {
        Self::uniform(12, 24)
    }

    fn uniform(infant_rooms: u32, other_rooms: u32) -> Self {
        AgeGroup::ALL
            .into_iter()
            .map(|g| (g, if g.is_infant_room() { infant_rooms } else { other_rooms }))
            .collect()
    }

    /// Raw lookup.
    pub fn get(&self, age_group: AgeGroup) -> Option<u32> {
        self.0.get(&age_group).copied()
    }

    /// Overlays `overrides` on top of this table.
    pub fn merged_with(&self, overrides: &RatioTable) -> Self {
        let mut merged = self.0.clone();
        merged.extend(overrides.0.iter().map(|(g, r)| (*g, *r)));
        Self(merged)
    }

    /// Whether the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(AgeGroup, u32)> for RatioTable {
    fn from_iter<I: IntoIterator<Item = (AgeGroup, u32)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// One stored policy record (global or school-level).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatioRecord {
    /// Normal-hours entries.
    #[serde(default)]
    pub normal: RatioTable,
    /// Nap-hours entries.
    #[serde(default)]
    pub nap: RatioTable,
}

/// Policy records as supplied by settings storage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatioSettings {
    /// Organization-wide defaults.
    #[serde(default)]
    pub global: Option<RatioRecord>,
    /// Overrides for one school.
    #[serde(default)]
    pub school: Option<RatioRecord>,
}

/// Effective ratio policy for one school.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatioPolicy {
    /// Awake-hours table.
    pub awake: RatioTable,
    /// Nap-hours table.
    pub nap: RatioTable,
}

impl Default for RatioPolicy {
    fn default() -> Self {
        Self {
            awake: RatioTable::default_awake(),
            nap: RatioTable::default_nap(),
        }
    }
}

impl RatioPolicy {
    /// Creates a policy from explicit tables.
    pub fn new(awake: RatioTable, nap: RatioTable) -> Self {
        Self { awake, nap }
    }

    /// Layers stored records over the built-in tables.
    ///
    /// School entries override global entries, which override the
    /// built-in tables. An age group absent from both records keeps its
    /// built-in ratio, so a partial school record never loosens infant
    /// rooms to the default ratio.
    pub fn resolve(settings: &RatioSettings) -> Self {
        let mut policy = Self::default();
        for record in [&settings.global, &settings.school].into_iter().flatten() {
            policy.awake = policy.awake.merged_with(&record.normal);
            policy.nap = policy.nap.merged_with(&record.nap);
        }
        policy
    }

    /// Ratio for an age group in the given mode.
    ///
    /// Falls back to [`DEFAULT_RATIO`] on a miss or a zero entry.
    pub fn ratio_for(&self, age_group: AgeGroup, mode: RatioMode) -> u32 {
        self.ratio_or(age_group, mode, DEFAULT_RATIO)
    }

    /// Like [`ratio_for`](Self::ratio_for) with a caller-supplied fallback.
    pub fn ratio_or(&self, age_group: AgeGroup, mode: RatioMode, fallback: u32) -> u32 {
        let table = match mode {
            RatioMode::Awake => &self.awake,
            RatioMode::Nap => &self.nap,
        };
        table
            .get(age_group)
            .filter(|r| *r > 0)
            .unwrap_or(fallback.max(1))
    }

    /// Staff needed for `present` children: `ceil(present / ratio)`.
    ///
    /// `fallback` is the ratio used on a miss, as in [`ratio_or`](Self::ratio_or).
    pub fn required_staff(
        &self,
        age_group: AgeGroup,
        mode: RatioMode,
        present: u32,
        fallback: u32,
    ) -> u32 {
        present.div_ceil(self.ratio_or(age_group, mode, fallback))
    }
}
