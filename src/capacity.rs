//! Capacity preflight check.
//!
//! Before the expensive search starts, compare demand (units per group
//! type) against supply (distinct placements the pool offers that group
//! type). A deficit guarantees unassigned hours no matter how long the
//! search runs, so it is worth knowing up front.
//!
//! Advisory by default: deficits are logged and the search proceeds
//! best-effort. [`GaConfig::fail_on_deficit`](crate::ga::GaConfig)
//! promotes them to [`SolveError::Infeasible`](crate::SolveError).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::{CourseUnit, GroupTypeId, SlotPool};

/// A group type whose demand exceeds its distinct slot supply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapacityDeficit {
    /// Group type short of capacity.
    pub group_type: GroupTypeId,
    /// Units that need this group type.
    pub required: usize,
    /// Distinct (day, start, stop, room) placements available to it.
    pub capacity: usize,
    /// `max(0, required - capacity)`.
    pub deficit: usize,
}

/// Computes capacity deficits per group type, sorted by group type.
///
/// Units without a resolved group type cannot be counted against any
/// supply; they are reported separately via a warning because they will
/// surface as permanently unassigned genes.
pub fn check(units: &[CourseUnit], pool: &SlotPool) -> Vec<CapacityDeficit> {
    let mut required: BTreeMap<GroupTypeId, usize> = BTreeMap::new();
    let mut unresolved = 0usize;
    for unit in units {
        match unit.group_type {
            Some(gt) => *required.entry(gt).or_insert(0) += 1,
            None => unresolved += 1,
        }
    }

    if unresolved > 0 {
        log::warn!(
            "{unresolved} unit(s) have no group type and will stay unassigned"
        );
    }

    let mut deficits = Vec::new();
    for (group_type, required) in required {
        let capacity = pool.distinct_capacity(group_type);
        if required > capacity {
            let deficit = required - capacity;
            log::warn!(
                "capacity deficit for group type {group_type}: \
                 {required} hour(s) required, {capacity} distinct slot(s) available"
            );
            deficits.push(CapacityDeficit {
                group_type,
                required,
                capacity,
                deficit,
            });
        }
    }
    deficits
}
