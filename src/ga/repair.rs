//! Final greedy repair.
//!
//! After evolution ends, the winner may still carry unassigned hours
//! that a direct pass can place. Candidates are tried in pool order so
//! the pass is deterministic for a given winner. The repaired schedule
//! replaces the winner only when its score is at least as good;
//! placements are individually legal but can still lose points to soft
//! rules, and a repair must never ship a worse schedule.

use crate::models::{AllowSet, Individual, RoomTypeMap, SlotPool};

use super::busy::{find_slot_ordered, BusySets};
use super::fitness::FitnessEvaluator;

/// Candidate attempts per unassigned gene.
const REPAIR_TRIES: usize = 200;

/// Tries to place the winner's unassigned hours.
///
/// Returns the repaired individual when it scores at least as well as
/// the input, otherwise a copy of the input. The result carries an
/// up-to-date fitness either way.
pub fn greedy_repair(
    best: &Individual,
    pool: &SlotPool,
    allow: &AllowSet,
    room_types: &RoomTypeMap,
    evaluator: &FitnessEvaluator<'_>,
) -> Individual {
    if best.unassigned_count() == 0 {
        return best.clone();
    }

    let mut repaired = best.clone();
    let mut busy = BusySets::from_genes(&repaired.genes);
    let mut placed_any = false;
    for gene in repaired.genes.iter_mut().filter(|g| !g.is_assigned()) {
        if let Some(p) =
            find_slot_ordered(&gene.unit, &busy, pool, allow, room_types, REPAIR_TRIES)
        {
            busy.occupy(&gene.unit, &p);
            gene.placement = Some(p);
            placed_any = true;
        }
    }
    if !placed_any {
        return best.clone();
    }

    repaired.fitness = evaluator.score(&repaired.genes);
    if repaired.fitness >= best.fitness {
        repaired
    } else {
        best.clone()
    }
}
