//! Three-phase mutation.
//!
//! Fill tries to place unassigned genes, Move relocates placed genes,
//! Swap exchanges the placements of two placed genes. Fill runs at a
//! floor probability of 0.5 regardless of the configured rate: an
//! unassigned hour is pure penalty, so retrying it aggressively is
//! always worthwhile. Every phase keeps the individual conflict-free.

use rand::seq::IndexedRandom;
use rand::Rng;

use crate::cancel::CancellationToken;
use crate::models::{AllowSet, Gene, Individual, Placement, RoomTypeMap, SlotPool};

use super::busy::{find_slot, BusySets};

/// Candidate attempts per gene in the Fill and Move phases.
const SLOT_TRIES: usize = 30;

/// Floor probability for retrying unassigned genes.
const FILL_FLOOR: f64 = 0.5;

/// Produces a mutated copy of an individual.
///
/// The result is unevaluated and never carries a teacher, group, or
/// room double-booking that the input did not already have.
pub fn mutate<R: Rng>(
    individual: &Individual,
    pool: &SlotPool,
    allow: &AllowSet,
    room_types: &RoomTypeMap,
    rate: f64,
    rng: &mut R,
    cancel: &CancellationToken,
) -> Individual {
    let mut genes = individual.genes.clone();
    let mut busy = BusySets::from_genes(&genes);

    // Fill: retry unassigned genes.
    let fill_rate = rate.max(FILL_FLOOR);
    for gene in genes.iter_mut().filter(|g| !g.is_assigned()) {
        if cancel.is_cancelled() {
            return Individual::new(genes);
        }
        if !rng.random_bool(fill_rate) {
            continue;
        }
        if let Some(p) = find_slot(
            &gene.unit, &busy, pool, allow, room_types, None, SLOT_TRIES, rng, cancel,
        ) {
            busy.occupy(&gene.unit, &p);
            gene.placement = Some(p);
        }
    }

    // Move: relocate placed genes.
    for gene in genes.iter_mut() {
        if cancel.is_cancelled() {
            return Individual::new(genes);
        }
        let Some(current) = gene.placement.clone() else {
            continue;
        };
        if !rng.random_bool(rate) {
            continue;
        }
        busy.release(&gene.unit, &current);
        match find_slot(
            &gene.unit,
            &busy,
            pool,
            allow,
            room_types,
            Some(&current),
            SLOT_TRIES,
            rng,
            cancel,
        ) {
            Some(p) => {
                busy.occupy(&gene.unit, &p);
                gene.placement = Some(p);
            }
            None => busy.occupy(&gene.unit, &current),
        }
    }

    // Swap: exchange two placements, at most once.
    if !cancel.is_cancelled() && rng.random_bool(rate) {
        try_swap(&mut genes, &mut busy, allow, rng);
    }

    Individual::new(genes)
}

fn try_swap<R: Rng>(genes: &mut [Gene], busy: &mut BusySets, allow: &AllowSet, rng: &mut R) {
    let assigned: Vec<usize> = (0..genes.len()).filter(|&i| genes[i].is_assigned()).collect();
    let picked: Vec<usize> = assigned.choose_multiple(rng, 2).copied().collect();
    let [i, j] = picked[..] else { return };

    let (Some(pi), Some(pj)) = (genes[i].placement.clone(), genes[j].placement.clone()) else {
        return;
    };

    let permitted = |gene: &Gene, p: &Placement| {
        gene.unit.group_type.is_some_and(|gt| {
            allow.permits(gt, p.day, p.start_min, p.stop_min, &p.room)
        })
    };
    if !permitted(&genes[i], &pj) || !permitted(&genes[j], &pi) {
        return;
    }

    busy.release(&genes[i].unit, &pi);
    busy.release(&genes[j].unit, &pj);

    if busy.conflicts(&genes[i].unit, &pj) {
        busy.occupy(&genes[i].unit, &pi);
        busy.occupy(&genes[j].unit, &pj);
        return;
    }
    busy.occupy(&genes[i].unit, &pj);
    if busy.conflicts(&genes[j].unit, &pi) {
        busy.release(&genes[i].unit, &pj);
        busy.occupy(&genes[i].unit, &pi);
        busy.occupy(&genes[j].unit, &pj);
        return;
    }
    busy.occupy(&genes[j].unit, &pi);

    genes[i].placement = Some(pj);
    genes[j].placement = Some(pi);
}
