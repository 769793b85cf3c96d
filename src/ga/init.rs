//! Population initialization.
//!
//! Builds the starting population with a randomized greedy pass per
//! individual: course buckets in random order, theory hours before lab
//! hours within a bucket, each hour taking the first conflict-free
//! candidate slot in a shuffled supply. Hours that find nothing start
//! unassigned and are retried by later phases.
//!
//! Each individual derives its own RNG from the run seed, so the
//! population is diverse yet fully reproducible.

use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::cancel::CancellationToken;
use crate::error::SolveError;
use crate::models::{CourseUnit, Gene, Individual, Placement, RoomTypeMap, SlotPool};

use super::busy::{room_type_fits, BusySets};

/// Chance an individual prefers room-type-matching candidates first.
const ROOM_TYPE_PREFERENCE: f64 = 0.7;

/// Per-individual seed derivation: golden-ratio mix of the run seed.
fn derive_seed(seed: u64, index: usize) -> u64 {
    seed ^ (index as u64 + 1).wrapping_mul(0x9E37_79B9_7F4A_7C15)
}

/// Unit indices grouped by course, theory hours first within a group.
fn course_buckets(units: &[CourseUnit]) -> Vec<Vec<usize>> {
    let mut order: Vec<(&str, &str, &str, &str)> = Vec::new();
    let mut buckets: Vec<Vec<usize>> = Vec::new();
    for (i, unit) in units.iter().enumerate() {
        let key = unit.course_key();
        match order.iter().position(|k| *k == key) {
            Some(pos) => buckets[pos].push(i),
            None => {
                order.push(key);
                buckets.push(vec![i]);
            }
        }
    }
    for bucket in &mut buckets {
        bucket.sort_by_key(|&i| units[i].kind);
    }
    buckets
}

fn build_individual(
    units: &[CourseUnit],
    pool: &SlotPool,
    room_types: &RoomTypeMap,
    buckets: &mut [Vec<usize>],
    rng: &mut SmallRng,
) -> Individual {
    buckets.shuffle(rng);

    let mut genes: Vec<Option<Gene>> = vec![None; units.len()];
    let mut busy = BusySets::new();
    let mut scratch: Vec<usize> = Vec::new();

    for bucket in buckets.iter() {
        for &ui in bucket {
            let unit = &units[ui];
            genes[ui] = Some(place_unit(unit, pool, room_types, &mut busy, &mut scratch, rng));
        }
    }

    // Every slot of `genes` was filled above.
    Individual::new(genes.into_iter().flatten().collect())
}

/// Candidate subset whose rooms satisfy the unit's room-type
/// requirement, by the same predicate the slot search uses: rooms of
/// unknown type count as fitting.
fn fitting_candidates(
    unit: &CourseUnit,
    pool: &SlotPool,
    candidates: &[usize],
    room_types: &RoomTypeMap,
) -> Vec<usize> {
    candidates
        .iter()
        .copied()
        .filter(|&i| room_type_fits(unit, &pool.slot(i).room, room_types))
        .collect()
}

fn place_unit(
    unit: &CourseUnit,
    pool: &SlotPool,
    room_types: &RoomTypeMap,
    busy: &mut BusySets,
    scratch: &mut Vec<usize>,
    rng: &mut SmallRng,
) -> Gene {
    let Some(group_type) = unit.group_type else {
        return Gene::unassigned(unit.clone());
    };
    let candidates = pool.candidates(group_type);
    if candidates.is_empty() {
        return Gene::unassigned(unit.clone());
    }

    scratch.clear();
    scratch.extend_from_slice(candidates);

    // Most individuals try fitting rooms first; the rest explore the
    // whole supply, keeping diversity.
    if unit.room_type.is_some() && rng.random_bool(ROOM_TYPE_PREFERENCE) {
        let fitting = fitting_candidates(unit, pool, scratch, room_types);
        if !fitting.is_empty() {
            *scratch = fitting;
        }
    }

    scratch.shuffle(rng);
    for &i in scratch.iter() {
        let slot = pool.slot(i);
        if slot.start_min >= slot.stop_min {
            continue;
        }
        let placement = Placement::new(slot.day, slot.start_min, slot.stop_min, slot.room.clone());
        if !busy.conflicts(unit, &placement) {
            busy.occupy(unit, &placement);
            return Gene::assigned(unit.clone(), placement);
        }
    }
    Gene::unassigned(unit.clone())
}

/// Builds the starting population.
///
/// Every individual carries exactly one gene per unit, in unit order.
/// Fails only on cancellation; an individual that places nothing is
/// still a valid (heavily penalized) starting point.
pub fn initialize(
    units: &[CourseUnit],
    pool: &SlotPool,
    room_types: &RoomTypeMap,
    population_size: usize,
    seed: u64,
    cancel: &CancellationToken,
) -> Result<Vec<Individual>, SolveError> {
    let mut buckets = course_buckets(units);
    let mut population = Vec::with_capacity(population_size);
    for i in 0..population_size {
        if cancel.is_cancelled() {
            return Err(SolveError::Cancelled);
        }
        let mut rng = SmallRng::seed_from_u64(derive_seed(seed, i));
        population.push(build_individual(
            units,
            pool,
            room_types,
            &mut buckets,
            &mut rng,
        ));
    }
    Ok(population)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{SessionKind, SlotCandidate, Weekday};

    fn units() -> Vec<CourseUnit> {
        vec![
            CourseUnit::new("CS-101", "1", "Turing", "G1", SessionKind::Theory)
                .with_group_type(1),
            CourseUnit::new("CS-101", "1", "Turing", "G1", SessionKind::Lab).with_group_type(1),
            CourseUnit::new("MA-201", "1", "Noether", "G1", SessionKind::Theory)
                .with_group_type(1),
        ]
    }

    fn roomy_pool() -> SlotPool {
        let mut slots = Vec::new();
        for day in [Weekday::Mon, Weekday::Tue, Weekday::Wed] {
            for hour in 0..6u16 {
                let start = 480 + hour * 60;
                slots.push(SlotCandidate::new(1, day, start, start + 60, "R101"));
                slots.push(SlotCandidate::new(1, day, start, start + 60, "R102"));
            }
        }
        SlotPool::new(slots)
    }

    #[test]
    fn test_population_shape() {
        let units = units();
        let pool = roomy_pool();
        let cancel = CancellationToken::new();
        let population =
            initialize(&units, &pool, &RoomTypeMap::new(), 10, 42, &cancel).unwrap();

        assert_eq!(population.len(), 10);
        for ind in &population {
            assert_eq!(ind.len(), units.len());
            // Gene order mirrors unit order regardless of placement order.
            for (gene, unit) in ind.genes.iter().zip(&units) {
                assert_eq!(&gene.unit, unit);
            }
        }
    }

    #[test]
    fn test_ample_supply_places_everything() {
        let units = units();
        let pool = roomy_pool();
        let cancel = CancellationToken::new();
        let population =
            initialize(&units, &pool, &RoomTypeMap::new(), 10, 42, &cancel).unwrap();
        for ind in &population {
            assert_eq!(ind.unassigned_count(), 0);
        }
    }

    #[test]
    fn test_placements_legal_and_conflict_free() {
        let units = units();
        let pool = roomy_pool();
        let allow = crate::models::AllowSet::from_pool(&pool);
        let cancel = CancellationToken::new();
        let population =
            initialize(&units, &pool, &RoomTypeMap::new(), 20, 7, &cancel).unwrap();

        for ind in &population {
            let mut busy = BusySets::new();
            for gene in &ind.genes {
                if let Some(p) = &gene.placement {
                    assert!(!busy.conflicts(&gene.unit, p));
                    let gt = gene.unit.group_type.unwrap();
                    assert!(allow.permits(gt, p.day, p.start_min, p.stop_min, &p.room));
                    busy.occupy(&gene.unit, p);
                }
            }
        }
    }

    #[test]
    fn test_deterministic_per_seed() {
        let units = units();
        let pool = roomy_pool();
        let cancel = CancellationToken::new();
        let a = initialize(&units, &pool, &RoomTypeMap::new(), 5, 123, &cancel).unwrap();
        let b = initialize(&units, &pool, &RoomTypeMap::new(), 5, 123, &cancel).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_unresolved_group_type_stays_unassigned() {
        let units = vec![CourseUnit::new(
            "CS-101",
            "1",
            "Turing",
            "G1",
            SessionKind::Theory,
        )];
        let pool = roomy_pool();
        let cancel = CancellationToken::new();
        let population =
            initialize(&units, &pool, &RoomTypeMap::new(), 3, 42, &cancel).unwrap();
        for ind in &population {
            assert_eq!(ind.assigned_count(), 0);
        }
    }

    #[test]
    fn test_cancel_aborts() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        let result = initialize(&units(), &roomy_pool(), &RoomTypeMap::new(), 5, 42, &cancel);
        assert_eq!(result, Err(SolveError::Cancelled));
    }

    #[test]
    fn test_fitting_candidates_include_unknown_room_type() {
        // Same predicate as the operators' slot search: a room of
        // unknown type fits, a mismatching one does not.
        let pool = SlotPool::new(vec![
            SlotCandidate::new(1, Weekday::Mon, 480, 540, "LEC1").with_room_type("lecture"),
            SlotCandidate::new(1, Weekday::Mon, 540, 600, "ANNEX"),
            SlotCandidate::new(1, Weekday::Mon, 600, 660, "LAB1").with_room_type("lab"),
        ]);
        let room_types = RoomTypeMap::from_pool(&pool);
        let unit = CourseUnit::new("CS-101", "1", "Turing", "G1", SessionKind::Lab)
            .with_group_type(1)
            .with_room_type("lab");

        let fitting = fitting_candidates(&unit, &pool, pool.candidates(1), &room_types);
        assert_eq!(fitting, vec![1, 2]);
    }

    #[test]
    fn test_course_buckets_theory_first() {
        let units = vec![
            CourseUnit::new("CS-101", "1", "Turing", "G1", SessionKind::Lab).with_group_type(1),
            CourseUnit::new("CS-101", "1", "Turing", "G1", SessionKind::Theory)
                .with_group_type(1),
        ];
        let buckets = course_buckets(&units);
        assert_eq!(buckets.len(), 1);
        assert_eq!(buckets[0], vec![1, 0]);
    }
}
