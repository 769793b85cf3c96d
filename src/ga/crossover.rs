//! Course-bucket crossover.
//!
//! Genes are grouped by (course, session kind) and each bucket is
//! inherited wholesale from one parent, chosen by coin flip. Inheriting
//! whole buckets preserves contiguity runs the parents discovered;
//! gene-by-gene mixing would shred them.
//!
//! Inherited placements can collide across buckets, so a repair pass
//! follows: colliding genes get a bounded randomized re-placement, or
//! demotion to unassigned when nothing legal is found.

use rand::Rng;

use crate::cancel::CancellationToken;
use crate::models::{AllowSet, Individual, RoomTypeMap, SessionKind, SlotPool};

use super::busy::{find_slot, room_type_fits, BusySets};

/// Candidate attempts per colliding gene during post-crossover repair.
const REPAIR_TRIES: usize = 30;

type BucketKey<'a> = ((&'a str, &'a str, &'a str, &'a str), SessionKind);

/// Gene indices grouped by (course, kind), in first-seen order.
fn gene_buckets(parent: &Individual) -> Vec<Vec<usize>> {
    let mut order: Vec<BucketKey<'_>> = Vec::new();
    let mut buckets: Vec<Vec<usize>> = Vec::new();
    for (i, gene) in parent.genes.iter().enumerate() {
        let key = (gene.unit.course_key(), gene.unit.kind);
        match order.iter().position(|k| *k == key) {
            Some(pos) => buckets[pos].push(i),
            None => {
                order.push(key);
                buckets.push(vec![i]);
            }
        }
    }
    buckets
}

/// Produces one child from two parents.
///
/// Parents must carry the same genes in the same order; the child does
/// too. The child is returned unevaluated.
pub fn crossover<R: Rng>(
    a: &Individual,
    b: &Individual,
    pool: &SlotPool,
    allow: &AllowSet,
    room_types: &RoomTypeMap,
    rng: &mut R,
    cancel: &CancellationToken,
) -> Individual {
    debug_assert_eq!(a.len(), b.len());

    let mut genes = a.genes.clone();
    for bucket in gene_buckets(a) {
        if rng.random_bool(0.5) {
            for i in bucket {
                genes[i] = b.genes[i].clone();
            }
        }
    }

    // Repair illegal inheritances in gene order. Legality is the full
    // predicate: allow-set membership, room-type fit, no conflict.
    let mut busy = BusySets::new();
    for gene in &mut genes {
        let Some(p) = gene.placement.clone() else {
            continue;
        };
        let permitted = gene.unit.group_type.is_some_and(|gt| {
            allow.permits(gt, p.day, p.start_min, p.stop_min, &p.room)
        });
        if permitted
            && room_type_fits(&gene.unit, &p.room, room_types)
            && !busy.conflicts(&gene.unit, &p)
        {
            busy.occupy(&gene.unit, &p);
            continue;
        }
        match find_slot(
            &gene.unit,
            &busy,
            pool,
            allow,
            room_types,
            None,
            REPAIR_TRIES,
            rng,
            cancel,
        ) {
            Some(np) => {
                busy.occupy(&gene.unit, &np);
                gene.placement = Some(np);
            }
            None => gene.placement = None,
        }
    }

    Individual::new(genes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CourseUnit, Gene, Placement, SlotCandidate, Weekday};
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn pool() -> SlotPool {
        let mut slots = Vec::new();
        for day in [Weekday::Mon, Weekday::Tue, Weekday::Wed] {
            for hour in 0..4u16 {
                let start = 480 + hour * 60;
                slots.push(SlotCandidate::new(1, day, start, start + 60, "R101"));
            }
        }
        SlotPool::new(slots)
    }

    fn theory(code: &str) -> CourseUnit {
        CourseUnit::new(code, "1", "Turing", "G1", SessionKind::Theory).with_group_type(1)
    }

    fn parent(days: &[Weekday]) -> Individual {
        let genes = days
            .iter()
            .enumerate()
            .map(|(i, &day)| {
                Gene::assigned(
                    theory("CS-101"),
                    Placement::new(day, 480 + 60 * i as u16, 540 + 60 * i as u16, "R101"),
                )
            })
            .collect();
        Individual::new(genes)
    }

    #[test]
    fn test_child_keeps_gene_order() {
        let a = parent(&[Weekday::Mon, Weekday::Mon]);
        let b = parent(&[Weekday::Tue, Weekday::Tue]);
        let pool = pool();
        let allow = AllowSet::from_pool(&pool);
        let cancel = CancellationToken::new();
        let mut rng = SmallRng::seed_from_u64(42);

        let child = crossover(&a, &b, &pool, &allow, &RoomTypeMap::new(), &mut rng, &cancel);
        assert_eq!(child.len(), 2);
        for (cg, ag) in child.genes.iter().zip(&a.genes) {
            assert_eq!(cg.unit, ag.unit);
        }
        assert_eq!(child.fitness, Individual::UNEVALUATED);
    }

    #[test]
    fn test_bucket_inherited_wholesale() {
        // One course, two theory hours; bucket must come entirely from
        // one parent, never mixed.
        let a = parent(&[Weekday::Mon, Weekday::Mon]);
        let b = parent(&[Weekday::Tue, Weekday::Tue]);
        let pool = pool();
        let allow = AllowSet::from_pool(&pool);
        let cancel = CancellationToken::new();

        for seed in 0..20 {
            let mut rng = SmallRng::seed_from_u64(seed);
            let child =
                crossover(&a, &b, &pool, &allow, &RoomTypeMap::new(), &mut rng, &cancel);
            let days: Vec<Weekday> = child
                .genes
                .iter()
                .map(|g| g.placement.as_ref().unwrap().day)
                .collect();
            assert!(days == vec![Weekday::Mon; 2] || days == vec![Weekday::Tue; 2]);
        }
    }

    #[test]
    fn test_identical_parents_give_identical_child() {
        let a = parent(&[Weekday::Mon, Weekday::Tue]);
        let pool = pool();
        let allow = AllowSet::from_pool(&pool);
        let cancel = CancellationToken::new();
        let mut rng = SmallRng::seed_from_u64(42);

        let child = crossover(&a, &a, &pool, &allow, &RoomTypeMap::new(), &mut rng, &cancel);
        assert_eq!(child.genes, a.genes);
    }

    #[test]
    fn test_repair_removes_collisions() {
        // Different courses sharing a teacher, both placed Monday 08:00
        // in their respective parents; any inheritance combination must
        // end conflict-free.
        let mono = Placement::new(Weekday::Mon, 480, 540, "R101");
        let a = Individual::new(vec![
            Gene::assigned(theory("CS-101"), mono.clone()),
            Gene::assigned(theory("MA-201"), mono.clone()),
        ]);
        let pool = pool();
        let allow = AllowSet::from_pool(&pool);
        let cancel = CancellationToken::new();

        for seed in 0..20 {
            let mut rng = SmallRng::seed_from_u64(seed);
            let child =
                crossover(&a, &a, &pool, &allow, &RoomTypeMap::new(), &mut rng, &cancel);
            let mut busy = BusySets::new();
            for gene in &child.genes {
                if let Some(p) = &gene.placement {
                    assert!(!busy.conflicts(&gene.unit, p));
                    busy.occupy(&gene.unit, p);
                }
            }
        }
    }

    #[test]
    fn test_repair_relocates_room_type_mismatch() {
        // A lab-requiring hour inherited in the lecture room must be
        // moved to the free lab room, not kept as-is.
        let pool = SlotPool::new(vec![
            SlotCandidate::new(1, Weekday::Mon, 480, 540, "R101").with_room_type("lecture"),
            SlotCandidate::new(1, Weekday::Mon, 540, 600, "LAB1").with_room_type("lab"),
        ]);
        let allow = AllowSet::from_pool(&pool);
        let room_types = RoomTypeMap::from_pool(&pool);
        let cancel = CancellationToken::new();

        let a = Individual::new(vec![Gene::assigned(
            theory("CS-101").with_room_type("lab"),
            Placement::new(Weekday::Mon, 480, 540, "R101"),
        )]);
        for seed in 0..20 {
            let mut rng = SmallRng::seed_from_u64(seed);
            let child = crossover(&a, &a, &pool, &allow, &room_types, &mut rng, &cancel);
            assert_eq!(child.genes[0].placement.as_ref().unwrap().room, "LAB1");
        }
    }

    #[test]
    fn test_repair_relocates_out_of_allow() {
        // An inherited placement outside the permission set is moved.
        let pool = SlotPool::new(vec![
            SlotCandidate::new(1, Weekday::Mon, 480, 540, "R101"),
        ]);
        let allow = AllowSet::from_pool(&pool);
        let cancel = CancellationToken::new();
        let mut rng = SmallRng::seed_from_u64(42);

        let a = Individual::new(vec![Gene::assigned(
            theory("CS-101"),
            Placement::new(Weekday::Fri, 480, 540, "R101"),
        )]);
        let child = crossover(&a, &a, &pool, &allow, &RoomTypeMap::new(), &mut rng, &cancel);
        assert_eq!(
            child.genes[0].placement,
            Some(Placement::new(Weekday::Mon, 480, 540, "R101"))
        );
    }

    #[test]
    fn test_no_slot_demotes_to_unassigned() {
        // Pool with a single slot cannot host two teacher hours.
        let single = SlotPool::new(vec![SlotCandidate::new(1, Weekday::Mon, 480, 540, "R101")]);
        let allow = AllowSet::from_pool(&single);
        let cancel = CancellationToken::new();
        let mut rng = SmallRng::seed_from_u64(42);

        let mono = Placement::new(Weekday::Mon, 480, 540, "R101");
        let a = Individual::new(vec![
            Gene::assigned(theory("CS-101"), mono.clone()),
            Gene::assigned(theory("MA-201"), mono),
        ]);
        let child =
            crossover(&a, &a, &single, &allow, &RoomTypeMap::new(), &mut rng, &cancel);
        assert_eq!(child.assigned_count(), 1);
        assert_eq!(child.unassigned_count(), 1);
    }
}
