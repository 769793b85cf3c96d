//! Busy-set conflict tracking and bounded slot search.
//!
//! [`BusySets`] indexes occupied (entity, day, start, stop) tuples for
//! teachers, student groups, and rooms, so conflict checks are hash
//! lookups rather than pairwise scans. [`find_slot`] is the randomized
//! bounded search shared by crossover repair and mutation;
//! [`find_slot_ordered`] is its deterministic counterpart used by the
//! final greedy repair.

use rand::seq::IndexedRandom;
use rand::Rng;
use std::collections::{HashMap, HashSet};

use crate::cancel::CancellationToken;
use crate::models::{
    AllowSet, CourseUnit, Gene, Placement, RoomTypeMap, SlotCandidate, SlotPool, Weekday,
};

/// Occupied-hour index per conflict dimension.
///
/// Keys are (day, start, stop) → occupant names, so membership checks
/// borrow the name instead of cloning it.
#[derive(Debug, Clone, Default)]
pub struct BusySets {
    teachers: HashMap<(Weekday, u16, u16), HashSet<String>>,
    groups: HashMap<(Weekday, u16, u16), HashSet<String>>,
    rooms: HashMap<(Weekday, u16, u16), HashSet<String>>,
}

impl BusySets {
    /// Creates empty busy sets.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds busy sets from the assigned genes of an individual.
    pub fn from_genes(genes: &[Gene]) -> Self {
        let mut busy = Self::new();
        for gene in genes {
            if let Some(p) = &gene.placement {
                busy.occupy(&gene.unit, p);
            }
        }
        busy
    }

    /// Whether placing `unit` at `placement` collides with any occupied
    /// teacher, group, or room hour.
    pub fn conflicts(&self, unit: &CourseUnit, placement: &Placement) -> bool {
        let key = (placement.day, placement.start_min, placement.stop_min);
        let hit = |map: &HashMap<(Weekday, u16, u16), HashSet<String>>, name: &str| {
            map.get(&key).is_some_and(|s| s.contains(name))
        };
        hit(&self.teachers, &unit.teacher)
            || hit(&self.groups, &unit.student_group)
            || hit(&self.rooms, &placement.room)
    }

    /// Marks the placement's teacher, group, and room hours occupied.
    pub fn occupy(&mut self, unit: &CourseUnit, placement: &Placement) {
        let key = (placement.day, placement.start_min, placement.stop_min);
        self.teachers
            .entry(key)
            .or_default()
            .insert(unit.teacher.clone());
        self.groups
            .entry(key)
            .or_default()
            .insert(unit.student_group.clone());
        self.rooms
            .entry(key)
            .or_default()
            .insert(placement.room.clone());
    }

    /// Releases a previously occupied placement.
    pub fn release(&mut self, unit: &CourseUnit, placement: &Placement) {
        let key = (placement.day, placement.start_min, placement.stop_min);
        if let Some(s) = self.teachers.get_mut(&key) {
            s.remove(&unit.teacher);
        }
        if let Some(s) = self.groups.get_mut(&key) {
            s.remove(&unit.student_group);
        }
        if let Some(s) = self.rooms.get_mut(&key) {
            s.remove(&placement.room);
        }
    }
}

/// Whether a candidate satisfies the unit's room-type requirement.
///
/// Unknown actual type never counts as a mismatch. This is the single
/// room-type predicate; the initializer and repair passes share it.
pub(crate) fn room_type_fits(unit: &CourseUnit, room: &str, room_types: &RoomTypeMap) -> bool {
    match (&unit.room_type, room_types.room_type(room)) {
        (Some(required), Some(actual)) => required == actual,
        _ => true,
    }
}

fn candidate_legal(
    unit: &CourseUnit,
    slot: &SlotCandidate,
    allow: &AllowSet,
    busy: &BusySets,
    room_types: &RoomTypeMap,
    exclude: Option<&Placement>,
) -> Option<Placement> {
    let group_type = unit.group_type?;
    if !room_type_fits(unit, &slot.room, room_types) {
        return None;
    }
    if !allow.permits(group_type, slot.day, slot.start_min, slot.stop_min, &slot.room) {
        return None;
    }
    let placement = Placement::new(slot.day, slot.start_min, slot.stop_min, slot.room.clone());
    if exclude == Some(&placement) {
        return None;
    }
    if busy.conflicts(unit, &placement) {
        return None;
    }
    Some(placement)
}

/// Randomized bounded search for a legal, conflict-free placement.
///
/// Examines up to `max_tries` distinct candidates for the unit's group
/// type, in random order. `exclude` rejects the unit's current
/// placement so the Move phase relocates rather than re-commits.
/// Returns `None` when nothing legal is found or the run is cancelled.
#[allow(clippy::too_many_arguments)]
pub fn find_slot<R: Rng>(
    unit: &CourseUnit,
    busy: &BusySets,
    pool: &SlotPool,
    allow: &AllowSet,
    room_types: &RoomTypeMap,
    exclude: Option<&Placement>,
    max_tries: usize,
    rng: &mut R,
    cancel: &CancellationToken,
) -> Option<Placement> {
    let group_type = unit.group_type?;
    let candidates = pool.candidates(group_type);
    if candidates.is_empty() {
        return None;
    }

    for &i in candidates.choose_multiple(rng, max_tries.min(candidates.len())) {
        if cancel.is_cancelled() {
            return None;
        }
        if let Some(p) = candidate_legal(unit, pool.slot(i), allow, busy, room_types, exclude) {
            return Some(p);
        }
    }
    None
}

/// Deterministic variant of [`find_slot`]: candidates in pool order.
pub fn find_slot_ordered(
    unit: &CourseUnit,
    busy: &BusySets,
    pool: &SlotPool,
    allow: &AllowSet,
    room_types: &RoomTypeMap,
    max_tries: usize,
) -> Option<Placement> {
    let group_type = unit.group_type?;
    for &i in pool.candidates(group_type).iter().take(max_tries) {
        if let Some(p) = candidate_legal(unit, pool.slot(i), allow, busy, room_types, None) {
            return Some(p);
        }
    }
    None
}
