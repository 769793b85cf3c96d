//! Slot pool and permission set.
//!
//! The record-management layer expands group-permission rows across all
//! rooms and purges periods blocked by weekly activities and pre-existing
//! commitments. What reaches the core is a flat pool of [`SlotCandidate`]
//! rows — every hour a group type is allowed to use, per room. The pool
//! is read-only for the whole run.
//!
//! [`AllowSet`] and [`RoomTypeMap`] are derived from the pool once per
//! run and shared by every component that checks placement legality.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use super::{GroupTypeId, Weekday};

/// One permitted hour for a group type: (day, time, room) plus room type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotCandidate {
    /// Group-type profile this slot is open to.
    pub group_type: GroupTypeId,
    /// Day of week.
    pub day: Weekday,
    /// Start time, minutes from midnight.
    pub start_min: u16,
    /// Stop time, minutes from midnight.
    pub stop_min: u16,
    /// Room name.
    pub room: String,
    /// Room type, when the room catalogue knows it.
    pub room_type: Option<String>,
}

impl SlotCandidate {
    /// Creates a candidate without a room type.
    pub fn new(
        group_type: GroupTypeId,
        day: Weekday,
        start_min: u16,
        stop_min: u16,
        room: impl Into<String>,
    ) -> Self {
        Self {
            group_type,
            day,
            start_min,
            stop_min,
            room: room.into(),
            room_type: None,
        }
    }

    /// Sets the room type.
    pub fn with_room_type(mut self, room_type: impl Into<String>) -> Self {
        self.room_type = Some(room_type.into());
        self
    }
}

/// The candidate placement pool, indexed by group type.
///
/// Consulted by the initializer, crossover repair, mutation, and greedy
/// repair. Candidate order within a group is the supply order, which the
/// deterministic repair pass relies on.
#[derive(Debug, Clone, Default)]
pub struct SlotPool {
    slots: Vec<SlotCandidate>,
    by_group: HashMap<GroupTypeId, Vec<usize>>,
}

impl SlotPool {
    /// Builds the pool and its group-type index.
    pub fn new(slots: Vec<SlotCandidate>) -> Self {
        let mut by_group: HashMap<GroupTypeId, Vec<usize>> = HashMap::new();
        for (i, slot) in slots.iter().enumerate() {
            by_group.entry(slot.group_type).or_default().push(i);
        }
        Self { slots, by_group }
    }

    /// All candidate rows.
    pub fn slots(&self) -> &[SlotCandidate] {
        &self.slots
    }

    /// Indices of candidates open to a group type, in supply order.
    pub fn candidates(&self, group_type: GroupTypeId) -> &[usize] {
        self.by_group
            .get(&group_type)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Candidate row by index.
    #[inline]
    pub fn slot(&self, index: usize) -> &SlotCandidate {
        &self.slots[index]
    }

    /// Number of candidate rows.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether the pool is empty.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Distinct (day, start, stop, room) placements open to a group type.
    ///
    /// This is the supply side of the capacity preflight: duplicate rows
    /// do not add capacity.
    pub fn distinct_capacity(&self, group_type: GroupTypeId) -> usize {
        let mut seen: HashSet<(Weekday, u16, u16, &str)> = HashSet::new();
        for &i in self.candidates(group_type) {
            let s = &self.slots[i];
            seen.insert((s.day, s.start_min, s.stop_min, s.room.as_str()));
        }
        seen.len()
    }

    /// Group types that appear in the pool.
    pub fn group_types(&self) -> impl Iterator<Item = GroupTypeId> + '_ {
        self.by_group.keys().copied()
    }
}

/// Membership index over permitted (group_type, day, start, stop, room)
/// tuples.
///
/// Every placement-legality check in the core goes through
/// [`AllowSet::permits`]. Keyed two-level so lookups borrow the room name
/// instead of cloning it.
#[derive(Debug, Clone, Default)]
pub struct AllowSet {
    rooms: HashMap<(GroupTypeId, Weekday, u16, u16), HashSet<String>>,
    len: usize,
}

impl AllowSet {
    /// Builds the permission set from the slot pool.
    pub fn from_pool(pool: &SlotPool) -> Self {
        let mut rooms: HashMap<(GroupTypeId, Weekday, u16, u16), HashSet<String>> =
            HashMap::new();
        let mut len = 0;
        for slot in pool.slots() {
            let key = (slot.group_type, slot.day, slot.start_min, slot.stop_min);
            if rooms.entry(key).or_default().insert(slot.room.clone()) {
                len += 1;
            }
        }
        Self { rooms, len }
    }

    /// Whether the tuple is a permitted placement.
    pub fn permits(
        &self,
        group_type: GroupTypeId,
        day: Weekday,
        start_min: u16,
        stop_min: u16,
        room: &str,
    ) -> bool {
        self.rooms
            .get(&(group_type, day, start_min, stop_min))
            .is_some_and(|r| r.contains(room))
    }

    /// Number of distinct permitted tuples.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether no tuple is permitted.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Room name → room type lookup.
///
/// Optional input; when the caller does not supply one it is derived
/// from the pool's `room_type` column. Rooms with unknown type never
/// trigger the mismatch penalty.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoomTypeMap {
    types: HashMap<String, String>,
}

impl RoomTypeMap {
    /// Creates an empty map (every room has unknown type).
    pub fn new() -> Self {
        Self::default()
    }

    /// Derives the map from the pool's room-type column.
    ///
    /// First row wins when a room appears with conflicting types.
    pub fn from_pool(pool: &SlotPool) -> Self {
        let mut types = HashMap::new();
        for slot in pool.slots() {
            if let Some(rt) = &slot.room_type {
                types
                    .entry(slot.room.clone())
                    .or_insert_with(|| rt.clone());
            }
        }
        Self { types }
    }

    /// Registers a room's type.
    pub fn insert(&mut self, room: impl Into<String>, room_type: impl Into<String>) {
        self.types.insert(room.into(), room_type.into());
    }

    /// Type of a room, when known.
    pub fn room_type(&self, room: &str) -> Option<&str> {
        self.types.get(room).map(String::as_str)
    }
}
