//! Fitness evaluation.
//!
//! Pure scoring of one candidate timetable; higher is better. Hard
//! rules (double-booking, allow-set breaches, invalid times) carry
//! heavy penalties, soft rules (theory-before-lab ordering, same-day
//! contiguity) shape quality. Violations are never errors — they only
//! lower the score.
//!
//! Conflict detection is hash-indexed per (entity, day, start, stop);
//! no pairwise scan.

use std::collections::{HashMap, HashSet};

use crate::models::{AllowSet, Gene, RoomTypeMap, SessionKind, Weekday};

use super::FitnessWeights;

type CourseKey<'a> = (&'a str, &'a str, &'a str, &'a str);

/// Scores candidate timetables against one immutable rule set.
///
/// Cheap to construct; borrows everything. `score` is pure and
/// idempotent, so individuals can be evaluated in parallel.
#[derive(Debug, Clone, Copy)]
pub struct FitnessEvaluator<'a> {
    allow: &'a AllowSet,
    room_types: &'a RoomTypeMap,
    weights: &'a FitnessWeights,
    full_coverage: bool,
}

impl<'a> FitnessEvaluator<'a> {
    /// Creates an evaluator over the run's permission set and weights.
    pub fn new(
        allow: &'a AllowSet,
        room_types: &'a RoomTypeMap,
        weights: &'a FitnessWeights,
        full_coverage: bool,
    ) -> Self {
        Self {
            allow,
            room_types,
            weights,
            full_coverage,
        }
    }

    /// Scores one individual's genes.
    pub fn score(&self, genes: &[Gene]) -> i64 {
        let w = self.weights;
        let mut score = 0i64;
        let mut unassigned = 0i64;

        let mut seen_teacher: HashSet<(&str, Weekday, u16, u16)> = HashSet::new();
        let mut seen_group: HashSet<(&str, Weekday, u16, u16)> = HashSet::new();
        let mut seen_room: HashSet<(&str, Weekday, u16, u16)> = HashSet::new();

        for gene in genes {
            let Some(p) = &gene.placement else {
                score -= w.unassigned;
                unassigned += 1;
                continue;
            };

            if p.start_min >= p.stop_min {
                score -= w.invalid_time;
                continue;
            }

            let at = (p.day, p.start_min, p.stop_min);
            if !seen_teacher.insert((gene.unit.teacher.as_str(), at.0, at.1, at.2)) {
                score -= w.teacher_overlap;
            }
            if !seen_group.insert((gene.unit.student_group.as_str(), at.0, at.1, at.2)) {
                score -= w.group_overlap;
            }
            if !seen_room.insert((p.room.as_str(), at.0, at.1, at.2)) {
                score -= w.room_overlap;
            }

            let permitted = gene.unit.group_type.is_some_and(|gt| {
                self.allow
                    .permits(gt, p.day, p.start_min, p.stop_min, &p.room)
            });
            if !permitted {
                score -= w.out_of_allow;
                continue;
            }

            let mismatch = matches!(
                (&gene.unit.room_type, self.room_types.room_type(&p.room)),
                (Some(required), Some(actual)) if required != actual
            );
            if mismatch {
                score -= w.room_type_mismatch;
            } else {
                score += w.valid_reward;
            }
        }

        score += self.ordering_score(genes);
        score += self.contiguity_score(genes);

        if self.full_coverage {
            score -= w.missing_unit_penalty * unassigned;
        }

        score
    }

    /// Lab-before-theory ordering term.
    ///
    /// Within each course, every lab hour placed strictly before the
    /// earliest theory hour is penalized. Courses without any placed
    /// theory hour incur nothing.
    fn ordering_score(&self, genes: &[Gene]) -> i64 {
        let mut first_theory: HashMap<CourseKey<'_>, (Weekday, u16)> = HashMap::new();
        for gene in genes {
            if gene.unit.kind != SessionKind::Theory {
                continue;
            }
            let Some(p) = &gene.placement else { continue };
            let point = (p.day, p.start_min);
            first_theory
                .entry(gene.unit.course_key())
                .and_modify(|e| *e = (*e).min(point))
                .or_insert(point);
        }

        let mut score = 0i64;
        for gene in genes {
            if gene.unit.kind != SessionKind::Lab {
                continue;
            }
            let Some(p) = &gene.placement else { continue };
            if let Some(&theory_start) = first_theory.get(&gene.unit.course_key()) {
                if (p.day, p.start_min) < theory_start {
                    score -= self.weights.lab_before_theory;
                }
            }
        }
        score
    }

    /// Same-day contiguity term per (course, kind, day) bucket.
    ///
    /// Back-to-back pairs earn a bonus; a gap is penalized per whole
    /// hour of gap; each disjoint run beyond the first is penalized.
    fn contiguity_score(&self, genes: &[Gene]) -> i64 {
        let w = self.weights;
        let mut buckets: HashMap<(CourseKey<'_>, SessionKind, Weekday), Vec<(u16, u16)>> =
            HashMap::new();
        for gene in genes {
            let Some(p) = &gene.placement else { continue };
            if p.start_min >= p.stop_min {
                continue;
            }
            buckets
                .entry((gene.unit.course_key(), gene.unit.kind, p.day))
                .or_default()
                .push((p.start_min, p.stop_min));
        }

        let mut score = 0i64;
        for times in buckets.values_mut() {
            times.sort_unstable();
            let mut segments = 1i64;
            for pair in times.windows(2) {
                let (_, prev_stop) = pair[0];
                let (next_start, _) = pair[1];
                if next_start == prev_stop {
                    score += w.contiguity_bonus;
                } else if next_start > prev_stop {
                    let gap = i64::from(next_start - prev_stop);
                    score -= w.gap_penalty * (gap / 60).max(1);
                    segments += 1;
                }
            }
            score -= w.segment_penalty * (segments - 1);
        }
        score
    }
}
