//! Gene, individual, and result models.
//!
//! A [`Gene`] is one teaching hour with an optional placement; an
//! [`Individual`] is a complete candidate timetable. The gene count of
//! an individual equals the total required hours and never changes
//! across initialization, crossover, mutation, or repair.

use serde::{Deserialize, Serialize};

use super::{CourseUnit, Weekday};

/// A concrete (day, time, room) assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    /// Day of week.
    pub day: Weekday,
    /// Start time, minutes from midnight.
    pub start_min: u16,
    /// Stop time, minutes from midnight.
    pub stop_min: u16,
    /// Room name.
    pub room: String,
}

impl Placement {
    /// Creates a placement.
    pub fn new(day: Weekday, start_min: u16, stop_min: u16, room: impl Into<String>) -> Self {
        Self {
            day,
            start_min,
            stop_min,
            room: room.into(),
        }
    }
}

/// One scheduled or unassigned teaching hour.
///
/// `placement == None` is the explicit unassigned state: the unit
/// metadata survives so the hour can still be reported and retried by
/// later phases. There is no sentinel "empty" placement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gene {
    /// The course hour this gene schedules.
    pub unit: CourseUnit,
    /// Where the hour is placed, if anywhere.
    pub placement: Option<Placement>,
}

impl Gene {
    /// Creates an unassigned gene for a unit.
    pub fn unassigned(unit: CourseUnit) -> Self {
        Self {
            unit,
            placement: None,
        }
    }

    /// Creates an assigned gene.
    pub fn assigned(unit: CourseUnit, placement: Placement) -> Self {
        Self {
            unit,
            placement: Some(placement),
        }
    }

    /// Whether the gene has a placement.
    #[inline]
    pub fn is_assigned(&self) -> bool {
        self.placement.is_some()
    }
}

/// A complete candidate timetable.
///
/// `fitness` is the last evaluated score (higher is better);
/// [`UNEVALUATED`](Individual::UNEVALUATED) until scored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Individual {
    /// One gene per required teaching hour.
    pub genes: Vec<Gene>,
    /// Last evaluated fitness.
    pub fitness: i64,
}

impl Individual {
    /// Fitness of an individual that has not been scored yet.
    pub const UNEVALUATED: i64 = i64::MIN;

    /// Creates an unevaluated individual.
    pub fn new(genes: Vec<Gene>) -> Self {
        Self {
            genes,
            fitness: Self::UNEVALUATED,
        }
    }

    /// Number of genes (total required hours).
    pub fn len(&self) -> usize {
        self.genes.len()
    }

    /// Whether the individual has no genes.
    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    /// Number of placed hours.
    pub fn assigned_count(&self) -> usize {
        self.genes.iter().filter(|g| g.is_assigned()).count()
    }

    /// Number of unplaced hours.
    pub fn unassigned_count(&self) -> usize {
        self.genes.len() - self.assigned_count()
    }
}

/// The scored schedule handed back to the caller.
///
/// Unassigned genes stay in `schedule`, flagged by their missing
/// placement; the persistence layer filters them out before writing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleResult {
    /// Fitness of the winning individual.
    pub fitness: i64,
    /// All genes, assigned and unassigned.
    pub schedule: Vec<Gene>,
    /// Count of placed hours.
    pub total_assigned: usize,
    /// Count of hours that could not be placed.
    pub total_unassigned: usize,
}

impl ScheduleResult {
    /// Wraps a scored individual into the output contract.
    pub fn from_individual(individual: Individual) -> Self {
        let total_assigned = individual.assigned_count();
        let total_unassigned = individual.unassigned_count();
        Self {
            fitness: individual.fitness,
            schedule: individual.genes,
            total_assigned,
            total_unassigned,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SessionKind;

    fn sample_unit() -> CourseUnit {
        CourseUnit::new("CS-101", "1", "Turing", "G1", SessionKind::Theory)
    }

    #[test]
    fn test_gene_states() {
        let unassigned = Gene::unassigned(sample_unit());
        assert!(!unassigned.is_assigned());

        let placed = Gene::assigned(
            sample_unit(),
            Placement::new(Weekday::Mon, 480, 540, "R101"),
        );
        assert!(placed.is_assigned());
        assert_eq!(placed.placement.as_ref().unwrap().room, "R101");
    }

    #[test]
    fn test_individual_counts() {
        let ind = Individual::new(vec![
            Gene::assigned(
                sample_unit(),
                Placement::new(Weekday::Mon, 480, 540, "R101"),
            ),
            Gene::unassigned(sample_unit()),
            Gene::unassigned(sample_unit()),
        ]);

        assert_eq!(ind.len(), 3);
        assert_eq!(ind.assigned_count(), 1);
        assert_eq!(ind.unassigned_count(), 2);
        assert_eq!(ind.fitness, Individual::UNEVALUATED);
    }

    #[test]
    fn test_result_keeps_unassigned_flagged() {
        let mut ind = Individual::new(vec![
            Gene::assigned(
                sample_unit(),
                Placement::new(Weekday::Mon, 480, 540, "R101"),
            ),
            Gene::unassigned(sample_unit()),
        ]);
        ind.fitness = 42;

        let result = ScheduleResult::from_individual(ind);
        assert_eq!(result.fitness, 42);
        assert_eq!(result.schedule.len(), 2);
        assert_eq!(result.total_assigned, 1);
        assert_eq!(result.total_unassigned, 1);
        assert!(result.schedule.iter().any(|g| !g.is_assigned()));
    }

    #[test]
    fn test_result_serializes() {
        let result = ScheduleResult::from_individual(Individual::new(vec![Gene::unassigned(
            sample_unit(),
        )]));
        let json = serde_json::to_string(&result).unwrap();
        let back: ScheduleResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back, result);
    }
}
