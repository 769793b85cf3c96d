//! Course unit model.
//!
//! A [`CourseUnit`] is one required weekly teaching hour of a course
//! section: the atomic thing the search assigns to a (day, time, room)
//! slot. A course needing three theory hours contributes three units.
//!
//! # Reference
//! Schaerf (1999), "A Survey of Automated Timetabling"

use serde::{Deserialize, Serialize};

/// Identifier of a student-group timetable profile.
///
/// Group types partition the permitted-slot pool: a regular-programme
/// group and an evening-programme group see different candidate slots.
pub type GroupTypeId = u32;

/// Day of the teaching week.
///
/// Ordered `Mon < Tue < ... < Sun` so that (day, start) pairs have a
/// total order, which the theory-before-lab rule relies on.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Weekday {
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
    Sat,
    Sun,
}

impl Weekday {
    /// Zero-based index within the week (Mon = 0).
    #[inline]
    pub fn index(self) -> u8 {
        self as u8
    }
}

/// Whether a teaching hour is a lecture or a practical session.
///
/// `Theory` sorts before `Lab`: the initializer places theory buckets
/// first, and the evaluator penalizes labs scheduled before the first
/// theory hour of the same course.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum SessionKind {
    Theory,
    Lab,
}

/// One required weekly teaching hour.
///
/// Read-only input supplied by the record-management layer; the core
/// never mutates units, only attaches placements to copies of them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseUnit {
    /// Subject code (e.g., "CS-101").
    pub subject_code: String,
    /// Human-readable subject name.
    pub subject_name: String,
    /// Section within the subject.
    pub section: String,
    /// Teacher name or identifier.
    pub teacher: String,
    /// Student group attending this hour.
    pub student_group: String,
    /// Theory or lab hour.
    pub kind: SessionKind,
    /// Timetable profile of the student group.
    ///
    /// `None` means the group could not be resolved; such units are
    /// never placeable and surface as permanently unassigned genes.
    pub group_type: Option<GroupTypeId>,
    /// Required room type (e.g., "lecture", "computer-lab").
    ///
    /// `None` = any room is acceptable.
    pub room_type: Option<String>,
    /// 1-based index of this hour within the course requirement.
    pub unit_index: u8,
    /// Total hours the course requires.
    pub unit_total: u8,
}

impl CourseUnit {
    /// Creates a unit with the identifying fields; metadata via builders.
    pub fn new(
        subject_code: impl Into<String>,
        section: impl Into<String>,
        teacher: impl Into<String>,
        student_group: impl Into<String>,
        kind: SessionKind,
    ) -> Self {
        Self {
            subject_code: subject_code.into(),
            subject_name: String::new(),
            section: section.into(),
            teacher: teacher.into(),
            student_group: student_group.into(),
            kind,
            group_type: None,
            room_type: None,
            unit_index: 1,
            unit_total: 1,
        }
    }

    /// Sets the subject name.
    pub fn with_subject_name(mut self, name: impl Into<String>) -> Self {
        self.subject_name = name.into();
        self
    }

    /// Sets the group-type profile.
    pub fn with_group_type(mut self, group_type: GroupTypeId) -> Self {
        self.group_type = Some(group_type);
        self
    }

    /// Sets the required room type.
    pub fn with_room_type(mut self, room_type: impl Into<String>) -> Self {
        self.room_type = Some(room_type.into());
        self
    }

    /// Sets this hour's index within the course requirement.
    pub fn with_unit_index(mut self, index: u8, total: u8) -> Self {
        self.unit_index = index;
        self.unit_total = total;
        self
    }

    /// Identity of the course this hour belongs to.
    ///
    /// Genes of one course share this key; the ordering and contiguity
    /// rules bucket by it.
    pub fn course_key(&self) -> (&str, &str, &str, &str) {
        (
            &self.subject_code,
            &self.section,
            &self.teacher,
            &self.student_group,
        )
    }
}
