//! Weekly course timetabling by genetic algorithm.
//!
//! Takes the required teaching hours of a term (course units) and the
//! permitted (day, time, room) slots per student-group profile, and
//! searches for a weekly timetable: no teacher, group, or room is
//! double-booked, placements stay inside the permitted slots, and soft
//! preferences (theory before lab, contiguous same-day hours) are
//! rewarded. Hours that cannot be placed are returned explicitly
//! unassigned rather than dropped.
//!
//! # Modules
//!
//! - **`models`**: `CourseUnit`, `SlotCandidate`/`SlotPool`, `Gene`,
//!   `Individual`, `ScheduleResult`
//! - **`ga`**: the search — `Engine`, `GaConfig`, fitness and operators
//! - **`capacity`**: demand-vs-supply preflight
//! - **`cancel`**: cooperative cancellation
//!
//! # Example
//!
//! ```no_run
//! use timetable_solver::{CancellationToken, Engine, GaConfig};
//! use timetable_solver::models::{CourseUnit, SessionKind, SlotCandidate, SlotPool, Weekday};
//!
//! let units = vec![
//!     CourseUnit::new("CS-101", "1", "Turing", "G1", SessionKind::Theory).with_group_type(1),
//! ];
//! let pool = SlotPool::new(vec![
//!     SlotCandidate::new(1, Weekday::Mon, 480, 540, "R101"),
//! ]);
//!
//! let engine = Engine::new(GaConfig::default().with_seed(42));
//! let result = engine.run(&units, &pool, None, &CancellationToken::new())?;
//! println!("fitness {}, {} unassigned", result.fitness, result.total_unassigned);
//! # Ok::<(), timetable_solver::SolveError>(())
//! ```
//!
//! # References
//!
//! - Schaerf (1999), "A Survey of Automated Timetabling"
//! - Burke & Petrovic (2002), "Recent research directions in automated
//!   timetabling"

pub mod cancel;
pub mod capacity;
pub mod error;
pub mod ga;
pub mod models;

pub use cancel::CancellationToken;
pub use capacity::CapacityDeficit;
pub use error::SolveError;
pub use ga::{Engine, FitnessWeights, GaConfig};
pub use models::ScheduleResult;
