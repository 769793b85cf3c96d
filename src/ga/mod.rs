//! GA-based timetable search.
//!
//! A gene is one course hour with an optional (day, time, room)
//! placement; an individual is the full weekly timetable. Constraint
//! violations are scored, never rejected, so the search moves freely
//! through infeasible space while the weights pull it toward legal
//! schedules.
//!
//! # Submodules
//!
//! - [`engine`]: the evolution loop and run pipeline
//! - [`fitness`]: pure scoring of candidate timetables
//! - [`init`], [`crossover`], [`mutation`], [`repair`]: the operators
//! - [`busy`]: shared conflict index and bounded slot search
//!
//! # Reference
//! - Goldberg (1989), "Genetic Algorithms in Search, Optimization and
//!   Machine Learning"
//! - Schaerf (1999), "A Survey of Automated Timetabling"

pub mod busy;
mod config;
pub mod crossover;
pub mod engine;
pub mod fitness;
pub mod init;
pub mod mutation;
pub mod repair;

pub use config::{FitnessWeights, GaConfig};
pub use engine::Engine;
pub use fitness::FitnessEvaluator;
