#![forbid(unsafe_code)]

//! Core domain model and business logic for trainer-built workout plans.
//!
//! This crate provides:
//! - Value objects and metrics (weights, durations, type-conditional targets)
//! - Aggregates: exercise catalog, workout plans, workout sessions
//! - Injected capabilities (clock, id generation, exercise lookup)
//! - Persistence (file store, session journal, CSV rollup)
//! - Configuration and logging setup

pub mod types;
pub mod error;
pub mod ids;
pub mod clock;
pub mod exercise;
pub mod catalog;
pub mod plan;
pub mod session;
pub mod records;
pub mod config;
pub mod logging;
pub mod store;
pub mod journal;
pub mod rollup;

// Re-export commonly used types
pub use error::{DomainError, DomainResult, Error, ErrorKind, Result};
pub use types::*;
pub use ids::*;
pub use clock::{Clock, FixedClock, SystemClock};
pub use exercise::{Exercise, ExerciseLookup};
pub use catalog::{starter_exercises, ExerciseCatalog};
pub use plan::{PlannedExercise, WorkoutPlan};
pub use session::{SessionExercise, SessionStatus, WorkoutSession};
pub use config::Config;
pub use store::Store;
pub use journal::{JsonlSink, SessionSink};
