//! Error types for the workout_core library.

use crate::{ExerciseId, PlanId, SessionId};
use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Result type returned by aggregate operations
pub type DomainResult<T> = std::result::Result<T, DomainError>;

/// Broad category of a domain failure, used by callers to pick a status code
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// A field-level invariant was violated by the input
    Validation,
    /// A referenced entity does not exist
    NotFound,
    /// The operation is incompatible with the current state
    Conflict,
}

/// Expected business failures returned by aggregate operations.
///
/// A failed operation never leaves a partially mutated aggregate behind.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    #[error("name must be between 1 and {max} characters")]
    InvalidName { max: usize },

    #[error("description must be at most {max} characters")]
    DescriptionTooLong { max: usize },

    #[error("at least one muscle group is required")]
    NoMuscleGroups,

    #[error("sets must be at least 1")]
    InvalidSets,

    #[error("reps are required for reps-and-weight exercises")]
    RepsRequired,

    #[error("reps must be at least 1")]
    InvalidReps,

    #[error("duration is required for time-based exercises")]
    DurationRequired,

    #[error("duration must be at least 1 second")]
    InvalidDuration,

    #[error("weight must be a finite, non-negative number")]
    InvalidWeight,

    #[error("reorder must list every exercise in the plan exactly once")]
    NotAPermutation,

    #[error("exercise {0} not found")]
    ExerciseNotFound(ExerciseId),

    #[error("workout plan {0} not found")]
    PlanNotFound(PlanId),

    #[error("workout session {0} not found")]
    SessionNotFound(SessionId),

    #[error("exercise {0} is already part of this plan")]
    DuplicateExercise(ExerciseId),

    #[error("session is not in progress")]
    SessionNotActive,

    #[error("results for exercise {0} were already recorded")]
    ExerciseAlreadyRecorded(ExerciseId),

    #[error("session is already completed")]
    AlreadyCompleted,

    #[error("session is already abandoned")]
    AlreadyAbandoned,
}

impl DomainError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DomainError::InvalidName { .. }
            | DomainError::DescriptionTooLong { .. }
            | DomainError::NoMuscleGroups
            | DomainError::InvalidSets
            | DomainError::RepsRequired
            | DomainError::InvalidReps
            | DomainError::DurationRequired
            | DomainError::InvalidDuration
            | DomainError::InvalidWeight
            | DomainError::NotAPermutation => ErrorKind::Validation,

            DomainError::ExerciseNotFound(_)
            | DomainError::PlanNotFound(_)
            | DomainError::SessionNotFound(_) => ErrorKind::NotFound,

            DomainError::DuplicateExercise(_)
            | DomainError::SessionNotActive
            | DomainError::ExerciseAlreadyRecorded(_)
            | DomainError::AlreadyCompleted
            | DomainError::AlreadyAbandoned => ErrorKind::Conflict,
        }
    }
}

/// Core error type for workout_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Business rule rejected the operation
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Persisted data could not be turned back into aggregates
    #[error("State error: {0}")]
    State(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Domain category of this error, if it came from a business rule
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            Error::Domain(e) => Some(e.kind()),
            _ => None,
        }
    }
}
