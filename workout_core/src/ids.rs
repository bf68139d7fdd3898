//! Entity identifiers and the identity-generation capability.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};
use uuid::Uuid;

/// Source of fresh identities for new entities
pub trait IdGenerator {
    fn next_uuid(&self) -> Uuid;
}

/// Random (v4) UUIDs, used in production
#[derive(Clone, Copy, Debug, Default)]
pub struct RandomIds;

impl IdGenerator for RandomIds {
    fn next_uuid(&self) -> Uuid {
        Uuid::new_v4()
    }
}

/// Monotonic UUIDs (1, 2, 3, ...) for deterministic tests and fixtures
#[derive(Debug, Default)]
pub struct SequentialIds {
    next: AtomicU64,
}

impl SequentialIds {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdGenerator for SequentialIds {
    fn next_uuid(&self) -> Uuid {
        let n = self.next.fetch_add(1, Ordering::Relaxed) + 1;
        Uuid::from_u128(n as u128)
    }
}

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            pub fn as_uuid(&self) -> Uuid {
                self.0
            }

            pub fn generate<G: IdGenerator + ?Sized>(ids: &G) -> Self {
                Self(ids.next_uuid())
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                Uuid::parse_str(s.trim()).map(Self)
            }
        }
    };
}

entity_id!(
    /// Identity of a catalog exercise
    ExerciseId
);
entity_id!(
    /// Identity of a workout plan
    PlanId
);
entity_id!(
    /// Identity of an entry inside a workout plan
    PlannedExerciseId
);
entity_id!(
    /// Identity of a workout session
    SessionId
);
entity_id!(
    /// Identity of an entry inside a workout session
    SessionExerciseId
);
entity_id!(
    /// Reference to the trainer who owns a plan
    TrainerId
);
entity_id!(
    /// Reference to the client who performs a session
    ClientId
);
