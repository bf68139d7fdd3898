//! The `Exercise` aggregate: a reusable exercise definition.
//!
//! An exercise's type is chosen at creation and never changes, because
//! planned and session entries snapshot it.

use crate::{DomainError, DomainResult, ExerciseId, ExerciseType, IdGenerator, MuscleGroup};
use std::collections::BTreeSet;

/// Maximum length for exercise and plan names
pub const MAX_NAME_LENGTH: usize = 100;

/// Maximum length for descriptions
pub const MAX_DESCRIPTION_LENGTH: usize = 500;

/// Capability for resolving exercises by id
pub trait ExerciseLookup {
    fn find_exercise(&self, id: ExerciseId) -> Option<&Exercise>;
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Exercise {
    id: ExerciseId,
    name: String,
    description: Option<String>,
    exercise_type: ExerciseType,
    muscle_groups: BTreeSet<MuscleGroup>,
}

impl Exercise {
    /// Create a new exercise definition.
    ///
    /// # Errors
    ///
    /// - `InvalidName` if the name is empty or longer than 100 characters
    /// - `DescriptionTooLong` if the description exceeds 500 characters
    /// - `NoMuscleGroups` if no muscle group is given
    pub fn create<G: IdGenerator + ?Sized>(
        name: impl Into<String>,
        exercise_type: ExerciseType,
        muscle_groups: impl IntoIterator<Item = MuscleGroup>,
        description: Option<String>,
        ids: &G,
    ) -> DomainResult<Self> {
        let name = validate_name(name.into())?;
        let description = validate_description(description)?;
        let muscle_groups = validate_muscle_groups(muscle_groups)?;

        Ok(Self {
            id: ExerciseId::generate(ids),
            name,
            description,
            exercise_type,
            muscle_groups,
        })
    }

    /// Replace name, description and muscle groups. The type stays as it is.
    pub fn update(
        &mut self,
        name: impl Into<String>,
        description: Option<String>,
        muscle_groups: impl IntoIterator<Item = MuscleGroup>,
    ) -> DomainResult<()> {
        let name = validate_name(name.into())?;
        let description = validate_description(description)?;
        let muscle_groups = validate_muscle_groups(muscle_groups)?;

        self.name = name;
        self.description = description;
        self.muscle_groups = muscle_groups;
        Ok(())
    }

    /// Reconstitute from persistence (no validation)
    pub(crate) fn rehydrate(
        id: ExerciseId,
        name: String,
        description: Option<String>,
        exercise_type: ExerciseType,
        muscle_groups: BTreeSet<MuscleGroup>,
    ) -> Self {
        Self {
            id,
            name,
            description,
            exercise_type,
            muscle_groups,
        }
    }

    pub fn id(&self) -> ExerciseId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn exercise_type(&self) -> ExerciseType {
        self.exercise_type
    }

    pub fn muscle_groups(&self) -> &BTreeSet<MuscleGroup> {
        &self.muscle_groups
    }
}

impl ExerciseLookup for [Exercise] {
    fn find_exercise(&self, id: ExerciseId) -> Option<&Exercise> {
        self.iter().find(|e| e.id == id)
    }
}

pub(crate) fn validate_name(name: String) -> DomainResult<String> {
    let len = name.trim().chars().count();
    if len == 0 || name.chars().count() > MAX_NAME_LENGTH {
        return Err(DomainError::InvalidName {
            max: MAX_NAME_LENGTH,
        });
    }
    Ok(name)
}

pub(crate) fn validate_description(description: Option<String>) -> DomainResult<Option<String>> {
    match description {
        Some(d) if d.chars().count() > MAX_DESCRIPTION_LENGTH => {
            Err(DomainError::DescriptionTooLong {
                max: MAX_DESCRIPTION_LENGTH,
            })
        }
        // Blank descriptions are stored as absent
        Some(d) if d.trim().is_empty() => Ok(None),
        other => Ok(other),
    }
}

fn validate_muscle_groups(
    groups: impl IntoIterator<Item = MuscleGroup>,
) -> DomainResult<BTreeSet<MuscleGroup>> {
    let groups: BTreeSet<_> = groups.into_iter().collect();
    if groups.is_empty() {
        return Err(DomainError::NoMuscleGroups);
    }
    Ok(groups)
}
