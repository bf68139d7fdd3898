//! Exercise catalog: the trainer's library of exercise definitions.
//!
//! Also provides the built-in starter exercises offered by `wkt exercise seed`.

use crate::{
    DomainError, DomainResult, Exercise, ExerciseId, ExerciseLookup, ExerciseType, IdGenerator,
    MuscleGroup,
};
use once_cell::sync::Lazy;
use std::collections::HashSet;

/// A built-in exercise definition, instantiated with fresh ids on demand
#[derive(Clone, Debug)]
pub struct StarterExercise {
    pub name: &'static str,
    pub exercise_type: ExerciseType,
    pub muscle_groups: &'static [MuscleGroup],
    pub description: &'static str,
}

/// Cached starter table - built once and reused
static STARTER_EXERCISES: Lazy<Vec<StarterExercise>> = Lazy::new(build_starter_exercises);

/// Get a reference to the cached starter exercises
pub fn starter_exercises() -> &'static [StarterExercise] {
    &STARTER_EXERCISES
}

fn build_starter_exercises() -> Vec<StarterExercise> {
    use ExerciseType::*;
    use MuscleGroup::*;

    vec![
        StarterExercise {
            name: "Bench Press",
            exercise_type: RepsAndWeight,
            muscle_groups: &[Chest, Triceps, Shoulders],
            description: "Barbell press from the chest while lying on a flat bench",
        },
        StarterExercise {
            name: "Back Squat",
            exercise_type: RepsAndWeight,
            muscle_groups: &[Quadriceps, Glutes, Hamstrings],
            description: "Barbell squat with the bar resting on the upper back",
        },
        StarterExercise {
            name: "Deadlift",
            exercise_type: RepsAndWeight,
            muscle_groups: &[Hamstrings, Glutes, Back],
            description: "Lift a loaded barbell from the floor to hip height",
        },
        StarterExercise {
            name: "Overhead Press",
            exercise_type: RepsAndWeight,
            muscle_groups: &[Shoulders, Triceps],
            description: "Standing barbell press from the shoulders to lockout",
        },
        StarterExercise {
            name: "Pull-up",
            exercise_type: RepsAndWeight,
            muscle_groups: &[Back, Biceps, Forearms],
            description: "Hang from a bar and pull the chin above it",
        },
        StarterExercise {
            name: "Standing Calf Raise",
            exercise_type: RepsAndWeight,
            muscle_groups: &[Calves],
            description: "Rise onto the balls of the feet under load",
        },
        StarterExercise {
            name: "Plank",
            exercise_type: TimeBased,
            muscle_groups: &[Core, Shoulders],
            description: "Hold a straight line from head to heels on the forearms",
        },
        StarterExercise {
            name: "Wall Sit",
            exercise_type: TimeBased,
            muscle_groups: &[Quadriceps, Glutes],
            description: "Hold a seated position with the back against a wall",
        },
        StarterExercise {
            name: "Jump Rope",
            exercise_type: TimeBased,
            muscle_groups: &[FullBody, Calves],
            description: "Continuous skipping at a steady pace",
        },
    ]
}

/// Exercises in creation order
#[derive(Clone, Debug, Default)]
pub struct ExerciseCatalog {
    exercises: Vec<Exercise>,
}

impl ExerciseCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_exercises(exercises: Vec<Exercise>) -> Self {
        Self { exercises }
    }

    /// Create an exercise and add it to the catalog
    pub fn create<G: IdGenerator + ?Sized>(
        &mut self,
        name: impl Into<String>,
        exercise_type: ExerciseType,
        muscle_groups: impl IntoIterator<Item = MuscleGroup>,
        description: Option<String>,
        ids: &G,
    ) -> DomainResult<&Exercise> {
        let exercise = Exercise::create(name, exercise_type, muscle_groups, description, ids)?;
        self.exercises.push(exercise);
        Ok(&self.exercises[self.exercises.len() - 1])
    }

    /// Update an existing exercise's name, description and muscle groups
    pub fn update(
        &mut self,
        id: ExerciseId,
        name: impl Into<String>,
        description: Option<String>,
        muscle_groups: impl IntoIterator<Item = MuscleGroup>,
    ) -> DomainResult<&Exercise> {
        let exercise = self
            .exercises
            .iter_mut()
            .find(|e| e.id() == id)
            .ok_or(DomainError::ExerciseNotFound(id))?;
        exercise.update(name, description, muscle_groups)?;
        Ok(&*exercise)
    }

    /// Add every starter exercise whose name is not already taken.
    ///
    /// Returns the number of exercises added.
    pub fn seed_defaults<G: IdGenerator + ?Sized>(&mut self, ids: &G) -> DomainResult<usize> {
        let mut taken: HashSet<String> = self
            .exercises
            .iter()
            .map(|e| e.name().to_lowercase())
            .collect();

        let mut added = 0;
        for starter in starter_exercises() {
            if !taken.insert(starter.name.to_lowercase()) {
                continue;
            }
            self.create(
                starter.name,
                starter.exercise_type,
                starter.muscle_groups.iter().copied(),
                Some(starter.description.to_string()),
                ids,
            )?;
            added += 1;
        }
        Ok(added)
    }

    pub fn get(&self, id: ExerciseId) -> Option<&Exercise> {
        self.exercises.iter().find(|e| e.id() == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Exercise> {
        self.exercises.iter()
    }

    pub fn len(&self) -> usize {
        self.exercises.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exercises.is_empty()
    }

    /// Validate the catalog for consistency
    ///
    /// Returns a list of validation errors, or empty Vec if valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        let mut seen = HashSet::new();

        for exercise in &self.exercises {
            if !seen.insert(exercise.id()) {
                errors.push(format!("Duplicate exercise id '{}'", exercise.id()));
            }
            if exercise.name().trim().is_empty() {
                errors.push(format!("Exercise '{}' has empty name", exercise.id()));
            }
            if exercise.muscle_groups().is_empty() {
                errors.push(format!(
                    "Exercise '{}' ({}) has no muscle groups",
                    exercise.name(),
                    exercise.id()
                ));
            }
        }

        errors
    }
}

impl ExerciseLookup for ExerciseCatalog {
    fn find_exercise(&self, id: ExerciseId) -> Option<&Exercise> {
        self.get(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SequentialIds;
    use std::collections::BTreeSet;

    #[test]
    fn test_starter_table_is_well_formed() {
        let starters = starter_exercises();
        assert!(starters.len() >= 6);
        assert!(starters.iter().all(|s| !s.muscle_groups.is_empty()));
        assert!(starters
            .iter()
            .any(|s| s.exercise_type == ExerciseType::TimeBased));

        let names: HashSet<_> = starters.iter().map(|s| s.name).collect();
        assert_eq!(names.len(), starters.len(), "starter names must be unique");
    }

    #[test]
    fn test_seed_defaults_skips_existing_names() {
        let ids = SequentialIds::new();
        let mut catalog = ExerciseCatalog::new();
        catalog
            .create(
                "plank",
                ExerciseType::TimeBased,
                [MuscleGroup::Core],
                None,
                &ids,
            )
            .unwrap();

        let added = catalog.seed_defaults(&ids).unwrap();
        assert_eq!(added, starter_exercises().len() - 1);
        assert_eq!(catalog.len(), starter_exercises().len());

        // Seeding twice adds nothing
        assert_eq!(catalog.seed_defaults(&ids).unwrap(), 0);
        assert!(catalog.validate().is_empty());
    }

    #[test]
    fn test_update_unknown_exercise() {
        let ids = SequentialIds::new();
        let mut catalog = ExerciseCatalog::new();
        let missing = ExerciseId::generate(&ids);

        let result = catalog.update(missing, "Anything", None, [MuscleGroup::Back]);
        assert_eq!(result.unwrap_err(), DomainError::ExerciseNotFound(missing));
    }

    #[test]
    fn test_lookup_and_creation_order() {
        let ids = SequentialIds::new();
        let mut catalog = ExerciseCatalog::new();
        let first = catalog
            .create("Deadlift", ExerciseType::RepsAndWeight, [MuscleGroup::Back], None, &ids)
            .unwrap()
            .id();
        let second = catalog
            .create("Wall Sit", ExerciseType::TimeBased, [MuscleGroup::Glutes], None, &ids)
            .unwrap()
            .id();

        let order: Vec<_> = catalog.iter().map(|e| e.id()).collect();
        assert_eq!(order, vec![first, second]);
        assert_eq!(
            catalog.find_exercise(second).map(|e| e.name()),
            Some("Wall Sit")
        );
    }

    #[test]
    fn test_validate_flags_duplicate_ids() {
        let exercise = Exercise::rehydrate(
            ExerciseId::generate(&SequentialIds::new()),
            "Row".into(),
            None,
            ExerciseType::RepsAndWeight,
            BTreeSet::from([MuscleGroup::Back]),
        );
        let catalog = ExerciseCatalog::from_exercises(vec![exercise.clone(), exercise]);
        let errors = catalog.validate();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("Duplicate"));
    }
}
