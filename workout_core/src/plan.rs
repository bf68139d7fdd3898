//! The `WorkoutPlan` aggregate: an ordered list of planned exercises.
//!
//! Invariants held after every successful mutation:
//! - no exercise id appears twice
//! - `order` values are exactly 1..N and match list position

use crate::exercise::{validate_description, validate_name};
use crate::{
    DomainError, DomainResult, Exercise, ExerciseId, ExerciseLookup, ExerciseType, IdGenerator,
    Metrics, MetricsInput, PlanId, PlannedExerciseId, TrainerId,
};
use std::collections::{HashMap, HashSet};

/// One exercise inside a plan, with its target metrics
#[derive(Clone, Debug, PartialEq)]
pub struct PlannedExercise {
    id: PlannedExerciseId,
    exercise_id: ExerciseId,
    exercise_name: String,
    exercise_type: ExerciseType,
    target: Metrics,
    order: u32,
}

impl PlannedExercise {
    fn new<G: IdGenerator + ?Sized>(
        exercise: &Exercise,
        input: &MetricsInput,
        order: u32,
        ids: &G,
    ) -> DomainResult<Self> {
        let target = Metrics::for_type(exercise.exercise_type(), input)?;
        Ok(Self {
            id: PlannedExerciseId::generate(ids),
            exercise_id: exercise.id(),
            exercise_name: exercise.name().to_string(),
            exercise_type: exercise.exercise_type(),
            target,
            order,
        })
    }

    pub(crate) fn rehydrate(
        id: PlannedExerciseId,
        exercise_id: ExerciseId,
        exercise_name: String,
        exercise_type: ExerciseType,
        target: Metrics,
        order: u32,
    ) -> Self {
        Self {
            id,
            exercise_id,
            exercise_name,
            exercise_type,
            target,
            order,
        }
    }

    pub fn id(&self) -> PlannedExerciseId {
        self.id
    }

    pub fn exercise_id(&self) -> ExerciseId {
        self.exercise_id
    }

    /// Exercise name as it was when the entry was added
    pub fn exercise_name(&self) -> &str {
        &self.exercise_name
    }

    pub fn exercise_type(&self) -> ExerciseType {
        self.exercise_type
    }

    pub fn target(&self) -> &Metrics {
        &self.target
    }

    /// 1-based position within the plan
    pub fn order(&self) -> u32 {
        self.order
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct WorkoutPlan {
    id: PlanId,
    name: String,
    description: Option<String>,
    trainer_id: TrainerId,
    exercises: Vec<PlannedExercise>,
}

impl WorkoutPlan {
    /// Create an empty plan owned by `trainer_id`.
    ///
    /// # Errors
    ///
    /// - `InvalidName` if the name is empty or longer than 100 characters
    /// - `DescriptionTooLong` if the description exceeds 500 characters
    pub fn create<G: IdGenerator + ?Sized>(
        name: impl Into<String>,
        trainer_id: TrainerId,
        description: Option<String>,
        ids: &G,
    ) -> DomainResult<Self> {
        let name = validate_name(name.into())?;
        let description = validate_description(description)?;

        Ok(Self {
            id: PlanId::generate(ids),
            name,
            description,
            trainer_id,
            exercises: Vec::new(),
        })
    }

    /// Reconstitute a plan from persistence (no validation)
    pub(crate) fn rehydrate(
        id: PlanId,
        name: String,
        description: Option<String>,
        trainer_id: TrainerId,
        mut exercises: Vec<PlannedExercise>,
    ) -> Self {
        exercises.sort_by_key(|e| e.order);
        Self {
            id,
            name,
            description,
            trainer_id,
            exercises,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn id(&self) -> PlanId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn trainer_id(&self) -> TrainerId {
        self.trainer_id
    }

    /// Planned exercises in ascending `order`
    pub fn exercises(&self) -> &[PlannedExercise] {
        &self.exercises
    }

    pub fn exercise(&self, exercise_id: ExerciseId) -> Option<&PlannedExercise> {
        self.exercises.iter().find(|e| e.exercise_id == exercise_id)
    }

    pub fn exercise_count(&self) -> usize {
        self.exercises.len()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutations
    // ─────────────────────────────────────────────────────────────────────────

    /// Rename the plan and replace its description
    pub fn update_details(
        &mut self,
        name: impl Into<String>,
        description: Option<String>,
    ) -> DomainResult<()> {
        let name = validate_name(name.into())?;
        let description = validate_description(description)?;
        self.name = name;
        self.description = description;
        Ok(())
    }

    /// Append `exercise` at the end of the plan.
    ///
    /// # Errors
    ///
    /// - `DuplicateExercise` if the exercise is already in the plan
    /// - `InvalidSets`, `RepsRequired`, `InvalidReps`, `DurationRequired`
    ///   when the targets do not fit the exercise type
    pub fn add_exercise<G: IdGenerator + ?Sized>(
        &mut self,
        exercise: &Exercise,
        input: &MetricsInput,
        ids: &G,
    ) -> DomainResult<&PlannedExercise> {
        if self.position_of(exercise.id()).is_some() {
            return Err(DomainError::DuplicateExercise(exercise.id()));
        }

        let order = self.exercises.len() as u32 + 1;
        let planned = PlannedExercise::new(exercise, input, order, ids)?;
        self.exercises.push(planned);
        Ok(&self.exercises[self.exercises.len() - 1])
    }

    /// Resolve `exercise_id` through `lookup`, then add it
    pub fn add_catalog_exercise<L, G>(
        &mut self,
        lookup: &L,
        exercise_id: ExerciseId,
        input: &MetricsInput,
        ids: &G,
    ) -> DomainResult<&PlannedExercise>
    where
        L: ExerciseLookup + ?Sized,
        G: IdGenerator + ?Sized,
    {
        let exercise = lookup
            .find_exercise(exercise_id)
            .ok_or(DomainError::ExerciseNotFound(exercise_id))?;
        self.add_exercise(exercise, input, ids)
    }

    /// Remove an exercise and close the gap in the ordering
    pub fn remove_exercise(&mut self, exercise_id: ExerciseId) -> DomainResult<PlannedExercise> {
        let index = self
            .position_of(exercise_id)
            .ok_or(DomainError::ExerciseNotFound(exercise_id))?;
        let removed = self.exercises.remove(index);
        self.renumber();
        Ok(removed)
    }

    /// Replace the targets of an exercise already in the plan. Order is kept.
    pub fn update_exercise(
        &mut self,
        exercise_id: ExerciseId,
        input: &MetricsInput,
    ) -> DomainResult<&PlannedExercise> {
        let index = self
            .position_of(exercise_id)
            .ok_or(DomainError::ExerciseNotFound(exercise_id))?;
        let entry = &mut self.exercises[index];
        entry.target = Metrics::for_type(entry.exercise_type, input)?;
        Ok(&self.exercises[index])
    }

    /// Put the plan's exercises in the order given.
    ///
    /// # Errors
    ///
    /// - `ExerciseNotFound` for the first id not in the plan
    /// - `NotAPermutation` if ids repeat or some plan exercise is missing
    pub fn reorder_exercises(&mut self, ordered_ids: &[ExerciseId]) -> DomainResult<()> {
        if let Some(missing) = ordered_ids
            .iter()
            .find(|id| self.position_of(**id).is_none())
        {
            return Err(DomainError::ExerciseNotFound(*missing));
        }

        let distinct: HashSet<_> = ordered_ids.iter().collect();
        if distinct.len() != ordered_ids.len() || ordered_ids.len() != self.exercises.len() {
            return Err(DomainError::NotAPermutation);
        }

        let rank: HashMap<ExerciseId, usize> = ordered_ids
            .iter()
            .enumerate()
            .map(|(i, id)| (*id, i))
            .collect();
        self.exercises.sort_by_key(|e| rank[&e.exercise_id]);
        self.renumber();
        Ok(())
    }

    fn position_of(&self, exercise_id: ExerciseId) -> Option<usize> {
        self.exercises
            .iter()
            .position(|e| e.exercise_id == exercise_id)
    }

    fn renumber(&mut self) {
        for (i, entry) in self.exercises.iter_mut().enumerate() {
            entry.order = i as u32 + 1;
        }
    }
}
