//! The `WorkoutSession` aggregate: one client's execution of a plan.
//!
//! A session snapshots the plan when it starts; later edits to the plan do
//! not reach it. Status moves from `InProgress` to either `Completed` or
//! `Abandoned`, and never back.

use crate::{
    ClientId, Clock, DomainError, DomainResult, ExerciseId, ExerciseType, IdGenerator, Metrics,
    MetricsInput, PlanId, PlannedExercise, SessionExerciseId, SessionId, WorkoutPlan,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of a session
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    InProgress,
    Completed,
    Abandoned,
}

impl SessionStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, SessionStatus::InProgress)
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionStatus::InProgress => f.write_str("in_progress"),
            SessionStatus::Completed => f.write_str("completed"),
            SessionStatus::Abandoned => f.write_str("abandoned"),
        }
    }
}

/// Frozen copy of a planned exercise plus what was actually done
#[derive(Clone, Debug, PartialEq)]
pub struct SessionExercise {
    id: SessionExerciseId,
    exercise_id: ExerciseId,
    exercise_name: String,
    exercise_type: ExerciseType,
    target: Metrics,
    actual: Option<Metrics>,
    completed_at: Option<DateTime<Utc>>,
    order: u32,
}

impl SessionExercise {
    fn snapshot<G: IdGenerator + ?Sized>(planned: &PlannedExercise, ids: &G) -> Self {
        Self {
            id: SessionExerciseId::generate(ids),
            exercise_id: planned.exercise_id(),
            exercise_name: planned.exercise_name().to_string(),
            exercise_type: planned.exercise_type(),
            target: *planned.target(),
            actual: None,
            completed_at: None,
            order: planned.order(),
        }
    }

    #[allow(clippy::too_many_arguments)]
    pub(crate) fn rehydrate(
        id: SessionExerciseId,
        exercise_id: ExerciseId,
        exercise_name: String,
        exercise_type: ExerciseType,
        target: Metrics,
        actual: Option<Metrics>,
        completed_at: Option<DateTime<Utc>>,
        order: u32,
    ) -> Self {
        Self {
            id,
            exercise_id,
            exercise_name,
            exercise_type,
            target,
            actual,
            completed_at,
            order,
        }
    }

    /// Record actual results. Allowed exactly once.
    fn record_actuals(&mut self, input: &MetricsInput, now: DateTime<Utc>) -> DomainResult<()> {
        if self.actual.is_some() {
            return Err(DomainError::ExerciseAlreadyRecorded(self.exercise_id));
        }
        let actual = Metrics::for_type(self.exercise_type, input)?;
        self.actual = Some(actual);
        self.completed_at = Some(now);
        Ok(())
    }

    pub fn id(&self) -> SessionExerciseId {
        self.id
    }

    pub fn exercise_id(&self) -> ExerciseId {
        self.exercise_id
    }

    pub fn exercise_name(&self) -> &str {
        &self.exercise_name
    }

    pub fn exercise_type(&self) -> ExerciseType {
        self.exercise_type
    }

    pub fn target(&self) -> &Metrics {
        &self.target
    }

    pub fn actual(&self) -> Option<&Metrics> {
        self.actual.as_ref()
    }

    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    pub fn order(&self) -> u32 {
        self.order
    }

    pub fn is_completed(&self) -> bool {
        self.completed_at.is_some()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct WorkoutSession {
    id: SessionId,
    client_id: ClientId,
    plan_id: PlanId,
    plan_name: String,
    exercises: Vec<SessionExercise>,
    started_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
    status: SessionStatus,
}

impl WorkoutSession {
    /// Start a session from the plan's current exercises
    pub fn start<C, G>(client_id: ClientId, plan: &WorkoutPlan, clock: &C, ids: &G) -> Self
    where
        C: Clock + ?Sized,
        G: IdGenerator + ?Sized,
    {
        let mut planned: Vec<&PlannedExercise> = plan.exercises().iter().collect();
        planned.sort_by_key(|p| p.order());

        Self {
            id: SessionId::generate(ids),
            client_id,
            plan_id: plan.id(),
            plan_name: plan.name().to_string(),
            exercises: planned
                .into_iter()
                .map(|p| SessionExercise::snapshot(p, ids))
                .collect(),
            started_at: clock.now(),
            completed_at: None,
            status: SessionStatus::InProgress,
        }
    }

    /// Reconstitute a session from persistence (no validation)
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn rehydrate(
        id: SessionId,
        client_id: ClientId,
        plan_id: PlanId,
        plan_name: String,
        mut exercises: Vec<SessionExercise>,
        started_at: DateTime<Utc>,
        completed_at: Option<DateTime<Utc>>,
        status: SessionStatus,
    ) -> Self {
        exercises.sort_by_key(|e| e.order);
        Self {
            id,
            client_id,
            plan_id,
            plan_name,
            exercises,
            started_at,
            completed_at,
            status,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn client_id(&self) -> ClientId {
        self.client_id
    }

    pub fn plan_id(&self) -> PlanId {
        self.plan_id
    }

    /// Plan name as it was when the session started
    pub fn plan_name(&self) -> &str {
        &self.plan_name
    }

    pub fn exercises(&self) -> &[SessionExercise] {
        &self.exercises
    }

    pub fn exercise(&self, exercise_id: ExerciseId) -> Option<&SessionExercise> {
        self.exercises.iter().find(|e| e.exercise_id == exercise_id)
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn completed_count(&self) -> usize {
        self.exercises.iter().filter(|e| e.is_completed()).count()
    }

    pub fn total_count(&self) -> usize {
        self.exercises.len()
    }

    /// True when every exercise has results (vacuously true when empty)
    pub fn all_completed(&self) -> bool {
        self.completed_count() == self.total_count()
    }

    /// Time between start and the terminal transition, if there was one
    pub fn elapsed(&self) -> Option<chrono::Duration> {
        self.completed_at.map(|end| end - self.started_at)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // State transitions
    // ─────────────────────────────────────────────────────────────────────────

    /// Record what the client actually did for one exercise.
    ///
    /// # Errors
    ///
    /// - `SessionNotActive` unless the session is in progress
    /// - `ExerciseNotFound` if the exercise is not part of this session
    /// - `ExerciseAlreadyRecorded` on a second attempt for the same exercise
    /// - validation errors when the actuals do not fit the exercise type
    pub fn complete_exercise<C: Clock + ?Sized>(
        &mut self,
        exercise_id: ExerciseId,
        input: &MetricsInput,
        clock: &C,
    ) -> DomainResult<&SessionExercise> {
        if self.status != SessionStatus::InProgress {
            return Err(DomainError::SessionNotActive);
        }
        let index = self
            .exercises
            .iter()
            .position(|e| e.exercise_id == exercise_id)
            .ok_or(DomainError::ExerciseNotFound(exercise_id))?;

        self.exercises[index].record_actuals(input, clock.now())?;
        Ok(&self.exercises[index])
    }

    /// Finish the session. Unrecorded exercises are allowed.
    pub fn complete<C: Clock + ?Sized>(&mut self, clock: &C) -> DomainResult<()> {
        self.finish(SessionStatus::Completed, clock)
    }

    /// Stop the session without finishing it
    pub fn abandon<C: Clock + ?Sized>(&mut self, clock: &C) -> DomainResult<()> {
        self.finish(SessionStatus::Abandoned, clock)
    }

    fn finish<C: Clock + ?Sized>(&mut self, target: SessionStatus, clock: &C) -> DomainResult<()> {
        match self.status {
            SessionStatus::InProgress => {
                self.status = target;
                self.completed_at = Some(clock.now());
                Ok(())
            }
            SessionStatus::Completed => Err(DomainError::AlreadyCompleted),
            SessionStatus::Abandoned => Err(DomainError::AlreadyAbandoned),
        }
    }
}
