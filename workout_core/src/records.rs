//! Persisted shape of the aggregates.
//!
//! Records are plain serde structs with nullable metric columns and an
//! explicit `order`. Turning a record back into an aggregate skips business
//! validation and is only available inside the crate (the store uses it).

use crate::{
    ClientId, Duration, Error, Exercise, ExerciseId, ExerciseType, Load, Metrics, MuscleGroup,
    PlanId, PlannedExercise, PlannedExerciseId, Result, SessionExercise, SessionExerciseId,
    SessionId, SessionStatus, TrainerId, Weight, WeightUnit, WorkoutPlan, WorkoutSession,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Sets plus the type-conditional columns
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct MetricColumns {
    pub sets: u32,
    pub reps: Option<u32>,
    pub weight_value: Option<f64>,
    pub weight_unit: Option<WeightUnit>,
    pub duration_seconds: Option<u32>,
}

impl From<&Metrics> for MetricColumns {
    fn from(metrics: &Metrics) -> Self {
        let weight = metrics.weight();
        MetricColumns {
            sets: metrics.sets(),
            reps: metrics.reps(),
            weight_value: weight.map(|w| w.value()),
            weight_unit: weight.map(|w| w.unit()),
            duration_seconds: metrics.duration().map(|d| d.seconds()),
        }
    }
}

impl MetricColumns {
    fn into_metrics(self, exercise_type: ExerciseType) -> Result<Metrics> {
        let load = match exercise_type {
            ExerciseType::RepsAndWeight => {
                let reps = self
                    .reps
                    .ok_or_else(|| corrupt("reps-and-weight entry without reps"))?;
                let weight = match (self.weight_value, self.weight_unit) {
                    (Some(value), Some(unit)) => Some(
                        Weight::new(value, unit)
                            .map_err(|e| corrupt(&format!("bad weight column: {}", e)))?,
                    ),
                    (None, None) => None,
                    _ => return Err(corrupt("weight value and unit must be set together")),
                };
                Load::Reps { reps, weight }
            }
            ExerciseType::TimeBased => {
                let seconds = self
                    .duration_seconds
                    .ok_or_else(|| corrupt("time-based entry without duration"))?;
                let duration = Duration::new(seconds)
                    .map_err(|e| corrupt(&format!("bad duration column: {}", e)))?;
                Load::Timed { duration }
            }
        };
        Ok(Metrics::from_parts(self.sets, load))
    }
}

fn corrupt(detail: &str) -> Error {
    Error::State(format!("corrupt record: {}", detail))
}

// ============================================================================
// Exercise
// ============================================================================

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ExerciseRecord {
    pub id: ExerciseId,
    pub name: String,
    pub description: Option<String>,
    pub exercise_type: ExerciseType,
    pub muscle_groups: Vec<MuscleGroup>,
}

impl From<&Exercise> for ExerciseRecord {
    fn from(exercise: &Exercise) -> Self {
        ExerciseRecord {
            id: exercise.id(),
            name: exercise.name().to_string(),
            description: exercise.description().map(str::to_string),
            exercise_type: exercise.exercise_type(),
            muscle_groups: exercise.muscle_groups().iter().copied().collect(),
        }
    }
}

impl ExerciseRecord {
    pub(crate) fn into_exercise(self) -> Exercise {
        Exercise::rehydrate(
            self.id,
            self.name,
            self.description,
            self.exercise_type,
            self.muscle_groups.into_iter().collect(),
        )
    }
}

// ============================================================================
// Workout Plan
// ============================================================================

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct PlannedExerciseRecord {
    pub id: PlannedExerciseId,
    pub exercise_id: ExerciseId,
    pub exercise_name: String,
    pub exercise_type: ExerciseType,
    pub order: u32,
    pub target: MetricColumns,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct WorkoutPlanRecord {
    pub id: PlanId,
    pub name: String,
    pub description: Option<String>,
    pub trainer_id: TrainerId,
    pub exercises: Vec<PlannedExerciseRecord>,
}

impl From<&WorkoutPlan> for WorkoutPlanRecord {
    fn from(plan: &WorkoutPlan) -> Self {
        WorkoutPlanRecord {
            id: plan.id(),
            name: plan.name().to_string(),
            description: plan.description().map(str::to_string),
            trainer_id: plan.trainer_id(),
            exercises: plan
                .exercises()
                .iter()
                .map(|e| PlannedExerciseRecord {
                    id: e.id(),
                    exercise_id: e.exercise_id(),
                    exercise_name: e.exercise_name().to_string(),
                    exercise_type: e.exercise_type(),
                    order: e.order(),
                    target: MetricColumns::from(e.target()),
                })
                .collect(),
        }
    }
}

impl WorkoutPlanRecord {
    pub(crate) fn into_plan(self) -> Result<WorkoutPlan> {
        let exercises = self
            .exercises
            .into_iter()
            .map(|e| {
                let target = e.target.into_metrics(e.exercise_type)?;
                Ok(PlannedExercise::rehydrate(
                    e.id,
                    e.exercise_id,
                    e.exercise_name,
                    e.exercise_type,
                    target,
                    e.order,
                ))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(WorkoutPlan::rehydrate(
            self.id,
            self.name,
            self.description,
            self.trainer_id,
            exercises,
        ))
    }
}

// ============================================================================
// Workout Session
// ============================================================================

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SessionExerciseRecord {
    pub id: SessionExerciseId,
    pub exercise_id: ExerciseId,
    pub exercise_name: String,
    pub exercise_type: ExerciseType,
    pub order: u32,
    pub target: MetricColumns,
    pub actual: Option<MetricColumns>,
    pub completed_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct WorkoutSessionRecord {
    pub id: SessionId,
    pub client_id: ClientId,
    pub plan_id: PlanId,
    pub plan_name: String,
    pub status: SessionStatus,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub exercises: Vec<SessionExerciseRecord>,
}

impl From<&WorkoutSession> for WorkoutSessionRecord {
    fn from(session: &WorkoutSession) -> Self {
        WorkoutSessionRecord {
            id: session.id(),
            client_id: session.client_id(),
            plan_id: session.plan_id(),
            plan_name: session.plan_name().to_string(),
            status: session.status(),
            started_at: session.started_at(),
            completed_at: session.completed_at(),
            exercises: session
                .exercises()
                .iter()
                .map(|e| SessionExerciseRecord {
                    id: e.id(),
                    exercise_id: e.exercise_id(),
                    exercise_name: e.exercise_name().to_string(),
                    exercise_type: e.exercise_type(),
                    order: e.order(),
                    target: MetricColumns::from(e.target()),
                    actual: e.actual().map(MetricColumns::from),
                    completed_at: e.completed_at(),
                })
                .collect(),
        }
    }
}

impl WorkoutSessionRecord {
    pub(crate) fn into_session(self) -> Result<WorkoutSession> {
        let exercises = self
            .exercises
            .into_iter()
            .map(|e| {
                if e.actual.is_some() != e.completed_at.is_some() {
                    return Err(corrupt(
                        "session exercise actuals and completion time must be set together",
                    ));
                }
                let target = e.target.into_metrics(e.exercise_type)?;
                let actual = e
                    .actual
                    .map(|a| a.into_metrics(e.exercise_type))
                    .transpose()?;
                Ok(SessionExercise::rehydrate(
                    e.id,
                    e.exercise_id,
                    e.exercise_name,
                    e.exercise_type,
                    target,
                    actual,
                    e.completed_at,
                    e.order,
                ))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(WorkoutSession::rehydrate(
            self.id,
            self.client_id,
            self.plan_id,
            self.plan_name,
            exercises,
            self.started_at,
            self.completed_at,
            self.status,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        ExerciseCatalog, FixedClock, MetricsInput, SequentialIds, TrainerId, WorkoutPlan,
    };
    use chrono::TimeZone;

    fn sample() -> (ExerciseCatalog, WorkoutPlan, WorkoutSession) {
        let ids = SequentialIds::new();
        let mut catalog = ExerciseCatalog::new();
        let row = catalog
            .create("Barbell Row", ExerciseType::RepsAndWeight, [MuscleGroup::Back], None, &ids)
            .unwrap()
            .id();
        let sit = catalog
            .create("Wall Sit", ExerciseType::TimeBased, [MuscleGroup::Quadriceps], None, &ids)
            .unwrap()
            .id();

        let mut plan =
            WorkoutPlan::create("Pull", TrainerId::generate(&ids), Some("B day".into()), &ids)
                .unwrap();
        plan.add_catalog_exercise(
            &catalog,
            row,
            &MetricsInput::reps(4, 8).with_weight(Weight::pounds(135.0).unwrap()),
            &ids,
        )
        .unwrap();
        plan.add_catalog_exercise(
            &catalog,
            sit,
            &MetricsInput::timed(2, Duration::new(45).unwrap()),
            &ids,
        )
        .unwrap();

        let clock = FixedClock::at(Utc.with_ymd_and_hms(2024, 1, 2, 7, 30, 0).unwrap());
        let mut session = WorkoutSession::start(ClientId::generate(&ids), &plan, &clock, &ids);
        session
            .complete_exercise(sit, &MetricsInput::timed(2, Duration::new(50).unwrap()), &clock)
            .unwrap();
        (catalog, plan, session)
    }

    #[test]
    fn test_plan_record_keeps_nullable_columns() {
        let (_, plan, _) = sample();
        let record = WorkoutPlanRecord::from(&plan);

        let row = &record.exercises[0];
        assert_eq!(row.order, 1);
        assert_eq!(row.target.reps, Some(8));
        assert_eq!(row.target.weight_unit, Some(WeightUnit::Pounds));
        assert_eq!(row.target.duration_seconds, None);

        let sit = &record.exercises[1];
        assert_eq!(sit.order, 2);
        assert_eq!(sit.target.reps, None);
        assert_eq!(sit.target.weight_value, None);
        assert_eq!(sit.target.duration_seconds, Some(45));
    }

    #[test]
    fn test_records_rehydrate_to_equal_aggregates() {
        let (catalog, plan, session) = sample();

        for exercise in catalog.iter() {
            let back = ExerciseRecord::from(exercise).into_exercise();
            assert_eq!(&back, exercise);
        }

        let json = serde_json::to_string(&WorkoutPlanRecord::from(&plan)).unwrap();
        let back: WorkoutPlanRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back.into_plan().unwrap(), plan);

        let back = WorkoutSessionRecord::from(&session).into_session().unwrap();
        assert_eq!(back, session);
        assert_eq!(back.completed_count(), 1);
    }

    #[test]
    fn test_corrupt_columns_are_rejected() {
        let (_, plan, _) = sample();
        let mut record = WorkoutPlanRecord::from(&plan);
        record.exercises[1].target.duration_seconds = None;

        let err = record.into_plan().unwrap_err();
        assert!(matches!(err, Error::State(_)));
    }

    #[test]
    fn test_session_exercise_completion_columns_must_pair() {
        let (_, _, session) = sample();

        let mut record = WorkoutSessionRecord::from(&session);
        assert!(record.exercises[1].actual.is_some());
        record.exercises[1].completed_at = None;
        let err = record.into_session().unwrap_err();
        assert!(matches!(err, Error::State(_)));

        let mut record = WorkoutSessionRecord::from(&session);
        assert!(record.exercises[0].actual.is_none());
        record.exercises[0].completed_at = Some(session.started_at());
        let err = record.into_session().unwrap_err();
        assert!(matches!(err, Error::State(_)));
    }
}
