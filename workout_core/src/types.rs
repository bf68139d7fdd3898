//! Core domain types for the workout system.
//!
//! This module defines the fundamental types shared by the aggregates:
//! - Exercise types and muscle-group tags
//! - Value objects (`Weight`, `Duration`)
//! - Type-conditional metrics used for plan targets and session actuals

use crate::{DomainError, DomainResult, Error};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Exercise Classification
// ============================================================================

/// How an exercise is measured. Fixed once the exercise exists.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ExerciseType {
    RepsAndWeight,
    TimeBased,
}

impl fmt::Display for ExerciseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExerciseType::RepsAndWeight => f.write_str("reps_and_weight"),
            ExerciseType::TimeBased => f.write_str("time_based"),
        }
    }
}

impl FromStr for ExerciseType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_token(s).as_str() {
            "reps_and_weight" | "reps" | "strength" => Ok(ExerciseType::RepsAndWeight),
            "time_based" | "timed" | "time" => Ok(ExerciseType::TimeBased),
            other => Err(Error::Other(format!("unknown exercise type '{}'", other))),
        }
    }
}

/// Muscle-group tag attached to catalog exercises
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum MuscleGroup {
    Chest,
    Back,
    Shoulders,
    Biceps,
    Triceps,
    Forearms,
    Core,
    Quadriceps,
    Hamstrings,
    Glutes,
    Calves,
    FullBody,
}

impl MuscleGroup {
    pub const ALL: [MuscleGroup; 12] = [
        MuscleGroup::Chest,
        MuscleGroup::Back,
        MuscleGroup::Shoulders,
        MuscleGroup::Biceps,
        MuscleGroup::Triceps,
        MuscleGroup::Forearms,
        MuscleGroup::Core,
        MuscleGroup::Quadriceps,
        MuscleGroup::Hamstrings,
        MuscleGroup::Glutes,
        MuscleGroup::Calves,
        MuscleGroup::FullBody,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MuscleGroup::Chest => "chest",
            MuscleGroup::Back => "back",
            MuscleGroup::Shoulders => "shoulders",
            MuscleGroup::Biceps => "biceps",
            MuscleGroup::Triceps => "triceps",
            MuscleGroup::Forearms => "forearms",
            MuscleGroup::Core => "core",
            MuscleGroup::Quadriceps => "quadriceps",
            MuscleGroup::Hamstrings => "hamstrings",
            MuscleGroup::Glutes => "glutes",
            MuscleGroup::Calves => "calves",
            MuscleGroup::FullBody => "full_body",
        }
    }
}

impl fmt::Display for MuscleGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MuscleGroup {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = normalize_token(s);
        match token.as_str() {
            "quads" => return Ok(MuscleGroup::Quadriceps),
            "abs" => return Ok(MuscleGroup::Core),
            _ => {}
        }
        MuscleGroup::ALL
            .iter()
            .copied()
            .find(|g| g.as_str() == token)
            .ok_or_else(|| Error::Other(format!("unknown muscle group '{}'", token)))
    }
}

fn normalize_token(s: &str) -> String {
    s.trim().to_lowercase().replace(['-', ' '], "_")
}

// ============================================================================
// Value Objects
// ============================================================================

/// Unit a weight is expressed in
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum WeightUnit {
    #[default]
    #[serde(rename = "kg", alias = "kilograms")]
    Kilograms,
    #[serde(rename = "lb", alias = "pounds")]
    Pounds,
}

impl WeightUnit {
    pub fn symbol(&self) -> &'static str {
        match self {
            WeightUnit::Kilograms => "kg",
            WeightUnit::Pounds => "lb",
        }
    }
}

impl fmt::Display for WeightUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for WeightUnit {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "kg" | "kgs" | "kilogram" | "kilograms" => Ok(WeightUnit::Kilograms),
            "lb" | "lbs" | "pound" | "pounds" => Ok(WeightUnit::Pounds),
            _ => Err(DomainError::InvalidWeight),
        }
    }
}

/// A non-negative load, rounded to two decimal places
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Weight {
    value: f64,
    unit: WeightUnit,
}

impl Weight {
    pub fn new(value: f64, unit: WeightUnit) -> DomainResult<Self> {
        if !value.is_finite() || value < 0.0 {
            return Err(DomainError::InvalidWeight);
        }
        // `+ 0.0` folds a negative zero into positive zero
        let value = (value * 100.0).round() / 100.0 + 0.0;
        // Huge inputs overflow while rounding
        if !value.is_finite() {
            return Err(DomainError::InvalidWeight);
        }
        Ok(Self { value, unit })
    }

    pub fn kilograms(value: f64) -> DomainResult<Self> {
        Self::new(value, WeightUnit::Kilograms)
    }

    pub fn pounds(value: f64) -> DomainResult<Self> {
        Self::new(value, WeightUnit::Pounds)
    }

    /// Parse `"62.5kg"`, `"135 lb"` or a bare number in `default_unit`
    pub fn parse_with_default(s: &str, default_unit: WeightUnit) -> DomainResult<Self> {
        let s = s.trim();
        let split = s
            .find(|c: char| c.is_ascii_alphabetic())
            .unwrap_or(s.len());
        let (number, unit) = s.split_at(split);
        let unit = if unit.trim().is_empty() {
            default_unit
        } else {
            unit.parse()?
        };
        let value: f64 = number
            .trim()
            .parse()
            .map_err(|_| DomainError::InvalidWeight)?;
        Self::new(value, unit)
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn unit(&self) -> WeightUnit {
        self.unit
    }
}

impl fmt::Display for Weight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.value, self.unit)
    }
}

impl FromStr for Weight {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_with_default(s, WeightUnit::default())
    }
}

/// A time span of at least one whole second
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Duration {
    seconds: u32,
}

impl Duration {
    pub fn new(seconds: u32) -> DomainResult<Self> {
        if seconds < 1 {
            return Err(DomainError::InvalidDuration);
        }
        Ok(Self { seconds })
    }

    pub fn seconds(&self) -> u32 {
        self.seconds
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (minutes, seconds) = (self.seconds / 60, self.seconds % 60);
        match (minutes, seconds) {
            (0, s) => write!(f, "{}s", s),
            (m, 0) => write!(f, "{}m", m),
            (m, s) => write!(f, "{}m{}s", m, s),
        }
    }
}

impl FromStr for Duration {
    type Err = DomainError;

    /// Accepts `90`, `90s`, `2m` and `1m30s`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();
        let parse = |part: &str| -> DomainResult<u32> {
            part.strip_suffix('s')
                .unwrap_or(part)
                .parse()
                .map_err(|_| DomainError::InvalidDuration)
        };

        let seconds = match s.split_once('m') {
            Some((minutes, rest)) => {
                let minutes: u32 = minutes.parse().map_err(|_| DomainError::InvalidDuration)?;
                let extra = if rest.is_empty() { 0 } else { parse(rest)? };
                minutes
                    .checked_mul(60)
                    .and_then(|m| m.checked_add(extra))
                    .ok_or(DomainError::InvalidDuration)?
            }
            None => parse(s.as_str())?,
        };

        Duration::new(seconds)
    }
}

// ============================================================================
// Metrics
// ============================================================================

/// The type-conditional part of a target or a recorded result
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Load {
    Reps { reps: u32, weight: Option<Weight> },
    Timed { duration: Duration },
}

/// Raw, unvalidated metric fields as supplied by a caller.
///
/// Fields that do not apply to the exercise type are ignored.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MetricsInput {
    pub sets: u32,
    pub reps: Option<u32>,
    pub weight: Option<Weight>,
    pub duration: Option<Duration>,
}

impl MetricsInput {
    pub fn reps(sets: u32, reps: u32) -> Self {
        Self {
            sets,
            reps: Some(reps),
            ..Self::default()
        }
    }

    pub fn timed(sets: u32, duration: Duration) -> Self {
        Self {
            sets,
            duration: Some(duration),
            ..Self::default()
        }
    }

    pub fn with_weight(mut self, weight: Weight) -> Self {
        self.weight = Some(weight);
        self
    }
}

/// Validated sets plus type-conditional load
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Metrics {
    sets: u32,
    load: Load,
}

impl Metrics {
    /// Validate `input` against the rules for `exercise_type`
    pub fn for_type(exercise_type: ExerciseType, input: &MetricsInput) -> DomainResult<Self> {
        if input.sets < 1 {
            return Err(DomainError::InvalidSets);
        }

        let load = match exercise_type {
            ExerciseType::RepsAndWeight => {
                let reps = input.reps.ok_or(DomainError::RepsRequired)?;
                if reps < 1 {
                    return Err(DomainError::InvalidReps);
                }
                Load::Reps {
                    reps,
                    weight: input.weight,
                }
            }
            ExerciseType::TimeBased => Load::Timed {
                duration: input.duration.ok_or(DomainError::DurationRequired)?,
            },
        };

        Ok(Self {
            sets: input.sets,
            load,
        })
    }

    /// Build from already-validated parts (used when rehydrating)
    pub(crate) fn from_parts(sets: u32, load: Load) -> Self {
        Self { sets, load }
    }

    pub fn sets(&self) -> u32 {
        self.sets
    }

    pub fn load(&self) -> Load {
        self.load
    }

    pub fn exercise_type(&self) -> ExerciseType {
        match self.load {
            Load::Reps { .. } => ExerciseType::RepsAndWeight,
            Load::Timed { .. } => ExerciseType::TimeBased,
        }
    }

    pub fn reps(&self) -> Option<u32> {
        match self.load {
            Load::Reps { reps, .. } => Some(reps),
            Load::Timed { .. } => None,
        }
    }

    pub fn weight(&self) -> Option<Weight> {
        match self.load {
            Load::Reps { weight, .. } => weight,
            Load::Timed { .. } => None,
        }
    }

    pub fn duration(&self) -> Option<Duration> {
        match self.load {
            Load::Timed { duration } => Some(duration),
            Load::Reps { .. } => None,
        }
    }
}

impl fmt::Display for Metrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.load {
            Load::Reps {
                reps,
                weight: Some(weight),
            } => write!(f, "{} x {} @ {}", self.sets, reps, weight),
            Load::Reps { reps, weight: None } => write!(f, "{} x {}", self.sets, reps),
            Load::Timed { duration } => write!(f, "{} x {}", self.sets, duration),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weight_rounds_to_two_decimals() {
        let w = Weight::kilograms(75.567).unwrap();
        assert_eq!(w.value(), 75.57);
        assert_eq!(w.unit(), WeightUnit::Kilograms);
    }

    #[test]
    fn test_weight_rejects_negative_and_non_finite() {
        assert_eq!(Weight::kilograms(-1.0), Err(DomainError::InvalidWeight));
        assert_eq!(Weight::pounds(f64::NAN), Err(DomainError::InvalidWeight));
        assert_eq!(
            Weight::pounds(f64::INFINITY),
            Err(DomainError::InvalidWeight)
        );
        assert!(Weight::kilograms(0.0).is_ok());
    }

    #[test]
    fn test_weight_rejects_values_that_overflow_when_rounded() {
        assert_eq!(Weight::kilograms(1e307), Err(DomainError::InvalidWeight));
        assert_eq!(Weight::pounds(f64::MAX), Err(DomainError::InvalidWeight));

        let digits = format!("1{}", "0".repeat(307));
        assert_eq!(
            Weight::parse_with_default(&digits, WeightUnit::Kilograms),
            Err(DomainError::InvalidWeight)
        );
        assert!(Weight::kilograms(1e12).is_ok());
    }

    #[test]
    fn test_weight_parsing() {
        let w = Weight::parse_with_default("62.5kg", WeightUnit::Pounds).unwrap();
        assert_eq!(w, Weight::kilograms(62.5).unwrap());

        let w = Weight::parse_with_default("135 lbs", WeightUnit::Kilograms).unwrap();
        assert_eq!(w, Weight::pounds(135.0).unwrap());

        let w = Weight::parse_with_default("40", WeightUnit::Pounds).unwrap();
        assert_eq!(w.unit(), WeightUnit::Pounds);

        assert!(Weight::parse_with_default("-1kg", WeightUnit::Kilograms).is_err());
        assert!(Weight::parse_with_default("heavy", WeightUnit::Kilograms).is_err());
        assert!(Weight::parse_with_default("10 stone", WeightUnit::Kilograms).is_err());
    }

    #[test]
    fn test_weight_display() {
        assert_eq!(Weight::kilograms(60.0).unwrap().to_string(), "60 kg");
        assert_eq!(Weight::pounds(62.5).unwrap().to_string(), "62.5 lb");
    }

    #[test]
    fn test_duration_bounds() {
        assert_eq!(Duration::new(0), Err(DomainError::InvalidDuration));
        assert_eq!(Duration::new(1).unwrap().seconds(), 1);
    }

    #[test]
    fn test_duration_parsing_and_display() {
        assert_eq!("90".parse::<Duration>().unwrap().seconds(), 90);
        assert_eq!("45s".parse::<Duration>().unwrap().seconds(), 45);
        assert_eq!("2m".parse::<Duration>().unwrap().seconds(), 120);
        assert_eq!("1m30s".parse::<Duration>().unwrap().seconds(), 90);
        assert!("0s".parse::<Duration>().is_err());
        assert!("soon".parse::<Duration>().is_err());

        assert_eq!(Duration::new(45).unwrap().to_string(), "45s");
        assert_eq!(Duration::new(120).unwrap().to_string(), "2m");
        assert_eq!(Duration::new(65).unwrap().to_string(), "1m5s");
    }

    #[test]
    fn test_parse_exercise_type_and_muscle_group() {
        assert_eq!(
            "reps-and-weight".parse::<ExerciseType>().unwrap(),
            ExerciseType::RepsAndWeight
        );
        assert_eq!(
            "Time Based".parse::<ExerciseType>().unwrap(),
            ExerciseType::TimeBased
        );
        assert!("yoga".parse::<ExerciseType>().is_err());

        assert_eq!("full-body".parse::<MuscleGroup>().unwrap(), MuscleGroup::FullBody);
        assert_eq!("Quads".parse::<MuscleGroup>().unwrap(), MuscleGroup::Quadriceps);
        assert!("elbows".parse::<MuscleGroup>().is_err());
    }

    #[test]
    fn test_metrics_reps_and_weight_rules() {
        let ok = Metrics::for_type(
            ExerciseType::RepsAndWeight,
            &MetricsInput::reps(3, 10).with_weight(Weight::kilograms(60.0).unwrap()),
        )
        .unwrap();
        assert_eq!(ok.sets(), 3);
        assert_eq!(ok.reps(), Some(10));
        assert_eq!(ok.duration(), None);
        assert_eq!(ok.to_string(), "3 x 10 @ 60 kg");

        let missing = MetricsInput {
            sets: 3,
            ..MetricsInput::default()
        };
        assert_eq!(
            Metrics::for_type(ExerciseType::RepsAndWeight, &missing),
            Err(DomainError::RepsRequired)
        );
        assert_eq!(
            Metrics::for_type(ExerciseType::RepsAndWeight, &MetricsInput::reps(3, 0)),
            Err(DomainError::InvalidReps)
        );
        assert_eq!(
            Metrics::for_type(ExerciseType::RepsAndWeight, &MetricsInput::reps(0, 10)),
            Err(DomainError::InvalidSets)
        );
    }

    #[test]
    fn test_metrics_time_based_rules() {
        let minute = Duration::new(60).unwrap();
        let ok = Metrics::for_type(ExerciseType::TimeBased, &MetricsInput::timed(3, minute))
            .unwrap();
        assert_eq!(ok.duration(), Some(minute));
        assert_eq!(ok.exercise_type(), ExerciseType::TimeBased);

        assert_eq!(
            Metrics::for_type(ExerciseType::TimeBased, &MetricsInput::reps(3, 10)),
            Err(DomainError::DurationRequired)
        );
    }

    #[test]
    fn test_metrics_drop_fields_for_other_type() {
        let input = MetricsInput {
            sets: 2,
            reps: Some(12),
            weight: Some(Weight::kilograms(20.0).unwrap()),
            duration: Some(Duration::new(30).unwrap()),
        };
        let timed = Metrics::for_type(ExerciseType::TimeBased, &input).unwrap();
        assert_eq!(timed.reps(), None);
        assert_eq!(timed.weight(), None);

        let reps = Metrics::for_type(ExerciseType::RepsAndWeight, &input).unwrap();
        assert_eq!(reps.duration(), None);
    }
}
