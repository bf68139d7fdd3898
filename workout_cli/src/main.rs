use chrono::{DateTime, Local, Utc};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use workout_core::config::{csv_path, journal_path, store_path};
use workout_core::*;

#[derive(Parser)]
#[command(name = "wkt")]
#[command(about = "Workout plans and tracked training sessions", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage the exercise catalog
    #[command(subcommand)]
    Exercise(ExerciseCommand),

    /// Build and edit workout plans
    #[command(subcommand)]
    Plan(PlanCommand),

    /// Run workout sessions
    #[command(subcommand)]
    Session(SessionCommand),

    /// Roll up the finished-session journal to CSV
    Rollup {
        /// Clean up processed journal files after rollup
        #[arg(long)]
        cleanup: bool,
    },
}

#[derive(Subcommand)]
enum ExerciseCommand {
    /// Define a new exercise
    Create {
        #[arg(long)]
        name: String,

        /// reps-and-weight or time-based
        #[arg(long = "type")]
        exercise_type: ExerciseType,

        /// Muscle group tag (repeatable)
        #[arg(long = "muscle")]
        muscles: Vec<MuscleGroup>,

        #[arg(long)]
        description: Option<String>,
    },

    /// Replace an exercise's name, description and muscle groups
    Update {
        id: ExerciseId,

        #[arg(long)]
        name: String,

        #[arg(long = "muscle")]
        muscles: Vec<MuscleGroup>,

        #[arg(long)]
        description: Option<String>,
    },

    /// List all exercises
    List,

    /// Add the built-in starter exercises
    Seed,
}

#[derive(Subcommand)]
enum PlanCommand {
    /// Create an empty plan
    Create {
        #[arg(long)]
        name: String,

        #[arg(long)]
        trainer: TrainerId,

        #[arg(long)]
        description: Option<String>,
    },

    /// Rename a plan and replace its description
    Rename {
        plan: PlanId,

        #[arg(long)]
        name: String,

        #[arg(long)]
        description: Option<String>,
    },

    /// List all plans
    List,

    /// Show a plan's exercises in order
    Show { plan: PlanId },

    /// Append an exercise to a plan
    Add {
        plan: PlanId,
        exercise: ExerciseId,

        #[command(flatten)]
        metrics: MetricsArgs,
    },

    /// Change the targets of an exercise in a plan
    Update {
        plan: PlanId,
        exercise: ExerciseId,

        #[command(flatten)]
        metrics: MetricsArgs,
    },

    /// Remove an exercise from a plan
    Remove { plan: PlanId, exercise: ExerciseId },

    /// Set the order of a plan's exercises
    Reorder {
        plan: PlanId,

        /// Every exercise id of the plan, in the new order
        #[arg(required = true)]
        exercises: Vec<ExerciseId>,
    },
}

#[derive(Subcommand)]
enum SessionCommand {
    /// Start a session from a plan
    Start {
        plan: PlanId,

        #[arg(long)]
        client: ClientId,
    },

    /// Record what was actually done for one exercise
    Record {
        session: SessionId,
        exercise: ExerciseId,

        #[command(flatten)]
        metrics: MetricsArgs,
    },

    /// Finish a session
    Complete { session: SessionId },

    /// Stop a session without finishing it
    Abandon { session: SessionId },

    /// Show a session's progress
    Show { session: SessionId },

    /// List all sessions
    List,
}

#[derive(Args)]
struct MetricsArgs {
    #[arg(long)]
    sets: u32,

    #[arg(long)]
    reps: Option<u32>,

    /// Weight such as 60kg or 135lb (bare numbers use the configured unit)
    #[arg(long)]
    weight: Option<String>,

    /// Duration such as 45s, 2m or 1m30s
    #[arg(long)]
    duration: Option<Duration>,
}

impl MetricsArgs {
    fn to_input(&self, default_unit: WeightUnit) -> Result<MetricsInput> {
        let weight = self
            .weight
            .as_deref()
            .map(|w| Weight::parse_with_default(w, default_unit))
            .transpose()?;

        Ok(MetricsInput {
            sets: self.sets,
            reps: self.reps,
            weight,
            duration: self.duration,
        })
    }
}

fn main() -> ExitCode {
    workout_core::logging::init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::from(exit_code(&e))
        }
    }
}

/// Exit status by failure category
fn exit_code(error: &Error) -> u8 {
    match error.kind() {
        Some(ErrorKind::Validation) => 2,
        Some(ErrorKind::NotFound) => 3,
        Some(ErrorKind::Conflict) => 4,
        None => 1,
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::load()?;
    let data_dir = cli.data_dir.unwrap_or_else(|| config.data.data_dir.clone());

    match cli.command {
        Commands::Exercise(cmd) => cmd_exercise(&data_dir, cmd),
        Commands::Plan(cmd) => cmd_plan(&data_dir, cmd, &config),
        Commands::Session(cmd) => cmd_session(&data_dir, cmd, &config),
        Commands::Rollup { cleanup } => cmd_rollup(&data_dir, cleanup),
    }
}

fn cmd_exercise(data_dir: &Path, cmd: ExerciseCommand) -> Result<()> {
    let path = store_path(data_dir);

    match cmd {
        ExerciseCommand::Create {
            name,
            exercise_type,
            muscles,
            description,
        } => {
            let exercise = Store::update(&path, |store| {
                let exercise = store.catalog_mut().create(
                    name,
                    exercise_type,
                    muscles,
                    description,
                    &RandomIds,
                )?;
                Ok(exercise.clone())
            })?;
            tracing::info!("Created exercise {}", exercise.id());
            println!("✓ Created exercise {}", exercise.name());
            println!("  id: {}", exercise.id());
        }

        ExerciseCommand::Update {
            id,
            name,
            muscles,
            description,
        } => {
            let exercise = Store::update(&path, |store| {
                Ok(store
                    .catalog_mut()
                    .update(id, name, description, muscles)?
                    .clone())
            })?;
            println!("✓ Updated exercise {}", exercise.name());
            println!("  id: {}", exercise.id());
        }

        ExerciseCommand::List => {
            let store = Store::load(&path)?;
            if store.catalog().is_empty() {
                println!("No exercises yet. Try `wkt exercise seed`.");
            }
            for exercise in store.catalog().iter() {
                print_exercise(exercise);
            }
        }

        ExerciseCommand::Seed => {
            let added =
                Store::update(&path, |store| Ok(store.catalog_mut().seed_defaults(&RandomIds)?))?;
            println!("✓ Added {} starter exercises", added);
        }
    }

    Ok(())
}

fn cmd_plan(data_dir: &Path, cmd: PlanCommand, config: &Config) -> Result<()> {
    let path = store_path(data_dir);
    let unit = config.units.weight_unit;

    match cmd {
        PlanCommand::Create {
            name,
            trainer,
            description,
        } => {
            let plan = WorkoutPlan::create(name, trainer, description, &RandomIds)?;
            let id = Store::update(&path, |store| Ok(store.insert_plan(plan).id()))?;
            println!("✓ Created plan");
            println!("  id: {}", id);
        }

        PlanCommand::Rename {
            plan,
            name,
            description,
        } => {
            Store::update(&path, |store| {
                Ok(store.plan_mut(plan)?.update_details(name, description)?)
            })?;
            println!("✓ Updated plan {}", plan);
        }

        PlanCommand::List => {
            let store = Store::load(&path)?;
            for plan in store.plans() {
                println!(
                    "{}  {}  ({} exercises)",
                    plan.id(),
                    plan.name(),
                    plan.exercise_count()
                );
            }
        }

        PlanCommand::Show { plan } => {
            let store = Store::load(&path)?;
            print_plan(store.plan(plan)?);
        }

        PlanCommand::Add {
            plan,
            exercise,
            metrics,
        } => {
            let input = metrics.to_input(unit)?;
            let planned = Store::update(&path, |store| {
                let (catalog, plan) = store.catalog_and_plan_mut(plan)?;
                Ok(plan
                    .add_catalog_exercise(catalog, exercise, &input, &RandomIds)?
                    .clone())
            })?;
            println!(
                "✓ Added {} at position {}: {}",
                planned.exercise_name(),
                planned.order(),
                planned.target()
            );
        }

        PlanCommand::Update {
            plan,
            exercise,
            metrics,
        } => {
            let input = metrics.to_input(unit)?;
            let planned = Store::update(&path, |store| {
                Ok(store
                    .plan_mut(plan)?
                    .update_exercise(exercise, &input)?
                    .clone())
            })?;
            println!(
                "✓ Updated {}: {}",
                planned.exercise_name(),
                planned.target()
            );
        }

        PlanCommand::Remove { plan, exercise } => {
            let removed = Store::update(&path, |store| {
                Ok(store.plan_mut(plan)?.remove_exercise(exercise)?)
            })?;
            println!("✓ Removed {}", removed.exercise_name());
        }

        PlanCommand::Reorder { plan, exercises } => {
            let reordered = Store::update(&path, |store| {
                let plan = store.plan_mut(plan)?;
                plan.reorder_exercises(&exercises)?;
                Ok(plan.clone())
            })?;
            print_plan(&reordered);
        }
    }

    Ok(())
}

fn cmd_session(data_dir: &Path, cmd: SessionCommand, config: &Config) -> Result<()> {
    let path = store_path(data_dir);
    let clock = SystemClock;

    match cmd {
        SessionCommand::Start { plan, client } => {
            let session = Store::update(&path, |store| {
                let session =
                    WorkoutSession::start(client, store.plan(plan)?, &clock, &RandomIds);
                Ok(store.insert_session(session).clone())
            })?;
            println!(
                "✓ Started {} ({} exercises)",
                session.plan_name(),
                session.total_count()
            );
            println!("  id: {}", session.id());
        }

        SessionCommand::Record {
            session,
            exercise,
            metrics,
        } => {
            let input = metrics.to_input(config.units.weight_unit)?;
            let (recorded, done, total) = Store::update(&path, |store| {
                let session = store.session_mut(session)?;
                let recorded = session.complete_exercise(exercise, &input, &clock)?.clone();
                Ok((recorded, session.completed_count(), session.total_count()))
            })?;
            if let Some(actual) = recorded.actual() {
                println!("✓ Recorded {}: {}", recorded.exercise_name(), actual);
            }
            println!("  progress: {}/{}", done, total);
        }

        SessionCommand::Complete { session } => {
            let finished = Store::update(&path, |store| {
                let session = store.session_mut(session)?;
                session.complete(&clock)?;
                journal_finished(data_dir, session)?;
                Ok(session.clone())
            })?;
            println!(
                "✓ Session completed ({}/{} exercises recorded)",
                finished.completed_count(),
                finished.total_count()
            );
        }

        SessionCommand::Abandon { session } => {
            let finished = Store::update(&path, |store| {
                let session = store.session_mut(session)?;
                session.abandon(&clock)?;
                journal_finished(data_dir, session)?;
                Ok(session.clone())
            })?;
            println!("✓ Session abandoned");
        }

        SessionCommand::Show { session } => {
            let store = Store::load(&path)?;
            print_session(store.session(session)?);
        }

        SessionCommand::List => {
            let store = Store::load(&path)?;
            for session in store.sessions() {
                println!(
                    "{}  {}  {}  {}/{}",
                    session.id(),
                    session.plan_name(),
                    session.status(),
                    session.completed_count(),
                    session.total_count()
                );
            }
        }
    }

    Ok(())
}

/// Append a finished session to the journal
///
/// Called inside `Store::update` so a failed append leaves the stored
/// session in progress and the command can be retried.
fn journal_finished(data_dir: &Path, session: &WorkoutSession) -> Result<()> {
    let mut sink = JsonlSink::new(journal_path(data_dir));
    sink.append(session)
}

fn cmd_rollup(data_dir: &Path, cleanup: bool) -> Result<()> {
    let journal = journal_path(data_dir);
    let csv = csv_path(data_dir);

    if !journal.exists() {
        println!("No journal found - nothing to roll up.");
        return Ok(());
    }

    let count = workout_core::rollup::journal_to_csv_and_archive(&journal, &csv)?;

    println!("✓ Rolled up {} sessions to CSV", count);
    println!("  CSV: {}", csv.display());

    if cleanup {
        if let Some(dir) = journal.parent() {
            let cleaned = workout_core::rollup::cleanup_processed_journals(dir)?;
            if cleaned > 0 {
                println!("✓ Cleaned up {} processed journal files", cleaned);
            }
        }
    }

    Ok(())
}

fn local_time(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string()
}

fn print_exercise(exercise: &Exercise) {
    let muscles: Vec<_> = exercise
        .muscle_groups()
        .iter()
        .map(|m| m.as_str())
        .collect();
    println!(
        "{}  {}  [{}]  {}",
        exercise.id(),
        exercise.name(),
        exercise.exercise_type(),
        muscles.join(", ")
    );
    if let Some(description) = exercise.description() {
        println!("    {}", description);
    }
}

fn print_plan(plan: &WorkoutPlan) {
    println!("{}", plan.name());
    println!("  id: {}", plan.id());
    println!("  trainer: {}", plan.trainer_id());
    if let Some(description) = plan.description() {
        println!("  {}", description);
    }
    println!();
    for entry in plan.exercises() {
        println!(
            "  {}. {}  {}  ({})",
            entry.order(),
            entry.exercise_name(),
            entry.target(),
            entry.exercise_id()
        );
    }
}

fn print_session(session: &WorkoutSession) {
    println!("{}  [{}]", session.plan_name(), session.status());
    println!("  id: {}", session.id());
    println!("  client: {}", session.client_id());
    println!("  started: {}", local_time(session.started_at()));
    if let Some(finished) = session.completed_at() {
        println!("  finished: {}", local_time(finished));
    }
    println!(
        "  completed: {}/{}",
        session.completed_count(),
        session.total_count()
    );
    println!();
    for entry in session.exercises() {
        let actual = entry
            .actual()
            .map(|a| a.to_string())
            .unwrap_or_else(|| "not recorded".to_string());
        println!(
            "  {}. {}  target {}  actual {}  ({})",
            entry.order(),
            entry.exercise_name(),
            entry.target(),
            actual,
            entry.exercise_id()
        );
    }
}
