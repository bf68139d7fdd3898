//! CSV rollup of the session journal.
//!
//! Each journaled session exercise becomes one CSV row. After the CSV is
//! synced to disk the journal is renamed to `.processed`, never deleted, so
//! it can be recovered by hand.

use crate::journal::read_journal;
use crate::records::{MetricColumns, WorkoutSessionRecord};
use crate::Result;
use std::fs::OpenOptions;
use std::path::Path;

/// A row in the CSV output
#[derive(Debug, serde::Serialize)]
struct CsvRow {
    session_id: String,
    client_id: String,
    plan_id: String,
    plan_name: String,
    status: String,
    started_at: String,
    finished_at: Option<String>,
    order: u32,
    exercise_id: String,
    exercise_name: String,
    exercise_type: String,
    target_sets: u32,
    target_reps: Option<u32>,
    target_weight: Option<f64>,
    target_duration_seconds: Option<u32>,
    actual_sets: Option<u32>,
    actual_reps: Option<u32>,
    actual_weight: Option<f64>,
    actual_duration_seconds: Option<u32>,
    weight_unit: Option<String>,
    exercise_completed_at: Option<String>,
}

fn rows_for(session: &WorkoutSessionRecord) -> impl Iterator<Item = CsvRow> + '_ {
    session.exercises.iter().map(move |e| {
        let actual = e.actual.as_ref();
        let unit = actual
            .and_then(|a| a.weight_unit)
            .or(e.target.weight_unit)
            .map(|u| u.to_string());

        CsvRow {
            session_id: session.id.to_string(),
            client_id: session.client_id.to_string(),
            plan_id: session.plan_id.to_string(),
            plan_name: session.plan_name.clone(),
            status: session.status.to_string(),
            started_at: session.started_at.to_rfc3339(),
            finished_at: session.completed_at.map(|t| t.to_rfc3339()),
            order: e.order,
            exercise_id: e.exercise_id.to_string(),
            exercise_name: e.exercise_name.clone(),
            exercise_type: e.exercise_type.to_string(),
            target_sets: e.target.sets,
            target_reps: e.target.reps,
            target_weight: e.target.weight_value,
            target_duration_seconds: e.target.duration_seconds,
            actual_sets: actual.map(|a: &MetricColumns| a.sets),
            actual_reps: actual.and_then(|a| a.reps),
            actual_weight: actual.and_then(|a| a.weight_value),
            actual_duration_seconds: actual.and_then(|a| a.duration_seconds),
            weight_unit: unit,
            exercise_completed_at: e.completed_at.map(|t| t.to_rfc3339()),
        }
    })
}

/// Roll up journaled sessions into CSV and archive the journal
///
/// Returns the number of sessions processed.
pub fn journal_to_csv_and_archive(journal_path: &Path, csv_path: &Path) -> Result<usize> {
    let sessions = read_journal(journal_path)?;

    if sessions.is_empty() {
        tracing::info!("No sessions in journal to roll up");
        return Ok(0);
    }

    if let Some(parent) = csv_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(csv_path)?;

    // Only a fresh file gets a header row
    let needs_headers = file.metadata()?.len() == 0;
    let mut writer = csv::WriterBuilder::new()
        .has_headers(needs_headers)
        .from_writer(file);

    let mut rows = 0;
    for session in &sessions {
        for row in rows_for(session) {
            writer.serialize(row)?;
            rows += 1;
        }
    }

    writer.flush()?;
    let file = writer
        .into_inner()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;
    file.sync_all()?;

    tracing::info!("Wrote {} rows for {} sessions to CSV", rows, sessions.len());

    let processed_path = journal_path.with_extension("jsonl.processed");
    std::fs::rename(journal_path, &processed_path)?;
    tracing::info!("Archived journal to {:?}", processed_path);

    Ok(sessions.len())
}

/// Remove all `.processed` journal files in the given directory
pub fn cleanup_processed_journals(dir: &Path) -> Result<usize> {
    if !dir.exists() {
        return Ok(0);
    }

    let mut count = 0;
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();

        if path.extension().is_some_and(|ext| ext == "processed") {
            std::fs::remove_file(&path)?;
            tracing::debug!("Removed processed journal: {:?}", path);
            count += 1;
        }
    }

    if count > 0 {
        tracing::info!("Cleaned up {} processed journal files", count);
    }

    Ok(count)
}
