//! Local file store for exercises, plans and sessions.
//!
//! All aggregates live in a single JSON document. Writes go through a temp
//! file and an atomic rename; `Store::update` holds an exclusive lock on a
//! sidecar `.lock` file for the whole load-modify-save cycle so two
//! processes never interleave their changes.

use crate::records::{ExerciseRecord, WorkoutPlanRecord, WorkoutSessionRecord};
use crate::{
    DomainError, Error, ExerciseCatalog, PlanId, Result, SessionId, WorkoutPlan, WorkoutSession,
};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

const STORE_FORMAT_VERSION: u32 = 1;

/// On-disk document
#[derive(Debug, Serialize, Deserialize)]
struct StoreFile {
    version: u32,
    #[serde(default)]
    exercises: Vec<ExerciseRecord>,
    #[serde(default)]
    plans: Vec<WorkoutPlanRecord>,
    #[serde(default)]
    sessions: Vec<WorkoutSessionRecord>,
}

/// In-memory view of everything in the store
#[derive(Clone, Debug, Default)]
pub struct Store {
    catalog: ExerciseCatalog,
    plans: Vec<WorkoutPlan>,
    sessions: Vec<WorkoutSession>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the store from a file with shared locking
    ///
    /// Returns an empty store if the file doesn't exist. Unlike missing
    /// files, unreadable or corrupt files are reported as errors.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::info!("No store file found at {:?}, starting empty", path);
            return Ok(Self::default());
        }

        let file = File::open(path)?;
        file.lock_shared()?;

        let mut contents = String::new();
        let read = std::io::BufReader::new(&file).read_to_string(&mut contents);
        file.unlock()?;
        read?;

        let doc: StoreFile = serde_json::from_str(&contents)
            .map_err(|e| Error::State(format!("failed to parse store {:?}: {}", path, e)))?;
        if doc.version > STORE_FORMAT_VERSION {
            return Err(Error::State(format!(
                "store {:?} has format version {}, newest supported is {}",
                path, doc.version, STORE_FORMAT_VERSION
            )));
        }

        let store = Self::from_file(doc)?;
        for problem in store.catalog.validate() {
            tracing::warn!("Catalog problem in {:?}: {}", path, problem);
        }

        tracing::debug!(
            "Loaded store from {:?}: {} exercises, {} plans, {} sessions",
            path,
            store.catalog.len(),
            store.plans.len(),
            store.sessions.len()
        );
        Ok(store)
    }

    /// Save the store to a file
    ///
    /// Atomically writes by:
    /// 1. Writing to a temp file in the same directory
    /// 2. Syncing to disk
    /// 3. Renaming over the original
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let temp = NamedTempFile::new_in(parent_dir(path))?;
        temp.as_file().lock_exclusive()?;

        {
            let mut writer = std::io::BufWriter::new(temp.as_file());
            let contents = serde_json::to_string_pretty(&self.to_file())?;
            writer.write_all(contents.as_bytes())?;
            writer.flush()?;
        }

        temp.as_file().sync_all()?;
        temp.as_file().unlock()?;
        temp.persist(path).map_err(|e| Error::Io(e.error))?;

        tracing::debug!("Saved store to {:?}", path);
        Ok(())
    }

    /// Load, modify and save the store while holding the store lock
    ///
    /// If `f` fails nothing is written.
    pub fn update<F, T>(path: &Path, f: F) -> Result<T>
    where
        F: FnOnce(&mut Store) -> Result<T>,
    {
        let _guard = StoreLock::acquire(path)?;
        let mut store = Self::load(path)?;
        let value = f(&mut store)?;
        store.save(path)?;
        Ok(value)
    }

    fn from_file(doc: StoreFile) -> Result<Self> {
        let catalog = ExerciseCatalog::from_exercises(
            doc.exercises
                .into_iter()
                .map(ExerciseRecord::into_exercise)
                .collect(),
        );
        let plans = doc
            .plans
            .into_iter()
            .map(WorkoutPlanRecord::into_plan)
            .collect::<Result<Vec<_>>>()?;
        let sessions = doc
            .sessions
            .into_iter()
            .map(WorkoutSessionRecord::into_session)
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            catalog,
            plans,
            sessions,
        })
    }

    fn to_file(&self) -> StoreFile {
        StoreFile {
            version: STORE_FORMAT_VERSION,
            exercises: self.catalog.iter().map(ExerciseRecord::from).collect(),
            plans: self.plans.iter().map(WorkoutPlanRecord::from).collect(),
            sessions: self.sessions.iter().map(WorkoutSessionRecord::from).collect(),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Aggregate access
    // ─────────────────────────────────────────────────────────────────────────

    pub fn catalog(&self) -> &ExerciseCatalog {
        &self.catalog
    }

    pub fn catalog_mut(&mut self) -> &mut ExerciseCatalog {
        &mut self.catalog
    }

    pub fn plans(&self) -> &[WorkoutPlan] {
        &self.plans
    }

    pub fn plan(&self, id: PlanId) -> Result<&WorkoutPlan> {
        self.plans
            .iter()
            .find(|p| p.id() == id)
            .ok_or_else(|| DomainError::PlanNotFound(id).into())
    }

    pub fn plan_mut(&mut self, id: PlanId) -> Result<&mut WorkoutPlan> {
        self.plans
            .iter_mut()
            .find(|p| p.id() == id)
            .ok_or_else(|| DomainError::PlanNotFound(id).into())
    }

    pub fn insert_plan(&mut self, plan: WorkoutPlan) -> &WorkoutPlan {
        self.plans.push(plan);
        &self.plans[self.plans.len() - 1]
    }

    /// Split borrow: the catalog for lookups alongside a mutable plan
    pub fn catalog_and_plan_mut(
        &mut self,
        id: PlanId,
    ) -> Result<(&ExerciseCatalog, &mut WorkoutPlan)> {
        let plan = self
            .plans
            .iter_mut()
            .find(|p| p.id() == id)
            .ok_or(DomainError::PlanNotFound(id))?;
        Ok((&self.catalog, plan))
    }

    pub fn sessions(&self) -> &[WorkoutSession] {
        &self.sessions
    }

    pub fn session(&self, id: SessionId) -> Result<&WorkoutSession> {
        self.sessions
            .iter()
            .find(|s| s.id() == id)
            .ok_or_else(|| DomainError::SessionNotFound(id).into())
    }

    pub fn session_mut(&mut self, id: SessionId) -> Result<&mut WorkoutSession> {
        self.sessions
            .iter_mut()
            .find(|s| s.id() == id)
            .ok_or_else(|| DomainError::SessionNotFound(id).into())
    }

    pub fn insert_session(&mut self, session: WorkoutSession) -> &WorkoutSession {
        self.sessions.push(session);
        &self.sessions[self.sessions.len() - 1]
    }
}

fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Exclusive lock on `<store>.lock`, released on drop
struct StoreLock {
    file: File,
}

impl StoreLock {
    fn acquire(store_path: &Path) -> Result<Self> {
        std::fs::create_dir_all(parent_dir(store_path))?;
        let lock_path = store_path.with_extension("lock");
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&lock_path)?;
        file.lock_exclusive()?;
        tracing::trace!("Acquired store lock {:?}", lock_path);
        Ok(Self { file })
    }
}

impl Drop for StoreLock {
    fn drop(&mut self) {
        if let Err(e) = self.file.unlock() {
            tracing::warn!("Failed to release store lock: {}", e);
        }
    }
}
