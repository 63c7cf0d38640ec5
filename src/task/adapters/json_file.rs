//! JSON file snapshot store rooted in a capability-scoped directory.

use async_trait::async_trait;
use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::{ErrorKind, Write};
use tracing::debug;

use crate::task::{
    domain::{RoleTransition, Task, TaskId, TaskStore, TransitionLog},
    ports::{SnapshotError, SnapshotResult, SnapshotStore},
};

/// Default task snapshot file name.
pub const DEFAULT_TASKS_FILE: &str = "tasks_backup.json";
/// Default transition snapshot file name.
pub const DEFAULT_TRANSITIONS_FILE: &str = "transitions_backup.json";

/// Snapshot store writing pretty-printed JSON files.
///
/// Tasks are stored as an object keyed by task identifier; transitions as an
/// array in chronological order. Every write goes to a temporary sibling file
/// that is synced and then renamed over the target, so a crash mid-write
/// leaves the previous snapshot intact.
#[derive(Debug)]
pub struct JsonFileSnapshotStore {
    dir: Dir,
    root: Utf8PathBuf,
    tasks_file: String,
    transitions_file: String,
}

impl JsonFileSnapshotStore {
    /// Opens `root`, creating it when missing, with the default file names.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError::Io`] when the directory cannot be created or
    /// opened.
    pub fn open(root: impl AsRef<Utf8Path>) -> SnapshotResult<Self> {
        let root_path = root.as_ref();
        Dir::create_ambient_dir_all(root_path, ambient_authority()).map_err(SnapshotError::io)?;
        let dir = Dir::open_ambient_dir(root_path, ambient_authority()).map_err(SnapshotError::io)?;
        Ok(Self {
            dir,
            root: root_path.to_owned(),
            tasks_file: DEFAULT_TASKS_FILE.to_owned(),
            transitions_file: DEFAULT_TRANSITIONS_FILE.to_owned(),
        })
    }

    /// Overrides the snapshot file names.
    #[must_use]
    pub fn with_file_names(
        mut self,
        tasks_file: impl Into<String>,
        transitions_file: impl Into<String>,
    ) -> Self {
        self.tasks_file = tasks_file.into();
        self.transitions_file = transitions_file.into();
        self
    }

    /// Returns the full path of the task snapshot.
    #[must_use]
    pub fn tasks_path(&self) -> Utf8PathBuf {
        self.root.join(&self.tasks_file)
    }

    /// Returns the full path of the transition snapshot.
    #[must_use]
    pub fn transitions_path(&self) -> Utf8PathBuf {
        self.root.join(&self.transitions_file)
    }

    fn read_optional(&self, file_name: &str) -> SnapshotResult<Option<String>> {
        match self.dir.read_to_string(file_name) {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(SnapshotError::io(err)),
        }
    }

    fn write_atomic(&self, file_name: &str, value: &impl Serialize) -> SnapshotResult<()> {
        let mut encoded = serde_json::to_vec_pretty(value).map_err(SnapshotError::format)?;
        encoded.push(b'\n');

        let temp_name = format!(".{file_name}.tmp");
        let mut file = self.dir.create(&temp_name).map_err(SnapshotError::io)?;
        file.write_all(&encoded).map_err(SnapshotError::io)?;
        file.sync_all().map_err(SnapshotError::io)?;
        drop(file);

        self.dir
            .rename(&temp_name, &self.dir, file_name)
            .map_err(SnapshotError::io)?;
        debug!(file = file_name, bytes = encoded.len(), "snapshot written");
        Ok(())
    }
}

#[async_trait]
impl SnapshotStore for JsonFileSnapshotStore {
    async fn load_tasks(&self) -> SnapshotResult<Vec<Task>> {
        let Some(contents) = self.read_optional(&self.tasks_file)? else {
            return Ok(Vec::new());
        };
        let keyed: BTreeMap<TaskId, Task> =
            serde_json::from_str(&contents).map_err(SnapshotError::format)?;
        Ok(keyed.into_values().collect())
    }

    async fn save_tasks(&self, tasks: &TaskStore) -> SnapshotResult<()> {
        let keyed: BTreeMap<TaskId, &Task> = tasks.iter().map(|task| (task.id(), task)).collect();
        self.write_atomic(&self.tasks_file, &keyed)
    }

    async fn load_transitions(&self) -> SnapshotResult<Vec<RoleTransition>> {
        let Some(contents) = self.read_optional(&self.transitions_file)? else {
            return Ok(Vec::new());
        };
        serde_json::from_str(&contents).map_err(SnapshotError::format)
    }

    async fn save_transitions(&self, log: &TransitionLog) -> SnapshotResult<()> {
        self.write_atomic(&self.transitions_file, &log.entries())
    }

    async fn is_present(&self) -> bool {
        self.dir.exists(&self.tasks_file)
    }
}
