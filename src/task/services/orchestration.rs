//! Role-gated orchestration engine.

use super::reports::{
    CardOutcome, CreatedTask, ExportSummary, RoleProfile, StatusReport, SyncReport,
};
use crate::task::{
    domain::{
        NewTask, Permission, Role, RoleTransition, Task, TaskComment, TaskDomainError, TaskId,
        TaskStatus, TaskStore, TaskStoreError, TransitionLog,
    },
    ports::{BoardMirror, BoardMirrorMode, SnapshotError, SnapshotStore},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Number of transitions included in a [`StatusReport`].
pub const RECENT_TRANSITIONS: usize = 5;

/// Request payload for creating a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTaskRequest {
    title: String,
    description: String,
    dependencies: Vec<String>,
    wants_board_card: bool,
}

impl CreateTaskRequest {
    /// Creates a request with required fields. A board card is requested by
    /// default.
    #[must_use]
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            dependencies: Vec::new(),
            wants_board_card: true,
        }
    }

    /// Sets dependency references.
    #[must_use]
    pub fn with_dependencies(mut self, dependencies: impl IntoIterator<Item = String>) -> Self {
        self.dependencies = dependencies.into_iter().collect();
        self
    }

    /// Sets whether a board card should be created.
    #[must_use]
    pub const fn with_board_card(mut self, wants_board_card: bool) -> Self {
        self.wants_board_card = wants_board_card;
        self
    }
}

/// Coarse classification of [`OrchestrationError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrchestrationErrorKind {
    /// The active role may not perform the action.
    PermissionDenied,
    /// The referenced task does not exist.
    NotFound,
    /// Malformed input, unknown enum value, or empty required field.
    InvalidArgument,
    /// Assignment refused pending an unfinished dependency.
    DependencyBlocked,
    /// The action is not valid in the current role state.
    InvalidState,
    /// Durable storage failed during an explicit export.
    Storage,
}

/// Service-level errors for orchestration actions.
#[derive(Debug, Clone, Error)]
pub enum OrchestrationError {
    /// The active role lacks a required permission.
    #[error("role {role} lacks the {permission} permission")]
    PermissionDenied {
        /// Active role.
        role: Role,
        /// Missing permission.
        permission: Permission,
    },

    /// Only the assigned role may complete a task.
    #[error("only the assigned role ({}) can complete task {task_id}, active role is {active}", assigned_label(*.assigned))]
    NotAssignee {
        /// Task being completed.
        task_id: TaskId,
        /// Role the task is assigned to.
        assigned: Option<Role>,
        /// Active role.
        active: Role,
    },

    /// Role switches start from the orchestrator.
    #[error("only the orchestrator can switch roles, active role is {active}")]
    SwitchRequiresOrchestrator {
        /// Active role.
        active: Role,
    },

    /// No task matches the reference.
    #[error("task {0} not found")]
    TaskNotFound(String),

    /// Input failed domain validation.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),

    /// A dependency is not done yet.
    #[error("task {task_id} is blocked by dependency {dependency}")]
    DependencyBlocked {
        /// Task being assigned.
        task_id: TaskId,
        /// First unfinished dependency.
        dependency: TaskId,
    },

    /// Control is already with the orchestrator.
    #[error("already in the orchestrator role")]
    AlreadyOrchestrator,

    /// Task store operation failed.
    #[error(transparent)]
    Store(#[from] TaskStoreError),

    /// Explicit export failed.
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
}

fn assigned_label(role: Option<Role>) -> &'static str {
    role.map_or("unassigned", Role::as_str)
}

impl OrchestrationError {
    /// Classifies the error.
    #[must_use]
    pub const fn kind(&self) -> OrchestrationErrorKind {
        match self {
            Self::PermissionDenied { .. }
            | Self::NotAssignee { .. }
            | Self::SwitchRequiresOrchestrator { .. } => OrchestrationErrorKind::PermissionDenied,
            Self::TaskNotFound(_) | Self::Store(TaskStoreError::NotFound(_)) => {
                OrchestrationErrorKind::NotFound
            }
            Self::Domain(_) => OrchestrationErrorKind::InvalidArgument,
            Self::DependencyBlocked { .. } => OrchestrationErrorKind::DependencyBlocked,
            Self::AlreadyOrchestrator | Self::Store(TaskStoreError::SequenceExhausted) => {
                OrchestrationErrorKind::InvalidState
            }
            Self::Snapshot(_) => OrchestrationErrorKind::Storage,
        }
    }
}

/// Result type for orchestration actions.
pub type OrchestrationResult<T> = Result<T, OrchestrationError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SnapshotScope {
    Tasks,
    Transitions,
    All,
}

impl SnapshotScope {
    const fn includes_tasks(self) -> bool {
        matches!(self, Self::Tasks | Self::All)
    }

    const fn includes_transitions(self) -> bool {
        matches!(self, Self::Transitions | Self::All)
    }
}

#[derive(Debug)]
struct EngineState {
    active_role: Role,
    tasks: TaskStore,
    transitions: TransitionLog,
}

fn require(role: Role, permission: Permission) -> OrchestrationResult<()> {
    if role.has_permission(permission) {
        Ok(())
    } else {
        Err(OrchestrationError::PermissionDenied { role, permission })
    }
}

fn reason_or(reason: Option<&str>, fallback: impl FnOnce() -> String) -> String {
    reason
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map_or_else(fallback, str::to_owned)
}

/// Task and role orchestration engine.
///
/// The active role, task store, and transition log share one async mutex.
/// Every action holds it for its whole duration, board and snapshot I/O
/// included, so actions are serialised even when the transport accepts
/// requests concurrently. Board and snapshot failures after a mutation are
/// logged and never fail the action.
pub struct OrchestrationService<S, C>
where
    S: SnapshotStore,
    C: Clock + Send + Sync,
{
    state: Mutex<EngineState>,
    snapshots: Arc<S>,
    board: Arc<dyn BoardMirror>,
    clock: Arc<C>,
}

impl<S, C> OrchestrationService<S, C>
where
    S: SnapshotStore,
    C: Clock + Send + Sync,
{
    /// Creates an engine with an empty store, ignoring any snapshot.
    #[must_use]
    pub fn new(snapshots: Arc<S>, board: Arc<dyn BoardMirror>, clock: Arc<C>) -> Self {
        Self::with_state(snapshots, board, clock, TaskStore::new(), TransitionLog::new())
    }

    /// Creates an engine from the durable snapshot.
    ///
    /// Unreadable snapshots are logged and treated as empty.
    pub async fn load(snapshots: Arc<S>, board: Arc<dyn BoardMirror>, clock: Arc<C>) -> Self {
        let tasks = match snapshots.load_tasks().await {
            Ok(persisted) => TaskStore::from_tasks(persisted),
            Err(err) => {
                warn!(error = %err, "could not load task snapshot, starting empty");
                TaskStore::new()
            }
        };
        let transitions = match snapshots.load_transitions().await {
            Ok(entries) => TransitionLog::from_entries(entries),
            Err(err) => {
                warn!(error = %err, "could not load transition snapshot, starting empty");
                TransitionLog::new()
            }
        };
        info!(
            tasks = tasks.len(),
            transitions = transitions.len(),
            board_mode = %board.mode(),
            "orchestration engine loaded"
        );
        Self::with_state(snapshots, board, clock, tasks, transitions)
    }

    fn with_state(
        snapshots: Arc<S>,
        board: Arc<dyn BoardMirror>,
        clock: Arc<C>,
        tasks: TaskStore,
        transitions: TransitionLog,
    ) -> Self {
        Self {
            state: Mutex::new(EngineState {
                active_role: Role::Orchestrator,
                tasks,
                transitions,
            }),
            snapshots,
            board,
            clock,
        }
    }

    /// Returns how the board mirror is connected.
    #[must_use]
    pub fn board_mode(&self) -> BoardMirrorMode {
        self.board.mode()
    }

    /// Returns the active role.
    pub async fn current_role(&self) -> Role {
        self.state.lock().await.active_role
    }

    /// Creates a task owned by the active role.
    ///
    /// # Errors
    ///
    /// Returns [`OrchestrationError::PermissionDenied`] without
    /// `CreateTask`, or [`OrchestrationError::Domain`] when the title or
    /// description is empty.
    pub async fn create_task(&self, request: CreateTaskRequest) -> OrchestrationResult<CreatedTask> {
        let mut guard = self.state.lock().await;
        let state = &mut *guard;
        require(state.active_role, Permission::CreateTask)?;

        let new_task = NewTask::new(request.title, request.description, state.active_role)?
            .with_dependencies(request.dependencies);
        let mut task = state.tasks.create_task(new_task, &*self.clock)?;
        let task_id = task.id();

        let mut card = CardOutcome::SavedLocally;
        if request.wants_board_card && self.board.mode().is_enabled() {
            match self.board.create_card(&task).await {
                Ok(Some(card_id)) => {
                    let linked = card_id.clone();
                    task = state
                        .tasks
                        .update(&task_id, &*self.clock, |stored| stored.link_board_card(linked))?
                        .clone();
                    card = CardOutcome::Linked(card_id);
                }
                Ok(None) => debug!(task_id = %task_id, "board returned no card, saved locally"),
                Err(err) => warn!(
                    task_id = %task_id,
                    error = %err,
                    "board card creation failed, saved locally"
                ),
            }
        }

        self.persist(state, SnapshotScope::Tasks).await;
        info!(task_id = %task_id, created_by = %state.active_role, "task created");
        Ok(CreatedTask { task, card })
    }

    /// Delegates a task to a specialist role.
    ///
    /// The active role is unchanged; the hand-off is recorded in the
    /// transition log.
    ///
    /// # Errors
    ///
    /// Returns [`OrchestrationError::PermissionDenied`] without
    /// `AssignTask`, [`OrchestrationError::TaskNotFound`] for an unknown
    /// task, [`OrchestrationError::Domain`] for an unknown role or the
    /// orchestrator, and [`OrchestrationError::DependencyBlocked`] naming the
    /// first unfinished dependency.
    pub async fn assign_task(&self, task_ref: &str, role_name: &str) -> OrchestrationResult<Task> {
        let mut guard = self.state.lock().await;
        let state = &mut *guard;
        let active = state.active_role;
        require(active, Permission::AssignTask)?;

        let current = state
            .tasks
            .find(task_ref)
            .ok_or_else(|| OrchestrationError::TaskNotFound(task_ref.trim().to_owned()))?;
        let task_id = current.id();
        let role = Role::try_from(role_name).map_err(TaskDomainError::from)?;
        if role.is_orchestrator() {
            return Err(TaskDomainError::OrchestratorNotAssignable.into());
        }
        if let Some(dependency) = state.tasks.first_blocking_dependency(current) {
            return Err(OrchestrationError::DependencyBlocked {
                task_id,
                dependency,
            });
        }

        let task = state
            .tasks
            .update(&task_id, &*self.clock, |stored| stored.assign(role))?
            .clone();
        state.transitions.append(
            RoleTransition::new(
                active,
                role,
                format!("Task {task_id} assigned to {role}"),
                &*self.clock,
            )
            .for_task(task_id),
        );

        self.mirror_update(&task).await;
        self.persist(state, SnapshotScope::All).await;
        info!(task_id = %task_id, role = %role, "task assigned");
        Ok(task)
    }

    /// Completes a task as its assignee and returns control to the
    /// orchestrator.
    ///
    /// # Errors
    ///
    /// Returns [`OrchestrationError::TaskNotFound`] for an unknown task and
    /// [`OrchestrationError::NotAssignee`] unless the active role is the
    /// task's assignee.
    pub async fn complete_task(
        &self,
        task_ref: &str,
        notes: Option<&str>,
    ) -> OrchestrationResult<Task> {
        let mut guard = self.state.lock().await;
        let state = &mut *guard;
        let active = state.active_role;

        let current = state
            .tasks
            .find(task_ref)
            .ok_or_else(|| OrchestrationError::TaskNotFound(task_ref.trim().to_owned()))?;
        let task_id = current.id();
        if current.assigned_role() != Some(active) {
            return Err(OrchestrationError::NotAssignee {
                task_id,
                assigned: current.assigned_role(),
                active,
            });
        }
        require(active, Permission::CompleteTask)?;

        let comment = TaskComment::new(
            active,
            format!("Task completed: {}", notes.unwrap_or_default()),
            &*self.clock,
        );
        let task = state
            .tasks
            .update(&task_id, &*self.clock, |stored| stored.complete(comment))?
            .clone();
        state.transitions.append(
            RoleTransition::new(
                active,
                Role::Orchestrator,
                format!("Task {task_id} completed by {active}"),
                &*self.clock,
            )
            .for_task(task_id),
        );
        state.active_role = Role::Orchestrator;

        self.mirror_update(&task).await;
        self.persist(state, SnapshotScope::All).await;
        info!(
            task_id = %task_id,
            completed_by = %active,
            "task completed, control returned to orchestrator"
        );
        Ok(task)
    }

    /// Hands control from the orchestrator to a specialist role.
    ///
    /// # Errors
    ///
    /// Returns [`OrchestrationError::SwitchRequiresOrchestrator`] or
    /// [`OrchestrationError::PermissionDenied`] when the active role may not
    /// switch, and [`OrchestrationError::Domain`] for an unknown role or the
    /// orchestrator.
    pub async fn switch_role(
        &self,
        role_name: &str,
        reason: Option<&str>,
    ) -> OrchestrationResult<RoleTransition> {
        let mut guard = self.state.lock().await;
        let state = &mut *guard;
        let active = state.active_role;
        if !active.is_orchestrator() {
            return Err(OrchestrationError::SwitchRequiresOrchestrator { active });
        }
        require(active, Permission::SwitchRole)?;

        let role = Role::try_from(role_name).map_err(TaskDomainError::from)?;
        if role.is_orchestrator() {
            return Err(TaskDomainError::CannotSwitchToOrchestrator.into());
        }

        let transition = RoleTransition::new(
            active,
            role,
            reason_or(reason, || format!("Switching to {role} role")),
            &*self.clock,
        );
        state.transitions.append(transition.clone());
        state.active_role = role;

        self.persist(state, SnapshotScope::Transitions).await;
        info!(from = %active, to = %role, "role switched");
        Ok(transition)
    }

    /// Returns control to the orchestrator without completing a task.
    ///
    /// # Errors
    ///
    /// Returns [`OrchestrationError::AlreadyOrchestrator`] when the
    /// orchestrator is already active.
    pub async fn return_to_orchestrator(
        &self,
        reason: Option<&str>,
    ) -> OrchestrationResult<RoleTransition> {
        let mut guard = self.state.lock().await;
        let state = &mut *guard;
        let active = state.active_role;
        if active.is_orchestrator() {
            return Err(OrchestrationError::AlreadyOrchestrator);
        }

        let transition = RoleTransition::new(
            active,
            Role::Orchestrator,
            reason_or(reason, || "Returning control to Orchestrator".to_owned()),
            &*self.clock,
        );
        state.transitions.append(transition.clone());
        state.active_role = Role::Orchestrator;

        self.persist(state, SnapshotScope::Transitions).await;
        info!(from = %active, "control returned to orchestrator");
        Ok(transition)
    }

    /// Summarises the engine's state.
    pub async fn status(&self) -> StatusReport {
        let state = self.state.lock().await;
        StatusReport {
            active_role: state.active_role,
            permissions: state.active_role.permissions(),
            total_tasks: state.tasks.len(),
            counts_by_status: TaskStatus::ALL
                .into_iter()
                .map(|status| (status, state.tasks.count_with_status(status)))
                .collect(),
            recent_transitions: state.transitions.recent(RECENT_TRANSITIONS).to_vec(),
            board_mode: self.board.mode(),
            snapshot_present: self.snapshots.is_present().await,
        }
    }

    /// Lists tasks in allocation order, optionally filtered by status name.
    ///
    /// A blank filter lists every task.
    ///
    /// # Errors
    ///
    /// Returns [`OrchestrationError::Domain`] for an unknown status name.
    pub async fn list_tasks(&self, status_filter: Option<&str>) -> OrchestrationResult<Vec<Task>> {
        let status = status_filter
            .filter(|raw| !raw.trim().is_empty())
            .map(TaskStatus::try_from)
            .transpose()
            .map_err(TaskDomainError::from)?;
        let state = self.state.lock().await;
        Ok(state.tasks.list(status).into_iter().cloned().collect())
    }

    /// Reads a single task.
    ///
    /// # Errors
    ///
    /// Returns [`OrchestrationError::TaskNotFound`] for an unknown task.
    pub async fn get_task(&self, task_ref: &str) -> OrchestrationResult<Task> {
        let state = self.state.lock().await;
        state
            .tasks
            .find(task_ref)
            .cloned()
            .ok_or_else(|| OrchestrationError::TaskNotFound(task_ref.trim().to_owned()))
    }

    /// Writes both snapshots unconditionally.
    ///
    /// # Errors
    ///
    /// Returns [`OrchestrationError::Snapshot`] when either write fails.
    pub async fn export_snapshot(&self) -> OrchestrationResult<ExportSummary> {
        let state = self.state.lock().await;
        self.snapshots.save_tasks(&state.tasks).await?;
        self.snapshots.save_transitions(&state.transitions).await?;
        let summary = ExportSummary {
            tasks: state.tasks.len(),
            transitions: state.transitions.len(),
        };
        info!(tasks = summary.tasks, transitions = summary.transitions, "snapshot exported");
        Ok(summary)
    }

    /// Describes the active role.
    pub async fn role_permissions(&self) -> RoleProfile {
        RoleProfile::of(self.current_role().await)
    }

    /// Describes every role.
    #[must_use]
    #[expect(
        clippy::unused_self,
        reason = "kept on the engine so every action shares one entry point"
    )]
    pub fn list_roles(&self) -> Vec<RoleProfile> {
        Role::ALL.into_iter().map(RoleProfile::of).collect()
    }

    /// Pushes every task to the board mirror.
    ///
    /// Tasks without a card get one; tasks with a card have it refreshed.
    /// Individual failures are logged and skipped. A disabled mirror reports
    /// zero.
    pub async fn sync_board_mirror(&self) -> SyncReport {
        let mut report = SyncReport::default();
        if !self.board.mode().is_enabled() {
            return report;
        }

        let mut guard = self.state.lock().await;
        let state = &mut *guard;
        for task_id in state.tasks.ids() {
            let Some(task) = state.tasks.get(&task_id).cloned() else {
                continue;
            };
            if task.board_card_id().is_some() {
                match self.board.update_card(&task).await {
                    Ok(()) => report.updated += 1,
                    Err(err) => {
                        warn!(task_id = %task_id, error = %err, "board card refresh failed");
                    }
                }
                continue;
            }
            match self.board.create_card(&task).await {
                Ok(Some(card_id)) => {
                    if state
                        .tasks
                        .update(&task_id, &*self.clock, |stored| stored.link_board_card(card_id))
                        .is_ok()
                    {
                        report.synced += 1;
                    }
                }
                Ok(None) => debug!(task_id = %task_id, "board returned no card"),
                Err(err) => {
                    warn!(task_id = %task_id, error = %err, "board card creation failed");
                }
            }
        }

        self.persist(state, SnapshotScope::Tasks).await;
        info!(
            synced = report.synced,
            updated = report.updated,
            mode = %self.board.mode(),
            "board mirror synchronised"
        );
        report
    }

    async fn mirror_update(&self, task: &Task) {
        if !self.board.mode().is_enabled() {
            return;
        }
        if let Err(err) = self.board.update_card(task).await {
            warn!(task_id = %task.id(), error = %err, "board card update failed");
        }
    }

    async fn persist(&self, state: &EngineState, scope: SnapshotScope) {
        if scope.includes_tasks()
            && let Err(err) = self.snapshots.save_tasks(&state.tasks).await
        {
            warn!(error = %err, "task snapshot write failed");
        }
        if scope.includes_transitions()
            && let Err(err) = self.snapshots.save_transitions(&state.transitions).await
        {
            warn!(error = %err, "transition snapshot write failed");
        }
    }
}
