//! Tool catalogue and typed tool calls.

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use thiserror::Error;

/// Errors raised while decoding a `tools/call` request.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ToolCallError {
    /// No tool has this name.
    #[error("unknown tool: {0}")]
    UnknownTool(String),

    /// The arguments do not match the tool's input schema.
    #[error("invalid arguments for {tool}: {message}")]
    InvalidArguments {
        /// Tool name.
        tool: String,
        /// Decoder message.
        message: String,
    },
}

const fn default_true() -> bool {
    true
}

/// Arguments of `create_task`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreateTaskArgs {
    /// Task title.
    pub title: String,
    /// Task description.
    pub description: String,
    /// Dependency references.
    #[serde(default)]
    pub dependencies: Vec<String>,
    /// Whether to create a board card.
    #[serde(default = "default_true", alias = "create_trello_card")]
    pub create_board_card: bool,
}

/// Arguments of `assign_task`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AssignTaskArgs {
    /// Task reference.
    pub task_id: String,
    /// Role name.
    pub role: String,
}

/// Arguments of `complete_task`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CompleteTaskArgs {
    /// Task reference.
    pub task_id: String,
    /// Free-text completion notes.
    #[serde(default)]
    pub completion_notes: Option<String>,
}

/// Arguments of `switch_role`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SwitchRoleArgs {
    /// Role name.
    pub role: String,
    /// Optional reason.
    #[serde(default)]
    pub reason: Option<String>,
}

/// Arguments of `return_to_orchestrator`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ReturnArgs {
    /// Optional reason.
    #[serde(default)]
    pub reason: Option<String>,
}

/// Arguments of `list_tasks`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ListTasksArgs {
    /// Optional status filter.
    #[serde(default)]
    pub status: Option<String>,
}

/// A decoded tool invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolCall {
    /// `create_task`
    CreateTask(CreateTaskArgs),
    /// `assign_task`
    AssignTask(AssignTaskArgs),
    /// `complete_task`
    CompleteTask(CompleteTaskArgs),
    /// `switch_role`
    SwitchRole(SwitchRoleArgs),
    /// `return_to_orchestrator`
    ReturnToOrchestrator(ReturnArgs),
    /// `get_status`
    GetStatus,
    /// `list_tasks`
    ListTasks(ListTasksArgs),
    /// `export_tasks`
    ExportTasks,
    /// `show_role_permissions`
    ShowRolePermissions,
    /// `list_roles`
    ListRoles,
    /// `sync_board`
    SyncBoard,
}

fn decode<T: DeserializeOwned>(tool: &str, arguments: Value) -> Result<T, ToolCallError> {
    let object = if arguments.is_null() {
        json!({})
    } else {
        arguments
    };
    serde_json::from_value(object).map_err(|err| ToolCallError::InvalidArguments {
        tool: tool.to_owned(),
        message: err.to_string(),
    })
}

impl ToolCall {
    /// Decodes a tool call from its name and JSON arguments.
    ///
    /// Missing arguments are treated as an empty object.
    ///
    /// # Errors
    ///
    /// Returns [`ToolCallError`] for unknown tools or mismatched arguments.
    pub fn parse(name: &str, arguments: Value) -> Result<Self, ToolCallError> {
        Ok(match name {
            "create_task" => Self::CreateTask(decode(name, arguments)?),
            "assign_task" => Self::AssignTask(decode(name, arguments)?),
            "complete_task" => Self::CompleteTask(decode(name, arguments)?),
            "switch_role" => Self::SwitchRole(decode(name, arguments)?),
            "return_to_orchestrator" => Self::ReturnToOrchestrator(decode(name, arguments)?),
            "get_status" => Self::GetStatus,
            "list_tasks" => Self::ListTasks(decode(name, arguments)?),
            "export_tasks" => Self::ExportTasks,
            "show_role_permissions" => Self::ShowRolePermissions,
            "list_roles" => Self::ListRoles,
            "sync_board" => Self::SyncBoard,
            other => return Err(ToolCallError::UnknownTool(other.to_owned())),
        })
    }

    /// Returns the tool name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::CreateTask(_) => "create_task",
            Self::AssignTask(_) => "assign_task",
            Self::CompleteTask(_) => "complete_task",
            Self::SwitchRole(_) => "switch_role",
            Self::ReturnToOrchestrator(_) => "return_to_orchestrator",
            Self::GetStatus => "get_status",
            Self::ListTasks(_) => "list_tasks",
            Self::ExportTasks => "export_tasks",
            Self::ShowRolePermissions => "show_role_permissions",
            Self::ListRoles => "list_roles",
            Self::SyncBoard => "sync_board",
        }
    }

    /// Returns `true` when a successful call changes the task resources.
    #[must_use]
    pub const fn changes_resources(&self) -> bool {
        matches!(
            self,
            Self::CreateTask(_) | Self::AssignTask(_) | Self::CompleteTask(_) | Self::SyncBoard
        )
    }
}

fn no_arguments() -> Value {
    json!({ "type": "object", "properties": {} })
}

/// Returns the `tools/list` catalogue.
#[must_use]
pub fn catalog() -> Value {
    let role_names = json!(["architect", "coder", "analyst", "devops"]);
    json!([
        {
            "name": "create_task",
            "description": "Create a new task (orchestrator, architect, or analyst)",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "title": { "type": "string", "description": "Task title" },
                    "description": { "type": "string", "description": "Task description" },
                    "dependencies": {
                        "type": "array",
                        "items": { "type": "string" },
                        "description": "Identifiers of tasks that must be done first"
                    },
                    "create_board_card": {
                        "type": "boolean",
                        "description": "Mirror the task to the board",
                        "default": true
                    }
                },
                "required": ["title", "description"]
            }
        },
        {
            "name": "assign_task",
            "description": "Delegate a task to a specialist role",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "task_id": { "type": "string", "description": "Task identifier, e.g. TASK-001" },
                    "role": { "type": "string", "enum": role_names.clone() }
                },
                "required": ["task_id", "role"]
            }
        },
        {
            "name": "complete_task",
            "description": "Complete a task as its assigned role and return control to the orchestrator",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "task_id": { "type": "string" },
                    "completion_notes": { "type": "string" }
                },
                "required": ["task_id"]
            }
        },
        {
            "name": "switch_role",
            "description": "Hand control from the orchestrator to a specialist role",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "role": { "type": "string", "enum": role_names },
                    "reason": { "type": "string" }
                },
                "required": ["role"]
            }
        },
        {
            "name": "return_to_orchestrator",
            "description": "Return control to the orchestrator",
            "inputSchema": {
                "type": "object",
                "properties": { "reason": { "type": "string" } }
            }
        },
        {
            "name": "get_status",
            "description": "Show the active role, task counts, and recent transitions",
            "inputSchema": no_arguments()
        },
        {
            "name": "list_tasks",
            "description": "List tasks, optionally filtered by status",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "status": {
                        "type": "string",
                        "enum": ["TODO", "IN_PROGRESS", "REVIEW", "DONE", "BLOCKED"]
                    }
                }
            }
        },
        {
            "name": "export_tasks",
            "description": "Write tasks and transitions to the snapshot files",
            "inputSchema": no_arguments()
        },
        {
            "name": "show_role_permissions",
            "description": "Show the permissions of the active role",
            "inputSchema": no_arguments()
        },
        {
            "name": "list_roles",
            "description": "List every role with its description and permissions",
            "inputSchema": no_arguments()
        },
        {
            "name": "sync_board",
            "description": "Create missing board cards and refresh existing ones",
            "inputSchema": no_arguments()
        }
    ])
}
