//! MCP request handling over the orchestration engine.

use super::render;
use super::tools::{ToolCall, catalog};
use crate::jsonrpc::{
    INTERNAL_ERROR, INVALID_PARAMS, INVALID_REQUEST, METHOD_NOT_FOUND, PARSE_ERROR, Request,
    Response, VERSION,
};
use crate::task::{
    ports::SnapshotStore,
    services::{CreateTaskRequest, OrchestrationError, OrchestrationService},
};
use mockable::Clock;
use serde::Serialize;
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Protocol revision announced when the client does not request one.
pub const PROTOCOL_VERSION: &str = "2024-11-05";

/// URI prefix of task resources.
pub const TASK_URI_PREFIX: &str = "task://internal/";

/// Notification emitted after a call that changes task resources.
pub const RESOURCES_CHANGED: &str = "notifications/resources/list_changed";

/// Result of a single tool call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolOutcome {
    /// Text shown to the caller.
    pub text: String,
    /// Whether the call failed.
    pub is_error: bool,
    /// Whether task resources changed.
    pub changed: bool,
}

impl ToolOutcome {
    fn into_result(self) -> Value {
        json!({
            "content": [{ "type": "text", "text": self.text }],
            "isError": self.is_error,
        })
    }
}

fn encode(message: &impl Serialize) -> Option<String> {
    match serde_json::to_string(message) {
        Ok(line) => Some(line),
        Err(err) => {
            error!(error = %err, "failed to encode outgoing message");
            None
        }
    }
}

async fn run_tool<S, C>(
    service: Arc<OrchestrationService<S, C>>,
    call: ToolCall,
) -> Result<String, OrchestrationError>
where
    S: SnapshotStore,
    C: Clock + Send + Sync,
{
    Ok(match call {
        ToolCall::CreateTask(args) => {
            let request = CreateTaskRequest::new(args.title, args.description)
                .with_dependencies(args.dependencies)
                .with_board_card(args.create_board_card);
            render::created(&service.create_task(request).await?)
        }
        ToolCall::AssignTask(args) => {
            render::assigned(&service.assign_task(&args.task_id, &args.role).await?)
        }
        ToolCall::CompleteTask(args) => render::completed(
            &service
                .complete_task(&args.task_id, args.completion_notes.as_deref())
                .await?,
        ),
        ToolCall::SwitchRole(args) => render::switched(
            &service
                .switch_role(&args.role, args.reason.as_deref())
                .await?,
        ),
        ToolCall::ReturnToOrchestrator(args) => {
            render::returned(&service.return_to_orchestrator(args.reason.as_deref()).await?)
        }
        ToolCall::GetStatus => render::status(&service.status().await),
        ToolCall::ListTasks(args) => {
            let filter = args.status.as_deref();
            let tasks = service.list_tasks(filter).await?;
            render::task_list(&tasks, filter, service.board_mode())
        }
        ToolCall::ExportTasks => render::exported(&service.export_snapshot().await?),
        ToolCall::ShowRolePermissions => render::role_profile(&service.role_permissions().await),
        ToolCall::ListRoles => render::role_list(&service.list_roles()),
        ToolCall::SyncBoard => {
            render::synced(&service.sync_board_mirror().await, service.board_mode())
        }
    })
}

/// MCP server dispatching JSON-RPC messages to the orchestration engine.
pub struct McpServer<S, C>
where
    S: SnapshotStore + 'static,
    C: Clock + Send + Sync + 'static,
{
    service: Arc<OrchestrationService<S, C>>,
}

impl<S, C> Clone for McpServer<S, C>
where
    S: SnapshotStore + 'static,
    C: Clock + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
        }
    }
}

impl<S, C> McpServer<S, C>
where
    S: SnapshotStore + 'static,
    C: Clock + Send + Sync + 'static,
{
    /// Creates a server over `service`.
    #[must_use]
    pub const fn new(service: Arc<OrchestrationService<S, C>>) -> Self {
        Self { service }
    }

    /// Returns the underlying engine.
    #[must_use]
    pub const fn service(&self) -> &Arc<OrchestrationService<S, C>> {
        &self.service
    }

    /// Handles one inbound line and returns the encoded outbound messages.
    ///
    /// Notifications produce no response. A successful call that changes
    /// task resources is followed by a list-changed notification.
    pub async fn handle_line(&self, line: &str) -> Vec<String> {
        let raw: Value = match serde_json::from_str(line) {
            Ok(raw) => raw,
            Err(err) => {
                warn!(error = %err, "discarding unparseable message");
                return encode(&Response::failure(Value::Null, PARSE_ERROR, "Parse error"))
                    .into_iter()
                    .collect();
            }
        };
        let fallback_id = raw.get("id").cloned().unwrap_or(Value::Null);
        let request: Request = match serde_json::from_value(raw) {
            Ok(request) => request,
            Err(err) => {
                return encode(&Response::failure(
                    fallback_id,
                    INVALID_REQUEST,
                    format!("Invalid request: {err}"),
                ))
                .into_iter()
                .collect();
            }
        };
        if request.jsonrpc != VERSION {
            return encode(&Response::failure(
                fallback_id,
                INVALID_REQUEST,
                "Invalid request: jsonrpc must be \"2.0\"",
            ))
            .into_iter()
            .collect();
        }

        if request.is_notification() {
            debug!(method = %request.method, "notification received");
            return Vec::new();
        }
        let id = request.id.unwrap_or(Value::Null);

        let (response, changed) = self.dispatch(id, &request.method, request.params).await;
        let mut outbound: Vec<String> = encode(&response).into_iter().collect();
        if changed {
            outbound.extend(encode(&Request::notification(RESOURCES_CHANGED, Value::Null)));
        }
        outbound
    }

    async fn dispatch(&self, id: Value, method: &str, params: Value) -> (Response, bool) {
        match method {
            "initialize" => (Response::success(id, Self::initialize(&params)), false),
            "ping" => (Response::success(id, json!({})), false),
            "tools/list" => (Response::success(id, json!({ "tools": catalog() })), false),
            "tools/call" => self.call_tool(id, params).await,
            "resources/list" => (self.list_resources(id).await, false),
            "resources/read" => (self.read_resource(id, &params).await, false),
            other => (
                Response::failure(id, METHOD_NOT_FOUND, format!("Method not found: {other}")),
                false,
            ),
        }
    }

    fn initialize(params: &Value) -> Value {
        let version = params
            .get("protocolVersion")
            .and_then(Value::as_str)
            .unwrap_or(PROTOCOL_VERSION);
        json!({
            "protocolVersion": version,
            "capabilities": {
                "tools": { "listChanged": false },
                "resources": { "listChanged": true },
            },
            "serverInfo": { "name": "baton", "version": env!("CARGO_PKG_VERSION") },
        })
    }

    async fn call_tool(&self, id: Value, params: Value) -> (Response, bool) {
        let Some(name) = params.get("name").and_then(Value::as_str) else {
            return (
                Response::failure(id, INVALID_PARAMS, "Invalid params: missing tool name"),
                false,
            );
        };
        let arguments = params.get("arguments").cloned().unwrap_or(Value::Null);
        let call = match ToolCall::parse(name, arguments) {
            Ok(call) => call,
            Err(err) => {
                return (
                    Response::failure(id, INVALID_PARAMS, format!("Invalid params: {err}")),
                    false,
                );
            }
        };

        let outcome = self.execute(call).await;
        let changed = outcome.changed;
        (Response::success(id, outcome.into_result()), changed)
    }

    /// Runs a decoded tool call on its own task.
    ///
    /// A panic inside the engine is reported as a failed call instead of
    /// tearing down the server.
    pub async fn execute(&self, call: ToolCall) -> ToolOutcome {
        let tool = call.name();
        let changes_resources = call.changes_resources();
        let joined = tokio::spawn(run_tool(Arc::clone(&self.service), call)).await;

        match joined {
            Ok(Ok(text)) => ToolOutcome {
                text,
                is_error: false,
                changed: changes_resources,
            },
            Ok(Err(err)) => {
                debug!(tool, kind = ?err.kind(), error = %err, "tool call refused");
                ToolOutcome {
                    text: render::failure(&err),
                    is_error: true,
                    changed: false,
                }
            }
            Err(join_error) => {
                error!(tool, error = %join_error, "tool call aborted");
                ToolOutcome {
                    text: format!("Error: internal failure while running {tool}"),
                    is_error: true,
                    changed: false,
                }
            }
        }
    }

    async fn list_resources(&self, id: Value) -> Response {
        match self.service.list_tasks(None).await {
            Ok(tasks) => {
                let resources: Vec<Value> = tasks
                    .iter()
                    .map(|task| {
                        json!({
                            "uri": format!("{TASK_URI_PREFIX}{}", task.id()),
                            "name": format!("{}: {}", task.id(), task.title()),
                            "description": format!(
                                "{} task assigned to {}",
                                task.status(),
                                task.assigned_role().map_or("nobody", |role| role.as_str())
                            ),
                            "mimeType": "application/json",
                        })
                    })
                    .collect();
                Response::success(id, json!({ "resources": resources }))
            }
            Err(err) => Response::failure(id, INTERNAL_ERROR, err.to_string()),
        }
    }

    async fn read_resource(&self, id: Value, params: &Value) -> Response {
        let Some(uri) = params.get("uri").and_then(Value::as_str) else {
            return Response::failure(id, INVALID_PARAMS, "Invalid params: missing uri");
        };
        let Some(reference) = uri.strip_prefix(TASK_URI_PREFIX) else {
            return Response::failure(id, INVALID_PARAMS, format!("Unknown resource: {uri}"));
        };
        let task = match self.service.get_task(reference).await {
            Ok(task) => task,
            Err(err) => return Response::failure(id, INVALID_PARAMS, err.to_string()),
        };
        match serde_json::to_string_pretty(&task) {
            Ok(text) => Response::success(
                id,
                json!({
                    "contents": [{
                        "uri": uri,
                        "mimeType": "application/json",
                        "text": text,
                    }]
                }),
            ),
            Err(err) => Response::failure(id, INTERNAL_ERROR, err.to_string()),
        }
    }
}
