//! Baton: role-gated task orchestration served over MCP.
//!
//! A coordinating orchestrator creates tasks, hands them to specialist roles
//! (architect, coder, analyst, devops), and records every hand-off. Tasks can
//! be mirrored to a Trello board either directly over its REST API or through
//! a board tool server, and are snapshotted to JSON files after each change.
//!
//! # Architecture
//!
//! Baton follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (files, HTTP, child
//!   processes)
//!
//! # Modules
//!
//! - [`task`]: Roles, tasks, transitions, and the orchestration engine
//! - [`server`]: MCP tool and resource surface over newline-delimited stdio
//! - [`jsonrpc`]: JSON-RPC 2.0 message types
//! - [`config`]: Command-line and environment settings
//! - [`telemetry`]: Tracing subscriber setup

pub mod config;
pub mod jsonrpc;
pub mod server;
pub mod task;
pub mod telemetry;
