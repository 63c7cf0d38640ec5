//! Role-gated task orchestration.
//!
//! A single active role creates tasks, delegates them to specialist roles,
//! and takes control back when they complete. Every hand-off is recorded in
//! an append-only transition log. Task state is mirrored to an external
//! kanban board on a best-effort basis and snapshotted to durable storage
//! after each mutation. The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - The orchestration engine in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
