// SPDX-FileCopyrightText: 2026 BarberBook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Base lifecycle trait for persistence backends.

use async_trait::async_trait;

use crate::error::BarberError;
use crate::types::HealthStatus;

/// Lifecycle of a storage backend (SQLite, etc.).
#[async_trait]
pub trait StorageAdapter: Send + Sync + 'static {
    /// Human-readable backend name, used in logs.
    fn name(&self) -> &str;

    /// Prepares the backend: opens connections and applies migrations.
    async fn initialize(&self) -> Result<(), BarberError>;

    /// Probes the backend with a trivial query.
    async fn health_check(&self) -> Result<HealthStatus, BarberError>;

    /// Flushes pending writes and releases connections.
    async fn close(&self) -> Result<(), BarberError>;
}
