// SPDX-FileCopyrightText: 2026 BarberBook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Embedded schema migrations (refinery).
//!
//! The SQL files under `migrations/` are compiled in; applied versions are
//! tracked in `refinery_schema_history`.

use barberbook_core::BarberError;
use tracing::info;

mod embedded {
    use refinery::embed_migrations;
    embed_migrations!("migrations");
}

/// Apply all pending migrations on a blocking connection.
pub fn run_migrations(conn: &mut rusqlite::Connection) -> Result<(), BarberError> {
    let report = embedded::migrations::runner()
        .run(conn)
        .map_err(BarberError::storage)?;
    for migration in report.applied_migrations() {
        info!(version = migration.version(), name = migration.name(), "migration applied");
    }
    Ok(())
}
