// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use rusqlite::Connection;
use rusqlite::functions::FunctionFlags;
use std::fs;
use std::path::{Path, PathBuf};

static APP: Lazy<(&str, &str, &str)> =
    Lazy::new(|| ("com.alphavelocity", "GestorInversiones", "gestor_inversiones"));

pub const DB_FILE: &str = "gestor_inversiones.sqlite";

/// Resolves the database file: an explicit path wins over the platform data dir.
pub fn db_path(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(p) = explicit {
        if let Some(parent) = p.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        return Ok(p.to_path_buf());
    }
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data dir")?;
    Ok(data_dir.join(DB_FILE))
}

pub fn open_or_init(path: &Path) -> Result<Connection> {
    let conn =
        Connection::open(path).with_context(|| format!("Open DB at {}", path.display()))?;
    tracing::debug!(path = %path.display(), "opened database");
    init_schema(&conn)?;
    Ok(conn)
}

/// Registers `fold_case(text)`, a Unicode lowercase used for `activo`
/// matching. SQLite's own `lower()` only folds ASCII.
pub fn register_functions(conn: &Connection) -> Result<()> {
    conn.create_scalar_function(
        "fold_case",
        1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| Ok(ctx.get::<Option<String>>(0)?.map(|s| s.to_lowercase())),
    )
    .context("Failed to register SQL functions")?;
    Ok(())
}

/// Creates `transacciones` if missing and registers SQL functions. Safe to
/// run on every start.
pub fn init_schema(conn: &Connection) -> Result<()> {
    register_functions(conn)?;
    conn.execute_batch(
        r#"
    CREATE TABLE IF NOT EXISTS transacciones(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        fecha TEXT NOT NULL DEFAULT (datetime('now', 'localtime')),
        activo TEXT NOT NULL,
        tipo TEXT NOT NULL CHECK(tipo IN ('CRYPTO','ETF')),
        cantidad TEXT NOT NULL,
        precio_unitario TEXT NOT NULL,
        costo_total TEXT NOT NULL,
        dolar_cambio TEXT NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_transacciones_fecha ON transacciones(fecha);
    "#,
    )
    .context("Failed to initialize schema")?;
    Ok(())
}
