// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::Connection;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use gestor_inversiones::{cli, commands, db};

const LOG_ENV: &str = "GESTOR_INVERSIONES_LOG";

fn main() -> Result<()> {
    // stdout carries command output; diagnostics go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let matches = cli::build_cli().get_matches();

    let Some((name, sub)) = matches.subcommand() else {
        cli::build_cli().print_help()?;
        println!();
        return Ok(());
    };

    // The database file is only created once a command actually needs it.
    let db_arg = matches.get_one::<PathBuf>("db").map(PathBuf::as_path);
    let open = || -> Result<(PathBuf, Connection)> {
        let path = db::db_path(db_arg)?;
        let conn = db::open_or_init(&path)?;
        Ok((path, conn))
    };

    match name {
        "init" => {
            let (path, _) = open()?;
            println!("Database initialized at {}", path.display());
        }
        "register" => {
            let tx = commands::transactions::new_transaction(sub)?;
            let (_, conn) = open()?;
            commands::transactions::create(&conn, &tx)?;
        }
        "update" => {
            let (id, patch) = commands::transactions::update_request(sub)?;
            let (_, conn) = open()?;
            commands::transactions::apply_update(&conn, id, &patch)?;
        }
        "query" => commands::transactions::query(&open()?.1, sub)?,
        "delete" => {
            commands::transactions::delete(&open()?.1, sub)?;
        }
        "export" => {
            commands::exporter::handle(&open()?.1, sub)?;
        }
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
