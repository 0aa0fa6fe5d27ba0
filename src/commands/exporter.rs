// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::transactions::query_rows;
use crate::models::format_fecha;
use anyhow::{Context, Result, bail};
use rusqlite::Connection;

/// Writes the filtered transactions to `--out`. Returns the number of records written.
pub fn handle(conn: &Connection, sub: &clap::ArgMatches) -> Result<usize> {
    let fmt = sub
        .get_one::<String>("format")
        .map(|s| s.to_lowercase())
        .unwrap_or_else(|| "csv".to_string());
    let out = sub.get_one::<String>("out").context("Missing --out")?;

    let data = query_rows(conn, sub)?;

    match fmt.as_str() {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)
                .with_context(|| format!("Failed to create {}", out))?;
            wtr.write_record([
                "id",
                "fecha",
                "activo",
                "tipo",
                "cantidad",
                "precio_unitario",
                "costo_total",
                "dolar_cambio",
            ])?;
            for t in &data {
                wtr.write_record([
                    t.id.to_string(),
                    format_fecha(&t.fecha),
                    t.activo.clone(),
                    t.tipo.to_string(),
                    t.cantidad.to_string(),
                    t.precio_unitario.to_string(),
                    t.costo_total.to_string(),
                    t.dolar_cambio.to_string(),
                ])?;
            }
            wtr.flush()?;
        }
        "json" => {
            std::fs::write(out, serde_json::to_string_pretty(&data)?)
                .with_context(|| format!("Failed to write {}", out))?;
        }
        other => bail!("Unknown format: {} (use csv|json)", other),
    }
    println!("Exported {} transactions to {}", data.len(), out);
    Ok(data.len())
}
