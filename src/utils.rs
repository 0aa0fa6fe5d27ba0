// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result, anyhow};
use chrono::{NaiveDate, NaiveDateTime};
use comfy_table::{Cell, CellAlignment, Table, presets::UTF8_FULL};
use rust_decimal::Decimal;

use crate::models::{AssetType, Transaction, format_fecha, parse_fecha as parse_fecha_opt};

pub const TABLE_HEADERS: [&str; 8] = [
    "ID",
    "Fecha",
    "Activo",
    "Tipo",
    "Cantidad",
    "Precio unitario",
    "Costo total",
    "Dólar",
];

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", s))
}

pub fn parse_fecha(s: &str) -> Result<NaiveDateTime> {
    parse_fecha_opt(s).ok_or_else(|| {
        anyhow!(
            "Invalid date '{}', expected YYYY-MM-DD or YYYY-MM-DDTHH:MM:SS",
            s
        )
    })
}

pub fn parse_decimal(s: &str) -> Result<Decimal> {
    s.trim()
        .parse::<Decimal>()
        .with_context(|| format!("Invalid decimal '{}'", s))
}

pub fn parse_asset_type(s: &str) -> Result<AssetType> {
    Ok(s.parse::<AssetType>()?)
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

pub fn transactions_table(data: &[Transaction]) -> Table {
    let rows = data
        .iter()
        .map(|t| {
            vec![
                t.id.to_string(),
                format_fecha(&t.fecha),
                t.activo.clone(),
                t.tipo.to_string(),
                t.cantidad.to_string(),
                t.precio_unitario.to_string(),
                t.costo_total.to_string(),
                t.dolar_cambio.to_string(),
            ]
        })
        .collect();
    let mut table = pretty_table(&TABLE_HEADERS, rows);
    for idx in [0, 4, 5, 6, 7] {
        if let Some(col) = table.column_mut(idx) {
            col.set_cell_alignment(CellAlignment::Right);
        }
    }
    table
}

/// Renders `v` as pretty JSON or as JSON lines. `None` when neither flag is set.
pub fn maybe_render_json<T: serde::Serialize>(
    json_flag: bool,
    jsonl_flag: bool,
    v: &T,
) -> Result<Option<String>> {
    if json_flag {
        return Ok(Some(serde_json::to_string_pretty(v)?));
    }
    if jsonl_flag {
        // If v is an array, emit each element on its own line
        let val = serde_json::to_value(v)?;
        let lines = match val.as_array() {
            Some(arr) => arr
                .iter()
                .map(serde_json::to_string)
                .collect::<serde_json::Result<Vec<_>>>()?,
            None => vec![serde_json::to_string(&val)?],
        };
        return Ok(Some(lines.join("\n")));
    }
    Ok(None)
}
