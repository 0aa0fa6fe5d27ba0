// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::Error;
use crate::models::{NewTransaction, Transaction, TransactionFilter, TransactionPatch};
use crate::repo;
use crate::utils::{
    maybe_render_json, parse_asset_type, parse_date, parse_decimal, parse_fecha,
    transactions_table,
};
use anyhow::{Context, Result, anyhow};
use rusqlite::Connection;

pub fn register(conn: &Connection, sub: &clap::ArgMatches) -> Result<i64> {
    let tx = new_transaction(sub)?;
    create(conn, &tx)
}

pub fn create(conn: &Connection, tx: &NewTransaction) -> Result<i64> {
    let id = repo::create(conn, tx)?;
    println!(
        "✅ Recorded purchase #{}: {} {} x {} @ {} (total {}, USD {})",
        id,
        tx.tipo,
        tx.cantidad,
        tx.activo,
        tx.precio_unitario,
        tx.costo_total,
        tx.dolar_cambio
    );
    Ok(id)
}

pub fn new_transaction(sub: &clap::ArgMatches) -> Result<NewTransaction> {
    let activo = required(sub, "activo")?.trim().to_string();
    if activo.is_empty() {
        return Err(anyhow!("--activo must not be empty"));
    }
    let fecha = match sub.get_one::<String>("fecha") {
        Some(raw) => Some(parse_fecha(raw)?),
        None => None,
    };
    Ok(NewTransaction {
        activo,
        tipo: parse_asset_type(required(sub, "tipo")?)?,
        cantidad: parse_decimal(required(sub, "cantidad")?)?,
        precio_unitario: parse_decimal(required(sub, "precio")?)?,
        costo_total: parse_decimal(required(sub, "costo")?)?,
        dolar_cambio: parse_decimal(required(sub, "dolar")?)?,
        fecha,
    })
}

fn required<'a>(sub: &'a clap::ArgMatches, name: &str) -> Result<&'a String> {
    sub.get_one::<String>(name)
        .ok_or_else(|| anyhow!("Missing --{}", name))
}

pub fn update(conn: &Connection, sub: &clap::ArgMatches) -> Result<bool> {
    let (id, patch) = update_request(sub)?;
    apply_update(conn, id, &patch)
}

/// Reads the target id and a non-empty patch without touching storage.
pub fn update_request(sub: &clap::ArgMatches) -> Result<(i64, TransactionPatch)> {
    let id = *sub.get_one::<i64>("id").context("Missing --id")?;
    let patch = patch_from(sub)?;
    if patch.is_empty() {
        return Err(Error::NothingToUpdate.into());
    }
    Ok((id, patch))
}

pub fn apply_update(conn: &Connection, id: i64, patch: &TransactionPatch) -> Result<bool> {
    let found = repo::update(conn, id, patch)?;
    if found {
        println!("✅ Transaction {} updated", id);
    } else {
        println!("❌ Transaction {} not found", id);
    }
    Ok(found)
}

/// Collects the supplied flags and `--set` pairs into a patch.
///
/// Every pair is validated before the patch is returned, so one bad field
/// name rejects the whole update.
pub fn patch_from(sub: &clap::ArgMatches) -> Result<TransactionPatch> {
    let mut patch = TransactionPatch::default();
    let flags = [
        ("activo", "activo"),
        ("tipo", "tipo"),
        ("cantidad", "cantidad"),
        ("precio", "precio_unitario"),
        ("costo", "costo_total"),
        ("dolar", "dolar_cambio"),
        ("fecha", "fecha"),
    ];
    for (flag, column) in flags {
        if let Some(raw) = sub.get_one::<String>(flag) {
            patch.set(column, raw)?;
        }
    }
    if let Some(pairs) = sub.get_many::<String>("set") {
        for pair in pairs {
            let (name, value) = pair
                .split_once('=')
                .ok_or_else(|| anyhow!("Invalid --set '{}', expected CAMPO=VALOR", pair))?;
            patch.set(name, value)?;
        }
    }
    Ok(patch)
}

pub fn filter_from(sub: &clap::ArgMatches) -> Result<TransactionFilter> {
    let activo = sub
        .get_one::<String>("activo")
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());
    let tipo = sub
        .get_one::<String>("tipo")
        .map(|s| parse_asset_type(s))
        .transpose()?;
    let desde = sub
        .get_one::<String>("desde")
        .map(|s| parse_date(s))
        .transpose()?;
    let hasta = sub
        .get_one::<String>("hasta")
        .map(|s| parse_date(s))
        .transpose()?;
    Ok(TransactionFilter {
        activo,
        tipo,
        desde,
        hasta,
    })
}

pub fn query_rows(conn: &Connection, sub: &clap::ArgMatches) -> Result<Vec<Transaction>> {
    let filter = filter_from(sub)?;
    Ok(repo::query(conn, &filter)?)
}

pub const NO_MATCHES: &str = "No transactions match the given filters.";

pub fn query(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let data = query_rows(conn, sub)?;
    println!(
        "{}",
        render_query(&data, sub.get_flag("json"), sub.get_flag("jsonl"))?
    );
    Ok(())
}

/// Formats query results as JSON, JSON lines, a table, or the no-matches message.
pub fn render_query(data: &[Transaction], json: bool, jsonl: bool) -> Result<String> {
    if let Some(out) = maybe_render_json(json, jsonl, &data)? {
        return Ok(out);
    }
    if data.is_empty() {
        Ok(NO_MATCHES.to_string())
    } else {
        Ok(transactions_table(data).to_string())
    }
}

pub fn delete(conn: &Connection, sub: &clap::ArgMatches) -> Result<bool> {
    let id = *sub.get_one::<i64>("id").context("Missing --id")?;
    let removed = repo::delete(conn, id)?;
    if removed {
        println!("✅ Transaction {} deleted", id);
    } else {
        println!("❌ Transaction {} not found", id);
    }
    Ok(removed)
}
