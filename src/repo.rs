// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! CRUD over the `transacciones` table.
//!
//! Every function runs its statement in autocommit mode, so the change is
//! durable once the call returns. Nothing is retried.

use rusqlite::types::Value;
use rusqlite::{Connection, OptionalExtension, params, params_from_iter};

use crate::error::{Error, Result};
use crate::models::{
    NewTransaction, Transaction, TransactionFilter, TransactionPatch, format_fecha,
};

/// Inserts a purchase and returns its id.
pub fn create(conn: &Connection, tx: &NewTransaction) -> Result<i64> {
    let amounts = [
        tx.cantidad.to_string(),
        tx.precio_unitario.to_string(),
        tx.costo_total.to_string(),
        tx.dolar_cambio.to_string(),
    ];
    match tx.fecha {
        None => conn.execute(
            "INSERT INTO transacciones(activo, tipo, cantidad, precio_unitario, costo_total,
                                       dolar_cambio)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![tx.activo, tx.tipo, amounts[0], amounts[1], amounts[2], amounts[3]],
        )?,
        Some(fecha) => conn.execute(
            "INSERT INTO transacciones(fecha, activo, tipo, cantidad, precio_unitario,
                                       costo_total, dolar_cambio)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                format_fecha(&fecha),
                tx.activo,
                tx.tipo,
                amounts[0],
                amounts[1],
                amounts[2],
                amounts[3]
            ],
        )?,
    };
    let id = conn.last_insert_rowid();
    tracing::debug!(id, activo = %tx.activo, tipo = %tx.tipo, "created transaction");
    Ok(id)
}

/// Returns every record matching all predicates in `filter`, newest first.
pub fn query(conn: &Connection, filter: &TransactionFilter) -> Result<Vec<Transaction>> {
    let (predicate, params) = filter.predicates();
    let sql = format!(
        "SELECT {} FROM transacciones WHERE {} ORDER BY fecha DESC, id DESC",
        Transaction::COLUMNS,
        predicate
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params_from_iter(params.iter()), Transaction::from_row)?;
    let data = rows.collect::<rusqlite::Result<Vec<_>>>()?;
    tracing::debug!(matches = data.len(), ?filter, "queried transactions");
    Ok(data)
}

pub fn get(conn: &Connection, id: i64) -> Result<Option<Transaction>> {
    let sql = format!(
        "SELECT {} FROM transacciones WHERE id = ?1",
        Transaction::COLUMNS
    );
    let tx = conn
        .query_row(&sql, params![id], Transaction::from_row)
        .optional()?;
    Ok(tx)
}

/// Writes the fields present in `patch`. Returns `false` when `id` does not exist.
pub fn update(conn: &Connection, id: i64, patch: &TransactionPatch) -> Result<bool> {
    let assignments = patch.assignments();
    if assignments.is_empty() {
        return Err(Error::NothingToUpdate);
    }
    let set_clause = assignments
        .iter()
        .map(|(field, _)| format!("{} = ?", field.column()))
        .collect::<Vec<_>>()
        .join(", ");
    let sql = format!("UPDATE transacciones SET {} WHERE id = ?", set_clause);
    let mut values: Vec<Value> = assignments.into_iter().map(|(_, v)| v).collect();
    values.push(Value::Integer(id));

    let changed = conn.execute(&sql, params_from_iter(values.iter()))?;
    tracing::debug!(id, changed, "updated transaction");
    Ok(changed > 0)
}

/// Removes the record. Returns `false` when `id` does not exist.
pub fn delete(conn: &Connection, id: i64) -> Result<bool> {
    let removed = conn.execute("DELETE FROM transacciones WHERE id = ?1", params![id])?;
    tracing::debug!(id, removed, "deleted transaction");
    Ok(removed > 0)
}
