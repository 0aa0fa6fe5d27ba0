// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::Row;
use rusqlite::types::{
    FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, Type, Value, ValueRef,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Storage format for `fecha`. Lexicographic order equals chronological order.
pub const FECHA_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const FECHA_INPUT_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AssetType {
    Crypto,
    Etf,
}

impl AssetType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetType::Crypto => "CRYPTO",
            AssetType::Etf => "ETF",
        }
    }
}

impl fmt::Display for AssetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown asset type '{0}' (expected CRYPTO or ETF)")]
pub struct ParseAssetTypeError(pub String);

impl FromStr for AssetType {
    type Err = ParseAssetTypeError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "CRYPTO" => Ok(AssetType::Crypto),
            "ETF" => Ok(AssetType::Etf),
            _ => Err(ParseAssetTypeError(s.to_string())),
        }
    }
}

impl ToSql for AssetType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for AssetType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|e| FromSqlError::Other(Box::new(e)))
    }
}

/// One recorded purchase, as stored in `transacciones`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    #[serde(with = "fecha_serde")]
    pub fecha: NaiveDateTime,
    pub activo: String,
    pub tipo: AssetType,
    pub cantidad: Decimal,
    pub precio_unitario: Decimal,
    pub costo_total: Decimal,
    pub dolar_cambio: Decimal,
}

// Same text form as the `fecha` column, so JSON and CSV output agree.
mod fecha_serde {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer, de};

    pub fn serialize<S: Serializer>(dt: &NaiveDateTime, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&super::format_fecha(dt))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(d)?;
        super::parse_fecha(&raw)
            .ok_or_else(|| de::Error::custom(format!("invalid fecha '{}'", raw)))
    }
}

impl Transaction {
    /// Column list matching the positions read by [`Transaction::from_row`].
    pub const COLUMNS: &'static str =
        "id, fecha, activo, tipo, cantidad, precio_unitario, costo_total, dolar_cambio";

    pub fn from_row(r: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Transaction {
            id: r.get(0)?,
            fecha: r.get(1)?,
            activo: r.get(2)?,
            tipo: r.get(3)?,
            cantidad: decimal_at(r, 4)?,
            precio_unitario: decimal_at(r, 5)?,
            costo_total: decimal_at(r, 6)?,
            dolar_cambio: decimal_at(r, 7)?,
        })
    }
}

// Decimals are persisted as TEXT to keep them exact.
fn decimal_at(r: &Row<'_>, idx: usize) -> rusqlite::Result<Decimal> {
    let raw: String = r.get(idx)?;
    raw.trim()
        .parse::<Decimal>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

/// Input for creating a record. `fecha: None` lets the store stamp the current time.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    pub activo: String,
    pub tipo: AssetType,
    pub cantidad: Decimal,
    pub precio_unitario: Decimal,
    pub costo_total: Decimal,
    pub dolar_cambio: Decimal,
    pub fecha: Option<NaiveDateTime>,
}

/// The columns an update may touch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Activo,
    Tipo,
    Cantidad,
    PrecioUnitario,
    CostoTotal,
    DolarCambio,
    Fecha,
}

impl Field {
    pub const ALL: [Field; 7] = [
        Field::Activo,
        Field::Tipo,
        Field::Cantidad,
        Field::PrecioUnitario,
        Field::CostoTotal,
        Field::DolarCambio,
        Field::Fecha,
    ];

    pub fn column(&self) -> &'static str {
        match self {
            Field::Activo => "activo",
            Field::Tipo => "tipo",
            Field::Cantidad => "cantidad",
            Field::PrecioUnitario => "precio_unitario",
            Field::CostoTotal => "costo_total",
            Field::DolarCambio => "dolar_cambio",
            Field::Fecha => "fecha",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

impl FromStr for Field {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let name = s.trim();
        Field::ALL
            .into_iter()
            .find(|f| f.column() == name)
            .ok_or_else(|| Error::InvalidField(name.to_string()))
    }
}

/// Partial update: every `Some` field is written, every `None` field is left alone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionPatch {
    pub activo: Option<String>,
    pub tipo: Option<AssetType>,
    pub cantidad: Option<Decimal>,
    pub precio_unitario: Option<Decimal>,
    pub costo_total: Option<Decimal>,
    pub dolar_cambio: Option<Decimal>,
    pub fecha: Option<NaiveDateTime>,
}

impl TransactionPatch {
    pub fn is_empty(&self) -> bool {
        self.assignments().is_empty()
    }

    /// Sets a field from its column name and a raw string value.
    ///
    /// Unknown names fail with [`Error::InvalidField`]; the patch is left
    /// unchanged on any error.
    pub fn set(&mut self, name: &str, raw: &str) -> Result<Field> {
        let field: Field = name.parse()?;
        let raw = raw.trim();
        let invalid = |reason: String| Error::InvalidValue {
            field: field.column(),
            value: raw.to_string(),
            reason,
        };
        let decimal = || raw.parse::<Decimal>().map_err(|e| invalid(e.to_string()));
        match field {
            Field::Activo => {
                if raw.is_empty() {
                    return Err(invalid("must not be empty".into()));
                }
                self.activo = Some(raw.to_string());
            }
            Field::Tipo => {
                self.tipo = Some(
                    raw.parse::<AssetType>()
                        .map_err(|e| invalid(e.to_string()))?,
                )
            }
            Field::Cantidad => self.cantidad = Some(decimal()?),
            Field::PrecioUnitario => self.precio_unitario = Some(decimal()?),
            Field::CostoTotal => self.costo_total = Some(decimal()?),
            Field::DolarCambio => self.dolar_cambio = Some(decimal()?),
            Field::Fecha => {
                let fecha = parse_fecha(raw).ok_or_else(|| {
                    invalid("expected YYYY-MM-DD or YYYY-MM-DDTHH:MM:SS".into())
                })?;
                self.fecha = Some(fecha);
            }
        }
        Ok(field)
    }

    /// The `(column, value)` pairs this patch writes, in column order.
    pub fn assignments(&self) -> Vec<(Field, Value)> {
        let mut out = Vec::new();
        if let Some(v) = &self.activo {
            out.push((Field::Activo, Value::Text(v.clone())));
        }
        if let Some(v) = self.tipo {
            out.push((Field::Tipo, Value::Text(v.as_str().to_string())));
        }
        for (field, v) in [
            (Field::Cantidad, self.cantidad),
            (Field::PrecioUnitario, self.precio_unitario),
            (Field::CostoTotal, self.costo_total),
            (Field::DolarCambio, self.dolar_cambio),
        ] {
            if let Some(d) = v {
                out.push((field, Value::Text(d.to_string())));
            }
        }
        if let Some(v) = self.fecha {
            out.push((Field::Fecha, Value::Text(format_fecha(&v))));
        }
        out
    }
}

/// Optional query predicates, combined with AND.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionFilter {
    pub activo: Option<String>,
    pub tipo: Option<AssetType>,
    pub desde: Option<NaiveDate>,
    pub hasta: Option<NaiveDate>,
}

impl TransactionFilter {
    /// Renders the filter as a WHERE clause body plus its bound parameters.
    /// Returns `"1=1"` when no predicate is set.
    pub fn predicates(&self) -> (String, Vec<Value>) {
        let mut clauses: Vec<&'static str> = Vec::new();
        let mut params = Vec::new();
        if let Some(a) = &self.activo {
            clauses.push("fold_case(activo) = fold_case(?)");
            params.push(Value::Text(a.trim().to_string()));
        }
        if let Some(t) = self.tipo {
            clauses.push("tipo = ?");
            params.push(Value::Text(t.as_str().to_string()));
        }
        if let Some(d) = self.desde {
            clauses.push("date(fecha) >= date(?)");
            params.push(Value::Text(d.to_string()));
        }
        if let Some(d) = self.hasta {
            clauses.push("date(fecha) <= date(?)");
            params.push(Value::Text(d.to_string()));
        }
        if clauses.is_empty() {
            ("1=1".to_string(), params)
        } else {
            (clauses.join(" AND "), params)
        }
    }
}

/// Parses an ISO date (`YYYY-MM-DD`, taken as midnight) or date-time.
pub fn parse_fecha(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    FECHA_INPUT_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

pub fn format_fecha(dt: &NaiveDateTime) -> String {
    dt.format(FECHA_FORMAT).to_string()
}
