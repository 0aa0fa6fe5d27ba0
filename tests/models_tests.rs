// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use gestor_inversiones::error::Error;
use gestor_inversiones::models::{
    AssetType, Field, Transaction, TransactionFilter, TransactionPatch, format_fecha, parse_fecha,
};
use rusqlite::types::Value;
use rust_decimal::Decimal;

#[test]
fn asset_type_parses_any_case() {
    assert_eq!("crypto".parse::<AssetType>().unwrap(), AssetType::Crypto);
    assert_eq!(" Etf ".parse::<AssetType>().unwrap(), AssetType::Etf);
    assert!("BOND".parse::<AssetType>().is_err());
    assert_eq!(AssetType::Crypto.to_string(), "CRYPTO");
}

#[test]
fn field_names_are_a_closed_set() {
    for f in Field::ALL {
        assert_eq!(f.column().parse::<Field>().unwrap(), f);
    }
    assert!(matches!("id".parse::<Field>(), Err(Error::InvalidField(_))));
    assert!(matches!("precio".parse::<Field>(), Err(Error::InvalidField(_))));
}

#[test]
fn fecha_accepts_date_and_datetime_forms() {
    let expected = NaiveDate::from_ymd_opt(2025, 4, 7)
        .unwrap()
        .and_hms_opt(9, 15, 0)
        .unwrap();
    assert_eq!(parse_fecha("2025-04-07T09:15:00"), Some(expected));
    assert_eq!(parse_fecha("2025-04-07 09:15:00"), Some(expected));
    assert_eq!(parse_fecha("2025-04-07T09:15"), Some(expected));
    assert_eq!(parse_fecha("2025-04-07 09:15:00.000"), Some(expected));
    assert_eq!(
        parse_fecha("2025-04-07").map(|d| format_fecha(&d)),
        Some("2025-04-07 00:00:00".to_string())
    );
    assert_eq!(parse_fecha("07/04/2025"), None);
    assert_eq!(parse_fecha("2025-02-30"), None);
}

#[test]
fn patch_set_parses_values_per_field() {
    let mut patch = TransactionPatch::default();
    assert_eq!(patch.set("cantidad", "0.25").unwrap(), Field::Cantidad);
    assert_eq!(patch.set("tipo", "etf").unwrap(), Field::Tipo);
    assert_eq!(patch.cantidad, Some(Decimal::new(25, 2)));
    assert_eq!(patch.tipo, Some(AssetType::Etf));

    let err = patch.set("costo_total", "mucho").unwrap_err();
    assert!(matches!(err, Error::InvalidValue { field: "costo_total", .. }));
    assert!(patch.costo_total.is_none());

    assert!(patch.set("activo", "  ").is_err());
    assert!(patch.set("fecha", "ayer").is_err());
}

#[test]
fn patch_assignments_follow_column_order() {
    let patch = TransactionPatch {
        fecha: parse_fecha("2025-01-01"),
        activo: Some("ETH".into()),
        dolar_cambio: Some(Decimal::new(1100, 0)),
        ..Default::default()
    };
    let cols: Vec<&str> = patch.assignments().iter().map(|(f, _)| f.column()).collect();
    assert_eq!(cols, vec!["activo", "dolar_cambio", "fecha"]);
    assert!(!patch.is_empty());
    assert!(TransactionPatch::default().is_empty());
}

#[test]
fn filter_renders_bound_predicates() {
    let (sql, params) = TransactionFilter::default().predicates();
    assert_eq!(sql, "1=1");
    assert!(params.is_empty());

    let filter = TransactionFilter {
        activo: Some("btc".into()),
        tipo: Some(AssetType::Crypto),
        desde: NaiveDate::from_ymd_opt(2025, 1, 1),
        hasta: None,
    };
    let (sql, params) = filter.predicates();
    assert_eq!(
        sql,
        "fold_case(activo) = fold_case(?) AND tipo = ? AND date(fecha) >= date(?)"
    );
    assert_eq!(
        params,
        vec![
            Value::Text("btc".into()),
            Value::Text("CRYPTO".into()),
            Value::Text("2025-01-01".into()),
        ]
    );
}

#[test]
fn transaction_json_uses_storage_date_format() {
    let t = Transaction {
        id: 7,
        fecha: parse_fecha("2025-06-01T08:45:10").unwrap(),
        activo: "BTC".into(),
        tipo: AssetType::Crypto,
        cantidad: Decimal::new(1, 0),
        precio_unitario: Decimal::new(1, 0),
        costo_total: Decimal::new(1, 0),
        dolar_cambio: Decimal::new(1, 0),
    };
    let value = serde_json::to_value(&t).unwrap();
    assert_eq!(value["fecha"], "2025-06-01 08:45:10");
    let back: Transaction = serde_json::from_value(value).unwrap();
    assert_eq!(back, t);
}
