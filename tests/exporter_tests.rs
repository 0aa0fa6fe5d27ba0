// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use gestor_inversiones::models::{AssetType, NewTransaction};
use gestor_inversiones::{cli, commands::exporter, db, repo};
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde_json::json;
use tempfile::tempdir;

fn base_conn() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    for (activo, tipo, fecha) in [
        ("BTC", AssetType::Crypto, "2025-01-02 10:00:00"),
        ("SPY", AssetType::Etf, "2025-01-03 11:30:00"),
    ] {
        repo::create(
            &conn,
            &NewTransaction {
                activo: activo.into(),
                tipo,
                cantidad: Decimal::new(15, 1),
                precio_unitario: Decimal::new(1000, 0),
                costo_total: Decimal::new(1500, 0),
                dolar_cambio: Decimal::new(98050, 2),
                fecha: gestor_inversiones::models::parse_fecha(fecha),
            },
        )
        .unwrap();
    }
    conn
}

fn export_matches(args: &[&str]) -> clap::ArgMatches {
    let mut argv = vec!["gestor-inversiones", "export"];
    argv.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(argv);
    match matches.subcommand() {
        Some(("export", sub)) => sub.clone(),
        _ => panic!("export command not parsed"),
    }
}

#[test]
fn export_csv_writes_header_and_rows() {
    let conn = base_conn();
    let dir = tempdir().unwrap();
    let out = dir.path().join("ledger.csv");
    let out_str = out.to_string_lossy().to_string();

    let sub = export_matches(&["--format", "csv", "--out", out_str.as_str()]);
    assert_eq!(exporter::handle(&conn, &sub).unwrap(), 2);

    let mut rdr = csv::Reader::from_path(&out).unwrap();
    let headers = rdr.headers().unwrap().clone();
    assert_eq!(
        headers.iter().collect::<Vec<_>>(),
        vec![
            "id",
            "fecha",
            "activo",
            "tipo",
            "cantidad",
            "precio_unitario",
            "costo_total",
            "dolar_cambio"
        ]
    );
    let records: Vec<csv::StringRecord> = rdr.records().map(|r| r.unwrap()).collect();
    assert_eq!(records.len(), 2);
    assert_eq!(&records[0][1], "2025-01-03 11:30:00");
    assert_eq!(&records[0][2], "SPY");
    assert_eq!(&records[0][3], "ETF");
    assert_eq!(&records[1][2], "BTC");
    assert_eq!(&records[1][4], "1.5");
}

#[test]
fn export_json_applies_filters() {
    let conn = base_conn();
    let dir = tempdir().unwrap();
    let out = dir.path().join("crypto.json");
    let out_str = out.to_string_lossy().to_string();

    let sub = export_matches(&["--format", "JSON", "--tipo", "crypto", "--out", out_str.as_str()]);
    assert_eq!(exporter::handle(&conn, &sub).unwrap(), 1);

    let contents = std::fs::read_to_string(&out).unwrap();
    let value: serde_json::Value = serde_json::from_str(&contents).unwrap();
    let items = value.as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["activo"], json!("BTC"));
    assert_eq!(items[0]["tipo"], json!("CRYPTO"));
    assert_eq!(items[0]["fecha"], json!("2025-01-02 10:00:00"));
    assert_eq!(items[0]["cantidad"], json!("1.5"));
}
