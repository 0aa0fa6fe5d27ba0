// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, ArgGroup, Command, value_parser};
use std::path::PathBuf;

const TIPOS: [&str; 2] = ["CRYPTO", "ETF"];

fn tipo_arg(help: &'static str) -> Arg {
    Arg::new("tipo")
        .long("tipo")
        .value_parser(TIPOS)
        .ignore_case(true)
        .help(help)
}

fn id_arg(help: &'static str) -> Arg {
    Arg::new("id")
        .long("id")
        .required(true)
        .value_parser(value_parser!(i64))
        .help(help)
}

fn filter_args() -> [Arg; 4] {
    [
        Arg::new("activo")
            .long("activo")
            .help("Filter by asset name, case-insensitive exact match (e.g. BTC, ETH)"),
        tipo_arg("Filter by asset type"),
        Arg::new("desde")
            .long("desde")
            .value_name("YYYY-MM-DD")
            .help("Only records on or after this date"),
        Arg::new("hasta")
            .long("hasta")
            .value_name("YYYY-MM-DD")
            .help("Only records on or before this date"),
    ]
}

pub fn build_cli() -> Command {
    Command::new("gestor-inversiones")
        .version(clap::crate_version!())
        .about("Gestor de inversiones doméstico (CRYPTO/ETF) con SQLite")
        .after_help("Run 'gestor-inversiones <command> -h' for command-specific help.")
        .arg(
            Arg::new("db")
                .long("db")
                .global(true)
                .env("GESTOR_INVERSIONES_DB")
                .value_parser(value_parser!(PathBuf))
                .help("Path to the SQLite database file"),
        )
        .subcommand(
            Command::new("init").about("Create the database if needed and print its path"),
        )
        .subcommand(
            Command::new("register")
                .visible_alias("registro")
                .about("Record a new purchase")
                .arg(Arg::new("activo").long("activo").required(true))
                .arg(tipo_arg("Asset type").required(true))
                .arg(Arg::new("cantidad").long("cantidad").required(true))
                .arg(Arg::new("precio").long("precio").required(true).help("Unit price"))
                .arg(Arg::new("costo").long("costo").required(true).help("Total cost"))
                .arg(Arg::new("dolar").long("dolar").required(true).help("USD exchange rate"))
                .arg(
                    Arg::new("fecha")
                        .long("fecha")
                        .help("Transaction date (YYYY-MM-DD or YYYY-MM-DDTHH:MM:SS), default now"),
                ),
        )
        .subcommand(
            Command::new("update")
                .visible_alias("actualizar")
                .about("Update the given fields of an existing transaction")
                .arg(id_arg("ID of the transaction to update"))
                .arg(Arg::new("activo").long("activo").help("New asset name"))
                .arg(tipo_arg("New asset type"))
                .arg(Arg::new("cantidad").long("cantidad").help("New quantity"))
                .arg(Arg::new("precio").long("precio").help("New unit price"))
                .arg(Arg::new("costo").long("costo").help("New total cost"))
                .arg(Arg::new("dolar").long("dolar").help("New USD exchange rate"))
                .arg(
                    Arg::new("fecha")
                        .long("fecha")
                        .help("New date (YYYY-MM-DD or YYYY-MM-DDTHH:MM:SS)"),
                )
                .arg(
                    Arg::new("set")
                        .long("set")
                        .value_name("CAMPO=VALOR")
                        .action(ArgAction::Append)
                        .help("Set a field by its column name, e.g. --set precio_unitario=101.5"),
                ),
        )
        .subcommand(
            Command::new("query")
                .visible_alias("consulta")
                .about("List transactions, optionally filtered")
                .args(filter_args())
                .arg(Arg::new("json").long("json").action(ArgAction::SetTrue))
                .arg(Arg::new("jsonl").long("jsonl").action(ArgAction::SetTrue))
                .group(ArgGroup::new("output").args(["json", "jsonl"])),
        )
        .subcommand(
            Command::new("delete")
                .visible_alias("borrar")
                .about("Delete a transaction")
                .arg(id_arg("ID of the transaction to delete")),
        )
        .subcommand(
            Command::new("export")
                .visible_alias("exportar")
                .about("Export transactions to CSV or JSON")
                .args(filter_args())
                .arg(
                    Arg::new("format")
                        .long("format")
                        .value_parser(["csv", "json"])
                        .ignore_case(true)
                        .default_value("csv"),
                )
                .arg(Arg::new("out").long("out").required(true)),
        )
}
