// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use thiserror::Error;

const UPDATABLE_FIELDS: &str =
    "activo, tipo, cantidad, precio_unitario, costo_total, dolar_cambio, fecha";

/// Errors raised by the transaction repository and the patch builder.
#[derive(Debug, Error)]
pub enum Error {
    /// A string-keyed update named a column that cannot be updated.
    #[error("Invalid field '{0}' (expected one of: {fields})", fields = UPDATABLE_FIELDS)]
    InvalidField(String),

    #[error("Invalid value '{value}' for field '{field}': {reason}")]
    InvalidValue {
        field: &'static str,
        value: String,
        reason: String,
    },

    #[error("Nothing to update: specify at least one field")]
    NothingToUpdate,

    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
