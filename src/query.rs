use chrono::{DateTime, NaiveDateTime, Utc};
use serde_json::Value;
use tokio_postgres::{Row, Statement};

use crate::error::PgConnectorError;
use crate::results::ResultSet;
use crate::types::RowValues;

/// Extract a [`RowValues`] from a `tokio_postgres` row at the given index.
///
/// Dispatches on the postgres type name for the common scalar types; any
/// other type is fetched as text. A failed `try_get` aborts the whole scan
/// with [`PgConnectorError::RowDecode`] naming the offending column.
pub(crate) fn extract_value(row: &Row, idx: usize) -> Result<RowValues, PgConnectorError> {
    let decode = |source| PgConnectorError::RowDecode {
        column: idx,
        source,
    };

    match row.columns()[idx].type_().name() {
        "int2" => {
            let val: Option<i16> = row.try_get(idx).map_err(decode)?;
            Ok(val.map_or(RowValues::Null, |v| RowValues::Int(i64::from(v))))
        }
        "int4" => {
            let val: Option<i32> = row.try_get(idx).map_err(decode)?;
            Ok(val.map_or(RowValues::Null, |v| RowValues::Int(i64::from(v))))
        }
        "int8" => {
            let val: Option<i64> = row.try_get(idx).map_err(decode)?;
            Ok(val.map_or(RowValues::Null, RowValues::Int))
        }
        "float4" => {
            let val: Option<f32> = row.try_get(idx).map_err(decode)?;
            Ok(val.map_or(RowValues::Null, |v| RowValues::Float(f64::from(v))))
        }
        "float8" => {
            let val: Option<f64> = row.try_get(idx).map_err(decode)?;
            Ok(val.map_or(RowValues::Null, RowValues::Float))
        }
        "bool" => {
            let val: Option<bool> = row.try_get(idx).map_err(decode)?;
            Ok(val.map_or(RowValues::Null, RowValues::Bool))
        }
        "timestamp" => {
            let val: Option<NaiveDateTime> = row.try_get(idx).map_err(decode)?;
            Ok(val.map_or(RowValues::Null, RowValues::Timestamp))
        }
        "timestamptz" => {
            // chrono's FromSql for NaiveDateTime only accepts TIMESTAMP;
            // timestamptz comes out as DateTime<Utc> and is stored naive-UTC
            let val: Option<DateTime<Utc>> = row.try_get(idx).map_err(decode)?;
            Ok(val.map_or(RowValues::Null, |v| RowValues::Timestamp(v.naive_utc())))
        }
        "json" | "jsonb" => {
            let val: Option<Value> = row.try_get(idx).map_err(decode)?;
            Ok(val.map_or(RowValues::Null, RowValues::JSON))
        }
        "bytea" => {
            let val: Option<Vec<u8>> = row.try_get(idx).map_err(decode)?;
            Ok(val.map_or(RowValues::Null, RowValues::Blob))
        }
        _ => {
            // text, varchar, char, and everything else as a string
            let val: Option<String> = row.try_get(idx).map_err(decode)?;
            Ok(val.map_or(RowValues::Null, RowValues::Text))
        }
    }
}

/// Materialize driver rows into a [`ResultSet`].
///
/// Column names come from statement metadata, so zero-row results still
/// carry them. Each result row gets a freshly allocated value buffer; rows
/// must never share backing storage.
pub(crate) fn build_result_set(
    stmt: &Statement,
    rows: &[Row],
) -> Result<ResultSet, PgConnectorError> {
    let column_names: Vec<String> = stmt
        .columns()
        .iter()
        .map(|col| col.name().to_string())
        .collect();
    let column_count = column_names.len();

    let mut result_set = ResultSet::with_columns(column_names, rows.len());
    for row in rows {
        let mut values = Vec::with_capacity(column_count);
        for idx in 0..column_count {
            values.push(extract_value(row, idx)?);
        }
        result_set.push_row(values);
    }

    Ok(result_set)
}
