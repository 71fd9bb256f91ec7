// Stats endpoint handlers module
//
// Each handler re-reads the dataset from disk, so responses always reflect
// the current file content. A missing or unreadable dataset surfaces as a
// 500 with a JSON error body.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};
use std::path::Path;

use super::response::{self, json_response};
use crate::config::AppState;
use crate::logger;
use crate::stats::{dataset, query, Table};

/// Columns echoed by the leaderboard endpoint alongside the metric.
const TOP_PLAYER_FIELDS: [&str; 3] = ["PlayerName", "TeamName", "Position"];
/// Columns echoed by the position endpoint alongside the metric.
const POSITION_FIELDS: [&str; 2] = ["PlayerName", "TeamName"];

/// Name of the categorical role column.
const POSITION_COLUMN: &str = "Position";

pub type Reply = (u16, Response<Full<Bytes>>);

/// GET /api/players: every record, every field, in file order.
pub fn all_players(state: &AppState, is_head: bool) -> Reply {
    let cors = state.config.http.enable_cors;
    let table = match load_table(state, cors) {
        Ok(t) => t,
        Err(reply) => return reply,
    };

    let rows: Vec<_> = (0..table.len()).map(|row| table.row(row)).collect();
    (200, json_response(StatusCode::OK, &rows, cors, is_head))
}

/// GET /api/top-players/<metric>: five largest by the resolved column.
pub fn top_players(state: &AppState, metric: &str, is_head: bool) -> Reply {
    let cors = state.config.http.enable_cors;
    let Some(column) = query::resolve_metric(metric) else {
        return (404, response::metric_not_found(cors));
    };

    let table = match load_table(state, cors) {
        Ok(t) => t,
        Err(reply) => return reply,
    };
    let Some(columns) = projection(&table, &TOP_PLAYER_FIELDS, column) else {
        return (500, dataset_schema_error(&table, column, cors));
    };
    let metric_col = columns[columns.len() - 1];

    let top = query::top_rows(&table, metric_col, 0..table.len(), query::TOP_N);
    let rows: Vec<_> = top
        .into_iter()
        .map(|row| table.row_projection(row, &columns))
        .collect();
    (200, json_response(StatusCode::OK, &rows, cors, is_head))
}

/// GET /api/position/<position>/<metric>: five largest within one role.
///
/// The metric map here is the four-entry subset: `gpm` resolves on the
/// leaderboard endpoint but not on this one.
pub fn position_leaders(state: &AppState, position: &str, metric: &str, is_head: bool) -> Reply {
    let cors = state.config.http.enable_cors;
    let Some(column) = query::resolve_position_metric(metric) else {
        return (404, response::metric_not_found(cors));
    };

    let table = match load_table(state, cors) {
        Ok(t) => t,
        Err(reply) => return reply,
    };
    let Some(position_col) = table.column_index(POSITION_COLUMN) else {
        return (500, dataset_schema_error(&table, POSITION_COLUMN, cors));
    };

    let wanted = query::normalize_position(position);
    let matching = query::rows_matching(&table, position_col, &wanted);
    if matching.is_empty() {
        return (404, response::position_not_found(cors));
    }

    let Some(columns) = projection(&table, &POSITION_FIELDS, column) else {
        return (500, dataset_schema_error(&table, column, cors));
    };
    let metric_col = columns[columns.len() - 1];

    let top = query::top_rows(&table, metric_col, matching.into_iter(), query::TOP_N);
    let rows: Vec<_> = top
        .into_iter()
        .map(|row| table.row_projection(row, &columns))
        .collect();
    (200, json_response(StatusCode::OK, &rows, cors, is_head))
}

/// GET /api/positions: distinct roles in first-occurrence order.
pub fn positions(state: &AppState, is_head: bool) -> Reply {
    let cors = state.config.http.enable_cors;
    let table = match load_table(state, cors) {
        Ok(t) => t,
        Err(reply) => return reply,
    };
    let Some(position_col) = table.column_index(POSITION_COLUMN) else {
        return (500, dataset_schema_error(&table, POSITION_COLUMN, cors));
    };

    let values = query::distinct_values(&table, position_col);
    (200, json_response(StatusCode::OK, &values, cors, is_head))
}

fn load_table(state: &AppState, cors: bool) -> Result<Table, Reply> {
    dataset::load(Path::new(&state.config.data.csv_path)).map_err(|e| {
        logger::log_error(&format!("dataset unavailable: {e}"));
        (500, response::internal_error(cors))
    })
}

/// Resolve output field names plus the metric column to indices.
/// The metric column index is always last.
fn projection(table: &Table, fields: &[&str], metric_column: &str) -> Option<Vec<usize>> {
    fields
        .iter()
        .copied()
        .chain(std::iter::once(metric_column))
        .map(|name| table.column_index(name))
        .collect()
}

fn dataset_schema_error(table: &Table, column: &str, cors: bool) -> Response<Full<Bytes>> {
    logger::log_error(&format!(
        "dataset is missing expected column '{}' (have: {})",
        column,
        table.headers().join(", ")
    ));
    response::internal_error(cors)
}
