//! Dataset model and JSON parsing.
//!
//! A dataset is a list of cases; a case is a set of named columns where
//! exactly one column carries the shared X axis (epoch milliseconds) and
//! the rest carry line series. The JSON wire format is column-major:
//!
//! ```json
//! [{
//!   "columns": [["x", 1555718400000, 1555804800000], ["y0", 37, 54]],
//!   "types":   {"x": "x", "y0": "line"},
//!   "names":   {"y0": "Views"},
//!   "colors":  {"y0": "#3DC23F"}
//! }]
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::Deserialize;
use thiserror::Error;

use crate::surface::{Color, ColorParseError};

pub type ColumnId = String;

/// Role of a column within its case.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColumnKind {
    /// The shared horizontal axis, epoch milliseconds.
    X,
    /// A plotted line series.
    Line,
}

impl ColumnKind {
    fn parse(s: &str) -> Option<ColumnKind> {
        match s {
            "x" => Some(ColumnKind::X),
            "line" => Some(ColumnKind::Line),
            _ => None,
        }
    }
}

/// One parsed column with its display metadata.
#[derive(Clone, Debug)]
pub struct Column {
    pub id: ColumnId,
    pub name: String,
    pub color: Color,
    pub kind: ColumnKind,
    pub data: Arc<[f64]>,
    /// Visibility fade, `0.0` hidden to `1.0` fully shown.
    pub alpha: f64,
}

/// One chart case: an X column plus its line columns, in source order.
#[derive(Clone, Debug, Default)]
pub struct DataCase {
    pub columns: IndexMap<ColumnId, Column>,
}

impl DataCase {
    pub fn x_column(&self) -> Option<&Column> {
        self.columns.values().find(|c| c.kind == ColumnKind::X)
    }

    pub fn line_columns(&self) -> impl Iterator<Item = &Column> {
        self.columns.values().filter(|c| c.kind == ColumnKind::Line)
    }
}

pub type Dataset = Vec<DataCase>;

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("invalid dataset JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("case {case}: column array is empty")]
    EmptyColumn { case: usize },
    #[error("case {case}: column {column:?} has no data points")]
    NoDataPoints { case: usize, column: ColumnId },
    #[error("case {case}: first element of a column must be its string id")]
    MissingColumnId { case: usize },
    #[error("case {case}: column {column:?} contains a non-numeric value")]
    NotANumber { case: usize, column: ColumnId },
    #[error("case {case}: column {column:?} has no entry in \"types\"")]
    MissingType { case: usize, column: ColumnId },
    #[error("case {case}: column {column:?} has unknown type {kind:?}")]
    UnknownType {
        case: usize,
        column: ColumnId,
        kind: String,
    },
    #[error("case {case}: expected exactly one x column, found {found}")]
    BadXColumnCount { case: usize, found: usize },
    #[error("case {case}: column {column:?} has {len} points, x has {x_len}")]
    LengthMismatch {
        case: usize,
        column: ColumnId,
        len: usize,
        x_len: usize,
    },
    #[error("case {case}: line column {column:?} has no color")]
    MissingColor { case: usize, column: ColumnId },
    #[error("case {case}: {source}")]
    BadColor {
        case: usize,
        #[source]
        source: ColorParseError,
    },
}

#[derive(Deserialize)]
struct RawCase {
    columns: Vec<Vec<serde_json::Value>>,
    types: HashMap<String, String>,
    #[serde(default)]
    names: HashMap<String, String>,
    #[serde(default)]
    colors: HashMap<String, String>,
}

/// Parse and validate a column-major JSON dataset.
pub fn parse_dataset(json: &str) -> Result<Dataset, DatasetError> {
    let raw: Vec<RawCase> = serde_json::from_str(json)?;
    let mut dataset = Vec::with_capacity(raw.len());
    for (case_idx, raw_case) in raw.into_iter().enumerate() {
        dataset.push(parse_case(case_idx, raw_case)?);
    }
    tracing::debug!(cases = dataset.len(), "dataset parsed");
    Ok(dataset)
}

fn parse_case(case: usize, raw: RawCase) -> Result<DataCase, DatasetError> {
    let mut columns = IndexMap::with_capacity(raw.columns.len());
    for raw_column in &raw.columns {
        let mut cells = raw_column.iter();
        let id = match cells.next() {
            Some(serde_json::Value::String(id)) => id.clone(),
            Some(_) | None => {
                if raw_column.is_empty() {
                    return Err(DatasetError::EmptyColumn { case });
                }
                return Err(DatasetError::MissingColumnId { case });
            }
        };

        let mut data = Vec::with_capacity(raw_column.len() - 1);
        for cell in cells {
            let value = cell.as_f64().ok_or_else(|| DatasetError::NotANumber {
                case,
                column: id.clone(),
            })?;
            data.push(value);
        }
        if data.is_empty() {
            return Err(DatasetError::NoDataPoints { case, column: id });
        }

        let kind_str = raw.types.get(&id).ok_or_else(|| DatasetError::MissingType {
            case,
            column: id.clone(),
        })?;
        let kind = ColumnKind::parse(kind_str).ok_or_else(|| DatasetError::UnknownType {
            case,
            column: id.clone(),
            kind: kind_str.clone(),
        })?;

        let color = match kind {
            ColumnKind::X => Color::TRANSPARENT,
            ColumnKind::Line => {
                let hex = raw
                    .colors
                    .get(&id)
                    .ok_or_else(|| DatasetError::MissingColor {
                        case,
                        column: id.clone(),
                    })?;
                Color::from_hex_str(hex)
                    .map_err(|source| DatasetError::BadColor { case, source })?
            }
        };
        let name = raw.names.get(&id).cloned().unwrap_or_else(|| id.clone());

        columns.insert(
            id.clone(),
            Column {
                id,
                name,
                color,
                kind,
                data: data.into(),
                alpha: 1.0,
            },
        );
    }

    let data_case = DataCase { columns };
    let x_count = data_case
        .columns
        .values()
        .filter(|c| c.kind == ColumnKind::X)
        .count();
    if x_count != 1 {
        return Err(DatasetError::BadXColumnCount {
            case,
            found: x_count,
        });
    }
    let x_len = data_case
        .x_column()
        .map(|c| c.data.len())
        .unwrap_or_default();
    for column in data_case.line_columns() {
        if column.data.len() != x_len {
            return Err(DatasetError::LengthMismatch {
                case,
                column: column.id.clone(),
                len: column.data.len(),
                x_len,
            });
        }
    }
    Ok(data_case)
}
