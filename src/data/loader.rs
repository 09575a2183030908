//! Sales Data Loader Module
//! Reads the representative workbook (calamine) or a CSV export (Polars)
//! into a normalized DataFrame.

use crate::data::columns;
use calamine::{open_workbook_auto, Data, Range, Reader};
use polars::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("No se encontró el archivo: {}", .0.display())]
    NotFound(PathBuf),
    #[error("Unsupported file type: {}", .0.display())]
    UnsupportedFormat(PathBuf),
    #[error("Failed to read workbook: {0}")]
    Workbook(#[from] calamine::Error),
    #[error("Worksheet '{0}' not found")]
    SheetNotFound(String),
    #[error("Workbook has no worksheets")]
    NoSheets,
    #[error("Failed to build table: {0}")]
    Polars(#[from] PolarsError),
}

static EMPTY_CELL: Data = Data::Empty;

/// Inferred storage type of a worksheet column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CellKind {
    Int,
    Float,
    Text,
}

/// Loads and normalizes the sales table.
pub struct DataLoader {
    sheet: Option<String>,
}

impl Default for DataLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl DataLoader {
    pub fn new() -> Self {
        Self { sheet: None }
    }

    /// Read a specific worksheet instead of the first one.
    pub fn with_sheet(sheet: Option<String>) -> Self {
        Self { sheet }
    }

    /// Load the file at `path` and normalize its columns.
    pub fn load(&self, path: &Path) -> Result<DataFrame, LoaderError> {
        if !path.is_file() {
            return Err(LoaderError::NotFound(path.to_path_buf()));
        }

        let extension = path
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        let raw = match extension.as_str() {
            "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => self.read_workbook(path)?,
            "csv" => Self::read_csv(path)?,
            _ => return Err(LoaderError::UnsupportedFormat(path.to_path_buf())),
        };

        let df = columns::normalize(raw)?;
        info!(
            "Loaded {} rows, {} columns from {}",
            df.height(),
            df.width(),
            path.display()
        );
        Ok(df)
    }

    fn read_workbook(&self, path: &Path) -> Result<DataFrame, LoaderError> {
        let mut workbook = open_workbook_auto(path)?;

        let sheet = match &self.sheet {
            Some(name) => {
                if !workbook.sheet_names().iter().any(|s| s == name) {
                    return Err(LoaderError::SheetNotFound(name.clone()));
                }
                name.clone()
            }
            None => workbook
                .sheet_names()
                .first()
                .cloned()
                .ok_or(LoaderError::NoSheets)?,
        };

        debug!("Reading worksheet '{}'", sheet);
        let range = workbook.worksheet_range(&sheet)?;
        range_to_dataframe(&range)
    }

    fn read_csv(path: &Path) -> Result<DataFrame, LoaderError> {
        let df = LazyCsvReader::new(path)
            .with_infer_schema_length(Some(10000))
            .with_ignore_errors(true)
            .finish()?
            .collect()?;
        Ok(df)
    }
}

/// Convert a worksheet range (first row = header) into a DataFrame.
pub fn range_to_dataframe(range: &Range<Data>) -> Result<DataFrame, LoaderError> {
    let mut rows = range.rows();
    let Some(header) = rows.next() else {
        return Ok(DataFrame::empty());
    };
    let body: Vec<&[Data]> = rows.collect();

    let columns = header
        .iter()
        .enumerate()
        .map(|(idx, cell)| {
            let name = match cell {
                Data::Empty => format!("unnamed_{}", idx),
                other => other.to_string(),
            };
            let cells: Vec<&Data> = body
                .iter()
                .map(|row| row.get(idx).unwrap_or(&EMPTY_CELL))
                .collect();
            build_column(&name, &cells)
        })
        .collect::<Vec<_>>();

    Ok(DataFrame::new(columns)?)
}

fn cell_kind(cell: &Data) -> Option<CellKind> {
    match cell {
        Data::Empty => None,
        Data::Int(_) => Some(CellKind::Int),
        Data::Float(f) if f.fract() == 0.0 && f.is_finite() => Some(CellKind::Int),
        Data::Float(_) => Some(CellKind::Float),
        _ => Some(CellKind::Text),
    }
}

fn build_column(name: &str, cells: &[&Data]) -> Column {
    let kind = cells
        .iter()
        .filter_map(|cell| cell_kind(cell))
        .fold(None, |acc: Option<CellKind>, kind| match (acc, kind) {
            (None, k) => Some(k),
            (Some(CellKind::Text), _) | (_, CellKind::Text) => Some(CellKind::Text),
            (Some(CellKind::Float), _) | (_, CellKind::Float) => Some(CellKind::Float),
            (Some(CellKind::Int), CellKind::Int) => Some(CellKind::Int),
        })
        .unwrap_or(CellKind::Text);

    match kind {
        CellKind::Int => {
            let values: Vec<Option<i64>> = cells
                .iter()
                .map(|cell| match cell {
                    Data::Int(i) => Some(*i),
                    Data::Float(f) => Some(*f as i64),
                    _ => None,
                })
                .collect();
            Column::new(name.into(), values)
        }
        CellKind::Float => {
            let values: Vec<Option<f64>> = cells
                .iter()
                .map(|cell| match cell {
                    Data::Int(i) => Some(*i as f64),
                    Data::Float(f) => Some(*f),
                    _ => None,
                })
                .collect();
            Column::new(name.into(), values)
        }
        CellKind::Text => {
            let values: Vec<Option<String>> = cells
                .iter()
                .map(|cell| match cell {
                    Data::Empty => None,
                    other => Some(other.to_string()),
                })
                .collect();
            Column::new(name.into(), values)
        }
    }
}
