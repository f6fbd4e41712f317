use super::model::{CellValue, Dataset};
use crate::config::CoordinateColumns;
use crate::error::{DataLoadError, Result};

// ---------------------------------------------------------------------------
// Coordinate validation
// ---------------------------------------------------------------------------

fn require_column(dataset: &Dataset, name: &str) -> Result<usize> {
    dataset
        .column_index(name)
        .ok_or_else(|| DataLoadError::MissingColumn {
            column: name.to_string(),
        })
}

/// Drop every record whose latitude or longitude cell is missing.
///
/// Only rows are removed; the column set and the relative order of the
/// surviving rows are unchanged. Missing values in other columns are kept.
pub fn drop_missing_coordinates(dataset: Dataset, coords: &CoordinateColumns) -> Result<Dataset> {
    let lat_idx = require_column(&dataset, &coords.source_latitude)?;
    let lon_idx = require_column(&dataset, &coords.source_longitude)?;

    let Dataset { columns, rows } = dataset;
    let rows = rows
        .into_iter()
        .filter(|row| present(row, lat_idx) && present(row, lon_idx))
        .collect();

    Ok(Dataset::new(columns, rows))
}

/// A cell past the end of a short row counts as missing.
fn present(row: &[CellValue], idx: usize) -> bool {
    row.get(idx).is_some_and(|cell| !cell.is_missing())
}

// ---------------------------------------------------------------------------
// Map widget adaptation
// ---------------------------------------------------------------------------

/// Rename the source coordinate columns to the names map widgets expect.
/// Columns keep their position.
pub fn rename_for_map_widget(mut dataset: Dataset, coords: &CoordinateColumns) -> Dataset {
    for col in dataset.columns.iter_mut() {
        if *col == coords.source_latitude {
            *col = coords.map_latitude.clone();
        } else if *col == coords.source_longitude {
            *col = coords.map_longitude.clone();
        }
    }
    dataset
}
