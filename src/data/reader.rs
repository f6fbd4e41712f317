use std::fs::File;
use std::path::Path;

use arrow::array::{Array, ArrayRef, AsArray};
use arrow::datatypes::{
    DataType, Float32Type, Float64Type, Int16Type, Int32Type, Int64Type, Int8Type, UInt16Type,
    UInt32Type, UInt64Type, UInt8Type,
};
use arrow::util::display::array_value_to_string;
use log::debug;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{CellValue, Dataset};
use crate::error::{DataLoadError, Result};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// On-disk layouts the reader understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Delimited,
    Json,
    Parquet,
}

impl InputFormat {
    /// Pick a format from the file extension. Anything unrecognised is
    /// treated as delimited text.
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();

        match ext.as_str() {
            "parquet" | "pq" => InputFormat::Parquet,
            "json" => InputFormat::Json,
            _ => InputFormat::Delimited,
        }
    }
}

/// Read a raw (uncleaned) table, preserving column and row order.
pub fn read_table(path: &Path, delimiter: u8) -> Result<Dataset> {
    let format = InputFormat::from_path(path);
    debug!("reading {} as {format:?}", path.display());
    match format {
        InputFormat::Delimited => read_delimited(path, delimiter),
        InputFormat::Json => read_json(path),
        InputFormat::Parquet => read_parquet(path),
    }
}

fn open(path: &Path) -> Result<File> {
    File::open(path).map_err(|source| DataLoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

// ---------------------------------------------------------------------------
// Delimited text
// ---------------------------------------------------------------------------

/// First row is the header. Short records are padded with nulls; a record
/// with more fields than the header is a parse error.
fn read_delimited(path: &Path, delimiter: u8) -> Result<Dataset> {
    let file = open(path)?;
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(file);

    let columns: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();
    if columns.is_empty() {
        return Err(DataLoadError::EmptyInput);
    }

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        if record.len() > columns.len() {
            return Err(DataLoadError::TooManyFields {
                line: record.position().map_or(0, |p| p.line()),
                expected: columns.len(),
                found: record.len(),
            });
        }
        let mut row: Vec<CellValue> = record.iter().map(CellValue::infer).collect();
        row.resize(columns.len(), CellValue::Null);
        rows.push(row);
    }

    Ok(Dataset::new(columns, rows))
}

// ---------------------------------------------------------------------------
// JSON
// ---------------------------------------------------------------------------

/// Records-oriented JSON:
///
/// ```json
/// [
///   { "id": "a", "latitud": 4.61, "longitud": -74.08, "tipo": "robo" },
///   ...
/// ]
/// ```
///
/// Columns appear in first-seen order; keys absent from a record are null.
fn read_json(path: &Path) -> Result<Dataset> {
    let text = std::fs::read_to_string(path).map_err(|source| DataLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let root: JsonValue = serde_json::from_str(&text)?;

    let records = root
        .as_array()
        .ok_or_else(|| DataLoadError::InvalidJson("top level is not an array".to_string()))?;

    let mut columns: Vec<String> = Vec::new();
    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .ok_or_else(|| DataLoadError::InvalidJson(format!("row {i} is not an object")))?;
        for key in obj.keys() {
            if !columns.contains(key) {
                columns.push(key.clone());
            }
        }
    }

    let rows = records
        .iter()
        .filter_map(|rec| rec.as_object())
        .map(|obj| {
            columns
                .iter()
                .map(|col| obj.get(col).map(json_to_cell).unwrap_or(CellValue::Null))
                .collect()
        })
        .collect();

    Ok(Dataset::new(columns, rows))
}

fn json_to_cell(val: &JsonValue) -> CellValue {
    match val {
        JsonValue::String(s) => CellValue::String(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                CellValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                CellValue::Float(f)
            } else {
                CellValue::String(n.to_string())
            }
        }
        JsonValue::Bool(b) => CellValue::Bool(*b),
        JsonValue::Null => CellValue::Null,
        other => CellValue::String(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet
// ---------------------------------------------------------------------------

/// Load a Parquet file; every top-level field becomes a column.
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`).
fn read_parquet(path: &Path) -> Result<Dataset> {
    let file = open(path)?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
    let columns: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let reader = builder.build()?;

    let mut rows = Vec::new();
    for batch_result in reader {
        let batch = batch_result?;
        for row in 0..batch.num_rows() {
            let cells = batch
                .columns()
                .iter()
                .map(|col| arrow_cell(col, row))
                .collect::<Result<Vec<_>>>()?;
            rows.push(cells);
        }
    }

    Ok(Dataset::new(columns, rows))
}

/// Extract a single cell from an Arrow column at a given row.
fn arrow_cell(col: &ArrayRef, row: usize) -> Result<CellValue> {
    if col.is_null(row) {
        return Ok(CellValue::Null);
    }
    let cell = match col.data_type() {
        DataType::Utf8 => CellValue::String(col.as_string::<i32>().value(row).to_string()),
        DataType::LargeUtf8 => CellValue::String(col.as_string::<i64>().value(row).to_string()),
        DataType::Int8 => CellValue::Integer(col.as_primitive::<Int8Type>().value(row).into()),
        DataType::Int16 => CellValue::Integer(col.as_primitive::<Int16Type>().value(row).into()),
        DataType::Int32 => CellValue::Integer(col.as_primitive::<Int32Type>().value(row).into()),
        DataType::Int64 => CellValue::Integer(col.as_primitive::<Int64Type>().value(row)),
        DataType::UInt8 => CellValue::Integer(col.as_primitive::<UInt8Type>().value(row).into()),
        DataType::UInt16 => CellValue::Integer(col.as_primitive::<UInt16Type>().value(row).into()),
        DataType::UInt32 => CellValue::Integer(col.as_primitive::<UInt32Type>().value(row).into()),
        DataType::UInt64 => {
            let v = col.as_primitive::<UInt64Type>().value(row);
            i64::try_from(v)
                .map(CellValue::Integer)
                .unwrap_or(CellValue::Float(v as f64))
        }
        DataType::Float32 => {
            CellValue::Float(col.as_primitive::<Float32Type>().value(row).into())
        }
        DataType::Float64 => CellValue::Float(col.as_primitive::<Float64Type>().value(row)),
        DataType::Boolean => CellValue::Bool(col.as_boolean().value(row)),
        // dates, decimals, nested types: keep their display form
        _ => CellValue::String(array_value_to_string(col, row)?),
    };
    Ok(cell)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::Arc;

    use arrow::array::{Float64Array, Int64Array, StringArray};
    use arrow::datatypes::{Field, Schema};
    use arrow::record_batch::RecordBatch;
    use parquet::arrow::ArrowWriter;
    use tempfile::NamedTempFile;

    fn temp_file(suffix: &str, content: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        write!(file, "{content}").unwrap();
        file
    }

    #[test]
    fn format_follows_extension() {
        assert_eq!(InputFormat::from_path(Path::new("a.CSV")), InputFormat::Delimited);
        assert_eq!(InputFormat::from_path(Path::new("a.json")), InputFormat::Json);
        assert_eq!(InputFormat::from_path(Path::new("a.pq")), InputFormat::Parquet);
        assert_eq!(InputFormat::from_path(Path::new("a")), InputFormat::Delimited);
    }

    #[test]
    fn delimited_keeps_order_and_types() {
        let file = temp_file(".csv", "id,latitud,longitud\nb,4.6,-74.1\na,,3\n");
        let ds = read_table(file.path(), b',').unwrap();

        assert_eq!(ds.columns, vec!["id", "latitud", "longitud"]);
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.rows[0][0], CellValue::String("b".into()));
        assert_eq!(ds.rows[0][1], CellValue::Float(4.6));
        assert_eq!(ds.rows[1][1], CellValue::Null);
        assert_eq!(ds.rows[1][2], CellValue::Integer(3));
    }

    #[test]
    fn delimited_custom_separator() {
        let file = temp_file(".csv", "latitud;longitud\n1;2\n");
        let ds = read_table(file.path(), b';').unwrap();
        assert_eq!(ds.columns, vec!["latitud", "longitud"]);
        assert_eq!(ds.rows[0], vec![CellValue::Integer(1), CellValue::Integer(2)]);
    }

    #[test]
    fn short_row_is_padded_with_nulls() {
        let file = temp_file(".csv", "latitud,longitud,id\n1.0,2.0,a\n3.0,4.0\n");
        let ds = read_table(file.path(), b',').unwrap();

        assert_eq!(ds.len(), 2);
        assert_eq!(
            ds.rows[1],
            vec![CellValue::Float(3.0), CellValue::Float(4.0), CellValue::Null]
        );
    }

    #[test]
    fn long_row_is_parse_error() {
        let file = temp_file(".csv", "latitud,longitud\n1,2\n3,4,5\n");
        let err = read_table(file.path(), b',').unwrap_err();
        match err {
            DataLoadError::TooManyFields { line, expected, found } => {
                assert_eq!((line, expected, found), (3, 2, 3));
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn empty_file_is_parse_error() {
        let file = temp_file(".csv", "");
        let err = read_table(file.path(), b',').unwrap_err();
        assert!(matches!(err, DataLoadError::EmptyInput), "got {err:?}");
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = read_table(Path::new("/definitely/not/here.csv"), b',').unwrap_err();
        assert!(matches!(err, DataLoadError::Io { .. }), "got {err:?}");
    }

    #[test]
    fn json_records_fill_absent_keys_with_null() {
        let file = temp_file(
            ".json",
            r#"[{"id": "a", "latitud": 1.0, "longitud": 2}, {"id": "b", "longitud": 5, "extra": true}]"#,
        );
        let ds = read_table(file.path(), b',').unwrap();

        assert_eq!(ds.columns, vec!["id", "latitud", "longitud", "extra"]);
        assert_eq!(ds.rows[0][3], CellValue::Null);
        assert_eq!(ds.rows[1][1], CellValue::Null);
        assert_eq!(ds.rows[1][3], CellValue::Bool(true));
    }

    #[test]
    fn json_must_be_array_of_objects() {
        let file = temp_file(".json", r#"{"latitud": 1}"#);
        let err = read_table(file.path(), b',').unwrap_err();
        assert!(matches!(err, DataLoadError::InvalidJson(_)), "got {err:?}");

        let file = temp_file(".json", "[1, 2]");
        let err = read_table(file.path(), b',').unwrap_err();
        assert!(matches!(err, DataLoadError::InvalidJson(_)), "got {err:?}");
    }

    #[test]
    fn parquet_reads_nullable_columns() {
        let schema = Arc::new(Schema::new(vec![
            Field::new("id", DataType::Utf8, false),
            Field::new("latitud", DataType::Float64, true),
            Field::new("longitud", DataType::Float64, true),
            Field::new("victims", DataType::Int64, true),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(StringArray::from(vec!["a", "b"])),
                Arc::new(Float64Array::from(vec![Some(4.6), None])),
                Arc::new(Float64Array::from(vec![Some(-74.1), Some(-75.0)])),
                Arc::new(Int64Array::from(vec![Some(2), None])),
            ],
        )
        .unwrap();

        let file = tempfile::Builder::new().suffix(".parquet").tempfile().unwrap();
        let mut writer = ArrowWriter::try_new(File::create(file.path()).unwrap(), schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let ds = read_table(file.path(), b',').unwrap();
        assert_eq!(ds.columns, vec!["id", "latitud", "longitud", "victims"]);
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.rows[0][1], CellValue::Float(4.6));
        assert_eq!(ds.rows[1][1], CellValue::Null);
        assert_eq!(ds.rows[1][3], CellValue::Null);
        assert_eq!(ds.rows[0][3], CellValue::Integer(2));
    }
}
