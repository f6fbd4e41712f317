/// Data layer: table model, file reading, and cleaning.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  reader  │  parse file → Dataset (raw)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  clean   │  drop rows without coordinates, rename for map widgets
///   └──────────┘
///        │
///        ▼
///     Dataset     columns + rows of CellValue
/// ```

pub mod clean;
pub mod model;
pub mod reader;
