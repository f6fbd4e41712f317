//! Incident dataset loading for map dashboards.
//!
//! [`load`] reads a table of incident records, drops the rows without
//! coordinates and optionally renames `latitud`/`longitud` to the
//! `latitude`/`longitude` names generic map widgets expect. Results are
//! memoized per `(path, flag)`; failures come back as an empty [`Dataset`]
//! plus an error status message.

pub mod cache;
pub mod config;
pub mod data;
pub mod error;
pub mod loader;
pub mod report;

pub use config::{CoordinateColumns, LoaderConfig};
pub use data::model::{CellValue, Dataset};
pub use error::DataLoadError;
pub use loader::{clear_cache, load, DatasetLoader, DEFAULT_PATH};
pub use report::{LogReporter, RecordingReporter, StatusLevel, StatusMessage, StatusReporter};
