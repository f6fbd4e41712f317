use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::error::DataLoadError;

// ---------------------------------------------------------------------------
// Column naming
// ---------------------------------------------------------------------------

/// Source and map-widget names of the two coordinate columns.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CoordinateColumns {
    pub source_latitude: String,
    pub source_longitude: String,
    pub map_latitude: String,
    pub map_longitude: String,
}

impl Default for CoordinateColumns {
    fn default() -> Self {
        Self {
            source_latitude: "latitud".to_string(),
            source_longitude: "longitud".to_string(),
            map_latitude: "latitude".to_string(),
            map_longitude: "longitude".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Loader configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    pub coordinates: CoordinateColumns,
    /// Field delimiter for delimited text input.
    pub delimiter: char,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            coordinates: CoordinateColumns::default(),
            delimiter: ',',
        }
    }
}

impl LoaderConfig {
    /// Read a config from a JSON file. Missing keys fall back to defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: LoaderConfig = serde_json::from_str(&text).context("parsing config JSON")?;
        config.delimiter_byte()?;
        Ok(config)
    }

    /// Delimiter as the byte the CSV reader expects.
    pub fn delimiter_byte(&self) -> Result<u8, DataLoadError> {
        if self.delimiter.is_ascii() {
            Ok(self.delimiter as u8)
        } else {
            Err(DataLoadError::InvalidDelimiter(self.delimiter))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn partial_config_uses_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"delimiter": ";", "coordinates": {{"map_latitude": "lat"}}}}"#).unwrap();

        let config = LoaderConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.delimiter_byte().unwrap(), b';');
        assert_eq!(config.coordinates.map_latitude, "lat");
        assert_eq!(config.coordinates.source_latitude, "latitud");
        assert_eq!(config.coordinates.map_longitude, "longitude");
    }

    #[test]
    fn non_ascii_delimiter_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"delimiter": "§"}}"#).unwrap();
        assert!(LoaderConfig::from_json_file(file.path()).is_err());
    }

    #[test]
    fn non_ascii_delimiter_built_in_code_is_an_error() {
        let config = LoaderConfig {
            delimiter: '¦',
            ..LoaderConfig::default()
        };
        assert!(matches!(
            config.delimiter_byte(),
            Err(DataLoadError::InvalidDelimiter('¦'))
        ));
    }
}
