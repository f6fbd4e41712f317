use std::path::Path;
use std::sync::{Arc, OnceLock};

use log::debug;

use crate::cache::{CacheKey, DatasetCache};
use crate::config::LoaderConfig;
use crate::data::clean::{drop_missing_coordinates, rename_for_map_widget};
use crate::data::model::Dataset;
use crate::data::reader::read_table;
use crate::error::Result;
use crate::report::{LogReporter, StatusReporter};

/// File the dashboard reads when no path is given.
pub const DEFAULT_PATH: &str = "df_streamlit.csv";

// ---------------------------------------------------------------------------
// DatasetLoader
// ---------------------------------------------------------------------------

/// Reads, cleans and memoizes incident datasets.
///
/// Status messages go to the injected reporter, once per computation: a
/// cache hit is silent.
pub struct DatasetLoader {
    config: LoaderConfig,
    reporter: Arc<dyn StatusReporter>,
    cache: DatasetCache,
}

impl DatasetLoader {
    pub fn new(config: LoaderConfig, reporter: Arc<dyn StatusReporter>) -> Self {
        Self {
            config,
            reporter,
            cache: DatasetCache::new(),
        }
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Load the dataset at `path`, never failing.
    ///
    /// Any read, parse or schema failure is reported as an error message and
    /// turned into an empty dataset (no rows, no columns).
    pub fn load(&self, path: impl AsRef<Path>, adapt_for_map_widget: bool) -> Arc<Dataset> {
        match self.try_load(path, adapt_for_map_widget) {
            Ok(dataset) => dataset,
            Err(e) => {
                self.reporter.error(format!("Error loading dataset: {e}"));
                Arc::new(Dataset::empty())
            }
        }
    }

    /// Same pipeline as [`load`](Self::load) but hands the failure back
    /// instead of reporting it.
    pub fn try_load(
        &self,
        path: impl AsRef<Path>,
        adapt_for_map_widget: bool,
    ) -> Result<Arc<Dataset>> {
        let path = path.as_ref();
        let key = CacheKey {
            path: path.to_path_buf(),
            adapt_for_map_widget,
        };
        self.cache
            .get_or_compute(key, || self.compute(path, adapt_for_map_widget))
    }

    /// Forget every cached dataset; the next call re-reads its file.
    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    fn compute(&self, path: &Path, adapt_for_map_widget: bool) -> Result<Dataset> {
        debug!(
            "loading {} (adapt_for_map_widget={adapt_for_map_widget})",
            path.display()
        );
        let coords = &self.config.coordinates;

        let raw = read_table(path, self.config.delimiter_byte()?)?;
        self.reporter
            .info(format!("File loaded: {} total records.", raw.len()));

        let mut dataset = drop_missing_coordinates(raw, coords)?;
        self.reporter.success(format!(
            "Clean data: {} records with valid coordinates.",
            dataset.len()
        ));

        if adapt_for_map_widget {
            dataset = rename_for_map_widget(dataset, coords);
            self.reporter.note(format!(
                "Columns renamed to '{}' and '{}' for the map widget.",
                coords.map_latitude, coords.map_longitude
            ));
        }

        Ok(dataset)
    }
}

// ---------------------------------------------------------------------------
// Process-wide loader
// ---------------------------------------------------------------------------

static GLOBAL: OnceLock<DatasetLoader> = OnceLock::new();

fn global() -> &'static DatasetLoader {
    GLOBAL.get_or_init(|| DatasetLoader::new(LoaderConfig::default(), Arc::new(LogReporter)))
}

/// Load through the process-wide loader, reporting via the `log` facade.
pub fn load(path: impl AsRef<Path>, adapt_for_map_widget: bool) -> Arc<Dataset> {
    global().load(path, adapt_for_map_widget)
}

/// Clear the process-wide cache.
pub fn clear_cache() {
    global().clear_cache();
}
