//! Persisted time series of per-image averages.

use std::{
    fs::File,
    io::{BufReader, BufWriter},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde_derive::*;

pub const SERIES_EXTENSION: &str = "json";

/// One average per processed image, in the directory traversal
/// order at capture time.
///
/// Serialized as JSON; `serde_json` emits shortest round-trip
/// float representations, so saved values reload exactly.
#[derive(Serialize, Deserialize, Debug, PartialEq)]
pub struct AverageSeries {
    pub kernel_size: usize,
    pub values: Vec<f64>,
}

impl AverageSeries {
    /// Writes the series under `name`, appending the `.json`
    /// extension if `name` has none. Returns the path written.
    pub fn save(&self, name: &Path) -> Result<PathBuf> {
        let path = if name.extension().is_some() {
            name.to_path_buf()
        } else {
            name.with_extension(SERIES_EXTENSION)
        };
        let writer = BufWriter::new(
            File::create(&path)
                .with_context(|| format!("creating series file {}", path.display()))?,
        );
        serde_json::to_writer(writer, self)?;
        Ok(path)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let reader = BufReader::new(
            File::open(path).with_context(|| format!("opening series file {}", path.display()))?,
        );
        Ok(serde_json::from_reader(reader)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_load_round_trips_exactly() -> Result<()> {
        let series = AverageSeries {
            kernel_size: 10,
            values: vec![13424.25, 13424.333333333333, 0.1 + 0.2, f64::MIN_POSITIVE],
        };

        let name = std::env::temp_dir().join(format!("thermal-trend-series-{}", std::process::id()));
        let path = series.save(&name)?;
        assert_eq!(path.extension().unwrap(), SERIES_EXTENSION);

        let loaded = AverageSeries::load(&path)?;
        assert_eq!(loaded, series);

        std::fs::remove_file(path)?;
        Ok(())
    }

    #[test]
    fn explicit_extension_is_kept() -> Result<()> {
        let series = AverageSeries {
            kernel_size: 10,
            values: vec![1.0],
        };
        let name = std::env::temp_dir().join(format!(
            "thermal-trend-series-ext-{}.dat",
            std::process::id()
        ));

        let path = series.save(&name)?;
        assert_eq!(path, name);

        std::fs::remove_file(path)?;
        Ok(())
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(AverageSeries::load(Path::new("no-such-series.json")).is_err());
    }
}
