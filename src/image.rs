use std::{fs::read, path::Path};

use anyhow::{anyhow, Result};
use img_parts::jpeg::Jpeg;
use ndarray::Array2;

use crate::flir::FlirSegment;

/// Raw digital counts extracted from a FLIR R-JPEG.
///
/// The array is shaped `(height, width)` and holds the
/// uncalibrated sensor output per pixel.
pub struct ThermalImage {
    pub counts: Array2<u16>,
}

impl ThermalImage {
    pub fn from_rjpeg(image: &Jpeg) -> Result<Self> {
        let segment = FlirSegment::try_from_jpeg(image)?;
        let counts = segment
            .try_parse_raw_counts()?
            .ok_or_else(|| anyhow!("no raw data record found"))?;
        Ok(ThermalImage { counts })
    }

    pub fn from_rjpeg_path(path: impl AsRef<Path>) -> Result<Self> {
        let image = Jpeg::from_bytes(read(path)?.into())?;
        Self::from_rjpeg(&image)
    }

    /// Shape as `(height, width)`.
    pub fn dim(&self) -> (usize, usize) {
        self.counts.dim()
    }
}
