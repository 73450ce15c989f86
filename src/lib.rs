//! Visualize and trend raw digital counts from FLIR
//! radiometric JPEGs (R-JPEGs).
//!
//! This crate provides three operations on R-JPEGs:
//!
//! 1. [Render][heatmap] a single image's raw counts as a
//! grayscale heatmap with a color scale.
//!
//! 2. [Average][stats] the digital counts of a fixed-size
//! kernel centered in the image, for one file or across a
//! directory of captures, the latter persisted as a
//! [time series][series].
//!
//! 3. [Plot][chart] saved series overlaid for comparison
//! between calibration runs.
//!
//! # Parsing R-JPEGs
//!
//! Raw sensor values are parsed directly from the FLIR APP1
//! segments of the JPEG. This is an (incomplete) port of the
//! relevant parts of the excellent [ExifTool] by Phil Harvey
//! and currently supports R-JPEGs with FFF encoded data and
//! 16-bit raw images.
//!
//! ```rust
//! # fn test_compile() -> anyhow::Result<()> {
//! use thermal_trend::ThermalImage;
//! let image = ThermalImage::from_rjpeg_path("image_R.jpg")?;
//! let (height, width) = image.dim();
//! # Ok(())
//! # }
//! ```
//!
//! The values are raw digital counts; no temperature
//! calibration is applied.
//!
//! [ExifTool]: //exiftool.org

pub(crate) mod flir;

pub mod chart;
pub mod heatmap;
pub mod image;
pub mod series;
pub mod stats;

pub mod cli;

pub use crate::image::ThermalImage;
