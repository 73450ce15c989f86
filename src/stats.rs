//! Digital count averages over single images and directories.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{ensure, Result};
use indicatif::{ProgressBar, ProgressStyle};
use ndarray::{s, Array2};

use crate::ThermalImage;

/// Side length of the averaging window, in pixels.
pub const DEFAULT_KERNEL_SIZE: usize = 10;

/// Filename suffix of radiometric captures in a directory.
pub const RADIOMETRIC_SUFFIX: &str = "_R.jpg";

/// Square averaging window fixed at an image's geometric center.
///
/// The window covers `[c - k/2, c + k/2)` along each axis, so an
/// even kernel size `k` yields exactly `k * k` pixels.
#[derive(Debug, Clone, Copy)]
pub struct CenterKernel {
    center: (usize, usize),
    half: usize,
}

impl CenterKernel {
    pub fn for_dim(dim: (usize, usize), kernel_size: usize) -> Self {
        CenterKernel {
            center: (dim.0 / 2, dim.1 / 2),
            half: kernel_size / 2,
        }
    }

    /// Mean digital count inside the window.
    pub fn mean(&self, counts: &Array2<u16>) -> Result<f64> {
        let (cy, cx) = self.center;
        let (ht, wid) = counts.dim();

        ensure!(self.half > 0, "kernel size must be at least 2");
        ensure!(
            self.half <= cy && cy + self.half <= ht && self.half <= cx && cx + self.half <= wid,
            "kernel exceeds image bounds: center ({}, {}), half-width {}, image {}x{}",
            cy,
            cx,
            self.half,
            ht,
            wid
        );

        let patch = counts.slice(s![
            cy - self.half..cy + self.half,
            cx - self.half..cx + self.half
        ]);
        let sum: f64 = patch.iter().map(|&v| f64::from(v)).sum();
        Ok(sum / patch.len() as f64)
    }
}

/// Mean digital count across the whole image.
pub fn image_average(counts: &Array2<u16>) -> f64 {
    counts.iter().map(|&v| f64::from(v)).sum::<f64>() / counts.len() as f64
}

/// Radiometric captures (`*_R.jpg`) in a directory, in
/// directory-listing order. No sort is applied.
pub fn matching_images(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut paths = vec![];
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_name().to_string_lossy().ends_with(RADIOMETRIC_SUFFIX) {
            paths.push(entry.path());
        }
    }
    Ok(paths)
}

/// Center-kernel average of every radiometric capture in `dir`,
/// one value per file, in listing order.
///
/// The window geometry is fixed from the first image; a decode
/// failure on any file aborts the whole batch.
pub fn directory_averages(dir: &Path, kernel_size: usize) -> Result<Vec<f64>> {
    let paths = matching_images(dir)?;

    let bar = ProgressBar::new(paths.len() as u64);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {wide_bar:cyan/blue} {pos:>7}/{len:7}"),
    );

    let mut kernel: Option<CenterKernel> = None;
    let mut averages = Vec::with_capacity(paths.len());
    for path in &paths {
        let image = ThermalImage::from_rjpeg_path(path)?;
        let k = *kernel.get_or_insert_with(|| CenterKernel::for_dim(image.dim(), kernel_size));
        averages.push(k.mean(&image.counts)?);
        bar.inc(1);
    }
    bar.finish();

    Ok(averages)
}
