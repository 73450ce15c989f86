//! Grayscale heatmap rendering of raw digital counts.

use std::{fs::File, io::BufWriter, path::Path};

use anyhow::{ensure, Result};
use byteordered::ByteOrdered;
use itertools::iproduct;
use ndarray::Array2;

/// Width of the vertical color-scale bar, in pixels.
const SCALE_BAR_WIDTH: usize = 16;
/// Gap between the image and the scale bar, in pixels.
const SCALE_BAR_GAP: usize = 8;

/// Writes the counts as a 16-bit grayscale PNG, normalized to the
/// image's own min/max range, with a color-scale bar along the
/// right edge (full scale at the top, zero at the bottom).
pub fn write_heatmap(counts: &Array2<u16>, path: &Path) -> Result<()> {
    let (ht, wid) = counts.dim();
    ensure!(ht > 0 && wid > 0, "cannot render an empty image");

    let (min, max) = count_range(counts);
    let out_wid = wid + SCALE_BAR_GAP + SCALE_BAR_WIDTH;

    let image_writer = BufWriter::new(File::create(path)?);
    let mut png_writer = {
        let mut encoder = png::Encoder::new(image_writer, out_wid as u32, ht as u32);
        encoder.set_color(png::ColorType::Grayscale);
        encoder.set_depth(png::BitDepth::Sixteen);
        encoder.write_header()?
    };
    let mut png_streamer = ByteOrdered::be(png_writer.stream_writer());

    for (row, col) in iproduct!(0..ht, 0..out_wid) {
        let val = if col < wid {
            normalize(counts[(row, col)], min, max)
        } else if col < wid + SCALE_BAR_GAP {
            0
        } else {
            scale_bar_level(row, ht)
        };
        png_streamer.write_u16(val)?;
    }
    png_streamer.into_inner().finish()?;

    eprintln!("scale: {} (bottom of bar) to {} (top of bar) counts", min, max);
    Ok(())
}

fn count_range(counts: &Array2<u16>) -> (u16, u16) {
    counts
        .iter()
        .fold((u16::MAX, u16::MIN), |(lo, hi), &v| (lo.min(v), hi.max(v)))
}

fn normalize(v: u16, min: u16, max: u16) -> u16 {
    if max == min {
        return 0;
    }
    let frac = f64::from(v.saturating_sub(min)) / f64::from(max - min);
    (frac * f64::from(u16::MAX)).round() as u16
}

fn scale_bar_level(row: usize, height: usize) -> u16 {
    if height <= 1 {
        return u16::MAX;
    }
    let frac = 1.0 - row as f64 / (height - 1) as f64;
    (frac * f64::from(u16::MAX)).round() as u16
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;

    #[test]
    fn normalization_spans_full_depth() {
        assert_eq!(normalize(100, 100, 300), 0);
        assert_eq!(normalize(300, 100, 300), u16::MAX);
        assert_eq!(normalize(200, 100, 300), u16::MAX / 2 + 1);
    }

    #[test]
    fn flat_image_normalizes_to_zero() {
        assert_eq!(normalize(42, 42, 42), 0);
    }

    #[test]
    fn scale_bar_runs_top_to_bottom() {
        assert_eq!(scale_bar_level(0, 100), u16::MAX);
        assert_eq!(scale_bar_level(99, 100), 0);
    }

    #[test]
    fn count_range_finds_extremes() {
        let counts = Array2::from_shape_vec((2, 2), vec![9u16, 3, 7, 12]).unwrap();
        assert_eq!(count_range(&counts), (3, 12));
    }

    #[test]
    fn writes_a_png_with_scale_bar() -> Result<()> {
        let counts = Array2::from_shape_fn((8, 8), |(y, x)| (y * 8 + x) as u16);
        let path = std::env::temp_dir().join(format!(
            "thermal-trend-heatmap-{}.png",
            std::process::id()
        ));

        write_heatmap(&counts, &path)?;
        let bytes = std::fs::read(&path)?;
        assert_eq!(&bytes[1..4], b"PNG");

        std::fs::remove_file(path)?;
        Ok(())
    }

    #[test]
    fn empty_image_is_rejected() {
        let counts = Array2::<u16>::zeros((0, 0));
        assert!(write_heatmap(&counts, Path::new("unused.png")).is_err());
    }
}
