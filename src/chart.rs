//! Overlaid comparison chart of saved average series.
//!
//! Wraps [plotly] to render the four FFC characterization runs
//! into a self-contained HTML file.

use std::path::{Path, PathBuf};

use anyhow::{ensure, Result};
use plotly::common::{Mode, Title};
use plotly::layout::{Axis, Layout};
use plotly::{Plot, Scatter};

use crate::series::AverageSeries;

/// Capture cadence of the calibration rig.
pub const SAMPLE_INTERVAL_SECS: f64 = 5.0;
/// Samples per run; longer runs are clipped to this length.
pub const RUN_SAMPLES: usize = 712;

/// The time axis is sized from this run (the shortest capture).
const REFERENCE_RUN: usize = 2;

const RUN_LABELS: [&str; 4] = [
    "0930 Auto FFC run",
    "1900 Manual FFC run",
    "1230 Auto FFC run",
    "1530 Manual FFC run",
];
const CHART_TITLE: &str =
    "Digital Count in 40\u{b0}C Env, 45\u{b0}C BB, averaged at center (10x10 kernel)";

/// Minutes elapsed at each sample index.
pub fn time_axis(samples: usize) -> Vec<f64> {
    (0..samples)
        .map(|i| i as f64 * SAMPLE_INTERVAL_SECS / 60.0)
        .collect()
}

/// Clips a run to [`RUN_SAMPLES`].
pub fn clip(values: &[f64]) -> &[f64] {
    &values[..values.len().min(RUN_SAMPLES)]
}

/// Loads the four saved series and writes the overlaid line
/// chart to `output` as HTML.
pub fn plot_comparison(runs: &[PathBuf], output: &Path) -> Result<()> {
    ensure!(runs.len() == RUN_LABELS.len(), "expected four series paths");

    let series: Vec<AverageSeries> = runs
        .iter()
        .map(|p| AverageSeries::load(p))
        .collect::<Result<_>>()?;
    for (run, path) in series.iter().zip(runs) {
        ensure!(!run.values.is_empty(), "series {} is empty", path.display());
    }

    let time = time_axis(series[REFERENCE_RUN].values.len());

    let mut plot = Plot::new();
    for (i, (run, label)) in series.iter().zip(&RUN_LABELS).enumerate() {
        let values = if i == REFERENCE_RUN {
            &run.values[..]
        } else {
            clip(&run.values)
        };
        let n = values.len().min(time.len());
        let trace = Scatter::new(time[..n].to_vec(), values[..n].to_vec())
            .mode(Mode::Lines)
            .name(label);
        plot.add_trace(trace);
    }

    let layout = Layout::new()
        .title(Title::new(CHART_TITLE))
        .x_axis(Axis::new().title(Title::new("Minutes")))
        .y_axis(Axis::new().title(Title::new("Digital Count")));
    plot.set_layout(layout);
    plot.write_html(output);

    Ok(())
}
