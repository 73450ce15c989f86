mod args;

use std::path::PathBuf;

use anyhow::Result;

use thermal_trend::cli::{path_kind, PathKind};
use thermal_trend::{chart, heatmap, series::AverageSeries, stats, ThermalImage};

use args::Args;

fn main() -> Result<()> {
    let args = Args::from_cmd_line()?;

    if let Some(path) = &args.path {
        match path_kind(path) {
            PathKind::Directory => {
                if let Some(name) = &args.array {
                    eprintln!(
                        "Computing averages for all images in directory: {}",
                        path.display()
                    );
                    let values = stats::directory_averages(path, args.kernel_size)?;
                    let series = AverageSeries {
                        kernel_size: args.kernel_size,
                        values,
                    };
                    let out = series.save(name)?;
                    eprintln!("Saved {} averages to {}", series.values.len(), out.display());
                } else {
                    println!("No output array name provided (-a). Use -a to save results.");
                }
            }
            PathKind::File => {
                let image = ThermalImage::from_rjpeg_path(path)?;
                if args.show {
                    let out = args
                        .output
                        .clone()
                        .unwrap_or_else(|| path.with_extension("png"));
                    heatmap::write_heatmap(&image.counts, &out)?;
                    eprintln!("Wrote heatmap to {}", out.display());
                }
                if args.single {
                    println!(
                        "The average for the image is {:.3}",
                        stats::image_average(&image.counts)
                    );
                    let kernel = stats::CenterKernel::for_dim(image.dim(), args.kernel_size);
                    println!(
                        "The center {0}x{0} kernel average is {1:.3}",
                        args.kernel_size,
                        kernel.mean(&image.counts)?
                    );
                }
            }
            PathKind::Missing => println!("Invalid path: {}", path.display()),
        }
    }

    if let Some(runs) = &args.plot {
        let out = args
            .output
            .clone()
            .unwrap_or_else(|| PathBuf::from("comparison.html"));
        chart::plot_comparison(runs, &out)?;
        eprintln!("Wrote comparison chart to {}", out.display());
    }

    Ok(())
}
