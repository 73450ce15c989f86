use std::path::PathBuf;

use anyhow::Result;
use clap::value_t_or_exit;
use thermal_trend::{arg, args_parser, opt, stats::DEFAULT_KERNEL_SIZE};

pub struct Args {
    pub path: Option<PathBuf>,
    pub show: bool,
    pub single: bool,
    pub array: Option<PathBuf>,
    pub plot: Option<Vec<PathBuf>>,
    pub kernel_size: usize,
    pub output: Option<PathBuf>,
}

impl Args {
    pub fn from_cmd_line() -> Result<Args> {
        let matches = args_parser!("thermal-trend")
            .about("Visualize, average and compare FLIR R-JPEG digital counts.")
            .arg(arg!("path").help("Path to a FLIR radiometric JPEG or directory of images"))
            .arg(
                opt!("show")
                    .short("s")
                    .takes_value(false)
                    .help("Write the image as a grayscale heatmap"),
            )
            .arg(
                opt!("single")
                    .short("S")
                    .takes_value(false)
                    .help("Compute average digital counts for one image"),
            )
            .arg(
                opt!("array")
                    .short("a")
                    .help("Name of the series file to save directory averages to"),
            )
            .arg(
                opt!("plot")
                    .short("p")
                    .number_of_values(4)
                    .help("Plot a comparison between four saved series"),
            )
            .arg(
                opt!("kernel size")
                    .short("k")
                    .help("Side of the centered averaging kernel in pixels. Default is 10"),
            )
            .arg(
                opt!("output")
                    .short("o")
                    .help("Output path for the heatmap / comparison chart"),
            )
            .get_matches();

        let path = matches.value_of("path").map(PathBuf::from);
        let show = matches.is_present("show");
        let single = matches.is_present("single");
        let array = matches.value_of("array").map(PathBuf::from);
        let plot = matches
            .values_of("plot")
            .map(|vals| vals.map(PathBuf::from).collect());
        let kernel_size = matches
            .is_present("kernel size")
            .then(|| value_t_or_exit!(matches.value_of("kernel size"), usize))
            .unwrap_or(DEFAULT_KERNEL_SIZE);
        let output = matches.value_of("output").map(PathBuf::from);

        Ok(Args {
            path,
            show,
            single,
            array,
            plot,
            kernel_size,
            output,
        })
    }
}
