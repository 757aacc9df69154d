use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use manipulator_lab::application;
use manipulator_lab::config::ViewerConfig;
use manipulator_lab::point_cloud::{scan_file, PointCloudScanner};
use manipulator_lab::scene::Subject;
use manipulator_lab::LabError;

#[derive(Parser, Debug)]
#[command(author, version, about = "Scan a point cloud for its farthest points", long_about = None)]
struct Args {
    /// One point per line, three whitespace-separated coordinates
    path: Option<PathBuf>,

    /// Show the cloud in the 3D viewer after scanning
    #[arg(long)]
    plot: bool,

    /// JSON viewer configuration
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> ExitCode {
    env_logger::init();
    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("{error}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), LabError> {
    let config = ViewerConfig::load_or_default(args.config.as_deref())?;
    let path = config.point_cloud_path(args.path);
    let scanner = if args.plot {
        PointCloudScanner::retaining()
    } else {
        PointCloudScanner::default()
    };
    let scan = scan_file(&path, scanner, |maximum| println!("{maximum}"))?;
    println!("{:?}", scan.axis_maxima.x);
    println!("{:?}", scan.axis_maxima.y);
    println!("{:?}", scan.axis_maxima.z);
    if args.plot {
        let title = path.display().to_string();
        application::run(Subject::PointCloud { title, scan }, &config)?;
    }
    Ok(())
}
