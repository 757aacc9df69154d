use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;

use manipulator_lab::application;
use manipulator_lab::config::{NamedColor, Overrides, ViewerConfig, ViewerStyle};
use manipulator_lab::generation;
use manipulator_lab::scene::Subject;
use manipulator_lab::session::ViewerSession;
use manipulator_lab::LabError;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Generation file: a target line, then one line of tab-separated link points per generation
    path: Option<PathBuf>,

    #[arg(long, value_enum)]
    style: Option<ViewerStyle>,

    /// JSON viewer configuration
    #[arg(long)]
    config: Option<PathBuf>,

    /// Segment colors, cycled by segment index
    #[arg(long, value_enum, value_delimiter = ',')]
    palette: Option<Vec<NamedColor>>,

    /// Half the edge of the plot cube
    #[arg(long)]
    axis_limit: Option<f32>,
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
    let config = ViewerConfig::load_or_default(args.config.as_deref())?.with_overrides(Overrides {
        style: args.style,
        palette: args.palette,
        axis_limit: args.axis_limit,
    })?;
    let path = config.generation_path(args.path)?;
    let file = generation::load(&path)?;
    let session = ViewerSession::new(title(&path), file, config.style, &config.palette)?;
    application::run(Subject::Generations(session), &config)
}

fn title(path: &Path) -> String {
    path.file_name()
        .unwrap_or(path.as_os_str())
        .to_string_lossy()
        .into_owned()
}
