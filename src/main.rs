mod compositor;
mod config;
mod error;
mod files;
mod output;
mod raster;
mod tiling;

#[cfg(test)]
mod test_support;

use clap::{Args, Parser, Subcommand};
use log::{error, info};
use std::path::PathBuf;
use std::process::ExitCode;

use compositor::BandCompositor;
use config::{BandSelection, Config, FailurePolicy, TileSize};
use error::ProcessError;
use files::{COMPOSITE_PATTERNS, SourceFile, TILING_PATTERNS, gather_files};
use tiling::TilingEngine;

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Cut orthophotos into georeferenced tiles and render band composites"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Split every .jp2/.ecw raster in a directory into fixed-size GeoTIFF tiles
    Tile {
        /// Rows per tile
        #[arg(short = 'r', long = "row")]
        rows: usize,

        /// Columns per tile
        #[arg(short = 'c', long = "column")]
        cols: usize,

        /// Prepended to every tile file name
        #[arg(short, long)]
        prefix: Option<String>,

        /// EPSG code stamped on every tile
        #[arg(long, default_value_t = config::DEFAULT_EPSG)]
        epsg: u32,

        /// What to do when a source raster cannot be read: fail or skip
        #[arg(long = "on-error", default_value = "fail")]
        on_error: FailurePolicy,

        #[command(flatten)]
        dirs: Dirs,
    },

    /// Render three bands of every .tif in a directory as RGB PNG
    Convert {
        /// Band indices for red, green and blue, e.g. "3,2,1"
        #[arg(short, long)]
        bands: BandSelection,

        /// What to do when a tile cannot be read: fail or skip
        #[arg(long = "on-error", default_value = "skip")]
        on_error: FailurePolicy,

        #[command(flatten)]
        dirs: Dirs,
    },

    /// Tile, then composite the new tiles, configured from a JSON file
    Run { config: PathBuf },
}

#[derive(Args, Debug)]
struct Dirs {
    /// Only report warnings and errors
    #[arg(short, long)]
    quiet: bool,

    input_dir: PathBuf,

    /// Must already exist
    output_dir: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pass {
    Tile,
    Convert,
    Both,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let (pass, config) = match build_config(cli.command) {
        Ok(built) => built,
        Err(e) => {
            init_logging(false);
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    init_logging(config.quiet());
    log_options(pass, &config);

    match run(pass, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(quiet: bool) {
    let level = if quiet { "warn" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn build_config(command: Command) -> Result<(Pass, Config), ProcessError> {
    let built = match command {
        Command::Tile {
            rows,
            cols,
            prefix,
            epsg,
            on_error,
            dirs,
        } => {
            let config = Config::new(dirs.output_dir)
                .with_input_dir(dirs.input_dir)
                .with_quiet(dirs.quiet)
                .with_tile_size(TileSize::new(rows, cols)?)
                .with_prefix(prefix)
                .with_epsg(epsg)
                .with_tile_failure(on_error);
            (Pass::Tile, config)
        }
        Command::Convert {
            bands,
            on_error,
            dirs,
        } => {
            let config = Config::new(dirs.output_dir)
                .with_input_dir(dirs.input_dir)
                .with_quiet(dirs.quiet)
                .with_bands(bands)
                .with_convert_failure(on_error);
            (Pass::Convert, config)
        }
        Command::Run { config } => (Pass::Both, Config::from_file(config)?),
    };

    Ok(built)
}

fn log_options(pass: Pass, config: &Config) {
    info!("Options:");
    if let Ok(input_dir) = config.input_dir() {
        info!("\tInput directory: {}", input_dir.display());
    }
    info!("\tOutput directory: {}", config.output_dir().display());
    if pass != Pass::Convert {
        if let Ok(tile_size) = config.tile_size() {
            info!("\tTile size: {} rows x {} columns", tile_size.rows, tile_size.cols);
        }
        info!("\tPrefix: '{}'", config.prefix());
        info!("\tSpatial reference: EPSG:{}", config.epsg());
        info!("\tOn tiling error: {}", config.tile_failure());
    }
    if pass != Pass::Tile {
        if let Ok(bands) = config.bands() {
            info!("\tBands: {}", bands);
        }
        info!("\tOn convert error: {}", config.convert_failure());
    }
}

fn run(pass: Pass, config: &Config) -> Result<(), ProcessError> {
    config.check_output_dir()?;
    let input_dir = config.input_dir()?;

    match pass {
        Pass::Tile => {
            let engine = TilingEngine::new(config)?;
            let files = gather_files(input_dir, TILING_PATTERNS)?;
            engine.tile_files(&files)?;
        }
        Pass::Convert => {
            let compositor = BandCompositor::new(config)?;
            let files = gather_files(input_dir, COMPOSITE_PATTERNS)?;
            compositor.convert_files(&files)?;
        }
        Pass::Both => {
            let engine = TilingEngine::new(config)?;
            let compositor = BandCompositor::new(config)?;
            let files = gather_files(input_dir, TILING_PATTERNS)?;
            let tiles = engine
                .tile_files(&files)?
                .into_iter()
                .filter_map(SourceFile::from_path)
                .collect::<Vec<_>>();
            compositor.convert_files(&tiles)?;
        }
    }

    Ok(())
}
