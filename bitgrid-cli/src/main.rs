use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;

use bitgrid::config::BoardConfig;
use bitgrid::pack::pack_rgba;
use bitgrid::transport;
use bitgrid::unpack::{self, Frame, UnpackReport};

mod image_io;

/// bitgrid CLI: render board snapshots to PNG and pack PNGs back into snapshots
#[derive(Parser)]
#[command(name = "bitgrid", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Suppress non-JSON output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Log decoding details (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Render a base64 snapshot to a PNG image
    Render {
        /// Snapshot file (base64 text)
        input: PathBuf,

        /// Output PNG path
        #[arg(short, long)]
        output: PathBuf,

        #[command(flatten)]
        board: BoardArgs,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Print set-cell statistics for a base64 snapshot
    Stats {
        /// Snapshot file (base64 text)
        input: PathBuf,

        #[command(flatten)]
        board: BoardArgs,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Pack a PNG image into a base64 snapshot
    Pack {
        /// Input PNG path
        input: PathBuf,

        /// Output snapshot file
        #[arg(short, long)]
        output: PathBuf,

        #[command(flatten)]
        board: BoardArgs,
    },
}

#[derive(Args)]
struct BoardArgs {
    /// Board description (TOML with width, height, palette)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Board width in cells
    #[arg(long)]
    width: Option<u32>,

    /// Board height in cells
    #[arg(long)]
    height: Option<u32>,
}

#[derive(Serialize)]
struct Summary {
    file: String,
    width: u32,
    height: u32,
    snapshot_bytes: usize,
    #[serde(flatten)]
    report: UnpackReport,
}

fn board_config(args: &BoardArgs) -> Result<BoardConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let src = fs::read_to_string(path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            BoardConfig::from_toml_str(&src)
                .with_context(|| format!("invalid config: {}", path.display()))?
        }
        None => BoardConfig::default(),
    };
    if let Some(w) = args.width {
        config.width = w;
    }
    if let Some(h) = args.height {
        config.height = h;
    }
    config.validate()?;
    Ok(config)
}

fn read_snapshot(path: &Path) -> Result<Vec<u8>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read snapshot: {}", path.display()))?;
    transport::decode(text.trim())
        .with_context(|| format!("malformed snapshot: {}", path.display()))
}

fn decode_snapshot(path: &Path, config: &BoardConfig) -> Result<(Frame, Summary)> {
    let packed = read_snapshot(path)?;
    let frame = unpack::unpack(&packed, config)?;
    let summary = Summary {
        file: path.display().to_string(),
        width: config.width,
        height: config.height,
        snapshot_bytes: packed.len(),
        report: frame.report,
    };
    Ok((frame, summary))
}

fn print_json(summary: &Summary, pretty: bool) -> Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(summary)?
    } else {
        serde_json::to_string(summary)?
    };
    println!("{json}");
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match cli.command {
        Command::Render {
            input,
            output,
            board,
            pretty,
        } => {
            let config = board_config(&board)?;
            let (frame, summary) = decode_snapshot(&input, &config)?;
            image_io::write_rgba_png(&output, &frame.raster)?;
            if !cli.quiet {
                eprintln!(
                    "rendered {} ({}x{}) to {}",
                    input.display(),
                    config.width,
                    config.height,
                    output.display()
                );
            }
            print_json(&summary, pretty)?;
        }
        Command::Stats {
            input,
            board,
            pretty,
        } => {
            let config = board_config(&board)?;
            let (_, summary) = decode_snapshot(&input, &config)?;
            print_json(&summary, pretty)?;
        }
        Command::Pack {
            input,
            output,
            board,
        } => {
            let raster = image_io::read_rgba_png(&input)?;
            let mut config = board_config(&board)?;
            let sized = board.config.is_some() || board.width.is_some() || board.height.is_some();
            if !sized {
                config.width = raster.width;
                config.height = raster.height;
            } else if (config.width, config.height) != (raster.width, raster.height) {
                bail!(
                    "{} is {}x{}, expected {}x{}",
                    input.display(),
                    raster.width,
                    raster.height,
                    config.width,
                    config.height
                );
            }
            let grid = pack_rgba(&raster.buf, &config)?;
            fs::write(&output, transport::encode(grid.as_bytes()))
                .with_context(|| format!("failed to write snapshot: {}", output.display()))?;
            if !cli.quiet {
                eprintln!(
                    "packed {} ({} of {} cells set) to {}",
                    input.display(),
                    grid.count_set(),
                    grid.cells(),
                    output.display()
                );
            }
        }
    }

    Ok(())
}
