//! mrcvol CLI: decode MRC volumes and inspect headers.
#![allow(clippy::uninlined_format_args, clippy::cast_precision_loss)]

use clap::{ArgAction, Parser, Subcommand};

use log::debug;
use mrcvol_core::{SampleKind, VolumeSummary};
use mrcvol_io::MrcFileReader;
use mrcvol_mrc::{coords, DecodeConfig, PixelFormat};
use std::path::PathBuf;
use std::time::Instant;
use thiserror::Error;

/// Result type for CLI operations.
type Result<T> = std::result::Result<T, CliError>;

/// CLI error types.
#[derive(Error, Debug)]
enum CliError {
    #[error("I/O error: {0}")]
    MrcvolIo(#[from] mrcvol_io::Error),

    #[error("Format error: {0}")]
    Format(#[from] mrcvol_mrc::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// MRC/CCP4 volume decoder.
#[derive(Parser)]
#[command(name = "mrcvol")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Decoder configuration file (JSON)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode MRC files and report the volumes produced
    Read {
        /// Input MRC file(s)
        #[arg(required = true)]
        input: Vec<PathBuf>,

        /// Print volume summaries as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show header information for an MRC file
    Info {
        /// Input MRC file
        input: PathBuf,

        /// Print header fields as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config = match &cli.config {
        Some(path) => DecodeConfig::from_file(path)?,
        None => DecodeConfig::default(),
    };
    debug!("decoder configuration: {:?}", config);

    match cli.command {
        Commands::Read { input, json } => {
            let start = Instant::now();
            let bundle = mrcvol_io::read_many(&input, &config)?;
            let elapsed = start.elapsed();

            if json {
                let summaries: Vec<VolumeSummary> =
                    bundle.iter().map(|v| v.summary()).collect();
                println!("{}", serde_json::to_string_pretty(&summaries)?);
                return Ok(());
            }

            println!(
                "Decoded {} volume(s) from {} file(s) in {:.2}s",
                bundle.len(),
                input.len(),
                elapsed.as_secs_f64()
            );
            for kind in SampleKind::ALL {
                let count = bundle.count(kind);
                if count > 0 {
                    println!("  {:<16} {}", kind.name(), count);
                }
            }
            for volume in bundle.iter() {
                let [x, y, z] = volume.dims();
                println!("{}: {} {}x{}x{}", volume.source(), volume.kind(), x, y, z);
            }
        }

        Commands::Info { input, json } => {
            let reader = MrcFileReader::open(&input)?;
            let header = reader.header()?;
            let fields = &header.fields;

            if json {
                println!("{}", serde_json::to_string_pretty(fields)?);
                return Ok(());
            }

            let file_size = reader.file_size();
            println!("File: {}", reader.source());
            println!(
                "Size: {} bytes ({:.2} MB)",
                file_size,
                file_size as f64 / 1_000_000.0
            );
            match PixelFormat::for_header(fields) {
                Ok(format) => println!("Mode: {} ({})", fields.mode, format.kind()),
                Err(_) => println!("Mode: {} (unsupported)", fields.mode),
            }
            println!(
                "Extents (col x row x sec): {} x {} x {}",
                fields.cols, fields.rows, fields.sections
            );
            println!("Axis order: {:?}", fields.axis_order);
            println!(
                "Byte order: {}",
                if fields.little_endian {
                    "little-endian"
                } else {
                    "big-endian"
                }
            );
            println!("Grid: {:?}", fields.grid);
            println!("Cell length: {:?}", fields.cell_length);
            println!(
                "Origin: {:?} ({})",
                coords::select_origin(fields),
                if fields.has_map_marker {
                    "new-style"
                } else {
                    "old-style"
                }
            );
            println!(
                "Density min/max/mean: {} / {} / {}",
                fields.dmin, fields.dmax, fields.dmean
            );
            println!("Space group: {}", fields.ispg);
            println!("Extended header: {} bytes", fields.extended_header_len());
            if fields.is_stamped {
                println!("IMOD flags: {:#x}", fields.flag_bits);
            }
            for (i, label) in fields.active_labels().iter().enumerate() {
                println!("Label {}: {}", i, label.trim_end());
            }
        }
    }

    Ok(())
}
