use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// hydroscope: inspect and compare distributed hydrological model output.
#[derive(Parser)]
#[command(
    name = "hydroscope",
    version,
    about = "Inspect, compare and score distributed hydrological model output"
)]
pub struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Path to the TOML library file listing the models.
    #[arg(short, long, global = true, default_value = "hydroscope.toml")]
    pub config: PathBuf,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand)]
pub enum Command {
    /// List the loaded models, their elements and variables.
    Info(InfoArgs),
    /// Plot frame for one variable at one element, optionally scored.
    Series(SeriesArgs),
    /// Map frame for one variable at one time step.
    Map(MapArgs),
    /// Outlet discharge plot frame, optionally scored.
    Discharge(DischargeArgs),
    /// Write every model's series at one element to CSV.
    Export(ExportArgs),
}

/// Where JSON output goes.
#[derive(clap::Args)]
pub struct OutputArgs {
    /// Write JSON here instead of stdout.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Observed overlay and plot view options shared by plotting commands.
#[derive(clap::Args)]
pub struct ViewArgs {
    /// Observed series (date, value) to overlay and score against.
    #[arg(long)]
    pub observed: Option<PathBuf>,

    /// Plot monthly means.
    #[arg(long)]
    pub monthly: bool,

    /// Zoom level 0-100 around the cursor.
    #[arg(long)]
    pub zoom: Option<u8>,
}

/// Arguments for the `info` subcommand.
#[derive(clap::Args)]
pub struct InfoArgs {
    /// Include every placed element with its centroid and elevation.
    #[arg(long)]
    pub elements: bool,

    #[command(flatten)]
    pub output: OutputArgs,
}

/// Arguments for the `series` subcommand.
#[derive(clap::Args)]
pub struct SeriesArgs {
    /// Variable name, e.g. ph_depth or table_elev.
    #[arg(long)]
    pub variable: String,

    /// Element number.
    #[arg(short, long)]
    pub element: u32,

    /// Model whose time axis positions the cursor (name or index).
    #[arg(short, long)]
    pub model: Option<String>,

    /// Cursor time index.
    #[arg(short, long, default_value_t = 0)]
    pub time: usize,

    /// Plot the selected model minus this model (name or index).
    #[arg(long)]
    pub difference: Option<String>,

    #[command(flatten)]
    pub view: ViewArgs,

    #[command(flatten)]
    pub output: OutputArgs,
}

/// Arguments for the `map` subcommand.
#[derive(clap::Args)]
pub struct MapArgs {
    /// Variable name, e.g. ph_depth or table_elev.
    #[arg(long)]
    pub variable: String,

    /// Time index.
    #[arg(short, long, default_value_t = 0)]
    pub time: usize,

    /// Model to map (name or index).
    #[arg(short, long)]
    pub model: Option<String>,

    /// Subtract this model (name or index).
    #[arg(long)]
    pub difference: Option<String>,

    #[command(flatten)]
    pub output: OutputArgs,
}

/// Arguments for the `discharge` subcommand.
#[derive(clap::Args)]
pub struct DischargeArgs {
    #[command(flatten)]
    pub view: ViewArgs,

    #[command(flatten)]
    pub output: OutputArgs,
}

/// Arguments for the `export` subcommand.
#[derive(clap::Args)]
pub struct ExportArgs {
    /// Variable name, e.g. ph_depth or table_elev.
    #[arg(long)]
    pub variable: String,

    /// Element number.
    #[arg(short, long)]
    pub element: u32,

    /// Directory to write the CSV into.
    #[arg(short, long, default_value = ".")]
    pub dir: PathBuf,
}
