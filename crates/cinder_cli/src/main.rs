//! Cinder CLI: inspect the Cyclone V style device model from the command line.
//!
//! Provides `cinder info` for a device summary, `cinder bel` and `cinder wire`
//! for looking up individual resources by name, and `cinder pin` for resolving
//! package pins to I/O bels.

#![warn(missing_docs)]

mod device;
mod info;
mod query;

use std::io::IsTerminal;
use std::process;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Cinder: a Cyclone V style device model.
#[derive(Parser, Debug)]
#[command(name = "cinder", version, about = "Cinder FPGA device model")]
pub struct Cli {
    /// Print reports and errors only, no warnings.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Also print construction progress and control-slot traces.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// When to colour diagnostics.
    #[arg(long, global = true, value_enum, default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,

    /// Read the device selection from this file instead of `./cinder.toml`.
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// What to inspect.
    #[command(subcommand)]
    pub command: Command,
}

/// Inspection commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Summarize the selected device.
    Info(InfoArgs),
    /// Show a bel, its type and its pins.
    Bel(QueryArgs),
    /// Show a wire and its neighbours in the routing graph.
    Wire(QueryArgs),
    /// Resolve a package pin to its I/O bel.
    Pin(QueryArgs),
}

/// Device selection shared by every subcommand.
///
/// Without either flag the device comes from `--config`, or from a
/// `cinder.toml` in the current directory.
#[derive(Args, Debug, Clone, Default)]
pub struct DeviceArgs {
    /// Named part, e.g. `5CSEMA5F31C6`.
    #[arg(short, long, conflicts_with = "grid")]
    pub part: Option<String>,

    /// Synthetic grid size, e.g. `8x6`.
    #[arg(short, long, value_parser = parse_grid)]
    pub grid: Option<(u32, u32)>,
}

/// Arguments for `cinder info`.
#[derive(Args, Debug)]
pub struct InfoArgs {
    /// Device selection.
    #[command(flatten)]
    pub device: DeviceArgs,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,
}

/// Arguments for the lookup subcommands.
#[derive(Args, Debug)]
pub struct QueryArgs {
    /// Resource name, e.g. `1.1.ALM0_COMB0`, `WIRE.1.1.CLK0` or `PIN_L3`.
    pub name: String,

    /// Device selection.
    #[command(flatten)]
    pub device: DeviceArgs,
}

/// `--color` values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
    /// Colour when stderr is a terminal.
    Auto,
    /// Always colour.
    Always,
    /// Plain text.
    Never,
}

impl ColorChoice {
    fn enabled(self) -> bool {
        match self {
            ColorChoice::Auto => std::io::stderr().is_terminal(),
            ColorChoice::Always => true,
            ColorChoice::Never => false,
        }
    }
}

/// `info --format` values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Aligned columns.
    Text,
    /// A JSON object.
    Json,
}

/// The flags every subcommand sees, with `--color` resolved.
pub struct GlobalArgs {
    /// `--quiet`.
    pub quiet: bool,
    /// `--verbose`.
    pub verbose: bool,
    /// Whether diagnostics get ANSI colour.
    pub color: bool,
    /// `--config`.
    pub config: Option<String>,
}

impl GlobalArgs {
    fn from_cli(cli: &Cli) -> Self {
        Self {
            quiet: cli.quiet,
            verbose: cli.verbose,
            color: cli.color.enabled(),
            config: cli.config.clone(),
        }
    }
}

fn parse_grid(s: &str) -> Result<(u32, u32), String> {
    let (sx, sy) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{s}'"))?;
    let dim = |v: &str| {
        v.trim()
            .parse::<u32>()
            .map_err(|e| format!("bad grid dimension '{v}': {e}"))
    };
    Ok((dim(sx)?, dim(sy)?))
}

fn main() {
    let cli = Cli::parse();
    let global = GlobalArgs::from_cli(&cli);

    let status = match &cli.command {
        Command::Info(args) => info::run(args, &global),
        Command::Bel(args) => query::bel(args, &global),
        Command::Wire(args) => query::wire(args, &global),
        Command::Pin(args) => query::pin(args, &global),
    }
    .unwrap_or_else(|e| {
        eprintln!("error: {e}");
        1
    });
    process::exit(status);
}
