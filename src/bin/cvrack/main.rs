//! cvrack - plays an ADSR-gated polyphonic patch through the VC mixer
//!
//! Run with: cargo run --bin cvrack -- --bpm 100 --attack 0.2

mod app;
mod console;
mod patch;

use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Command line configuration for the demo rack.
#[derive(Parser, Debug, Clone)]
#[command(name = "cvrack")]
#[command(about = "ADSR and polyphonic VC mixer demo host", long_about = None)]
pub struct Args {
    /// Gate clock tempo in beats per minute
    #[arg(long, default_value_t = 120.0)]
    pub bpm: f32,

    /// Fraction of each beat the gate is held, in [0, 1]
    #[arg(long, default_value_t = 0.5)]
    pub gate_length: f32,

    /// ADSR attack knob, in [0, 1]
    #[arg(long, default_value_t = 0.2)]
    pub attack: f32,

    /// ADSR decay knob, in [0, 1]
    #[arg(long, default_value_t = 0.5)]
    pub decay: f32,

    /// ADSR sustain level, in [0, 1]
    #[arg(long, default_value_t = 0.5)]
    pub sustain: f32,

    /// ADSR release knob, in [0, 1]
    #[arg(long, default_value_t = 0.5)]
    pub release: f32,

    /// Mixer master level, in [0, 2]
    #[arg(long, default_value_t = 1.0)]
    pub master: f32,

    /// Play for this many seconds instead of reading commands from stdin
    #[arg(short, long)]
    pub duration: Option<f32>,

    /// Log at debug level
    #[arg(short, long)]
    pub verbose: bool,
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let args = Args::parse();

    let filter = if args.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    app::run(&args)
}
