//! CLI argument definitions and shared statics.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::OnceLock;

pub static FILE_GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();
/// Whether the user asked for JSON output (controls structured error output).
pub static JSON_MODE: OnceLock<bool> = OnceLock::new();

#[derive(Parser, Debug)]
#[command(name = "sumo", version, about = "Sumo robot controller")]
pub struct Cli {
    /// Path to config TOML (typed)
    #[arg(long, value_name = "FILE", default_value = "etc/sumo.toml")]
    pub config: PathBuf,

    /// Emit JSON lines (ticks, summaries, logs, errors) instead of text
    #[arg(long, action = ArgAction::SetTrue)]
    pub json: bool,

    /// Console log level (error|warn|info|debug|trace); defaults to [logging].level, then info
    #[arg(long = "log-level", value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Command to execute
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fight a simulated bout
    Run {
        /// Stop after this many ticks (0 runs until Ctrl-C)
        #[arg(long, default_value_t = 3000)]
        ticks: u64,
        /// Override [sim].seed
        #[arg(long)]
        seed: Option<u64>,
        /// Pace the bout with the wall clock instead of simulated time
        #[arg(long, action = ArgAction::SetTrue)]
        realtime: bool,
    },
    /// Feed a recorded sensor trace (CSV) through the controller
    Replay {
        /// Trace CSV with header t_ms,x,y,left,right,close,very_close
        #[arg(long, value_name = "FILE")]
        trace: PathBuf,
    },
    /// Quick health check: config valid, simulated devices respond
    SelfCheck,
}
