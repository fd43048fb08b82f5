//! `sumo` binary: simulated bouts, trace replay, and a self-check.

mod bout;
mod cli;
mod error_fmt;
mod logging;
mod replay;
mod report;

use std::fs;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use clap::Parser;
use eyre::WrapErr;

use crate::cli::{Cli, Commands, JSON_MODE};
use crate::error_fmt::{exit_code_for_error, format_error_json, humanize};
use crate::report::{print_summary, summary_json};

fn main() {
    let cli = Cli::parse();
    let _ = JSON_MODE.set(cli.json);

    if let Err(err) = real_main(cli) {
        if JSON_MODE.get().copied().unwrap_or(false) {
            println!("{}", format_error_json(&err));
        } else {
            eprintln!("{}", humanize(&err));
        }
        std::process::exit(exit_code_for_error(&err));
    }
}

fn load_config(cli: &Cli) -> eyre::Result<sumo_config::Config> {
    let text = fs::read_to_string(&cli.config)
        .wrap_err_with(|| format!("read config {}", cli.config.display()))?;
    let cfg = sumo_config::load_toml(&text).wrap_err("parse config TOML")?;
    cfg.validate().wrap_err("invalid configuration")?;
    Ok(cfg)
}

fn real_main(cli: Cli) -> eyre::Result<()> {
    color_eyre::install()?;
    let cfg = load_config(&cli)?;

    let level = cli
        .log_level
        .clone()
        .or_else(|| cfg.logging.level.clone())
        .unwrap_or_else(|| "info".to_string());
    logging::init(cli.json, &level, &cfg.logging)?;
    tracing::debug!(config = %cli.config.display(), "config loaded");

    match cli.cmd {
        Commands::Run {
            ticks,
            seed,
            realtime,
        } => {
            let shutdown = Arc::new(AtomicBool::new(false));
            {
                let flag = Arc::clone(&shutdown);
                ctrlc::set_handler(move || flag.store(true, Ordering::Relaxed))
                    .wrap_err("install Ctrl-C handler")?;
            }
            let summary = bout::run_bout(&cfg, ticks, seed, realtime, cli.json, &shutdown)?;
            if cli.json {
                println!("{}", summary_json(&summary, None));
            } else {
                print_summary("bout", &summary);
            }
        }
        Commands::Replay { trace } => {
            let summary = replay::replay(&cfg, &trace, cli.json)?;
            if cli.json {
                println!("{}", summary_json(&summary, None));
            } else {
                print_summary("replay", &summary);
            }
        }
        Commands::SelfCheck => {
            let summary = bout::self_check(&cfg)?;
            if cli.json {
                println!(
                    "{}",
                    serde_json::json!({ "status": "ok", "ticks": summary.ticks })
                );
            } else {
                println!("self-check ok: {} ticks, drive stopped", summary.ticks);
            }
        }
    }
    Ok(())
}
