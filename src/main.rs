mod broll;
mod common;
mod ui;

use clap::Parser;
use std::path::PathBuf;

use crate::broll::{BrollCommands, handle_broll_command};
use crate::ui::prelude::*;

/// Fill timeline gaps with random B-roll
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Activate debug mode
    #[arg(short, long, global = true)]
    debug: bool,

    /// Output format
    #[arg(long, value_enum, default_value = "text", global = true)]
    output: OutputFormat,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Use this config file instead of the default location
    #[arg(long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: BrollCommands,
}

fn main() {
    let cli = Cli::parse();

    ui::init(cli.output, !cli.no_color);
    ui::set_debug_mode(cli.debug);
    emit(Level::Debug, "broll.debug", "Debug mode is on", None);

    if let Err(e) = handle_broll_command(cli.command, cli.config.as_ref()) {
        emit(Level::Error, "broll.error", &format!("Error: {e:#}"), None);
        std::process::exit(1);
    }
}
