use clap::{ArgAction, Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::{filter::LevelFilter, prelude::*};

use self::{replay::ReplayArg, run::RunArg};

mod replay;
mod run;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// Increase log verbosity (-v: debug, -vv: trace)
    #[clap(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Play a timed session driven by a random bot
    Run(#[clap(flatten)] RunArg),
    /// Reduce a fixed action list without pacing and print the result
    Replay(#[clap(flatten)] ReplayArg),
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(LevelFilter::from_level(level))
        .init();
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    init_tracing(args.verbose);
    match args.mode {
        Mode::Run(arg) => run::run(&arg)?,
        Mode::Replay(arg) => replay::run(&arg)?,
    }
    Ok(())
}
