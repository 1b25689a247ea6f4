//! react2ng - Convert React function components into Angular components.

use clap::Parser;
use miette::Result;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod cli;
mod config;
mod orchestrator;
mod output;
mod sink;

use cli::Args;
use orchestrator::Orchestrator;

fn main() -> ExitCode {
    let args = Args::parse();

    // Set up miette for nice error output
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .build(),
        )
    }))
    .ok();

    init_tracing(args.verbose);

    match run(args) {
        Ok(exit_code) => exit_code,
        Err(e) => {
            eprintln!("{:?}", e);
            ExitCode::FAILURE
        }
    }
}

/// Log to stderr; `RUST_LOG` overrides the level picked by `--verbose`.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

fn run(args: Args) -> Result<ExitCode> {
    let watch = args.watch;
    let orchestrator = Orchestrator::new(args)?;

    if watch {
        orchestrator.run_watch_mode()?;
        return Ok(ExitCode::SUCCESS);
    }

    let result = orchestrator.run_once()?;
    if result.failed > 0 {
        Ok(ExitCode::from(1))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}
