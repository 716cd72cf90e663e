mod args;
mod cmd;
mod output;

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::args::ConfigArgs;
use crate::output::print_error;

/// kgen - compile kernel build manifests into a Makefile
#[derive(Parser)]
#[command(name = "kgen")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Enable verbose output
  #[arg(short, long, global = true)]
  verbose: bool,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Generate the build script for a project
  Configure {
    #[command(flatten)]
    config: ConfigArgs,

    /// Where to write the script (default: <root>/Makefile)
    #[arg(short, long)]
    output: Option<std::path::PathBuf>,

    /// Omit the `run` rule that boots the image in an emulator
    #[arg(long)]
    no_run: bool,

    /// Print the script to stdout instead of writing it
    #[arg(long)]
    stdout: bool,
  },

  /// List kernel modules and their dependencies
  Modules {
    #[command(flatten)]
    config: ConfigArgs,

    /// Output as JSON
    #[arg(long)]
    json: bool,
  },

  /// Show host platform and default configuration
  Info,
}

fn main() -> ExitCode {
  let cli = Cli::parse();
  init_tracing(cli.verbose);

  let result = match cli.command {
    Commands::Configure {
      config,
      output,
      no_run,
      stdout,
    } => cmd::cmd_configure(&config, output.as_deref(), no_run, stdout),
    Commands::Modules { config, json } => cmd::cmd_modules(&config, json),
    Commands::Info => cmd::cmd_info(),
  };

  match result {
    Ok(()) => ExitCode::SUCCESS,
    Err(err) => {
      print_error(&format!("{err:#}"));
      ExitCode::FAILURE
    }
  }
}

fn init_tracing(verbose: bool) {
  let default_level = if verbose { "debug" } else { "warn" };
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .without_time()
    .init();
}
