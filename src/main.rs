//! Buildstamp command-line interface
//!
//! Native extension selection and dev version stamping around a package build

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;
use std::process;

/// Display an error with optional backtrace information
fn display_error(err: &anyhow::Error, backtrace_enabled: bool) {
    eprintln!("error: {err}");

    // Show error chain
    let mut source = err.source();
    while let Some(err) = source {
        eprintln!("caused by: {err}");
        source = err.source();
    }

    if backtrace_enabled {
        let backtrace = err.backtrace();
        if backtrace.status() == std::backtrace::BacktraceStatus::Captured {
            eprintln!("\nBacktrace:");
            eprintln!("{backtrace}");
        }
    }
}

#[derive(Parser)]
#[command(name = "buildstamp")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Native extension selection and version stamping for package builds", long_about = None)]
pub(crate) struct Cli {
    /// Project root (directory holding buildstamp.toml)
    #[arg(long, short = 'C', global = true, default_value = ".")]
    root: PathBuf,

    /// Config file to use instead of <root>/buildstamp.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print debug output
    #[arg(long, global = true)]
    debug: bool,

    /// Show a backtrace on errors (requires `RUST_BACKTRACE=1`)
    #[arg(long, global = true)]
    backtrace: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the JSON build plan for the current tree
    Plan,

    /// Print the version a package built now would carry
    Version,

    /// Stamp the version, run the packaging command, restore the version
    Package {
        /// Packaging command (defaults to `package_command` from config)
        #[arg(last = true)]
        command: Vec<String>,
    },

    /// Regenerate native sources from all intermediate sources
    Regenerate,

    /// Delete generated and compiled extension artifacts
    Clean {
        /// Only list what would be deleted
        #[arg(long)]
        dry_run: bool,
    },

    /// Install the post-checkout cleanup hook
    Hook,

    /// Generate shell completion scripts
    Completion {
        /// Shell to generate completions for
        shell: Shell,
    },
}

fn main() {
    let cli = Cli::parse();

    buildstamp::init_debug(cli.debug);

    let result = match cli.command {
        Commands::Completion { shell } => commands::completion::run(shell),
        command => commands::Project::load(&cli.root, cli.config.as_deref()).and_then(|project| {
            match command {
                Commands::Plan => commands::plan::run(&project),
                Commands::Version => commands::version::run(&project),
                Commands::Package { command } => commands::package::run(&project, &command),
                Commands::Regenerate => commands::regenerate::run(&project),
                Commands::Clean { dry_run } => commands::clean::run(&project, dry_run),
                Commands::Hook => commands::hook::run(&project),
                Commands::Completion { shell } => commands::completion::run(shell),
            }
        }),
    };

    if let Err(e) = result {
        display_error(&e, cli.backtrace);
        process::exit(1);
    }
}

mod commands;
