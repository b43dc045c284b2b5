use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod config;
mod error;

use config::Config;
use error::{print_error_and_exit, CliError};

#[derive(Parser)]
#[command(name = "reportviz")]
#[command(about = "reportviz - interactive analytics report toolkit")]
#[command(version)]
#[command(long_about = "
reportviz compiles the plot descriptors of an analytics report into Vega-Lite
specifications and answers the report's data queries offline.

Examples:
  reportviz compile --input report.json --out-dir specs/
  reportviz compile --input report.json --out-dir specs-log/ --log
  reportviz nodes --input report.json --plot hexbin-1 --bins 3,7 --out nodes.tsv
  reportviz table --input report.json --name stats
  reportviz config --example > reportviz.toml
")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compile every chart descriptor into a .vl.json specification
    Compile {
        /// Report data file (JSON)
        #[arg(short, long)]
        input: PathBuf,

        /// Directory receiving one <id>.vl.json per chart
        #[arg(long)]
        out_dir: PathBuf,

        /// Compile log-capable charts in log scale mode
        #[arg(long)]
        log: bool,
    },

    /// Export the data points behind selected hexbin bins as TSV
    Nodes {
        /// Report data file (JSON)
        #[arg(short, long)]
        input: PathBuf,

        /// Id of the hexbin plot
        #[arg(long)]
        plot: String,

        /// Comma-separated bin ids (1-based)
        #[arg(long, value_delimiter = ',', required = true)]
        bins: Vec<u32>,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Export a named report table as TSV
    Table {
        /// Report data file (JSON)
        #[arg(short, long)]
        input: PathBuf,

        /// Table name
        #[arg(long)]
        name: String,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Show the active configuration
    Config {
        /// Use the default configuration instead
        #[arg(long)]
        example: bool,

        /// Write the configuration to a file instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
}

fn setup_logging(verbose: u8, quiet: bool) {
    let level = if quiet {
        "error"
    } else {
        match verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Compile { input, out_dir, log } => {
            commands::compile::execute(&config, input, out_dir, log)?;
        }

        Commands::Nodes {
            input,
            plot,
            bins,
            out,
        } => {
            commands::nodes::execute(&config, input, plot, bins, out)?;
        }

        Commands::Table { input, name, out } => {
            commands::table::execute(input, name, out)?;
        }

        Commands::Config { example, out } => {
            let shown = if example { Config::default() } else { config };
            match out {
                Some(path) => shown.save_to_file(&path)?,
                None => print!("{}", shown.to_toml()?),
            }
        }
    }

    Ok(())
}

fn main() {
    let cli = Cli::parse();
    setup_logging(cli.verbose, cli.quiet);

    if let Err(err) = run(cli) {
        match err.downcast_ref::<CliError>() {
            Some(cli_err) => print_error_and_exit(cli_err),
            None => {
                eprintln!("Error: {:#}", err);
                std::process::exit(1);
            }
        }
    }
}
