//! PL/CSQL command-line interface

use clap::{Parser, Subcommand};
use log::LevelFilter;
use plcsql::cli::check_support::{self, CheckSupportConfig};
use plcsql::cli::coerce::{self, CoerceConfig};
use plcsql::cli::handshake::{self, HandshakeConfig};
use plcsql::cli::matrix::{self, MatrixConfig};
use plcsql::cli::output::{self, ColorMode, OutputFormat};
use std::path::PathBuf;

/// PL/CSQL type bridge tool
#[derive(Parser)]
#[command(name = "plcsql")]
#[command(author, version, about = "PL/CSQL coercion and session tools", long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Color output
    #[arg(long, value_enum, default_value_t = ColorMode::Auto, global = true)]
    color: ColorMode,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve the coercion between two types and print the generated code
    Coerce {
        /// Source type
        from: String,

        /// Target type
        to: String,

        /// Expression code to wrap
        #[arg(short, long, default_value = "expr")]
        expr: String,
    },

    /// Print the coercion matrix
    Matrix {
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Decode a system parameter handshake dump
    Handshake {
        /// File holding the raw handshake bytes
        file: PathBuf,

        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Check a support library manifest against the coercion matrix
    CheckSupport {
        /// File listing one routine name per line
        file: PathBuf,
    },
}

fn main() {
    human_panic::setup_panic!();

    let cli = Cli::parse();

    output::setup_colors(cli.color);

    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    let result = match cli.command {
        Commands::Coerce { from, to, expr } => coerce::coerce(CoerceConfig {
            from,
            to,
            expr,
            verbose: cli.verbose,
        }),
        Commands::Matrix { format } => matrix::matrix(MatrixConfig { format }),
        Commands::Handshake { file, format } => {
            handshake::handshake(HandshakeConfig { file, format })
        }
        Commands::CheckSupport { file } => check_support::check_support(CheckSupportConfig {
            file,
            verbose: cli.verbose,
        }),
    };

    if let Err(e) = result {
        eprintln!("{}", output::format_error(&e));
        std::process::exit(1);
    }
}
