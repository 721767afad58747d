use std::path::PathBuf;
use std::process;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use aiml2rs::{App, Config};

/// Convert AIML files into RiveScript.
#[derive(Parser)]
#[command(name = "aiml2rs", version, about = "Convert AIML files into RiveScript")]
struct Cli {
    /// Directory of input .aiml files
    #[arg(long = "in", value_name = "DIR")]
    input: PathBuf,

    /// Directory for output .rive files (created if it doesn't exist)
    #[arg(long = "out", value_name = "DIR")]
    output: PathBuf,

    /// Use real topics in RiveScript output when converting AIML <topic> tags
    #[arg(long)]
    real_topics: bool,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,
}

fn main() {
    let cli = Cli::parse();

    let default = if cli.debug { "aiml2rs=debug" } else { "aiml2rs=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = Config::new(cli.input, cli.output).real_topics(cli.real_topics);
    match App::new(config).run() {
        Ok(reports) => {
            let warnings: usize = reports.iter().map(|r| r.warnings.len()).sum();
            info!("Converted {} file(s) with {} warning(s)", reports.len(), warnings);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}
