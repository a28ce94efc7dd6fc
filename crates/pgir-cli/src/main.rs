//! pgir command-line client.

use clap::Parser;
use pgir_cli::{run, Args};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("pgir_cli=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Args::parse().into_config();

    match run(&config) {
        Ok(output) => println!("{}", output),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
