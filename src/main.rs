//! Command-line tool for generating Swagger 2.0 documents.
//!
//! # Usage
//!
//! ```bash
//! swagger-from-routes [OPTIONS] <MANIFEST>
//! ```
//!
//! Generate JSON from a manifest and the types under `./src`:
//! ```bash
//! swagger-from-routes routes.yaml -s ./src -f json -o swagger.json
//! ```

use anyhow::Result;
use clap::Parser;
use log::info;
use swagger_from_routes::cli;

fn main() -> Result<()> {
    let args = cli::CliArgs::parse();

    let log_level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();

    info!("swagger-from-routes starting...");

    let args = cli::validate_args(args)?;
    cli::run(args)?;

    info!("Swagger document generation completed successfully");

    Ok(())
}
