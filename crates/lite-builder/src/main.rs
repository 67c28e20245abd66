//! # lite-builder
//!
//! Builds JupyterLite against local JupyterLab and Notebook checkouts.
//!
//! ## Usage
//!
//! ```bash
//! lite-builder build             # Link local packages, then run the full JupyterLite build
//! lite-builder link              # Only build + link the local packages into package.json
//! lite-builder doctor            # Check jlpm/hatch/python and the JupyterLite layout
//! ```

use anyhow::Result;
use clap::Parser;

mod app;
mod cli;
mod manifest;
mod tasks;
mod util;

fn main() -> Result<()> {
    let cli = crate::cli::Cli::parse();
    init_logger(&cli);
    crate::app::run(cli)
}

/// `RUST_LOG` wins over the `-v`/`-q` flags.
fn init_logger(cli: &crate::cli::Cli) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(cli.log_level()))
        .format_timestamp(None)
        .format_target(false)
        .try_init()
        .ok();
}
