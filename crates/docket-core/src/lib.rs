pub mod calendar;
pub mod cli;
pub mod commands;
pub mod config;
pub mod datastore;
pub mod datetime;
pub mod error;
pub mod export;
pub mod record;
pub mod render;
pub mod store;
pub mod views;

use std::ffi::OsString;

use anyhow::Context;
use clap::Parser;
use tracing::{debug, info};

#[tracing::instrument(skip_all)]
pub fn run(raw_args: Vec<OsString>) -> anyhow::Result<()> {
    let cli = cli::GlobalCli::parse_from(raw_args);

    cli::init_tracing(cli.verbose, cli.quiet)?;

    info!(verbose = cli.verbose, quiet = cli.quiet, "starting docket CLI");

    let cfg = config::Config::load(cli.rcfile.as_deref())?;
    debug!(rcfile = ?cfg.loaded_file, "configuration loaded");

    let data_dir = config::resolve_data_dir(&cfg, cli.data.as_deref())
        .context("failed to resolve data directory")?;

    let backend = datastore::FileBackend::open(&data_dir)
        .with_context(|| format!("failed to open datastore at {}", data_dir.display()))?;
    let mut store = store::RecordStore::open(Box::new(backend));

    let mut renderer = render::Renderer::new(&cfg)?;

    commands::dispatch(&mut store, &cfg, &mut renderer, cli.command)?;

    info!("done");
    Ok(())
}
