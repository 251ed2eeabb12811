use anyhow::anyhow;
use tracing::{debug, info, instrument};

use crate::calendar;
use crate::cli::{Command, ViewArgs};
use crate::config::Config;
use crate::datetime::today_local;
use crate::export;
use crate::record::Draft;
use crate::render::Renderer;
use crate::store::RecordStore;
use crate::views::{SortKey, ViewParams, stats, visible_records};

#[instrument(skip(store, cfg, renderer, command))]
pub fn dispatch(
    store: &mut RecordStore,
    cfg: &Config,
    renderer: &mut Renderer,
    command: Command,
) -> anyhow::Result<()> {
    debug!(?command, "dispatching command");

    match command {
        Command::Add {
            date,
            client,
            owner,
            status,
            title,
        } => cmd_add(store, title.join(" "), date, client, owner, status),
        Command::List { view } => cmd_list(store, cfg, renderer, &view),
        Command::Done { position } => cmd_done(store, position),
        Command::Delete { position } => cmd_delete(store, position),
        Command::Calendar => cmd_calendar(store, renderer),
        Command::Stats { view } => cmd_stats(store, cfg, renderer, &view),
        Command::Export { view } => cmd_export(store, cfg, &view),
    }
}

#[instrument(skip(store, title, date, client, owner, status))]
fn cmd_add(
    store: &mut RecordStore,
    title: String,
    date: String,
    client: String,
    owner: String,
    status: Option<crate::record::Status>,
) -> anyhow::Result<()> {
    info!("command add");

    let draft = Draft {
        title,
        date,
        client,
        owner,
        status,
    };
    let record = store.add(draft)?;

    println!("Recorded request {}.", store.len());
    debug!(uuid = %record.uuid, "request recorded");
    Ok(())
}

#[instrument(skip(store, cfg, renderer, view))]
fn cmd_list(
    store: &mut RecordStore,
    cfg: &Config,
    renderer: &mut Renderer,
    view: &ViewArgs,
) -> anyhow::Result<()> {
    info!("command list");

    let params = view_params(cfg, view);
    let rows = visible_records(store.records(), &params);
    let view_stats = stats(&rows);

    renderer.print_record_table(&rows, today_local())?;
    println!();
    renderer.print_stats(&view_stats)?;
    Ok(())
}

#[instrument(skip(store))]
fn cmd_done(store: &mut RecordStore, position: usize) -> anyhow::Result<()> {
    info!("command done");

    let index = index_from_position(position)?;
    let completed = store.toggle_completed(index)?;

    if completed {
        println!("Marked request {position} completed.");
    } else {
        println!("Marked request {position} incomplete.");
    }
    Ok(())
}

#[instrument(skip(store))]
fn cmd_delete(store: &mut RecordStore, position: usize) -> anyhow::Result<()> {
    info!("command delete");

    let index = index_from_position(position)?;
    let removed = store.delete(index)?;

    println!("Deleted request {position}: {}.", removed.title);
    Ok(())
}

#[instrument(skip(store, renderer))]
fn cmd_calendar(store: &mut RecordStore, renderer: &mut Renderer) -> anyhow::Result<()> {
    info!("command calendar");

    let entries = calendar::project(store.records());
    renderer.print_calendar(&entries)?;
    Ok(())
}

#[instrument(skip(store, cfg, renderer, view))]
fn cmd_stats(
    store: &mut RecordStore,
    cfg: &Config,
    renderer: &mut Renderer,
    view: &ViewArgs,
) -> anyhow::Result<()> {
    info!("command stats");

    let params = view_params(cfg, view);
    let rows = visible_records(store.records(), &params);
    renderer.print_stats(&stats(&rows))?;
    Ok(())
}

#[instrument(skip(store, cfg, view))]
fn cmd_export(store: &mut RecordStore, cfg: &Config, view: &ViewArgs) -> anyhow::Result<()> {
    info!("command export");

    let params = view_params(cfg, view);
    let rows = visible_records(store.records(), &params);

    let stdout = std::io::stdout();
    export::write_csv(stdout.lock(), &rows)?;
    Ok(())
}

fn view_params(cfg: &Config, view: &ViewArgs) -> ViewParams {
    let sort = view.sort.unwrap_or_else(|| {
        cfg.get("default.sort")
            .and_then(|value| value.parse::<SortKey>().ok())
            .unwrap_or_default()
    });

    ViewParams {
        search: view.search.clone(),
        status: view.status,
        sort,
    }
}

// The table shows 1-based positions; the store speaks 0-based indices.
fn index_from_position(position: usize) -> Result<usize, anyhow::Error> {
    position
        .checked_sub(1)
        .ok_or_else(|| anyhow!("positions start at 1"))
}
