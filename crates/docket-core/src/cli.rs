use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::anyhow;
use clap::{ArgAction, Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::record::Status;
use crate::views::{SortKey, StatusFilter};

#[derive(Parser, Debug, Clone)]
#[command(
    name = "docket",
    version,
    about = "Docket: dated request tracker",
    disable_help_subcommand = true,
    arg_required_else_help = true
)]
pub struct GlobalCli {
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[arg(short = 'q', long = "quiet", action = ArgAction::Count, global = true)]
    pub quiet: u8,

    #[arg(long = "rcfile", global = true)]
    pub rcfile: Option<PathBuf>,

    #[arg(long = "data", global = true)]
    pub data: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Record a new request.
    Add {
        #[arg(long = "date")]
        date: String,

        #[arg(long = "client", default_value = "")]
        client: String,

        #[arg(long = "owner", default_value = "")]
        owner: String,

        #[arg(long = "status")]
        status: Option<Status>,

        #[arg(required = true, trailing_var_arg = true)]
        title: Vec<String>,
    },

    /// Table view of the visible records, with a statistics footer.
    List {
        #[command(flatten)]
        view: ViewArgs,
    },

    /// Toggle the completed flag of the record at POSITION.
    Done { position: usize },

    /// Remove the record at POSITION.
    Delete { position: usize },

    /// Calendar projection of the whole collection.
    Calendar,

    /// Statistics over the visible records.
    Stats {
        #[command(flatten)]
        view: ViewArgs,
    },

    /// CSV of the visible records, to stdout.
    Export {
        #[command(flatten)]
        view: ViewArgs,
    },
}

#[derive(clap::Args, Debug, Clone, Default)]
pub struct ViewArgs {
    #[arg(long = "search", default_value = "")]
    pub search: String,

    #[arg(long = "status", default_value = "all")]
    pub status: StatusFilter,

    #[arg(long = "sort")]
    pub sort: Option<SortKey>,
}

impl clap::ValueEnum for Status {
    fn value_variants<'a>() -> &'a [Self] {
        &[Self::InProgress, Self::Pending, Self::OnHold, Self::Done]
    }

    fn to_possible_value(&self) -> Option<clap::builder::PossibleValue> {
        Some(clap::builder::PossibleValue::new(self.wire_name()))
    }
}

impl clap::ValueEnum for StatusFilter {
    fn value_variants<'a>() -> &'a [Self] {
        &[Self::All, Self::Completed, Self::Incomplete]
    }

    fn to_possible_value(&self) -> Option<clap::builder::PossibleValue> {
        let name = match self {
            Self::All => "all",
            Self::Completed => "completed",
            Self::Incomplete => "incomplete",
        };
        Some(clap::builder::PossibleValue::new(name))
    }
}

impl clap::ValueEnum for SortKey {
    fn value_variants<'a>() -> &'a [Self] {
        &[Self::Date, Self::Client, Self::Status, Self::Entry]
    }

    fn to_possible_value(&self) -> Option<clap::builder::PossibleValue> {
        let name = match self {
            Self::Date => "date",
            Self::Client => "client",
            Self::Status => "status",
            Self::Entry => "entry",
        };
        Some(clap::builder::PossibleValue::new(name))
    }
}

pub fn init_tracing(verbose: u8, quiet: u8) -> anyhow::Result<()> {
    let default_level = if quiet >= 2 {
        "error"
    } else if quiet == 1 {
        "warn"
    } else if verbose >= 3 {
        "trace"
    } else if verbose == 2 {
        "debug"
    } else if verbose == 1 {
        "info"
    } else {
        "warn"
    };

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .map_err(|e| anyhow!("invalid RUST_LOG / log filter: {e}"))?;

    let init_result = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_level(true)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .try_init();

    if let Err(err) = init_result {
        debug!(error = %err, "tracing subscriber already set, continuing");
    }

    Ok(())
}
