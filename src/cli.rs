//! Command-line interface built on clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::job::JobKind;
use crate::validation::TransitionRequest;

/// printshop — track print-job progress statuses.
#[derive(Debug, Parser)]
#[command(name = "printshop", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Path to a config file (default: ./printshop.toml).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging.
    #[arg(long, short, global = true, default_value_t = false)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum KindArg {
    InHouse,
    Outsourced,
}

impl From<KindArg> for JobKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::InHouse => JobKind::InHouse,
            KindArg::Outsourced => JobKind::Outsourced,
        }
    }
}

/// The fields of a status change request.
#[derive(Debug, Clone, Args)]
pub struct ChangeArgs {
    /// Status to move the job to.
    #[arg(long)]
    pub target: String,

    /// Free-form notes (max 1000 characters).
    #[arg(long)]
    pub notes: Option<String>,

    /// Reason for the change; required when cancelling (max 500 characters).
    #[arg(long)]
    pub reason: Option<String>,
}

impl ChangeArgs {
    pub fn to_request(&self) -> TransitionRequest {
        TransitionRequest {
            target_status: Some(self.target.clone()),
            notes: self.notes.clone(),
            reason_for_change: self.reason.clone(),
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show the transition table, or the successors of one status.
    Transitions {
        status: Option<String>,
    },

    /// Check a status change without applying it.
    Validate {
        #[command(flatten)]
        change: ChangeArgs,

        /// Current status of the job, if it has one.
        #[arg(long)]
        current: Option<String>,

        /// Print the result as JSON.
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Create a new job file with status `pending`.
    New {
        #[arg(long)]
        title: String,

        #[arg(long, value_enum, default_value = "in-house")]
        kind: KindArg,

        #[arg(long)]
        file: PathBuf,
    },

    /// Show a job file.
    Show {
        #[arg(long)]
        file: PathBuf,
    },

    /// Apply a status change to a job file.
    Apply {
        #[arg(long)]
        file: PathBuf,

        #[command(flatten)]
        change: ChangeArgs,
    },

    /// Submit a status change to the job-management API.
    Submit {
        job_id: String,

        #[command(flatten)]
        change: ChangeArgs,

        /// Skip fetching the job and validate against this status.
        #[arg(long)]
        current: Option<String>,
    },
}
