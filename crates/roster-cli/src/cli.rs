use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Profile registry with a deferred reward queue.
#[derive(Parser, Debug)]
#[command(name = "roster-cli", about = "Drive a roster registry from the command line")]
pub struct CliArgs {
    /// Path to a TOML config (delay_secs, worker_reward, collision_policy)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Replay a JSON-lines command script against a manual clock.
    Replay {
        /// Script file (reads stdin when omitted)
        script: Option<PathBuf>,

        /// Start time of the manual clock, RFC 3339 (default: now)
        #[arg(long)]
        start: Option<String>,
    },

    /// Two users schedule a task each; a background ticker drains them in real time.
    Demo {
        /// How often the ticker calls tick, in milliseconds
        #[arg(long, default_value = "500")]
        interval_ms: u64,
    },
}
