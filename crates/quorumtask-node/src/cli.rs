use clap::{Parser, Subcommand};
use quorumtask_types::Round;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "quorumtask-node", about = "Run one protocol step for a task round")]
pub struct Args {
    /// JSON config file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Round to operate on
    #[arg(long, global = true, default_value_t = 0)]
    pub round: Round,

    /// The previous payout for this round failed; pick the runner-up leader
    #[arg(long, global = true)]
    pub previous_failed: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Audit the round's task submissions and vote
    Audit,
    /// Audit the round's distribution lists and vote
    AuditDistribution,
    /// Print the round's distribution-list leader
    Select,
    /// Select the leader and, if local, submit the list and wait for payout
    Distribute,
    /// Trigger payout for the round immediately
    Payout,
}
