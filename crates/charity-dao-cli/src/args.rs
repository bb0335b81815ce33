use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug, Clone)]
#[command(name = "charity-dao", version, about = "Charity DAO client")]
pub struct Cli {
    /// Emit JSON output on stdout and JSON log lines on stderr.
    #[arg(long, global = true)]
    pub json: bool,

    /// Log workflow steps (repeat for RPC-level detail). `RUST_LOG` overrides.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Deployment configuration file. Missing file means defaults.
    #[arg(long, global = true, env = "CHARITY_DAO_CONFIG", default_value = "charity-dao.json")]
    pub config: PathBuf,

    /// JSON-RPC endpoint of the wallet-enabled node.
    #[arg(long, global = true, env = "CHARITY_DAO_RPC_URL")]
    pub rpc_url: Option<String>,

    /// Provider account index used to sign.
    #[arg(long, global = true, default_value_t = 0)]
    pub account: usize,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Connect to the provider and show the signing account.
    Account,

    /// Update the DAO record.
    #[command(subcommand)]
    Dao(DaoCommand),

    /// Create or commit proposals.
    #[command(subcommand)]
    Proposal(ProposalCommand),

    /// Governance token balance, purchase and delegation.
    #[command(subcommand)]
    Votes(VotesCommand),

    /// Upload a file to the configured content store.
    Upload {
        path: PathBuf,
        /// Document name presented to the store (default: file name).
        #[arg(long)]
        name: Option<String>,
    },

    /// Download a document by locator.
    Fetch {
        locator: String,
        /// Write to this file instead of stdout.
        #[arg(long)]
        to: Option<PathBuf>,
    },

    /// Print the effective configuration.
    Config {
        /// Write it to the config path.
        #[arg(long)]
        write: bool,
    },

    /// Run environment checks.
    Doctor,
}

#[derive(Subcommand, Debug, Clone)]
pub enum DaoCommand {
    /// Upload governance rules and update name and description.
    Update {
        #[arg(long)]
        name: String,
        #[arg(long)]
        description: String,
        /// Governance rules file (default: built-in rules).
        #[arg(long)]
        governance: Option<PathBuf>,
    },

    /// Upload new governance rules only.
    Governance {
        #[arg(long)]
        file: PathBuf,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum ProposalCommand {
    /// Submit a new proposal.
    Create(CreateProposalArgs),

    /// Record an already uploaded proposal document on-chain.
    Commit {
        #[arg(long)]
        id: String,
        #[arg(long)]
        locator: String,
    },
}

#[derive(Args, Debug, Clone)]
pub struct CreateProposalArgs {
    /// Proposal draft JSON. Flags below are ignored when set.
    #[arg(long, conflicts_with_all = ["name", "content_uri", "start", "end", "calls"])]
    pub file: Option<PathBuf>,

    #[arg(long)]
    pub name: Option<String>,

    #[arg(long = "content-uri")]
    pub content_uri: Option<String>,

    /// Start date, YYYY-MM-DD.
    #[arg(long)]
    pub start: Option<String>,

    /// End date, YYYY-MM-DD.
    #[arg(long)]
    pub end: Option<String>,

    /// `operation,from,to,value,data`; repeatable.
    #[arg(long = "call")]
    pub calls: Vec<String>,

    /// Explicit proposal id (default: random UUID).
    #[arg(long)]
    pub id: Option<String>,

    /// Do not upload and record the activity log entry.
    #[arg(long)]
    pub no_activity_log: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum VotesCommand {
    /// Balance, voting power and delegate.
    Show {
        /// Account to inspect (default: the signing account).
        #[arg(long)]
        address: Option<String>,
    },

    /// Buy governance tokens from the treasury.
    Buy {
        /// Whole-token amount, decimals allowed (e.g. "2.5").
        #[arg(long)]
        amount: String,
        /// Only buy: no self-delegation and no member registration.
        #[arg(long)]
        skip_membership: bool,
    },

    /// Delegate voting power.
    Delegate {
        /// Delegatee address (default: yourself).
        #[arg(long)]
        to: Option<String>,
    },
}
