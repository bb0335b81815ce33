use anyhow::{anyhow, Result};
use serde::Serialize;

use charity_dao_core::chain::TxHash;
use charity_dao_core::model::{Locator, Proposal};
use charity_dao_core::DaoError;
use charity_dao_hooks::{commit_proposal, record_activity, submit_proposal, Published};

use crate::args::{Cli, CreateProposalArgs, ProposalCommand};
use crate::chain::client::Deployment;
use crate::io::{config, input};
use crate::output;

#[derive(Debug, Serialize)]
pub struct CreateOut {
    pub id: String,
    pub status: String,
    pub proposal: Published,
    pub activity: Option<Published>,
}

#[derive(Debug, Serialize)]
pub struct CommitOut {
    pub id: String,
    pub locator: Locator,
    pub tx: TxHash,
}

pub async fn run(cli: &Cli, cmd: &ProposalCommand) -> Result<()> {
    match cmd {
        ProposalCommand::Create(args) => create(cli, args).await,
        ProposalCommand::Commit { id, locator } => commit(cli, id, locator).await,
    }
}

async fn create(cli: &Cli, args: &CreateProposalArgs) -> Result<()> {
    let cfg = config::load(cli)?;
    let proposal: Proposal = input::proposal_draft(args)?.build(cfg.dao_address, input::today())?;

    let deployment = Deployment::open(cfg)?;
    let session = deployment.session(cli.account).await?;
    let registry = deployment.eth.registry();
    let store = deployment.store.as_ref();

    let pb = output::spinner("uploading proposal");
    let published = submit_proposal(store, &registry, &session, &proposal).await;
    let published = match published {
        Ok(p) => p,
        Err(err) => {
            pb.finish_and_clear();
            return Err(with_recovery(err, proposal.id()));
        }
    };

    let activity = if args.no_activity_log {
        None
    } else {
        pb.set_message("logging activity");
        let logged = record_activity(store, &registry, &session, proposal.dao(), proposal.id()).await;
        match logged {
            Ok(a) => Some(a),
            Err(err) => {
                pb.finish_and_clear();
                return Err(anyhow::Error::new(err).context(format!(
                    "proposal {} was recorded at {} but its activity log was not",
                    proposal.id(),
                    published.locator
                )));
            }
        }
    };
    pb.finish_and_clear();

    output::print(&CreateOut {
        id: proposal.id().to_string(),
        status: proposal.status().to_string(),
        proposal: published,
        activity,
    })
}

/// Point the user at `proposal commit` when the upload survived a failed write.
fn with_recovery(err: DaoError, id: &str) -> anyhow::Error {
    let hint = err
        .orphaned_locator()
        .map(|loc| format!("proposal document is staged; retry with: charity-dao proposal commit --id {id} --locator {loc}"));
    match hint {
        Some(hint) => anyhow::Error::new(err).context(hint),
        None => anyhow::Error::new(err),
    }
}

async fn commit(cli: &Cli, id: &str, locator: &str) -> Result<()> {
    let cfg = config::load(cli)?;
    let locator = Locator::parse(locator).map_err(|e| anyhow!("--locator: {e}"))?;

    let deployment = Deployment::open(cfg)?;
    let session = deployment.session(cli.account).await?;
    let tx = commit_proposal(&deployment.eth.registry(), &session, id, &locator).await?;

    output::print(&CommitOut {
        id: id.to_string(),
        locator,
        tx,
    })
}
