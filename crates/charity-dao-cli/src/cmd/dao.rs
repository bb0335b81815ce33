use anyhow::Result;
use serde::Serialize;

use charity_dao_core::model::{DaoProfile, GovernanceDocument};
use charity_dao_hooks::{update_dao, update_governance, Published};

use crate::args::{Cli, DaoCommand};
use crate::chain::client::Deployment;
use crate::io::{config, input};
use crate::output;

#[derive(Debug, Serialize)]
pub struct DaoOut {
    pub dao: String,
    pub name: Option<String>,
    #[serde(flatten)]
    pub published: Published,
}

enum Change {
    Profile(DaoProfile),
    Governance(GovernanceDocument),
}

pub async fn run(cli: &Cli, cmd: &DaoCommand) -> Result<()> {
    let cfg = config::load(cli)?;

    // Validate all input before the wallet prompt.
    let change = match cmd {
        DaoCommand::Update {
            name,
            description,
            governance,
        } => {
            let rules = match governance {
                Some(path) => GovernanceDocument::new(&input::read_text(path)?)?,
                None => GovernanceDocument::default(),
            };
            Change::Profile(DaoProfile::new(name, description, rules)?)
        }
        DaoCommand::Governance { file } => Change::Governance(GovernanceDocument::new(&input::read_text(file)?)?),
    };

    let deployment = Deployment::open(cfg)?;
    let session = deployment.session(cli.account).await?;
    let registry = deployment.eth.registry();
    let store = deployment.store.as_ref();

    let pb = output::spinner("uploading governance rules and updating the registry");
    let (name, result) = match &change {
        Change::Profile(profile) => (
            Some(profile.name().to_string()),
            update_dao(store, &registry, &session, profile).await,
        ),
        Change::Governance(rules) => (None, update_governance(store, &registry, &session, rules).await),
    };
    pb.finish_and_clear();

    output::print(&DaoOut {
        dao: deployment.cfg.dao_address.to_string(),
        name,
        published: result?,
    })
}
