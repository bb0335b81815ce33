use anyhow::Result;

use crate::args::{Cli, Command};

mod account;
mod config;
mod dao;
mod doctor;
mod fetch;
mod proposal;
mod upload;
mod votes;

pub async fn dispatch(cli: Cli) -> Result<()> {
    match &cli.command {
        Command::Account => account::run(&cli).await,
        Command::Dao(cmd) => dao::run(&cli, cmd).await,
        Command::Proposal(cmd) => proposal::run(&cli, cmd).await,
        Command::Votes(cmd) => votes::run(&cli, cmd).await,
        Command::Upload { path, name } => upload::run(&cli, path, name.as_deref()).await,
        Command::Fetch { locator, to } => fetch::run(&cli, locator, to.as_deref()).await,
        Command::Config { write } => config::run(&cli, *write).await,
        Command::Doctor => doctor::run(&cli).await,
    }
}
