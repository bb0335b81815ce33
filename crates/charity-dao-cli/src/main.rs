use anyhow::Result;
use clap::Parser;

mod args;
mod chain;
mod cmd;
mod io;
mod logging;
mod output;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = args::Cli::parse();
    output::init(cli.json);
    logging::init(cli.json, cli.verbose);

    match cmd::dispatch(cli).await {
        Err(err) if output::is_soft(&err) => {
            output::warn(&err.to_string())?;
            Ok(())
        }
        other => other,
    }
}
