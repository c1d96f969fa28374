use clap::Parser;
use superapp_scripts::{cli::Cli, context::ScriptContext, errors::ScriptError};
use tracing::error;

#[tokio::main]
async fn main() -> Result<(), ScriptError> {
    dotenvy::dotenv().ok();

    let Cli {
        priv_key,
        rpc_url,
        etherscan_api_key,
        artifacts,
        deployments,
        node_modules,
        networks,
        command,
    } = Cli::parse();

    tracing_subscriber::fmt().pretty().init();

    let ctx = ScriptContext::new(
        &priv_key,
        rpc_url,
        networks.as_deref(),
        artifacts,
        deployments,
        node_modules,
        etherscan_api_key,
    )?;

    command.run(&ctx).await.inspect_err(|e| error!("{e}"))
}
