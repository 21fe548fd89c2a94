use anyhow::Context;
use clap::Parser;
use config::Config;
use frontrunner::{cli::Args, start};
use transaction_sender::RpcClient;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    pretty_env_logger::formatted_builder()
        .parse_filters(&std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()))
        .init();

    let args = Args::parse();
    let config = Config::new_from_env(&args.settings)?;

    let client = RpcClient::new(&config.rpc_url).context("Invalid RPC URL")?;
    start(&client, &config, &args).await?;

    Ok(())
}
