use clap::Parser;
use quorumtask_content::{ContentFetcher, Ed25519Verifier};
use quorumtask_ledger::RpcLedger;
use quorumtask_node::{init_tracing, Args, NodeConfig, NonEmptyValidator, RoundRunner};
use std::sync::Arc;

#[tokio::main]
async fn main() {
    let args = Args::parse();
    let config = match NodeConfig::load_or_default(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(2);
        }
    };
    init_tracing(&config.log_filter);

    if let Err(e) = run(args, config).await {
        tracing::error!(error = %e, "command failed");
        eprintln!("{e}");
        std::process::exit(1);
    }
}

async fn run(args: Args, config: NodeConfig) -> Result<(), Box<dyn std::error::Error>> {
    let ledger = RpcLedger::new(&config.rpc_url, config.node_id()?, config.rpc_timeout())?
        .with_mode(config.mode);
    let content = ContentFetcher::new(config.gateways.clone(), config.gateway_timeout());

    let runner = RoundRunner::new(
        Arc::new(ledger),
        Arc::new(content),
        Arc::new(Ed25519Verifier),
        config,
    );
    let report = runner
        .execute(args.command, args.round, args.previous_failed, &NonEmptyValidator)
        .await?;

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
