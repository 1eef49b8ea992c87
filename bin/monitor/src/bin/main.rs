use alloy_provider::RootProvider;
use clap::Parser;
use client::{ChainClient, OpNodeClient};
use monitor::{
    config::Config,
    find_latest_withdrawal_event,
    metrics::{install_prometheus_exporter, Metrics},
    resolve_withdrawal,
};
use scanner::ScanError;
use std::time::{Duration, Instant};
use tokio::time;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

#[derive(Parser)]
#[command(name = "monitor")]
#[command(about = "Watches proven withdrawals and validates them against L2 state")]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Run a single monitoring pass and exit
    #[arg(long)]
    once: bool,
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::from_file(&cli.config)?;
    let portal = config.portal_address();

    info!("Starting withdrawal monitor");
    info!("  Network: {:?}", config.network);
    info!("  L1 RPC URL: {}", config.l1_rpc_url);
    info!("  L2 RPC URL: {}", config.l2_rpc_url);
    info!("  op-node URL: {}", config.l2_op_node_url);
    info!("  Portal: {}", portal);
    info!("  Batch size: {}", config.batch_size);

    let metrics = Metrics::new();
    if config.metrics_port != 0 {
        install_prometheus_exporter(config.metrics_port)?;
        info!("  Metrics port: {}", config.metrics_port);
    }

    let l1_provider = if config.l1_accept_invalid_certs {
        warn!("TLS verification disabled for the L1 endpoint");
        client::create_insecure_provider(&config.l1_rpc_url)?
    } else {
        client::create_provider(&config.l1_rpc_url)?
    };
    let l2_provider = if config.l2_accept_invalid_certs {
        warn!("TLS verification disabled for the L2 endpoint");
        client::create_insecure_provider(&config.l2_rpc_url)?
    } else {
        client::create_provider(&config.l2_rpc_url)?
    };
    let op_node = if config.op_node_accept_invalid_certs {
        warn!("TLS verification disabled for the op-node endpoint");
        OpNodeClient::insecure(config.l2_op_node_url.as_str())?
    } else {
        OpNodeClient::new(config.l2_op_node_url.as_str())
    };

    let rpc_timeout = Duration::from_secs(config.rpc_timeout_secs);
    let l1_client = ChainClient::new(l1_provider.clone()).with_timeout(rpc_timeout);
    let l2_client = ChainClient::new(l2_provider.clone()).with_timeout(rpc_timeout);

    // Startup connectivity is informational only; the endpoints may recover
    // before the first pass needs them.
    match l1_client.health_check().await {
        Ok(height) => info!(height, "L1 endpoint reachable"),
        Err(e) => warn!(error = %e, "L1 endpoint unreachable at startup, proceeding"),
    }
    match l2_client.health_check().await {
        Ok(height) => info!(height, "L2 endpoint reachable"),
        Err(e) => warn!(error = %e, "L2 endpoint unreachable at startup, proceeding"),
    }

    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("shutdown requested");
                cancel.cancel();
            }
        });
    }

    let mut interval = time::interval(Duration::from_secs(config.poll_interval_secs));

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = interval.tick() => {}
        }

        let started = Instant::now();
        match run_pass(
            &l1_client,
            &l1_provider,
            &l2_provider,
            &op_node,
            &config,
            &metrics,
            &cancel,
        )
        .await
        {
            Ok(()) => metrics.record_pass(true, started.elapsed()),
            Err(e) => {
                error!(error = %e, "monitoring pass failed");
                metrics.record_pass(false, started.elapsed());
            }
        }

        if cli.once || cancel.is_cancelled() {
            break;
        }
    }

    info!("monitor stopped");
    Ok(())
}

/// One monitoring pass: discover the latest proven withdrawal and validate
/// it against the dispute game and canonical L2 state.
async fn run_pass(
    l1_client: &ChainClient<RootProvider>,
    l1_provider: &RootProvider,
    l2_provider: &RootProvider,
    op_node: &OpNodeClient,
    config: &Config,
    metrics: &Metrics,
    cancel: &CancellationToken,
) -> eyre::Result<()> {
    let portal = config.portal_address();

    let found = match find_latest_withdrawal_event(
        l1_client,
        portal,
        config.batch_size,
        cancel.clone(),
    )
    .await
    {
        Ok(found) => found,
        Err(ScanError::NoMatch) => {
            info!("no proven withdrawals found in the scanned range");
            return Ok(());
        }
        Err(ScanError::Cancelled) => return Ok(()),
        Err(e) => return Err(e.into()),
    };

    info!(
        block = found.log.block_number,
        tx_hash = %found.log.tx_hash,
        withdrawal_hash = %found.log.withdrawal_hash,
        proof_submitter = %found.log.proof_submitter,
        proven_at = %found.timestamp.formatted,
        age = %found.timestamp.relative_display(),
        "latest proven withdrawal"
    );
    metrics.set_last_proven(found.log.block_number, found.timestamp.timestamp);

    let record = resolve_withdrawal(
        l1_provider.clone(),
        l2_provider.clone(),
        op_node,
        portal,
        found.log.withdrawal_hash,
        found.log.proof_submitter,
    )
    .await?;

    if record.is_consistent() {
        info!(
            game_proxy = %record.game_proxy,
            l2_block = record.l2_block_number,
            root_claim = %record.root_claim_hex(),
            "withdrawal validated against L2 state"
        );
        metrics.record_validated();
        metrics.set_forgery_detected(false);
    } else {
        error!(
            withdrawal_hash = %record.withdrawal_hash,
            game_proxy = %record.game_proxy,
            root_claim = %record.root_claim_hex(),
            oracle_output_root = %resolver::encode_hex(record.oracle_output_root),
            message_sent = record.message_sent,
            "withdrawal inconsistent with L2 state"
        );
        metrics.set_forgery_detected(true);
    }

    Ok(())
}
