use axum_server::tls_rustls::RustlsConfig;
use clap::Parser;
use eyre::format_err;
use k8s_openapi::api::networking::v1::NetworkPolicy;
use log::{error, info, warn};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::exit;
use std::sync::Arc;
use tokio::{
    select,
    signal::unix::{SignalKind, signal},
    sync::watch,
};

use netpol_admission::{AdmissionValidator, config, webhook};

/// NetworkPolicy admission webhook
#[derive(Parser)]
#[command(version = VERSION, about, long_about = ABOUT)]
struct Cli {
    /// log filters (see https://docs.rs/env_logger/latest/env_logger/index.html#enabling-logging)
    #[arg(long, default_value = "info", env = "NETPOL_ADMISSION_LOG")]
    log: String,
    /// log style (see https://docs.rs/env_logger/latest/env_logger/index.html#disabling-colors)
    #[arg(long, default_value = "auto", env = "NETPOL_ADMISSION_LOG_STYLE")]
    log_style: String,

    /// Validation rules file path.
    #[arg(long, short = 'c', default_value = "config.yaml", env = "NETPOL_ADMISSION_CONFIG")]
    config: String,

    /// Address to listen on.
    #[arg(long, default_value = "0.0.0.0:443", env = "NETPOL_ADMISSION_LISTEN_ADDRESS")]
    listen_address: SocketAddr,

    /// x509 certificate for HTTPS (CA cert, if any, concatenated after server cert).
    #[arg(long, env = "NETPOL_ADMISSION_TLS_CERT_FILE")]
    tls_cert_file: Option<PathBuf>,
    /// x509 private key matching --tls-cert-file.
    #[arg(long, env = "NETPOL_ADMISSION_TLS_PRIVATE_KEY_FILE")]
    tls_private_key_file: Option<PathBuf>,

    /// Test the config and exit.
    #[arg(long)]
    test_config: bool,

    /// Check NetworkPolicy manifests against the config and exit.
    #[arg(long, value_name = "FILE", num_args = 1..)]
    check: Vec<String>,
}

const VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (", env!("GIT_COMMIT"), ")");

const ABOUT: &'static str = r#"
NetworkPolicy admission webhook

Validate NetworkPolicies against operator-defined rules:
- pod and namespace selectors label count
- ingress/egress peers IP blocks mask size and exceptions
- ingress/egress ports count and numbers
- allowed policy types, per namespace

Send SIGHUP to reload the rules.
"#;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    let cli = Cli::parse();

    env_logger::builder()
        .parse_filters(cli.log.as_str())
        .parse_write_style(cli.log_style.as_str())
        .format_timestamp_millis()
        .init();

    let validator = config::read(&cli.config).await?;

    if validator.is_empty() {
        warn!("{}: no validator configured, every policy will be allowed", cli.config);
    }

    if cli.test_config {
        return Ok(());
    }

    if !cli.check.is_empty() {
        let rejected = check_files(&validator, &cli.check).await?;
        exit(if rejected { 1 } else { 0 });
    }

    let tls = match (&cli.tls_cert_file, &cli.tls_private_key_file) {
        (Some(cert), Some(key)) => Some(
            RustlsConfig::from_pem_file(cert, key)
                .await
                .map_err(|e| format_err!("load TLS certificate failed: {e}"))?,
        ),
        (None, None) => {
            warn!("no TLS certificate given, serving plain HTTP");
            None
        }
        _ => {
            return Err(format_err!(
                "--tls-cert-file and --tls-private-key-file must be given together"
            ));
        }
    };

    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;
    tokio::spawn(async move {
        select! {
            _ = sigterm.recv() => info!("Received SIGTERM"),
            _ = sigint.recv() => info!("Received SIGINT"),
        };
        exit(0);
    });

    let (tx, rx) = watch::channel(Arc::new(validator));

    let mut sighup = signal(SignalKind::hangup())?;
    let config_path = cli.config.clone();
    tokio::spawn(async move {
        while sighup.recv().await.is_some() {
            match config::read(&config_path).await {
                Ok(validator) => {
                    info!("{config_path}: reloaded");
                    tx.send_replace(Arc::new(validator));
                }
                Err(e) => error!("reload failed, keeping the current rules: {e}"),
            }
        }
    });

    info!("starting with rules from {}", cli.config);

    webhook::serve(cli.listen_address, tls, rx)
        .await
        .map_err(|e| format_err!("webhook server failed: {e}"))
}

/// Print the verdict of each manifest; true if any was rejected.
async fn check_files(validator: &AdmissionValidator, paths: &[String]) -> eyre::Result<bool> {
    let mut rejected = false;

    for path in paths {
        let data = tokio::fs::read(path)
            .await
            .map_err(|e| format_err!("read policy failed: {path}: {e}"))?;
        let policy: NetworkPolicy = serde_yaml::from_slice(&data)
            .map_err(|e| format_err!("parse policy failed: {path}: {e}"))?;

        match validator.is_valid(&policy) {
            Ok(()) => println!("{path}: allowed"),
            Err(reason) => {
                rejected = true;
                println!("{path}: denied: {reason}");
            }
        }
    }

    Ok(rejected)
}
