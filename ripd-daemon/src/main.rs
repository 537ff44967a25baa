//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

mod config;

use std::net::SocketAddr;

use clap::{App, Arg};
use config::{Config, LoggingFileRotation, LoggingFmtStyle};
use ripd::Master;
use ripd::socket::UdpSocketFactory;
use ripd_northbound::NbDaemonSender;
use ripd_northbound::api::daemon::{CommitRequest, Request};
use ripd_northbound::configuration::ConfigChanges;
use tokio::signal::unix::{SignalKind, signal};
use tokio::sync::{mpsc, oneshot};
use tracing::level_filters::LevelFilter;
use tracing::{error, info, warn};
use tracing_appender::rolling;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Layer};

fn init_tracing(config: &config::Logging) {
    // Enable logging to a file.
    let file = config.file.enabled.then(|| {
        let file_appender = match config.file.rotation {
            LoggingFileRotation::Never => {
                rolling::never(&config.file.dir, &config.file.name)
            }
            LoggingFileRotation::Hourly => {
                rolling::hourly(&config.file.dir, &config.file.name)
            }
            LoggingFileRotation::Daily => {
                rolling::daily(&config.file.dir, &config.file.name)
            }
        };

        let layer = tracing_subscriber::fmt::layer()
            .with_writer(file_appender)
            .with_target(false)
            .with_thread_ids(config.file.fmt.show_thread_id)
            .with_file(config.file.fmt.show_source)
            .with_line_number(config.file.fmt.show_source)
            .with_ansi(config.file.fmt.colors);
        let layer = match config.file.fmt.style {
            LoggingFmtStyle::Compact => layer.compact().boxed(),
            LoggingFmtStyle::Full => layer.boxed(),
            LoggingFmtStyle::Json => layer.json().boxed(),
            LoggingFmtStyle::Pretty => layer.pretty().boxed(),
        };
        layer.with_filter(LevelFilter::TRACE)
    });

    // Enable logging to stdout.
    let stdout = config.stdout.enabled.then(|| {
        let layer = tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_thread_ids(config.stdout.fmt.show_thread_id)
            .with_file(config.stdout.fmt.show_source)
            .with_line_number(config.stdout.fmt.show_source)
            .with_ansi(config.stdout.fmt.colors);
        let layer = match config.stdout.fmt.style {
            LoggingFmtStyle::Compact => layer.compact().boxed(),
            LoggingFmtStyle::Full => layer.boxed(),
            LoggingFmtStyle::Json => layer.json().boxed(),
            LoggingFmtStyle::Pretty => layer.pretty().boxed(),
        };
        layer.with_filter(LevelFilter::TRACE)
    });

    // The "ripd" target prefix also covers the northbound engine.
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("ripd=debug"));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(file)
        .with(stdout)
        .init();
}

fn signal_listener() -> mpsc::Receiver<()> {
    let (signal_tx, signal_rx) = mpsc::channel(1);

    tokio::task::spawn(async move {
        let (Ok(mut sigint), Ok(mut sigterm)) = (
            signal(SignalKind::interrupt()),
            signal(SignalKind::terminate()),
        ) else {
            // Dropping the sender shuts the daemon down.
            error!("failed to install signal handlers");
            return;
        };

        tokio::select! {
            _ = sigint.recv() => {
                info!("received SIGINT");
                let _ = signal_tx.send(()).await;
            },
            _ = sigterm.recv() => {
                info!("received SIGTERM");
                let _ = signal_tx.send(()).await;
            }
        }
    });

    signal_rx
}

fn load_startup_config(path: &str) -> Result<ConfigChanges, String> {
    let data = std::fs::read_to_string(path)
        .map_err(|error| format!("failed to read {path}: {error}"))?;
    serde_json::from_str(&data)
        .map_err(|error| format!("failed to parse {path}: {error}"))
}

async fn startup_commit(nb_tx: &NbDaemonSender, changes: ConfigChanges) {
    let (responder, responder_rx) = oneshot::channel();
    let request = Request::Commit(CommitRequest {
        changes,
        policy: Default::default(),
        responder: Some(responder),
    });
    if nb_tx.send(request).await.is_err() {
        error!("provider task is gone");
        return;
    }

    match responder_rx.await {
        Ok(Ok(response)) => {
            let report = response.report;
            for error in &report.errors {
                warn!(%error, "startup configuration change failed");
            }
            info!(
                applied = report.applied,
                skipped = report.skipped,
                "startup configuration committed"
            );
        }
        Ok(Err(error)) => {
            error!(%error, "startup configuration rejected");
        }
        Err(_) => {
            error!("provider task is gone");
        }
    }
}

// ===== main =====

fn main() {
    // Parse command-line parameters.
    let matches = App::new("RIP routing daemon")
        .version(env!("CARGO_PKG_VERSION"))
        .arg(
            Arg::with_name("config")
                .short("c")
                .long("config")
                .value_name("file")
                .help("Specify an alternative configuration file."),
        )
        .get_matches();

    // Read configuration file.
    let config_file = matches.value_of("config");
    let config = match Config::load(config_file) {
        Ok(config) => config,
        Err(error) => {
            eprintln!("{error}");
            std::process::exit(1);
        }
    };

    // Initialize tracing.
    init_tracing(&config.logging);

    let addr = match config.rip.address.parse::<SocketAddr>() {
        Ok(addr) => addr,
        Err(error) => {
            error!(address = %config.rip.address, %error, "invalid RIP address");
            std::process::exit(1);
        }
    };
    let startup_config = match config.startup_config.as_deref() {
        Some(path) => match load_startup_config(path) {
            Ok(changes) => Some(changes),
            Err(error) => {
                error!(%error, "failed to load startup configuration");
                std::process::exit(1);
            }
        },
        None => None,
    };

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(error) => {
            error!(%error, "failed to create async runtime");
            std::process::exit(1);
        }
    };

    // We're ready to go!
    info!("starting up");

    runtime.block_on(async move {
        // Spawn signal listener.
        let mut signal_rx = signal_listener();

        // Spawn the provider task.
        let (nb_tx, nb_rx) = mpsc::channel(4);
        let master = Master::new(Box::new(UdpSocketFactory::new(addr)));
        let provider = tokio::spawn(ripd_northbound::run(master, nb_rx));

        if let Some(changes) = startup_config {
            startup_commit(&nb_tx, changes).await;
        }

        let _ = signal_rx.recv().await;

        // Closing the channel stops the provider task.
        drop(nb_tx);
        if let Err(error) = provider.await {
            error!(%error, "provider task failed");
        }
    });

    info!("exiting");
}

// ===== unit tests =====
