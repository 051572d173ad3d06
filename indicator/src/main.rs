mod config;
mod event;
mod kill;
mod monitor;
mod paths;
mod procs;
mod shutdown;
mod tray;
mod watcher;

use std::sync::Arc;

use clap::Parser;
use log::{error, info};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::event::MenuEvent;
use crate::tray::{ConsoleIndicator, Indicator};

/// Tray indicator that tracks whether a configured process is running.
#[derive(Parser)]
#[command(name = "uptray", version)]
struct Cli {
    /// Index into the [[processes]] list of the settings file.
    #[arg(short = 'i', long = "index")]
    index: usize,
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_secs()
        .init();

    let cli = Cli::parse();

    // ── Configuration ─────────────────────────────────────────────────────────
    let settings_path = match paths::config_file_path() {
        Ok(p) => p,
        Err(e) => {
            error!("{e:#}");
            std::process::exit(2);
        }
    };
    let settings = match config::load(&settings_path) {
        Ok(s) => s,
        Err(e) => {
            error!("{e:#}");
            std::process::exit(2);
        }
    };
    let process_name = match settings.select(cli.index) {
        Ok(entry) => entry.name.clone(),
        Err(e) => {
            error!("{e:#}");
            std::process::exit(2);
        }
    };
    info!("Input item number is: {}", cli.index);

    let cancel = CancellationToken::new();
    let indicator: Arc<dyn Indicator> = Arc::new(ConsoleIndicator);
    let (menu_tx, mut menu_rx) = mpsc::channel::<MenuEvent>(8);

    // ── Monitor worker ────────────────────────────────────────────────────────
    let monitor_task = tokio::spawn(monitor::run(
        process_name.clone(),
        Arc::clone(&indicator),
        cancel.clone(),
    ));

    // Ctrl+C behaves like the Exit menu item.
    {
        let tx = menu_tx.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                let _ = tx.send(MenuEvent::Exit).await;
            }
        });
    }

    // SIGUSR1 stands in for the "Kill All" menu click while no tray toolkit
    // is wired in.
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let tx = menu_tx.clone();
        tokio::spawn(async move {
            let Ok(mut usr1) = signal(SignalKind::user_defined1()) else {
                return;
            };
            while usr1.recv().await.is_some() {
                if tx.send(MenuEvent::KillAll).await.is_err() {
                    break;
                }
            }
        });
    }

    info!(
        "uptray v{} started: watching '{process_name}'",
        env!("CARGO_PKG_VERSION")
    );

    // ── Menu dispatch loop ────────────────────────────────────────────────────
    dispatch_menu_events(menu_rx, cancel, indicator, process_name).await;

    let _ = monitor_task.await;
}

/// Dispatches menu events until Exit arrives or the cancellation signal
/// fires. The monitor cancels the token itself when an internal error forces
/// it down, so the loop must observe the token too — otherwise `main` would
/// stay parked on the channel with nothing left to send on it.
///
/// Menu events may originate on any thread; everything they touch goes
/// through the shared token and the indicator, never the monitor's status.
async fn dispatch_menu_events(
    mut menu_rx: mpsc::Receiver<MenuEvent>,
    cancel: CancellationToken,
    indicator: Arc<dyn Indicator>,
    process_name: String,
) {
    loop {
        let evt = tokio::select! {
            _ = cancel.cancelled() => break,
            evt = menu_rx.recv() => evt,
        };
        match evt {
            Some(MenuEvent::KillAll) => {
                let name = process_name.clone();
                let indicator = Arc::clone(&indicator);
                tokio::spawn(async move {
                    kill::kill_all(&name, indicator.as_ref()).await;
                });
            }
            Some(MenuEvent::Exit) => {
                shutdown::request(&cancel, indicator.as_ref());
                break;
            }
            None => break,
        }
    }
}
