#![warn(clippy::shadow_reuse, clippy::shadow_same, clippy::builtin_type_shadow)]
mod catalog;
mod config;
mod console_communication;
mod devices;
mod http_handler;
mod keychain;
mod logger;
mod run_control;
mod scheduling;
mod util;

use crate::catalog::{CatalogGateway, EquatorialCoord, LocalCatalog};
use crate::config::{Config, PolicyKind};
use crate::console_communication::ConsoleMessenger;
use crate::keychain::Keychain;
use crate::run_control::RunManager;
use crate::scheduling::{GroupPolicy, InOrderPolicy, RandomPolicy, Scheduler, WeightedPolicy};
use std::{path::Path, sync::Arc};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Buffered operator commands between the console and the run manager.
const COMMAND_BUFFER: usize = 32;

#[tokio::main(flavor = "multi_thread", worker_threads = 2)]
async fn main() {
    let cfg = Config::from_env().await.unwrap_or_else(|e| fatal!("{e}"));

    let catalog_dir = Path::new(&cfg.scheduler.catalog_dir);
    let catalog: Arc<dyn CatalogGateway> = Arc::new(
        LocalCatalog::open(catalog_dir)
            .await
            .unwrap_or_else(|e| fatal!("Loading catalog from {}: {e}", catalog_dir.display())),
    );

    let keychain = if cfg.simulate {
        info!("Using simulated devices.");
        let park = EquatorialCoord::new(0.0, cfg.site.latitude_deg);
        Keychain::simulated(park, Arc::clone(&catalog))
    } else {
        Keychain::remote(&cfg.rpc, Arc::clone(&catalog))
            .unwrap_or_else(|e| fatal!("Creating device clients: {e}"))
    };
    let keychain = Arc::new(keychain);

    let policy: Box<dyn GroupPolicy> = match cfg.scheduler.policy {
        PolicyKind::InOrder => Box::new(InOrderPolicy::new()),
        PolicyKind::Random => Box::new(RandomPolicy::new()),
        PolicyKind::Weighted => Box::new(WeightedPolicy::new(
            cfg.cost_weights(),
            cfg.site.longitude_deg,
            Some(keychain.telescope()),
        )),
    };
    let scheduler = Scheduler::new(catalog, policy, cfg.single_search(), cfg.bands());

    let (command_tx, command_rx) = mpsc::channel(COMMAND_BUFFER);
    let mut manager =
        RunManager::new(Arc::clone(&keychain), Box::new(scheduler), cfg.run_config(), command_rx);

    let cancel = CancellationToken::new();
    let bind_addr = cfg.rpc.console_bind.as_str();
    let messenger = ConsoleMessenger::start(bind_addr, command_tx, manager.subscribe(), cancel.clone())
        .await
        .unwrap_or_else(|e| fatal!("Binding console endpoint {bind_addr}: {e}"));

    manager.startup().await;
    messenger.broadcast_status();

    loop {
        tokio::select! {
            () = manager.update() => {},
            res = tokio::signal::ctrl_c() => {
                if let Err(e) = res {
                    error!("Listening for Ctrl-C failed: {e}");
                }
                break;
            }
        }
    }

    info!("Interrupted, parking.");
    manager.shutdown().await;
    cancel.cancel();
}
