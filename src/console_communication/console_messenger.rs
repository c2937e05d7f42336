use super::console_endpoint::{ConsoleEndpoint, ConsoleEvent};
use super::control_messages::{self, DownstreamContent, UpstreamContent};
use crate::run_control::{ControlCommand, RunStatus};
use crate::{event, info, warn};
use std::sync::Arc;
use tokio::sync::{broadcast::error::RecvError, mpsc, watch};
use tokio_util::sync::CancellationToken;

/// Translates console traffic into run manager commands and mirrors its status back.
pub(crate) struct ConsoleMessenger {
    endpoint: Arc<ConsoleEndpoint>,
    status: watch::Receiver<RunStatus>,
}

/// The run manager command requested by an upstream message, if any.
pub(super) fn command_for(content: &UpstreamContent) -> Option<ControlCommand> {
    match content {
        UpstreamContent::Pause(_) => Some(ControlCommand::Pause),
        UpstreamContent::Resume(_) => Some(ControlCommand::Resume),
        UpstreamContent::Step(_) => Some(ControlCommand::Step),
        UpstreamContent::Startup(_) => Some(ControlCommand::Startup),
        UpstreamContent::Shutdown(_) => Some(ControlCommand::Shutdown),
        UpstreamContent::ResetScheduler(_) => Some(ControlCommand::ResetScheduler),
        UpstreamContent::Ping(_) | UpstreamContent::GetStatus(_) => None,
    }
}

impl ConsoleMessenger {
    pub(crate) async fn start(
        bind_addr: &str,
        commands: mpsc::Sender<ControlCommand>,
        status: watch::Receiver<RunStatus>,
        cancel: CancellationToken,
    ) -> Result<Self, std::io::Error> {
        let endpoint = Arc::new(ConsoleEndpoint::start(bind_addr, cancel.clone()).await?);
        let mut receiver = endpoint.upstream_event_receiver().resubscribe();
        let endpoint_local = Arc::clone(&endpoint);
        let status_local = status.clone();
        let cancel_local = cancel.clone();

        tokio::spawn(async move {
            loop {
                let received = tokio::select! {
                    ev = receiver.recv() => ev,
                    () = cancel_local.cancelled() => break,
                };
                let content = match received {
                    Ok(ConsoleEvent::Message(content)) => content,
                    Ok(ConsoleEvent::Connected) => {
                        Self::push_status(&endpoint_local, &status_local);
                        continue;
                    }
                    Ok(ConsoleEvent::Disconnected) => continue,
                    Err(RecvError::Lagged(n)) => {
                        warn!("Dropped {n} console messages.");
                        continue;
                    }
                    Err(RecvError::Closed) => break,
                };
                event!("Console message: {content:?}");
                if let Some(cmd) = command_for(&content) {
                    if commands.send(cmd).await.is_err() {
                        warn!("Run manager is gone, dropping {cmd}.");
                        break;
                    }
                    continue;
                }
                match content {
                    UpstreamContent::Ping(ping) => endpoint_local.send_downstream(
                        DownstreamContent::Pong(control_messages::Pong { echo: ping.echo }),
                    ),
                    UpstreamContent::GetStatus(_) => {
                        Self::push_status(&endpoint_local, &status_local);
                    }
                    _ => {}
                }
            }
        });

        let endpoint_local = Arc::clone(&endpoint);
        let mut status_changes = status.clone();
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    changed = status_changes.changed() => if changed.is_err() { break },
                    () = cancel.cancelled() => break,
                }
                Self::push_status(&endpoint_local, &status_changes);
            }
            info!("Status publication stopped.");
        });

        Ok(Self { endpoint, status })
    }

    fn push_status(endpoint: &ConsoleEndpoint, status: &watch::Receiver<RunStatus>) {
        if !endpoint.is_console_connected() {
            return;
        }
        let msg = control_messages::Status::from(&*status.borrow());
        endpoint.send_downstream(DownstreamContent::Status(msg));
    }

    /// Sends the latest status to connected consoles.
    pub(crate) fn broadcast_status(&self) { Self::push_status(&self.endpoint, &self.status); }
}
