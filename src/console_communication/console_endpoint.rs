use super::control_messages;
use crate::{error, info, warn};
use prost::Message;
use std::io::{Cursor, ErrorKind};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::net::tcp::{ReadHalf, WriteHalf};
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone)]
pub enum ConsoleEvent {
    Connected,
    Disconnected,
    Message(control_messages::UpstreamContent),
}

/// TCP listener speaking length-prefixed protobuf frames with any number of consoles.
pub(crate) struct ConsoleEndpoint {
    downstream_sender: broadcast::Sender<Option<Vec<u8>>>,
    upstream_event_receiver: broadcast::Receiver<ConsoleEvent>,
    cancel: CancellationToken,
}

impl ConsoleEndpoint {
    /// Upper bound for a single upstream frame.
    const MAX_FRAME_LEN: u32 = 64 * 1024;

    async fn handle_connection_rx(
        socket: &mut ReadHalf<'_>,
        upstream_event_sender: &broadcast::Sender<ConsoleEvent>,
    ) -> Result<(), std::io::Error> {
        loop {
            let length = socket.read_u32().await?;
            if length > Self::MAX_FRAME_LEN {
                return Err(std::io::Error::new(ErrorKind::InvalidData, "oversized frame"));
            }

            let mut buffer = vec![0u8; length as usize];
            socket.read_exact(&mut buffer).await?;

            match control_messages::Upstream::decode(&mut Cursor::new(buffer)) {
                Ok(control_messages::Upstream { content: Some(content) }) => {
                    // Only fails without subscribers, in which case nobody listens anyway.
                    let _ = upstream_event_sender.send(ConsoleEvent::Message(content));
                }
                Ok(_) => warn!("Empty console message."),
                Err(e) => warn!("Undecodable console message: {e}"),
            }
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    async fn handle_connection_tx(
        socket: &mut WriteHalf<'_>,
        downstream_receiver: &mut broadcast::Receiver<Option<Vec<u8>>>,
    ) -> Result<(), std::io::Error> {
        while let Ok(Some(message_buffer)) = downstream_receiver.recv().await {
            socket.write_u32(message_buffer.len() as u32).await?;
            socket.write_all(&message_buffer).await?;
        }

        Ok(())
    }

    /// Binds `bind_addr` and serves consoles until `cancel` fires.
    pub(crate) async fn start(
        bind_addr: &str,
        cancel: CancellationToken,
    ) -> Result<Self, std::io::Error> {
        let listener = TcpListener::bind(bind_addr).await?;
        info!("Operator console listening on {bind_addr}.");
        let downstream_sender = broadcast::Sender::new(16);
        let upstream_event_sender = broadcast::Sender::new(16);
        let inst = Self {
            downstream_sender: downstream_sender.clone(),
            upstream_event_receiver: upstream_event_sender.subscribe(),
            cancel: cancel.clone(),
        };

        tokio::spawn(async move {
            loop {
                let accept = tokio::select! {
                    accept = listener.accept() => accept,
                    () = cancel.cancelled() => break,
                };

                let mut socket = match accept {
                    Ok((socket, peer)) => {
                        info!("Console connected from {peer}.");
                        socket
                    }
                    Err(e) => {
                        error!("Console listener failed: {e}");
                        break;
                    }
                };
                let _ = upstream_event_sender.send(ConsoleEvent::Connected);
                let upstream_event_sender_local = upstream_event_sender.clone();
                let mut downstream_receiver = downstream_sender.subscribe();
                let cancel_local = cancel.clone();

                tokio::spawn(async move {
                    let (mut rx_socket, mut tx_socket) = socket.split();

                    let result = tokio::select! {
                        res = ConsoleEndpoint::handle_connection_tx(&mut tx_socket, &mut downstream_receiver) => res,
                        res = ConsoleEndpoint::handle_connection_rx(&mut rx_socket, &upstream_event_sender_local) => res,
                        () = cancel_local.cancelled() => Ok(()),
                    };

                    let _ = upstream_event_sender_local.send(ConsoleEvent::Disconnected);
                    match result {
                        Err(e)
                            if e.kind() == ErrorKind::UnexpectedEof
                                || e.kind() == ErrorKind::ConnectionReset
                                || e.kind() == ErrorKind::ConnectionAborted =>
                        {
                            info!("Console disconnected.");
                            return;
                        }
                        Err(e) => warn!("Closing connection to console due to {e}"),
                        Ok(()) => {}
                    }
                    let _ = socket.shutdown().await;
                });
            }
        });
        Ok(inst)
    }

    pub(crate) fn send_downstream(&self, msg: control_messages::DownstreamContent) {
        let _ = self.downstream_sender.send(Some(
            control_messages::Downstream { content: Some(msg) }.encode_to_vec(),
        ));
    }

    pub(crate) fn is_console_connected(&self) -> bool { self.downstream_sender.receiver_count() > 0 }

    pub(crate) fn upstream_event_receiver(&self) -> &broadcast::Receiver<ConsoleEvent> {
        &self.upstream_event_receiver
    }
}

impl Drop for ConsoleEndpoint {
    fn drop(&mut self) {
        self.cancel.cancel();
        let _ = self.downstream_sender.send(None);
    }
}
