//! Serial transport
//!
//! [`SerialChannel`] drives a tokio-serial stream from a spawned task. The
//! task and the owning thread only share channels: outbound bytes travel over an
//! unbounded tokio mpsc, notifications come back over a std mpsc that the owner
//! drains with [`Channel::poll_event`]. Writes are never dropped while a
//! session is open, so a burst such as a firmware image reaches the wire intact.

use std::sync::mpsc::{self, Receiver, Sender};
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::runtime::Handle;
use tokio::sync::{mpsc as tokio_mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio_serial::SerialPortBuilderExt;
use tracing::{debug, info, warn};

use crate::channel::{Channel, ChannelEvent, LinkState};
use crate::error::LinkError;
use crate::params::ConnectionParams;

/// Size of the read buffer used by the I/O task
const READ_BUFFER_SIZE: usize = 256;

/// State of one open session
struct LinkSession {
    params: ConnectionParams,
    data_tx: tokio_mpsc::UnboundedSender<Vec<u8>>,
    shutdown_tx: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
}

/// Channel backed by a native serial port
pub struct SerialChannel {
    rt: Handle,
    event_tx: Sender<ChannelEvent>,
    event_rx: Receiver<ChannelEvent>,
    session: Option<LinkSession>,
    last_error: Option<String>,
}

impl SerialChannel {
    /// Create a closed channel whose I/O tasks run on `rt`
    pub fn new(rt: Handle) -> Self {
        let (event_tx, event_rx) = mpsc::channel();
        Self {
            rt,
            event_tx,
            event_rx,
            session: None,
            last_error: None,
        }
    }

    /// Parameters of the current session, if one is open
    pub fn params(&self) -> Option<&ConnectionParams> {
        self.session.as_ref().map(|s| &s.params)
    }

    /// Start a session over an already opened stream
    fn attach<T>(&mut self, params: ConnectionParams, stream: T)
    where
        T: AsyncRead + AsyncWrite + Unpin + Send + 'static,
    {
        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let (data_tx, data_rx) = tokio_mpsc::unbounded_channel();
        let task = self.rt.spawn(run_link_io(
            stream,
            shutdown_rx,
            data_rx,
            self.event_tx.clone(),
        ));

        info!("Opened link on {}", params);
        self.last_error = None;
        self.session = Some(LinkSession {
            params,
            data_tx,
            shutdown_tx: Some(shutdown_tx),
            task,
        });
    }
}

impl Channel for SerialChannel {
    fn open(&mut self, params: &ConnectionParams) -> Result<(), LinkError> {
        self.close();

        let stream = {
            // open_native_async registers with the reactor of the current runtime
            let _guard = self.rt.enter();
            tokio_serial::new(params.port.as_str(), params.baud_rate)
                .timeout(Duration::from_millis(100))
                .open_native_async()
                .map_err(|e| LinkError::OpenFailed {
                    port: params.port.clone(),
                    reason: e.to_string(),
                })?
        };

        self.attach(params.clone(), stream);
        Ok(())
    }

    fn close(&mut self) {
        if let Some(mut session) = self.session.take() {
            if let Some(tx) = session.shutdown_tx.take() {
                let _ = tx.send(());
            }
            info!("Closed link on {}", session.params);
        }
    }

    fn write(&mut self, data: &[u8]) {
        let Some(session) = self.session.as_ref() else {
            debug!("Dropping {} bytes written while closed", data.len());
            return;
        };

        if session.data_tx.send(data.to_vec()).is_err() {
            debug!(
                "Link task on {} has ended, dropping {} bytes",
                session.params.port,
                data.len()
            );
        }
    }

    fn state(&self) -> LinkState {
        match &self.session {
            Some(session) if !session.task.is_finished() => LinkState::Open,
            _ => LinkState::Closed,
        }
    }

    fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    fn poll_event(&mut self) -> Option<ChannelEvent> {
        let event = self.event_rx.try_recv().ok()?;
        if let ChannelEvent::Error(text) = &event {
            self.last_error = Some(text.clone());
        }
        Some(event)
    }
}

impl Drop for SerialChannel {
    fn drop(&mut self) {
        self.close();
    }
}

/// Run the I/O loop for one link session
///
/// Generic over the stream so tests can drive it with an in-memory duplex.
/// Returns when shutdown is signalled, the data channel closes, the event
/// receiver is gone, or the stream fails. Stream failures are reported as
/// [`ChannelEvent::Error`] before returning.
pub async fn run_link_io<T>(
    mut io: T,
    mut shutdown_rx: oneshot::Receiver<()>,
    mut data_rx: tokio_mpsc::UnboundedReceiver<Vec<u8>>,
    events: Sender<ChannelEvent>,
) where
    T: AsyncRead + AsyncWrite + Unpin + Send,
{
    let mut buffer = vec![0u8; READ_BUFFER_SIZE];

    loop {
        tokio::select! {
            _ = &mut shutdown_rx => {
                break;
            }

            data = data_rx.recv() => {
                let Some(data) = data else {
                    break;
                };
                debug!("Link writing {} bytes: {:02X?}", data.len(), data);
                let result = match io.write_all(&data).await {
                    Ok(()) => io.flush().await,
                    Err(e) => Err(e),
                };
                if let Err(e) = result {
                    let _ = events.send(ChannelEvent::Error(format!("Write error: {}", e)));
                    break;
                }
            }

            result = io.read(&mut buffer) => {
                match result {
                    Ok(0) => {
                        let _ = events.send(ChannelEvent::Error(
                            "Connection closed by device".to_string(),
                        ));
                        break;
                    }
                    Ok(n) => {
                        debug!("Link received {} bytes", n);
                        if events.send(ChannelEvent::DataAvailable(buffer[..n].to_vec())).is_err() {
                            break;
                        }
                    }
                    Err(e)
                        if e.kind() == std::io::ErrorKind::WouldBlock
                            || e.kind() == std::io::ErrorKind::TimedOut => {}
                    Err(e) => {
                        warn!("Link read error: {}", e);
                        let _ = events.send(ChannelEvent::Error(format!("Read error: {}", e)));
                        break;
                    }
                }
            }
        }
    }

    debug!("Link I/O loop ended");
}
