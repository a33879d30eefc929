//! Telemetry Channel
//!
//! Websocket connection to the gateway's push feed, split into a pure state
//! machine ([`ChannelSupervisor`]) and a tokio run loop that drives it. The
//! supervisor never sleeps or spawns; reconnect delays come back as data so
//! the lifecycle is testable without a clock. The run loop schedules exactly
//! one reconnect per close, repeats for as long as the channel is wanted,
//! and cancels everything when the stop signal fires.

use std::time::Duration;

use crossbeam_channel::Sender;
use futures::{SinkExt, StreamExt};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use url::Url;

use crate::constants::{WS_PATH, WS_RECONNECT_DELAY_MS};
use crate::error::{Error, Result};
use crate::logs::OutboundPayload;
use crate::telemetry::{TelemetryUpdate, parse_update};

/// Lifecycle state of the telemetry channel
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChannelState {
    /// Created, nothing attempted yet
    Idle,
    /// Handshake in progress
    Connecting,
    /// Connected, frames flowing
    Open,
    /// Waiting out the fixed delay before the next attempt
    Reconnecting,
    /// Torn down; no further attempts
    Closed,
}

/// Events fanned out to the state layer
#[derive(Clone, Debug)]
pub enum TelemetryEvent {
    /// A node value update to reconcile onto cards
    Update(TelemetryUpdate),
    /// A raw text frame that was not an update, fed to the log console
    LogLine(String),
    /// Channel lifecycle change, for the status indicator
    State(ChannelState),
}

/// Pure connection state machine.
///
/// The run loop reports what happened (`on_connecting`, `on_open`,
/// `on_close`, `on_teardown`); the supervisor answers with the state to
/// advertise and, on close, whether to schedule the single fixed-delay
/// reconnect.
#[derive(Debug)]
pub struct ChannelSupervisor {
    state: ChannelState,
    reconnect_delay: Duration,
}

impl ChannelSupervisor {
    pub fn new(reconnect_delay: Duration) -> Self {
        Self {
            state: ChannelState::Idle,
            reconnect_delay,
        }
    }

    pub fn state(&self) -> ChannelState {
        self.state
    }

    /// A connection attempt is starting
    pub fn on_connecting(&mut self) {
        if self.state != ChannelState::Closed {
            self.state = ChannelState::Connecting;
        }
    }

    /// The handshake succeeded
    pub fn on_open(&mut self) {
        if self.state != ChannelState::Closed {
            self.state = ChannelState::Open;
        }
    }

    /// The connection dropped (or never came up). Returns the delay to wait
    /// before the next attempt, or `None` once the channel is torn down.
    pub fn on_close(&mut self) -> Option<Duration> {
        if self.state == ChannelState::Closed {
            return None;
        }
        self.state = ChannelState::Reconnecting;
        Some(self.reconnect_delay)
    }

    /// The owning view went away; cancel any pending reconnect
    pub fn on_teardown(&mut self) {
        self.state = ChannelState::Closed;
    }
}

/// Build the telemetry endpoint URL for a gateway host
pub fn derive_ws_url(host: &str, port: u16, tls: bool) -> Result<Url> {
    let scheme = if tls { "wss" } else { "ws" };
    Url::parse(&format!("{scheme}://{host}:{port}{WS_PATH}")).map_err(|e| Error::Invalid {
        message: format!("Bad websocket URL for {host}:{port}: {e}"),
    })
}

/// Handle to a spawned telemetry channel task
pub struct ChannelHandle {
    stop_tx: watch::Sender<()>,
    outbound_tx: mpsc::UnboundedSender<OutboundPayload>,
    task: JoinHandle<()>,
}

impl ChannelHandle {
    /// Queue a payload for the log feed. Queued payloads are delivered when
    /// the connection is open and wait out reconnects otherwise.
    pub fn send(&self, payload: OutboundPayload) -> Result<()> {
        self.outbound_tx.send(payload).map_err(|_| Error::Connection {
            message: "Telemetry channel is closed".to_string(),
        })
    }

    /// Signal teardown and let the task wind down. Pending reconnect timers
    /// are cancelled, not awaited.
    pub fn shutdown(self) {
        let _ = self.stop_tx.send(());
        self.task.abort();
    }
}

/// Spawn the channel run loop, fanning events out over `tx`
pub fn spawn_channel(url: Url, tx: Sender<TelemetryEvent>) -> ChannelHandle {
    let (stop_tx, stop_rx) = watch::channel(());
    let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
    let task = tokio::spawn(run_loop(
        url,
        tx,
        stop_rx,
        outbound_rx,
        Duration::from_millis(WS_RECONNECT_DELAY_MS),
    ));
    ChannelHandle {
        stop_tx,
        outbound_tx,
        task,
    }
}

async fn run_loop(
    url: Url,
    tx: Sender<TelemetryEvent>,
    mut stop_rx: watch::Receiver<()>,
    mut outbound_rx: mpsc::UnboundedReceiver<OutboundPayload>,
    reconnect_delay: Duration,
) {
    let mut supervisor = ChannelSupervisor::new(reconnect_delay);

    loop {
        supervisor.on_connecting();
        let _ = tx.send(TelemetryEvent::State(supervisor.state()));

        match connect_async(url.as_str()).await {
            Ok((mut stream, _response)) => {
                supervisor.on_open();
                let _ = tx.send(TelemetryEvent::State(supervisor.state()));
                tracing::info!("Telemetry channel connected to {url}");

                loop {
                    tokio::select! {
                        frame = stream.next() => match frame {
                            Some(Ok(Message::Text(text))) => {
                                match parse_update(&text) {
                                    Some(update) => {
                                        let _ = tx.send(TelemetryEvent::Update(update));
                                    }
                                    None => {
                                        let _ = tx.send(TelemetryEvent::LogLine(text));
                                    }
                                }
                            }
                            // Control frames carry no updates
                            Some(Ok(_)) => {}
                            Some(Err(error)) => {
                                tracing::warn!("Telemetry channel error: {error}");
                                break;
                            }
                            None => break,
                        },
                        payload = outbound_rx.recv() => match payload {
                            Some(OutboundPayload::Ascii(text)) => {
                                if let Err(error) = stream.send(Message::Text(text)).await {
                                    tracing::warn!("Telemetry send failed: {error}");
                                    break;
                                }
                            }
                            Some(OutboundPayload::Binary(bytes)) => {
                                if let Err(error) = stream.send(Message::Binary(bytes)).await {
                                    tracing::warn!("Telemetry send failed: {error}");
                                    break;
                                }
                            }
                            // Handle dropped without shutdown; stop driving the feed
                            None => {
                                supervisor.on_teardown();
                                return;
                            }
                        },
                        _ = stop_rx.changed() => {
                            supervisor.on_teardown();
                            let _ = tx.send(TelemetryEvent::State(supervisor.state()));
                            return;
                        }
                    }
                }
            }
            Err(error) => {
                tracing::warn!("Telemetry connect to {url} failed: {error}");
            }
        }

        let Some(delay) = supervisor.on_close() else {
            return;
        };
        let _ = tx.send(TelemetryEvent::State(supervisor.state()));
        tracing::info!("Telemetry channel reconnecting in {}s", delay.as_secs());

        tokio::select! {
            _ = tokio::time::sleep(delay) => {}
            _ = stop_rx.changed() => {
                supervisor.on_teardown();
                let _ = tx.send(TelemetryEvent::State(supervisor.state()));
                return;
            }
        }
    }
}
