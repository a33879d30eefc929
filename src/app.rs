//! Console Session
//!
//! Ties the pieces together for one gateway: configuration stores, the save
//! coordinator, the telemetry channel and the log console. The session is
//! driven from the outside; callers pump queued telemetry events into the
//! stores whenever they want a fresh view.

use std::time::{Duration, Instant};

use ahash::AHashMap;
use chrono::Utc;
use crossbeam_channel::{Receiver, Sender, unbounded};

use crate::connection::GatewayEndpoint;
use crate::constants::{REBOOT_RESYNC_DELAY_MS, SAVE_NOTICE_MS};
use crate::domain::{NetworkConfig, SystemConfig};
use crate::error::Result;
use crate::gateway::{GatewayClient, SaveCoordinator};
use crate::logs::{LogConsole, OutboundPayload, parse_hex_payload};
use crate::store::{CardStore, DeviceStore};
use crate::telemetry::{
    ChannelHandle, ChannelState, TelemetryEvent, apply_update, derive_ws_url, spawn_channel,
};
use crate::utils::format::{format_card_line, format_node_line};

/// A transient operator-facing notice (e.g. "saved, rebooting")
struct Notice {
    text: String,
    shown_at: Instant,
}

/// One console session against one gateway
pub struct ConsoleSession {
    endpoint: GatewayEndpoint,
    coordinator: SaveCoordinator,
    devices: DeviceStore,
    cards: CardStore,
    network: Option<NetworkConfig>,
    system: Option<SystemConfig>,
    /// Most recent value per node name, across all cards
    latest: AHashMap<String, f64>,
    logs: LogConsole,
    channel_state: ChannelState,
    channel: Option<ChannelHandle>,
    events_tx: Sender<TelemetryEvent>,
    events_rx: Receiver<TelemetryEvent>,
    notice: Option<Notice>,
}

impl ConsoleSession {
    /// Create a session for `endpoint`. No network traffic happens until
    /// [`load`](Self::load) is called.
    pub fn new(endpoint: GatewayEndpoint) -> Result<Self> {
        let client = GatewayClient::new(endpoint.http_url()?)?;
        let (events_tx, events_rx) = unbounded();
        Ok(Self {
            endpoint,
            coordinator: SaveCoordinator::new(client),
            devices: DeviceStore::new(),
            cards: CardStore::new(),
            network: None,
            system: None,
            latest: AHashMap::new(),
            logs: LogConsole::new(),
            channel_state: ChannelState::Idle,
            channel: None,
            events_tx,
            events_rx,
            notice: None,
        })
    }

    pub fn endpoint(&self) -> &GatewayEndpoint {
        &self.endpoint
    }

    pub fn devices(&self) -> &DeviceStore {
        &self.devices
    }

    pub fn devices_mut(&mut self) -> &mut DeviceStore {
        &mut self.devices
    }

    pub fn cards(&self) -> &CardStore {
        &self.cards
    }

    pub fn cards_mut(&mut self) -> &mut CardStore {
        &mut self.cards
    }

    pub fn network(&self) -> Option<&NetworkConfig> {
        self.network.as_ref()
    }

    pub fn system(&self) -> Option<&SystemConfig> {
        self.system.as_ref()
    }

    pub fn logs(&self) -> &LogConsole {
        &self.logs
    }

    pub fn logs_mut(&mut self) -> &mut LogConsole {
        &mut self.logs
    }

    pub fn channel_state(&self) -> ChannelState {
        self.channel_state
    }

    /// Last value pushed for a node, if any
    pub fn latest_value(&self, node: &str) -> Option<f64> {
        self.latest.get(node).copied()
    }

    /// Dashboard view, one line per card
    pub fn dashboard_lines(&self) -> Vec<String> {
        let now = Utc::now();
        self.cards
            .cards()
            .iter()
            .map(|card| format_card_line(card, now))
            .collect()
    }

    /// Node listing for the selected device, one line per node
    pub fn selected_node_lines(&self) -> Vec<String> {
        self.devices
            .selected_device()
            .map(|device| device.nodes.iter().map(format_node_line).collect())
            .unwrap_or_default()
    }

    // ==================== Loading ====================

    /// Fetch every configuration section from the gateway
    pub async fn load(&mut self) -> Result<()> {
        let client = self.coordinator.client().clone();
        self.devices = DeviceStore::from_devices(client.get_devices().await?);
        self.cards = CardStore::from_cards(client.get_home().await?);
        self.network = Some(client.get_network().await?);
        self.system = Some(client.get_system().await?);
        tracing::info!(
            "Loaded {} devices, {} cards from {}",
            self.devices.devices().len(),
            self.cards.cards().len(),
            self.endpoint.display_name()
        );
        Ok(())
    }

    // ==================== Telemetry ====================

    /// Start the telemetry channel. The websocket port comes from the loaded
    /// system configuration when available, else the saved endpoint.
    pub fn start_telemetry(&mut self) -> Result<()> {
        if self.channel.is_some() {
            return Ok(());
        }
        let wport = self
            .system
            .as_ref()
            .map(|s| s.wport)
            .unwrap_or(self.endpoint.wport);
        let url = derive_ws_url(&self.endpoint.host, wport, self.endpoint.tls)?;
        self.channel = Some(spawn_channel(url, self.events_tx.clone()));
        Ok(())
    }

    /// Stop the telemetry channel and drop any pending reconnect
    pub fn stop_telemetry(&mut self) {
        if let Some(channel) = self.channel.take() {
            channel.shutdown();
        }
        self.channel_state = ChannelState::Closed;
    }

    /// Drain queued telemetry events into the stores. Returns how many
    /// events were applied.
    pub fn pump_events(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(event) = self.events_rx.try_recv() {
            match event {
                TelemetryEvent::Update(update) => {
                    self.latest.insert(update.node.clone(), update.value);
                    apply_update(self.cards.cards_mut(), &update, Utc::now());
                }
                TelemetryEvent::LogLine(line) => {
                    self.logs.push_line(line);
                }
                TelemetryEvent::State(state) => {
                    self.channel_state = state;
                }
            }
            applied += 1;
        }
        applied
    }

    /// Send an ASCII payload over the log feed
    pub fn send_ascii(&self, text: &str) -> Result<()> {
        self.require_channel()?
            .send(OutboundPayload::Ascii(text.to_string()))
    }

    /// Parse and send a hex payload over the log feed
    pub fn send_hex(&self, input: &str) -> Result<()> {
        let bytes = parse_hex_payload(input)?;
        self.require_channel()?.send(OutboundPayload::Binary(bytes))
    }

    fn require_channel(&self) -> Result<&ChannelHandle> {
        self.channel.as_ref().ok_or_else(|| crate::error::Error::Connection {
            message: "Telemetry channel is not running".to_string(),
        })
    }

    // ==================== Saving ====================

    /// Push the device list, reboot the gateway and resync
    pub async fn save_devices(&mut self) -> Result<()> {
        self.coordinator.save_devices(self.devices.devices()).await?;
        self.after_save().await
    }

    /// Push the dashboard, reboot the gateway and resync
    pub async fn save_cards(&mut self) -> Result<()> {
        self.coordinator.save_cards(self.cards.cards()).await?;
        self.after_save().await
    }

    /// Validate and push the network configuration, reboot and resync
    pub async fn save_network(&mut self, config: NetworkConfig) -> Result<()> {
        self.coordinator.save_network(&config).await?;
        self.network = Some(config);
        self.after_save().await
    }

    /// Validate and push the system configuration, reboot and resync
    pub async fn save_system(&mut self, mut config: SystemConfig) -> Result<()> {
        self.coordinator.save_system(&config).await?;
        // The gateway never echoes the password back
        config.password = None;
        self.system = Some(config);
        self.after_save().await
    }

    async fn after_save(&mut self) -> Result<()> {
        self.set_notice("Configuration saved. Gateway is rebooting...");
        tokio::time::sleep(Duration::from_millis(REBOOT_RESYNC_DELAY_MS)).await;
        self.load().await
    }

    // ==================== Notices ====================

    fn set_notice(&mut self, text: &str) {
        tracing::info!("{text}");
        self.notice = Some(Notice {
            text: text.to_string(),
            shown_at: Instant::now(),
        });
    }

    /// The current notice, if it has not expired yet
    pub fn active_notice(&self) -> Option<&str> {
        self.notice_at(Instant::now())
    }

    fn notice_at(&self, now: Instant) -> Option<&str> {
        let notice = self.notice.as_ref()?;
        if now.duration_since(notice.shown_at) < Duration::from_millis(SAVE_NOTICE_MS) {
            Some(&notice.text)
        } else {
            None
        }
    }
}

impl Drop for ConsoleSession {
    fn drop(&mut self) {
        self.stop_telemetry();
    }
}
