//! Save Coordination
//!
//! Every persisted change follows the same sequence: push the new
//! configuration, then reboot the gateway so it takes effect. The two steps
//! are not atomic, so the outcomes are kept distinct: a failed push means
//! nothing changed on the gateway, while a failed reboot after a successful
//! push means the configuration landed but is not live yet. Only one save
//! may be in flight at a time.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::domain::{Device, DisplayCard, NetworkConfig, SystemConfig};
use crate::error::{Error, Result};
use crate::gateway::GatewayClient;

/// Serializes saves against one gateway
#[derive(Clone)]
pub struct SaveCoordinator {
    client: GatewayClient,
    busy: Arc<AtomicBool>,
}

/// Releases the busy flag when the save finishes, by any path
struct BusyGuard {
    busy: Arc<AtomicBool>,
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
    }
}

impl SaveCoordinator {
    pub fn new(client: GatewayClient) -> Self {
        Self {
            client,
            busy: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn client(&self) -> &GatewayClient {
        &self.client
    }

    /// Whether a save is currently in flight
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    fn acquire(&self) -> Result<BusyGuard> {
        if self
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(Error::Busy);
        }
        Ok(BusyGuard {
            busy: Arc::clone(&self.busy),
        })
    }

    /// Push the device list and reboot
    pub async fn save_devices(&self, devices: &[Device]) -> Result<()> {
        let _guard = self.acquire()?;
        self.client.set_devices(devices).await?;
        self.reboot_after_save().await
    }

    /// Push the dashboard card list and reboot
    pub async fn save_cards(&self, cards: &[DisplayCard]) -> Result<()> {
        let _guard = self.acquire()?;
        self.client.set_home(cards).await?;
        self.reboot_after_save().await
    }

    /// Validate, push the network configuration and reboot
    pub async fn save_network(&self, config: &NetworkConfig) -> Result<()> {
        let errors = config.validate();
        if let Some(first) = errors.first() {
            return Err(Error::Invalid {
                message: first.to_string(),
            });
        }
        let _guard = self.acquire()?;
        self.client.set_network(config).await?;
        self.reboot_after_save().await
    }

    /// Validate, push the system configuration and reboot
    pub async fn save_system(&self, config: &SystemConfig) -> Result<()> {
        let errors = config.validate();
        if let Some(first) = errors.first() {
            return Err(Error::Invalid {
                message: first.to_string(),
            });
        }
        let _guard = self.acquire()?;
        self.client.set_system(config).await?;
        self.reboot_after_save().await
    }

    /// Reboot without a preceding save, for the explicit reboot action
    pub async fn reboot(&self) -> Result<()> {
        let _guard = self.acquire()?;
        self.client.reboot().await
    }

    /// Factory reset wipes the configuration and reboots on its own
    pub async fn factory_reset(&self) -> Result<()> {
        let _guard = self.acquire()?;
        self.client.factory_reset().await
    }

    async fn reboot_after_save(&self) -> Result<()> {
        if let Err(error) = self.client.reboot().await {
            tracing::error!("Configuration saved but reboot failed: {error}");
            return Err(Error::RebootAfterSave {
                message: error.to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::SocketAddr;
    use std::sync::Mutex;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};
    use url::Url;

    fn coordinator() -> SaveCoordinator {
        let client = GatewayClient::new(Url::parse("http://127.0.0.1:1").expect("base url"))
            .expect("client");
        SaveCoordinator::new(client)
    }

    /// Minimal canned-response gateway: answers each request with the status
    /// `respond` picks for its path and records the paths it served.
    async fn stub_gateway(respond: fn(&str) -> u16) -> (SocketAddr, Arc<Mutex<Vec<String>>>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("local addr");
        let seen = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&seen);
        tokio::spawn(async move {
            loop {
                let Ok((socket, _)) = listener.accept().await else {
                    return;
                };
                serve_one(socket, &log, respond).await;
            }
        });
        (addr, seen)
    }

    async fn serve_one(mut socket: TcpStream, log: &Mutex<Vec<String>>, respond: fn(&str) -> u16) {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];
        let header_end = loop {
            match socket.read(&mut chunk).await {
                Ok(0) | Err(_) => return,
                Ok(n) => buf.extend_from_slice(&chunk[..n]),
            }
            if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                break pos + 4;
            }
        };

        let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
        let path = head
            .lines()
            .next()
            .and_then(|line| line.split_whitespace().nth(1))
            .unwrap_or("")
            .to_string();
        let content_length = head
            .lines()
            .find_map(|line| {
                let (name, value) = line.split_once(':')?;
                if name.eq_ignore_ascii_case("content-length") {
                    value.trim().parse::<usize>().ok()
                } else {
                    None
                }
            })
            .unwrap_or(0);

        // Drain the body before answering
        while buf.len() < header_end + content_length {
            match socket.read(&mut chunk).await {
                Ok(0) | Err(_) => break,
                Ok(n) => buf.extend_from_slice(&chunk[..n]),
            }
        }

        let status = respond(&path);
        log.lock().expect("lock").push(path);
        let reason = if status == 200 { "OK" } else { "Internal Server Error" };
        let response =
            format!("HTTP/1.1 {status} {reason}\r\ncontent-length: 0\r\nconnection: close\r\n\r\n");
        let _ = socket.write_all(response.as_bytes()).await;
        let _ = socket.shutdown().await;
    }

    fn coordinator_for(addr: SocketAddr) -> SaveCoordinator {
        let base = Url::parse(&format!("http://{addr}")).expect("base url");
        SaveCoordinator::new(GatewayClient::new(base).expect("client"))
    }

    #[tokio::test]
    async fn test_failed_save_never_triggers_reboot() {
        let (addr, seen) =
            stub_gateway(|path| if path == "/api/devices/set" { 500 } else { 200 }).await;
        let coordinator = coordinator_for(addr);

        let result = coordinator.save_devices(&[]).await;
        assert!(matches!(result, Err(Error::Status { status: 500, .. })));

        let paths = seen.lock().expect("lock").clone();
        assert_eq!(paths, vec!["/api/devices/set".to_string()]);
        assert!(!coordinator.is_busy());
    }

    #[tokio::test]
    async fn test_reboot_failure_after_save_is_surfaced() {
        let (addr, seen) =
            stub_gateway(|path| if path == "/api/reboot/set" { 500 } else { 200 }).await;
        let coordinator = coordinator_for(addr);

        let result = coordinator.save_devices(&[]).await;
        assert!(matches!(result, Err(Error::RebootAfterSave { .. })));

        // The save landed first, then the reboot was attempted and failed
        let paths = seen.lock().expect("lock").clone();
        assert_eq!(
            paths,
            vec!["/api/devices/set".to_string(), "/api/reboot/set".to_string()]
        );
        assert!(!coordinator.is_busy());
    }

    #[tokio::test]
    async fn test_save_and_reboot_both_succeed() {
        let (addr, seen) = stub_gateway(|_| 200).await;
        let coordinator = coordinator_for(addr);

        coordinator.save_devices(&[]).await.expect("save");
        let paths = seen.lock().expect("lock").clone();
        assert_eq!(
            paths,
            vec!["/api/devices/set".to_string(), "/api/reboot/set".to_string()]
        );
    }

    #[test]
    fn test_busy_flag_is_exclusive() {
        let coordinator = coordinator();
        assert!(!coordinator.is_busy());

        let guard = coordinator.acquire().expect("first acquire");
        assert!(coordinator.is_busy());
        assert!(matches!(coordinator.acquire(), Err(Error::Busy)));

        drop(guard);
        assert!(!coordinator.is_busy());
        coordinator.acquire().expect("free again after release");
    }

    #[test]
    fn test_clones_share_the_flag() {
        let coordinator = coordinator();
        let other = coordinator.clone();
        let _guard = coordinator.acquire().expect("acquire");
        assert!(matches!(other.acquire(), Err(Error::Busy)));
    }

    #[tokio::test]
    async fn test_invalid_network_config_rejected_before_busy() {
        let coordinator = coordinator();
        let config = NetworkConfig {
            ip: "not-an-ip".to_string(),
            sm: "255.255.255.0".to_string(),
            gw: "192.168.1.1".to_string(),
            d1: "8.8.8.8".to_string(),
            d2: "8.8.4.4".to_string(),
            dh: false,
        };
        assert!(matches!(
            coordinator.save_network(&config).await,
            Err(Error::Invalid { .. })
        ));
        // Validation failed before the flag was taken
        assert!(!coordinator.is_busy());
    }
}
