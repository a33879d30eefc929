//! Gateway API Client
//!
//! Thin typed wrapper over the gateway's REST endpoints. Every request
//! carries the fixed client-side timeout; a timed-out request surfaces as
//! [`Error::Timeout`] rather than a generic network failure so the operator
//! can tell a dead gateway from a slow one.

use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;
use url::Url;

use crate::constants::REQUEST_TIMEOUT_SECS;
use crate::domain::{Device, DisplayCard, NetworkConfig, SystemConfig};
use crate::error::{Error, Result};

/// HTTP client for one gateway
#[derive(Clone, Debug)]
pub struct GatewayClient {
    http: reqwest::Client,
    base: Url,
}

impl GatewayClient {
    /// Create a client for the gateway at `base` (e.g. `http://192.168.1.100:8000`)
    pub fn new(base: Url) -> Result<Self> {
        Self::with_timeout(base, Duration::from_secs(REQUEST_TIMEOUT_SECS))
    }

    fn with_timeout(base: Url, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { http, base })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    // ==================== Devices ====================

    pub async fn get_devices(&self) -> Result<Vec<Device>> {
        self.get_json("/api/devices/get").await
    }

    pub async fn set_devices(&self, devices: &[Device]) -> Result<()> {
        self.post_json("/api/devices/set", &devices).await
    }

    // ==================== Dashboard ====================

    pub async fn get_home(&self) -> Result<Vec<DisplayCard>> {
        self.get_json("/api/home/get").await
    }

    pub async fn set_home(&self, cards: &[DisplayCard]) -> Result<()> {
        self.post_json("/api/home/set", &cards).await
    }

    // ==================== Network ====================

    pub async fn get_network(&self) -> Result<NetworkConfig> {
        self.get_json("/api/network/get").await
    }

    pub async fn set_network(&self, config: &NetworkConfig) -> Result<()> {
        self.post_json("/api/network/set", config).await
    }

    // ==================== System ====================

    pub async fn get_system(&self) -> Result<SystemConfig> {
        self.get_json("/api/system/get").await
    }

    pub async fn set_system(&self, config: &SystemConfig) -> Result<()> {
        self.post_json("/api/system/set", config).await
    }

    // ==================== Control ====================

    pub async fn reboot(&self) -> Result<()> {
        self.post_empty("/api/reboot/set").await
    }

    pub async fn factory_reset(&self) -> Result<()> {
        self.post_empty("/api/factory/set").await
    }

    // ==================== Session ====================

    /// Probe whether the session is still valid
    pub async fn login(&self) -> Result<()> {
        let url = self.endpoint("/api/login")?;
        let response = self.http.get(url).send().await?;
        Self::ensure_ok(&response, "/api/login")?;
        Ok(())
    }

    pub async fn logout(&self) -> Result<()> {
        self.post_empty("/api/logout").await
    }

    // ==================== Internals ====================

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base.join(path).map_err(|e| Error::Invalid {
            message: format!("Bad endpoint {path}: {e}"),
        })
    }

    fn ensure_ok(response: &reqwest::Response, endpoint: &str) -> Result<()> {
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Status {
                status: status.as_u16(),
                endpoint: endpoint.to_string(),
            });
        }
        Ok(())
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.endpoint(path)?;
        let response = self.http.get(url).send().await?;
        Self::ensure_ok(&response, path)?;
        Ok(response.json().await?)
    }

    async fn post_json<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<()> {
        let url = self.endpoint(path)?;
        let response = self.http.post(url).json(body).send().await?;
        Self::ensure_ok(&response, path)
    }

    async fn post_empty(&self, path: &str) -> Result<()> {
        let url = self.endpoint(path)?;
        let response = self.http.post(url).send().await?;
        Self::ensure_ok(&response, path)
    }
}
