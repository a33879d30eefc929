//! Gateway Endpoint Configuration
//!
//! Saved gateway endpoints and their persistence. The console can be pointed
//! at several gateways; the list lives in a TOML file under the user's config
//! directory with the login passwords encrypted at rest.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::info;
use url::Url;

use crate::constants::DEFAULT_WS_PORT;
use crate::error::{Error, Result};
use crate::helpers::{decrypt, encrypt, get_or_create_config_dir};

/// One saved gateway endpoint
#[derive(Debug, Default, Deserialize, Clone, Serialize, Eq, PartialEq)]
pub struct GatewayEndpoint {
    /// Endpoint name (user-visible)
    pub name: String,
    /// Gateway host or IP address
    pub host: String,
    /// HTTP API port
    pub hport: u16,
    /// Websocket telemetry port
    pub wport: u16,
    /// Use https/wss
    pub tls: bool,
    /// Login password (encrypted at rest)
    pub password: Option<String>,
    /// Last update timestamp (RFC3339)
    pub updated_at: Option<String>,
}

/// TOML wrapper structure for the endpoint list
#[derive(Debug, Default, Deserialize, Clone, Serialize)]
pub(crate) struct GatewayEndpoints {
    gateways: Vec<GatewayEndpoint>,
}

impl GatewayEndpoint {
    pub fn new(name: impl Into<String>, host: impl Into<String>, hport: u16) -> Self {
        Self {
            name: name.into(),
            host: host.into(),
            hport,
            wport: DEFAULT_WS_PORT,
            tls: false,
            password: None,
            updated_at: None,
        }
    }

    /// Base URL for the REST API
    pub fn http_url(&self) -> Result<Url> {
        let scheme = if self.tls { "https" } else { "http" };
        Url::parse(&format!("{scheme}://{}:{}", self.host, self.hport)).map_err(|e| {
            Error::Invalid {
                message: format!("Bad gateway address {}:{}: {e}", self.host, self.hport),
            }
        })
    }

    /// Generate display name (e.g., "Plant Floor (192.168.1.100:8000)")
    pub fn display_name(&self) -> String {
        if self.name.is_empty() {
            format!("{}:{}", self.host, self.hport)
        } else {
            format!("{} ({}:{})", self.name, self.host, self.hport)
        }
    }
}

/// Get or create the endpoint configuration file path
fn get_endpoint_config_path() -> Result<PathBuf> {
    let config_dir = get_or_create_config_dir()?;
    let path = config_dir.join("gateways.toml");

    #[cfg(debug_assertions)]
    info!("Gateway config file: {}", path.display());

    if !path.exists() {
        std::fs::write(&path, "")?;
    }

    Ok(path)
}

fn parse_endpoints(value: &str) -> Result<Vec<GatewayEndpoint>> {
    if value.trim().is_empty() {
        return Ok(vec![]);
    }

    let configs: GatewayEndpoints = toml::from_str(value)?;
    let mut gateways = configs.gateways;

    // Decrypt stored passwords; undecryptable values pass through unchanged
    for gateway in gateways.iter_mut() {
        if let Some(pwd) = &gateway.password {
            gateway.password = Some(decrypt(pwd).unwrap_or_else(|_| pwd.clone()));
        }
    }

    Ok(gateways)
}

fn render_endpoints(mut gateways: Vec<GatewayEndpoint>) -> Result<String> {
    for gateway in gateways.iter_mut() {
        if let Some(pwd) = &gateway.password {
            if !pwd.is_empty() {
                gateway.password = Some(encrypt(pwd)?);
            }
        }
    }
    Ok(toml::to_string_pretty(&GatewayEndpoints { gateways })?)
}

/// Load all saved endpoints from file
pub fn get_endpoints() -> Result<Vec<GatewayEndpoint>> {
    let path = get_endpoint_config_path()?;
    let value = std::fs::read_to_string(&path)?;
    parse_endpoints(&value)
}

/// Save the endpoint list to file
pub async fn save_endpoints(gateways: Vec<GatewayEndpoint>) -> Result<()> {
    let content = render_endpoints(gateways)?;
    let path = get_endpoint_config_path()?;
    tokio::fs::write(&path, content).await?;
    Ok(())
}

/// Get a single endpoint by name
pub fn get_endpoint_by_name(name: &str) -> Result<GatewayEndpoint> {
    let gateways = get_endpoints()?;
    gateways
        .into_iter()
        .find(|g| g.name == name)
        .ok_or_else(|| Error::Invalid {
            message: format!("Gateway not found: {name}"),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn endpoint() -> GatewayEndpoint {
        GatewayEndpoint {
            name: "Plant Floor".to_string(),
            host: "192.168.1.100".to_string(),
            hport: 8000,
            wport: 9000,
            tls: false,
            password: Some("Str0ng!pass".to_string()),
            updated_at: None,
        }
    }

    #[test]
    fn test_display_name() {
        assert_eq!(endpoint().display_name(), "Plant Floor (192.168.1.100:8000)");

        let unnamed = GatewayEndpoint::new("", "10.0.0.5", 8000);
        assert_eq!(unnamed.display_name(), "10.0.0.5:8000");
    }

    #[test]
    fn test_http_url() {
        let url = endpoint().http_url().expect("url");
        assert_eq!(url.as_str(), "http://192.168.1.100:8000/");

        let tls = GatewayEndpoint {
            tls: true,
            ..endpoint()
        };
        assert_eq!(tls.http_url().expect("url").scheme(), "https");
    }

    #[test]
    fn test_round_trip_keeps_password_encrypted_at_rest() {
        let rendered = render_endpoints(vec![endpoint()]).expect("render");
        assert!(!rendered.contains("Str0ng!pass"));

        let parsed = parse_endpoints(&rendered).expect("parse");
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].password.as_deref(), Some("Str0ng!pass"));
        assert_eq!(parsed[0].host, "192.168.1.100");
    }

    #[test]
    fn test_empty_file_is_no_endpoints() {
        assert!(parse_endpoints("").expect("parse").is_empty());
        assert!(parse_endpoints("  \n").expect("parse").is_empty());
    }

    #[test]
    fn test_new_defaults_ws_port() {
        assert_eq!(GatewayEndpoint::new("A", "host", 8000).wport, DEFAULT_WS_PORT);
    }
}
