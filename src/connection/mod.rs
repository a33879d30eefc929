//! Gateway Connections
//!
//! Saved endpoint configuration and URL derivation.

mod config;

pub use config::{
    GatewayEndpoint, get_endpoint_by_name, get_endpoints, save_endpoints,
};
