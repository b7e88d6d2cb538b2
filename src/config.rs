//! Server configuration from environment variables
//!
//! - `CATALOG_PATH`: catalog CSV (default `data/classes.csv`)
//! - `HOST`: bind address (default `0.0.0.0`)
//! - `PORT`: bind port (default `8000`)
//!
//! Unparseable values fall back to the defaults.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

pub const DEFAULT_CATALOG_PATH: &str = "data/classes.csv";
pub const DEFAULT_PORT: u16 = 8000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub catalog_path: PathBuf,
    pub host: IpAddr,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            catalog_path: PathBuf::from(DEFAULT_CATALOG_PATH),
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable source (lets tests avoid touching the process env).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let catalog_path = lookup("CATALOG_PATH")
            .filter(|p| !p.is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.catalog_path);

        let host = lookup("HOST")
            .and_then(|h| h.parse().ok())
            .unwrap_or(defaults.host);

        let port = lookup("PORT")
            .and_then(|p| p.parse().ok())
            .unwrap_or(defaults.port);

        Self { catalog_path, host, port }
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}
