//! Process configuration read from the environment.
//!
//! | Variable | Default | Meaning |
//! |---|---|---|
//! | `HOST` | `0.0.0.0` | interface to listen on |
//! | `PORT` | `3000` | TCP port to listen on |
//!
//! Log filtering is not configured here; the binary hands `RUST_LOG` to
//! `tracing-subscriber` directly.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use config::Environment;
use serde::Deserialize;

use crate::error::Error;

pub const DEFAULT_PORT: u16 = 3000;

#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(default)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self { host: IpAddr::V4(Ipv4Addr::UNSPECIFIED), port: DEFAULT_PORT }
    }
}

impl Config {
    /// Reads `HOST` and `PORT` from the process environment.
    pub fn from_env() -> Result<Self, Error> {
        Self::load(Environment::default())
    }

    /// Reads the same variables from `vars` instead of the process environment.
    pub fn from_vars(vars: config::Map<String, String>) -> Result<Self, Error> {
        Self::load(Environment::default().source(Some(vars)))
    }

    /// Unset and empty variables fall back to their defaults; unrelated
    /// variables are ignored.
    fn load(env: Environment) -> Result<Self, Error> {
        config::Config::builder()
            .add_source(env.try_parsing(true).ignore_empty(true))
            .build()
            .and_then(config::Config::try_deserialize)
            .map_err(|e| Error::config(e.to_string()))
    }

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}
