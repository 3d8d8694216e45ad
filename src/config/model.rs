//! Serde data structures for the Waypoint configuration file.
//!
//! Contains [`Config`] (the root), [`Rule`] (one `from` -> `to`
//! forwarding rule) and [`ClientSettings`] for the upstream HTTP client.
//! All types derive `Serialize` and `Deserialize` with
//! `deny_unknown_fields` for strict parsing.

use std::time::Duration;

use serde::{Deserialize, Serialize};

const fn default_pool_idle_timeout() -> u64 {
    30
}

fn is_default_pool_idle_timeout(v: &u64) -> bool {
    *v == default_pool_idle_timeout()
}

fn is_default_client(v: &ClientSettings) -> bool {
    v.connect_timeout_ms.is_none() && is_default_pool_idle_timeout(&v.pool_idle_timeout_secs)
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default, skip_serializing_if = "is_default_client")]
    pub client: ClientSettings,

    pub routes: Vec<Rule>,
}

/// A single forwarding rule: requests matching `from` are relayed to
/// `to` followed by the full inbound path and query.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Rule {
    pub from: String,
    pub to: String,
}

impl Rule {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ClientSettings {
    /// TCP connect deadline for upstream calls. Unset means no deadline.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connect_timeout_ms: Option<u64>,

    #[serde(
        default = "default_pool_idle_timeout",
        skip_serializing_if = "is_default_pool_idle_timeout"
    )]
    pub pool_idle_timeout_secs: u64,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            connect_timeout_ms: None,
            pool_idle_timeout_secs: default_pool_idle_timeout(),
        }
    }
}

impl ClientSettings {
    #[must_use]
    pub fn connect_timeout(&self) -> Option<Duration> {
        self.connect_timeout_ms.map(Duration::from_millis)
    }

    #[must_use]
    pub const fn pool_idle_timeout(&self) -> Duration {
        Duration::from_secs(self.pool_idle_timeout_secs)
    }
}
