//! `waypoint init`: generate a starter configuration file.
//!
//! Writes a small YAML, JSON, or TOML config with one prefix
//! rule. Never overwrites an existing file.

use std::path::PathBuf;

use crate::cli::{ConfigFormat, InitArgs};
use crate::error::WaypointError;

pub fn execute(args: &InitArgs) -> Result<(), WaypointError> {
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(format!("config.{}", args.format.extension())));

    if output.exists() {
        return Err(WaypointError::FileExists { path: output });
    }

    std::fs::write(&output, template(&args.format))?;
    println!("Created {}", output.display());
    Ok(())
}

#[must_use]
pub const fn template(format: &ConfigFormat) -> &'static str {
    match format {
        ConfigFormat::Yaml => YAML_TEMPLATE,
        ConfigFormat::Json => JSON_TEMPLATE,
        ConfigFormat::Toml => TOML_TEMPLATE,
    }
}

const YAML_TEMPLATE: &str = r#"# Waypoint config
#
# Each rule forwards every GET, POST, PUT, DELETE, PATCH, OPTIONS and HEAD
# request whose path matches `from` to `to` + the full request path.
# Patterns: static segments, `:param` and a trailing `*` wildcard.

# client:
#   connect_timeout_ms: 2000     # Default: no connect deadline
#   pool_idle_timeout_secs: 30

routes:
  - from: "/api/*"
    to: "http://localhost:8080"
"#;

const JSON_TEMPLATE: &str = r#"{
  "routes": [
    {
      "from": "/api/*",
      "to": "http://localhost:8080"
    }
  ]
}
"#;

const TOML_TEMPLATE: &str = r#"# Waypoint config
#
# [client]
# connect_timeout_ms = 2000
# pool_idle_timeout_secs = 30

[[routes]]
from = "/api/*"
to = "http://localhost:8080"
"#;
