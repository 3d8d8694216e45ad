//! Concrete [`ConfigSource`](super::ConfigSource) implementations.
//!
//! Every format is a [`FileSource`] with a format-specific deserializer
//! (YAML, JSON, TOML, gated by feature flags). [`for_path`] picks one by
//! file extension and [`parse_config_str`] parses an in-memory string
//! the same way.

pub mod file_source;

use std::path::Path;

use crate::config::model::Config;
use crate::config::ConfigSource;
use crate::error::WaypointError;
use file_source::FileSource;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[cfg(feature = "yaml")]
fn from_yaml(content: &str) -> Result<Config, BoxError> {
    serde_yml::from_str(content).map_err(|e| Box::new(e) as BoxError)
}

#[cfg(feature = "json")]
fn from_json(content: &str) -> Result<Config, BoxError> {
    serde_json::from_str(content).map_err(|e| Box::new(e) as BoxError)
}

#[cfg(feature = "toml")]
fn from_toml(content: &str) -> Result<Config, BoxError> {
    toml::from_str(content).map_err(|e| Box::new(e) as BoxError)
}

/// Parse a config string based on file extension.
pub fn parse_config_str(
    ext: &str,
    content: &str,
    path_display: &str,
) -> Result<Config, WaypointError> {
    let (_, deserialize) = format_for(ext)?;
    deserialize(content).map_err(|source| WaypointError::ConfigParse {
        path: path_display.to_string(),
        source,
    })
}

/// Pick the file source matching the extension of `path`.
pub fn for_path(path: &Path) -> Result<Box<dyn ConfigSource>, WaypointError> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    let (name, deserialize) = format_for(ext)?;
    Ok(Box::new(FileSource::new(path.to_path_buf(), name, deserialize)))
}

fn format_for(ext: &str) -> Result<(&'static str, file_source::Deserializer), WaypointError> {
    match ext {
        #[cfg(feature = "yaml")]
        "yaml" | "yml" => Ok(("yaml", from_yaml as file_source::Deserializer)),

        #[cfg(feature = "json")]
        "json" => Ok(("json", from_json as file_source::Deserializer)),

        #[cfg(feature = "toml")]
        "toml" => Ok(("toml", from_toml as file_source::Deserializer)),

        other => Err(WaypointError::UnsupportedFormat(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_extension_is_unsupported() {
        let err = parse_config_str("ini", "", "waypoint.ini").unwrap_err();
        assert!(matches!(err, WaypointError::UnsupportedFormat(ref ext) if ext == "ini"));
        assert!(for_path(Path::new("waypoint.ini")).is_err());
    }

    #[cfg(feature = "yaml")]
    #[test]
    fn yaml_rules_parse_in_order() {
        let content = "routes:\n  - from: /api/*\n    to: http://upstream:8080\n  - from: /\n    to: http://root:80\n";
        let config = parse_config_str("yaml", content, "config.yaml").unwrap();
        assert_eq!(config.routes.len(), 2);
        assert_eq!(config.routes[0].from, "/api/*");
        assert_eq!(config.routes[0].to, "http://upstream:8080");
        assert_eq!(config.routes[1].from, "/");
    }

    #[cfg(feature = "yaml")]
    #[test]
    fn yml_extension_picks_yaml_source() {
        let source = for_path(Path::new("config.yml")).unwrap();
        assert_eq!(source.name(), "yaml");
    }
}
