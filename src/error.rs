//! Unified error types for Waypoint.
//!
//! [`WaypointError`] covers everything that can go wrong before the
//! listener starts accepting connections (config loading, validation,
//! route registration) and is always fatal. [`ForwardError`] is the
//! per-request failure of the forwarding engine; it is rendered as an
//! HTTP response for that single request and never escapes the task.
//! [`ValidationError`] carries one config problem with an optional hint.

use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct ValidationError {
    pub route: String,
    pub field: String,
    pub message: String,
    pub suggestion: Option<String>,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "  route {}: {}: {}", self.route, self.field, self.message)?;
        if let Some(ref suggestion) = self.suggestion {
            write!(f, " ({suggestion})")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

fn format_errors(errors: &[ValidationError]) -> String {
    use std::fmt::Write;
    let mut buf = String::new();
    for (i, e) in errors.iter().enumerate() {
        if i > 0 {
            buf.push('\n');
        }
        // write! to String is infallible (only fails on OOM which is unrecoverable)
        let _ = write!(buf, "{e}");
    }
    buf
}

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum WaypointError {
    #[error("No config source found.\n\n  {hint}")]
    NoConfigSource { hint: String },

    #[error("Config file not found: {}", path.display())]
    ConfigFileNotFound { path: PathBuf },

    #[error("Config parse error in {path}:\n  {source}")]
    ConfigParse {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Config validation failed:\n{}", format_errors(.errors))]
    ConfigValidation { errors: Vec<ValidationError> },

    #[error("Unsupported config format: '{0}'")]
    UnsupportedFormat(String),

    #[error("Invalid address: {0}")]
    AddressParse(#[from] std::net::AddrParseError),

    #[error("Route '{from}' rejected by the router: {reason}")]
    RouteRegistration { from: String, reason: String },

    #[error("File already exists: {}", path.display())]
    FileExists { path: PathBuf },

    #[error("{0}")]
    Io(#[from] std::io::Error),
}

/// Failure of a single forwarding operation.
///
/// `BuildRequest` and `Upstream` happen before any response byte is
/// written, so the caller gets a clean error status. `ResponseStream`
/// happens mid-body: whatever was already flushed stands and the
/// caller's connection is aborted.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ForwardError {
    #[error("invalid outbound request to {target}: {source}")]
    BuildRequest {
        target: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("upstream request to {target} failed: {source}")]
    Upstream {
        target: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("upstream response stream from {target} failed: {source}")]
    ResponseStream {
        target: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl ForwardError {
    #[must_use]
    pub const fn status(&self) -> http::StatusCode {
        match self {
            Self::BuildRequest { .. } => http::StatusCode::INTERNAL_SERVER_ERROR,
            Self::Upstream { .. } | Self::ResponseStream { .. } => http::StatusCode::BAD_GATEWAY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn boxed(msg: &str) -> Box<dyn std::error::Error + Send + Sync> {
        msg.into()
    }

    #[test]
    fn build_errors_map_to_500() {
        let err = ForwardError::BuildRequest {
            target: "http://up/x".into(),
            source: boxed("bad uri"),
        };
        assert_eq!(err.status(), http::StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn upstream_errors_map_to_502() {
        let err = ForwardError::Upstream {
            target: "http://up/x".into(),
            source: boxed("connection refused"),
        };
        assert_eq!(err.status(), http::StatusCode::BAD_GATEWAY);
        assert!(err.to_string().contains("http://up/x"));
    }

    #[test]
    fn validation_errors_are_listed() {
        let err = WaypointError::ConfigValidation {
            errors: vec![
                ValidationError {
                    route: "routes[0]".into(),
                    field: "from".into(),
                    message: "cannot be empty".into(),
                    suggestion: None,
                },
                ValidationError {
                    route: "api".into(),
                    field: "from".into(),
                    message: "must start with '/'".into(),
                    suggestion: Some("did you mean '/api'?".into()),
                },
            ],
        };
        let text = err.to_string();
        assert!(text.contains("routes[0]: from: cannot be empty"));
        assert!(text.contains("(did you mean '/api'?)"));
    }
}
