//! Configuration validation with detailed error reporting.
//!
//! The [`validate`] function checks a parsed [`Config`] for structural
//! errors such as invalid `from` patterns and malformed `to`
//! addresses. An empty rule list is valid. It returns every [`ValidationError`] found
//! with per-field suggestions. Pattern conflicts are left to the router,
//! which rejects them during registration.

use url::Url;

use super::model::Config;
use crate::error::ValidationError;

/// Validate a single `from` pattern. Returns `Ok(())` or a human-readable error.
pub fn validate_from(from: &str) -> Result<(), String> {
    if from.is_empty() {
        return Err("pattern cannot be empty".into());
    }
    if !from.starts_with('/') {
        return Err("pattern must start with '/'".into());
    }
    Ok(())
}

/// Validate a single `to` base address. Returns `Ok(())` or a human-readable error.
///
/// Only the scheme and overall shape are checked. The address is used
/// verbatim as a prefix, so a trailing slash is kept as written.
pub fn validate_to(to: &str) -> Result<(), String> {
    match Url::parse(to) {
        Ok(parsed) => {
            let scheme = parsed.scheme();
            if scheme != "http" && scheme != "https" {
                Err(format!(
                    "unsupported scheme '{scheme}' (expected http or https)"
                ))
            } else if parsed.host_str().is_none() {
                Err(format!("'{to}' has no host"))
            } else {
                Ok(())
            }
        }
        Err(_) => Err(format!("'{to}' is not a valid URL")),
    }
}

pub fn validate(config: &Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    for (i, rule) in config.routes.iter().enumerate() {
        let route_id = if rule.from.is_empty() {
            format!("routes[{i}]")
        } else {
            rule.from.clone()
        };

        if let Err(msg) = validate_from(&rule.from) {
            errors.push(ValidationError {
                route: route_id.clone(),
                field: "from".into(),
                message: msg,
                suggestion: if !rule.from.is_empty() && !rule.from.starts_with('/') {
                    Some(format!("did you mean '/{}'?", rule.from))
                } else {
                    None
                },
            });
        }

        if let Err(msg) = validate_to(&rule.to) {
            errors.push(ValidationError {
                route: route_id,
                field: "to".into(),
                message: msg,
                suggestion: if rule.to.starts_with("//") || !rule.to.contains("://") {
                    Some(format!("did you mean 'http://{}'?", rule.to.trim_start_matches('/')))
                } else {
                    None
                },
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[must_use]
pub fn format_validation_report(path: &str, config: &Config) -> String {
    let mut lines = vec![format!("  {} routes\n", config.routes.len())];

    let width = config
        .routes
        .iter()
        .map(|r| r.from.len())
        .max()
        .unwrap_or(0);

    for rule in &config.routes {
        lines.push(format!("  {:<width$}  -> {}", rule.from, rule.to));
    }

    if let Some(ms) = config.client.connect_timeout_ms {
        lines.push(format!("\n  connect timeout: {ms}ms"));
    }

    format!("{} is valid\n{}", path, lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::model::{ClientSettings, Rule};

    fn config_with(routes: Vec<Rule>) -> Config {
        Config {
            client: ClientSettings::default(),
            routes,
        }
    }

    #[test]
    fn valid_config_passes() {
        let config = config_with(vec![Rule::new("/api/*", "http://upstream:8080")]);
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn empty_routes_pass() {
        assert!(validate(&config_with(vec![])).is_ok());
    }

    #[test]
    fn empty_from_fails() {
        let errors = validate(&config_with(vec![Rule::new("", "http://a:80")])).unwrap_err();
        assert_eq!(errors[0].route, "routes[0]");
        assert!(errors[0].message.contains("cannot be empty"));
    }

    #[test]
    fn from_without_slash_suggests_fix() {
        let errors = validate(&config_with(vec![Rule::new("api", "http://a:80")])).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.suggestion.as_deref() == Some("did you mean '/api'?")));
    }

    #[test]
    fn invalid_to_fails() {
        let errors = validate(&config_with(vec![Rule::new("/a", "not a url")])).unwrap_err();
        assert!(errors.iter().any(|e| e.message.contains("not a valid URL")));
    }

    #[test]
    fn unsupported_scheme_fails() {
        let errors = validate(&config_with(vec![Rule::new("/a", "ftp://files:21")])).unwrap_err();
        assert!(errors.iter().any(|e| e.message.contains("unsupported scheme")));
    }

    #[test]
    fn schemeless_to_suggests_http() {
        let errors = validate(&config_with(vec![Rule::new("/a", "upstream:8080")])).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "to");
    }

    #[test]
    fn duplicate_patterns_are_left_to_the_router() {
        let config = config_with(vec![
            Rule::new("/a", "http://one:80"),
            Rule::new("/a", "http://two:80"),
        ]);
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn trailing_slash_in_to_is_accepted() {
        let config = config_with(vec![Rule::new("/a", "http://one:80/")]);
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn all_errors_are_collected() {
        let config = config_with(vec![
            Rule::new("a", "http://one:80"),
            Rule::new("/b", "gopher://two"),
        ]);
        assert_eq!(validate(&config).unwrap_err().len(), 2);
    }

    #[test]
    fn report_lists_every_rule() {
        let config = config_with(vec![
            Rule::new("/api/*", "http://upstream:8080"),
            Rule::new("/users/:id", "http://users:9000"),
        ]);
        let report = format_validation_report("config.yaml", &config);
        assert!(report.starts_with("config.yaml is valid"));
        assert!(report.contains("2 routes"));
        assert!(report.contains("-> http://upstream:8080"));
        assert!(report.contains("-> http://users:9000"));
    }
}
