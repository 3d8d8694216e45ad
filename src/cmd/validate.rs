//! `waypoint validate`: check a configuration file for errors.
//!
//! Parses and validates the config file, then dry-runs route
//! registration so router conflicts are caught too. Results are
//! reported as human-readable text or machine-readable JSON.

use crate::cli::{ValidateArgs, ValidateFormat};
use crate::config::sources::parse_config_str;
use crate::config::validation;
use crate::error::WaypointError;
use crate::proxy::routing::{register_routes, RouteTable};

pub fn execute(args: &ValidateArgs) -> Result<(), WaypointError> {
    let path = &args.config;

    if !path.exists() {
        return Err(WaypointError::ConfigFileNotFound { path: path.clone() });
    }

    let content = std::fs::read_to_string(path)?;

    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    let config = parse_config_str(ext, &content, &path.display().to_string())?;

    if let Err(errors) = validation::validate(&config) {
        match args.format {
            ValidateFormat::Text => {
                eprintln!("\u{2717} {} has {} errors\n", path.display(), errors.len());
                for error in &errors {
                    eprintln!("{error}");
                }
            }
            ValidateFormat::Json => {
                let json_errors: Vec<serde_json::Value> = errors
                    .iter()
                    .map(|e| {
                        serde_json::json!({
                            "route": e.route,
                            "field": e.field,
                            "message": e.message,
                            "suggestion": e.suggestion,
                        })
                    })
                    .collect();
                println!(
                    "{}",
                    serde_json::json!({
                        "valid": false,
                        "errors": json_errors,
                    })
                );
            }
        }
        return Err(WaypointError::ConfigValidation { errors });
    }

    let table = RouteTable::new(config.routes.clone());
    if let Err(e) = register_routes(&table) {
        if let ValidateFormat::Json = args.format {
            println!(
                "{}",
                serde_json::json!({
                    "valid": false,
                    "errors": [{ "message": e.to_string() }],
                })
            );
        }
        return Err(e);
    }

    match args.format {
        ValidateFormat::Text => {
            println!(
                "\u{2713} {}",
                validation::format_validation_report(&path.display().to_string(), &config)
            );
        }
        ValidateFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "valid": true,
                    "routes": config.routes.len(),
                })
            );
        }
    }

    Ok(())
}
