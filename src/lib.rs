//! Waypoint is a path-based HTTP forwarding proxy.
//!
//! It loads a fixed, ordered list of `{from, to}` rules at startup,
//! registers every rule's path pattern for the seven common HTTP
//! methods, and relays each matching request to `to` followed by the
//! request's full path and query. The upstream's status, headers and
//! body are streamed back to the caller unchanged.
//!
//! # Architecture
//!
//! - [`cli`] -- Command-line argument parsing with clap derive macros.
//! - [`cmd`] -- Subcommand dispatch and execution (run, validate, init).
//! - [`config`] -- Configuration model, validation, and file sources via
//!   the [`ConfigSource`](config::ConfigSource) trait.
//! - [`error`] -- Startup and per-request error types using `thiserror`.
//! - [`logging`] -- Structured tracing setup with JSON and pretty-print output.
//! - [`proxy`] -- Core forwarding: route table and registration, header
//!   relay, and the streaming upstream exchange.
//! - [`server`] -- Shared application state, HTTP client, router assembly
//!   and graceful shutdown.
//!
//! # Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `yaml` | YAML config file support _(enabled by default)_ |
//! | `json` | JSON config file support |
//! | `toml` | TOML config file support |
//! | `file-backends` | All file format backends |
//! | `full` | All features |

// Binary crate: public functions are internal, not consumed by external users.
#![allow(clippy::missing_errors_doc)]

pub mod cli;
pub mod cmd;
pub mod config;
pub mod error;
pub mod logging;
pub mod proxy;
pub mod server;
