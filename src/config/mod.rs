//! Configuration loading and validation.
//!
//! Defines the [`ConfigSource`] trait for pluggable config backends.
//! Configuration is read exactly once before the listener binds; there
//! is no reload. Submodules provide the data model, validation logic,
//! and the file-backed source implementations.

pub mod model;
pub mod sources;
pub mod validation;

use async_trait::async_trait;

use crate::error::WaypointError;
use model::Config;

// async_trait is required here because ConfigSource is used as Box<dyn ConfigSource>
// and native async fn in traits does not support dyn dispatch.
#[async_trait]
pub trait ConfigSource: Send + Sync {
    fn name(&self) -> &'static str;
    async fn load(&self) -> Result<Config, WaypointError>;
}
