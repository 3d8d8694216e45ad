//! Generic async file-based config source.
//!
//! [`FileSource`] implements [`ConfigSource`] for any file format by
//! accepting a deserialization function at construction time. It reads
//! the file asynchronously via Tokio and validates the result.

use std::path::PathBuf;

use async_trait::async_trait;

use crate::config::model::Config;
use crate::config::validation::validate;
use crate::config::ConfigSource;
use crate::error::WaypointError;

pub type Deserializer = fn(&str) -> Result<Config, Box<dyn std::error::Error + Send + Sync>>;

pub struct FileSource {
    path: PathBuf,
    name: &'static str,
    deserialize: Deserializer,
}

impl FileSource {
    #[must_use]
    pub fn new(path: PathBuf, name: &'static str, deserialize: Deserializer) -> Self {
        Self {
            path,
            name,
            deserialize,
        }
    }

    async fn read_content(&self) -> Result<String, WaypointError> {
        tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                WaypointError::ConfigFileNotFound {
                    path: self.path.clone(),
                }
            } else {
                WaypointError::Io(e)
            }
        })
    }
}

#[async_trait]
impl ConfigSource for FileSource {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn load(&self) -> Result<Config, WaypointError> {
        let content = self.read_content().await?;

        let config = (self.deserialize)(&content).map_err(|e| WaypointError::ConfigParse {
            path: self.path.display().to_string(),
            source: e,
        })?;

        if let Err(errors) = validate(&config) {
            return Err(WaypointError::ConfigValidation { errors });
        }

        Ok(config)
    }
}
