//! @ai:module:intent Load and save the `emmett.toml` configuration file
//! @ai:module:layer infrastructure
//! @ai:module:public_api Config, DEFAULT_CONFIG_FILE
//! @ai:module:depends_on output, record, scanner, error
//! @ai:module:stateless true

use crate::error::{Error, Result};
use crate::output::OutputFormat;
use crate::record::Layout;
use crate::scanner::{ScannerConfig, DEFAULT_TAG_MARKER};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_CONFIG_FILE: &str = "emmett.toml";

/// Characters that would collide with comment decoration or string detection.
const RESERVED_MARKERS: [char; 5] = ['*', '/', '\\', '"', '\''];

/// @ai:intent Settings shared by the CLI and library callers
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub tag_marker: char,
    pub layout: Layout,
    pub format: OutputFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tag_marker: DEFAULT_TAG_MARKER,
            layout: Layout::default(),
            format: OutputFormat::default(),
        }
    }
}

impl Config {
    /// @ai:intent Load configuration from a TOML file
    /// @ai:pre path exists and is readable
    /// @ai:post result passed validate()
    /// @ai:effects fs:read
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: Self = toml::from_str(&content).map_err(|e| Error::Config {
            path: path.to_path_buf(),
            source: e,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// @ai:intent Save configuration to a TOML file
    /// @ai:effects fs:write
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// @ai:intent Reject tag markers the scanner cannot tell apart from comment syntax
    /// @ai:effects pure
    pub fn validate(&self) -> Result<()> {
        if self.tag_marker.is_whitespace() || RESERVED_MARKERS.contains(&self.tag_marker) {
            return Err(Error::InvalidTagMarker(self.tag_marker.to_string()));
        }
        Ok(())
    }

    pub fn scanner_config(&self) -> ScannerConfig {
        ScannerConfig {
            tag_marker: self.tag_marker,
        }
    }
}
