//! Mesh source configuration.
//!
//! A [`MeshConfig`] names the OFF file a cell is built from and the radius
//! its nodes are projected onto. It can be built in code or read from TOML:
//!
//! ```toml
//! source = "meshes/sphere.off"
//! radius = 4.0
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{MeshError, MeshResult};

/// Where a cell mesh comes from and how large it is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeshConfig {
    /// Path to the OFF mesh description.
    pub source: PathBuf,

    /// Target sphere radius every node is rescaled onto.
    #[serde(default = "default_radius")]
    pub radius: f64,
}

fn default_radius() -> f64 {
    1.0
}

impl MeshConfig {
    /// Create a config for `source` with the given radius.
    pub fn new(source: impl Into<PathBuf>, radius: f64) -> Self {
        Self {
            source: source.into(),
            radius,
        }
    }

    /// Parse a config from a TOML string.
    pub fn from_toml(input: &str) -> MeshResult<Self> {
        let config: Self = toml::from_str(input).map_err(|e| MeshError::InvalidConfig {
            details: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a TOML config file.
    ///
    /// A relative `source` is resolved against the config file's directory.
    pub fn from_toml_file(path: impl AsRef<Path>) -> MeshResult<Self> {
        let path = path.as_ref();
        let input = std::fs::read_to_string(path).map_err(|e| MeshError::IoRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let mut config = Self::from_toml(&input)?;
        if config.source.is_relative() {
            if let Some(dir) = path.parent() {
                config.source = dir.join(&config.source);
            }
        }
        Ok(config)
    }

    /// Reject radii that cannot describe a cell.
    pub fn validate(&self) -> MeshResult<()> {
        validate_radius(self.radius)
    }
}

pub(crate) fn validate_radius(radius: f64) -> MeshResult<()> {
    if radius.is_finite() && radius > 0.0 {
        Ok(())
    } else {
        Err(MeshError::InvalidConfig {
            details: format!("radius must be finite and positive, got {}", radius),
        })
    }
}
