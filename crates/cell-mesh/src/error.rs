//! Error types for cell mesh construction and geometry.

use std::path::PathBuf;
use thiserror::Error;

use crate::types::Edge;

/// Result type alias for cell mesh operations.
pub type MeshResult<T> = Result<T, MeshError>;

/// Errors that can occur while building or measuring a cell mesh.
///
/// Every variant is fatal during construction: a mesh that fails any check
/// is never handed back partially built.
#[derive(Debug, Error)]
pub enum MeshError {
    /// Error reading from a file.
    #[error("failed to read mesh from {path}: {source}")]
    IoRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error writing to a file.
    #[error("failed to write mesh to {path}: {source}")]
    IoWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed header, counts or records, or an out-of-range node index.
    #[error("failed to parse mesh from {path}: {details}")]
    ParseError { path: PathBuf, details: String },

    /// Configuration rejected before any file was touched.
    #[error("invalid mesh configuration: {details}")]
    InvalidConfig { details: String },

    /// An edge whose incident-face count is not exactly two.
    #[error("edge ({}, {}) has {face_count} incident faces, expected 2", .edge.0, .edge.1)]
    ManifoldViolation { edge: Edge, face_count: usize },

    /// A node that no face references.
    #[error("node {node} is not referenced by any face")]
    UnreferencedNode { node: u32 },

    /// Two faces over the same three nodes.
    #[error("faces {first} and {second} span the same nodes")]
    DuplicateFace { first: u32, second: u32 },

    /// Zero-area face or zero-length normal.
    #[error("degenerate geometry: {details}")]
    DegenerateGeometry { details: String },

    /// Orientation correction cannot produce a consistent outward winding.
    #[error("mesh is not star-shaped about its centroid: {details}")]
    NotStarShaped { details: String },
}

impl MeshError {
    pub(crate) fn parse(path: impl Into<PathBuf>, details: impl Into<String>) -> Self {
        Self::ParseError {
            path: path.into(),
            details: details.into(),
        }
    }

    pub(crate) fn degenerate(details: impl Into<String>) -> Self {
        Self::DegenerateGeometry {
            details: details.into(),
        }
    }
}
