//! Closed triangulated cell surfaces.
//!
//! This crate turns a triangle soup into a closed, outward-oriented cell
//! mesh and measures it. Common operations include:
//!
//! - **Loading/Saving**: OFF files, with nodes projected onto a sphere
//! - **Topology**: canonical edges, edge and vertex adjacency, manifold checks
//! - **Geometry**: face/vertex/cell areas, enclosed volume, face and vertex normals
//!
//! # Example
//!
//! ```no_run
//! use cell_mesh::{CellMesh, MeshConfig};
//!
//! let config = MeshConfig::new("sphere.off", 4.0);
//! let mut cell = CellMesh::from_config(&config).unwrap();
//!
//! let target_volume = cell.initial_volume();
//!
//! // Deform the cell, then refresh the cached geometry.
//! for node in cell.nodes_mut() {
//!     node.z *= 0.9;
//! }
//! cell.recompute_geometry().unwrap();
//!
//! println!("volume {} of {}", cell.volume(), target_volume);
//! ```
//!
//! # Preconditions
//!
//! Orientation correction assumes the surface is star-shaped about the mean
//! of its nodes. Meshes that violate this are rejected with
//! [`MeshError::NotStarShaped`].

mod error;
mod mesh;
mod types;

pub mod adjacency;
pub mod config;
pub mod geometry;
pub mod io;
pub mod validate;

#[cfg(test)]
mod test_meshes;

// Re-export core types at crate root
pub use error::{MeshError, MeshResult};
pub use mesh::CellMesh;
pub use types::{canonical_edge, Edge, Face, Node, Triangle};

pub use adjacency::MeshAdjacency;
pub use config::MeshConfig;
pub use geometry::{FaceAreas, FaceNormals};
pub use io::{load_off, parse_off, save_off, RawMesh};
pub use validate::{validate_mesh, MeshReport};

// Re-export nalgebra types for convenience
pub use nalgebra::{Point3, Vector3};
