//! Cell mesh health report.
//!
//! A [`CellMesh`] is a closed manifold by construction, but a simulation
//! moving its nodes can still collapse or invert faces and drift away from
//! the frozen area and volume. The report summarises all of that without
//! failing, so it can be logged between simulation steps.

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::geometry::{self, DEGENERACY_TOLERANCE};
use crate::types::Triangle;
use crate::CellMesh;

/// Validation report for a cell mesh.
#[derive(Debug, Clone, Serialize)]
pub struct MeshReport {
    /// Total node count.
    pub node_count: usize,

    /// Total face count.
    pub face_count: usize,

    /// Distinct edge count.
    pub edge_count: usize,

    /// V − E + F; 2 for a sphere-like cell.
    pub euler_characteristic: i64,

    /// Faces whose area has collapsed to zero.
    pub degenerate_face_count: usize,

    /// Faces whose normal now points toward the centroid.
    pub inward_face_count: usize,

    /// Current total surface area.
    pub surface_area: f64,

    /// Current enclosed volume.
    pub volume: f64,

    /// Surface area frozen at construction.
    pub initial_surface_area: f64,

    /// Reference volume.
    pub initial_volume: f64,
}

impl MeshReport {
    /// Check if the topology is that of a sphere.
    pub fn is_genus_zero(&self) -> bool {
        self.euler_characteristic == 2
    }

    /// Check if the current geometry can be measured safely.
    pub fn is_valid(&self) -> bool {
        self.is_genus_zero() && self.degenerate_face_count == 0 && self.inward_face_count == 0
    }

    /// Current area relative to the frozen initial area.
    pub fn area_ratio(&self) -> f64 {
        self.surface_area / self.initial_surface_area
    }

    /// Current volume relative to the reference volume.
    pub fn volume_ratio(&self) -> f64 {
        self.volume / self.initial_volume
    }
}

impl std::fmt::Display for MeshReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Cell Mesh Report:")?;
        writeln!(f, "  Nodes: {}", self.node_count)?;
        writeln!(f, "  Faces: {}", self.face_count)?;
        writeln!(f, "  Edges: {}", self.edge_count)?;
        writeln!(
            f,
            "  Genus zero: {} (Euler characteristic: {})",
            if self.is_genus_zero() { "yes" } else { "NO" },
            self.euler_characteristic
        )?;
        writeln!(
            f,
            "  Surface area: {:.6} ({:.4} of initial {:.6})",
            self.surface_area,
            self.area_ratio(),
            self.initial_surface_area
        )?;
        writeln!(
            f,
            "  Volume: {:.6} ({:.4} of initial {:.6})",
            self.volume,
            self.volume_ratio(),
            self.initial_volume
        )?;
        writeln!(f, "  Degenerate faces: {}", self.degenerate_face_count)?;
        writeln!(f, "  Inward faces: {}", self.inward_face_count)?;
        writeln!(f, "  Valid: {}", if self.is_valid() { "yes" } else { "NO" })?;
        Ok(())
    }
}

/// Validate a cell mesh against its current node positions.
pub fn validate_mesh(mesh: &CellMesh) -> MeshReport {
    let nodes = mesh.nodes();
    let center = mesh.centroid();

    let mut degenerate_face_count = 0;
    let mut inward_face_count = 0;
    let mut surface_area = 0.0;

    for face in mesh.faces() {
        let tri = Triangle::from_face(nodes, face);
        if tri.is_degenerate(DEGENERACY_TOLERANCE) {
            degenerate_face_count += 1;
            continue;
        }
        let [a, b, c] = tri.side_lengths();
        surface_area += geometry::heron_area(a, b, c);
        if (tri.p0 - center).dot(&tri.normal_unnormalized()) < 0.0 {
            inward_face_count += 1;
        }
    }

    let report = MeshReport {
        node_count: mesh.node_count(),
        face_count: mesh.face_count(),
        edge_count: mesh.edge_count(),
        euler_characteristic: mesh.adjacency().euler_characteristic(mesh.face_count()),
        degenerate_face_count,
        inward_face_count,
        surface_area,
        volume: mesh.volume(),
        initial_surface_area: mesh.initial_surface_area(),
        initial_volume: mesh.initial_volume(),
    };

    if degenerate_face_count > 0 {
        warn!("Cell mesh has {} degenerate faces", degenerate_face_count);
    }
    if inward_face_count > 0 {
        warn!("Cell mesh has {} faces pointing inward", inward_face_count);
    }

    debug!("{}", report);

    report
}

/// Log a summary of mesh validation.
pub fn log_validation(report: &MeshReport) {
    info!(
        "Cell mesh: {} nodes, {} faces, area {:.6} ({:.4}), volume {:.6} ({:.4})",
        report.node_count,
        report.face_count,
        report.surface_area,
        report.area_ratio(),
        report.volume,
        report.volume_ratio()
    );

    if !report.is_genus_zero() {
        warn!(
            "Euler characteristic is {}, expected 2",
            report.euler_characteristic
        );
    }
}
