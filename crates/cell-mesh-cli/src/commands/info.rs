//! `info`: load a mesh and print its size and frozen invariants.

use std::path::PathBuf;

use serde::Serialize;

use cell_mesh::{CellMesh, MeshConfig, MeshResult};

use crate::output;
use crate::OutputFormat;

#[derive(Debug, Serialize)]
struct MeshInfo {
    source: PathBuf,
    radius: f64,
    nodes: usize,
    faces: usize,
    edges: usize,
    surface_area: f64,
    volume: f64,
    initial_volume: f64,
}

pub fn run(config: &MeshConfig, format: OutputFormat, quiet: bool) -> MeshResult<()> {
    let mesh = CellMesh::from_config(config)?;

    let info = MeshInfo {
        source: config.source.clone(),
        radius: config.radius,
        nodes: mesh.node_count(),
        faces: mesh.face_count(),
        edges: mesh.edge_count(),
        surface_area: mesh.initial_surface_area(),
        volume: mesh.volume(),
        initial_volume: mesh.initial_volume(),
    };

    output::print(&info, format, quiet);
    output::info(&format!("Mesh: {}", info.source.display()), format, quiet);
    output::info(
        &format!(
            "  {} nodes, {} faces, {} edges (radius {})",
            info.nodes, info.faces, info.edges, info.radius
        ),
        format,
        quiet,
    );
    output::info(&format!("  Surface area: {:.6}", info.surface_area), format, quiet);
    output::info(
        &format!(
            "  Volume: {:.6} (frozen from source winding: {:.6})",
            info.volume, info.initial_volume
        ),
        format,
        quiet,
    );

    Ok(())
}
