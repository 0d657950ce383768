//! `validate`: build a mesh and report whether it is fit for simulation.

use cell_mesh::validate::log_validation;
use cell_mesh::{validate_mesh, CellMesh, MeshConfig, MeshResult};

use crate::output;
use crate::OutputFormat;

/// Returns whether the mesh passed.
pub fn run(config: &MeshConfig, format: OutputFormat, quiet: bool) -> MeshResult<bool> {
    let mesh = CellMesh::from_config(config)?;
    let report = validate_mesh(&mesh);
    log_validation(&report);

    output::print(&report, format, quiet);
    output::info(&report.to_string(), format, quiet);

    if report.is_valid() {
        output::success("Mesh is a closed, outward-oriented genus-0 surface", format, quiet);
    } else {
        output::warning("Mesh failed validation", format, quiet);
    }

    Ok(report.is_valid())
}
