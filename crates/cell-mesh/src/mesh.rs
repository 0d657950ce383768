//! The cell mesh: owns nodes, faces, topology and derived geometry.

use std::io::Cursor;
use std::path::Path;

use nalgebra::{Point3, Vector3};
use tracing::{debug, info, warn};

use crate::adjacency::MeshAdjacency;
use crate::config::MeshConfig;
use crate::error::{MeshError, MeshResult};
use crate::geometry::{self, FaceAreas, FaceNormals};
use crate::io::{self, RawMesh};
use crate::types::{Edge, Face, Node};

/// A closed, outward-oriented triangulated cell surface.
///
/// Construction runs a fixed pipeline once: adjacency, face and vertex
/// areas, initial surface area, initial volume, orientation, face and
/// vertex normals. The initial volume is measured on the source winding,
/// so a source with inward or mixed winding freezes a value that differs
/// from [`CellMesh::volume`]; use [`CellMesh::set_initial_volume`] to
/// re-anchor it. Afterwards node positions may be moved freely through
/// [`CellMesh::nodes_mut`]; faces and adjacency never change.
///
/// Cached per-face and per-vertex quantities reflect the positions at the
/// last call to [`CellMesh::recompute_geometry`]. [`CellMesh::surface_area`]
/// and [`CellMesh::volume`] always read the current positions.
#[derive(Debug, Clone)]
pub struct CellMesh {
    nodes: Vec<Node>,
    faces: Vec<Face>,
    adjacency: MeshAdjacency,

    face_areas: FaceAreas,
    vertex_areas: Vec<f64>,
    face_normals: FaceNormals,
    vertex_normals: Vec<Vector3<f64>>,

    initial_surface_area: f64,
    initial_volume: f64,
}

impl CellMesh {
    /// Load an OFF file and build a mesh whose nodes lie on a sphere of `radius`.
    pub fn load(path: impl AsRef<Path>, radius: f64) -> MeshResult<Self> {
        let raw = io::load_off(path.as_ref(), radius)?;
        Self::from_raw(raw)
    }

    /// Build the mesh described by a [`MeshConfig`].
    pub fn from_config(config: &MeshConfig) -> MeshResult<Self> {
        config.validate()?;
        Self::load(&config.source, config.radius)
    }

    /// Build a mesh from OFF text held in memory.
    pub fn from_off_str(text: &str, radius: f64) -> MeshResult<Self> {
        let raw = io::parse_off(Cursor::new(text), radius, Path::new("<memory>"))?;
        Self::from_raw(raw)
    }

    /// Build a mesh from nodes that are already in place. No rescaling.
    pub fn from_parts(nodes: Vec<Node>, faces: Vec<Face>) -> MeshResult<Self> {
        validate_indices(&nodes, &faces)?;
        Self::build(nodes, faces, None)
    }

    fn from_raw(raw: RawMesh) -> MeshResult<Self> {
        Self::build(raw.nodes, raw.faces, Some(raw.declared_edge_count))
    }

    fn build(
        nodes: Vec<Node>,
        mut faces: Vec<Face>,
        declared_edge_count: Option<usize>,
    ) -> MeshResult<Self> {
        let adjacency = MeshAdjacency::build(&faces, nodes.len());
        adjacency.validate_closed_manifold(&faces)?;

        if let Some(declared) = declared_edge_count {
            if declared != adjacency.edge_count() {
                warn!(
                    "Declared edge count {} differs from derived {}; using derived",
                    declared,
                    adjacency.edge_count()
                );
            }
        }

        let face_areas = geometry::face_areas(&nodes, &faces)?;
        let vertex_areas = geometry::vertex_areas(&face_areas, &adjacency);
        let initial_surface_area = geometry::surface_area(&face_areas);
        let initial_volume = geometry::volume(&nodes, &faces);

        let flipped = geometry::orient_faces(&nodes, &mut faces, &adjacency)?;
        if flipped > 0 {
            info!("Flipped {} faces to point away from the centroid", flipped);
        }

        let face_normals = geometry::face_normals(&nodes, &faces)?;
        let vertex_normals = geometry::vertex_normals(&face_normals, &adjacency)?;

        info!(
            "Built cell mesh: {} nodes, {} faces, {} edges, area {:.6}, volume {:.6}",
            nodes.len(),
            faces.len(),
            adjacency.edge_count(),
            initial_surface_area,
            initial_volume
        );

        Ok(Self {
            nodes,
            faces,
            adjacency,
            face_areas,
            vertex_areas,
            face_normals,
            vertex_normals,
            initial_surface_area,
            initial_volume,
        })
    }

    /// Refresh areas and normals from the current node positions.
    ///
    /// Fails with [`crate::MeshError::DegenerateGeometry`] if the nodes have
    /// been moved so that a face collapsed; the caches are left untouched
    /// in that case.
    pub fn recompute_geometry(&mut self) -> MeshResult<()> {
        let face_areas = geometry::face_areas(&self.nodes, &self.faces)?;
        let face_normals = geometry::face_normals(&self.nodes, &self.faces)?;
        let vertex_normals = geometry::vertex_normals(&face_normals, &self.adjacency)?;

        self.vertex_areas = geometry::vertex_areas(&face_areas, &self.adjacency);
        self.face_areas = face_areas;
        self.face_normals = face_normals;
        self.vertex_normals = vertex_normals;

        debug!("Recomputed geometry for {} faces", self.faces.len());
        Ok(())
    }

    /// Save the current positions and faces as OFF.
    pub fn save(&self, path: impl AsRef<Path>) -> MeshResult<()> {
        io::save_off(self, path.as_ref())
    }

    /// Node positions.
    #[inline]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Mutable node positions. The slice cannot grow or shrink.
    #[inline]
    pub fn nodes_mut(&mut self) -> &mut [Node] {
        &mut self.nodes
    }

    /// Faces, oriented outward.
    #[inline]
    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    #[inline]
    pub fn adjacency(&self) -> &MeshAdjacency {
        &self.adjacency
    }

    /// Distinct canonical edges.
    #[inline]
    pub fn edges(&self) -> &[Edge] {
        &self.adjacency.edges
    }

    /// Faces incident to a node, ascending.
    pub fn faces_for_node(&self, node: u32) -> &[u32] {
        self.adjacency.faces_for_vertex(node).unwrap_or_default()
    }

    /// Faces incident to an edge, in either orientation.
    pub fn faces_for_edge(&self, v0: u32, v1: u32) -> &[u32] {
        self.adjacency.faces_for_edge(v0, v1).unwrap_or_default()
    }

    #[inline]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    #[inline]
    pub fn edge_count(&self) -> usize {
        self.adjacency.edge_count()
    }

    /// Per-face areas as of the last recomputation.
    pub fn face_areas(&self) -> &[f64] {
        &self.face_areas
    }

    /// Per-node areas as of the last recomputation.
    pub fn vertex_areas(&self) -> &[f64] {
        &self.vertex_areas
    }

    /// Per-face unit normals as of the last recomputation.
    pub fn face_normals(&self) -> &[Vector3<f64>] {
        &self.face_normals
    }

    /// Per-node unit normals as of the last recomputation.
    pub fn vertex_normals(&self) -> &[Vector3<f64>] {
        &self.vertex_normals
    }

    /// Mean of the current node positions.
    pub fn centroid(&self) -> Point3<f64> {
        geometry::centroid(&self.nodes)
    }

    /// Total surface area of the current positions.
    pub fn surface_area(&self) -> MeshResult<f64> {
        geometry::face_areas(&self.nodes, &self.faces).map(|areas| geometry::surface_area(&areas))
    }

    /// Enclosed volume of the current positions.
    pub fn volume(&self) -> f64 {
        geometry::volume(&self.nodes, &self.faces)
    }

    /// Enclosed volume measured from an arbitrary reference point.
    pub fn volume_from(&self, reference: &Point3<f64>) -> f64 {
        geometry::signed_volume(&self.nodes, &self.faces, reference)
    }

    /// Surface area frozen at construction.
    #[inline]
    pub fn initial_surface_area(&self) -> f64 {
        self.initial_surface_area
    }

    /// Volume frozen at construction, or the last value passed to
    /// [`CellMesh::set_initial_volume`].
    #[inline]
    pub fn initial_volume(&self) -> f64 {
        self.initial_volume
    }

    /// Replace the reference volume, e.g. after a volume-changing event.
    pub fn set_initial_volume(&mut self, volume: f64) {
        info!(
            "Initial volume overridden: {:.6} -> {:.6}",
            self.initial_volume, volume
        );
        self.initial_volume = volume;
    }
}

fn validate_indices(nodes: &[Node], faces: &[Face]) -> MeshResult<()> {
    if nodes.is_empty() || faces.is_empty() {
        return Err(MeshError::parse(
            "<memory>",
            format!(
                "mesh needs nodes and faces, counts are {} and {}",
                nodes.len(),
                faces.len()
            ),
        ));
    }
    for (face_idx, face) in faces.iter().enumerate() {
        if let Some(&bad) = face.iter().find(|&&v| v as usize >= nodes.len()) {
            return Err(MeshError::parse(
                "<memory>",
                format!(
                    "face {} references node {} but only {} nodes exist",
                    face_idx,
                    bad,
                    nodes.len()
                ),
            ));
        }
        if face[0] == face[1] || face[1] == face[2] || face[0] == face[2] {
            return Err(MeshError::parse(
                "<memory>",
                format!("face {} repeats a node: {:?}", face_idx, face),
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_meshes::{icosahedron_off, octahedron_faces, octahedron_nodes, octahedron_off};
    use approx::assert_relative_eq;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_icosahedron_end_to_end() {
        let radius = 1.0;
        let mesh = CellMesh::from_off_str(&icosahedron_off(), radius).expect("valid icosahedron");

        assert_eq!(mesh.node_count(), 12);
        assert_eq!(mesh.face_count(), 20);
        assert_eq!(mesh.edge_count(), 30);
        for &(a, b) in mesh.edges() {
            assert_eq!(mesh.faces_for_edge(a, b).len(), 2);
        }

        let edge = 4.0 * radius / (10.0 + 2.0 * 5f64.sqrt()).sqrt();
        let expected_area = 5.0 * 3f64.sqrt() * edge * edge;
        let expected_volume = 5.0 / 12.0 * (3.0 + 5f64.sqrt()) * edge.powi(3);

        assert_relative_eq!(mesh.initial_surface_area(), expected_area, epsilon = 1e-6);
        // 7 of the 20 source faces are reversed; each face bounds an equal
        // share of the volume, so the source winding measures 6 / 20 of it.
        assert_relative_eq!(mesh.initial_volume(), 0.3 * expected_volume, epsilon = 1e-6);
        assert_relative_eq!(mesh.surface_area().unwrap(), expected_area, epsilon = 1e-6);
        assert_relative_eq!(mesh.volume(), expected_volume, epsilon = 1e-6);

        for normal in mesh.vertex_normals() {
            assert_relative_eq!(normal.norm(), 1.0, epsilon = 1e-12);
        }
        // On a sphere the vertex normal is the radial direction.
        for (node, normal) in mesh.nodes().iter().zip(mesh.vertex_normals()) {
            assert_relative_eq!(*normal, node.coords / radius, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_load_from_file_and_config() {
        let mut file = NamedTempFile::with_suffix(".off").unwrap();
        file.write_all(icosahedron_off().as_bytes()).unwrap();

        let mesh = CellMesh::load(file.path(), 2.0).expect("should load");
        for node in mesh.nodes() {
            assert_relative_eq!(node.coords.norm(), 2.0, epsilon = 1e-12);
        }

        let config = MeshConfig::new(file.path(), 2.0);
        let from_config = CellMesh::from_config(&config).unwrap();
        assert_eq!(from_config.faces(), mesh.faces());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = CellMesh::load("/nonexistent/cell.off", 1.0).unwrap_err();
        assert!(matches!(err, MeshError::IoRead { .. }));
    }

    #[test]
    fn test_faces_face_away_from_centroid() {
        let mut faces = octahedron_faces();
        faces[0].swap(1, 2);
        faces[5].swap(0, 1);
        let mesh = CellMesh::from_parts(octahedron_nodes(), faces).unwrap();

        let center = mesh.centroid();
        for (face, normal) in mesh.faces().iter().zip(mesh.face_normals()) {
            let p = mesh.nodes()[face[0] as usize];
            assert!((p - center).dot(normal) >= 0.0);
        }
        // Frozen on the source winding: two of eight faces were reversed.
        assert_relative_eq!(mesh.initial_volume(), 2.0 / 3.0, epsilon = 1e-12);
        assert_relative_eq!(mesh.volume(), 4.0 / 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_initial_volume_measured_before_orientation() {
        let faces = octahedron_faces()
            .into_iter()
            .map(|[a, b, c]| [a, c, b])
            .collect();
        let mut mesh = CellMesh::from_parts(octahedron_nodes(), faces).unwrap();

        assert_relative_eq!(mesh.initial_volume(), -4.0 / 3.0, epsilon = 1e-12);
        assert_relative_eq!(mesh.volume(), 4.0 / 3.0, epsilon = 1e-12);
        assert_eq!(mesh.faces(), &octahedron_faces()[..]);

        let oriented = mesh.volume();
        mesh.set_initial_volume(oriented);
        assert_relative_eq!(mesh.initial_volume(), 4.0 / 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_declared_edge_count_mismatch_uses_derived() {
        let text = icosahedron_off().replacen("12 20 30", "12 20 29", 1);
        assert!(text.contains("12 20 29"));

        let mesh = CellMesh::from_off_str(&text, 1.0).expect("mismatch is not fatal");
        assert_eq!(mesh.edge_count(), 30);
        assert_eq!(mesh.adjacency().euler_characteristic(mesh.face_count()), 2);
    }

    #[test]
    fn test_volume_reference_point_invariance() {
        let mesh = CellMesh::from_off_str(&icosahedron_off(), 3.0).unwrap();
        let a = mesh.volume_from(&Point3::new(0.1, 0.2, 0.3));
        let b = mesh.volume_from(&Point3::new(-40.0, 12.5, 7.0));
        assert_relative_eq!(a, b, epsilon = 1e-9);
        assert_relative_eq!(a, mesh.volume(), epsilon = 1e-9);
    }

    #[test]
    fn test_octahedron_vertex_areas() {
        let mesh = CellMesh::from_off_str(&octahedron_off(), 1.0).unwrap();
        let face_area = 3f64.sqrt() / 2.0;
        for &area in mesh.face_areas() {
            assert_relative_eq!(area, face_area, epsilon = 1e-12);
        }
        for &area in mesh.vertex_areas() {
            assert_relative_eq!(area, face_area, epsilon = 1e-12);
        }
        assert_eq!(mesh.faces_for_node(4).len(), 4);
    }

    #[test]
    fn test_deformation_and_recompute() {
        let mut mesh = CellMesh::from_off_str(&octahedron_off(), 1.0).unwrap();
        let initial_volume = mesh.initial_volume();

        for node in mesh.nodes_mut() {
            node.coords *= 2.0;
        }

        // Caches still describe the old positions.
        assert_relative_eq!(mesh.face_areas()[0], 3f64.sqrt() / 2.0, epsilon = 1e-12);

        mesh.recompute_geometry().unwrap();
        assert_relative_eq!(mesh.face_areas()[0], 2.0 * 3f64.sqrt(), epsilon = 1e-12);
        assert_relative_eq!(mesh.volume(), 8.0 * initial_volume, epsilon = 1e-12);
        assert_relative_eq!(mesh.surface_area().unwrap(), 16.0 * 3f64.sqrt(), epsilon = 1e-12);

        // Frozen values are untouched by recomputation.
        assert_relative_eq!(mesh.initial_volume(), initial_volume);
        assert_relative_eq!(mesh.initial_surface_area(), 4.0 * 3f64.sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn test_collapsed_face_after_construction() {
        let mut mesh = CellMesh::from_off_str(&octahedron_off(), 1.0).unwrap();
        let before = mesh.vertex_normals().to_vec();

        let target = mesh.nodes()[2];
        mesh.nodes_mut()[0] = target;

        let err = mesh.recompute_geometry().unwrap_err();
        assert!(matches!(err, MeshError::DegenerateGeometry { .. }));
        assert!(matches!(mesh.surface_area(), Err(MeshError::DegenerateGeometry { .. })));
        assert_eq!(mesh.vertex_normals(), &before[..]);
    }

    #[test]
    fn test_set_initial_volume() {
        let mut mesh = CellMesh::from_off_str(&octahedron_off(), 1.0).unwrap();
        mesh.set_initial_volume(2.5);
        assert_eq!(mesh.initial_volume(), 2.5);

        mesh.recompute_geometry().unwrap();
        assert_eq!(mesh.initial_volume(), 2.5);
    }

    #[test]
    fn test_construction_rejects_open_mesh() {
        let nodes = octahedron_nodes();
        let mut faces = octahedron_faces();
        faces.pop();
        let err = CellMesh::from_parts(nodes, faces).unwrap_err();
        assert!(matches!(err, MeshError::ManifoldViolation { face_count: 1, .. }));
    }

    #[test]
    fn test_construction_rejects_degenerate_face() {
        let mut nodes = octahedron_nodes();
        // Flatten the +z apex into the equator plane between +x and +y.
        nodes[4] = Node::new(0.5, 0.5, 0.0);
        let err = CellMesh::from_parts(nodes, octahedron_faces()).unwrap_err();
        assert!(matches!(err, MeshError::DegenerateGeometry { .. }));
    }

    #[test]
    fn test_from_parts_rejects_bad_indices() {
        let err = CellMesh::from_parts(octahedron_nodes(), vec![[0, 1, 9]]).unwrap_err();
        assert!(matches!(err, MeshError::ParseError { .. }));

        let err = CellMesh::from_parts(octahedron_nodes(), vec![[0, 1, 1]]).unwrap_err();
        assert!(matches!(err, MeshError::ParseError { .. }));
    }

    #[test]
    fn test_from_parts_rejects_empty_mesh() {
        let err = CellMesh::from_parts(Vec::new(), Vec::new()).unwrap_err();
        assert!(matches!(err, MeshError::ParseError { .. }));

        let err = CellMesh::from_parts(octahedron_nodes(), Vec::new()).unwrap_err();
        assert!(err.to_string().contains("needs nodes and faces"));
    }
}
