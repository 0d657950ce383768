//! Mesh topology via adjacency structures.

use hashbrown::HashMap;
use tracing::debug;

use crate::error::{MeshError, MeshResult};
use crate::types::{canonical_edge, face_edges, Edge, Face};

/// Vertex-to-face and edge-to-face relationships of a triangle mesh.
///
/// Built once from the face list; faces are never added or removed
/// afterwards, so the structure is never rebuilt.
#[derive(Debug, Clone)]
pub struct MeshAdjacency {
    /// For each node index, the ascending list of faces that use it.
    pub vertex_to_faces: Vec<Vec<u32>>,

    /// Maps canonical edge (min_idx, max_idx) → faces sharing that edge.
    pub edge_to_faces: HashMap<Edge, Vec<u32>>,

    /// Distinct canonical edges in the order they were first seen.
    pub edges: Vec<Edge>,
}

impl MeshAdjacency {
    /// Build adjacency from a face list over `node_count` nodes.
    ///
    /// Face indices must be below `node_count`; the OFF loader checks this.
    pub fn build(faces: &[Face], node_count: usize) -> Self {
        let mut vertex_to_faces: Vec<Vec<u32>> = vec![Vec::new(); node_count];
        let mut edge_to_faces: HashMap<Edge, Vec<u32>> =
            HashMap::with_capacity(faces.len() * 3 / 2);
        let mut edges = Vec::with_capacity(faces.len() * 3 / 2);

        for (face_idx, face) in faces.iter().enumerate() {
            let face_idx = face_idx as u32;

            for &v in face {
                vertex_to_faces[v as usize].push(face_idx);
            }

            for edge in face_edges(face) {
                edge_to_faces
                    .entry(edge)
                    .or_insert_with(|| {
                        edges.push(edge);
                        Vec::with_capacity(2)
                    })
                    .push(face_idx);
            }
        }

        debug!(
            "Built adjacency: {} nodes, {} faces, {} edges",
            node_count,
            faces.len(),
            edges.len()
        );

        Self {
            vertex_to_faces,
            edge_to_faces,
            edges,
        }
    }

    /// Check that the faces form a closed 2-manifold.
    ///
    /// Every edge must border exactly two faces, every node must belong to
    /// some face, and no two faces may span the same three nodes.
    pub fn validate_closed_manifold(&self, faces: &[Face]) -> MeshResult<()> {
        for &edge in &self.edges {
            let face_count = self.edge_to_faces.get(&edge).map_or(0, Vec::len);
            if face_count != 2 {
                return Err(MeshError::ManifoldViolation { edge, face_count });
            }
        }

        if let Some(node) = self.vertex_to_faces.iter().position(Vec::is_empty) {
            return Err(MeshError::UnreferencedNode { node: node as u32 });
        }

        let mut seen: HashMap<Face, u32> = HashMap::with_capacity(faces.len());
        for (face_idx, face) in faces.iter().enumerate() {
            let mut key = *face;
            key.sort_unstable();
            if let Some(&first) = seen.get(&key) {
                return Err(MeshError::DuplicateFace {
                    first,
                    second: face_idx as u32,
                });
            }
            seen.insert(key, face_idx as u32);
        }

        Ok(())
    }

    /// Number of distinct edges.
    #[inline]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// V − E + F. Equals 2 for a closed genus-0 surface.
    pub fn euler_characteristic(&self, face_count: usize) -> i64 {
        self.vertex_to_faces.len() as i64 - self.edges.len() as i64 + face_count as i64
    }

    /// Get faces adjacent to a node.
    pub fn faces_for_vertex(&self, vertex_idx: u32) -> Option<&[u32]> {
        self.vertex_to_faces.get(vertex_idx as usize).map(|v| v.as_slice())
    }

    /// Get faces adjacent to an edge.
    /// The edge is automatically canonicalized (min, max).
    pub fn faces_for_edge(&self, v0: u32, v1: u32) -> Option<&[u32]> {
        self.edge_to_faces
            .get(&canonical_edge(v0, v1))
            .map(|v| v.as_slice())
    }

    /// Edges with other than two adjacent faces.
    pub fn non_manifold_edges(&self) -> impl Iterator<Item = Edge> + '_ {
        self.edges
            .iter()
            .copied()
            .filter(|edge| self.edge_to_faces.get(edge).map_or(0, Vec::len) != 2)
    }
}
