//! Geometric quantities of a closed triangle mesh.
//!
//! Per-face results are wrapped in [`FaceAreas`] and [`FaceNormals`], and the
//! per-vertex routines take those wrappers as input. A vertex quantity can
//! therefore only be computed from a face quantity that already exists.

use std::ops::Deref;

use nalgebra::{Point3, Vector3};
use tracing::debug;

use crate::adjacency::MeshAdjacency;
use crate::error::{MeshError, MeshResult};
use crate::types::{Face, Node, Triangle};

/// A face whose doubled area is below this fraction of its longest side
/// squared is treated as degenerate.
pub const DEGENERACY_TOLERANCE: f64 = 1e-12;

/// Area of every face, indexed like the face list.
#[derive(Debug, Clone, PartialEq)]
pub struct FaceAreas(Vec<f64>);

impl Deref for FaceAreas {
    type Target = [f64];

    fn deref(&self) -> &[f64] {
        &self.0
    }
}

/// Unit normal of every face, indexed like the face list.
#[derive(Debug, Clone, PartialEq)]
pub struct FaceNormals(Vec<Vector3<f64>>);

impl Deref for FaceNormals {
    type Target = [Vector3<f64>];

    fn deref(&self) -> &[Vector3<f64>] {
        &self.0
    }
}

/// Heron's formula from three side lengths.
///
/// Each of (s − a), (s − b), (s − c) is clamped at zero, so rounding on
/// nearly collinear triangles yields 0 instead of NaN.
pub fn heron_area(a: f64, b: f64, c: f64) -> f64 {
    let s = (a + b + c) / 2.0;
    let product = s * (s - a).max(0.0) * (s - b).max(0.0) * (s - c).max(0.0);
    product.max(0.0).sqrt()
}

fn check_not_degenerate(tri: &Triangle, face_idx: usize, face: &Face) -> MeshResult<()> {
    if tri.is_degenerate(DEGENERACY_TOLERANCE) {
        return Err(MeshError::degenerate(format!(
            "face {} {:?} has zero area",
            face_idx, face
        )));
    }
    Ok(())
}

/// Area of a single face.
pub(crate) fn face_area(nodes: &[Node], faces: &[Face], face_idx: usize) -> MeshResult<f64> {
    let face = &faces[face_idx];
    let tri = Triangle::from_face(nodes, face);
    check_not_degenerate(&tri, face_idx, face)?;
    let [a, b, c] = tri.side_lengths();
    Ok(heron_area(a, b, c))
}

/// Area of every face.
///
/// # Panics
///
/// Panics if a face indexes past `nodes`. Faces held by a
/// [`crate::CellMesh`] are range-checked at construction.
pub fn face_areas(nodes: &[Node], faces: &[Face]) -> MeshResult<FaceAreas> {
    (0..faces.len())
        .map(|f| face_area(nodes, faces, f))
        .collect::<MeshResult<Vec<_>>>()
        .map(FaceAreas)
}

/// Area attributed to each node: the plain mean of its incident face areas.
pub fn vertex_areas(face_areas: &FaceAreas, adjacency: &MeshAdjacency) -> Vec<f64> {
    adjacency
        .vertex_to_faces
        .iter()
        .map(|faces| {
            if faces.is_empty() {
                return 0.0;
            }
            let total: f64 = faces.iter().map(|&f| face_areas[f as usize]).sum();
            total / faces.len() as f64
        })
        .collect()
}

/// Total surface area.
pub fn surface_area(face_areas: &FaceAreas) -> f64 {
    face_areas.iter().sum()
}

/// Mean of all node positions.
pub fn centroid(nodes: &[Node]) -> Point3<f64> {
    if nodes.is_empty() {
        return Point3::origin();
    }
    let sum: Vector3<f64> = nodes.iter().map(|p| p.coords).sum();
    Point3::from(sum / nodes.len() as f64)
}

/// Sum of signed tetrahedron volumes from `reference` to every face.
///
/// For a closed, consistently oriented surface the result is the enclosed
/// volume whatever `reference` is; contributions of points outside the
/// solid cancel pairwise across the surface.
pub fn signed_volume(nodes: &[Node], faces: &[Face], reference: &Point3<f64>) -> f64 {
    faces
        .iter()
        .map(|face| Triangle::from_face(nodes, face).signed_volume_from(reference))
        .sum()
}

/// Enclosed volume, measured from the centroid.
pub fn volume(nodes: &[Node], faces: &[Face]) -> f64 {
    signed_volume(nodes, faces, &centroid(nodes))
}

/// Flip faces whose normal points toward the centroid.
///
/// Only valid for meshes that are star-shaped about their centroid. A face
/// whose plane contains the centroid, or a shared edge that both of its
/// faces traverse in the same direction afterwards, is reported as
/// [`MeshError::NotStarShaped`] rather than left mis-oriented.
///
/// Returns the number of faces flipped.
pub fn orient_faces(
    nodes: &[Node],
    faces: &mut [Face],
    adjacency: &MeshAdjacency,
) -> MeshResult<usize> {
    let center = centroid(nodes);
    let mut flipped = 0;

    for (face_idx, face) in faces.iter_mut().enumerate() {
        let tri = Triangle::from_face(nodes, face);
        let normal = tri.normal_unnormalized();
        let radial = tri.p0 - center;
        let alignment = radial.dot(&normal);

        if alignment.abs() <= DEGENERACY_TOLERANCE * radial.norm() * normal.norm() {
            return Err(MeshError::NotStarShaped {
                details: format!("plane of face {} {:?} contains the centroid", face_idx, face),
            });
        }
        if alignment < 0.0 {
            face.swap(1, 2);
            flipped += 1;
        }
    }

    for &(a, b) in &adjacency.edges {
        let incident = adjacency.faces_for_edge(a, b).unwrap_or_default();
        if let &[f0, f1] = incident {
            let d0 = edge_direction_in_face(&faces[f0 as usize], a, b);
            let d1 = edge_direction_in_face(&faces[f1 as usize], a, b);
            if d0 == d1 {
                return Err(MeshError::NotStarShaped {
                    details: format!(
                        "faces {} and {} traverse edge ({}, {}) in the same direction",
                        f0, f1, a, b
                    ),
                });
            }
        }
    }

    debug!("Oriented faces outward: flipped {} of {}", flipped, faces.len());
    Ok(flipped)
}

/// Check if edge (a, b) appears in face in the same direction (a -> b).
/// Returns Some(true) if same direction, Some(false) if opposite, None if edge not found.
fn edge_direction_in_face(face: &Face, a: u32, b: u32) -> Option<bool> {
    for i in 0..3 {
        let v0 = face[i];
        let v1 = face[(i + 1) % 3];

        if v0 == a && v1 == b {
            return Some(true);
        }
        if v0 == b && v1 == a {
            return Some(false);
        }
    }
    None
}

/// Unit normal of every face, following current winding.
pub fn face_normals(nodes: &[Node], faces: &[Face]) -> MeshResult<FaceNormals> {
    faces
        .iter()
        .enumerate()
        .map(|(face_idx, face)| {
            let tri = Triangle::from_face(nodes, face);
            check_not_degenerate(&tri, face_idx, face)?;
            Ok(tri.normal_unnormalized().normalize())
        })
        .collect::<MeshResult<Vec<_>>>()
        .map(FaceNormals)
}

/// Unit normal of every node: the normalized plain sum of incident face normals.
pub fn vertex_normals(
    face_normals: &FaceNormals,
    adjacency: &MeshAdjacency,
) -> MeshResult<Vec<Vector3<f64>>> {
    adjacency
        .vertex_to_faces
        .iter()
        .enumerate()
        .map(|(node, faces)| {
            let sum: Vector3<f64> = faces.iter().map(|&f| face_normals[f as usize]).sum();
            let len = sum.norm();
            if !len.is_finite() || len <= DEGENERACY_TOLERANCE * faces.len() as f64 {
                return Err(MeshError::degenerate(format!(
                    "normals of the {} faces around node {} cancel out",
                    faces.len(),
                    node
                )));
            }
            Ok(sum / len)
        })
        .collect()
}
