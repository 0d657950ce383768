//! Core mesh value types.

use nalgebra::{Point3, Vector3};

/// A mesh node position. The node's index in the node list is its identity.
pub type Node = Point3<f64>;

/// Triangle face as indices into the node list.
/// Index order encodes winding; the normal follows the right-hand rule.
pub type Face = [u32; 3];

/// Undirected edge stored as (smaller_index, larger_index).
pub type Edge = (u32, u32);

/// Canonicalize an edge so that the smaller node index comes first.
#[inline]
pub fn canonical_edge(a: u32, b: u32) -> Edge {
    if a < b {
        (a, b)
    } else {
        (b, a)
    }
}

/// The three canonical edges of a face, in winding order.
#[inline]
pub fn face_edges(&[v0, v1, v2]: &Face) -> [Edge; 3] {
    [
        canonical_edge(v0, v1),
        canonical_edge(v1, v2),
        canonical_edge(v2, v0),
    ]
}

/// A triangle with concrete node positions.
#[derive(Debug, Clone, Copy)]
pub struct Triangle {
    pub p0: Point3<f64>,
    pub p1: Point3<f64>,
    pub p2: Point3<f64>,
}

impl Triangle {
    #[inline]
    pub fn new(p0: Point3<f64>, p1: Point3<f64>, p2: Point3<f64>) -> Self {
        Self { p0, p1, p2 }
    }

    /// Gather the positions of `face` from `nodes`.
    ///
    /// Indices must already be range-checked; the loader and adjacency
    /// builder guarantee this for every face a [`crate::CellMesh`] holds.
    #[inline]
    pub(crate) fn from_face(nodes: &[Node], face: &Face) -> Self {
        Self::new(
            nodes[face[0] as usize],
            nodes[face[1] as usize],
            nodes[face[2] as usize],
        )
    }

    /// Un-normalized normal `(p1 - p0) × (p2 - p1)`, following winding order.
    /// Its length is twice the triangle area.
    #[inline]
    pub fn normal_unnormalized(&self) -> Vector3<f64> {
        (self.p1 - self.p0).cross(&(self.p2 - self.p1))
    }

    /// Side lengths `|p0 p1|`, `|p1 p2|`, `|p2 p0|`.
    #[inline]
    pub fn side_lengths(&self) -> [f64; 3] {
        [
            (self.p0 - self.p1).norm(),
            (self.p1 - self.p2).norm(),
            (self.p2 - self.p0).norm(),
        ]
    }

    /// Length of the longest side.
    pub fn longest_side(&self) -> f64 {
        let [a, b, c] = self.side_lengths();
        a.max(b).max(c)
    }

    /// Signed volume of the tetrahedron spanned by `reference` and the triangle.
    /// Positive when the winding faces away from `reference`.
    #[inline]
    pub fn signed_volume_from(&self, reference: &Point3<f64>) -> f64 {
        let a = self.p0 - reference;
        let b = self.p1 - reference;
        let c = self.p2 - reference;
        a.dot(&b.cross(&c)) / 6.0
    }

    /// Check if the triangle is degenerate relative to its own size.
    ///
    /// Uses the cross-product magnitude rather than Heron's formula, which
    /// loses precision on slivers.
    pub fn is_degenerate(&self, relative_tolerance: f64) -> bool {
        let scale = self.longest_side();
        if !scale.is_finite() || scale == 0.0 {
            return true;
        }
        self.normal_unnormalized().norm() <= relative_tolerance * scale * scale
    }
}
