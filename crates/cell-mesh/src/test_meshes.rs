//! Small closed meshes shared by the unit tests.

use crate::types::{Face, Node};

/// Regular octahedron with unit circumradius: ±x, ±y, ±z.
pub fn octahedron_nodes() -> Vec<Node> {
    vec![
        Node::new(1.0, 0.0, 0.0),
        Node::new(-1.0, 0.0, 0.0),
        Node::new(0.0, 1.0, 0.0),
        Node::new(0.0, -1.0, 0.0),
        Node::new(0.0, 0.0, 1.0),
        Node::new(0.0, 0.0, -1.0),
    ]
}

/// Outward-wound octahedron faces; the first four touch the +z apex.
pub fn octahedron_faces() -> Vec<Face> {
    vec![
        [0, 2, 4],
        [2, 1, 4],
        [1, 3, 4],
        [3, 0, 4],
        [2, 0, 5],
        [1, 2, 5],
        [3, 1, 5],
        [0, 3, 5],
    ]
}

pub fn octahedron_off() -> String {
    to_off(&octahedron_nodes(), &octahedron_faces(), 12)
}

/// Regular icosahedron from the (0, ±1, ±φ) construction, mixed winding.
pub fn icosahedron_off() -> String {
    let phi = (1.0 + 5f64.sqrt()) / 2.0;
    let nodes = vec![
        Node::new(-1.0, phi, 0.0),
        Node::new(1.0, phi, 0.0),
        Node::new(-1.0, -phi, 0.0),
        Node::new(1.0, -phi, 0.0),
        Node::new(0.0, -1.0, phi),
        Node::new(0.0, 1.0, phi),
        Node::new(0.0, -1.0, -phi),
        Node::new(0.0, 1.0, -phi),
        Node::new(phi, 0.0, -1.0),
        Node::new(phi, 0.0, 1.0),
        Node::new(-phi, 0.0, -1.0),
        Node::new(-phi, 0.0, 1.0),
    ];
    let faces = vec![
        [0, 11, 5],
        [0, 5, 1],
        [0, 1, 7],
        [0, 7, 10],
        [0, 10, 11],
        [1, 5, 9],
        [5, 11, 4],
        [11, 10, 2],
        [10, 7, 6],
        [7, 1, 8],
        [3, 9, 4],
        [3, 4, 2],
        [3, 2, 6],
        [3, 6, 8],
        [3, 8, 9],
        [4, 9, 5],
        [2, 4, 11],
        [6, 2, 10],
        [8, 6, 7],
        [9, 8, 1],
    ];
    // Reverse a few faces so orientation correction has work to do.
    let faces: Vec<Face> = faces
        .into_iter()
        .enumerate()
        .map(|(i, [a, b, c])| if i % 3 == 0 { [a, c, b] } else { [a, b, c] })
        .collect();
    to_off(&nodes, &faces, 30)
}

fn to_off(nodes: &[Node], faces: &[Face], edge_count: usize) -> String {
    let mut text = format!("OFF\n{} {} {}\n", nodes.len(), faces.len(), edge_count);
    for p in nodes {
        text.push_str(&format!("{} {} {}\n", p.x, p.y, p.z));
    }
    for [a, b, c] in faces {
        text.push_str(&format!("3 {} {} {}\n", a, b, c));
    }
    text
}
