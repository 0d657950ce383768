//! OFF mesh loading and saving.
//!
//! The loader reads an OFF description (header, counts, node coordinates,
//! face records) and projects every node onto a sphere of the requested
//! radius, preserving the angular layout of the source while fixing the
//! cell's characteristic size.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use tracing::{debug, info};

use crate::config::validate_radius;
use crate::error::{MeshError, MeshResult};
use crate::types::{Face, Node};
use crate::CellMesh;

/// Nodes and faces as read from an OFF source, before any topology exists.
#[derive(Debug, Clone)]
pub struct RawMesh {
    /// Node positions, already rescaled onto the target sphere.
    pub nodes: Vec<Node>,

    /// Faces in source order and source winding.
    pub faces: Vec<Face>,

    /// Edge count declared in the counts record. Informational only.
    pub declared_edge_count: usize,
}

/// Load an OFF file and rescale its nodes onto a sphere of `radius`.
pub fn load_off(path: &Path, radius: f64) -> MeshResult<RawMesh> {
    validate_radius(radius)?;

    info!("Loading mesh from {:?} (radius {})", path, radius);

    let file = File::open(path).map_err(|e| MeshError::IoRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    parse_off(BufReader::new(file), radius, path)
}

/// Parse OFF text from `reader`. `source` is only used in error messages.
pub fn parse_off<R: BufRead>(reader: R, radius: f64, source: &Path) -> MeshResult<RawMesh> {
    validate_radius(radius)?;

    let mut tokens = Tokens::read(reader, source)?;

    match tokens.next() {
        Some((_, "OFF")) => {}
        Some((line, other)) => {
            return Err(MeshError::parse(
                source,
                format!("line {}: expected OFF header, found {:?}", line, other),
            ))
        }
        None => return Err(MeshError::parse(source, "empty input")),
    }

    let node_count: usize = tokens.parse("node count")?;
    let face_count: usize = tokens.parse("face count")?;
    let declared_edge_count: usize = tokens.parse("edge count")?;

    if node_count == 0 || face_count == 0 {
        return Err(MeshError::parse(
            source,
            format!("mesh needs nodes and faces, counts are {} and {}", node_count, face_count),
        ));
    }
    if u32::try_from(node_count).is_err() {
        return Err(MeshError::parse(
            source,
            format!("node count {} exceeds index range", node_count),
        ));
    }

    // Each node takes 3 tokens and each face 4, so the counts can be checked
    // against the input before anything is allocated.
    let required = node_count
        .checked_mul(3)
        .zip(face_count.checked_mul(4))
        .and_then(|(n, f)| n.checked_add(f));
    match required {
        Some(required) if required <= tokens.remaining() => {}
        _ => {
            return Err(MeshError::parse(
                source,
                format!(
                    "counts exceed records: {} nodes and {} faces declared, {} tokens left",
                    node_count,
                    face_count,
                    tokens.remaining()
                ),
            ))
        }
    }

    debug!(
        "OFF declares {} nodes, {} faces, {} edges",
        node_count, face_count, declared_edge_count
    );

    let mut nodes = Vec::with_capacity(node_count);
    for i in 0..node_count {
        let x: f64 = tokens.parse("node coordinate")?;
        let y: f64 = tokens.parse("node coordinate")?;
        let z: f64 = tokens.parse("node coordinate")?;
        nodes.push(project_onto_sphere(Node::new(x, y, z), radius).ok_or_else(|| {
            MeshError::parse(
                source,
                format!("node {} at ({}, {}, {}) has no direction to rescale", i, x, y, z),
            )
        })?);
    }

    let mut faces = Vec::with_capacity(face_count);
    for f in 0..face_count {
        let vertices_per_face: usize = tokens.parse("face vertex count")?;
        if vertices_per_face != 3 {
            return Err(MeshError::parse(
                source,
                format!("face {} has {} vertices, only triangles are supported", f, vertices_per_face),
            ));
        }

        let mut face = [0u32; 3];
        for slot in &mut face {
            let index: i64 = tokens.parse("face index")?;
            if index < 0 || index as usize >= node_count {
                return Err(MeshError::parse(
                    source,
                    format!("face {} references node {} but only {} nodes exist", f, index, node_count),
                ));
            }
            *slot = index as u32;
        }

        if face[0] == face[1] || face[1] == face[2] || face[0] == face[2] {
            return Err(MeshError::parse(
                source,
                format!("face {} repeats a node: {:?}", f, face),
            ));
        }
        faces.push(face);
    }

    let trailing = tokens.remaining();
    if trailing > 0 {
        debug!("Ignoring {} trailing tokens after the last face", trailing);
    }

    info!("Loaded mesh: {} nodes, {} faces", nodes.len(), faces.len());

    Ok(RawMesh {
        nodes,
        faces,
        declared_edge_count,
    })
}

/// Write the mesh's current node positions and faces as OFF.
pub fn save_off(mesh: &CellMesh, path: &Path) -> MeshResult<()> {
    info!("Saving mesh to {:?} (OFF format)", path);

    let io_err = |e: std::io::Error| MeshError::IoWrite {
        path: path.to_path_buf(),
        source: e,
    };

    let file = File::create(path).map_err(io_err)?;
    let mut writer = BufWriter::new(file);

    writeln!(writer, "OFF").map_err(io_err)?;
    writeln!(
        writer,
        "{} {} {}",
        mesh.node_count(),
        mesh.face_count(),
        mesh.edge_count()
    )
    .map_err(io_err)?;

    for node in mesh.nodes() {
        writeln!(writer, "{} {} {}", node.x, node.y, node.z).map_err(io_err)?;
    }
    for &[a, b, c] in mesh.faces() {
        writeln!(writer, "3 {} {} {}", a, b, c).map_err(io_err)?;
    }

    writer.flush().map_err(io_err)?;
    Ok(())
}

/// Scale `p` to length `radius`. `None` when `p` has no usable direction.
fn project_onto_sphere(p: Node, radius: f64) -> Option<Node> {
    let norm = p.coords.norm();
    if !norm.is_finite() || norm == 0.0 {
        return None;
    }
    Some(Node::from(p.coords * (radius / norm)))
}

/// Whitespace-separated tokens with `#` comments removed, tagged by line.
struct Tokens<'a> {
    source: &'a Path,
    tokens: Vec<(usize, String)>,
    pos: usize,
}

impl<'a> Tokens<'a> {
    fn read<R: BufRead>(reader: R, source: &'a Path) -> MeshResult<Self> {
        let mut tokens = Vec::new();
        for (line_idx, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| MeshError::IoRead {
                path: source.to_path_buf(),
                source: e,
            })?;
            let content = line.split('#').next().unwrap_or("");
            tokens.extend(
                content
                    .split_whitespace()
                    .map(|t| (line_idx + 1, t.to_string())),
            );
        }
        Ok(Self {
            source,
            tokens,
            pos: 0,
        })
    }

    fn next(&mut self) -> Option<(usize, &str)> {
        let (line, token) = self.tokens.get(self.pos)?;
        self.pos += 1;
        Some((*line, token.as_str()))
    }

    fn parse<T: std::str::FromStr>(&mut self, what: &str) -> MeshResult<T> {
        let source = self.source;
        match self.next() {
            Some((line, token)) => token.parse().map_err(|_| {
                MeshError::parse(source, format!("line {}: invalid {} {:?}", line, what, token))
            }),
            None => Err(MeshError::parse(
                source,
                format!("unexpected end of input, expected {}", what),
            )),
        }
    }

    fn remaining(&self) -> usize {
        self.tokens.len() - self.pos
    }
}
