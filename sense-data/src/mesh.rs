//! Indexed triangle mesh produced by depth reconstruction.

use crate::error::MeshError;
use crate::types::Triangle;
use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::{debug, info};

/// Interleaved vertex layout for GPU upload.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

/// An indexed triangle mesh with per-vertex normals.
///
/// `indices` is grouped in triples; each triple is one triangle.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Mesh {
    pub vertices: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub indices: Vec<u32>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop all geometry but keep the allocations for reuse.
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.normals.clear();
        self.indices.clear();
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// No geometry has been built. A degenerate grid still has vertices
    /// but no triangles, so check `triangle_count` for that case.
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Iterate over the triangles as position triples.
    pub fn triangles(&self) -> impl Iterator<Item = Triangle> + '_ {
        self.indices.chunks_exact(3).map(|tri| {
            Triangle::new(
                self.vertices[tri[0] as usize],
                self.vertices[tri[1] as usize],
                self.vertices[tri[2] as usize],
            )
        })
    }

    /// Recompute smooth per-vertex normals from the triangle list.
    ///
    /// Each vertex gets the normalized sum of its adjacent face normals,
    /// weighted by face area. Vertices with no triangles get `Vec3::ZERO`.
    pub fn recompute_normals(&mut self) {
        self.normals.clear();
        self.normals.resize(self.vertices.len(), Vec3::ZERO);

        for tri in self.indices.chunks_exact(3) {
            let (a, b, c) = (tri[0] as usize, tri[1] as usize, tri[2] as usize);
            let face = Triangle::new(self.vertices[a], self.vertices[b], self.vertices[c]).normal();
            self.normals[a] += face;
            self.normals[b] += face;
            self.normals[c] += face;
        }

        for normal in &mut self.normals {
            *normal = normal.normalize_or_zero();
        }
    }

    /// Interleave positions and normals for upload.
    pub fn interleaved(&self) -> Vec<MeshVertex> {
        self.vertices
            .iter()
            .zip(self.normals.iter().chain(std::iter::repeat(&Vec3::ZERO)))
            .map(|(p, n)| MeshVertex {
                position: p.to_array(),
                normal: n.to_array(),
            })
            .collect()
    }

    /// Raw bytes of the index buffer (`u32`, native endian).
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }

    /// Export the mesh as JSON (`vertices`, `normals`, `indices`).
    #[tracing::instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn write_json<P: AsRef<Path>>(&self, path: P) -> Result<(), MeshError> {
        let file = File::create(path.as_ref())?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer(&mut writer, self)?;
        writer.flush()?;
        info!(
            "Exported mesh: {} vertices, {} triangles",
            self.vertex_count(),
            self.triangle_count()
        );
        Ok(())
    }

    /// Serialize the mesh to a JSON string.
    pub fn to_json(&self) -> Result<String, MeshError> {
        let json = serde_json::to_string(self)?;
        debug!("Serialized mesh to {} bytes of JSON", json.len());
        Ok(json)
    }
}
