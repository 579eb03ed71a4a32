//! Depth grid to triangle mesh reconstruction.
//!
//! A `W x H` grid becomes a `(W + 1) x (H + 1)` lattice of vertices, centred
//! on the origin in XY, with each sample pushed along -Z. Every grid cell
//! emits two triangles sharing the diagonal from its top-right corner to its
//! bottom-left corner.

use crate::error::MeshError;
use crate::mesh::Mesh;
use crate::types::{BorderPolicy, DepthGrid, MeshScale, checked_dims};
use glam::Vec3;
use tracing::{debug, warn};

/// Build a new mesh from a depth grid.
pub fn build_mesh(
    grid: &DepthGrid,
    scale: MeshScale,
    border: BorderPolicy,
) -> Result<Mesh, MeshError> {
    let mut mesh = Mesh::new();
    build_mesh_into(grid, scale, border, &mut mesh)?;
    Ok(mesh)
}

/// Build a mesh from signed dimensions and a raw row-major sample slice.
///
/// Dimensions are validated before anything is allocated.
pub fn build_mesh_checked(
    width: i64,
    height: i64,
    samples: &[f32],
    scale: MeshScale,
    border: BorderPolicy,
) -> Result<Mesh, MeshError> {
    let (width, height) = checked_dims(width, height)?;
    scale.validate()?;
    mesh_counts(width, height)?;
    let grid = DepthGrid::new(width, height, samples.to_vec())?;
    build_mesh(&grid, scale, border)
}

/// Rebuild `mesh` in place from a depth grid, reusing its allocations.
///
/// On error `mesh` is left untouched.
#[tracing::instrument(skip_all, fields(width = grid.width(), height = grid.height()))]
pub fn build_mesh_into(
    grid: &DepthGrid,
    scale: MeshScale,
    border: BorderPolicy,
    mesh: &mut Mesh,
) -> Result<(), MeshError> {
    scale.validate()?;
    let (width, height) = grid.dimensions();
    let (vertex_count, index_count) = mesh_counts(width, height)?;

    mesh.clear();
    mesh.vertices.reserve(vertex_count);
    mesh.indices.reserve(index_count);

    let half_w = width as f32 * 0.5;
    let half_h = height as f32 * 0.5;
    for y in 0..=height {
        for x in 0..=width {
            let depth = grid.sample(x, y, border);
            mesh.vertices.push(Vec3::new(
                (x as f32 - half_w) * scale.horizontal,
                (y as f32 - half_h) * scale.vertical,
                -depth * scale.depth,
            ));
        }
    }

    let row = width + 1;
    for y in 0..height {
        for x in 0..width {
            let vi = y * row + x;
            mesh.indices.extend_from_slice(&[
                vi,
                vi + row,
                vi + 1,
                vi + 1,
                vi + row,
                vi + row + 1,
            ]);
        }
    }

    if index_count == 0 {
        warn!("Degenerate {}x{} depth grid, mesh has no triangles", width, height);
    }

    mesh.recompute_normals();

    debug!(
        "Built depth mesh: {} vertices, {} triangles",
        mesh.vertex_count(),
        mesh.triangle_count()
    );
    Ok(())
}

/// Vertex and index counts for a `width x height` grid.
///
/// Fails when the vertex count does not fit in 32-bit indices.
pub fn mesh_counts(width: u32, height: u32) -> Result<(usize, usize), MeshError> {
    let vertices = (width as u64 + 1) * (height as u64 + 1);
    if vertices > u32::MAX as u64 {
        return Err(MeshError::invalid(format!(
            "grid {}x{} needs {} vertices, more than 32-bit indices can address",
            width, height, vertices
        )));
    }
    let indices = width as u64 * height as u64 * 6;
    let indices = usize::try_from(indices)
        .map_err(|_| MeshError::invalid(format!("grid {}x{} is too large", width, height)))?;
    Ok((vertices as usize, indices))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_scale() -> MeshScale {
        MeshScale::uniform(1.0)
    }

    fn build(width: u32, height: u32) -> Mesh {
        let grid = DepthGrid::from_fn(width, height, |x, y| ((x * 7 + y * 3) % 5) as f32 * 0.2);
        build_mesh(&grid, unit_scale(), BorderPolicy::ClampToEdge).unwrap()
    }

    #[test]
    fn test_counts_match_formula() {
        for (w, h) in [(1, 1), (2, 1), (1, 2), (3, 4), (7, 5), (16, 9)] {
            let mesh = build(w, h);
            assert_eq!(mesh.vertices.len(), ((w + 1) * (h + 1)) as usize);
            assert_eq!(mesh.normals.len(), mesh.vertices.len());
            assert_eq!(mesh.indices.len(), (w * h * 6) as usize);
        }
    }

    #[test]
    fn test_two_by_one_example() {
        let mesh = build(2, 1);
        assert_eq!(mesh.vertices.len(), 6);
        assert_eq!(mesh.indices.len(), 12);
        assert_eq!(&mesh.indices[0..3], &[0, 3, 1]);
        assert_eq!(&mesh.indices[3..6], &[1, 3, 4]);
        assert_eq!(&mesh.indices[6..9], &[1, 4, 2]);
        assert_eq!(&mesh.indices[9..12], &[2, 4, 5]);
    }

    #[test]
    fn test_cells_reference_their_corners() {
        let (w, h) = (5u32, 3u32);
        let mesh = build(w, h);
        let row = w + 1;
        for y in 0..h {
            for x in 0..w {
                let cell = (y * w + x) as usize * 6;
                let vi = y * row + x;
                let mut corners: Vec<u32> = mesh.indices[cell..cell + 6].to_vec();
                corners.sort_unstable();
                corners.dedup();
                assert_eq!(corners, vec![vi, vi + 1, vi + row, vi + row + 1]);
            }
        }
        assert!(
            mesh.indices
                .iter()
                .all(|&i| (i as usize) < mesh.vertices.len())
        );
    }

    #[test]
    fn test_winding_is_consistent() {
        let mesh = build(8, 6);
        // Every triangle projects with the same (clockwise seen from +Z) orientation
        for tri in mesh.triangles() {
            assert!(tri.signed_area_xy() < 0.0);
        }
    }

    #[test]
    fn test_vertex_positions() {
        let grid = DepthGrid::new(2, 1, vec![0.25, 0.5]).unwrap();
        let scale = MeshScale::new(2.0, 3.0, 4.0);
        let mesh = build_mesh(&grid, scale, BorderPolicy::ClampToEdge).unwrap();

        // Row-major: vertex (x, y) at y * 3 + x
        assert_eq!(mesh.vertices[0], Vec3::new(-2.0, -1.5, -1.0));
        assert_eq!(mesh.vertices[1], Vec3::new(0.0, -1.5, -2.0));
        // x == W clamps to the last column
        assert_eq!(mesh.vertices[2], Vec3::new(2.0, -1.5, -2.0));
        // y == H clamps to the last row
        assert_eq!(mesh.vertices[3], Vec3::new(-2.0, 1.5, -1.0));
        assert_eq!(mesh.vertices[5], Vec3::new(2.0, 1.5, -2.0));
    }

    #[test]
    fn test_reference_scale() {
        let grid = DepthGrid::filled(640, 480, 1.0);
        let mesh = build_mesh(&grid, MeshScale::REFERENCE, BorderPolicy::ClampToEdge).unwrap();
        let first = mesh.vertices[0];
        assert!((first - Vec3::new(-32.0, -24.0, -10.0)).length() < 1e-4);
        let last = mesh.vertices[mesh.vertices.len() - 1];
        assert!((last - Vec3::new(32.0, 24.0, -10.0)).length() < 1e-4);
        assert_eq!(mesh.vertices.len(), 641 * 481);
        assert_eq!(mesh.indices.len(), 640 * 480 * 6);
    }

    #[test]
    fn test_zero_border_policy() {
        let grid = DepthGrid::filled(2, 2, 1.0);
        let mesh = build_mesh(&grid, unit_scale(), BorderPolicy::Zero).unwrap();
        let row = 3;
        for y in 0..=2 {
            for x in 0..=2 {
                let z = mesh.vertices[y * row + x].z;
                if x == 2 || y == 2 {
                    assert_eq!(z, 0.0);
                } else {
                    assert_eq!(z, -1.0);
                }
            }
        }
    }

    #[test]
    fn test_degenerate_dimensions() {
        for (w, h) in [(0, 0), (0, 4), (4, 0)] {
            let grid = DepthGrid::filled(w, h, 0.5);
            let mesh = build_mesh(&grid, unit_scale(), BorderPolicy::ClampToEdge).unwrap();
            assert_eq!(mesh.vertices.len(), ((w + 1) * (h + 1)) as usize);
            assert!(!mesh.is_empty());
            assert_eq!(mesh.triangle_count(), 0);
            assert!(mesh.normals.iter().all(|n| *n == Vec3::ZERO));
            assert!(mesh.vertices.iter().all(|v| v.z == 0.0));
        }
    }

    #[test]
    fn test_negative_dimensions_rejected() {
        let err = build_mesh_checked(-1, 4, &[], unit_scale(), BorderPolicy::ClampToEdge)
            .unwrap_err();
        assert!(err.is_invalid_argument());

        let err = build_mesh_checked(3, -2, &[], unit_scale(), BorderPolicy::ClampToEdge)
            .unwrap_err();
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn test_checked_builds_valid_input() {
        let mesh = build_mesh_checked(2, 1, &[0.0, 0.0], unit_scale(), BorderPolicy::ClampToEdge)
            .unwrap();
        assert_eq!(mesh.vertices.len(), 6);
        assert_eq!(mesh.indices.len(), 12);
    }

    #[test]
    fn test_invalid_scale_rejected() {
        let grid = DepthGrid::filled(2, 2, 0.0);
        let err = build_mesh(&grid, MeshScale::new(1.0, 0.0, 1.0), BorderPolicy::ClampToEdge)
            .unwrap_err();
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn test_oversized_grid_rejected() {
        let err = mesh_counts(u32::MAX, 2).unwrap_err();
        assert!(err.is_invalid_argument());
        assert!(mesh_counts(640, 480).is_ok());
    }

    #[test]
    fn test_flat_grid_normals() {
        let grid = DepthGrid::filled(6, 4, 0.3);
        let mesh = build_mesh(&grid, MeshScale::REFERENCE, BorderPolicy::ClampToEdge).unwrap();
        for n in &mesh.normals {
            assert!((*n - Vec3::new(0.0, 0.0, -1.0)).length() < 1e-5);
        }
    }

    #[test]
    fn test_normals_are_unit_length() {
        let mesh = build(9, 7);
        for n in &mesh.normals {
            assert!((n.length() - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_rebuild_into_reuses_buffer() {
        let mut mesh = Mesh::new();
        let big = DepthGrid::filled(10, 10, 0.1);
        build_mesh_into(&big, unit_scale(), BorderPolicy::ClampToEdge, &mut mesh).unwrap();
        let capacity = mesh.indices.capacity();

        let small = DepthGrid::filled(2, 1, 0.1);
        build_mesh_into(&small, unit_scale(), BorderPolicy::ClampToEdge, &mut mesh).unwrap();
        assert_eq!(mesh.vertices.len(), 6);
        assert_eq!(mesh.indices.len(), 12);
        assert_eq!(mesh.normals.len(), 6);
        assert_eq!(mesh.indices.capacity(), capacity);
    }

    #[test]
    fn test_failed_rebuild_keeps_previous_mesh() {
        let mut mesh = Mesh::new();
        let grid = DepthGrid::filled(3, 3, 0.1);
        build_mesh_into(&grid, unit_scale(), BorderPolicy::ClampToEdge, &mut mesh).unwrap();
        let before = mesh.clone();

        let result = build_mesh_into(
            &grid,
            MeshScale::new(-1.0, 1.0, 1.0),
            BorderPolicy::ClampToEdge,
            &mut mesh,
        );
        assert!(result.is_err());
        assert_eq!(mesh, before);
    }

    #[test]
    fn test_input_grid_unchanged() {
        let grid = DepthGrid::from_fn(4, 3, |x, y| (x + y) as f32);
        let copy = grid.clone();
        let _ = build_mesh(&grid, unit_scale(), BorderPolicy::Zero).unwrap();
        assert_eq!(grid, copy);
    }
}
