//! Sense Data Crate
//!
//! Depth grids, indexed meshes, and depth-to-mesh reconstruction.
//! This crate is sensor-agnostic and GPU-agnostic: it only transforms data.

pub mod error;
pub mod mesh;
pub mod mesh_builder;
pub mod types;

pub use error::MeshError;
pub use mesh::{Mesh, MeshVertex};
pub use mesh_builder::{build_mesh, build_mesh_checked, build_mesh_into, mesh_counts};
pub use types::{BorderPolicy, DepthGrid, MeshScale, Triangle};
