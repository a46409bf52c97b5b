//! Cloud Module: Atomic Point Clouds
//!
//! - `point_cloud.rs`: the immutable per-material point cloud, distances,
//!   coincident-point merging and plain-text export
//! - `loader.rs`: the structure-loader seam and an XYZ reader
//! - `lattice.rs`: synthetic cubic, FCC and perovskite supercells

mod lattice;
mod loader;
mod point_cloud;

pub use lattice::CubicLattice;
pub use loader::{StructureLoader, XyzLoader};
pub use point_cloud::{CoincidenceMerge, PointCloud};
