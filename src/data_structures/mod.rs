//! Engine data structures: geometry, materials, scene graph and GPU models.
//!
//! - `geometry` holds CPU triangle lists and the primitive shape generators
//! - `material` holds shared surface descriptors
//! - `instance` holds per-node transformation data and its GPU layout
//! - `scene_graph` groups mesh nodes and derives draw batches
//! - `model` contains the GPU buffers built from a scene group
//! - `texture` contains the depth texture

pub mod geometry;
pub mod instance;
pub mod material;
pub mod model;
pub mod scene_graph;
pub mod texture;
