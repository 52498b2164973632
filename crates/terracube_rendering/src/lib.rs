//! # TERRACUBE Rendering Feed
//!
//! Turns chunks into render-ready instance lists. No GPU code lives here;
//! the draw-call library consumes [`VoxelInstance`] lists and the
//! [`AppearanceTable`] color buffer.
//!
//! ## Pipeline
//!
//! ```text
//! WorldManager::take_dirty() -> ExtractionCache::instances(chunk) -> renderer
//! ```
//!
//! Interior voxels (six solid neighbors) are never emitted.

#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod appearance;
pub mod extract;

pub use appearance::{Appearance, AppearanceTable, PaletteMaterial, DEFAULT_MATERIAL_KEY};
pub use extract::{
    max_shell_instances, solid_neighbor_count, ExtractionCache, VisibleVoxelExtractor,
    VoxelInstance,
};
