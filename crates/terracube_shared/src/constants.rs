//! # World Dimensions
//!
//! Every chunk is a 16x16x64 column. These values are baked into the voxel
//! grid layout (`y * 256 + z * 16 + x`) and into every saved player position.

/// Chunk width and depth in voxels.
pub const CHUNK_SIZE: usize = 16;

/// Chunk height in voxels.
pub const CHUNK_HEIGHT: usize = 64;

/// Voxels in one horizontal layer of a chunk.
pub const CHUNK_AREA: usize = CHUNK_SIZE * CHUNK_SIZE;

/// Total voxels per chunk.
pub const CHUNK_VOLUME: usize = CHUNK_AREA * CHUNK_HEIGHT;

/// Highest valid Y coordinate.
pub const MAX_Y: usize = CHUNK_HEIGHT - 1;

/// Water fills empty space strictly below this Y level.
pub const SEA_LEVEL: usize = 32;
