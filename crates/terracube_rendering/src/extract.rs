//! # Visible-Voxel Extraction
//!
//! Reduces a chunk to the voxels a renderer actually needs: every non-air
//! voxel with at least one non-solid face neighbor.
//!
//! ## Rules
//!
//! - Neighbors outside the chunk (including below y=0 and above y=63) count
//!   as non-solid, so chunk borders are always emitted.
//! - Any non-air id is solid for culling, transparent blocks included.
//! - Output order is the voxel buffer order (`y`, then `z`, then `x`).
//!
//! Extraction is a pure read of the chunk.

use std::collections::HashMap;

use terracube_procedural::{Chunk, ChunkCoord};
use terracube_shared::{BlockId, BlockRegistry, AIR, CHUNK_SIZE};
use tracing::debug;

use crate::appearance::AppearanceTable;

/// Face neighbor offsets.
const NEIGHBORS: [(i32, i32, i32); 6] = [
    (1, 0, 0),
    (-1, 0, 0),
    (0, 1, 0),
    (0, -1, 0),
    (0, 0, 1),
    (0, 0, -1),
];

/// One voxel to draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoxelInstance {
    /// Position inside the chunk `[x, y, z]`.
    pub local_position: [u8; 3],
    /// Block id.
    pub block_id: BlockId,
    /// Material key from the appearance table.
    pub material_key: &'static str,
}

impl VoxelInstance {
    /// Center of the voxel in world space.
    #[must_use]
    pub fn world_center(&self, coord: ChunkCoord) -> [f64; 3] {
        let [x, y, z] = self.local_position;
        [
            coord.world_x() as f64 + f64::from(x) + 0.5,
            f64::from(y) + 0.5,
            coord.world_z() as f64 + f64::from(z) + 0.5,
        ]
    }
}

/// Number of solid face neighbors of a local position (0-6).
#[must_use]
pub fn solid_neighbor_count(chunk: &Chunk, x: usize, y: usize, z: usize) -> u8 {
    let (x, y, z) = (x as i32, y as i32, z as i32);
    NEIGHBORS
        .iter()
        .filter(|(dx, dy, dz)| chunk.is_solid(x + dx, y + dy, z + dz))
        .count() as u8
}

/// Extracts visible voxels using one appearance table.
#[derive(Debug, Clone)]
pub struct VisibleVoxelExtractor {
    appearance: AppearanceTable,
}

impl VisibleVoxelExtractor {
    /// Creates an extractor for chunks built against `registry`.
    #[must_use]
    pub fn new(registry: &BlockRegistry) -> Self {
        Self {
            appearance: AppearanceTable::build(registry),
        }
    }

    /// The appearance table.
    #[must_use]
    pub fn appearance(&self) -> &AppearanceTable {
        &self.appearance
    }

    /// Every non-air voxel with fewer than six solid neighbors.
    #[must_use]
    pub fn extract(&self, chunk: &Chunk) -> Vec<VoxelInstance> {
        let mut instances = Vec::new();

        for (index, &block_id) in chunk.voxels().iter().enumerate() {
            if block_id == AIR {
                continue;
            }
            let (x, y, z) = Chunk::position_of(index);
            if solid_neighbor_count(chunk, x, y, z) == 6 {
                continue;
            }
            instances.push(VoxelInstance {
                local_position: [x as u8, y as u8, z as u8],
                block_id,
                material_key: self.appearance.material_key(block_id),
            });
        }

        instances
    }
}

/// Cached instance list and the chunk state it was extracted from.
#[derive(Debug)]
struct CacheEntry {
    epoch: u64,
    version: u64,
    instances: Vec<VoxelInstance>,
}

/// Instance lists keyed by chunk.
///
/// A list is re-extracted when the chunk's version moves or when the chunk
/// was reloaded into the store (new epoch), since a regenerated chunk can
/// reach an old version number with different voxels.
#[derive(Debug, Default)]
pub struct ExtractionCache {
    entries: HashMap<ChunkCoord, CacheEntry>,
}

impl ExtractionCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Instances for `chunk`, extracting only if the cached list is stale.
    pub fn instances(&mut self, extractor: &VisibleVoxelExtractor, chunk: &Chunk) -> &[VoxelInstance] {
        let coord = chunk.coord();
        let (epoch, version) = (chunk.epoch(), chunk.version());
        let entry = self.entries.entry(coord).or_insert_with(|| CacheEntry {
            epoch,
            version: u64::MAX,
            instances: Vec::new(),
        });
        if entry.epoch != epoch || entry.version != version {
            entry.instances = extractor.extract(chunk);
            entry.epoch = epoch;
            entry.version = version;
            debug!(chunk = %coord, epoch, version, instances = entry.instances.len(), "chunk extracted");
        }
        &entry.instances
    }

    /// Drops the cached list of a chunk that left the store.
    pub fn forget(&mut self, coord: ChunkCoord) {
        self.entries.remove(&coord);
    }

    /// Keeps only the chunks for which `keep` returns true.
    pub fn retain(&mut self, mut keep: impl FnMut(ChunkCoord) -> bool) {
        self.entries.retain(|coord, _| keep(*coord));
    }

    /// Number of cached chunks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Total instances a chunk of solid voxels can produce at most: its shell.
#[must_use]
pub const fn max_shell_instances(height: usize) -> usize {
    if height <= 2 {
        return CHUNK_SIZE * CHUNK_SIZE * height;
    }
    let interior = (CHUNK_SIZE - 2) * (CHUNK_SIZE - 2) * (height - 2);
    CHUNK_SIZE * CHUNK_SIZE * height - interior
}
