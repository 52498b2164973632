//! # Chunk Data
//!
//! A chunk is a 16x16x64 column of block ids stored as one dense buffer.
//!
//! ## Layout
//!
//! ```text
//! index = y * 256 + z * 16 + x
//! ```
//!
//! A whole horizontal layer is contiguous, which is what the generator writes
//! and what the extractor's neighbor probes walk.
//!
//! ## Versioning
//!
//! Every effective write bumps [`Chunk::version`]. Consumers that cache
//! derived data (instance lists, uploads) compare versions instead of
//! diffing voxels.

use std::fmt;

use terracube_shared::{BlockId, AIR, CHUNK_AREA, CHUNK_HEIGHT, CHUNK_SIZE, CHUNK_VOLUME};

/// Chunk coordinate (in chunks, not blocks).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChunkCoord {
    /// X coordinate.
    pub x: i32,
    /// Z coordinate.
    pub z: i32,
}

impl ChunkCoord {
    /// Creates a new chunk coordinate.
    #[inline]
    #[must_use]
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Chunk containing an integer block position.
    #[inline]
    #[must_use]
    pub const fn from_block_pos(block_x: i32, block_z: i32) -> Self {
        Self {
            x: block_x.div_euclid(CHUNK_SIZE as i32),
            z: block_z.div_euclid(CHUNK_SIZE as i32),
        }
    }

    /// Chunk containing a world position: `floor(x / 16), floor(z / 16)`.
    #[inline]
    #[must_use]
    pub fn from_world_pos(world_x: f64, world_z: f64) -> Self {
        Self {
            x: (world_x / CHUNK_SIZE as f64).floor() as i32,
            z: (world_z / CHUNK_SIZE as f64).floor() as i32,
        }
    }

    /// World X of the chunk origin.
    #[inline]
    #[must_use]
    pub const fn world_x(self) -> i64 {
        self.x as i64 * CHUNK_SIZE as i64
    }

    /// World Z of the chunk origin.
    #[inline]
    #[must_use]
    pub const fn world_z(self) -> i64 {
        self.z as i64 * CHUNK_SIZE as i64
    }

    /// Textual key, `"{x},{z}"`.
    #[must_use]
    pub fn key(self) -> String {
        self.to_string()
    }

    /// Chebyshev distance in chunks.
    #[inline]
    #[must_use]
    pub const fn distance(self, other: Self) -> u32 {
        let dx = self.x.abs_diff(other.x);
        let dz = self.z.abs_diff(other.z);
        if dx > dz {
            dx
        } else {
            dz
        }
    }
}

impl fmt::Display for ChunkCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.x, self.z)
    }
}

/// One chunk of voxel data.
#[derive(Clone)]
pub struct Chunk {
    coord: ChunkCoord,
    voxels: Box<[BlockId; CHUNK_VOLUME]>,
    generated: bool,
    version: u64,
    epoch: u64,
}

impl Chunk {
    /// Creates an all-air, ungenerated chunk.
    #[must_use]
    pub fn empty(coord: ChunkCoord) -> Self {
        Self {
            coord,
            voxels: Box::new([AIR; CHUNK_VOLUME]),
            generated: false,
            version: 0,
            epoch: 0,
        }
    }

    /// Linear index of a local position. Caller guarantees bounds.
    #[inline]
    #[must_use]
    pub const fn index(x: usize, y: usize, z: usize) -> usize {
        y * CHUNK_AREA + z * CHUNK_SIZE + x
    }

    /// Local `(x, y, z)` of a linear index.
    #[inline]
    #[must_use]
    pub const fn position_of(index: usize) -> (usize, usize, usize) {
        (
            index % CHUNK_SIZE,
            index / CHUNK_AREA,
            (index / CHUNK_SIZE) % CHUNK_SIZE,
        )
    }

    #[inline]
    const fn in_bounds(x: usize, y: usize, z: usize) -> bool {
        x < CHUNK_SIZE && y < CHUNK_HEIGHT && z < CHUNK_SIZE
    }

    /// Chunk coordinate.
    #[inline]
    #[must_use]
    pub const fn coord(&self) -> ChunkCoord {
        self.coord
    }

    /// Whether the generator has filled this chunk.
    #[inline]
    #[must_use]
    pub const fn is_generated(&self) -> bool {
        self.generated
    }

    /// Write counter.
    #[inline]
    #[must_use]
    pub const fn version(&self) -> u64 {
        self.version
    }

    /// Residency stamp, assigned by the chunk store on every insertion.
    ///
    /// Zero until the chunk enters a store. A chunk that is evicted and
    /// loaded again comes back with a new epoch, so `(epoch, version)`
    /// identifies one exact voxel state even when versions repeat.
    #[inline]
    #[must_use]
    pub const fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Block at a local position; air when out of bounds.
    #[inline]
    #[must_use]
    pub fn get(&self, x: usize, y: usize, z: usize) -> BlockId {
        if Self::in_bounds(x, y, z) {
            self.voxels[Self::index(x, y, z)]
        } else {
            AIR
        }
    }

    /// Writes a block at a local position.
    ///
    /// Returns false (and writes nothing) when out of bounds. The version
    /// only moves when the stored id actually changes.
    pub fn set(&mut self, x: usize, y: usize, z: usize, id: BlockId) -> bool {
        if !Self::in_bounds(x, y, z) {
            return false;
        }
        let slot = &mut self.voxels[Self::index(x, y, z)];
        if *slot != id {
            *slot = id;
            self.version += 1;
        }
        true
    }

    /// Solidity probe with signed coordinates; anything outside the chunk is
    /// not solid.
    #[inline]
    #[must_use]
    pub fn is_solid(&self, x: i32, y: i32, z: i32) -> bool {
        if x < 0 || y < 0 || z < 0 {
            return false;
        }
        self.get(x as usize, y as usize, z as usize) != AIR
    }

    /// Highest non-air Y in a column.
    #[must_use]
    pub fn column_top(&self, x: usize, z: usize) -> Option<usize> {
        (0..CHUNK_HEIGHT).rev().find(|&y| self.get(x, y, z) != AIR)
    }

    /// Number of non-air voxels.
    #[must_use]
    pub fn solid_count(&self) -> usize {
        self.voxels.iter().filter(|&&id| id != AIR).count()
    }

    /// The dense voxel buffer.
    #[inline]
    #[must_use]
    pub fn voxels(&self) -> &[BlockId] {
        &self.voxels[..]
    }

    /// The voxel buffer as raw bytes, for hashing or upload.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.voxels[..])
    }

    /// Direct buffer access for the generator. Does not bump the version.
    pub(crate) fn voxels_mut(&mut self) -> &mut [BlockId; CHUNK_VOLUME] {
        &mut self.voxels
    }

    pub(crate) fn mark_generated(&mut self) {
        self.generated = true;
    }

    pub(crate) fn set_epoch(&mut self, epoch: u64) {
        self.epoch = epoch;
    }
}

impl fmt::Debug for Chunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Chunk")
            .field("coord", &self.coord)
            .field("generated", &self.generated)
            .field("version", &self.version)
            .field("epoch", &self.epoch)
            .field("solid", &self.solid_count())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_coord_from_block() {
        assert_eq!(ChunkCoord::from_block_pos(0, 0), ChunkCoord::new(0, 0));
        assert_eq!(ChunkCoord::from_block_pos(15, 15), ChunkCoord::new(0, 0));
        assert_eq!(ChunkCoord::from_block_pos(16, 16), ChunkCoord::new(1, 1));
        assert_eq!(ChunkCoord::from_block_pos(-1, -16), ChunkCoord::new(-1, -1));
        assert_eq!(ChunkCoord::from_block_pos(-17, 0), ChunkCoord::new(-2, 0));
    }

    #[test]
    fn test_chunk_coord_from_world() {
        assert_eq!(ChunkCoord::from_world_pos(0.0, 0.0), ChunkCoord::new(0, 0));
        assert_eq!(ChunkCoord::from_world_pos(-0.5, 15.9), ChunkCoord::new(-1, 0));
        assert_eq!(ChunkCoord::from_world_pos(-16.0, 32.0), ChunkCoord::new(-1, 2));
    }

    #[test]
    fn test_world_origin_is_wide() {
        assert_eq!(ChunkCoord::new(-3, 2).world_x(), -48);
        assert_eq!(ChunkCoord::new(200_000_000, 0).world_x(), 3_200_000_000);
        assert_eq!(ChunkCoord::new(0, i32::MIN).world_z(), -34_359_738_368);
    }

    #[test]
    fn test_key_and_distance() {
        assert_eq!(ChunkCoord::new(-1, 3).key(), "-1,3");
        let origin = ChunkCoord::new(0, 0);
        assert_eq!(origin.distance(ChunkCoord::new(-1, 1)), 1);
        assert_eq!(origin.distance(ChunkCoord::new(2, -5)), 5);
    }

    #[test]
    fn test_index_bijection() {
        let mut seen = vec![false; CHUNK_VOLUME];
        for y in 0..CHUNK_HEIGHT {
            for z in 0..CHUNK_SIZE {
                for x in 0..CHUNK_SIZE {
                    let i = Chunk::index(x, y, z);
                    assert!(!seen[i]);
                    seen[i] = true;
                    assert_eq!(Chunk::position_of(i), (x, y, z));
                }
            }
        }
        assert!(seen.iter().all(|s| *s));
    }

    #[test]
    fn test_set_bumps_version_on_change_only() {
        let mut chunk = Chunk::empty(ChunkCoord::new(0, 0));
        assert!(chunk.set(1, 2, 3, 5));
        assert_eq!(chunk.version(), 1);
        assert!(chunk.set(1, 2, 3, 5));
        assert_eq!(chunk.version(), 1);
        assert!(!chunk.set(16, 0, 0, 5));
        assert!(!chunk.set(0, 64, 0, 5));
        assert_eq!(chunk.get(1, 2, 3), 5);
        assert_eq!(chunk.voxels()[3 * 16 + 2 * 256 + 1], 5);
        assert_eq!(chunk.version(), 1);
    }

    #[test]
    fn test_solidity_outside_is_false() {
        let mut chunk = Chunk::empty(ChunkCoord::new(0, 0));
        chunk.set(0, 0, 0, 1);
        assert!(chunk.is_solid(0, 0, 0));
        assert!(!chunk.is_solid(-1, 0, 0));
        assert!(!chunk.is_solid(0, -1, 0));
        assert!(!chunk.is_solid(0, 64, 0));
        assert!(!chunk.is_solid(1, 0, 0));
        assert_eq!(chunk.column_top(0, 0), Some(0));
        assert_eq!(chunk.column_top(1, 0), None);
        assert_eq!(chunk.as_bytes().len(), CHUNK_VOLUME * 2);
    }
}
