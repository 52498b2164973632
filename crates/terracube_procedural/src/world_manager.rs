//! # World Window Manager
//!
//! Keeps the chunks around the player resident.
//!
//! ## Residency
//!
//! Chunks are generated on demand the first time the player's window covers
//! them. By default the [`ChunkStore`] is unbounded: residency only grows and
//! no chunk is ever evicted.
//!
//! A store built with a capacity becomes an LRU cache instead and evicts the
//! least recently used chunk when full. An evicted chunk costs nothing to
//! bring back: it is regenerated from the seed and the [`EditLog`] is replayed
//! on top, so player edits survive eviction. Every insertion stamps the chunk
//! with a fresh epoch, so a reloaded chunk is never mistaken for the one that
//! was evicted.
//!
//! ## Window
//!
//! ```text
//! center = (floor(x / 16), floor(z / 16))
//! window = every chunk within Chebyshev distance `render_distance`
//! ```
//!
//! A window larger than a bounded store grows the store; the window itself
//! is never evicted while it is being filled.

use std::num::NonZeroUsize;
use std::sync::Arc;

use lru::LruCache;
use terracube_shared::{BlockId, BlockRegistry, CHUNK_HEIGHT};
use tracing::{debug, warn};

use crate::chunk::{Chunk, ChunkCoord};
use crate::config::WorldConfig;
use crate::edit_log::EditLog;
use crate::generator::ChunkGenerator;
use crate::mutation::world_to_local;

/// Owns every resident chunk.
pub struct ChunkStore {
    chunks: LruCache<ChunkCoord, Chunk>,
    /// Chunks whose voxels changed since the last [`ChunkStore::take_dirty`].
    dirty: Vec<ChunkCoord>,
    bounded: bool,
    next_epoch: u64,
}

impl ChunkStore {
    /// Creates a store.
    ///
    /// `None` never evicts. `Some(capacity)` holds at most `capacity` chunks
    /// (minimum 1) and evicts the least recently used one when full.
    #[must_use]
    pub fn new(capacity: Option<usize>) -> Self {
        let chunks = match capacity {
            Some(capacity) => {
                LruCache::new(NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN))
            }
            None => LruCache::unbounded(),
        };
        Self {
            chunks,
            dirty: Vec::with_capacity(64),
            bounded: capacity.is_some(),
            next_epoch: 1,
        }
    }

    /// Textual key of a chunk, `"{x},{z}"`.
    #[must_use]
    pub fn key(x: i32, z: i32) -> String {
        ChunkCoord::new(x, z).key()
    }

    /// Looks up a chunk without touching its recency.
    #[must_use]
    pub fn get(&self, coord: ChunkCoord) -> Option<&Chunk> {
        self.chunks.peek(&coord)
    }

    /// Mutable lookup; marks the chunk most recently used.
    pub fn get_mut(&mut self, coord: ChunkCoord) -> Option<&mut Chunk> {
        self.chunks.get_mut(&coord)
    }

    /// Marks a chunk most recently used. Returns false if absent.
    pub fn touch(&mut self, coord: ChunkCoord) -> bool {
        self.chunks.promote(&coord);
        self.chunks.contains(&coord)
    }

    /// Stores a chunk, stamps its epoch and marks it dirty.
    ///
    /// Returns the chunk pushed out to make room, or the previous chunk at the
    /// same coordinate.
    pub fn put(&mut self, mut chunk: Chunk) -> Option<Chunk> {
        let coord = chunk.coord();
        chunk.set_epoch(self.next_epoch);
        self.next_epoch += 1;
        let displaced = self.chunks.push(coord, chunk).map(|(_, old)| old);
        if let Some(old) = &displaced {
            if old.coord() != coord {
                self.dirty.retain(|c| *c != old.coord());
            }
        }
        self.mark_dirty(coord);
        displaced
    }

    /// Returns true if the chunk is resident.
    #[must_use]
    pub fn contains(&self, coord: ChunkCoord) -> bool {
        self.chunks.contains(&coord)
    }

    /// Number of resident chunks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    /// Returns true if no chunk is resident.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Maximum number of resident chunks; `None` when unbounded.
    #[must_use]
    pub fn capacity(&self) -> Option<usize> {
        self.bounded.then(|| self.chunks.cap().get())
    }

    /// Bounds the store to `capacity`, evicting least recently used chunks if
    /// needed.
    pub fn resize(&mut self, capacity: usize) {
        self.bounded = true;
        self.chunks
            .resize(NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN));
        let chunks = &self.chunks;
        self.dirty.retain(|c| chunks.contains(c));
    }

    /// Resident coordinates, most recently used first.
    pub fn coords(&self) -> impl Iterator<Item = ChunkCoord> + '_ {
        self.chunks.iter().map(|(coord, _)| *coord)
    }

    /// Resident keys, sorted.
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        let mut coords: Vec<ChunkCoord> = self.coords().collect();
        coords.sort_unstable();
        coords.into_iter().map(ChunkCoord::key).collect()
    }

    /// Queues a chunk for the rendering collaborator.
    pub fn mark_dirty(&mut self, coord: ChunkCoord) {
        if !self.dirty.contains(&coord) {
            self.dirty.push(coord);
        }
    }

    /// Returns and clears the dirty list.
    pub fn take_dirty(&mut self) -> Vec<ChunkCoord> {
        std::mem::take(&mut self.dirty)
    }
}

/// Counters for the lifetime of a [`WorldManager`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WorldStats {
    /// Chunks produced by the generator.
    pub chunks_generated: u64,
    /// Generated chunks that had edits replayed onto them.
    pub chunks_restored: u64,
    /// Chunks pushed out of the store.
    pub chunks_evicted: u64,
    /// Successful break/place operations.
    pub edits: u64,
}

/// Generator, store and edit log for one world.
pub struct WorldManager {
    pub(crate) generator: ChunkGenerator,
    pub(crate) store: ChunkStore,
    pub(crate) edits: EditLog,
    pub(crate) stats: WorldStats,
}

impl WorldManager {
    /// Creates a manager. See [`ChunkStore::new`] for `capacity`.
    #[must_use]
    pub fn new(generator: ChunkGenerator, capacity: Option<usize>) -> Self {
        Self {
            generator,
            store: ChunkStore::new(capacity),
            edits: EditLog::new(),
            stats: WorldStats::default(),
        }
    }

    /// Manager for a loaded world configuration.
    #[must_use]
    pub fn from_config(config: &WorldConfig, registry: Arc<BlockRegistry>) -> Self {
        Self::new(
            ChunkGenerator::from_config(config, registry),
            config.max_resident_chunks,
        )
    }

    /// Makes every chunk within `render_distance` of the player resident.
    ///
    /// Returns how many chunks were generated. Calling it again with the same
    /// position generates nothing.
    pub fn ensure_resident(&mut self, player_x: f64, player_z: f64, render_distance: u32) -> usize {
        let center = ChunkCoord::from_world_pos(player_x, player_z);
        let window = chunks_in_window(center, render_distance);

        if let Some(capacity) = self.store.capacity() {
            if window.len() > capacity {
                warn!(
                    window = window.len(),
                    capacity,
                    "render window exceeds chunk store capacity; growing store"
                );
                self.store.resize(window.len());
            }
        }

        // Promote first so filling the window can only evict chunks outside it.
        let missing: Vec<ChunkCoord> = window
            .into_iter()
            .filter(|&coord| !self.store.touch(coord))
            .collect();

        for &coord in &missing {
            let chunk = self.load(coord);
            if let Some(evicted) = self.store.put(chunk) {
                self.stats.chunks_evicted += 1;
                debug!(chunk = %evicted.coord(), "chunk evicted");
            }
        }

        missing.len()
    }

    /// Generates a chunk and replays its edits.
    fn load(&mut self, coord: ChunkCoord) -> Chunk {
        let mut chunk = self.generator.generate(coord);
        self.stats.chunks_generated += 1;
        if self.edits.apply(&mut chunk) > 0 {
            self.stats.chunks_restored += 1;
        }
        chunk
    }

    /// Resident chunk at `coord`.
    #[must_use]
    pub fn chunk(&self, coord: ChunkCoord) -> Option<&Chunk> {
        self.store.get(coord)
    }

    /// Block at a world position, if its chunk is resident and `y` is in range.
    #[must_use]
    pub fn block_at(&self, world_x: f64, world_y: f64, world_z: f64) -> Option<BlockId> {
        let y = world_y.floor();
        if !(0.0..CHUNK_HEIGHT as f64).contains(&y) {
            return None;
        }
        let (cx, lx) = world_to_local(world_x);
        let (cz, lz) = world_to_local(world_z);
        self.store
            .get(ChunkCoord::new(cx, cz))
            .map(|chunk| chunk.get(lx, y as usize, lz))
    }

    /// Chunk store.
    #[must_use]
    pub fn store(&self) -> &ChunkStore {
        &self.store
    }

    /// Returns and clears the chunks changed since the last call.
    pub fn take_dirty(&mut self) -> Vec<ChunkCoord> {
        self.store.take_dirty()
    }

    /// The generator.
    #[must_use]
    pub fn generator(&self) -> &ChunkGenerator {
        &self.generator
    }

    /// Block registry shared with the generator.
    #[must_use]
    pub fn registry(&self) -> &Arc<BlockRegistry> {
        self.generator.registry()
    }

    /// Player edits.
    #[must_use]
    pub fn edits(&self) -> &EditLog {
        &self.edits
    }

    /// Lifetime counters.
    #[must_use]
    pub fn stats(&self) -> WorldStats {
        self.stats
    }
}

/// Every chunk within Chebyshev `distance` of `center`, row by row.
///
/// Coordinates wrap at the `i32` edge of the world.
#[must_use]
pub fn chunks_in_window(center: ChunkCoord, distance: u32) -> Vec<ChunkCoord> {
    let r = distance as i32;
    let side = 2 * distance as usize + 1;
    let mut coords = Vec::with_capacity(side * side);
    for dz in -r..=r {
        for dx in -r..=r {
            coords.push(ChunkCoord::new(
                center.x.wrapping_add(dx),
                center.z.wrapping_add(dz),
            ));
        }
    }
    coords
}
