//! # Block Mutation
//!
//! Break and place operations against resident chunks.
//!
//! ## Occupancy Rules
//!
//! - Breaking an empty voxel does nothing and returns `None`.
//! - Placing into an occupied voxel does nothing and returns `false`.
//! - Either operation on a chunk that is not resident does nothing.
//! - Y is clamped to `[0, 63]`; X and Z are never clamped.
//!
//! Every successful operation is recorded in the edit log and queues the
//! chunk on the dirty list.

use terracube_shared::{BlockId, AIR, CHUNK_SIZE, MAX_Y};
use tracing::debug;

use crate::chunk::ChunkCoord;
use crate::edit_log::BlockEdit;
use crate::world_manager::WorldManager;

/// Name reported for a broken block whose id has no registry entry.
const UNKNOWN_DROP: &str = "stone";

/// Splits a world coordinate into `(chunk, local)`.
///
/// `chunk = floor(floor(c) / 16)` and `local = floor(c) mod 16`, so the local
/// part is always in `[0, 16)`, including for negative coordinates.
#[inline]
#[must_use]
pub fn world_to_local(coordinate: f64) -> (i32, usize) {
    let block = coordinate.floor() as i64;
    let size = CHUNK_SIZE as i64;
    (block.div_euclid(size) as i32, block.rem_euclid(size) as usize)
}

/// Clamped voxel Y for a world coordinate.
#[inline]
#[must_use]
pub fn clamp_y(world_y: f64) -> usize {
    world_y.floor().clamp(0.0, MAX_Y as f64) as usize
}

/// Resolved target of a mutation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Target {
    coord: ChunkCoord,
    x: usize,
    y: usize,
    z: usize,
}

impl Target {
    fn resolve(world_x: f64, world_y: f64, world_z: f64) -> Self {
        let (cx, x) = world_to_local(world_x);
        let (cz, z) = world_to_local(world_z);
        Self {
            coord: ChunkCoord::new(cx, cz),
            x,
            y: clamp_y(world_y),
            z,
        }
    }

    fn edit(self, block_id: BlockId) -> BlockEdit {
        BlockEdit {
            local_x: self.x as u8,
            y: self.y as u8,
            local_z: self.z as u8,
            block_id,
        }
    }
}

impl WorldManager {
    /// Breaks the block at a world position.
    ///
    /// Returns the name of the block that was there.
    pub fn break_block(&mut self, world_x: f64, world_y: f64, world_z: f64) -> Option<String> {
        let target = Target::resolve(world_x, world_y, world_z);
        let chunk = self.store.get_mut(target.coord)?;

        let previous = chunk.get(target.x, target.y, target.z);
        if previous == AIR {
            return None;
        }
        chunk.set(target.x, target.y, target.z, AIR);

        self.commit(target, AIR);
        let name = self
            .registry()
            .name_of(previous)
            .unwrap_or(UNKNOWN_DROP)
            .to_string();
        debug!(chunk = %target.coord, block = %name, "block broken");
        Some(name)
    }

    /// Places a block at a world position.
    ///
    /// Unknown names resolve through the registry fallback. Returns false if
    /// the chunk is not resident or the voxel is occupied.
    pub fn place_block(&mut self, world_x: f64, world_y: f64, world_z: f64, name: &str) -> bool {
        let target = Target::resolve(world_x, world_y, world_z);
        let id = self.registry().id_of(name);
        let Some(chunk) = self.store.get_mut(target.coord) else {
            return false;
        };

        if chunk.get(target.x, target.y, target.z) != AIR {
            return false;
        }
        chunk.set(target.x, target.y, target.z, id);

        self.commit(target, id);
        debug!(chunk = %target.coord, block = name, "block placed");
        true
    }

    fn commit(&mut self, target: Target, id: BlockId) {
        self.edits.record(target.coord, target.edit(id));
        self.store.mark_dirty(target.coord);
        self.stats.edits += 1;
    }
}
