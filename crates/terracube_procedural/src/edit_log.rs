//! # Edit Log
//!
//! Player edits kept per chunk, independent of whether the chunk is resident.
//!
//! Generated terrain is never stored: a chunk that falls out of the store is
//! regenerated from the seed and its edits are replayed on top. Only the
//! final value of each voxel is kept, so the log grows with the number of
//! distinct voxels touched, not with the number of edits.

use std::collections::HashMap;

use terracube_shared::BlockId;

use crate::chunk::{Chunk, ChunkCoord};

/// One voxel overwrite inside a chunk.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlockEdit {
    /// Local X (0-15).
    pub local_x: u8,
    /// Y level (0-63).
    pub y: u8,
    /// Local Z (0-15).
    pub local_z: u8,
    /// Id written (0 for a broken block).
    pub block_id: BlockId,
}

impl BlockEdit {
    #[inline]
    fn same_voxel(&self, other: &Self) -> bool {
        self.local_x == other.local_x && self.y == other.y && self.local_z == other.local_z
    }
}

/// Sparse per-chunk edit history.
#[derive(Clone, Debug, Default)]
pub struct EditLog {
    edits: HashMap<ChunkCoord, Vec<BlockEdit>>,
}

impl EditLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an edit; a later edit of the same voxel replaces the earlier.
    pub fn record(&mut self, coord: ChunkCoord, edit: BlockEdit) {
        let edits = self.edits.entry(coord).or_default();
        if let Some(existing) = edits.iter_mut().find(|e| e.same_voxel(&edit)) {
            existing.block_id = edit.block_id;
        } else {
            edits.push(edit);
        }
    }

    /// Replays the edits of `chunk`'s coordinate. Returns how many applied.
    pub fn apply(&self, chunk: &mut Chunk) -> usize {
        let Some(edits) = self.edits.get(&chunk.coord()) else {
            return 0;
        };
        let mut applied = 0;
        for e in edits {
            let (x, y, z) = (usize::from(e.local_x), usize::from(e.y), usize::from(e.local_z));
            if chunk.set(x, y, z, e.block_id) {
                applied += 1;
            }
        }
        applied
    }

    /// Edits recorded for one chunk.
    #[must_use]
    pub fn edits_for(&self, coord: ChunkCoord) -> &[BlockEdit] {
        self.edits.get(&coord).map_or(&[], Vec::as_slice)
    }

    /// Number of chunks with at least one edit.
    #[must_use]
    pub fn chunk_count(&self) -> usize {
        self.edits.len()
    }

    /// Total voxels edited.
    #[must_use]
    pub fn edit_count(&self) -> usize {
        self.edits.values().map(Vec::len).sum()
    }
}
