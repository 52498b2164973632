//! # Block Registry
//!
//! Bidirectional mapping between symbolic block names and dense `u16` ids.
//!
//! ## Invariants
//!
//! - Id `0` is [`AIR`] and never belongs to a block.
//! - Ids are assigned from `1` in catalog order and are contiguous.
//! - `name_of(id_of(n)) == Some(n)` for every registered name.
//! - A registry never changes after [`BlockRegistry::build`]. Rebuilding
//!   produces a new value; share it with `Arc` where several owners need it.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::catalog::{BlockCatalog, CatalogEntry};

/// Dense block identifier stored in voxel grids.
pub type BlockId = u16;

/// The empty voxel.
pub const AIR: BlockId = 0;

/// Name used when an unknown name has to resolve to something solid.
const FALLBACK_NAME: &str = "stone";

/// One registered block.
#[derive(Clone, Debug, PartialEq)]
pub struct BlockDef {
    /// Dense id (never [`AIR`]).
    pub id: BlockId,
    /// Symbolic name.
    pub name: String,
    /// Human-readable name.
    pub display_name: String,
    /// Mining hardness.
    pub hardness: f32,
    /// Preferred tool, if any.
    pub best_tool: Option<String>,
    /// Whether light and sight pass through the block.
    pub transparent: bool,
}

impl BlockDef {
    fn from_entry(id: BlockId, entry: &CatalogEntry) -> Self {
        Self {
            id,
            name: entry.name.clone(),
            display_name: entry.display_name.clone(),
            hardness: entry.hardness,
            best_tool: entry.best_tool.clone(),
            transparent: entry.transparent,
        }
    }
}

/// Name <-> id snapshot built from a [`BlockCatalog`].
#[derive(Clone, Debug)]
pub struct BlockRegistry {
    /// `defs[id - 1]`
    defs: Vec<BlockDef>,
    by_name: HashMap<String, BlockId>,
    fallback: BlockId,
}

impl BlockRegistry {
    /// Builds a registry from a catalog.
    ///
    /// Empty and duplicate names are skipped with a warning, as is anything
    /// past the `u16` id space.
    #[must_use]
    pub fn build(catalog: &BlockCatalog) -> Self {
        let mut defs: Vec<BlockDef> = Vec::with_capacity(catalog.len());
        let mut by_name = HashMap::with_capacity(catalog.len());

        for entry in catalog.entries() {
            if entry.name.is_empty() {
                warn!("unnamed block skipped");
                continue;
            }
            if by_name.contains_key(&entry.name) {
                warn!(block = %entry.name, "duplicate block name skipped");
                continue;
            }
            let Ok(id) = BlockId::try_from(defs.len() + 1) else {
                warn!(block = %entry.name, "block id space exhausted; remaining blocks skipped");
                break;
            };
            by_name.insert(entry.name.clone(), id);
            defs.push(BlockDef::from_entry(id, entry));
        }

        let fallback = by_name.get(FALLBACK_NAME).copied().unwrap_or(1);
        debug!(blocks = defs.len(), fallback, "block registry built");

        Self {
            defs,
            by_name,
            fallback,
        }
    }

    /// Registry over the built-in base blocks.
    #[must_use]
    pub fn builtin() -> Self {
        Self::build(&BlockCatalog::builtin())
    }

    /// Exact lookup, then the name with its first underscore removed
    /// (`"oak_log"` also finds `"oaklog"`).
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<BlockId> {
        if let Some(&id) = self.by_name.get(name) {
            return Some(id);
        }
        if name.contains('_') {
            return self.by_name.get(&name.replacen('_', "", 1)).copied();
        }
        None
    }

    /// Id of `name`, or the fallback id ("stone", else `1`) if unknown.
    #[must_use]
    pub fn id_of(&self, name: &str) -> BlockId {
        self.lookup(name).unwrap_or(self.fallback)
    }

    /// First name in `names` that is registered.
    #[must_use]
    pub fn first_of(&self, names: &[&str]) -> Option<BlockId> {
        names.iter().find_map(|name| self.by_name.get(*name).copied())
    }

    /// Name of `id`. `None` for air and unknown ids.
    #[must_use]
    pub fn name_of(&self, id: BlockId) -> Option<&str> {
        self.def(id).map(|def| def.name.as_str())
    }

    /// Full definition of `id`.
    #[must_use]
    pub fn def(&self, id: BlockId) -> Option<&BlockDef> {
        if id == AIR {
            return None;
        }
        self.defs.get(usize::from(id) - 1)
    }

    /// Id returned for unknown names.
    #[inline]
    #[must_use]
    pub const fn fallback_id(&self) -> BlockId {
        self.fallback
    }

    /// Returns true if `id` is air or a registered block.
    #[must_use]
    pub fn contains_id(&self, id: BlockId) -> bool {
        usize::from(id) <= self.defs.len()
    }

    /// Number of registered blocks (air excluded).
    #[must_use]
    pub fn len(&self) -> usize {
        self.defs.len()
    }

    /// Returns true if no block is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }

    /// All definitions in id order.
    pub fn iter(&self) -> impl Iterator<Item = &BlockDef> {
        self.defs.iter()
    }
}

impl Default for BlockRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
