//! # TERRACUBE
//!
//! The game crate: one player walking, digging and building in a
//! procedurally generated voxel world.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                       GameSession                            │
//! │                                                              │
//! │  ┌──────────────────┐  ┌──────────────────┐  ┌────────────┐  │
//! │  │ terracube_       │  │ terracube_       │  │ Inventory  │  │
//! │  │ procedural       │─>│ rendering        │  │ SaveBlob   │  │
//! │  │                  │  │                  │  │            │  │
//! │  │ • Generator      │  │ • Appearance     │  │ • Hotbar   │  │
//! │  │ • Chunk store    │  │ • Visible voxels │  │ • Clock    │  │
//! │  │ • Edit log       │  │                  │  │            │  │
//! │  └────────┬─────────┘  └──────────────────┘  └────────────┘  │
//! │           │                                                  │
//! │  ┌────────┴─────────┐                                        │
//! │  │ terracube_shared │  registry, catalog, errors             │
//! │  └──────────────────┘                                        │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - `inventory`: 36-slot inventory with a 9-slot hotbar
//! - `save`: player save blob (no chunk data)
//! - `session`: world + render feed + player

#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod inventory;
pub mod save;
pub mod session;

// Re-export the world crates
pub use terracube_procedural as procedural;
pub use terracube_rendering as rendering;
pub use terracube_shared as shared;

// Re-export commonly used types
pub use inventory::{
    Inventory, InventoryError, InventoryResult, ItemStack, HOTBAR_SLOTS, INVENTORY_SLOTS,
    MAX_STACK_SIZE,
};
pub use save::{advance_time, GameMode, PlayerState, SaveBlob, Weather, DAY_LENGTH_TICKS};
pub use session::{load_catalog, GameSession, TICKS_PER_STEP};
