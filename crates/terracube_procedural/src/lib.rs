//! # TERRACUBE Procedural
//!
//! Deterministic generation and storage of the editable voxel world.
//!
//! ## Design Principles
//!
//! 1. **Deterministic**: the same seed always produces the same chunks,
//!    whatever order they are generated in
//! 2. **Chunked**: the world is a grid of 16x16x64 chunks
//! 3. **Monotonic**: resident chunks stay resident unless a store capacity
//!    is configured; edits outlive eviction
//! 4. **Total**: generation, mutation and window updates never fail
//!
//! ## Core Components
//!
//! - `NoiseField`: seeded 2D noise in `[0, 1]`
//! - `BiomeSelector`: biome descriptor per world column
//! - `ChunkGenerator`: terrain, water, ores and trees
//! - `ChunkStore`: owner of every resident chunk, optionally LRU-bounded
//! - `WorldManager`: render window, break/place, edit replay
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use terracube_procedural::{ChunkGenerator, WorldManager, WorldSeed};
//! use terracube_shared::BlockRegistry;
//!
//! let registry = Arc::new(BlockRegistry::builtin());
//! let generator = ChunkGenerator::with_defaults(WorldSeed::new(123_456), registry);
//! let mut world = WorldManager::new(generator, None);
//!
//! assert_eq!(world.ensure_resident(0.0, 0.0, 1), 9);
//! assert!(world.place_block(0.0, 63.0, 0.0, "stone"));
//! assert_eq!(world.break_block(0.0, 63.0, 0.0).as_deref(), Some("stone"));
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod biome;
pub mod chunk;
pub mod config;
pub mod edit_log;
pub mod generator;
pub mod mutation;
pub mod noise;
pub mod world_manager;

pub use biome::{Biome, BiomeSelector};
pub use chunk::{Chunk, ChunkCoord};
pub use config::{GeneratorConfig, WorldConfig};
pub use edit_log::{BlockEdit, EditLog};
pub use generator::ChunkGenerator;
pub use mutation::{clamp_y, world_to_local};
pub use noise::{NoiseField, WorldSeed};
pub use world_manager::{chunks_in_window, ChunkStore, WorldManager, WorldStats};
