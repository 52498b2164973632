//! # TERRACUBE Shared
//!
//! Common types used by generation, mutation and rendering.
//!
//! ## Contents
//!
//! - `constants`: chunk dimensions and world limits
//! - `math`: the float position triple owned by player state
//! - `catalog`: block catalog documents (the external collaborator)
//! - `registry`: the bijective block name <-> id mapping built from a catalog
//! - `error`: errors returned by loaders
//!
//! ## CRITICAL RULE
//!
//! Id `0` is air. It is never assigned to a catalog block.

#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod catalog;
pub mod constants;
pub mod error;
pub mod math;
pub mod registry;

pub use catalog::{BlockCatalog, CatalogEntry};
pub use constants::{CHUNK_AREA, CHUNK_HEIGHT, CHUNK_SIZE, CHUNK_VOLUME, MAX_Y, SEA_LEVEL};
pub use error::{WorldError, WorldResult};
pub use math::Vec3;
pub use registry::{BlockDef, BlockId, BlockRegistry, AIR};
