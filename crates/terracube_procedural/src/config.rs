//! # World Configuration
//!
//! Loaded once at startup from TOML. Every field has a default, so an empty
//! document is a valid world:
//!
//! ```toml
//! seed_phrase = "terracube"
//! render_distance = 2
//! # omit to keep every chunk resident
//! max_resident_chunks = 64
//! catalog_path = "data/blocks/block_catalog.json"
//!
//! [generator]
//! coal_chance = 0.05
//! tree_chance = 0.10
//!
//! [[biomes]]
//! id = "tundra"
//! top_block = "snow"
//! fill_block = "dirt"
//! ```
//!
//! Listing `[[biomes]]` replaces the built-in four.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use terracube_shared::{WorldError, WorldResult, CHUNK_HEIGHT, SEA_LEVEL};
use tracing::info;

use crate::biome::{Biome, DEFAULT_BIOME_SCALE};
use crate::noise::{WorldSeed, BASE_FREQUENCY, DEFAULT_OCTAVES};

/// Terrain generation parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Empty space below this level fills with water.
    pub sea_level: usize,
    /// Octaves of terrain noise.
    pub terrain_octaves: u32,
    /// Frequency of the first terrain octave.
    pub terrain_frequency: f64,
    /// Multiplier applied to the `[0, 1]` terrain sample.
    pub height_scale: f64,
    /// Offset added after scaling.
    pub height_base: f64,
    /// Frequency of the biome noise channel.
    pub biome_scale: f64,
    /// Per-column probability of a coal voxel.
    pub coal_chance: f64,
    /// Columns at or below this height get no coal.
    pub coal_min_height: usize,
    /// Per-column probability of an iron voxel.
    pub iron_chance: f64,
    /// Columns at or below this height get no iron.
    pub iron_min_height: usize,
    /// Per-column probability of a tree in biomes that grow them.
    pub tree_chance: f64,
    /// Shortest trunk.
    pub min_tree_height: usize,
    /// Tallest trunk.
    pub max_tree_height: usize,
    /// Manhattan radius of the leaf canopy.
    pub canopy_radius: i32,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            sea_level: SEA_LEVEL,
            terrain_octaves: DEFAULT_OCTAVES,
            terrain_frequency: BASE_FREQUENCY,
            height_scale: 32.0,
            height_base: 16.0,
            biome_scale: DEFAULT_BIOME_SCALE,
            coal_chance: 0.05,
            coal_min_height: 10,
            iron_chance: 0.02,
            iron_min_height: 15,
            tree_chance: 0.1,
            min_tree_height: 4,
            max_tree_height: 6,
            canopy_radius: 2,
        }
    }
}

/// Top-level world configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WorldConfig {
    /// Numeric seed. Wins over `seed_phrase`.
    pub seed: Option<u64>,
    /// Text seed, hashed with [`WorldSeed::from_phrase`].
    pub seed_phrase: Option<String>,
    /// Chebyshev radius, in chunks, kept resident around the player.
    pub render_distance: u32,
    /// Chunk store capacity. `None` keeps every chunk resident; a number
    /// turns the store into an LRU cache that evicts and later regenerates.
    pub max_resident_chunks: Option<usize>,
    /// Block catalog document merged over the built-in blocks.
    pub catalog_path: Option<PathBuf>,
    /// Terrain parameters.
    pub generator: GeneratorConfig,
    /// Biome list. Empty means the built-in four.
    pub biomes: Vec<Biome>,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            seed: None,
            seed_phrase: None,
            render_distance: 1,
            max_resident_chunks: None,
            catalog_path: None,
            generator: GeneratorConfig::default(),
            biomes: Vec::new(),
        }
    }
}

impl WorldConfig {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::InvalidConfig`] on syntax errors, unknown keys or
    /// out-of-range values.
    pub fn from_toml_str(text: &str) -> WorldResult<Self> {
        let config: Self =
            toml::from_str(text).map_err(|e| WorldError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file can't be read, otherwise as
    /// [`WorldConfig::from_toml_str`].
    pub fn load(path: &Path) -> WorldResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| WorldError::io(path, &e))?;
        let config = Self::from_toml_str(&text)?;
        info!(
            path = %path.display(),
            seed = config.world_seed().value(),
            render_distance = config.render_distance,
            "world config loaded"
        );
        Ok(config)
    }

    /// Resolves the world seed: `seed`, else `seed_phrase`, else the default.
    #[must_use]
    pub fn world_seed(&self) -> WorldSeed {
        match (self.seed, self.seed_phrase.as_deref()) {
            (Some(seed), _) => WorldSeed::new(seed),
            (None, Some(phrase)) => WorldSeed::from_phrase(phrase),
            (None, None) => WorldSeed::default(),
        }
    }

    /// Biomes to select from.
    #[must_use]
    pub fn biome_list(&self) -> Vec<Biome> {
        if self.biomes.is_empty() {
            Biome::builtin()
        } else {
            self.biomes.clone()
        }
    }

    /// Checks value ranges.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::InvalidConfig`] naming the first bad field.
    pub fn validate(&self) -> WorldResult<()> {
        let g = &self.generator;
        let invalid = |msg: &str| Err(WorldError::InvalidConfig(msg.to_string()));

        if self.max_resident_chunks == Some(0) {
            return invalid("max_resident_chunks must be at least 1");
        }
        if g.sea_level > CHUNK_HEIGHT {
            return invalid("generator.sea_level must not exceed the chunk height");
        }
        if g.terrain_octaves == 0 {
            return invalid("generator.terrain_octaves must be at least 1");
        }
        if !(g.terrain_frequency > 0.0 && g.biome_scale > 0.0) {
            return invalid("generator frequencies must be positive");
        }
        for (field, chance) in [
            ("coal_chance", g.coal_chance),
            ("iron_chance", g.iron_chance),
            ("tree_chance", g.tree_chance),
        ] {
            if !(0.0..=1.0).contains(&chance) {
                return Err(WorldError::InvalidConfig(format!(
                    "generator.{field} must be within [0, 1]"
                )));
            }
        }
        if g.min_tree_height == 0 || g.min_tree_height > g.max_tree_height {
            return invalid("generator tree heights must satisfy 1 <= min <= max");
        }
        if g.canopy_radius < 0 {
            return invalid("generator.canopy_radius must not be negative");
        }
        if let Some(biome) = self.biomes.iter().find(|b| b.id.trim().is_empty()) {
            return Err(WorldError::InvalidConfig(format!(
                "biome with top_block {:?} has an empty id",
                biome.top_block
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_is_default() {
        let config = WorldConfig::from_toml_str("").unwrap();
        assert_eq!(config, WorldConfig::default());
        assert_eq!(config.world_seed(), WorldSeed::default());
        assert_eq!(config.biome_list().len(), 4);
        assert_eq!(config.max_resident_chunks, None);
    }

    #[test]
    fn test_seed_resolution() {
        let config = WorldConfig::from_toml_str("seed_phrase = \"hello\"").unwrap();
        assert_eq!(config.world_seed().value(), 99_162_322);

        let config = WorldConfig::from_toml_str("seed = 7\nseed_phrase = \"hello\"").unwrap();
        assert_eq!(config.world_seed().value(), 7);
    }

    #[test]
    fn test_full_document() {
        let text = r#"
            seed = 123456
            render_distance = 2
            max_resident_chunks = 40

            [generator]
            sea_level = 30
            tree_chance = 0.25

            [[biomes]]
            id = "tundra"
            top_block = "snow"
            fill_block = "dirt"
        "#;
        let config = WorldConfig::from_toml_str(text).unwrap();
        assert_eq!(config.render_distance, 2);
        assert_eq!(config.max_resident_chunks, Some(40));
        assert_eq!(config.generator.sea_level, 30);
        assert!((config.generator.coal_chance - 0.05).abs() < f64::EPSILON);
        assert_eq!(config.biome_list().len(), 1);
        assert_eq!(config.biome_list()[0].id, "tundra");
    }

    #[test]
    fn test_rejects_bad_values() {
        for text in [
            "max_resident_chunks = 0",
            "[generator]\ncoal_chance = 1.5",
            "[generator]\nmin_tree_height = 7",
            "[generator]\nterrain_octaves = 0",
            "render_distanse = 3",
            "seed = \"not a number\"",
        ] {
            assert!(
                matches!(WorldConfig::from_toml_str(text), Err(WorldError::InvalidConfig(_))),
                "accepted {text:?}"
            );
        }
    }
}
