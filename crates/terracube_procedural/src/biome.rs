//! # Biome Selection
//!
//! Biomes are data, not code: each is an immutable descriptor naming the
//! blocks that cap and fill its terrain. The selector picks one per world
//! column from a low-frequency noise channel:
//!
//! ```text
//! index = floor(noise(x * scale, z * scale) * biome_count), clamped
//! ```
//!
//! With the default scale of `0.001` a biome spans hundreds of blocks.

use serde::{Deserialize, Serialize};

use crate::noise::{NoiseField, WorldSeed};

/// Sub-seed purpose for the biome noise channel.
const BIOME_CHANNEL: u64 = 1;

/// Frequency applied to world coordinates before sampling.
pub const DEFAULT_BIOME_SCALE: f64 = 0.001;

/// Immutable biome descriptor.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Biome {
    /// Stable identifier (`"forest"`).
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Climate temperature.
    #[serde(default)]
    pub temperature: f32,
    /// Climate humidity.
    #[serde(default)]
    pub humidity: f32,
    /// Block at the terrain surface.
    pub top_block: String,
    /// Block in the layers below the surface.
    pub fill_block: String,
    /// Decoration names.
    #[serde(default)]
    pub decorations: Vec<String>,
    /// Structure names.
    #[serde(default)]
    pub structures: Vec<String>,
}

impl Biome {
    #[allow(clippy::too_many_arguments)]
    fn described(
        id: &str,
        name: &str,
        temperature: f32,
        humidity: f32,
        top_block: &str,
        fill_block: &str,
        decorations: &[&str],
        structures: &[&str],
    ) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            temperature,
            humidity,
            top_block: top_block.to_string(),
            fill_block: fill_block.to_string(),
            decorations: decorations.iter().map(|s| (*s).to_string()).collect(),
            structures: structures.iter().map(|s| (*s).to_string()).collect(),
        }
    }

    /// Grassland.
    #[must_use]
    pub fn plains() -> Self {
        Self::described(
            "plains",
            "Равнина",
            0.8,
            0.4,
            "grass_block",
            "dirt",
            &["tall_grass", "flowers"],
            &["village"],
        )
    }

    /// Woodland. The only biome that grows trees.
    #[must_use]
    pub fn forest() -> Self {
        Self::described(
            "forest",
            "Лес",
            0.7,
            0.8,
            "grass_block",
            "dirt",
            &["oak_log", "oak_leaves"],
            &["woodland_mansion"],
        )
    }

    /// Sand all the way down.
    #[must_use]
    pub fn desert() -> Self {
        Self::described(
            "desert",
            "Пустыня",
            2.0,
            0.0,
            "sand",
            "sand",
            &["cactus", "dead_bush"],
            &["desert_temple"],
        )
    }

    /// Water surface over water fill.
    #[must_use]
    pub fn ocean() -> Self {
        Self::described(
            "ocean",
            "Океан",
            0.5,
            0.5,
            "water",
            "water",
            &["kelp", "sea_grass"],
            &["ocean_ruin"],
        )
    }

    /// The four built-in biomes, in selection order.
    #[must_use]
    pub fn builtin() -> Vec<Self> {
        vec![Self::plains(), Self::forest(), Self::desert(), Self::ocean()]
    }

    /// Returns true for biomes that grow trees.
    #[must_use]
    pub fn grows_trees(&self) -> bool {
        self.id == "forest"
    }
}

/// Maps world columns to biome descriptors.
pub struct BiomeSelector {
    noise: NoiseField,
    biomes: Vec<Biome>,
    scale: f64,
}

impl BiomeSelector {
    /// Creates a selector over `biomes`.
    ///
    /// An empty list is replaced by a single plains biome.
    #[must_use]
    pub fn new(seed: WorldSeed, biomes: Vec<Biome>, scale: f64) -> Self {
        let biomes = if biomes.is_empty() {
            vec![Biome::plains()]
        } else {
            biomes
        };
        Self {
            noise: NoiseField::new(seed.derive(BIOME_CHANNEL)),
            biomes,
            scale,
        }
    }

    /// Selector over the built-in biomes at the default scale.
    #[must_use]
    pub fn with_builtin(seed: WorldSeed) -> Self {
        Self::new(seed, Biome::builtin(), DEFAULT_BIOME_SCALE)
    }

    /// Index into [`BiomeSelector::biomes`] for a world column.
    #[must_use]
    pub fn biome_index(&self, x: f64, z: f64) -> usize {
        let value = self.noise.sample(x * self.scale, z * self.scale);
        let index = (value * self.biomes.len() as f64).floor() as usize;
        index.min(self.biomes.len() - 1)
    }

    /// Biome for a world column.
    #[must_use]
    pub fn biome_at(&self, x: f64, z: f64) -> &Biome {
        &self.biomes[self.biome_index(x, z)]
    }

    /// All selectable biomes.
    #[must_use]
    pub fn biomes(&self) -> &[Biome] {
        &self.biomes
    }
}
