//! # Chunk Generator
//!
//! Turns `(seed, chunk coordinate)` into a filled voxel grid.
//!
//! ## Passes
//!
//! 1. **Layering**: per column, bedrock / stone / biome fill / biome top,
//!    then water up to sea level.
//! 2. **Ores**: at most one coal and one iron voxel per column, replacing
//!    stone only.
//! 3. **Trees**: forest columns may grow a trunk with a diamond canopy,
//!    clipped to the chunk.
//!
//! Scatter decisions come from a ChaCha stream seeded by the world seed and
//! the chunk coordinate, so a chunk is byte-identical however often, and in
//! whatever order, it is generated. Generation never reads neighboring
//! chunks.

use std::sync::Arc;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use terracube_shared::{BlockId, BlockRegistry, AIR, CHUNK_AREA, CHUNK_HEIGHT, CHUNK_SIZE, MAX_Y};
use tracing::debug;

use crate::biome::{Biome, BiomeSelector};
use crate::chunk::{Chunk, ChunkCoord};
use crate::config::{GeneratorConfig, WorldConfig};
use crate::noise::{NoiseField, WorldSeed};

/// Sub-seed purpose for the terrain height channel.
const TERRAIN_CHANNEL: u64 = 2;

/// Sub-seed purpose for ore and tree scatter.
const SCATTER_CHANNEL: u64 = 3;

/// Block ids resolved once from the registry.
#[derive(Clone, Copy, Debug)]
struct Palette {
    bedrock: BlockId,
    stone: BlockId,
    /// Air when the registry has no water.
    water: BlockId,
    coal: Option<BlockId>,
    iron: Option<BlockId>,
    log: BlockId,
    leaves: BlockId,
}

impl Palette {
    fn resolve(registry: &BlockRegistry) -> Self {
        let fallback = registry.fallback_id();
        let log = registry
            .lookup("oak_log")
            .or_else(|| registry.lookup("wood_log"))
            .unwrap_or(1);
        Self {
            bedrock: registry
                .lookup("bedrock")
                .or_else(|| registry.lookup("stone"))
                .unwrap_or(fallback),
            stone: registry.lookup("stone").unwrap_or(fallback),
            water: registry.lookup("water").unwrap_or(AIR),
            coal: registry.lookup("coal_ore"),
            iron: registry.lookup("iron_ore"),
            log,
            leaves: registry.lookup("oak_leaves").unwrap_or(log),
        }
    }
}

/// Surface and subsurface ids for one biome.
#[derive(Clone, Copy, Debug)]
struct Strata {
    top: BlockId,
    fill: BlockId,
}

impl Strata {
    fn resolve(registry: &BlockRegistry, biome: &Biome) -> Self {
        let fallback = registry.fallback_id();
        Self {
            top: registry
                .lookup(&biome.top_block)
                .or_else(|| registry.lookup("grass_block"))
                .unwrap_or(fallback),
            fill: registry
                .lookup(&biome.fill_block)
                .or_else(|| registry.lookup("dirt"))
                .unwrap_or(fallback),
        }
    }
}

/// Deterministic chunk generator.
pub struct ChunkGenerator {
    seed: WorldSeed,
    terrain: NoiseField,
    selector: BiomeSelector,
    registry: Arc<BlockRegistry>,
    config: GeneratorConfig,
    palette: Palette,
    /// Indexed like `selector.biomes()`.
    strata: Vec<Strata>,
}

impl ChunkGenerator {
    /// Creates a generator.
    #[must_use]
    pub fn new(
        seed: WorldSeed,
        registry: Arc<BlockRegistry>,
        biomes: Vec<Biome>,
        config: GeneratorConfig,
    ) -> Self {
        let selector = BiomeSelector::new(seed, biomes, config.biome_scale);
        let palette = Palette::resolve(&registry);
        let strata = selector
            .biomes()
            .iter()
            .map(|biome| Strata::resolve(&registry, biome))
            .collect();

        Self {
            seed,
            terrain: NoiseField::new(seed.derive(TERRAIN_CHANNEL)),
            selector,
            registry,
            config,
            palette,
            strata,
        }
    }

    /// Generator for a loaded world configuration.
    #[must_use]
    pub fn from_config(config: &WorldConfig, registry: Arc<BlockRegistry>) -> Self {
        Self::new(
            config.world_seed(),
            registry,
            config.biome_list(),
            config.generator.clone(),
        )
    }

    /// Generator with built-in biomes and default parameters.
    #[must_use]
    pub fn with_defaults(seed: WorldSeed, registry: Arc<BlockRegistry>) -> Self {
        Self::new(seed, registry, Biome::builtin(), GeneratorConfig::default())
    }

    /// World seed.
    #[inline]
    #[must_use]
    pub const fn seed(&self) -> WorldSeed {
        self.seed
    }

    /// Registry the generator resolved its ids against.
    #[must_use]
    pub fn registry(&self) -> &Arc<BlockRegistry> {
        &self.registry
    }

    /// Biome of a world column.
    #[must_use]
    pub fn biome_at(&self, world_x: i64, world_z: i64) -> &Biome {
        self.selector.biome_at(world_x as f64, world_z as f64)
    }

    /// Terrain height `h` of a world column, in `[1, 63]`.
    ///
    /// The topmost terrain voxel sits at `h - 1`.
    #[must_use]
    pub fn surface_height(&self, world_x: i64, world_z: i64) -> usize {
        let sample = self.terrain.octave_sample_with(
            world_x as f64,
            world_z as f64,
            self.config.terrain_octaves,
            self.config.terrain_frequency,
        );
        let height = (sample * self.config.height_scale + self.config.height_base).floor();
        height.clamp(1.0, MAX_Y as f64) as usize
    }

    /// Generates the chunk at `coord`.
    #[must_use]
    pub fn generate(&self, coord: ChunkCoord) -> Chunk {
        let mut chunk = Chunk::empty(coord);
        let mut rng = ChaCha8Rng::seed_from_u64(self.scatter_seed(coord));

        // (height, biome index) per column, z-major like the voxel layers
        let mut columns = [(0usize, 0usize); CHUNK_AREA];

        for (column, slot) in columns.iter_mut().enumerate() {
            let (local_x, local_z) = (column % CHUNK_SIZE, column / CHUNK_SIZE);
            let world_x = coord.world_x() + local_x as i64;
            let world_z = coord.world_z() + local_z as i64;

            let biome_index = self.selector.biome_index(world_x as f64, world_z as f64);
            let height = self.surface_height(world_x, world_z);

            self.layer_column(&mut chunk, local_x, local_z, height, self.strata[biome_index]);
            *slot = (height, biome_index);
        }

        for (column, &(height, _)) in columns.iter().enumerate() {
            self.scatter_ores(&mut chunk, &mut rng, column % CHUNK_SIZE, column / CHUNK_SIZE, height);
        }

        // Canopies spill into neighboring columns, so trees go last.
        let mut trees = 0usize;
        for (column, &(height, biome_index)) in columns.iter().enumerate() {
            let biome = &self.selector.biomes()[biome_index];
            if biome.grows_trees() && rng.gen::<f64>() < self.config.tree_chance {
                let trunk = rng.gen_range(self.config.min_tree_height..=self.config.max_tree_height);
                self.grow_tree(&mut chunk, column % CHUNK_SIZE, column / CHUNK_SIZE, height, trunk);
                trees += 1;
            }
        }

        chunk.mark_generated();
        debug!(chunk = %coord, trees, "chunk generated");
        chunk
    }

    /// Seed of the scatter stream for one chunk.
    fn scatter_seed(&self, coord: ChunkCoord) -> u64 {
        let packed = (u64::from(coord.x as u32) << 32) | u64::from(coord.z as u32);
        self.seed.derive(SCATTER_CHANNEL).derive(packed).value()
    }

    fn layer_column(&self, chunk: &mut Chunk, x: usize, z: usize, height: usize, strata: Strata) {
        let sea_level = self.config.sea_level;
        let voxels = chunk.voxels_mut();

        for y in 0..CHUNK_HEIGHT {
            let id = if y == 0 {
                self.palette.bedrock
            } else if y + 3 < height {
                self.palette.stone
            } else if y + 1 < height {
                strata.fill
            } else if y + 1 == height {
                strata.top
            } else if y < sea_level {
                self.palette.water
            } else {
                AIR
            };
            voxels[Chunk::index(x, y, z)] = id;
        }
    }

    /// One draw for coal, one for iron, plus a depth draw for each hit.
    fn scatter_ores(&self, chunk: &mut Chunk, rng: &mut ChaCha8Rng, x: usize, z: usize, height: usize) {
        let veins = [
            (self.palette.coal, self.config.coal_chance, self.config.coal_min_height, 5),
            (self.palette.iron, self.config.iron_chance, self.config.iron_min_height, 10),
        ];

        for (ore, chance, min_height, depth) in veins {
            if !(rng.gen::<f64>() < chance && height > min_height && height > depth) {
                continue;
            }
            let y = rng.gen_range(0..height - depth) + 1;
            let Some(ore) = ore else { continue };

            let slot = &mut chunk.voxels_mut()[Chunk::index(x, y, z)];
            if *slot == self.palette.stone {
                *slot = ore;
            }
        }
    }

    fn grow_tree(&self, chunk: &mut Chunk, x: usize, z: usize, base: usize, trunk: usize) {
        let Palette { log, leaves, .. } = self.palette;
        // trees only grow into air or their own leaves, never into water
        let open = |id: BlockId| id == AIR || id == leaves;
        let voxels = chunk.voxels_mut();

        for y in (base..base + trunk).take_while(|&y| y <= MAX_Y) {
            let slot = &mut voxels[Chunk::index(x, y, z)];
            if open(*slot) {
                *slot = log;
            }
        }

        let crown = base + trunk - 1;
        if crown > MAX_Y {
            return;
        }
        let radius = self.config.canopy_radius;
        for dz in -radius..=radius {
            for dx in -radius..=radius {
                if dx.abs() + dz.abs() > radius || (dx == 0 && dz == 0) {
                    continue;
                }
                let lx = x as i32 + dx;
                let lz = z as i32 + dz;
                if !(0..CHUNK_SIZE as i32).contains(&lx) || !(0..CHUNK_SIZE as i32).contains(&lz) {
                    continue;
                }
                let slot = &mut voxels[Chunk::index(lx as usize, crown, lz as usize)];
                if open(*slot) {
                    *slot = leaves;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use terracube_shared::{BlockCatalog, CatalogEntry};

    fn generator(seed: u64) -> ChunkGenerator {
        ChunkGenerator::with_defaults(WorldSeed::new(seed), Arc::new(BlockRegistry::builtin()))
    }

    /// Forest everywhere and no sea, so every trunk stands in air.
    fn forest_generator(seed: u64, tree_chance: f64) -> ChunkGenerator {
        let config = GeneratorConfig {
            tree_chance,
            sea_level: 0,
            ..GeneratorConfig::default()
        };
        ChunkGenerator::new(
            WorldSeed::new(seed),
            Arc::new(BlockRegistry::builtin()),
            vec![Biome::forest()],
            config,
        )
    }

    #[test]
    fn test_generator_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ChunkGenerator>();
    }

    #[test]
    fn test_determinism() {
        let a = generator(42);
        let b = generator(42);
        for coord in [ChunkCoord::new(0, 0), ChunkCoord::new(-3, 7), ChunkCoord::new(120, -55)] {
            let first = a.generate(coord);
            let again = a.generate(coord);
            let other = b.generate(coord);
            assert_eq!(first.as_bytes(), again.as_bytes());
            assert_eq!(first.as_bytes(), other.as_bytes());
        }
    }

    #[test]
    fn test_order_independence() {
        let gen = generator(7);
        let target = ChunkCoord::new(2, 2);
        let cold = gen.generate(target);
        for x in -2..2 {
            let _ = gen.generate(ChunkCoord::new(x, x));
        }
        assert_eq!(cold.as_bytes(), gen.generate(target).as_bytes());
    }

    #[test]
    fn test_layering() {
        let gen = generator(123_456);
        let registry = BlockRegistry::builtin();
        let stone = registry.id_of("stone");
        let coord = ChunkCoord::new(4, -9);
        let chunk = gen.generate(coord);
        assert!(chunk.is_generated());
        assert_eq!(chunk.version(), 0);

        for z in 0..CHUNK_SIZE {
            for x in 0..CHUNK_SIZE {
                let world_x = coord.world_x() + x as i64;
                let world_z = coord.world_z() + z as i64;
                let h = gen.surface_height(world_x, world_z);
                assert!((1..=MAX_Y).contains(&h));

                // no bedrock in the built-in set: stone
                assert_eq!(chunk.get(x, 0, z), stone);

                for y in (h..CHUNK_HEIGHT).filter(|&y| y >= 32) {
                    let id = chunk.get(x, y, z);
                    let name = registry.name_of(id).unwrap_or("air");
                    assert!(
                        matches!(name, "air" | "oak_log" | "oak_leaves"),
                        "{name} above the surface at ({x}, {y}, {z})"
                    );
                }
                for y in h..32 {
                    let name = registry.name_of(chunk.get(x, y, z));
                    assert_eq!(name, Some("water"), "flooded column at ({x}, {y}, {z})");
                }
            }
        }
    }

    #[test]
    fn test_missing_water_is_air() {
        let mut catalog = BlockCatalog::new();
        for name in ["stone", "dirt", "grass_block"] {
            catalog.push(CatalogEntry::new(name, "natural"));
        }
        let registry = Arc::new(BlockRegistry::build(&catalog));
        let config = GeneratorConfig {
            height_scale: 0.0,
            height_base: 10.0,
            ..GeneratorConfig::default()
        };
        let gen = ChunkGenerator::new(WorldSeed::new(1), registry, vec![Biome::plains()], config);
        let chunk = gen.generate(ChunkCoord::new(0, 0));

        assert_eq!(chunk.get(3, 0, 3), 1); // stone
        assert_eq!(chunk.get(3, 6, 3), 1);
        assert_eq!(chunk.get(3, 7, 3), 2); // dirt
        assert_eq!(chunk.get(3, 8, 3), 2);
        assert_eq!(chunk.get(3, 9, 3), 3); // grass_block
        assert_eq!(chunk.get(3, 10, 3), AIR);
        assert_eq!(chunk.get(3, 31, 3), AIR);
    }

    #[test]
    fn test_ores_replace_stone_only() {
        let registry = BlockRegistry::builtin();
        let config = GeneratorConfig {
            coal_chance: 1.0,
            iron_chance: 1.0,
            height_scale: 0.0,
            height_base: 40.0,
            ..GeneratorConfig::default()
        };
        let gen = ChunkGenerator::new(
            WorldSeed::new(5),
            Arc::new(registry.clone()),
            vec![Biome::plains()],
            config,
        );
        let chunk = gen.generate(ChunkCoord::new(0, 0));
        let coal = registry.id_of("coal_ore");
        let iron = registry.id_of("iron_ore");

        let mut ores = 0;
        for (i, &id) in chunk.voxels().iter().enumerate() {
            if id == coal || id == iron {
                let (_, y, _) = Chunk::position_of(i);
                assert!((1..=35).contains(&y), "ore at y={y}");
                ores += 1;
            }
        }
        assert!(ores > 400, "expected dense ores, found {ores}");
        assert!(ores <= 512);
    }

    #[test]
    fn test_forest_trees() {
        let gen = forest_generator(11, 1.0);
        let registry = BlockRegistry::builtin();
        let log = registry.id_of("oak_log");
        let leaves = registry.id_of("oak_leaves");
        let chunk = gen.generate(ChunkCoord::new(0, 0));

        let logs = chunk.voxels().iter().filter(|&&id| id == log).count();
        let leaf_count = chunk.voxels().iter().filter(|&&id| id == leaves).count();
        assert!(logs >= 256, "every column should grow a trunk, found {logs} logs");
        assert!(leaf_count > 0);

        // trunk starts at the surface
        let h = gen.surface_height(0, 0);
        assert_eq!(chunk.get(0, h, 0), log);
    }

    #[test]
    fn test_no_trees_outside_forest() {
        let config = GeneratorConfig {
            tree_chance: 1.0,
            ..GeneratorConfig::default()
        };
        let registry = Arc::new(BlockRegistry::builtin());
        let log = registry.id_of("oak_log");
        let gen = ChunkGenerator::new(WorldSeed::new(3), registry, vec![Biome::desert()], config);
        let chunk = gen.generate(ChunkCoord::new(1, 1));
        assert!(chunk.voxels().iter().all(|&id| id != log));
    }

    #[test]
    fn test_tree_clipped_at_ceiling() {
        let config = GeneratorConfig {
            tree_chance: 1.0,
            height_scale: 0.0,
            height_base: 62.0,
            ..GeneratorConfig::default()
        };
        let registry = Arc::new(BlockRegistry::builtin());
        let log = registry.id_of("oak_log");
        let leaves = registry.id_of("oak_leaves");
        let gen = ChunkGenerator::new(WorldSeed::new(8), registry, vec![Biome::forest()], config);
        let chunk = gen.generate(ChunkCoord::new(0, 0));

        assert_eq!(chunk.get(5, 62, 5), log);
        assert_eq!(chunk.get(5, 63, 5), log);
        // crown would be above the world: no canopy at all
        assert!(chunk.voxels().iter().all(|&id| id != leaves));
    }

    #[test]
    fn test_no_trunks_in_water() {
        let config = GeneratorConfig {
            tree_chance: 1.0,
            height_scale: 0.0,
            height_base: 20.0,
            ..GeneratorConfig::default()
        };
        let registry = Arc::new(BlockRegistry::builtin());
        let water = registry.id_of("water");
        let log = registry.id_of("oak_log");
        let gen = ChunkGenerator::new(WorldSeed::new(5), registry, vec![Biome::forest()], config);
        let chunk = gen.generate(ChunkCoord::new(0, 0));

        // surface at y=19, sea up to y=31: every tree is drowned
        assert_eq!(chunk.get(5, 20, 5), water);
        for y in 20..32 {
            for z in 0..CHUNK_SIZE {
                for x in 0..CHUNK_SIZE {
                    assert_eq!(chunk.get(x, y, z), water, "({x}, {y}, {z})");
                }
            }
        }
        assert!(chunk.voxels().iter().all(|&id| id != log));
    }

    #[test]
    fn test_palette_accepts_aliases() {
        let mut catalog = BlockCatalog::new();
        for name in ["stone", "dirt", "grassblock", "oaklog", "oakleaves"] {
            catalog.push(CatalogEntry::new(name, "natural"));
        }
        let registry = Arc::new(BlockRegistry::build(&catalog));
        let (stone, log, leaves) = (registry.id_of("stone"), 4, 5);
        assert_eq!(registry.lookup("oak_log"), Some(log));

        let config = GeneratorConfig {
            tree_chance: 1.0,
            sea_level: 0,
            height_scale: 0.0,
            height_base: 20.0,
            ..GeneratorConfig::default()
        };
        let gen = ChunkGenerator::new(WorldSeed::new(9), registry, vec![Biome::forest()], config);
        let chunk = gen.generate(ChunkCoord::new(0, 0));

        // no bedrock: the floor falls back to stone
        assert_eq!(chunk.get(2, 0, 2), stone);
        assert_eq!(chunk.get(2, 20, 2), log);
        assert!(chunk.voxels().contains(&leaves));
    }

    #[test]
    fn test_far_chunk_generates() {
        let gen = generator(77);
        let coord = ChunkCoord::new(200_000_000, 0);
        assert_eq!(coord.world_x(), 3_200_000_000);

        let chunk = gen.generate(coord);
        assert_eq!(chunk.coord(), coord);
        assert!(chunk.is_generated());
        assert_ne!(chunk.get(0, 0, 0), AIR);

        let edge = gen.generate(ChunkCoord::new(i32::MIN, i32::MAX));
        assert!(edge.is_generated());
    }
}
