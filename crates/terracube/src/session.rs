//! # Game Session
//!
//! One player in one world: the world window around the player, the
//! visible-voxel feed for resident chunks, and the player's inventory and
//! clock.
//!
//! ## Frame Flow
//!
//! ```text
//! move_player() -> ensure_resident() -> refresh() -> visible_instances()
//! mine()/place() -> edit log + inventory -> refresh()
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use terracube_procedural::{ChunkCoord, WorldConfig, WorldManager};
use terracube_rendering::{ExtractionCache, VisibleVoxelExtractor, VoxelInstance};
use terracube_shared::{BlockCatalog, BlockRegistry, Vec3, WorldResult};
use tracing::{debug, info, warn};

use crate::inventory::{Inventory, HOTBAR_SLOTS};
use crate::save::{advance_time, PlayerState, SaveBlob, Weather, START_TIME};

/// Clock ticks per session tick.
pub const TICKS_PER_STEP: u32 = 20;

/// Builds the block catalog for a world.
///
/// The built-in blocks come first; a configured catalog document is merged
/// over them. A relative `catalog_path` is resolved against `base_dir`.
///
/// # Errors
///
/// Returns the catalog loader's error if the document cannot be read or has
/// the wrong top-level shape.
pub fn load_catalog(config: &WorldConfig, base_dir: &Path) -> WorldResult<BlockCatalog> {
    let mut catalog = BlockCatalog::builtin();
    if let Some(path) = &config.catalog_path {
        let path = resolve(base_dir, path);
        let document = BlockCatalog::load(&path)?;
        info!(path = %path.display(), blocks = document.len(), "block catalog loaded");
        catalog.merge(document);
    }
    Ok(catalog)
}

fn resolve(base_dir: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base_dir.join(path)
    }
}

/// A running game for one player.
pub struct GameSession {
    world: WorldManager,
    extractor: VisibleVoxelExtractor,
    cache: ExtractionCache,
    render_distance: u32,
    player: PlayerState,
    inventory: Inventory,
    selected_slot: usize,
    time: u32,
    weather: Weather,
}

impl GameSession {
    /// Starts a session with a fresh player at spawn.
    #[must_use]
    pub fn new(config: &WorldConfig, registry: Arc<BlockRegistry>) -> Self {
        let extractor = VisibleVoxelExtractor::new(&registry);
        let mut session = Self {
            world: WorldManager::from_config(config, registry),
            extractor,
            cache: ExtractionCache::new(),
            render_distance: config.render_distance,
            player: PlayerState::default(),
            inventory: Inventory::starter(),
            selected_slot: 0,
            time: START_TIME,
            weather: Weather::Clear,
        };
        session.load_window();
        session
    }

    /// Starts a session from a configuration, loading its block catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured catalog cannot be loaded.
    pub fn from_config(config: &WorldConfig, base_dir: &Path) -> WorldResult<Self> {
        let catalog = load_catalog(config, base_dir)?;
        let registry = Arc::new(BlockRegistry::build(&catalog));
        Ok(Self::new(config, registry))
    }

    /// Starts a session from a configuration file.
    ///
    /// The catalog path inside it is relative to the file's directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration or its catalog cannot be loaded.
    pub fn open(config_path: &Path) -> WorldResult<Self> {
        let config = WorldConfig::load(config_path)?;
        let base_dir = config_path.parent().unwrap_or_else(|| Path::new("."));
        Self::from_config(&config, base_dir)
    }

    /// Moves the player and loads chunks around the new position.
    ///
    /// Returns how many chunks were generated.
    pub fn move_player(&mut self, position: Vec3) -> usize {
        self.player.position = position;
        self.load_window()
    }

    fn load_window(&mut self) -> usize {
        let Vec3 { x, z, .. } = self.player.position;
        let generated = self
            .world
            .ensure_resident(f64::from(x), f64::from(z), self.render_distance);
        if generated > 0 {
            let store = self.world.store();
            self.cache.retain(|coord| store.contains(coord));
        }
        generated
    }

    /// Selects a hotbar slot. Returns false for an index past the hotbar.
    pub fn select_slot(&mut self, slot: usize) -> bool {
        if slot >= HOTBAR_SLOTS {
            return false;
        }
        self.selected_slot = slot;
        true
    }

    /// Breaks a block and puts its drop into the inventory.
    ///
    /// Returns the broken block's name. If the inventory is full the block
    /// still breaks and the drop is lost.
    pub fn mine(&mut self, x: f64, y: f64, z: f64) -> Option<String> {
        let name = self.world.break_block(x, y, z)?;
        if let Err(err) = self.inventory.add(&name, 1) {
            warn!(block = %name, error = %err, "drop lost");
        }
        Some(name)
    }

    /// Places one block from the selected hotbar slot.
    ///
    /// Returns false if the slot is empty, holds something that is not a
    /// block, or the world rejects the placement. Nothing is consumed then.
    pub fn place(&mut self, x: f64, y: f64, z: f64) -> bool {
        let Some(item) = self.selected_item().map(str::to_string) else {
            return false;
        };
        if self.world.registry().lookup(&item).is_none() {
            debug!(item = %item, "not a placeable block");
            return false;
        }
        if !self.world.place_block(x, y, z, &item) {
            return false;
        }
        self.inventory.take_one(self.selected_slot).is_ok()
    }

    /// Re-extracts every chunk edited or loaded since the last refresh.
    ///
    /// Returns the chunks that changed.
    pub fn refresh(&mut self) -> Vec<ChunkCoord> {
        let dirty = self.world.take_dirty();
        for &coord in &dirty {
            if let Some(chunk) = self.world.chunk(coord) {
                self.cache.instances(&self.extractor, chunk);
            }
        }
        dirty
    }

    /// Visible voxels of a resident chunk.
    pub fn visible_instances(&mut self, coord: ChunkCoord) -> Option<&[VoxelInstance]> {
        let chunk = self.world.chunk(coord)?;
        Some(self.cache.instances(&self.extractor, chunk))
    }

    /// Total visible voxels across every resident chunk.
    pub fn visible_total(&mut self) -> usize {
        let coords: Vec<ChunkCoord> = self.world.store().coords().collect();
        coords
            .into_iter()
            .filter_map(|coord| self.visible_instances(coord).map(<[VoxelInstance]>::len))
            .sum()
    }

    /// Advances the clock by one step.
    pub fn tick(&mut self) {
        self.time = advance_time(self.time, TICKS_PER_STEP);
    }

    /// Changes the weather.
    pub fn set_weather(&mut self, weather: Weather) {
        self.weather = weather;
    }

    /// Captures the player, inventory and clock.
    #[must_use]
    pub fn snapshot(&self) -> SaveBlob {
        SaveBlob {
            player: self.player.clone(),
            inventory: self.inventory.clone(),
            selected_slot: self.selected_slot,
            time: self.time,
            weather: self.weather,
        }
    }

    /// Restores a saved player and reloads the window around them.
    ///
    /// # Errors
    ///
    /// Returns [`terracube_shared::WorldError::InvalidSave`] if the blob
    /// fails validation; the session is unchanged then.
    pub fn restore(&mut self, blob: SaveBlob) -> WorldResult<()> {
        blob.validate()?;
        self.player = blob.player;
        self.inventory = blob.inventory;
        self.selected_slot = blob.selected_slot;
        self.time = blob.time;
        self.weather = blob.weather;
        self.load_window();
        Ok(())
    }

    /// Name of the item in the selected hotbar slot.
    #[must_use]
    pub fn selected_item(&self) -> Option<&str> {
        self.inventory.get(self.selected_slot).and_then(|s| s.item())
    }

    /// The world.
    #[must_use]
    pub fn world(&self) -> &WorldManager {
        &self.world
    }

    /// The block registry.
    #[must_use]
    pub fn registry(&self) -> &Arc<BlockRegistry> {
        self.world.registry()
    }

    /// The player.
    #[must_use]
    pub fn player(&self) -> &PlayerState {
        &self.player
    }

    /// The inventory.
    #[must_use]
    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    /// Selected hotbar slot.
    #[must_use]
    pub const fn selected_slot(&self) -> usize {
        self.selected_slot
    }

    /// Time of day in ticks.
    #[must_use]
    pub const fn time(&self) -> u32 {
        self.time
    }

    /// Current weather.
    #[must_use]
    pub const fn weather(&self) -> Weather {
        self.weather
    }

    /// Chunk window radius.
    #[must_use]
    pub const fn render_distance(&self) -> u32 {
        self.render_distance
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spawn_session() -> GameSession {
        let config = WorldConfig {
            seed: Some(123_456),
            max_resident_chunks: Some(16),
            ..WorldConfig::default()
        };
        GameSession::new(&config, Arc::new(BlockRegistry::builtin()))
    }

    #[test]
    fn test_new_loads_spawn_window() {
        let session = spawn_session();
        assert_eq!(session.world().store().len(), 9);
        assert_eq!(session.player().position, Vec3::new(0.0, 65.0, 0.0));
        assert_eq!(session.selected_item(), Some("dirt"));
    }

    #[test]
    fn test_select_slot() {
        let mut session = spawn_session();
        assert!(session.select_slot(1));
        assert_eq!(session.selected_item(), Some("stone"));
        assert!(!session.select_slot(9));
        assert_eq!(session.selected_slot(), 1);
    }

    #[test]
    fn test_mine_fills_inventory() {
        let mut session = spawn_session();
        let name = session.mine(0.0, 0.0, 0.0).unwrap();
        assert_eq!(
            session.inventory().count_item(&name),
            Inventory::starter().count_item(&name) + 1
        );
        assert_eq!(session.mine(0.0, 0.0, 0.0), None);
    }

    #[test]
    fn test_place_consumes_selected() {
        let mut session = spawn_session();
        assert!(session.place(3.0, 63.0, 3.0));
        assert_eq!(session.inventory().hotbar()[0].count, 63);
        assert_eq!(
            session.world().block_at(3.0, 63.0, 3.0),
            Some(session.registry().id_of("dirt"))
        );

        // occupied: nothing consumed
        assert!(!session.place(3.0, 63.0, 3.0));
        assert_eq!(session.inventory().hotbar()[0].count, 63);
    }

    #[test]
    fn test_place_rejects_tools_and_empty_slots() {
        let mut session = spawn_session();
        session.select_slot(3);
        assert_eq!(session.selected_item(), Some("wooden_pickaxe"));
        assert!(!session.place(3.0, 63.0, 3.0));
        assert_eq!(session.inventory().hotbar()[3].count, 1);

        session.select_slot(8);
        assert!(!session.place(3.0, 63.0, 3.0));
    }

    #[test]
    fn test_refresh_reextracts_edited_chunk() {
        let mut session = spawn_session();
        session.refresh();
        let coord = ChunkCoord::new(0, 0);
        let before = session.visible_instances(coord).unwrap().len();

        assert!(session.place(5.0, 63.0, 5.0));
        assert_eq!(session.refresh(), vec![coord]);
        assert_eq!(session.visible_instances(coord).unwrap().len(), before + 1);
        assert!(session.visible_instances(ChunkCoord::new(50, 50)).is_none());
    }

    #[test]
    fn test_tick_wraps_day() {
        let mut session = spawn_session();
        for _ in 0..900 {
            session.tick();
        }
        assert_eq!(session.time(), 0);
    }

    #[test]
    fn test_snapshot_restore() {
        let mut session = spawn_session();
        session.select_slot(2);
        session.set_weather(Weather::Rain);
        session.move_player(Vec3::new(40.0, 65.0, -8.0));
        let blob = session.snapshot();

        let mut other = spawn_session();
        other.restore(blob.clone()).unwrap();
        assert_eq!(other.snapshot(), blob);
        assert!(other.world().store().contains(ChunkCoord::new(2, -1)));

        let mut bad = blob;
        bad.time = 24_000;
        assert!(other.restore(bad).is_err());
        assert_eq!(other.time(), START_TIME);
    }
}
