//! # Block Catalog
//!
//! The catalog is the external document that lists every block the game
//! knows about, grouped by category:
//!
//! ```json
//! {
//!   "block_catalog": {
//!     "categories": {
//!       "natural": {
//!         "blocks": {
//!           "stone": { "name": "Stone", "hardness": 1.5, "bestTool": "pickaxe" },
//!           "dirt":  { "hardness": 0.5, "bestTool": "shovel" }
//!         }
//!       }
//!     }
//!   }
//! }
//! ```
//!
//! A category's `blocks` may also be an array of objects carrying their
//! symbolic `name`.
//!
//! ## Failure Model
//!
//! Only a document without the `block_catalog.categories` object is an error.
//! Individual malformed or unnamed entries are skipped with a warning; a bad
//! entry never aborts the load.
//!
//! ## Ordering
//!
//! Entries keep document order. Re-adding a name replaces its properties in
//! place, so the name keeps its original position (and therefore its id).

use std::path::Path;

use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::error::{WorldError, WorldResult};

/// Hardness assigned when an entry does not specify one.
pub const DEFAULT_HARDNESS: f32 = 1.5;

/// Tool assigned to built-in blocks.
const DEFAULT_TOOL: &str = "pickaxe";

/// Blocks that exist even when no catalog document could be loaded.
const BUILTIN_BLOCKS: [&str; 15] = [
    "grass_block",
    "dirt",
    "stone",
    "sand",
    "water",
    "wood_log",
    "oak_log",
    "oak_planks",
    "cobblestone",
    "coal_ore",
    "iron_ore",
    "diamond_ore",
    "glass",
    "leaves",
    "oak_leaves",
];

/// One block in the catalog.
#[derive(Clone, Debug, PartialEq)]
pub struct CatalogEntry {
    /// Symbolic name (`"grass_block"`). This is what the registry maps.
    pub name: String,
    /// Human-readable name.
    pub display_name: String,
    /// Category the entry was listed under.
    pub category: String,
    /// Mining hardness.
    pub hardness: f32,
    /// Preferred tool, if any.
    pub best_tool: Option<String>,
    /// Whether light and sight pass through the block.
    pub transparent: bool,
}

impl CatalogEntry {
    /// Creates an entry with default properties.
    #[must_use]
    pub fn new(name: &str, category: &str) -> Self {
        Self {
            name: name.to_string(),
            display_name: display_name_for(name),
            category: category.to_string(),
            hardness: DEFAULT_HARDNESS,
            best_tool: None,
            transparent: false,
        }
    }
}

/// Ordered list of catalog entries with unique names.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BlockCatalog {
    entries: Vec<CatalogEntry>,
}

impl BlockCatalog {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the built-in base blocks.
    ///
    /// Water and glass are transparent; everything is mined with a pickaxe.
    #[must_use]
    pub fn builtin() -> Self {
        let mut catalog = Self::new();
        for name in BUILTIN_BLOCKS {
            let mut entry = CatalogEntry::new(name, "builtin");
            entry.best_tool = Some(DEFAULT_TOOL.to_string());
            entry.transparent = matches!(name, "water" | "glass");
            catalog.push(entry);
        }
        catalog
    }

    /// Parses a catalog document.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::InvalidCatalog`] if the text is not JSON or lacks
    /// the `block_catalog.categories` object. Malformed entries are skipped.
    pub fn from_json_str(json: &str) -> WorldResult<Self> {
        let document: Value =
            serde_json::from_str(json).map_err(|e| WorldError::InvalidCatalog(e.to_string()))?;

        let categories = document
            .get("block_catalog")
            .and_then(|c| c.get("categories"))
            .and_then(Value::as_object)
            .ok_or_else(|| {
                WorldError::InvalidCatalog("missing block_catalog.categories object".to_string())
            })?;

        let mut catalog = Self::new();
        for (category, body) in categories {
            match body.get("blocks") {
                Some(Value::Object(blocks)) => catalog.push_keyed(category, blocks),
                Some(Value::Array(blocks)) => catalog.push_listed(category, blocks),
                _ => warn!(category = %category, "catalog category has no blocks; skipped"),
            }
        }

        debug!(entries = catalog.len(), "block catalog parsed");
        Ok(catalog)
    }

    /// Reads and parses a catalog document from disk.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file can't be read, or the parse errors of
    /// [`BlockCatalog::from_json_str`].
    pub fn load(path: &Path) -> WorldResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| WorldError::io(path, &e))?;
        Self::from_json_str(&text)
    }

    /// Adds an entry, replacing the properties of an existing entry with the
    /// same name in place.
    pub fn push(&mut self, entry: CatalogEntry) {
        if let Some(existing) = self.entries.iter_mut().find(|e| e.name == entry.name) {
            *existing = entry;
        } else {
            self.entries.push(entry);
        }
    }

    /// Merges another catalog on top of this one.
    pub fn merge(&mut self, other: Self) {
        for entry in other.entries {
            self.push(entry);
        }
    }

    /// Returns all entries in catalog order.
    #[must_use]
    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the catalog has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `"blocks": { "<name>": { ... } }`
    fn push_keyed(&mut self, category: &str, blocks: &Map<String, Value>) {
        for (name, body) in blocks {
            match parse_entry(name, category, body) {
                Ok(entry) => self.push(entry),
                Err(reason) => warn!(category = %category, block = %name, %reason, "catalog entry skipped"),
            }
        }
    }

    /// `"blocks": [ { "name": "<name>", ... } ]`
    fn push_listed(&mut self, category: &str, blocks: &[Value]) {
        for (position, body) in blocks.iter().enumerate() {
            let Some(name) = body.get("name").and_then(Value::as_str) else {
                warn!(category = %category, position, "unnamed catalog entry skipped");
                continue;
            };
            match parse_entry(name, category, body) {
                Ok(mut entry) => {
                    entry.display_name = body
                        .get("displayName")
                        .and_then(Value::as_str)
                        .map_or_else(|| display_name_for(name), str::to_string);
                    self.push(entry);
                }
                Err(reason) => warn!(category = %category, block = %name, %reason, "catalog entry skipped"),
            }
        }
    }
}

/// Validates one entry body. Present-but-mistyped fields make it malformed.
fn parse_entry(name: &str, category: &str, body: &Value) -> Result<CatalogEntry, String> {
    let name = name.trim();
    if name.is_empty() {
        return Err("empty block name".to_string());
    }
    let Some(fields) = body.as_object() else {
        return Err("entry is not an object".to_string());
    };

    let mut entry = CatalogEntry::new(name, category);

    if let Some(display) = fields.get("name") {
        entry.display_name = display
            .as_str()
            .ok_or("`name` is not a string")?
            .to_string();
    }
    if let Some(hardness) = fields.get("hardness") {
        entry.hardness = hardness.as_f64().ok_or("`hardness` is not a number")? as f32;
    }
    if let Some(tool) = fields.get("bestTool") {
        entry.best_tool = Some(tool.as_str().ok_or("`bestTool` is not a string")?.to_string());
    }
    if let Some(transparent) = fields.get("transparent") {
        entry.transparent = transparent.as_bool().ok_or("`transparent` is not a boolean")?;
    }

    Ok(entry)
}

/// `"grass_block"` -> `"grass block"` (first underscore only).
fn display_name_for(name: &str) -> String {
    name.replacen('_', " ", 1)
}
