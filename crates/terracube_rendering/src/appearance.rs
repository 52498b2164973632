//! # Block Appearance
//!
//! Static name -> color table, resolved once into a table indexed by block id.
//!
//! The material key of a block is its color in `#rrggbb` form. Instances that
//! share a key can be drawn with the same material, so blocks that look the
//! same (dirt and logs, both leaf kinds) batch together.
//!
//! Blocks without an entry get [`DEFAULT_MATERIAL_KEY`] (white).

use bytemuck::{Pod, Zeroable};
use terracube_shared::{BlockId, BlockRegistry};

/// Key used for blocks with no appearance entry.
pub const DEFAULT_MATERIAL_KEY: &str = "#ffffff";

/// Known block colors.
static BLOCK_COLORS: [(&str, &str); 16] = [
    ("grass_block", "#4a9c4a"),
    ("dirt", "#8b4513"),
    ("stone", "#808080"),
    ("sand", "#f4e4bc"),
    ("water", "#1e90ff"),
    ("wood_log", "#8b4513"),
    ("oak_log", "#8b4513"),
    ("oak_planks", "#deb887"),
    ("cobblestone", "#696969"),
    ("coal_ore", "#2f2f2f"),
    ("iron_ore", "#cd853f"),
    ("diamond_ore", "#87ceeb"),
    ("glass", "#e0f6ff"),
    ("leaves", "#228b22"),
    ("oak_leaves", "#228b22"),
    ("bedrock", "#2b2b2b"),
];

/// GPU-friendly color: linear RGB plus alpha.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, Pod, Zeroable, PartialEq)]
pub struct PaletteMaterial {
    /// Base color (RGBA, 0-1).
    pub color: [f32; 4],
}

impl PaletteMaterial {
    /// Fully transparent (air).
    pub const AIR: Self = Self { color: [0.0; 4] };

    /// Opaque white.
    pub const WHITE: Self = Self {
        color: [1.0, 1.0, 1.0, 1.0],
    };

    /// Parses `#rrggbb`.
    #[must_use]
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#')?;
        if digits.len() != 6 {
            return None;
        }
        let channel = |i: usize| {
            u8::from_str_radix(digits.get(i..i + 2)?, 16)
                .ok()
                .map(|v| f32::from(v) / 255.0)
        };
        Some(Self {
            color: [channel(0)?, channel(2)?, channel(4)?, 1.0],
        })
    }
}

/// Appearance of one block id.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Appearance {
    /// Material key (`#rrggbb`).
    pub key: &'static str,
    /// Parsed color.
    pub material: PaletteMaterial,
}

impl Appearance {
    const AIR: Self = Self {
        key: "",
        material: PaletteMaterial::AIR,
    };

    const DEFAULT: Self = Self {
        key: DEFAULT_MATERIAL_KEY,
        material: PaletteMaterial::WHITE,
    };

    /// Static appearance of a block name.
    #[must_use]
    pub fn for_name(name: &str) -> Self {
        BLOCK_COLORS
            .iter()
            .find(|(block, _)| *block == name)
            .and_then(|(_, hex)| {
                PaletteMaterial::from_hex(hex).map(|material| Self { key: *hex, material })
            })
            .unwrap_or(Self::DEFAULT)
    }
}

/// Appearance per block id, built from one registry snapshot.
#[derive(Debug, Clone)]
pub struct AppearanceTable {
    /// `entries[id]`; index 0 is air.
    entries: Vec<Appearance>,
    /// Same order as `entries`, for upload.
    materials: Vec<PaletteMaterial>,
}

impl AppearanceTable {
    /// Resolves every registered block.
    #[must_use]
    pub fn build(registry: &BlockRegistry) -> Self {
        let mut entries = Vec::with_capacity(registry.len() + 1);
        entries.push(Appearance::AIR);
        entries.extend(registry.iter().map(|def| Appearance::for_name(&def.name)));
        let materials = entries.iter().map(|a| a.material).collect();
        Self { entries, materials }
    }

    /// Appearance of `id`. Ids unknown to the registry get the default.
    #[inline]
    #[must_use]
    pub fn get(&self, id: BlockId) -> &Appearance {
        self.entries
            .get(usize::from(id))
            .unwrap_or(&Appearance::DEFAULT)
    }

    /// Material key of `id`.
    #[inline]
    #[must_use]
    pub fn material_key(&self, id: BlockId) -> &'static str {
        self.get(id).key
    }

    /// Number of ids covered, air included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false: air is always present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Colors indexed by block id as raw bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.materials)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use terracube_shared::AIR;

    #[test]
    fn test_hex_parsing() {
        let grass = PaletteMaterial::from_hex("#4a9c4a").unwrap();
        assert!((grass.color[0] - 74.0 / 255.0).abs() < 1e-6);
        assert!((grass.color[1] - 156.0 / 255.0).abs() < 1e-6);
        assert!((grass.color[3] - 1.0).abs() < f32::EPSILON);

        assert!(PaletteMaterial::from_hex("4a9c4a").is_none());
        assert!(PaletteMaterial::from_hex("#4a9c").is_none());
        assert!(PaletteMaterial::from_hex("#zz9c4a").is_none());
    }

    #[test]
    fn test_table_by_id() {
        let registry = BlockRegistry::builtin();
        let table = AppearanceTable::build(&registry);

        assert_eq!(table.len(), registry.len() + 1);
        assert_eq!(table.material_key(registry.id_of("grass_block")), "#4a9c4a");
        assert_eq!(table.material_key(registry.id_of("oak_log")), "#8b4513");
        assert_eq!(table.material_key(AIR), "");
        assert_eq!(table.material_key(999), DEFAULT_MATERIAL_KEY);
        assert_eq!(table.as_bytes().len(), table.len() * 16);
    }

    #[test]
    fn test_unmapped_name_is_default() {
        assert_eq!(Appearance::for_name("obsidian").key, DEFAULT_MATERIAL_KEY);
        assert_eq!(Appearance::for_name("obsidian").material, PaletteMaterial::WHITE);
        assert_eq!(Appearance::for_name("bedrock").key, "#2b2b2b");
    }
}
