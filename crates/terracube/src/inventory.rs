//! # Player Inventory
//!
//! 36 name-keyed slots. Slots `0..9` are the hotbar; the rest are the main
//! storage grid.
//!
//! ## Stacking Rules
//!
//! - A stack holds at most [`MAX_STACK_SIZE`] items of one name.
//! - Added items top up matching non-full stacks first, in slot order, then
//!   open the first empty slot.
//! - An add that does not fit changes nothing.
//! - A stack that reaches zero becomes an empty slot.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Total number of slots.
pub const INVENTORY_SLOTS: usize = 36;

/// Number of hotbar slots at the front of the inventory.
pub const HOTBAR_SLOTS: usize = 9;

/// Maximum items per stack.
pub const MAX_STACK_SIZE: u32 = 64;

/// Errors from inventory operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InventoryError {
    /// Not enough free space for the items.
    #[error("inventory full: no room for {amount} {item}")]
    Full {
        /// Item that did not fit.
        item: String,
        /// Amount that did not fit.
        amount: u32,
    },

    /// Fewer items than requested.
    #[error("not enough {item}: need {required}, have {available}")]
    Insufficient {
        /// Item requested.
        item: String,
        /// Amount requested.
        required: u32,
        /// Amount held.
        available: u32,
    },

    /// Slot index outside the inventory.
    #[error("slot {0} out of range")]
    InvalidSlot(usize),
}

/// Result type for inventory operations.
pub type InventoryResult<T> = Result<T, InventoryError>;

/// One slot: an item name and a count.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemStack {
    /// Item name, `None` for an empty slot.
    pub item_id: Option<String>,
    /// Number of items.
    pub count: u32,
}

impl ItemStack {
    /// Creates an empty stack.
    #[inline]
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            item_id: None,
            count: 0,
        }
    }

    /// Creates a stack of `count` items.
    #[must_use]
    pub fn new(item_id: &str, count: u32) -> Self {
        Self {
            item_id: Some(item_id.to_string()),
            count,
        }
    }

    /// Returns true if the slot holds nothing.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.item_id.is_none() || self.count == 0
    }

    /// Item name, if any.
    #[inline]
    #[must_use]
    pub fn item(&self) -> Option<&str> {
        if self.count == 0 {
            return None;
        }
        self.item_id.as_deref()
    }

    /// Returns true if this stack holds `item` and has room for more.
    #[inline]
    #[must_use]
    pub fn accepts(&self, item: &str) -> bool {
        self.item() == Some(item) && self.count < MAX_STACK_SIZE
    }

    /// Empties the slot.
    #[inline]
    pub fn clear(&mut self) {
        self.item_id = None;
        self.count = 0;
    }
}

/// Fixed-size player inventory.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<ItemStack>", into = "Vec<ItemStack>")]
pub struct Inventory {
    slots: Vec<ItemStack>,
}

impl Inventory {
    /// Creates an empty inventory.
    #[must_use]
    pub fn new() -> Self {
        Self {
            slots: vec![ItemStack::empty(); INVENTORY_SLOTS],
        }
    }

    /// The kit a new player starts with.
    #[must_use]
    pub fn starter() -> Self {
        let mut inventory = Self::new();
        let hotbar = [
            ("dirt", 64),
            ("stone", 64),
            ("wood_log", 64),
            ("wooden_pickaxe", 1),
            ("wooden_axe", 1),
        ];
        let storage = ["coal", "iron_ore", "cobblestone", "oak_planks", "stick"];

        for (slot, (item, count)) in hotbar.into_iter().enumerate() {
            inventory.slots[slot] = ItemStack::new(item, count);
        }
        for (offset, item) in storage.into_iter().enumerate() {
            inventory.slots[HOTBAR_SLOTS + offset] = ItemStack::new(item, 32);
        }
        inventory
    }

    /// Builds an inventory from saved slots.
    ///
    /// Returns `None` unless there are exactly [`INVENTORY_SLOTS`] slots, each
    /// with at most [`MAX_STACK_SIZE`] items.
    #[must_use]
    pub fn from_slots(slots: Vec<ItemStack>) -> Option<Self> {
        if slots.len() != INVENTORY_SLOTS || slots.iter().any(|s| s.count > MAX_STACK_SIZE) {
            return None;
        }
        let mut inventory = Self { slots };
        for slot in &mut inventory.slots {
            if slot.is_empty() {
                slot.clear();
            }
        }
        Some(inventory)
    }

    /// Every slot, hotbar first.
    #[inline]
    #[must_use]
    pub fn slots(&self) -> &[ItemStack] {
        &self.slots
    }

    /// The hotbar slots.
    #[inline]
    #[must_use]
    pub fn hotbar(&self) -> &[ItemStack] {
        &self.slots[..HOTBAR_SLOTS]
    }

    /// Gets the stack at a slot.
    #[inline]
    #[must_use]
    pub fn get(&self, slot: usize) -> Option<&ItemStack> {
        self.slots.get(slot)
    }

    /// Number of non-empty slots.
    #[must_use]
    pub fn used_slots(&self) -> usize {
        self.slots.iter().filter(|s| !s.is_empty()).count()
    }

    /// Counts one item across every slot.
    #[must_use]
    pub fn count_item(&self, item: &str) -> u32 {
        self.slots
            .iter()
            .filter(|s| s.item() == Some(item))
            .map(|s| s.count)
            .sum()
    }

    /// First slot holding `item`.
    #[must_use]
    pub fn find_item(&self, item: &str) -> Option<usize> {
        self.slots.iter().position(|s| s.item() == Some(item))
    }

    /// First empty slot.
    #[must_use]
    pub fn find_empty_slot(&self) -> Option<usize> {
        self.slots.iter().position(ItemStack::is_empty)
    }

    /// How many more of `item` fit.
    #[must_use]
    pub fn room_for(&self, item: &str) -> u32 {
        self.slots
            .iter()
            .map(|s| {
                if s.is_empty() {
                    MAX_STACK_SIZE
                } else if s.item() == Some(item) {
                    MAX_STACK_SIZE - s.count
                } else {
                    0
                }
            })
            .sum()
    }

    /// Adds items, topping up matching stacks before opening empty slots.
    ///
    /// # Errors
    ///
    /// Returns [`InventoryError::Full`] without changing anything if the
    /// items do not all fit.
    pub fn add(&mut self, item: &str, count: u32) -> InventoryResult<()> {
        if self.room_for(item) < count {
            return Err(InventoryError::Full {
                item: item.to_string(),
                amount: count,
            });
        }

        let mut remaining = count;
        for slot in &mut self.slots {
            if remaining == 0 {
                break;
            }
            if slot.accepts(item) {
                let moved = (MAX_STACK_SIZE - slot.count).min(remaining);
                slot.count += moved;
                remaining -= moved;
            }
        }

        while remaining > 0 {
            let Some(index) = self.find_empty_slot() else {
                break;
            };
            let moved = remaining.min(MAX_STACK_SIZE);
            self.slots[index] = ItemStack::new(item, moved);
            remaining -= moved;
        }

        Ok(())
    }

    /// Removes items from the earliest slots holding them.
    ///
    /// # Errors
    ///
    /// Returns [`InventoryError::Insufficient`] without changing anything if
    /// fewer than `count` are held.
    pub fn remove(&mut self, item: &str, count: u32) -> InventoryResult<()> {
        let available = self.count_item(item);
        if available < count {
            return Err(InventoryError::Insufficient {
                item: item.to_string(),
                required: count,
                available,
            });
        }

        let mut remaining = count;
        for slot in &mut self.slots {
            if remaining == 0 {
                break;
            }
            if slot.item() == Some(item) {
                let taken = slot.count.min(remaining);
                slot.count -= taken;
                remaining -= taken;
                if slot.count == 0 {
                    slot.clear();
                }
            }
        }

        Ok(())
    }

    /// Takes one item out of a slot and returns its name.
    ///
    /// # Errors
    ///
    /// Returns [`InventoryError::InvalidSlot`] for an index past the end and
    /// [`InventoryError::Insufficient`] for an empty slot.
    pub fn take_one(&mut self, slot: usize) -> InventoryResult<String> {
        let stack = self
            .slots
            .get_mut(slot)
            .ok_or(InventoryError::InvalidSlot(slot))?;
        let Some(item) = stack.item().map(str::to_string) else {
            return Err(InventoryError::Insufficient {
                item: String::new(),
                required: 1,
                available: 0,
            });
        };

        stack.count -= 1;
        if stack.count == 0 {
            stack.clear();
        }
        Ok(item)
    }
}

impl Default for Inventory {
    fn default() -> Self {
        Self::new()
    }
}

impl TryFrom<Vec<ItemStack>> for Inventory {
    type Error = String;

    fn try_from(slots: Vec<ItemStack>) -> Result<Self, Self::Error> {
        let len = slots.len();
        Self::from_slots(slots).ok_or_else(|| {
            format!("expected {INVENTORY_SLOTS} slots of at most {MAX_STACK_SIZE} items, got {len} slots")
        })
    }
}

impl From<Inventory> for Vec<ItemStack> {
    fn from(inventory: Inventory) -> Self {
        inventory.slots
    }
}
