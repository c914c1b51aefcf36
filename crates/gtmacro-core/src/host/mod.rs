//! Host capability surface
//!
//! The game client owns command registration, equipment, input state and the
//! console. Add-ons only ever talk to it through [`Host`].

mod recording;

pub use recording::{HostCall, RecordingHost};

use crate::equipment::{EquippedItem, InventoryItem, ItemId};
use crate::hotkey::{Hotkey, MouseButton};
use crate::modifier::Modifier;

/// The entity the player last clicked on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClickTarget {
    /// Display name of the clicked mobile
    pub name: String,
}

impl ClickTarget {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Capabilities the game client provides to add-ons
///
/// Every call is synchronous and fire-and-forget from the add-on's point of
/// view: commands have no acknowledgement and queries are point-in-time
/// snapshots.
pub trait Host: Send + Sync {
    /// Name of the logged-in character
    fn player_name(&self) -> String;

    /// Snapshot of the worn/held items
    fn equipped_items(&self) -> Vec<EquippedItem>;

    /// Snapshot of the carried inventory
    fn inventory(&self) -> Vec<InventoryItem>;

    /// Send a free-form game command ("/equip caduceus", "/use Bob")
    fn run_command(&self, command: &str);

    /// Equip an inventory item by id
    fn equip(&self, id: ItemId);

    /// Unequip an inventory item by id
    fn unequip(&self, id: ItemId);

    /// Print a line to the in-client console
    fn console(&self, text: &str);

    /// Show a transient notification
    fn notify(&self, text: &str);

    /// The entity under the last click, if it was a mobile
    fn last_click(&self) -> Option<ClickTarget>;

    /// Level state of a mouse button
    fn mouse_down(&self, button: MouseButton) -> bool;

    /// Level state of a keyboard modifier
    fn modifier_held(&self, modifier: Modifier) -> bool;

    /// Bind a key combination to a command line
    fn bind_hotkey(&self, hotkey: &Hotkey, command: &str);
}
