// Gtmacro Recording Host
// In-memory host that records every call and simulates equipment changes

use std::collections::HashSet;

use parking_lot::Mutex;

use super::{ClickTarget, Host};
use crate::equipment::{find_in_inventory, names_match, EquippedItem, InventoryItem, ItemId};
use crate::hotkey::{Hotkey, MouseButton};
use crate::modifier::Modifier;

/// A call an add-on made against the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCall {
    Command(String),
    Equip(ItemId),
    Unequip(ItemId),
    Console(String),
    Notify(String),
    Bind { hotkey: String, command: String },
}

#[derive(Debug, Default)]
struct HostState {
    player: String,
    equipped: Vec<EquippedItem>,
    inventory: Vec<InventoryItem>,
    click: Option<ClickTarget>,
    buttons: HashSet<MouseButton>,
    modifiers: HashSet<Modifier>,
    calls: Vec<HostCall>,
}

/// Host implementation backed by plain memory
///
/// Used by the replay CLI and by tests. Besides recording calls it keeps the
/// equipment snapshot plausible: `/equip <name>` and `/unequip <name>`
/// commands move the matching inventory item into or out of the main hand,
/// and [`Host::equip`] by id wears the item without taking the hand.
#[derive(Debug, Default)]
pub struct RecordingHost {
    state: Mutex<HostState>,
}

impl RecordingHost {
    pub fn new(player: impl Into<String>) -> Self {
        Self {
            state: Mutex::new(HostState {
                player: player.into(),
                ..HostState::default()
            }),
        }
    }

    /// Put an item in the main hand (front of the equipped list)
    pub fn hold(&self, name: &str) {
        let mut state = self.state.lock();
        state.equipped.retain(|item| !names_match(&item.name, name));
        state.equipped.insert(0, EquippedItem::new(name, true));
    }

    /// Wear an item outside the main hand
    pub fn wear(&self, name: &str) {
        let mut state = self.state.lock();
        state.equipped.retain(|item| !names_match(&item.name, name));
        state.equipped.push(EquippedItem::new(name, true));
    }

    /// Take an item off
    pub fn remove(&self, name: &str) {
        self.state
            .lock()
            .equipped
            .retain(|item| !names_match(&item.name, name));
    }

    pub fn set_equipped(&self, items: Vec<EquippedItem>) {
        self.state.lock().equipped = items;
    }

    /// Add an item to the carried inventory
    pub fn carry(&self, id: u32, name: &str) {
        self.state.lock().inventory.push(InventoryItem::new(id, name));
    }

    pub fn set_click(&self, target: Option<&str>) {
        self.state.lock().click = target.map(ClickTarget::new);
    }

    pub fn set_button(&self, button: MouseButton, down: bool) {
        let mut state = self.state.lock();
        if down {
            state.buttons.insert(button);
        } else {
            state.buttons.remove(&button);
        }
    }

    pub fn set_modifier(&self, modifier: Modifier, held: bool) {
        let mut state = self.state.lock();
        if held {
            state.modifiers.insert(modifier);
        } else {
            state.modifiers.remove(&modifier);
        }
    }

    /// Every call so far, in order
    pub fn calls(&self) -> Vec<HostCall> {
        self.state.lock().calls.clone()
    }

    /// Drain the recorded calls
    pub fn take_calls(&self) -> Vec<HostCall> {
        std::mem::take(&mut self.state.lock().calls)
    }

    /// Game commands sent so far
    pub fn commands(&self) -> Vec<String> {
        self.state
            .lock()
            .calls
            .iter()
            .filter_map(|call| match call {
                HostCall::Command(command) => Some(command.clone()),
                _ => None,
            })
            .collect()
    }

    /// Console lines printed so far
    pub fn console_lines(&self) -> Vec<String> {
        self.state
            .lock()
            .calls
            .iter()
            .filter_map(|call| match call {
                HostCall::Console(text) => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    fn simulate_command(state: &mut HostState, command: &str) {
        let (verb, rest) = match command.split_once(' ') {
            Some((verb, rest)) => (verb, rest.trim()),
            None => return,
        };
        let found = find_in_inventory(&state.inventory, rest).map(|item| item.name.clone());
        let name = found.unwrap_or_else(|| rest.to_string());
        match verb {
            "/equip" => {
                state.equipped.retain(|item| !names_match(&item.name, &name));
                state.equipped.insert(0, EquippedItem::new(name, true));
            }
            "/unequip" => state.equipped.retain(|item| !names_match(&item.name, &name)),
            _ => {}
        }
    }
}

impl Host for RecordingHost {
    fn player_name(&self) -> String {
        self.state.lock().player.clone()
    }

    fn equipped_items(&self) -> Vec<EquippedItem> {
        self.state.lock().equipped.clone()
    }

    fn inventory(&self) -> Vec<InventoryItem> {
        self.state.lock().inventory.clone()
    }

    fn run_command(&self, command: &str) {
        let mut state = self.state.lock();
        state.calls.push(HostCall::Command(command.to_string()));
        Self::simulate_command(&mut state, command);
    }

    fn equip(&self, id: ItemId) {
        let mut state = self.state.lock();
        state.calls.push(HostCall::Equip(id));
        if let Some(name) = state
            .inventory
            .iter()
            .find(|item| item.id == id)
            .map(|item| item.name.clone())
        {
            state.equipped.retain(|item| !names_match(&item.name, &name));
            state.equipped.push(EquippedItem::new(name, true));
        }
    }

    fn unequip(&self, id: ItemId) {
        let mut state = self.state.lock();
        state.calls.push(HostCall::Unequip(id));
        if let Some(name) = state
            .inventory
            .iter()
            .find(|item| item.id == id)
            .map(|item| item.name.clone())
        {
            state.equipped.retain(|item| !names_match(&item.name, &name));
        }
    }

    fn console(&self, text: &str) {
        self.state.lock().calls.push(HostCall::Console(text.to_string()));
    }

    fn notify(&self, text: &str) {
        self.state.lock().calls.push(HostCall::Notify(text.to_string()));
    }

    fn last_click(&self) -> Option<ClickTarget> {
        self.state.lock().click.clone()
    }

    fn mouse_down(&self, button: MouseButton) -> bool {
        self.state.lock().buttons.contains(&button)
    }

    fn modifier_held(&self, modifier: Modifier) -> bool {
        self.state.lock().modifiers.contains(&modifier)
    }

    fn bind_hotkey(&self, hotkey: &Hotkey, command: &str) {
        self.state.lock().calls.push(HostCall::Bind {
            hotkey: hotkey.to_string(),
            command: command.to_string(),
        });
    }
}
