// Gtmacro Healer
// Healer item binding, guarded heals on right-click and F-key abilities

use std::sync::Arc;

use parking_lot::Mutex;

use super::{config_hotkey, Addon, Context};
use crate::action::Action;
use crate::config::{ConfigError, HealerConfig};
use crate::equipment::{names_match, SlotQuery};
use crate::event::PollBinding;
use crate::guard::{needs_equip, DisabledGuard, GuardError};
use crate::hotkey::Hotkey;
use crate::mode::{CapabilityVocabulary, ItemSelection};

/// Poll binding id for click-to-heal
pub const HEAL_CLICK: &str = "heal";

/// The bound healer item, shared by every add-on that heals
///
/// Holds the item-selection mode plus the guard and the equip-before-use
/// policy that apply to it.
#[derive(Debug)]
pub struct HealerItem {
    vocabulary: CapabilityVocabulary,
    radium_marker: String,
    guard: DisabledGuard,
    selection: Mutex<ItemSelection>,
}

impl HealerItem {
    pub fn new(config: &HealerConfig) -> Self {
        Self {
            vocabulary: CapabilityVocabulary::new(config.vocabulary.iter().cloned()),
            radium_marker: config.radium_marker.to_lowercase(),
            guard: DisabledGuard::new(&config.disabled_marker),
            selection: Mutex::new(ItemSelection::default()),
        }
    }

    pub fn bound(&self) -> Option<String> {
        self.selection.lock().bound().map(str::to_string)
    }

    /// Whether the bound item supports radium mode
    pub fn radium_capable(&self) -> bool {
        !self.radium_marker.is_empty()
            && self
                .bound()
                .is_some_and(|item| item.to_lowercase().contains(&self.radium_marker))
    }

    /// Rebind from the live equipment and report the result
    pub fn rescan(&self, cx: &Context<'_>) -> Vec<Action> {
        let equipped = cx.equipped();
        let mut selection = self.selection.lock();
        let message = match selection.rescan(&equipped, &self.vocabulary) {
            Some(item) => format!("* Healer Item set to {}", item),
            None => "* No healer item equipped".to_string(),
        };
        log::debug!("healer binding: {:?}", selection.bound());
        vec![Action::console(message)]
    }

    /// Check the disabled-item guard against the live held item
    pub fn check(&self, cx: &Context<'_>) -> Result<(), GuardError> {
        self.guard.check(cx.held().as_deref())
    }

    /// Equip-before-use for the bound item
    ///
    /// Nothing is owed when no item is bound or it is already held.
    pub fn prepare(&self, cx: &Context<'_>) -> Vec<Action> {
        match self.bound() {
            Some(item) if needs_equip(cx.held().as_deref(), &item) => vec![Action::Equip(item)],
            _ => Vec::new(),
        }
    }
}

/// Guard refusal as the console notice it produces
pub(crate) fn refused(err: GuardError) -> Vec<Action> {
    log::debug!("action refused: {:?}", err);
    vec![Action::console(err.to_string())]
}

/// Healer add-on
pub struct Healer {
    item: Arc<HealerItem>,
    heal_click: Hotkey,
    self_heal_item: String,
    pendant_slot: SlotQuery,
    pendant_name: String,
    pendant_token: String,
}

impl Healer {
    pub fn new(config: &HealerConfig, item: Arc<HealerItem>) -> Result<Self, ConfigError> {
        Ok(Self {
            item,
            heal_click: config_hotkey(&config.heal_click)?,
            self_heal_item: config.self_heal_item.clone(),
            pendant_slot: config.pendant_slot.clone(),
            pendant_name: config.pendant_name.clone(),
            pendant_token: config.pendant_token.clone(),
        })
    }

    pub fn item(&self) -> &Arc<HealerItem> {
        &self.item
    }

    /// Heal the clicked target, or switch healing off when nothing is clicked
    fn click_heal(&self, cx: &Context<'_>) -> Vec<Action> {
        if let Err(err) = self.item.check(cx) {
            return refused(err);
        }
        let target = cx.clicked();
        let mut actions = self.item.prepare(cx);
        match &target {
            Some(name) => {
                actions.push(Action::use_on(name.as_str()));
                actions.push(Action::console(format!("* Healing {}", name)));
            }
            None => actions.push(Action::use_on("/off")),
        }
        if target.is_some_and(|name| names_match(&name, &cx.player())) {
            actions.push(Action::Equip(self.self_heal_item.clone()));
        }
        actions
    }

    fn radium(&self, cx: &Context<'_>) -> Vec<Action> {
        if let Err(err) = self.item.check(cx) {
            return refused(err);
        }
        if !self.item.radium_capable() {
            return vec![Action::console("* Your healer item isn't capable of that")];
        }
        let mut actions = self.item.prepare(cx);
        actions.push(Action::use_on(""));
        actions.push(Action::console("* Radium Mode"));
        actions
    }

    fn pet(&self, cx: &Context<'_>) -> Vec<Action> {
        if let Err(err) = self.item.check(cx) {
            return refused(err);
        }
        let mut actions = self.item.prepare(cx);
        actions.push(Action::use_on("/pet"));
        actions
    }

    fn pendant(&self, cx: &Context<'_>) -> Vec<Action> {
        let mut actions = Vec::new();
        if needs_equip(cx.slot(&self.pendant_slot).as_deref(), &self.pendant_name) {
            actions.push(Action::Equip(self.pendant_token.clone()));
        }
        actions.push(Action::use_item(self.pendant_token.as_str(), ""));
        actions
    }
}

impl Addon for Healer {
    fn name(&self) -> &'static str {
        "healer"
    }

    fn commands(&self) -> Vec<String> {
        ["hi", "f1", "f3", "f10"].iter().map(|c| c.to_string()).collect()
    }

    fn poll_bindings(&self) -> Vec<PollBinding> {
        vec![PollBinding::new(HEAL_CLICK, self.heal_click.clone())]
    }

    fn on_start(&self, cx: &Context<'_>) -> Vec<Action> {
        self.item.rescan(cx)
    }

    fn on_command(&self, cx: &Context<'_>, command: &str, _args: &str) -> Vec<Action> {
        match command {
            "hi" => self.item.rescan(cx),
            "f1" => self.radium(cx),
            "f3" => self.pet(cx),
            "f10" => self.pendant(cx),
            _ => Vec::new(),
        }
    }

    fn on_poll(&self, cx: &Context<'_>, binding: &str) -> Vec<Action> {
        match binding {
            HEAL_CLICK => self.click_heal(cx),
            _ => Vec::new(),
        }
    }
}
