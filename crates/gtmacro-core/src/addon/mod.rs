//! Feature controllers
//!
//! Each add-on owns its feature state behind its own lock. Entry points
//! (commands, chat lines, poll edges, ticks) compute an ordered list of
//! [`Action`]s while holding that lock and return it; the runtime emits the
//! actions after the lock is released, so a slow batch never blocks another
//! feature and two transitions of the same feature never interleave.

pub mod assist;
pub mod booster;
pub mod healer;
pub mod macros;
pub mod numpad;
pub mod progress;
pub mod ranger;

pub use assist::Assist;
pub use booster::Booster;
pub use healer::{Healer, HealerItem};
pub use macros::Macros;
pub use numpad::Numpad;
pub use progress::Progress;
pub use ranger::{Morph, Ranger};

use std::time::Instant;

use crate::action::Action;
use crate::config::ConfigError;
use crate::equipment::{find_equipped, held_item, EquippedItem, SlotQuery};
use crate::event::PollBinding;
use crate::host::Host;
use crate::hotkey::{parse_hotkey, Hotkey};

/// A default key binding an add-on asks the host for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HotkeyBinding {
    pub hotkey: Hotkey,
    /// Command line the key runs, e.g. "/healSlot 3"
    pub command: String,
}

impl HotkeyBinding {
    pub fn new(hotkey: Hotkey, command: impl Into<String>) -> Self {
        Self {
            hotkey,
            command: command.into(),
        }
    }
}

/// Read access to the host for one add-on invocation
///
/// Every query is a fresh snapshot; nothing is cached between calls.
#[derive(Clone, Copy)]
pub struct Context<'h> {
    host: &'h dyn Host,
}

impl<'h> Context<'h> {
    pub fn new(host: &'h dyn Host) -> Self {
        Self { host }
    }

    pub fn host(&self) -> &'h dyn Host {
        self.host
    }

    pub fn player(&self) -> String {
        self.host.player_name()
    }

    pub fn equipped(&self) -> Vec<EquippedItem> {
        self.host.equipped_items()
    }

    /// The main-hand item, if any
    pub fn held(&self) -> Option<String> {
        held_item(&self.equipped()).map(str::to_string)
    }

    /// The equipped item occupying a logical slot, if any
    pub fn slot(&self, query: &SlotQuery) -> Option<String> {
        find_equipped(&self.equipped(), query).map(str::to_string)
    }

    /// Display name of the last clicked mobile
    pub fn clicked(&self) -> Option<String> {
        self.host
            .last_click()
            .map(|target| target.name)
            .filter(|name| !name.trim().is_empty())
    }
}

/// An independently loadable feature
pub trait Addon: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Command names this add-on handles (without the leading '/')
    fn commands(&self) -> Vec<String>;

    /// Default key bindings
    fn hotkeys(&self) -> Vec<HotkeyBinding> {
        Vec::new()
    }

    /// Mouse combinations to poll
    fn poll_bindings(&self) -> Vec<PollBinding> {
        Vec::new()
    }

    /// Runs once when the runtime starts
    fn on_start(&self, _cx: &Context<'_>) -> Vec<Action> {
        Vec::new()
    }

    /// A registered command was invoked
    fn on_command(&self, cx: &Context<'_>, command: &str, args: &str) -> Vec<Action>;

    /// One incoming chat/log line
    fn on_chat(&self, _cx: &Context<'_>, _line: &str) -> Vec<Action> {
        Vec::new()
    }

    /// A poll binding this add-on declared has a rising edge
    fn on_poll(&self, _cx: &Context<'_>, _binding: &str) -> Vec<Action> {
        Vec::new()
    }

    /// Called on every poll tick
    fn on_tick(&self, _cx: &Context<'_>, _now: Instant) -> Vec<Action> {
        Vec::new()
    }
}

/// Parse a hotkey from configuration
pub(crate) fn config_hotkey(text: &str) -> Result<Hotkey, ConfigError> {
    parse_hotkey(text).map_err(|source| ConfigError::InvalidHotkey {
        hotkey: text.to_string(),
        source,
    })
}
