// Gtmacro Macros
// Fixed command aliases (whispers, poses, fixed equips)

use indexmap::IndexMap;

use super::{Addon, Context, HotkeyBinding};
use crate::action::Action;
use crate::config::MacrosConfig;
use crate::hotkey::parse_hotkey;

/// Default key bindings, applied only for aliases that exist
const DEFAULT_KEYS: [(&str, &str); 8] = [
    ("F5", "befriend"),
    ("F6", "control"),
    ("F7", "dismiss"),
    ("Ctrl+1", "wave"),
    ("Ctrl+2", "bow"),
    ("Ctrl+3", "cheer"),
    ("Alt+1", "eqcharm"),
    ("Alt+2", "eqbelt"),
];

pub struct Macros {
    aliases: IndexMap<String, String>,
}

impl Macros {
    pub fn new(config: &MacrosConfig) -> Self {
        Self {
            aliases: config.0.clone(),
        }
    }
}

impl Addon for Macros {
    fn name(&self) -> &'static str {
        "macros"
    }

    fn commands(&self) -> Vec<String> {
        self.aliases.keys().cloned().collect()
    }

    fn hotkeys(&self) -> Vec<HotkeyBinding> {
        DEFAULT_KEYS
            .iter()
            .filter(|(_, alias)| self.aliases.contains_key(*alias))
            .filter_map(|(key, alias)| {
                parse_hotkey(key)
                    .ok()
                    .map(|hotkey| HotkeyBinding::new(hotkey, format!("/{}", alias)))
            })
            .collect()
    }

    fn on_command(&self, _cx: &Context<'_>, command: &str, args: &str) -> Vec<Action> {
        match self.aliases.get(command) {
            Some(text) if args.is_empty() => vec![Action::command(text.trim_end())],
            Some(text) => vec![Action::command(format!("{} {}", text.trim_end(), args))],
            None => Vec::new(),
        }
    }
}
