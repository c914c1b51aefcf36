// Gtmacro Config API
// TOML configuration for the add-on runtime

pub mod parser;

pub use parser::{
    AddonKind, AssistConfig, BoosterConfig, Config, ConfigError, GeneralConfig, HealerConfig,
    MacrosConfig, NumpadConfig, RangerConfig,
};

/// Create default config content for a new installation
///
/// Parsing this template yields exactly [`Config::default`].
pub fn default_config_content() -> &'static str {
    r#"# gtmacro configuration
# Place this file at: ~/.config/gtmacro/config.toml
# Every table and key is optional; missing keys keep these defaults.

[general]
# Poll loop sampling interval in milliseconds
poll_interval_ms = 50
# Add-ons to load, in registration order. When two add-ons register the
# same command the first one wins ("booster" shares f1-f5 with "healer"
# and "macros").
addons = ["healer", "numpad", "ranger", "assist", "progress", "macros"]
# Directory for <player>.log console logs (disabled when unset)
# log_dir = "logs"

[healer]
vocabulary = ["caduceus", "mercurial staff", "asklepian", "asklepian staff"]
radium_marker = "asklepian"
disabled_marker = "chain"
self_heal_item = "moonstone"
heal_click = "RightClick"
pendant_slot = ["purgatory"]
pendant_name = "purgatory pendant"
pendant_token = "purgatorypendant"

[numpad]
capture_click = "Alt+Shift+RightClick"

[ranger]
first_morph = "Giant Carnivorous Plankton"
second_morph = "Young Sasquatch"
belt_name = "belt of the wild"
belt_token = "beltofthewild"
waist_slot = ["belt"]
charm_name = "Heartwood Charm"
charm_token = "heartwood"
left_slot = ["heartwood"]

[booster]
range_steps = [25, 50, 75, 100]
range = 25
power_steps = [33, 66, 83, 100]
power = 100
staff_name = "staff of ballou"
staff_token = "staffofballou"
rod_name = "rod of akea"
rod_token = "rodofakea"
restore_delay_ms = 2000
balance_lead_ms = 1000
balance_delay_ms = 4000

[assist]
money_interval_secs = 280
trade_pattern = 'To accept.*\\buy 0\s+(\S+)'
boat_patterns = [
    'Ah,\s*{player}\.\s*My fine boats cost\s*\d+\s*copper pennies\. Would you like to rent one now\?',
    'Hello,\s*{player}\. I can sell you a river skiff\. Interested\? It costs\s*\d+\s*coins\.',
]

[macros]
f4 = "/whisper Attack"
f5 = "/whisper Stay"
f6 = "/whisper Obey"
f9 = "/whisper Go home"
befriend = "/befriend"
control = "/control"
dismiss = "/dismiss"
wave = "/pose wave"
bow = "/pose bow"
cheer = "/pose cheer"
eqcharm = "/equip heartwood"
eqbelt = "/equip beltofthewild"

[hotkeys]
# Override or add key bindings: hotkey = command line
# "F1" = "/_firstMorph"
# "Ctrl+Num0" = "/healSlot 0"
"#
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_content_matches_defaults() {
        let config = Config::from_toml(default_config_content()).unwrap();
        assert_eq!(config, Config::default());
    }
}
