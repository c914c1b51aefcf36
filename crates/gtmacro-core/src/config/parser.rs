// Gtmacro Config Parser - TOML with Serde
// Parses the add-on configuration from TOML files

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use indexmap::IndexMap;
use serde::Deserialize;
use strum_macros::{Display, EnumIter, EnumString};

use crate::equipment::SlotQuery;
use crate::hotkey::{parse_hotkey, HotkeyParseError};
use crate::trigger::{RuleSpec, TriggerError};

/// Configuration parser errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(String),

    #[error("Invalid hotkey '{hotkey}': {source}")]
    InvalidHotkey {
        hotkey: String,
        #[source]
        source: HotkeyParseError,
    },

    #[error("Invalid trigger: {0}")]
    InvalidTrigger(#[from] TriggerError),

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
}

/// The add-ons a runtime can host
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum AddonKind {
    Healer,
    Numpad,
    Ranger,
    Booster,
    Assist,
    Progress,
    Macros,
}

/// Root configuration
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub general: GeneralConfig,
    pub healer: HealerConfig,
    pub numpad: NumpadConfig,
    pub ranger: RangerConfig,
    pub booster: BoosterConfig,
    pub assist: AssistConfig,
    /// Fixed command aliases: command name -> game command
    pub macros: MacrosConfig,
    /// Hotkey string -> command line; replaces the add-on default for that key
    pub hotkeys: IndexMap<String, String>,
}

/// General settings
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneralConfig {
    /// Poll loop sampling interval in milliseconds
    pub poll_interval_ms: u64,
    /// Add-ons to load, in registration order
    pub addons: Vec<AddonKind>,
    /// Directory for the per-player console log (disabled when unset)
    pub log_dir: Option<PathBuf>,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 50,
            addons: vec![
                AddonKind::Healer,
                AddonKind::Numpad,
                AddonKind::Ranger,
                AddonKind::Assist,
                AddonKind::Progress,
                AddonKind::Macros,
            ],
            log_dir: None,
        }
    }
}

impl GeneralConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn is_enabled(&self, addon: AddonKind) -> bool {
        self.addons.contains(&addon)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HealerConfig {
    /// Item names that can heal (case-insensitive exact match)
    pub vocabulary: Vec<String>,
    /// Substring of the bound item name that enables radium mode
    pub radium_marker: String,
    /// Substring of the held item that blocks every use action
    pub disabled_marker: String,
    /// Equipped after healing yourself
    pub self_heal_item: String,
    /// Mouse combination that heals the clicked target
    pub heal_click: String,
    pub pendant_slot: SlotQuery,
    pub pendant_name: String,
    pub pendant_token: String,
}

impl Default for HealerConfig {
    fn default() -> Self {
        Self {
            vocabulary: vec![
                "caduceus".to_string(),
                "mercurial staff".to_string(),
                "asklepian".to_string(),
                "asklepian staff".to_string(),
            ],
            radium_marker: "asklepian".to_string(),
            disabled_marker: "chain".to_string(),
            self_heal_item: "moonstone".to_string(),
            heal_click: "RightClick".to_string(),
            pendant_slot: SlotQuery::new(["purgatory"]),
            pendant_name: "purgatory pendant".to_string(),
            pendant_token: "purgatorypendant".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NumpadConfig {
    /// Mouse combination that captures the clicked name into the next slot
    pub capture_click: String,
}

impl Default for NumpadConfig {
    fn default() -> Self {
        Self {
            capture_click: "Alt+Shift+RightClick".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RangerConfig {
    pub first_morph: String,
    pub second_morph: String,
    pub belt_name: String,
    pub belt_token: String,
    pub waist_slot: SlotQuery,
    pub charm_name: String,
    pub charm_token: String,
    pub left_slot: SlotQuery,
}

impl Default for RangerConfig {
    fn default() -> Self {
        Self {
            first_morph: "Giant Carnivorous Plankton".to_string(),
            second_morph: "Young Sasquatch".to_string(),
            belt_name: "belt of the wild".to_string(),
            belt_token: "beltofthewild".to_string(),
            waist_slot: SlotQuery::new(["belt"]),
            charm_name: "Heartwood Charm".to_string(),
            charm_token: "heartwood".to_string(),
            left_slot: SlotQuery::new(["heartwood"]),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BoosterConfig {
    pub range_steps: Vec<u32>,
    pub range: u32,
    pub power_steps: Vec<u32>,
    pub power: u32,
    pub staff_name: String,
    pub staff_token: String,
    pub rod_name: String,
    pub rod_token: String,
    /// Delay before the replaced item is put back
    pub restore_delay_ms: u64,
    /// Pause between equipping the staff and the balance announcement
    pub balance_lead_ms: u64,
    /// Pause between the balance announcement and the boost
    pub balance_delay_ms: u64,
}

impl Default for BoosterConfig {
    fn default() -> Self {
        Self {
            range_steps: vec![25, 50, 75, 100],
            range: 25,
            power_steps: vec![33, 66, 83, 100],
            power: 100,
            staff_name: "staff of ballou".to_string(),
            staff_token: "staffofballou".to_string(),
            rod_name: "rod of akea".to_string(),
            rod_token: "rodofakea".to_string(),
            restore_delay_ms: 2000,
            balance_lead_ms: 1000,
            balance_delay_ms: 4000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AssistConfig {
    /// Seconds between `/money` commands while auto mate is on
    pub money_interval_secs: u64,
    /// Zero-copper trade offer; the first capture is the trader
    pub trade_pattern: String,
    /// Boarding prompts addressed to `{player}`
    pub boat_patterns: Vec<String>,
}

impl Default for AssistConfig {
    fn default() -> Self {
        Self {
            money_interval_secs: 280,
            trade_pattern: r"To accept.*\\buy 0\s+(\S+)".to_string(),
            boat_patterns: vec![
                r"Ah,\s*{player}\.\s*My fine boats cost\s*\d+\s*copper pennies\. Would you like to rent one now\?"
                    .to_string(),
                r"Hello,\s*{player}\. I can sell you a river skiff\. Interested\? It costs\s*\d+\s*coins\."
                    .to_string(),
            ],
        }
    }
}

/// Command aliases, in declaration order
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct MacrosConfig(pub IndexMap<String, String>);

impl Default for MacrosConfig {
    fn default() -> Self {
        let pairs = [
            ("f4", "/whisper Attack"),
            ("f5", "/whisper Stay"),
            ("f6", "/whisper Obey"),
            ("f9", "/whisper Go home"),
            ("befriend", "/befriend"),
            ("control", "/control"),
            ("dismiss", "/dismiss"),
            ("wave", "/pose wave"),
            ("bow", "/pose bow"),
            ("cheer", "/pose cheer"),
            ("eqcharm", "/equip heartwood"),
            ("eqbelt", "/equip beltofthewild"),
        ];
        Self(
            pairs
                .iter()
                .map(|(name, command)| (name.to_string(), command.to_string()))
                .collect(),
        )
    }
}

impl Config {
    /// Parse a TOML configuration file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse and validate configuration from a TOML string
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Config =
            toml::from_str(content).map_err(|e| ConfigError::TomlParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default config path
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("gtmacro").join("config.toml"))
    }

    /// Load from the default location, falling back to built-in defaults
    pub fn load_default() -> Result<Self, ConfigError> {
        if let Some(path) = Self::default_path() {
            if path.exists() {
                return Self::from_file(path);
            }
        }
        Ok(Self::default())
    }

    /// Check everything that would otherwise only fail at runtime
    ///
    /// Hotkeys are parsed and trigger patterns compiled against a sample
    /// player name, so a bad config is rejected at load time.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.general.poll_interval_ms == 0 {
            return Err(invalid("general.poll_interval_ms", "must be at least 1"));
        }
        for (index, addon) in self.general.addons.iter().enumerate() {
            if self.general.addons[..index].contains(addon) {
                return Err(invalid(
                    "general.addons",
                    format!("'{}' is listed more than once", addon),
                ));
            }
        }

        for hotkey in self.hotkeys.keys() {
            check_hotkey(hotkey)?;
        }
        for (hotkey, command) in &self.hotkeys {
            if !command.trim_start().starts_with('/') {
                return Err(invalid(
                    format!("hotkeys.\"{}\"", hotkey),
                    "command must start with '/'",
                ));
            }
        }
        check_hotkey(&self.healer.heal_click)?;
        check_hotkey(&self.numpad.capture_click)?;

        if self.healer.vocabulary.is_empty() {
            return Err(invalid("healer.vocabulary", "must name at least one item"));
        }
        if self.booster.range_steps.is_empty() {
            return Err(invalid("booster.range_steps", "must not be empty"));
        }
        if self.booster.power_steps.is_empty() {
            return Err(invalid("booster.power_steps", "must not be empty"));
        }
        if self.assist.money_interval_secs == 0 {
            return Err(invalid("assist.money_interval_secs", "must be at least 1"));
        }

        RuleSpec::regex(self.assist.trade_pattern.as_str(), ()).compile("Player")?;
        for pattern in &self.assist.boat_patterns {
            RuleSpec::regex(pattern.as_str(), ()).compile("Player")?;
        }

        for (name, command) in &self.macros.0 {
            if name.trim().is_empty() || name.contains(char::is_whitespace) {
                return Err(invalid("macros", format!("invalid command name '{}'", name)));
            }
            if !command.trim_start().starts_with('/') {
                return Err(invalid(
                    format!("macros.{}", name),
                    "command must start with '/'",
                ));
            }
        }
        Ok(())
    }
}

fn check_hotkey(hotkey: &str) -> Result<(), ConfigError> {
    parse_hotkey(hotkey)
        .map(|_| ())
        .map_err(|source| ConfigError::InvalidHotkey {
            hotkey: hotkey.to_string(),
            source,
        })
}

fn invalid(field: impl Into<String>, reason: impl Into<String>) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.into(),
        reason: reason.into(),
    }
}
