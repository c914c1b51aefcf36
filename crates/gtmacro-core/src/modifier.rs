// Gtmacro Modifier Keys
// Keyboard modifiers that qualify hotkeys and poll bindings (Shift, Ctrl, Alt, Meta)

use strum_macros::{Display, EnumIter, EnumString};

/// A keyboard modifier the host can report as held.
///
/// Parsing is case-insensitive and accepts the aliases the game client and
/// the usual hotkey notations use ("ctrl", "Control", "Cmd", ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumString, EnumIter)]
#[strum(ascii_case_insensitive)]
pub enum Modifier {
    #[strum(serialize = "Ctrl", serialize = "Control", serialize = "C", to_string = "Ctrl")]
    Ctrl,
    #[strum(serialize = "Alt", serialize = "Opt", serialize = "Option", serialize = "A", to_string = "Alt")]
    Alt,
    #[strum(serialize = "Shift", serialize = "S", to_string = "Shift")]
    Shift,
    #[strum(
        serialize = "Meta",
        serialize = "Super",
        serialize = "Win",
        serialize = "Cmd",
        serialize = "Command",
        to_string = "Meta"
    )]
    Meta,
}

impl Modifier {
    /// Look up a modifier by any of its aliases
    pub fn from_alias(alias: &str) -> Option<Self> {
        alias.trim().parse().ok()
    }
}
