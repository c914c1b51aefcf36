// Gtmacro Hotkey Type
// Key and mouse combinations with modifiers, parsed from strings like "Ctrl+Num0"

use std::fmt;

use smallvec::SmallVec;
use strum_macros::{Display, EnumString};

use crate::modifier::Modifier;

/// Mouse buttons the host reports edge/level state for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum MouseButton {
    #[strum(serialize = "Left", serialize = "LeftClick", serialize = "LMB", to_string = "Left")]
    Left,
    #[strum(serialize = "Right", serialize = "RightClick", serialize = "RMB", to_string = "Right")]
    Right,
    #[strum(serialize = "Middle", serialize = "MiddleClick", serialize = "MMB", to_string = "Middle")]
    Middle,
}

/// The non-modifier part of a hotkey
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum InputKey {
    /// A keyboard key, stored with the spelling the host expects ("F1", "num0")
    Key(String),
    /// A mouse button
    Mouse(MouseButton),
}

impl fmt::Display for InputKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputKey::Key(name) => write!(f, "{}", name),
            InputKey::Mouse(button) => write!(f, "{}Click", button),
        }
    }
}

/// Errors that can occur while parsing a hotkey string
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HotkeyParseError {
    #[error("hotkey string cannot be empty")]
    EmptyInput,

    #[error("unknown modifier: '{0}'")]
    UnknownModifier(String),

    #[error("hotkey string cannot end with a separator")]
    TrailingSeparator,
}

/// A key or mouse combination with an order-independent set of modifiers
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Hotkey {
    modifiers: SmallVec<[Modifier; 4]>,
    key: InputKey,
}

impl Hotkey {
    /// Create a hotkey; modifiers are sorted and deduplicated
    pub fn new(modifiers: impl IntoIterator<Item = Modifier>, key: InputKey) -> Self {
        let mut modifiers: SmallVec<[Modifier; 4]> = modifiers.into_iter().collect();
        modifiers.sort();
        modifiers.dedup();
        Self { modifiers, key }
    }

    /// A bare keyboard key with no modifiers
    pub fn key(name: impl Into<String>) -> Self {
        Self::new([], InputKey::Key(name.into()))
    }

    /// A mouse button with the given modifiers
    pub fn mouse(modifiers: impl IntoIterator<Item = Modifier>, button: MouseButton) -> Self {
        Self::new(modifiers, InputKey::Mouse(button))
    }

    pub fn modifiers(&self) -> &[Modifier] {
        &self.modifiers
    }

    pub fn input(&self) -> &InputKey {
        &self.key
    }

    /// The mouse button, if this is a mouse combination
    pub fn mouse_button(&self) -> Option<MouseButton> {
        match self.key {
            InputKey::Mouse(button) => Some(button),
            InputKey::Key(_) => None,
        }
    }
}

impl fmt::Display for Hotkey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for modifier in &self.modifiers {
            write!(f, "{}+", modifier)?;
        }
        write!(f, "{}", self.key)
    }
}

impl std::str::FromStr for Hotkey {
    type Err = HotkeyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_hotkey(s)
    }
}

/// Parse a hotkey string like "Ctrl+Num0", "Alt-Shift-RightClick" or "F1"
///
/// Components are separated by `+` or `-`. Every component except the last
/// must name a modifier; the last is a mouse button name or a keyboard key.
pub fn parse_hotkey(exp: &str) -> Result<Hotkey, HotkeyParseError> {
    let trimmed = exp.trim();
    if trimmed.is_empty() {
        return Err(HotkeyParseError::EmptyInput);
    }
    if trimmed.ends_with(['+', '-']) {
        return Err(HotkeyParseError::TrailingSeparator);
    }

    let parts: Vec<&str> = trimmed.split(['+', '-']).map(str::trim).collect();
    let (last, mods) = match parts.split_last() {
        Some(split) => split,
        None => return Err(HotkeyParseError::EmptyInput),
    };

    let mut modifiers = SmallVec::<[Modifier; 4]>::new();
    for part in mods {
        match Modifier::from_alias(part) {
            Some(modifier) => modifiers.push(modifier),
            None => return Err(HotkeyParseError::UnknownModifier(part.to_string())),
        }
    }

    let key = match last.parse::<MouseButton>() {
        Ok(button) => InputKey::Mouse(button),
        Err(_) => InputKey::Key(last.to_string()),
    };

    Ok(Hotkey::new(modifiers, key))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_key() {
        let hotkey = parse_hotkey("F1").unwrap();
        assert!(hotkey.modifiers().is_empty());
        assert_eq!(hotkey.input(), &InputKey::Key("F1".to_string()));
        assert_eq!(hotkey.mouse_button(), None);
    }

    #[test]
    fn test_parse_modified_key() {
        let hotkey = parse_hotkey("ctrl+num7").unwrap();
        assert_eq!(hotkey.modifiers(), &[Modifier::Ctrl]);
        assert_eq!(hotkey.input(), &InputKey::Key("num7".to_string()));
    }

    #[test]
    fn test_parse_mouse_combo_any_separator() {
        let a = parse_hotkey("Alt+Shift+RightClick").unwrap();
        let b = parse_hotkey("shift-alt-right").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.mouse_button(), Some(MouseButton::Right));
        assert_eq!(a.to_string(), "Alt+Shift+RightClick");
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(parse_hotkey(""), Err(HotkeyParseError::EmptyInput));
        assert_eq!(parse_hotkey("Ctrl+"), Err(HotkeyParseError::TrailingSeparator));
        assert_eq!(
            parse_hotkey("Hyper+F1"),
            Err(HotkeyParseError::UnknownModifier("Hyper".to_string()))
        );
        assert!(matches!(parse_hotkey("Ctrl++"), Err(HotkeyParseError::TrailingSeparator)));
    }

    #[test]
    fn test_modifier_order_irrelevant() {
        let a = Hotkey::mouse([Modifier::Shift, Modifier::Alt], MouseButton::Right);
        let b = Hotkey::mouse([Modifier::Alt, Modifier::Shift, Modifier::Alt], MouseButton::Right);
        assert_eq!(a, b);
        assert_eq!(a.modifiers().len(), 2);
    }
}
