use std::fmt;
use std::time::Duration;

use crate::restore::RestoreTicket;

/// A corrective action produced by a mode transition
///
/// Actions are plain data; the [`ActionEmitter`](crate::emitter::ActionEmitter)
/// turns them into host calls, strictly in order.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Free-form game command, sent verbatim
    Command(String),
    /// `/equip <item>`
    Equip(String),
    /// `/unequip <item>`
    Unequip(String),
    /// `/use [args]`
    Use(String),
    /// `/useitem <item> [args]`
    UseItem { item: String, args: String },
    /// Equip the inventory item with this name by id
    EquipFromInventory(String),
    /// Unequip the inventory item with this name by id
    UnequipFromInventory(String),
    /// Line in the in-client console
    Console(String),
    /// Transient notification
    Notify(String),
    /// Pause before the next action of the same batch
    Wait(Duration),
    /// Deferred restoration of a temporarily replaced item
    Restore(RestoreTicket),
}

impl Action {
    pub fn command(text: impl Into<String>) -> Self {
        Action::Command(text.into())
    }

    pub fn console(text: impl Into<String>) -> Self {
        Action::Console(text.into())
    }

    pub fn use_on(args: impl Into<String>) -> Self {
        Action::Use(args.into())
    }

    pub fn use_item(item: impl Into<String>, args: impl Into<String>) -> Self {
        Action::UseItem {
            item: item.into(),
            args: args.into(),
        }
    }

    /// The game command this action sends, if it is a plain command
    pub fn command_text(&self) -> Option<String> {
        match self {
            Action::Command(text) => Some(text.clone()),
            Action::Equip(item) => Some(format!("/equip {}", item)),
            Action::Unequip(item) => Some(format!("/unequip {}", item)),
            Action::Use(args) if args.is_empty() => Some("/use".to_string()),
            Action::Use(args) => Some(format!("/use {}", args)),
            Action::UseItem { item, args } if args.is_empty() => Some(format!("/useitem {}", item)),
            Action::UseItem { item, args } => Some(format!("/useitem {} {}", item, args)),
            _ => None,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(command) = self.command_text() {
            return write!(f, "{}", command);
        }
        match self {
            Action::EquipFromInventory(item) => write!(f, "equip({})", item),
            Action::UnequipFromInventory(item) => write!(f, "unequip({})", item),
            Action::Console(text) => write!(f, "console({})", text),
            Action::Notify(text) => write!(f, "notify({})", text),
            Action::Wait(delay) => write!(f, "wait({}ms)", delay.as_millis()),
            Action::Restore(ticket) => write!(
                f,
                "restore(gen {} after {}ms)",
                ticket.generation(),
                ticket.delay().as_millis()
            ),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_text() {
        assert_eq!(Action::Equip("Caduceus".into()).command_text().unwrap(), "/equip Caduceus");
        assert_eq!(Action::use_on("").command_text().unwrap(), "/use");
        assert_eq!(Action::use_on("/pet").command_text().unwrap(), "/use /pet");
        assert_eq!(
            Action::use_item("beltofthewild", "/return").command_text().unwrap(),
            "/useitem beltofthewild /return"
        );
        assert_eq!(Action::use_item("left", "").command_text().unwrap(), "/useitem left");
        assert_eq!(Action::console("hi").command_text(), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(Action::Unequip("heartwood".into()).to_string(), "/unequip heartwood");
        assert_eq!(Action::Wait(Duration::from_secs(1)).to_string(), "wait(1000ms)");
        assert_eq!(
            Action::EquipFromInventory("heartwood".into()).to_string(),
            "equip(heartwood)"
        );
    }
}
