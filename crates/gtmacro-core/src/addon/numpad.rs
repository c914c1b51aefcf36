// Gtmacro Numpad
// Ten remembered heal targets on Ctrl+Num0-9, captured with Alt+Shift+Right-click

use std::sync::Arc;

use parking_lot::Mutex;

use super::healer::{refused, HealerItem};
use super::{config_hotkey, Addon, Context, HotkeyBinding};
use crate::action::Action;
use crate::config::{ConfigError, NumpadConfig};
use crate::event::PollBinding;
use crate::hotkey::{Hotkey, InputKey};
use crate::modifier::Modifier;
use crate::state::{TargetSlotTable, SLOT_COUNT};

/// Poll binding id for click-to-capture
pub const CAPTURE_CLICK: &str = "capture";

pub struct Numpad {
    item: Arc<HealerItem>,
    /// Whether this add-on also provides `hi` and the start-up rescan
    owns_rescan: bool,
    capture_click: Hotkey,
    slots: Mutex<TargetSlotTable>,
}

impl Numpad {
    pub fn new(
        config: &NumpadConfig,
        item: Arc<HealerItem>,
        owns_rescan: bool,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            item,
            owns_rescan,
            capture_click: config_hotkey(&config.capture_click)?,
            slots: Mutex::new(TargetSlotTable::new()),
        })
    }

    pub fn slots(&self) -> TargetSlotTable {
        self.slots.lock().clone()
    }

    fn assign(&self, args: &str) -> Vec<Action> {
        let (index, name) = match args.trim().split_once(char::is_whitespace) {
            Some((index, name)) => (index, name.trim()),
            None => {
                log::debug!("num: expected '<slot> <name>', got '{}'", args);
                return Vec::new();
            }
        };
        let result = TargetSlotTable::parse_index(index)
            .and_then(|index| self.slots.lock().assign(index, name).map(|()| index));
        match result {
            Ok(index) => vec![Action::console(format!("{} assigned to Numpad {}", name, index))],
            Err(err) => {
                log::debug!("num: {}", err);
                Vec::new()
            }
        }
    }

    fn list(&self) -> Vec<Action> {
        let slots = self.slots.lock();
        let mut actions = vec![Action::console("* Numpad assignments:")];
        actions.extend(
            slots
                .entries()
                .map(|(index, name)| Action::console(format!("{}: {}", index, name))),
        );
        actions.push(Action::console("* ---- end ---- *"));
        actions
    }

    fn heal_slot(&self, cx: &Context<'_>, args: &str) -> Vec<Action> {
        let index = match TargetSlotTable::parse_index(args) {
            Ok(index) => index,
            Err(err) => {
                log::debug!("healSlot: {}", err);
                return Vec::new();
            }
        };
        let target = self.slots.lock().get(index).map(str::to_string);
        let Some(target) = target else {
            return vec![Action::console(format!("* No name stored in Numpad {}", index))];
        };
        if let Err(err) = self.item.check(cx) {
            return refused(err);
        }
        let mut actions = self.item.prepare(cx);
        actions.push(Action::console(format!("* healing {}", target)));
        actions.push(Action::use_on(target));
        actions
    }

    fn capture(&self, cx: &Context<'_>) -> Vec<Action> {
        let Some(name) = cx.clicked() else {
            return Vec::new();
        };
        match self.slots.lock().capture(&name) {
            Ok(index) => vec![Action::console(format!("{} assigned to Numpad {}", name, index))],
            Err(err) => {
                log::debug!("capture: {}", err);
                Vec::new()
            }
        }
    }
}

impl Addon for Numpad {
    fn name(&self) -> &'static str {
        "numpad"
    }

    fn commands(&self) -> Vec<String> {
        let mut commands: Vec<String> = ["num", "wn", "healSlot"].iter().map(|c| c.to_string()).collect();
        if self.owns_rescan {
            commands.push("hi".to_string());
        }
        commands
    }

    fn hotkeys(&self) -> Vec<HotkeyBinding> {
        (0..SLOT_COUNT)
            .map(|slot| {
                HotkeyBinding::new(
                    Hotkey::new([Modifier::Ctrl], InputKey::Key(format!("Num{}", slot))),
                    format!("/healSlot {}", slot),
                )
            })
            .collect()
    }

    fn poll_bindings(&self) -> Vec<PollBinding> {
        vec![PollBinding::new(CAPTURE_CLICK, self.capture_click.clone())]
    }

    fn on_start(&self, cx: &Context<'_>) -> Vec<Action> {
        if self.owns_rescan {
            self.item.rescan(cx)
        } else {
            Vec::new()
        }
    }

    fn on_command(&self, cx: &Context<'_>, command: &str, args: &str) -> Vec<Action> {
        match command {
            "num" => self.assign(args),
            "wn" => self.list(),
            "healSlot" => self.heal_slot(cx, args),
            "hi" if self.owns_rescan => self.item.rescan(cx),
            _ => Vec::new(),
        }
    }

    fn on_poll(&self, cx: &Context<'_>, binding: &str) -> Vec<Action> {
        match binding {
            CAPTURE_CLICK => self.capture(cx),
            _ => Vec::new(),
        }
    }
}
