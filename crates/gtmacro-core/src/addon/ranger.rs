// Gtmacro Ranger
// Belt morphs (exclusive choice) and the heartwood speed toggle, reconciled
// against what the server announces in chat

use parking_lot::Mutex;

use super::{Addon, Context, HotkeyBinding};
use crate::action::Action;
use crate::config::{ConfigError, RangerConfig};
use crate::equipment::{is_nothing, names_match};
use crate::guard::needs_equip;
use crate::hotkey::Hotkey;
use crate::matcher::PatternMatcher;
use crate::mode::{Exclusive, Selection, Toggle};
use crate::restore::PendingRestore;
use crate::trigger::RuleSpec;

/// The two configured morph shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Morph {
    First,
    Second,
}

/// What a chat line tells us about the ranger's real state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RangerEvent {
    /// The belt refused: no morph, and any speed boost is gone
    CannotUse,
    /// Back in human form
    Returned,
    /// Spirit link started or the player fell
    Linked,
    /// The speed boost ran out
    Slowed,
}

fn chat_rules() -> Vec<RuleSpec<RangerEvent>> {
    vec![
        RuleSpec::contains("cannot possibly use", RangerEvent::CannotUse),
        RuleSpec::contains("you return", RangerEvent::Returned),
        RuleSpec::contains("you are already in", RangerEvent::Returned),
        RuleSpec::contains("using /share to create a spirit link", RangerEvent::Linked),
        RuleSpec::contains("{player} has fallen to a", RangerEvent::Linked),
        RuleSpec::contains("you slow down", RangerEvent::Slowed),
    ]
}

#[derive(Debug, Default)]
struct RangerState {
    morph: Exclusive<Morph>,
    speed: Toggle,
    /// Set when a link/fall ended a morph; the speed boost survives it
    keep_speed: bool,
}

pub struct Ranger {
    config: RangerConfig,
    matcher: PatternMatcher<RangerEvent>,
    state: Mutex<RangerState>,
    left_hand: PendingRestore,
}

impl Ranger {
    pub fn new(config: &RangerConfig, player: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            config: config.clone(),
            matcher: PatternMatcher::compile(&chat_rules(), player)?,
            state: Mutex::new(RangerState::default()),
            left_hand: PendingRestore::new(),
        })
    }

    pub fn morph(&self) -> Option<Morph> {
        self.state.lock().morph.active()
    }

    pub fn speed(&self) -> Toggle {
        self.state.lock().speed
    }

    fn morph_name(&self, morph: Morph) -> &str {
        match morph {
            Morph::First => &self.config.first_morph,
            Morph::Second => &self.config.second_morph,
        }
    }

    fn ensure_belt(&self, cx: &Context<'_>) -> Vec<Action> {
        if needs_equip(cx.slot(&self.config.waist_slot).as_deref(), &self.config.belt_name) {
            vec![Action::EquipFromInventory(self.config.belt_token.clone())]
        } else {
            Vec::new()
        }
    }

    fn select_morph(&self, cx: &Context<'_>, morph: Morph) -> Vec<Action> {
        let mut actions = self.ensure_belt(cx);
        let mut state = self.state.lock();
        let belt = self.config.belt_token.as_str();
        match state.morph.select(morph) {
            Selection::Activate(morph) => {
                log::debug!("ranger: morph {:?}", morph);
                let shape = format!("/shape \"{}\"", self.morph_name(morph));
                actions.push(Action::use_item(belt, shape));
            }
            Selection::Deactivate => {
                log::debug!("ranger: morph off");
                actions.push(Action::use_item(belt, "/return"));
            }
        }
        actions
    }

    fn toggle_heartwood(&self, cx: &Context<'_>) -> Vec<Action> {
        let left = cx.slot(&self.config.left_slot);
        let charm_held = left
            .as_deref()
            .is_some_and(|item| names_match(item, &self.config.charm_name));
        let mut state = self.state.lock();
        let mut actions = Vec::new();

        if state.speed.flip().is_on() {
            if let Some(item) = left.as_deref().filter(|item| !is_nothing(item) && !charm_held) {
                self.left_hand.remember(item);
            }
            if !charm_held {
                actions.push(Action::EquipFromInventory(self.config.charm_token.clone()));
            }
            actions.push(Action::use_item("left", ""));
        } else if charm_held {
            actions.push(Action::use_item(self.config.charm_token.as_str(), "/slow"));
            actions.extend(self.swap_back(&mut state));
        }
        log::debug!("ranger: speed {}", state.speed);
        actions
    }

    /// Put the left hand back after the speed boost ends
    fn swap_back(&self, state: &mut RangerState) -> Vec<Action> {
        state.keep_speed = false;
        match self.left_hand.take() {
            Some(item) if !is_nothing(&item) => vec![
                Action::Notify(format!("* swapping left hand back to {}", item)),
                Action::EquipFromInventory(item),
            ],
            _ => vec![Action::UnequipFromInventory(self.config.charm_token.clone())],
        }
    }

    fn reset_all(&self) -> Vec<Action> {
        let mut state = self.state.lock();
        state.morph.reset();
        state.speed = Toggle::Off;
        state.keep_speed = false;
        self.left_hand.clear();
        vec![
            Action::use_item(self.config.belt_token.as_str(), "/return"),
            Action::UnequipFromInventory(self.config.charm_token.clone()),
        ]
    }

    fn reflect(&self, cx: &Context<'_>) -> Vec<Action> {
        let mut actions = self.ensure_belt(cx);
        actions.push(Action::use_item(self.config.belt_token.as_str(), "/reflect"));
        actions
    }

    fn help() -> Vec<Action> {
        [
            "F1 = First morph (toggle-able)",
            "F2 = Second morph (toggle-able)",
            "F3 = HeartWood Charm (toggle-able)",
            "F10 = Return and reset macro numbers",
        ]
        .iter()
        .map(|line| Action::console(*line))
        .collect()
    }

    /// Apply a server-announced fact; forced resets owe no deactivate command
    fn reconcile(&self, event: RangerEvent) -> Vec<Action> {
        let mut state = self.state.lock();
        let mut actions = Vec::new();
        match event {
            RangerEvent::Returned => {
                state.morph.reset();
            }
            RangerEvent::CannotUse => {
                state.morph.reset();
                if state.speed.force_off() {
                    actions.extend(self.swap_back(&mut state));
                }
            }
            RangerEvent::Linked => {
                if state.morph.reset().is_some() {
                    state.keep_speed = true;
                }
                if !state.keep_speed && state.speed.force_off() {
                    actions.extend(self.swap_back(&mut state));
                }
            }
            RangerEvent::Slowed => {
                if state.speed.force_off() {
                    actions.extend(self.swap_back(&mut state));
                }
            }
        }
        log::debug!(
            "ranger: {:?} -> morph {:?}, speed {}",
            event,
            state.morph.active(),
            state.speed
        );
        actions
    }
}

impl Addon for Ranger {
    fn name(&self) -> &'static str {
        "ranger"
    }

    fn commands(&self) -> Vec<String> {
        [
            "_firstMorph",
            "_secondMorph",
            "_toggleHeartwood",
            "_resetAll",
            "reflect",
            "ranger",
        ]
        .iter()
        .map(|c| c.to_string())
        .collect()
    }

    fn hotkeys(&self) -> Vec<HotkeyBinding> {
        [
            ("F1", "/_firstMorph"),
            ("F2", "/_secondMorph"),
            ("F3", "/_toggleHeartwood"),
            ("F10", "/_resetAll"),
        ]
        .iter()
        .map(|(key, command)| HotkeyBinding::new(Hotkey::key(*key), *command))
        .collect()
    }

    fn on_command(&self, cx: &Context<'_>, command: &str, _args: &str) -> Vec<Action> {
        match command {
            "_firstMorph" => self.select_morph(cx, Morph::First),
            "_secondMorph" => self.select_morph(cx, Morph::Second),
            "_toggleHeartwood" => self.toggle_heartwood(cx),
            "_resetAll" => self.reset_all(),
            "reflect" => self.reflect(cx),
            "ranger" => Self::help(),
            _ => Vec::new(),
        }
    }

    fn on_chat(&self, _cx: &Context<'_>, line: &str) -> Vec<Action> {
        match self.matcher.match_line(line) {
            Some(hit) => self.reconcile(hit.event),
            None => Vec::new(),
        }
    }
}
