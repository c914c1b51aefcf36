// Gtmacro Booster
// Range/power settings and temporary staff swaps with deferred restoration

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use super::{Addon, Context};
use crate::action::Action;
use crate::config::BoosterConfig;
use crate::equipment::NOTHING;
use crate::guard::needs_equip;
use crate::mode::StepCycle;
use crate::restore::PendingRestore;

#[derive(Debug)]
struct BoosterState {
    range: StepCycle,
    power: StepCycle,
}

pub struct Booster {
    config: BoosterConfig,
    state: Mutex<BoosterState>,
    pending: Arc<PendingRestore>,
}

impl Booster {
    pub fn new(config: &BoosterConfig) -> Self {
        Self {
            config: config.clone(),
            state: Mutex::new(BoosterState {
                range: StepCycle::new(config.range_steps.clone(), config.range),
                power: StepCycle::new(config.power_steps.clone(), config.power),
            }),
            pending: Arc::new(PendingRestore::new()),
        }
    }

    pub fn range(&self) -> u32 {
        self.state.lock().range.value()
    }

    pub fn power(&self) -> u32 {
        self.state.lock().power.value()
    }

    /// Swap `name` into the hand, remembering what it replaced
    ///
    /// Returns the equip (if needed) and the restoration ticket action; the
    /// ticket is armed now so an overlapping sequence supersedes this one.
    fn swap_in(&self, cx: &Context<'_>, name: &str, token: &str) -> (Vec<Action>, Action) {
        let held = cx.held();
        let mut equip = Vec::new();
        if needs_equip(held.as_deref(), name) {
            match held {
                Some(item) => self.pending.remember(&item),
                None => self.pending.remember(NOTHING),
            }
            equip.push(Action::Equip(token.to_string()));
        }
        let delay = Duration::from_millis(self.config.restore_delay_ms);
        let restore = Action::Restore(self.pending.arm(delay, token));
        (equip, restore)
    }

    fn quiet_boost(&self, cx: &Context<'_>) -> Vec<Action> {
        let (mut actions, restore) = self.swap_in(cx, &self.config.staff_name, &self.config.staff_token);
        actions.push(Action::use_on("/QUIET"));
        actions.push(restore);
        actions
    }

    fn atkus_boost(&self, cx: &Context<'_>) -> Vec<Action> {
        let range = self.range();
        let (mut actions, restore) = self.swap_in(cx, &self.config.rod_name, &self.config.rod_token);
        actions.push(Action::command("/narr Atkus-Boost"));
        actions.push(Action::use_on(format!("r{}% 100% /QUIET", range)));
        actions.push(restore);
        actions
    }

    fn balance_boost(&self, cx: &Context<'_>) -> Vec<Action> {
        let (range, power) = {
            let state = self.state.lock();
            (state.range.value(), state.power.value())
        };
        let delay = Duration::from_millis(self.config.balance_delay_ms);
        let (mut actions, restore) = self.swap_in(cx, &self.config.staff_name, &self.config.staff_token);
        actions.push(Action::Wait(Duration::from_millis(self.config.balance_lead_ms)));
        actions.push(Action::command(format!(
            "/narr Balance-Boost in {} seconds",
            whole_seconds(delay)
        )));
        actions.push(Action::Wait(delay));
        actions.push(Action::use_on(format!("r{}% {}%/QUIET", range, power)));
        actions.push(Action::console(format!(
            "* Boosted Range: {}% Power: {}%",
            range, power
        )));
        actions.push(restore);
        actions
    }

    fn cycle_range(&self) -> Vec<Action> {
        let value = self.state.lock().range.advance();
        vec![Action::console(format!("* Range set to {}", value))]
    }

    fn cycle_power(&self) -> Vec<Action> {
        let value = self.state.lock().power.advance();
        vec![Action::console(format!("* Power set to {}", value))]
    }

    /// `set range N` / `set power N`
    fn set(&self, args: &str) -> Vec<Action> {
        let mut parts = args.split_whitespace();
        let (Some(which), Some(value)) = (parts.next(), parts.next()) else {
            log::debug!("set: expected '<range|power> <value>', got '{}'", args);
            return Vec::new();
        };
        let Ok(value) = value.parse::<u32>() else {
            log::debug!("set: '{}' is not a number", value);
            return Vec::new();
        };
        let mut state = self.state.lock();
        match which.to_lowercase().as_str() {
            "range" => {
                state.range.set(value);
                vec![Action::console(format!("* Range set to {}", value))]
            }
            "power" => {
                state.power.set(value);
                vec![Action::console(format!("* Power set to {}", value))]
            }
            other => {
                log::debug!("set: unknown setting '{}'", other);
                Vec::new()
            }
        }
    }
}

impl Addon for Booster {
    fn name(&self) -> &'static str {
        "booster"
    }

    fn commands(&self) -> Vec<String> {
        ["f1", "f2", "f3", "f4", "f5", "set"]
            .iter()
            .map(|c| c.to_string())
            .collect()
    }

    fn on_command(&self, cx: &Context<'_>, command: &str, args: &str) -> Vec<Action> {
        match command {
            "f1" => self.quiet_boost(cx),
            "f2" => self.atkus_boost(cx),
            "f3" => self.balance_boost(cx),
            "f4" => self.cycle_range(),
            "f5" => self.cycle_power(),
            "set" => self.set(args),
            _ => Vec::new(),
        }
    }
}

/// Round a delay to the nearest whole second for narration
fn whole_seconds(delay: Duration) -> u64 {
    (delay.as_millis() as u64 + 500) / 1000
}
