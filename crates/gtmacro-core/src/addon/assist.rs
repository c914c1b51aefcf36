// Gtmacro Assist
// Auto trade zero, auto board and auto mate toggles

use std::time::{Duration, Instant};

use parking_lot::Mutex;

use super::{Addon, Context};
use crate::action::Action;
use crate::config::{AssistConfig, ConfigError};
use crate::matcher::PatternMatcher;
use crate::mode::Toggle;
use crate::trigger::RuleSpec;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AssistEvent {
    TradeOffer,
    BoatPrompt,
}

#[derive(Debug, Default)]
struct AssistState {
    trade_zero: Toggle,
    mate: Toggle,
    board: Toggle,
    last_money: Option<Instant>,
}

pub struct Assist {
    matcher: PatternMatcher<AssistEvent>,
    money_interval: Duration,
    state: Mutex<AssistState>,
}

fn status(feature: &str, mode: Toggle) -> Vec<Action> {
    vec![Action::console(format!("* {} {}", feature, mode))]
}

impl Assist {
    pub fn new(config: &AssistConfig, player: &str) -> Result<Self, ConfigError> {
        let mut rules = vec![RuleSpec::regex(config.trade_pattern.as_str(), AssistEvent::TradeOffer)];
        rules.extend(
            config
                .boat_patterns
                .iter()
                .map(|pattern| RuleSpec::regex(pattern.as_str(), AssistEvent::BoatPrompt)),
        );
        Ok(Self {
            matcher: PatternMatcher::compile(&rules, player)?,
            money_interval: Duration::from_secs(config.money_interval_secs),
            state: Mutex::new(AssistState::default()),
        })
    }

    fn toggle(&self, command: &str) -> Vec<Action> {
        let mut state = self.state.lock();
        match command {
            "atz" => status("Auto Trade Zero", state.trade_zero.flip()),
            "at" => {
                let mode = state.mate.flip();
                // The next tick sends immediately
                state.last_money = None;
                status("Auto Mate", mode)
            }
            "aboard" => status("Auto Board", state.board.flip()),
            _ => Vec::new(),
        }
    }
}

impl Addon for Assist {
    fn name(&self) -> &'static str {
        "assist"
    }

    fn commands(&self) -> Vec<String> {
        ["atz", "at", "aboard"].iter().map(|c| c.to_string()).collect()
    }

    fn on_command(&self, _cx: &Context<'_>, command: &str, _args: &str) -> Vec<Action> {
        self.toggle(command)
    }

    fn on_chat(&self, _cx: &Context<'_>, line: &str) -> Vec<Action> {
        let Some(hit) = self.matcher.match_line(line) else {
            return Vec::new();
        };
        let state = self.state.lock();
        match hit.event {
            AssistEvent::TradeOffer if state.trade_zero.is_on() => match hit.capture {
                Some(trader) => vec![
                    Action::command(format!("/buy 0 {}", trader)),
                    Action::console(format!("* Accepted 0c trade from: {}", trader)),
                ],
                None => Vec::new(),
            },
            AssistEvent::BoatPrompt if state.board.is_on() => vec![
                Action::command("/whisper yes"),
                Action::console("* Auto Boarded"),
            ],
            _ => Vec::new(),
        }
    }

    fn on_tick(&self, _cx: &Context<'_>, now: Instant) -> Vec<Action> {
        let mut state = self.state.lock();
        if !state.mate.is_on() {
            return Vec::new();
        }
        let due = state
            .last_money
            .map_or(true, |last| now.saturating_duration_since(last) >= self.money_interval);
        if !due {
            return Vec::new();
        }
        state.last_money = Some(now);
        vec![Action::command("/money")]
    }
}
