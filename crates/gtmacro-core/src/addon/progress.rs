// Gtmacro Progress
// Trainer feedback phrases rendered as console progress bars

use super::{Addon, Context};
use crate::action::Action;
use crate::config::ConfigError;
use crate::matcher::PatternMatcher;
use crate::trigger::RuleSpec;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ProgressEvent {
    Bar(&'static str),
    Echo,
}

const BARS: [(&str, &str); 8] = [
    ("is becoming frustrated with your lack of progress", "* |══════════| -0%"),
    ("you have a difficult task ahead of you", "* |══════════| 0%"),
    ("you have just begun to", "* |▰═════════| 0%-13%"),
    ("you are starting to learn, but", "* |▰▰▰═══════| 13%-38%"),
    ("you are making progress.", "* |▰▰▰▰▰═════| 38%-62%"),
    ("you are well on your way to enlightenment", "* |▰▰▰▰▰▰════| 62%-75%"),
    ("you are close to mastering", "* |▰▰▰▰▰▰▰═══| 75%-88%"),
    ("you are almost ready for a breakthrough", "* |▰▰▰▰▰▰▰▰▰═| 88%-100%"),
];

pub struct Progress {
    matcher: PatternMatcher<ProgressEvent>,
}

impl Progress {
    pub fn new(player: &str) -> Result<Self, ConfigError> {
        let mut rules: Vec<RuleSpec<ProgressEvent>> = BARS
            .iter()
            .map(|(phrase, bar)| RuleSpec::contains(*phrase, ProgressEvent::Bar(*bar)))
            .collect();
        rules.push(RuleSpec::contains("Ranger progress", ProgressEvent::Echo));
        Ok(Self {
            matcher: PatternMatcher::compile(&rules, player)?,
        })
    }
}

impl Addon for Progress {
    fn name(&self) -> &'static str {
        "progress"
    }

    fn commands(&self) -> Vec<String> {
        Vec::new()
    }

    fn on_command(&self, _cx: &Context<'_>, _command: &str, _args: &str) -> Vec<Action> {
        Vec::new()
    }

    fn on_chat(&self, _cx: &Context<'_>, line: &str) -> Vec<Action> {
        match self.matcher.match_line(line).map(|hit| hit.event) {
            Some(ProgressEvent::Bar(bar)) => vec![Action::console(bar)],
            Some(ProgressEvent::Echo) => vec![Action::console(format!("* {}", line))],
            None => Vec::new(),
        }
    }
}
