// Gtmacro Pattern Matcher
// Ordered, first-match-wins evaluation of trigger rules against one line

use crate::trigger::{RuleSpec, TriggerError, TriggerRule};

/// A successful match: the rule's event plus its first capture group
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hit<'l, E> {
    pub event: E,
    pub capture: Option<&'l str>,
}

/// Ordered set of compiled trigger rules
///
/// Rules are evaluated in declaration order and evaluation stops at the
/// first rule that matches. Matching has no side effects; lines that match
/// nothing cost one `is_match` per rule and allocate nothing.
#[derive(Debug, Clone)]
pub struct PatternMatcher<E> {
    rules: Vec<TriggerRule<E>>,
}

impl<E: Clone> PatternMatcher<E> {
    /// Compile rule specs for the given observing player
    pub fn compile(specs: &[RuleSpec<E>], player: &str) -> Result<Self, TriggerError> {
        let rules = specs
            .iter()
            .map(|spec| spec.compile(player))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { rules })
    }

    /// Return the event of the first matching rule, if any
    pub fn match_line<'l>(&self, line: &'l str) -> Option<Hit<'l, E>> {
        self.rules.iter().find_map(|rule| {
            rule.test(line).map(|capture| Hit {
                event: rule.event().clone(),
                capture,
            })
        })
    }
}

impl<E> PatternMatcher<E> {
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl<E> Default for PatternMatcher<E> {
    fn default() -> Self {
        Self { rules: Vec::new() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Ev {
        Return,
        Slow,
        Fallen,
    }

    fn matcher() -> PatternMatcher<Ev> {
        PatternMatcher::compile(
            &[
                RuleSpec::contains("you return", Ev::Return),
                RuleSpec::contains("you slow down", Ev::Slow),
                RuleSpec::contains("{player} has fallen", Ev::Fallen),
            ],
            "Alice",
        )
        .unwrap()
    }

    #[test]
    fn test_first_declared_rule_wins() {
        let m = matcher();
        let hit = m.match_line("You slow down as you return to normal").unwrap();
        assert_eq!(hit.event, Ev::Return);
    }

    #[test]
    fn test_no_match() {
        let m = matcher();
        assert_eq!(m.match_line("Bob says, \"hello\""), None);
        assert_eq!(m.match_line(""), None);
    }

    #[test]
    fn test_player_bound_rule() {
        let m = matcher();
        assert_eq!(m.match_line("ALICE has fallen to a rat").map(|h| h.event), Some(Ev::Fallen));
        assert_eq!(m.match_line("Bob has fallen to a rat"), None);
    }

    #[test]
    fn test_empty_matcher() {
        let m: PatternMatcher<Ev> = PatternMatcher::default();
        assert!(m.is_empty());
        assert_eq!(m.match_line("you return"), None);
        assert_eq!(matcher().len(), 3);
    }
}
