// Gtmacro Trigger Rules
// Pattern -> event rules evaluated against incoming chat/log lines

use regex::Regex;

/// Placeholder replaced with the observing player's name at compile time
pub const PLAYER_PLACEHOLDER: &str = "{player}";

/// How a rule recognises a line
///
/// Both kinds match case-insensitively anywhere in the line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriggerPattern {
    /// Literal substring
    Contains(String),
    /// Regular expression; the first capture group, if any, is reported
    Regex(String),
}

impl TriggerPattern {
    pub fn as_str(&self) -> &str {
        match self {
            TriggerPattern::Contains(text) | TriggerPattern::Regex(text) => text,
        }
    }

    /// Build the case-insensitive regex source with the player name bound
    fn to_regex_source(&self, player: &str) -> String {
        match self {
            TriggerPattern::Contains(text) => {
                let text = text.replace(PLAYER_PLACEHOLDER, player);
                format!("(?i){}", regex::escape(&text))
            }
            TriggerPattern::Regex(source) => {
                let source = source.replace(PLAYER_PLACEHOLDER, &regex::escape(player));
                format!("(?i){}", source)
            }
        }
    }
}

/// Errors raised while compiling trigger rules
#[derive(Debug, thiserror::Error)]
pub enum TriggerError {
    #[error("invalid trigger pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// Uncompiled rule: a pattern and the event it produces
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleSpec<E> {
    pub pattern: TriggerPattern,
    pub event: E,
}

impl<E> RuleSpec<E> {
    pub fn contains(text: impl Into<String>, event: E) -> Self {
        Self {
            pattern: TriggerPattern::Contains(text.into()),
            event,
        }
    }

    pub fn regex(source: impl Into<String>, event: E) -> Self {
        Self {
            pattern: TriggerPattern::Regex(source.into()),
            event,
        }
    }

    /// Compile the rule for a given observing player
    pub fn compile(&self, player: &str) -> Result<TriggerRule<E>, TriggerError>
    where
        E: Clone,
    {
        let source = self.pattern.to_regex_source(player);
        let regex = Regex::new(&source).map_err(|source| TriggerError::InvalidPattern {
            pattern: self.pattern.as_str().to_string(),
            source,
        })?;
        Ok(TriggerRule {
            has_capture: regex.captures_len() > 1,
            regex,
            event: self.event.clone(),
        })
    }
}

/// A compiled rule, ready to test lines
#[derive(Debug, Clone)]
pub struct TriggerRule<E> {
    regex: Regex,
    has_capture: bool,
    event: E,
}

impl<E> TriggerRule<E> {
    pub fn event(&self) -> &E {
        &self.event
    }

    /// Test a line; on a match return the first capture group (if the pattern has one)
    ///
    /// The outer option is the match, the inner one the capture.
    pub fn test<'l>(&self, line: &'l str) -> Option<Option<&'l str>> {
        if !self.regex.is_match(line) {
            return None;
        }
        if !self.has_capture {
            return Some(None);
        }
        let capture = self
            .regex
            .captures(line)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str());
        Some(capture)
    }
}
