// Gtmacro Action Guards
// Preconditions checked fresh, immediately before a use action

use crate::equipment::names_match;

/// Why a guarded action was refused
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GuardError {
    /// A disqualifying item is held in the acting slot
    #[error("* Disabled {marker} equipped!")]
    Disabled { marker: String, item: String },
}

/// Refuses actions while a disqualifying item is held
///
/// An item is disqualifying when its name contains the marker
/// (case-insensitive). An empty marker disables the guard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisabledGuard {
    marker: String,
}

impl DisabledGuard {
    pub fn new(marker: impl AsRef<str>) -> Self {
        Self {
            marker: marker.as_ref().trim().to_lowercase(),
        }
    }

    /// Check the live held item
    pub fn check(&self, held: Option<&str>) -> Result<(), GuardError> {
        if self.marker.is_empty() {
            return Ok(());
        }
        match held {
            Some(item) if item.to_lowercase().contains(&self.marker) => Err(GuardError::Disabled {
                marker: self.marker.clone(),
                item: item.to_string(),
            }),
            _ => Ok(()),
        }
    }
}

/// Equip-before-use: whether the slot must be (re)equipped before using `required`
///
/// Compares the live query result case-insensitively, so an item already in
/// place never gets a redundant equip command.
pub fn needs_equip(live: Option<&str>, required: &str) -> bool {
    live.map_or(true, |item| !names_match(item, required))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guard_blocks_marker() {
        let guard = DisabledGuard::new("chain");
        let err = guard.check(Some("Iron Chain")).unwrap_err();
        assert_eq!(err.to_string(), "* Disabled chain equipped!");
        assert!(guard.check(Some("Caduceus")).is_ok());
        assert!(guard.check(None).is_ok());
    }

    #[test]
    fn test_empty_marker_never_blocks() {
        let guard = DisabledGuard::new("  ");
        assert!(guard.check(Some("chain")).is_ok());
    }

    #[test]
    fn test_needs_equip() {
        assert!(!needs_equip(Some("CADUCEUS"), "Caduceus"));
        assert!(needs_equip(Some("Sword"), "Caduceus"));
        assert!(needs_equip(None, "Caduceus"));
    }
}
