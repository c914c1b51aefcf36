/// Exclusive-choice mode: inactive, or exactly one active variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Exclusive<V> {
    #[default]
    Inactive,
    Active(V),
}

/// The corrective action a selection calls for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection<V> {
    /// Switch to this variant (from inactive or from another variant)
    Activate(V),
    /// The active variant was selected again
    Deactivate,
}

impl<V: Copy + PartialEq> Exclusive<V> {
    pub fn active(&self) -> Option<V> {
        match self {
            Exclusive::Inactive => None,
            Exclusive::Active(v) => Some(*v),
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, Exclusive::Active(_))
    }

    /// Select a variant; selecting the active one again toggles it off
    ///
    /// Switching between variants is a single activation, with no
    /// deactivation in between.
    pub fn select(&mut self, variant: V) -> Selection<V> {
        match self {
            Exclusive::Active(current) if *current == variant => {
                *self = Exclusive::Inactive;
                Selection::Deactivate
            }
            _ => {
                *self = Exclusive::Active(variant);
                Selection::Activate(variant)
            }
        }
    }

    /// Forced reset from an authoritative event; no action is owed
    ///
    /// Returns the variant that was active, if any.
    pub fn reset(&mut self) -> Option<V> {
        let prior = self.active();
        *self = Exclusive::Inactive;
        prior
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_cycle() {
        let mut mode = Exclusive::default();
        assert_eq!(mode.select(1), Selection::Activate(1));
        assert_eq!(mode, Exclusive::Active(1));

        assert_eq!(mode.select(1), Selection::Deactivate);
        assert_eq!(mode, Exclusive::Inactive);

        mode.select(1);
        assert_eq!(mode.select(2), Selection::Activate(2));
        assert_eq!(mode.active(), Some(2));
    }

    #[test]
    fn test_reset_always_inactive() {
        let mut mode = Exclusive::Active('a');
        assert_eq!(mode.reset(), Some('a'));
        assert!(!mode.is_active());
        assert_eq!(mode.reset(), None);
        assert_eq!(mode, Exclusive::Inactive);
    }
}
