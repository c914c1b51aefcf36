use crate::equipment::{names_match, EquippedItem};

/// Fixed list of item names that provide a capability (e.g. healing)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapabilityVocabulary {
    names: Vec<String>,
}

impl CapabilityVocabulary {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    /// Case-insensitive exact membership
    pub fn recognises(&self, item: &str) -> bool {
        self.names.iter().any(|name| names_match(name, item))
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }
}

/// Item-selection mode: the capability item currently bound, if any
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemSelection {
    bound: Option<String>,
}

impl ItemSelection {
    pub fn bound(&self) -> Option<&str> {
        self.bound.as_deref()
    }

    /// Rebind from a fresh equipment snapshot
    ///
    /// The first equipped item the vocabulary recognises wins. The result
    /// replaces the previous binding entirely, so an empty scan unbinds.
    pub fn rescan(&mut self, items: &[EquippedItem], vocabulary: &CapabilityVocabulary) -> Option<&str> {
        self.bound = items
            .iter()
            .filter(|item| item.equipped)
            .find(|item| vocabulary.recognises(&item.name))
            .map(|item| item.name.clone());
        self.bound()
    }
}
