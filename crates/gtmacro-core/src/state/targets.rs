// Gtmacro Target Slots
// Ten remembered target names with a round-robin capture cursor

/// Number of target slots (indices 0-9)
pub const SLOT_COUNT: usize = 10;

/// Errors raised by slot assignment
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SlotError {
    #[error("invalid slot index: '{0}'")]
    InvalidIndex(String),

    #[error("slot index {0} out of range 0-9")]
    OutOfRange(usize),

    #[error("target name cannot be empty")]
    EmptyName,
}

/// Fixed-size table mapping slot index to a remembered target name
///
/// Assignment is last-write-wins and nothing is ever evicted. Captured
/// names go into the slot under the cursor, which then advances and wraps
/// from 9 back to 0.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetSlotTable {
    slots: [Option<String>; SLOT_COUNT],
    cursor: usize,
}

impl TargetSlotTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a user-supplied slot index
    pub fn parse_index(text: &str) -> Result<usize, SlotError> {
        let index: usize = text
            .trim()
            .parse()
            .map_err(|_| SlotError::InvalidIndex(text.trim().to_string()))?;
        if index >= SLOT_COUNT {
            return Err(SlotError::OutOfRange(index));
        }
        Ok(index)
    }

    /// Overwrite slot `index`
    pub fn assign(&mut self, index: usize, name: &str) -> Result<(), SlotError> {
        if index >= SLOT_COUNT {
            return Err(SlotError::OutOfRange(index));
        }
        let name = name.trim();
        if name.is_empty() {
            return Err(SlotError::EmptyName);
        }
        self.slots[index] = Some(name.to_string());
        Ok(())
    }

    /// Store a name in the cursor slot and advance the cursor
    ///
    /// Returns the slot the name went into.
    pub fn capture(&mut self, name: &str) -> Result<usize, SlotError> {
        let index = self.cursor;
        self.assign(index, name)?;
        self.cursor = (index + 1) % SLOT_COUNT;
        Ok(index)
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.slots.get(index).and_then(|slot| slot.as_deref())
    }

    /// Slot the next capture will write to
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Filled slots in index order
    pub fn entries(&self) -> impl Iterator<Item = (usize, &str)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| slot.as_deref().map(|name| (index, name)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assign_overwrites() {
        let mut table = TargetSlotTable::new();
        table.assign(3, "Bob").unwrap();
        table.assign(3, "Carol").unwrap();
        assert_eq!(table.get(3), Some("Carol"));
        assert_eq!(table.entries().count(), 1);
    }

    #[test]
    fn test_assign_rejects_bad_input() {
        let mut table = TargetSlotTable::new();
        assert_eq!(table.assign(10, "Bob"), Err(SlotError::OutOfRange(10)));
        assert_eq!(table.assign(0, "  "), Err(SlotError::EmptyName));
        assert_eq!(TargetSlotTable::parse_index("x"), Err(SlotError::InvalidIndex("x".into())));
        assert_eq!(TargetSlotTable::parse_index("12"), Err(SlotError::OutOfRange(12)));
        assert_eq!(TargetSlotTable::parse_index(" 9 "), Ok(9));
        assert_eq!(table, TargetSlotTable::new());
    }

    #[test]
    fn test_capture_cursor_wraps() {
        let mut table = TargetSlotTable::new();
        for i in 0..SLOT_COUNT {
            assert_eq!(table.capture(&format!("T{}", i)).unwrap(), i);
        }
        assert_eq!(table.cursor(), 0);
        assert_eq!(table.capture("Wrapped").unwrap(), 0);
        assert_eq!(table.get(0), Some("Wrapped"));
        assert_eq!(table.get(9), Some("T9"));
        assert_eq!(table.cursor(), 1);
    }

    #[test]
    fn test_failed_capture_keeps_cursor() {
        let mut table = TargetSlotTable::new();
        assert!(table.capture("").is_err());
        assert_eq!(table.cursor(), 0);
    }

    #[test]
    fn test_entries_in_index_order() {
        let mut table = TargetSlotTable::new();
        table.assign(7, "Zed").unwrap();
        table.assign(2, "Amy").unwrap();
        let entries: Vec<_> = table.entries().collect();
        assert_eq!(entries, vec![(2, "Amy"), (7, "Zed")]);
    }
}
