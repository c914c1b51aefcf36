// Gtmacro State
// Process-local state shared between add-on entry points

pub mod targets;

pub use targets::{SlotError, TargetSlotTable, SLOT_COUNT};
