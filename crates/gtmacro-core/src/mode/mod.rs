// Gtmacro Feature Modes
// The closed state families add-on features move between

mod cycle;
mod exclusive;
mod selection;
mod toggle;

pub use cycle::StepCycle;
pub use exclusive::{Exclusive, Selection};
pub use selection::{CapabilityVocabulary, ItemSelection};
pub use toggle::Toggle;
