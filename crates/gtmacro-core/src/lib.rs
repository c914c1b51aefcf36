// Gtmacro Core Library
// Chat-driven mode toggles, guarded equipment actions and click polling for
// game client add-ons

pub mod action;
pub mod addon;
pub mod config;
pub mod emitter;
pub mod equipment;
pub mod event;
pub mod guard;
pub mod host;
pub mod hotkey;
pub mod matcher;
pub mod mode;
pub mod modifier;
pub mod restore;
pub mod runtime;
pub mod savelog;
pub mod state;
pub mod trigger;

pub use action::Action;
pub use addon::{Addon, Context, HotkeyBinding};
pub use config::{default_config_content, AddonKind, Config, ConfigError};
pub use emitter::ActionEmitter;
pub use equipment::{EquippedItem, InventoryItem, ItemId, SlotQuery, NOTHING};
pub use event::{EdgeDetector, PollBinding, PollHandle, PollLoop, PollSampler};
pub use guard::{DisabledGuard, GuardError};
pub use host::{ClickTarget, Host, HostCall, RecordingHost};
pub use hotkey::{parse_hotkey, Hotkey, HotkeyParseError, InputKey, MouseButton};
pub use matcher::{Hit, PatternMatcher};
pub use mode::{CapabilityVocabulary, Exclusive, ItemSelection, Selection, StepCycle, Toggle};
pub use modifier::Modifier;
pub use restore::{PendingRestore, RestoreOutcome, RestoreTicket};
pub use runtime::{DispatchError, Runtime};
pub use savelog::{ConsoleLog, LogError};
pub use state::{SlotError, TargetSlotTable};
pub use trigger::{RuleSpec, TriggerError, TriggerPattern, TriggerRule};
