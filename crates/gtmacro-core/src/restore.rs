// Gtmacro Pending Restore
// The item to put back after a temporary equip, guarded by a generation counter

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use crate::equipment::is_nothing;

#[derive(Debug, Default)]
struct RestoreSlot {
    item: Option<String>,
    generation: u64,
}

/// Single remembered "item to restore" for one slot
///
/// Each new temporary-equip sequence overwrites the remembered item and arms
/// a new generation. A deferred restoration only runs if its ticket still
/// carries the current generation, so a newer sequence invalidates the
/// restoration of an older one instead of racing it.
#[derive(Debug, Default)]
pub struct PendingRestore {
    slot: Mutex<RestoreSlot>,
}

/// What a deferred restoration resolved to when it fired
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RestoreOutcome {
    /// A newer sequence armed the slot; nothing to do
    Superseded,
    /// Put this item back
    Reequip(String),
    /// Nothing to put back; take the temporary item off
    Unequip(String),
}

impl PendingRestore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remember the item to restore (last write wins)
    pub fn remember(&self, item: &str) {
        self.slot.lock().item = Some(item.to_string());
    }

    pub fn item(&self) -> Option<String> {
        self.slot.lock().item.clone()
    }

    /// Take the remembered item, clearing it
    pub fn take(&self) -> Option<String> {
        self.slot.lock().item.take()
    }

    /// Forget the remembered item and invalidate any armed restoration
    pub fn clear(&self) {
        let mut slot = self.slot.lock();
        slot.item = None;
        slot.generation += 1;
    }

    pub fn generation(&self) -> u64 {
        self.slot.lock().generation
    }

    /// Start a new generation and hand out the ticket for its restoration
    ///
    /// `temporary` is the command token of the temporarily equipped item,
    /// unequipped when there is nothing to put back.
    pub fn arm(self: &Arc<Self>, delay: Duration, temporary: &str) -> RestoreTicket {
        let mut slot = self.slot.lock();
        slot.generation += 1;
        RestoreTicket {
            pending: Arc::clone(self),
            generation: slot.generation,
            delay,
            temporary: temporary.to_string(),
        }
    }

    /// Resolve a fired ticket against the current generation
    pub fn resolve(&self, ticket: &RestoreTicket) -> RestoreOutcome {
        let mut slot = self.slot.lock();
        if slot.generation != ticket.generation {
            return RestoreOutcome::Superseded;
        }
        match slot.item.take() {
            Some(item) if !is_nothing(&item) => RestoreOutcome::Reequip(item),
            _ => RestoreOutcome::Unequip(ticket.temporary.clone()),
        }
    }
}

/// A scheduled restoration for one generation of a [`PendingRestore`]
#[derive(Debug, Clone)]
pub struct RestoreTicket {
    pending: Arc<PendingRestore>,
    generation: u64,
    delay: Duration,
    temporary: String,
}

impl RestoreTicket {
    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn temporary(&self) -> &str {
        &self.temporary
    }

    /// Resolve this ticket now
    pub fn resolve(&self) -> RestoreOutcome {
        self.pending.resolve(self)
    }
}

impl PartialEq for RestoreTicket {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.pending, &other.pending)
            && self.generation == other.generation
            && self.delay == other.delay
            && self.temporary == other.temporary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_current_ticket_reequips_remembered_item() {
        let pending = Arc::new(PendingRestore::new());
        pending.remember("Sword");
        let ticket = pending.arm(Duration::from_secs(2), "staffofballou");
        assert_eq!(ticket.resolve(), RestoreOutcome::Reequip("Sword".to_string()));
        assert_eq!(pending.item(), None);
    }

    #[test]
    fn test_nothing_to_restore_unequips_temporary() {
        let pending = Arc::new(PendingRestore::new());
        let ticket = pending.arm(Duration::ZERO, "rodofakea");
        assert_eq!(ticket.resolve(), RestoreOutcome::Unequip("rodofakea".to_string()));

        pending.remember("Nothing");
        let ticket = pending.arm(Duration::ZERO, "rodofakea");
        assert_eq!(ticket.resolve(), RestoreOutcome::Unequip("rodofakea".to_string()));
    }

    #[test]
    fn test_newer_sequence_supersedes_older_ticket() {
        let pending = Arc::new(PendingRestore::new());
        pending.remember("Sword");
        let first = pending.arm(Duration::from_secs(2), "staffofballou");
        pending.remember("Axe");
        let second = pending.arm(Duration::from_secs(2), "staffofballou");

        assert_eq!(first.resolve(), RestoreOutcome::Superseded);
        assert_eq!(second.resolve(), RestoreOutcome::Reequip("Axe".to_string()));
        assert_ne!(first, second);
    }

    #[test]
    fn test_clear_invalidates_armed_ticket() {
        let pending = Arc::new(PendingRestore::new());
        pending.remember("Sword");
        let ticket = pending.arm(Duration::ZERO, "staffofballou");
        pending.clear();
        assert_eq!(ticket.resolve(), RestoreOutcome::Superseded);
        assert_eq!(pending.take(), None);
    }
}
