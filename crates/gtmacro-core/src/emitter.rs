// Gtmacro Action Emitter
// Executes corrective actions against the host, strictly in order

use std::sync::Arc;
use std::thread::{self, JoinHandle};

use parking_lot::Mutex;

use crate::action::Action;
use crate::equipment::find_in_inventory;
use crate::host::Host;
use crate::restore::{RestoreOutcome, RestoreTicket};
use crate::savelog::ConsoleLog;

/// Turns [`Action`]s into host calls
///
/// One `apply` call runs its actions sequentially on the calling thread; a
/// [`Action::Wait`] blocks that thread, so batches containing waits should
/// not be applied while holding a feature lock. Deferred restorations run
/// on their own timer thread and never block the caller.
#[derive(Clone)]
pub struct ActionEmitter {
    host: Arc<dyn Host>,
    log: Arc<ConsoleLog>,
    timers: Arc<Mutex<Vec<JoinHandle<()>>>>,
}

impl ActionEmitter {
    pub fn new(host: Arc<dyn Host>) -> Self {
        Self {
            host,
            log: Arc::new(ConsoleLog::disabled()),
            timers: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Mirror console output into a persistent log
    pub fn with_log(mut self, log: Arc<ConsoleLog>) -> Self {
        self.log = log;
        self
    }

    pub fn host(&self) -> &Arc<dyn Host> {
        &self.host
    }

    /// Execute actions in order
    pub fn apply(&self, actions: Vec<Action>) {
        for action in actions {
            self.apply_one(action);
        }
    }

    /// Block until every deferred restoration scheduled so far has run
    pub fn wait_for_restores(&self) {
        loop {
            let pending: Vec<JoinHandle<()>> = std::mem::take(&mut *self.timers.lock());
            if pending.is_empty() {
                return;
            }
            for handle in pending {
                if handle.join().is_err() {
                    log::warn!("restore timer panicked");
                }
            }
        }
    }

    fn apply_one(&self, action: Action) {
        log::debug!("emit {}", action);
        match action {
            Action::Command(_)
            | Action::Equip(_)
            | Action::Unequip(_)
            | Action::Use(_)
            | Action::UseItem { .. } => {
                if let Some(command) = action.command_text() {
                    self.host.run_command(&command);
                }
            }
            Action::EquipFromInventory(name) => match self.lookup(&name) {
                Some(id) => self.host.equip(id),
                None => log::debug!("'{}' not in inventory, equip skipped", name),
            },
            Action::UnequipFromInventory(name) => match self.lookup(&name) {
                Some(id) => self.host.unequip(id),
                None => log::debug!("'{}' not in inventory, unequip skipped", name),
            },
            Action::Console(text) => {
                self.host.console(&text);
                self.log.record(&text);
            }
            Action::Notify(text) => self.host.notify(&text),
            Action::Wait(delay) => {
                if !delay.is_zero() {
                    thread::sleep(delay);
                }
            }
            Action::Restore(ticket) => self.schedule(ticket),
        }
    }

    fn lookup(&self, name: &str) -> Option<crate::equipment::ItemId> {
        find_in_inventory(&self.host.inventory(), name).map(|item| item.id)
    }

    fn schedule(&self, ticket: RestoreTicket) {
        let emitter = self.clone();
        let handle = thread::spawn(move || {
            thread::sleep(ticket.delay());
            let actions = restore_actions(ticket.resolve());
            if actions.is_empty() {
                log::debug!("restore generation {} superseded", ticket.generation());
            }
            emitter.apply(actions);
        });
        let mut timers = self.timers.lock();
        timers.retain(|timer| !timer.is_finished());
        timers.push(handle);
    }
}

/// Actions that carry out a fired restoration
pub fn restore_actions(outcome: RestoreOutcome) -> Vec<Action> {
    match outcome {
        RestoreOutcome::Superseded => Vec::new(),
        RestoreOutcome::Reequip(item) => vec![
            Action::console(format!("* switched: {}", item)),
            Action::Equip(item),
        ],
        RestoreOutcome::Unequip(temporary) => vec![Action::Unequip(temporary)],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::equipment::ItemId;
    use crate::host::{HostCall, RecordingHost};
    use crate::restore::PendingRestore;
    use std::time::Duration;

    fn emitter() -> (Arc<RecordingHost>, ActionEmitter) {
        let host = Arc::new(RecordingHost::new("Alice"));
        let emitter = ActionEmitter::new(host.clone());
        (host, emitter)
    }

    #[test]
    fn test_apply_preserves_order() {
        let (host, emitter) = emitter();
        emitter.apply(vec![
            Action::Equip("Caduceus".into()),
            Action::console("* Healing Bob"),
            Action::use_on("Bob"),
        ]);
        assert_eq!(
            host.calls(),
            vec![
                HostCall::Command("/equip Caduceus".into()),
                HostCall::Console("* Healing Bob".into()),
                HostCall::Command("/use Bob".into()),
            ]
        );
    }

    #[test]
    fn test_inventory_equip_by_id() {
        let (host, emitter) = emitter();
        host.carry(7, "Heartwood Charm");
        emitter.apply(vec![
            Action::EquipFromInventory("heartwood charm".into()),
            Action::UnequipFromInventory("missing thing".into()),
        ]);
        assert_eq!(host.calls(), vec![HostCall::Equip(ItemId(7))]);
    }

    #[test]
    fn test_deferred_restore_reequips() {
        let (host, emitter) = emitter();
        let pending = Arc::new(PendingRestore::new());
        pending.remember("Sword");
        let ticket = pending.arm(Duration::from_millis(10), "staffofballou");

        emitter.apply(vec![Action::use_on("/QUIET"), Action::Restore(ticket)]);
        emitter.wait_for_restores();

        assert_eq!(
            host.calls(),
            vec![
                HostCall::Command("/use /QUIET".into()),
                HostCall::Console("* switched: Sword".into()),
                HostCall::Command("/equip Sword".into()),
            ]
        );
    }

    #[test]
    fn test_superseded_restore_does_nothing() {
        let (host, emitter) = emitter();
        let pending = Arc::new(PendingRestore::new());
        pending.remember("Sword");
        let stale = pending.arm(Duration::from_millis(10), "staffofballou");
        pending.remember("Axe");
        let fresh = pending.arm(Duration::from_millis(30), "staffofballou");

        emitter.apply(vec![Action::Restore(stale), Action::Restore(fresh)]);
        emitter.wait_for_restores();

        assert_eq!(host.commands(), vec!["/equip Axe".to_string()]);
    }

    #[test]
    fn test_restore_actions_unequip_temporary() {
        assert_eq!(
            restore_actions(RestoreOutcome::Unequip("rodofakea".into())),
            vec![Action::Unequip("rodofakea".into())]
        );
        assert!(restore_actions(RestoreOutcome::Superseded).is_empty());
    }
}
